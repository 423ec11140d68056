#[cfg(test)]
pub(crate) mod introspection_client_stub;
mod provider_verifier_fake;
mod provider_verifier_impl;
mod token_verification_service_impl;

pub use provider_verifier_fake::*;
pub use provider_verifier_impl::*;
pub use token_verification_service_impl::*;
