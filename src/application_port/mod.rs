mod provider_verifier;
mod token_verification_service;

pub use provider_verifier::*;
pub use token_verification_service::*;
