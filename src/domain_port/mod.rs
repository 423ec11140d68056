mod introspection_client;
mod token_cache;

pub use introspection_client::*;
pub use token_cache::*;
