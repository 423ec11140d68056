mod introspection_client_reqwest;

pub use introspection_client_reqwest::*;
