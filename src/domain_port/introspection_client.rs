use serde_json::{Map, Value};
use url::Url;

/// Raw attribute map returned by a provider's introspection endpoint.
pub type ProviderResponse = Map<String, Value>;

/// One GET against a provider endpoint. The query carries the raw token, so
/// this type deliberately has no `Debug`.
#[derive(Clone)]
pub struct IntrospectionRequest {
    pub endpoint: Url,
    pub query: Vec<(String, String)>,
}

#[async_trait::async_trait]
pub trait IntrospectionClient: Send + Sync {
    async fn introspect(
        &self,
        request: &IntrospectionRequest,
    ) -> Result<ProviderResponse, IntrospectionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum IntrospectionError {
    #[error("provider unreachable: {0}")]
    Unreachable(String),
    #[error("provider rejected token with HTTP {status}")]
    Rejected { status: u16 },
    #[error("undecodable provider response: {0}")]
    Decode(String),
}
