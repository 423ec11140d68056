use crate::domain_model::{CanonicalUser, UnknownProvider};
use crate::domain_port::IntrospectionError;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("provider is required")]
    MissingProvider,
    #[error("authorization header is required")]
    MissingToken,
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),
    #[error("failed to verify token with provider: {0}")]
    ProviderUnreachable(String),
    #[error("invalid token")]
    InvalidToken,
    #[error("failed to decode response from provider: {0}")]
    DecodeFailure(String),
    #[error("missing required user information")]
    MissingUserInfo,
}

impl From<UnknownProvider> for VerifyError {
    fn from(err: UnknownProvider) -> Self {
        VerifyError::UnsupportedProvider(err.0)
    }
}

impl From<IntrospectionError> for VerifyError {
    fn from(err: IntrospectionError) -> Self {
        match err {
            IntrospectionError::Unreachable(e) => VerifyError::ProviderUnreachable(e),
            IntrospectionError::Rejected { .. } => VerifyError::InvalidToken,
            IntrospectionError::Decode(e) => VerifyError::DecodeFailure(e),
        }
    }
}

/// Turns an `Authorization` header value plus a provider name into a verified
/// identity, consulting the token cache before the provider.
#[async_trait::async_trait]
pub trait TokenVerificationService: Send + Sync {
    async fn verify(&self, authorization: &str, provider: &str)
    -> Result<CanonicalUser, VerifyError>;
}
