use super::VerifyError;
use crate::domain_model::CanonicalUser;
use chrono::{DateTime, Utc};

/// Outcome of asking a provider about a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub user: CanonicalUser,
    /// When the provider says the token stops being valid.
    pub expires_at: DateTime<Utc>,
}

/// Confirms a token with the named provider. Performs exactly one outbound
/// call per invocation and never caches.
#[async_trait::async_trait]
pub trait ProviderVerifier: Send + Sync {
    async fn verify(&self, token: &str, provider: &str) -> Result<VerifiedIdentity, VerifyError>;
}
