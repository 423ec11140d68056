use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;

pub struct RealTokenVerificationService {
    cache: Arc<dyn TokenCache>,
    verifier: Arc<dyn ProviderVerifier>,
}

impl RealTokenVerificationService {
    pub fn new(cache: Arc<dyn TokenCache>, verifier: Arc<dyn ProviderVerifier>) -> Self {
        Self { cache, verifier }
    }
}

/// Strips a case-sensitive `Bearer ` prefix; other values pass through untouched.
pub fn bearer_token(authorization: &str) -> &str {
    authorization
        .strip_prefix("Bearer ")
        .unwrap_or(authorization)
}

#[async_trait::async_trait]
impl TokenVerificationService for RealTokenVerificationService {
    async fn verify(
        &self,
        authorization: &str,
        provider: &str,
    ) -> Result<CanonicalUser, VerifyError> {
        let token = bearer_token(authorization);
        if token.is_empty() {
            return Err(VerifyError::MissingToken);
        }
        if provider.is_empty() {
            return Err(VerifyError::MissingProvider);
        }

        let fingerprint = TokenFingerprint::of(token);
        if let Some(cached) = self.cache.get(token) {
            debug!(%fingerprint, provider, "token cache hit");
            return Ok(cached.to_user());
        }

        let identity = match self.verifier.verify(token, provider).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!(%fingerprint, provider, error = %e, "token verification failed");
                return Err(e);
            }
        };

        self.cache
            .set(token, CachedToken::new(&identity.user, identity.expires_at));
        info!(
            %fingerprint,
            provider,
            user = %identity.user.email,
            expires_at = %identity.expires_at,
            "token verified"
        );

        Ok(identity.user)
    }
}
