use super::DEFAULT_TOKEN_TTL_SECS;
use crate::application_port::*;
use crate::domain_model::*;
use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};

const FAKE_TOKEN_PREFIX: &str = "fake-token:";

/// Accepts `fake-token:<email>` for any supported provider, no network involved.
/// Ids are UUIDv5 of `<provider>:<email>`.
#[derive(Debug)]
pub struct FakeProviderVerifier {
    calls: AtomicUsize,
    ttl: Duration,
}

impl Default for FakeProviderVerifier {
    fn default() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        }
    }
}

impl FakeProviderVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ProviderVerifier for FakeProviderVerifier {
    async fn verify(&self, token: &str, provider: &str) -> Result<VerifiedIdentity, VerifyError> {
        let provider: Provider = provider.parse()?;
        self.calls.fetch_add(1, Ordering::SeqCst);

        let email = token
            .strip_prefix(FAKE_TOKEN_PREFIX)
            .ok_or(VerifyError::InvalidToken)?;
        let (name, _) = email.split_once('@').ok_or(VerifyError::MissingUserInfo)?;

        Ok(VerifiedIdentity {
            user: CanonicalUser::new(fake_id(provider, email), email).with_name(name),
            expires_at: Utc::now() + self.ttl,
        })
    }
}

fn fake_id(provider: Provider, email: &str) -> String {
    let key = format!("{provider}:{email}");
    uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
}
