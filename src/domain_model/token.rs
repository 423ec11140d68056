use super::CanonicalUser;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fmt;

/// What the cache remembers about a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub subject_id: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn new(user: &CanonicalUser, expires_at: DateTime<Utc>) -> Self {
        Self {
            subject_id: user.id.clone(),
            email: user.email.clone(),
            expires_at,
        }
    }

    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn to_user(&self) -> CanonicalUser {
        CanonicalUser::new(self.subject_id.clone(), self.email.clone())
    }
}

/// Short, stable digest of a token that is safe to put in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFingerprint(String);

impl TokenFingerprint {
    const LEN: usize = 12;

    pub fn of(token: &str) -> Self {
        let digest = Sha256::digest(token.as_bytes());
        let mut hex = hex::encode(digest);
        hex.truncate(Self::LEN);
        Self(hex)
    }
}

impl fmt::Display for TokenFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
