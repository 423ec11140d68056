use crate::domain_model::CachedToken;
use chrono::{DateTime, Utc};

/// Bearer token → verified identity, valid until the record's `expires_at`.
///
/// Implementations hand out copies; a record is never reported after it has
/// expired, and expired records are dropped lazily by the read that sees them.
pub trait TokenCache: Send + Sync {
    fn get(&self, token: &str) -> Option<CachedToken> {
        self.get_at(token, Utc::now())
    }

    fn get_at(&self, token: &str, now: DateTime<Utc>) -> Option<CachedToken>;

    fn set(&self, token: &str, record: CachedToken);

    /// Drop every record expired at `now`, returning how many were removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> usize;
}
