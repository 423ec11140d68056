use crate::domain_model::CachedToken;
use crate::domain_port::TokenCache;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Sharded in-process token cache.
///
/// Readers of a shard share its lock; `set` and eviction take it exclusively.
/// Expired entries are only removed when read (or by `purge_expired`), so an
/// unread token stays in memory until someone asks for it again.
#[derive(Default)]
pub struct MemoryTokenCache {
    entries: DashMap<String, CachedToken>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TokenCache for MemoryTokenCache {
    fn get_at(&self, token: &str, now: DateTime<Utc>) -> Option<CachedToken> {
        {
            // The read guard must be gone before remove_if locks the same shard.
            let entry = self.entries.get(token)?;
            if entry.is_live_at(now) {
                return Some(entry.value().clone());
            }
        }

        // Re-checked under the write lock: a concurrent set may have replaced
        // the stale record with a live one since we looked.
        self.entries.remove_if(token, |_, record| !record.is_live_at(now));
        None
    }

    fn set(&self, token: &str, record: CachedToken) {
        self.entries.insert(token.to_string(), record);
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, record| {
            let live = record.is_live_at(now);
            if !live {
                removed += 1;
            }
            live
        });
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Barrier;

    fn record(id: &str, expires_at: DateTime<Utc>) -> CachedToken {
        CachedToken {
            subject_id: id.to_string(),
            email: format!("{id}@example.com"),
            expires_at,
        }
    }

    #[test]
    fn missing_key_is_not_found() {
        let cache = MemoryTokenCache::new();
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn expired_entry_is_reported_absent_and_removed() {
        let cache = MemoryTokenCache::new();
        let now = Utc::now();
        cache.set("t", record("u1", now - Duration::seconds(5)));
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.get_at("t", now), None);
        assert!(cache.is_empty());
        assert_eq!(cache.get_at("t", now), None);
    }

    #[test]
    fn entry_expiring_exactly_now_is_absent() {
        let cache = MemoryTokenCache::new();
        let now = Utc::now();
        cache.set("t", record("u1", now));
        assert_eq!(cache.get_at("t", now), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn live_entry_is_returned_until_expiry() {
        let cache = MemoryTokenCache::new();
        let now = Utc::now();
        let stored = record("u1", now + Duration::seconds(60));
        cache.set("t", stored.clone());

        assert_eq!(cache.get_at("t", now), Some(stored.clone()));
        assert_eq!(
            cache.get_at("t", now + Duration::seconds(59)),
            Some(stored)
        );
        assert_eq!(cache.get_at("t", now + Duration::seconds(60)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn set_overwrites_existing_record() {
        let cache = MemoryTokenCache::new();
        let now = Utc::now();
        cache.set("t", record("u1", now - Duration::seconds(1)));
        cache.set("t", record("u2", now + Duration::seconds(60)));
        assert_eq!(cache.get_at("t", now).map(|r| r.subject_id), Some("u2".into()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn returned_records_are_copies() {
        let cache = MemoryTokenCache::new();
        let now = Utc::now();
        cache.set("t", record("u1", now + Duration::seconds(60)));

        let mut copy = cache.get_at("t", now).unwrap();
        copy.email = "tampered@example.com".into();
        assert_eq!(cache.get_at("t", now).unwrap().email, "u1@example.com");
    }

    #[test]
    fn unread_expired_entries_are_retained() {
        let cache = MemoryTokenCache::new();
        let now = Utc::now();
        for i in 0..10 {
            cache.set(&format!("t{i}"), record("u", now - Duration::seconds(1)));
        }
        cache.set("live", record("u", now + Duration::seconds(60)));
        assert!(cache.get_at("live", now).is_some());
        assert_eq!(cache.len(), 11);
    }

    #[test]
    fn purge_removes_only_expired() {
        let cache = MemoryTokenCache::new();
        let now = Utc::now();
        cache.set("old-1", record("a", now - Duration::seconds(1)));
        cache.set("old-2", record("b", now));
        cache.set("live", record("c", now + Duration::seconds(1)));

        assert_eq!(cache.purge_expired(now), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get_at("live", now).is_some());
    }

    #[test]
    fn concurrent_disjoint_keys_do_not_interfere() {
        let cache = MemoryTokenCache::new();
        let now = Utc::now();
        let threads = 16;
        let per_thread = 200;

        std::thread::scope(|s| {
            for t in 0..threads {
                let cache = &cache;
                s.spawn(move || {
                    for i in 0..per_thread {
                        let key = format!("t{t}-{i}");
                        let id = format!("u{t}-{i}");
                        cache.set(&key, record(&id, now + Duration::seconds(60)));
                        let got = cache.get_at(&key, now).expect("own key present");
                        assert_eq!(got.subject_id, id);
                    }
                });
            }
        });

        assert_eq!(cache.len(), threads * per_thread);
        for t in 0..threads {
            for i in 0..per_thread {
                let got = cache.get_at(&format!("t{t}-{i}"), now).unwrap();
                assert_eq!(got.subject_id, format!("u{t}-{i}"));
                assert_eq!(got.email, format!("u{t}-{i}@example.com"));
            }
        }
    }

    #[test]
    fn concurrent_reads_of_expired_key_evict_once() {
        let cache = MemoryTokenCache::new();
        let now = Utc::now();
        cache.set("shared", record("u1", now - Duration::seconds(1)));
        cache.set("other", record("u2", now + Duration::seconds(60)));

        let threads = 32;
        let barrier = Barrier::new(threads);
        std::thread::scope(|s| {
            for _ in 0..threads {
                s.spawn(|| {
                    barrier.wait();
                    assert_eq!(cache.get_at("shared", now), None);
                });
            }
        });

        assert_eq!(cache.get_at("shared", now), None);
        assert_eq!(cache.len(), 1);
        assert!(cache.get_at("other", now).is_some());
    }

    #[test]
    fn eviction_never_drops_a_fresh_overwrite() {
        let now = Utc::now();
        for _ in 0..50 {
            let cache = MemoryTokenCache::new();
            cache.set("k", record("stale", now - Duration::seconds(1)));

            let threads = 8;
            let barrier = Barrier::new(threads + 1);
            std::thread::scope(|s| {
                for _ in 0..threads {
                    s.spawn(|| {
                        barrier.wait();
                        let _ = cache.get_at("k", now);
                    });
                }
                s.spawn(|| {
                    barrier.wait();
                    cache.set("k", record("fresh", now + Duration::seconds(60)));
                });
            });

            // set happened exactly once and later than the stale insert, so the
            // fresh record must survive every racing eviction.
            assert_eq!(cache.len(), 1);
            assert_eq!(
                cache.get_at("k", now).map(|r| r.subject_id),
                Some("fresh".to_string())
            );
        }
    }
}
