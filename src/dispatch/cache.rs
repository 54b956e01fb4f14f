use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;

use crate::domain::{CanonicalPhone, MessageText, MessageVariants, UnixTimestamp, Variant};

/// Window within which a repeat send to the same number switches text.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// Entries idle for this many cooldown windows are dropped by [`SendDedupCache::prune`].
pub const DEFAULT_RETENTION_WINDOWS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SendCacheEntry {
    pub last_sent_at: UnixTimestamp,
    pub last_variant: Variant,
}

#[derive(Debug)]
/// Last send time and variant per number, for alternating texts on rapid repeats.
///
/// In-memory only. Every [`SendDedupCache::choose_variant`] call reads and writes its entry
/// under one lock, so two concurrent sends to the same number never both get variant A.
pub struct SendDedupCache {
    cooldown: Duration,
    retention: Duration,
    entries: Mutex<HashMap<CanonicalPhone, SendCacheEntry>>,
}

impl Default for SendDedupCache {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl SendDedupCache {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            retention: cooldown.saturating_mul(DEFAULT_RETENTION_WINDOWS),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Override how long an idle entry is kept before [`SendDedupCache::prune`] drops it.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Pick the text for a send to `phone` at `now` and record it.
    ///
    /// Variant A unless the previous send to this number was less than one cooldown ago, in
    /// which case the other variant. `last_sent_at` becomes `now` either way.
    pub fn choose_variant<'v>(
        &self,
        phone: &CanonicalPhone,
        now: UnixTimestamp,
        variants: &'v MessageVariants,
    ) -> (&'v MessageText, SendCacheEntry) {
        let cooldown_secs = self.cooldown.as_secs();
        let mut entries = self.lock();

        let variant = match entries.get(phone) {
            Some(previous) if now.seconds_since(previous.last_sent_at) < cooldown_secs => {
                previous.last_variant.flip()
            }
            _ => Variant::A,
        };
        let entry = SendCacheEntry {
            last_sent_at: now,
            last_variant: variant,
        };
        entries.insert(phone.clone(), entry);

        (variants.get(variant), entry)
    }

    pub fn get(&self, phone: &CanonicalPhone) -> Option<SendCacheEntry> {
        self.lock().get(phone).copied()
    }

    /// Drop entries whose last send is older than the retention period; returns how many.
    pub fn prune(&self, now: UnixTimestamp) -> usize {
        let retention_secs = self.retention.as_secs();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| now.seconds_since(entry.last_sent_at) < retention_secs);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CanonicalPhone, SendCacheEntry>> {
        // Entries stay consistent even if a holder panicked: each write is a single insert.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
