//! Time-expiring exclusion set.
//!
//! Entries are keyed by unit handle and carry an absolute expiry. An entry is
//! contained while `expiry > now`; an entry whose expiry equals the query time
//! is already gone. Expired entries are swept lazily during [`LocalBlacklist::add`],
//! at most once per sweep interval.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bot_core::UnitId;
use tracing::trace;

#[derive(Clone, Debug)]
pub struct LocalBlacklist {
    entries: HashMap<UnitId, Instant>,
    sweep_interval: Duration,
    last_sweep: Option<Instant>,
}

impl LocalBlacklist {
    pub fn new(sweep_interval: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            sweep_interval,
            last_sweep: None,
        }
    }

    /// Blacklists `id` until `now + ttl`, replacing any earlier expiry.
    pub fn add(&mut self, id: UnitId, ttl: Duration, now: Instant) {
        match self.last_sweep {
            None => self.last_sweep = Some(now),
            Some(last) if now.saturating_duration_since(last) > self.sweep_interval => {
                self.remove_expired(now);
                self.last_sweep = Some(now);
            }
            Some(_) => {}
        }
        self.entries.insert(id, now + ttl);
    }

    pub fn contains(&self, id: UnitId, now: Instant) -> bool {
        self.entries.get(&id).is_some_and(|expiry| *expiry > now)
    }

    pub fn remove_expired(&mut self, now: Instant) {
        let before = self.entries.len();
        self.entries.retain(|_, expiry| *expiry > now);
        trace!(removed = before - self.entries.len(), "swept local blacklist");
    }
}
