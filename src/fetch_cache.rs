use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::feed::RawRatingRow;

#[derive(Debug, Clone)]
pub struct CachedFetch {
    pub rows: Vec<RawRatingRow>,
    pub stored_at: Instant,
    pub fetched_at: DateTime<Local>,
}

/// Holds the last successful fetch. The feed takes no parameters, so there is a single slot.
#[derive(Debug, Clone, Default)]
pub struct FetchCache {
    ttl: Option<Duration>,
    entry: Option<CachedFetch>,
}

impl FetchCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self { ttl, entry: None }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn get(&self, now: Instant) -> Option<&CachedFetch> {
        self.entry.as_ref().filter(|_| self.is_fresh(now))
    }

    pub fn store(&mut self, rows: Vec<RawRatingRow>, now: Instant, fetched_at: DateTime<Local>) {
        self.entry = Some(CachedFetch {
            rows,
            stored_at: now,
            fetched_at,
        });
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_fresh(&self, now: Instant) -> bool {
        let Some(entry) = self.entry.as_ref() else {
            return false;
        };
        match self.ttl {
            None => true,
            Some(ttl) => now.saturating_duration_since(entry.stored_at) < ttl,
        }
    }
}
