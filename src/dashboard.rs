use std::sync::Mutex;
use std::time::Instant;

use serde::Serialize;

use crate::config::DashboardConfig;
use crate::display::{DisplayElement, render_page, render_unavailable};
use crate::feed::{HttpRatingSource, RatingSource, acquire};
use crate::fetch_cache::FetchCache;
use crate::projection::{ProjectionRow, transform};

/// Outcome of one fetch + transform pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineRun {
    pub projections: Vec<ProjectionRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<String>,
    pub from_cache: bool,
}

impl PipelineRun {
    pub fn is_available(&self) -> bool {
        !self.projections.is_empty()
    }

    pub fn display(&self) -> Vec<DisplayElement> {
        if self.projections.is_empty() {
            return render_unavailable(self.error.as_deref());
        }
        render_page(&self.projections)
    }
}

pub struct Dashboard {
    source: Box<dyn RatingSource>,
    cache: Mutex<FetchCache>,
}

impl Dashboard {
    pub fn new(source: Box<dyn RatingSource>, cache: FetchCache) -> Self {
        Self {
            source,
            cache: Mutex::new(cache),
        }
    }

    pub fn from_config(cfg: &DashboardConfig) -> Self {
        let source = HttpRatingSource::new(cfg.csv_url.clone(), cfg.request_timeout);
        Self::new(Box::new(source), FetchCache::new(cfg.cache_ttl))
    }

    /// Fetch (or reuse the cached fetch) and transform. The cache lock is held across the
    /// fetch, so concurrent callers wait for one download instead of starting their own.
    pub fn run(&self) -> PipelineRun {
        let mut cache = self.cache.lock().expect("fetch cache lock poisoned");
        let acquisition = acquire(self.source.as_ref(), &mut cache, Instant::now());
        drop(cache);

        let projections = if acquisition.is_empty() {
            Vec::new()
        } else {
            transform(&acquisition.rows)
        };
        PipelineRun {
            projections,
            error: acquisition.error,
            fetched_at: acquisition
                .fetched_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
            from_cache: acquisition.from_cache,
        }
    }

    pub fn render(&self) -> Vec<DisplayElement> {
        self.run().display()
    }

    pub fn refresh(&self) {
        self.cache
            .lock()
            .expect("fetch cache lock poisoned")
            .invalidate();
        tracing::info!("fetch cache invalidated");
    }
}
