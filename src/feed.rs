use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer};

use crate::fetch_cache::FetchCache;
use crate::http_client::{fetch_text, http_client};

pub const REQUIRED_COLUMNS: [&str; 4] = ["team1", "team2", "elo1_pre", "elo2_pre"];

/// One game row from the ratings feed, as it appears in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRatingRow {
    pub team1: String,
    pub team2: String,
    #[serde(deserialize_with = "blank_as_nan")]
    pub elo1_pre: f64,
    #[serde(deserialize_with = "blank_as_nan")]
    pub elo2_pre: f64,
}

impl RawRatingRow {
    pub fn new(team1: &str, team2: &str, elo1_pre: f64, elo2_pre: f64) -> Self {
        Self {
            team1: team1.to_string(),
            team2: team2.to_string(),
            elo1_pre,
            elo2_pre,
        }
    }
}

pub trait RatingSource: Send + Sync {
    fn fetch_csv(&self) -> Result<String>;

    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct HttpRatingSource {
    pub url: String,
    pub timeout: Duration,
}

impl HttpRatingSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl RatingSource for HttpRatingSource {
    fn fetch_csv(&self) -> Result<String> {
        let client = http_client(self.timeout)?;
        fetch_text(client, &self.url)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Result of one pass through the fetch boundary. Failures never escape as errors: they are
/// reported through `error` with `rows` left empty.
#[derive(Debug, Clone, Default)]
pub struct Acquisition {
    pub rows: Vec<RawRatingRow>,
    pub error: Option<String>,
    pub fetched_at: Option<DateTime<Local>>,
    pub from_cache: bool,
}

impl Acquisition {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn acquire(source: &dyn RatingSource, cache: &mut FetchCache, now: Instant) -> Acquisition {
    if let Some(cached) = cache.get(now) {
        tracing::debug!(rows = cached.rows.len(), "serving ratings from cache");
        return Acquisition {
            rows: cached.rows.clone(),
            error: None,
            fetched_at: Some(cached.fetched_at),
            from_cache: true,
        };
    }

    let fetched = source
        .fetch_csv()
        .and_then(|body| parse_elo_csv(&body));
    match fetched {
        Ok(rows) => {
            let fetched_at = Local::now();
            tracing::info!(
                source = %source.describe(),
                rows = rows.len(),
                "fetched elo ratings"
            );
            cache.store(rows.clone(), now, fetched_at);
            Acquisition {
                rows,
                error: None,
                fetched_at: Some(fetched_at),
                from_cache: false,
            }
        }
        Err(err) => {
            tracing::warn!(source = %source.describe(), "elo fetch failed: {err:#}");
            Acquisition {
                rows: Vec::new(),
                error: Some(format!("Error fetching live data: {err:#}")),
                fetched_at: None,
                from_cache: false,
            }
        }
    }
}

pub fn parse_elo_csv(raw: &str) -> Result<Vec<RawRatingRow>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let headers = reader.headers().context("invalid csv header")?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(anyhow::anyhow!("missing column `{column}`"));
        }
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.deserialize::<RawRatingRow>().enumerate() {
        // Header is line 1.
        let row = record.with_context(|| format!("invalid csv row at line {}", idx + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

fn blank_as_nan<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(serde::de::Error::custom)
}
