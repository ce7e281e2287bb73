use std::env;
use std::time::Duration;

pub const DEFAULT_CSV_URL: &str = "https://projects.fivethirtyeight.com/nfl-api/nfl_elo.csv";
pub const DEFAULT_ADDR: &str = "127.0.0.1:8501";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub csv_url: String,
    /// `None` keeps a successful fetch for the life of the process.
    pub cache_ttl: Option<Duration>,
    pub request_timeout: Duration,
    pub addr: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            csv_url: DEFAULT_CSV_URL.to_string(),
            cache_ttl: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            addr: DEFAULT_ADDR.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Loads `.env.local` and `.env` (if present) and then reads overrides from the process
    /// environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(opt_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let csv_url = lookup("NFL_ELO_CSV_URL").unwrap_or(defaults.csv_url);
        let cache_ttl = lookup("NFL_ELO_CACHE_TTL_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let request_timeout = lookup("HTTP_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .map(|secs| Duration::from_secs(secs.max(1)))
            .unwrap_or(defaults.request_timeout);
        let addr = lookup("DASHBOARD_ADDR").unwrap_or(defaults.addr);

        Self {
            csv_url,
            cache_ttl,
            request_timeout,
            addr,
        }
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|val| if val.trim().is_empty() { None } else { Some(val) })
}
