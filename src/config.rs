use clap::Args;
use std::time::Duration;

pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_THIN_THRESHOLD: usize = 2000;

/// Tuning for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub workers: usize,
    pub probe_timeout: Duration,
    pub fetch_timeout: Duration,
    /// Pages with this many body characters or fewer are thin.
    pub thin_threshold: usize,
    /// Resolve every listing's website from its phone before classifying.
    pub resolve_first: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            thin_threshold: DEFAULT_THIN_THRESHOLD,
            resolve_first: false,
        }
    }
}

/// Command-line / environment knobs shared by `run` and `check`.
#[derive(Args, Debug, Clone)]
pub struct TuningArgs {
    /// Concurrent workers per stage
    #[arg(long, env = "WORKERS", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Timeout for the HEAD probe, in seconds
    #[arg(long, env = "PROBE_TIMEOUT_SECS", default_value_t = DEFAULT_PROBE_TIMEOUT_SECS)]
    pub probe_timeout_secs: u64,

    /// Timeout for each page fetch, in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub fetch_timeout_secs: u64,

    /// Body text length at or below which a page is thin
    #[arg(long, env = "THIN_THRESHOLD", default_value_t = DEFAULT_THIN_THRESHOLD)]
    pub thin_threshold: usize,
}

impl TuningArgs {
    pub fn to_run_config(&self, resolve_first: bool) -> RunConfig {
        RunConfig {
            workers: self.workers.max(1),
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            thin_threshold: self.thin_threshold,
            resolve_first,
        }
    }
}
