mod buckets;
mod classifier;
mod dispatcher;
mod qualifier;

pub use buckets::{dedup_by_name, Buckets};
pub use classifier::Classifier;
pub use dispatcher::Dispatcher;
pub use qualifier::{Fallback, Qualifier};

use crate::config::RunConfig;
use crate::domain::ListingRecord;
use crate::errors::QualifierError;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Classify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Resolve => write!(f, "resolve"),
            Stage::Classify => write!(f, "classify"),
        }
    }
}

/// A record that hit a lookup failure. The record itself still went on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    pub stage: Stage,
    pub name: String,
    pub cause: String,
}

impl RecordError {
    pub fn new(stage: Stage, record: &ListingRecord, err: &QualifierError) -> Self {
        Self {
            stage,
            name: record.name.clone(),
            cause: err.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    /// Already deduplicated.
    pub buckets: Buckets,
    pub errors: Vec<RecordError>,
    pub processed: usize,
    pub elapsed: Duration,
}

/// Optional resolution pass followed by the classification pass. The
/// second pass starts only after the first has fully drained.
pub struct Pipeline {
    dispatcher: Dispatcher,
    qualifier: Qualifier,
    resolve_first: bool,
}

impl Pipeline {
    pub fn new(config: &RunConfig, qualifier: Qualifier) -> Self {
        Self {
            dispatcher: Dispatcher::new(config.workers),
            qualifier,
            resolve_first: config.resolve_first,
        }
    }

    pub fn run(&self, records: Vec<ListingRecord>) -> RunReport {
        let start = Instant::now();
        let mut errors = Vec::new();

        let records = if self.resolve_first {
            let (resolved, resolve_errors) =
                self.dispatcher.resolve_all(records, self.qualifier.resolver());
            errors.extend(resolve_errors);
            resolved
        } else {
            records
        };

        let processed = records.len();
        let (buckets, classify_errors) = self.dispatcher.classify_all(records, &self.qualifier);
        errors.extend(classify_errors);

        let before = buckets.len();
        let buckets = buckets.deduplicated();
        info!(
            "Processed {} records in {:?} ({} duplicates dropped)",
            processed,
            start.elapsed(),
            before - buckets.len()
        );

        RunReport {
            buckets,
            errors,
            processed,
            elapsed: start.elapsed(),
        }
    }
}
