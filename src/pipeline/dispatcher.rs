use crate::domain::{FlagReason, ListingRecord, Verdict};
use crate::errors::Result;
use crate::pipeline::{Buckets, Qualifier, RecordError, Stage};
use crate::resolver::{resolve_phone, PlaceResolver};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use tracing::{debug, info, warn};

/// Fixed-size worker pool. Records go out over one rendezvous channel,
/// results come back over a second channel to a single collector (the
/// calling thread), so buckets are only ever touched from one place.
pub struct Dispatcher {
    workers: usize,
}

impl Dispatcher {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Enrichment pass: copy the identity name into the display name and
    /// look up place id + website from each listing's phone.
    ///
    /// A failed lookup leaves that record's website as it was.
    pub fn resolve_all(
        &self,
        records: Vec<ListingRecord>,
        resolver: &dyn PlaceResolver,
    ) -> (Vec<ListingRecord>, Vec<RecordError>) {
        info!("Resolving {} records with {} workers", records.len(), self.workers);

        let mut resolved = Vec::with_capacity(records.len());
        let mut errors = Vec::new();

        self.fan_out(
            "resolve",
            records,
            |mut record: ListingRecord| {
                record.name = record.business.clone();
                let outcome = resolve_phone(resolver, &record.phone).map(|resolution| {
                    // a found place replaces the website even when it has none
                    if resolution.place_id.is_some() {
                        record.website = resolution.website.unwrap_or_default();
                    }
                    record.place_id = resolution.place_id;
                });
                (record, outcome)
            },
            |(record, outcome): (ListingRecord, Result<()>)| {
                if let Err(e) = outcome {
                    warn!(name = %record.name, error = %e, "lookup failed, keeping listed website");
                    errors.push(RecordError::new(Stage::Resolve, &record, &e));
                }
                resolved.push(record);
            },
        );

        (resolved, errors)
    }

    /// Classification pass: every record ends in exactly one bucket.
    /// Records whose places lookup failed are flagged and reported.
    pub fn classify_all(
        &self,
        records: Vec<ListingRecord>,
        qualifier: &Qualifier,
    ) -> (Buckets, Vec<RecordError>) {
        info!("Classifying {} records with {} workers", records.len(), self.workers);

        let mut buckets = Buckets::default();
        let mut errors = Vec::new();

        self.fan_out(
            "classify",
            records,
            |mut record: ListingRecord| {
                let verdict = qualifier.qualify(&mut record);
                (record, verdict)
            },
            |(record, verdict): (ListingRecord, Result<Verdict>)| match verdict {
                Ok(verdict) => {
                    debug!(name = %record.name, website = %record.website, "{verdict}");
                    buckets.push(verdict.bucket(), record);
                }
                Err(e) => {
                    warn!(name = %record.name, error = %e, "lookup failed, flagging record");
                    errors.push(RecordError::new(Stage::Classify, &record, &e));
                    let verdict = Verdict::Flagged(FlagReason::ResolverFailed(e.to_string()));
                    debug!(name = %record.name, "{verdict}");
                    buckets.push(verdict.bucket(), record);
                }
            },
        );

        (buckets, errors)
    }

    /// Runs `work` on every record across the pool and hands each result
    /// to `collect` on the calling thread. Returns once every worker has
    /// seen the work channel close and exited.
    fn fan_out<T, W, C>(&self, stage: &str, records: Vec<ListingRecord>, work: W, mut collect: C)
    where
        T: Send,
        W: Fn(ListingRecord) -> T + Sync,
        C: FnMut(T),
    {
        let pb = progress_bar(records.len(), stage);

        let (work_tx, work_rx) = mpsc::sync_channel::<ListingRecord>(0);
        let work_rx = Arc::new(Mutex::new(work_rx));
        let (result_tx, result_rx) = mpsc::channel::<T>();

        thread::scope(|s| {
            for _ in 0..self.workers {
                let work_rx = Arc::clone(&work_rx);
                let work = &work;
                let result_tx = result_tx.clone();

                s.spawn(move || loop {
                    // the guard is released before the record is worked on
                    let next = match work_rx.lock() {
                        Ok(rx) => rx.recv(),
                        Err(_) => break,
                    };
                    let Ok(record) = next else { break };

                    if result_tx.send(work(record)).is_err() {
                        break;
                    }
                });
            }
            // workers hold the only receivers, so the feeder stops if they all die
            drop(work_rx);
            drop(result_tx);

            s.spawn(move || {
                for record in records {
                    if work_tx.send(record).is_err() {
                        break;
                    }
                }
                // work_tx dropped here: workers drain and exit
            });

            for result in result_rx {
                collect(result);
                pb.inc(1);
            }
        });

        pb.finish_and_clear();
    }
}

fn progress_bar(len: usize, stage: &str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{prefix} [{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_prefix(stage.to_string());
    pb
}
