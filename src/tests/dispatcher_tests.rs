use crate::config::RunConfig;
use crate::domain::ListingRecord;
use crate::errors::Result;
use crate::pipeline::{dedup_by_name, Dispatcher, Pipeline, Stage};
use crate::resolver::PlaceResolver;
use crate::tests::utils::{listing, qualifier, FakeResolver, FakeSite, FakeWeb};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

/// Resolver whose every lookup panics.
struct ExplodingResolver;

impl PlaceResolver for ExplodingResolver {
    fn find_place_id(&self, query: &str) -> Result<Option<String>> {
        panic!("lookup for {query} blew up");
    }

    fn website_for_place(&self, _place_id: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

fn names(records: &[ListingRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn every_record_lands_in_exactly_one_bucket() {
    let resolver = Arc::new(FakeResolver::default());
    let mut web = FakeWeb::default();
    let mut records = Vec::new();
    for i in 0..120 {
        let url = format!("http://site{i}.example");
        let site = match i % 3 {
            0 => FakeSite::up(200, 5000),
            1 => FakeSite::up(200, 10),
            _ => FakeSite::up(404, 0),
        };
        web = web.with_site(&url, site);
        let website = if i % 10 == 0 { String::new() } else { url };
        records.push(listing(&format!("Biz {i}"), &website, "555-0000"));
    }
    let web = Arc::new(web);
    let q = qualifier(&resolver, &web);

    let (buckets, errors) = Dispatcher::new(10).classify_all(records, &q);

    assert!(errors.is_empty());
    assert_eq!(buckets.len(), 120);

    let mut seen = HashSet::new();
    for name in names(&buckets.flagged)
        .into_iter()
        .chain(names(&buckets.empty))
        .chain(names(&buckets.review))
    {
        assert!(seen.insert(name.to_string()), "{name} classified twice");
    }
    assert_eq!(seen.len(), 120);
    assert_eq!(buckets.empty.len(), 12);
}

#[test]
fn single_worker_drains_the_channel() {
    let resolver = Arc::new(FakeResolver::default());
    let web = Arc::new(FakeWeb::default().with_site("http://delta.example", FakeSite::up(200, 5000)));
    let q = qualifier(&resolver, &web);

    let records = vec![
        listing("Acme Co", "", "555-1234"),
        listing("Delta Corp", "http://delta.example", ""),
        listing("Dead Corp", "http://dead.example", ""),
    ];
    let (buckets, _) = Dispatcher::new(1).classify_all(records, &q);

    assert_eq!(names(&buckets.empty), ["Acme Co"]);
    assert_eq!(names(&buckets.review), ["Delta Corp"]);
    assert_eq!(names(&buckets.flagged), ["Dead Corp"]);
}

#[test]
fn zero_workers_still_runs_one() {
    let resolver = Arc::new(FakeResolver::default());
    let web = Arc::new(FakeWeb::default());
    let q = qualifier(&resolver, &web);

    let (buckets, _) = Dispatcher::new(0).classify_all(vec![listing("Acme Co", "", "")], &q);
    assert_eq!(buckets.empty.len(), 1);
}

#[test]
fn lookup_failure_flags_the_record_and_keeps_going() {
    let resolver = Arc::new(FakeResolver::default().failing_for("+15551111"));
    let web = Arc::new(FakeWeb::default().with_site("http://delta.example", FakeSite::up(200, 5000)));
    let q = qualifier(&resolver, &web);

    let records = vec![
        listing("Denied", "http://business.site", "555-1111"),
        listing("Delta Corp", "http://delta.example", ""),
    ];
    let (buckets, errors) = Dispatcher::new(4).classify_all(records, &q);

    assert_eq!(names(&buckets.flagged), ["Denied"]);
    assert_eq!(names(&buckets.review), ["Delta Corp"]);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].stage, Stage::Classify);
    assert_eq!(errors[0].name, "Denied");
    assert!(errors[0].cause.contains("REQUEST_DENIED"));
}

#[test]
fn empty_input_gives_empty_buckets() {
    let resolver = Arc::new(FakeResolver::default());
    let web = Arc::new(FakeWeb::default());
    let q = qualifier(&resolver, &web);

    let (buckets, errors) = Dispatcher::new(10).classify_all(Vec::new(), &q);
    assert!(buckets.is_empty());
    assert!(errors.is_empty());
}

#[test]
fn resolve_pass_enriches_records() {
    let resolver = FakeResolver::default()
        .with_place("+15550001", "place-1")
        .with_website("place-1", "http://found.example")
        .with_place("+15550002", "place-2")
        .failing_for("+15550003");

    let mut found = listing("ignored", "http://old.example", "555-0001");
    found.business = "Found Co".into();
    let mut siteless = listing("ignored", "http://old.example", "555-0002");
    siteless.business = "Siteless Co".into();
    let mut unknown = listing("ignored", "http://kept.example", "555-0009");
    unknown.business = "Unknown Co".into();
    let mut denied = listing("ignored", "http://kept.example", "555-0003");
    denied.business = "Denied Co".into();

    let (mut records, errors) =
        Dispatcher::new(3).resolve_all(vec![found, siteless, unknown, denied], &resolver);
    records.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(
        names(&records),
        ["Denied Co", "Found Co", "Siteless Co", "Unknown Co"]
    );
    assert_eq!(records[0].website, "http://kept.example");
    assert_eq!(records[1].website, "http://found.example");
    assert_eq!(records[1].place_id.as_deref(), Some("place-1"));
    assert_eq!(records[2].website, "");
    assert_eq!(records[3].website, "http://kept.example");
    assert_eq!(records[3].place_id, None);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].stage, Stage::Resolve);
    assert_eq!(errors[0].name, "Denied Co");
}

#[test]
fn pipeline_resolves_first_when_enabled() {
    let resolver = Arc::new(
        FakeResolver::default()
            .with_place("+15550001", "place-1")
            .with_website("place-1", "http://delta.example"),
    );
    let web = Arc::new(FakeWeb::default().with_site("http://delta.example", FakeSite::up(200, 5000)));

    let config = RunConfig {
        resolve_first: true,
        ..RunConfig::default()
    };
    let pipeline = Pipeline::new(&config, qualifier(&resolver, &web));

    let mut record = listing("", "", "555-0001");
    record.business = "Delta Corp".into();
    let report = pipeline.run(vec![record]);

    assert_eq!(report.processed, 1);
    assert_eq!(names(&report.buckets.review), ["Delta Corp"]);
    assert_eq!(report.buckets.review[0].website, "http://delta.example");
}

#[test]
fn pipeline_skips_resolution_by_default() {
    let resolver = Arc::new(FakeResolver::default());
    let web = Arc::new(FakeWeb::default());
    let pipeline = Pipeline::new(&RunConfig::default(), qualifier(&resolver, &web));

    let report = pipeline.run(vec![listing("Acme Co", "", "555-1234")]);

    assert_eq!(resolver.query_count(), 0);
    assert_eq!(names(&report.buckets.empty), ["Acme Co"]);
}

#[test]
fn pipeline_keeps_the_later_duplicate() {
    let resolver = Arc::new(FakeResolver::default());
    let web = Arc::new(FakeWeb::default());
    let config = RunConfig {
        workers: 1,
        ..RunConfig::default()
    };
    let pipeline = Pipeline::new(&config, qualifier(&resolver, &web));

    let mut first = listing("Acme Co", "", "555-1234");
    first.city = "Shelbyville".into();
    let second = listing("Acme Co", "", "555-9876");

    let report = pipeline.run(vec![first, second]);

    assert_eq!(report.buckets.empty.len(), 1);
    assert_eq!(report.buckets.empty[0].phone, "555-9876");
    assert_eq!(report.buckets.empty[0].city, "Springfield");
}

#[test]
fn dedup_is_last_write_wins_by_name() {
    let mut a1 = listing("Acme", "", "1");
    a1.category = "Old".into();
    let b = listing("Beta", "", "2");
    let mut a2 = listing("Acme", "", "3");
    a2.category = "New".into();

    let out = dedup_by_name(vec![a1, b, a2]);

    assert_eq!(names(&out), ["Acme", "Beta"]);
    assert_eq!(out[0].category, "New");
    assert_eq!(out[0].phone, "3");
}

#[test]
fn pool_propagates_panics_when_every_worker_dies() {
    let (done_tx, done_rx) = mpsc::channel();

    thread::spawn(move || {
        let records: Vec<_> = (0..8)
            .map(|i| listing(&format!("Biz {i}"), "http://business.site", "555-0100"))
            .collect();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            Dispatcher::new(2).resolve_all(records, &ExplodingResolver)
        }));
        let _ = done_tx.send(outcome.is_err());
    });

    let panicked = done_rx
        .recv_timeout(Duration::from_secs(10))
        .expect("dispatcher hung after its workers panicked");
    assert!(panicked);
}
