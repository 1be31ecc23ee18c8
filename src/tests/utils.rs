use crate::domain::ListingRecord;
use crate::errors::{QualifierError, Result};
use crate::pipeline::{Classifier, Qualifier};
use crate::probe::{ContentValidator, PageFetcher, PageStats, Prober};
use crate::resolver::PlaceResolver;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn listing(name: &str, website: &str, phone: &str) -> ListingRecord {
    ListingRecord {
        business: name.to_string(),
        name: name.to_string(),
        website: website.to_string(),
        phone: phone.to_string(),
        address: "1 Main St".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        zip: "62701".into(),
        reviews: "3".into(),
        rating: "4.5".into(),
        verified: "Yes".into(),
        category: "Plumber".into(),
        ..Default::default()
    }
}

/// Places lookups answered from fixed tables.
#[derive(Default)]
pub struct FakeResolver {
    places: HashMap<String, String>,
    websites: HashMap<String, String>,
    failing: Vec<String>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeResolver {
    pub fn with_place(mut self, query: &str, place_id: &str) -> Self {
        self.places.insert(query.to_string(), place_id.to_string());
        self
    }

    pub fn with_website(mut self, place_id: &str, website: &str) -> Self {
        self.websites.insert(place_id.to_string(), website.to_string());
        self
    }

    /// Lookups for `query` fail like a denied API key would.
    pub fn failing_for(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl PlaceResolver for FakeResolver {
    fn find_place_id(&self, query: &str) -> Result<Option<String>> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.failing.iter().any(|q| q == query) {
            return Err(QualifierError::Places {
                status: "REQUEST_DENIED".into(),
                message: "The provided API key is invalid.".into(),
            });
        }
        Ok(self.places.get(query).cloned())
    }

    fn website_for_place(&self, place_id: &str) -> Result<Option<String>> {
        Ok(self.websites.get(place_id).cloned())
    }
}

#[derive(Clone)]
pub struct FakeSite {
    pub probe: std::result::Result<u16, String>,
    pub text_len: usize,
    pub crawl_errors: usize,
    pub scripts: String,
}

impl FakeSite {
    pub fn up(status: u16, text_len: usize) -> Self {
        Self {
            probe: Ok(status),
            text_len,
            crawl_errors: 0,
            scripts: String::new(),
        }
    }

    pub fn down(reason: &str) -> Self {
        Self {
            probe: Err(reason.to_string()),
            text_len: 0,
            crawl_errors: 1,
            scripts: String::new(),
        }
    }
}

/// Prober and page fetcher over scripted sites. Unknown URLs refuse connections.
#[derive(Default)]
pub struct FakeWeb {
    sites: HashMap<String, FakeSite>,
    pub probes: AtomicUsize,
    pub fetches: AtomicUsize,
}

impl FakeWeb {
    pub fn with_site(mut self, url: &str, site: FakeSite) -> Self {
        self.sites.insert(url.to_string(), site);
        self
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Prober for FakeWeb {
    fn probe(&self, url: &str) -> Result<u16> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        match self.sites.get(url) {
            Some(site) => site.probe.clone().map_err(QualifierError::Network),
            None => Err(QualifierError::Network("connection refused".into())),
        }
    }
}

impl PageFetcher for FakeWeb {
    fn fetch_body_text_length(&self, url: &str) -> PageStats {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.sites.get(url) {
            Some(site) => PageStats {
                text_len: site.text_len,
                crawl_errors: site.crawl_errors,
            },
            None => PageStats {
                text_len: 0,
                crawl_errors: 1,
            },
        }
    }

    fn fetch_script_text(&self, url: &str) -> String {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.sites
            .get(url)
            .map(|site| site.scripts.clone())
            .unwrap_or_default()
    }
}

pub fn classifier(web: &Arc<FakeWeb>) -> Classifier {
    let fetcher: Arc<dyn PageFetcher> = web.clone();
    let content = ContentValidator::new(fetcher, 2000).unwrap();
    Classifier::new(web.clone(), content)
}

pub fn qualifier(resolver: &Arc<FakeResolver>, web: &Arc<FakeWeb>) -> Qualifier {
    Qualifier::new(resolver.clone(), classifier(web))
}
