use crate::domain::logic::{is_placeholder_site, normalize_reviews};
use crate::domain::{EmptyReason, ListingRecord, Verdict};
use crate::errors::Result;
use crate::pipeline::Classifier;
use crate::resolver::{resolve_phone, PlaceResolver};
use std::sync::Arc;

/// Result of the website fallback step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// The record has a website worth probing.
    Ready,
    /// Nothing to probe; the record is done.
    Empty(EmptyReason),
}

/// Per-listing decision procedure: fallback resolution, then classification.
pub struct Qualifier {
    resolver: Arc<dyn PlaceResolver>,
    classifier: Classifier,
}

impl Qualifier {
    pub fn new(resolver: Arc<dyn PlaceResolver>, classifier: Classifier) -> Self {
        Self {
            resolver,
            classifier,
        }
    }

    pub fn resolver(&self) -> &dyn PlaceResolver {
        self.resolver.as_ref()
    }

    /// Routes one listing. `record` may come back with its reviews
    /// normalized and its website/place id replaced by a looked-up value.
    ///
    /// Only a failed places lookup is an error; network trouble with the
    /// site itself is a `Flagged` verdict.
    pub fn qualify(&self, record: &mut ListingRecord) -> Result<Verdict> {
        normalize_reviews(record);

        match self.resolve_fallback(record)? {
            Fallback::Empty(reason) => Ok(Verdict::Empty(reason)),
            Fallback::Ready => Ok(self.classifier.classify(&record.website)),
        }
    }

    /// Replaces a placeholder website with the one registered for the
    /// listing's phone number. A place without a site leaves the website blank.
    pub fn resolve_fallback(&self, record: &mut ListingRecord) -> Result<Fallback> {
        if record.website.trim().is_empty() {
            return Ok(Fallback::Empty(EmptyReason::NoWebsite));
        }

        if !is_placeholder_site(&record.website) {
            return Ok(Fallback::Ready);
        }

        let resolution = resolve_phone(self.resolver(), &record.phone)?;
        let Some(place_id) = resolution.place_id else {
            return Ok(Fallback::Empty(EmptyReason::NoPlaceForPhone));
        };
        record.place_id = Some(place_id);

        match resolution.website {
            Some(website) => {
                record.website = website;
                Ok(Fallback::Ready)
            }
            None => {
                record.website.clear();
                Ok(Fallback::Empty(EmptyReason::NoWebsiteForPlace))
            }
        }
    }
}
