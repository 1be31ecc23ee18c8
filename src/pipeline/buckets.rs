use crate::domain::{Bucket, ListingRecord};
use std::collections::BTreeMap;

/// Classified listings, one vector per bucket. A record is pushed into
/// exactly one of them.
#[derive(Debug, Clone, Default)]
pub struct Buckets {
    pub flagged: Vec<ListingRecord>,
    pub empty: Vec<ListingRecord>,
    pub review: Vec<ListingRecord>,
}

impl Buckets {
    pub fn push(&mut self, bucket: Bucket, record: ListingRecord) {
        match bucket {
            Bucket::Flagged => self.flagged.push(record),
            Bucket::Empty => self.empty.push(record),
            Bucket::Review => self.review.push(record),
        }
    }

    pub fn get(&self, bucket: Bucket) -> &[ListingRecord] {
        match bucket {
            Bucket::Flagged => &self.flagged,
            Bucket::Empty => &self.empty,
            Bucket::Review => &self.review,
        }
    }

    pub fn len(&self) -> usize {
        self.flagged.len() + self.empty.len() + self.review.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collapses duplicates inside each bucket, see [`dedup_by_name`].
    pub fn deduplicated(self) -> Buckets {
        Buckets {
            flagged: dedup_by_name(self.flagged),
            empty: dedup_by_name(self.empty),
            review: dedup_by_name(self.review),
        }
    }
}

/// Keeps one record per display name. On a clash the later record wins
/// whole; nothing from the earlier one is merged in. Output is ordered
/// by name.
pub fn dedup_by_name(records: Vec<ListingRecord>) -> Vec<ListingRecord> {
    let mut by_name = BTreeMap::new();
    for record in records {
        by_name.insert(record.name.clone(), record);
    }
    by_name.into_values().collect()
}
