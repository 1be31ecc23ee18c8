pub mod listing;
pub mod logic;

pub use listing::{Bucket, EmptyReason, FlagReason, ListingRecord, Verdict};
