use serde::Deserialize;
use std::fmt;

/// One business row from a listings export.
///
/// `website` and `place_id` may be rewritten while resolving a missing
/// site; the contact fields are never touched after ingestion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ListingRecord {
    #[serde(rename = "Business")]
    pub business: String, // identity name
    #[serde(rename = "Name")]
    pub name: String, // display name, dedupe key
    #[serde(rename = "Email")]
    pub email: String,

    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Zip")]
    pub zip: String,

    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Phone")]
    pub phone: String,

    // "no" in exports means zero reviews
    #[serde(rename = "Reviews")]
    pub reviews: String,
    #[serde(rename = "Ratings")]
    pub rating: String,
    #[serde(rename = "Merchant Verified")]
    pub verified: String,
    #[serde(rename = "Category")]
    pub category: String,

    #[serde(rename = "Listing CID")]
    pub listing_cid: String,
    #[serde(rename = "PlaceID")]
    pub place_id: Option<String>,
}

impl ListingRecord {
    /// Street, city, state and zip joined by spaces and trimmed.
    pub fn full_address(&self) -> String {
        format!("{} {} {} {}", self.address, self.city, self.state, self.zip)
            .trim()
            .to_string()
    }

    /// The eight cells pushed to the sink for this record.
    pub fn sheet_row(&self) -> [String; 8] {
        [
            self.name.clone(),
            self.full_address(),
            self.website.clone(),
            self.phone.clone(),
            self.reviews.clone(),
            self.rating.clone(),
            self.verified.clone(),
            self.category.clone(),
        ]
    }
}

/// The three disjoint result buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Flagged,
    Empty,
    Review,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Flagged, Bucket::Empty, Bucket::Review];

    pub fn sheet_name(&self) -> &'static str {
        match self {
            Bucket::Flagged => "Flagged",
            Bucket::Empty => "Empty",
            Bucket::Review => "Review",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    NoWebsite,
    NoPlaceForPhone,
    NoWebsiteForPlace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagReason {
    Unreachable(String),
    ClientError(u16),
    BadStatus(u16),
    ThinContent { chars: usize },
    CrawlError { errors: usize },
    LegacyPlugin,
    ResolverFailed(String),
}

/// Classification of one listing, with the reason it landed where it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Empty(EmptyReason),
    Flagged(FlagReason),
    Review,
}

impl Verdict {
    pub fn bucket(&self) -> Bucket {
        match self {
            Verdict::Empty(_) => Bucket::Empty,
            Verdict::Flagged(_) => Bucket::Flagged,
            Verdict::Review => Bucket::Review,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Empty(EmptyReason::NoWebsite) => write!(f, "Empty: no website"),
            Verdict::Empty(EmptyReason::NoPlaceForPhone) => {
                write!(f, "Empty: no place found for phone")
            }
            Verdict::Empty(EmptyReason::NoWebsiteForPlace) => {
                write!(f, "Empty: place has no website")
            }
            Verdict::Flagged(FlagReason::Unreachable(msg)) => write!(f, "Flagged: unreachable ({msg})"),
            Verdict::Flagged(FlagReason::ClientError(code)) => write!(f, "Flagged: HTTP {code}"),
            Verdict::Flagged(FlagReason::BadStatus(code)) => write!(f, "Flagged: HTTP {code}"),
            Verdict::Flagged(FlagReason::ThinContent { chars }) => {
                write!(f, "Flagged: thin page ({chars} chars)")
            }
            Verdict::Flagged(FlagReason::CrawlError { errors }) => {
                write!(f, "Flagged: {errors} crawl error(s)")
            }
            Verdict::Flagged(FlagReason::LegacyPlugin) => write!(f, "Flagged: flash content"),
            Verdict::Flagged(FlagReason::ResolverFailed(msg)) => {
                write!(f, "Flagged: lookup failed ({msg})")
            }
            Verdict::Review => write!(f, "Review"),
        }
    }
}
