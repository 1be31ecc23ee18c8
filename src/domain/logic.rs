// src/domain/logic.rs

use crate::domain::listing::ListingRecord;

/// Default landing domains handed out by site builders. A listing that
/// points at one of these has no real site of its own.
const PLACEHOLDER_SITES: [&str; 2] = ["http://godaddysites.com", "http://business.site"];

const COUNTRY_CODE: &str = "+1";

/// Exports write "no" (any case) when a listing has zero reviews.
pub fn normalize_reviews(record: &mut ListingRecord) {
    if record.reviews.eq_ignore_ascii_case("no") {
        record.reviews = "0".to_string();
    }
}

/// True when `website` is one of the generic site-builder placeholders.
/// Comparison ignores surrounding whitespace, case and a trailing slash.
pub fn is_placeholder_site(website: &str) -> bool {
    let site = website.trim().trim_end_matches('/').to_ascii_lowercase();
    PLACEHOLDER_SITES.contains(&site.as_str())
}

/// Turns a listed phone number into a lookup query: country code
/// followed by the digits only. Returns `None` when there are no digits
/// to look up.
pub fn phone_query(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    Some(format!("{COUNTRY_CODE}{digits}"))
}
