mod places;

pub use places::GooglePlacesClient;

use crate::domain::logic::phone_query;
use crate::errors::Result;

/// Looks up a place by a free-form query and a place's website.
/// Implementations must be safe to share between workers.
pub trait PlaceResolver: Send + Sync {
    /// Place id of the first candidate, or `None` when nothing matched.
    fn find_place_id(&self, query: &str) -> Result<Option<String>>;

    /// Website registered for the place, or `None` when it has none.
    fn website_for_place(&self, place_id: &str) -> Result<Option<String>>;
}

/// What a phone lookup produced. Only used for the record it was made for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub place_id: Option<String>,
    pub website: Option<String>,
}

/// Finds the place behind `phone`, then that place's website.
/// The website is only fetched when a place was found.
pub fn resolve_phone(resolver: &dyn PlaceResolver, phone: &str) -> Result<Resolution> {
    let Some(query) = phone_query(phone) else {
        return Ok(Resolution::default());
    };

    let Some(place_id) = resolver.find_place_id(&query)? else {
        return Ok(Resolution::default());
    };

    let website = resolver.website_for_place(&place_id)?;
    Ok(Resolution {
        place_id: Some(place_id),
        website,
    })
}
