// places.rs
use crate::errors::{QualifierError, Result};
use crate::resolver::PlaceResolver;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Places web service client (find-place + place-details endpoints).
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct FindPlaceResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    result: Option<DetailsResult>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    website: Option<String>,
}

impl GooglePlacesClient {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(QualifierError::Config("API_KEY is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| QualifierError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .map_err(|e| QualifierError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| QualifierError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(QualifierError::Places {
                status: status.to_string(),
                message: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| QualifierError::JsonParse(e.to_string()))
    }
}

/// `OK` and `ZERO_RESULTS` are answers; every other API status is a failure.
fn check_status(status: &str, message: Option<String>) -> Result<()> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(QualifierError::Places {
            status: other.to_string(),
            message: message.unwrap_or_default(),
        }),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl PlaceResolver for GooglePlacesClient {
    fn find_place_id(&self, query: &str) -> Result<Option<String>> {
        let resp: FindPlaceResponse = self.get_json(
            "findplacefromtext/json",
            &[
                ("input", query),
                ("inputtype", "phonenumber"),
                ("fields", "place_id"),
            ],
        )?;
        check_status(&resp.status, resp.error_message)?;

        let place_id = non_empty(resp.candidates.into_iter().next().and_then(|c| c.place_id));
        debug!(query, ?place_id, "find place");
        Ok(place_id)
    }

    fn website_for_place(&self, place_id: &str) -> Result<Option<String>> {
        let resp: DetailsResponse = self.get_json(
            "details/json",
            &[("place_id", place_id), ("fields", "website")],
        )?;

        // stale ids come back as NOT_FOUND, which just means no site
        if resp.status == "NOT_FOUND" {
            return Ok(None);
        }
        check_status(&resp.status, resp.error_message)?;

        Ok(non_empty(resp.result.and_then(|r| r.website)))
    }
}
