// prober.rs
use crate::errors::{QualifierError, Result};
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::time::Duration;
use url::Url;

use super::USER_AGENT;

/// Header-only reachability check.
pub trait Prober: Send + Sync {
    /// Status code answered for `url`. Any transport failure is an error.
    fn probe(&self, url: &str) -> Result<u16>;
}

/// Status family, taken from the first digit of the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Informational,
    Success,
    Redirect,
    ClientError,
    ServerError,
    Unknown,
}

impl StatusClass {
    pub fn of(code: u16) -> Self {
        match code / 100 {
            1 => StatusClass::Informational,
            2 => StatusClass::Success,
            3 => StatusClass::Redirect,
            4 => StatusClass::ClientError,
            5 => StatusClass::ServerError,
            _ => StatusClass::Unknown,
        }
    }
}

/// Normalizes a listing website into something requestable: surrounding
/// whitespace is dropped and a bare host gets an `http://` scheme.
pub fn prepare_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(QualifierError::Network("empty url".into()));
    }

    let url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("http://{trimmed}"))
            .map_err(|e| QualifierError::Network(format!("bad url {trimmed:?}: {e}")))?,
        Err(e) => return Err(QualifierError::Network(format!("bad url {trimmed:?}: {e}"))),
    };

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(QualifierError::Network(format!(
            "unsupported scheme {other:?} in {trimmed:?}"
        ))),
    }
}

/// HEAD prober. Redirects are reported, not followed.
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|e| QualifierError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Prober for HttpProber {
    fn probe(&self, url: &str) -> Result<u16> {
        let url = prepare_url(url)?;
        let resp = self
            .client
            .head(url)
            .send()
            .map_err(|e| QualifierError::Network(e.to_string()))?;

        Ok(resp.status().as_u16())
    }
}
