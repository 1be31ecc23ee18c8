// content.rs
use crate::errors::{QualifierError, Result};
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::prober::prepare_url;
use super::USER_AGENT;

/// Flash embeds inside page scripts: any character followed by `swf`,
/// which covers both `movie.swf` paths and `swfobject.embedSWF(...)` calls.
const LEGACY_PLUGIN_PATTERN: &str = r".swf";

/// Text volume of a crawled page and the number of fetch failures hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageStats {
    pub text_len: usize,
    pub crawl_errors: usize,
}

/// Page fetches backing the content heuristics. Each call is its own
/// round trip.
pub trait PageFetcher: Send + Sync {
    fn fetch_body_text_length(&self, url: &str) -> PageStats;

    /// Concatenated text of every `<script>`; empty when the page can't be fetched.
    fn fetch_script_text(&self, url: &str) -> String;
}

/// Character count of all text under every `<body>` element.
pub fn body_text_length(html: &str) -> Result<usize> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("body").map_err(|e| QualifierError::HtmlParse(e.to_string()))?;

    Ok(document
        .select(&selector)
        .flat_map(|body| body.text())
        .map(|t| t.chars().count())
        .sum())
}

/// Text content of every `<script>` element, in document order.
pub fn script_text(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("script").map_err(|e| QualifierError::HtmlParse(e.to_string()))?;

    Ok(document
        .select(&selector)
        .flat_map(|script| script.text())
        .collect())
}

pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| QualifierError::Network(e.to_string()))?;

        Ok(Self { client })
    }

    fn fetch_html(&self, url: &str) -> Result<String> {
        let url = prepare_url(url)?;
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| QualifierError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(QualifierError::Network(format!("HTTP {status}")));
        }

        resp.text()
            .map_err(|e| QualifierError::Network(e.to_string()))
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch_body_text_length(&self, url: &str) -> PageStats {
        match self.fetch_html(url).and_then(|html| body_text_length(&html)) {
            Ok(text_len) => PageStats {
                text_len,
                crawl_errors: 0,
            },
            Err(e) => {
                debug!(url, error = %e, "body crawl failed");
                PageStats {
                    text_len: 0,
                    crawl_errors: 1,
                }
            }
        }
    }

    fn fetch_script_text(&self, url: &str) -> String {
        match self.fetch_html(url).and_then(|html| script_text(&html)) {
            Ok(text) => text,
            Err(e) => {
                debug!(url, error = %e, "script crawl failed");
                String::new()
            }
        }
    }
}

/// Outcome of the thinness heuristic. `Thin` and `CrawlError` are
/// different causes that both count as thin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thinness {
    Substantive { chars: usize },
    Thin { chars: usize },
    CrawlError { errors: usize },
}

impl Thinness {
    pub fn is_thin(&self) -> bool {
        !matches!(self, Thinness::Substantive { .. })
    }
}

pub struct ContentValidator {
    fetcher: Arc<dyn PageFetcher>,
    thin_threshold: usize,
    plugin_pattern: Regex,
}

impl ContentValidator {
    pub fn new(fetcher: Arc<dyn PageFetcher>, thin_threshold: usize) -> Result<Self> {
        let plugin_pattern =
            Regex::new(LEGACY_PLUGIN_PATTERN).map_err(|e| QualifierError::Config(e.to_string()))?;

        Ok(Self {
            fetcher,
            thin_threshold,
            plugin_pattern,
        })
    }

    /// A page at or below the threshold is thin; so is one that failed to crawl.
    pub fn thinness(&self, url: &str) -> Thinness {
        let stats = self.fetcher.fetch_body_text_length(url);
        if stats.crawl_errors > 0 {
            Thinness::CrawlError {
                errors: stats.crawl_errors,
            }
        } else if stats.text_len <= self.thin_threshold {
            Thinness::Thin {
                chars: stats.text_len,
            }
        } else {
            Thinness::Substantive {
                chars: stats.text_len,
            }
        }
    }

    pub fn has_legacy_plugin(&self, url: &str) -> bool {
        let scripts = self.fetcher.fetch_script_text(url);
        self.plugin_pattern.is_match(&scripts)
    }
}
