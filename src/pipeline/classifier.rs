use crate::config::RunConfig;
use crate::domain::{FlagReason, Verdict};
use crate::errors::Result;
use crate::probe::{
    ContentValidator, HttpPageFetcher, HttpProber, PageFetcher, Prober, StatusClass, Thinness,
};
use std::sync::Arc;

/// Decides Flagged or Review for a website that is known to be set.
///
/// One probe, then (for 2xx/3xx only) the two content checks. Nothing is
/// retried; every failure along the way is evidence of a bad site.
pub struct Classifier {
    prober: Arc<dyn Prober>,
    content: ContentValidator,
}

impl Classifier {
    pub fn new(prober: Arc<dyn Prober>, content: ContentValidator) -> Self {
        Self { prober, content }
    }

    /// Classifier backed by real HTTP clients.
    pub fn from_config(config: &RunConfig) -> Result<Self> {
        let prober = Arc::new(HttpProber::new(config.probe_timeout)?);
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(config.fetch_timeout)?);
        let content = ContentValidator::new(fetcher, config.thin_threshold)?;
        Ok(Self::new(prober, content))
    }

    pub fn classify(&self, website: &str) -> Verdict {
        let code = match self.prober.probe(website) {
            Ok(code) => code,
            Err(e) => return Verdict::Flagged(FlagReason::Unreachable(e.to_string())),
        };

        match StatusClass::of(code) {
            StatusClass::Success | StatusClass::Redirect => self.inspect_content(website),
            StatusClass::ClientError => Verdict::Flagged(FlagReason::ClientError(code)),
            _ => Verdict::Flagged(FlagReason::BadStatus(code)),
        }
    }

    fn inspect_content(&self, website: &str) -> Verdict {
        match self.content.thinness(website) {
            Thinness::Thin { chars } => return Verdict::Flagged(FlagReason::ThinContent { chars }),
            Thinness::CrawlError { errors } => {
                return Verdict::Flagged(FlagReason::CrawlError { errors })
            }
            Thinness::Substantive { .. } => {}
        }

        if self.content.has_legacy_plugin(website) {
            return Verdict::Flagged(FlagReason::LegacyPlugin);
        }

        Verdict::Review
    }
}
