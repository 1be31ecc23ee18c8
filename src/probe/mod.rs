mod content;
mod prober;

pub use content::{ContentValidator, HttpPageFetcher, PageFetcher, PageStats, Thinness};
pub use prober::{HttpProber, Prober, StatusClass};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";
