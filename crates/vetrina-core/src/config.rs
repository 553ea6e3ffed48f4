// ── Runtime catalog configuration ──
//
// Describes *where* the catalog service lives and how to talk to it.
// Constructed by the embedding application and handed in; core never
// reads config files or the environment.

use std::time::Duration;

use url::Url;

/// Configuration for connecting to a catalog service.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Catalog root URL (e.g., `https://api.example.com/products`).
    pub base_url: Url,
    /// Request timeout.
    pub timeout: Duration,
}

impl CatalogConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
