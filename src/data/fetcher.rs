//! Page fetching
//!
//! The extraction core only needs something that turns a URL into a `Page`. The HTTP
//! fetcher keeps an optional on-disk HTML cache so pages can be re-parsed offline.

use crate::data::page::Page;
use crate::{FetchConfig, Result, ScrapeError};
use std::path::{Path, PathBuf};

/// Anything that can produce a page for a URL
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<Page>;
}

/// Blocking HTTP fetcher. Fetched reports are kept under `cache_dir`, keyed by URL,
/// so a batch can be re-scraped without hitting the site again.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    cache_dir: Option<PathBuf>,
    /// Serve cached reports only; a cache miss is a fetch failure
    offline: bool,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(HttpFetcher {
            client,
            cache_dir: config.cache_dir.as_ref().map(PathBuf::from),
            offline: config.offline,
        })
    }

    pub fn with_cache<P: AsRef<Path>>(mut self, cache_dir: P) -> Self {
        self.cache_dir = Some(cache_dir.as_ref().to_path_buf());
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    fn cache_file(&self, url: &str) -> Option<PathBuf> {
        Some(self.cache_dir.as_ref()?.join(cache_file_name(url)))
    }

    /// Previously fetched markup of `url`, if the cache has it
    fn cached(&self, url: &str) -> Option<String> {
        let file = self.cache_file(url).filter(|f| f.is_file())?;
        match std::fs::read_to_string(&file) {
            Ok(html) => {
                log::debug!("{}: served from {}", url, file.display());
                Some(html)
            }
            Err(e) => {
                log::warn!("{}: unreadable cache file {}: {}", url, file.display(), e);
                None
            }
        }
    }

    fn store(&self, url: &str, html: &str) -> Result<()> {
        let Some(file) = self.cache_file(url) else {
            return Ok(());
        };
        if let Some(dir) = file.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&file, html)?;
        log::debug!("{}: cached as {}", url, file.display());
        Ok(())
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Page> {
        if let Some(html) = self.cached(url) {
            return Ok(Page::new(url, html));
        }

        if self.offline {
            return Err(ScrapeError::Fetch {
                url: url.to_string(),
                message: "no cached copy (offline mode)".to_string(),
            });
        }

        log::debug!("Fetching {}", url);
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(ScrapeError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }
        let html = response.text()?;

        if let Err(e) = self.store(url, &html) {
            log::warn!("Failed to cache {}: {}", url, e);
        }

        Ok(Page::new(url, html))
    }
}

/// Reads pages from local files; the "URL" is the file path
#[derive(Debug, Default, Clone)]
pub struct FileFetcher;

impl PageFetcher for FileFetcher {
    fn fetch(&self, url: &str) -> Result<Page> {
        let path = url.strip_prefix("file://").unwrap_or(url);
        let html = std::fs::read_to_string(path).map_err(|e| ScrapeError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(Page::new(url, html))
    }
}

/// Safe cache file name for a URL
fn cache_file_name(url: &str) -> String {
    url.replace("https://", "")
        .replace("http://", "")
        .replace(['/', '?', ':'], "_")
        + ".html"
}

/// Join a possibly relative link onto the site base URL
pub fn absolute_url(base: &str, link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            link.trim_start_matches('/')
        )
    }
}
