//! External document fetching
//!
//! References may point at other documents. The resolver talks to the
//! outside world through [`DocumentFetcher`] so tests can substitute a
//! mock; [`StdFetcher`] is the default implementation handling `file://`
//! and `http(s)://` URLs.

use crate::loader;
use openapi_rst_common::{Result, SpecError};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Fetches and parses the document behind an absolute URL.
///
/// The URL is passed without its fragment; implementations return the
/// whole parsed document and the resolver applies the pointer.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentFetcher {
    fn fetch(&self, url: &Url) -> Result<Value>;
}

/// Default fetcher: local files and HTTP(S)
pub struct StdFetcher {
    client: reqwest::blocking::Client,
}

impl StdFetcher {
    /// Network timeout applied to every request
    const TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|e| {
                SpecError::ReferenceResolution(format!("failed to build HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }
}

impl DocumentFetcher for StdFetcher {
    fn fetch(&self, url: &Url) -> Result<Value> {
        match url.scheme() {
            "file" => {
                let path = url.to_file_path().map_err(|_| {
                    SpecError::ReferenceResolution(format!("invalid file URL {}", url))
                })?;
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    SpecError::ReferenceResolution(format!("failed to read {}: {}", url, e))
                })?;
                loader::parse_spec(&content, loader::detect_format(&path, &content))
            }
            "http" | "https" => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| {
                        SpecError::ReferenceResolution(format!("failed to fetch {}: {}", url, e))
                    })?;
                let content = response.text().map_err(|e| {
                    SpecError::ReferenceResolution(format!("failed to read body of {}: {}", url, e))
                })?;
                loader::parse_spec(&content, loader::sniff_format(&content))
            }
            scheme => Err(SpecError::ReferenceResolution(format!(
                "unsupported URL scheme {} in {}",
                scheme, url
            ))),
        }
    }
}
