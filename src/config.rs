//! Configuration for a URL-to-text extraction.
//!
//! Every knob lives in [`ExtractionConfig`], built through
//! [`ExtractionConfigBuilder`]. The two ceilings (`max_download_bytes`,
//! `max_pages`) bound how much work a single hostile document can cause.

use crate::error::ConfigError;
use crate::pipeline::extract::DocumentParser;
use pdfium_loader::LoaderOptions;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default download ceiling: 50 MiB.
pub const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Default page ceiling.
pub const DEFAULT_MAX_PAGES: usize = 2000;

/// Configuration for [`crate::process::process_url`] and friends.
///
/// # Example
/// ```rust
/// use pdf2text::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .download_timeout_secs(10)
///     .max_pages(500)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_pages, 500);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Whole-request HTTP timeout in seconds. Default: 30.
    pub download_timeout_secs: u64,

    /// Largest response body accepted, in bytes. Default: 50 MiB.
    pub max_download_bytes: u64,

    /// Largest page count the Extractor will walk. Default: 2000.
    pub max_pages: usize,

    /// `User-Agent` sent with the download. Default: `pdf2text/<version>`.
    pub user_agent: String,

    /// Bind pdfium from this file instead of searching for it.
    pub pdfium_library_path: Option<PathBuf>,

    /// Cache root for a downloaded pdfium library.
    pub engine_cache_dir: Option<PathBuf>,

    /// Download pdfium when no local copy exists. Default: true.
    pub allow_engine_download: bool,

    /// Pre-built document parser. Takes precedence over pdfium.
    pub parser: Option<Arc<dyn DocumentParser + Send + Sync>>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            download_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
            max_pages: DEFAULT_MAX_PAGES,
            user_agent: concat!("pdf2text/", env!("CARGO_PKG_VERSION")).to_string(),
            pdfium_library_path: None,
            engine_cache_dir: None,
            allow_engine_download: true,
            parser: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("max_download_bytes", &self.max_download_bytes)
            .field("max_pages", &self.max_pages)
            .field("user_agent", &self.user_agent)
            .field("pdfium_library_path", &self.pdfium_library_path)
            .field("engine_cache_dir", &self.engine_cache_dir)
            .field("allow_engine_download", &self.allow_engine_download)
            .field("parser", &self.parser.as_ref().map(|_| "<dyn DocumentParser>"))
            .finish()
    }
}

impl ExtractionConfig {
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Options handed to `pdfium-loader` when no parser is injected.
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            library_path: self.pdfium_library_path.clone(),
            cache_root: self.engine_cache_dir.clone(),
            allow_download: self.allow_engine_download,
        }
    }
}

#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn max_download_bytes(mut self, bytes: u64) -> Self {
        self.config.max_download_bytes = bytes;
        self
    }

    pub fn max_pages(mut self, pages: usize) -> Self {
        self.config.max_pages = pages;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn pdfium_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library_path = Some(path.into());
        self
    }

    pub fn engine_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.engine_cache_dir = Some(dir.into());
        self
    }

    pub fn allow_engine_download(mut self, allow: bool) -> Self {
        self.config.allow_engine_download = allow;
        self
    }

    pub fn parser(mut self, parser: Arc<dyn DocumentParser + Send + Sync>) -> Self {
        self.config.parser = Some(parser);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ConfigError> {
        let c = &self.config;
        if c.download_timeout_secs == 0 {
            return Err(ConfigError("download timeout must be ≥ 1 second".into()));
        }
        if c.max_download_bytes == 0 {
            return Err(ConfigError("max download bytes must be ≥ 1".into()));
        }
        if c.max_pages == 0 {
            return Err(ConfigError("max pages must be ≥ 1".into()));
        }
        if c.user_agent.trim().is_empty() {
            return Err(ConfigError("user agent must not be empty".into()));
        }
        Ok(self.config)
    }
}
