//! # pdfium-loader
//!
//! Find a usable [PDFium](https://pdfium.googlesource.com/pdfium/) shared
//! library for `pdfium-render` and bind to it.
//!
//! ## Resolution order
//!
//! 1. An explicit path in [`LoaderOptions::library_path`].
//! 2. The `PDFIUM_LIB_PATH` environment variable.
//! 3. The per-version cache directory (see [`cache_dir`]).
//! 4. The system library search path (`libpdfium.so` / `.dylib` / `pdfium.dll`).
//! 5. A download of the platform archive from
//!    [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries),
//!    unpacked into the cache directory. Only when
//!    [`LoaderOptions::allow_download`] is set.
//!
//! ```rust,no_run
//! use pdfium_loader::{bind, LoaderOptions};
//!
//! let pdfium = bind(&LoaderOptions::default()).expect("PDFium unavailable");
//! ```
//!
//! ## Environment variables
//!
//! - `PDFIUM_LIB_PATH`: path to an existing pdfium library.
//! - `PDFIUM_LOADER_CACHE_DIR`: override the cache root.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pdfium_render::prelude::Pdfium;
use thiserror::Error;
use tracing::{debug, info, warn};

/// The pdfium-binaries release tag used for downloads.
pub const PDFIUM_VERSION: &str = "7690";

/// Environment variable naming an existing pdfium library.
pub const LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Environment variable overriding the cache root.
pub const CACHE_DIR_ENV: &str = "PDFIUM_LOADER_CACHE_DIR";

const RELEASE_URL: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

/// Serialises downloads so concurrent callers unpack the archive once.
static DOWNLOAD_LOCK: Mutex<()> = Mutex::new(());

/// Progress callback: `(bytes_downloaded, total_bytes)`.
pub type ProgressFn<'a> = &'a dyn Fn(u64, Option<u64>);

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("PDFium library not found at '{path}'")]
    Missing { path: PathBuf },

    #[error("PDFium library is not available locally and downloading is disabled (cache: '{cache}')")]
    NotAvailable { cache: PathBuf },

    #[error("Cache directory error: {0}")]
    CacheDir(#[source] std::io::Error),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Archive extraction failed: {0}")]
    Extract(String),

    #[error("Failed to bind PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },

    #[error("Failed to bind the system PDFium library: {0}")]
    BindSystem(String),
}

/// Where to look for the library and whether the network may be used.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Use exactly this library; no other location is tried.
    pub library_path: Option<PathBuf>,
    /// Cache root; defaults to `$PDFIUM_LOADER_CACHE_DIR` or the platform cache dir.
    pub cache_root: Option<PathBuf>,
    /// Download the library when no local copy is found. Default: true.
    pub allow_download: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            library_path: None,
            cache_root: None,
            allow_download: true,
        }
    }
}

impl LoaderOptions {
    pub fn library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = Some(path.into());
        self
    }

    pub fn cache_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cache_root = Some(root.into());
        self
    }

    pub fn allow_download(mut self, allow: bool) -> Self {
        self.allow_download = allow;
        self
    }
}

// ── Platform ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Mac,
    Linux,
    Windows,
}

/// A release asset for one OS/architecture pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    family: Family,
    /// Suffix in the asset name, e.g. `linux-x64` in `pdfium-linux-x64.tgz`.
    tag: &'static str,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Result<Self, LoaderError> {
        Self::for_target(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn for_target(os: &str, arch: &str) -> Result<Self, LoaderError> {
        let (family, tag) = match (os, arch) {
            ("macos", "aarch64") => (Family::Mac, "mac-arm64"),
            ("macos", "x86_64") => (Family::Mac, "mac-x64"),
            ("linux", "x86_64") => (Family::Linux, "linux-x64"),
            ("linux", "aarch64") => (Family::Linux, "linux-arm64"),
            ("windows", "x86_64") => (Family::Windows, "win-x64"),
            ("windows", "aarch64") => (Family::Windows, "win-arm64"),
            ("windows", "x86") => (Family::Windows, "win-x86"),
            _ => {
                return Err(LoaderError::UnsupportedPlatform {
                    os: os.to_string(),
                    arch: arch.to_string(),
                })
            }
        };
        Ok(Self { family, tag })
    }

    pub fn archive_name(&self) -> String {
        format!("pdfium-{}.tgz", self.tag)
    }

    /// File name of the shared library on disk.
    pub fn library_name(&self) -> &'static str {
        match self.family {
            Family::Mac => "libpdfium.dylib",
            Family::Linux => "libpdfium.so",
            Family::Windows => "pdfium.dll",
        }
    }

    /// Path of the shared library inside the release archive.
    pub fn archive_member(&self) -> String {
        match self.family {
            Family::Windows => format!("bin/{}", self.library_name()),
            _ => format!("lib/{}", self.library_name()),
        }
    }

    pub fn download_url(&self) -> String {
        format!(
            "{RELEASE_URL}/chromium%2F{PDFIUM_VERSION}/{}",
            self.archive_name()
        )
    }
}

// ── Locating ─────────────────────────────────────────────────────────────────

/// The per-version directory holding a downloaded library.
pub fn cache_dir(options: &LoaderOptions) -> PathBuf {
    let root = options
        .cache_root
        .clone()
        .or_else(|| std::env::var_os(CACHE_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| {
            dirs::cache_dir()
                .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
                .unwrap_or_else(std::env::temp_dir)
                .join("pdf2text")
        });
    root.join(format!("pdfium-{PDFIUM_VERSION}"))
}

/// Find a library on disk without touching the network or the system loader.
///
/// Returns `Ok(None)` when nothing is found. An explicit
/// [`LoaderOptions::library_path`] that does not exist is an error.
pub fn locate_library(options: &LoaderOptions) -> Result<Option<PathBuf>, LoaderError> {
    if let Some(path) = &options.library_path {
        if path.exists() {
            return Ok(Some(path.clone()));
        }
        return Err(LoaderError::Missing { path: path.clone() });
    }

    if let Some(env_path) = std::env::var_os(LIB_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(Some(path));
        }
        warn!("{LIB_PATH_ENV} points to '{}', which does not exist", path.display());
    }

    let cached = cache_dir(options).join(Platform::current()?.library_name());
    Ok(cached.exists().then_some(cached))
}

/// `true` when [`locate_library`] would succeed without a download.
pub fn is_cached(options: &LoaderOptions) -> bool {
    matches!(locate_library(options), Ok(Some(_)))
}

/// Where [`bind`] would load the library from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibrarySource {
    /// Explicit path, `PDFIUM_LIB_PATH` or the cache.
    Local(PathBuf),
    /// The system library search path.
    System,
    /// Nothing usable is installed; a download is needed.
    Download,
    /// Nothing usable is installed and downloading is disabled.
    Unavailable,
}

/// Walk the resolution order without binding or downloading anything.
pub fn library_source(options: &LoaderOptions) -> Result<LibrarySource, LoaderError> {
    source_with(options, || Pdfium::bind_to_system_library().is_ok())
}

fn source_with(
    options: &LoaderOptions,
    system_available: impl FnOnce() -> bool,
) -> Result<LibrarySource, LoaderError> {
    if let Some(path) = locate_library(options)? {
        return Ok(LibrarySource::Local(path));
    }
    if system_available() {
        return Ok(LibrarySource::System);
    }
    Ok(if options.allow_download {
        LibrarySource::Download
    } else {
        LibrarySource::Unavailable
    })
}

/// Return a library path, downloading into the cache when allowed.
pub fn ensure_library(
    options: &LoaderOptions,
    on_progress: Option<ProgressFn<'_>>,
) -> Result<PathBuf, LoaderError> {
    if let Some(path) = locate_library(options)? {
        return Ok(path);
    }

    let dir = cache_dir(options);
    if !options.allow_download {
        return Err(LoaderError::NotAvailable { cache: dir });
    }

    let _guard = DOWNLOAD_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let platform = Platform::current()?;
    let dest = dir.join(platform.library_name());
    // Another caller may have finished while we waited for the lock.
    if dest.exists() {
        return Ok(dest);
    }

    std::fs::create_dir_all(&dir).map_err(LoaderError::CacheDir)?;
    let url = platform.download_url();
    info!("Downloading PDFium {PDFIUM_VERSION} from {url}");
    let archive = download(&url, on_progress)?;
    unpack_member(&archive, &platform.archive_member(), &dest)?;
    info!("PDFium cached at {}", dest.display());
    Ok(dest)
}

// ── Binding ──────────────────────────────────────────────────────────────────

/// Bind to PDFium following the full resolution order.
pub fn bind(options: &LoaderOptions) -> Result<Pdfium, LoaderError> {
    if let Some(path) = locate_library(options)? {
        return bind_library(&path);
    }

    match bind_system_library() {
        Ok(pdfium) => Ok(pdfium),
        Err(system_err) if options.allow_download => {
            debug!("{system_err}; falling back to download");
            let path = ensure_library(options, None)?;
            bind_library(&path)
        }
        Err(system_err) => {
            debug!("{system_err}");
            Err(LoaderError::NotAvailable {
                cache: cache_dir(options),
            })
        }
    }
}

pub fn bind_library(path: &Path) -> Result<Pdfium, LoaderError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| LoaderError::Bind {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

pub fn bind_system_library() -> Result<Pdfium, LoaderError> {
    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| LoaderError::BindSystem(e.to_string()))
}

// ── Download & unpack ────────────────────────────────────────────────────────

fn download(url: &str, on_progress: Option<ProgressFn<'_>>) -> Result<Vec<u8>, LoaderError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pdfium-loader/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| LoaderError::Download(e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| LoaderError::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(LoaderError::Download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total = response.content_length();
    let mut archive = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut chunk = vec![0u8; 64 * 1024];
    loop {
        let n = match response.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(LoaderError::Download(format!("read error: {e}"))),
        };
        archive.extend_from_slice(&chunk[..n]);
        if let Some(report) = on_progress {
            report(archive.len() as u64, total);
        }
    }
    Ok(archive)
}

/// Write one member of a `.tgz` archive to `dest`.
///
/// The member is unpacked next to `dest` and renamed into place, so a
/// half-written library is never left under the final name.
pub fn unpack_member(archive: &[u8], member: &str, dest: &Path) -> Result<(), LoaderError> {
    use flate2::read::GzDecoder;
    use tar::Archive;

    let mut archive = Archive::new(GzDecoder::new(archive));
    let entries = archive
        .entries()
        .map_err(|e| LoaderError::Extract(e.to_string()))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| LoaderError::Extract(e.to_string()))?;
        let is_member = entry
            .path()
            .map(|p| p.to_string_lossy().trim_start_matches("./") == member)
            .map_err(|e| LoaderError::Extract(e.to_string()))?;
        if !is_member {
            continue;
        }

        let partial = dest.with_extension("partial");
        entry
            .unpack(&partial)
            .map_err(|e| LoaderError::Extract(format!("unpack {member}: {e}")))?;
        std::fs::rename(&partial, dest)
            .map_err(|e| LoaderError::Extract(format!("rename into cache: {e}")))?;
        return Ok(());
    }

    Err(LoaderError::Extract(format!("'{member}' not found in archive")))
}
