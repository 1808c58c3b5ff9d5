//! # pdfium-loader
//!
//! Find a usable [PDFium](https://pdfium.googlesource.com/pdfium/) shared
//! library and bind `pdfium-render` to it.
//!
//! ## Lookup order
//!
//! [`bind_pdfium`] tries, first match wins:
//!
//! 1. [`LoadOptions::library_path`] — an explicit file chosen by the caller.
//! 2. `PDFIUM_LIB_PATH` — an explicit file chosen through the environment.
//! 3. The per-version cache directory (see [`pdfium_cache_dir`]).
//! 4. The system library search path.
//! 5. When [`LoadOptions::allow_download`] is set, the platform archive from
//!    [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries)
//!    is downloaded, the library extracted into the cache directory, and bound.
//!
//! Steps 1–3 only consider paths that exist on disk.
//!
//! ```rust,no_run
//! use pdfium_loader::{bind_pdfium, LoadOptions};
//!
//! let pdfium = bind_pdfium(&LoadOptions::default()).expect("PDFium unavailable");
//! ```
//!
//! ## Environment variables
//!
//! - `PDFIUM_LIB_PATH` — path to an existing pdfium library.
//! - `PDFIUM_LOADER_CACHE_DIR` — override the base cache directory.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use pdfium_render::prelude::Pdfium;
use thiserror::Error;
use tracing::{debug, info, warn};

// ── Public constants ─────────────────────────────────────────────────────────

/// The pdfium-binaries release tag used for downloads.
pub const PDFIUM_VERSION: &str = "7690";

/// Environment variable naming an explicit library file.
pub const LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Environment variable overriding the base cache directory.
pub const CACHE_DIR_ENV: &str = "PDFIUM_LOADER_CACHE_DIR";

const BASE_URL: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

/// Name of the application directory inside the user cache directory.
const CACHE_APP_DIR: &str = "resume2json";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned while locating or binding PDFium.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The current OS/architecture combination has no published binary.
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// No library was found and downloading is disabled.
    #[error(
        "PDFium library not found (checked explicit path, {LIB_PATH_ENV}, cache at '{cache_dir}', \
         and the system library path) and downloading is disabled"
    )]
    NotFound { cache_dir: PathBuf },

    /// Could not create the cache directory.
    #[error("Cache directory error: {0}")]
    CacheDir(#[source] std::io::Error),

    /// Network download failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// gzip/tar extraction failed.
    #[error("Archive extraction failed: {0}")]
    Extract(String),

    /// `pdfium-render` could not load the library.
    #[error("Failed to bind PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },
}

/// How [`bind_pdfium`] should look for the library.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Explicit library file; checked before anything else.
    pub library_path: Option<PathBuf>,
    /// Download into the cache when nothing else is found. Default: true.
    pub allow_download: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            library_path: None,
            allow_download: true,
        }
    }
}

// ── Platform metadata ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlatformInfo {
    /// Asset filename in the GitHub release.
    archive_name: &'static str,
    /// Path of the library inside the archive.
    lib_path_in_archive: &'static str,
    /// Filename written to the cache directory.
    lib_name: &'static str,
}

fn platform_for(os: &str, arch: &str) -> Result<PlatformInfo, LoaderError> {
    const SO: (&str, &str) = ("lib/libpdfium.so", "libpdfium.so");
    const DYLIB: (&str, &str) = ("lib/libpdfium.dylib", "libpdfium.dylib");
    const DLL: (&str, &str) = ("bin/pdfium.dll", "pdfium.dll");

    let (archive_name, (lib_path_in_archive, lib_name)) = match (os, arch) {
        ("macos", "aarch64") => ("pdfium-mac-arm64.tgz", DYLIB),
        ("macos", "x86_64") => ("pdfium-mac-x64.tgz", DYLIB),
        ("linux", "x86_64") => ("pdfium-linux-x64.tgz", SO),
        ("linux", "aarch64") => ("pdfium-linux-arm64.tgz", SO),
        ("windows", "x86_64") => ("pdfium-win-x64.tgz", DLL),
        ("windows", "aarch64") => ("pdfium-win-arm64.tgz", DLL),
        ("windows", "x86") => ("pdfium-win-x86.tgz", DLL),
        (os, arch) => {
            return Err(LoaderError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            })
        }
    };

    Ok(PlatformInfo {
        archive_name,
        lib_path_in_archive,
        lib_name,
    })
}

fn detect_platform() -> Result<PlatformInfo, LoaderError> {
    platform_for(std::env::consts::OS, std::env::consts::ARCH)
}

// ── Cache directory ──────────────────────────────────────────────────────────

/// Per-version cache directory for the PDFium library.
///
/// `{user cache dir}/resume2json/pdfium-{VERSION}/`, or
/// `{PDFIUM_LOADER_CACHE_DIR}/pdfium-{VERSION}/` when the variable is set.
pub fn pdfium_cache_dir() -> PathBuf {
    cache_dir_from(std::env::var_os(CACHE_DIR_ENV))
}

fn cache_dir_from(override_dir: Option<OsString>) -> PathBuf {
    let versioned = format!("pdfium-{PDFIUM_VERSION}");
    if let Some(dir) = override_dir.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir).join(versioned);
    }

    let base = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir);

    base.join(CACHE_APP_DIR).join(versioned)
}

static DOWNLOADED_PATH: OnceLock<PathBuf> = OnceLock::new();

// ── Public API ───────────────────────────────────────────────────────────────

/// Returns the first existing library file among the explicit path,
/// `PDFIUM_LIB_PATH` and the cache directory. The system search path is not
/// consulted here.
pub fn locate_library(explicit: Option<&Path>) -> Option<PathBuf> {
    let env_path = std::env::var_os(LIB_PATH_ENV).map(PathBuf::from);
    let cached = detect_platform()
        .ok()
        .map(|info| pdfium_cache_dir().join(info.lib_name));
    first_existing([explicit.map(Path::to_path_buf), env_path, cached])
}

fn first_existing<const N: usize>(candidates: [Option<PathBuf>; N]) -> Option<PathBuf> {
    candidates.into_iter().flatten().find(|p| p.is_file())
}

/// Binds to PDFium following the lookup order in the crate docs.
///
/// Blocking: may perform a network download. Call from a blocking context.
pub fn bind_pdfium(options: &LoadOptions) -> Result<Pdfium, LoaderError> {
    if let Some(path) = locate_library(options.library_path.as_deref()) {
        debug!("Binding PDFium from {}", path.display());
        return bind_pdfium_from_path(&path);
    }

    if let Some(ref explicit) = options.library_path {
        warn!(
            "PDFium library '{}' does not exist; falling back",
            explicit.display()
        );
    }

    match Pdfium::bind_to_system_library() {
        Ok(bindings) => {
            debug!("Bound PDFium from the system library path");
            return Ok(Pdfium::new(bindings));
        }
        Err(e) => debug!("System PDFium unavailable: {e:?}"),
    }

    if !options.allow_download {
        return Err(LoaderError::NotFound {
            cache_dir: pdfium_cache_dir(),
        });
    }

    let path = download_library()?;
    bind_pdfium_from_path(&path)
}

/// Binds to a PDFium library at an explicit `path`.
pub fn bind_pdfium_from_path(path: &Path) -> Result<Pdfium, LoaderError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| LoaderError::Bind {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Downloads the platform library into the cache directory (once per
/// process) and returns its path.
pub fn download_library() -> Result<PathBuf, LoaderError> {
    if let Some(path) = DOWNLOADED_PATH.get() {
        return Ok(path.clone());
    }

    let info = detect_platform()?;
    let cache_dir = pdfium_cache_dir();
    let lib_path = cache_dir.join(info.lib_name);

    if !lib_path.is_file() {
        let url = format!(
            "{}/chromium%2F{}/{}",
            BASE_URL, PDFIUM_VERSION, info.archive_name
        );
        info!("Downloading PDFium {} from {}", PDFIUM_VERSION, url);

        std::fs::create_dir_all(&cache_dir).map_err(LoaderError::CacheDir)?;
        let archive = download_bytes(&url)?;
        extract_library(&archive, info.lib_path_in_archive, &lib_path)?;
        info!("PDFium cached at {}", lib_path.display());
    }

    let _ = DOWNLOADED_PATH.set(lib_path.clone());
    Ok(lib_path)
}

// ── Internal helpers ─────────────────────────────────────────────────────────

fn download_bytes(url: &str) -> Result<Vec<u8>, LoaderError> {
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

    let mut buf = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
    response
        .read_to_end(&mut buf)
        .map_err(|e| LoaderError::Download(format!("Read error: {e}")))?;
    debug!("Downloaded {} bytes", buf.len());
    Ok(buf)
}

/// Extracts the single entry `lib_path_in_archive` of a gzipped tarball.
fn extract_library(
    archive_bytes: &[u8],
    lib_path_in_archive: &str,
    dest_path: &Path,
) -> Result<(), LoaderError> {
    use flate2::read::GzDecoder;
    use tar::Archive;

    let mut archive = Archive::new(GzDecoder::new(archive_bytes));
    let entries = archive
        .entries()
        .map_err(|e| LoaderError::Extract(e.to_string()))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| LoaderError::Extract(e.to_string()))?;
        let matches = entry
            .path()
            .map_err(|e| LoaderError::Extract(e.to_string()))?
            .to_string_lossy()
            .trim_start_matches("./")
            == lib_path_in_archive;

        if matches {
            entry
                .unpack(dest_path)
                .map_err(|e| LoaderError::Extract(format!("Unpack failed: {e}")))?;
            return Ok(());
        }
    }

    Err(LoaderError::Extract(format!(
        "Library '{lib_path_in_archive}' not found in archive"
    )))
}
