//! Font registration for invoice rendering.
//!
//! `genpdf` needs a TrueType font with Cyrillic coverage before any text can be laid out. The
//! [`FontLoader`] owns that registration: it resolves the font file once, caches the resulting
//! [`FontHandle`] and hands it to the renderer on every subsequent request.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use genpdf::fonts::{FontData, FontFamily};
use log::{debug, info, warn};
use thiserror::Error;

/// Logical name the registered font is known by.
pub const FONT_NAME: &str = "ArialCyr";

const REGULAR_FONT_FILE: &str = "arial.ttf";
const BOLD_FONT_FILE: &str = "arialbd.ttf";
const DEFAULT_WINDOWS_ROOT: &str = "C:\\Windows";

/// Where the loader looks for the font file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FontSource {
    /// `%WINDIR%\Fonts\arial.ttf` on Windows; unavailable elsewhere.
    #[default]
    System,
    /// An explicit TrueType file used for every text style.
    File(PathBuf),
}

/// Reasons a font could not be registered.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("no default font location on this platform; pass an explicit font file")]
    UnsupportedPlatform,
    #[error("font file not found at {}", path.display())]
    Missing { path: PathBuf },
    #[error("failed to load font '{}' from {}", FONT_NAME, path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: genpdf::error::Error,
    },
}

/// A registered font family ready to be installed into a `genpdf` document.
#[derive(Clone, Debug)]
pub struct FontHandle {
    path: PathBuf,
    family: FontFamily<FontData>,
}

impl FontHandle {
    fn load(source: &FontSource) -> Result<Self, FontError> {
        let path = resolve_font_path(source)?;
        let regular = load_font_data(&path)?;

        let bold = match source {
            FontSource::System => load_optional_bold(&path).unwrap_or_else(|| regular.clone()),
            FontSource::File(_) => regular.clone(),
        };

        Ok(Self {
            family: FontFamily {
                regular: regular.clone(),
                bold: bold.clone(),
                italic: regular,
                bold_italic: bold,
            },
            path,
        })
    }

    /// Logical name of the font.
    pub fn name(&self) -> &'static str {
        FONT_NAME
    }

    /// Path of the regular face that was loaded.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a copy of the font family for a new document.
    pub fn family(&self) -> FontFamily<FontData> {
        self.family.clone()
    }
}

/// Owns the one-time font registration for a run.
#[derive(Debug, Default)]
pub struct FontLoader {
    source: FontSource,
    handle: Option<FontHandle>,
}

impl FontLoader {
    /// Creates a loader for the given source without touching the filesystem.
    pub fn new(source: FontSource) -> Self {
        Self {
            source,
            handle: None,
        }
    }

    /// Registers the font on first use and returns the cached handle afterwards.
    ///
    /// Failures are not cached, so a later call retries the lookup.
    pub fn register(&mut self) -> Result<&FontHandle, FontError> {
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => {
                let handle = FontHandle::load(&self.source)?;
                info!(
                    "Registered font '{}' from {}",
                    handle.name(),
                    handle.path().display()
                );
                handle
            }
        };
        Ok(self.handle.insert(handle))
    }

    /// Boolean form of [`FontLoader::register`]; logs the reason on failure.
    pub fn ensure_registered(&mut self) -> bool {
        match self.register() {
            Ok(_) => true,
            Err(err) => {
                warn!("Font '{}' unavailable: {}", FONT_NAME, err);
                false
            }
        }
    }

    /// The registered handle, if registration already succeeded.
    pub fn handle(&self) -> Option<&FontHandle> {
        self.handle.as_ref()
    }
}

/// Returns `<root>\Fonts` for the given Windows root, defaulting to `C:\Windows`.
pub fn system_font_directory(windows_root: Option<OsString>) -> PathBuf {
    let root = windows_root
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WINDOWS_ROOT));
    root.join("Fonts")
}

fn resolve_font_path(source: &FontSource) -> Result<PathBuf, FontError> {
    let path = match source {
        FontSource::File(path) => path.clone(),
        FontSource::System if cfg!(windows) => {
            system_font_directory(env::var_os("WINDIR")).join(REGULAR_FONT_FILE)
        }
        FontSource::System => return Err(FontError::UnsupportedPlatform),
    };

    if path.is_file() {
        Ok(path)
    } else {
        Err(FontError::Missing { path })
    }
}

fn load_font_data(path: &Path) -> Result<FontData, FontError> {
    FontData::load(path, None).map_err(|source| FontError::Load {
        path: path.to_path_buf(),
        source,
    })
}

fn load_optional_bold(regular: &Path) -> Option<FontData> {
    let path = regular.with_file_name(BOLD_FONT_FILE);
    if !path.is_file() {
        debug!("No bold face at {}; reusing regular", path.display());
        return None;
    }
    match load_font_data(&path) {
        Ok(data) => Some(data),
        Err(err) => {
            warn!("Ignoring bold face: {}", err);
            None
        }
    }
}
