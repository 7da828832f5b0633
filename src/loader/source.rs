//! Where a document comes from.

use std::fmt;
use std::path::PathBuf;

use reqwest::Url;

/// A local path or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// File on the local filesystem.
    Path(PathBuf),
    /// Document served over HTTP(S).
    Url(Url),
}

impl Source {
    /// Resolves a command-line argument.
    ///
    /// `http://` and `https://` arguments that parse as URLs are remote.
    /// `file://` URLs become local paths. Everything else is a path.
    #[must_use]
    pub fn parse(arg: &str) -> Self {
        let lowered = arg.to_ascii_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            if let Ok(url) = Url::parse(arg) {
                return Self::Url(url);
            }
        }
        if lowered.starts_with("file://") {
            if let Some(path) = Url::parse(arg).ok().and_then(|url| url.to_file_path().ok()) {
                return Self::Path(path);
            }
        }
        Self::Path(PathBuf::from(arg))
    }

    /// Returns `true` for remote sources.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}
