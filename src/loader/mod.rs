//! Document loader
//!
//! Turns a path or URL into a linted [`Node`] tree:
//! 1. Read bytes from disk, or fetch them over HTTP(S)
//! 2. Bound the nesting depth of property lists
//! 3. Detect the format and parse
//! 4. Lint the tree's structure
//!
//! Rule checking is left to [`imagr_validator_core::Validator`].

pub mod lint;
pub mod parse;
pub mod source;

pub use parse::{DocumentFormat, detect_format, parse_document};
pub use source::Source;

use std::path::Path;
use std::time::Duration;

use imagr_validator_core::Node;

use crate::error::LoadError;

// ============================================================================
// Options
// ============================================================================

/// Options for the document loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Largest document accepted, in bytes.
    pub max_document_size: usize,

    /// Deepest nesting accepted by the lint step.
    pub max_depth: usize,

    /// Timeout for fetching a remote document.
    pub fetch_timeout: Duration,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_document_size: env_or("IMAGR_VALIDATOR_MAX_DOCUMENT_SIZE", 10 * 1024 * 1024),
            max_depth: env_or("IMAGR_VALIDATOR_MAX_DEPTH", 64),
            fetch_timeout: Duration::from_secs(env_or("IMAGR_VALIDATOR_FETCH_TIMEOUT_SECS", 30)),
        }
    }
}

// ============================================================================
// Loaded Document
// ============================================================================

/// A parsed and linted document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Where the document came from.
    pub source: Source,

    /// Format it was parsed from.
    pub format: DocumentFormat,

    /// Root of the tree.
    pub root: Node,
}

// ============================================================================
// Loader
// ============================================================================

/// Document loader.
#[derive(Debug)]
pub struct DocumentLoader {
    options: LoaderOptions,
    client: reqwest::Client,
}

impl DocumentLoader {
    /// Creates a loader with the given options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should never happen).
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        let client = reqwest::Client::builder()
            .timeout(options.fetch_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");
        Self { options, client }
    }

    /// Creates a loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Reads, parses and lints `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or cannot be read
    /// - The remote fetch fails, times out or returns a non-2xx status
    /// - The document exceeds the size limit
    /// - Parsing fails
    /// - Linting fails
    pub async fn load(&self, source: &Source) -> Result<Document, LoadError> {
        tracing::info!(source = %source, "loading document");

        let bytes = match source {
            Source::Path(path) => self.read_file(path)?,
            Source::Url(url) => self.fetch(url).await?,
        };
        self.load_bytes(source.clone(), &bytes)
    }

    /// Parses and lints an in-memory document.
    ///
    /// # Errors
    ///
    /// Returns a size, parse or lint error.
    pub fn load_bytes(&self, source: Source, bytes: &[u8]) -> Result<Document, LoadError> {
        self.check_size(&source, bytes.len())?;

        lint::prescan(bytes, self.options.max_depth).map_err(|message| LoadError::Lint {
            source_name: source.to_string(),
            message,
        })?;

        let (format, root) = parse_document(bytes).map_err(|message| LoadError::Parse {
            source_name: source.to_string(),
            message,
        })?;
        tracing::debug!(source = %source, %format, "parsed document");

        lint::lint(&root, self.options.max_depth).map_err(|message| LoadError::Lint {
            source_name: source.to_string(),
            message,
        })?;

        Ok(Document {
            source,
            format,
            root,
        })
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>, LoadError> {
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        self.check_size(&Source::Path(path.to_path_buf()), size)?;

        std::fs::read(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    async fn fetch(&self, url: &reqwest::Url) -> Result<Vec<u8>, LoadError> {
        tracing::debug!(%url, "fetching remote document");

        let transport = |e: reqwest::Error| {
            if e.is_timeout() {
                LoadError::Timeout {
                    url: url.to_string(),
                    seconds: self.options.fetch_timeout.as_secs(),
                }
            } else {
                LoadError::Fetch {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let source = Source::Url(url.clone());
        if let Some(length) = response.content_length() {
            let length = usize::try_from(length).unwrap_or(usize::MAX);
            self.check_size(&source, length)?;
        }

        // Chunked bodies carry no length up front; enforce the limit while
        // reading.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(transport)? {
            body.extend_from_slice(&chunk);
            self.check_size(&source, body.len())?;
        }
        tracing::debug!(%url, bytes = body.len(), "fetched remote document");
        Ok(body)
    }

    fn check_size(&self, source: &Source, size: usize) -> Result<(), LoadError> {
        let limit = self.options.max_document_size;
        if size > limit {
            return Err(LoadError::TooLarge {
                source_name: source.to_string(),
                size,
                limit,
            });
        }
        Ok(())
    }
}

/// Reads an environment variable, falling back to `default` when unset or
/// unparseable.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
