//! Error types for `imagr-validator`
//!
//! Loader failures, validation failures and the exit codes the CLI maps
//! them to.

use std::path::PathBuf;
use thiserror::Error;

use imagr_validator_core::RuleViolation;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `imagr-validator` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// The configuration is valid
    pub const SUCCESS: i32 = 0;

    /// The configuration violates a rule
    pub const INVALID: i32 = 1;

    /// The document could not be parsed or failed linting
    pub const PARSE_ERROR: i32 = 2;

    /// I/O error (file not found, unreadable, too large)
    pub const IO_ERROR: i32 = 3;

    /// Remote fetch failed (network, HTTP status, timeout)
    pub const FETCH_ERROR: i32 = 4;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `imagr-validator` operations.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The document could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The document loaded but violates a rule
    #[error("{violation}")]
    Invalid {
        /// Where the document came from
        source_name: String,
        /// The first violation found
        violation: RuleViolation,
        /// Total number of violations found (1 in fail-fast mode)
        count: usize,
    },

    /// I/O error writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ValidatorError {
    /// Returns the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Load(e) => e.exit_code(),
            Self::Invalid { .. } => ExitCode::INVALID,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Json(_) => ExitCode::PARSE_ERROR,
        }
    }

    /// Returns `true` if the command already printed this failure.
    ///
    /// Rule violations are printed by `validate` as they are found, so the
    /// binary must not repeat them.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }
}

// ============================================================================
// Loader Errors
// ============================================================================

/// Failures while turning a path or URL into a linted document tree.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Local file does not exist
    #[error("{path} does not exist")]
    NotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// Local file exists but could not be read
    #[error("could not read {path}: {source}")]
    Io {
        /// Path that was requested
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Document exceeds the configured size limit
    #[error("{source_name} is {size} bytes, larger than the {limit} byte limit")]
    TooLarge {
        /// Path or URL
        source_name: String,
        /// Actual size in bytes
        size: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// Network-level failure fetching a remote document
    #[error("could not fetch {url}: {message}")]
    Fetch {
        /// URL that was requested
        url: String,
        /// Transport error description
        message: String,
    },

    /// Remote server answered with a non-success status
    #[error("could not fetch {url}: server returned HTTP {status}")]
    HttpStatus {
        /// URL that was requested
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Remote fetch did not finish in time
    #[error("timed out fetching {url} after {seconds}s")]
    Timeout {
        /// URL that was requested
        url: String,
        /// Timeout that elapsed
        seconds: u64,
    },

    /// Bytes are not a well-formed document
    #[error("could not parse {source_name}: {message}")]
    Parse {
        /// Path or URL
        source_name: String,
        /// Parser error description
        message: String,
    },

    /// Document parsed but is not structurally usable
    #[error("{source_name} failed lint: {message}")]
    Lint {
        /// Path or URL
        source_name: String,
        /// What is wrong with the structure
        message: String,
    },
}

impl LoadError {
    /// Returns the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } | Self::Io { .. } | Self::TooLarge { .. } => ExitCode::IO_ERROR,
            Self::Fetch { .. } | Self::HttpStatus { .. } | Self::Timeout { .. } => {
                ExitCode::FETCH_ERROR
            }
            Self::Parse { .. } | Self::Lint { .. } => ExitCode::PARSE_ERROR,
        }
    }
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `imagr-validator` operations.
pub type Result<T> = std::result::Result<T, ValidatorError>;

// ============================================================================
// Tests
// ============================================================================
