//! Configuration types, constants and argument validation for the client.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;

use crate::error::{OaiPmhError, Result};

/// `Accept` value sent with every request unless overridden.
pub const DEFAULT_ACCEPT: &str = "application/xml";

/// User agent for all HTTP requests.
pub const USER_AGENT: &str = concat!("oai-pmh-client/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout used by the CLI, in seconds.
///
/// The library itself applies no timeout unless one is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of response-body characters shown in error messages.
///
/// The full body stays available on the error value itself.
pub const ERROR_BODY_SNIPPET_CHARS: usize = 250;

/// Day-granularity datestamp: YYYY-MM-DD.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Second-granularity datestamp: YYYY-MM-DDThh:mm:ssZ.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATETIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$").expect("valid regex"));

/// Validate a `from`/`until` argument against the two datestamp granularities
/// the protocol allows.
///
/// The library sends datestamps as opaque strings; this check exists so the
/// CLI can reject a malformed argument before any HTTP traffic happens.
///
/// # Arguments
/// * `value` - Datestamp string to validate
///
/// # Returns
/// * `Ok(())` if the value is a real date in either granularity
/// * `Err(OaiPmhError::InvalidDatestamp)` otherwise
///
/// # Examples
/// ```
/// use oai_pmh_client::config::validate_datestamp;
///
/// assert!(validate_datestamp("2024-05-01").is_ok());
/// assert!(validate_datestamp("2024-05-01T12:00:00Z").is_ok());
/// assert!(validate_datestamp("01-05-2024").is_err());
/// assert!(validate_datestamp("2024-02-30").is_err());
/// ```
pub fn validate_datestamp(value: &str) -> Result<()> {
    if DATE_PATTERN.is_match(value) {
        chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| OaiPmhError::InvalidDatestamp(value.to_string()))?;
        return Ok(());
    }
    if DATETIME_PATTERN.is_match(value) {
        chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%SZ")
            .map_err(|_| OaiPmhError::InvalidDatestamp(value.to_string()))?;
        return Ok(());
    }
    Err(OaiPmhError::InvalidDatestamp(value.to_string()))
}

/// Construction-time configuration for a client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Headers sent with every request, layered over the built-in defaults.
    pub headers: HeaderMap,

    /// Send verb parameters as a url-encoded POST body instead of the query
    /// string.
    pub use_post: bool,

    /// Per-request timeout. `None` means requests wait indefinitely.
    pub timeout: Option<Duration>,
}

/// Per-call overrides for a single operation.
///
/// Everything here layers on top of the client's configuration: headers
/// replace same-named constructor headers, `use_post` replaces the configured
/// mode when set, and the cancellation token aborts the call (or, for
/// cursors, ends the page sequence) when triggered.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Headers for this call only.
    pub headers: HeaderMap,

    /// Override the GET/POST mode for this call.
    pub use_post: Option<bool>,

    /// Cooperative cancellation for this call.
    pub cancel: Option<CancellationToken>,
}

/// Selection arguments for `ListRecords` and `ListIdentifiers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListArgs {
    /// Metadata format the records should be returned in.
    pub metadata_prefix: String,

    /// Lower datestamp bound (inclusive).
    pub from: Option<String>,

    /// Upper datestamp bound (inclusive).
    pub until: Option<String>,

    /// Restrict harvesting to one set.
    pub set: Option<String>,
}

impl ListArgs {
    /// Create arguments for a full harvest in the given format.
    #[must_use]
    pub fn new(metadata_prefix: impl Into<String>) -> Self {
        Self {
            metadata_prefix: metadata_prefix.into(),
            from: None,
            until: None,
            set: None,
        }
    }

    /// Restrict to records with a datestamp at or after `from`.
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Restrict to records with a datestamp at or before `until`.
    #[must_use]
    pub fn with_until(mut self, until: impl Into<String>) -> Self {
        self.until = Some(until.into());
        self
    }

    /// Restrict to records in the set named by `set`.
    #[must_use]
    pub fn with_set(mut self, set: impl Into<String>) -> Self {
        self.set = Some(set.into());
        self
    }
}
