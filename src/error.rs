//! Error types for the OAI-PMH client.
//!
//! Repository-reported protocol errors, structural validation failures and
//! transport-level failures are kept as distinct variants so callers can react
//! to each without string matching.

use std::time::Duration;

use thiserror::Error;

use crate::config::ERROR_BODY_SNIPPET_CHARS;
use crate::xml::NodePath;

/// One of the eight error codes a repository may return in an `<error>` element.
///
/// The vocabulary is closed by the protocol; responses carrying any other code
/// fail validation instead of being passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    BadArgument,
    BadResumptionToken,
    BadVerb,
    CannotDisseminateFormat,
    IdDoesNotExist,
    NoRecordsMatch,
    NoMetadataFormats,
    NoSetHierarchy,
}

impl ErrorCode {
    /// Get the wire form of the code (e.g. `badResumptionToken`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadArgument => "badArgument",
            Self::BadResumptionToken => "badResumptionToken",
            Self::BadVerb => "badVerb",
            Self::CannotDisseminateFormat => "cannotDisseminateFormat",
            Self::IdDoesNotExist => "idDoesNotExist",
            Self::NoRecordsMatch => "noRecordsMatch",
            Self::NoMetadataFormats => "noMetadataFormats",
            Self::NoSetHierarchy => "noSetHierarchy",
        }
    }

    /// Parse the wire form of a code, `None` for anything outside the vocabulary.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "badArgument" => Some(Self::BadArgument),
            "badResumptionToken" => Some(Self::BadResumptionToken),
            "badVerb" => Some(Self::BadVerb),
            "cannotDisseminateFormat" => Some(Self::CannotDisseminateFormat),
            "idDoesNotExist" => Some(Self::IdDoesNotExist),
            "noRecordsMatch" => Some(Self::NoRecordsMatch),
            "noMetadataFormats" => Some(Self::NoMetadataFormats),
            "noSetHierarchy" => Some(Self::NoSetHierarchy),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `<error>` entry from an error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolErrorEntry {
    /// Protocol error code.
    pub code: ErrorCode,

    /// Human-readable description, when the repository provided one.
    pub text: Option<String>,
}

impl std::fmt::Display for ProtocolErrorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{}: {}", self.code, text),
            None => write!(f, "{}: (no description provided)", self.code),
        }
    }
}

/// The `<request>` element a repository echoes back in every response.
///
/// The element text is the repository's base URL; the attributes echo the
/// request arguments the repository understood.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EchoedRequest {
    /// Base URL from the element text.
    pub base_url: String,
    pub verb: Option<String>,
    pub identifier: Option<String>,
    pub metadata_prefix: Option<String>,
    pub from: Option<String>,
    pub until: Option<String>,
    pub set: Option<String>,
    pub resumption_token: Option<String>,
}

/// A structural mismatch at a specific location in a response document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct ValidationFault {
    /// Dotted path to the element where decoding gave up.
    pub path: NodePath,

    /// What was expected there.
    pub message: String,
}

impl ValidationFault {
    /// Create a fault at `path`.
    pub fn new(path: NodePath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

/// Main error type for the OAI-PMH client library.
#[derive(Debug, Error)]
pub enum OaiPmhError {
    /// The configured base URL could not be parsed.
    #[error("Invalid base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Invalid datestamp argument (CLI-level validation).
    #[error("Invalid datestamp '{0}'. Expected YYYY-MM-DD or YYYY-MM-DDThh:mm:ssZ")]
    InvalidDatestamp(String),

    /// The response body is not well-formed XML.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// The response is well-formed XML but does not match the OAI-PMH structure.
    ///
    /// `response` holds the complete raw body the validation ran against.
    #[error("Invalid OAI-PMH response: {fault}")]
    Validation {
        fault: ValidationFault,
        response: String,
    },

    /// The repository answered with one or more `<error>` entries.
    #[error("Repository returned OAI-PMH error(s): {}", entries.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Protocol {
        /// Every error entry, in document order.
        entries: Vec<ProtocolErrorEntry>,
        /// The echoed `<request>` element.
        request: EchoedRequest,
        /// The `<responseDate>` text.
        response_date: String,
    },

    /// The repository answered with a non-success HTTP status.
    ///
    /// `body` holds the complete response body; the display form shows a
    /// length-capped snippet of it.
    #[error("HTTP request to {url} failed with status {status}: {}", body_snippet(body))]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The configured per-request timeout elapsed before the response arrived.
    ///
    /// `method` is the effective method of the attempt, with any per-call
    /// POST override already applied.
    #[error("HTTP {method} request to {url} timed out after {timeout:?}")]
    Timeout {
        url: String,
        method: reqwest::Method,
        timeout: Duration,
    },

    /// The caller's cancellation token fired before the response arrived.
    #[error("HTTP request to {url} was cancelled")]
    Cancelled { url: String },

    /// The request could not be built or sent.
    #[error("HTTP request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// IO error (CLI output).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error (CLI output).
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, OaiPmhError>;

/// Cap a response body for display, keeping the full text out of log lines.
fn body_snippet(body: &str) -> String {
    match body.char_indices().nth(ERROR_BODY_SNIPPET_CHARS) {
        Some((idx, _)) => format!("{} ...", &body[..idx]),
        None => body.to_string(),
    }
}
