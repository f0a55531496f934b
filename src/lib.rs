//! OAI-PMH 2.0 harvesting client.
//!
//! Speaks the six protocol verbs over HTTP, checks every response against
//! the protocol's structural rules, and exposes resumption-token pagination
//! as a pull-based cursor.
//!
//! # Example
//!
//! ```
//! use oai_pmh_client::config;
//!
//! assert!(config::validate_datestamp("2024-05-01").is_ok());
//! assert!(config::validate_datestamp("2024-05-01T12:30:00Z").is_ok());
//! assert!(config::validate_datestamp("May 1st, 2024").is_err());
//! ```
//!
//! # Architecture
//!
//! - `client` - [`OaiPmhClient`], the facade over the six verbs
//! - `harvest` - [`ListCursor`], pull pagination over resumption tokens
//! - `protocol` - Envelope and per-verb response decoding
//! - `xml` - Path-tracked navigation over parsed XML
//! - `http` - GET/POST transport with timeout and cancellation
//! - `types` - Protocol data carriers ([`Identify`], [`Record`], ...)
//! - `config` - Client configuration and datestamp validation
//! - `error` - Error and fault types
//! - `cli` - Command-line interface

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod harvest;
pub mod http;
pub mod protocol;
pub mod types;
pub mod xml;

pub use client::OaiPmhClient;
pub use config::{validate_datestamp, ClientConfig, ListArgs, RequestOptions};
pub use error::{
    EchoedRequest, ErrorCode, OaiPmhError, ProtocolErrorEntry, Result, ValidationFault,
};
pub use harvest::ListCursor;
pub use http::HttpSend;
pub use protocol::{
    decode_get_record, decode_identify, decode_list_identifiers, decode_list_metadata_formats,
    decode_list_records, decode_list_sets,
};
pub use types::{
    DeletedRecordSupport, Granularity, Identify, ListPage, MetadataFormat, Record, RecordHeader,
    Set, Verb,
};
pub use xml::NodePath;
