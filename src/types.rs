//! Typed OAI-PMH response values.
//!
//! These types mirror the protocol's response shapes. Metadata payloads,
//! `about` containers and set/repository descriptions stay as verbatim XML
//! strings; nothing here interprets a metadata format.

use serde::{Deserialize, Serialize};

/// The six OAI-PMH protocol verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verb {
    Identify,
    GetRecord,
    ListIdentifiers,
    ListMetadataFormats,
    ListRecords,
    ListSets,
}

impl Verb {
    /// Get the wire value used in the `verb` request parameter.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identify => "Identify",
            Self::GetRecord => "GetRecord",
            Self::ListIdentifiers => "ListIdentifiers",
            Self::ListMetadataFormats => "ListMetadataFormats",
            Self::ListRecords => "ListRecords",
            Self::ListSets => "ListSets",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repository's level of support for deleted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeletedRecordSupport {
    /// Deleted records are not reported.
    #[serde(rename = "no")]
    No,

    /// Deletions are reported but not kept indefinitely.
    #[serde(rename = "transient")]
    Transient,

    /// Deletions are reported and kept forever.
    #[serde(rename = "persistent")]
    Persistent,
}

impl DeletedRecordSupport {
    /// Get the wire value as it appears in the `deletedRecord` element.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Transient => "transient",
            Self::Persistent => "persistent",
        }
    }

    /// Parse the `deletedRecord` element text. Returns `None` for values
    /// outside the protocol's vocabulary.
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "no" => Some(Self::No),
            "transient" => Some(Self::Transient),
            "persistent" => Some(Self::Persistent),
            _ => None,
        }
    }
}

/// The finest datestamp granularity a repository supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    /// Day precision.
    #[serde(rename = "YYYY-MM-DD")]
    Day,

    /// Second precision in UTC.
    #[serde(rename = "YYYY-MM-DDThh:mm:ssZ")]
    Seconds,
}

impl Granularity {
    /// Get the wire value as it appears in the `granularity` element.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "YYYY-MM-DD",
            Self::Seconds => "YYYY-MM-DDThh:mm:ssZ",
        }
    }

    /// Parse the `granularity` element text. Returns `None` for values
    /// outside the protocol's vocabulary.
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "YYYY-MM-DD" => Some(Self::Day),
            "YYYY-MM-DDThh:mm:ssZ" => Some(Self::Seconds),
            _ => None,
        }
    }
}

/// Repository self-description returned by the `Identify` verb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identify {
    /// Human-readable repository name.
    pub repository_name: String,

    /// The repository's own statement of its base URL.
    pub base_url: String,

    /// Protocol version, `2.0` for every repository this client speaks to.
    pub protocol_version: String,

    /// Lower bound on all datestamps in the repository.
    pub earliest_datestamp: String,

    /// How the repository handles deleted records.
    pub deleted_record: DeletedRecordSupport,

    /// Datestamp granularity supported in harvesting requests.
    pub granularity: Granularity,

    /// Administrator contact address.
    pub admin_email: String,

    /// Compression encodings the repository offers, if any.
    pub compression: Vec<String>,

    /// Repository description containers, passed through as raw XML.
    pub descriptions: Vec<String>,
}

/// The header part of a record: identity and harvesting control data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordHeader {
    /// Unique item identifier within the repository.
    pub identifier: String,

    /// Datestamp of creation, modification or deletion.
    pub datestamp: String,

    /// Sets this item belongs to.
    pub set_specs: Vec<String>,

    /// Whether the repository reports this record as deleted.
    pub deleted: bool,
}

/// A full record: header plus payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The record's header.
    pub header: RecordHeader,

    /// The metadata payload as raw XML. Absent only on deleted records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,

    /// Rights/provenance containers, passed through as raw XML.
    pub about: Vec<String>,
}

/// One entry of a repository's set hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Set {
    /// Colon-delimited set path.
    pub set_spec: String,

    /// Human-readable set name.
    pub set_name: String,

    /// Set description containers, passed through as raw XML.
    pub set_descriptions: Vec<String>,
}

/// A metadata format a repository can disseminate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFormat {
    /// Prefix used in `metadataPrefix` request arguments.
    pub metadata_prefix: String,

    /// URL of the format's XML schema.
    pub schema: String,

    /// Namespace URI of the format.
    pub metadata_namespace: String,
}

/// One page of a list-verb response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage<T> {
    /// Decoded entries, in document order.
    pub records: Vec<T>,

    /// Continuation token for the next page. `None` when the repository sent
    /// no token or an empty one, meaning the list is complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resumption_token: Option<String>,
}
