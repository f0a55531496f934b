//! Decoding of OAI-PMH response documents.
//!
//! Every response goes through the same pipeline: parse the XML, unwrap the
//! `<OAI-PMH>` envelope (repository-reported errors are raised before any verb
//! decoding), then decode the requested verb body into its typed result.
//!
//! The `decode_*` functions work on plain strings, so stored responses can be
//! decoded without going through the HTTP client.

mod envelope;
mod verbs;

use roxmltree::Document;

use crate::error::{OaiPmhError, Result, ValidationFault};
use crate::types::{Identify, ListPage, MetadataFormat, Record, RecordHeader, Set, Verb};
use crate::xml::ElementScope;
use envelope::{decode_document, DecodeFailure};

/// Decode an `Identify` response document.
pub fn decode_identify(xml: &str) -> Result<Identify> {
    decode(xml, Verb::Identify, verbs::identify)
}

/// Decode a `GetRecord` response document.
pub fn decode_get_record(xml: &str) -> Result<Record> {
    decode(xml, Verb::GetRecord, verbs::get_record)
}

/// Decode one page of a `ListIdentifiers` response document.
pub fn decode_list_identifiers(xml: &str) -> Result<ListPage<RecordHeader>> {
    decode(xml, Verb::ListIdentifiers, verbs::list_identifiers)
}

/// Decode one page of a `ListRecords` response document.
pub fn decode_list_records(xml: &str) -> Result<ListPage<Record>> {
    decode(xml, Verb::ListRecords, verbs::list_records)
}

/// Decode one page of a `ListSets` response document.
pub fn decode_list_sets(xml: &str) -> Result<ListPage<Set>> {
    decode(xml, Verb::ListSets, verbs::list_sets)
}

/// Decode a `ListMetadataFormats` response document.
///
/// This verb is the one list that never paginates, so the result is the plain
/// list of formats.
pub fn decode_list_metadata_formats(xml: &str) -> Result<Vec<MetadataFormat>> {
    decode(xml, Verb::ListMetadataFormats, verbs::list_metadata_formats)
}

/// Run one full decode: parse, unwrap the envelope, decode the verb body.
///
/// A validation fault escaping from anywhere below is wrapped here, exactly
/// once, with the complete response text attached.
fn decode<T>(
    xml: &str,
    verb: Verb,
    body: fn(&ElementScope<'_, '_>) -> std::result::Result<T, ValidationFault>,
) -> Result<T> {
    let doc = Document::parse(xml)?;
    let outcome = decode_document(&doc, verb)
        .and_then(|scope| body(&scope).map_err(DecodeFailure::Fault));
    match outcome {
        Ok(value) => Ok(value),
        Err(DecodeFailure::Fault(fault)) => Err(OaiPmhError::Validation {
            fault,
            response: xml.to_string(),
        }),
        Err(DecodeFailure::Protocol {
            entries,
            request,
            response_date,
        }) => Err(OaiPmhError::Protocol {
            entries,
            request,
            response_date,
        }),
    }
}
