//! The six verb-body decoders.
//!
//! Each one receives the scope of its already-unwrapped verb body and pulls
//! the protocol's fixed field set for that verb. Unknown extra elements inside
//! a verb body are ignored; repositories routinely extend these containers.

use crate::error::ValidationFault;
use crate::types::{
    DeletedRecordSupport, Granularity, Identify, ListPage, MetadataFormat, Record, RecordHeader,
    Set,
};
use crate::xml::{ElementRef, ElementScope};

pub(crate) fn identify(scope: &ElementScope<'_, '_>) -> Result<Identify, ValidationFault> {
    let deleted_record_value = scope.required_text("deletedRecord")?;
    let deleted_record = DeletedRecordSupport::from_value(&deleted_record_value).ok_or_else(|| {
        scope.path().child("deletedRecord").fault(format!(
            "invalid value `{deleted_record_value}`, expected one of `no`, `transient`, `persistent`"
        ))
    })?;

    let granularity_value = scope.required_text("granularity")?;
    let granularity = Granularity::from_value(&granularity_value).ok_or_else(|| {
        scope.path().child("granularity").fault(format!(
            "invalid value `{granularity_value}`, expected `YYYY-MM-DD` or `YYYY-MM-DDThh:mm:ssZ`"
        ))
    })?;

    Ok(Identify {
        repository_name: scope.required_text("repositoryName")?,
        base_url: scope.required_text("baseURL")?,
        protocol_version: scope.required_text("protocolVersion")?,
        earliest_datestamp: scope.required_text("earliestDatestamp")?,
        deleted_record,
        granularity,
        admin_email: scope.required_text("adminEmail")?,
        compression: scope.texts("compression")?,
        descriptions: opaque(scope.entries("description")),
    })
}

pub(crate) fn get_record(scope: &ElementScope<'_, '_>) -> Result<Record, ValidationFault> {
    record(&scope.required("record")?)
}

pub(crate) fn list_identifiers(
    scope: &ElementScope<'_, '_>,
) -> Result<ListPage<RecordHeader>, ValidationFault> {
    Ok(ListPage {
        records: scope
            .indexed("header")
            .iter()
            .map(header)
            .collect::<Result<_, _>>()?,
        resumption_token: resumption_token(scope)?,
    })
}

pub(crate) fn list_records(
    scope: &ElementScope<'_, '_>,
) -> Result<ListPage<Record>, ValidationFault> {
    Ok(ListPage {
        records: scope
            .indexed("record")
            .iter()
            .map(record)
            .collect::<Result<_, _>>()?,
        resumption_token: resumption_token(scope)?,
    })
}

pub(crate) fn list_sets(scope: &ElementScope<'_, '_>) -> Result<ListPage<Set>, ValidationFault> {
    Ok(ListPage {
        records: scope
            .indexed("set")
            .iter()
            .map(set)
            .collect::<Result<_, _>>()?,
        resumption_token: resumption_token(scope)?,
    })
}

pub(crate) fn list_metadata_formats(
    scope: &ElementScope<'_, '_>,
) -> Result<Vec<MetadataFormat>, ValidationFault> {
    scope
        .indexed("metadataFormat")
        .iter()
        .map(metadata_format)
        .collect()
}

/// Decode one `record`: header, metadata payload and `about` containers.
///
/// The metadata payload is required exactly when the header does not report
/// deletion; deleted records legitimately come without one.
fn record(element: &ElementRef<'_, '_>) -> Result<Record, ValidationFault> {
    let scope = element.nested()?;
    let header = header(&scope.required("header")?)?;
    let metadata = scope.optional("metadata")?.map(|m| m.inner_xml());
    if metadata.is_none() && !header.deleted {
        return Err(scope
            .path()
            .child("metadata")
            .fault("expected a metadata payload on a record not marked deleted"));
    }
    Ok(Record {
        header,
        metadata,
        about: opaque(scope.entries("about")),
    })
}

fn header(element: &ElementRef<'_, '_>) -> Result<RecordHeader, ValidationFault> {
    let deleted = match element.attr("status") {
        None => false,
        Some("deleted") => true,
        Some(other) => {
            return Err(element.path().fault(format!(
                "invalid `status` attribute value `{other}`, expected `deleted`"
            )))
        }
    };
    let scope = element.nested()?;
    Ok(RecordHeader {
        identifier: scope.required_text("identifier")?,
        datestamp: scope.required_text("datestamp")?,
        set_specs: scope.texts("setSpec")?,
        deleted,
    })
}

fn set(element: &ElementRef<'_, '_>) -> Result<Set, ValidationFault> {
    let scope = element.nested()?;
    Ok(Set {
        set_spec: scope.required_text("setSpec")?,
        set_name: scope.required_text("setName")?,
        set_descriptions: opaque(scope.entries("setDescription")),
    })
}

fn metadata_format(element: &ElementRef<'_, '_>) -> Result<MetadataFormat, ValidationFault> {
    let scope = element.nested()?;
    Ok(MetadataFormat {
        metadata_prefix: scope.required_text("metadataPrefix")?,
        schema: scope.required_text("schema")?,
        metadata_namespace: scope.required_text("metadataNamespace")?,
    })
}

/// An absent or empty `resumptionToken` both mean the list is complete.
fn resumption_token(scope: &ElementScope<'_, '_>) -> Result<Option<String>, ValidationFault> {
    Ok(scope
        .optional_text("resumptionToken")?
        .filter(|token| !token.is_empty()))
}

fn opaque(entries: Vec<ElementRef<'_, '_>>) -> Vec<String> {
    entries.iter().map(ElementRef::inner_xml).collect()
}
