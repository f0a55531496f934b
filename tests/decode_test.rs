//! Decoding tests over captured repository responses.
//!
//! The fixtures mirror the response shapes of a live OAI-PMH 2.0 endpoint,
//! including namespaced metadata payloads, deleted records, and both ways a
//! repository signals the end of a list (absent token and empty token).

use std::fs;
use std::path::Path;

use oai_pmh_client::{
    decode_get_record, decode_identify, decode_list_identifiers, decode_list_metadata_formats,
    decode_list_records, decode_list_sets, DeletedRecordSupport, ErrorCode, Granularity,
    OaiPmhError,
};

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

#[test]
fn test_identify_fixture() {
    let identify = decode_identify(&load_fixture("identify.xml")).expect("decode");

    assert_eq!(identify.repository_name, "Tethys Research Data Repository");
    assert_eq!(identify.base_url, "https://www.tethys.at/oai");
    assert_eq!(identify.protocol_version, "2.0");
    assert_eq!(identify.admin_email, "repository@geosphere.at");
    assert_eq!(identify.earliest_datestamp, "2019-07-23T09:16:09Z");
    assert_eq!(identify.deleted_record, DeletedRecordSupport::Persistent);
    assert_eq!(identify.granularity, Granularity::Seconds);
    assert_eq!(identify.compression, vec!["gzip", "deflate"]);

    assert_eq!(identify.descriptions.len(), 1, "one description block");
    assert!(
        identify.descriptions[0].contains("<scheme>oai</scheme>"),
        "description should carry the oai-identifier payload verbatim"
    );
}

#[test]
fn test_get_record_fixture() {
    let record = decode_get_record(&load_fixture("get_record.xml")).expect("decode");

    assert_eq!(record.header.identifier, "oai:tethys.at:10");
    assert_eq!(record.header.datestamp, "2021-03-12T08:41:13Z");
    assert_eq!(record.header.set_specs, vec!["data:geochemistry", "ddc:550"]);
    assert!(!record.header.deleted);

    let payload = record.metadata.expect("live record carries metadata");
    assert!(
        payload.trim().starts_with("<oai_dc:dc"),
        "payload should start at the metadata root element: {payload}"
    );
    assert!(payload.contains("Geochemical analyses of volcanic rocks"));
    assert!(payload.trim().ends_with("</oai_dc:dc>"));

    assert_eq!(record.about.len(), 1, "one about block");
    assert!(record.about[0].contains("originDescription"));
}

#[test]
fn test_list_records_first_page() {
    let page = decode_list_records(&load_fixture("list_records_page1.xml")).expect("decode");

    assert_eq!(page.records.len(), 2);
    assert_eq!(page.records[0].header.identifier, "oai:tethys.at:10");
    assert_eq!(page.records[1].header.identifier, "oai:tethys.at:11");
    assert!(page.records[1]
        .metadata
        .as_deref()
        .is_some_and(|m| m.contains("Groundwater levels")));
    assert_eq!(page.resumption_token.as_deref(), Some("offset/2/oai_dc"));
}

#[test]
fn test_list_records_final_page() {
    let page = decode_list_records(&load_fixture("list_records_page2.xml")).expect("decode");

    assert_eq!(page.records.len(), 1);
    assert!(page.records[0].header.deleted);
    assert_eq!(
        page.records[0].metadata, None,
        "deleted record has no metadata"
    );
    assert_eq!(
        page.resumption_token, None,
        "empty token element ends the list"
    );
}

#[test]
fn test_list_identifiers_fixture() {
    let page = decode_list_identifiers(&load_fixture("list_identifiers.xml")).expect("decode");

    assert_eq!(page.records.len(), 3);
    assert_eq!(page.records[0].identifier, "oai:tethys.at:10");
    assert_eq!(page.records[0].set_specs, vec!["data:geochemistry"]);
    assert!(!page.records[0].deleted);
    assert!(page.records[2].deleted);
    assert_eq!(page.resumption_token, None, "absent token ends the list");
}

#[test]
fn test_list_sets_fixture() {
    let page = decode_list_sets(&load_fixture("list_sets.xml")).expect("decode");

    assert_eq!(page.records.len(), 3);
    assert_eq!(page.records[0].set_spec, "data");
    assert_eq!(page.records[0].set_name, "Research datasets");
    assert_eq!(page.records[0].set_descriptions.len(), 1);
    assert!(page.records[0].set_descriptions[0].contains("All published research datasets"));

    assert_eq!(page.records[1].set_spec, "data:geochemistry");
    assert!(page.records[1].set_descriptions.is_empty());
    assert_eq!(page.resumption_token, None);
}

#[test]
fn test_list_metadata_formats_fixture() {
    let formats =
        decode_list_metadata_formats(&load_fixture("list_metadata_formats.xml")).expect("decode");

    assert_eq!(formats.len(), 2);
    assert_eq!(formats[0].metadata_prefix, "oai_dc");
    assert_eq!(
        formats[0].schema,
        "http://www.openarchives.org/OAI/2.0/oai_dc.xsd"
    );
    assert_eq!(formats[1].metadata_prefix, "oai_datacite");
    assert_eq!(
        formats[1].metadata_namespace,
        "http://schema.datacite.org/oai/oai-1.1/"
    );
}

#[test]
fn test_error_fixture_surfaces_protocol_error() {
    let result = decode_get_record(&load_fixture("error_id_does_not_exist.xml"));

    match result {
        Err(OaiPmhError::Protocol {
            entries,
            request,
            response_date,
        }) => {
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].code, ErrorCode::IdDoesNotExist);
            assert!(entries[0]
                .text
                .as_deref()
                .is_some_and(|t| t.contains("oai:tethys.at:9999")));
            assert_eq!(request.verb.as_deref(), Some("GetRecord"));
            assert_eq!(request.identifier.as_deref(), Some("oai:tethys.at:9999"));
            assert_eq!(response_date, "2024-05-01T12:00:50Z");
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[test]
fn test_fixture_for_wrong_verb_is_a_validation_fault() {
    // An Identify response fed to the ListSets decoder lacks the ListSets body
    let result = decode_list_sets(&load_fixture("identify.xml"));

    match result {
        Err(OaiPmhError::Validation { fault, .. }) => {
            assert_eq!(fault.path.as_str(), ".OAI-PMH.ListSets");
            assert!(fault.message.contains("found none"), "{}", fault.message);
        }
        other => panic!("expected validation fault, got {other:?}"),
    }
}

#[test]
fn test_decoding_same_bytes_twice_yields_equal_results() {
    let identify_xml = load_fixture("identify.xml");
    assert_eq!(
        decode_identify(&identify_xml).expect("decode"),
        decode_identify(&identify_xml).expect("decode"),
        "repeated decodes of one document must agree"
    );

    let records_xml = load_fixture("list_records_page1.xml");
    assert_eq!(
        decode_list_records(&records_xml).expect("decode"),
        decode_list_records(&records_xml).expect("decode")
    );
}

#[test]
fn test_decoding_same_malformed_bytes_twice_yields_equal_faults() {
    let xml = load_fixture("identify.xml");

    let (first, second) = match (decode_list_sets(&xml), decode_list_sets(&xml)) {
        (
            Err(OaiPmhError::Validation { fault: first, .. }),
            Err(OaiPmhError::Validation { fault: second, .. }),
        ) => (first, second),
        other => panic!("expected validation faults from both decodes, got {other:?}"),
    };

    assert_eq!(first, second, "repeated decodes must report the same fault");
    assert_eq!(first.path.as_str(), ".OAI-PMH.ListSets");
}
