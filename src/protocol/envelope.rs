//! Unwrapping of the `<OAI-PMH>` response envelope.
//!
//! Every response carries the same top level: `responseDate`, the echoed
//! `request`, and then either the requested verb body or a list of `error`
//! entries. The error branch is checked first, so a repository-reported error
//! is always raised as such and never misread as a malformed verb body.

use roxmltree::Document;

use crate::error::{EchoedRequest, ErrorCode, ProtocolErrorEntry, ValidationFault};
use crate::types::Verb;
use crate::xml::{ElementRef, ElementScope};

/// How a decode attempt failed before producing a typed result.
#[derive(Debug)]
pub(crate) enum DecodeFailure {
    /// The document does not match the protocol structure.
    Fault(ValidationFault),
    /// The repository reported protocol errors instead of a verb body.
    Protocol {
        entries: Vec<ProtocolErrorEntry>,
        request: EchoedRequest,
        response_date: String,
    },
}

impl From<ValidationFault> for DecodeFailure {
    fn from(fault: ValidationFault) -> Self {
        Self::Fault(fault)
    }
}

/// Unwrap a parsed response down to the scope of the requested verb body.
///
/// Raises the protocol-error branch before touching the verb body, then
/// requires `responseDate` and `request` to be well-formed, exactly one body
/// element named after `verb`, and nothing else at envelope level.
pub(crate) fn decode_document<'a, 'input>(
    doc: &'a Document<'input>,
    verb: Verb,
) -> Result<ElementScope<'a, 'input>, DecodeFailure> {
    let root = ElementScope::decode_root(doc)?;
    let envelope = root.required("OAI-PMH")?.nested()?;

    let errors = envelope.indexed("error");
    if !errors.is_empty() {
        let mut entries = Vec::with_capacity(errors.len());
        for error in &errors {
            entries.push(error_entry(error)?);
        }
        return Err(DecodeFailure::Protocol {
            entries,
            request: echoed_request(&envelope)?,
            response_date: envelope.required_text("responseDate")?,
        });
    }

    // Decoded for well-formedness only; the values are echoes of what we sent.
    envelope.required_text("responseDate")?;
    envelope.required("request")?.text()?;

    let body = envelope.required(verb.as_str())?;
    for name in envelope.field_names() {
        if !matches!(name, "responseDate" | "request") && name != verb.as_str() {
            return Err(envelope
                .path()
                .child(name)
                .fault(format!("unexpected element `{name}`"))
                .into());
        }
    }

    Ok(body.nested()?)
}

fn error_entry(error: &ElementRef<'_, '_>) -> Result<ProtocolErrorEntry, ValidationFault> {
    let code_value = error.required_attr("code")?;
    let code = ErrorCode::from_code(code_value)
        .ok_or_else(|| error.path().fault(format!("unknown error code `{code_value}`")))?;
    let text = error.text()?;
    Ok(ProtocolErrorEntry {
        code,
        text: (!text.is_empty()).then_some(text),
    })
}

fn echoed_request(envelope: &ElementScope<'_, '_>) -> Result<EchoedRequest, ValidationFault> {
    let request = envelope.required("request")?;
    let own = |value: Option<&str>| value.map(str::to_string);
    Ok(EchoedRequest {
        base_url: request.text()?,
        verb: own(request.attr("verb")),
        identifier: own(request.attr("identifier")),
        metadata_prefix: own(request.attr("metadataPrefix")),
        from: own(request.attr("from")),
        until: own(request.attr("until")),
        set: own(request.attr("set")),
        resumption_token: own(request.attr("resumptionToken")),
    })
}
