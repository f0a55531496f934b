//! Resumption-token pagination for the three list verbs.
//!
//! A [`ListCursor`] is a pull-based page sequence: every `next_page` call
//! issues at most one HTTP request, decodes one page, and remembers the
//! continuation state. The first request carries the caller's list arguments;
//! every continuation carries exactly `verb` and `resumptionToken`, nothing
//! else, as the protocol requires.

use crate::config::{ListArgs, RequestOptions};
use crate::error::{OaiPmhError, Result};
use crate::http::Transport;
use crate::types::{ListPage, Verb};

enum CursorState {
    /// No request issued yet; holds the initial parameter set.
    Start(Vec<(&'static str, String)>),
    /// A token came back; the next request is a continuation.
    Resume(String),
    /// Sequence finished: token exhausted, error raised, or cancelled.
    Done,
}

/// Pull-based cursor over the pages of one list-verb call.
///
/// The `&mut self` receiver makes the sequence strictly sequential: page N+1
/// can only be requested once page N has been fully read and decoded. After
/// the sequence ends (normally, by error, or by cancellation) every further
/// call returns `Ok(None)`.
pub struct ListCursor<'a, T> {
    transport: &'a Transport,
    verb: Verb,
    decode: fn(&str) -> Result<ListPage<T>>,
    options: RequestOptions,
    state: CursorState,
}

impl<'a, T> ListCursor<'a, T> {
    pub(crate) fn new(
        transport: &'a Transport,
        verb: Verb,
        args: Option<&ListArgs>,
        options: RequestOptions,
        decode: fn(&str) -> Result<ListPage<T>>,
    ) -> Self {
        Self {
            transport,
            verb,
            decode,
            options,
            state: CursorState::Start(initial_params(verb, args)),
        }
    }

    /// Fetch and decode the next page, or `None` when the sequence is over.
    ///
    /// A decode, protocol or transport failure ends the sequence and is
    /// returned once. Cancellation through the token in the request options
    /// ends the sequence silently, without a page and without an error.
    pub async fn next_page(&mut self) -> Result<Option<ListPage<T>>> {
        let params: Vec<(&'static str, String)> = match &self.state {
            CursorState::Start(initial) => initial.clone(),
            CursorState::Resume(token) => vec![
                ("verb", self.verb.as_str().to_string()),
                ("resumptionToken", token.clone()),
            ],
            CursorState::Done => return Ok(None),
        };
        let params: Vec<(&str, &str)> = params
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect();

        let xml = match self.transport.fetch_text(&params, &self.options).await {
            Ok(xml) => xml,
            Err(OaiPmhError::Cancelled { .. }) => {
                tracing::debug!(verb = %self.verb, "Harvest cancelled, ending page sequence");
                self.state = CursorState::Done;
                return Ok(None);
            }
            Err(error) => {
                self.state = CursorState::Done;
                return Err(error);
            }
        };

        match (self.decode)(&xml) {
            Ok(page) => {
                tracing::debug!(
                    verb = %self.verb,
                    records = page.records.len(),
                    has_more = page.resumption_token.is_some(),
                    "Decoded page"
                );
                self.state = match &page.resumption_token {
                    Some(token) => CursorState::Resume(token.clone()),
                    None => CursorState::Done,
                };
                Ok(Some(page))
            }
            Err(error) => {
                self.state = CursorState::Done;
                Err(error)
            }
        }
    }
}

fn initial_params(verb: Verb, args: Option<&ListArgs>) -> Vec<(&'static str, String)> {
    let mut params = vec![("verb", verb.as_str().to_string())];
    if let Some(args) = args {
        params.push(("metadataPrefix", args.metadata_prefix.clone()));
        if let Some(from) = &args.from {
            params.push(("from", from.clone()));
        }
        if let Some(until) = &args.until {
            params.push(("until", until.clone()));
        }
        if let Some(set) = &args.set {
            params.push(("set", set.clone()));
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_params_full_selection() {
        let args = ListArgs::new("oai_dc")
            .with_from("2024-01-01")
            .with_until("2024-12-31")
            .with_set("music");
        assert_eq!(
            initial_params(Verb::ListRecords, Some(&args)),
            vec![
                ("verb", "ListRecords".to_string()),
                ("metadataPrefix", "oai_dc".to_string()),
                ("from", "2024-01-01".to_string()),
                ("until", "2024-12-31".to_string()),
                ("set", "music".to_string()),
            ]
        );
    }

    #[test]
    fn test_initial_params_prefix_only() {
        let args = ListArgs::new("marcxml");
        assert_eq!(
            initial_params(Verb::ListIdentifiers, Some(&args)),
            vec![
                ("verb", "ListIdentifiers".to_string()),
                ("metadataPrefix", "marcxml".to_string()),
            ]
        );
    }

    #[test]
    fn test_initial_params_without_args() {
        assert_eq!(
            initial_params(Verb::ListSets, None),
            vec![("verb", "ListSets".to_string())]
        );
    }
}
