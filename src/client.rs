//! The client facade: one instance per configured repository.

use std::sync::Arc;

use crate::config::{ClientConfig, ListArgs, RequestOptions};
use crate::error::Result;
use crate::harvest::ListCursor;
use crate::http::{HttpSend, Transport};
use crate::protocol;
use crate::types::{Identify, MetadataFormat, Record, RecordHeader, Set, Verb};

/// An OAI-PMH 2.0 client bound to one repository base URL.
///
/// The three one-shot verbs return their decoded results directly; the three
/// list verbs return a [`ListCursor`] that drives resumption-token pagination
/// one page at a time.
///
/// # Examples
/// ```no_run
/// # async fn run() -> oai_pmh_client::Result<()> {
/// use oai_pmh_client::{OaiPmhClient, RequestOptions};
///
/// let client = OaiPmhClient::new("https://www.tethys.at/oai")?;
/// let identify = client.identify(RequestOptions::default()).await?;
/// println!("harvesting from {}", identify.repository_name);
/// # Ok(())
/// # }
/// ```
pub struct OaiPmhClient {
    transport: Transport,
}

impl OaiPmhClient {
    /// Create a client with default configuration: GET requests, no timeout,
    /// no extra headers.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, ClientConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(base_url: &str, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(base_url, config, None)?,
        })
    }

    /// Create a client that sends requests through a custom executor instead
    /// of the built-in `reqwest` client. Requests are still built and decoded
    /// locally; only the send is delegated.
    pub fn with_send(
        base_url: &str,
        config: ClientConfig,
        send: Arc<dyn HttpSend>,
    ) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(base_url, config, Some(send))?,
        })
    }

    /// The normalized base URL requests go to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.transport.base_url().as_str()
    }

    /// Retrieve the repository's self-description.
    pub async fn identify(&self, options: RequestOptions) -> Result<Identify> {
        let xml = self
            .transport
            .fetch_text(&[("verb", "Identify")], &options)
            .await?;
        protocol::decode_identify(&xml)
    }

    /// Retrieve a single record in the given metadata format.
    pub async fn get_record(
        &self,
        identifier: &str,
        metadata_prefix: &str,
        options: RequestOptions,
    ) -> Result<Record> {
        let params = [
            ("verb", "GetRecord"),
            ("identifier", identifier),
            ("metadataPrefix", metadata_prefix),
        ];
        let xml = self.transport.fetch_text(&params, &options).await?;
        protocol::decode_get_record(&xml)
    }

    /// Retrieve the metadata formats the repository can disseminate, for one
    /// item when `identifier` is given, repository-wide otherwise.
    pub async fn list_metadata_formats(
        &self,
        identifier: Option<&str>,
        options: RequestOptions,
    ) -> Result<Vec<MetadataFormat>> {
        let mut params = vec![("verb", "ListMetadataFormats")];
        if let Some(identifier) = identifier {
            params.push(("identifier", identifier));
        }
        let xml = self.transport.fetch_text(&params, &options).await?;
        protocol::decode_list_metadata_formats(&xml)
    }

    /// Harvest record headers page by page.
    #[must_use]
    pub fn list_identifiers(
        &self,
        args: &ListArgs,
        options: RequestOptions,
    ) -> ListCursor<'_, RecordHeader> {
        ListCursor::new(
            &self.transport,
            Verb::ListIdentifiers,
            Some(args),
            options,
            protocol::decode_list_identifiers,
        )
    }

    /// Harvest full records page by page.
    ///
    /// # Examples
    /// ```no_run
    /// # async fn run() -> oai_pmh_client::Result<()> {
    /// use oai_pmh_client::{ListArgs, OaiPmhClient, RequestOptions};
    ///
    /// let client = OaiPmhClient::new("https://www.tethys.at/oai")?;
    /// let args = ListArgs::new("oai_dc").with_from("2024-01-01");
    /// let mut cursor = client.list_records(&args, RequestOptions::default());
    /// while let Some(page) = cursor.next_page().await? {
    ///     for record in page.records {
    ///         println!("{}", record.header.identifier);
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn list_records(&self, args: &ListArgs, options: RequestOptions) -> ListCursor<'_, Record> {
        ListCursor::new(
            &self.transport,
            Verb::ListRecords,
            Some(args),
            options,
            protocol::decode_list_records,
        )
    }

    /// Enumerate the repository's set hierarchy page by page.
    #[must_use]
    pub fn list_sets(&self, options: RequestOptions) -> ListCursor<'_, Set> {
        ListCursor::new(
            &self.transport,
            Verb::ListSets,
            None,
            options,
            protocol::decode_list_sets,
        )
    }
}
