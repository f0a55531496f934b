//! Command-line interface: one subcommand per protocol verb.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::client::OaiPmhClient;
use crate::config::{validate_datestamp, ClientConfig, ListArgs, RequestOptions, DEFAULT_TIMEOUT_SECS};
use crate::error::Result;
use crate::harvest::ListCursor;

/// OAI-PMH 2.0 client - Query and harvest metadata repositories.
#[derive(Parser)]
#[command(name = "oai-pmh")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the OAI-PMH endpoint (e.g. https://www.tethys.at/oai)
    pub base_url: String,

    /// Send requests as url-encoded POST instead of GET
    #[arg(long)]
    pub post: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the repository's self-description.
    Identify,

    /// Retrieve a single record as JSON.
    GetRecord {
        /// Item identifier (e.g. oai:example.org:123)
        identifier: String,

        /// Metadata format prefix
        #[arg(short, long, default_value = "oai_dc")]
        metadata_prefix: String,
    },

    /// List the metadata formats the repository can disseminate.
    ListMetadataFormats {
        /// Restrict to formats available for this item
        #[arg(short, long)]
        identifier: Option<String>,
    },

    /// Harvest record headers as JSON lines.
    ListIdentifiers {
        #[command(flatten)]
        selection: Selection,

        /// Write output to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Harvest full records as JSON lines.
    ListRecords {
        #[command(flatten)]
        selection: Selection,

        /// Write output to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Enumerate the repository's set hierarchy as JSON lines.
    ListSets {
        /// Write output to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Selective-harvesting arguments shared by the two record-list verbs.
#[derive(Args)]
pub struct Selection {
    /// Metadata format prefix
    #[arg(short, long, default_value = "oai_dc")]
    pub metadata_prefix: String,

    /// Only records with a datestamp at or after this (YYYY-MM-DD or YYYY-MM-DDThh:mm:ssZ)
    #[arg(long)]
    pub from: Option<String>,

    /// Only records with a datestamp at or before this
    #[arg(long)]
    pub until: Option<String>,

    /// Only records in this set
    #[arg(long)]
    pub set: Option<String>,
}

impl Selection {
    fn to_list_args(&self) -> ListArgs {
        let mut args = ListArgs::new(&self.metadata_prefix);
        args.from = self.from.clone();
        args.until = self.until.clone();
        args.set = self.set.clone();
        args
    }
}

/// Run the CLI.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Validate datestamp arguments before any HTTP traffic
    if let Commands::ListIdentifiers { selection, .. } | Commands::ListRecords { selection, .. } =
        &cli.command
    {
        if let Some(from) = &selection.from {
            validate_datestamp(from)?;
        }
        if let Some(until) = &selection.until {
            validate_datestamp(until)?;
        }
    }

    let config = ClientConfig {
        use_post: cli.post,
        timeout: Some(Duration::from_secs(cli.timeout)),
        ..ClientConfig::default()
    };
    let client = OaiPmhClient::with_config(&cli.base_url, config)?;

    // Ctrl-C ends harvests cleanly instead of killing the process mid-page
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    match &cli.command {
        Commands::Identify => identify_command(&client, &cancel).await,
        Commands::GetRecord {
            identifier,
            metadata_prefix,
        } => get_record_command(&client, identifier, metadata_prefix, &cancel).await,
        Commands::ListMetadataFormats { identifier } => {
            list_metadata_formats_command(&client, identifier.as_deref(), &cancel).await
        }
        Commands::ListIdentifiers { selection, out } => {
            let cursor =
                client.list_identifiers(&selection.to_list_args(), request_options(&cancel));
            harvest_command(cursor, out.as_deref(), "headers", &cancel).await
        }
        Commands::ListRecords { selection, out } => {
            let cursor = client.list_records(&selection.to_list_args(), request_options(&cancel));
            harvest_command(cursor, out.as_deref(), "records", &cancel).await
        }
        Commands::ListSets { out } => {
            let cursor = client.list_sets(request_options(&cancel));
            harvest_command(cursor, out.as_deref(), "sets", &cancel).await
        }
    }
}

fn request_options(cancel: &CancellationToken) -> RequestOptions {
    RequestOptions {
        cancel: Some(cancel.clone()),
        ..RequestOptions::default()
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn identify_command(client: &OaiPmhClient, cancel: &CancellationToken) -> Result<()> {
    let pb = spinner();
    pb.set_message("Contacting repository...");

    let identify = match client.identify(request_options(cancel)).await {
        Ok(identify) => identify,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    println!(
        "{} {}",
        style("Repository:").bold(),
        style(&identify.repository_name).cyan()
    );
    println!("  Base URL:           {}", identify.base_url);
    println!("  Protocol version:   {}", identify.protocol_version);
    println!("  Earliest datestamp: {}", identify.earliest_datestamp);
    println!("  Deleted records:    {}", identify.deleted_record.as_str());
    println!("  Granularity:        {}", identify.granularity.as_str());
    println!("  Admin email:        {}", identify.admin_email);
    if !identify.compression.is_empty() {
        println!("  Compression:        {}", identify.compression.join(", "));
    }
    Ok(())
}

async fn get_record_command(
    client: &OaiPmhClient,
    identifier: &str,
    metadata_prefix: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    let pb = spinner();
    pb.set_message(format!("Retrieving {identifier}..."));

    let record = match client
        .get_record(identifier, metadata_prefix, request_options(cancel))
        .await
    {
        Ok(record) => record,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

async fn list_metadata_formats_command(
    client: &OaiPmhClient,
    identifier: Option<&str>,
    cancel: &CancellationToken,
) -> Result<()> {
    let pb = spinner();
    pb.set_message("Listing metadata formats...");

    let formats = match client
        .list_metadata_formats(identifier, request_options(cancel))
        .await
    {
        Ok(formats) => formats,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    for format in &formats {
        println!(
            "{}  schema={}  namespace={}",
            style(&format.metadata_prefix).cyan(),
            format.schema,
            format.metadata_namespace
        );
    }
    println!();
    println!("{} {} format(s)", style("Found").green().bold(), formats.len());
    Ok(())
}

/// Drive a cursor to the end, writing every record as one JSON line.
async fn harvest_command<T: Serialize>(
    mut cursor: ListCursor<'_, T>,
    out: Option<&std::path::Path>,
    noun: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    // Create the output file before the first request so a bad path fails fast
    let mut writer = match out {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };

    let pb = spinner();
    pb.set_message(format!("Harvesting {noun}..."));

    let mut total = 0usize;
    let mut pages = 0usize;

    loop {
        let page = match cursor.next_page().await {
            Ok(Some(page)) => page,
            Ok(None) => break,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        pages += 1;
        total += page.records.len();
        pb.set_message(format!("Fetched {total} {noun} over {pages} page(s)..."));

        for record in &page.records {
            let line = serde_json::to_string(record)?;
            match &mut writer {
                Some(writer) => {
                    writer.write_all(line.as_bytes())?;
                    writer.write_all(b"\n")?;
                }
                None => println!("{line}"),
            }
        }
    }

    if let Some(writer) = &mut writer {
        writer.flush()?;
    }
    pb.finish_and_clear();

    if cancel.is_cancelled() {
        eprintln!(
            "{} kept {} {} from {} page(s)",
            style("Interrupted,").yellow().bold(),
            total,
            noun,
            pages
        );
    } else {
        println!(
            "{} {} {} in {} page(s)",
            style("Harvested").green().bold(),
            total,
            noun,
            pages
        );
    }
    Ok(())
}
