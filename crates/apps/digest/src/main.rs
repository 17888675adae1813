//! Digest - search Gmail and print the visible text of matching messages
//!
//! This is the main entry point for the digest command-line tool.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{error, info, warn};
use mailtext::gmail::api::GmailMessage;
use mailtext::{
    DigestSettings, GmailAuth, GmailClient, GmailCredentials, SearchCriteria, collect_digest,
    convert_message, decode_all,
};
use std::io::Write;
use std::path::{Path, PathBuf};

mod report;

#[derive(Parser)]
#[command(name = "digest")]
#[command(about = "Search Gmail and print the visible text of matching messages", long_about = None)]
struct Cli {
    /// Settings file (defaults to ~/.config/maildigest/settings.json)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the mailbox and print each matching message
    Search {
        #[command(flatten)]
        criteria: CriteriaArgs,

        /// Maximum number of messages to fetch (1-500)
        #[arg(long)]
        max_results: Option<u32>,

        /// Print extracted text without normalization
        #[arg(long)]
        raw: bool,
    },

    /// Decode a saved Gmail API message (format=full JSON)
    Decode {
        /// Path to the message JSON
        file: PathBuf,

        /// Print extracted text without normalization
        #[arg(long)]
        raw: bool,
    },

    /// Remove stored OAuth tokens
    Logout,
}

#[derive(Args)]
struct CriteriaArgs {
    /// Sender address or name
    #[arg(long = "from")]
    sender: Option<String>,

    /// Label name
    #[arg(long)]
    label: Option<String>,

    /// Subject text
    #[arg(long)]
    subject: Option<String>,

    /// Free-text search terms
    #[arg(long)]
    keywords: Option<String>,
}

impl From<CriteriaArgs> for SearchCriteria {
    fn from(args: CriteriaArgs) -> Self {
        SearchCriteria {
            sender: args.sender,
            label: args.label,
            subject: args.subject,
            keywords: args.keywords,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run(Cli::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Err(e) = config::init() {
        warn!("Failed to initialize config directory: {:#}", e);
    }

    let mut settings = load_settings(cli.settings.as_deref())?;

    match cli.cmd {
        Command::Search {
            criteria,
            max_results,
            raw,
        } => {
            if let Some(max) = max_results {
                settings.max_results = max;
            }
            if raw {
                settings.normalize = false;
            }
            search(criteria.into(), &settings)
        }
        Command::Decode { file, raw } => {
            if raw {
                settings.normalize = false;
            }
            decode_file(&file, &settings)
        }
        Command::Logout => {
            gmail_client(&settings)?.logout()?;
            info!("Stored tokens removed");
            Ok(())
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<DigestSettings> {
    match path {
        Some(path) => DigestSettings::from_file(path),
        None => DigestSettings::load(),
    }
}

fn gmail_client(settings: &DigestSettings) -> Result<GmailClient> {
    let creds = GmailCredentials::load().map_err(|e| {
        if let Some(path) = GmailCredentials::default_credentials_path() {
            warn!(
                "To configure Gmail access, either:\n\
                 1. Place your Google OAuth credentials at: {}\n\
                 2. Or set environment variables: GMAIL_CLIENT_ID and GMAIL_CLIENT_SECRET",
                path.display()
            );
        }
        e
    })?;
    let auth = GmailAuth::new(&creds, settings.scopes.clone())?;
    Ok(GmailClient::new(auth))
}

fn search(criteria: SearchCriteria, settings: &DigestSettings) -> Result<()> {
    let client = gmail_client(settings)?;
    let digest = collect_digest(&client, &criteria, settings)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::write_digest(&mut out, &digest)?;
    out.flush()?;
    Ok(())
}

fn decode_file(path: &Path, settings: &DigestSettings) -> Result<()> {
    let gmail_msg: GmailMessage = config::load_json_file(path)?;
    let message = convert_message(gmail_msg)
        .with_context(|| format!("Failed to read message from {}", path.display()))?;

    let entries = decode_all(std::slice::from_ref(&message), &settings.decode_options());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (i, entry) in entries.iter().enumerate() {
        report::write_entry(&mut out, i + 1, entry)?;
    }
    out.flush()?;
    Ok(())
}
