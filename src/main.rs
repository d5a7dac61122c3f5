//! MOSS client - Entry Point
//!
//! Submits the named source files to a MOSS server and prints the report URL.

use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;
use std::process;

use moss_client::SessionClient;
use moss_client::config::ClientConfig;
use moss_client::error::SessionError;
use moss_client::error::handlers::{error_to_exit_code, handle_error};
use moss_client::utils::logging::setup_logging;

/// MOSS submission client
#[derive(Parser, Debug)]
#[command(name = "moss-client")]
#[command(version, about = "Submit source files to a MOSS similarity server")]
struct Args {
    /// Source files to submit, each under its own set id
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Base file excluded from comparison (repeatable)
    #[arg(short, long = "base")]
    base: Vec<PathBuf>,

    /// Language tag of the sources
    #[arg(short, long)]
    language: Option<String>,

    /// MOSS account identifier (overrides MOSS_USER_ID)
    #[arg(short, long)]
    user_id: Option<String>,

    /// Server address as host:port
    #[arg(short, long)]
    server: Option<String>,

    /// Comment attached to the report
    #[arg(short, long)]
    comment: Option<String>,

    /// Ignore passages that appear in more than this many files
    #[arg(short, long)]
    max_matches: Option<u32>,

    /// Number of matching pairs shown in the report
    #[arg(short = 'n', long)]
    show: Option<u32>,

    /// Directory mode flag
    #[arg(short, long)]
    directory: Option<u32>,

    /// Experimental mode flag
    #[arg(short = 'x', long)]
    experimental: Option<u32>,

    /// Configuration file (without extension is fine)
    #[arg(long)]
    config: Option<String>,
}

impl Args {
    /// CLI values take precedence over configuration values
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if let Some(user_id) = &self.user_id {
            config.user_id = user_id.clone();
        }
        if let Some(server) = &self.server {
            config.server_address = server.clone();
        }
        if let Some(comment) = &self.comment {
            config.options.comment = comment.clone();
        }
        if let Some(max) = self.max_matches {
            config.options.max_matches = max;
        }
        if let Some(show) = self.show {
            config.options.show_limit = show;
        }
        if let Some(directory) = self.directory {
            config.options.directory_mode = directory;
        }
        if let Some(experimental) = self.experimental {
            config.options.experimental = experimental;
        }
    }
}

#[tokio::main]
async fn main() {
    setup_logging();
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => ClientConfig::load_from(path, true),
        None => ClientConfig::load(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(2);
        }
    };
    args.apply(&mut config);
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        process::exit(2);
    }

    let mut session = match config.session() {
        Ok(session) => session,
        Err(e) => {
            handle_error(&e);
            process::exit(error_to_exit_code(&e));
        }
    };

    info!(
        "Submitting {} file(s) ({} base) to {}",
        args.files.len(),
        args.base.len(),
        session.server_address()
    );

    let outcome = submit(&mut session, &args).await;

    if session.stage().is_connected() {
        if let Err(e) = session.close().await {
            warn!("Failed to close session cleanly: {}", e);
        }
    }

    match outcome {
        Ok(url) => println!("{}", url),
        Err(e) => {
            handle_error(&e);
            process::exit(error_to_exit_code(&e));
        }
    }
}

async fn submit(session: &mut SessionClient, args: &Args) -> Result<url::Url, SessionError> {
    session.run().await?;
    for path in &args.base {
        session.upload_file(path, true).await?;
    }
    for path in &args.files {
        session.upload_file(path, false).await?;
    }
    session.send_query().await
}
