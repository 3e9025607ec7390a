//! CLI administration tool for linkforge.
//!
//! Runs the same operations as the HTTP API directly against Redis, plus a
//! few diagnostics the API does not expose.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL (reuses the live code if there is one)
//! cargo run --bin admin -- shorten https://example.com/a
//!
//! # Resolve a code (counts as a visit)
//! cargo run --bin admin -- resolve dGk3Qx2
//!
//! # Most visited URLs
//! cargo run --bin admin -- top -n 10
//!
//! # Live code of a URL, without creating one
//! cargo run --bin admin -- lookup https://example.com/a
//!
//! # Add a URL to the ranking with zero visits
//! cargo run --bin admin -- register https://example.com/a
//!
//! # Decode a code and check its record
//! cargo run --bin admin -- inspect dGk3Qx2
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `REDIS_URL` (or `REDIS_HOST` and friends),
//! `LINK_TTL_SECONDS`, `STORE_TIMEOUT_MS`, `RANKING_KEY`, `BASE_URL`.

use linkforge::application::services::ResolutionService;
use linkforge::config;
use linkforge::error::ErrorKind;
use linkforge::infrastructure::store::RedisStore;
use linkforge::logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// CLI tool for managing linkforge.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log store traffic to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL
    Shorten {
        /// Absolute http(s) URL
        url: String,
    },

    /// Resolve a short code to its URL (counts a visit)
    Resolve { code: String },

    /// Show the most visited URLs
    Top {
        /// Number of entries
        #[arg(short, default_value_t = 3)]
        n: usize,
    },

    /// Show the live short code of a URL without creating one
    Lookup { url: String },

    /// Add a URL to the ranking with zero visits unless already ranked
    Register { url: String },

    /// Decode a short code and check whether its record is live
    Inspect { code: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.verbose {
        logging::init_tracing("debug", "text");
    }

    let config = config::load_from_env()?;

    let store = RedisStore::connect(&config.redis_url)
        .await
        .context("Failed to connect to Redis")?;
    let service = ResolutionService::new(Arc::new(store), config.service_settings())
        .context("Invalid service settings")?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    match cli.command {
        Commands::Shorten { url } => shorten(&service, &config.base_url, &url, &cancel).await?,
        Commands::Resolve { code } => resolve(&service, &code, &cancel).await?,
        Commands::Top { n } => top(&service, n, &cancel).await?,
        Commands::Lookup { url } => lookup(&service, &config.base_url, &url, &cancel).await?,
        Commands::Register { url } => register(&service, &url, &cancel).await?,
        Commands::Inspect { code } => inspect(&service, &code, &cancel).await?,
    }

    Ok(())
}

async fn shorten(
    service: &ResolutionService,
    base_url: &str,
    url: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    let code = service
        .shorten(url, cancel)
        .await
        .context("Failed to shorten URL")?;

    println!("{}", "✅ Short link ready".green().bold());
    println!("  Code:      {}", code.as_str().bright_yellow().bold());
    println!(
        "  Short URL: {}",
        format!("{}{}", base_url, code.as_str()).cyan()
    );
    Ok(())
}

async fn resolve(service: &ResolutionService, code: &str, cancel: &CancellationToken) -> Result<()> {
    match service.resolve(code, cancel).await {
        Ok(url) => {
            println!("{} → {}", code.bright_yellow(), url.as_str().cyan());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            println!("{}", format!("❌ No live link for '{}'", code).red());
            Ok(())
        }
        Err(e) => Err(e).context("Failed to resolve code"),
    }
}

async fn top(service: &ResolutionService, n: usize, cancel: &CancellationToken) -> Result<()> {
    let links = match service.top_links(n, cancel).await {
        Ok(links) => links,
        Err(e) if e.kind() == ErrorKind::Empty => {
            println!("{}", "No visits recorded yet".dimmed());
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to load ranking"),
    };

    println!("{}", "📊 Most visited links".bright_blue().bold());
    println!();
    for (rank, link) in links.iter().enumerate() {
        println!(
            "  {:>3}. {:>8}  {}",
            rank + 1,
            link.score.to_string().bright_white().bold(),
            link.url.cyan()
        );
    }
    Ok(())
}

async fn lookup(
    service: &ResolutionService,
    base_url: &str,
    url: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    let code = service
        .lookup(url, cancel)
        .await
        .context("Failed to look up URL")?;
    let score = service
        .score(url, cancel)
        .await
        .context("Failed to read visit count")?;

    match code {
        Some(code) => println!(
            "  Short URL: {}",
            format!("{}{}", base_url, code.as_str()).cyan()
        ),
        None => println!("  Short URL: {}", "none (expired or never shortened)".dimmed()),
    }
    match score {
        Some(visits) => println!("  Visits:    {}", visits.to_string().bright_white().bold()),
        None => println!("  Visits:    {}", "not ranked".dimmed()),
    }
    Ok(())
}

async fn register(service: &ResolutionService, url: &str, cancel: &CancellationToken) -> Result<()> {
    let added = service
        .register(url, cancel)
        .await
        .context("Failed to register URL")?;

    if added {
        println!("{} {}", "✅ Ranked with 0 visits:".green(), url.cyan());
    } else {
        println!("{} {}", "Already ranked:".yellow(), url.cyan());
    }
    Ok(())
}

async fn inspect(service: &ResolutionService, code: &str, cancel: &CancellationToken) -> Result<()> {
    let inspection = service
        .inspect(code, cancel)
        .await
        .context("Failed to inspect code")?;

    println!("{}", "🔍 Short code".bright_blue().bold());
    println!("  Code:       {}", code.bright_yellow());
    println!("  Identifier: {}", inspection.identifier);
    println!("  Key:        {}", inspection.short_key);
    println!(
        "  Record:     {}",
        if inspection.exists {
            "live".green()
        } else {
            "absent".red()
        }
    );
    Ok(())
}
