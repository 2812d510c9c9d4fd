//! CLI administration tool for link-shortener.
//!
//! Provides commands for creating and inspecting short links, viewing
//! statistics, and performing database operations without requiring HTTP
//! API access.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- link create https://example.com/some/page
//!
//! # Show a link and its click count
//! cargo run --bin admin -- link show aZ3k9Q
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_USER`/`DB_PASSWORD`/`DB_NAME` (required)
//!
//! Links are created through the same [`LinkService`] as the HTTP API.
//! The cache is not touched: the CLI runs with a [`NullCache`].

use link_shortener::api::dto::shorten::ShortenRequest;
use link_shortener::application::services::LinkService;
use link_shortener::config::Config;
use link_shortener::domain::entities::ShortLink;
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::infrastructure::cache::NullCache;
use link_shortener::infrastructure::persistence::PgLinkRepository;
use link_shortener::server::connect_database;
use link_shortener::utils::code_generator::{RandomCodeGenerator, is_valid_code};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

/// CLI tool for managing link-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Create and inspect short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Shorten a URL (returns the existing code if already shortened)
    Create {
        /// Long URL to shorten; prompted for if omitted
        url: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show a link without counting a click
    Show {
        /// Short code
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let pool = connect_database(&config).await?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let repository: Arc<dyn LinkRepository> =
        Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(
        repository,
        Arc::new(NullCache::new()),
        Arc::new(RandomCodeGenerator::new()),
        None,
    );

    match action {
        LinkAction::Create { url, yes } => create_link(&service, url, yes).await?,
        LinkAction::Show { code } => show_link(&service, &code).await?,
    }

    Ok(())
}

/// Shortens a URL with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for the URL (or use provided)
/// 2. Validate it with the same rules as `POST /shorten`
/// 3. Confirm creation (unless `--yes` flag)
/// 4. Create or look up the link
async fn create_link(service: &LinkService, url: Option<String>, skip_confirm: bool) -> Result<()> {
    println!("{}", "Create Short Link".bright_blue().bold());
    println!();

    let long_url = match url {
        Some(u) => u,
        None => Input::new().with_prompt("Long URL").interact_text()?,
    };

    let request = ShortenRequest { long_url };
    if let Err(e) = request.validate() {
        anyhow::bail!("Invalid URL: {}", e);
    }

    println!("  URL: {}", request.long_url.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let link = service
        .create(&request.long_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("{}", "Link ready".green().bold());
    println!();
    print_link(&link);

    Ok(())
}

/// Prints a stored link. Reads the database only; the click count is unchanged.
async fn show_link(service: &LinkService, code: &str) -> Result<()> {
    if !is_valid_code(code) {
        anyhow::bail!("'{}' is not a valid short code", code);
    }

    let link = service
        .get_stats(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load link: {}", e))?;

    print_link(&link);

    Ok(())
}

fn print_link(link: &ShortLink) {
    println!("  Code:    {}", link.short_code.bright_yellow().bold());
    println!("  URL:     {}", link.long_url.cyan());
    println!(
        "  Clicks:  {}",
        link.click_count.to_string().bright_green().bold()
    );
    println!(
        "  Created: {}",
        link.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bright_black()
    );
    println!();
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of links
/// - Total number of clicks across all links
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM links")
            .fetch_one(pool)
            .await?;

    println!(
        "  Links:  {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks: {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
