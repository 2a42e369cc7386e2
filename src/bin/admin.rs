//! CLI administration tool for shortkey.
//!
//! Manages short keys directly against the database, without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- add https://www.debian.org/
//!
//! # Register or repoint an alias
//! cargo run --bin admin -- add-static https://www.debian.org/ debian
//! cargo run --bin admin -- update https://www.debian.org/News/ debian
//!
//! # Resolve a key, count records
//! cargo run --bin admin -- get debian
//! cargo run --bin admin -- count --static
//!
//! # Inspect the key encoding (no database needed)
//! cargo run --bin admin -- encode 37495029
//! cargo run --bin admin -- decode debian
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see `shortkey::config`). `DATABASE_URL` (or `DB_*`) is
//! required for every command except `encode` and `decode`. When Redis is
//! configured, writes refresh the shared cache.

use shortkey::application::services::{ServiceError, UrlService};
use shortkey::config::{self, Config};
use shortkey::domain::codec::KeyCodec;
use shortkey::domain::repositories::UrlRepository;
use shortkey::infrastructure::persistence::PgUrlRepository;
use shortkey::server::{build_cache, connect_database};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

type AdminService = UrlService<dyn UrlRepository>;

/// CLI tool for managing shortkey.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL under a generated key
    Add {
        url: String,
    },

    /// Shorten a URL under a chosen alias
    AddStatic {
        url: String,
        key: String,
    },

    /// Point an existing alias at a new URL
    Update {
        url: String,
        key: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Resolve a key
    Get {
        key: String,
    },

    /// Count records
    Count {
        /// Count static aliases instead of generated keys
        #[arg(long = "static")]
        is_static: bool,
    },

    /// Print the key for an identifier
    Encode {
        id: i64,
    },

    /// Print the identifier for a key
    Decode {
        key: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;
    let codec = KeyCodec::new(&config.key_alphabet).context("Invalid KEY_ALPHABET")?;

    match cli.command {
        Commands::Encode { id } => return encode(&codec, id),
        Commands::Decode { key } => return decode(&codec, &key),
        _ => {}
    }

    let pool = connect(&config).await?;

    if let Commands::Db { action } = cli.command {
        return handle_db_action(action, &pool).await;
    }

    let repository: Arc<dyn UrlRepository> = Arc::new(PgUrlRepository::new(Arc::new(pool)));
    let cache = build_cache(&config).await;
    let service = UrlService::new(repository, cache, Arc::new(codec), config.cache_ttl());
    let base_url = config.base_url.trim_end_matches('/');

    match cli.command {
        Commands::Add { url } => add(&service, base_url, &url).await,
        Commands::AddStatic { url, key } => add_static(&service, base_url, &url, &key).await,
        Commands::Update { url, key, yes } => update(&service, &url, &key, yes).await,
        Commands::Get { key } => get(&service, &key).await,
        Commands::Count { is_static } => count(&service, is_static).await,
        Commands::Encode { .. } | Commands::Decode { .. } | Commands::Db { .. } => Ok(()),
    }
}

async fn connect(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL (or DB_HOST, DB_USER, DB_PASSWORD, DB_NAME) must be set")?;

    connect_database(config, database_url).await
}

async fn add(service: &AdminService, base_url: &str, url: &str) -> Result<()> {
    let key = service.add_url(url).await?;

    println!("{}", "Short link created".green().bold());
    println!("  Key: {}", key.cyan());
    println!("  URL: {}/{}", base_url, key);
    Ok(())
}

/// Registers an alias; reports the generated key when the alias is unavailable.
async fn add_static(service: &AdminService, base_url: &str, url: &str, key: &str) -> Result<()> {
    match service.add_static_url(url, key).await {
        Ok(key) => {
            println!("{}", "Alias registered".green().bold());
            println!("  Key: {}", key.cyan());
            println!("  URL: {}/{}", base_url, key);
            Ok(())
        }
        Err(ServiceError::StaticAliasUnavailable {
            alternate_key: Some(alternate),
            ..
        }) => {
            println!(
                "{}",
                format!("Alias '{}' is not available", key).yellow().bold()
            );
            println!("  Generated key instead: {}", alternate.cyan());
            println!("  URL: {}/{}", base_url, alternate);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Repoints an alias after confirmation (default: No).
async fn update(service: &AdminService, url: &str, key: &str, skip_confirm: bool) -> Result<()> {
    let current = service.get_url(key).await?;

    println!("  Key:     {}", key.cyan());
    println!(
        "  Current: {}",
        current.as_deref().unwrap_or("(none)").bright_black()
    );
    println!("  New:     {}", url.bright_white());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Update this alias?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    service.update_static_url(url, key).await?;

    println!("{}", "Alias updated".green().bold());
    Ok(())
}

async fn get(service: &AdminService, key: &str) -> Result<()> {
    match service.get_url(key).await? {
        Some(url) => println!("{}", url),
        None => println!("{}", format!("No record for '{}'", key).yellow()),
    }
    Ok(())
}

async fn count(service: &AdminService, is_static: bool) -> Result<()> {
    let total = service.count(is_static).await?;
    let label = if is_static { "Static aliases" } else { "Generated keys" };

    println!("  {}: {}", label, total.to_string().bright_green().bold());
    Ok(())
}

fn encode(codec: &KeyCodec, id: i64) -> Result<()> {
    let key = codec.encode(id)?;
    println!("{}", key);
    Ok(())
}

fn decode(codec: &KeyCodec, key: &str) -> Result<()> {
    let id = codec.decode(key)?;
    println!("{}", id);
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
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Records:    {}", records.to_string().bright_white());
        }
    }

    Ok(())
}
