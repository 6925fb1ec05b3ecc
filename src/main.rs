//! Command-line interface for shortlink.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! shortlink migrate
//!
//! # Shorten a URL, optionally with an alias and an expiration
//! shortlink shorten https://example.com/page --alias spring-sale --expire-date 2026-12-31
//!
//! # Look up a short code or alias
//! shortlink resolve bN
//!
//! # Encode / decode without a database
//! shortlink encode 1
//! shortlink decode bN
//! ```
//!
//! # Environment Variables
//!
//! See [`shortlink::config`]. `DATABASE_URL` is only needed by
//! `migrate`, `shorten` and `resolve`. With `BASE_URL` set, `shorten` also
//! prints the full short URL.

use shortlink::application::services::LinkService;
use shortlink::config::{self, Config};
use shortlink::domain::clock::SystemClock;
use shortlink::domain::entities::LinkSubmission;
use shortlink::error::AppError;
use shortlink::infrastructure::persistence::{PgSessionRepository, PgShortLinkRepository};
use shortlink::telemetry;
use shortlink::utils::short_code::ShortCodeCodec;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

type PgLinkService = LinkService<PgShortLinkRepository, PgSessionRepository, SystemClock>;

/// Short link registry tool.
#[derive(Parser)]
#[command(name = "shortlink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,

    /// Create a short link
    Shorten(ShortenArgs),

    /// Show the link behind a short code or alias
    Resolve {
        /// Short code or alias
        code: String,
    },

    /// Encode an identifier into a short code
    Encode {
        /// Link identifier
        id: u64,
    },

    /// Decode a short code into an identifier
    Decode {
        /// Short code
        code: String,
    },
}

#[derive(Args)]
struct ShortenArgs {
    /// URL to shorten
    url: String,

    /// Custom alias used instead of the generated code
    #[arg(short, long)]
    alias: Option<String>,

    /// Expiration date (YYYY-MM-DD) in the submitter's timezone
    #[arg(long)]
    expire_date: Option<String>,

    /// Expiration time (HH:MM) in the submitter's timezone
    #[arg(long)]
    expire_time: Option<String>,

    /// IANA timezone of the submitter (default: UTC)
    #[arg(short, long)]
    timezone: Option<String>,

    /// Session token of the creator
    #[arg(short, long)]
    session: Option<String>,

    /// Contact name
    #[arg(long)]
    name: Option<String>,

    /// Contact email
    #[arg(long)]
    email: Option<String>,

    /// Contact mobile number
    #[arg(long)]
    mobile: Option<String>,

    /// Show ads on the interstitial page
    #[arg(long)]
    ads: bool,

    /// Do not record visit statistics
    #[arg(long)]
    no_stats: bool,
}

impl From<ShortenArgs> for LinkSubmission {
    fn from(args: ShortenArgs) -> Self {
        LinkSubmission {
            original_url: Some(args.url),
            alias: args.alias,
            expire_date: args.expire_date,
            expire_time: args.expire_time,
            timezone: args.timezone,
            session_token: args.session,
            user_name: args.name,
            user_email: args.email,
            user_mobile: args.mobile,
            show_ads: args.ads,
            record_stats: !args.no_stats,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    telemetry::init(&config.log_level, &config.log_format);
    config.print_summary();

    let codec = ShortCodeCodec::new(config.code_padding);

    match cli.command {
        Commands::Migrate => {
            let pool = connect(&config).await?;
            run_migrations(&pool).await?;
        }
        Commands::Shorten(args) => {
            let service = link_service(connect(&config).await?, codec);
            handle_shorten(&service, args.into(), config.base_url.as_deref()).await?;
        }
        Commands::Resolve { code } => {
            let service = link_service(connect(&config).await?, codec);
            handle_resolve(&service, &code).await?;
        }
        Commands::Encode { id } => {
            let code = codec.encode(id)?;
            println!("{}", code.bright_yellow().bold());
        }
        Commands::Decode { code } => {
            let id = codec.identifier(&code)?;
            println!("{}", id.to_string().bright_yellow().bold());
        }
    }

    Ok(())
}

/// Opens the connection pool with the configured limits.
async fn connect(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(config.require_database_url()?)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");
    Ok(pool)
}

fn link_service(pool: PgPool, codec: ShortCodeCodec) -> PgLinkService {
    let pool = Arc::new(pool);

    LinkService::new(
        Arc::new(PgShortLinkRepository::new(pool.clone())),
        Arc::new(PgSessionRepository::new(pool)),
        Arc::new(SystemClock),
        codec,
    )
}

async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to migrate")?;

    println!("{}", "Migrations applied".green().bold());
    Ok(())
}

/// Creates a link and prints its code, or the per-field validation errors.
async fn handle_shorten(
    service: &PgLinkService,
    submission: LinkSubmission,
    base_url: Option<&str>,
) -> Result<()> {
    let link = match service.create_short_link(submission).await {
        Ok(link) => link,
        Err(AppError::Validation(errors)) => {
            println!("{}", "Submission rejected:".red().bold());
            for (field, message) in errors.iter() {
                println!("  {}: {}", field.cyan(), message);
            }
            anyhow::bail!("{} field(s) failed validation", errors.len());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", "Short link created".green().bold());
    println!("  ID:    {}", link.id.to_string().bright_black());
    println!("  Code:  {}", link.short_code.bright_yellow().bold());
    if let Some(ref alias) = link.alias {
        println!("  Alias: {}", alias.bright_yellow().bold());
    }
    println!("  URL:   {}", link.original_url.cyan());
    if let Some(base_url) = base_url {
        println!("  Short: {}", link.short_url(base_url).green().bold());
    }

    Ok(())
}

/// Prints a link and its settings.
async fn handle_resolve(service: &PgLinkService, code: &str) -> Result<()> {
    let link = service.find_by_code(code).await?;
    let settings = service.settings_for(link.id).await?;

    println!("{}", link.original_url.cyan().bold());
    println!("  ID:      {}", link.id.to_string().bright_black());
    println!("  Code:    {}", link.short_code.bright_yellow());
    if let Some(ref domain) = link.domain {
        println!("  Domain:  {domain}");
    }
    println!(
        "  Created: {}",
        link.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );

    match (settings.expire_date, settings.expire_time) {
        (None, None) => println!("  Expires: {}", "never".green()),
        (date, time) => {
            let date = date.map(|d| d.to_string()).unwrap_or_default();
            let time = time.map(|t| t.format("%H:%M").to_string()).unwrap_or_default();
            println!("  Expires: {} UTC", format!("{date} {time}").trim().yellow());
        }
    }

    let stats = if settings.record_stats { "on".green() } else { "off".red() };
    println!("  Stats:   {stats}");

    Ok(())
}
