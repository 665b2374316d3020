//! CLI administration tool for short-url.
//!
//! Manages users and inspects short links directly in PostgreSQL,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Register a user who can own links
//! cargo run --bin admin -- user create --name Ada --email ada@example.com
//!
//! # List users
//! cargo run --bin admin -- user list
//!
//! # Browse public links
//! cargo run --bin admin -- links public --page 2
//!
//! # Browse every link, private ones included
//! cargo run --bin admin -- links all
//!
//! # Show the links owned by a user
//! cargo run --bin admin -- links owner 42
//!
//! # Delete some of a user's links
//! cargo run --bin admin -- links delete 42 10 11 12
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `BASE_URL` (optional): origin used to print short URLs

use short_url::application::services::{KeyGenerator, LinkService, LinkSettings};
use short_url::config::Config;
use short_url::domain::clock::SystemClock;
use short_url::domain::entities::{NewUser, ShortLink};
use short_url::domain::page::{Page, PageRequest};
use short_url::domain::repositories::UserRepository;
use short_url::infrastructure::persistence::{PgShortLinkRepository, PgUserRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

const PAGE_SIZE: u32 = 20;

type AdminLinkService = LinkService<PgShortLinkRepository, PgUserRepository>;

/// CLI tool for managing short-url.
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
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Inspect and delete short links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Unique email address
        #[arg(short, long)]
        email: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all users
    List,
}

/// Short link subcommands.
#[derive(Subcommand)]
enum LinksAction {
    /// List public links, newest first
    Public {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = PAGE_SIZE)]
        page_size: u32,
    },

    /// List every link, private ones included, newest first
    All {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = PAGE_SIZE)]
        page_size: u32,
    },

    /// List links owned by a user
    Owner {
        user_id: i64,

        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Delete links owned by a user
    Delete {
        user_id: i64,

        /// Link IDs to delete
        #[arg(required = true)]
        ids: Vec<i64>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Links { action } => handle_links_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create { name, email, yes } => create_user(&repo, name, email, yes).await,
        UserAction::List => list_users(&repo).await,
    }
}

/// Creates a user with interactive prompts for missing fields.
async fn create_user(
    repo: &PgUserRepository,
    name: Option<String>,
    email: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    println!("  Name:  {}", name.cyan());
    println!("  Email: {}", email.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let user = repo
        .create(NewUser { name, email })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ User created with ID".green().bold(),
        user.id.to_string().bright_yellow().bold()
    );
    println!();
    println!("{}", "Send this header to act as the user:".bright_white());
    println!("  {}: {}", "X-User-Id".bright_cyan(), user.id);
    println!();

    Ok(())
}

async fn list_users(repo: &PgUserRepository) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<6} {:<24} {:<32} {:<20}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(84).bright_black());

    for user in &users {
        println!(
            "  {:<6} {:<24} {:<32} {}",
            user.id.to_string().bright_black(),
            user.name.cyan(),
            user.email,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Builds a link service over PostgreSQL for read and delete commands.
fn link_service(pool: Arc<PgPool>) -> Result<AdminLinkService> {
    let settings = LinkSettings {
        default_expiry_days: 30,
        key_insert_attempts: 5,
        base_url: std::env::var("BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string()),
    };

    Ok(LinkService::new(
        Arc::new(PgShortLinkRepository::new(pool.clone())),
        Arc::new(PgUserRepository::new(pool)),
        Arc::new(KeyGenerator::from_os_rng()?),
        Arc::new(SystemClock),
        settings,
    ))
}

/// Dispatches short link commands.
async fn handle_links_action(action: LinksAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let service = link_service(pool.clone())?;

    match action {
        LinksAction::Public { page, page_size } => {
            let links = service
                .list_public_links(PageRequest::new(page, page_size))
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

            println!("{}", "🌐 Public Links".bright_blue().bold());
            println!();
            print_links(&service, links);
        }
        LinksAction::All { page, page_size } => {
            let links = service
                .list_all_links(PageRequest::new(page, page_size))
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

            println!("{}", "📚 All Links".bright_blue().bold());
            println!();
            print_links(&service, links);
        }
        LinksAction::Owner { user_id, page } => {
            let users = PgUserRepository::new(pool);
            let user = users
                .find_by_id(user_id)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
                .context("User not found")?;

            let links = service
                .list_user_links(user_id, PageRequest::new(page, PAGE_SIZE))
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

            println!(
                "{} {}",
                "🔗 Links owned by".bright_blue().bold(),
                user.name.cyan().bold()
            );
            println!();
            print_links(&service, links);
        }
        LinksAction::Delete { user_id, ids, yes } => {
            delete_links(&service, user_id, ids, yes).await?;
        }
    }

    Ok(())
}

/// Deletes links after confirmation. IDs the user does not own are skipped.
async fn delete_links(
    service: &AdminLinkService,
    user_id: i64,
    ids: Vec<i64>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑️  Delete Links".bright_blue().bold());
    println!();
    println!("  Owner: {}", user_id.to_string().cyan());
    println!("  IDs:   {}", format!("{ids:?}").bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete these links?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = service
        .delete_user_links(&ids, user_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete links: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Deleted".green().bold(),
        deleted.to_string().bright_white().bold()
    );
    if deleted < ids.len() as u64 {
        println!(
            "{}",
            "⚠️  Some IDs did not exist or belong to another user".yellow()
        );
    }
    println!();

    Ok(())
}

fn print_links(service: &AdminLinkService, page: Page<ShortLink>) {
    if page.items.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        return;
    }

    println!(
        "  {:<6} {:<8} {:<8} {:<8} {:<20} {}",
        "ID".bright_white().bold(),
        "Key".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Private".bright_white().bold(),
        "Expires".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(90).bright_black());

    for link in &page.items {
        let expires = link
            .expires_at
            .map(|e| e.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());
        let private = if link.is_private {
            "yes".red()
        } else {
            "no".green()
        };

        println!(
            "  {:<6} {:<8} {:<8} {:<8} {:<20} {}",
            link.id.to_string().bright_black(),
            link.short_key.bright_yellow(),
            link.click_count,
            private,
            expires.bright_black(),
            link.original_url.cyan()
        );
        println!(
            "  {:<6} {}",
            "",
            service.short_url(&link.short_key).bright_black()
        );
    }

    println!();
    println!(
        "  Page {} of {} ({} total)",
        page.page_number,
        page.total_pages.max(1),
        page.total_elements.to_string().bright_white().bold()
    );
    println!();
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
