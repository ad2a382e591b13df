//! Shopfront CLI - Terminal storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! shopfront catalog
//! shopfront catalog --category electronics
//! shopfront categories
//!
//! # Manage the cart
//! shopfront cart add 9
//! shopfront cart set 9 3
//! shopfront cart remove 9
//! shopfront cart show --json
//!
//! # Check out
//! shopfront checkout
//! ```
//!
//! # Commands
//!
//! - `catalog` - List products with sale badges
//! - `categories` - List catalog categories
//! - `cart` - Show or change the persisted cart
//! - `checkout` - Place the order and empty the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopfront_storefront::ShopfrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront terminal storefront")]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Catalog {
        /// Only show products in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List catalog categories
    Categories,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Check out the current cart
    Checkout,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: String,
    },
    /// Remove a product line
    Remove {
        /// Product ID
        id: String,
    },
    /// Set a line's quantity (0 or below removes it)
    Set {
        /// Product ID
        id: String,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ShopfrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ShopfrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Failed to load configuration: {e}");
            }
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so stdout stays clean for command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_storefront=info,shopfront_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ShopfrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let output = match cli.command {
        Commands::Catalog { category } => commands::catalog::list(config, category.as_deref()).await?,
        Commands::Categories => commands::catalog::categories(config).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(config)?,
            CartAction::Add { id } => commands::cart::add(config, &id).await?,
            CartAction::Remove { id } => commands::cart::remove(config, &id)?,
            CartAction::Set { id, quantity } => commands::cart::set(config, &id, quantity)?,
            CartAction::Clear => commands::cart::clear(config)?,
        },
        Commands::Checkout => commands::cart::checkout(config)?,
    };

    let text = if cli.json {
        serde_json::to_string_pretty(&output.json)?
    } else {
        output.lines.join("\n")
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{text}");
    }
    Ok(())
}
