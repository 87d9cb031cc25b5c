//! Marketplace CLI - Inspect and edit a stored cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! cart-cli show
//!
//! # Dump the stored JSON
//! cart-cli show --json
//!
//! # Add a product
//! cart-cli add --id a --title "Pineapple" --image-url https://cdn.example.com/a.png --price 10
//!
//! # Change quantities
//! cart-cli increment a
//! cart-cli decrement a
//!
//! # Reset the cart
//! cart-cli clear
//! ```
//!
//! # Commands
//!
//! - `show` - List cart lines and the item count
//! - `add` - Add a product, or bump it if already present
//! - `increment` / `decrement` - Change a line's quantity by one
//! - `clear` - Remove the stored cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use marketplace_core::Price;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Marketplace cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the stored cart
    Show {
        /// Print the stored list as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Add a product to the cart
    Add {
        /// Product ID
        #[arg(short, long)]
        id: String,

        /// Product title
        #[arg(short, long)]
        title: String,

        /// Product image URL
        #[arg(long)]
        image_url: String,

        /// Unit price (e.g. 19.99)
        #[arg(short, long)]
        price: Price,
    },
    /// Increase a product's quantity by one
    Increment {
        /// Product ID
        id: String,
    },
    /// Decrease a product's quantity by one
    Decrement {
        /// Product ID
        id: String,
    },
    /// Remove the stored cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cart_cli=info,marketplace_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::cart::CartCommandError> {
    match cli.command {
        Commands::Show { json } => commands::cart::show(json).await?,
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => commands::cart::add(id, title, image_url, price).await?,
        Commands::Increment { id } => commands::cart::increment(id).await?,
        Commands::Decrement { id } => commands::cart::decrement(id).await?,
        Commands::Clear => commands::cart::clear().await?,
    }
    Ok(())
}
