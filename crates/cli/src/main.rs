//! Mercado CLI - drive the catalog API from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! mercado products
//!
//! # Sign in (session persists in MERCADO_SESSION_FILE)
//! mercado account login -e ana@example.com -p hunter2
//!
//! # Cart operations
//! mercado cart show
//! mercado cart add <product-id> --quantity 2
//!
//! # Admin dashboard metrics
//! mercado dashboard
//! ```
//!
//! # Environment Variables
//!
//! - `MERCADO_API_URL` - Base URL of the catalog API (required)
//! - `MERCADO_REGISTER_ENDPOINT` - Account creation path (default `/register`)
//! - `MERCADO_SESSION_FILE` - Durable session location

#![cfg_attr(not(test), forbid(unsafe_code))]
// Terminal output is this binary's purpose.
#![allow(clippy::print_stdout)]

use std::num::NonZeroU32;

use clap::{Parser, Subcommand};

use mercado_client::{ApiClient, ClientConfig, ClientError, SessionStore};

mod commands;

#[derive(Parser)]
#[command(name = "mercado")]
#[command(author, version, about = "Mercado catalog CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the product catalog
    Products,
    /// Shopping cart operations
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Account and session operations
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Admin dashboard metrics
    Dashboard,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with its total
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: String,

        /// Quantity to add
        #[arg(short, long, default_value = "1")]
        quantity: NonZeroU32,
    },
    /// Set the quantity on a cart line
    Set {
        /// Cart line id
        item_id: String,

        /// New quantity
        quantity: NonZeroU32,
    },
    /// Remove a cart line
    Remove {
        /// Cart line id
        item_id: String,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Log in and persist the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Path to return to after login
        #[arg(long)]
        redirect: Option<String>,
    },
    /// Create an account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Age
        #[arg(short, long)]
        age: u32,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Drop the stored session
    Logout,
    /// Show the current session
    Status,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mercado=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    let session = SessionStore::open(&config.session_file);
    let api = ApiClient::new(&config, session);

    if let Err(e) = run(cli, api).await {
        report_failure(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, api: ApiClient) -> mercado_client::Result<()> {
    match cli.command {
        Commands::Products => commands::catalog::list(api).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(api).await?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(api, &product_id, quantity).await?,
            CartAction::Set { item_id, quantity } => {
                commands::cart::set_quantity(api, &item_id, quantity).await?;
            }
            CartAction::Remove { item_id } => commands::cart::remove(api, &item_id).await?,
        },
        Commands::Account { action } => match action {
            AccountAction::Login {
                email,
                password,
                redirect,
            } => commands::account::login(api, &email, &password, redirect.as_deref()).await?,
            AccountAction::Register {
                name,
                age,
                email,
                password,
            } => commands::account::register(api, name, age, email, password).await?,
            AccountAction::Logout => commands::account::logout(&api),
            AccountAction::Status => commands::account::status(&api),
        },
        Commands::Dashboard => commands::dashboard::show(api).await,
    }
    Ok(())
}

/// Print a failure the way the browser app surfaced it: the message, plus
/// the navigation the session layer asked for, when there is one.
fn report_failure(error: &ClientError) {
    tracing::error!("Command failed: {error}");
    if let Some(redirect) = error.redirect() {
        println!("{}", redirect.message());
        println!("(the app would navigate to {})", redirect.location());
    }
}
