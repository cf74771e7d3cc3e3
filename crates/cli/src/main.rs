//! Scoder CLI - browse the catalog, manage the session and shop from a
//! terminal.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, optionally filtered
//! scoder products --search "jacket"
//!
//! # Log in (any well-formed credentials work) and check who is logged in
//! scoder login -e jane@example.com -p secret1
//! scoder whoami
//!
//! # Interactive shopping session
//! scoder shell
//! ```
//!
//! # Commands
//!
//! - `products` - List catalog products
//! - `whoami` - Show the saved session
//! - `login` / `register` / `logout` - Manage the saved session
//! - `shell` - Interactive cart and checkout
//!
//! Logs go to stderr; set `RUST_LOG` to adjust the filter.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scoder_storefront::Storefront;
use scoder_storefront::config::StorefrontConfig;
use scoder_storefront::services::{LoginForm, RegisterForm};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "scoder")]
#[command(author, version, about = "Scoder storefront CLI")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Only show products whose title or category contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show the logged-in user
    Whoami,
    /// Log in and save the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create an account and save the session
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Repeat the password
        #[arg(short, long)]
        confirm_password: String,
    },
    /// Forget the saved session
    Logout,
    /// Start an interactive shopping session
    Shell,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "scoder_storefront=info,scoder_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            cli.log_json
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!cli.log_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env().map_err(scoder_storefront::AppError::from)?;
    let storefront = Storefront::open(config).map_err(scoder_storefront::AppError::from)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Products { search } => {
            commands::catalog::products(&storefront, search, &mut out).await?;
        }
        Commands::Whoami => commands::account::whoami(&storefront, &mut out)?,
        Commands::Login { email, password } => {
            let form = LoginForm { email, password };
            commands::account::login(&storefront, &form, &mut out).await?;
        }
        Commands::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            let form = RegisterForm {
                name,
                email,
                password,
                confirm_password,
            };
            commands::account::register(&storefront, &form, &mut out).await?;
        }
        Commands::Logout => commands::account::logout(&storefront, &mut out)?,
        Commands::Shell => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            commands::shell::run(&storefront, stdin, &mut out).await?;
        }
    }

    out.flush()?;
    Ok(())
}
