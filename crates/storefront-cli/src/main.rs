mod cart;
mod catalog;
mod checkout;
mod render;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cart::CartCommands;
use crate::catalog::CatalogCommands;
use crate::checkout::CheckoutCommands;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Storefront cart command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect and change the shopping cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Read what the last checkout published
    Checkout {
        #[command(subcommand)]
        command: CheckoutCommands,
    },
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
}

fn main() -> anyhow::Result<()> {
    let config = storefront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Cart { command }) => cart::run(&config, command),
        Some(Commands::Checkout { command }) => checkout::run(&config, &command),
        Some(Commands::Catalog { command }) => catalog::run(&config, &command),
        None => {
            println!("storefront-cli: use `cart`, `checkout`, or `catalog` (see --help)");
            Ok(())
        }
    }
}
