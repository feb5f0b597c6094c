//! `cart` sub-commands. Each invocation is one "page load": the cart is
//! loaded and repaired from the store, one command is applied, and the
//! resulting cart is rendered.

use std::io::{BufRead, Write};

use clap::Subcommand;
use storefront_cart::{AddToCart, CartEngine, Command, FileStore, VariantSelection};
use storefront_core::AppConfig;

use crate::render;

#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Show the current cart and its total
    Show,
    /// Add one unit of a product, optionally with size and color
    Add {
        /// Product name as listed in the catalog
        name: String,

        /// Price carried by the add button; the catalog price is used when omitted
        #[arg(long)]
        price: Option<String>,

        /// Price text shown next to the product, used as a last resort
        #[arg(long)]
        display_price: Option<String>,

        #[arg(long)]
        size: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },
    /// Add one unit to an existing line
    Inc { key: String },
    /// Take one unit off a line, removing it at zero
    Dec { key: String },
    /// Remove a line entirely
    Remove { key: String },
    /// Empty the cart
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Publish the total and a snapshot for the checkout page
    Checkout,
}

impl CartCommands {
    /// Maps the CLI form onto an engine command. `Show` has no engine
    /// counterpart and maps to `None`.
    fn into_command(
        self,
        confirm: impl FnOnce() -> anyhow::Result<bool>,
    ) -> anyhow::Result<Option<Command>> {
        let command = match self {
            CartCommands::Show => return Ok(None),
            CartCommands::Add {
                name,
                price,
                display_price,
                size,
                color,
            } => Command::AddToCart(AddToCart {
                name,
                price,
                display_price,
                selection: VariantSelection { size, color },
            }),
            CartCommands::Inc { key } => Command::Increment { key },
            CartCommands::Dec { key } => Command::Decrement { key },
            CartCommands::Remove { key } => Command::Remove { key },
            CartCommands::Clear { yes } => Command::Clear {
                confirmed: yes || confirm()?,
            },
            CartCommands::Checkout => Command::Checkout,
        };
        Ok(Some(command))
    }
}

/// Run one `cart` sub-command against the configured store.
///
/// # Errors
///
/// Returns an error if the price of an added item cannot be resolved, the
/// store cannot be written, or the confirmation prompt cannot be read.
pub(crate) fn run(config: &AppConfig, command: CartCommands) -> anyhow::Result<()> {
    let catalog = crate::catalog::load_or_empty(config);
    let mut engine = CartEngine::open(
        FileStore::new(&config.store_path),
        catalog,
        config.checkout_location.clone(),
    );

    let Some(command) = command.into_command(|| confirm("Clear all items from the cart?"))? else {
        render::print_cart(engine.cart(), &engine.totals());
        return Ok(());
    };

    let outcome = engine.dispatch(command)?;

    if outcome.open_panel || outcome.persisted {
        render::print_cart(engine.cart(), &outcome.totals);
    } else {
        println!("cart unchanged");
    }

    if let Some(location) = &outcome.navigate_to {
        println!("continue to checkout: {location}");
    }

    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
