//! The checkout page's view of the store: it never touches the live cart,
//! only what `cart checkout` published.

use clap::Subcommand;
use storefront_cart::{totals, CartStore, FileStore};
use storefront_core::AppConfig;

use crate::render;

#[derive(Debug, Subcommand)]
pub enum CheckoutCommands {
    /// Show the published snapshot and total
    Show,
}

/// Run one `checkout` sub-command.
///
/// # Errors
///
/// Currently infallible; reads from the store degrade to empty values.
pub(crate) fn run(config: &AppConfig, command: &CheckoutCommands) -> anyhow::Result<()> {
    match command {
        CheckoutCommands::Show => {
            let store = CartStore::new(FileStore::new(&config.store_path));
            let snapshot = store.read_snapshot();
            if snapshot.is_empty() {
                println!("nothing has been checked out yet");
                return Ok(());
            }

            let derived = totals(&snapshot);
            render::print_cart(&snapshot, &derived);

            match store.read_total() {
                Some(published) if published != derived.price => tracing::warn!(
                    published = %published,
                    derived = %derived.price,
                    "published total differs from snapshot; the cart changed after checkout"
                ),
                Some(_) => {}
                None => println!("no published total found"),
            }
            Ok(())
        }
    }
}
