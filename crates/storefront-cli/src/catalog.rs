use clap::{Subcommand, ValueEnum};
use storefront_core::{AppConfig, Catalog, Product, SortOrder};

#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// List products with their sizes and colors
    List {
        /// Only products whose name or a tag contains this text
        #[arg(long)]
        search: Option<String>,

        #[arg(long, value_enum, default_value_t = SortArg::Original)]
        sort: SortArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Original,
    AlphaAsc,
    AlphaDesc,
    PriceAsc,
    PriceDesc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Original => SortOrder::Original,
            SortArg::AlphaAsc => SortOrder::AlphaAsc,
            SortArg::AlphaDesc => SortOrder::AlphaDesc,
            SortArg::PriceAsc => SortOrder::PriceAsc,
            SortArg::PriceDesc => SortOrder::PriceDesc,
        }
    }
}

/// Load the catalog, falling back to an empty one when it is missing or
/// invalid. The cart still works without it; prices then come from the
/// command line.
pub(crate) fn load_or_empty(config: &AppConfig) -> Catalog {
    match storefront_core::load_catalog(&config.catalog_path) {
        Ok(catalog) => {
            tracing::debug!(products = catalog.len(), "catalog loaded");
            catalog
        }
        Err(e) => {
            tracing::warn!(
                path = %config.catalog_path.display(),
                error = %e,
                "catalog unavailable; continuing without it"
            );
            Catalog::default()
        }
    }
}

/// Run one `catalog` sub-command.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub(crate) fn run(config: &AppConfig, command: &CatalogCommands) -> anyhow::Result<()> {
    match command {
        CatalogCommands::List { search, sort } => {
            let catalog = storefront_core::load_catalog(&config.catalog_path)?;
            let products = select(&catalog, search.as_deref(), *sort);
            if products.is_empty() {
                println!("no products found");
            }
            for product in products {
                println!("{}", describe(product));
            }
            Ok(())
        }
    }
}

fn select<'a>(catalog: &'a Catalog, search: Option<&str>, sort: SortArg) -> Vec<&'a Product> {
    let mut products = match search {
        Some(query) => catalog.search(query),
        None => catalog.products().iter().collect(),
    };
    storefront_core::sort_products(&mut products, sort.into());
    products
}

fn describe(product: &Product) -> String {
    let mut line = format!("{} - ${:.2}", product.name, product.price);

    if !product.sizes.is_empty() {
        let sizes: Vec<String> = product
            .sizes
            .iter()
            .map(|s| match s.price {
                Some(price) => format!("{} ${price:.2}", s.label),
                None => s.label.clone(),
            })
            .collect();
        line.push_str(&format!(" | sizes: {}", sizes.join(", ")));
    }

    if !product.colors.is_empty() {
        line.push_str(&format!(" | colors: {}", product.colors.join(", ")));
    }

    line
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn describe_lists_sizes_and_colors() {
        let product = shirt();
        assert_eq!(
            describe(&product),
            "Shirt - $12.00 | sizes: S, M $14.00 | colors: Red, Blue"
        );
    }

    #[test]
    fn select_filters_then_sorts() {
        let mut mug = shirt();
        mug.name = "Mug".to_string();
        mug.price = rust_decimal::Decimal::new(999, 2);
        mug.tags = vec!["cotton".to_string()];
        let mut apron = shirt();
        apron.name = "Apron".to_string();
        apron.tags = vec!["Cotton".to_string()];
        let mut lamp = shirt();
        lamp.name = "Lamp".to_string();
        let catalog = Catalog::from_products(vec![shirt(), mug, apron, lamp]);

        let names = |products: Vec<&Product>| -> Vec<String> {
            products.into_iter().map(|p| p.name.clone()).collect()
        };
        assert_eq!(
            names(select(&catalog, Some("cotton"), SortArg::AlphaAsc)),
            vec!["Apron", "Mug"]
        );
        assert_eq!(
            names(select(&catalog, None, SortArg::PriceAsc)),
            vec!["Mug", "Shirt", "Apron", "Lamp"]
        );
        assert_eq!(
            names(select(&catalog, None, SortArg::Original)),
            vec!["Shirt", "Mug", "Apron", "Lamp"]
        );
    }

    #[test]
    fn load_or_empty_tolerates_missing_catalog() {
        let config = AppConfig {
            log_level: "info".to_string(),
            store_path: PathBuf::from("unused.json"),
            catalog_path: PathBuf::from("/nonexistent/products.json"),
            checkout_location: "checkout.html".to_string(),
        };
        assert!(load_or_empty(&config).is_empty());
    }

    fn shirt() -> Product {
        Product {
            name: "Shirt".to_string(),
            price: rust_decimal::Decimal::new(12, 0),
            description: None,
            images: vec![],
            tags: vec![],
            weight: None,
            sizes: vec![
                storefront_core::SizeOption {
                    label: "S".to_string(),
                    price: None,
                    weight: None,
                },
                storefront_core::SizeOption {
                    label: "M".to_string(),
                    price: Some(rust_decimal::Decimal::new(14, 0)),
                    weight: None,
                },
            ],
            colors: vec!["Red".to_string(), "Blue".to_string()],
        }
    }
}
