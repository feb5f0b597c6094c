//! Read-only product catalog loaded once from the static `products.json`
//! document. The cart engine only ever looks products up by name.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A catalog entry as published in `products.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    /// Base price, used when no size override applies.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Default unit weight when the selected size carries none.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<Decimal>,
    #[serde(default)]
    pub sizes: Vec<SizeOption>,
    /// Color labels offered for this product. Colors never override price or
    /// weight; they only contribute to the cart line key.
    #[serde(default)]
    pub colors: Vec<String>,
}

impl Product {
    /// Returns the size option whose label matches exactly, if any.
    #[must_use]
    pub fn size(&self, label: &str) -> Option<&SizeOption> {
        self.sizes.iter().find(|s| s.label == label)
    }
}

/// A selectable size, optionally overriding the product's price and weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeOption {
    #[serde(alias = "size")]
    pub label: String,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<Decimal>,
}

/// Listing order for catalog products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Order of the catalog document.
    #[default]
    Original,
    AlphaAsc,
    AlphaDesc,
    PriceAsc,
    PriceDesc,
}

/// Sorts products in place. The sort is stable, so ties keep their current
/// relative order. Name ordering ignores case first, then falls back to the
/// exact name.
pub fn sort_products(products: &mut [&Product], order: SortOrder) {
    match order {
        SortOrder::Original => {}
        SortOrder::AlphaAsc => products.sort_by(|a, b| compare_names(a, b)),
        SortOrder::AlphaDesc => products.sort_by(|a, b| compare_names(b, a)),
        SortOrder::PriceAsc => products.sort_by_key(|p| p.price),
        SortOrder::PriceDesc => products.sort_by_key(|p| std::cmp::Reverse(p.price)),
    }
}

fn compare_names(a: &Product, b: &Product) -> std::cmp::Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Looks a product up by exact name. The first match wins.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Products whose name or any tag contains `query`, ignoring case, in
    /// catalog order. An empty query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let query = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// All products in the requested order. The catalog itself is untouched,
    /// so [`SortOrder::Original`] always restores the document order.
    #[must_use]
    pub fn sorted(&self, order: SortOrder) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.iter().collect();
        sort_products(&mut products, order);
        products
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }
}

/// Load and validate the product catalog from a JSON file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let products: Vec<Product> =
        serde_json::from_str(&content).map_err(ConfigError::CatalogFileParse)?;

    validate_products(&products)?;

    Ok(Catalog::from_products(products))
}

fn validate_products(products: &[Product]) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for product in products {
        if product.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "product name must be non-empty".to_string(),
            ));
        }

        if product.price <= Decimal::ZERO {
            return Err(ConfigError::Validation(format!(
                "product '{}' has non-positive price {}",
                product.name, product.price
            )));
        }

        if !seen_names.insert(product.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate product name: '{}'",
                product.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SHIRT_JSON: &str = r#"[
        {
            "id": 1,
            "name": "Shirt",
            "price": 12.5,
            "description": "Cotton tee",
            "images": ["images/shirt-1.png"],
            "tags": ["apparel", "cotton"],
            "weight": 0.2,
            "sizes": [
                { "label": "S" },
                { "label": "M", "price": 14.0, "weight": 0.25 },
                { "size": "L", "price": 16 }
            ],
            "colors": ["Red", "Blue"]
        },
        { "id": 2, "name": "Mug", "price": 9.99, "description": "Stoneware", "images": [], "tags": ["kitchen"] }
    ]"#;

    fn write_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write catalog");
        file
    }

    fn product(name: &str, price: Decimal) -> Product {
        Product {
            name: name.to_string(),
            price,
            description: None,
            images: vec![],
            tags: vec![],
            weight: None,
            sizes: vec![],
            colors: vec![],
        }
    }

    #[test]
    fn load_catalog_parses_products_and_sizes() {
        let file = write_catalog(SHIRT_JSON);
        let catalog = load_catalog(file.path()).expect("catalog should load");
        assert_eq!(catalog.len(), 2);

        let shirt = catalog.find("Shirt").expect("shirt present");
        assert_eq!(shirt.price, Decimal::new(125, 1));
        assert_eq!(shirt.weight, Some(Decimal::new(2, 1)));
        assert_eq!(shirt.colors, vec!["Red", "Blue"]);

        let medium = shirt.size("M").expect("size M present");
        assert_eq!(medium.price, Some(Decimal::new(14, 0)));
        assert_eq!(medium.weight, Some(Decimal::new(25, 2)));

        let small = shirt.size("S").expect("size S present");
        assert!(small.price.is_none());
        assert!(small.weight.is_none());

        // "size" is accepted as an alias for "label"
        assert_eq!(shirt.size("L").and_then(|s| s.price), Some(Decimal::new(16, 0)));
    }

    #[test]
    fn find_is_exact_match() {
        let catalog = Catalog::from_products(vec![product("Mug", Decimal::new(999, 2))]);
        assert!(catalog.find("Mug").is_some());
        assert!(catalog.find("mug").is_none());
        assert!(catalog.find("Mug (Large)").is_none());
    }

    fn shop() -> Catalog {
        let mut candle = product("candle", Decimal::new(1500, 2));
        candle.tags = vec!["Home".to_string()];
        let mut mug = product("Mug", Decimal::new(999, 2));
        mug.tags = vec!["kitchen".to_string(), "home".to_string()];
        Catalog::from_products(vec![
            product("Shirt", Decimal::new(1200, 2)),
            mug,
            candle,
            product("Apron", Decimal::new(999, 2)),
        ])
    }

    fn names(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn search_matches_name_or_tag_ignoring_case() {
        let catalog = shop();
        assert_eq!(names(&catalog.search("HOME")), vec!["Mug", "candle"]);
        assert_eq!(names(&catalog.search("shi")), vec!["Shirt"]);
        assert_eq!(names(&catalog.search("ap")), vec!["Apron"]);
        assert!(catalog.search("lamp").is_empty());
    }

    #[test]
    fn empty_search_matches_everything_in_catalog_order() {
        let catalog = shop();
        assert_eq!(names(&catalog.search("")), vec!["Shirt", "Mug", "candle", "Apron"]);
    }

    #[test]
    fn sorted_by_name_ignores_case() {
        let catalog = shop();
        assert_eq!(
            names(&catalog.sorted(SortOrder::AlphaAsc)),
            vec!["Apron", "candle", "Mug", "Shirt"]
        );
        assert_eq!(
            names(&catalog.sorted(SortOrder::AlphaDesc)),
            vec!["Shirt", "Mug", "candle", "Apron"]
        );
    }

    #[test]
    fn sorted_by_price_keeps_ties_in_catalog_order() {
        let catalog = shop();
        assert_eq!(
            names(&catalog.sorted(SortOrder::PriceAsc)),
            vec!["Mug", "Apron", "Shirt", "candle"]
        );
        assert_eq!(
            names(&catalog.sorted(SortOrder::PriceDesc)),
            vec!["candle", "Shirt", "Mug", "Apron"]
        );
    }

    #[test]
    fn original_order_is_restored_after_sorting() {
        let catalog = shop();
        let _ = catalog.sorted(SortOrder::PriceDesc);
        assert_eq!(
            names(&catalog.sorted(SortOrder::Original)),
            vec!["Shirt", "Mug", "candle", "Apron"]
        );
    }

    #[test]
    fn search_results_can_be_sorted() {
        let catalog = shop();
        let mut results = catalog.search("home");
        sort_products(&mut results, SortOrder::AlphaAsc);
        assert_eq!(names(&results), vec!["candle", "Mug"]);
    }

    #[test]
    fn size_lookup_absent_is_none() {
        let p = product("Mug", Decimal::new(999, 2));
        assert!(p.size("XL").is_none());
    }

    #[test]
    fn load_catalog_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_catalog(&dir.path().join("products.json")).unwrap_err();
        assert!(matches!(err, ConfigError::CatalogFileIo { .. }), "got: {err:?}");
    }

    #[test]
    fn load_catalog_rejects_malformed_json() {
        let file = write_catalog("{ not json");
        let err = load_catalog(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::CatalogFileParse(_)), "got: {err:?}");
    }

    #[test]
    fn validate_rejects_duplicate_names_case_insensitively() {
        let products = vec![
            product("Mug", Decimal::new(999, 2)),
            product("MUG", Decimal::new(899, 2)),
        ];
        let err = validate_products(&products).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate product name")),
            "got: {err:?}"
        );
    }

    #[test]
    fn validate_rejects_non_positive_price() {
        let products = vec![product("Freebie", Decimal::ZERO)];
        let err = validate_products(&products).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref msg) if msg.contains("non-positive price")),
            "got: {err:?}"
        );
    }

    #[test]
    fn validate_rejects_blank_name() {
        let products = vec![product("  ", Decimal::ONE)];
        assert!(validate_products(&products).is_err());
    }
}
