//! # Catalog Matching
//!
//! Case-insensitive substring matching of products by name or category.
//!
//! Two flavours share the same matcher:
//! - [`search`] feeds the invoice dropdown: an empty query matches nothing
//! - [`filter`] feeds the product list: an empty query matches everything
//!
//! Both keep catalog order.

use crate::types::Product;

/// Products matching `query` for the invoice product picker.
///
/// ```rust
/// use tally_core::catalog::search;
///
/// assert!(search(&[], "pen").is_empty());
/// ```
pub fn search<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    match normalize(query) {
        Some(needle) => matching(products, &needle),
        None => Vec::new(),
    }
}

/// Products matching `query` for the catalog list.
pub fn filter<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    match normalize(query) {
        Some(needle) => matching(products, &needle),
        None => products.iter().collect(),
    }
}

/// True if the product's name or category contains the lowercased needle.
pub fn matches(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle) || product.category.to_lowercase().contains(needle)
}

fn normalize(query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

fn matching<'a>(products: &'a [Product], needle: &str) -> Vec<&'a Product> {
    products.iter().filter(|p| matches(p, needle)).collect()
}
