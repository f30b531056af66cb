//! # Reporting
//!
//! Dashboard aggregates over the four collections.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   sales ──────────┬──► total sales ─────┐                               │
//! │                   └──► sales by month ──┼──► profit by month            │
//! │   purchases ──────┬──► total purchases ─┘                               │
//! │                   └──► purchases by month                               │
//! │                                                                         │
//! │   invoices ──┐                                                          │
//! │              ├──► sales by category (items whose product still exists)  │
//! │   products ──┘                                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Months are calendar months in UTC.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Invoice, Product, Purchase, Sale, Timestamp};

/// Placeholder shown for a sale whose invoice cannot be found.
pub const UNKNOWN_INVOICE: &str = "Unknown";

// =============================================================================
// Month Key
// =============================================================================

/// A calendar month. Orders chronologically, displays as `M/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(timestamp: Timestamp) -> Self {
        let date = timestamp.date();
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

// =============================================================================
// Report Types
// =============================================================================

/// Sales, purchases and profit for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyFigures {
    pub month: MonthKey,
    pub sales: Money,
    pub purchases: Money,
    pub profit: Money,
}

/// Invoiced line totals for one product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategorySales {
    pub category: String,
    pub total: Money,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    pub product_count: usize,
    pub invoice_count: usize,
    pub total_sales: Money,
    pub total_purchases: Money,
    pub net_profit: Money,
    /// Chronological.
    pub monthly: Vec<MonthlyFigures>,
    /// Alphabetical by category.
    pub by_category: Vec<CategorySales>,
}

/// Builds the dashboard from full collection listings.
pub fn summarize(
    products: &[Product],
    invoices: &[Invoice],
    sales: &[Sale],
    purchases: &[Purchase],
) -> DashboardSummary {
    let total_sales: Money = sales.iter().map(Sale::total_amount).sum();
    let total_purchases: Money = purchases.iter().map(Purchase::total_cost).sum();

    DashboardSummary {
        product_count: products.len(),
        invoice_count: invoices.len(),
        total_sales,
        total_purchases,
        net_profit: total_sales - total_purchases,
        monthly: monthly(sales, purchases),
        by_category: by_category(products, invoices),
    }
}

/// Per-month figures over the union of months seen on either side.
pub fn monthly(sales: &[Sale], purchases: &[Purchase]) -> Vec<MonthlyFigures> {
    let mut months: BTreeMap<MonthKey, (Money, Money)> = BTreeMap::new();

    for sale in sales {
        months.entry(MonthKey::of(sale.date)).or_default().0 += sale.total_amount();
    }
    for purchase in purchases {
        months.entry(MonthKey::of(purchase.purchase_date)).or_default().1 += purchase.total_cost();
    }

    months
        .into_iter()
        .map(|(month, (sales, purchases))| MonthlyFigures {
            month,
            sales,
            purchases,
            profit: sales - purchases,
        })
        .collect()
}

/// Line totals grouped by the category of the product each line refers to.
///
/// Lines whose product is no longer in the catalog are not counted.
pub fn by_category(products: &[Product], invoices: &[Invoice]) -> Vec<CategorySales> {
    let category_of: HashMap<&str, &str> = products
        .iter()
        .map(|p| (p.id.as_str(), p.category.as_str()))
        .collect();

    let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
    for item in invoices.iter().flat_map(|invoice| invoice.items.iter()) {
        if let Some(category) = category_of.get(item.product_id.as_str()) {
            *totals.entry(*category).or_default() += item.line_total();
        }
    }

    totals
        .into_iter()
        .map(|(category, total)| CategorySales {
            category: category.to_string(),
            total,
        })
        .collect()
}

// =============================================================================
// Sales Ledger
// =============================================================================

/// A sale joined with the number of the invoice it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleEntry {
    pub sale: Sale,
    /// `None` when the invoice is missing from the store.
    pub invoice_number: Option<String>,
}

impl SaleEntry {
    /// The invoice number, or "Unknown".
    pub fn invoice_label(&self) -> &str {
        self.invoice_number.as_deref().unwrap_or(UNKNOWN_INVOICE)
    }
}

/// Joins sales with invoice numbers, keeping the order of `sales`.
pub fn ledger(sales: Vec<Sale>, invoices: &[Invoice]) -> Vec<SaleEntry> {
    let numbers: HashMap<&str, &str> = invoices
        .iter()
        .map(|i| (i.id.as_str(), i.invoice_number.as_str()))
        .collect();

    sales
        .into_iter()
        .map(|sale| {
            let invoice_number = numbers.get(sale.invoice_id.as_str()).map(|n| n.to_string());
            SaleEntry { sale, invoice_number }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
