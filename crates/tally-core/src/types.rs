//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Invoice      │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (store)     │   │  id (store)     │   │  id (store)     │       │
//! │  │  sku (business) │   │  invoice_number │   │  invoice_id     │       │
//! │  │  name, category │   │  items[]        │   │  total_amount   │       │
//! │  │  price_cents    │   │  totals         │   │  date           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │    TaxMode      │   │    Purchase     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Taxed          │   │  product ref    │       │
//! │  │  1800 = 18%     │   │  Untaxed        │   │  total_cost     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored vs New
//! Every persisted entity comes in two shapes: `NewX` is what the engine
//! hands to the store, `X` is what comes back with the store-assigned `id`.
//! Both reject unknown fields so a malformed document never decodes.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};
use crate::money::{parse_hundredths, Money};
use crate::totals::Totals;
use crate::validation;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18%, 825 bps = 8.25%
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Parses a percentage as typed by a user (`"18"`, `"8.25"`).
    ///
    /// Negative, non-numeric and non-finite input is rejected.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::types::TaxRate;
    ///
    /// assert_eq!(TaxRate::parse("8.25"), Some(TaxRate::from_bps(825)));
    /// assert_eq!(TaxRate::parse("-5"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        parse_hundredths(input)
            .and_then(|bps| u32::try_from(bps).ok())
            .map(TaxRate)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

/// Displays as a percentage without trailing zeros: `18%`, `8.25%`, `7.5%`.
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let fraction = self.0 % 100;
        match fraction {
            0 => write!(f, "{}%", whole),
            n if n % 10 == 0 => write!(f, "{}.{}%", whole, n / 10),
            n => write!(f, "{}.{:02}%", whole, n),
        }
    }
}

// =============================================================================
// Timestamp
// =============================================================================

/// Opaque point in time as stored in documents.
///
/// Convertible to and from a calendar date. A calendar date maps to
/// midnight UTC of that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current instant.
    pub fn now() -> Self {
        Timestamp(Utc::now())
    }

    /// Midnight UTC of the given calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Timestamp(Utc.from_utc_datetime(&date.and_time(NaiveTime::default())))
    }

    /// The calendar date (UTC) of this instant.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// The underlying UTC datetime.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Timestamp(value)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: String,

    /// Display name shown in search results and on invoices.
    pub name: String,

    /// Free-form category, also matched by search.
    pub category: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Tax rate in basis points (1800 = 18%).
    pub tax_rate_bps: u32,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

/// Catalog fields for creating or editing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub sku: String,
    pub price_cents: i64,
    pub tax_rate_bps: u32,
}

impl NewProduct {
    /// Checks the catalog rules for a product.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_product_name(&self.name)?;
        validation::validate_category(&self.category)?;
        validation::validate_sku(&self.sku)?;
        validation::validate_price_cents(self.price_cents)?;
        Ok(())
    }

    /// Attaches the store-assigned id.
    pub fn with_id(self, id: impl Into<String>) -> Product {
        Product {
            id: id.into(),
            name: self.name,
            category: self.category,
            sku: self.sku,
            price_cents: self.price_cents,
            tax_rate_bps: self.tax_rate_bps,
        }
    }
}

// =============================================================================
// Tax Mode
// =============================================================================

/// Whether an invoice's totals include a computed tax amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// Tax is computed per line from each line's rate.
    #[default]
    Taxed,
    /// No tax, whatever the line rates say.
    Untaxed,
}

impl fmt::Display for TaxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxMode::Taxed => write!(f, "taxed"),
            TaxMode::Untaxed => write!(f, "untaxed"),
        }
    }
}

impl FromStr for TaxMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "taxed" | "gst" => Ok(TaxMode::Taxed),
            "untaxed" | "non-gst" | "non_gst" => Ok(TaxMode::Untaxed),
            _ => Err(ValidationError::InvalidFormat {
                field: "tax mode".to_string(),
                reason: "must be one of: taxed, untaxed".to_string(),
            }),
        }
    }
}

// =============================================================================
// Invoice Line Item
// =============================================================================

/// One product entry on an invoice.
///
/// Uses the snapshot pattern: name, price and tax rate are copied from the
/// product when the line is created, so editing or deleting the product
/// later never changes a past invoice.
///
/// ## Invariant
/// `line_total_cents == quantity * unit_price_cents`. Tax is NOT part of
/// the line total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct InvoiceLineItem {
    /// Product this line was created from.
    pub product_id: String,
    /// Product name at time of adding (frozen).
    pub name: String,
    /// Positive quantity.
    pub quantity: i64,
    /// Unit price in cents, editable after adding.
    pub unit_price_cents: i64,
    /// Tax rate in basis points, editable after adding.
    pub tax_rate_bps: u32,
    /// `quantity × unit price`, before tax.
    pub line_total_cents: i64,
}

impl InvoiceLineItem {
    /// Creates a line with quantity 1 from a product.
    pub fn from_product(product: &Product) -> Self {
        InvoiceLineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            quantity: 1,
            unit_price_cents: product.price_cents,
            tax_rate_bps: product.tax_rate_bps,
            line_total_cents: product.price_cents,
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }

    /// Tax shown next to this line, rounded to the cent.
    pub fn tax(&self) -> Money {
        self.line_total().calculate_tax(self.tax_rate())
    }

    /// True if quantity is positive, the unit price is not negative, and
    /// the stored line total matches quantity × unit price.
    pub fn is_consistent(&self) -> bool {
        self.quantity > 0
            && self.unit_price_cents >= 0
            && self
                .unit_price()
                .checked_mul_quantity(self.quantity)
                .map(|total| total.cents() == self.line_total_cents)
                .unwrap_or(false)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A persisted invoice. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct Invoice {
    /// Store-assigned identifier.
    pub id: String,
    /// Human-readable number, e.g. `INV-00042`.
    pub invoice_number: String,
    /// Issue date.
    #[ts(as = "String")]
    pub date: Timestamp,
    pub client_name: String,
    /// Free text, may span several lines.
    #[serde(default)]
    pub client_address: String,
    pub items: Vec<InvoiceLineItem>,
    pub subtotal_cents: i64,
    pub tax_amount_cents: i64,
    pub total_amount_cents: i64,
    pub tax_mode: TaxMode,
    #[serde(default)]
    pub notes: String,
}

impl Invoice {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax_amount(&self) -> Money {
        Money::from_cents(self.tax_amount_cents)
    }

    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    /// Checks the stored figures against the items they were derived from.
    ///
    /// ## Checks
    /// - every line has a positive quantity and a non-negative unit price
    /// - every line total equals quantity × unit price
    /// - subtotal, tax and total equal a fresh [`Totals::checked`]
    pub fn verify(&self) -> Result<(), CoreError> {
        if let Some(line) = self.items.iter().position(|item| !item.is_consistent()) {
            return Err(CoreError::InconsistentInvoice {
                invoice_number: self.invoice_number.clone(),
                reason: format!(
                    "line {} needs quantity > 0, unit price >= 0 and total = quantity × unit price",
                    line + 1
                ),
            });
        }

        let Some(expected) = Totals::checked(&self.items, self.tax_mode) else {
            return Err(CoreError::InconsistentInvoice {
                invoice_number: self.invoice_number.clone(),
                reason: "totals exceed the cent range".to_string(),
            });
        };
        let stored = Totals {
            subtotal: self.subtotal(),
            tax: self.tax_amount(),
            total: self.total_amount(),
        };

        if expected != stored {
            return Err(CoreError::InconsistentInvoice {
                invoice_number: self.invoice_number.clone(),
                reason: format!(
                    "stored totals {}/{}/{} do not match items ({}/{}/{})",
                    stored.subtotal, stored.tax, stored.total,
                    expected.subtotal, expected.tax, expected.total
                ),
            });
        }

        Ok(())
    }
}

/// An invoice ready to be written, produced by committing a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct NewInvoice {
    pub invoice_number: String,
    #[ts(as = "String")]
    pub date: Timestamp,
    pub client_name: String,
    pub client_address: String,
    pub items: Vec<InvoiceLineItem>,
    pub subtotal_cents: i64,
    pub tax_amount_cents: i64,
    pub total_amount_cents: i64,
    pub tax_mode: TaxMode,
    pub notes: String,
}

impl NewInvoice {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    /// Attaches the store-assigned id.
    pub fn with_id(self, id: impl Into<String>) -> Invoice {
        Invoice {
            id: id.into(),
            invoice_number: self.invoice_number,
            date: self.date,
            client_name: self.client_name,
            client_address: self.client_address,
            items: self.items,
            subtotal_cents: self.subtotal_cents,
            tax_amount_cents: self.tax_amount_cents,
            total_amount_cents: self.total_amount_cents,
            tax_mode: self.tax_mode,
            notes: self.notes,
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// Revenue record derived from a saved invoice. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// Invoice this sale was derived from.
    pub invoice_id: String,
    /// Copy of the invoice total at creation time.
    pub total_amount_cents: i64,
    /// Creation time, independent of the invoice issue date.
    #[ts(as = "String")]
    pub date: Timestamp,
}

impl Sale {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

/// A sale ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct NewSale {
    pub invoice_id: String,
    pub total_amount_cents: i64,
    #[ts(as = "String")]
    pub date: Timestamp,
}

impl NewSale {
    /// The sale for a just-written invoice.
    pub fn for_invoice(invoice_id: impl Into<String>, total: Money, date: Timestamp) -> Self {
        NewSale {
            invoice_id: invoice_id.into(),
            total_amount_cents: total.cents(),
            date,
        }
    }

    /// Attaches the store-assigned id.
    pub fn with_id(self, id: impl Into<String>) -> Sale {
        Sale {
            id: id.into(),
            invoice_id: self.invoice_id,
            total_amount_cents: self.total_amount_cents,
            date: self.date,
        }
    }
}

// =============================================================================
// Purchase
// =============================================================================

/// Stock bought from a supplier. Only feeds profit reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct Purchase {
    pub id: String,
    pub product_id: String,
    /// Product name at time of purchase (frozen).
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// `quantity × unit price`, computed before submission.
    pub total_cost_cents: i64,
    #[ts(as = "String")]
    pub purchase_date: Timestamp,
    pub supplier_name: String,
}

impl Purchase {
    #[inline]
    pub fn total_cost(&self) -> Money {
        Money::from_cents(self.total_cost_cents)
    }
}

/// A purchase ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct NewPurchase {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cost_cents: i64,
    #[ts(as = "String")]
    pub purchase_date: Timestamp,
    pub supplier_name: String,
}

impl NewPurchase {
    /// Builds a purchase and computes its total cost.
    ///
    /// ## Rules
    /// - quantity must be positive
    /// - unit price must be non-negative
    /// - supplier name is required
    pub fn new(
        product: &Product,
        quantity: i64,
        unit_price: Money,
        purchase_date: NaiveDate,
        supplier_name: &str,
    ) -> Result<Self, ValidationError> {
        validation::validate_quantity(quantity)?;
        validation::validate_price_cents(unit_price.cents())?;
        validation::validate_supplier_name(supplier_name)?;

        let total_cost = unit_price
            .checked_mul_quantity(quantity)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "total cost".to_string(),
                min: 0,
                max: i64::MAX,
            })?;

        Ok(NewPurchase {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_price_cents: unit_price.cents(),
            total_cost_cents: total_cost.cents(),
            purchase_date: Timestamp::from_date(purchase_date),
            supplier_name: supplier_name.trim().to_string(),
        })
    }

    /// Attaches the store-assigned id.
    pub fn with_id(self, id: impl Into<String>) -> Purchase {
        Purchase {
            id: id.into(),
            product_id: self.product_id,
            product_name: self.product_name,
            quantity: self.quantity,
            unit_price_cents: self.unit_price_cents,
            total_cost_cents: self.total_cost_cents,
            purchase_date: self.purchase_date,
            supplier_name: self.supplier_name,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
