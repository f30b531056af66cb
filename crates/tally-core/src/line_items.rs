//! # Line Item Store
//!
//! The ordered line items of one draft invoice.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Line Item Operations                                 │
//! │                                                                         │
//! │  Operator Action          Method                  Change                │
//! │  ───────────────          ──────                  ──────                │
//! │                                                                         │
//! │  Pick product ───────────► add() ───────────────► push or qty += 1      │
//! │                                                                         │
//! │  Edit quantity ──────────► set_quantity() ──────► qty, line total       │
//! │                                                                         │
//! │  Edit price ─────────────► set_unit_price() ────► price, line total     │
//! │                                                                         │
//! │  Edit tax ───────────────► set_tax_rate() ──────► rate only             │
//! │                                                                         │
//! │  Click remove ───────────► remove() ────────────► items.remove(i)       │
//! │                                                                         │
//! │  Invoice saved ──────────► clear() ─────────────► items.clear()         │
//! │                                                                         │
//! │  NOTE: setters take the raw text the operator typed. Input that does   │
//! │        not parse is ignored and the row stays as it was.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one row per product (adding the same product bumps quantity)
//! - Every row satisfies `line_total == quantity × unit_price`
//! - Quantity is always > 0
//! - Subtotal, tax and total fit in `i64` cents under either tax mode
//!
//! Totals are not cached here; call [`crate::totals::Totals::compute`]
//! after each mutation.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::totals::Totals;
use crate::types::{InvoiceLineItem, Product, TaxMode, TaxRate};
use crate::validation::parse_quantity;

/// Ordered line items of a draft invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItems {
    items: Vec<InvoiceLineItem>,
}

impl LineItems {
    /// Creates an empty store.
    pub fn new() -> Self {
        LineItems { items: Vec::new() }
    }

    /// Adds a product, merging into its existing row if present.
    ///
    /// ## Behavior
    /// - Product already present: quantity + 1, line total recomputed
    /// - Otherwise: new row with quantity 1, price and rate copied
    ///
    /// ## Returns
    /// The index of the affected row, or `None` if the invoice totals
    /// would no longer fit in the cent range (nothing changes then).
    pub fn add(&mut self, product: &Product) -> Option<usize> {
        if let Some(index) = self.items.iter().position(|i| i.product_id == product.id) {
            let edited = self.edit(index, |item| {
                let price = item.unit_price();
                match item.quantity.checked_add(1) {
                    Some(quantity) => reprice(item, quantity, price),
                    None => false,
                }
            });
            return edited.then_some(index);
        }

        self.items.push(InvoiceLineItem::from_product(product));
        if !within_range(&self.items) {
            self.items.pop();
            return None;
        }
        Some(self.items.len() - 1)
    }

    /// Sets the quantity of the row at `index` from operator text.
    ///
    /// Ignored (returns `false`) when the text is not a positive integer,
    /// the index is out of range, or the totals would overflow.
    pub fn set_quantity(&mut self, index: usize, input: &str) -> bool {
        let Ok(quantity) = parse_quantity(input) else {
            return false;
        };
        self.edit(index, |item| {
            let price = item.unit_price();
            reprice(item, quantity, price)
        })
    }

    /// Sets the unit price of the row at `index` from operator text.
    ///
    /// Ignored (returns `false`) for negative or non-numeric text.
    pub fn set_unit_price(&mut self, index: usize, input: &str) -> bool {
        let Some(price) = Money::parse(input) else {
            return false;
        };
        self.edit(index, |item| {
            let quantity = item.quantity;
            reprice(item, quantity, price)
        })
    }

    /// Sets the tax rate of the row at `index` from operator text.
    ///
    /// Does not touch the line total.
    pub fn set_tax_rate(&mut self, index: usize, input: &str) -> bool {
        let Some(rate) = TaxRate::parse(input) else {
            return false;
        };
        self.edit(index, |item| {
            item.tax_rate_bps = rate.bps();
            true
        })
    }

    /// Removes the row at `index`, shifting later rows up.
    pub fn remove(&mut self, index: usize) -> Option<InvoiceLineItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Empties the store.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[InvoiceLineItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&InvoiceLineItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Applies `change` to a copy of row `index` and keeps it only if the
    /// change succeeds and the totals still fit.
    fn edit<F>(&mut self, index: usize, change: F) -> bool
    where
        F: FnOnce(&mut InvoiceLineItem) -> bool,
    {
        let Some(mut row) = self.items.get(index).cloned() else {
            return false;
        };
        if !change(&mut row) {
            return false;
        }

        let previous = std::mem::replace(&mut self.items[index], row);
        if !within_range(&self.items) {
            self.items[index] = previous;
            return false;
        }
        true
    }
}

/// Rows are non-negative and rates never lower a total, so the taxed
/// figures bound the untaxed ones.
fn within_range(items: &[InvoiceLineItem]) -> bool {
    Totals::checked(items, TaxMode::Taxed).is_some()
}

/// Applies a new quantity and price together, keeping the row untouched
/// if the line total would overflow.
fn reprice(item: &mut InvoiceLineItem, quantity: i64, price: Money) -> bool {
    match price.checked_mul_quantity(quantity) {
        Some(total) => {
            item.quantity = quantity;
            item.unit_price_cents = price.cents();
            item.line_total_cents = total.cents();
            true
        }
        None => false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(id: &str, price_cents: i64, tax_rate_bps: u32) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            category: "General".to_string(),
            sku: format!("SKU-{}", id),
            price_cents,
            tax_rate_bps,
        }
    }

    #[test]
    fn test_add_same_product_merges() {
        let pen = product("pen", 1000, 1000);
        let mut items = LineItems::new();

        assert_eq!(items.add(&pen), Some(0));
        assert_eq!(items.add(&pen), Some(0));

        assert_eq!(items.len(), 1);
        let row = items.get(0).unwrap();
        assert_eq!(row.quantity, 2);
        assert_eq!(row.line_total_cents, 2000);
    }

    #[test]
    fn test_add_different_products_appends_in_order() {
        let mut items = LineItems::new();
        items.add(&product("a", 100, 0));
        items.add(&product("b", 200, 0));
        items.add(&product("a", 100, 0));

        let ids: Vec<_> = items.as_slice().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(items.get(0).unwrap().quantity, 2);
    }

    #[test]
    fn test_set_quantity_recomputes_line_total() {
        let mut items = LineItems::new();
        items.add(&product("a", 250, 0));

        assert!(items.set_quantity(0, "4"));
        let row = items.get(0).unwrap();
        assert_eq!(row.quantity, 4);
        assert_eq!(row.line_total_cents, 1000);
    }

    #[test]
    fn test_set_quantity_rejects_bad_input() {
        let mut items = LineItems::new();
        items.add(&product("a", 250, 0));
        let before = items.clone();

        for input in ["0", "-1", "abc", "", "1.5"] {
            assert!(!items.set_quantity(0, input), "accepted {:?}", input);
        }
        assert_eq!(items, before);
    }

    #[test]
    fn test_set_quantity_out_of_range_is_noop() {
        let mut items = LineItems::new();
        assert!(!items.set_quantity(3, "2"));
        assert!(!items.set_unit_price(3, "2"));
        assert!(!items.set_tax_rate(3, "2"));
        assert!(items.remove(0).is_none());
    }

    #[test]
    fn test_set_unit_price() {
        let mut items = LineItems::new();
        items.add(&product("a", 250, 0));
        items.set_quantity(0, "3");

        assert!(items.set_unit_price(0, "10.5"));
        assert_eq!(items.get(0).unwrap().unit_price_cents, 1050);
        assert_eq!(items.get(0).unwrap().line_total_cents, 3150);

        assert!(!items.set_unit_price(0, "-2"));
        assert!(!items.set_unit_price(0, "NaN"));
        assert!(!items.set_unit_price(0, "ten"));
        assert_eq!(items.get(0).unwrap().unit_price_cents, 1050);
    }

    #[test]
    fn test_set_tax_rate_keeps_line_total() {
        let mut items = LineItems::new();
        items.add(&product("a", 1000, 0));

        assert!(items.set_tax_rate(0, "12.5"));
        let row = items.get(0).unwrap();
        assert_eq!(row.tax_rate_bps, 1250);
        assert_eq!(row.line_total_cents, 1000);

        assert!(!items.set_tax_rate(0, "-1"));
        assert_eq!(items.get(0).unwrap().tax_rate_bps, 1250);
    }

    #[test]
    fn test_overflowing_edit_is_rejected() {
        let mut items = LineItems::new();
        items.add(&product("a", i64::MAX / 2, 0));

        assert!(!items.set_quantity(0, "3"));
        assert_eq!(items.get(0).unwrap().quantity, 1);
    }

    #[test]
    fn test_edit_that_overflows_invoice_totals_is_rejected() {
        let mut items = LineItems::new();
        items.add(&product("a", 100, 1000));
        items.add(&product("b", 100, 1000));

        assert!(items.set_unit_price(0, "50000000000000000"));
        assert!(!items.set_unit_price(1, "50000000000000000"));
        assert_eq!(items.get(1).unwrap().unit_price_cents, 100);

        let totals = Totals::compute(items.as_slice(), TaxMode::Taxed);
        assert_eq!(totals.total, totals.subtotal + totals.tax);
        assert!(Totals::checked(items.as_slice(), TaxMode::Taxed).is_some());
    }

    #[test]
    fn test_add_or_rate_change_that_overflows_totals_is_rejected() {
        let mut items = LineItems::new();
        items.add(&product("a", 9_000_000_000_000_000_000, 0));

        assert_eq!(items.add(&product("b", 300_000_000_000_000_000, 0)), None);
        assert_eq!(items.len(), 1);

        assert!(!items.set_tax_rate(0, "10"));
        assert_eq!(items.get(0).unwrap().tax_rate_bps, 0);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut items = LineItems::new();
        items.add(&product("a", 100, 0));
        items.add(&product("b", 200, 0));
        items.add(&product("c", 300, 0));

        let removed = items.remove(1).unwrap();
        assert_eq!(removed.product_id, "b");
        assert_eq!(items.get(1).unwrap().product_id, "c");

        items.clear();
        assert!(items.is_empty());
    }

    // =========================================================================
    // Properties
    // =========================================================================

    #[derive(Debug, Clone)]
    enum Edit {
        Add(usize),
        Quantity(usize, String),
        Price(usize, String),
        Rate(usize, String),
        Remove(usize),
    }

    fn arb_text() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u64..1_000_000).prop_map(|n| n.to_string()),
            (0u64..100_000, 0u8..100).prop_map(|(a, b)| format!("{}.{:02}", a, b)),
            Just("-3".to_string()),
            Just("abc".to_string()),
            Just(String::new()),
            Just("99999999999999999".to_string()),
        ]
    }

    fn arb_edit() -> impl Strategy<Value = Edit> {
        prop_oneof![
            (0usize..5).prop_map(Edit::Add),
            (0usize..6, arb_text()).prop_map(|(i, t)| Edit::Quantity(i, t)),
            (0usize..6, arb_text()).prop_map(|(i, t)| Edit::Price(i, t)),
            (0usize..6, arb_text()).prop_map(|(i, t)| Edit::Rate(i, t)),
            (0usize..6).prop_map(Edit::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_edits_keep_rows_consistent(edits in prop::collection::vec(arb_edit(), 0..60)) {
            let catalog: Vec<_> = (0..5)
                .map(|n| product(&format!("p{}", n), 150 * (n as i64 + 1), 500 * n as u32))
                .collect();
            let mut items = LineItems::new();

            for edit in edits {
                match edit {
                    Edit::Add(p) => {
                        let before = items
                            .as_slice()
                            .iter()
                            .find(|row| row.product_id == catalog[p].id)
                            .map(|row| row.quantity);
                        let index = items.add(&catalog[p]);
                        if let (Some(index), Some(quantity)) = (index, before) {
                            prop_assert_eq!(items.get(index).unwrap().quantity, quantity + 1);
                        }
                    }
                    Edit::Quantity(i, text) => { items.set_quantity(i, &text); }
                    Edit::Price(i, text) => { items.set_unit_price(i, &text); }
                    Edit::Rate(i, text) => { items.set_tax_rate(i, &text); }
                    Edit::Remove(i) => { items.remove(i); }
                }

                let mut ids: Vec<_> = items.as_slice().iter().map(|i| i.product_id.clone()).collect();
                ids.sort();
                ids.dedup();
                prop_assert_eq!(ids.len(), items.len());

                for row in items.as_slice() {
                    prop_assert!(row.quantity > 0);
                    prop_assert!(row.unit_price_cents >= 0);
                    prop_assert_eq!(row.line_total_cents, row.quantity * row.unit_price_cents);
                }

                for mode in [TaxMode::Taxed, TaxMode::Untaxed] {
                    let totals = Totals::checked(items.as_slice(), mode);
                    prop_assert!(totals.is_some());
                    let totals = totals.unwrap();
                    prop_assert_eq!(totals.total, totals.subtotal + totals.tax);
                }
            }
        }
    }
}
