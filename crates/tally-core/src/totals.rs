//! # Totals Calculator
//!
//! Pure function of (line items, tax mode) → (subtotal, tax, total).
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal = Σ line_total                                                │
//! │                                                                         │
//! │  tax      = Taxed:   round( Σ line_total × bps / 10000 )                │
//! │             Untaxed: 0                                                  │
//! │                                                                         │
//! │  total    = subtotal + tax                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tax is summed exactly in cent-basis-points and rounded once, so a long
//! invoice never drifts by a cent per line.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{round_basis_points, Money};
use crate::types::{InvoiceLineItem, TaxMode};

/// Computed invoice figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl Totals {
    /// Computes totals for the given items.
    ///
    /// Items held in a [`crate::LineItems`] never overflow here, since every
    /// edit that would push the taxed total past the `i64` cent range is
    /// refused. For items from anywhere else use [`Totals::checked`].
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::totals::Totals;
    /// use tally_core::TaxMode;
    ///
    /// let totals = Totals::compute(&[], TaxMode::Taxed);
    /// assert!(totals.total.is_zero());
    /// ```
    pub fn compute(items: &[InvoiceLineItem], mode: TaxMode) -> Totals {
        let (subtotal, tax) = sums(items, mode);
        Totals {
            subtotal: saturate(subtotal),
            tax: saturate(tax),
            total: saturate(subtotal + tax),
        }
    }

    /// Computes totals, or `None` if any figure leaves the `i64` cent range.
    pub fn checked(items: &[InvoiceLineItem], mode: TaxMode) -> Option<Totals> {
        let (subtotal, tax) = sums(items, mode);
        Some(Totals {
            subtotal: Money::from_cents(i64::try_from(subtotal).ok()?),
            tax: Money::from_cents(i64::try_from(tax).ok()?),
            total: Money::from_cents(i64::try_from(subtotal + tax).ok()?),
        })
    }
}

fn saturate(cents: i128) -> Money {
    let clamped = cents.clamp(i128::from(i64::MIN), i128::from(i64::MAX));
    Money::from_cents(clamped as i64)
}

/// Exact (subtotal, tax) in `i128` cents.
fn sums(items: &[InvoiceLineItem], mode: TaxMode) -> (i128, i128) {
    let subtotal: i128 = items.iter().map(|i| i128::from(i.line_total_cents)).sum();

    let tax = match mode {
        TaxMode::Taxed => round_basis_points(
            items
                .iter()
                .map(|i| i128::from(i.line_total_cents) * i128::from(i.tax_rate_bps))
                .sum(),
        ),
        TaxMode::Untaxed => 0,
    };

    (subtotal, tax)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(quantity: i64, unit_price_cents: i64, tax_rate_bps: u32) -> InvoiceLineItem {
        InvoiceLineItem {
            product_id: format!("p-{}-{}", quantity, unit_price_cents),
            name: "Item".to_string(),
            quantity,
            unit_price_cents,
            tax_rate_bps,
            line_total_cents: quantity * unit_price_cents,
        }
    }

    fn sample() -> Vec<InvoiceLineItem> {
        vec![item(2, 1000, 1000), item(1, 500, 0)]
    }

    #[test]
    fn test_taxed_scenario() {
        let totals = Totals::compute(&sample(), TaxMode::Taxed);
        assert_eq!(totals.subtotal, Money::from_cents(2500));
        assert_eq!(totals.tax, Money::from_cents(200));
        assert_eq!(totals.total, Money::from_cents(2700));
    }

    #[test]
    fn test_untaxed_scenario_ignores_rates() {
        let totals = Totals::compute(&sample(), TaxMode::Untaxed);
        assert_eq!(totals.subtotal, Money::from_cents(2500));
        assert_eq!(totals.tax, Money::zero());
        assert_eq!(totals.total, Money::from_cents(2500));
    }

    #[test]
    fn test_zero_price_item() {
        let totals = Totals::compute(&[item(1, 0, 1800)], TaxMode::Taxed);
        assert!(totals.subtotal.is_zero());
        assert!(totals.tax.is_zero());
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_tax_rounded_once_not_per_line() {
        // 3 lines of $0.10 at 5% = 0.5¢ each. Per-line rounding would give 3¢.
        let items = vec![item(1, 10, 500), item(1, 10, 500), item(1, 10, 500)];
        let totals = Totals::compute(&items, TaxMode::Taxed);
        assert_eq!(totals.tax, Money::from_cents(2));
        assert_eq!(totals.total, Money::from_cents(32));
    }

    #[test]
    fn test_checked_rejects_out_of_range_totals() {
        let items = vec![
            item(1, 4_500_000_000_000_000_000, 1000),
            item(1, 4_500_000_000_000_000_000, 1000),
        ];
        assert!(Totals::checked(&items, TaxMode::Untaxed).is_some());
        assert!(Totals::checked(&items, TaxMode::Taxed).is_none());

        let fits = Totals::checked(&items[..1], TaxMode::Taxed).unwrap();
        assert_eq!(fits, Totals::compute(&items[..1], TaxMode::Taxed));
        assert_eq!(fits.total, fits.subtotal + fits.tax);
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn arb_item() -> impl Strategy<Value = InvoiceLineItem> {
        (1i64..=10_000, 0i64..=10_000_000, 0u32..=5_000)
            .prop_map(|(quantity, price, bps)| item(quantity, price, bps))
    }

    fn arb_mode() -> impl Strategy<Value = TaxMode> {
        prop_oneof![Just(TaxMode::Taxed), Just(TaxMode::Untaxed)]
    }

    proptest! {
        #[test]
        fn prop_subtotal_is_sum_of_quantity_times_price(
            items in prop::collection::vec(arb_item(), 0..40),
            mode in arb_mode(),
        ) {
            let totals = Totals::compute(&items, mode);
            let expected: i64 = items.iter().map(|i| i.quantity * i.unit_price_cents).sum();
            prop_assert_eq!(totals.subtotal.cents(), expected);
        }

        #[test]
        fn prop_total_is_subtotal_plus_tax(
            items in prop::collection::vec(arb_item(), 0..40),
            mode in arb_mode(),
        ) {
            let totals = Totals::compute(&items, mode);
            prop_assert_eq!(totals.total, totals.subtotal + totals.tax);
            prop_assert_eq!(Totals::checked(&items, mode), Some(totals));
            prop_assert!(totals.tax.cents() >= 0);
        }

        #[test]
        fn prop_untaxed_mode_has_no_tax(items in prop::collection::vec(arb_item(), 0..40)) {
            let totals = Totals::compute(&items, TaxMode::Untaxed);
            prop_assert!(totals.tax.is_zero());
            prop_assert_eq!(totals.total, totals.subtotal);
        }

        #[test]
        fn prop_tax_within_half_cent_of_exact(items in prop::collection::vec(arb_item(), 1..40)) {
            let totals = Totals::compute(&items, TaxMode::Taxed);
            let exact: i128 = items
                .iter()
                .map(|i| i128::from(i.line_total_cents) * i128::from(i.tax_rate_bps))
                .sum();
            let diff = (i128::from(totals.tax.cents()) * 10_000 - exact).abs();
            prop_assert!(diff <= 5_000);
        }
    }
}
