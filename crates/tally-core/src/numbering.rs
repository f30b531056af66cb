//! Invoice number formatting.
//!
//! The allocator in tally-store decides which of these to use; this module
//! only knows how numbers look.

/// Prefix shared by every invoice number.
pub const INVOICE_PREFIX: &str = "INV-";

/// The number following `count` persisted invoices: `INV-00001` for an
/// empty store.
///
/// Counts past 99999 simply grow wider.
///
/// ```rust
/// use tally_core::numbering::sequential_number;
///
/// assert_eq!(sequential_number(0), "INV-00001");
/// assert_eq!(sequential_number(41), "INV-00042");
/// ```
pub fn sequential_number(count: u64) -> String {
    format!("{}{:05}", INVOICE_PREFIX, count.saturating_add(1))
}

/// Number used when the store cannot be counted: the last five digits of
/// the given Unix time in milliseconds.
///
/// Not guaranteed unique.
pub fn fallback_number(unix_millis: i64) -> String {
    format!("{}{:05}", INVOICE_PREFIX, unix_millis.rem_euclid(100_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_number_padding() {
        assert_eq!(sequential_number(0), "INV-00001");
        assert_eq!(sequential_number(9), "INV-00010");
        assert_eq!(sequential_number(99_999), "INV-100000");
    }

    #[test]
    fn test_fallback_number_uses_last_five_digits() {
        assert_eq!(fallback_number(1_700_000_012_345), "INV-12345");
        assert_eq!(fallback_number(1_700_000_000_042), "INV-00042");
        assert!(fallback_number(-1).starts_with(INVOICE_PREFIX));
    }
}
