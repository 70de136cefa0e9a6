//! Monetary rounding and formatting.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Every value (line total, per-line GST, subtotal, GST total) is rounded to
//! the cent independently, *before* aggregation: totals are sums of
//! already-rounded line values, not round-after-sum.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// GST is extracted from a GST-inclusive price by dividing by 11.
const GST_DIVISOR: Decimal = dec!(11);

/// Round to 2 decimal places, half away from zero at the cent.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// GST component embedded in a GST-inclusive line total.
pub fn gst_component(line_total: Decimal) -> Decimal {
    round_money(line_total / GST_DIVISOR)
}

/// Format an amount with a currency symbol and thousands grouping,
/// e.g. `format_currency(dec!(1234.5), "$")` → `"$1,234.50"`.
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = round_money(amount);
    let negative = rounded.is_sign_negative();
    let cents = (rounded.abs() * dec!(100)).round().to_i128().unwrap_or_default();

    let whole_digits = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole_digits.len() + whole_digits.len() / 3);
    for (i, ch) in whole_digits.chars().enumerate() {
        if i > 0 && (whole_digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_money(dec!(2.675)), dec!(2.68));
        assert_eq!(round_money(dec!(2.674)), dec!(2.67));
        assert_eq!(round_money(dec!(-2.675)), dec!(-2.68));
        assert_eq!(round_money(dec!(0.005)), dec!(0.01));
    }

    #[test]
    fn rounding_is_idempotent() {
        assert_eq!(round_money(round_money(dec!(2.675))), dec!(2.68));
        assert_eq!(round_money(dec!(100)), dec!(100));
    }

    #[test]
    fn gst_is_one_eleventh() {
        assert_eq!(gst_component(dec!(110)), dec!(10.00));
        assert_eq!(gst_component(dec!(500)), dec!(45.45));
        assert_eq!(gst_component(dec!(0)), dec!(0));
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(dec!(1234.5), "$"), "$1,234.50");
        assert_eq!(format_currency(dec!(0.5), "$"), "$0.50");
        assert_eq!(format_currency(dec!(1000000), "$"), "$1,000,000.00");
        assert_eq!(format_currency(dec!(-45.455), "$"), "-$45.46");
        assert_eq!(format_currency(dec!(999.999), "$"), "$1,000.00");
    }
}
