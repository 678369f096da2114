//! Currency formatting for comparison results.
//!
//! This is the only place amounts are rounded.  The comparator keeps
//! full precision; a [`CurrencyFormatter`] turns a [`Decimal`] into a
//! display string.

use crate::models::{ComparisonResult, Outcome};
use rust_decimal::{Decimal, RoundingStrategy};

/// Renders a monetary amount for display.
///
/// Formatters must be `Send + Sync` so that a single instance can be
/// shared by the HTTP handlers.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: Decimal) -> String;
}

/// US dollars with comma grouping, e.g. `$37,600` or `-$1,234.50`.
#[derive(Debug, Clone, Copy)]
pub struct UsdFormatter {
    /// Digits after the decimal point.
    pub decimals: u32,
}

impl Default for UsdFormatter {
    fn default() -> Self {
        Self { decimals: 0 }
    }
}

impl CurrencyFormatter for UsdFormatter {
    fn format_amount(&self, amount: Decimal) -> String {
        let rounded =
            amount.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = format!("{:.*}", self.decimals as usize, rounded.abs());
        let (whole, frac) = match digits.split_once('.') {
            Some((whole, frac)) => (whole, Some(frac)),
            None => (digits.as_str(), None),
        };
        let mut out = format!("{sign}${}", group_thousands(whole));
        if let Some(frac) = frac {
            out.push('.');
            out.push_str(frac);
        }
        out
    }
}

fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// One-line description of a result, covering both the savings and
/// the added-cost case.
pub fn summarize(result: &ComparisonResult, formatter: &dyn CurrencyFormatter) -> String {
    match result.outcome() {
        Outcome::Savings(amount) => {
            format!("Save {} per year", formatter.format_amount(amount))
        }
        Outcome::AddedCost(amount) => {
            format!("Costs {} more per year", formatter.format_amount(amount))
        }
        Outcome::BreakEven => "Same cost per year".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BillingCadence;

    fn result_with_delta(delta: i64) -> ComparisonResult {
        ComparisonResult {
            team_size: 1,
            billing_cadence: BillingCadence::Annual,
            current_annual_total: Decimal::ZERO,
            platform_annual_total: Decimal::ZERO,
            annual_delta: Decimal::from(delta),
            breakdown: Vec::new(),
        }
    }

    #[test]
    fn groups_whole_dollars() {
        let usd = UsdFormatter::default();
        assert_eq!(usd.format_amount(Decimal::from(19_900)), "$19,900");
        assert_eq!(usd.format_amount(Decimal::from(1_234_567)), "$1,234,567");
        assert_eq!(usd.format_amount(Decimal::from(999)), "$999");
        assert_eq!(usd.format_amount(Decimal::ZERO), "$0");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let cents = UsdFormatter { decimals: 2 };
        assert_eq!(cents.format_amount(Decimal::new(1_234_505, 3)), "$1,234.51");
        assert_eq!(cents.format_amount(Decimal::new(12345, 1)), "$1,234.50");
        let whole = UsdFormatter::default();
        assert_eq!(whole.format_amount(Decimal::new(25, 1)), "$3");
        assert_eq!(whole.format_amount(Decimal::new(-3005, 1)), "-$301");
    }

    #[test]
    fn summary_covers_both_signs() {
        let usd = UsdFormatter::default();
        assert_eq!(summarize(&result_with_delta(19_900), &usd), "Save $19,900 per year");
        assert_eq!(summarize(&result_with_delta(-300), &usd), "Costs $300 more per year");
        assert_eq!(summarize(&result_with_delta(0), &usd), "Same cost per year");
    }
}
