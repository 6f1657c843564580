//! Monthly income/expense series and savings rate
//!
//! Buckets are keyed by [`YearMonth`] and come out in calendar order. The
//! savings rate is computed from exact cent totals and rounded once, to two
//! decimal places, when it is produced.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::models::{Entry, EntryKind, Money, YearMonth};

/// Income and expenses for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub month: YearMonth,
    pub income: Money,
    pub expenses: Money,
}

impl MonthlyTotals {
    pub fn net(&self) -> Money {
        self.income - self.expenses
    }
}

/// A percentage held in hundredths (7000 is 70.00%)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Percent(i64);

impl Percent {
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn hundredths(&self) -> i64 {
        self.0
    }

}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let text = format!("{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs());
        f.pad(&text)
    }
}

/// Savings rate for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SavingsRate {
    pub month: YearMonth,
    pub rate: Percent,
}

/// Bucket entries by month, ascending by calendar order
pub fn group_by_month(entries: &[Entry]) -> Vec<MonthlyTotals> {
    let mut buckets: BTreeMap<YearMonth, MonthlyTotals> = BTreeMap::new();

    for entry in entries {
        let month = YearMonth::of(entry.date);
        let bucket = buckets.entry(month).or_insert(MonthlyTotals {
            month,
            income: Money::zero(),
            expenses: Money::zero(),
        });
        match entry.kind {
            EntryKind::Income => bucket.income += entry.amount,
            EntryKind::Expense => bucket.expenses += entry.amount,
        }
    }

    buckets.into_values().collect()
}

/// `(income - expenses) / income * 100` per month, zero when income is zero
///
/// The zero-income rule is a business rule: a month without income has no
/// meaningful savings rate and is charted as 0 rather than as NaN.
pub fn savings_rate_trend(buckets: &[MonthlyTotals]) -> Vec<SavingsRate> {
    buckets
        .iter()
        .map(|bucket| SavingsRate {
            month: bucket.month,
            rate: savings_rate(bucket.income, bucket.expenses),
        })
        .collect()
}

/// Savings rate for a single income/expense pair
pub fn savings_rate(income: Money, expenses: Money) -> Percent {
    if !income.is_positive() {
        return Percent::zero();
    }
    Percent(ratio_hundredths(
        (income - expenses).cents(),
        income.cents(),
    ))
}

/// `numerator / denominator * 100` in hundredths, rounded half away from zero
///
/// `denominator` must be positive. Ratios beyond `i64` saturate.
pub(crate) fn ratio_hundredths(numerator: i64, denominator: i64) -> i64 {
    let scaled = numerator as i128 * 10_000;
    let denominator = denominator as i128;
    let quotient = scaled / denominator;
    let remainder = scaled % denominator;
    let rounded = if remainder.abs() * 2 >= denominator {
        quotient + scaled.signum()
    } else {
        quotient
    };
    i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::summary::summarize;
    use crate::test_support::{entry, scenario};

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    #[test]
    fn test_scenario_months() {
        let months = group_by_month(&scenario());
        assert_eq!(
            months,
            vec![
                MonthlyTotals {
                    month: ym("2025-01"),
                    income: Money::from_cents(100_000),
                    expenses: Money::from_cents(30_000),
                },
                MonthlyTotals {
                    month: ym("2025-02"),
                    income: Money::zero(),
                    expenses: Money::from_cents(20_000),
                },
            ]
        );
    }

    #[test]
    fn test_scenario_savings_rate() {
        let rates = savings_rate_trend(&group_by_month(&scenario()));
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].rate, Percent::from_hundredths(7000));
        assert_eq!(rates[0].rate.to_string(), "70.00");
        assert_eq!(rates[1].rate, Percent::zero());
    }

    #[test]
    fn test_months_sorted_by_calendar() {
        let entries = vec![
            entry(EntryKind::Expense, 100, "A", "2025-10-01"),
            entry(EntryKind::Expense, 100, "A", "2025-02-01"),
            entry(EntryKind::Expense, 100, "A", "2024-12-31"),
            entry(EntryKind::Expense, 100, "A", "2025-03-15"),
        ];
        let labels: Vec<String> = group_by_month(&entries)
            .iter()
            .map(|m| m.month.to_string())
            .collect();
        assert_eq!(labels, vec!["2024-12", "2025-02", "2025-03", "2025-10"]);
    }

    #[test]
    fn test_expense_totals_match_summary() {
        let entries = scenario();
        let monthly: Money = group_by_month(&entries).iter().map(|m| m.expenses).sum();
        assert_eq!(monthly, summarize(&entries).total_expense);
    }

    #[test]
    fn test_savings_rate_rounding() {
        // 2/3 kept = 66.666...% -> 66.67
        assert_eq!(
            savings_rate(Money::from_cents(300), Money::from_cents(100)),
            Percent::from_hundredths(6667)
        );
        // spending more than earned gives a negative rate
        assert_eq!(
            savings_rate(Money::from_cents(300), Money::from_cents(400)),
            Percent::from_hundredths(-3333)
        );
        assert_eq!(Percent::from_hundredths(-3333).to_string(), "-33.33");
        assert_eq!(Percent::from_hundredths(-5).to_string(), "-0.05");
        // below half truncates, exact half rounds away from zero
        assert_eq!(ratio_hundredths(1, 80_000), 0);
        assert_eq!(ratio_hundredths(1, 20_000), 1);
        assert_eq!(ratio_hundredths(-1, 20_000), -1);
    }

    #[test]
    fn test_extreme_ratios_keep_their_sign() {
        let rate = savings_rate(Money::from_cents(1), Money::from_cents(9_000_000_000_000_000));
        assert_eq!(rate, Percent::from_hundredths(i64::MIN));
        assert!(rate.to_string().starts_with('-'));

        assert_eq!(ratio_hundredths(i64::MAX, 1), i64::MAX);
        assert_eq!(ratio_hundredths(i64::MIN, 1), i64::MIN);

        // largest accepted amounts stay exact
        assert_eq!(
            savings_rate(Money::from_cents(1), Money::MAX),
            Percent::from_hundredths(-(Money::MAX.cents() - 1) * 10_000)
        );
    }

    #[test]
    fn test_zero_income_guard() {
        assert_eq!(savings_rate(Money::zero(), Money::from_cents(500)), Percent::zero());
        assert_eq!(savings_rate(Money::zero(), Money::zero()), Percent::zero());
    }
}
