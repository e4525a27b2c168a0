//! Month-over-month aggregation for the bar chart.

use std::collections::BTreeMap;

use chrono::Datelike;
use gasto_domain::{Expense, MonthKey};
use serde::Serialize;

use crate::statistics::sanitize_amount;

/// Tallest bar of the monthly chart, in display units.
pub const BAR_MAX_HEIGHT: f64 = 120.0;
/// Bars never shrink below this height, so small months stay visible.
pub const BAR_MIN_HEIGHT: f64 = 5.0;

/// Total spent in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyBucket {
    pub month: MonthKey,
    pub total: f64,
}

impl MonthlyBucket {
    /// `M/YYYY` label shown under the bar.
    pub fn label(&self) -> String {
        self.month.label()
    }
}

/// Groups `(date, amount)` pairs by calendar month.
///
/// The result is sparse (months without entries are omitted) and sorted
/// chronologically.
pub fn bucketize<D: Datelike>(entries: impl IntoIterator<Item = (D, f64)>) -> Vec<MonthlyBucket> {
    let mut totals: BTreeMap<MonthKey, f64> = BTreeMap::new();
    for (date, amount) in entries {
        *totals.entry(MonthKey::of(date)).or_insert(0.0) += sanitize_amount(amount);
    }
    totals
        .into_iter()
        .map(|(month, total)| MonthlyBucket { month, total })
        .collect()
}

/// Monthly series over the attributed dates of `expenses`.
pub fn compute_monthly_series(expenses: &[Expense]) -> Vec<MonthlyBucket> {
    bucketize(
        expenses
            .iter()
            .map(|expense| (expense.attributed_date(), expense.amount)),
    )
}

/// Sum of the expenses attributed to `month`.
pub fn month_total(expenses: &[Expense], month: MonthKey) -> f64 {
    expenses
        .iter()
        .filter(|expense| expense.month() == month)
        .map(|expense| sanitize_amount(expense.amount))
        .sum()
}

/// Bar heights scaled so the largest bucket reaches `max_height`.
pub fn bar_heights(series: &[MonthlyBucket], max_height: f64, min_height: f64) -> Vec<f64> {
    let peak = series.iter().map(|bucket| bucket.total).fold(0.0, f64::max);
    series
        .iter()
        .map(|bucket| {
            if peak > 0.0 {
                (bucket.total / peak * max_height).max(min_height)
            } else {
                min_height
            }
        })
        .collect()
}
