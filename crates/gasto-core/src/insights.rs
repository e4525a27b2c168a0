//! Short observations shown under the dashboard charts.

use std::fmt;

use serde::Serialize;

use crate::{format::format_currency, monthly::MonthlyBucket, statistics::Statistics};

/// A largest expense more than this many times the mean is called out.
pub const OUTLIER_FACTOR: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Insight {
    /// Spending so far in the current month.
    MonthToDate(f64),
    /// Mean amount per expense.
    AveragePerItem(f64),
    /// Number of distinct months with spending.
    DistinctMonths(usize),
    /// Largest expense as a rounded multiple of the mean.
    LargestVsAverage(u64),
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::MonthToDate(total) => {
                write!(f, "Você já gastou {} este mês", format_currency(*total))
            }
            Insight::AveragePerItem(mean) => {
                write!(f, "Sua média de gastos é de {} por item", format_currency(*mean))
            }
            Insight::DistinctMonths(count) => {
                write!(f, "Você tem dados de {count} meses diferentes")
            }
            Insight::LargestVsAverage(ratio) => {
                write!(f, "Seu maior gasto foi {ratio}x maior que a média")
            }
        }
    }
}

/// Derives the applicable insights, in display order.
pub fn compute_insights(
    stats: &Statistics,
    series: &[MonthlyBucket],
    current_month_total: f64,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    if current_month_total > 0.0 {
        insights.push(Insight::MonthToDate(current_month_total));
    }
    if stats.count > 0 {
        insights.push(Insight::AveragePerItem(stats.mean));
    }
    if series.len() > 1 {
        insights.push(Insight::DistinctMonths(series.len()));
    }
    if stats.mean > 0.0 && stats.max > stats.mean * OUTLIER_FACTOR {
        insights.push(Insight::LargestVsAverage((stats.max / stats.mean).round() as u64));
    }
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use gasto_domain::MonthKey;

    fn bucket(month: u32, total: f64) -> MonthlyBucket {
        MonthlyBucket {
            month: MonthKey::new(2024, month).unwrap(),
            total,
        }
    }

    #[test]
    fn no_data_means_no_insights() {
        assert!(compute_insights(&Statistics::default(), &[], 0.0).is_empty());
    }

    #[test]
    fn all_insights_in_order() {
        let stats = Statistics::from_amounts([10.0, 10.0, 10.0, 10.0, 10.0, 100.0]);
        let series = [bucket(1, 50.0), bucket(2, 100.0)];
        let insights = compute_insights(&stats, &series, 100.0);
        assert_eq!(
            insights,
            vec![
                Insight::MonthToDate(100.0),
                Insight::AveragePerItem(25.0),
                Insight::DistinctMonths(2),
                Insight::LargestVsAverage(4),
            ]
        );
    }

    #[test]
    fn outlier_requires_more_than_three_times_the_mean() {
        let stats = Statistics::from_amounts([10.0, 10.0, 10.0, 30.0]);
        let insights = compute_insights(&stats, &[bucket(1, 60.0)], 0.0);
        assert_eq!(insights, vec![Insight::AveragePerItem(15.0)]);
    }

    #[test]
    fn insights_render_in_portuguese() {
        assert_eq!(
            Insight::MonthToDate(12.5).to_string(),
            "Você já gastou R$ 12,50 este mês"
        );
        assert_eq!(
            Insight::LargestVsAverage(4).to_string(),
            "Seu maior gasto foi 4x maior que a média"
        );
    }
}
