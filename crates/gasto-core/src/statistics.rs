//! Count, sum, mean and extremes over expense amounts.

use gasto_domain::Amounted;
use serde::Serialize;

/// Summary statistics over a set of amounts. All fields are zero for an empty set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub total: f64,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub count: usize,
}

impl Statistics {
    /// Single pass over `amounts`; non-finite values count as zero.
    pub fn from_amounts(amounts: impl IntoIterator<Item = f64>) -> Self {
        let mut stats = Statistics::default();
        for amount in amounts.into_iter().map(sanitize_amount) {
            if stats.count == 0 {
                stats.max = amount;
                stats.min = amount;
            } else {
                stats.max = stats.max.max(amount);
                stats.min = stats.min.min(amount);
            }
            stats.total += amount;
            stats.count += 1;
        }
        if stats.count > 0 {
            stats.mean = stats.total / stats.count as f64;
        }
        stats
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Statistics over the amounts of `items`.
pub fn compute_statistics<T: Amounted>(items: &[T]) -> Statistics {
    Statistics::from_amounts(items.iter().map(Amounted::amount))
}

/// Replaces NaN and infinities with zero.
pub fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}
