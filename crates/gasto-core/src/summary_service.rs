//! Assembles the engine outputs into the reports the screens display.

use chrono::NaiveDate;
use gasto_domain::{Expense, MonthKey};
use serde::Serialize;

use crate::{
    insights::{compute_insights, Insight},
    monthly::{compute_monthly_series, month_total, MonthlyBucket},
    statistics::{compute_statistics, Statistics},
    top_n::compute_top_n,
};

/// Everything the dashboard renders, recomputed from the full expense list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub generated_on: NaiveDate,
    pub statistics: Statistics,
    pub monthly_series: Vec<MonthlyBucket>,
    pub top_expenses: Vec<Expense>,
    pub current_month: MonthKey,
    pub current_month_total: f64,
    pub insights: Vec<Insight>,
}

/// Expense list ordered newest first, with the running total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeSummary {
    pub expenses: Vec<Expense>,
    pub total: f64,
}

/// Aggregates expense lists for summary screens.
///
/// See also: [`crate::budget_service::BudgetService`] for the per-category view.
pub struct SummaryService;

impl SummaryService {
    /// Builds the dashboard for the month containing `today`.
    pub fn dashboard(expenses: &[Expense], today: NaiveDate, top_n: usize) -> DashboardReport {
        let statistics = compute_statistics(expenses);
        let monthly_series = compute_monthly_series(expenses);
        let current_month = MonthKey::of(today);
        let current_month_total = month_total(expenses, current_month);
        let insights = compute_insights(&statistics, &monthly_series, current_month_total);
        DashboardReport {
            generated_on: today,
            statistics,
            monthly_series,
            top_expenses: compute_top_n(expenses, top_n),
            current_month,
            current_month_total,
            insights,
        }
    }

    /// Orders expenses by attributed date, newest first.
    pub fn home(expenses: &[Expense]) -> HomeSummary {
        let mut ordered = expenses.to_vec();
        ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = compute_statistics(&ordered).total;
        HomeSummary {
            expenses: ordered,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gasto_domain::OwnerId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expenses() -> Vec<Expense> {
        let owner = OwnerId::new("u");
        vec![
            Expense::new(owner.clone(), "Mercado", 100.0).on(date(2024, 1, 15)),
            Expense::new(owner.clone(), "Farmácia", 50.0).on(date(2024, 1, 20)),
            Expense::new(owner, "Livro", 10.0).on(date(2023, 12, 1)),
        ]
    }

    #[test]
    fn dashboard_combines_every_view() {
        let report = SummaryService::dashboard(&expenses(), date(2024, 1, 31), 2);
        assert_eq!(report.statistics.total, 160.0);
        assert_eq!(report.monthly_series.len(), 2);
        assert_eq!(report.top_expenses.len(), 2);
        assert_eq!(report.top_expenses[0].title, "Mercado");
        assert_eq!(report.current_month.label(), "1/2024");
        assert_eq!(report.current_month_total, 150.0);
        assert!(report.insights.contains(&Insight::MonthToDate(150.0)));
    }

    #[test]
    fn dashboard_is_idempotent() {
        let input = expenses();
        let snapshot = input.clone();
        let first = SummaryService::dashboard(&input, date(2024, 2, 1), 5);
        let second = SummaryService::dashboard(&input, date(2024, 2, 1), 5);
        assert_eq!(first, second);
        assert_eq!(input, snapshot);
        assert_eq!(first.current_month_total, 0.0);
    }

    #[test]
    fn home_lists_newest_first() {
        let summary = SummaryService::home(&expenses());
        let titles: Vec<_> = summary.expenses.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Farmácia", "Mercado", "Livro"]);
        assert_eq!(summary.total, 160.0);
    }
}
