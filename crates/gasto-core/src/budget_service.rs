//! Budget consumption per category.

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use gasto_domain::{Category, Expense, PaletteColor};
use serde::Serialize;
use uuid::Uuid;

use crate::statistics::sanitize_amount;

/// Below this percentage a budget is in good shape.
pub const MEDIUM_SEVERITY_PERCENT: f64 = 50.0;
/// At or above this percentage a budget is close to exhausted.
pub const HIGH_SEVERITY_PERCENT: f64 = 80.0;

/// Progress-bar tier derived from the clamped percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn from_percent(percent: f64) -> Self {
        if percent < MEDIUM_SEVERITY_PERCENT {
            Severity::Low
        } else if percent < HIGH_SEVERITY_PERCENT {
            Severity::Medium
        } else {
            Severity::High
        }
    }

    /// Colour of the progress bar fill.
    pub fn color(self) -> PaletteColor {
        match self {
            Severity::Low => PaletteColor::Green,
            Severity::Medium => PaletteColor::Orange,
            Severity::High => PaletteColor::Red,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        f.write_str(label)
    }
}

/// How much of a budget has been consumed.
///
/// `percent_used` is clamped to 100 for the bar; `over_budget` keeps the
/// unclamped comparison so the "budget exceeded" warning can be shown too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub spent: f64,
    pub budget: f64,
    pub percent_used: f64,
    pub remaining: f64,
    pub severity: Severity,
    pub over_budget: bool,
}

/// Budget consumption for `spent` against `budget`. Negative or non-finite
/// inputs are treated as zero, and a zero budget never divides.
pub fn compute_budget_progress(spent: f64, budget: f64) -> BudgetProgress {
    let spent = sanitize_amount(spent).max(0.0);
    let budget = sanitize_amount(budget).max(0.0);
    let percent_used = if budget == 0.0 {
        0.0
    } else {
        (spent / budget * 100.0).min(100.0)
    };
    BudgetProgress {
        spent,
        budget,
        percent_used,
        remaining: (budget - spent).max(0.0),
        severity: Severity::from_percent(percent_used),
        over_budget: budget > 0.0 && spent > budget,
    }
}

/// One category row of the budgets screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBudgetLine {
    pub category: Category,
    pub progress: BudgetProgress,
}

/// Spending attributed to every category of a user, plus uncategorized spending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryReport {
    pub lines: Vec<CategoryBudgetLine>,
    /// Expenses without a live category, shown under "Other".
    pub other_spent: f64,
    pub total_budget: f64,
    pub total_spent: f64,
}

impl CategoryReport {
    pub fn line(&self, category_id: Uuid) -> Option<&CategoryBudgetLine> {
        self.lines.iter().find(|line| line.category.id == category_id)
    }

    pub fn over_budget(&self) -> impl Iterator<Item = &CategoryBudgetLine> {
        self.lines.iter().filter(|line| line.progress.over_budget)
    }
}

/// Stateless budgeting utilities over fetched expense and category lists.
pub struct BudgetService;

impl BudgetService {
    /// Sums expenses by referenced category id. Expenses whose id is absent or
    /// points at a deleted category accrue to the `None` key.
    pub fn spent_by_category(
        categories: &[Category],
        expenses: &[Expense],
    ) -> HashMap<Option<Uuid>, f64> {
        let live: HashSet<Uuid> = categories.iter().map(|c| c.id).collect();
        let mut spent: HashMap<Option<Uuid>, f64> = HashMap::new();
        for expense in expenses {
            let key = expense.category_id.filter(|id| live.contains(id));
            *spent.entry(key).or_insert(0.0) += sanitize_amount(expense.amount);
        }
        spent
    }

    /// Builds the per-category budget report in category order.
    pub fn category_report(categories: &[Category], expenses: &[Expense]) -> CategoryReport {
        let spent = Self::spent_by_category(categories, expenses);
        let lines: Vec<CategoryBudgetLine> = categories
            .iter()
            .map(|category| {
                let amount = spent.get(&Some(category.id)).copied().unwrap_or(0.0);
                CategoryBudgetLine {
                    category: category.clone(),
                    progress: compute_budget_progress(amount, category.monthly_budget),
                }
            })
            .collect();
        CategoryReport {
            other_spent: spent.get(&None).copied().unwrap_or(0.0),
            total_budget: categories
                .iter()
                .map(|category| sanitize_amount(category.monthly_budget))
                .sum(),
            total_spent: expenses
                .iter()
                .map(|expense| sanitize_amount(expense.amount))
                .sum(),
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gasto_domain::{CategoryRef, OwnerId};

    #[test]
    fn over_budget_is_clamped_but_flagged() {
        let progress = compute_budget_progress(120.0, 100.0);
        assert_eq!(progress.percent_used, 100.0);
        assert_eq!(progress.remaining, 0.0);
        assert_eq!(progress.severity, Severity::High);
        assert!(progress.over_budget);
    }

    #[test]
    fn zero_budget_avoids_division() {
        let progress = compute_budget_progress(0.0, 0.0);
        assert_eq!(progress.percent_used, 0.0);
        assert_eq!(progress.remaining, 0.0);
        assert_eq!(progress.severity, Severity::Low);
        assert!(!progress.over_budget);

        let spent_without_budget = compute_budget_progress(30.0, 0.0);
        assert_eq!(spent_without_budget.percent_used, 0.0);
        assert!(!spent_without_budget.over_budget);
    }

    #[test]
    fn severity_thresholds() {
        assert_eq!(compute_budget_progress(49.0, 100.0).severity, Severity::Low);
        assert_eq!(compute_budget_progress(50.0, 100.0).severity, Severity::Medium);
        assert_eq!(compute_budget_progress(79.9, 100.0).severity, Severity::Medium);
        assert_eq!(compute_budget_progress(80.0, 100.0).severity, Severity::High);
        assert_eq!(Severity::Medium.color().hex(), "#F39C12");
    }

    #[test]
    fn exactly_on_budget_is_not_exceeded() {
        let progress = compute_budget_progress(100.0, 100.0);
        assert_eq!(progress.percent_used, 100.0);
        assert!(!progress.over_budget);
    }

    #[test]
    fn report_attributes_by_category_id() {
        let owner = OwnerId::new("u");
        let food = Category::new(owner.clone(), "Comida", 200.0);
        let fun = Category::new(owner.clone(), "Lazer", 100.0);
        let deleted = Category::new(owner.clone(), "Antiga", 10.0);
        let expenses = vec![
            Expense::new(owner.clone(), "Almoço", 50.0).with_category(Some(CategoryRef::from(&food))),
            Expense::new(owner.clone(), "Jantar", 70.0).with_category(Some(CategoryRef::from(&food))),
            Expense::new(owner.clone(), "Show", 150.0).with_category(Some(CategoryRef::from(&fun))),
            Expense::new(owner.clone(), "Velho", 5.0).with_category(Some(CategoryRef::from(&deleted))),
            Expense::new(owner, "Avulso", 3.0),
        ];
        let categories = vec![food.clone(), fun.clone()];
        let report = BudgetService::category_report(&categories, &expenses);

        assert_eq!(report.lines.len(), 2);
        assert_eq!(report.line(food.id).unwrap().progress.spent, 120.0);
        assert!((report.line(food.id).unwrap().progress.percent_used - 60.0).abs() < 1e-9);
        assert!(report.line(fun.id).unwrap().progress.over_budget);
        assert_eq!(report.other_spent, 8.0);
        assert_eq!(report.total_budget, 300.0);
        assert_eq!(report.total_spent, 278.0);
        assert_eq!(report.over_budget().count(), 1);
    }

    #[test]
    fn total_spent_is_summed_in_expense_order() {
        let owner = OwnerId::new("u");
        let categories: Vec<Category> = (0..12)
            .map(|i| Category::new(owner.clone(), format!("C{i}"), 10.0))
            .collect();
        let expenses: Vec<Expense> = (0..240)
            .map(|i| {
                let amount = 0.1 + f64::from(i) * 0.37;
                Expense::new(owner.clone(), "Item", amount)
                    .with_category(Some(CategoryRef::from(&categories[i as usize % 12])))
            })
            .collect();
        let ordered: f64 = expenses.iter().map(|e| e.amount).sum();

        let first = BudgetService::category_report(&categories, &expenses);
        for _ in 0..20 {
            let again = BudgetService::category_report(&categories, &expenses);
            assert_eq!(again.total_spent.to_bits(), first.total_spent.to_bits());
        }
        assert_eq!(first.total_spent.to_bits(), ordered.to_bits());
    }
}
