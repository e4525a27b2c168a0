use gasto_core::{
    format_currency, format_percent, BudgetProgress, DateFormatter, PtBrDateFormatter,
};

use crate::cli::chart::render_monthly_chart;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, paint_hex};
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

use super::{print_json, ParsedArgs};

const PROGRESS_WIDTH: usize = 20;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "report",
            "Show the spending dashboard",
            "report [--json]",
            cmd_report,
        ),
        CommandEntry::new(
            "budgets",
            "Show budget usage per category",
            "budgets [--json]",
            cmd_budgets,
        ),
    ]
}

fn wants_json(args: &[&str]) -> Result<bool, CommandError> {
    let parsed = ParsedArgs::parse(args, &[], &["json"])?;
    if !parsed.positional.is_empty() {
        return Err(CommandError::InvalidArguments(format!(
            "unexpected argument `{}`",
            parsed.positional[0]
        )));
    }
    Ok(parsed.switch("json"))
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let report = context.dashboard()?;
    if wants_json(args)? {
        return print_json(&report);
    }
    let stats = &report.statistics;

    output::section(format!(
        "Dashboard ({})",
        PtBrDateFormatter.format_date(report.generated_on)
    ));
    if stats.is_empty() {
        io::print_info("No expenses recorded yet.");
        return Ok(());
    }
    io::print_info(format!("  Total   : {}", format_currency(stats.total)));
    io::print_info(format!("  Average : {}", format_currency(stats.mean)));
    io::print_info(format!("  Largest : {}", format_currency(stats.max)));
    io::print_info(format!("  Smallest: {}", format_currency(stats.min)));
    io::print_info(format!("  Count   : {}", stats.count));
    io::print_info(format!(
        "  {}: {}",
        report.current_month,
        format_currency(report.current_month_total)
    ));

    if let Some(balance) = context.balances()?.for_month(report.current_month)? {
        let left = balance.amount - report.current_month_total;
        let line = format!(
            "  Balance : {} left of {}",
            format_currency(left),
            format_currency(balance.amount)
        );
        if left < 0.0 {
            io::print_warning(line.trim_start());
        } else {
            io::print_info(line);
        }
    }

    output::section("Monthly spending");
    for line in render_monthly_chart(&report.monthly_series, context.config.chart_height) {
        println!("{line}");
    }

    if !report.top_expenses.is_empty() {
        let mut table = Table::new(
            Some("Top expenses"),
            vec![
                TableColumn::new("#", 3).right(),
                TableColumn::new("Title", 24),
                TableColumn::new("Category", 16),
                TableColumn::new("Amount", 14).right(),
            ],
        );
        for (rank, expense) in report.top_expenses.iter().enumerate() {
            table.add_row(vec![
                (rank + 1).to_string(),
                expense.title.clone(),
                expense.category_label.clone(),
                format_currency(expense.amount),
            ]);
        }
        table.print();
    }

    if !report.insights.is_empty() {
        output::section("Insights");
        for insight in &report.insights {
            io::print_hint(insight);
        }
    }
    Ok(())
}

fn progress_bar(progress: &BudgetProgress) -> String {
    let filled = ((progress.percent_used / 100.0) * PROGRESS_WIDTH as f64).round() as usize;
    let filled = filled.min(PROGRESS_WIDTH);
    let bar = format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(PROGRESS_WIDTH - filled)
    );
    paint_hex(&bar, progress.severity.color().hex())
}

fn cmd_budgets(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let report = context.categories()?.report()?;
    if wants_json(args)? {
        return print_json(&report);
    }
    if report.lines.is_empty() {
        io::print_info("No categories yet. Try `category add <name> [budget]`.");
        return Ok(());
    }

    output::section("Budgets");
    for line in &report.lines {
        let progress = &line.progress;
        let name = paint_hex(&line.category.name, line.category.color.hex());
        if progress.budget == 0.0 {
            io::print_info(format!(
                "{name}: {} spent, no budget set",
                format_currency(progress.spent)
            ));
            continue;
        }
        io::print_info(format!(
            "{name}: {} {} ({} of {}, {} left)",
            progress_bar(progress),
            format_percent(progress.percent_used),
            format_currency(progress.spent),
            format_currency(progress.budget),
            format_currency(progress.remaining)
        ));
    }
    if report.other_spent > 0.0 {
        io::print_info(format!(
            "{}: {} spent",
            gasto_domain::UNCATEGORIZED_LABEL,
            format_currency(report.other_spent)
        ));
    }
    output::separator();
    io::print_info(format!(
        "Total: {} spent of {} budgeted",
        format_currency(report.total_spent),
        format_currency(report.total_budget)
    ));
    for line in report.over_budget() {
        io::print_warning(format!("Budget exceeded for `{}`", line.category.name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gasto_core::compute_budget_progress;

    #[test]
    fn progress_bar_fills_in_proportion() {
        let half = progress_bar(&compute_budget_progress(50.0, 100.0));
        assert_eq!(half.chars().filter(|c| *c == '█').count(), 10);
        let over = progress_bar(&compute_budget_progress(500.0, 100.0));
        assert_eq!(over.chars().filter(|c| *c == '█').count(), PROGRESS_WIDTH);
    }
}
