use gasto_core::{
    format_currency, validation::parse_decimal, CoreError, DateFormatter, PtBrDateFormatter,
};
use gasto_domain::{MonthKey, MonthlyBalance};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

use super::{short_id, usage, ParsedArgs};

pub(crate) const SUBCOMMANDS: &[&str] = &["set", "list", "delete"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "balance",
        "Record the available balance for a month",
        "balance <set|list|delete>",
        cmd_balance,
    )]
}

fn cmd_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(action) = args.first() else {
        return Err(usage("balance <set|list|delete>"));
    };
    let rest = &args[1..];
    match action.to_lowercase().as_str() {
        "set" => handle_set(context, rest),
        "list" | "ls" => handle_list(context),
        "delete" | "remove" | "rm" => handle_delete(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown balance subcommand `{other}`"
        ))),
    }
}

fn parse_month(value: &str) -> Result<MonthKey, CommandError> {
    value
        .parse()
        .map_err(|err: gasto_domain::MonthKeyParseError| {
            CommandError::InvalidArguments(err.to_string())
        })
}

fn handle_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["month"], &["replace"])?;
    let [amount] = parsed.positional.as_slice() else {
        return Err(usage("balance set <amount> [--month M/YYYY] [--replace]"));
    };
    let amount = parse_decimal(amount)?;
    let service = context.balances()?;
    let month = match parsed.option("month") {
        Some(value) => parse_month(value)?,
        None => service.current_month(),
    };

    let saved = match service.record(month, amount, parsed.switch("replace")) {
        Err(CoreError::BalanceExists(month)) if context.can_prompt() => {
            if !context.confirm(&format!("Replace the balance recorded for {month}?"))? {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
            service.record(month, amount, true)?
        }
        Err(CoreError::BalanceExists(month)) => {
            return Err(CommandError::Message(format!(
                "a balance is already recorded for {month}; pass --replace to overwrite it"
            )));
        }
        other => other?,
    };
    io::print_success(format!(
        "Balance for {} set to {}.",
        saved.month,
        format_currency(saved.amount)
    ));
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let balances = context.balances()?.list()?;
    if balances.is_empty() {
        io::print_info("No balances recorded yet.");
        return Ok(());
    }
    let mut table = Table::new(
        Some("Monthly balances"),
        vec![
            TableColumn::new("ID", 8),
            TableColumn::new("Month", 8),
            TableColumn::new("Recorded", 10),
            TableColumn::new("Amount", 14).right(),
        ],
    );
    for balance in &balances {
        table.add_row(vec![
            short_id(balance.id),
            balance.month.label(),
            PtBrDateFormatter.format_date(balance.recorded_on),
            format_currency(balance.amount),
        ]);
    }
    table.print();
    Ok(())
}

fn find_balance<'a>(balances: &'a [MonthlyBalance], needle: &str) -> Option<&'a MonthlyBalance> {
    if let Ok(month) = needle.parse::<MonthKey>() {
        return balances.iter().find(|balance| balance.month == month);
    }
    let needle = needle.trim().to_lowercase();
    let mut matches = balances
        .iter()
        .filter(|balance| !needle.is_empty() && balance.id.to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(balance), None) => Some(balance),
        _ => None,
    }
}

fn handle_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [needle] = args else {
        return Err(usage("balance delete <id|M/YYYY>"));
    };
    let service = context.balances()?;
    let balances = service.list()?;
    let balance = find_balance(&balances, needle).ok_or_else(|| {
        CommandError::InvalidArguments(format!("no single balance matches `{needle}`"))
    })?;
    if !context.confirm(&format!("Delete the balance for {}?", balance.month))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    service.delete(balance.id)?;
    io::print_success(format!("Balance for {} deleted.", balance.month));
    Ok(())
}
