use chrono::{NaiveDate, Utc};
use gasto_core::{
    format_currency, validation::parse_amount, CategoryIndex, DateFormatter, ExpenseDraft,
    ExpensePatch, PtBrDateFormatter,
};
use gasto_domain::{Category, Expense};
use uuid::Uuid;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, paint_hex};
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

use super::{is_none_word, parse_date, short_id, usage, ParsedArgs};

pub(crate) const SUBCOMMANDS: &[&str] = &["add", "edit", "delete", "list", "show"];

const ADD_USAGE: &str =
    "expense add <title> <amount> [--category <name>] [--date <date>] [--description <text>]";
const EDIT_USAGE: &str = "expense edit <id> [--title <t>] [--amount <a>] [--category <name|none>] [--date <date>] [--description <text|none>]";
const FIELD_OPTIONS: &[&str] = &["title", "amount", "category", "date", "description"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "expense",
        "Record and manage expenses",
        "expense <add|edit|delete|list|show>",
        cmd_expense,
    )]
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(action) = args.first() else {
        return Err(usage("expense <add|edit|delete|list|show>"));
    };
    let rest = &args[1..];
    match action.to_lowercase().as_str() {
        "add" | "new" => handle_add(context, rest),
        "edit" => handle_edit(context, rest),
        "delete" | "remove" | "rm" => handle_delete(context, rest),
        "list" | "ls" => handle_list(context),
        "show" => handle_show(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown expense subcommand `{other}`"
        ))),
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Resolves a category argument; "none"/"other" mean uncategorized.
fn category_arg(context: &ShellContext, value: &str) -> Result<Option<Uuid>, CommandError> {
    if is_none_word(value) {
        return Ok(None);
    }
    Ok(Some(context.categories()?.find(value)?.id))
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = if args.is_empty() && context.can_prompt() {
        add_wizard(context)?
    } else {
        let parsed = ParsedArgs::parse(args, &["category", "date", "description"], &[])?;
        let (title, amount) = match parsed.positional.as_slice() {
            [title, amount] => (*title, *amount),
            _ => return Err(usage(ADD_USAGE)),
        };
        ExpenseDraft {
            title: title.to_string(),
            description: parsed.option("description").map(str::to_string),
            amount: parse_amount(amount)?,
            category: parsed
                .option("category")
                .map(|value| category_arg(context, value))
                .transpose()?
                .flatten(),
            date: parsed
                .option("date")
                .map(|value| parse_date(value, today()))
                .transpose()?,
        }
    };

    let saved = context.expenses()?.add(draft)?;
    io::print_success(format!(
        "Expense `{}` recorded: {} ({}) [{}]",
        saved.title,
        format_currency(saved.amount),
        saved.category_label,
        short_id(saved.id)
    ));
    Ok(())
}

fn add_wizard(context: &ShellContext) -> Result<ExpenseDraft, CommandError> {
    let title = io::prompt_text(&context.theme, "Title", false)?;
    let amount = parse_amount(&io::prompt_text(&context.theme, "Amount (R$)", false)?)?;
    let description = io::prompt_text(&context.theme, "Description (optional)", true)?;
    let date = io::prompt_text(&context.theme, "Date (blank for today)", true)?;
    let category = pick_category(context)?;
    Ok(ExpenseDraft {
        title,
        description: Some(description),
        amount,
        category,
        date: if date.trim().is_empty() {
            None
        } else {
            Some(parse_date(&date, today())?)
        },
    })
}

fn pick_category(context: &ShellContext) -> Result<Option<Uuid>, CommandError> {
    let categories = context.categories()?.list()?;
    if categories.is_empty() {
        return Ok(None);
    }
    let mut items = vec![gasto_domain::UNCATEGORIZED_LABEL.to_string()];
    items.extend(categories.iter().map(|category| category.name.clone()));
    let choice = io::select_index(&context.theme, "Category", &items)?;
    Ok(choice
        .filter(|index| *index > 0)
        .and_then(|index| categories.get(index - 1))
        .map(|category| category.id))
}

fn handle_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, FIELD_OPTIONS, &[])?;
    let [id] = parsed.positional.as_slice() else {
        return Err(usage(EDIT_USAGE));
    };
    let service = context.expenses()?;
    let expense = service.find_by_prefix(id)?;

    let patch = if !parsed.has_options() && context.can_prompt() {
        edit_wizard(context, &expense)?
    } else {
        ExpensePatch {
            title: parsed.option("title").map(str::to_string),
            description: parsed
                .option("description")
                .map(|value| (!is_none_word(value)).then(|| value.to_string())),
            amount: parsed.option("amount").map(parse_amount).transpose()?,
            category: parsed
                .option("category")
                .map(|value| category_arg(context, value))
                .transpose()?,
            date: parsed
                .option("date")
                .map(|value| parse_date(value, today()))
                .transpose()?,
        }
    };
    if patch.is_empty() {
        io::print_info("Nothing to change.");
        return Ok(());
    }

    let saved = service.edit(expense.id, patch)?;
    io::print_success(format!(
        "Expense `{}` updated: {} ({}).",
        saved.title,
        format_currency(saved.amount),
        saved.category_label
    ));
    Ok(())
}

fn edit_wizard(context: &ShellContext, expense: &Expense) -> Result<ExpensePatch, CommandError> {
    io::print_info("Leave a field blank to keep its current value.");
    let prompt = |label: &str, current: &str| {
        io::prompt_text(&context.theme, &format!("{label} [{current}]"), true)
    };
    let title = prompt("Title", &expense.title)?;
    let amount = prompt("Amount", &format_currency(expense.amount))?;
    let description = prompt(
        "Description (`none` clears)",
        expense.description.as_deref().unwrap_or(""),
    )?;
    let date = prompt(
        "Date",
        &PtBrDateFormatter.format_date(expense.attributed_date()),
    )?;
    let change_category = io::confirm_action(&context.theme, "Change category?", false)?;

    Ok(ExpensePatch {
        title: non_blank(title),
        description: non_blank(description).map(|text| (!is_none_word(&text)).then_some(text)),
        amount: non_blank(amount).map(|text| parse_amount(&text)).transpose()?,
        category: if change_category {
            Some(pick_category(context)?)
        } else {
            None
        },
        date: non_blank(date)
            .map(|text| parse_date(&text, today()))
            .transpose()?,
    })
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn handle_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(usage("expense delete <id>"));
    };
    let service = context.expenses()?;
    let expense = service.find_by_prefix(id)?;
    let question = format!(
        "Delete `{}` ({})?",
        expense.title,
        format_currency(expense.amount)
    );
    if !context.confirm(&question)? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    service.delete(expense.id)?;
    io::print_success(format!("Expense `{}` deleted.", expense.title));
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let summary = context.expenses()?.home()?;
    if summary.expenses.is_empty() {
        io::print_info("No expenses recorded yet.");
        return Ok(());
    }
    let categories = context.categories()?.list()?;
    let index = CategoryIndex::new(&categories);

    let mut table = Table::new(
        Some("Expenses"),
        vec![
            TableColumn::new("ID", 8),
            TableColumn::new("Date", 10),
            TableColumn::new("Title", 24),
            TableColumn::new("Category", 16),
            TableColumn::new("Amount", 14).right(),
        ],
    );
    for expense in &summary.expenses {
        table.add_row(vec![
            short_id(expense.id),
            PtBrDateFormatter.format_date(expense.attributed_date()),
            expense.title.clone(),
            expense.category_label.clone(),
            format_currency(expense.amount),
        ]);
    }
    table.print();
    output::separator();
    io::print_info(format!(
        "{} expense(s), total {}",
        summary.expenses.len(),
        format_currency(summary.total)
    ));
    warn_dangling(&summary.expenses, &index);
    Ok(())
}

fn warn_dangling(expenses: &[Expense], index: &CategoryIndex<'_>) {
    let dangling = expenses
        .iter()
        .filter(|expense| {
            expense
                .category_id
                .is_some_and(|id| index.by_id(id).is_none())
        })
        .count();
    if dangling > 0 {
        io::print_hint(format!(
            "{dangling} expense(s) point at deleted categories and count as \"Other\"."
        ));
    }
}

fn handle_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(usage("expense show <id>"));
    };
    let expense = context.expenses()?.find_by_prefix(id)?;
    let categories: Vec<Category> = context.categories()?.list()?;
    let style = CategoryIndex::new(&categories).style_for_expense(&expense);

    output::section(&expense.title);
    io::print_info(format!("  ID          : {}", expense.id));
    io::print_info(format!("  Amount      : {}", format_currency(expense.amount)));
    io::print_info(format!(
        "  Date        : {}",
        PtBrDateFormatter.format_date(expense.attributed_date())
    ));
    io::print_info(format!(
        "  Category    : {} ({})",
        paint_hex(&expense.category_label, style.color.hex()),
        style.icon
    ));
    io::print_info(format!(
        "  Description : {}",
        expense.description.as_deref().unwrap_or("-")
    ));
    io::print_info(format!(
        "  Updated     : {}",
        expense.updated_at.format("%d/%m/%Y %H:%M")
    ));
    Ok(())
}
