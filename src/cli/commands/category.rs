use gasto_core::{
    format_currency, validation::parse_budget, CategoryDraft, CategoryPatch,
};
use gasto_domain::{CategoryIcon, PaletteColor};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::paint_hex;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

use super::{short_id, usage, ParsedArgs};

pub(crate) const SUBCOMMANDS: &[&str] = &["add", "edit", "delete", "list", "icons"];

const ADD_USAGE: &str = "category add <name> [budget] [--icon <icon>] [--color <#hex>]";
const EDIT_USAGE: &str =
    "category edit <name|id> [--name <n>] [--budget <b>] [--icon <icon>] [--color <#hex>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "category",
        "Manage spending categories and their monthly budgets",
        "category <add|edit|delete|list|icons>",
        cmd_category,
    )]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(action) = args.first() else {
        return Err(usage("category <add|edit|delete|list|icons>"));
    };
    let rest = &args[1..];
    match action.to_lowercase().as_str() {
        "add" | "new" => handle_add(context, rest),
        "edit" => handle_edit(context, rest),
        "delete" | "remove" | "rm" => handle_delete(context, rest),
        "list" | "ls" => handle_list(context),
        "icons" => handle_icons(),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown category subcommand `{other}`"
        ))),
    }
}

fn parse_icon(value: &str) -> Result<CategoryIcon, CommandError> {
    CategoryIcon::from_name(value).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown icon `{value}` (see `category icons`)"
        ))
    })
}

fn parse_color(value: &str) -> Result<PaletteColor, CommandError> {
    PaletteColor::from_hex(value).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "`{value}` is not in the palette (see `category icons`)"
        ))
    })
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["icon", "color"], &[])?;
    let draft = match parsed.positional.as_slice() {
        [] if context.can_prompt() => add_wizard(context)?,
        [name] => CategoryDraft::new(*name, 0.0),
        [name, budget] => CategoryDraft::new(*name, parse_budget(budget)?),
        _ => return Err(usage(ADD_USAGE)),
    };
    let draft = CategoryDraft {
        icon: parsed.option("icon").map(parse_icon).transpose()?.unwrap_or(draft.icon),
        color: parsed
            .option("color")
            .map(parse_color)
            .transpose()?
            .unwrap_or(draft.color),
        ..draft
    };

    let saved = context.categories()?.add(draft)?;
    io::print_success(format!(
        "Category `{}` created with a monthly budget of {}.",
        paint_hex(&saved.name, saved.color.hex()),
        format_currency(saved.monthly_budget)
    ));
    Ok(())
}

fn add_wizard(context: &ShellContext) -> Result<CategoryDraft, CommandError> {
    let name = io::prompt_text(&context.theme, "Name", false)?;
    let budget = io::prompt_text(&context.theme, "Monthly budget (blank for none)", true)?;
    let budget = if budget.trim().is_empty() {
        0.0
    } else {
        parse_budget(&budget)?
    };

    let icons: Vec<String> = CategoryIcon::SELECTABLE
        .iter()
        .map(|icon| icon.to_string())
        .collect();
    let colors: Vec<String> = PaletteColor::SELECTABLE
        .iter()
        .map(|color| paint_hex(color.hex(), color.hex()))
        .collect();
    let icon = io::select_index(&context.theme, "Icon", &icons)?
        .and_then(|index| CategoryIcon::SELECTABLE.get(index).copied())
        .unwrap_or_default();
    let color = io::select_index(&context.theme, "Color", &colors)?
        .and_then(|index| PaletteColor::SELECTABLE.get(index).copied())
        .unwrap_or_default();

    Ok(CategoryDraft {
        icon,
        color,
        ..CategoryDraft::new(name, budget)
    })
}

fn handle_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["name", "budget", "icon", "color"], &[])?;
    let [needle] = parsed.positional.as_slice() else {
        return Err(usage(EDIT_USAGE));
    };
    let service = context.categories()?;
    let category = service.find(needle)?;
    let patch = CategoryPatch {
        name: parsed.option("name").map(str::to_string),
        monthly_budget: parsed.option("budget").map(parse_budget).transpose()?,
        icon: parsed.option("icon").map(parse_icon).transpose()?,
        color: parsed.option("color").map(parse_color).transpose()?,
    };
    if !parsed.has_options() {
        io::print_info("Nothing to change.");
        return Ok(());
    }

    let renamed = patch.name.is_some();
    let saved = service.edit(category.id, patch)?;
    io::print_success(format!("Category `{}` updated.", saved.name));
    if renamed {
        io::print_hint("Existing expenses keep the label they were recorded with.");
    }
    Ok(())
}

fn handle_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [needle] = args else {
        return Err(usage("category delete <name|id>"));
    };
    let service = context.categories()?;
    let category = service.find(needle)?;
    if !context.confirm(&format!("Delete category `{}`?", category.name))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    service.delete(category.id)?;
    io::print_success(format!("Category `{}` deleted.", category.name));
    io::print_hint("Its expenses are now reported under \"Other\".");
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let categories = context.categories()?.list()?;
    if categories.is_empty() {
        io::print_info("No categories yet. Try `category add <name> [budget]`.");
        return Ok(());
    }
    let mut table = Table::new(
        Some("Categories"),
        vec![
            TableColumn::new("ID", 8),
            TableColumn::new("Name", 20),
            TableColumn::new("Icon", 18),
            TableColumn::new("Color", 8),
            TableColumn::new("Budget", 14).right(),
        ],
    );
    for category in &categories {
        table.add_row(vec![
            short_id(category.id),
            category.name.clone(),
            category.icon.to_string(),
            category.color.hex().to_string(),
            format_currency(category.monthly_budget),
        ]);
    }
    table.print();
    Ok(())
}

fn handle_icons() -> CommandResult {
    let icons: Vec<&str> = CategoryIcon::SELECTABLE
        .iter()
        .map(|icon| icon.as_str())
        .collect();
    io::print_info(format!("Icons : {}", icons.join(", ")));
    let colors: Vec<String> = PaletteColor::SELECTABLE
        .iter()
        .map(|color| paint_hex(color.hex(), color.hex()))
        .collect();
    io::print_info(format!("Colors: {}", colors.join(" ")));
    Ok(())
}
