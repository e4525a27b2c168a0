use gasto_config::model::SETTABLE_KEYS;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, set_color_enabled};
use crate::cli::registry::CommandEntry;

use super::usage;

pub(crate) const SUBCOMMANDS: &[&str] = &["show", "set", "backup", "backups", "restore"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Inspect and change preferences",
        "config <show|set <key> <value>|backup [note]|backups|restore <name>>",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => handle_show(context),
        ["set", key, value @ ..] if !value.is_empty() => {
            handle_set(context, key, &value.join(" "))
        }
        ["set", ..] => Err(usage(&format!(
            "config set <key> <value> (keys: {})",
            SETTABLE_KEYS.join(", ")
        ))),
        ["backup", note @ ..] => handle_backup(context, note),
        ["backups"] => handle_backups(context),
        ["restore", name] => handle_restore(context, name),
        ["restore", ..] => Err(usage("config restore <backup-name>")),
        [other, ..] => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{other}`"
        ))),
    }
}

fn handle_show(context: &mut ShellContext) -> CommandResult {
    let config = &context.config;
    output::section("Configuration");
    io::print_info(format!("  locale           : {}", config.locale));
    io::print_info(format!("  top_expenses     : {}", config.top_expenses));
    io::print_info(format!("  chart_height     : {}", config.chart_height));
    io::print_info(format!(
        "  ui_color_enabled : {}",
        if config.ui_color_enabled { "on" } else { "off" }
    ));
    io::print_info(format!(
        "  data_root        : {}",
        config.resolve_data_root(&context.base_dir).display()
    ));
    io::print_info(format!(
        "  last_user        : {}",
        config.last_user.as_deref().unwrap_or("-")
    ));
    io::print_info(format!(
        "  file             : {}",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn handle_set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let key = key.to_lowercase();
    context.config.set(&key, value)?;
    context.save_config()?;

    match key.as_str() {
        "top_expenses" => context.refresh_feed()?,
        "ui_color_enabled" => set_color_enabled(context.config.ui_color_enabled),
        "data_root" => io::print_hint("The new data directory is used from the next start."),
        _ => {}
    }
    io::print_success(format!("`{key}` updated."));
    Ok(())
}

fn handle_backup(context: &mut ShellContext, note: &[&str]) -> CommandResult {
    let note = note.join("_");
    let note = (!note.is_empty()).then_some(note.as_str());
    let name = context.config_manager.backup(&context.config, note)?;
    io::print_success(format!("Configuration saved as `{name}`."));
    Ok(())
}

fn handle_backups(context: &mut ShellContext) -> CommandResult {
    let backups = context.config_manager.list_backups()?;
    if backups.is_empty() {
        io::print_info("No configuration backups yet.");
        return Ok(());
    }
    output::section("Configuration backups");
    for name in backups {
        io::print_info(format!("  {name}"));
    }
    Ok(())
}

fn handle_restore(context: &mut ShellContext, name: &str) -> CommandResult {
    if !context.confirm(&format!("Restore configuration from `{name}`?"))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.config = context.config_manager.restore(name)?;
    set_color_enabled(context.config.ui_color_enabled);
    context.refresh_feed()?;
    io::print_success(format!("Configuration restored from `{name}`."));
    Ok(())
}
