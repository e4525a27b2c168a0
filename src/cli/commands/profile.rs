use gasto_domain::UserProfile;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

use super::usage;

pub(crate) const SUBCOMMANDS: &[&str] = &["show", "set"];

const FIELDS: &str = "name, phone, birth_date, profession";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "profile",
        "Show or update the profile of the logged-in user",
        "profile <show|set <field> <value>>",
        cmd_profile,
    )]
}

fn cmd_profile(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => handle_show(context),
        ["set", field, value @ ..] if !value.is_empty() => {
            handle_set(context, field, &value.join(" "))
        }
        ["set", ..] => Err(usage(&format!("profile set <field> <value> (fields: {FIELDS})"))),
        [other, ..] => Err(CommandError::InvalidArguments(format!(
            "unknown profile subcommand `{other}`"
        ))),
    }
}

fn display(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn handle_show(context: &mut ShellContext) -> CommandResult {
    let profile = context.profiles()?.load()?;
    output::section(format!("Profile of {}", context.owner_label()));
    io::print_info(format!("  Name       : {}", display(&profile.name)));
    io::print_info(format!("  Phone      : {}", display(&profile.phone)));
    io::print_info(format!("  Birth date : {}", display(&profile.birth_date)));
    io::print_info(format!("  Profession : {}", display(&profile.profession)));
    Ok(())
}

fn apply(profile: &mut UserProfile, field: &str, value: &str) -> Result<(), CommandError> {
    let slot = match field.to_lowercase().replace('-', "_").as_str() {
        "name" | "nome" => &mut profile.name,
        "phone" | "telefone" => &mut profile.phone,
        "birth_date" | "birth" | "birthday" => &mut profile.birth_date,
        "profession" | "profissao" => &mut profile.profession,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown profile field `{other}` (fields: {FIELDS})"
            )))
        }
    };
    *slot = value.to_string();
    Ok(())
}

fn handle_set(context: &mut ShellContext, field: &str, value: &str) -> CommandResult {
    let service = context.profiles()?;
    let mut profile = service.load()?;
    apply(&mut profile, field, value)?;
    let saved = service.save(profile)?;
    io::print_success(format!(
        "Profile updated: {} {} {} {}",
        display(&saved.name),
        display(&saved.phone),
        display(&saved.birth_date),
        display(&saved.profession)
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_accept_aliases() {
        let mut profile = UserProfile::default();
        apply(&mut profile, "birth-date", "01021990").unwrap();
        apply(&mut profile, "telefone", "11987654321").unwrap();
        assert_eq!(profile.birth_date, "01021990");
        assert_eq!(profile.phone, "11987654321");
        assert!(apply(&mut profile, "email", "x").is_err());
    }
}
