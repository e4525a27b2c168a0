pub mod balance;
pub mod category;
pub mod config;
pub mod expense;
pub mod profile;
pub mod report;
pub mod session;
pub mod system;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let groups = [
        session::definitions(),
        expense::definitions(),
        category::definitions(),
        report::definitions(),
        balance::definitions(),
        profile::definitions(),
        config::definitions(),
        system::definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
}

/// Second-word completions for the interactive editor.
pub(crate) fn subcommands(command: &str) -> &'static [&'static str] {
    match command {
        "expense" => expense::SUBCOMMANDS,
        "category" => category::SUBCOMMANDS,
        "balance" => balance::SUBCOMMANDS,
        "profile" => profile::SUBCOMMANDS,
        "config" => config::SUBCOMMANDS,
        _ => &[],
    }
}

/// Positional arguments plus `--key value` options and bare `--switch`es.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    options: Vec<(&'a str, &'a str)>,
    switches: Vec<&'a str>,
}

impl<'a> ParsedArgs<'a> {
    pub fn parse(
        args: &[&'a str],
        options: &[&str],
        switches: &[&str],
    ) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                parsed.positional.push(arg);
                continue;
            };
            if switches.contains(&name) {
                parsed.switches.push(name);
            } else if options.contains(&name) {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("option `--{name}` needs a value"))
                })?;
                parsed.options.push((name, value));
            } else {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `--{name}`"
                )));
            }
        }
        Ok(parsed)
    }

    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options
            .iter()
            .rev()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn switch(&self, name: &str) -> bool {
        self.switches.contains(&name)
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY` or `today`.
pub(crate) fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate, CommandError> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("today") || input.eq_ignore_ascii_case("hoje") {
        return Ok(today);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d/%m/%Y"))
        .map_err(|_| {
            CommandError::InvalidArguments(format!(
                "invalid date `{input}` (use YYYY-MM-DD or DD/MM/YYYY)"
            ))
        })
}

/// Words that clear an optional field.
pub(crate) fn is_none_word(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "none" | "-" | "other" | "outros"
    )
}

pub(crate) fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

/// Machine-readable output for `--json` variants of read-only commands.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CommandError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|err| CommandError::Message(format!("could not encode output: {err}")))?;
    println!("{json}");
    Ok(())
}

pub(crate) fn usage(text: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {text}"))
}
