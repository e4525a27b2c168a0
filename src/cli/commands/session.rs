use gasto_core::Session;
use gasto_domain::OwnerId;
use tracing::info;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

use super::usage;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "login",
            "Start a session for a user",
            "login <user> [email]",
            cmd_login,
        ),
        CommandEntry::new("logout", "End the current session", "logout", cmd_logout),
        CommandEntry::new("whoami", "Show the current user", "whoami", cmd_whoami),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(user) = args.first() else {
        return Err(usage("login <user> [email]"));
    };
    let mut session = Session::new(OwnerId::new(*user))?;
    if let Some(email) = args.get(1) {
        session = session.with_email(*email);
    }
    context.end_session();
    context.start_session(session)?;

    context.config.last_user = Some(user.trim().to_string());
    context.save_config()?;
    info!(user = %user.trim(), "user logged in");
    io::print_success(format!("Logged in as {}.", context.owner_label()));
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.end_session() {
        Some(session) => {
            context.config.last_user = None;
            context.save_config()?;
            io::print_success(format!("Logged out {}.", session.owner()));
        }
        None => io::print_info("No active session."),
    }
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session()?;
    io::print_info(format!("Logged in as {}.", context.owner_label()));
    Ok(())
}
