//! Shell context, dispatch and error reporting.

use std::{io, path::PathBuf, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use gasto_config::{default_base_dir, Config, ConfigError, ConfigManager};
use gasto_core::{
    BalanceService, CategoryService, CoreError, DashboardReport, ExpenseService, ProfileService,
    ReportFeed, Session, SystemClock,
};
use gasto_domain::OwnerId;
use gasto_storage_json::{open, JsonExpenseStore, JsonKeyValueStore, StoragePaths};
use strsim::levenshtein;
use tracing::{debug, info};

use crate::cli::commands;
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::errors::{CliError, GastoError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Not logged in. Use `login <user>` first.")]
    NotLoggedIn,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    App(#[from] GastoError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(message) => CommandError::InvalidArguments(message),
            other => CommandError::App(GastoError::Core(other)),
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidSetting { .. } => CommandError::InvalidArguments(err.to_string()),
            other => CommandError::App(GastoError::Config(other)),
        }
    }
}

pub type CommandResult = Result<(), CommandError>;

/// State shared by every command of one shell run.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub base_dir: PathBuf,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub expense_store: Arc<JsonExpenseStore>,
    pub kv_store: Arc<JsonKeyValueStore>,
    pub session: Option<Session>,
    pub feed: Option<ReportFeed>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, default_base_dir())
    }

    pub fn with_base_dir(mode: CliMode, base_dir: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(&base_dir)?;
        let config = config_manager.load()?;
        output::set_color_enabled(config.ui_color_enabled);

        let paths = StoragePaths::under(&config.resolve_data_root(&base_dir));
        let (expense_store, kv_store) = open(&paths)?;
        info!(base = %base_dir.display(), "shell context ready");

        let mut context = Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            base_dir,
            config_manager,
            config,
            expense_store: Arc::new(expense_store),
            kv_store: Arc::new(kv_store),
            session: None,
            feed: None,
            running: true,
        };
        context.restore_last_user()?;
        Ok(context)
    }

    fn restore_last_user(&mut self) -> Result<(), CliError> {
        let Some(user) = self.config.last_user.clone() else {
            return Ok(());
        };
        match Session::new(OwnerId::new(user)) {
            Ok(session) => {
                self.start_session(session)?;
                if self.mode == CliMode::Interactive {
                    cli_io::print_info(format!("Welcome back, {}.", self.owner_label()));
                }
            }
            Err(err) => debug!(%err, "ignoring stored user"),
        }
        Ok(())
    }

    /// Makes `session` current and subscribes the dashboard feed to its data.
    pub(crate) fn start_session(&mut self, session: Session) -> Result<(), CoreError> {
        self.feed = None;
        let feed = ReportFeed::start(
            self.expense_store.as_ref(),
            &session,
            Arc::new(SystemClock),
            self.config.top_expenses,
            |report: &DashboardReport| {
                debug!(
                    count = report.statistics.count,
                    total = report.statistics.total,
                    "dashboard refreshed"
                );
            },
        )?;
        for warning in self.expense_store.check(session.owner())? {
            cli_io::print_warning(warning);
        }
        self.session = Some(session);
        self.feed = Some(feed);
        Ok(())
    }

    pub(crate) fn end_session(&mut self) -> Option<Session> {
        if let Some(feed) = self.feed.take() {
            feed.stop();
        }
        self.session.take()
    }

    /// Restarts the feed so it picks up a changed `top_expenses`.
    pub(crate) fn refresh_feed(&mut self) -> Result<(), CoreError> {
        if let Some(session) = self.end_session() {
            self.start_session(session)?;
        }
        Ok(())
    }

    pub(crate) fn session(&self) -> Result<&Session, CommandError> {
        self.session.as_ref().ok_or(CommandError::NotLoggedIn)
    }

    pub(crate) fn owner_label(&self) -> String {
        match &self.session {
            Some(session) => match session.email() {
                Some(email) => format!("{} <{}>", session.owner(), email),
                None => session.owner().to_string(),
            },
            None => "nobody".into(),
        }
    }

    pub(crate) fn expenses(&self) -> Result<ExpenseService, CommandError> {
        Ok(ExpenseService::new(
            self.expense_store.clone(),
            self.session()?.clone(),
        ))
    }

    pub(crate) fn categories(&self) -> Result<CategoryService, CommandError> {
        Ok(CategoryService::new(
            self.expense_store.clone(),
            self.session()?.clone(),
        ))
    }

    pub(crate) fn balances(&self) -> Result<BalanceService, CommandError> {
        Ok(BalanceService::new(
            self.kv_store.clone(),
            self.session()?.clone(),
        ))
    }

    pub(crate) fn profiles(&self) -> Result<ProfileService, CommandError> {
        Ok(ProfileService::new(
            self.kv_store.clone(),
            self.session()?.clone(),
        ))
    }

    /// Latest dashboard pushed by the feed, or a freshly computed one.
    pub(crate) fn dashboard(&self) -> Result<DashboardReport, CommandError> {
        if let Some(report) = self.feed.as_ref().and_then(ReportFeed::latest) {
            return Ok(report);
        }
        Ok(self.expenses()?.dashboard(self.config.top_expenses)?)
    }

    pub(crate) fn save_config(&self) -> Result<(), CommandError> {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    /// Asks before destructive actions; scripts are taken as confirmed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if !self.can_prompt() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn prompt(&self) -> String {
        match &self.session {
            Some(session) => format!("gastometro({})> ", session.owner()),
            None => "gastometro> ".into(),
        }
    }

    /// `(name, usage)` of every registered command, for the line editor.
    pub(crate) fn command_usages(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .list()
            .into_iter()
            .map(|entry| (entry.name, entry.usage))
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(dialoguer::Confirm::with_theme(&self.theme)
            .with_prompt("Exit shell?")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::NotLoggedIn => {
                cli_io::print_error(CommandError::NotLoggedIn);
                cli_io::print_hint("Try `login demo` to get started.");
            }
            other => cli_io::print_error(other),
        }
    }
}
