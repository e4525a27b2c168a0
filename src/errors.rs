use gasto_config::ConfigError;
use gasto_core::CoreError;
use thiserror::Error;

/// Failures coming from the library crates.
#[derive(Error, Debug)]
pub enum GastoError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Fatal errors that stop the shell.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] GastoError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::App(GastoError::Core(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::App(GastoError::Config(err))
    }
}
