#![doc(test(attr(deny(warnings))))]

//! Gastômetro ties the expense engine, JSON storage and configuration crates
//! together and provides the interactive shell.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

pub use errors::{CliError, GastoError};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Gastômetro tracing initialized.");
    });
}
