//! gasto-core
//!
//! Expense aggregation engine and services for Gastômetro.
//! Depends on gasto-domain. No CLI, no terminal I/O, no direct filesystem access:
//! persistence is reached through the traits in [`storage`].

pub mod balance_service;
pub mod budget_service;
pub mod category_service;
pub mod category_style;
pub mod error;
pub mod expense_service;
pub mod feed;
pub mod format;
pub mod insights;
pub mod memory_store;
pub mod monthly;
pub mod public_api;
pub mod session;
pub mod statistics;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod top_n;
pub mod validation;

pub use balance_service::*;
pub use budget_service::*;
pub use category_service::*;
pub use category_style::*;
pub use error::CoreError;
pub use expense_service::*;
pub use feed::ReportFeed;
pub use format::*;
pub use insights::*;
pub use memory_store::{MemoryKeyValueStore, MemoryStore};
pub use monthly::*;
pub use public_api::*;
pub use session::Session;
pub use statistics::*;
pub use storage::{ExpenseStore, KeyValueStore, Subscription};
pub use summary_service::*;
pub use time::{Clock, FixedClock, SystemClock};
pub use top_n::*;

#[cfg(test)]
mod tests;
