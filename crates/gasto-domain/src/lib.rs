//! gasto-domain
//!
//! Pure domain models (Expense, Category, MonthlyBalance, UserProfile).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod balance;
pub mod category;
pub mod common;
pub mod expense;

pub use balance::*;
pub use category::*;
pub use common::*;
pub use expense::*;
