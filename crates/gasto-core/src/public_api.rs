//! Stable entry points of the aggregation engine.
//!
//! Frontends can depend on these six functions without pulling in the
//! service layer. All of them are pure and never fail.

pub use crate::{
    budget_service::compute_budget_progress, category_style::resolve_category_style,
    format::format_currency, monthly::compute_monthly_series, statistics::compute_statistics,
    top_n::compute_top_n,
};
