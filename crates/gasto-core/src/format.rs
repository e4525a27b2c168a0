//! Fixed-locale presentation helpers.
//!
//! Formatting never fails: anything that is not a finite number renders as
//! `R$ 0,00` so a single bad record cannot blank a whole report.

use chrono::NaiveDate;

pub const CURRENCY_PREFIX: &str = "R$ ";

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// Brazilian real with two decimals and a comma separator, no grouping.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrlFormatter;

impl CurrencyFormatter for BrlFormatter {
    fn format_amount(&self, amount: f64) -> String {
        let value = if amount.is_finite() { amount } else { 0.0 };
        let mut digits = format!("{value:.2}");
        if digits == "-0.00" {
            digits.remove(0);
        }
        format!("{CURRENCY_PREFIX}{}", digits.replace('.', ","))
    }
}

/// `DD/MM/YYYY`, as used across the app.
#[derive(Debug, Default, Clone, Copy)]
pub struct PtBrDateFormatter;

impl DateFormatter for PtBrDateFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%d/%m/%Y").to_string()
    }
}

/// A value that may or may not hold a usable number.
pub trait MaybeAmount {
    fn as_amount(&self) -> Option<f64>;
}

macro_rules! numeric_amount {
    ($($ty:ty),*) => {
        $(
            impl MaybeAmount for $ty {
                fn as_amount(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

numeric_amount!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl MaybeAmount for str {
    fn as_amount(&self) -> Option<f64> {
        None
    }
}

impl MaybeAmount for String {
    fn as_amount(&self) -> Option<f64> {
        None
    }
}

impl MaybeAmount for serde_json::Value {
    fn as_amount(&self) -> Option<f64> {
        self.as_f64()
    }
}

impl<T: MaybeAmount> MaybeAmount for Option<T> {
    fn as_amount(&self) -> Option<f64> {
        self.as_ref().and_then(MaybeAmount::as_amount)
    }
}

impl<T: MaybeAmount + ?Sized> MaybeAmount for &T {
    fn as_amount(&self) -> Option<f64> {
        (**self).as_amount()
    }
}

/// Renders `value` as `R$ 1234,50`, or `R$ 0,00` when it is not a finite number.
pub fn format_currency(value: impl MaybeAmount) -> String {
    BrlFormatter.format_amount(value.as_amount().unwrap_or(0.0))
}

/// Renders a progress percentage with one decimal, e.g. `37.5%`.
pub fn format_percent(percent: f64) -> String {
    let value = if percent.is_finite() { percent } else { 0.0 };
    format!("{value:.1}%")
}
