//! Small per-user records kept in on-device key-value storage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Balance the user declared for a given month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyBalance {
    pub id: Uuid,
    pub month: MonthKey,
    pub amount: f64,
    pub recorded_on: NaiveDate,
}

impl MonthlyBalance {
    pub fn new(month: MonthKey, amount: f64, recorded_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            month,
            amount,
            recorded_on,
        }
    }
}

impl Identifiable for MonthlyBalance {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for MonthlyBalance {
    fn amount(&self) -> f64 {
        self.amount
    }
}

/// Optional personal details shown on the profile screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub profession: String,
}

/// Applies the `(DD) DDDDD-DDDD` mask to whatever digits `input` contains.
pub fn mask_phone(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(11).collect();
    let mut masked = String::new();
    if digits.is_empty() {
        return masked;
    }
    masked.push('(');
    masked.push_str(slice(&digits, 0, 2));
    if digits.len() > 2 {
        masked.push_str(") ");
        masked.push_str(slice(&digits, 2, 7));
    }
    if digits.len() > 7 {
        masked.push('-');
        masked.push_str(slice(&digits, 7, 11));
    }
    masked
}

/// Applies the `DD/MM/YYYY` mask to whatever digits `input` contains.
pub fn mask_date(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(8).collect();
    let mut masked = String::from(slice(&digits, 0, 2));
    if digits.len() > 2 {
        masked.push('/');
        masked.push_str(slice(&digits, 2, 4));
    }
    if digits.len() > 4 {
        masked.push('/');
        masked.push_str(slice(&digits, 4, 8));
    }
    masked
}

// `digits` is ASCII, so byte offsets are char offsets.
fn slice(digits: &str, start: usize, end: usize) -> &str {
    let end = end.min(digits.len());
    if start >= end {
        ""
    } else {
        &digits[start..end]
    }
}
