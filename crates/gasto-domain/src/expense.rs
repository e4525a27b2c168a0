//! Domain models for recorded expenses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{category::Category, common::*};

/// Label stored on expenses that carry no category.
pub const UNCATEGORIZED_LABEL: &str = "Other";

/// One recorded transaction.
///
/// `category_id` and `category_label` move together: the id is `None`
/// exactly when the label is [`UNCATEGORIZED_LABEL`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: f64,
    #[serde(default = "default_label")]
    pub category_label: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub owner_id: OwnerId,
    #[serde(default = "undated")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "undated")]
    pub updated_at: DateTime<Utc>,
}

fn default_label() -> String {
    UNCATEGORIZED_LABEL.to_string()
}

/// Fixed stand-in for records stored without a timestamp: the Unix epoch.
fn undated() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

impl Expense {
    pub fn new(owner_id: OwnerId, title: impl Into<String>, amount: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            amount,
            category_label: default_label(),
            category_id: None,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.set_description(Some(description.into()));
        self
    }

    pub fn with_category(mut self, category: Option<CategoryRef>) -> Self {
        self.set_category(category);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.created_at = start_of_day(date);
        self
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
    }

    pub fn set_category(&mut self, category: Option<CategoryRef>) {
        match category {
            Some(reference) => {
                self.category_id = Some(reference.id);
                self.category_label = reference.label;
            }
            None => {
                self.category_id = None;
                self.category_label = default_label();
            }
        }
    }

    pub fn category(&self) -> Option<CategoryRef> {
        self.category_id.map(|id| CategoryRef {
            id,
            label: self.category_label.clone(),
        })
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category_id.is_none()
    }

    /// Calendar date the expense is attributed to.
    pub fn attributed_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.attributed_date())
    }
}

impl Identifiable for Expense {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Owned for Expense {
    fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!("{} ({})", self.title, self.category_label)
    }
}

/// Denormalised reference from an expense to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub label: String,
}

impl From<&Category> for CategoryRef {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            label: category.name.clone(),
        }
    }
}

/// Midnight UTC of `date`, used as the stored timestamp of an attributed date.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_without_dates_load_with_a_stable_date() {
        let raw = r#"{
            "id": "5b4f7a3e-8c1d-4f2a-9e6b-0d1c2b3a4f5e",
            "title": "Antiga",
            "amount": 12.5,
            "owner_id": "user-1"
        }"#;
        let first: Expense = serde_json::from_str(raw).unwrap();
        let second: Expense = serde_json::from_str(raw).unwrap();
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(first.created_at.timestamp(), 0);
        assert_eq!(first.updated_at, first.created_at);
        assert_eq!(first.month(), MonthKey::new(1970, 1).unwrap());
        assert!(first.is_uncategorized());
    }

    fn owner() -> OwnerId {
        OwnerId::new("user-1")
    }

    #[test]
    fn uncategorized_expense_uses_sentinel_label() {
        let expense = Expense::new(owner(), "Cafe", 7.5);
        assert!(expense.is_uncategorized());
        assert_eq!(expense.category_label, UNCATEGORIZED_LABEL);
        assert_eq!(expense.category(), None);
    }

    #[test]
    fn category_id_and_label_move_together() {
        let groceries = Category::new(owner(), "Mercado", 500.0);
        let mut expense =
            Expense::new(owner(), "Feira", 42.0).with_category(Some(CategoryRef::from(&groceries)));
        assert_eq!(expense.category_id, Some(groceries.id));
        assert_eq!(expense.category_label, "Mercado");

        expense.set_category(None);
        assert_eq!(expense.category_id, None);
        assert_eq!(expense.category_label, UNCATEGORIZED_LABEL);
    }

    #[test]
    fn blank_descriptions_are_dropped() {
        let expense = Expense::new(owner(), "Cinema", 30.0).with_description("   ");
        assert_eq!(expense.description, None);
    }

    #[test]
    fn attributed_date_follows_user_choice() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        let expense = Expense::new(owner(), "Presente", 80.0).on(date);
        assert_eq!(expense.attributed_date(), date);
        assert_eq!(expense.month().label(), "12/2023");
    }

    #[test]
    fn missing_timestamps_and_label_fall_back_on_load() {
        let json = r#"{
            "id": "5f0c6a4e-1111-4c1e-9a4e-0a0a0a0a0a0a",
            "title": "Antigo",
            "amount": 12.0,
            "owner_id": "user-1"
        }"#;
        let expense: Expense = serde_json::from_str(json).expect("legacy record");
        assert_eq!(expense.category_label, UNCATEGORIZED_LABEL);
        assert!(expense.category_id.is_none());
    }
}
