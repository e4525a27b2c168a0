//! In-memory implementations of the storage collaborators.
//!
//! Used by tests and by embedders that do not need persistence.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use gasto_domain::{Category, Expense, OwnerId, Owned};
use tracing::debug;
use uuid::Uuid;

use crate::{
    storage::{
        CategoryListener, ExpenseListener, ExpenseStore, KeyValueStore, SubscriberList,
        Subscription,
    },
    CoreError,
};

#[derive(Default)]
struct Records {
    expenses: Vec<Expense>,
    categories: Vec<Category>,
}

impl Records {
    fn expenses_of(&self, owner: &OwnerId) -> Vec<Expense> {
        self.expenses
            .iter()
            .filter(|e| e.is_owned_by(owner))
            .cloned()
            .collect()
    }

    fn categories_of(&self, owner: &OwnerId) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|c| c.is_owned_by(owner))
            .cloned()
            .collect()
    }
}

/// Thread-safe document store kept entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Records>,
    publish_lock: Mutex<()>,
    expense_subscribers: SubscriberList<Expense>,
    category_subscribers: SubscriberList<Category>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Records>, CoreError> {
        self.records
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))
    }

    /// Held from a write until its subscribers have been notified.
    fn publishing(&self) -> Result<MutexGuard<'_, ()>, CoreError> {
        self.publish_lock
            .lock()
            .map_err(|_| CoreError::Storage("memory store publish lock poisoned".into()))
    }

    fn publish_expenses(&self, owner: &OwnerId) -> Result<(), CoreError> {
        let snapshot = self.lock()?.expenses_of(owner);
        self.expense_subscribers.notify(owner, &snapshot);
        Ok(())
    }

    fn publish_categories(&self, owner: &OwnerId) -> Result<(), CoreError> {
        let snapshot = self.lock()?.categories_of(owner);
        self.category_subscribers.notify(owner, &snapshot);
        Ok(())
    }
}

impl ExpenseStore for MemoryStore {
    fn fetch_expenses(&self, owner: &OwnerId) -> Result<Vec<Expense>, CoreError> {
        Ok(self.lock()?.expenses_of(owner))
    }

    fn fetch_categories(&self, owner: &OwnerId) -> Result<Vec<Category>, CoreError> {
        Ok(self.lock()?.categories_of(owner))
    }

    fn insert_expense(&self, mut expense: Expense) -> Result<Expense, CoreError> {
        let _publishing = self.publishing()?;
        expense.id = Uuid::new_v4();
        expense.updated_at = Utc::now();
        self.lock()?.expenses.push(expense.clone());
        debug!(id = %expense.id, "expense inserted in memory");
        self.publish_expenses(&expense.owner_id)?;
        Ok(expense)
    }

    fn update_expense(&self, mut expense: Expense) -> Result<Expense, CoreError> {
        let _publishing = self.publishing()?;
        {
            let mut records = self.lock()?;
            let slot = records
                .expenses
                .iter_mut()
                .find(|e| e.id == expense.id)
                .ok_or(CoreError::ExpenseNotFound(expense.id))?;
            if slot.owner_id != expense.owner_id {
                return Err(CoreError::NotOwner);
            }
            expense.updated_at = Utc::now();
            *slot = expense.clone();
        }
        self.publish_expenses(&expense.owner_id)?;
        Ok(expense)
    }

    fn delete_expense(&self, owner: &OwnerId, id: Uuid) -> Result<(), CoreError> {
        let _publishing = self.publishing()?;
        {
            let mut records = self.lock()?;
            let index = records
                .expenses
                .iter()
                .position(|e| e.id == id)
                .ok_or(CoreError::ExpenseNotFound(id))?;
            if !records.expenses[index].is_owned_by(owner) {
                return Err(CoreError::NotOwner);
            }
            records.expenses.remove(index);
        }
        self.publish_expenses(owner)
    }

    fn insert_category(&self, mut category: Category) -> Result<Category, CoreError> {
        let _publishing = self.publishing()?;
        category.id = Uuid::new_v4();
        self.lock()?.categories.push(category.clone());
        self.publish_categories(&category.owner_id)?;
        Ok(category)
    }

    fn update_category(&self, category: Category) -> Result<Category, CoreError> {
        let _publishing = self.publishing()?;
        {
            let mut records = self.lock()?;
            let slot = records
                .categories
                .iter_mut()
                .find(|c| c.id == category.id)
                .ok_or(CoreError::CategoryNotFound(category.id))?;
            if slot.owner_id != category.owner_id {
                return Err(CoreError::NotOwner);
            }
            *slot = category.clone();
        }
        self.publish_categories(&category.owner_id)?;
        Ok(category)
    }

    fn delete_category(&self, owner: &OwnerId, id: Uuid) -> Result<(), CoreError> {
        let _publishing = self.publishing()?;
        {
            let mut records = self.lock()?;
            let index = records
                .categories
                .iter()
                .position(|c| c.id == id)
                .ok_or(CoreError::CategoryNotFound(id))?;
            if !records.categories[index].is_owned_by(owner) {
                return Err(CoreError::NotOwner);
            }
            records.categories.remove(index);
        }
        self.publish_categories(owner)
    }

    fn subscribe_expenses(
        &self,
        owner: &OwnerId,
        listener: ExpenseListener,
    ) -> Result<Subscription, CoreError> {
        let _publishing = self.publishing()?;
        let snapshot = self.fetch_expenses(owner)?;
        listener(&snapshot);
        Ok(self.expense_subscribers.add(owner, listener))
    }

    fn subscribe_categories(
        &self,
        owner: &OwnerId,
        listener: CategoryListener,
    ) -> Result<Subscription, CoreError> {
        let _publishing = self.publishing()?;
        let snapshot = self.fetch_categories(owner)?;
        listener(&snapshot);
        Ok(self.category_subscribers.add(owner, listener))
    }
}

/// Key-value store backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, CoreError> {
        self.entries
            .lock()
            .map_err(|_| CoreError::Storage("key-value lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
