//! Contracts for the storage collaborators and shared subscription plumbing.

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use gasto_domain::{Category, Expense, OwnerId};
use uuid::Uuid;

use crate::CoreError;

/// Callback receiving the full, updated record list of one owner.
pub type Listener<T> = Box<dyn Fn(&[T]) + Send + Sync>;
pub type ExpenseListener = Listener<Expense>;
pub type CategoryListener = Listener<Category>;

/// Document store holding every user's expenses and categories.
///
/// Reads and deletes are scoped by owner; writes take the owner from the
/// record itself. Implementations assign ids on insert and stamp
/// `updated_at` on every expense write.
pub trait ExpenseStore: Send + Sync {
    fn fetch_expenses(&self, owner: &OwnerId) -> Result<Vec<Expense>, CoreError>;
    fn fetch_categories(&self, owner: &OwnerId) -> Result<Vec<Category>, CoreError>;

    fn insert_expense(&self, expense: Expense) -> Result<Expense, CoreError>;
    fn update_expense(&self, expense: Expense) -> Result<Expense, CoreError>;
    fn delete_expense(&self, owner: &OwnerId, id: Uuid) -> Result<(), CoreError>;

    fn insert_category(&self, category: Category) -> Result<Category, CoreError>;
    fn update_category(&self, category: Category) -> Result<Category, CoreError>;
    fn delete_category(&self, owner: &OwnerId, id: Uuid) -> Result<(), CoreError>;

    /// Registers `listener`, calls it once with the current list, then after
    /// every change to this owner's expenses. Dropping the returned handle
    /// unsubscribes.
    ///
    /// No write is lost between the first call and the registration, and
    /// snapshots arrive in write order. Listeners may read the store but must
    /// not write to it or subscribe from inside the callback.
    fn subscribe_expenses(
        &self,
        owner: &OwnerId,
        listener: ExpenseListener,
    ) -> Result<Subscription, CoreError>;

    /// Same contract as [`ExpenseStore::subscribe_expenses`] for categories.
    fn subscribe_categories(
        &self,
        owner: &OwnerId,
        listener: CategoryListener,
    ) -> Result<Subscription, CoreError>;
}

/// Small on-device string store for profile and balance records.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// Handle to an active subscription; unsubscribes when dropped.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stops notifications now rather than at drop time.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

struct Registration<T> {
    id: u64,
    owner: OwnerId,
    listener: Arc<dyn Fn(&[T]) + Send + Sync>,
}

/// Listener registry shared by store implementations.
pub struct SubscriberList<T> {
    next_id: AtomicU64,
    entries: Arc<Mutex<Vec<Registration<T>>>>,
}

impl<T: 'static> Default for SubscriberList<T> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: 'static> SubscriberList<T> {
    pub fn add(&self, owner: &OwnerId, listener: Listener<T>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(Registration {
                id,
                owner: owner.clone(),
                listener: Arc::from(listener),
            });
        }
        let entries = Arc::clone(&self.entries);
        Subscription::new(move || {
            if let Ok(mut entries) = entries.lock() {
                entries.retain(|entry| entry.id != id);
            }
        })
    }

    /// Calls every listener of `owner` with `items`.
    ///
    /// Listeners run outside the registry lock, so they may drop their own
    /// subscription.
    pub fn notify(&self, owner: &OwnerId, items: &[T]) {
        let listeners: Vec<_> = match self.entries.lock() {
            Ok(entries) => entries
                .iter()
                .filter(|entry| &entry.owner == owner)
                .map(|entry| Arc::clone(&entry.listener))
                .collect(),
            Err(_) => return,
        };
        for listener in listeners {
            listener(items);
        }
    }

    pub fn has_subscribers(&self, owner: &OwnerId) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.iter().any(|entry| &entry.owner == owner))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Detects dangling references and other anomalies in a user's records.
pub fn record_warnings(expenses: &[Expense], categories: &[Category]) -> Vec<String> {
    let category_ids: HashSet<_> = categories.iter().map(|c| c.id).collect();
    let mut warnings = Vec::new();

    for expense in expenses {
        if let Some(category) = expense.category_id {
            if !category_ids.contains(&category) {
                warnings.push(format!(
                    "expense {} references missing category {} (\"{}\")",
                    expense.id, category, expense.category_label
                ));
            }
        }
        if !expense.amount.is_finite() || expense.amount <= 0.0 {
            warnings.push(format!(
                "expense {} has an invalid amount {}",
                expense.id, expense.amount
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn dropping_a_subscription_stops_notifications() {
        let list: SubscriberList<u32> = SubscriberList::default();
        let owner = OwnerId::new("u");
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = list.add(
            &owner,
            Box::new(move |_items| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        list.notify(&owner, &[1, 2]);
        list.notify(&OwnerId::new("someone-else"), &[3]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        drop(subscription);
        list.notify(&owner, &[1]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(list.is_empty());
    }

    #[test]
    fn warns_about_missing_categories() {
        let owner = OwnerId::new("u");
        let ghost = Category::new(owner.clone(), "Viagem", 0.0);
        let expense = Expense::new(owner, "Hotel", 300.0)
            .with_category(Some(gasto_domain::CategoryRef::from(&ghost)));
        let warnings = record_warnings(&[expense], &[]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("missing category"));
    }
}
