use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use gasto_core::{
    storage::{
        record_warnings, CategoryListener, ExpenseListener, ExpenseStore, KeyValueStore,
        SubscriberList, Subscription,
    },
    CoreError,
};
use gasto_domain::{Category, Expense, OwnerId, Owned};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

const FILE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Directory layout used by the JSON stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    /// One document per user with their expenses and categories.
    pub users_root: PathBuf,
    /// One file per key-value entry.
    pub kv_root: PathBuf,
}

impl StoragePaths {
    pub fn under(base: &Path) -> Self {
        Self {
            users_root: base.join("users"),
            kv_root: base.join("local"),
        }
    }
}

/// Everything stored for one user.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(default)]
    expenses: Vec<Expense>,
    #[serde(default)]
    categories: Vec<Category>,
}

impl UserDocument {
    fn retain_owner(&mut self, owner: &OwnerId) {
        self.expenses.retain(|expense| expense.is_owned_by(owner));
        self.categories.retain(|category| category.is_owned_by(owner));
    }

    /// Splits into `owner`'s records and everything else found in the file.
    fn split_owner(self, owner: &OwnerId) -> (Self, Self) {
        let (expenses, foreign_expenses) = self
            .expenses
            .into_iter()
            .partition(|expense| expense.is_owned_by(owner));
        let (categories, foreign_categories) = self
            .categories
            .into_iter()
            .partition(|category| category.is_owned_by(owner));
        (
            Self {
                expenses,
                categories,
            },
            Self {
                expenses: foreign_expenses,
                categories: foreign_categories,
            },
        )
    }

    fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.categories.is_empty()
    }
}

/// Filesystem-backed document store with change subscriptions.
///
/// Every write rewrites the owner's document atomically and then notifies the
/// owner's subscribers with the fresh list. Writes and their notifications are
/// serialized, so subscribers see snapshots in write order.
pub struct JsonExpenseStore {
    root: PathBuf,
    io_lock: Mutex<()>,
    publish_lock: Mutex<()>,
    expense_subscribers: SubscriberList<Expense>,
    category_subscribers: SubscriberList<Category>,
}

impl JsonExpenseStore {
    pub fn new(root: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            io_lock: Mutex::new(()),
            publish_lock: Mutex::new(()),
            expense_subscribers: SubscriberList::default(),
            category_subscribers: SubscriberList::default(),
        })
    }

    pub fn document_path(&self, owner: &OwnerId) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_name(owner.as_str()), FILE_EXTENSION))
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, CoreError> {
        self.io_lock
            .lock()
            .map_err(|_| CoreError::Storage("storage lock poisoned".into()))
    }

    /// Held from a write until its subscribers have been notified.
    fn publishing(&self) -> Result<MutexGuard<'_, ()>, CoreError> {
        self.publish_lock
            .lock()
            .map_err(|_| CoreError::Storage("publish lock poisoned".into()))
    }

    fn read_document(&self, owner: &OwnerId) -> Result<UserDocument, CoreError> {
        let path = self.document_path(owner);
        if !path.exists() {
            return Ok(UserDocument::default());
        }
        let data = fs::read_to_string(&path)?;
        let document = serde_json::from_str(&data)?;
        debug!(path = %path.display(), "user document loaded");
        Ok(document)
    }

    fn load(&self, owner: &OwnerId) -> Result<UserDocument, CoreError> {
        let mut document = self.read_document(owner)?;
        document.retain_owner(owner);
        Ok(document)
    }

    fn save(&self, owner: &OwnerId, document: &UserDocument) -> Result<(), CoreError> {
        let path = self.document_path(owner);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &serde_json::to_string_pretty(document)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Loads, edits and saves one owner's document under the I/O lock.
    ///
    /// Records of other owners found in the file are written back untouched.
    fn modify<R>(
        &self,
        owner: &OwnerId,
        edit: impl FnOnce(&mut UserDocument) -> Result<R, CoreError>,
    ) -> Result<(R, UserDocument), CoreError> {
        let _guard = self.guard()?;
        let (mut document, foreign) = self.read_document(owner)?.split_owner(owner);
        let result = edit(&mut document)?;
        if foreign.is_empty() {
            self.save(owner, &document)?;
        } else {
            debug!(owner = %owner, "keeping foreign records in user document");
            let mut stored = document.clone();
            stored.expenses.extend(foreign.expenses);
            stored.categories.extend(foreign.categories);
            self.save(owner, &stored)?;
        }
        Ok((result, document))
    }

    /// Logs anomalies found in an owner's stored records.
    pub fn check(&self, owner: &OwnerId) -> Result<Vec<String>, CoreError> {
        let document = {
            let _guard = self.guard()?;
            self.load(owner)?
        };
        let warnings = record_warnings(&document.expenses, &document.categories);
        for warning in &warnings {
            warn!("{warning}");
        }
        Ok(warnings)
    }
}

impl ExpenseStore for JsonExpenseStore {
    fn fetch_expenses(&self, owner: &OwnerId) -> Result<Vec<Expense>, CoreError> {
        let _guard = self.guard()?;
        Ok(self.load(owner)?.expenses)
    }

    fn fetch_categories(&self, owner: &OwnerId) -> Result<Vec<Category>, CoreError> {
        let _guard = self.guard()?;
        Ok(self.load(owner)?.categories)
    }

    fn insert_expense(&self, mut expense: Expense) -> Result<Expense, CoreError> {
        let _publishing = self.publishing()?;
        expense.id = Uuid::new_v4();
        expense.updated_at = Utc::now();
        let owner = expense.owner_id.clone();
        let (saved, document) = self.modify(&owner, |document| {
            document.expenses.push(expense.clone());
            Ok(expense)
        })?;
        info!(id = %saved.id, owner = %owner, "expense stored");
        self.expense_subscribers.notify(&owner, &document.expenses);
        Ok(saved)
    }

    fn update_expense(&self, mut expense: Expense) -> Result<Expense, CoreError> {
        let _publishing = self.publishing()?;
        expense.updated_at = Utc::now();
        let owner = expense.owner_id.clone();
        let (saved, document) = self.modify(&owner, |document| {
            let slot = document
                .expenses
                .iter_mut()
                .find(|stored| stored.id == expense.id)
                .ok_or(CoreError::ExpenseNotFound(expense.id))?;
            *slot = expense.clone();
            Ok(expense)
        })?;
        info!(id = %saved.id, "expense rewritten");
        self.expense_subscribers.notify(&owner, &document.expenses);
        Ok(saved)
    }

    fn delete_expense(&self, owner: &OwnerId, id: Uuid) -> Result<(), CoreError> {
        let _publishing = self.publishing()?;
        let ((), document) = self.modify(owner, |document| {
            let before = document.expenses.len();
            document.expenses.retain(|expense| expense.id != id);
            if document.expenses.len() == before {
                return Err(CoreError::ExpenseNotFound(id));
            }
            Ok(())
        })?;
        info!(%id, "expense removed");
        self.expense_subscribers.notify(owner, &document.expenses);
        Ok(())
    }

    fn insert_category(&self, mut category: Category) -> Result<Category, CoreError> {
        let _publishing = self.publishing()?;
        category.id = Uuid::new_v4();
        let owner = category.owner_id.clone();
        let (saved, document) = self.modify(&owner, |document| {
            document.categories.push(category.clone());
            Ok(category)
        })?;
        info!(id = %saved.id, name = %saved.name, "category stored");
        self.category_subscribers.notify(&owner, &document.categories);
        Ok(saved)
    }

    fn update_category(&self, category: Category) -> Result<Category, CoreError> {
        let _publishing = self.publishing()?;
        let owner = category.owner_id.clone();
        let (saved, document) = self.modify(&owner, |document| {
            let slot = document
                .categories
                .iter_mut()
                .find(|stored| stored.id == category.id)
                .ok_or(CoreError::CategoryNotFound(category.id))?;
            *slot = category.clone();
            Ok(category)
        })?;
        info!(id = %saved.id, "category rewritten");
        self.category_subscribers.notify(&owner, &document.categories);
        Ok(saved)
    }

    fn delete_category(&self, owner: &OwnerId, id: Uuid) -> Result<(), CoreError> {
        let _publishing = self.publishing()?;
        let ((), document) = self.modify(owner, |document| {
            let before = document.categories.len();
            document.categories.retain(|category| category.id != id);
            if document.categories.len() == before {
                return Err(CoreError::CategoryNotFound(id));
            }
            Ok(())
        })?;
        info!(%id, "category removed");
        self.category_subscribers.notify(owner, &document.categories);
        Ok(())
    }

    fn subscribe_expenses(
        &self,
        owner: &OwnerId,
        listener: ExpenseListener,
    ) -> Result<Subscription, CoreError> {
        let _publishing = self.publishing()?;
        listener(&self.fetch_expenses(owner)?);
        Ok(self.expense_subscribers.add(owner, listener))
    }

    fn subscribe_categories(
        &self,
        owner: &OwnerId,
        listener: CategoryListener,
    ) -> Result<Subscription, CoreError> {
        let _publishing = self.publishing()?;
        listener(&self.fetch_categories(owner)?);
        Ok(self.category_subscribers.add(owner, listener))
    }
}

/// Key-value entries stored as one file each.
#[derive(Debug, Clone)]
pub struct JsonKeyValueStore {
    root: PathBuf,
}

impl JsonKeyValueStore {
    pub fn new(root: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_name(key), FILE_EXTENSION))
    }
}

impl KeyValueStore for JsonKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.entry_path(key);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(key, "key-value entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Opens both stores below `paths`.
pub fn open(paths: &StoragePaths) -> Result<(JsonExpenseStore, JsonKeyValueStore), CoreError> {
    Ok((
        JsonExpenseStore::new(paths.users_root.clone())?,
        JsonKeyValueStore::new(paths.kv_root.clone())?,
    ))
}

/// Maps an id to a file stem, one-to-one.
///
/// ASCII letters, digits and `-` are kept; every other byte, `_` included,
/// becomes `_` followed by two hex digits.
fn canonical_name(name: &str) -> String {
    if name.is_empty() {
        return "_".into();
    }
    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' => encoded.push(char::from(byte)),
            _ => encoded.push_str(&format!("_{byte:02x}")),
        }
    }
    encoded
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
