use std::sync::Arc;

use chrono::NaiveDate;
use gasto_domain::{start_of_day, CategoryRef, Expense};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    session::Session,
    storage::{record_warnings, ExpenseStore},
    summary_service::{DashboardReport, HomeSummary, SummaryService},
    time::{Clock, SystemClock},
    validation::{validate_amount, validate_description, validate_title},
    CoreError,
};

/// Values collected by the "add expense" form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseDraft {
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub category: Option<Uuid>,
    /// Attributed date; today when absent.
    pub date: Option<NaiveDate>,
}

/// Partial update applied by "edit expense". `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub amount: Option<f64>,
    /// `Some(None)` moves the expense to "Other".
    pub category: Option<Option<Uuid>>,
    pub date: Option<NaiveDate>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Expense operations on behalf of the session's user.
pub struct ExpenseService {
    store: Arc<dyn ExpenseStore>,
    session: Session,
    clock: Arc<dyn Clock>,
}

impl ExpenseService {
    pub fn new(store: Arc<dyn ExpenseStore>, session: Session) -> Self {
        Self {
            store,
            session,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn list(&self) -> Result<Vec<Expense>, CoreError> {
        let expenses = self.store.fetch_expenses(self.session.owner())?;
        debug!(owner = %self.session.owner(), count = expenses.len(), "expenses fetched");
        Ok(expenses)
    }

    pub fn get(&self, id: Uuid) -> Result<Expense, CoreError> {
        self.list()?
            .into_iter()
            .find(|expense| expense.id == id)
            .ok_or(CoreError::ExpenseNotFound(id))
    }

    /// Resolves a full id or a unique leading fragment of one.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Expense, CoreError> {
        let prefix = prefix.trim().to_ascii_lowercase();
        if prefix.is_empty() {
            return Err(CoreError::Validation("an expense id is required".into()));
        }
        let mut matches: Vec<Expense> = self
            .list()?
            .into_iter()
            .filter(|expense| expense.id.to_string().starts_with(&prefix))
            .collect();
        match matches.len() {
            0 => Err(CoreError::Validation(format!("no expense matches `{prefix}`"))),
            1 => Ok(matches.remove(0)),
            n => Err(CoreError::Validation(format!(
                "`{prefix}` matches {n} expenses; type more of the id"
            ))),
        }
    }

    pub fn add(&self, draft: ExpenseDraft) -> Result<Expense, CoreError> {
        let title = validate_title(&draft.title)?;
        let description = validate_description(draft.description.as_deref())?;
        validate_amount(draft.amount)?;
        let category = self.category_ref(draft.category)?;

        let mut expense = Expense::new(self.session.owner().clone(), title, draft.amount)
            .with_category(category);
        expense.set_description(description);
        expense.created_at = match draft.date {
            Some(date) => start_of_day(date),
            None => self.clock.now(),
        };

        let saved = self.store.insert_expense(expense)?;
        info!(id = %saved.id, amount = saved.amount, "expense recorded");
        Ok(saved)
    }

    pub fn edit(&self, id: Uuid, patch: ExpensePatch) -> Result<Expense, CoreError> {
        let mut expense = self.get(id)?;
        if let Some(title) = patch.title {
            expense.title = validate_title(&title)?;
        }
        if let Some(description) = patch.description {
            expense.set_description(validate_description(description.as_deref())?);
        }
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
            expense.amount = amount;
        }
        if let Some(category) = patch.category {
            expense.set_category(self.category_ref(category)?);
        }
        if let Some(date) = patch.date {
            expense.created_at = start_of_day(date);
        }

        let saved = self.store.update_expense(expense)?;
        info!(id = %saved.id, "expense updated");
        Ok(saved)
    }

    pub fn delete(&self, id: Uuid) -> Result<(), CoreError> {
        self.store.delete_expense(self.session.owner(), id)?;
        info!(%id, "expense deleted");
        Ok(())
    }

    /// Expense list for the home screen, newest first.
    pub fn home(&self) -> Result<HomeSummary, CoreError> {
        Ok(SummaryService::home(&self.list()?))
    }

    pub fn dashboard(&self, top_n: usize) -> Result<DashboardReport, CoreError> {
        let expenses = self.list()?;
        let categories = self.store.fetch_categories(self.session.owner())?;
        for warning in record_warnings(&expenses, &categories) {
            warn!("{warning}");
        }
        Ok(SummaryService::dashboard(
            &expenses,
            self.clock.today(),
            top_n,
        ))
    }

    fn category_ref(&self, id: Option<Uuid>) -> Result<Option<CategoryRef>, CoreError> {
        let Some(id) = id else {
            return Ok(None);
        };
        self.store
            .fetch_categories(self.session.owner())?
            .iter()
            .find(|category| category.id == id)
            .map(|category| Some(CategoryRef::from(category)))
            .ok_or(CoreError::CategoryNotFound(id))
    }
}
