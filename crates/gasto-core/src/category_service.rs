use std::sync::Arc;

use gasto_domain::{Category, CategoryIcon, PaletteColor};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    budget_service::{BudgetService, CategoryReport},
    session::Session,
    storage::ExpenseStore,
    validation::{validate_budget, validate_category_name},
    CoreError,
};

/// Values collected by the "new category" form.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub monthly_budget: f64,
    pub icon: CategoryIcon,
    pub color: PaletteColor,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>, monthly_budget: f64) -> Self {
        Self {
            name: name.into(),
            monthly_budget,
            icon: CategoryIcon::default(),
            color: PaletteColor::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub monthly_budget: Option<f64>,
    pub icon: Option<CategoryIcon>,
    pub color: Option<PaletteColor>,
}

/// Category management for the session's user.
///
/// Renaming or deleting a category leaves existing expenses untouched: they
/// keep the recorded label and fall back to "Other" once the id dangles.
pub struct CategoryService {
    store: Arc<dyn ExpenseStore>,
    session: Session,
}

impl CategoryService {
    pub fn new(store: Arc<dyn ExpenseStore>, session: Session) -> Self {
        Self { store, session }
    }

    pub fn list(&self) -> Result<Vec<Category>, CoreError> {
        let categories = self.store.fetch_categories(self.session.owner())?;
        debug!(owner = %self.session.owner(), count = categories.len(), "categories fetched");
        Ok(categories)
    }

    pub fn get(&self, id: Uuid) -> Result<Category, CoreError> {
        self.list()?
            .into_iter()
            .find(|category| category.id == id)
            .ok_or(CoreError::CategoryNotFound(id))
    }

    /// Looks a category up by id prefix or by case-insensitive name.
    pub fn find(&self, needle: &str) -> Result<Category, CoreError> {
        let needle = needle.trim();
        let lowered = needle.to_lowercase();
        let categories = self.list()?;
        if let Some(category) = categories
            .iter()
            .find(|category| category.name.to_lowercase() == lowered)
        {
            return Ok(category.clone());
        }
        let mut by_id: Vec<&Category> = categories
            .iter()
            .filter(|category| !lowered.is_empty() && category.id.to_string().starts_with(&lowered))
            .collect();
        match by_id.len() {
            1 => Ok(by_id.remove(0).clone()),
            0 => Err(CoreError::Validation(format!("no category matches `{needle}`"))),
            n => Err(CoreError::Validation(format!(
                "`{needle}` matches {n} categories"
            ))),
        }
    }

    pub fn add(&self, draft: CategoryDraft) -> Result<Category, CoreError> {
        let name = validate_category_name(&draft.name)?;
        validate_budget(draft.monthly_budget)?;
        let category = Category::new(self.session.owner().clone(), name, draft.monthly_budget)
            .with_style(draft.icon, draft.color);
        let saved = self.store.insert_category(category)?;
        info!(id = %saved.id, name = %saved.name, "category created");
        Ok(saved)
    }

    pub fn edit(&self, id: Uuid, patch: CategoryPatch) -> Result<Category, CoreError> {
        let mut category = self.get(id)?;
        if let Some(name) = patch.name {
            category.name = validate_category_name(&name)?;
        }
        if let Some(budget) = patch.monthly_budget {
            validate_budget(budget)?;
            category.monthly_budget = budget;
        }
        if let Some(icon) = patch.icon {
            category.icon = icon;
        }
        if let Some(color) = patch.color {
            category.color = color;
        }
        let saved = self.store.update_category(category)?;
        info!(id = %saved.id, "category updated");
        Ok(saved)
    }

    pub fn delete(&self, id: Uuid) -> Result<(), CoreError> {
        self.store.delete_category(self.session.owner(), id)?;
        info!(%id, "category deleted");
        Ok(())
    }

    /// Per-category budget usage across all of the user's expenses.
    pub fn report(&self) -> Result<CategoryReport, CoreError> {
        let categories = self.list()?;
        let expenses = self.store.fetch_expenses(self.session.owner())?;
        Ok(BudgetService::category_report(&categories, &expenses))
    }
}
