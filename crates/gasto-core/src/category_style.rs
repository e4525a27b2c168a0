//! Maps expense category labels to their display icon and colour.

use std::collections::HashMap;

use gasto_domain::{Category, CategoryStyle, Expense};
use uuid::Uuid;

/// Name- and id-keyed view over a user's categories.
///
/// When several categories share a name, the first one in input order wins.
#[derive(Debug, Default)]
pub struct CategoryIndex<'a> {
    by_name: HashMap<&'a str, &'a Category>,
    by_id: HashMap<Uuid, &'a Category>,
}

impl<'a> CategoryIndex<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        let mut by_name = HashMap::with_capacity(categories.len());
        let mut by_id = HashMap::with_capacity(categories.len());
        for category in categories {
            by_name.entry(category.name.as_str()).or_insert(category);
            by_id.entry(category.id).or_insert(category);
        }
        Self { by_name, by_id }
    }

    pub fn by_name(&self, name: &str) -> Option<&'a Category> {
        self.by_name.get(name).copied()
    }

    pub fn by_id(&self, id: Uuid) -> Option<&'a Category> {
        self.by_id.get(&id).copied()
    }

    /// Exact-name lookup; absent, empty or unknown labels resolve to the "Other" style.
    pub fn style_for_label(&self, label: Option<&str>) -> CategoryStyle {
        label
            .filter(|name| !name.is_empty())
            .and_then(|name| self.by_name(name))
            .map(Category::style)
            .unwrap_or_else(CategoryStyle::other)
    }

    /// Prefers the live category referenced by id, then falls back to the stored label.
    pub fn style_for_expense(&self, expense: &Expense) -> CategoryStyle {
        match expense.category_id.and_then(|id| self.by_id(id)) {
            Some(category) => category.style(),
            None if expense.is_uncategorized() => CategoryStyle::other(),
            None => self.style_for_label(Some(&expense.category_label)),
        }
    }
}

/// Resolves the icon and colour for a category label.
pub fn resolve_category_style(label: Option<&str>, categories: &[Category]) -> CategoryStyle {
    CategoryIndex::new(categories).style_for_label(label)
}

/// Resolves the icon and colour for an expense row.
pub fn resolve_expense_style(expense: &Expense, categories: &[Category]) -> CategoryStyle {
    CategoryIndex::new(categories).style_for_expense(expense)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gasto_domain::{CategoryIcon, CategoryRef, OwnerId, PaletteColor, UNCATEGORIZED_LABEL};

    fn categories() -> Vec<Category> {
        let owner = OwnerId::new("u");
        vec![
            Category::new(owner.clone(), "Transporte", 200.0)
                .with_style(CategoryIcon::Train, PaletteColor::Purple),
            Category::new(owner, "Transporte", 50.0)
                .with_style(CategoryIcon::DirectionsCar, PaletteColor::Red),
        ]
    }

    #[test]
    fn known_label_resolves_to_category_style() {
        let style = resolve_category_style(Some("Transporte"), &categories());
        assert_eq!(style.icon, CategoryIcon::Train);
        assert_eq!(style.color, PaletteColor::Purple);
    }

    #[test]
    fn unknown_or_missing_labels_resolve_to_other() {
        let categories = categories();
        for label in [None, Some(""), Some("transporte"), Some(UNCATEGORIZED_LABEL)] {
            let style = resolve_category_style(label, &categories);
            assert_eq!(style, CategoryStyle::other(), "label {label:?}");
            assert_eq!(style.color.hex(), "#666666");
            assert_eq!(style.icon.as_str(), "folder");
        }
    }

    #[test]
    fn expense_style_follows_id_after_rename() {
        let mut categories = categories();
        let expense = Expense::new(OwnerId::new("u"), "Uber", 20.0)
            .with_category(Some(CategoryRef::from(&categories[1])));
        categories[1].name = "Carro".into();
        let style = resolve_expense_style(&expense, &categories);
        assert_eq!(style.icon, CategoryIcon::DirectionsCar);
    }

    #[test]
    fn expense_of_deleted_category_falls_back_to_label_then_other() {
        let categories = categories();
        let ghost = Category::new(OwnerId::new("u"), "Viagem", 0.0);
        let expense = Expense::new(OwnerId::new("u"), "Hotel", 300.0)
            .with_category(Some(CategoryRef::from(&ghost)));
        assert_eq!(resolve_expense_style(&expense, &categories), CategoryStyle::other());
    }
}
