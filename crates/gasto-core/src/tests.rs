use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    category_service::{CategoryDraft, CategoryPatch, CategoryService},
    expense_service::{ExpenseDraft, ExpensePatch, ExpenseService},
    insights::Insight,
    memory_store::MemoryStore,
    resolve_expense_style,
    session::Session,
    storage::ExpenseStore,
    time::FixedClock,
    CoreError,
};
use gasto_domain::{CategoryStyle, OwnerId, UNCATEGORIZED_LABEL};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn services(owner: &str) -> (Arc<MemoryStore>, ExpenseService, CategoryService) {
    let store = Arc::new(MemoryStore::new());
    let session = Session::new(OwnerId::new(owner)).unwrap();
    let expenses = ExpenseService::new(store.clone(), session.clone())
        .with_clock(Arc::new(FixedClock::on(date(2024, 1, 25))));
    let categories = CategoryService::new(store.clone(), session);
    (store, expenses, categories)
}

fn draft(title: &str, amount: f64, category: Option<uuid::Uuid>, on: NaiveDate) -> ExpenseDraft {
    ExpenseDraft {
        title: title.into(),
        amount,
        category,
        date: Some(on),
        ..ExpenseDraft::default()
    }
}

#[test]
fn session_requires_an_owner() {
    assert!(matches!(
        Session::new(OwnerId::new("  ")),
        Err(CoreError::Validation(_))
    ));
}

#[test]
fn expense_service_adds_with_category_pair() {
    let (_, expenses, categories) = services("u1");
    let food = categories.add(CategoryDraft::new("Alimentação", 500.0)).unwrap();

    let lunch = expenses
        .add(draft("Almoço", 32.5, Some(food.id), date(2024, 1, 10)))
        .unwrap();
    assert_eq!(lunch.category_id, Some(food.id));
    assert_eq!(lunch.category_label, "Alimentação");

    let taxi = expenses.add(draft("Táxi", 20.0, None, date(2024, 1, 11))).unwrap();
    assert_eq!(taxi.category_id, None);
    assert_eq!(taxi.category_label, UNCATEGORIZED_LABEL);
}

#[test]
fn expense_service_rejects_invalid_drafts() {
    let (_, expenses, _) = services("u1");
    let on = date(2024, 1, 10);
    assert!(expenses.add(draft("   ", 10.0, None, on)).is_err());
    assert!(expenses.add(draft("Ok", 0.0, None, on)).is_err());
    assert!(expenses.add(draft("Ok", f64::NAN, None, on)).is_err());
    assert!(expenses.add(draft(&"x".repeat(51), 1.0, None, on)).is_err());
    assert!(matches!(
        expenses.add(draft("Ok", 1.0, Some(uuid::Uuid::new_v4()), on)),
        Err(CoreError::CategoryNotFound(_))
    ));
    assert!(expenses.list().unwrap().is_empty());
}

#[test]
fn expense_without_date_uses_the_clock() {
    let (_, expenses, _) = services("u1");
    let saved = expenses
        .add(ExpenseDraft {
            title: "Café".into(),
            amount: 5.0,
            ..ExpenseDraft::default()
        })
        .unwrap();
    assert_eq!(saved.attributed_date(), date(2024, 1, 25));
}

#[test]
fn editing_moves_an_expense_between_categories() {
    let (_, expenses, categories) = services("u1");
    let home = categories.add(CategoryDraft::new("Casa", 0.0)).unwrap();
    let saved = expenses.add(draft("Luz", 90.0, None, date(2024, 1, 5))).unwrap();

    let moved = expenses
        .edit(
            saved.id,
            ExpensePatch {
                category: Some(Some(home.id)),
                description: Some(Some("  conta de janeiro ".into())),
                ..ExpensePatch::default()
            },
        )
        .unwrap();
    assert_eq!(moved.category_label, "Casa");
    assert_eq!(moved.description.as_deref(), Some("conta de janeiro"));

    let back = expenses
        .edit(
            saved.id,
            ExpensePatch {
                category: Some(None),
                description: Some(None),
                ..ExpensePatch::default()
            },
        )
        .unwrap();
    assert!(back.is_uncategorized());
    assert_eq!(back.category_label, UNCATEGORIZED_LABEL);
    assert_eq!(back.description, None);
}

#[test]
fn deleted_category_falls_back_to_other() {
    let (_, expenses, categories) = services("u1");
    let fun = categories.add(CategoryDraft::new("Lazer", 100.0)).unwrap();
    let cinema = expenses
        .add(draft("Cinema", 40.0, Some(fun.id), date(2024, 1, 12)))
        .unwrap();

    categories.delete(fun.id).unwrap();

    let kept = expenses.get(cinema.id).unwrap();
    assert_eq!(kept.category_label, "Lazer");
    assert_eq!(
        resolve_expense_style(&kept, &categories.list().unwrap()),
        CategoryStyle::other()
    );
    let report = categories.report().unwrap();
    assert!(report.lines.is_empty());
    assert_eq!(report.other_spent, 40.0);
}

#[test]
fn other_is_reserved_for_uncategorized_expenses() {
    let (store, _, categories) = services("u1");
    for name in [UNCATEGORIZED_LABEL, "other"] {
        assert!(matches!(
            categories.add(CategoryDraft::new(name, 10.0)),
            Err(CoreError::Validation(_))
        ));
    }

    let food = categories.add(CategoryDraft::new("Comida", 10.0)).unwrap();
    let renamed = categories.edit(
        food.id,
        CategoryPatch {
            name: Some(" OTHER".into()),
            ..CategoryPatch::default()
        },
    );
    assert!(matches!(renamed, Err(CoreError::Validation(_))));
    let stored = store.fetch_categories(&OwnerId::new("u1")).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Comida");
}

#[test]
fn category_report_tracks_budgets() {
    let (_, expenses, categories) = services("u1");
    let market = categories.add(CategoryDraft::new("Mercado", 200.0)).unwrap();
    expenses
        .add(draft("Feira", 180.0, Some(market.id), date(2024, 1, 3)))
        .unwrap();
    expenses
        .add(draft("Padaria", 40.0, Some(market.id), date(2024, 1, 4)))
        .unwrap();

    let report = categories.report().unwrap();
    let line = report.line(market.id).unwrap();
    assert_eq!(line.progress.spent, 220.0);
    assert!(line.progress.over_budget);
    assert_eq!(report.over_budget().count(), 1);

    categories
        .edit(
            market.id,
            CategoryPatch {
                monthly_budget: Some(400.0),
                ..CategoryPatch::default()
            },
        )
        .unwrap();
    assert!(!categories.report().unwrap().over_budget().any(|_| true));
}

#[test]
fn dashboard_reflects_current_month() {
    let (_, expenses, _) = services("u1");
    expenses.add(draft("A", 100.0, None, date(2024, 1, 15))).unwrap();
    expenses.add(draft("B", 50.0, None, date(2024, 1, 20))).unwrap();
    expenses.add(draft("C", 10.0, None, date(2023, 12, 1))).unwrap();

    let report = expenses.dashboard(2).unwrap();
    assert_eq!(report.current_month_total, 150.0);
    assert_eq!(report.top_expenses.len(), 2);
    assert_eq!(report.monthly_series.len(), 2);
    assert_eq!(report.insights[0], Insight::MonthToDate(150.0));

    let home = expenses.home().unwrap();
    assert_eq!(home.expenses[0].title, "B");
    assert_eq!(home.total, 160.0);
}

#[test]
fn users_never_see_each_other() {
    let store = Arc::new(MemoryStore::new());
    let alice = ExpenseService::new(store.clone(), Session::new(OwnerId::new("alice")).unwrap());
    let bob = ExpenseService::new(store.clone(), Session::new(OwnerId::new("bob")).unwrap());

    let saved = alice.add(draft("Livro", 60.0, None, date(2024, 2, 1))).unwrap();
    assert!(bob.list().unwrap().is_empty());
    assert!(matches!(bob.get(saved.id), Err(CoreError::ExpenseNotFound(_))));
    assert!(matches!(bob.delete(saved.id), Err(CoreError::NotOwner)));
    assert_eq!(store.fetch_expenses(&OwnerId::new("alice")).unwrap().len(), 1);
}

#[test]
fn find_by_prefix_requires_unique_match() {
    let (_, expenses, _) = services("u1");
    let saved = expenses.add(draft("Uber", 18.0, None, date(2024, 1, 2))).unwrap();
    let prefix = &saved.id.to_string()[..8];
    assert_eq!(expenses.find_by_prefix(prefix).unwrap().id, saved.id);
    assert!(expenses.find_by_prefix("zzzz").is_err());
}
