use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use chrono::NaiveDate;
use gasto_core::{
    storage::{ExpenseStore, KeyValueStore},
    BalanceService, CategoryDraft, CategoryService, CoreError, ExpenseDraft, ExpenseService,
    Session,
};
use gasto_domain::{Category, Expense, MonthKey, OwnerId};
use gasto_storage_json::{open, JsonExpenseStore, JsonKeyValueStore, StoragePaths};
use tempfile::tempdir;

#[test]
fn json_store_persists_expenses_across_instances() {
    let dir = tempdir().expect("tempdir");
    let owner = OwnerId::new("alice");
    let saved = {
        let store = JsonExpenseStore::new(dir.path().join("users")).expect("store");
        store
            .insert_expense(Expense::new(owner.clone(), "Mercado", 87.3))
            .expect("insert")
    };

    let reopened = JsonExpenseStore::new(dir.path().join("users")).expect("store");
    let expenses = reopened.fetch_expenses(&owner).expect("fetch");
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].id, saved.id);
    assert_eq!(expenses[0].title, "Mercado");
    assert!(reopened.document_path(&owner).exists());
}

#[test]
fn json_store_scopes_records_by_owner() {
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(dir.path().to_path_buf()).expect("store");
    let alice = OwnerId::new("alice");
    let bob = OwnerId::new("bob");

    let expense = store
        .insert_expense(Expense::new(alice.clone(), "Aluguel", 1200.0))
        .expect("insert");
    store
        .insert_category(Category::new(bob.clone(), "Lazer", 50.0))
        .expect("insert");

    assert!(store.fetch_expenses(&bob).expect("fetch").is_empty());
    assert!(store.fetch_categories(&alice).expect("fetch").is_empty());
    assert!(matches!(
        store.delete_expense(&bob, expense.id),
        Err(CoreError::ExpenseNotFound(_))
    ));
    assert_eq!(store.fetch_expenses(&alice).expect("fetch").len(), 1);
}

#[test]
fn json_store_notifies_subscribers_until_dropped() {
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(dir.path().to_path_buf()).expect("store");
    let owner = OwnerId::new("alice");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let subscription = store
        .subscribe_expenses(
            &owner,
            Box::new(move |expenses: &[Expense]| {
                sink.lock().unwrap().push(expenses.len());
            }),
        )
        .expect("subscribe");

    let first = store
        .insert_expense(Expense::new(owner.clone(), "Café", 6.0))
        .expect("insert");
    store
        .insert_expense(Expense::new(OwnerId::new("bob"), "Chá", 4.0))
        .expect("insert");
    store.delete_expense(&owner, first.id).expect("delete");
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 0]);

    drop(subscription);
    store
        .insert_expense(Expense::new(owner, "Suco", 8.0))
        .expect("insert");
    assert_eq!(seen.lock().unwrap().len(), 3);
}

#[test]
fn category_subscription_sees_renames() {
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(dir.path().to_path_buf()).expect("store");
    let owner = OwnerId::new("alice");
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let _subscription = store
        .subscribe_categories(
            &owner,
            Box::new(move |_categories: &[Category]| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .expect("subscribe");

    let mut category = store
        .insert_category(Category::new(owner.clone(), "Casa", 300.0))
        .expect("insert");
    category.name = "Moradia".into();
    store.update_category(category).expect("update");

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(store.fetch_categories(&owner).expect("fetch")[0].name, "Moradia");
}

#[test]
fn services_run_on_top_of_json_stores() {
    let dir = tempdir().expect("tempdir");
    let (expenses, kv) = open(&StoragePaths::under(dir.path())).expect("open");
    let expenses = Arc::new(expenses);
    let session = Session::new(OwnerId::new("alice")).expect("session");

    let categories = CategoryService::new(expenses.clone(), session.clone());
    let transport = categories
        .add(CategoryDraft::new("Transporte", 150.0))
        .expect("category");
    let service = ExpenseService::new(expenses.clone(), session.clone());
    service
        .add(ExpenseDraft {
            title: "Ônibus".into(),
            amount: 4.4,
            category: Some(transport.id),
            date: NaiveDate::from_ymd_opt(2024, 5, 2),
            ..ExpenseDraft::default()
        })
        .expect("expense");

    let report = categories.report().expect("report");
    assert_eq!(report.line(transport.id).expect("line").progress.spent, 4.4);

    let balance_file = kv.entry_path("saldos_alice");
    let balances = BalanceService::new(Arc::new(kv), session);
    let may = MonthKey::new(2024, 5).expect("month");
    balances.record(may, 2500.0, false).expect("balance");
    assert!(balance_file.exists());
    assert!(balance_file.starts_with(dir.path().join("local")));
}

#[test]
fn key_value_store_round_trips_and_removes() {
    let dir = tempdir().expect("tempdir");
    let kv = JsonKeyValueStore::new(dir.path().to_path_buf()).expect("kv");
    assert_eq!(kv.get("perfil_alice").expect("get"), None);

    kv.set("perfil_alice", r#"{"name":"Alice"}"#).expect("set");
    assert_eq!(
        kv.get("perfil_alice").expect("get").as_deref(),
        Some(r#"{"name":"Alice"}"#)
    );
    assert!(!kv.entry_path("perfil_alice").with_extension("json.tmp").exists());

    kv.remove("perfil_alice").expect("remove");
    kv.remove("perfil_alice").expect("remove twice");
    assert_eq!(kv.get("perfil_alice").expect("get"), None);
}

#[test]
fn corrupt_documents_surface_as_serde_errors() {
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(dir.path().to_path_buf()).expect("store");
    let owner = OwnerId::new("alice");
    std::fs::write(store.document_path(&owner), "{ not json").expect("write");
    assert!(matches!(
        store.fetch_expenses(&owner),
        Err(CoreError::Serde(_))
    ));
}

#[test]
fn owners_with_similar_ids_keep_separate_documents() {
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(dir.path().to_path_buf()).expect("store");
    let dotted = OwnerId::new("ana.silva");
    let underscored = OwnerId::new("ana_silva");
    assert_ne!(store.document_path(&dotted), store.document_path(&underscored));

    store
        .insert_expense(Expense::new(dotted.clone(), "Feira", 42.0))
        .expect("insert");
    store
        .insert_category(Category::new(dotted.clone(), "Casa", 300.0))
        .expect("insert");
    store
        .insert_expense(Expense::new(underscored.clone(), "Cinema", 30.0))
        .expect("insert");
    store
        .insert_category(Category::new(underscored.clone(), "Lazer", 80.0))
        .expect("insert");

    let expenses = store.fetch_expenses(&dotted).expect("fetch");
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].title, "Feira");
    assert_eq!(store.fetch_categories(&dotted).expect("fetch")[0].name, "Casa");
    assert_eq!(store.fetch_expenses(&underscored).expect("fetch")[0].title, "Cinema");
}

#[test]
fn writes_keep_records_of_other_owners_found_in_a_document() {
    let dir = tempdir().expect("tempdir");
    let store = JsonExpenseStore::new(dir.path().to_path_buf()).expect("store");
    let alice = OwnerId::new("alice");
    let bob = OwnerId::new("bob");
    store
        .insert_expense(Expense::new(bob.clone(), "Táxi", 25.0))
        .expect("insert");
    std::fs::copy(store.document_path(&bob), store.document_path(&alice)).expect("copy");

    store
        .insert_expense(Expense::new(alice.clone(), "Livro", 59.9))
        .expect("insert");

    assert_eq!(store.fetch_expenses(&alice).expect("fetch").len(), 1);
    let raw = std::fs::read_to_string(store.document_path(&alice)).expect("read");
    assert!(raw.contains("Táxi"));
    assert!(raw.contains("Livro"));
}

#[test]
fn key_value_entries_with_similar_keys_stay_apart() {
    let dir = tempdir().expect("tempdir");
    let kv = JsonKeyValueStore::new(dir.path().to_path_buf()).expect("kv");
    kv.set("saldos_a.b", "[1]").expect("set");
    kv.set("saldos_a_b", "[2]").expect("set");

    assert_eq!(kv.get("saldos_a.b").expect("get").as_deref(), Some("[1]"));
    assert_eq!(kv.get("saldos_a_b").expect("get").as_deref(), Some("[2]"));
    kv.remove("saldos_a_b").expect("remove");
    assert_eq!(kv.get("saldos_a.b").expect("get").as_deref(), Some("[1]"));
}

#[test]
fn subscription_snapshots_follow_write_order_across_threads() {
    let dir = tempdir().expect("tempdir");
    let store = Arc::new(JsonExpenseStore::new(dir.path().to_path_buf()).expect("store"));
    let owner = OwnerId::new("alice");
    let sizes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&sizes);
    let _subscription = store
        .subscribe_expenses(
            &owner,
            Box::new(move |expenses: &[Expense]| {
                sink.lock().unwrap().push(expenses.len());
            }),
        )
        .expect("subscribe");

    let writers: Vec<_> = (0..3)
        .map(|_| {
            let store = Arc::clone(&store);
            let owner = owner.clone();
            std::thread::spawn(move || {
                for _ in 0..5 {
                    store
                        .insert_expense(Expense::new(owner.clone(), "Café", 5.0))
                        .expect("insert");
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().expect("writer");
    }

    assert_eq!(*sizes.lock().unwrap(), (0..=15).collect::<Vec<_>>());
}
