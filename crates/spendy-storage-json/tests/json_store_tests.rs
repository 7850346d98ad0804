use std::fs;

use spendy_core::{RetryPolicy, Session, StoreError, TransactionService, TransactionStore};
use spendy_domain::{
    parse_occurred_at, Category, Cents, NewTransaction, OwnerId, TransactionDraft,
    TransactionKind,
};
use spendy_storage_json::{load_document_from_path, JsonTransactionStore, DOCUMENT_SCHEMA_VERSION};
use tempfile::tempdir;

fn fields(category: Category, cents: i64, date: &str) -> NewTransaction {
    NewTransaction::new(
        category.kind(),
        category,
        Cents::new(cents),
        category.label(),
        parse_occurred_at(date).expect("date"),
    )
    .expect("valid fields")
}

#[test]
fn json_store_persists_and_fetches_newest_first() {
    let dir = tempdir().expect("tempdir");
    let store = JsonTransactionStore::new(dir.path().join("data")).expect("create store");
    let owner = OwnerId::new("dana");

    store
        .create_transaction(&owner, fields(Category::Food, 1250, "2024-01-05"))
        .expect("create first");
    store
        .create_transaction(&owner, fields(Category::Salary, 300_000, "2024-02-01"))
        .expect("create second");

    let reopened = JsonTransactionStore::new(dir.path().join("data")).expect("reopen store");
    let fetched = reopened.fetch_transactions(&owner).expect("fetch");
    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0].category, Category::Salary);
    assert_eq!(fetched[1].amount, Cents::new(1250));

    let path = store.document_path(&owner);
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn json_store_keeps_owners_apart() {
    let dir = tempdir().expect("tempdir");
    let store = JsonTransactionStore::new(dir.path().to_path_buf()).expect("create store");
    let dana = OwnerId::new("dana");
    let lee = OwnerId::new("lee");

    store
        .create_transaction(&dana, fields(Category::Housing, 90_000, "2024-03-01"))
        .expect("create");

    assert_eq!(store.fetch_transactions(&dana).expect("fetch dana").len(), 1);
    assert!(store.fetch_transactions(&lee).expect("fetch lee").is_empty());
}

#[test]
fn json_store_documents_carry_schema_version_and_cents() {
    let dir = tempdir().expect("tempdir");
    let store = JsonTransactionStore::new(dir.path().to_path_buf()).expect("create store");
    let owner = OwnerId::new("dana");
    store
        .create_transaction(&owner, fields(Category::Food, 1999, "2024-01-05"))
        .expect("create");

    let document = load_document_from_path(&store.document_path(&owner)).expect("load");
    assert_eq!(document.schema_version, DOCUMENT_SCHEMA_VERSION);
    assert_eq!(document.owner_id, owner);

    let raw = fs::read_to_string(store.document_path(&owner)).expect("read");
    assert!(raw.contains("\"amount_cents\": 1999"));
}

#[test]
fn json_store_rejects_newer_schema() {
    let dir = tempdir().expect("tempdir");
    let store = JsonTransactionStore::new(dir.path().to_path_buf()).expect("create store");
    let owner = OwnerId::new("dana");
    fs::write(
        store.document_path(&owner),
        r#"{"schema_version": 99, "owner_id": "dana", "transactions": []}"#,
    )
    .expect("write");

    let err = store.fetch_transactions(&owner).unwrap_err();
    assert!(matches!(err, StoreError::Serde(_)));
    assert!(!err.is_retryable());
}

#[test]
fn json_store_reads_hand_written_dates() {
    let dir = tempdir().expect("tempdir");
    let store = JsonTransactionStore::new(dir.path().to_path_buf()).expect("create store");
    let owner = OwnerId::new("dana");
    fs::write(
        store.document_path(&owner),
        r#"{
  "schema_version": 1,
  "owner_id": "dana",
  "transactions": [
    {
      "id": "6f1c1f3e-1d7a-4a53-9a7e-3f0c2b7d9e10",
      "owner_id": "dana",
      "kind": "expense",
      "category": "Food",
      "amount_cents": 450,
      "description": "Coffee",
      "occurred_at": "2024-03-09T23:30:00-05:00"
    }
  ]
}"#,
    )
    .expect("write");

    let fetched = store.fetch_transactions(&owner).expect("fetch");
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].date().to_string(), "2024-03-09");
    assert_eq!(fetched[0].kind, TransactionKind::Expense);
}

#[test]
fn json_store_backs_transaction_service() {
    let dir = tempdir().expect("tempdir");
    let store = JsonTransactionStore::new(dir.path().to_path_buf()).expect("create store");
    let session = Session::new(OwnerId::new("dana"));
    let draft = TransactionDraft {
        kind: "income".into(),
        category: "other income".into(),
        amount: "12.5".into(),
        description: "Refund".into(),
        date: "2024-04-02".into(),
    };

    TransactionService::add(&store, &session, &draft).expect("add");
    let loaded =
        TransactionService::load(&store, &session, RetryPolicy::no_retry()).expect("load");
    assert_eq!(loaded[0].amount, Cents::new(1250));
    assert_eq!(loaded[0].category, Category::OtherIncome);
}

#[test]
fn json_store_separates_owners_differing_only_in_case_or_punctuation() {
    let dir = tempdir().expect("tempdir");
    let store = JsonTransactionStore::new(dir.path().to_path_buf()).expect("create store");
    let owners = ["Alice", "alice", "Dana Smith", "dana_smith", "a.b", "a_b"];

    for (idx, name) in owners.iter().enumerate() {
        let cents = 100 * (idx as i64 + 1);
        store
            .create_transaction(&OwnerId::new(*name), fields(Category::Food, cents, "2024-05-01"))
            .expect("create");
    }

    for (idx, name) in owners.iter().enumerate() {
        let fetched = store.fetch_transactions(&OwnerId::new(*name)).expect("fetch");
        assert_eq!(fetched.len(), 1, "owner `{name}`");
        assert_eq!(fetched[0].amount, Cents::new(100 * (idx as i64 + 1)));
        assert_eq!(fetched[0].owner_id, OwnerId::new(*name));
    }
}

fn write_single_record(store: &JsonTransactionStore, owner: &OwnerId, record: &str) {
    let document = format!(
        r#"{{"schema_version": 1, "owner_id": "{}", "transactions": [{}]}}"#,
        owner, record
    );
    fs::write(store.document_path(owner), document).expect("write");
}

#[test]
fn json_store_rejects_records_that_break_transaction_rules() {
    let dir = tempdir().expect("tempdir");
    let store = JsonTransactionStore::new(dir.path().to_path_buf()).expect("create store");
    let owner = OwnerId::new("bob");
    write_single_record(
        &store,
        &owner,
        r#"{"id": "6f1c1f3e-1d7a-4a53-9a7e-3f0c2b7d9e10", "owner_id": "bob",
            "kind": "income", "category": "Food", "amount_cents": -500,
            "description": "", "occurred_at": "2024-03-09"}"#,
    );

    let err = store.fetch_transactions(&owner).unwrap_err();
    assert!(matches!(err, StoreError::Serde(_)));
    assert!(!err.is_retryable());
}

#[test]
fn json_store_rejects_records_owned_by_someone_else() {
    let dir = tempdir().expect("tempdir");
    let store = JsonTransactionStore::new(dir.path().to_path_buf()).expect("create store");
    let owner = OwnerId::new("bob");
    write_single_record(
        &store,
        &owner,
        r#"{"id": "6f1c1f3e-1d7a-4a53-9a7e-3f0c2b7d9e10", "owner_id": "mallory",
            "kind": "expense", "category": "Food", "amount_cents": 500,
            "description": "Lunch", "occurred_at": "2024-03-09"}"#,
    );

    let err = store.fetch_transactions(&owner).unwrap_err();
    assert!(matches!(err, StoreError::Serde(_)));
}
