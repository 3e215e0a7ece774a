use anyhow::Result;
use user_store::{Criteria, DeleteOutcome, Error, NewUser, Store, StoreConfig, Value};

fn create_test_store() -> Result<Store> {
    let store = Store::open_in_memory(StoreConfig::new(":memory:"))?;
    store.ensure_schema()?;
    Ok(store)
}

fn seed(store: &Store) -> Result<()> {
    for (name, email, age) in [
        ("Sam Huang", "sam.corgi@example.com", 28),
        ("Jane Doe", "jane@example.com", 28),
        ("Bob Roe", "bob@example.com", 45),
    ] {
        store.insert(&NewUser {
            name: name.to_string(),
            email: email.to_string(),
            age,
        })?;
    }
    Ok(())
}

#[tokio::test]
async fn test_all_empty_criteria_never_touches_the_database() {
    // The schema is deliberately not ensured: if delete_by issued any
    // statement at all, it would fail with a missing-table error rather
    // than EmptyCriteria.
    let store = Store::open_in_memory(StoreConfig::new(":memory:")).unwrap();
    let criteria = Criteria::new()
        .with("id", Value::Null)
        .with("name", "")
        .with("email", "")
        .with("age", Value::Null);
    let err = store.delete_by(&criteria).unwrap_err();
    assert!(matches!(err, Error::EmptyCriteria));
}

#[tokio::test]
async fn test_no_match_issues_no_delete() {
    test_no_match_issues_no_delete_impl().unwrap();
}

fn test_no_match_issues_no_delete_impl() -> Result<()> {
    let store = create_test_store()?;
    seed(&store)?;

    let outcome = store.delete_by(&Criteria::new().with("age", 99i64))?;
    assert_eq!(
        outcome,
        DeleteOutcome::NoMatch {
            conditions: "age = '99'".to_string()
        }
    );

    // table contents unchanged
    assert_eq!(store.read_all()?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_delete_filters_with_only_the_non_empty_fields() {
    test_delete_filters_with_only_the_non_empty_fields_impl().unwrap();
}

fn test_delete_filters_with_only_the_non_empty_fields_impl() -> Result<()> {
    let store = create_test_store()?;
    seed(&store)?;

    // id/name/email are blank, so only age participates in the filter
    let criteria = Criteria::new()
        .with("id", Value::Null)
        .with("name", "")
        .with("email", "")
        .with("age", 28i64);
    let outcome = store.delete_by(&criteria)?;
    assert_eq!(
        outcome,
        DeleteOutcome::Deleted {
            rows: 2,
            conditions: "age = '28'".to_string()
        }
    );

    let remaining = store.read_all()?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Bob Roe");
    Ok(())
}

#[tokio::test]
async fn test_multiple_conditions_are_conjoined() {
    test_multiple_conditions_are_conjoined_impl().unwrap();
}

fn test_multiple_conditions_are_conjoined_impl() -> Result<()> {
    let store = create_test_store()?;
    seed(&store)?;

    // age 28 matches two rows, but the name narrows it to one
    let criteria = Criteria::new().with("name", "Jane Doe").with("age", 28i64);
    let outcome = store.delete_by(&criteria)?;
    assert_eq!(
        outcome,
        DeleteOutcome::Deleted {
            rows: 1,
            conditions: "name = 'Jane Doe' AND age = '28'".to_string()
        }
    );

    let remaining = store.read_all()?;
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|u| u.name != "Jane Doe"));
    Ok(())
}

#[tokio::test]
async fn test_delete_by_id() {
    test_delete_by_id_impl().unwrap();
}

fn test_delete_by_id_impl() -> Result<()> {
    let store = create_test_store()?;
    seed(&store)?;
    let ids: Vec<i64> = store.read_all()?.iter().map(|u| u.id).collect();

    let outcome = store.delete_by(&Criteria::new().with("id", ids[0]))?;
    assert!(matches!(outcome, DeleteOutcome::Deleted { rows: 1, .. }));

    let remaining = store.read_all()?;
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|u| u.id != ids[0]));
    Ok(())
}
