//! `#[derive(Record)]` bindings.

mod common;

use common::raw;
use dbkit::materialize::{materialize_all, materialize_one};
use dbkit::record::FieldBindings;
use dbkit::{ColumnCategory, ColumnMeta, Record, RowSet, Value};

#[derive(Debug, Default, Record)]
struct Account {
    id: u32,
    #[orm(column = "user_name")]
    name: String,
    active: bool,
    balance: f32,
    avatar: Vec<u8>,
    #[orm(skip)]
    note: String,
    r#type: i8,
}

fn account_rows() -> RowSet {
    let mut set = RowSet::new(vec![
        ColumnMeta::new("id", "INT", ColumnCategory::Unsigned),
        ColumnMeta::new("user_name", "VARCHAR", ColumnCategory::RawBytes),
        ColumnMeta::new("active", "TINYINT", ColumnCategory::Int),
        ColumnMeta::new("balance", "FLOAT", ColumnCategory::Float),
        ColumnMeta::new("avatar", "BLOB", ColumnCategory::RawBytes),
        ColumnMeta::new("note", "VARCHAR", ColumnCategory::RawBytes),
        ColumnMeta::new("type", "TINYINT", ColumnCategory::Int),
        ColumnMeta::new("extra", "VARCHAR", ColumnCategory::RawBytes),
    ]);
    set.push_row(vec![
        raw("12"),
        raw("alice"),
        raw("1"),
        raw("2.5"),
        Value::Bytes(vec![0, 159, 146, 150]),
        raw("ignored"),
        raw("-3"),
        raw("unbound"),
    ]);
    set.push_row(vec![
        raw("99999999999"),
        Value::Null,
        raw("false"),
        raw("n/a"),
        Value::Null,
        Value::Null,
        raw("300"),
        Value::Null,
    ]);
    set
}

#[test]
fn columns_follow_field_order() {
    assert_eq!(
        Account::COLUMNS,
        &["id", "user_name", "active", "balance", "avatar", "type"]
    );
    let bindings = FieldBindings::resolve::<Account>().unwrap();
    assert_eq!(bindings.field_for("user_name"), Some(1));
    assert_eq!(bindings.field_for("name"), None);
    assert_eq!(bindings.field_for("note"), None);
}

#[test]
fn materializes_each_row() {
    let accounts: Vec<Account> = materialize_all(account_rows()).unwrap();
    assert_eq!(accounts.len(), 2);

    let a = &accounts[0];
    assert_eq!(a.id, 12);
    assert_eq!(a.name, "alice");
    assert!(a.active);
    assert_eq!(a.balance, 2.5);
    assert_eq!(a.avatar, vec![0, 159, 146, 150]);
    assert_eq!(a.note, "");
    assert_eq!(a.r#type, -3);

    // Out-of-range and unparsable cells leave the default in place.
    let b = &accounts[1];
    assert_eq!(b.id, 0);
    assert_eq!(b.name, "");
    assert!(!b.active);
    assert_eq!(b.balance, 0.0);
    assert!(b.avatar.is_empty());
    assert_eq!(b.r#type, 0);
}

#[test]
fn single_record_takes_first_row() {
    let account: Account = materialize_one(account_rows()).unwrap();
    assert_eq!(account.id, 12);

    let empty = RowSet::new(vec![ColumnMeta::new("id", "INT", ColumnCategory::Int)]);
    let err = materialize_one::<Account>(empty).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn empty_set_yields_no_records() {
    let accounts: Vec<Account> = materialize_all(RowSet::default()).unwrap();
    assert!(accounts.is_empty());
}
