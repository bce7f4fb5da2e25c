//! Statement execution against an in-memory connection.

mod common;

use common::{MemoryConnection, raw, user_rows};
use dbkit::{
    ColumnCategory, ColumnMeta, Dialect, OrmError, Record, RowSet, Value, delete, insert,
    insert_or_update, query, select, select_all, update, values,
};

#[derive(Debug, Default, Record)]
struct User {
    id: i64,
    name: String,
    price: f64,
    #[orm(column = "created")]
    created_at: String,
}

#[tokio::test]
async fn insert_reports_last_id() {
    let conn = MemoryConnection::new().with_outcome(1, Some(42));
    let res = insert()
        .table("user")
        .values(values! { "name" => "Tom", "age" => 20 })
        .execute(&conn)
        .await;

    assert!(res.success);
    assert!(res.error.is_none());
    assert_eq!(res.last_id, 42);
    assert_eq!(res.affected, 0);
    assert_eq!(res.sql, "INSERT INTO user (`name`,`age`) VALUES (?,?)");
    assert_eq!(
        conn.log(),
        vec![(res.sql.clone(), vec![Value::from("Tom"), Value::Int(20)])]
    );
}

#[tokio::test]
async fn update_and_delete_report_affected_rows() {
    let conn = MemoryConnection::new().with_outcome(3, None);

    let res = update()
        .table("user")
        .add_value("state", 0)
        .where_("age < ?")
        .bind(18)
        .execute(&conn)
        .await;
    assert!(res.success);
    assert_eq!(res.affected, 3);
    assert_eq!(res.last_id, 0);

    let res = delete().table("user").where_("state = 0").execute(&conn).await;
    assert_eq!(res.affected, 3);

    let res = insert_or_update()
        .table("counter")
        .add_value("id", 1)
        .add_update_value("hits", 2)
        .execute(&conn)
        .await;
    assert_eq!(res.affected, 3);
    assert_eq!(conn.statements().len(), 3);
}

#[tokio::test]
async fn unsafe_delete_never_reaches_connection() {
    let conn = MemoryConnection::new();
    let res = delete().table("user").execute(&conn).await;

    assert!(!res.success);
    assert!(res.error.as_ref().is_some_and(OrmError::is_unsafe));
    assert!(conn.log().is_empty());
    assert!(res.into_result().is_err());
}

#[tokio::test]
async fn missing_table_is_a_noop() {
    let conn = MemoryConnection::new();
    let res = delete().where_("id = 1").execute(&conn).await;

    assert!(res.success);
    assert!(res.sql.is_empty());
    assert!(conn.log().is_empty());
}

#[tokio::test]
async fn driver_errors_are_reported_in_the_result() {
    let conn = MemoryConnection::new().failing_on("UPDATE");
    let res = update()
        .table("user")
        .add_value("a", 1)
        .where_("id = 1")
        .execute(&conn)
        .await;

    assert!(!res.success);
    assert_eq!(res.sql, "UPDATE user SET `a`=? WHERE id = 1");
    assert!(matches!(res.error, Some(OrmError::Other(_))));
}

#[tokio::test]
async fn full_sql_sends_inlined_statement() {
    let conn = MemoryConnection::new();
    let res = update()
        .table("user")
        .add_value("name", "Tom")
        .where_("id = ?")
        .bind(5)
        .full_sql(true)
        .execute(&conn)
        .await;

    assert!(res.success);
    assert_eq!(
        conn.log(),
        vec![("UPDATE user SET `name`='Tom' WHERE id = 5".to_string(), vec![])]
    );
}

#[tokio::test]
async fn connection_dialect_drives_rendering() {
    let conn = MemoryConnection::new().with_dialect(Dialect::Postgres);
    select_all()
        .from("users")
        .limit(10)
        .fetch_maps(&conn)
        .await
        .unwrap();
    insert()
        .table("users")
        .add_value("name", "Tom")
        .execute(&conn)
        .await
        .into_result()
        .unwrap();

    assert_eq!(
        conn.statements(),
        vec![
            "SELECT * FROM users".to_string(),
            "INSERT INTO users (\"name\") VALUES (?)".to_string(),
        ]
    );
}

#[tokio::test]
async fn fetch_maps_converts_by_column_category() {
    let conn = MemoryConnection::new().with_rows(user_rows());
    let maps = select("id,name,price,score,created")
        .from("user")
        .fetch_maps(&conn)
        .await
        .unwrap();

    assert_eq!(maps.len(), 2);
    assert_eq!(maps[0].get("id"), Some(&Value::Int(1)));
    assert_eq!(maps[0].get_str("name"), "Tom");
    assert_eq!(maps[0].get("price"), Some(&Value::Float(9.5)));
    assert_eq!(maps[0].get_f64("score"), 88.5);
    assert_eq!(maps[0].get_str("created"), "2024-01-02 03:04:05");
    assert_eq!(
        maps[0].keys().collect::<Vec<_>>(),
        vec!["id", "name", "price", "score", "created"]
    );

    assert_eq!(maps[1].get_i64("id"), 2);
    assert_eq!(maps[1].get("name"), Some(&Value::String(String::new())));
    assert_eq!(maps[1].get("price"), Some(&Value::Float(0.0)));
    assert_eq!(maps[1].get("score"), Some(&Value::Float(0.0)));
}

#[tokio::test]
async fn single_row_fetch_limits_and_reports_not_found() {
    let conn = MemoryConnection::new().with_rows(user_rows());
    let row = select_all()
        .from("user")
        .where_("id > ?")
        .bind(0)
        .fetch_string_row(&conn)
        .await
        .unwrap();
    assert_eq!(row.get("name"), "Tom");
    assert_eq!(row.get_i64("id"), 1);

    let err = select_all().from("user").fetch_map(&conn).await.unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(
        conn.statements(),
        vec![
            "SELECT * FROM user WHERE id > ? LIMIT 0,1".to_string(),
            "SELECT * FROM user LIMIT 0,1".to_string(),
        ]
    );
}

#[tokio::test]
async fn fetch_strings_renders_null_as_empty() {
    let conn = MemoryConnection::new().with_rows(user_rows());
    let rows = select_all().from("user").fetch_strings(&conn).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("price"), "9.50");
    assert!(rows[1].exist("name"));
    assert_eq!(rows[1].get("name"), "");
}

#[tokio::test]
async fn fetch_records() {
    let conn = MemoryConnection::new()
        .with_rows(user_rows())
        .with_rows(user_rows());

    let users: Vec<User> = select_all().from("user").fetch_all_as(&conn).await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, 1);
    assert_eq!(users[0].name, "Tom");
    assert_eq!(users[0].price, 9.5);
    assert_eq!(users[0].created_at, "2024-01-02 03:04:05");
    assert_eq!(users[1].id, 2);
    assert_eq!(users[1].name, "");
    assert_eq!(users[1].price, 0.0);

    let user: User = select_all().from("user").fetch_one_as(&conn).await.unwrap();
    assert_eq!(user.id, 1);

    let err = select_all()
        .from("user")
        .fetch_one_as::<User>(&conn)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn raw_query_helpers() {
    let mut set = RowSet::new(vec![ColumnMeta::new("n", "BIGINT", ColumnCategory::Int)]);
    set.push_row(vec![raw("7")]);
    let conn = MemoryConnection::new()
        .with_outcome(2, Some(9))
        .with_rows(set);

    let id = query("INSERT INTO t (a) VALUES (?)")
        .bind(1)
        .insert_id(&conn)
        .await
        .unwrap();
    assert_eq!(id, 9);

    let affected = query("DELETE FROM t WHERE a = ?")
        .bind(1)
        .affected(&conn)
        .await
        .unwrap();
    assert_eq!(affected, 2);

    let map = query("SELECT COUNT(*) AS n FROM t").fetch_map(&conn).await.unwrap();
    assert_eq!(map.get_i64("n"), 7);

    assert_eq!(
        query("SELECT * FROM t WHERE a = ? AND b = ?")
            .bind(1)
            .bind("x")
            .to_full_sql()
            .unwrap(),
        "SELECT * FROM t WHERE a = 1 AND b = 'x'"
    );
}
