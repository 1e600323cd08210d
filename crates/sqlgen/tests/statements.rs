use std::collections::HashMap;

use chrono::NaiveDate;
use sqlgen::prelude::*;
use sqlgen::{Compare, Membership, Valuer, ValuerError, append_to_sql, placeholders};
use uuid::Uuid;

/// Money stored as integer cents.
#[derive(Debug, Clone, Copy)]
struct Cents(i64);

impl Valuer for Cents {
    fn value(&self) -> Result<Value, ValuerError> {
        Ok(Value::Int(self.0))
    }
}

#[derive(Debug)]
struct Tags(Vec<String>);

impl Valuer for Tags {
    fn value(&self) -> Result<Value, ValuerError> {
        Ok(Value::array(self.0.iter().cloned()))
    }
}

#[test]
fn insert_renders_columns_and_placeholders() {
    let (sql, args) = insert("users")
        .columns(["name", "age"])
        .values(args!["Ann", 30])
        .render()
        .unwrap();
    assert_eq!(sql, "INSERT INTO users (name,age) VALUES (?,?)");
    assert_eq!(args, vec![Value::Text("Ann".into()), Value::Int(30)]);
}

#[test]
fn select_with_dollar_numbers_in_order() {
    let built = StatementBuilder::new(Dollar)
        .select(["*"])
        .from(["t"])
        .where_clause(Pred::eq_map([("a", 1)]))
        .where_clause(Pred::eq_map([("b", 2)]))
        .build()
        .unwrap();
    assert_eq!(built.sql, "SELECT * FROM t WHERE a = $1 AND b = $2");
    assert_eq!(built.args, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn equality_null_renders_is_null() {
    let (sql, args) = Compare::eq().with("x", Value::Null).render().unwrap();
    assert_eq!(sql, "x IS NULL");
    assert!(args.is_empty());
}

#[test]
fn ordering_null_fails() {
    for expr in [
        Expr::lt("x", Value::Null),
        Expr::gt("x", Value::Null),
        Expr::lte("x", Value::Null),
        Expr::gte("x", Value::Null),
        Expr::ne("x", Value::Null),
    ] {
        assert!(matches!(expr.render(), Err(SqlError::NullComparison { .. })));
    }
}

#[test]
fn membership_renders_one_placeholder_per_value() {
    let (sql, args) = Membership::is_in()
        .with("id", [1, 2, 3])
        .render()
        .unwrap();
    assert_eq!(sql, "id IN (?,?,?)");
    assert_eq!(args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

    let (sql, _) = Expr::not_in("id", [1]).render().unwrap();
    assert_eq!(sql, "id NOT IN (?)");
}

#[test]
fn multi_key_maps_render_identically_every_time() {
    let mut map = HashMap::new();
    for (i, col) in ["zeta", "alpha", "mid", "beta"].iter().enumerate() {
        map.insert(col.to_string(), Arg::from(i as i64));
    }
    let pred = Pred::from(map);
    let first = pred.render().unwrap();
    for _ in 0..10 {
        assert_eq!(pred.render().unwrap(), first);
    }
    assert_eq!(first.0, "alpha = ? AND beta = ? AND mid = ? AND zeta = ?");
}

#[test]
fn nested_or_inside_and() {
    let (sql, args) = Expr::and(vec![
        Expr::eq("a", 1),
        Expr::or(vec![Expr::eq("b", 2), Expr::eq("c", 3)]),
    ])
    .render()
    .unwrap();
    assert_eq!(sql, "(a = ? AND (b = ? OR c = ?))");
    assert_eq!(args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn empty_groups_render_nothing() {
    let (sql, args) = Expr::or(vec![Expr::and(vec![])]).render().unwrap();
    assert!(sql.is_empty());
    assert!(args.is_empty());
}

#[test]
fn delete_and_update_without_where_fail() {
    assert!(delete("users").render().unwrap_err().is_missing_clause());
    assert!(
        update("users")
            .set("active", false)
            .render()
            .unwrap_err()
            .is_missing_clause()
    );
}

#[test]
fn invalid_builder_returns_error_not_partial_output() {
    let result = select(["id"]).from(["t"]).in_list("x", Vec::<i64>::new()).build();
    assert!(matches!(result, Err(SqlError::EmptyInList { .. })));
}

#[test]
fn clause_assembler_skips_empty_fragments() {
    let parts = vec![
        Expr::and(vec![]),
        Expr::eq("a", 1),
        Expr::or(vec![]),
        Expr::eq("b", 2),
    ];
    let mut sql = String::new();
    let mut args = Vec::new();
    append_to_sql(&mut sql, &mut args, &parts, ", ").unwrap();
    assert_eq!(sql, "a = ?, b = ?");
    assert_eq!(args.len(), 2);
}

#[test]
fn placeholder_helpers() {
    assert_eq!(placeholders(0), "");
    assert_eq!(placeholders(1), "?");
    assert_eq!(placeholders(4), "?,?,?,?");
    assert_eq!(
        sqlgen::replace_positional("a = ? AND b IN (?,?)", "$"),
        "a = $1 AND b IN ($2,$3)"
    );
}

#[test]
fn typed_values_bind_in_order() {
    let id = Uuid::nil();
    let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let built = update("invoices")
        .set("paid_on", day)
        .set("amount", Arg::valuer(Cents(9_900)))
        .set("meta", serde_json::json!({"source": "import"}))
        .eq("id", id)
        .placeholder(Dollar)
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "UPDATE invoices SET paid_on=$1, amount=$2, meta=$3 WHERE id = $4"
    );
    assert_eq!(built.args[0], Value::Date(day));
    assert_eq!(built.args[1], Value::Int(9_900));
    assert_eq!(built.args[3], Value::Uuid(id));
    assert_eq!(built.params_ref().len(), 4);
}

#[test]
fn valuer_resolving_to_array_is_rejected_in_predicates() {
    let tags = Tags(vec!["a".into()]);
    let err = select(["id"])
        .from(["posts"])
        .where_clause(Expr::eq("tags", Arg::valuer(tags)))
        .render()
        .unwrap_err();
    assert!(err.is_type_error());
}

#[test]
fn array_values_bind_in_insert_rows() {
    let (sql, args) = insert("posts")
        .columns(["title", "tags"])
        .values([Arg::from("hello"), Arg::valuer(Tags(vec!["a".into(), "b".into()]))])
        .render()
        .unwrap();
    assert_eq!(sql, "INSERT INTO posts (title,tags) VALUES (?,?)");
    assert!(!args[1].is_scalar());
}

#[test]
fn placeholder_style_from_config() {
    #[derive(serde::Deserialize)]
    struct DbConfig {
        placeholder: PlaceholderStyle,
    }

    let config: DbConfig = serde_json::from_str(r#"{"placeholder":"at_p"}"#).unwrap();
    let built = StatementBuilder::with_style(config.placeholder)
        .delete("jobs")
        .eq("id", 1)
        .build()
        .unwrap();
    assert_eq!(built.sql, "DELETE FROM jobs WHERE id = @p1");
}

#[test]
fn builders_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<sqlgen::SelectBuilder>();
    assert_send_sync::<sqlgen::InsertBuilder>();
    assert_send_sync::<sqlgen::UpdateBuilder>();
    assert_send_sync::<sqlgen::DeleteBuilder>();
    assert_send_sync::<Expr>();
}
