//! Deserialized statements render like the ones they came from.

use crate::ast::builders::{conditions as cond, functions as func, statements as q};
use crate::ast::{Expr, Statement, Value};
use crate::transpiler::{DynamoTarget, PartiqlTarget, PostgresFlavor, QueryTarget, ToSql};
use pretty_assertions::assert_eq;

#[test]
fn test_hand_written_select() {
    let text = concat!(
        r#"{"type":"SelectQuery","tables":[{"type":"Table","source":"table"}],"#,
        r#""fields":[{"name":"bar","alias":"aliasBar"}],"#,
        r#""where":[{"type":"BinaryCondition","key":"foo","value":"!!!123","operator":"="}],"#,
        r#""orderBy":[{"field":"bar","direction":"DESC"}],"limit":10}"#
    );
    let statement = q::deserialize(text).unwrap();
    assert_eq!(
        statement.to_sql().unwrap(),
        "SELECT `bar` AS `aliasBar` FROM `table` WHERE `foo` = 123 ORDER BY `bar` DESC LIMIT 10"
    );
    assert_eq!(
        statement.compile(&PartiqlTarget::new()).unwrap(),
        "SELECT bar AS aliasBar FROM table WHERE foo = 123 ORDER BY bar DESC LIMIT 10"
    );
}

#[test]
fn test_column_templates_survive_json() {
    let text = r#"{"type":"SelectQuery","tables":[],"unionQueries":[],"joins":[],"fields":[{"name":"SUM(YEAR(#foo#))"}],"where":[],"having":[],"orderBy":[],"groupBy":[]}"#;
    let statement = q::deserialize(text).unwrap();
    assert_eq!(statement.to_sql().unwrap(), "SELECT SUM(YEAR(`foo`))");
}

#[test]
fn test_round_tripped_statements_render_identically() {
    let statements: Vec<Statement> = vec![
        q::select()
            .from_as("users", "u")
            .field_as(func::count("u.id"), "total")
            .left_join(q::table("orders", Some("o")), cond::column_equal("o.user_id", "u.id"))
            .filter(cond::is_in("u.status", ["active", "pending"]))
            .filter(cond::null("u.deleted_at"))
            .group_by(["u.country"])
            .union(q::select().from("legacy_users"))
            .into(),
        q::update("table")
            .set("foo", "it's")
            .set_expr("total", func::multiply(["amount", "price"]))
            .filter(cond::between("created", "2020-01-01", "2020-12-31"))
            .into(),
        q::delete_as("table", "t").filter(cond::not_like("t.name", "%test%")).into(),
        q::create_view_as("active_users", q::select().from("users").filter(cond::equal("active", true)))
            .into(),
    ];
    let postgres = PostgresFlavor::new();
    for statement in statements {
        let back = Statement::deserialize(&statement.serialize()).unwrap();
        assert_eq!(back.to_sql().unwrap(), statement.to_sql().unwrap());
        assert_eq!(
            back.to_sql_with_flavor(&postgres).unwrap(),
            statement.to_sql_with_flavor(&postgres).unwrap()
        );
    }
}

#[test]
fn test_round_tripped_dates_render() {
    let date = Value::from_millis(1_718_892_000_000).unwrap();
    let insert: Statement = q::insert("events")
        .values([[("at", date)]])
        .unwrap()
        .into();
    let back = Statement::deserialize(&insert.serialize()).unwrap();
    assert_eq!(
        back.to_sql().unwrap(),
        "INSERT INTO `events` (`at`) VALUES (\"2024-06-20 14:00:00\")"
    );

    let request = back.compile(&DynamoTarget::default()).unwrap();
    assert_eq!(
        serde_json::to_value(&request).unwrap()["Item"]["at"]["S"],
        "2024-06-20T14:00:00.000Z"
    );
}

#[test]
fn test_date_shaped_text_stays_text() {
    let text: Expr = q::value("!D!5!!").into();
    assert_eq!(Expr::deserialize(&text.serialize()).unwrap(), text);

    // Producers that never escape still get text back.
    assert_eq!(
        Expr::deserialize(r#"!!!"!D!5!!""#).unwrap(),
        Expr::Value(Value::from("!D!5!!"))
    );

    let insert: Statement = q::insert("notes")
        .values([vec![("body", Value::from("!D!5!!")), ("tag", Value::from("!!!x"))]])
        .unwrap()
        .into();
    let back = Statement::deserialize(&insert.serialize()).unwrap();
    assert_eq!(back, insert);
    assert_eq!(
        back.to_sql().unwrap(),
        "INSERT INTO `notes` (`body`, `tag`) VALUES (\"!D!5!!\", \"!!!x\")"
    );
}
