//! SQL flavor tests.

use crate::ast::builders::{conditions as cond, functions as func, statements as q};
use crate::ast::{Expr, SortOrder, Value};
use crate::transpiler::{
    Dialect, Flavor, FlavorOptions, PostgresFlavor, QueryTarget, SqlTarget, SqliteFlavor,
    TimestreamFlavor, ToSql,
};
use pretty_assertions::assert_eq;

fn sample_date() -> Value {
    Value::from_millis(1_705_314_600_000).unwrap()
}

#[test]
fn test_postgres_select() {
    let query = q::select()
        .field("id")
        .field("name")
        .from("users")
        .filter(cond::equal("active", true))
        .order_by("name", SortOrder::Asc)
        .limit(50)
        .offset(10);
    assert_eq!(
        query.to_sql_with_flavor(&PostgresFlavor::new()).unwrap(),
        "SELECT \"id\", \"name\" FROM \"users\" WHERE \"active\" = true ORDER BY \"name\" ASC LIMIT 50 OFFSET 10"
    );
}

#[test]
fn test_postgres_string_escaping() {
    let update = q::update("users")
        .set("name", "John's Value")
        .filter(cond::equal("id", 1));
    assert_eq!(
        update.to_sql_with_flavor(&PostgresFlavor::new()).unwrap(),
        "UPDATE \"users\" SET \"name\" = 'John''s Value' WHERE \"id\" = 1"
    );
}

#[test]
fn test_postgres_functions() {
    let pg = PostgresFlavor::new();
    let render = |e: Expr| e.to_sql_with_flavor(&pg).unwrap();

    assert_eq!(
        render(func::date_add("created_at", 12, "year")),
        "(\"created_at\" + INTERVAL '12 year')"
    );
    assert_eq!(
        render(func::date_add("date", -5, "month")),
        "(\"date\" + INTERVAL '-5 month')"
    );
    assert_eq!(
        render(func::date_add("date", "5; DROP TABLE users", "year")),
        "(\"date\" + INTERVAL '5 year')"
    );
    assert_eq!(render(func::year("created_at")), "EXTRACT(YEAR FROM \"created_at\")");
    assert_eq!(render(func::sum(func::month("date"))), "SUM(EXTRACT(MONTH FROM \"date\"))");
    assert_eq!(
        render(func::if_(cond::equal("status", "active"), "a", "b")),
        "CASE WHEN \"status\" = 'active' THEN \"a\" ELSE \"b\" END"
    );
    assert_eq!(
        render(func::sum(func::if_(cond::equal("type", "sale"), "amount", q::value(0)))),
        "SUM(CASE WHEN \"type\" = 'sale' THEN \"amount\" ELSE 0 END)"
    );
    assert_eq!(render(func::ifnull("nullable_col", q::value(0))), "COALESCE(\"nullable_col\",0)");
    assert_eq!(
        render(func::ifnull(
            func::concat(vec![Expr::column("firstName"), func::string(" "), Expr::column("lastName")]),
            func::string("Unknown"),
        )),
        "COALESCE(CONCAT(\"firstName\",' ',\"lastName\"),'Unknown')"
    );
    assert_eq!(render(func::count("*")), "COUNT(*)");
    assert_eq!(render(func::concat(["a", "b", "c"])), "CONCAT(\"a\",\"b\",\"c\")");
}

#[test]
fn test_date_add_rejects_bad_input() {
    let pg = PostgresFlavor::new();
    let err = func::date_add("date", 1, "year'); DROP TABLE users; --")
        .to_sql_with_flavor(&pg)
        .unwrap_err();
    assert!(err.to_string().contains("Invalid DATEADD interval type"));

    let err = func::date_add("date", "abc", "year")
        .to_sql_with_flavor(&pg)
        .unwrap_err();
    assert!(err.to_string().contains("Invalid DATEADD interval"));
}

#[test]
fn test_sqlite_select() {
    let query = q::select()
        .field_as("foo", "blah")
        .field_as(func::max("foo"), "blahMax")
        .from("table")
        .filter(cond::equal("foo", 123))
        .filter(cond::equal("blah", "hello"))
        .order_by("foo", SortOrder::Desc)
        .limit(100)
        .offset(2);
    assert_eq!(
        query.to_sql_with_flavor(&SqliteFlavor::new()).unwrap(),
        "SELECT `foo` AS `blah`, MAX(`foo`) AS `blahMax` FROM `table` WHERE `foo` = 123 AND `blah` = 'hello' ORDER BY `foo` DESC LIMIT 100 OFFSET 2"
    );

    let query = q::select()
        .field_as(func::month("date"), "month")
        .field_as(func::year("date"), "year")
        .field_as(func::if_(cond::less_than("foo", 5), "foo", "blah"), "blah")
        .from("table");
    assert_eq!(
        query.to_sql_with_flavor(&SqliteFlavor::new()).unwrap(),
        "SELECT strftime('%m', `date`, 'localtime') AS `month`, strftime('%Y', `date`, 'localtime') AS `year`, \
         IIF(`foo` < 5, `foo`, `blah`) AS `blah` FROM `table`"
    );
}

#[test]
fn test_sqlite_functions() {
    let sqlite = SqliteFlavor::new();
    let render = |e: Expr| e.to_sql_with_flavor(&sqlite).unwrap();

    assert_eq!(
        render(func::date_add("created_at", 12, "year")),
        "DateTime(`created_at`, '+12 year')"
    );
    assert_eq!(render(func::date_add("date", -5, "month")), "DateTime(`date`, '-5 month')");
    assert_eq!(render(func::ifnull("nullable_col", q::value(0))), "IFNULL(`nullable_col`,0)");
    assert_eq!(
        render(func::sum(func::if_(cond::equal("type", "sale"), "amount", q::value(0)))),
        "SUM(IIF(`type` = 'sale', `amount`, 0))"
    );
}

#[test]
fn test_sqlite_edge_cases() {
    let sqlite = SqliteFlavor::new();
    assert_eq!(
        q::update("table")
            .set("foo", "'aa'xx\"")
            .to_sql_with_flavor(&sqlite)
            .unwrap(),
        "UPDATE `table` SET `foo` = '''aa''xx\"'"
    );
    assert_eq!(cond::equal("column", "").to_sql_with_flavor(&sqlite).unwrap(), "`column` = ''");
    assert_eq!(cond::equal("price", 123.45).to_sql_with_flavor(&sqlite).unwrap(), "`price` = 123.45");
    assert_eq!(cond::equal("negative", -10).to_sql_with_flavor(&sqlite).unwrap(), "`negative` = -10");
    assert_eq!(
        q::select().from("main@users").to_sql_with_flavor(&sqlite).unwrap(),
        "SELECT * FROM `users`"
    );
}

#[test]
fn test_timestream_select() {
    let query = q::select()
        .field_as("foo", "blah")
        .field_as(func::max("foo"), "blahMax")
        .from("table")
        .filter(cond::equal("foo", 123))
        .filter(cond::equal("blah", "hello"))
        .order_by("foo", SortOrder::Desc)
        .limit(100)
        .offset(2);
    assert_eq!(
        query.to_sql_with_flavor(&TimestreamFlavor::new()).unwrap(),
        "SELECT \"foo\" AS \"blah\", MAX(\"foo\") AS \"blahMax\" FROM \"table\" WHERE \"foo\" = 123 AND \"blah\" = 'hello' ORDER BY \"foo\" DESC OFFSET 2 LIMIT 100"
    );
}

#[test]
fn test_timestream_date_add() {
    let ts = TimestreamFlavor::new();
    assert_eq!(
        func::date_add("date", 12, "year").to_sql_with_flavor(&ts).unwrap(),
        "date_add('year', 12, \"date\")"
    );
    assert_eq!(
        func::date_add("date", -12, "day").to_sql_with_flavor(&ts).unwrap(),
        "date_add('day', -12, \"date\")"
    );
}

#[test]
fn test_date_literals_follow_timezone() {
    let condition = cond::equal("time", sample_date());
    assert_eq!(condition.to_sql().unwrap(), "`time` = \"2024-01-15 10:30:00\"");
    assert_eq!(
        condition.to_sql_with_flavor(&TimestreamFlavor::new()).unwrap(),
        "\"time\" = TIMESTAMP '2024-01-15 10:30:00'"
    );

    let prague = FlavorOptions::parse_timezone("Europe/Prague").unwrap();
    assert_eq!(
        condition
            .to_sql_with_flavor(&TimestreamFlavor::with_options(prague))
            .unwrap(),
        "\"time\" = TIMESTAMP '2024-01-15 11:30:00'"
    );
    assert_eq!(
        condition
            .to_sql_with_flavor(&PostgresFlavor::with_options(prague))
            .unwrap(),
        "\"time\" = '2024-01-15 11:30:00'"
    );
}

#[test]
fn test_hyphenated_table_names() {
    assert_eq!(
        q::select().from("my-table").to_sql().unwrap(),
        "SELECT * FROM `my-table`"
    );
    assert_eq!(
        q::select()
            .from("my-table")
            .to_sql_with_flavor(&PostgresFlavor::new())
            .unwrap(),
        "SELECT * FROM \"my-table\""
    );
}

#[test]
fn test_target_from_dialect() {
    let query = q::select().from("users").field("id");
    for (dialect, expected) in [
        (Dialect::MySql, "SELECT `id` FROM `users`"),
        (Dialect::Postgres, "SELECT \"id\" FROM \"users\""),
        (Dialect::Sqlite, "SELECT `id` FROM `users`"),
        (Dialect::Timestream, "SELECT \"id\" FROM \"users\""),
    ] {
        let target = SqlTarget::from_dialect(dialect, FlavorOptions::default());
        assert_eq!(target.flavor().dialect(), dialect);
        assert_eq!(target.compile_select(&query).unwrap(), expected);
    }
}
