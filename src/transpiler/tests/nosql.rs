//! DynamoDB targets: PartiQL text and native request inputs.

use crate::ast::builders::{conditions as cond, functions as func, statements as q};
use crate::ast::{Condition, SortOrder, Value};
use crate::transpiler::{DynamoOptions, DynamoRequest, DynamoTarget, PartiqlTarget, QueryTarget};
use pretty_assertions::assert_eq;
use serde_json::json;

fn partiql() -> PartiqlTarget {
    PartiqlTarget::new()
}

fn keyed_target() -> DynamoTarget {
    DynamoTarget::new(DynamoOptions::new().partition_key("pk").sort_key("sk"))
}

fn to_json(request: &DynamoRequest) -> serde_json::Value {
    serde_json::to_value(request).unwrap()
}

#[test]
fn test_partiql_select_basics() {
    let target = partiql();
    assert_eq!(q::select().from("Users").compile(&target).unwrap(), "SELECT * FROM Users");
    assert_eq!(
        q::select()
            .from("Users")
            .field("id")
            .field("name")
            .field("email")
            .compile(&target)
            .unwrap(),
        "SELECT id, name, email FROM Users"
    );
    assert_eq!(
        q::select().from_as("Users", "u").compile(&target).unwrap(),
        "SELECT * FROM Users AS u"
    );
}

#[test]
fn test_partiql_where() {
    let target = partiql();
    let query = q::select()
        .from("Users")
        .filter(cond::equal("pk", "USER#123"))
        .filter(cond::greater_than("age", 18));
    assert_eq!(
        query.compile(&target).unwrap(),
        "SELECT * FROM Users WHERE pk = 'USER#123' AND age > 18"
    );

    let nested = q::select().from("Users").filter(cond::and([
        Some(cond::equal("status", "active")),
        cond::or([
            Some(cond::equal("role", "admin")),
            Some(cond::equal("role", "user")),
        ]),
    ]));
    assert_eq!(
        nested.compile(&target).unwrap(),
        "SELECT * FROM Users WHERE (status = 'active' AND (role = 'admin' OR role = 'user'))"
    );
}

#[test]
fn test_partiql_condition_forms() {
    let target = partiql();
    let render = |condition: Condition| {
        q::select()
            .from("T")
            .filter(condition)
            .compile(&target)
            .unwrap()
            .trim_start_matches("SELECT * FROM T WHERE ")
            .to_string()
    };
    assert_eq!(render(cond::between("total", 100, 500)), "total BETWEEN 100 AND 500");
    assert_eq!(
        render(cond::is_in("status", ["active", "pending"]).unwrap()),
        "status IN ('active', 'pending')"
    );
    assert_eq!(
        render(cond::not_in("status", ["gone"]).unwrap()),
        "NOT (status IN ('gone'))"
    );
    assert_eq!(render(cond::null("deletedAt")), "deletedAt IS MISSING");
    assert_eq!(render(cond::not_null("email")), "email IS NOT MISSING");
    assert_eq!(render(cond::like("sk", "ORDER#%")), "begins_with(sk, 'ORDER#')");
    assert_eq!(render(cond::like("name", "%john%")), "contains(name, 'john')");
    assert_eq!(render(cond::not_like("name", "%john%")), "NOT contains(name, 'john')");
    assert_eq!(render(cond::like("name", "john")), "name = 'john'");
    assert_eq!(render(cond::equal("price", 99.99)), "price = 99.99");
    assert_eq!(render(cond::not_equal("status", "x")), "status <> 'x'");
    assert_eq!(render(cond::equal("name", "O'Brien")), "name = 'O''Brien'");
}

#[test]
fn test_partiql_order_and_limit() {
    let query = q::select()
        .from("Orders")
        .order_by("createdAt", SortOrder::Desc)
        .limit(10);
    assert_eq!(
        query.compile(&partiql()).unwrap(),
        "SELECT * FROM Orders ORDER BY createdAt DESC LIMIT 10"
    );
}

#[test]
fn test_partiql_insert() {
    let target = partiql();
    let single = q::insert("Products")
        .values([vec![
            ("id", Value::from("prod1")),
            ("price", Value::from(99.99)),
            ("inStock", Value::from(true)),
        ]])
        .unwrap();
    assert_eq!(
        single.compile(&target).unwrap(),
        "INSERT INTO Products VALUE {'id': 'prod1', 'price': 99.99, 'inStock': TRUE}"
    );

    let batch = q::insert("Users")
        .values([
            vec![("id", Value::from("u1"))],
            vec![("id", Value::from("u2"))],
        ])
        .unwrap();
    assert_eq!(
        batch.compile(&target).unwrap(),
        "INSERT INTO Users VALUE {'id': 'u1'};\nINSERT INTO Users VALUE {'id': 'u2'}"
    );

    let nested = q::insert("Users")
        .values([vec![
            ("tags", Value::List(vec!["a".into(), "b".into()])),
            ("deleted", Value::Null),
        ]])
        .unwrap();
    assert_eq!(
        nested.compile(&target).unwrap(),
        "INSERT INTO Users VALUE {'tags': ['a', 'b'], 'deleted': NULL}"
    );
}

#[test]
fn test_partiql_update_and_delete() {
    let target = partiql();
    let update = q::update("Users")
        .set("name", "John Doe")
        .set("status", "active")
        .filter(cond::equal("id", "user123"));
    assert_eq!(
        update.compile(&target).unwrap(),
        "UPDATE Users SET name = 'John Doe', status = 'active' WHERE id = 'user123'"
    );

    let delete = q::delete("Users")
        .filter(cond::equal("pk", "USER#123"))
        .filter(cond::equal("sk", "PROFILE"));
    assert_eq!(
        delete.compile(&target).unwrap(),
        "DELETE FROM Users WHERE pk = 'USER#123' AND sk = 'PROFILE'"
    );

    let err = q::delete("Users").compile(&target).unwrap_err();
    assert_eq!(
        err.to_string(),
        "DynamoDB DELETE requires a WHERE clause with the primary key"
    );
    let err = q::update("Users").set("a", 1).compile(&target).unwrap_err();
    assert_eq!(
        err.to_string(),
        "DynamoDB UPDATE requires a WHERE clause with the primary key"
    );
}

#[test]
fn test_partiql_rejections() {
    let target = partiql();
    let err = q::select()
        .from("Users")
        .inner_join("Orders", cond::column_equal("Users.id", "Orders.userId"))
        .compile(&target)
        .unwrap_err();
    assert_eq!(err.to_string(), "DynamoDB does not support JOIN operations");

    let err = q::select()
        .from("Users")
        .offset(5)
        .compile(&target)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "DynamoDB does not support OFFSET. Use ExclusiveStartKey for pagination."
    );

    let err = q::create_table_as("Copy", q::select().from("Users"))
        .compile(&target)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "DynamoDB PartiQL does not support CREATE TABLE AS SELECT"
    );

    let err = q::insert("Blobs")
        .values([vec![("data", Value::Bytes(vec![1, 2]))]])
        .unwrap()
        .compile(&target)
        .unwrap_err();
    assert_eq!(err.to_string(), "DynamoDB PartiQL does not support binary values");
}

#[test]
fn test_native_query_with_key_conditions() {
    let query = q::select()
        .from("Users")
        .field("name")
        .filter(cond::equal("pk", "USER#1"))
        .filter(cond::like("sk", "ORDER#%"))
        .filter(cond::greater_than("age", 18))
        .order_by("sk", SortOrder::Desc)
        .limit(5);
    let request = query.compile(&keyed_target()).unwrap();
    assert_eq!(request.kind(), "Query");
    assert_eq!(
        to_json(&request),
        json!({
            "TableName": "Users",
            "KeyConditionExpression": "#n0 = :v0 AND begins_with(#n1, :v1)",
            "FilterExpression": "#n2 > :v2",
            "ProjectionExpression": "#n3",
            "ExpressionAttributeNames": {"#n0": "pk", "#n1": "sk", "#n2": "age", "#n3": "name"},
            "ExpressionAttributeValues": {
                ":v0": {"S": "USER#1"},
                ":v1": {"S": "ORDER#"},
                ":v2": {"N": "18"}
            },
            "Limit": 5,
            "ScanIndexForward": false
        })
    );
}

#[test]
fn test_native_query_options() {
    let target = DynamoTarget::new(
        DynamoOptions::new()
            .partition_key("email")
            .index_name("EmailIndex")
            .consistent_read(true),
    );
    let request = q::select()
        .from("Users")
        .filter(cond::equal("email", "a@b.c"))
        .compile(&target)
        .unwrap();
    assert_eq!(
        to_json(&request),
        json!({
            "TableName": "Users",
            "IndexName": "EmailIndex",
            "KeyConditionExpression": "#n0 = :v0",
            "ExpressionAttributeNames": {"#n0": "email"},
            "ExpressionAttributeValues": {":v0": {"S": "a@b.c"}},
            "ConsistentRead": true
        })
    );
}

#[test]
fn test_native_scan() {
    let query = q::select()
        .from("Users")
        .filter(cond::equal("status", "active"))
        .filter(cond::not_equal("previous", "active"))
        .filter(cond::null("deletedAt"))
        .limit(10);
    let request = query.compile(&DynamoTarget::default()).unwrap();
    assert_eq!(request.kind(), "Scan");
    assert_eq!(
        to_json(&request),
        json!({
            "TableName": "Users",
            "FilterExpression": "#n0 = :v0 AND #n1 <> :v0 AND attribute_not_exists(#n2)",
            "ExpressionAttributeNames": {"#n0": "status", "#n1": "previous", "#n2": "deletedAt"},
            "ExpressionAttributeValues": {":v0": {"S": "active"}},
            "Limit": 10
        })
    );

    let forced = DynamoTarget::new(DynamoOptions::new().partition_key("pk").force_scan(true));
    let request = q::select()
        .from("Users")
        .filter(cond::equal("pk", "USER#1"))
        .compile(&forced)
        .unwrap();
    assert_eq!(request.kind(), "Scan");
}

#[test]
fn test_native_sort_key_alone_scans() {
    let request = q::select()
        .from("Users")
        .filter(cond::equal("sk", "PROFILE"))
        .compile(&keyed_target())
        .unwrap();
    assert_eq!(request.kind(), "Scan");
}

#[test]
fn test_native_insert() {
    let target = DynamoTarget::default();
    let single = q::insert("Users")
        .values([vec![
            ("id", Value::from("u1")),
            ("age", Value::from(30)),
            ("tags", Value::List(vec!["a".into(), "b".into()])),
        ]])
        .unwrap();
    let request = single.compile(&target).unwrap();
    assert_eq!(
        to_json(&request),
        json!({
            "TableName": "Users",
            "Item": {
                "id": {"S": "u1"},
                "age": {"N": "30"},
                "tags": {"SS": ["a", "b"]}
            }
        })
    );

    let batch = q::insert("Users")
        .values([vec![("id", Value::from("a"))], vec![("id", Value::from("b"))]])
        .unwrap();
    let request = batch.compile(&target).unwrap();
    assert_eq!(request.kind(), "BatchWriteItem");
    assert_eq!(
        to_json(&request),
        json!({
            "RequestItems": {
                "Users": [
                    {"PutRequest": {"Item": {"id": {"S": "a"}}}},
                    {"PutRequest": {"Item": {"id": {"S": "b"}}}}
                ]
            }
        })
    );

    let err = q::insert("Users")
        .select(q::select().from("Other"), None)
        .unwrap()
        .compile(&target)
        .unwrap_err();
    assert_eq!(err.to_string(), "DynamoDB does not support INSERT ... SELECT");
}

#[test]
fn test_native_update() {
    let target = DynamoTarget::new(DynamoOptions::new().partition_key("id"));
    let update = q::update("Users")
        .set("name", "John")
        .set("age", 30)
        .filter(cond::equal("id", "u1"))
        .filter(cond::equal("status", "active"));
    let request = update.compile(&target).unwrap();
    assert_eq!(
        to_json(&request),
        json!({
            "TableName": "Users",
            "Key": {"id": {"S": "u1"}},
            "UpdateExpression": "SET #n0 = :v0, #n1 = :v1",
            "ConditionExpression": "#n2 = :v2",
            "ExpressionAttributeNames": {"#n0": "name", "#n1": "age", "#n2": "status"},
            "ExpressionAttributeValues": {
                ":v0": {"S": "John"},
                ":v1": {"N": "30"},
                ":v2": {"S": "active"}
            }
        })
    );

    let err = q::update("Users")
        .set_expr("total", func::multiply(["a", "b"]))
        .filter(cond::equal("id", "u1"))
        .compile(&target)
        .unwrap_err();
    assert!(err.to_string().starts_with("DynamoDB does not support computed values: "));
}

#[test]
fn test_native_update_requires_full_key() {
    let err = q::update("Users")
        .set("name", "x")
        .filter(cond::equal("pk", "USER#1"))
        .compile(&keyed_target())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "DynamoDB UPDATE requires an equality condition on key 'sk'"
    );
}

#[test]
fn test_native_delete() {
    let request = q::delete("Users")
        .filter(cond::equal("pk", "USER#1"))
        .filter(cond::equal("sk", "PROFILE"))
        .compile(&keyed_target())
        .unwrap();
    assert_eq!(request.kind(), "DeleteItem");
    assert_eq!(
        to_json(&request),
        json!({
            "TableName": "Users",
            "Key": {"pk": {"S": "USER#1"}, "sk": {"S": "PROFILE"}}
        })
    );

    let err = q::delete("Users")
        .filter(cond::equal("id", 1))
        .compile(&DynamoTarget::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "DynamoDB DELETE requires a configured partition key");
}

#[test]
fn test_native_rejects_ddl_and_grouping() {
    let target = keyed_target();
    let err = q::create_view_as("v", q::select().from("Users"))
        .compile(&target)
        .unwrap_err();
    assert_eq!(err.to_string(), "DynamoDB does not support CREATE VIEW AS SELECT");

    let err = q::select()
        .from("Users")
        .group_by(["status"])
        .compile(&target)
        .unwrap_err();
    assert_eq!(err.to_string(), "DynamoDB does not support GROUP BY");
    assert_eq!(target.name(), "DynamoDB");
}
