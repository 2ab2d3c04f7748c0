//! Single-table DynamoDB flows driven from a `qir.toml`.

use pretty_assertions::assert_eq;
use qir::prelude::*;
use serde_json::json;

const CONFIG: &str = r#"
[dynamodb]
partition_key = "pk"
sort_key = "sk"
"#;

fn target() -> DynamoTarget {
    let config = QirConfig::from_toml(CONFIG).unwrap();
    DynamoTarget::new(config.dynamodb)
}

fn compile_wire(statement: impl Into<Statement>) -> QirResult<DynamoRequest> {
    let statement: Statement = statement.into();
    q::deserialize(&statement.serialize())?.compile(&target())
}

#[test]
fn test_customer_orders() {
    let request = compile_wire(
        q::select()
            .from("Shop")
            .filter(cond::equal("pk", "CUSTOMER#42"))
            .filter(cond::like("sk", "ORDER#%"))
            .order_by("sk", SortOrder::Desc)
            .limit(25),
    )
    .unwrap();
    assert_eq!(request.kind(), "Query");
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "TableName": "Shop",
            "KeyConditionExpression": "#n0 = :v0 AND begins_with(#n1, :v1)",
            "ExpressionAttributeNames": {"#n0": "pk", "#n1": "sk"},
            "ExpressionAttributeValues": {
                ":v0": {"S": "CUSTOMER#42"},
                ":v1": {"S": "ORDER#"}
            },
            "Limit": 25,
            "ScanIndexForward": false
        })
    );
}

#[test]
fn test_order_lifecycle() {
    let put = compile_wire(
        q::insert("Shop")
            .values([vec![
                ("pk", Value::from("CUSTOMER#42")),
                ("sk", Value::from("ORDER#7")),
                ("total", Value::from(99.5)),
                ("paid", Value::from(false)),
            ]])
            .unwrap(),
    )
    .unwrap();
    assert_eq!(put.kind(), "PutItem");
    assert_eq!(
        serde_json::to_value(&put).unwrap()["Item"],
        json!({
            "pk": {"S": "CUSTOMER#42"},
            "sk": {"S": "ORDER#7"},
            "total": {"N": "99.5"},
            "paid": {"BOOL": false}
        })
    );

    let update = compile_wire(
        q::update("Shop")
            .set("paid", true)
            .filter(cond::equal("pk", "CUSTOMER#42"))
            .filter(cond::equal("sk", "ORDER#7")),
    )
    .unwrap();
    assert_eq!(update.kind(), "UpdateItem");
    let update = serde_json::to_value(&update).unwrap();
    assert_eq!(update["Key"], json!({"pk": {"S": "CUSTOMER#42"}, "sk": {"S": "ORDER#7"}}));
    assert_eq!(update["UpdateExpression"], "SET #n0 = :v0");

    let delete = compile_wire(
        q::delete("Shop")
            .filter(cond::equal("pk", "CUSTOMER#42"))
            .filter(cond::equal("sk", "ORDER#7")),
    )
    .unwrap();
    assert_eq!(delete.kind(), "DeleteItem");
}

#[test]
fn test_relational_shapes_are_rejected() {
    let err = compile_wire(
        q::select()
            .from("Shop")
            .inner_join(q::table("Customers", None), cond::column_equal("pk", "id")),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "DynamoDB does not support JOIN operations");

    let err = compile_wire(q::select().from("Shop").offset(10)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "DynamoDB does not support OFFSET. Use ExclusiveStartKey for pagination."
    );

    let err = compile_wire(q::delete("Shop").filter(cond::equal("pk", "CUSTOMER#42"))).unwrap_err();
    assert_eq!(
        err.to_string(),
        "DynamoDB DELETE requires an equality condition on key 'sk'"
    );
}

#[test]
fn test_same_statement_through_partiql() {
    let statement: Statement = q::select()
        .from("Shop")
        .field("total")
        .filter(cond::equal("pk", "CUSTOMER#42"))
        .into();
    assert_eq!(
        statement.compile(&PartiqlTarget::new()).unwrap(),
        "SELECT total FROM Shop WHERE pk = 'CUSTOMER#42'"
    );
    assert_eq!(statement.compile(&target()).unwrap().kind(), "Query");
}
