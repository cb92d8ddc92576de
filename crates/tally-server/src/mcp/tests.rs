//! MCP tool tests

use super::*;
use rmcp::model::RawContent;
use tempfile::TempDir;

fn setup_server() -> (TallyMcpServer, TempDir) {
    let db = Database::in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let categories = CategoriesFile::new(dir.path().join("categories.json"));
    categories.ensure_default().unwrap();
    (TallyMcpServer::new(db, categories), dir)
}

fn body_json(result: &CallToolResult) -> serde_json::Value {
    match &result.content[0].raw {
        RawContent::Text(text) => serde_json::from_str(&text.text).unwrap(),
        _ => panic!("expected text content"),
    }
}

fn params<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Parameters<T> {
    Parameters(serde_json::from_value(value).unwrap())
}

// ========== Expense Tools ==========

#[tokio::test]
async fn test_add_and_list_expense() {
    let (server, _dir) = setup_server();

    let result = server
        .add_expense(params(serde_json::json!({
            "date": "2025-01-15",
            "amount": 50.0,
            "category": "food"
        })))
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(false));
    let json = body_json(&result);
    assert_eq!(json["status"], "success");
    assert!(json["id"].as_i64().unwrap() > 0);

    let result = server
        .list_expenses(params(serde_json::json!({
            "start_date": "2025-01-01",
            "end_date": "2025-01-31"
        })))
        .await
        .unwrap();
    let rows = body_json(&result);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["amount"], 50.0);
    assert_eq!(rows[0]["category"], "food");
    assert_eq!(rows[0]["date"], "2025-01-15");
}

#[tokio::test]
async fn test_add_multiple_expenses_returns_ids() {
    let (server, _dir) = setup_server();

    let result = server
        .add_multiple_expenses(params(serde_json::json!({
            "expenses": [
                {"date": "2025-01-15", "amount": 50.0, "category": "food", "note": "Groceries"},
                {"date": "2025-01-16", "amount": 30.0, "category": "transport", "subcategory": "fuel"}
            ]
        })))
        .await
        .unwrap();

    let json = body_json(&result);
    assert_eq!(json["count"], 2);
    assert_eq!(json["ids"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_expense_without_fields_is_error_result() {
    let (server, _dir) = setup_server();

    let added = server
        .add_expense(params(serde_json::json!({
            "date": "2025-01-15", "amount": 50.0, "category": "food"
        })))
        .await
        .unwrap();
    let id = body_json(&added)["id"].as_i64().unwrap();

    let result = server
        .update_expense(params(serde_json::json!({ "expense_id": id })))
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(true));
    let json = body_json(&result);
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "No fields to update");
}

#[tokio::test]
async fn test_delete_missing_expense_is_error_result() {
    let (server, _dir) = setup_server();

    let result = server
        .delete_expense(params(serde_json::json!({ "expense_id": 42 })))
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(true));
    assert_eq!(body_json(&result)["message"], "Expense 42 not found");
}

#[tokio::test]
async fn test_invalid_date_is_error_result() {
    let (server, _dir) = setup_server();

    let result = server
        .list_expenses(params(serde_json::json!({
            "start_date": "January",
            "end_date": "2025-01-31"
        })))
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(true));
    assert_eq!(body_json(&result)["status"], "error");
}

// ========== Income Tools ==========

#[tokio::test]
async fn test_income_tools() {
    let (server, _dir) = setup_server();

    let result = server
        .add_multiple_income(params(serde_json::json!({
            "income_entries": [
                {"date": "2025-01-01", "amount": 3000.0, "source": "salary"},
                {"date": "2025-01-20", "amount": 120.0, "source": "refund"}
            ]
        })))
        .await
        .unwrap();
    let ids = body_json(&result)["ids"].clone();
    let refund_id = ids[1].as_i64().unwrap();

    let result = server
        .update_income(params(serde_json::json!({
            "income_id": refund_id,
            "amount": 125.0
        })))
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(false));

    let result = server
        .list_income(params(serde_json::json!({
            "start_date": "2025-01-01",
            "end_date": "2025-01-31"
        })))
        .await
        .unwrap();
    let rows = body_json(&result);
    assert_eq!(rows[0]["amount"], 125.0);

    let result = server
        .delete_income(params(serde_json::json!({ "income_id": refund_id })))
        .await
        .unwrap();
    assert_eq!(
        body_json(&result)["message"],
        format!("Income {} deleted", refund_id)
    );
}

// ========== Budget Tools ==========

#[tokio::test]
async fn test_budget_tools() {
    let (server, _dir) = setup_server();

    server
        .add_expense(params(serde_json::json!({
            "date": "2025-01-10", "amount": 95.0, "category": "food"
        })))
        .await
        .unwrap();

    let result = server
        .set_budget(params(serde_json::json!({
            "category": "food",
            "monthly_limit": 100.0,
            "start_date": "2025-01-01"
        })))
        .await
        .unwrap();
    assert_eq!(body_json(&result)["status"], "success");

    let result = server
        .check_budget(params(serde_json::json!({
            "category": "food",
            "start_date": "2025-01-01",
            "end_date": "2025-01-31"
        })))
        .await
        .unwrap();
    let json = body_json(&result);
    assert_eq!(json["status"], "warning");
    assert_eq!(json["spent"], 95.0);
    assert_eq!(json["remaining"], 5.0);
    assert_eq!(json["percentage_used"], 95.0);
    assert_eq!(json["period"]["end_date"], "2025-01-31");

    let result = server
        .check_budget(params(serde_json::json!({
            "category": "fuel",
            "start_date": "2025-01-01",
            "end_date": "2025-01-31"
        })))
        .await
        .unwrap();
    let json = body_json(&result);
    assert_eq!(json["status"], "no_budget");
    assert_eq!(json["message"], "No budget set for fuel");

    let result = server.list_budgets().await.unwrap();
    let budgets = body_json(&result);
    assert_eq!(budgets.as_array().unwrap().len(), 1);
    assert_eq!(budgets[0]["category"], "food");
}

// ========== Report Tools ==========

#[tokio::test]
async fn test_financial_summary_empty() {
    let (server, _dir) = setup_server();

    let result = server
        .financial_summary(params(serde_json::json!({
            "start_date": "2025-01-01",
            "end_date": "2025-01-31"
        })))
        .await
        .unwrap();
    let json = body_json(&result);
    assert_eq!(json["total_income"], 0.0);
    assert_eq!(json["total_expenses"], 0.0);
    assert_eq!(json["balance"], 0.0);
    assert_eq!(json["period"]["start_date"], "2025-01-01");
}

#[tokio::test]
async fn test_spending_trends_echoes_group_by() {
    let (server, _dir) = setup_server();

    server
        .add_expense(params(serde_json::json!({
            "date": "2025-02-03", "amount": 20.0, "category": "food"
        })))
        .await
        .unwrap();

    let result = server
        .get_spending_trends(params(serde_json::json!({
            "start_date": "2025-01-01",
            "end_date": "2025-12-31",
            "group_by": "year"
        })))
        .await
        .unwrap();
    let json = body_json(&result);
    assert_eq!(json["group_by"], "year");
    assert_eq!(json["date_range"]["start"], "2025-01-01");
    assert_eq!(json["trends"][0]["period"], "2025-02");
}

#[tokio::test]
async fn test_summarize_tool() {
    let (server, _dir) = setup_server();

    server
        .add_multiple_expenses(params(serde_json::json!({
            "expenses": [
                {"date": "2025-01-02", "amount": 10.0, "category": "food"},
                {"date": "2025-01-03", "amount": 70.0, "category": "transport"}
            ]
        })))
        .await
        .unwrap();

    let result = server
        .summarize(params(serde_json::json!({
            "start_date": "2025-01-01",
            "end_date": "2025-01-31"
        })))
        .await
        .unwrap();
    let json = body_json(&result);
    assert_eq!(json[0]["category"], "transport");
    assert_eq!(json[0]["total_amount"], 70.0);
    assert_eq!(json[1]["count"], 1);
}

// ========== Categories Resource ==========

#[test]
fn test_categories_resource_descriptor() {
    let (server, _dir) = setup_server();
    let resource = server.categories_resource();
    assert_eq!(resource.raw.uri, CATEGORIES_URI);
    assert_eq!(resource.raw.mime_type.as_deref(), Some("application/json"));
}

#[test]
fn test_read_categories_is_fresh() {
    let (server, dir) = setup_server();
    let path = dir.path().join("categories.json");

    let read_text = |server: &TallyMcpServer| -> String {
        let result = server.read_resource_uri(CATEGORIES_URI).unwrap();
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => text.clone(),
            _ => panic!("expected text contents"),
        }
    };

    assert!(read_text(&server).contains("groceries"));

    std::fs::write(&path, r#"{"categories": {"hobbies": ["pottery"]}}"#).unwrap();
    let text = read_text(&server);
    assert!(text.contains("pottery"));
    assert!(!text.contains("groceries"));
}

#[test]
fn test_read_unknown_resource() {
    let (server, _dir) = setup_server();
    assert!(server.read_resource_uri("expense://nope").is_err());
}

#[test]
fn test_server_info_advertises_tools_and_resources() {
    let (server, _dir) = setup_server();
    let info = server.get_info();
    assert_eq!(info.server_info.name, "tally");
    assert!(info.capabilities.tools.is_some());
    assert!(info.capabilities.resources.is_some());
}
