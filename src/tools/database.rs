//! Database tool
//!
//! SQLite operations against a per-call in-memory connection. Nothing
//! persists between calls: every invocation opens a fresh `:memory:`
//! database and tears it down on return. Each operation is therefore
//! self-contained; `insert` creates its demo table before inserting.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Connection, Row, SqliteConnection};

use super::traits::{Tool, ToolResult};
use crate::error::Result;

/// A validated database operation
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum DbOperation {
    /// Create a table with the demo schema `(id INTEGER PRIMARY KEY, data TEXT)`
    Create { table: String },
    /// Run a read-only SELECT query
    Select { query: String },
    /// Insert a row of text data into a table
    Insert { table: String, data: String },
}

/// Built-in tool: ephemeral SQLite database
#[derive(Default)]
pub struct DatabaseTool;

impl DatabaseTool {
    pub fn new() -> Self {
        DatabaseTool
    }

    async fn run(&self, op: DbOperation) -> crate::error::Result<ToolResult> {
        let mut conn = SqliteConnection::connect("sqlite::memory:").await?;

        let result = match op {
            DbOperation::Create { table } => {
                if !is_identifier(&table) {
                    ToolResult::failure(format!("Invalid table name: {}", table))
                } else {
                    let sql = format!(
                        "CREATE TABLE {} (id INTEGER PRIMARY KEY, data TEXT)",
                        table
                    );
                    match sqlx::query(&sql).execute(&mut conn).await {
                        Ok(_) => ToolResult::success(format!("Created table: {}", table)),
                        Err(e) => ToolResult::failure(format!("Database error: {}", e)),
                    }
                }
            }
            DbOperation::Select { query } => {
                if !query.trim_start().to_lowercase().starts_with("select") {
                    ToolResult::failure("Only SELECT queries are allowed".to_string())
                } else {
                    match sqlx::query(&query).fetch_all(&mut conn).await {
                        Ok(rows) => {
                            let formatted: Vec<String> = rows.iter().map(format_row).collect();
                            ToolResult::success(format!(
                                "Query results ({} rows):\n{}",
                                formatted.len(),
                                formatted.join("\n")
                            ))
                        }
                        Err(e) => ToolResult::failure(format!("Database error: {}", e)),
                    }
                }
            }
            DbOperation::Insert { table, data } => {
                if !is_identifier(&table) {
                    ToolResult::failure(format!("Invalid table name: {}", table))
                } else {
                    let create = format!(
                        "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY, data TEXT)",
                        table
                    );
                    let insert = format!("INSERT INTO {} (data) VALUES (?)", table);
                    let outcome = async {
                        sqlx::query(&create).execute(&mut conn).await?;
                        sqlx::query(&insert).bind(&data).execute(&mut conn).await
                    }
                    .await;
                    match outcome {
                        Ok(done) => ToolResult::success(format!(
                            "Inserted data into {} (row id {})",
                            table,
                            done.last_insert_rowid()
                        )),
                        Err(e) => ToolResult::failure(format!("Database error: {}", e)),
                    }
                }
            }
        };

        conn.close().await.ok();
        Ok(result)
    }
}

/// Table names must be bare identifiers; everything else is bound or rejected.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn format_row(row: &SqliteRow) -> String {
    let mut parts = Vec::new();
    for (i, column) in row.columns().iter().enumerate() {
        let value = if let Ok(v) = row.try_get::<i64, _>(i) {
            v.to_string()
        } else if let Ok(v) = row.try_get::<f64, _>(i) {
            v.to_string()
        } else if let Ok(v) = row.try_get::<String, _>(i) {
            v
        } else {
            "NULL".to_string()
        };
        parts.push(format!("{}={}", column.name(), value));
    }
    parts.join(", ")
}

#[async_trait]
impl Tool for DatabaseTool {
    fn name(&self) -> &str {
        "database"
    }

    fn description(&self) -> &str {
        "Perform SQLite operations on an ephemeral in-memory database. \
         Use {\"op\": \"create\", \"table\": ...}, {\"op\": \"select\", \"query\": ...}, \
         or {\"op\": \"insert\", \"table\": ..., \"data\": ...}. State does not persist between calls."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "op": {
                    "type": "string",
                    "enum": ["create", "select", "insert"],
                    "description": "Operation kind"
                },
                "table": {
                    "type": "string",
                    "description": "Table name (create/insert)"
                },
                "query": {
                    "type": "string",
                    "description": "SELECT statement (select only)"
                },
                "data": {
                    "type": "string",
                    "description": "Text data to insert (insert only)"
                }
            },
            "required": ["op"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let op: DbOperation = match serde_json::from_value(args) {
            Ok(op) => op,
            Err(e) => {
                return Ok(ToolResult::failure(format!(
                    "Invalid database operation: {}",
                    e
                )))
            }
        };
        self.run(op).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_table() {
        let tool = DatabaseTool::new();
        let result = tool
            .execute(serde_json::json!({"op": "create", "table": "notes"}))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content.as_deref(), Some("Created table: notes"));
    }

    #[tokio::test]
    async fn test_select_expression() {
        let tool = DatabaseTool::new();
        let result = tool
            .execute(serde_json::json!({"op": "select", "query": "SELECT 1 + 1 AS total"}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.content.unwrap().contains("total=2"));
    }

    #[tokio::test]
    async fn test_non_select_is_rejected() {
        let tool = DatabaseTool::new();
        let result = tool
            .execute(serde_json::json!({"op": "select", "query": "DROP TABLE notes"}))
            .await
            .unwrap();
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_insert_is_self_contained() {
        let tool = DatabaseTool::new();
        let result = tool
            .execute(serde_json::json!({
                "op": "insert",
                "table": "notes",
                "data": "it's; got -- tricky 'characters'"
            }))
            .await
            .unwrap();
        assert!(result.success, "{:?}", result.error);
        assert!(result.content.unwrap().contains("row id 1"));
    }

    #[tokio::test]
    async fn test_hostile_table_name_rejected() {
        let tool = DatabaseTool::new();
        let result = tool
            .execute(serde_json::json!({
                "op": "create",
                "table": "x; DROP TABLE users"
            }))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("Invalid table name"));
    }

    #[tokio::test]
    async fn test_state_does_not_persist_between_calls() {
        let tool = DatabaseTool::new();
        tool.execute(serde_json::json!({"op": "create", "table": "memo"}))
            .await
            .unwrap();
        let result = tool
            .execute(serde_json::json!({"op": "select", "query": "SELECT * FROM memo"}))
            .await
            .unwrap();
        // Fresh connection per call: the table from the previous call is gone.
        assert!(!result.success);
    }
}
