//! Mapping tool results onto MCP responses
//!
//! - Ok values become pretty JSON text content.
//! - Not-found and invalid-input errors become `{status: "error", message}`
//!   results flagged with `is_error`, so the client sees them as answers.
//! - Any other error is a fault and becomes an MCP internal error.

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;
use tracing::{debug, error};

use tally_core::tools::ToolOutcome;

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize result: {}", e), None))
}

fn recover(tool: &str, err: tally_core::Error) -> Result<CallToolResult, McpError> {
    match ToolOutcome::from_recoverable(&err) {
        Some(outcome) => {
            debug!(tool, "Tool returned error result: {}", outcome.message);
            Ok(CallToolResult::error(vec![Content::text(to_json(&outcome)?)]))
        }
        None => {
            error!(tool, "Tool failed: {}", err);
            Err(McpError::internal_error(err.to_string(), None))
        }
    }
}

/// Respond with a query result
pub(crate) fn json_result<T: Serialize>(
    tool: &str,
    result: tally_core::Result<T>,
) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => Ok(CallToolResult::success(vec![Content::text(to_json(&value)?)])),
        Err(err) => recover(tool, err),
    }
}

/// Respond with the outcome of a mutating tool
pub(crate) fn outcome_result(
    tool: &str,
    result: tally_core::Result<ToolOutcome>,
) -> Result<CallToolResult, McpError> {
    match result {
        Ok(outcome) if outcome.is_success() => {
            debug!(tool, "{}", outcome.message);
            Ok(CallToolResult::success(vec![Content::text(to_json(&outcome)?)]))
        }
        Ok(outcome) => Ok(CallToolResult::error(vec![Content::text(to_json(&outcome)?)])),
        Err(err) => recover(tool, err),
    }
}
