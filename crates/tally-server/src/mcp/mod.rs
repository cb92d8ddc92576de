//! MCP (Model Context Protocol) Server for Tally
//!
//! Exposes the ledger to LLMs as MCP tools, plus the categories document as a
//! readable resource.
//!
//! # Transports
//!
//! - stdio, for desktop MCP clients that spawn the server
//! - Streamable HTTP at `/mcp`, for local network access
//!
//! ```bash
//! tally serve                   # stdio
//! tally serve --http --port 3001
//! ```
//!
//! # Available Tools
//!
//! - `add_expense` / `add_multiple_expenses` - Record spending
//! - `add_income` / `add_multiple_income` - Record earnings
//! - `list_expenses` / `list_income` - Entries in a date range
//! - `summarize` - Expenses per category
//! - `financial_summary` - Income, expenses and balance
//! - `set_budget` / `check_budget` / `list_budgets` - Category budgets
//! - `update_expense` / `update_income` - Partial edits
//! - `delete_expense` / `delete_income` - Removal by ID
//! - `get_spending_trends` - Spending per day, week or month

mod response;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        AnnotateAble, CallToolResult, Implementation, ListResourcesResult,
        PaginatedRequestParam, ProtocolVersion, RawResource, ReadResourceRequestParam,
        ReadResourceResult, Resource, ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use tally_core::categories::{CATEGORIES_MIME_TYPE, CATEGORIES_URI};
use tally_core::db::Database;
use tally_core::tools::{
    self, AddExpenseParams, AddIncomeParams, AddMultipleExpensesParams, AddMultipleIncomeParams,
    CheckBudgetParams, DateRangeParams, DeleteExpenseParams, DeleteIncomeParams, SetBudgetParams,
    SpendingTrendsParams, SummarizeParams, UpdateExpenseParams, UpdateIncomeParams,
};
use tally_core::CategoriesFile;

use response::{json_result, outcome_result};

/// Tally MCP Server state
#[derive(Clone)]
pub struct TallyMcpServer {
    /// Database handle; tool calls run one at a time
    db: Arc<Mutex<Database>>,
    /// Categories document, re-read on every resource access
    categories: CategoriesFile,
    /// Tool router for MCP operations
    tool_router: ToolRouter<Self>,
}

impl TallyMcpServer {
    /// Create a new MCP server over the given database and categories file
    pub fn new(db: Database, categories: CategoriesFile) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            categories,
            tool_router: Self::tool_router(),
        }
    }

    /// Get database access for tool implementations
    pub(crate) async fn db(&self) -> tokio::sync::MutexGuard<'_, Database> {
        self.db.lock().await
    }

    /// Resource descriptor for the categories document
    pub(crate) fn categories_resource(&self) -> Resource {
        let mut raw = RawResource::new(CATEGORIES_URI, "categories".to_string());
        raw.description = Some("Expense categories, subcategories and income sources".to_string());
        raw.mime_type = Some(CATEGORIES_MIME_TYPE.to_string());
        raw.no_annotation()
    }

    /// Read a resource by URI; only the categories document exists
    pub(crate) fn read_resource_uri(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        if uri != CATEGORIES_URI {
            return Err(McpError::resource_not_found(
                format!("Unknown resource: {}", uri),
                Some(serde_json::json!({ "uri": uri })),
            ));
        }

        let text = self.categories.read().map_err(|e| {
            McpError::internal_error(format!("Failed to read categories: {}", e), None)
        })?;
        debug!("Served categories from {}", self.categories.path().display());

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }
}

#[tool_handler]
impl ServerHandler for TallyMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "tally".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Tally Expense Tracker".to_string()),
                website_url: None,
                icons: None,
            },
            instructions: Some(
                "Tally records expenses and income and tracks category budgets. \
                 Dates are YYYY-MM-DD and ranges are inclusive. Read expense://categories \
                 for the category list before recording expenses."
                    .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: vec![self.categories_resource()],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_resource_uri(&uri)
    }
}

#[tool_router]
impl TallyMcpServer {
    #[tool(description = "Add a single expense entry. Dates are YYYY-MM-DD.")]
    async fn add_expense(
        &self,
        Parameters(params): Parameters<AddExpenseParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        outcome_result("add_expense", tools::add_expense(&db, params))
    }

    #[tool(
        description = "Add multiple expense entries at once. Returns the generated IDs in input order."
    )]
    async fn add_multiple_expenses(
        &self,
        Parameters(params): Parameters<AddMultipleExpensesParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        outcome_result(
            "add_multiple_expenses",
            tools::add_multiple_expenses(&db, params),
        )
    }

    #[tool(description = "Add an income entry (salary, freelance, investment, ...).")]
    async fn add_income(
        &self,
        Parameters(params): Parameters<AddIncomeParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        outcome_result("add_income", tools::add_income(&db, params))
    }

    #[tool(description = "Add multiple income entries at once. Returns the generated IDs.")]
    async fn add_multiple_income(
        &self,
        Parameters(params): Parameters<AddMultipleIncomeParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        outcome_result(
            "add_multiple_income",
            tools::add_multiple_income(&db, params),
        )
    }

    #[tool(
        description = "List expense entries within an inclusive date range, newest first."
    )]
    async fn list_expenses(
        &self,
        Parameters(params): Parameters<DateRangeParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        json_result("list_expenses", tools::list_expenses(&db, params))
    }

    #[tool(description = "List income entries within an inclusive date range, newest first.")]
    async fn list_income(
        &self,
        Parameters(params): Parameters<DateRangeParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        json_result("list_income", tools::list_income(&db, params))
    }

    #[tool(
        description = "Summarize expenses by category within an inclusive date range, optionally for one category."
    )]
    async fn summarize(
        &self,
        Parameters(params): Parameters<SummarizeParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        json_result("summarize", tools::summarize(&db, params))
    }

    #[tool(
        description = "Financial summary: total income, total expenses, balance, income by source and expenses by category."
    )]
    async fn financial_summary(
        &self,
        Parameters(params): Parameters<DateRangeParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        json_result("financial_summary", tools::financial_summary(&db, params))
    }

    #[tool(
        description = "Set or update a monthly budget for a category. Setting the same category and start date again overwrites it."
    )]
    async fn set_budget(
        &self,
        Parameters(params): Parameters<SetBudgetParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        outcome_result("set_budget", tools::set_budget(&db, params))
    }

    #[tool(
        description = "Check budget status for a category in a date range: limit, spent, remaining, percentage used and status."
    )]
    async fn check_budget(
        &self,
        Parameters(params): Parameters<CheckBudgetParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        json_result("check_budget", tools::check_budget(&db, params))
    }

    #[tool(description = "List budgets that are still in effect.")]
    async fn list_budgets(&self) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        json_result("list_budgets", tools::list_budgets(&db))
    }

    #[tool(description = "Delete an expense entry by ID.")]
    async fn delete_expense(
        &self,
        Parameters(params): Parameters<DeleteExpenseParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        outcome_result("delete_expense", tools::delete_expense(&db, params))
    }

    #[tool(description = "Delete an income entry by ID.")]
    async fn delete_income(
        &self,
        Parameters(params): Parameters<DeleteIncomeParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        outcome_result("delete_income", tools::delete_income(&db, params))
    }

    #[tool(description = "Update fields of an existing expense. Only the fields provided are changed.")]
    async fn update_expense(
        &self,
        Parameters(params): Parameters<UpdateExpenseParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        outcome_result("update_expense", tools::update_expense(&db, params))
    }

    #[tool(
        description = "Update fields of an existing income entry. Only the fields provided are changed."
    )]
    async fn update_income(
        &self,
        Parameters(params): Parameters<UpdateIncomeParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        outcome_result("update_income", tools::update_income(&db, params))
    }

    #[tool(
        description = "Spending trends over time, grouped by 'day', 'week', or 'month' (default: month)."
    )]
    async fn get_spending_trends(
        &self,
        Parameters(params): Parameters<SpendingTrendsParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        json_result("get_spending_trends", tools::get_spending_trends(&db, params))
    }
}

/// Serve MCP over stdin/stdout until the client disconnects
pub async fn serve_stdio(db: Database, categories: CategoriesFile) -> anyhow::Result<()> {
    info!("Starting MCP server on stdio");

    let service = TallyMcpServer::new(db, categories)
        .serve(rmcp::transport::stdio())
        .await?;
    service.waiting().await?;

    info!("MCP client disconnected");
    Ok(())
}

/// Start the MCP server on the given port
pub async fn start_mcp_server(
    db: Database,
    categories: CategoriesFile,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
    use rmcp::transport::streamable_http_server::StreamableHttpService;

    info!("Starting MCP server at http://{}:{}/mcp", host, port);

    let service = StreamableHttpService::new(
        move || Ok(TallyMcpServer::new(db.clone(), categories.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new()
        .nest_service("/mcp", service)
        .layer(TraceLayer::new_for_http());
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("MCP server ready at http://{}/mcp", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            // Wait for shutdown signal
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
