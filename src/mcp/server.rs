//! Catalog MCP Server implementation

use anyhow::Result;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::commands::deadlines::DEFAULT_WINDOW_DAYS;
use crate::core::catalog::{load_catalog, JsonCatalog};
use crate::search::cascade::{SearchEngine, SearchError, SearchOutcome};
use crate::search::embedding::HarmonicEmbedder;
use crate::session::{decode_selection, encode_selection, FilterMode};

/// Parameters for catalog_search tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Natural language query (e.g. "algo en Alemania en julio sobre tecnología")
    #[schemars(description = "Natural language search query")]
    pub query: String,
    /// Opaque session identifier; follow-up selections resolve against
    /// the last result set stored for this session.
    #[schemars(description = "Session identifier for follow-up navigation")]
    pub session_id: String,
}

/// Parameters for catalog_open tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct OpenParams {
    #[schemars(description = "Session identifier used in the search")]
    pub session_id: String,
    /// Selection token from a previous result list (e.g. "country:2")
    #[schemars(description = "Selection token from a previous result list")]
    pub token: String,
}

/// Parameters for catalog_reset tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResetParams {
    #[schemars(description = "Session identifier to reset")]
    pub session_id: String,
}

/// Parameters for catalog_deadlines tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeadlinesParams {
    #[schemars(description = "Session identifier for follow-up navigation")]
    pub session_id: String,
    /// Window in days (default: 14)
    #[schemars(description = "Deadline window in days (default: 14)")]
    #[serde(default)]
    pub days: Option<i64>,
}

/// Search result entry for JSON output
#[derive(Debug, Serialize)]
struct ResultJson {
    index: usize,
    token: String,
    title: String,
    country: String,
    city: String,
    start_date: Option<String>,
    deadline: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutcomeJson {
    mode: FilterMode,
    results: Vec<ResultJson>,
}

impl OutcomeJson {
    fn from_outcome(outcome: &SearchOutcome) -> Self {
        Self {
            mode: outcome.mode,
            results: outcome
                .results
                .iter()
                .enumerate()
                .map(|(i, r)| ResultJson {
                    index: i,
                    token: encode_selection(outcome.mode, i),
                    title: r.title.clone(),
                    country: r.country.clone(),
                    city: r.city.clone(),
                    start_date: r.start_date.map(|d| d.to_string()),
                    deadline: r.deadline.map(|d| d.to_string()),
                })
                .collect(),
        }
    }
}

/// Catalog MCP Service
#[derive(Clone)]
pub struct CatalogService {
    engine: Arc<SearchEngine>,
    catalog_path: PathBuf,
    tool_router: ToolRouter<Self>,
}

impl CatalogService {
    pub fn new(catalog_path: PathBuf) -> Self {
        let engine = Arc::new(SearchEngine::new(
            Arc::new(JsonCatalog::new(catalog_path.clone())),
            Arc::new(HarmonicEmbedder::new()),
        ));
        Self {
            engine,
            catalog_path,
            tool_router: Self::tool_router(),
        }
    }

    fn json_reply<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let output = serde_json::to_string_pretty(value).map_err(|e| {
            McpError::internal_error(format!("JSON serialization failed: {}", e), None)
        })?;
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    fn search_reply(
        result: Result<SearchOutcome, SearchError>,
    ) -> Result<CallToolResult, McpError> {
        match result {
            Ok(outcome) => Self::json_reply(&OutcomeJson::from_outcome(&outcome)),
            // Provider failures are user-visible and recoverable, distinct
            // from "no results found".
            Err(SearchError::RankingUnavailable(e)) => Ok(CallToolResult::success(vec![
                Content::text(format!("Search temporarily unavailable: {}", e)),
            ])),
            Err(e) => Err(McpError::internal_error(
                format!("Search failed: {}", e),
                None,
            )),
        }
    }
}

#[tool_router]
impl CatalogService {
    /// Search the opportunity catalog
    #[tool(
        description = "Search the opportunity catalog with a natural language query. Structured filters (country, city, month, date range) take priority; semantic similarity is the fallback. Returns results with selection tokens for catalog_open."
    )]
    async fn catalog_search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .engine
            .search(&params.0.query, &params.0.session_id)
            .await;
        Self::search_reply(result)
    }

    /// Open one result from the last search in this session
    #[tool(
        description = "Open a single result by selection token from the last result list of this session. Returns the full record detail."
    )]
    async fn catalog_open(
        &self,
        params: Parameters<OpenParams>,
    ) -> Result<CallToolResult, McpError> {
        let Some((mode, index)) = decode_selection(&params.0.token) else {
            return Ok(CallToolResult::success(vec![Content::text(format!(
                "Invalid selection token: {}",
                params.0.token
            ))]));
        };

        match self
            .engine
            .resolve_selection(&params.0.session_id, mode, index)
        {
            Ok(record) => Ok(CallToolResult::success(vec![Content::text(
                record.detail(),
            )])),
            // Invalid selections are a normal reply, never a tool error.
            Err(e) => Ok(CallToolResult::success(vec![Content::text(format!(
                "Invalid selection: {}",
                e
            ))])),
        }
    }

    /// Clear the session's navigation context
    #[tool(description = "Clear the stored result context for a session (return to start).")]
    async fn catalog_reset(
        &self,
        params: Parameters<ResetParams>,
    ) -> Result<CallToolResult, McpError> {
        self.engine.reset_session(&params.0.session_id);
        Ok(CallToolResult::success(vec![Content::text(
            "Session context cleared",
        )]))
    }

    /// List opportunities with deadlines closing soon
    #[tool(
        description = "List opportunities whose application deadline falls within the next N days (default 14), sorted by deadline."
    )]
    async fn catalog_deadlines(
        &self,
        params: Parameters<DeadlinesParams>,
    ) -> Result<CallToolResult, McpError> {
        let days = params.0.days.unwrap_or(DEFAULT_WINDOW_DAYS).max(0);
        let result = self.engine.deadline_soon(&params.0.session_id, days).await;
        Self::search_reply(result)
    }

    /// List the catalog's countries and cities
    #[tool(description = "List the distinct countries and cities present in the catalog.")]
    async fn catalog_list(&self) -> Result<CallToolResult, McpError> {
        let source = JsonCatalog::new(self.catalog_path.clone());
        let catalog = load_catalog(&source).map_err(|e| {
            McpError::internal_error(format!("Failed to load catalog: {}", e), None)
        })?;

        Self::json_reply(&serde_json::json!({
            "countries": catalog.countries(),
            "cities": catalog.cities(),
        }))
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for CatalogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Opportunity catalog MCP server. Provides NLP-filtered and semantic search over study-exchange opportunities, with per-session follow-up navigation.".to_string(),
            ),
            ..Default::default()
        }
    }
}

/// Run the MCP server
pub async fn run_mcp_server(catalog_path: PathBuf) -> Result<()> {
    use tokio::io::{stdin, stdout};

    let service = CatalogService::new(catalog_path);
    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
