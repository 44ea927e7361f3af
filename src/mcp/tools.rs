/// MCP handlers for the documentation server.
///
/// Tools:
/// 1. search_documentation   – ranked free-text search
/// 2. get_installation_guide – canned installation query
/// 3. get_component_info     – canned component query
/// 4. get_migration_guide    – canned migration query
/// 5. list_topics            – category overview
///
/// Documentation pages are also exposed as MCP resources
/// (`invictus://docs/{id}`), and the prompt registry is served from
/// [`crate::mcp::prompts`].
use std::collections::BTreeMap;

use rmcp::handler::server::ServerHandler;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::service::RequestContext;
use rmcp::{
    ErrorData as McpError, RoleServer, handler::server::tool::ToolRouter, model::*, tool,
    tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use crate::document::SearchResult;
use crate::mcp::prompts;
use crate::mcp::server::McpContext;
use crate::search::QueryEngine;

/// URI prefix under which documents are published as resources.
const DOC_URI_PREFIX: &str = "invictus://docs/";

/// Bounds for the caller-supplied result count.
const MIN_RESULTS: usize = 1;
const MAX_RESULTS: usize = 10;

// ── Parameter structs ────────────────────────────────────────────────

#[derive(Deserialize, JsonSchema)]
struct SearchDocumentationParams {
    /// The search query for Invictus documentation
    query: String,
    /// Maximum number of results to return (1-10, default: 5)
    max_results: Option<usize>,
}

#[derive(Deserialize, JsonSchema)]
struct InstallationGuideParams {
    /// Component: 'dashboard', 'framework', or 'both'
    component: Option<String>,
    /// Specific step: 'prerequisites', 'build', 'release', or 'all'
    step: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
struct ComponentInfoParams {
    /// Component name: 'Transco', 'PubSub', 'XML/JSON Converter', etc.
    component: String,
    /// Include usage examples (default: true)
    include_examples: Option<bool>,
}

#[derive(Deserialize, JsonSchema)]
struct MigrationGuideParams {
    /// Component to migrate from (e.g., 'Matrix v1', 'Transco v1')
    from_component: String,
    /// Component to migrate to
    to_component: Option<String>,
}

// ── Response helpers ─────────────────────────────────────────────────

fn text_result(text: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn error_result(msg: &str) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg.to_string())]))
}

fn render_hit(r: &SearchResult) -> String {
    format!(
        "## {}\n\n**Category:** {} | **Relevance:** {:.0}%\n\n{}\n\n{}",
        r.title,
        r.category,
        r.score * 100.0,
        r.description,
        r.content
    )
}

fn render_section(r: &SearchResult) -> String {
    format!("## {}\n\n{}", r.title, r.content)
}

// ── Tool implementations ─────────────────────────────────────────────

#[derive(Clone)]
pub struct DocsTools {
    pub ctx: McpContext,
    engine: QueryEngine,
    pub tool_router: ToolRouter<Self>,
}

#[tool_router]
impl DocsTools {
    pub fn new(ctx: McpContext) -> Self {
        let engine = QueryEngine::new(ctx.index.clone());
        Self {
            ctx,
            engine,
            tool_router: Self::tool_router(),
        }
    }

    // ── Tool 1: search_documentation ────────────────────────────────

    #[tool(
        description = "Search Invictus documentation. Returns relevant documentation sections based on your query."
    )]
    async fn search_documentation(
        &self,
        params: Parameters<SearchDocumentationParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        if p.query.is_empty() {
            return error_result("query is required");
        }

        let max_results = p
            .max_results
            .unwrap_or(self.ctx.config.search_top_k)
            .clamp(MIN_RESULTS, MAX_RESULTS);

        let results = self.engine.search(&p.query, max_results);
        if results.is_empty() {
            return text_result(
                "No relevant documentation found for your query. Try different keywords."
                    .to_string(),
            );
        }

        let rendered: Vec<String> = results.iter().map(render_hit).collect();
        text_result(rendered.join("\n\n---\n\n"))
    }

    // ── Tool 2: get_installation_guide ──────────────────────────────

    #[tool(
        description = "Get step-by-step installation instructions for Invictus Dashboard or Framework."
    )]
    async fn get_installation_guide(
        &self,
        params: Parameters<InstallationGuideParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let component = p.component.as_deref().unwrap_or("framework").to_lowercase();
        let step = p.step.as_deref().unwrap_or("all");

        let query = match component.as_str() {
            "dashboard" => format!("Installing Invictus Dashboard {step}"),
            "framework" => format!("Installing Invictus Framework {step}"),
            "both" => "Installing Invictus Dashboard Framework".to_string(),
            _ => "Installing Invictus".to_string(),
        };

        let results = self.engine.search(&query, 5);
        if results.is_empty() {
            return text_result(format!("No installation guide found for {component}."));
        }

        let sections: Vec<String> = results.iter().map(render_section).collect();
        text_result(format!(
            "# Installation Guide: {}\n\n{}",
            component.to_uppercase(),
            sections.join("\n\n")
        ))
    }

    // ── Tool 3: get_component_info ──────────────────────────────────

    #[tool(
        description = "Get detailed information about Invictus Framework components (Transco, PubSub, etc)."
    )]
    async fn get_component_info(
        &self,
        params: Parameters<ComponentInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        if p.component.is_empty() {
            return error_result("component is required");
        }

        let query = if p.include_examples.unwrap_or(true) {
            format!(
                "{} endpoint parameters configuration example request response",
                p.component
            )
        } else {
            format!("{} endpoint parameters configuration", p.component)
        };

        let results = self.engine.search(&query, 3);
        if results.is_empty() {
            return text_result(format!("No information found for component: {}.", p.component));
        }

        let sections: Vec<String> = results.iter().map(render_section).collect();
        text_result(format!(
            "# {} Component\n\n{}",
            p.component,
            sections.join("\n\n")
        ))
    }

    // ── Tool 4: get_migration_guide ─────────────────────────────────

    #[tool(description = "Get migration instructions for upgrading Invictus components.")]
    async fn get_migration_guide(
        &self,
        params: Parameters<MigrationGuideParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        if p.from_component.is_empty() {
            return error_result("from_component is required");
        }

        let query = format!(
            "migrating {} {} upgrade deprecated",
            p.from_component,
            p.to_component.as_deref().unwrap_or("v2")
        );

        let results = self.engine.search(&query, 3);
        if results.is_empty() {
            return text_result(format!("No migration guide found for {}.", p.from_component));
        }

        let sections: Vec<String> = results.iter().map(render_section).collect();
        text_result(format!(
            "# Migration: {} → {}\n\n{}",
            p.from_component,
            p.to_component.as_deref().unwrap_or("latest"),
            sections.join("\n\n")
        ))
    }

    // ── Tool 5: list_topics ─────────────────────────────────────────

    #[tool(description = "List all available documentation topics and categories.")]
    async fn list_topics(&self) -> Result<CallToolResult, McpError> {
        let docs = self.ctx.index.all();

        let mut by_category: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for doc in &docs {
            by_category
                .entry(doc.category.clone())
                .or_default()
                .push(doc.title.clone());
        }

        let mut out = String::from("# Available Documentation Topics\n\n");
        for (category, titles) in &mut by_category {
            titles.sort();
            out.push_str(&format!("## {category}\n"));
            for title in titles.iter().take(10) {
                out.push_str(&format!("- {title}\n"));
            }
            out.push('\n');
        }
        out.push_str(&format!("\n**Total documents:** {}", docs.len()));

        text_result(out)
    }
}

// ── Server handler: info, resources, prompts ─────────────────────────

#[tool_handler]
impl ServerHandler for DocsTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Search and read the Invictus for Azure documentation. \
                 Use search_documentation for free-text queries; every documentation \
                 page is also exposed as a text/markdown resource."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let resources = self
            .ctx
            .index
            .all()
            .into_iter()
            .map(|doc| {
                let mut resource =
                    RawResource::new(format!("{DOC_URI_PREFIX}{}", doc.id), doc.title.clone());
                resource.description = Some(doc.description.clone());
                resource.mime_type = Some("text/markdown".to_string());
                resource.no_annotation()
            })
            .collect();

        Ok(ListResourcesResult {
            meta: None,
            resources,
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let uri = request.uri;
        let id = uri.strip_prefix(DOC_URI_PREFIX).unwrap_or(&uri);

        match self.ctx.index.get(id) {
            Some(doc) => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(doc.content.clone(), uri.clone())],
            }),
            None => Err(McpError::resource_not_found(
                "resource not found",
                Some(json!({ "uri": uri })),
            )),
        }
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult {
            meta: None,
            prompts: prompts::all(),
            next_cursor: None,
        })
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        prompts::get(&request.name, request.arguments.as_ref())
            .ok_or_else(|| McpError::invalid_params(format!("unknown prompt: {}", request.name), None))
    }
}
