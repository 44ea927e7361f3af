//! # Invictus Docs MCP — documentation server
//!
//! Indexes the Invictus for Azure markdown documentation into an in-memory
//! store at startup, then serves it to AI assistants over the Model Context
//! Protocol (MCP): ranked free-text search, per-page resources, and canned
//! prompts, all on stdio.
//!
//! ## Architecture
//!
//! - **[`config`]** — Configuration loading, validation, and defaults
//! - **[`document`]** — `Document` and `SearchResult` records
//! - **[`index`]** — Root resolution, markdown discovery, extraction pipeline, concurrent store
//! - **[`search`]** — Term-weighted relevance scoring and excerpt selection
//! - **[`mcp`]** — MCP server: 5 tool handlers, resources, prompts (stdio via rmcp)

pub mod config;
pub mod document;
pub mod index;
pub mod mcp;
pub mod search;
