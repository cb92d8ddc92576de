//! Tally Server
//!
//! Hosts the MCP tool surface over the Tally ledger. Tool calls are
//! request-per-call: each one checks out a pooled connection, runs its
//! statements and returns the connection before answering.

pub mod mcp;

pub use mcp::{serve_stdio, start_mcp_server, TallyMcpServer};
