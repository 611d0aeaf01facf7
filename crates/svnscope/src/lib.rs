//! svnscope library
//!
//! This module exports the bridge between a UI process and the svn command
//! line: configuration, the shared application context, the six request
//! handlers and their router, and the MCP server that exposes them.

pub mod config;
pub mod context;
pub mod files;
pub mod handlers;
pub mod router;
pub mod server;
