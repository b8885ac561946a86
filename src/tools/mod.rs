//! Nutriscan Tools module
//!
//! Tool implementations behind the MCP server and the command-line utility.

pub mod label;
pub mod status;
