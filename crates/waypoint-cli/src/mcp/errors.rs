//! Error handling utilities for MCP server

use rmcp::ErrorData;
use waypoint_core::TrackerError;

/// Converts a tracker error into an MCP error.
///
/// Caller mistakes (unknown ids, invalid transitions, bad input) become
/// `invalid_params`; everything else is an `internal_error`.
pub fn to_mcp_error(message: &str, error: &TrackerError) -> ErrorData {
    let text = format!("{message}: {error}");
    if error.is_caller_error() {
        ErrorData::invalid_params(text, None)
    } else {
        ErrorData::internal_error(text, None)
    }
}
