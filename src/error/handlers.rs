//! Error handlers
//!
//! Provides error reporting for failures that end the server.

use crate::error::types::ServerError;
use log::error;

/// Log a fatal server error
pub fn handle_error(err: &ServerError) {
    error!("Word Server Error: {}", err);
}

/// Process exit code for a fatal server error
pub fn error_to_exit_code(err: &ServerError) -> i32 {
    match err {
        ServerError::Config(_) => 78,
        ServerError::Dictionary(_) => 66,
        ServerError::Bind(_, _) => 69,
        ServerError::IoError(_) => 74,
    }
}
