//! Word game line protocol
//!
//! Handles line framing, name validation, and response generation.

pub mod framing;
pub mod responses;
pub mod validation;

pub use framing::{Frame, LineFramer};
pub use validation::validate_username;
