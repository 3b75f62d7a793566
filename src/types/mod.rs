//! Shared response types for every handler.

mod response;

pub use response::{ApiResponse, Created, ListData};
