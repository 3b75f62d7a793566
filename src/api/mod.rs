//! HTTP adapter over the lifecycle managers.
//!
//! Handlers translate request bodies into service inputs, middleware turns
//! bearer tokens into a [`crate::domain::Principal`] and applies the tier
//! gates, and every failure leaves through [`crate::errors::AppError`].

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
