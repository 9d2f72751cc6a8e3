//! Web API module for filegate.
//!
//! Plain-text HTTP endpoints for uploading, listing and deleting stored
//! files, plus static retrieval under `/files`.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
