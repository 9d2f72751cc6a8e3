//! filegate - minimal HTTP file gateway.
//!
//! Clients upload files with a multipart POST, list them, fetch them as
//! static assets and delete them by name. Everything lives in one flat
//! directory on the host filesystem.

pub mod config;
pub mod error;
pub mod logging;
pub mod storage;
pub mod web;

pub use config::Config;
pub use error::{GatewayError, Result};
pub use storage::FileStore;
pub use web::{ApiError, WebServer};
