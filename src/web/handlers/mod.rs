//! API handlers.

pub mod files;
pub mod status;

pub use files::*;
pub use status::*;

use crate::config::DEFAULT_MAX_UPLOAD_SIZE_MB;
use crate::storage::FileStore;

/// Default maximum upload request size in bytes.
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = DEFAULT_MAX_UPLOAD_SIZE_MB as usize * 1024 * 1024;

/// Application state shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// File store over the storage root, resolved once at startup.
    pub store: FileStore,
    /// Maximum upload request size in bytes.
    pub max_upload_size: usize,
}

impl AppState {
    /// Create a new application state.
    pub fn new(store: FileStore) -> Self {
        Self {
            store,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }

    /// Set the maximum upload request size in bytes.
    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.max_upload_size = bytes;
        self
    }
}
