//! File storage for filegate.
//!
//! This module provides:
//! - Stored-name derivation (slug, random disambiguator, original extension)
//! - Name validation for client-supplied names
//! - The flat on-disk file store

pub mod name;
mod store;

pub use name::{derive_stored_name, is_hidden, is_listable, slugify, stored_name, validate_name};
pub use store::{FileStore, PendingUpload};
