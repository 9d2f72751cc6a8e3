//! Stored-name derivation and validation.
//!
//! A stored name is `{slug}-{disambiguator}{ext}`: the slugified stem of the
//! client's original filename, a random 6-character lowercase hex suffix and
//! the original extension, unchanged.

use std::path::Path;

use crate::{GatewayError, Result};

/// Number of random bytes behind the disambiguator (two hex digits each).
const DISAMBIGUATOR_BYTES: usize = 3;

/// Slug used when nothing of the original stem survives slugification.
const FALLBACK_SLUG: &str = "file";

/// Directory name created by filesystem recovery tooling; never listed.
pub const RECOVERY_DIR_NAME: &str = "lost+found";

/// Compose a stored name from its parts.
///
/// `ext` is appended verbatim and is expected to include its leading dot.
pub fn stored_name(slug: &str, disambiguator: &str, ext: &str) -> String {
    format!("{slug}-{disambiguator}{ext}")
}

/// Derive a fresh stored name for an uploaded file.
///
/// Dotfiles stay dotfiles: a leading `.` on the stem survives slugification,
/// so hidden uploads remain hidden from the listing.
pub fn derive_stored_name(original_name: &str) -> String {
    let (stem, ext) = split_original_name(original_name);
    let slug = if stem.starts_with('.') {
        format!(".{}", slugify(stem))
    } else {
        slugify(stem)
    };
    stored_name(&slug, &disambiguator(), ext)
}

/// Split a client-supplied filename into `(stem, ext)`.
///
/// Any directory part is dropped first, using either separator. The
/// extension keeps its leading dot and original case; names like `.hidden`
/// have no extension.
pub fn split_original_name(original_name: &str) -> (&str, &str) {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);

    let path = Path::new(base);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");

    match path.extension().and_then(|s| s.to_str()) {
        // The extension is the tail of `base` after the last dot.
        Some(ext) => (stem, &base[base.len() - ext.len() - 1..]),
        None => (stem, ""),
    }
}

/// Normalize a filename stem into a slug.
///
/// ASCII letters and digits are kept (lowercased); every run of other
/// characters becomes a single `-`, with none at either end.
pub fn slugify(stem: &str) -> String {
    let mut slug = String::with_capacity(stem.len());
    let mut pending_dash = false;

    for c in stem.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Generate a random 6-character lowercase hex disambiguator.
pub fn disambiguator() -> String {
    let bytes: [u8; DISAMBIGUATOR_BYTES] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Check that `name` is a single plain path segment under the storage root.
///
/// Rejects empty names, separators, NUL, `.`, `..` and absolute paths.
pub fn validate_name(name: &str) -> Result<&str> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
        || Path::new(name).is_absolute();

    if invalid {
        return Err(GatewayError::InvalidName(name.to_string()));
    }

    Ok(name)
}

/// Whether a name is a dotfile.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Whether a directory entry is shown by the listing.
pub fn is_listable(name: &str) -> bool {
    !is_hidden(name) && name != RECOVERY_DIR_NAME
}
