//! Base-name matching against object-store keys for the photostock
//! service.

use crate::error::CoreError;
use crate::images::is_safe_basename;

/// Extensions the image services recognize, lowercase with the dot.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Split a key into stem and lowercased extension. A leading dot is
/// part of the stem (`.hidden` has no extension).
pub(crate) fn split_extension(key: &str) -> (&str, String) {
    match key.rfind('.') {
        Some(position) if position > 0 => (&key[..position], key[position..].to_ascii_lowercase()),
        _ => (key, String::new()),
    }
}

/// Validate a requested image base name: a bare name without extension,
/// matching `[A-Za-z0-9_-]+`.
pub fn validate_stock_image_name(value: &str) -> Result<String, CoreError> {
    let name = value.trim();

    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(CoreError::Validation(
            "Invalid 'image' path. Use a file name without directories".into(),
        ));
    }

    if name.contains('.') {
        return Err(CoreError::Validation("image must be without extension".into()));
    }

    if !is_safe_basename(name) {
        return Err(CoreError::Validation(
            "Invalid 'image' name. Use only letters, numbers, '-' and '_'".into(),
        ));
    }

    Ok(name.to_string())
}

/// Keep the top-level keys whose stem equals the requested base name
/// and whose extension is recognized, sorted for deterministic
/// ambiguity reports.
pub fn find_matching_keys(image_name: &str, object_keys: &[String]) -> Vec<String> {
    let mut matches: Vec<String> = object_keys
        .iter()
        .filter(|key| !key.contains('/') && !key.contains('\\') && !key.contains('\0'))
        .filter(|key| {
            let (stem, extension) = split_extension(key);
            stem == image_name && ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str())
        })
        .cloned()
        .collect();
    matches.sort();
    matches
}
