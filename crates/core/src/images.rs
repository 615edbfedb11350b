//! Image filename validation and legacy-shape normalization.
//!
//! The `images` field of stored moments has carried three historical
//! shapes: a flat list of filenames, a list of `{key, order}` objects
//! pointing into the object store, and occasional garbage. Every path
//! that touches the field — create, patch, read serialization, and the
//! startup migration — goes through [`normalize_images`] so a single
//! set of filename rules applies everywhere.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum accepted filename length after trimming.
pub const MAX_FILENAME_LENGTH: usize = 255;

static SAFE_FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._ -]+$").expect("valid regex"));

static SAFE_BASENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));

/// Validate and trim a bare image filename.
///
/// The grammar forbids path separators, `..`, URL-ish characters and
/// anything outside `[A-Za-z0-9._ -]`. Errors name the violated rule.
pub fn validate_image_filename(value: &str) -> Result<String, CoreError> {
    let normalized = value.trim();

    if normalized.is_empty() {
        return Err(CoreError::Validation("must not be empty".into()));
    }

    if normalized.chars().count() > MAX_FILENAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "must be at most {MAX_FILENAME_LENGTH} characters"
        )));
    }

    if normalized.contains('/') || normalized.contains('\\') {
        return Err(CoreError::Validation(
            "must not contain path separators".into(),
        ));
    }

    if normalized.contains("..") || normalized == "." {
        return Err(CoreError::Validation("must not contain '..'".into()));
    }

    if normalized.contains("://") || normalized.contains('?') || normalized.contains('#') {
        return Err(CoreError::Validation(
            "must be a file name without URL or query string".into(),
        ));
    }

    if !SAFE_FILENAME_RE.is_match(normalized) {
        return Err(CoreError::Validation(
            "contains unsupported characters".into(),
        ));
    }

    Ok(normalized.to_string())
}

/// Extract the final path segment of a legacy object-store key and
/// validate it as a filename. Returns `None` when nothing usable is
/// left.
pub fn extract_legacy_filename(value: &str) -> Option<String> {
    let key = value.trim().replace('\\', "/");
    if key.is_empty() {
        return None;
    }

    let filename = key.rsplit('/').next().unwrap_or_default();
    if filename.is_empty() {
        return None;
    }

    validate_image_filename(filename).ok()
}

/// One element of a stored `images` array, resolved from its raw
/// document form exactly once at the storage boundary. Nothing outside
/// the normalizer branches on the historical shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageEntry {
    /// Already a bare filename string.
    Name(String),
    /// Legacy object shape `{key: "<possibly-slashed-path>", order: n}`.
    Legacy {
        key: Option<String>,
        order: Option<i64>,
    },
    /// Anything else (numbers, nested arrays, objects without a key).
    Unsupported,
}

/// The raw `images` field of a stored moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawImages {
    /// Field absent on the document.
    Missing,
    /// Present but not an array.
    NotAnArray,
    /// Present as an array of entries.
    List(Vec<ImageEntry>),
}

/// How [`normalize_images`] treats malformed entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Any malformed entry aborts the operation. Used by the startup
    /// migration, which must either fully repair a record or refuse to
    /// start.
    Strict,
    /// Malformed entries are logged and skipped. Used when serializing
    /// arbitrary stored data on the read path.
    Tolerant,
}

/// Failure of strict normalization. Messages name the violated rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("images must be an array")]
    NotAnArray,
    #[error("contains unsupported image entries")]
    UnsupportedEntry,
    #[error("must contain at least one valid image")]
    Empty,
}

/// Canonicalize a raw `images` field into an ordered list of bare
/// filenames.
///
/// Ordering is a stable sort by (effective order, original index):
/// legacy objects contribute their non-negative `order` value,
/// everything else its input position. Tolerant mode never fails and
/// may return an empty list; strict mode requires a non-empty,
/// fully-resolvable input array.
pub fn normalize_images(
    raw: &RawImages,
    mode: NormalizeMode,
    moment_id: Option<&str>,
) -> Result<Vec<String>, NormalizeError> {
    let entries = match raw {
        RawImages::List(entries) => entries,
        RawImages::Missing => {
            if mode == NormalizeMode::Strict {
                return Err(NormalizeError::NotAnArray);
            }
            return Ok(Vec::new());
        }
        RawImages::NotAnArray => {
            if mode == NormalizeMode::Strict {
                return Err(NormalizeError::NotAnArray);
            }
            tracing::warn!(moment_id, "moment has a non-array 'images' field");
            return Ok(Vec::new());
        }
    };

    let mut keyed: Vec<(i64, usize, &ImageEntry)> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let effective = match entry {
                ImageEntry::Legacy { order: Some(order), .. } if *order >= 0 => *order,
                _ => index as i64,
            };
            (effective, index, entry)
        })
        .collect();
    keyed.sort_by_key(|&(order, index, _)| (order, index));

    let mut normalized = Vec::with_capacity(keyed.len());
    for (_, index, entry) in keyed {
        let resolved = match entry {
            ImageEntry::Name(name) => validate_image_filename(name).ok(),
            ImageEntry::Legacy { key: Some(key), .. } => extract_legacy_filename(key),
            ImageEntry::Legacy { key: None, .. } | ImageEntry::Unsupported => None,
        };

        match resolved {
            Some(name) => normalized.push(name),
            None => {
                if mode == NormalizeMode::Strict {
                    return Err(NormalizeError::UnsupportedEntry);
                }
                tracing::warn!(moment_id, index, "skipping invalid image entry");
            }
        }
    }

    if mode == NormalizeMode::Strict && normalized.is_empty() {
        return Err(NormalizeError::Empty);
    }

    Ok(normalized)
}

/// Resolve a filename to the `(filename, basename)` pair used to build
/// image-service URLs: the final extension is stripped and the
/// remaining basename must match `[A-Za-z0-9_-]+` with no further dot.
pub fn resolve_stock_name(filename: &str) -> Result<(String, String), CoreError> {
    let normalized = validate_image_filename(filename)?;

    let base = match normalized.rsplit_once('.') {
        Some((stem, _extension)) => stem,
        None => normalized.as_str(),
    };
    let base = base.trim();

    if base.is_empty() || base.contains('.') {
        return Err(CoreError::Validation(
            "filename must have a valid basename".into(),
        ));
    }

    if !SAFE_BASENAME_RE.is_match(base) {
        return Err(CoreError::Validation(
            "filename basename contains unsupported characters".into(),
        ));
    }

    let base = base.to_string();
    Ok((normalized, base))
}

pub(crate) fn is_safe_basename(value: &str) -> bool {
    SAFE_BASENAME_RE.is_match(value)
}
