//! Carousel image-selection logic.
//!
//! The bucket is flattened into a unique stem → key index; selection
//! then walks the sorted stems with a rotating counter, or picks at
//! random. The counter is owned by the service state and injected here
//! rather than living in a process-wide static.

use std::collections::BTreeMap;
use std::sync::Mutex;

use rand::Rng;

use crate::images::is_safe_basename;
use crate::stock::{split_extension, ALLOWED_IMAGE_EXTENSIONS};

/// Lower wins when several extensions share a stem.
fn extension_priority(extension: &str) -> usize {
    match extension {
        ".webp" => 0,
        ".png" => 1,
        ".jpg" => 2,
        ".jpeg" => 3,
        ".gif" => 4,
        _ => usize::MAX,
    }
}

/// Validate a candidate stem: non-empty, no separators, no dots, safe
/// character set.
pub fn sanitize_image_base_name(value: &str) -> Option<String> {
    let name = value.trim();
    if name.is_empty() {
        return None;
    }
    if name.contains('/') || name.contains('\\') || name.contains('\0') || name.contains('.') {
        return None;
    }
    if !is_safe_basename(name) {
        return None;
    }
    Some(name.to_string())
}

/// Index top-level image keys by sanitized stem, preferring
/// `.webp < .png < .jpg < .jpeg < .gif` when a stem appears with
/// several extensions. The map iterates in sorted stem order.
pub fn build_unique_image_index(object_keys: &[String]) -> BTreeMap<String, String> {
    let mut index: BTreeMap<String, String> = BTreeMap::new();

    for key in object_keys {
        if key.contains('/') || key.contains('\\') || key.contains('\0') {
            continue;
        }

        let (stem, extension) = split_extension(key);
        if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            continue;
        }

        let Some(stem) = sanitize_image_base_name(stem) else {
            continue;
        };

        match index.get(&stem) {
            None => {
                index.insert(stem, key.clone());
            }
            Some(existing) => {
                let existing_extension = split_extension(existing).1;
                if extension_priority(&extension) < extension_priority(&existing_extension) {
                    index.insert(stem, key.clone());
                }
            }
        }
    }

    index
}

/// Rotation state for sequential carousel selection. Shared by all
/// requests of one service instance.
#[derive(Debug, Default)]
pub struct RotationCounter(Mutex<usize>);

impl RotationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn advance(&self, len: usize) -> usize {
        let mut cursor = self
            .0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let position = *cursor % len;
        *cursor = (position + 1) % len;
        position
    }
}

/// Pick the next `(stem, key)` pair, sequentially via the injected
/// counter or uniformly at random. `None` when the index is empty.
pub fn choose_image<'a>(
    index: &'a BTreeMap<String, String>,
    use_random: bool,
    rotation: &RotationCounter,
) -> Option<(&'a str, &'a str)> {
    if index.is_empty() {
        return None;
    }

    let position = if use_random {
        rand::rng().random_range(0..index.len())
    } else {
        rotation.advance(index.len())
    };

    index
        .iter()
        .nth(position)
        .map(|(stem, key)| (stem.as_str(), key.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn index_skips_nested_and_unknown_keys() {
        let index = build_unique_image_index(&keys(&[
            "dir/a.jpg",
            "b.txt",
            "good.png",
            "bad name!.jpg",
        ]));
        assert_eq!(index.len(), 1);
        assert_eq!(index["good"], "good.png");
    }

    #[test]
    fn index_prefers_webp_over_jpg() {
        let index = build_unique_image_index(&keys(&["pic.jpg", "pic.webp", "pic.gif"]));
        assert_eq!(index["pic"], "pic.webp");
    }

    #[test]
    fn index_keeps_higher_priority_winner() {
        // Order of arrival must not matter.
        let index = build_unique_image_index(&keys(&["pic.webp", "pic.jpg"]));
        assert_eq!(index["pic"], "pic.webp");
    }

    #[test]
    fn sequential_selection_rotates_and_wraps() {
        let index = build_unique_image_index(&keys(&["b.jpg", "a.jpg", "c.jpg"]));
        let rotation = RotationCounter::new();

        let picks: Vec<&str> = (0..4)
            .map(|_| choose_image(&index, false, &rotation).unwrap().0)
            .collect();
        // Stems iterate sorted, then wrap.
        assert_eq!(picks, vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn random_selection_stays_in_index() {
        let index = build_unique_image_index(&keys(&["a.jpg", "b.jpg"]));
        let rotation = RotationCounter::new();
        for _ in 0..20 {
            let (stem, _) = choose_image(&index, true, &rotation).unwrap();
            assert!(stem == "a" || stem == "b");
        }
    }

    #[test]
    fn empty_index_yields_none() {
        let index = BTreeMap::new();
        assert_eq!(choose_image(&index, false, &RotationCounter::new()), None);
    }

    #[test]
    fn sanitize_rejects_dots_and_separators() {
        assert_eq!(sanitize_image_base_name("ok-name_1"), Some("ok-name_1".to_string()));
        assert_eq!(sanitize_image_base_name("has.dot"), None);
        assert_eq!(sanitize_image_base_name("a/b"), None);
        assert_eq!(sanitize_image_base_name(""), None);
    }
}
