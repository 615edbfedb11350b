//! Data shapes exchanged with the `moments` collection.
//!
//! Stored documents stay untyped ([`bson::Document`]) because the
//! `images` field may carry legacy shapes; [`Moment::from_document`]
//! is the one place raw bson is resolved into the tagged
//! [`ImageEntry`] variants and normalized.

use bson::{Bson, DateTime as BsonDateTime, Document, doc};
use keepsake_core::images::{normalize_images, ImageEntry, NormalizeMode, RawImages};
use keepsake_core::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Publication state of a moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Draft,
    Public,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Draft => "draft",
            Visibility::Public => "public",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Visibility::Draft),
            "public" => Some(Visibility::Public),
            _ => None,
        }
    }
}

/// A moment as returned by the API: images already normalized, id in
/// hex string form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Moment {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub text: Option<String>,
    pub date: Timestamp,
    pub images: Vec<String>,
    pub visibility: Visibility,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A stored document is missing a system-managed field or carries the
/// wrong type for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("stored moment field '{0}' is missing or mistyped")]
pub struct DocumentFieldError(pub &'static str);

fn string_field(document: &Document, name: &'static str) -> Result<String, DocumentFieldError> {
    document
        .get(name)
        .and_then(Bson::as_str)
        .map(str::to_string)
        .ok_or(DocumentFieldError(name))
}

fn datetime_field(
    document: &Document,
    name: &'static str,
) -> Result<Timestamp, DocumentFieldError> {
    document
        .get(name)
        .and_then(Bson::as_datetime)
        .map(|value| value.to_chrono())
        .ok_or(DocumentFieldError(name))
}

/// The stored document's id, when present and well-typed.
pub fn document_id(document: &Document) -> Option<bson::oid::ObjectId> {
    document.get("_id").and_then(Bson::as_object_id)
}

impl Moment {
    /// Build the API shape from a raw stored document.
    ///
    /// The `images` field is normalized tolerantly — a bad entry is
    /// dropped, never a 500. Missing system fields (`title`, `date`,
    /// timestamps) are a storage invariant violation and do error.
    pub fn from_document(document: &Document) -> Result<Self, DocumentFieldError> {
        let id = document_id(document)
            .ok_or(DocumentFieldError("_id"))?
            .to_hex();

        let raw = raw_images_from_document(document);
        let images =
            normalize_images(&raw, NormalizeMode::Tolerant, Some(&id)).unwrap_or_default();

        let visibility = document
            .get("visibility")
            .and_then(Bson::as_str)
            .and_then(Visibility::parse)
            .unwrap_or(Visibility::Public);

        let tags = document
            .get("tags")
            .and_then(Bson::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|value| value.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id,
            title: string_field(document, "title")?,
            text: document
                .get("text")
                .and_then(Bson::as_str)
                .map(str::to_string),
            date: datetime_field(document, "date")?,
            images,
            visibility,
            tags,
            created_at: datetime_field(document, "createdAt")?,
            updated_at: datetime_field(document, "updatedAt")?,
        })
    }
}

/// A validated create payload, ready to insert.
#[derive(Debug, Clone)]
pub struct NewMoment {
    pub title: String,
    pub text: Option<String>,
    pub date: Timestamp,
    pub images: Vec<String>,
    pub visibility: Visibility,
    pub tags: Vec<String>,
}

impl NewMoment {
    pub(crate) fn to_document(&self, now: Timestamp) -> Document {
        let now = BsonDateTime::from_chrono(now);
        doc! {
            "title": self.title.as_str(),
            "text": self.text.as_deref().map_or(Bson::Null, |text| Bson::String(text.to_string())),
            "date": BsonDateTime::from_chrono(self.date),
            "images": self.images.clone(),
            "visibility": self.visibility.as_str(),
            "tags": self.tags.clone(),
            "createdAt": now,
            "updatedAt": now,
        }
    }
}

/// A validated partial update. The outer `Option` means "field present
/// in the patch"; the inner one carries an explicit null. Fields absent
/// from the patch are never touched.
#[derive(Debug, Clone, Default)]
pub struct MomentPatch {
    pub title: Option<Option<String>>,
    pub text: Option<Option<String>>,
    pub date: Option<Option<Timestamp>>,
    /// Explicit null is rejected upstream; a present value replaces the
    /// whole list.
    pub images: Option<Vec<String>>,
    pub visibility: Option<Option<Visibility>>,
    /// Explicit null collapses to an empty list upstream.
    pub tags: Option<Vec<String>>,
}

impl MomentPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.text.is_none()
            && self.date.is_none()
            && self.images.is_none()
            && self.visibility.is_none()
            && self.tags.is_none()
    }

    pub(crate) fn to_set_document(&self, updated_at: Timestamp) -> Document {
        fn nullable<T, F: FnOnce(&T) -> Bson>(value: &Option<T>, to_bson: F) -> Bson {
            value.as_ref().map_or(Bson::Null, to_bson)
        }

        let mut set = Document::new();
        if let Some(title) = &self.title {
            set.insert("title", nullable(title, |t| Bson::String(t.clone())));
        }
        if let Some(text) = &self.text {
            set.insert("text", nullable(text, |t| Bson::String(t.clone())));
        }
        if let Some(date) = &self.date {
            set.insert(
                "date",
                nullable(date, |d| Bson::DateTime(BsonDateTime::from_chrono(*d))),
            );
        }
        if let Some(images) = &self.images {
            set.insert("images", images.clone());
        }
        if let Some(visibility) = &self.visibility {
            set.insert(
                "visibility",
                nullable(visibility, |v| Bson::String(v.as_str().to_string())),
            );
        }
        if let Some(tags) = &self.tags {
            set.insert("tags", tags.clone());
        }
        set.insert("updatedAt", BsonDateTime::from_chrono(updated_at));
        set
    }
}

/// Resolve the raw `images` field into the tagged shape the normalizer
/// consumes. This is the only place the historical shapes are inspected.
pub(crate) fn raw_images_from_document(document: &Document) -> RawImages {
    match document.get("images") {
        None => RawImages::Missing,
        Some(Bson::Array(items)) => {
            RawImages::List(items.iter().map(image_entry_from_bson).collect())
        }
        Some(_) => RawImages::NotAnArray,
    }
}

fn image_entry_from_bson(value: &Bson) -> ImageEntry {
    match value {
        Bson::String(name) => ImageEntry::Name(name.clone()),
        Bson::Document(fields) => {
            let key = fields.get("key").and_then(Bson::as_str).map(str::to_string);
            let order = match fields.get("order") {
                Some(Bson::Int32(order)) => Some(i64::from(*order)),
                Some(Bson::Int64(order)) => Some(*order),
                _ => None,
            };
            ImageEntry::Legacy { key, order }
        }
        _ => ImageEntry::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use keepsake_core::types::MomentId;

    use super::*;

    fn ts() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap()
    }

    fn stored_document(images: Bson) -> Document {
        doc! {
            "_id": MomentId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap(),
            "title": "Trip",
            "text": "Morning walk",
            "date": BsonDateTime::from_chrono(ts()),
            "images": images,
            "visibility": "public",
            "tags": ["spring"],
            "createdAt": BsonDateTime::from_chrono(ts()),
            "updatedAt": BsonDateTime::from_chrono(ts()),
        }
    }

    #[test]
    fn serializes_flat_filename_list() {
        let document = stored_document(bson::bson!(["a.jpg", "b.png"]));
        let moment = Moment::from_document(&document).unwrap();

        assert_eq!(moment.id, "65a1b2c3d4e5f60718293a4b");
        assert_eq!(moment.images, vec!["a.jpg", "b.png"]);
        assert_eq!(moment.visibility, Visibility::Public);
        assert_eq!(moment.tags, vec!["spring"]);
    }

    #[test]
    fn serializes_legacy_objects_in_order() {
        let document = stored_document(bson::bson!([
            { "name": "cover", "key": "photos/a.jpg", "order": 1 },
            { "name": "first", "key": "photos/b.png", "order": 0 },
        ]));
        let moment = Moment::from_document(&document).unwrap();
        assert_eq!(moment.images, vec!["b.png", "a.jpg"]);
    }

    #[test]
    fn read_path_drops_bad_entries_instead_of_failing() {
        let document = stored_document(bson::bson!(["ok.jpg", 42, "bad/entry.jpg"]));
        let moment = Moment::from_document(&document).unwrap();
        assert_eq!(moment.images, vec!["ok.jpg"]);
    }

    #[test]
    fn non_array_images_serialize_empty() {
        let document = stored_document(Bson::String("oops".to_string()));
        let moment = Moment::from_document(&document).unwrap();
        assert!(moment.images.is_empty());
    }

    #[test]
    fn defaults_visibility_and_tags() {
        let mut document = stored_document(bson::bson!(["a.jpg"]));
        document.remove("visibility");
        document.remove("tags");
        document.remove("text");
        let moment = Moment::from_document(&document).unwrap();

        assert_eq!(moment.visibility, Visibility::Public);
        assert!(moment.tags.is_empty());
        assert_eq!(moment.text, None);
    }

    #[test]
    fn missing_system_field_is_an_error() {
        let mut document = stored_document(bson::bson!(["a.jpg"]));
        document.remove("createdAt");
        assert!(Moment::from_document(&document).is_err());
    }

    #[test]
    fn moment_serializes_with_wire_field_names() {
        let document = stored_document(bson::bson!(["a.jpg"]));
        let moment = Moment::from_document(&document).unwrap();
        let value = serde_json::to_value(&moment).unwrap();

        assert_eq!(value["_id"], "65a1b2c3d4e5f60718293a4b");
        assert!(value["createdAt"].is_string());
        assert!(value["updatedAt"].is_string());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn empty_patch_reports_empty() {
        assert!(MomentPatch::default().is_empty());
        let patch = MomentPatch {
            tags: Some(Vec::new()),
            ..MomentPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn patch_set_document_applies_explicit_null() {
        let patch = MomentPatch {
            title: Some(Some("New".to_string())),
            text: Some(None),
            ..MomentPatch::default()
        };
        let set = patch.to_set_document(ts());

        assert_eq!(set.get("title").and_then(Bson::as_str), Some("New"));
        assert_eq!(set.get("text"), Some(&Bson::Null));
        assert!(set.get("updatedAt").and_then(Bson::as_datetime).is_some());
        assert!(set.get("date").is_none());
    }

    #[test]
    fn legacy_entry_resolution_handles_all_shapes() {
        assert_eq!(
            image_entry_from_bson(&Bson::String("a.jpg".to_string())),
            ImageEntry::Name("a.jpg".to_string())
        );
        assert_eq!(
            image_entry_from_bson(&bson::bson!({ "key": "p/a.jpg", "order": 3 })),
            ImageEntry::Legacy {
                key: Some("p/a.jpg".to_string()),
                order: Some(3),
            }
        );
        assert_eq!(
            image_entry_from_bson(&bson::bson!({ "order": "high" })),
            ImageEntry::Legacy { key: None, order: None }
        );
        assert_eq!(image_entry_from_bson(&Bson::Int32(7)), ImageEntry::Unsupported);
    }
}
