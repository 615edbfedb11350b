//! One-shot normalization of legacy `images` shapes.

use bson::{Bson, DateTime as BsonDateTime, Document, doc};
use chrono::Utc;
use futures::TryStreamExt;
use keepsake_core::images::{NormalizeError, NormalizeMode, normalize_images};
use mongodb::Collection;

use crate::models::moment::{document_id, raw_images_from_document};

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// A record the strict normalizer refuses. Startup must abort so
    /// the record is fixed explicitly rather than silently dropped.
    #[error("moment '{id}' has invalid legacy images and cannot be migrated: {source}")]
    BadRecord {
        id: String,
        #[source]
        source: NormalizeError,
    },

    #[error(transparent)]
    Store(#[from] mongodb::error::Error),
}

/// Rewrite every moment whose `images` field is not already a flat
/// filename array. Runs before the service accepts requests.
///
/// Idempotent: a second pass over normalized data performs zero writes,
/// because a record is only rewritten when the normalized array differs
/// from what is stored. Returns the number of migrated records.
pub async fn migrate_legacy_images(
    collection: &Collection<Document>,
) -> Result<u64, MigrationError> {
    let mut migrated = 0u64;

    let mut cursor = collection.find(doc! {}).await?;
    while let Some(document) = cursor.try_next().await? {
        let id = document_id(&document)
            .map(|oid| oid.to_hex())
            .unwrap_or_default();

        let raw = raw_images_from_document(&document);
        let normalized = normalize_images(&raw, NormalizeMode::Strict, Some(&id))
            .map_err(|source| MigrationError::BadRecord {
                id: id.clone(),
                source,
            })?;

        if images_already_match(document.get("images"), &normalized) {
            continue;
        }

        let id_value = document.get("_id").cloned().unwrap_or(Bson::Null);
        collection
            .update_one(
                doc! { "_id": id_value },
                doc! { "$set": {
                    "images": normalized,
                    "updatedAt": BsonDateTime::from_chrono(Utc::now()),
                } },
            )
            .await?;
        migrated += 1;
    }

    if migrated > 0 {
        tracing::info!(migrated, "migrated moment documents to a flat images array");
    }

    Ok(migrated)
}

fn images_already_match(raw: Option<&Bson>, normalized: &[String]) -> bool {
    match raw {
        Some(Bson::Array(items)) => {
            items.len() == normalized.len()
                && items
                    .iter()
                    .zip(normalized)
                    .all(|(item, name)| item.as_str() == Some(name.as_str()))
        }
        _ => false,
    }
}
