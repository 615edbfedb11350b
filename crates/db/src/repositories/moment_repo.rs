//! Repository for the `moments` collection.

use bson::{Document, doc};
use futures::TryStreamExt;
use keepsake_core::cursor::SortOrder;
use keepsake_core::types::{MomentId, Timestamp};
use mongodb::Collection;
use mongodb::options::ReturnDocument;

use crate::models::moment::{MomentPatch, NewMoment};
use crate::query::sort_document;

/// Provides the document-store operations the moments handlers need.
/// Returns raw documents; serialization happens in the model layer.
pub struct MomentRepo;

impl MomentRepo {
    /// Insert a new moment with a generated id and system timestamps,
    /// returning the id.
    pub async fn create(
        collection: &Collection<Document>,
        input: &NewMoment,
        now: Timestamp,
    ) -> Result<MomentId, mongodb::error::Error> {
        let id = MomentId::new();
        let mut document = input.to_document(now);
        document.insert("_id", id);
        collection.insert_one(document).await?;
        Ok(id)
    }

    pub async fn find_by_id(
        collection: &Collection<Document>,
        id: MomentId,
    ) -> Result<Option<Document>, mongodb::error::Error> {
        collection.find_one(doc! { "_id": id }).await
    }

    /// Fetch up to `limit` documents matching `filter` in `sort` order.
    /// Callers pass `page size + 1` to detect whether more pages exist.
    pub async fn list(
        collection: &Collection<Document>,
        filter: Document,
        sort: Document,
        limit: i64,
    ) -> Result<Vec<Document>, mongodb::error::Error> {
        collection
            .find(filter)
            .sort(sort)
            .limit(limit)
            .await?
            .try_collect()
            .await
    }

    /// Apply a partial update, returning the post-update document, or
    /// `None` when no moment matches.
    pub async fn update(
        collection: &Collection<Document>,
        id: MomentId,
        patch: &MomentPatch,
        now: Timestamp,
    ) -> Result<Option<Document>, mongodb::error::Error> {
        collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": patch.to_set_document(now) },
            )
            .return_document(ReturnDocument::After)
            .await
    }

    /// Delete one moment; `true` when something was removed.
    pub async fn delete(
        collection: &Collection<Document>,
        id: MomentId,
    ) -> Result<bool, mongodb::error::Error> {
        let result = collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    /// One uniformly random document, or `None` on an empty collection.
    pub async fn sample_one(
        collection: &Collection<Document>,
    ) -> Result<Option<Document>, mongodb::error::Error> {
        let mut cursor = collection
            .aggregate(vec![doc! { "$sample": { "size": 1 } }])
            .await?;
        cursor.try_next().await
    }

    /// The newest document by the `(date, _id)` order.
    pub async fn latest_one(
        collection: &Collection<Document>,
    ) -> Result<Option<Document>, mongodb::error::Error> {
        let mut cursor = collection
            .find(doc! {})
            .sort(sort_document(SortOrder::Desc))
            .limit(1)
            .await?;
        cursor.try_next().await
    }
}
