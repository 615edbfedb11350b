//! MongoDB access layer for the moments service.
//!
//! Connection bootstrap and index creation live here; document shapes
//! in [`models`], collection operations in [`repositories`], filter
//! composition in [`query`], and the startup legacy-images pass in
//! [`migrations`].

pub mod migrations;
pub mod models;
pub mod query;
pub mod repositories;

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};

/// Collection holding moment documents.
pub const MOMENTS_COLLECTION: &str = "moments";

/// Connect to MongoDB and select the service database.
///
/// The driver connects lazily; reachability is verified separately by
/// [`health_check`] so startup can fail with a useful error.
pub async fn connect(uri: &str, db_name: &str) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(uri).await?;
    Ok(client.database(db_name))
}

/// Handle to the moments collection, untyped because stored documents
/// may still carry legacy field shapes.
pub fn moments_collection(db: &Database) -> Collection<Document> {
    db.collection::<Document>(MOMENTS_COLLECTION)
}

/// Ping the deployment.
pub async fn health_check(db: &Database) -> Result<(), mongodb::error::Error> {
    db.run_command(doc! { "ping": 1 }).await?;
    Ok(())
}

/// Create the listing indexes: `date` descending for the default
/// ordering, `(visibility, date)` for filtered listings.
pub async fn ensure_indexes(
    collection: &Collection<Document>,
) -> Result<(), mongodb::error::Error> {
    let date_desc = IndexModel::builder()
        .keys(doc! { "date": -1 })
        .options(IndexOptions::builder().name("date_desc".to_string()).build())
        .build();
    collection.create_index(date_desc).await?;

    let visibility_date_desc = IndexModel::builder()
        .keys(doc! { "visibility": 1, "date": -1 })
        .options(
            IndexOptions::builder()
                .name("visibility_date_desc".to_string())
                .build(),
        )
        .build();
    collection.create_index(visibility_date_desc).await?;

    Ok(())
}
