//! Bucket listing and object fetching over the AWS S3 SDK.

use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

use crate::config::ObjectStoreConfig;

/// Failures surfaced to handlers. Backend error detail stays in the
/// logs.
#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("object '{0}' not found")]
    NotFound(String),

    #[error("Image storage is unavailable")]
    Unavailable,
}

/// A fetched object: bytes plus presentation metadata.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

/// Client for one S3-compatible bucket (MinIO in local deployments).
#[derive(Debug, Clone)]
pub struct ObjectStore {
    client: Client,
    bucket: String,
}

impl ObjectStore {
    pub fn new(config: &ObjectStoreConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "keepsake-env",
        );
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(config.endpoint.clone())
            .credentials_provider(credentials)
            .force_path_style(config.force_path_style)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// List every key in the bucket, following continuation tokens
    /// (1000 keys per page).
    pub async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>, ObjectStoreError> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .max_keys(1000)
                .set_prefix(prefix.map(str::to_string))
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|err| {
                    tracing::error!(error = ?err, bucket = %self.bucket, "failed to list objects");
                    ObjectStoreError::Unavailable
                })?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );

            if !response.is_truncated().unwrap_or(false) {
                break;
            }
            match response.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        Ok(keys)
    }

    /// Fetch one object. A missing key maps to [`ObjectStoreError::NotFound`],
    /// everything else to [`ObjectStoreError::Unavailable`].
    pub async fn fetch(&self, key: &str) -> Result<StoredObject, ObjectStoreError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let service_error = err.into_service_error();
                if service_error.is_no_such_key() {
                    return ObjectStoreError::NotFound(key.to_string());
                }
                tracing::error!(
                    error = ?service_error,
                    bucket = %self.bucket,
                    key,
                    "failed to fetch object"
                );
                ObjectStoreError::Unavailable
            })?;

        let header_content_type = response
            .content_type()
            .map(str::to_string)
            .filter(|value| !value.is_empty());

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, bucket = %self.bucket, key, "failed to read object body");
                ObjectStoreError::Unavailable
            })?
            .into_bytes()
            .to_vec();

        let filename = key
            .rsplit('/')
            .next()
            .unwrap_or(key)
            .replace('\\', "_")
            .replace('"', "");
        let content_type = header_content_type.unwrap_or_else(|| {
            mime_guess::from_path(&filename)
                .first_or_octet_stream()
                .to_string()
        });

        Ok(StoredObject {
            bytes,
            content_type,
            filename,
        })
    }
}
