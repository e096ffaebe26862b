//! Object-storage uploader
//!
//! Uploads named local artifacts to a bucket under their base filename,
//! authenticating with role credentials from the resolved secrets. Faults
//! are normalized; credential material never appears in errors or logs.

use std::path::Path;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::error::{CloudStorageError, ConfigError};
use crate::secrets::{SecretName, Secrets};

/// Object-storage client with injected credentials.
pub struct CloudUploader {
    client: Client,
}

impl CloudUploader {
    /// Build an uploader for the given region using access-key credentials
    /// from the resolved secrets.
    pub fn new(secrets: &Secrets, region: &str) -> Result<Self, ConfigError> {
        let credentials = Credentials::from_keys(
            secrets.get(SecretName::CloudAccessKey)?.expose(),
            secrets.get(SecretName::CloudSecretKey)?.expose(),
            None,
        );

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .build();

        Ok(Self {
            client: Client::from_conf(config),
        })
    }

    /// Upload a local file to `bucket` under its base filename.
    ///
    /// # Errors
    ///
    /// [`CloudStorageError::InvalidPath`] when the path has no usable base
    /// filename (no upload is attempted); [`CloudStorageError::Upload`] for
    /// any read or transfer fault.
    pub async fn upload(&self, local_path: &Path, bucket: &str) -> Result<(), CloudStorageError> {
        let key = local_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| CloudStorageError::InvalidPath(local_path.display().to_string()))?;

        let body = ByteStream::from_path(local_path).await.map_err(|e| {
            tracing::error!(error = %e, "failed to read upload artifact");
            CloudStorageError::Upload("could not read local artifact".to_string())
        })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                // Service errors carry codes like NoSuchBucket but never
                // credential material.
                let kind = e
                    .as_service_error()
                    .and_then(|se| aws_sdk_s3::error::ProvideErrorMetadata::code(se))
                    .unwrap_or("request dispatch failed");
                tracing::error!(error = kind, bucket, "object upload failed");
                CloudStorageError::Upload(kind.to_string())
            })?;

        tracing::info!(bucket, key, "file uploaded");
        Ok(())
    }
}
