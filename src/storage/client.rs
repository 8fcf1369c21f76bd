use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::error::AppError;

/// Trait for blob storage operations (S3-compatible).
///
/// Abstracted as a trait so tests and demo mode can run without a real S3
/// instance.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Upload content to the given key.
    async fn put_object(&self, key: &str, content: Vec<u8>) -> Result<(), AppError>;

    /// Retrieve content by key. Returns `None` if the object doesn't exist.
    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;
}

/// S3 implementation of StorageClient.
pub struct S3StorageClient {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3StorageClient {
    /// Create a new S3 storage client from the application configuration.
    ///
    /// Credentials and region come from the usual AWS environment.
    pub async fn from_config(config: &AppConfig) -> Self {
        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        // Support custom S3 endpoint (for MinIO, LocalStack, etc.)
        if let Some(endpoint) = &config.s3_endpoint {
            config_loader = config_loader.endpoint_url(endpoint);
        }

        let sdk_config = config_loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.s3_endpoint.is_some())
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.s3_bucket.clone(),
        }
    }

    /// Create with explicit values (useful for testing / DI).
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl StorageClient for S3StorageClient {
    async fn put_object(&self, key: &str, content: Vec<u8>) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(content.into())
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to put object '{}': {}", key, e)))?;

        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| AppError::Storage(format!("Failed to read body: {}", e)))?;
                Ok(Some(bytes.into_bytes().to_vec()))
            }
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    Ok(None)
                } else {
                    Err(AppError::Storage(format!(
                        "Failed to get object '{}': {}",
                        key, service_err
                    )))
                }
            }
        }
    }
}

/// Blob storage kept in process memory, for demo mode and tests.
#[derive(Default)]
pub struct MemoryStorageClient {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorageClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageClient for MemoryStorageClient {
    async fn put_object(&self, key: &str, content: Vec<u8>) -> Result<(), AppError> {
        self.objects
            .lock()
            .map_err(|_| AppError::Storage("Storage lock poisoned".into()))?
            .insert(key.to_string(), content);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self
            .objects
            .lock()
            .map_err(|_| AppError::Storage("Storage lock poisoned".into()))?
            .get(key)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_roundtrip() {
        let storage = MemoryStorageClient::new();
        storage
            .put_object("images/1_a.png", vec![1, 2, 3])
            .await
            .unwrap();

        assert_eq!(
            storage.get_object("images/1_a.png").await.unwrap(),
            Some(vec![1, 2, 3])
        );
        assert_eq!(storage.get_object("images/missing.png").await.unwrap(), None);
    }
}
