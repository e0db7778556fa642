use super::StorageDisk;
use crate::config::S3Config;
use crate::{Error, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{config::Region, Client as S3Client};

/// Disk backed by an S3-compatible bucket.
pub struct S3Disk {
    client: S3Client,
    bucket: String,
    base_url: String,
}

impl S3Disk {
    pub fn new(client: S3Client, bucket: String, base_url: String) -> Self {
        Self {
            client,
            bucket,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a disk from config. Explicit credentials and endpoint are used
    /// when present; otherwise the default AWS provider chain applies.
    pub async fn from_config(config: &S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(access_key_id), Some(secret_access_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            let credentials = aws_sdk_s3::config::Credentials::new(
                access_key_id.clone(),
                secret_access_key.clone(),
                None,
                None,
                "gemini-nano-config",
            );
            loader = loader.credentials_provider(credentials);
        }

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }

        let sdk_config = loader.load().await;

        Self::new(
            S3Client::new(&sdk_config),
            config.bucket.clone(),
            config.base_url.clone(),
        )
    }
}

fn content_type_for(path: &str) -> &'static str {
    if path.ends_with(".png") {
        "image/png"
    } else {
        "application/octet-stream"
    }
}

#[async_trait]
impl StorageDisk for S3Disk {
    async fn put(&self, path: &str, data: &[u8]) -> Result<()> {
        let body = ByteStream::from(data.to_vec());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(body)
            .content_type(content_type_for(path))
            .send()
            .await
            .map_err(|e| Error::Storage(format!("Failed to upload {}: {}", path, e)))?;

        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(Error::Storage(format!("Failed to look up {}: {}", path, e))),
        }
    }
}
