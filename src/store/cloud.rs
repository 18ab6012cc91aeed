//! Cloud object storage access (S3, GCS, Azure, local)

use crate::decode::ByteStream;
use crate::error::{Error, Result};
use bytes::Bytes;
use futures::StreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::sync::Arc;
use tracing::info;

/// A bucket (or container, or directory) the pipeline reads from and
/// optionally writes back to
///
/// Thin handle over an [`ObjectStore`]: opens objects as chunked byte
/// streams for the decoder and accepts byte buffers for write-back.
#[derive(Debug, Clone)]
pub struct ObjectStage {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: String,
    /// Original URL scheme for logging
    scheme: String,
}

impl ObjectStage {
    /// Parse a source URL and create the appropriate object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/` or `./path/` - Local filesystem
    ///
    /// Credentials come from the environment, resolved by the builders at
    /// construction; the pipeline itself never reads environment state.
    pub fn parse(url: &str) -> Result<Self> {
        if url.starts_with("s3://") {
            Self::parse_s3(url)
        } else if url.starts_with("gs://") {
            Self::parse_gcs(url)
        } else if url.starts_with("az://") {
            Self::parse_azure(url)
        } else {
            Self::parse_local(url)
        }
    }

    /// Wrap an existing store (in-memory in tests)
    pub fn with_store(store: Arc<dyn ObjectStore>, scheme: impl Into<String>) -> Self {
        Self {
            store,
            prefix: String::new(),
            scheme: scheme.into(),
        }
    }

    /// Parse S3 URL
    fn parse_s3(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("s3://")
            .ok_or_else(|| Error::config(format!("Invalid s3 URL: {url}")))?;
        let (bucket, prefix) = split_bucket(without_scheme);

        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create s3 client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "s3".to_string(),
        })
    }

    /// Parse GCS URL
    fn parse_gcs(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("gs://")
            .ok_or_else(|| Error::config(format!("Invalid GCS URL: {url}")))?;
        let (bucket, prefix) = split_bucket(without_scheme);

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "gs".to_string(),
        })
    }

    /// Parse Azure Blob URL
    fn parse_azure(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("az://")
            .ok_or_else(|| Error::config(format!("Invalid Azure URL: {url}")))?;
        let (container, prefix) = split_bucket(without_scheme);

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "az".to_string(),
        })
    }

    /// Parse local filesystem path
    fn parse_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
        })
    }

    /// Get the scheme (s3, gs, az, file, or whatever tests pass in)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    fn object_path(&self, key: &str) -> ObjectPath {
        if self.prefix.is_empty() {
            ObjectPath::from(key)
        } else {
            ObjectPath::from(format!("{}/{key}", self.prefix.trim_end_matches('/')))
        }
    }

    /// Open an object as a chunked byte stream
    ///
    /// The stream owns its connection; dropping it releases the read on
    /// every exit path. Open and read failures map to `Error::Transport`.
    pub async fn open(&self, key: &str) -> Result<ByteStream> {
        let path = self.object_path(key);
        let scheme = self.scheme.clone();
        info!("Opening {scheme}://{path} for streaming read");

        let result = self.store.get(&path).await.map_err(|e| {
            Error::transport(format!("failed to open {scheme}://{path}: {e}"))
        })?;

        let stream = result
            .into_stream()
            .map(move |chunk| {
                chunk.map_err(|e| Error::transport(format!("read of {scheme} object failed: {e}")))
            })
            .boxed();
        Ok(stream)
    }

    /// Write bytes to an object in the stage
    pub async fn write(&self, key: &str, data: Bytes) -> Result<String> {
        let path = self.object_path(key);

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::transport(format!("failed to write {path}: {e}")))?;

        let full_path = format!("{}://{path}", self.scheme);
        info!("Wrote {full_path}");
        Ok(full_path)
    }
}

/// Split `bucket/prefix` into its two halves
fn split_bucket(without_scheme: &str) -> (&str, String) {
    match without_scheme.find('/') {
        Some(idx) => (
            &without_scheme[..idx],
            without_scheme[idx + 1..].trim_end_matches('/').to_string(),
        ),
        None => (without_scheme, String::new()),
    }
}
