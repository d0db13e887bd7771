//! ObjectStore trait definition
//!
//! This trait defines the storage operations gstasher needs against a single
//! bucket. It allows the CLI to be decoupled from the GCS client library.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::stream::BoxStream;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::key::ObjectKey;

/// Lazy, non-restartable sequence of objects
///
/// `None` marks the end of the listing; an `Err` item is a fetch failure.
pub type ObjectStream = BoxStream<'static, Result<ObjectInfo>>;

/// Lazy, non-restartable sequence of buckets
pub type BucketStream = BoxStream<'static, Result<BucketInfo>>;

/// Metadata for an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,

    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,

    /// Human-readable size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,

    /// ETag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Object generation or version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Content type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Remaining attributes (cache control, content encoding, user metadata)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for an object of `size` bytes
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size_bytes: Some(size),
            size_human: Some(humansize::format_size(size, humansize::BINARY)),
            last_modified: None,
            etag: None,
            version: None,
            content_type: None,
            attributes: BTreeMap::new(),
        }
    }
}

/// Metadata for a bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketInfo {
    /// Bucket name
    pub name: String,

    /// Creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,

    /// Location (region or multi-region)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Default storage class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl BucketInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created: None,
            location: None,
            storage_class: None,
        }
    }
}

/// Storage operations against the configured bucket
///
/// Implemented by the GCS adapter and faked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stream every object in the bucket, in backend order
    fn list_objects(&self) -> ObjectStream;

    /// Stream every bucket visible to the project
    fn list_buckets(&self) -> BucketStream;

    /// Write `data` under `key`, replacing any existing object
    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo>;

    /// Delete the object at `key`
    async fn delete_object(&self, key: &ObjectKey) -> Result<()>;

    /// Fetch the full attribute set of the object at `key`
    async fn head_object(&self, key: &ObjectKey) -> Result<ObjectInfo>;
}
