//! Object resources of the GCS JSON API

use std::collections::BTreeMap;

use gst_core::{ObjectInfo, Page, Result};
use jiff::Timestamp;
use serde::Deserialize;

/// One `storage#object` as returned by `objects.get`, `objects.insert`
/// and inside `objects.list`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ObjectResource {
    name: String,
    /// Decimal string, as with every int64 in the JSON API
    size: Option<String>,
    updated: Option<Timestamp>,
    etag: Option<String>,
    generation: Option<String>,
    content_type: Option<String>,
    cache_control: Option<String>,
    content_encoding: Option<String>,
    content_disposition: Option<String>,
    content_language: Option<String>,
    metadata: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectsPage {
    #[serde(default)]
    items: Vec<ObjectResource>,
    next_page_token: Option<String>,
}

impl From<ObjectResource> for ObjectInfo {
    fn from(resource: ObjectResource) -> Self {
        let size = resource.size.as_deref().and_then(|s| s.parse::<u64>().ok());

        let mut info = ObjectInfo::new(resource.name, size.unwrap_or_default());
        if size.is_none() {
            info.size_bytes = None;
            info.size_human = None;
        }
        info.last_modified = resource.updated;
        info.etag = resource.etag;
        info.version = resource.generation;
        info.content_type = resource.content_type;

        let headers = [
            ("cache_control", resource.cache_control),
            ("content_encoding", resource.content_encoding),
            ("content_disposition", resource.content_disposition),
            ("content_language", resource.content_language),
        ];
        for (name, value) in headers {
            if let Some(value) = value {
                info.attributes.insert(name.to_string(), value);
            }
        }
        for (key, value) in resource.metadata.unwrap_or_default() {
            info.attributes.insert(format!("metadata.{key}"), value);
        }

        info
    }
}

/// Decode one `objects.list` response body
pub(crate) fn parse_objects_page(body: &[u8]) -> Result<Page<ObjectInfo>> {
    let page: ObjectsPage = serde_json::from_slice(body)?;
    Ok(Page::new(
        page.items.into_iter().map(ObjectInfo::from).collect(),
        page.next_page_token,
    ))
}
