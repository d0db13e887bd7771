//! Bucket catalog
//!
//! Lists the buckets of a project through the JSON API
//! (`GET /storage/v1/b?project=...`), one page request at a time.

use gst_core::{BucketInfo, BucketStream, Page, Result, paginate};
use reqwest::Method;
use serde::Deserialize;

use crate::api::{JsonApi, Surface};

/// Lists the buckets owned by one project
#[derive(Debug, Clone)]
pub struct BucketCatalog {
    api: JsonApi,
    project_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketsPage {
    #[serde(default)]
    items: Vec<BucketResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketResource {
    name: String,
    time_created: Option<jiff::Timestamp>,
    location: Option<String>,
    storage_class: Option<String>,
}

impl From<BucketResource> for BucketInfo {
    fn from(resource: BucketResource) -> Self {
        Self {
            name: resource.name,
            created: resource.time_created,
            location: resource.location,
            storage_class: resource.storage_class,
        }
    }
}

impl BucketCatalog {
    pub fn new(api: JsonApi, project_id: impl Into<String>) -> Self {
        Self {
            api,
            project_id: project_id.into(),
        }
    }

    /// Stream every bucket of the project
    pub fn list(&self) -> BucketStream {
        let catalog = self.clone();
        paginate(move |token| {
            let catalog = catalog.clone();
            async move { catalog.fetch_page(token).await }
        })
    }

    #[tracing::instrument(name = "gcs.list_buckets", skip(self), fields(project = %self.project_id))]
    async fn fetch_page(&self, token: Option<String>) -> Result<Page<BucketInfo>> {
        let url = self.api.url(Surface::Metadata, &["b"])?;
        let mut request = self
            .api
            .request(Method::GET, url)
            .query(&[("project", self.project_id.as_str())]);
        if let Some(token) = &token {
            request = request.query(&[("pageToken", token.as_str())]);
        }

        let page = parse_page(&self.api.send(request).await?)?;
        tracing::debug!(
            count = page.items.len(),
            more = page.next_token.is_some(),
            "fetched bucket page"
        );
        Ok(page)
    }
}

/// Decode one `buckets.list` response body
fn parse_page(body: &[u8]) -> Result<Page<BucketInfo>> {
    let page: BucketsPage = serde_json::from_slice(body)?;
    Ok(Page::new(
        page.items.into_iter().map(BucketInfo::from).collect(),
        page.next_page_token,
    ))
}
