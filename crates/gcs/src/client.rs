//! GCS client implementation
//!
//! Implements the ObjectStore trait from gst-core over the GCS JSON API.
//! Objects are addressed by their raw name: a key such as `/tmp/a.txt`,
//! `../notes.txt` or `a//b.txt` names exactly that object. `object_store`
//! is used only to turn the service account key into bearer tokens.

use std::sync::Arc;

use async_trait::async_trait;
use object_store::gcp::{GcpCredentialProvider, GoogleCloudStorageBuilder};
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;

use gst_core::{
    BucketStream, Config, Error, ObjectInfo, ObjectKey, ObjectStore, ObjectStream, Page, Result,
    paginate,
};

use crate::api::{JsonApi, Surface};
use crate::catalog::BucketCatalog;
use crate::resource::{ObjectResource, parse_objects_page};

/// Authenticated session bound to one bucket
pub struct GcsClient {
    api: JsonApi,
    bucket: String,
    project_id: String,
}

impl GcsClient {
    /// Build an authenticated client from the configuration
    ///
    /// Reads the service account key at `config.credentials_path`; a missing
    /// or malformed key file fails here, before any request is made.
    pub fn connect(config: &Config) -> Result<Self> {
        tracing::debug!(
            bucket = %config.bucket,
            project = %config.project_id,
            credentials = %config.credentials_path().display(),
            "creating GCS client"
        );

        let gcs = GoogleCloudStorageBuilder::new()
            .with_bucket_name(&config.bucket)
            .with_service_account_path(config.credentials_path().to_string_lossy())
            .build()
            .map_err(|e| Error::Auth(e.to_string()))?;

        let client = Self::with_credentials(Arc::clone(gcs.credentials()), config);
        match &config.endpoint {
            Some(endpoint) => client.with_endpoint(endpoint),
            None => Ok(client),
        }
    }

    /// Build a client around an existing credential provider
    pub fn with_credentials(credentials: GcpCredentialProvider, config: &Config) -> Self {
        Self {
            api: JsonApi::new(credentials),
            bucket: config.bucket.clone(),
            project_id: config.project_id.clone(),
        }
    }

    /// Talk to `endpoint` instead of Google, e.g. a storage emulator
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.api = self.api.with_endpoint(endpoint)?;
        tracing::debug!(endpoint = %self.api.endpoint(), "using storage endpoint");
        Ok(self)
    }

    fn object_url(&self, key: &ObjectKey) -> Result<reqwest::Url> {
        // GCS forbids these names, and a URL path cannot carry them as a segment
        if matches!(key.as_str(), "." | "..") {
            return Err(Error::InvalidKey(format!(
                "{key}: object names cannot be \".\" or \"..\""
            )));
        }
        self.api
            .url(Surface::Metadata, &["b", &self.bucket, "o", key.as_str()])
    }
}

/// Name the object in a NotFound error instead of echoing the API message
fn not_found_as(key: &ObjectKey) -> impl FnOnce(Error) -> Error + '_ {
    move |err| match err {
        Error::NotFound(_) => Error::NotFound(key.to_string()),
        e => e,
    }
}

#[tracing::instrument(name = "gcs.list_objects", skip(api))]
async fn fetch_objects(
    api: &JsonApi,
    bucket: &str,
    token: Option<String>,
) -> Result<Page<ObjectInfo>> {
    let url = api.url(Surface::Metadata, &["b", bucket, "o"])?;
    let mut request = api.request(Method::GET, url);
    if let Some(token) = &token {
        request = request.query(&[("pageToken", token.as_str())]);
    }

    let page = parse_objects_page(&api.send(request).await?)?;
    tracing::debug!(
        count = page.items.len(),
        more = page.next_token.is_some(),
        "fetched object page"
    );
    Ok(page)
}

#[async_trait]
impl ObjectStore for GcsClient {
    fn list_objects(&self) -> ObjectStream {
        let api = self.api.clone();
        let bucket = self.bucket.clone();
        paginate(move |token| {
            let api = api.clone();
            let bucket = bucket.clone();
            async move { fetch_objects(&api, &bucket, token).await }
        })
    }

    fn list_buckets(&self) -> BucketStream {
        BucketCatalog::new(self.api.clone(), &self.project_id).list()
    }

    #[tracing::instrument(name = "gcs.put_object", skip(self, data), fields(size = data.len()))]
    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        let url = self.api.url(Surface::Upload, &["b", &self.bucket, "o"])?;
        let mut request = self
            .api
            .request(Method::POST, url)
            .query(&[("uploadType", "media"), ("name", key.as_str())])
            .body(data);
        if let Some(content_type) = &content_type {
            request = request.header(CONTENT_TYPE, content_type.as_str());
        }

        let resource: ObjectResource = self.api.send_json(request).await?;
        Ok(resource.into())
    }

    #[tracing::instrument(name = "gcs.delete_object", skip(self))]
    async fn delete_object(&self, key: &ObjectKey) -> Result<()> {
        let url = self.object_url(key)?;
        self.api
            .send(self.api.request(Method::DELETE, url))
            .await
            .map_err(not_found_as(key))?;
        Ok(())
    }

    #[tracing::instrument(name = "gcs.head_object", skip(self))]
    async fn head_object(&self, key: &ObjectKey) -> Result<ObjectInfo> {
        let url = self.object_url(key)?;
        let resource: ObjectResource = self
            .api
            .send_json(self.api.request(Method::GET, url))
            .await
            .map_err(not_found_as(key))?;
        Ok(resource.into())
    }
}
