//! GCS JSON API transport
//!
//! Every request is authorized with a bearer token from the service account
//! credential provider. Object names travel percent-encoded, either as a single
//! path segment or as the `name` query parameter of an upload, so a key
//! reaches the bucket exactly as given.

use gst_core::{Error, Result};
use object_store::gcp::GcpCredentialProvider;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Public Google Cloud Storage endpoint
pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

/// Which half of the API a request targets
#[derive(Debug, Clone, Copy)]
pub(crate) enum Surface {
    /// `/storage/v1`: metadata, listing, delete
    Metadata,
    /// `/upload/storage/v1`: object data
    Upload,
}

/// Authorized HTTP access to one GCS endpoint
#[derive(Debug, Clone)]
pub struct JsonApi {
    http: reqwest::Client,
    credentials: GcpCredentialProvider,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl JsonApi {
    pub fn new(credentials: GcpCredentialProvider) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Send requests to `endpoint` instead of Google
    ///
    /// A bare `host:port` means plain HTTP, the way the Google client
    /// libraries read `STORAGE_EMULATOR_HOST`.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        let endpoint = if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            format!("http://{endpoint}")
        };
        let endpoint = endpoint.trim_end_matches('/').to_string();

        Url::parse(&endpoint)
            .map_err(|e| Error::Config(format!("Invalid storage endpoint {endpoint:?}: {e}")))?;
        self.endpoint = endpoint;
        Ok(self)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build a URL under `surface`, percent-encoding each segment whole
    pub(crate) fn url(&self, surface: Surface, segments: &[&str]) -> Result<Url> {
        let root = match surface {
            Surface::Metadata => "storage/v1",
            Surface::Upload => "upload/storage/v1",
        };
        let mut url = Url::parse(&format!("{}/{root}", self.endpoint))
            .map_err(|e| Error::Config(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("{} cannot carry a path", self.endpoint)))?
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Authorize and send `request`; any non-2xx reply becomes an error
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let credential = self
            .credentials
            .get_credential()
            .await
            .map_err(from_object_store)?;

        let response = request
            .bearer_auth(&credential.bearer)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status, &String::from_utf8_lossy(&body)));
        }
        Ok(body.to_vec())
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Classify a non-success response
///
/// GCS error bodies carry `{"error": {"message": ...}}`; anything else is
/// reported as-is.
pub(crate) fn status_error(status: StatusCode, body: &str) -> Error {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let message = if detail.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {detail}")
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Auth(message),
        StatusCode::NOT_FOUND => Error::NotFound(message),
        _ => Error::Network(message),
    }
}

/// Convert an [`object_store::Error`] from the credential provider
pub(crate) fn from_object_store(err: object_store::Error) -> Error {
    match err {
        object_store::Error::NotFound { path, .. } => Error::NotFound(path),
        e @ (object_store::Error::PermissionDenied { .. }
        | object_store::Error::Unauthenticated { .. }) => Error::Auth(e.to_string()),
        e => Error::Network(e.to_string()),
    }
}
