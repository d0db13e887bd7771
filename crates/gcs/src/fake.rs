//! In-process stand-in for the GCS JSON API
//!
//! Serves the endpoints the adapter calls on a random local port, keeps
//! objects in memory under their exact names and records every request.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use object_store::StaticCredentialProvider;
use object_store::gcp::{GcpCredential, GcpCredentialProvider};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const BUCKET: &str = "assets-bucket";
pub const TOKEN: &str = "test-token";

/// Credential provider that always hands out `token`
pub fn credentials(token: &str) -> GcpCredentialProvider {
    Arc::new(StaticCredentialProvider::new(GcpCredential {
        bearer: token.to_string(),
    }))
}

struct Stored {
    data: Vec<u8>,
    content_type: Option<String>,
    generation: u64,
}

#[derive(Default)]
struct Inner {
    objects: BTreeMap<String, Stored>,
    buckets: Vec<String>,
    requests: Vec<String>,
    generation: u64,
}

#[derive(Clone)]
pub struct FakeGcs {
    inner: Arc<Mutex<Inner>>,
    page_size: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    page_token: Option<String>,
    project: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertParams {
    name: String,
    upload_type: String,
}

impl FakeGcs {
    pub fn new() -> Self {
        Self {
            inner: Arc::default(),
            page_size: 1000,
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_object(self, name: &str, data: &[u8]) -> Self {
        self.lock().store(name, data.to_vec(), None);
        self
    }

    pub fn with_buckets(self, names: &[&str]) -> Self {
        self.lock().buckets = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Data stored under exactly `name`
    pub fn content(&self, name: &str) -> Option<Vec<u8>> {
        self.lock().objects.get(name).map(|o| o.data.clone())
    }

    pub fn content_type(&self, name: &str) -> Option<String> {
        self.lock()
            .objects
            .get(name)
            .and_then(|o| o.content_type.clone())
    }

    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    /// Serve on an ephemeral port and return the endpoint URL
    pub async fn start(&self) -> String {
        let app = Router::new()
            .route("/storage/v1/b", get(list_buckets))
            .route("/storage/v1/b/{bucket}/o", get(list_objects))
            .route(
                "/storage/v1/b/{bucket}/o/{name}",
                get(get_object).delete(delete_object),
            )
            .route("/upload/storage/v1/b/{bucket}/o", post(insert_object))
            .with_state(self.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}")
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    /// Start index and follow-up token for one page over `len` items
    fn window(&self, len: usize, token: Option<&str>) -> (usize, usize, Option<String>) {
        let start = token.and_then(|t| t.parse().ok()).unwrap_or(0).min(len);
        let end = (start + self.page_size).min(len);
        let next = (end < len).then(|| end.to_string());
        (start, end, next)
    }
}

impl Inner {
    fn store(&mut self, name: &str, data: Vec<u8>, content_type: Option<String>) -> Value {
        self.generation += 1;
        let stored = Stored {
            data,
            content_type,
            generation: self.generation,
        };
        let value = resource(name, &stored);
        self.objects.insert(name.to_string(), stored);
        value
    }
}

fn resource(name: &str, stored: &Stored) -> Value {
    let mut value = json!({
        "kind": "storage#object",
        "name": name,
        "bucket": BUCKET,
        "size": stored.data.len().to_string(),
        "generation": stored.generation.to_string(),
        "etag": format!("CJjn1bXqsfoCE{}=", stored.generation),
        "updated": "2024-05-01T12:00:00.000Z",
    });
    if let Some(content_type) = &stored.content_type {
        value["contentType"] = json!(content_type);
    }
    value
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn error(status: StatusCode, message: &str) -> Response {
    let body = json!({ "error": { "code": status.as_u16(), "message": message } });
    (status, Json(body)).into_response()
}

fn reject(headers: &HeaderMap, bucket: &str) -> Option<Response> {
    if !authorized(headers) {
        return Some(error(StatusCode::UNAUTHORIZED, "Invalid Credentials"));
    }
    if bucket != BUCKET {
        return Some(error(
            StatusCode::NOT_FOUND,
            "The specified bucket does not exist.",
        ));
    }
    None
}

async fn list_buckets(
    State(fake): State<FakeGcs>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Invalid Credentials");
    }
    let Some(project) = params.project else {
        return error(StatusCode::BAD_REQUEST, "Required parameter: project");
    };

    let mut inner = fake.lock();
    inner.requests.push(format!("list buckets project={project}"));

    let (start, end, next) = fake.window(inner.buckets.len(), params.page_token.as_deref());
    let items: Vec<Value> = inner.buckets[start..end]
        .iter()
        .map(|name| json!({ "kind": "storage#bucket", "name": name, "location": "EU" }))
        .collect();

    let mut body = json!({ "kind": "storage#buckets" });
    if !items.is_empty() {
        body["items"] = json!(items);
    }
    if let Some(next) = next {
        body["nextPageToken"] = json!(next);
    }
    Json(body).into_response()
}

async fn list_objects(
    State(fake): State<FakeGcs>,
    Path(bucket): Path<String>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Response {
    if let Some(rejection) = reject(&headers, &bucket) {
        return rejection;
    }

    let mut inner = fake.lock();
    inner.requests.push("list objects".to_string());

    let (start, end, next) = fake.window(inner.objects.len(), params.page_token.as_deref());
    let items: Vec<Value> = inner
        .objects
        .iter()
        .skip(start)
        .take(end - start)
        .map(|(name, stored)| resource(name, stored))
        .collect();

    let mut body = json!({ "kind": "storage#objects" });
    if !items.is_empty() {
        body["items"] = json!(items);
    }
    if let Some(next) = next {
        body["nextPageToken"] = json!(next);
    }
    Json(body).into_response()
}

async fn get_object(
    State(fake): State<FakeGcs>,
    Path((bucket, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Some(rejection) = reject(&headers, &bucket) {
        return rejection;
    }

    let mut inner = fake.lock();
    inner.requests.push(format!("get {name}"));
    match inner.objects.get(&name) {
        Some(stored) => Json(resource(&name, stored)).into_response(),
        None => error(
            StatusCode::NOT_FOUND,
            &format!("No such object: {BUCKET}/{name}"),
        ),
    }
}

async fn delete_object(
    State(fake): State<FakeGcs>,
    Path((bucket, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Some(rejection) = reject(&headers, &bucket) {
        return rejection;
    }

    let mut inner = fake.lock();
    inner.requests.push(format!("delete {name}"));
    match inner.objects.remove(&name) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => error(
            StatusCode::NOT_FOUND,
            &format!("No such object: {BUCKET}/{name}"),
        ),
    }
}

async fn insert_object(
    State(fake): State<FakeGcs>,
    Path(bucket): Path<String>,
    Query(params): Query<InsertParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(rejection) = reject(&headers, &bucket) {
        return rejection;
    }
    if params.upload_type != "media" {
        return error(StatusCode::BAD_REQUEST, "Unsupported uploadType");
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut inner = fake.lock();
    inner.requests.push(format!("insert {}", params.name));
    let value = inner.store(&params.name, body.to_vec(), content_type);
    Json(value).into_response()
}
