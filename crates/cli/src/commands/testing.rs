//! In-memory store for command tests
//!
//! Records every backend call so tests can check which calls a command made
//! and in what order.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gst_core::{
    BucketInfo, BucketStream, Error, ObjectInfo, ObjectKey, ObjectStore, ObjectStream, Page,
    Result, paginate,
};

use crate::output::{Formatter, OutputConfig};

/// Capturing formatter without colors or progress
pub fn formatter() -> Formatter {
    Formatter::capture(OutputConfig {
        no_color: true,
        no_progress: true,
        ..Default::default()
    })
}

pub fn json_formatter() -> Formatter {
    Formatter::capture(OutputConfig {
        json: true,
        no_progress: true,
        ..Default::default()
    })
}

#[derive(Default)]
pub struct FakeStore {
    /// Objects in insertion order; a put on an existing key replaces it in place
    objects: Mutex<Vec<(String, Vec<u8>, Option<String>)>>,
    /// Listing served page by page; falls back to `objects` when unset
    pages: Option<Vec<Vec<String>>>,
    failing_page: Option<usize>,
    buckets: Vec<Vec<String>>,
    failing_bucket_page: Option<usize>,
    failing_keys: HashSet<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(mut self, pages: Vec<Vec<&str>>) -> Self {
        self.pages = Some(owned(pages));
        self
    }

    pub fn failing_page(mut self, index: usize) -> Self {
        self.failing_page = Some(index);
        self
    }

    pub fn with_buckets(mut self, pages: Vec<Vec<&str>>) -> Self {
        self.buckets = owned(pages);
        self
    }

    pub fn failing_bucket_page(mut self, index: usize) -> Self {
        self.failing_bucket_page = Some(index);
        self
    }

    /// Make every write or delete of `key` fail
    pub fn failing_key(mut self, key: impl Into<String>) -> Self {
        self.failing_keys.insert(key.into());
        self
    }

    pub fn with_object(self, key: &str, data: &[u8], content_type: Option<&str>) -> Self {
        self.objects.lock().unwrap().push((
            key.to_string(),
            data.to_vec(),
            content_type.map(str::to_string),
        ));
        self
    }

    /// Backend calls made so far, e.g. `put a.txt` or `list page 1`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn content(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _, _)| k == key)
            .map(|(_, data, _)| data.clone())
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn owned(pages: Vec<Vec<&str>>) -> Vec<Vec<String>> {
    pages
        .into_iter()
        .map(|page| page.into_iter().map(str::to_string).collect())
        .collect()
}

/// Serve `pages` through the real page cursor, logging each fetch
fn serve_pages<T, F>(
    kind: &'static str,
    pages: Vec<Vec<String>>,
    failing: Option<usize>,
    calls: Arc<Mutex<Vec<String>>>,
    item: F,
) -> futures::stream::BoxStream<'static, Result<T>>
where
    T: Send + 'static,
    F: Fn(&str) -> T + Send + Sync + Copy + 'static,
{
    let pages = Arc::new(pages);
    paginate(move |token: Option<String>| {
        let pages = Arc::clone(&pages);
        let calls = Arc::clone(&calls);
        async move {
            let index: usize = token.and_then(|t| t.parse().ok()).unwrap_or(0);
            calls.lock().unwrap().push(format!("{kind} page {index}"));

            if failing == Some(index) {
                return Err(Error::Network(format!("{kind} page {index} failed")));
            }

            let items = pages
                .get(index)
                .map(|page| page.iter().map(|name| item(name.as_str())).collect())
                .unwrap_or_default();
            let next = (index + 1 < pages.len()).then(|| (index + 1).to_string());
            Ok(Page::new(items, next))
        }
    })
}

#[async_trait]
impl ObjectStore for FakeStore {
    fn list_objects(&self) -> ObjectStream {
        let pages = match &self.pages {
            Some(pages) => pages.clone(),
            None => vec![
                self.objects
                    .lock()
                    .unwrap()
                    .iter()
                    .map(|(k, _, _)| k.clone())
                    .collect(),
            ],
        };
        serve_pages("list", pages, self.failing_page, self.calls.clone(), |key| {
            ObjectInfo::new(key, 0)
        })
    }

    fn list_buckets(&self) -> BucketStream {
        serve_pages(
            "buckets",
            self.buckets.clone(),
            self.failing_bucket_page,
            self.calls.clone(),
            |name| BucketInfo::new(name),
        )
    }

    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        self.record(format!("put {key}"));
        if self.failing_keys.contains(key.as_str()) {
            return Err(Error::Network("connection reset by peer".to_string()));
        }

        let mut info = ObjectInfo::new(key.as_str(), data.len() as u64);
        info.content_type = content_type.clone();

        let mut objects = self.objects.lock().unwrap();
        match objects.iter_mut().find(|(k, _, _)| k == key.as_str()) {
            Some(existing) => {
                existing.1 = data;
                existing.2 = content_type;
            }
            None => objects.push((key.to_string(), data, content_type)),
        }

        Ok(info)
    }

    async fn delete_object(&self, key: &ObjectKey) -> Result<()> {
        self.record(format!("delete {key}"));
        if self.failing_keys.contains(key.as_str()) {
            return Err(Error::Auth("permission denied".to_string()));
        }

        let mut objects = self.objects.lock().unwrap();
        let before = objects.len();
        objects.retain(|(k, _, _)| k != key.as_str());
        if objects.len() == before {
            return Err(Error::NotFound(key.to_string()));
        }
        Ok(())
    }

    async fn head_object(&self, key: &ObjectKey) -> Result<ObjectInfo> {
        self.record(format!("head {key}"));
        let objects = self.objects.lock().unwrap();
        let (k, data, content_type) = objects
            .iter()
            .find(|(k, _, _)| k == key.as_str())
            .ok_or_else(|| Error::NotFound(key.to_string()))?;

        let mut info = ObjectInfo::new(k.as_str(), data.len() as u64);
        info.content_type = content_type.clone();
        info.etag = Some("CJjn1bXqsfoCEAE=".to_string());
        info.attributes
            .insert("cache_control".to_string(), "no-cache".to_string());
        Ok(info)
    }
}
