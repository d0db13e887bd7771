//! buckets command - List buckets of the project

use futures::StreamExt;
use gst_core::{BucketInfo, ObjectStore};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

#[derive(Debug, Serialize)]
struct BucketsOutput {
    items: Vec<BucketInfo>,
}

/// Execute the buckets command
pub async fn execute(store: &dyn ObjectStore, formatter: &Formatter) -> ExitCode {
    let mut buckets = store.list_buckets();
    let mut items = Vec::new();

    while let Some(item) = buckets.next().await {
        match item {
            Ok(bucket) if formatter.is_json() => items.push(bucket),
            Ok(bucket) => formatter.println(&bucket.name),
            Err(e) => {
                formatter.error(&format!("Failed to list buckets: {e}"));
                return ExitCode::from_error(&e);
            }
        }
    }

    if formatter.is_json() {
        formatter.json(&BucketsOutput { items });
    }

    ExitCode::Success
}
