//! list command - List objects in the bucket
//!
//! Prints every key in backend order, one per line, as pages arrive.

use futures::StreamExt;
use gst_core::{ObjectInfo, ObjectStore};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Output structure for list command (JSON format)
#[derive(Debug, Serialize)]
struct ListOutput {
    items: Vec<ObjectInfo>,
}

/// Execute the list command
pub async fn execute(store: &dyn ObjectStore, formatter: &Formatter) -> ExitCode {
    let mut objects = store.list_objects();
    let mut items = Vec::new();

    while let Some(item) = objects.next().await {
        match item {
            Ok(info) if formatter.is_json() => items.push(info),
            Ok(info) => formatter.println(&info.key),
            Err(e) => {
                formatter.error(&format!("Failed to list objects: {e}"));
                return ExitCode::from_error(&e);
            }
        }
    }

    if formatter.is_json() {
        formatter.json(&ListOutput { items });
    }

    ExitCode::Success
}
