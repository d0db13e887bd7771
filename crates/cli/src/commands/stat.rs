//! stat command - Show object metadata
//!
//! Fetches the full attribute set of each key and prints it as a two-column
//! table, or as JSON.

use clap::Args;
use comfy_table::{Table, presets};
use gst_core::{ObjectInfo, ObjectKey, ObjectStore};
use serde::Serialize;

use super::Failure;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Show object metadata
#[derive(Args, Debug)]
pub struct StatArgs {
    /// Object key(s) to inspect
    #[arg(required = true, value_name = "KEY")]
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize)]
struct StatOutput {
    items: Vec<ObjectInfo>,
    failed: Vec<Failure>,
}

/// Execute the stat command
pub async fn execute(
    args: StatArgs,
    store: &dyn ObjectStore,
    formatter: &Formatter,
) -> ExitCode {
    let mut items = Vec::new();
    let mut failed = Vec::new();

    for key in args.keys {
        let result = match ObjectKey::new(key.as_str()) {
            Ok(object_key) => store.head_object(&object_key).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(info) if formatter.is_json() => items.push(info),
            Ok(info) => formatter.println(&render(&info).to_string()),
            Err(e) => {
                formatter.error(&format!("Unable to stat {key}: {e}"));
                failed.push(Failure {
                    key,
                    error: e.to_string(),
                });
            }
        }
    }

    if formatter.is_json() {
        formatter.json(&StatOutput { items, failed });
    }

    ExitCode::Success
}

fn render(info: &ObjectInfo) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.add_row(vec!["Name", info.key.as_str()]);

    if let (Some(bytes), Some(human)) = (info.size_bytes, &info.size_human) {
        table.add_row(vec!["Size".to_string(), format!("{human} ({bytes} bytes)")]);
    }
    if let Some(modified) = &info.last_modified {
        table.add_row(vec!["Updated".to_string(), modified.to_string()]);
    }

    let optional = [
        ("ETag", &info.etag),
        ("Version", &info.version),
        ("Type", &info.content_type),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            table.add_row(vec![label, value.as_str()]);
        }
    }

    for (name, value) in &info.attributes {
        table.add_row(vec![name.as_str(), value.as_str()]);
    }
    table
}
