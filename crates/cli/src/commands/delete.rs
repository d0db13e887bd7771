//! delete command - Remove objects
//!
//! Removes one or more objects from the bucket. There is no confirmation
//! prompt and no undo.

use clap::Args;
use gst_core::{ObjectKey, ObjectStore};
use serde::Serialize;

use super::Failure;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Delete objects
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Object key(s) to remove
    #[arg(required = true, value_name = "KEY")]
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DeleteOutput {
    status: &'static str,
    deleted: Vec<String>,
    failed: Vec<Failure>,
}

/// Execute the delete command
pub async fn execute(
    args: DeleteArgs,
    store: &dyn ObjectStore,
    formatter: &Formatter,
) -> ExitCode {
    let mut deleted = Vec::new();
    let mut failed = Vec::new();

    for key in args.keys {
        let result = match ObjectKey::new(key.as_str()) {
            Ok(object_key) => store.delete_object(&object_key).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                if !formatter.is_json() {
                    formatter.println(&format!("Removed: {key}"));
                }
                deleted.push(key);
            }
            Err(e) => {
                formatter.error(&format!("Unable to delete {key}: {e}"));
                failed.push(Failure {
                    key,
                    error: e.to_string(),
                });
            }
        }
    }

    if formatter.is_json() {
        formatter.json(&DeleteOutput {
            status: if failed.is_empty() { "success" } else { "partial" },
            deleted,
            failed,
        });
    }

    ExitCode::Success
}
