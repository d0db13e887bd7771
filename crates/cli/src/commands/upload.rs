//! upload command - Upload local files
//!
//! Each file is read whole and stored under a key equal to the path as given
//! on the command line. Existing objects are overwritten.

use clap::Args;
use gst_core::{ObjectInfo, ObjectKey, ObjectStore};
use serde::Serialize;

use super::Failure;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, ProgressBar};

/// Upload files to the bucket
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Local file(s) to upload; each path is also the object key
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<String>,
}

#[derive(Debug, Serialize)]
struct UploadOutput {
    status: &'static str,
    uploaded: Vec<Uploaded>,
    failed: Vec<Failure>,
}

#[derive(Debug, Serialize)]
struct Uploaded {
    key: String,
    size_bytes: u64,
}

/// Execute the upload command
pub async fn execute(
    args: UploadArgs,
    store: &dyn ObjectStore,
    formatter: &Formatter,
) -> ExitCode {
    let progress = ProgressBar::new(formatter.output_config(), args.paths.len() as u64);
    let mut uploaded = Vec::new();
    let mut failed = Vec::new();

    for path in &args.paths {
        progress.set_message(path);
        match upload_file(path, store).await {
            Ok(done) => {
                if !formatter.is_json() {
                    let size = done.size_human.as_deref().unwrap_or_default();
                    let line = format!("Uploaded: {} ({size})", done.key);
                    progress.suspend(|| formatter.println(&line));
                }
                uploaded.push(Uploaded {
                    key: done.key.clone(),
                    size_bytes: done.size_bytes.unwrap_or_default(),
                });
            }
            Err(message) => {
                progress.suspend(|| formatter.error(&message));
                failed.push(Failure {
                    key: path.clone(),
                    error: message,
                });
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if formatter.is_json() {
        formatter.json(&UploadOutput {
            status: if failed.is_empty() { "success" } else { "partial" },
            uploaded,
            failed,
        });
    }

    ExitCode::Success
}

/// Read one file and write it to the bucket; the error is the message to print
async fn upload_file(path: &str, store: &dyn ObjectStore) -> Result<ObjectInfo, String> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Could not open {path}: {e}"))?;

    let key = ObjectKey::new(path).map_err(|e| format!("Unable to write {path}: {e}"))?;
    let content_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());

    tracing::debug!(%key, bytes = data.len(), ?content_type, "uploading file");
    store
        .put_object(&key, data, content_type)
        .await
        .map_err(|e| format!("Unable to write {path}: {e}"))
}
