//! check command - Report whether the configured bucket exists
//!
//! Scans every bucket of the project for an exact name match. A listing error
//! ends the scan, and a scan that saw errors and no match is reported as a
//! failure rather than "does not exist".

use gst_core::{ObjectStore, find_bucket};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

#[derive(Debug, Serialize)]
struct CheckOutput<'a> {
    bucket: &'a str,
    exists: bool,
}

/// Execute the check command
pub async fn execute(store: &dyn ObjectStore, bucket: &str, formatter: &Formatter) -> ExitCode {
    let exists = match find_bucket(store, bucket).await.into_result(bucket) {
        Ok(exists) => exists,
        Err(e) => {
            formatter.error(&format!("Unable to check bucket {bucket:?}: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&CheckOutput { bucket, exists });
    } else if exists {
        formatter.success(&format!("Bucket {bucket:?} exists."));
    } else {
        formatter.error(&format!("Bucket {bucket:?} does not exist."));
    }

    if exists {
        ExitCode::Success
    } else {
        ExitCode::NotFound
    }
}
