//! Bucket-existence scan
//!
//! GCS has no cheap "does this bucket exist for my project" call that works
//! with object-level permissions, so the check walks the project's bucket
//! listing looking for an exact name match.

use futures::StreamExt;

use crate::error::{Error, Result};
use crate::traits::ObjectStore;

/// Outcome of a bucket scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketLookup {
    /// A bucket with the exact name was listed
    Found,
    /// The whole listing was read without errors and had no match
    NotFound,
    /// No match, but the listing reported errors so the scan may have missed it
    Incomplete { errors: usize },
}

impl BucketLookup {
    /// Collapse into a yes/no answer; an incomplete scan is an error
    pub fn into_result(self, name: &str) -> Result<bool> {
        match self {
            BucketLookup::Found => Ok(true),
            BucketLookup::NotFound => Ok(false),
            BucketLookup::Incomplete { errors } => Err(Error::Network(format!(
                "bucket listing failed {errors} time(s) before {name:?} could be found"
            ))),
        }
    }
}

/// Scan every bucket for one named exactly `name`
///
/// Errors yielded by the listing are logged and counted, and the scan goes on
/// with whatever the stream yields next. The scan stops at the first match or
/// at the end of the stream. Listings built on [`paginate`] end right after
/// their first error, so buckets on later pages are not seen in that case.
///
/// [`paginate`]: crate::cursor::paginate
pub async fn find_bucket(store: &dyn ObjectStore, name: &str) -> BucketLookup {
    let mut buckets = store.list_buckets();
    let mut errors = 0;

    while let Some(item) = buckets.next().await {
        match item {
            Ok(bucket) if bucket.name == name => return BucketLookup::Found,
            Ok(_) => {}
            Err(e) => {
                errors += 1;
                tracing::warn!(error = %e, "bucket listing error during scan");
            }
        }
    }

    if errors == 0 {
        BucketLookup::NotFound
    } else {
        BucketLookup::Incomplete { errors }
    }
}
