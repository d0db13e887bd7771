//! gst-core: Core library for the gstasher CLI
//!
//! This crate provides the pieces of gstasher that do not depend on any
//! storage SDK:
//! - The configuration value built once at startup
//! - Object keys and object/bucket metadata
//! - The ObjectStore trait implemented by the GCS adapter
//! - A lazy page cursor and the bucket-existence scan built on it
//!
//! Keeping the SDK out of this crate lets the CLI handlers be tested against
//! in-memory stores.

pub mod bucket;
pub mod config;
pub mod cursor;
pub mod error;
pub mod key;
pub mod traits;

pub use bucket::{BucketLookup, find_bucket};
pub use config::Config;
pub use cursor::{Page, paginate};
pub use error::{Error, Result};
pub use key::ObjectKey;
pub use traits::{BucketInfo, BucketStream, ObjectInfo, ObjectStore, ObjectStream};
