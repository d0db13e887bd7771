//! gst-gcs: Google Cloud Storage adapter for gstasher
//!
//! This crate implements the ObjectStore trait against the GCS JSON API,
//! using the `object_store` GCP credential chain for bearer tokens. It is the
//! only crate that talks to Google Cloud directly.

pub mod api;
pub mod catalog;
pub mod client;
mod resource;

#[cfg(test)]
mod fake;

pub use api::JsonApi;
pub use catalog::BucketCatalog;
pub use client::GcsClient;
