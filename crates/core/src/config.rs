//! Configuration
//!
//! gstasher has one required setting that comes from outside the binary: the
//! bucket to work with, read from `GOOGLE_CLOUD_STORAGE_BUCKET`. The project
//! identifier and credentials path are fixed defaults. `STORAGE_EMULATOR_HOST`
//! optionally redirects every request to a local GCS emulator, as the Google
//! client libraries do. Everything lives in a single [`Config`] value built
//! once in `main` and passed by reference.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable holding the target bucket name
pub const BUCKET_ENV: &str = "GOOGLE_CLOUD_STORAGE_BUCKET";

/// Environment variable naming a GCS emulator (`host:port` or a URL)
pub const EMULATOR_ENV: &str = "STORAGE_EMULATOR_HOST";

/// Project used for bucket listing
pub const DEFAULT_PROJECT_ID: &str = "core-infra";

/// Service account key file, relative to the working directory
pub const DEFAULT_CREDENTIALS_PATH: &str = "creds.json";

/// Process configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Project identifier
    pub project_id: String,

    /// Path to the service account credentials file
    pub credentials_path: PathBuf,

    /// Target bucket
    pub bucket: String,

    /// Emulator endpoint replacing `https://storage.googleapis.com`
    pub endpoint: Option<String>,
}

impl Config {
    /// Create a configuration for `bucket` with the default project and credentials
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            bucket: bucket.into(),
            endpoint: None,
        }
    }

    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration using `lookup` to resolve environment variables
    ///
    /// An unset or empty bucket variable is a configuration error. An empty
    /// emulator variable is ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket = match lookup(BUCKET_ENV) {
            Some(bucket) if !bucket.is_empty() => bucket,
            _ => {
                return Err(Error::Config(format!(
                    "Please set {BUCKET_ENV:?} in your environment to define a bucket to work with."
                )));
            }
        };

        let mut config = Self::new(bucket);
        config.endpoint = lookup(EMULATOR_ENV).filter(|host| !host.is_empty());
        Ok(config)
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = path.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Get the credentials file path
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }
}
