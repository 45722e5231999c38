use serde::Serialize;
use sha1::{Digest, Sha1};

use crate::config::CloudinaryConfig;

/// Issues signatures for Cloudinary direct (browser-to-CDN) uploads.
#[derive(Debug, Clone)]
pub struct CloudinarySigner {
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

/// Everything the browser needs to post a file straight to Cloudinary.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SignedUpload {
    pub signature: String,
    pub timestamp: i64,
    pub api_key: String,
    pub cloud_name: String,
}

impl CloudinarySigner {
    pub fn new(config: &CloudinaryConfig) -> Self {
        Self {
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        }
    }

    /// Sign the parameter set `{timestamp}`: `hex(sha1("timestamp=<ts>" + api_secret))`.
    pub fn sign(&self, timestamp: i64) -> SignedUpload {
        let mut hasher = Sha1::new();
        hasher.update(format!("timestamp={timestamp}").as_bytes());
        hasher.update(self.api_secret.as_bytes());
        SignedUpload {
            signature: hex::encode(hasher.finalize()),
            timestamp,
            api_key: self.api_key.clone(),
            cloud_name: self.cloud_name.clone(),
        }
    }
}
