//! File upload seam
//!
//! Song sheets, audio, documents and photos are attached by URL. Real file
//! storage lives outside this crate; [`StubUploader`] only mints the URL a
//! file would be served from.

use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{Result, StoreError};
use crate::core::normalize::normalize_str;

/// Something that accepts a file and returns the URL it is served from
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<String>;
}

/// Uploader that stores nothing and returns `{public_base}/{uuid}-{name}`
#[derive(Debug, Clone)]
pub struct StubUploader {
    public_base: String,
}

impl StubUploader {
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL-safe form of a file name: accents stripped, anything else
    /// collapsed to `-`
    ///
    /// ```
    /// use choir::core::upload::StubUploader;
    ///
    /// assert_eq!(StubUploader::sanitize_file_name("Bài Hát Mùa Chay.pdf"), "bai-hat-mua-chay.pdf");
    /// ```
    pub fn sanitize_file_name(file_name: &str) -> String {
        static UNSAFE: OnceLock<Regex> = OnceLock::new();
        let regex = UNSAFE.get_or_init(|| Regex::new(r"[^a-z0-9._-]+").unwrap());
        let normalized = normalize_str(file_name);
        regex
            .replace_all(&normalized, "-")
            .trim_matches('-')
            .to_string()
    }
}

#[async_trait]
impl Uploader for StubUploader {
    async fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(StoreError::InvalidInput(format!("{} is empty", file_name)));
        }
        let name = Self::sanitize_file_name(file_name);
        if name.is_empty() {
            return Err(StoreError::InvalidInput(format!(
                "unusable file name: {:?}",
                file_name
            )));
        }
        let url = format!("{}/{}-{}", self.public_base, Uuid::new_v4(), name);
        debug!(file_name, size = bytes.len(), url = %url, "Stub upload");
        Ok(url)
    }
}
