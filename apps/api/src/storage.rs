//! Raw resume storage. Objects are keyed `resumes/<user_id>/<file name>`.

#[cfg(test)]
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
#[cfg(test)]
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::AppError;

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Stores the upload and returns its object key.
    async fn put_resume(
        &self,
        user_id: &str,
        file_name: &str,
        content_type: Option<&str>,
        bytes: Bytes,
    ) -> Result<String, AppError>;
}

/// Path separators in client-supplied names would escape the user prefix.
pub fn resume_key(user_id: &str, file_name: &str) -> String {
    let safe_name: String = file_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    let safe_name = if safe_name.trim().is_empty() {
        "resume".to_string()
    } else {
        safe_name
    };
    format!("resumes/{user_id}/{safe_name}")
}

// ────────────────────────────────────────────────────────────────────────────
// S3 / MinIO
// ────────────────────────────────────────────────────────────────────────────

pub struct S3ResumeStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ResumeStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ResumeStore for S3ResumeStore {
    async fn put_resume(
        &self,
        user_id: &str,
        file_name: &str,
        content_type: Option<&str>,
        bytes: Bytes,
    ) -> Result<String, AppError> {
        let key = resume_key(user_id, file_name);
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type.unwrap_or("application/octet-stream"))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded resume ({size} bytes) to s3://{}/{}", self.bucket, key);
        Ok(key)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[derive(Default)]
pub struct InMemoryResumeStore {
    objects: RwLock<HashMap<String, Bytes>>,
}

#[cfg(test)]
impl InMemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Bytes> {
        self.objects.read().await.get(key).cloned()
    }
}

#[cfg(test)]
#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn put_resume(
        &self,
        user_id: &str,
        file_name: &str,
        _content_type: Option<&str>,
        bytes: Bytes,
    ) -> Result<String, AppError> {
        let key = resume_key(user_id, file_name);
        self.objects.write().await.insert(key.clone(), bytes);
        Ok(key)
    }
}
