//! Bucket storage for binary attachments.
//!
//! Uploads go to `PUT {base}/v1/files/{bucket}/{name}` as a multipart form and
//! come back as a relative reference (`files/{bucket}/{name}`) that can be used
//! as an [`Attachment`] url or passed to [`BucketClient::get`].

use std::io;
use std::path::Path;

use futures::future::join_all;
use reqwest::{
    multipart::{Form, Part},
    StatusCode, Url,
};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::config::{self, ConfigError, DialConfig, API_KEY_HEADER};
use crate::error::DialError;
use crate::models::{Attachment, AttachmentSource};

const API_VERSION: &str = "v1";

/// Errors raised by bucket operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error occurred during HTTP request.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The referenced object does not exist or has expired.
    #[error("Object not found: {0}")]
    NotFound(String),
    /// The storage endpoint rejected the request.
    #[error("Storage request rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Body returned by the gateway
        body: String,
    },
    /// A reference could not be turned into a URL.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
    /// The gateway reply did not have the expected shape.
    #[error("Invalid storage response: {0}")]
    InvalidResponse(String),
    /// Failed to read a local file for upload, or its path has no usable name.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Deserialize)]
struct BucketResponse {
    bucket: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

/// Client for the gateway's object storage.
///
/// The client owns its HTTP connection pool and releases it on drop. All
/// methods take `&self`, so uploads and downloads can be issued concurrently
/// from independent tasks; the only shared state is the bucket id, resolved
/// once on first use.
///
/// A `put` is a single request: dropping its future aborts the transfer, and
/// the gateway only publishes an object once the whole body has arrived, so a
/// cancelled upload never becomes readable through `get`.
pub struct BucketClient {
    client: reqwest::Client,
    api_key: String,
    base_url: Url,
    bucket: OnceCell<String>,
}

impl std::fmt::Debug for BucketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketClient")
            .field("base_url", &self.base_url.as_str())
            .field("bucket", &self.bucket.get())
            .finish()
    }
}

impl BucketClient {
    /// Creates a new bucket client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - The gateway API key
    /// * `base_url` - The gateway URL, e.g. `https://gateway.example`
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the URL is not an absolute http(s) URL.
    pub fn new(api_key: impl Into<String>, base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
        let api_key = config::non_empty(api_key.into(), "api_key")?;
        let base_url = base_url.as_ref().trim_end_matches('/');
        let base_url = config::validate_url("base_url", base_url)?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            bucket: OnceCell::new(),
        })
    }

    /// Creates a bucket client from a shared configuration.
    pub fn from_config(config: &DialConfig) -> Result<Self, ConfigError> {
        Self::new(config.api_key(), config.base_url())
    }

    /// Returns the caller's bucket id, fetching it on first use.
    pub async fn bucket(&self) -> Result<&str, StorageError> {
        let bucket = self
            .bucket
            .get_or_try_init(|| async {
                let url = self.api_url(&["bucket"])?;
                tracing::debug!(%url, "resolving bucket");
                let response = self
                    .client
                    .get(url)
                    .header(API_KEY_HEADER, &self.api_key)
                    .send()
                    .await?;
                let text = check_status(response, "bucket").await?.text().await?;
                let body: BucketResponse = serde_json::from_str(&text).map_err(|e| {
                    StorageError::InvalidResponse(format!(
                        "Failed to parse bucket response: {}. Response: {}",
                        e, text
                    ))
                })?;
                Ok::<_, StorageError>(body.bucket)
            })
            .await?;
        Ok(bucket)
    }

    /// Uploads `content` under `file_name` and returns its reference.
    ///
    /// The caller's buffer is only borrowed, so a failed upload can be retried
    /// with the same slice.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket cannot be resolved, the upload is rejected,
    /// or the reply carries no `url`.
    pub async fn put(
        &self,
        file_name: &str,
        mime_type: &str,
        content: &[u8],
    ) -> Result<String, StorageError> {
        let bucket = self.bucket().await?;
        let url = self.api_url(&["files", bucket, file_name])?;
        tracing::debug!(%url, size = content.len(), mime_type, "uploading file");

        let part = Part::bytes(content.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .put(url)
            .header(API_KEY_HEADER, &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let text = check_status(response, file_name).await?.text().await?;
        let upload: UploadResponse = serde_json::from_str(&text).map_err(|e| {
            StorageError::InvalidResponse(format!(
                "Failed to parse upload response: {}. Response: {}",
                e, text
            ))
        })?;

        tracing::debug!(reference = %upload.url, "upload complete");
        Ok(upload.url)
    }

    /// Uploads a local file, guessing its MIME type from the extension.
    pub async fn put_path(&self, path: impl AsRef<Path>) -> Result<Attachment, StorageError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{:?} has no UTF-8 file name", path),
                )
            })?
            .to_string();
        let mime_type = mime_guess::from_path(path).first_or_octet_stream();
        let content = tokio::fs::read(path).await?;

        self.put_attachment(&file_name, mime_type.essence_str(), &content)
            .await
    }

    /// Uploads `content` and returns an attachment referencing it.
    pub async fn put_attachment(
        &self,
        file_name: &str,
        mime_type: &str,
        content: &[u8],
    ) -> Result<Attachment, StorageError> {
        let url = self.put(file_name, mime_type, content).await?;
        Ok(Attachment::builder()
            .title(file_name)
            .mime_type(mime_type)
            .url(url)
            .build())
    }

    /// Downloads the full content addressed by `reference`.
    ///
    /// `reference` is either a relative reference returned by [`put`](Self::put)
    /// or an absolute `http(s)` URL. The API key is only sent to the configured
    /// gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is missing or the request fails. A body
    /// shorter than its `Content-Length` fails inside the transport and is
    /// reported as [`StorageError::Request`]; partial bytes are never returned.
    pub async fn get(&self, reference: &str) -> Result<Vec<u8>, StorageError> {
        let url = self.resolve_reference(reference)?;
        tracing::debug!(%url, "downloading file");

        let mut request = self.client.get(url.clone());
        if url.origin() == self.base_url.origin() {
            request = request.header(API_KEY_HEADER, &self.api_key);
        }
        let response = check_status(request.send().await?, reference).await?;

        Ok(response.bytes().await?.to_vec())
    }

    /// Returns the bytes of an attachment: downloaded when it has a `url`,
    /// decoded when it only carries inline `data`.
    ///
    /// # Errors
    ///
    /// Returns [`DialError::EmptyAttachment`] when there is nothing to fetch.
    pub async fn resolve_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>, DialError> {
        match attachment.source() {
            Some(AttachmentSource::Url(reference)) => Ok(self.get(reference).await?),
            Some(AttachmentSource::Data(data)) => Ok(crate::models::data_url::decode(data)?),
            None => Err(DialError::EmptyAttachment {
                title: attachment.title.clone(),
            }),
        }
    }

    /// Resolves several attachments concurrently. Results are in input order.
    pub async fn resolve_attachments(
        &self,
        attachments: &[Attachment],
    ) -> Vec<Result<Vec<u8>, DialError>> {
        join_all(
            attachments
                .iter()
                .map(|attachment| self.resolve_attachment(attachment)),
        )
        .await
    }

    fn api_url(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StorageError::InvalidReference(self.base_url.to_string()))?
            .pop_if_empty()
            .push(API_VERSION)
            .extend(segments);
        Ok(url)
    }

    fn resolve_reference(&self, reference: &str) -> Result<Url, StorageError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(StorageError::InvalidReference("empty reference".into()));
        }
        let invalid = |e: url::ParseError| {
            StorageError::InvalidReference(format!("{}: {}", reference, e))
        };
        match Url::parse(reference) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!(
                "{}/{}/{}",
                self.base_url.as_str().trim_end_matches('/'),
                API_VERSION,
                reference.trim_start_matches('/')
            ))
            .map_err(invalid),
            Err(e) => Err(invalid(e)),
        }
    }
}

async fn check_status(
    response: reqwest::Response,
    reference: &str,
) -> Result<reqwest::Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(StorageError::NotFound(reference.to_string()));
    }
    let body = response.text().await.unwrap_or_default();
    Err(StorageError::Rejected {
        status: status.as_u16(),
        body,
    })
}
