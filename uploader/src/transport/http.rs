//! Native HTTP transport built on reqwest.
//!
//! The file part is streamed in fixed-size chunks; each chunk handed to the
//! connection counts as transferred bytes for progress reporting. Chunks are
//! slices of the file's shared buffer, never copies.

use bytes::Bytes;
use futures::{stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};

use super::{
    is_success_status, parse_response, Transport, UploadReceipt, FIELD_CONTENT_TYPE, FIELD_FILE,
    FIELD_OPTIMISE, OPTIMISE_VALUE,
};
use crate::config::{UploadConfig, API_KEY_HEADER};
use crate::error::{UploadError, UploadResult};
use crate::models::CandidateFile;
use crate::state::ProgressHandle;

/// Bytes per progress tick
const CHUNK_SIZE: usize = 64 * 1024;

/// Uploads files with a shared reqwest [`Client`].
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpTransport {
    /// Create a transport with a fresh client
    pub fn new(config: &UploadConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a transport reusing an existing client
    pub fn with_client(client: Client, config: &UploadConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn form(&self, file: &CandidateFile<Bytes>, progress: ProgressHandle) -> UploadResult<Form> {
        let total = file.content.len() as u64;

        let mut sent = 0u64;
        let body = stream::iter(chunks(&file.content)).map(move |chunk| {
            sent += chunk.len() as u64;
            progress.report(sent, total);
            Ok::<_, std::io::Error>(chunk)
        });

        let part = Part::stream_with_length(Body::wrap_stream(body), total)
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| UploadError::Form(format!("invalid content type {:?}: {}", file.mime_type, e)))?;

        Ok(Form::new()
            .part(FIELD_FILE, part)
            .text(FIELD_CONTENT_TYPE, file.mime_type.clone())
            .text(FIELD_OPTIMISE, OPTIMISE_VALUE))
    }
}

/// Zero-copy `CHUNK_SIZE` slices of `content`.
fn chunks(content: &Bytes) -> impl Iterator<Item = Bytes> {
    let content = content.clone();
    (0..content.len())
        .step_by(CHUNK_SIZE)
        .map(move |start| content.slice(start..(start + CHUNK_SIZE).min(content.len())))
}

impl Transport for HttpTransport {
    type Content = Bytes;

    async fn upload(
        &self,
        file: &CandidateFile<Bytes>,
        progress: ProgressHandle,
    ) -> UploadResult<UploadReceipt> {
        let form = self.form(file, progress)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if !is_success_status(status) {
            log::warn!("{} rejected by endpoint with status {}", file.name, status);
            return Err(UploadError::Status(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        parse_response(status, &body)
    }
}
