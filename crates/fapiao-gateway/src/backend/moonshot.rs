//! HTTP backend for the Moonshot (Kimi) OpenAI-compatible API.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::debug;

use crate::error::GatewayError;
use crate::types::{ChatRequest, ChatResponse, FileHandle};
use crate::{InferenceGateway, Result};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.moonshot.cn/v1";

/// Only purpose accepted by the files endpoint for text extraction.
const FILE_PURPOSE: &str = "file-extract";

/// Gateway talking to the Moonshot API over HTTPS.
pub struct MoonshotGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MoonshotGateway {
    /// Create a gateway with the given credential, API root and request timeout.
    pub fn new(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

/// Turn non-2xx responses into `GatewayError::Status`.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Status {
        status: status.as_u16(),
        body,
    })
}

impl InferenceGateway for MoonshotGateway {
    async fn upload(&self, path: &Path) -> Result<FileHandle> {
        let data = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf")
            .to_string();

        debug!("Uploading {} ({} bytes)", filename, data.len());

        let part = Part::bytes(data)
            .file_name(filename)
            .mime_str("application/octet-stream")?;
        let form = Form::new()
            .part("file", part)
            .text("purpose", FILE_PURPOSE);

        let response = self
            .client
            .post(self.url("files"))
            .header("Authorization", self.bearer())
            .multipart(form)
            .send()
            .await?;

        let handle: FileHandle = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        debug!("Uploaded as file {}", handle.id);
        Ok(handle)
    }

    async fn file_content(&self, file: &FileHandle) -> Result<String> {
        let response = self
            .client
            .get(self.url(&format!("files/{}/content", file.id)))
            .header("Authorization", self.bearer())
            .send()
            .await?;

        let text = check_status(response).await?.text().await?;
        debug!("File {} content: {} bytes", file.id, text.len());
        Ok(text)
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let response = self
            .client
            .post(self.url("chat/completions"))
            .header("Authorization", self.bearer())
            .json(request)
            .send()
            .await?;

        let completion: ChatResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        completion
            .first_content()
            .map(str::to_string)
            .ok_or(GatewayError::EmptyCompletion)
    }

    async fn delete(&self, file: &FileHandle) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("files/{}", file.id)))
            .header("Authorization", self.bearer())
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}
