//! Drives a single document through upload, content fetch and completion.

use std::path::Path;
use std::time::Duration;

use fapiao_gateway::{FileHandle, InferenceGateway};
use tracing::{debug, error, info, warn};

use super::{DocumentExtractor, interpret, prompt};
use crate::error::ExtractionError;
use crate::models::config::FapiaoConfig;
use crate::models::record::ExtractionOutcome;

/// Settings for the extraction worker.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Model used for completions.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Attempts before giving up (at least one is always made).
    pub max_attempts: u32,
    /// Pause between attempts.
    pub retry_delay: Duration,
    /// Buyer description embedded in the prompt.
    pub buyer_hint: Option<String>,
}

impl WorkerSettings {
    /// Derive worker settings from the run configuration.
    pub fn from_config(config: &FapiaoConfig, buyer_hint: Option<String>) -> Self {
        Self {
            model: config.gateway.model.clone(),
            temperature: config.extraction.temperature,
            max_attempts: config.extraction.max_attempts,
            retry_delay: config.extraction.retry_delay(),
            buyer_hint,
        }
    }

    /// Set the retry delay.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the number of attempts.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self::from_config(&FapiaoConfig::default(), None)
    }
}

/// Extraction worker bound to one gateway for the whole run.
pub struct ExtractionWorker<'a, G> {
    gateway: &'a G,
    settings: WorkerSettings,
}

impl<'a, G: InferenceGateway> ExtractionWorker<'a, G> {
    pub fn new(gateway: &'a G, settings: WorkerSettings) -> Self {
        Self { gateway, settings }
    }

    pub fn settings(&self) -> &WorkerSettings {
        &self.settings
    }

    /// Obtain the raw completion text for a document.
    ///
    /// The uploaded file is deleted before returning, whatever the result.
    pub async fn request_completion(&self, document: &Path) -> Result<String, ExtractionError> {
        let mut handle = None;
        let result = self.attempt_with_retry(document, &mut handle).await;

        if let Some(file) = handle {
            match self.gateway.delete(&file).await {
                Ok(()) => debug!("Deleted remote file {}", file.id),
                Err(e) => warn!("Failed to clean up remote file {}: {}", file.id, e),
            }
        }

        result
    }

    // Only gateway calls fail in here; the answer is judged after the loop.
    async fn attempt_with_retry(
        &self,
        document: &Path,
        handle: &mut Option<FileHandle>,
    ) -> Result<String, ExtractionError> {
        let max_attempts = self.settings.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.attempt(document, handle).await {
                Ok(text) => {
                    info!("API request succeeded (attempt {}/{})", attempt, max_attempts);
                    return Ok(text);
                }
                Err(e) => {
                    warn!(
                        "API request failed (attempt {}/{}): {}",
                        attempt, max_attempts, e
                    );
                    if attempt < max_attempts {
                        info!("Retrying in {:?}", self.settings.retry_delay);
                        tokio::time::sleep(self.settings.retry_delay).await;
                    }
                }
            }
        }

        error!("All {} attempts failed", max_attempts);
        Err(ExtractionError::AttemptsExhausted {
            attempts: max_attempts,
        })
    }

    /// One pass of upload (first time only), content fetch and completion.
    async fn attempt(
        &self,
        document: &Path,
        handle: &mut Option<FileHandle>,
    ) -> Result<String, ExtractionError> {
        let file = match handle.take() {
            Some(file) => file,
            None => self
                .gateway
                .upload(document)
                .await
                .map_err(ExtractionError::Upload)?,
        };
        let file = handle.insert(file);

        let content = self
            .gateway
            .file_content(file)
            .await
            .map_err(ExtractionError::Content)?;

        let request = prompt::build_request(
            &self.settings.model,
            self.settings.temperature,
            &content,
            self.settings.buyer_hint.as_deref(),
        );

        self.gateway
            .complete(&request)
            .await
            .map_err(ExtractionError::Completion)
    }
}

impl<G: InferenceGateway> DocumentExtractor for ExtractionWorker<'_, G> {
    async fn process(&self, document: &Path) -> ExtractionOutcome {
        let name = document
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("Processing {}", name);

        match self.request_completion(document).await {
            Ok(raw) => {
                debug!("Model response for {}: {}", name, raw);
                interpret(&raw)
            }
            Err(e) => {
                warn!("Extraction failed for {}, inserting N/A record: {}", name, e);
                ExtractionOutcome::failure()
            }
        }
    }
}
