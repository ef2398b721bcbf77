//! Configuration structures for the extraction pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FapiaoError;

/// Main configuration for fapiao.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FapiaoConfig {
    /// Inference service configuration.
    pub gateway: GatewayConfig,

    /// Per-document extraction configuration.
    pub extraction: ExtractionConfig,

    /// Input/output configuration for a run.
    pub pipeline: PipelineConfig,
}

/// Inference service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// API root of the OpenAI-compatible service.
    pub base_url: String,

    /// Model used for completions.
    pub model: String,

    /// File holding the API key.
    pub api_key_file: PathBuf,

    /// Timeout for each HTTP request in seconds.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: fapiao_gateway::DEFAULT_BASE_URL.to_string(),
            model: "moonshot-v1-32k".to_string(),
            api_key_file: PathBuf::from("moonshot.txt"),
            timeout_secs: 120,
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Per-document extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Attempts per document before falling back to the "N/A" record.
    pub max_attempts: u32,

    /// Pause between attempts in seconds.
    pub retry_delay_secs: u64,

    /// Sampling temperature for the completion call.
    pub temperature: f32,

    /// Optional file describing the expected buyer; used only if present.
    pub buyer_hint_file: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_secs: 2,
            temperature: 0.0,
            buyer_hint_file: Some(PathBuf::from("buyer.txt")),
        }
    }
}

impl ExtractionConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

/// Input/output configuration for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Folder scanned (non-recursively) for PDF files.
    pub input_dir: PathBuf,

    /// CSV report path.
    pub output_path: PathBuf,

    /// Rename documents after successful extraction.
    pub rename: bool,

    /// Process candidates in lexicographic path order instead of listing order.
    pub sort_candidates: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./invoices"),
            output_path: PathBuf::from("invoices_data.csv"),
            rename: true,
            sort_candidates: false,
        }
    }
}

impl FapiaoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FapiaoError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FapiaoError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
