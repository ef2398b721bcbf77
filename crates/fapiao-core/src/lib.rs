//! Core library for fapiao.
//!
//! This crate provides:
//! - The fixed 15-field invoice record and its "N/A" failure sentinel
//! - An extraction worker that drives one PDF through a remote inference
//!   gateway with bounded retry and guaranteed remote cleanup
//! - A response interpreter that never fails outward
//! - Checkpoint renaming of finished documents
//! - A sequential pipeline and the UTF-8 (BOM) CSV report writer

pub mod checkpoint;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod scan;

pub use error::{CheckpointError, ExtractionError, FapiaoError, ReportError, Result, StartupError};
pub use extract::{DocumentExtractor, ExtractionWorker, WorkerSettings};
pub use models::config::FapiaoConfig;
pub use models::record::{ExtractionOutcome, InvoiceField, InvoiceRecord, NOT_AVAILABLE};
pub use pipeline::{Pipeline, PipelineOptions, Report, RunStats};

/// Re-export gateway types.
pub use fapiao_gateway::{FileHandle, GatewayError, InferenceGateway, MoonshotGateway};
