//! Per-document extraction.

pub mod interpreter;
pub mod prompt;
mod worker;

pub use interpreter::interpret;
pub use worker::{ExtractionWorker, WorkerSettings};

use std::future::Future;
use std::path::Path;

use crate::models::record::ExtractionOutcome;

/// Trait for per-document extractors.
///
/// Implementations never fail outward: every failure collapses into
/// `ExtractionOutcome::failure()`.
pub trait DocumentExtractor: Send + Sync {
    /// Extract the invoice record from one document.
    fn process(&self, document: &Path) -> impl Future<Output = ExtractionOutcome> + Send;
}
