//! Gateway backend implementations.

pub mod moonshot;

use std::future::Future;
use std::path::Path;

use crate::{ChatRequest, FileHandle, Result};

/// Trait for remote inference gateways.
///
/// This trait abstracts over the service that turns an uploaded document
/// into text and answers completion requests, so the extraction pipeline
/// can run against the real HTTP service or an in-memory double.
pub trait InferenceGateway: Send + Sync {
    /// Upload a document for text extraction.
    fn upload(&self, path: &Path) -> impl Future<Output = Result<FileHandle>> + Send;

    /// Fetch the text the service extracted from an uploaded document.
    fn file_content(&self, file: &FileHandle) -> impl Future<Output = Result<String>> + Send;

    /// Run a chat completion and return the first choice's content.
    fn complete(&self, request: &ChatRequest) -> impl Future<Output = Result<String>> + Send;

    /// Delete an uploaded document.
    fn delete(&self, file: &FileHandle) -> impl Future<Output = Result<()>> + Send;
}
