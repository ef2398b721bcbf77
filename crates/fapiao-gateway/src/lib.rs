//! Inference gateway abstraction for fapiao.
//!
//! This crate provides a single interface over a remote language-model
//! service that can:
//! - accept a document upload and return an opaque file handle
//! - return the text it extracted from an uploaded document
//! - answer a chat-style completion request with JSON text
//! - delete an uploaded document
//!
//! `MoonshotGateway` implements it over the OpenAI-compatible HTTP API.

mod backend;
mod error;
mod types;

pub use backend::InferenceGateway;
pub use backend::moonshot::{DEFAULT_BASE_URL, MoonshotGateway};
pub use error::GatewayError;
pub use types::{ChatMessage, ChatRequest, ChatResponse, Choice, FileHandle, ResponseFormat, Role};

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
