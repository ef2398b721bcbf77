//! Error types for the fapiao-core library.

use std::path::PathBuf;

use thiserror::Error;

use fapiao_gateway::GatewayError;

/// Errors loading or saving the configuration file.
///
/// Run-level failures use the dedicated enums below.
#[derive(Error, Debug)]
pub enum FapiaoError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Fatal conditions detected before processing starts.
#[derive(Error, Debug)]
pub enum StartupError {
    /// The credential file does not exist.
    #[error(
        "API key file '{}' not found. Create it next to the program and paste your API key into it.",
        path.display()
    )]
    MissingCredentials { path: PathBuf },

    /// The credential file exists but holds only whitespace.
    #[error("API key file '{}' is empty. Paste your API key into it and try again.", path.display())]
    EmptyCredentials { path: PathBuf },

    /// The credential file could not be read.
    #[error("failed to read API key file '{}': {source}", path.display())]
    ReadCredentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input directory does not exist.
    #[error("input folder '{}' does not exist", path.display())]
    MissingInputDir { path: PathBuf },

    /// The input directory holds no PDF files.
    #[error("no PDF files found in folder '{}'", path.display())]
    NoCandidates { path: PathBuf },

    /// Listing the input directory failed.
    #[error("failed to scan folder '{}': {source}", path.display())]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while extracting a single document.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Uploading the document failed.
    #[error("upload failed: {0}")]
    Upload(#[source] GatewayError),

    /// Fetching the extracted text failed.
    #[error("fetching file content failed: {0}")]
    Content(#[source] GatewayError),

    /// The completion call failed.
    #[error("completion failed: {0}")]
    Completion(#[source] GatewayError),

    /// Every attempt failed.
    #[error("all {attempts} attempts failed")]
    AttemptsExhausted { attempts: u32 },

    /// The completion text was not a JSON object.
    #[error("malformed model response: {0}")]
    Malformed(String),
}

/// Errors raised while renaming a finished document.
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// A file already exists under the target name.
    #[error("target '{}' already exists", target.display())]
    Collision { target: PathBuf },

    /// The OS refused the rename.
    #[error("failed to rename '{}' to '{}': {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document path has no parent directory.
    #[error("document path has no parent directory")]
    NoParent,
}

/// Errors raised while writing the CSV report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing or moving the report file failed.
    #[error("failed to write report '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for the fapiao library.
pub type Result<T> = std::result::Result<T, FapiaoError>;
