//! Loading the API key and the optional buyer hint from plain text files.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::StartupError;

/// Read the API key from `path`.
///
/// A missing or blank file is fatal for the run.
pub fn load_api_key(path: &Path) -> Result<String, StartupError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(StartupError::MissingCredentials {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(StartupError::ReadCredentials {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let key = content.trim();
    if key.is_empty() {
        return Err(StartupError::EmptyCredentials {
            path: path.to_path_buf(),
        });
    }

    Ok(key.to_string())
}

/// Read the buyer hint, if the file exists and is non-empty.
pub fn load_buyer_hint(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) if !content.trim().is_empty() => {
            debug!("Using buyer hint from {}", path.display());
            Some(content.trim().to_string())
        }
        Ok(_) => None,
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!("Ignoring buyer hint {}: {}", path.display(), e);
            None
        }
    }
}
