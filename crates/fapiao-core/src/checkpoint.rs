//! Renaming finished documents after their extracted identity.
//!
//! A renamed document is no longer found under its original name by the
//! next scan, which is what keeps reruns from reprocessing it. There is no
//! other record of completion.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::{info, warn};

use crate::error::CheckpointError;
use crate::models::record::{InvoiceField, InvoiceRecord};

lazy_static! {
    /// Characters not allowed in file names on common filesystems.
    static ref ILLEGAL_FILENAME_CHARS: Regex = Regex::new(r#"[\\/*?:"<>|]"#).unwrap();
}

/// Remove characters that are illegal in file names.
pub fn sanitize_filename(name: &str) -> String {
    ILLEGAL_FILENAME_CHARS.replace_all(name, "").into_owned()
}

/// Coerce an amount to an integer, truncating any fraction.
///
/// Anything that does not parse as a number becomes 0.
pub fn truncate_amount(amount: &str) -> i64 {
    let amount = amount.trim();
    Decimal::from_str(amount)
        .or_else(|_| Decimal::from_scientific(amount))
        .ok()
        .and_then(|d| d.trunc().to_i64())
        .unwrap_or(0)
}

/// File name a successfully extracted document is renamed to.
///
/// `{invoice number}-{issue date}-{category}-{integer total}.pdf`
pub fn checkpoint_name(record: &InvoiceRecord) -> String {
    let name = format!(
        "{}-{}-{}-{}.pdf",
        record.get(InvoiceField::InvoiceNumber),
        record.get(InvoiceField::IssueDate),
        record.get(InvoiceField::Category),
        truncate_amount(record.get(InvoiceField::TotalAmount)),
    );
    sanitize_filename(&name)
}

/// Rename `document` after `record`, never overwriting an existing file.
pub fn try_checkpoint(document: &Path, record: &InvoiceRecord) -> Result<PathBuf, CheckpointError> {
    let parent = document.parent().ok_or(CheckpointError::NoParent)?;
    let target = parent.join(checkpoint_name(record));

    // symlink_metadata also sees dangling symlinks, which exists() misses.
    if std::fs::symlink_metadata(&target).is_ok() {
        return Err(CheckpointError::Collision { target });
    }

    std::fs::rename(document, &target).map_err(|source| CheckpointError::Rename {
        from: document.to_path_buf(),
        to: target.clone(),
        source,
    })?;

    Ok(target)
}

/// Rename `document` after `record`, logging instead of failing.
///
/// Returns the new path when the rename happened.
pub fn checkpoint(document: &Path, record: &InvoiceRecord) -> Option<PathBuf> {
    match try_checkpoint(document, record) {
        Ok(target) => {
            info!(
                "Renamed to {}",
                target.file_name().unwrap_or_default().to_string_lossy()
            );
            Some(target)
        }
        Err(CheckpointError::Collision { target }) => {
            warn!(
                "Not renaming {}: {} already exists",
                document.display(),
                target.display()
            );
            None
        }
        Err(e) => {
            warn!("Not renaming {}: {}", document.display(), e);
            None
        }
    }
}
