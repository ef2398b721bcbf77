//! CSV serialization of a run's records.
//!
//! The report is UTF-8 with a byte-order mark so spreadsheet programs
//! detect the encoding of the Chinese headers.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ReportError;
use crate::models::record::{InvoiceField, InvoiceRecord};

/// UTF-8 byte-order mark.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write the header and `records` as CSV to `writer`, prefixed by a BOM.
pub fn write_csv<W: Write>(mut writer: W, records: &[InvoiceRecord]) -> Result<(), ReportError> {
    writer
        .write_all(UTF8_BOM)
        .map_err(|e| ReportError::Csv(e.into()))?;

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(InvoiceField::headers())?;
    for record in records {
        wtr.write_record(record.values())?;
    }
    wtr.flush().map_err(|e| ReportError::Csv(e.into()))?;
    Ok(())
}

/// Render `records` as a CSV string (with BOM).
pub fn to_csv_string(records: &[InvoiceRecord]) -> Result<String, ReportError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, records)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write the report file in one go.
///
/// Content goes to a sibling temporary file first, which is then renamed
/// over `path`.
pub fn write_report(path: &Path, records: &[InvoiceRecord]) -> Result<(), ReportError> {
    let io_error = |source: std::io::Error| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let tmp = temp_path(path);
    let file = std::fs::File::create(&tmp).map_err(io_error)?;
    let result = write_csv(std::io::BufWriter::new(file), records);
    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }

    std::fs::rename(&tmp, path).map_err(io_error)?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_csv_layout() {
        let mut record = InvoiceRecord::unavailable();
        record.set(InvoiceField::SellerName, "百胜餐饮（广东）有限公司");
        record.set(InvoiceField::ItemName, "*餐饮服务*餐饮服务, 套餐");

        let csv = to_csv_string(&[record, InvoiceRecord::unavailable()]).unwrap();

        assert!(csv.starts_with('\u{feff}'));
        let lines: Vec<&str> = csv.trim_start_matches('\u{feff}').lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "发票代码,发票号码,销方识别号,销方名称,购方识别号,购买方名称,开票日期,项目名称,数量,金额,税率,税额,价税合计,发票票种,类别"
        );
        assert_eq!(
            lines[1],
            "N/A,N/A,N/A,百胜餐饮（广东）有限公司,N/A,N/A,N/A,\"*餐饮服务*餐饮服务, 套餐\",N/A,N/A,N/A,N/A,N/A,N/A,N/A"
        );
        assert_eq!(lines[2], vec!["N/A"; 15].join(","));
    }

    #[test]
    fn test_write_report_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoices_data.csv");
        std::fs::write(&path, "stale").unwrap();

        write_report(&path, &[InvoiceRecord::unavailable()]).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        assert_eq!(String::from_utf8(bytes).unwrap().lines().count(), 2);
        assert!(!dir.path().join("invoices_data.csv.tmp").exists());
    }

    #[test]
    fn test_write_report_into_missing_folder_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = write_report(&path, &[]).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
