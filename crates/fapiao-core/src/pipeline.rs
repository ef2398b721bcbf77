//! Sequential orchestration of a whole run.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::checkpoint::checkpoint;
use crate::error::StartupError;
use crate::extract::DocumentExtractor;
use crate::models::config::PipelineConfig;
use crate::models::record::InvoiceRecord;
use crate::scan::scan_candidates;

/// Options controlling a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Rename documents after successful extraction.
    pub rename: bool,
    /// Sort candidates by path before processing.
    pub sort_candidates: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            rename: true,
            sort_candidates: false,
        }
    }
}

impl From<&PipelineConfig> for PipelineOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            rename: config.rename,
            sort_candidates: config.sort_candidates,
        }
    }
}

/// Counters describing a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Candidates found by the scan.
    pub discovered: usize,
    /// Candidates that still existed and went through extraction.
    pub processed: usize,
    /// Documents with a parsed model answer.
    pub extracted: usize,
    /// Documents reported with the "N/A" record.
    pub failed: usize,
    /// Candidates that had vanished by the time their turn came.
    pub skipped: usize,
    /// Documents renamed after extraction.
    pub renamed: usize,
}

/// Records of one run, in processing order.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub records: Vec<InvoiceRecord>,
    pub stats: RunStats,
}

/// Drives every candidate through an extractor, one at a time.
pub struct Pipeline<E> {
    extractor: E,
    options: PipelineOptions,
}

impl<E: DocumentExtractor> Pipeline<E> {
    pub fn new(extractor: E, options: PipelineOptions) -> Self {
        Self { extractor, options }
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Scan `input_dir` for candidates.
    pub fn discover(&self, input_dir: &Path) -> Result<Vec<PathBuf>, StartupError> {
        scan_candidates(input_dir, self.options.sort_candidates)
    }

    /// Scan `input_dir` and process every candidate.
    pub async fn run(&self, input_dir: &Path) -> Result<Report, StartupError> {
        let candidates = self.discover(input_dir)?;
        Ok(self.process_all(&candidates, |_, _| {}).await)
    }

    /// Process `candidates` in order.
    ///
    /// `on_progress` is called after each candidate with the number handled
    /// so far and the candidate's path.
    pub async fn process_all<F>(&self, candidates: &[PathBuf], mut on_progress: F) -> Report
    where
        F: FnMut(usize, &Path),
    {
        let mut report = Report {
            records: Vec::with_capacity(candidates.len()),
            stats: RunStats {
                discovered: candidates.len(),
                ..RunStats::default()
            },
        };

        for (index, document) in candidates.iter().enumerate() {
            // An earlier rename may have taken this name.
            if !document.exists() {
                info!(
                    "Skipping {}: it no longer exists, probably already renamed",
                    document.display()
                );
                report.stats.skipped += 1;
                on_progress(index + 1, document);
                continue;
            }

            let outcome = self.extractor.process(document).await;
            report.stats.processed += 1;

            if outcome.extracted {
                report.stats.extracted += 1;
                if self.options.rename && checkpoint(document, &outcome.record).is_some() {
                    report.stats.renamed += 1;
                }
            } else {
                report.stats.failed += 1;
            }

            report.records.push(outcome.record);
            on_progress(index + 1, document);
        }

        info!(
            "Run finished: {} processed, {} extracted, {} failed, {} skipped",
            report.stats.processed,
            report.stats.extracted,
            report.stats.failed,
            report.stats.skipped
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{ExtractionOutcome, InvoiceField};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Extractor answering from the file contents: a file holding "fail"
    /// yields the sentinel, anything else becomes the invoice number.
    #[derive(Default)]
    struct ContentExtractor {
        seen: Mutex<Vec<PathBuf>>,
        remove_after_first: Option<PathBuf>,
    }

    impl DocumentExtractor for ContentExtractor {
        async fn process(&self, document: &Path) -> ExtractionOutcome {
            let first = {
                let mut seen = self.seen.lock().unwrap();
                seen.push(document.to_path_buf());
                seen.len() == 1
            };
            if first {
                if let Some(victim) = &self.remove_after_first {
                    std::fs::remove_file(victim).unwrap();
                }
            }

            let content = std::fs::read_to_string(document).unwrap();
            if content == "fail" {
                return ExtractionOutcome::failure();
            }

            let mut record = InvoiceRecord::unavailable();
            record.set(InvoiceField::InvoiceNumber, content);
            record.set(InvoiceField::IssueDate, "2024年12月30日");
            record.set(InvoiceField::Category, "餐饮服务");
            record.set(InvoiceField::TotalAmount, "111.0");
            ExtractionOutcome::success(record)
        }
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_one_row_per_candidate_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1.pdf", "A1");
        write(dir.path(), "2.pdf", "fail");
        write(dir.path(), "3.pdf", "C3");

        let pipeline = Pipeline::new(
            ContentExtractor::default(),
            PipelineOptions {
                rename: true,
                sort_candidates: true,
            },
        );
        let report = pipeline.run(dir.path()).await.unwrap();

        let numbers: Vec<_> = report
            .records
            .iter()
            .map(|r| r.get(InvoiceField::InvoiceNumber))
            .collect();
        assert_eq!(numbers, vec!["A1", "N/A", "C3"]);
        assert_eq!(
            report.stats,
            RunStats {
                discovered: 3,
                processed: 3,
                extracted: 2,
                failed: 1,
                skipped: 0,
                renamed: 2,
            }
        );

        assert!(dir.path().join("A1-2024年12月30日-餐饮服务-111.pdf").exists());
        assert!(dir.path().join("2.pdf").exists());
        assert!(!dir.path().join("1.pdf").exists());
    }

    #[tokio::test]
    async fn test_rerun_skips_renamed_documents_only_by_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1.pdf", "A1");
        write(dir.path(), "2.pdf", "fail");

        let options = PipelineOptions {
            rename: true,
            sort_candidates: true,
        };
        Pipeline::new(ContentExtractor::default(), options)
            .run(dir.path())
            .await
            .unwrap();

        // The renamed file is a new candidate under its new name; the
        // failed one is retried.
        let second = ContentExtractor::default();
        let pipeline = Pipeline::new(second, options);
        let report = pipeline.run(dir.path()).await.unwrap();

        let seen = pipeline.extractor.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                dir.path().join("2.pdf"),
                dir.path().join("A1-2024年12月30日-餐饮服务-111.pdf"),
            ]
        );
        assert_eq!(report.records.len(), 2);
        // Renaming onto its own name collides and is skipped.
        assert_eq!(report.stats.renamed, 0);
    }

    #[tokio::test]
    async fn test_vanished_candidate_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1.pdf", "A1");
        let victim = write(dir.path(), "2.pdf", "B2");

        let extractor = ContentExtractor {
            remove_after_first: Some(victim),
            ..ContentExtractor::default()
        };
        let pipeline = Pipeline::new(
            extractor,
            PipelineOptions {
                rename: false,
                sort_candidates: true,
            },
        );

        let mut progress = Vec::new();
        let candidates = pipeline.discover(dir.path()).unwrap();
        let report = pipeline
            .process_all(&candidates, |done, _| progress.push(done))
            .await;

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.stats.skipped, 1);
        assert_eq!(report.stats.renamed, 0);
        assert_eq!(progress, vec![1, 2]);
        assert!(dir.path().join("1.pdf").exists());
    }

    #[tokio::test]
    async fn test_empty_folder_produces_no_report() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(ContentExtractor::default(), PipelineOptions::default());

        let err = pipeline.run(dir.path()).await.unwrap_err();
        assert!(matches!(err, StartupError::NoCandidates { .. }));
    }
}
