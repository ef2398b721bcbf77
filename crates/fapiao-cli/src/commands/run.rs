//! Run command - process the whole input folder into one CSV report.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use fapiao_core::report::write_report;
use fapiao_core::{ExtractionWorker, FapiaoConfig, Pipeline, PipelineOptions, WorkerSettings};

use super::{buyer_hint, connect_gateway, load_config};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Folder containing the invoice PDFs
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// CSV report path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// File holding the API key
    #[arg(long)]
    api_key_file: Option<PathBuf>,

    /// Model used for extraction
    #[arg(short, long)]
    model: Option<String>,

    /// Attempts per document before inserting an N/A row
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Do not rename documents after extraction
    #[arg(long)]
    no_rename: bool,

    /// Process files in name order instead of directory order
    #[arg(long)]
    sort: bool,
}

impl RunArgs {
    fn apply(&self, config: &mut FapiaoConfig) {
        if let Some(input) = &self.input {
            config.pipeline.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.pipeline.output_path = output.clone();
        }
        if let Some(key_file) = &self.api_key_file {
            config.gateway.api_key_file = key_file.clone();
        }
        if let Some(model) = &self.model {
            config.gateway.model = model.clone();
        }
        if let Some(attempts) = self.max_attempts {
            config.extraction.max_attempts = attempts;
        }
        if self.no_rename {
            config.pipeline.rename = false;
        }
        if self.sort {
            config.pipeline.sort_candidates = true;
        }
    }
}

pub async fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.apply(&mut config);

    let gateway = connect_gateway(&config)?;
    let settings = WorkerSettings::from_config(&config, buyer_hint(&config));
    let worker = ExtractionWorker::new(&gateway, settings);
    let pipeline = Pipeline::new(worker, PipelineOptions::from(&config.pipeline));

    let candidates = pipeline.discover(&config.pipeline.input_dir)?;

    println!(
        "{} Found {} PDF files, processing...",
        style("ℹ").blue(),
        candidates.len()
    );

    let pb = ProgressBar::new(candidates.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let report = pipeline
        .process_all(&candidates, |done, path| {
            pb.set_position(done as u64);
            if let Some(name) = path.file_name() {
                pb.set_message(name.to_string_lossy().into_owned());
            }
        })
        .await;

    pb.finish_with_message("Complete");

    let output_path = &config.pipeline.output_path;
    write_report(output_path, &report.records)?;

    let stats = report.stats;
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        stats.processed,
        start.elapsed()
    );
    println!(
        "   {} extracted, {} failed (N/A rows), {} renamed, {} skipped",
        style(stats.extracted).green(),
        style(stats.failed).red(),
        stats.renamed,
        stats.skipped
    );
    println!(
        "{} Report written to {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}
