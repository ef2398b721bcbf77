//! Process command - extract data from a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use fapiao_core::checkpoint::checkpoint;
use fapiao_core::report::{UTF8_BOM, to_csv_string};
use fapiao_core::scan::is_pdf_name;
use fapiao_core::{DocumentExtractor, ExtractionWorker, InvoiceField, InvoiceRecord, WorkerSettings};

use super::{buyer_hint, connect_gateway, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Invoice PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Rename the file after a successful extraction
    #[arg(long)]
    rename: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !is_pdf_name(&name) {
        anyhow::bail!("Unsupported file format: {}", name);
    }

    let gateway = connect_gateway(&config)?;
    let worker = ExtractionWorker::new(
        &gateway,
        WorkerSettings::from_config(&config, buyer_hint(&config)),
    );

    info!("Processing file: {}", args.input.display());
    let outcome = worker.process(&args.input).await;

    if !outcome.extracted {
        eprintln!(
            "{} Extraction failed, all fields are N/A.",
            style("✗").red()
        );
    } else if args.rename {
        checkpoint(&args.input, &outcome.record);
    }

    let output = format_record(&outcome.record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_record(record: &InvoiceRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => {
            let csv = to_csv_string(std::slice::from_ref(record))?;
            let bom = String::from_utf8_lossy(UTF8_BOM).into_owned();
            Ok(csv.trim_start_matches(bom.as_str()).to_string())
        }
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_text(record: &InvoiceRecord) -> String {
    let width = InvoiceField::ALL
        .iter()
        .map(|f| f.label().chars().count())
        .max()
        .unwrap_or(0);

    record
        .iter()
        .map(|(field, value)| {
            let pad = width - field.label().chars().count();
            format!("{}{}  {}", field.label(), " ".repeat(pad), value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
