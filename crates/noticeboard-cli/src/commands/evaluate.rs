//! Priority classifier evaluation.
//!
//! Reads a test set of `text`/`label` pairs, either a CSV file with a
//! `text,label` header or JSON Lines of `{"text": ..., "label": ...}`, runs
//! the configured classifier over every text and reports accuracy,
//! per-label precision/recall/F1 and the confusion matrix.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use noticeboard_ai::EnrichmentManager;
use noticeboard_core::config::AppConfig;
use noticeboard_core::error::{AppError, ErrorKind};
use noticeboard_core::types::Priority;

use crate::output::{self, OutputFormat};

/// Arguments for the evaluate command
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Test set with `text` and `label` fields (`.csv` or `.jsonl`)
    #[arg(short, long)]
    pub testset: PathBuf,
    /// Evaluate only the first N samples
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct Sample {
    text: String,
    label: String,
}

/// A labelled text from the test set.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledText {
    pub text: String,
    pub label: Priority,
}

/// Map a label to a priority. Labels mentioning `PASSED` (an expired
/// deadline) count as `Critical`.
pub fn parse_label(raw: &str) -> Result<Priority, String> {
    if raw.to_ascii_uppercase().contains("PASSED") {
        return Ok(Priority::Critical);
    }
    raw.parse()
}

/// On-disk layout of a test set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestsetFormat {
    /// Comma-separated with a `text,label` header row.
    Csv,
    /// One JSON object per line.
    JsonLines,
}

impl TestsetFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("jsonl") | Some("ndjson") => Ok(Self::JsonLines),
            _ => Err(AppError::validation(format!(
                "Unsupported test set '{}': expected a .csv or .jsonl file",
                path.display()
            ))),
        }
    }
}

/// Parse a test set in the given format.
pub fn parse_testset(content: &str, format: TestsetFormat) -> Result<Vec<LabelledText>, AppError> {
    match format {
        TestsetFormat::Csv => parse_csv(content),
        TestsetFormat::JsonLines => parse_json_lines(content),
    }
}

fn labelled(sample: Sample, lineno: u64) -> Result<LabelledText, AppError> {
    let label = parse_label(&sample.label)
        .map_err(|e| AppError::validation(format!("Line {lineno}: {e}")))?;
    Ok(LabelledText {
        text: sample.text,
        label,
    })
}

fn invalid_record(lineno: u64, err: impl std::error::Error + Send + Sync + 'static) -> AppError {
    let message = format!("Line {lineno}: invalid record: {err}");
    AppError::with_source(ErrorKind::Validation, message, err)
}

/// Blank lines are skipped.
fn parse_json_lines(content: &str) -> Result<Vec<LabelledText>, AppError> {
    let mut samples = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let lineno = index as u64 + 1;
        let sample: Sample = serde_json::from_str(line).map_err(|e| invalid_record(lineno, e))?;
        samples.push(labelled(sample, lineno)?);
    }
    Ok(samples)
}

/// Columns are matched by header name; extra columns are ignored.
fn parse_csv(content: &str) -> Result<Vec<LabelledText>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let headers = reader.headers().map_err(|e| invalid_record(1, e))?.clone();

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            let lineno = e.position().map_or(0, |p| p.line());
            invalid_record(lineno, e)
        })?;
        let lineno = record.position().map_or(0, |p| p.line());
        let sample: Sample = record
            .deserialize(Some(&headers))
            .map_err(|e| invalid_record(lineno, e))?;
        samples.push(labelled(sample, lineno)?);
    }
    Ok(samples)
}

/// Precision, recall and F1 for one label.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct LabelMetrics {
    pub label: Priority,
    #[tabled(display = "fmt_ratio")]
    pub precision: f64,
    #[tabled(display = "fmt_ratio")]
    pub recall: f64,
    #[tabled(display = "fmt_ratio")]
    pub f1: f64,
    pub support: u64,
}

fn fmt_ratio(value: &f64) -> String {
    format!("{value:.3}")
}

/// One row of the confusion matrix: how samples of `actual` were predicted.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct MatrixRow {
    pub actual: Priority,
    #[tabled(rename = "→ Critical")]
    pub critical: u64,
    #[tabled(rename = "→ High")]
    pub high: u64,
    #[tabled(rename = "→ Medium")]
    pub medium: u64,
    #[tabled(rename = "→ Low")]
    pub low: u64,
}

/// Confusion counts over the four labels, in [`Priority::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// `matrix[actual][predicted]`
    matrix: [[u64; 4]; 4],
}

fn slot(label: Priority) -> usize {
    Priority::ALL
        .iter()
        .position(|p| *p == label)
        .unwrap_or(Priority::ALL.len() - 1)
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl Evaluation {
    /// Record one prediction.
    pub fn record(&mut self, actual: Priority, predicted: Priority) {
        self.matrix[slot(actual)][slot(predicted)] += 1;
    }

    /// Number of recorded samples.
    pub fn total(&self) -> u64 {
        self.matrix.iter().flatten().sum()
    }

    /// Share of samples predicted correctly.
    pub fn accuracy(&self) -> f64 {
        let correct: u64 = (0..4).map(|i| self.matrix[i][i]).sum();
        ratio(correct, self.total())
    }

    /// Metrics per label. Undefined ratios are reported as zero.
    pub fn per_label(&self) -> Vec<LabelMetrics> {
        Priority::ALL
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let tp = self.matrix[i][i];
                let predicted: u64 = (0..4).map(|r| self.matrix[r][i]).sum();
                let support: u64 = self.matrix[i].iter().sum();
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                LabelMetrics {
                    label: *label,
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect()
    }

    /// The confusion matrix as printable rows.
    pub fn matrix_rows(&self) -> Vec<MatrixRow> {
        Priority::ALL
            .iter()
            .enumerate()
            .map(|(i, label)| MatrixRow {
                actual: *label,
                critical: self.matrix[i][0],
                high: self.matrix[i][1],
                medium: self.matrix[i][2],
                low: self.matrix[i][3],
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct Report {
    classifier: String,
    samples: u64,
    errors: u64,
    accuracy: f64,
    labels: Vec<LabelMetrics>,
    confusion_matrix: Vec<MatrixRow>,
}

async fn read_testset(path: &Path) -> Result<Vec<LabelledText>, AppError> {
    let format = TestsetFormat::from_path(path)?;
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to read test set '{}'", path.display()),
            e,
        )
    })?;
    parse_testset(&content, format)
}

/// Execute the evaluate command
pub async fn execute(
    args: &EvaluateArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut samples = read_testset(&args.testset).await?;
    if let Some(limit) = args.limit {
        samples.truncate(limit);
    }
    if samples.is_empty() {
        return Err(AppError::validation("Test set contains no samples"));
    }

    let enrichment = EnrichmentManager::new(&config.enrichment, &config.ocr)?;
    let classifier = enrichment.classifier();

    let mut evaluation = Evaluation::default();
    let mut errors = 0u64;
    for (i, sample) in samples.iter().enumerate() {
        match classifier.analyze(&sample.text).await {
            Ok(assessment) => evaluation.record(sample.label, assessment.priority),
            Err(e) => {
                errors += 1;
                tracing::warn!(sample = i + 1, error = %e, "Classifier failed; sample skipped");
            }
        }
    }

    let report = Report {
        classifier: classifier.name().to_string(),
        samples: evaluation.total(),
        errors,
        accuracy: evaluation.accuracy(),
        labels: evaluation.per_label(),
        confusion_matrix: evaluation.matrix_rows(),
    };

    match format {
        OutputFormat::Json => output::print_json(&report),
        OutputFormat::Table => {
            println!("Priority classification results:");
            output::print_kv("Classifier", &report.classifier);
            output::print_kv("Samples evaluated", &report.samples.to_string());
            if report.errors > 0 {
                output::print_warning(&format!("{} samples failed to classify", report.errors));
            }
            output::print_kv("Accuracy", &format!("{:.3}", report.accuracy));
            println!("\nClassification report:");
            output::print_list(&report.labels, format);
            println!("\nConfusion matrix (rows: actual):");
            output::print_list(&report.confusion_matrix, format);
        }
    }

    Ok(())
}
