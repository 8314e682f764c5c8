//! Orchestration of the export, quiz-regeneration, and append operations.
//!
//! Each public function is one complete run: it reads its input, drives the
//! pure transformation modules, and persists the results. Output documents
//! are written independently so a single failed write never prevents the
//! remaining documents from being attempted; the failures are collected and
//! reported together.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::glossary::documents;
use crate::glossary::error::{Result, ToolError};
use crate::glossary::io::{sheet_read, sheet_write};
use crate::glossary::model::{GlossaryDocument, Term};
use crate::glossary::normalize;
use crate::glossary::quiz;

/// Worksheet read when none is configured.
pub const DEFAULT_SHEET: &str = "Sheet1";
/// Package file whose timestamp stands in for the whole derived quiz set.
const FRESHNESS_MARKER: &str = "intermediate_pack.json";

/// Configuration for one export run. Paths and the worksheet name are
/// explicit here rather than module-level constants so callers (CLI, tests)
/// own the wiring.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub input: PathBuf,
    pub sheet_name: String,
    pub output_dir: PathBuf,
}

/// Configuration for a quiz-regeneration run.
#[derive(Debug, Clone)]
pub struct QuizConfig {
    pub glossary: PathBuf,
    pub output_dir: PathBuf,
    /// Regenerate even when the derived files are newer than the glossary.
    pub force: bool,
}

/// Counters reported after a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub total_terms: usize,
    pub total_questions: usize,
    pub skipped_duplicates: usize,
    pub skipped_incomplete: usize,
}

/// Counters reported after a quiz run. `regenerated` is false when the
/// freshness check decided the existing packages were current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub regenerated: bool,
    pub total_questions: usize,
    pub total_packages: usize,
}

/// Counters reported after appending terms to a workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendSummary {
    pub appended: usize,
    pub skipped_existing: usize,
}

/// Runs the full spreadsheet → five-document export.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %config.input.display(), output = %config.output_dir.display())
)]
pub fn export(config: &ExportConfig) -> Result<ExportSummary> {
    let sheet = sheet_read::read_sheet(&config.input, &config.sheet_name)?;
    info!(
        header_count = sheet.headers.len(),
        row_count = sheet.rows.len(),
        "read sheet data"
    );

    let report = normalize::normalize_rows(&sheet.headers, &sheet.rows);
    for id in &report.skipped_duplicates {
        warn!(%id, "skipping duplicate term");
    }
    for id in &report.skipped_incomplete {
        warn!(%id, "skipping term without any name");
    }

    let generated_at = Utc::now();
    let mut rng = rand::rng();

    let glossary = documents::glossary_document(&report.terms, generated_at);
    let quiz = documents::quiz_document(&report.terms, &mut rng);
    let total_questions = quiz.total_questions;

    let outputs = vec![
        (
            "terms.json".to_string(),
            to_pretty(&documents::term_summaries(&report.terms))?,
        ),
        ("glossary.json".to_string(), to_pretty(&glossary)?),
        (
            "categories.json".to_string(),
            to_pretty(&documents::categories_document(&report.terms))?,
        ),
        ("quiz.json".to_string(), to_pretty(&quiz)?),
        (
            "api-info.json".to_string(),
            to_pretty(&documents::api_info_document(&report.terms, generated_at))?,
        ),
    ];

    fs::create_dir_all(&config.output_dir)?;
    write_documents(&config.output_dir, &outputs)?;

    info!(
        term_count = report.terms.len(),
        question_count = total_questions,
        "export complete"
    );

    Ok(ExportSummary {
        total_terms: report.terms.len(),
        total_questions,
        skipped_duplicates: report.skipped_duplicates.len(),
        skipped_incomplete: report.skipped_incomplete.len(),
    })
}

/// Regenerates the difficulty-graded quiz packages from an exported
/// `glossary.json`, unless the packages are already newer than the glossary.
#[instrument(
    level = "info",
    skip_all,
    fields(glossary = %config.glossary.display(), output = %config.output_dir.display())
)]
pub fn generate_quizzes(config: &QuizConfig) -> Result<QuizSummary> {
    if !config.glossary.exists() {
        return Err(ToolError::MissingInput(config.glossary.clone()));
    }

    let source_version = modified_time(&config.glossary);
    let derived_version = modified_time(&config.output_dir.join(FRESHNESS_MARKER));
    if !config.force && !needs_regeneration(source_version, derived_version) {
        info!("quiz packages are up to date, skipping generation");
        return Ok(QuizSummary {
            regenerated: false,
            total_questions: 0,
            total_packages: 0,
        });
    }

    let source = fs::read_to_string(&config.glossary)?;
    let glossary: GlossaryDocument = serde_json::from_str(&source)?;
    info!(term_count = glossary.terms.len(), "loaded glossary data");

    let mut rng = rand::rng();
    let questions = quiz::generate_questions(&glossary.terms, &mut rng);
    let packages = quiz::build_packages(&questions, &mut rng);
    let stats = quiz::quiz_stats(&glossary.terms, &questions, &packages);
    debug!(package_count = packages.len(), "quiz packages built");

    let mut outputs: Vec<(String, String)> = Vec::new();
    for (key, package) in &packages {
        outputs.push((format!("{key}.json"), to_pretty(package)?));
    }
    outputs.push(("quiz_stats.json".to_string(), to_pretty(&stats)?));

    fs::create_dir_all(&config.output_dir)?;
    write_documents(&config.output_dir, &outputs)?;

    info!(
        question_count = questions.len(),
        package_count = packages.len(),
        "quiz generation complete"
    );

    Ok(QuizSummary {
        regenerated: true,
        total_questions: questions.len(),
        total_packages: packages.len(),
    })
}

/// Appends new terms (a JSON array of term objects) to the source workbook,
/// skipping ids that already exist in the sheet.
#[instrument(
    level = "info",
    skip_all,
    fields(workbook = %workbook.display(), terms = %terms_file.display())
)]
pub fn append_terms(workbook: &Path, sheet_name: &str, terms_file: &Path) -> Result<AppendSummary> {
    if !terms_file.exists() {
        return Err(ToolError::MissingInput(terms_file.to_path_buf()));
    }

    let source = fs::read_to_string(terms_file)?;
    let new_terms: Vec<Term> = serde_json::from_str(&source)?;

    let mut sheet = sheet_read::read_sheet(workbook, sheet_name)?;
    let id_column = sheet
        .headers
        .iter()
        .position(|header| header == "ID")
        .ok_or_else(|| ToolError::InvalidWorkbook("missing 'ID' column".to_string()))?;

    let mut existing: Vec<String> = sheet
        .rows
        .iter()
        .filter_map(|row| row.get(id_column))
        .map(|id| id.trim().to_uppercase())
        .collect();

    let mut appended = 0;
    let mut skipped_existing = 0;
    for term in &new_terms {
        let id = term.id.trim().to_uppercase();
        if id.is_empty() {
            continue;
        }
        if existing.contains(&id) {
            warn!(%id, "skipping term already present in workbook");
            skipped_existing += 1;
            continue;
        }
        sheet.rows.push(term_to_row(term, &sheet.headers));
        existing.push(id);
        appended += 1;
    }

    if appended > 0 {
        sheet_write::write_sheet(workbook, sheet_name, &sheet.headers, &sheet.rows)?;
    }
    info!(appended, skipped_existing, "append complete");

    Ok(AppendSummary {
        appended,
        skipped_existing,
    })
}

/// Freshness check: regeneration is needed when the derived artifact is
/// missing, the source timestamp is unknown, or the derived artifact is
/// older than the source.
pub fn needs_regeneration(
    source_version: Option<SystemTime>,
    derived_version: Option<SystemTime>,
) -> bool {
    match (source_version, derived_version) {
        (Some(source), Some(derived)) => derived < source,
        _ => true,
    }
}

/// Writes each document independently, collecting per-document failures so
/// one bad write does not abort the rest.
fn write_documents(output_dir: &Path, outputs: &[(String, String)]) -> Result<()> {
    let mut failed: Vec<String> = Vec::new();
    for (name, body) in outputs {
        let path = output_dir.join(name);
        match fs::write(&path, body) {
            Ok(()) => debug!(document = %name, "wrote document"),
            Err(cause) => {
                error!(document = %name, %cause, "failed to write document");
                failed.push(name.clone());
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(ToolError::PartialWrite { documents: failed })
    }
}

fn term_to_row(term: &Term, headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|header| {
            let field = match header.as_str() {
                "ID" => "id".to_string(),
                "Name_US" => "name_us".to_string(),
                "Name_UK" => "name_uk".to_string(),
                other => normalize::resolve_field(other),
            };
            term.field_value(&field).unwrap_or_default()
        })
        .collect()
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

fn to_pretty<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
