use std::collections::{BTreeSet, HashSet};

use crate::glossary::model::{Term, TermId};

/// Category assigned to terms whose `Category` cell is empty.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Static mapping from known spreadsheet headers to term field names. Headers
/// outside this table are auto-captured under their lowercased name.
const FIELD_MAPPING: &[(&str, &str)] = &[
    ("Status", "status"),
    ("Symbol", "symbol"),
    ("Category", "category"),
    ("Tags", "tags"),
    ("Description", "description"),
    ("Priority", "priority"),
    ("Difficulty", "difficulty"),
    ("Instruction", "instruction"),
    ("Time_To_Learn", "estimated_learning_time"),
    ("Best_For", "best_use_cases"),
    ("Common_Mistakes", "common_mistakes"),
    ("Pro_Tips", "pro_tips"),
    ("Hook_Sizes", "hook_sizes"),
    ("Left_Handed_Note", "left_handed_note"),
    ("Abbrev_US", "abbreviation_us"),
    ("Abbrev_UK", "abbreviation_uk"),
];

/// Outcome of normalizing a sheet's rows into terms.
///
/// Skipped rows are reported, never fatal: the run continues with whatever
/// terms survived.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NormalizeReport {
    /// Accepted terms, in source-row order.
    pub terms: Vec<Term>,
    /// Ids dropped because an earlier row already claimed them.
    pub skipped_duplicates: Vec<TermId>,
    /// Ids dropped because both name fields were empty.
    pub skipped_incomplete: Vec<TermId>,
}

/// Normalizes raw sheet rows into [`Term`] records.
///
/// Rows may be shorter than the header row; missing cells resolve to the
/// field's default. Rows with fewer than two cells are treated as blank
/// separators and skipped. Rows without an `ID` value are omitted, and later
/// rows repeating an already-seen id (case-insensitive) are dropped with the
/// first occurrence winning.
pub fn normalize_rows(headers: &[String], rows: &[Vec<String>]) -> NormalizeReport {
    let id_column = find_column(headers, "ID");
    let name_us_column = find_column(headers, "Name_US");
    let name_uk_column = find_column(headers, "Name_UK");

    let mut report = NormalizeReport::default();
    let mut seen_ids: HashSet<TermId> = HashSet::new();

    for row in rows {
        // Fewer than two cells is a blank separator row, not data.
        if row.len() < 2 {
            continue;
        }

        let id = cell_value(row, id_column).trim().to_uppercase();
        if id.is_empty() {
            continue;
        }

        let mut term = Term::new(id.clone());
        term.name_us = cell_value(row, name_us_column).trim().to_string();
        term.name_uk = cell_value(row, name_uk_column).trim().to_string();
        if term.name_uk.is_empty() {
            term.name_uk = term.name_us.clone();
        }

        for (index, header) in headers.iter().enumerate() {
            if matches!(header.as_str(), "ID" | "Name_US" | "Name_UK") {
                continue;
            }
            let value = cell_value(row, Some(index)).trim().to_string();
            apply_field(&mut term, resolve_field(header), value);
        }

        if term.category.is_empty() {
            term.category = FALLBACK_CATEGORY.to_string();
        }

        if term.name_us.is_empty() && term.name_uk.is_empty() {
            report.skipped_incomplete.push(id);
            continue;
        }

        if !seen_ids.insert(id.clone()) {
            report.skipped_duplicates.push(id);
            continue;
        }

        report.terms.push(term);
    }

    report
}

/// Two-tier header resolution: the static table first, then a lowercasing
/// fallback for unknown columns.
pub fn resolve_field(header: &str) -> String {
    FIELD_MAPPING
        .iter()
        .find(|(name, _)| *name == header)
        .map(|(_, field)| (*field).to_string())
        .unwrap_or_else(|| header.to_lowercase())
}

fn apply_field(term: &mut Term, field: String, value: String) {
    match field.as_str() {
        "status" => term.status = value,
        "symbol" => term.symbol = value,
        "category" => term.category = value,
        "tags" => term.tags = parse_tags(&value),
        "description" => term.description = value,
        "priority" => term.priority = value,
        "difficulty" => term.difficulty = value,
        "instruction" => term.instruction = value,
        "estimated_learning_time" => term.estimated_learning_time = value,
        "best_use_cases" => term.best_use_cases = value,
        "common_mistakes" => term.common_mistakes = value,
        "pro_tips" => term.pro_tips = value,
        "hook_sizes" => term.hook_sizes = value,
        "left_handed_note" => term.left_handed_note = value,
        "abbreviation_us" => term.abbreviation_us = value,
        "abbreviation_uk" => term.abbreviation_uk = value,
        _ => {
            term.extra.insert(field, value);
        }
    }
}

/// Splits a comma-separated tags cell, trimming entries and dropping empties.
fn parse_tags(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|header| header == name)
}

fn cell_value(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|index| row.get(index))
        .map(String::as_str)
        .unwrap_or_default()
}
