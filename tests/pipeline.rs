use chrono::Utc;
use glossary_tools::io::{sheet_read, sheet_write};
use glossary_tools::normalize::normalize_rows;
use glossary_tools::sync::{self, ExportConfig};
use glossary_tools::{documents, model::Term};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use tempfile::tempdir;

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}

#[test]
fn duplicate_ids_keep_first_occurrence() {
    let headers = headers(&["ID", "Name_US", "Name_UK", "Category", "Tags"]);
    let rows = vec![
        row(&["SC", "Single Crochet", "Single Crochet", "Basic", "easy, beginner"]),
        row(&["SC", "Duplicate", "Duplicate", "Basic", ""]),
    ];

    let report = normalize_rows(&headers, &rows);

    assert_eq!(report.terms.len(), 1);
    let term = &report.terms[0];
    assert_eq!(term.id, "SC");
    assert_eq!(term.name_us, "Single Crochet");
    let tags: Vec<&str> = term.tags.iter().map(String::as_str).collect();
    assert_eq!(tags, vec!["beginner", "easy"]);
    assert_eq!(report.skipped_duplicates, vec!["SC".to_string()]);
}

#[test]
fn duplicate_detection_is_case_insensitive() {
    let headers = headers(&["ID", "Name_US"]);
    let rows = vec![row(&["sc", "Single Crochet"]), row(&["SC", "Other Name"])];

    let report = normalize_rows(&headers, &rows);

    assert_eq!(report.terms.len(), 1);
    assert_eq!(report.terms[0].id, "SC");
    assert_eq!(report.terms[0].name_us, "Single Crochet");
    assert_eq!(report.skipped_duplicates.len(), 1);
}

#[test]
fn short_rows_never_contribute_terms() {
    let headers = headers(&["ID", "Name_US", "Category"]);
    let rows = vec![
        row(&["CH"]),
        row(&[]),
        row(&["DC", "Double Crochet", "Basic"]),
    ];

    let report = normalize_rows(&headers, &rows);

    assert_eq!(report.terms.len(), 1);
    assert_eq!(report.terms[0].id, "DC");
}

#[test]
fn ragged_rows_resolve_to_defaults() {
    let headers = headers(&["ID", "Name_US", "Name_UK", "Category", "Difficulty"]);
    let rows = vec![row(&["TR", "Treble Crochet"])];

    let report = normalize_rows(&headers, &rows);

    assert_eq!(report.terms.len(), 1);
    let term = &report.terms[0];
    assert_eq!(term.name_uk, "Treble Crochet");
    assert_eq!(term.category, "Other");
    assert_eq!(term.difficulty, "");
}

#[test]
fn name_uk_defaults_to_name_us_only_when_empty() {
    let headers = headers(&["ID", "Name_US", "Name_UK"]);
    let rows = vec![
        row(&["SC", "Single Crochet", "Double Crochet"]),
        row(&["CH", "Chain", ""]),
    ];

    let report = normalize_rows(&headers, &rows);

    assert_eq!(report.terms[0].name_uk, "Double Crochet");
    assert_eq!(report.terms[1].name_uk, "Chain");
}

#[test]
fn tags_drop_empty_entries() {
    let headers = headers(&["ID", "Name_US", "Tags"]);
    let rows = vec![row(&["SC", "Single Crochet", "a, b ,,c"])];

    let report = normalize_rows(&headers, &rows);

    let tags: Vec<&str> = report.terms[0].tags.iter().map(String::as_str).collect();
    assert_eq!(tags, vec!["a", "b", "c"]);
}

#[test]
fn unknown_headers_are_auto_captured() {
    let headers = headers(&["ID", "Name_US", "Yarn_Weight", "Time_To_Learn"]);
    let rows = vec![row(&["SC", "Single Crochet", "worsted", "5 minutes"])];

    let report = normalize_rows(&headers, &rows);

    let term = &report.terms[0];
    assert_eq!(term.extra.get("yarn_weight"), Some(&"worsted".to_string()));
    // Known headers map through the static table, not the fallback.
    assert_eq!(term.estimated_learning_time, "5 minutes");
    assert!(!term.extra.contains_key("time_to_learn"));
}

#[test]
fn rows_without_any_name_are_reported_incomplete() {
    let headers = headers(&["ID", "Name_US", "Name_UK", "Category"]);
    let rows = vec![row(&["SC", "", "", "Basic"]), row(&["CH", "Chain", "", ""])];

    let report = normalize_rows(&headers, &rows);

    assert_eq!(report.terms.len(), 1);
    assert_eq!(report.terms[0].id, "CH");
    assert_eq!(report.skipped_incomplete, vec!["SC".to_string()]);
}

#[test]
fn terms_and_glossary_agree_on_ids_and_order() {
    let headers = headers(&["ID", "Name_US"]);
    let rows = vec![
        row(&["SC", "Single Crochet"]),
        row(&["DC", "Double Crochet"]),
        row(&["CH", "Chain"]),
    ];
    let report = normalize_rows(&headers, &rows);

    let summaries = documents::term_summaries(&report.terms);
    let glossary = documents::glossary_document(&report.terms, Utc::now());

    let summary_ids: Vec<&str> = summaries.iter().map(|term| term.id.as_str()).collect();
    let glossary_ids: Vec<&str> = glossary.terms.iter().map(|term| term.id.as_str()).collect();
    assert_eq!(summary_ids, glossary_ids);
    assert_eq!(glossary.total_terms, 3);
}

#[test]
fn search_index_is_lowercase_and_deduplicated() {
    let mut first = Term::new("SC");
    first.name_us = "Single Crochet".to_string();
    first.name_uk = "Double Crochet".to_string();
    let mut second = Term::new("DC");
    second.name_us = "Double Crochet".to_string();
    second.name_uk = "Treble Crochet".to_string();

    let index = documents::search_index(&[first, second]);

    assert_eq!(
        index,
        vec!["double crochet", "single crochet", "treble crochet"]
    );
    assert!(index.iter().all(|entry| entry == &entry.to_lowercase()));
}

#[test]
fn category_counts_sum_to_categorized_terms() {
    let mut basic = Term::new("SC");
    basic.name_us = "Single Crochet".to_string();
    basic.category = "Basic".to_string();
    let mut tools = Term::new("HOOK");
    tools.name_us = "Hook".to_string();
    tools.category = "Tools".to_string();
    let mut second_basic = Term::new("DC");
    second_basic.name_us = "Double Crochet".to_string();
    second_basic.category = "Basic".to_string();
    let mut uncategorized = Term::new("MYSTERY");
    uncategorized.name_us = "Mystery".to_string();

    let terms = vec![basic, tools, second_basic, uncategorized];
    let document = documents::categories_document(&terms);

    let counted: usize = document.categories.values().sum();
    let categorized = terms.iter().filter(|term| !term.category.is_empty()).count();
    assert_eq!(counted, categorized);
    assert_eq!(document.categories.get("Basic"), Some(&2));
    assert_eq!(document.terms_by_category["Basic"].len(), 2);
    assert!(!document.terms_by_category.contains_key(""));
}

#[test]
fn quiz_document_term_ids_reference_input_terms() {
    let headers = headers(&["ID", "Name_US", "Name_UK", "Category", "Instruction", "Symbol"]);
    let rows = vec![
        row(&["SC", "Single Crochet", "Double Crochet", "Basic", "Insert hook, pull up a loop", "x"]),
        row(&["CH", "Chain", "", "Basic", "Yarn over, pull through", ""]),
    ];
    let report = normalize_rows(&headers, &rows);

    let mut rng = StdRng::seed_from_u64(7);
    let quiz = documents::quiz_document(&report.terms, &mut rng);

    assert_eq!(quiz.total_questions, quiz.questions.len());
    for question in &quiz.questions {
        assert!(report.terms.iter().any(|term| term.id == question.term_id));
    }
    let mut categories = quiz.categories.clone();
    categories.dedup();
    assert_eq!(categories, quiz.categories);
}

#[test]
fn export_writes_all_five_documents() {
    let temp_dir = tempdir().expect("temporary directory");
    let workbook = temp_dir.path().join("glossary.xlsx");

    let headers = headers(&["ID", "Name_US", "Name_UK", "Category", "Tags", "Instruction"]);
    let rows = vec![
        row(&["SC", "Single Crochet", "Double Crochet", "Basic", "easy", "Insert hook, pull up a loop"]),
        row(&["CH", "Chain", "", "Basic", "easy, beginner", ""]),
        row(&["sc", "Duplicate", "", "Basic", "", ""]),
    ];
    sheet_write::write_sheet(&workbook, "Sheet1", &headers, &rows).expect("workbook written");

    let output_dir = temp_dir.path().join("api");
    let config = ExportConfig {
        input: workbook,
        sheet_name: "Sheet1".to_string(),
        output_dir: output_dir.clone(),
    };
    let summary = sync::export(&config).expect("export succeeded");

    assert_eq!(summary.total_terms, 2);
    assert_eq!(summary.skipped_duplicates, 1);

    for name in [
        "terms.json",
        "glossary.json",
        "categories.json",
        "quiz.json",
        "api-info.json",
    ] {
        assert!(output_dir.join(name).exists(), "missing {name}");
    }

    let terms: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join("terms.json")).unwrap()).unwrap();
    let glossary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join("glossary.json")).unwrap())
            .unwrap();

    let term_ids: Vec<&str> = terms
        .as_array()
        .unwrap()
        .iter()
        .map(|term| term["id"].as_str().unwrap())
        .collect();
    let glossary_ids: Vec<&str> = glossary["terms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|term| term["id"].as_str().unwrap())
        .collect();
    assert_eq!(term_ids, glossary_ids);
    assert_eq!(glossary["total_terms"], 2);
}

#[test]
fn exported_workbook_roundtrips_through_reader() {
    let temp_dir = tempdir().expect("temporary directory");
    let workbook = temp_dir.path().join("glossary.xlsx");

    let headers = headers(&["ID", "Name_US", "Category"]);
    let rows = vec![row(&["SC", "Single Crochet", "Basic"])];
    sheet_write::write_sheet(&workbook, "Sheet1", &headers, &rows).expect("workbook written");

    let sheet = sheet_read::read_sheet(&workbook, "Sheet1").expect("workbook read");
    assert_eq!(sheet.headers, headers);
    assert_eq!(sheet.rows, rows);
}

#[test]
fn a_failed_document_write_does_not_stop_the_others() {
    let temp_dir = tempdir().expect("temporary directory");
    let workbook = temp_dir.path().join("glossary.xlsx");

    let headers = headers(&["ID", "Name_US", "Category"]);
    let rows = vec![row(&["SC", "Single Crochet", "Basic"])];
    sheet_write::write_sheet(&workbook, "Sheet1", &headers, &rows).expect("workbook written");

    // A directory squatting on glossary.json makes that single write fail.
    let output_dir = temp_dir.path().join("api");
    fs::create_dir_all(output_dir.join("glossary.json")).expect("blocking directory created");

    let config = ExportConfig {
        input: workbook,
        sheet_name: "Sheet1".to_string(),
        output_dir: output_dir.clone(),
    };
    let error = sync::export(&config).expect_err("export reported the failed document");
    assert!(error.to_string().contains("glossary.json"));

    for name in ["terms.json", "categories.json", "quiz.json", "api-info.json"] {
        assert!(
            output_dir.join(name).is_file(),
            "{name} was not written despite the glossary.json failure"
        );
    }
}

#[test]
fn append_terms_deduplicates_within_the_input() {
    let temp_dir = tempdir().expect("temporary directory");
    let workbook = temp_dir.path().join("glossary.xlsx");

    let headers = headers(&["ID", "Name_US", "Category"]);
    let rows = vec![row(&["SC", "Single Crochet", "Basic"])];
    sheet_write::write_sheet(&workbook, "Sheet1", &headers, &rows).expect("workbook written");

    let mut first = Term::new("PICOT");
    first.name_us = "Picot".to_string();
    let mut repeat = Term::new("picot");
    repeat.name_us = "Picot Again".to_string();

    let terms_file = temp_dir.path().join("new_terms.json");
    fs::write(
        &terms_file,
        serde_json::to_string_pretty(&vec![first, repeat]).unwrap(),
    )
    .expect("terms file written");

    let summary = sync::append_terms(&workbook, "Sheet1", &terms_file).expect("append succeeded");
    assert_eq!(summary.appended, 1);
    assert_eq!(summary.skipped_existing, 1);

    let sheet = sheet_read::read_sheet(&workbook, "Sheet1").expect("workbook read");
    let picot_rows = sheet
        .rows
        .iter()
        .filter(|row| row[0].eq_ignore_ascii_case("PICOT"))
        .count();
    assert_eq!(picot_rows, 1);
}

#[test]
fn append_terms_skips_existing_ids() {
    let temp_dir = tempdir().expect("temporary directory");
    let workbook = temp_dir.path().join("glossary.xlsx");

    let headers = headers(&["ID", "Name_US", "Name_UK", "Category", "Tags"]);
    let rows = vec![row(&["SC", "Single Crochet", "", "Basic", ""])];
    sheet_write::write_sheet(&workbook, "Sheet1", &headers, &rows).expect("workbook written");

    let mut existing = Term::new("SC");
    existing.name_us = "Single Crochet".to_string();
    let mut fresh = Term::new("YARNBOWL");
    fresh.name_us = "Yarn Bowl".to_string();
    fresh.category = "Tools".to_string();
    fresh.tags = ["tools", "organization"].iter().map(|t| t.to_string()).collect();

    let terms_file = temp_dir.path().join("new_terms.json");
    fs::write(
        &terms_file,
        serde_json::to_string_pretty(&vec![existing, fresh]).unwrap(),
    )
    .expect("terms file written");

    let summary = sync::append_terms(&workbook, "Sheet1", &terms_file).expect("append succeeded");
    assert_eq!(summary.appended, 1);
    assert_eq!(summary.skipped_existing, 1);

    let sheet = sheet_read::read_sheet(&workbook, "Sheet1").expect("workbook read");
    assert_eq!(sheet.rows.len(), 2);
    assert_eq!(sheet.rows[1][0], "YARNBOWL");
    assert_eq!(sheet.rows[1][3], "Tools");
    assert_eq!(sheet.rows[1][4], "organization, tools");
}
