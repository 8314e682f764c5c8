//! Builders for the five exported documents.
//!
//! Every builder is a pure projection of the normalized term sequence: given
//! the same terms, timestamp, and RNG seed they produce identical documents.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::{Value, json};

use crate::glossary::model::{CategoriesDocument, GlossaryDocument, QuizDocument, Term, TermSummary};
use crate::glossary::quiz;

/// Schema version stamped into the glossary envelope.
pub const GLOSSARY_VERSION: &str = "1.0";

/// Lightweight projection for `terms.json`, preserving term order.
pub fn term_summaries(terms: &[Term]) -> Vec<TermSummary> {
    terms.iter().map(TermSummary::from).collect()
}

/// Full glossary envelope for `glossary.json`, including the search index.
pub fn glossary_document(terms: &[Term], generated_at: DateTime<Utc>) -> GlossaryDocument {
    GlossaryDocument {
        version: GLOSSARY_VERSION.to_string(),
        last_updated: generated_at,
        total_terms: terms.len(),
        terms: terms.to_vec(),
        search_index: search_index(terms),
    }
}

/// Lowercased union of both display names across all terms, deduplicated and
/// sorted. Empty names are not indexed.
pub fn search_index(terms: &[Term]) -> Vec<String> {
    let mut index = BTreeSet::new();
    for term in terms {
        for name in [&term.name_us, &term.name_uk] {
            if !name.is_empty() {
                index.insert(name.to_lowercase());
            }
        }
    }
    index.into_iter().collect()
}

/// Category summary and grouping for `categories.json`. A single pass appends
/// each term to the bucket named by its category, creating the bucket on
/// first sight; terms with an empty category are left out.
pub fn categories_document(terms: &[Term]) -> CategoriesDocument {
    let mut terms_by_category: BTreeMap<String, Vec<Term>> = BTreeMap::new();
    for term in terms {
        if term.category.is_empty() {
            continue;
        }
        terms_by_category
            .entry(term.category.clone())
            .or_default()
            .push(term.clone());
    }

    let categories = terms_by_category
        .iter()
        .map(|(category, grouped)| (category.clone(), grouped.len()))
        .collect();

    CategoriesDocument {
        categories,
        terms_by_category,
    }
}

/// Applies every quiz rule to every term and wraps the result for
/// `quiz.json`.
pub fn quiz_document<R: Rng>(terms: &[Term], rng: &mut R) -> QuizDocument {
    let questions = quiz::generate_questions(terms, rng);

    let mut categories: Vec<String> = questions
        .iter()
        .map(|question| question.category.clone())
        .collect();
    categories.sort();
    categories.dedup();

    QuizDocument {
        total_questions: questions.len(),
        categories,
        questions,
    }
}

/// Static manifest for `api-info.json` describing the other documents plus a
/// few aggregate counters.
pub fn api_info_document(terms: &[Term], generated_at: DateTime<Utc>) -> Value {
    let terms_with_instructions = terms
        .iter()
        .filter(|term| !term.instruction.is_empty())
        .count();

    json!({
        "name": "Crochet Glossary API",
        "version": GLOSSARY_VERSION,
        "description": "Comprehensive crochet terminology API with instructions",
        "endpoints": {
            "terms.json": "Lightweight list of all terms",
            "glossary.json": "Complete glossary with full data",
            "categories.json": "Terms organized by category",
            "quiz.json": "Quiz questions and answers",
            "api-info.json": "This documentation",
        },
        "example_usage": {
            "get_all_terms": "curl <base_url>/terms.json",
            "get_complete_data": "curl <base_url>/glossary.json",
        },
        "total_terms": terms.len(),
        "terms_with_instructions": terms_with_instructions,
        "last_updated": generated_at.to_rfc3339(),
    })
}
