use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a term. Ids come straight from the spreadsheet's
/// `ID` column and are normalized to uppercase so that lookups and
/// de-duplication stay case-insensitive.
pub type TermId = String;

/// One glossary entry describing a single crochet technique or tool.
///
/// All fields except [`Term::id`] are optional in the source data and default
/// to empty strings. Columns that are not part of the known mapping are
/// auto-captured into [`Term::extra`] under their lowercased header name, so
/// new spreadsheet columns survive the export without code changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Unique, uppercase-normalized identifier.
    pub id: TermId,
    /// Display name using US terminology.
    #[serde(default)]
    pub name_us: String,
    /// Display name using UK terminology. Defaults to [`Term::name_us`] when
    /// the source column is empty.
    #[serde(default)]
    pub name_uk: String,
    /// Coarse grouping label.
    #[serde(default)]
    pub category: String,
    /// Difficulty grade, either a small number (`0`–`5`) or a label.
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub description: String,
    /// Chart symbol for the stitch, if any.
    #[serde(default)]
    pub symbol: String,
    /// Step-by-step instruction text.
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub estimated_learning_time: String,
    #[serde(default)]
    pub best_use_cases: String,
    #[serde(default)]
    pub common_mistakes: String,
    #[serde(default)]
    pub pro_tips: String,
    #[serde(default)]
    pub hook_sizes: String,
    #[serde(default)]
    pub left_handed_note: String,
    #[serde(default)]
    pub abbreviation_us: String,
    #[serde(default)]
    pub abbreviation_uk: String,
    /// Free-form labels parsed from the comma-separated `Tags` column.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Auto-captured columns outside the known mapping, keyed by their
    /// lowercased header name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Term {
    /// Looks up a field by its normalized name, falling back to the
    /// auto-captured columns. `tags` renders as a comma-separated list. Used
    /// when mapping terms back onto spreadsheet columns.
    pub fn field_value(&self, field: &str) -> Option<String> {
        let value = match field {
            "id" => self.id.clone(),
            "name_us" => self.name_us.clone(),
            "name_uk" => self.name_uk.clone(),
            "category" => self.category.clone(),
            "difficulty" => self.difficulty.clone(),
            "description" => self.description.clone(),
            "symbol" => self.symbol.clone(),
            "instruction" => self.instruction.clone(),
            "status" => self.status.clone(),
            "priority" => self.priority.clone(),
            "estimated_learning_time" => self.estimated_learning_time.clone(),
            "best_use_cases" => self.best_use_cases.clone(),
            "common_mistakes" => self.common_mistakes.clone(),
            "pro_tips" => self.pro_tips.clone(),
            "hook_sizes" => self.hook_sizes.clone(),
            "left_handed_note" => self.left_handed_note.clone(),
            "abbreviation_us" => self.abbreviation_us.clone(),
            "abbreviation_uk" => self.abbreviation_uk.clone(),
            "tags" => self.tags.iter().cloned().collect::<Vec<_>>().join(", "),
            other => return self.extra.get(other).cloned(),
        };
        Some(value)
    }

    /// Creates an empty term with the provided identifier.
    pub fn new(id: impl Into<TermId>) -> Self {
        Self {
            id: id.into(),
            name_us: String::new(),
            name_uk: String::new(),
            category: String::new(),
            difficulty: String::new(),
            description: String::new(),
            symbol: String::new(),
            instruction: String::new(),
            status: String::new(),
            priority: String::new(),
            estimated_learning_time: String::new(),
            best_use_cases: String::new(),
            common_mistakes: String::new(),
            pro_tips: String::new(),
            hook_sizes: String::new(),
            left_handed_note: String::new(),
            abbreviation_us: String::new(),
            abbreviation_uk: String::new(),
            tags: BTreeSet::new(),
            extra: BTreeMap::new(),
        }
    }
}

/// Lightweight projection of a [`Term`] used by the `terms.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSummary {
    pub id: TermId,
    pub name_us: String,
    pub name_uk: String,
    pub category: String,
}

impl From<&Term> for TermSummary {
    fn from(term: &Term) -> Self {
        Self {
            id: term.id.clone(),
            name_us: term.name_us.clone(),
            name_uk: term.name_uk.clone(),
            category: term.category.clone(),
        }
    }
}

/// The quiz variants that can be derived from a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Instruction,
    MultipleChoice,
    Terminology,
    Abbreviation,
    Symbol,
    Definition,
}

/// A derived, testable fact generated from one [`Term`].
///
/// Free-answer variants carry [`QuizQuestion::answer`]; the multiple-choice
/// variant instead carries [`QuizQuestion::choices`] together with
/// [`QuizQuestion::correct_answer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub category: String,
    pub difficulty: String,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    /// Back-reference to the term this question was generated from.
    pub term_id: TermId,
    pub points: u32,
}

/// Versioned envelope for the full glossary document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryDocument {
    pub version: String,
    pub last_updated: DateTime<Utc>,
    pub total_terms: usize,
    pub terms: Vec<Term>,
    /// Deduplicated, lowercased set of display names used for text lookup.
    pub search_index: Vec<String>,
}

/// Category summary plus the full grouping of terms by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriesDocument {
    pub categories: BTreeMap<String, usize>,
    pub terms_by_category: BTreeMap<String, Vec<Term>>,
}

/// All generated quiz questions with summary counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizDocument {
    pub total_questions: usize,
    /// Sorted distinct categories appearing in the questions.
    pub categories: Vec<String>,
    pub questions: Vec<QuizQuestion>,
}

/// A difficulty-graded bundle of quiz questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizPackage {
    pub name: String,
    pub description: String,
    pub total_questions: usize,
    pub total_points: u32,
    pub questions: Vec<QuizQuestion>,
}
