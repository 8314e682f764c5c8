//! Quiz-generation rules and difficulty-graded packaging.
//!
//! Each rule is a pure function from one [`Term`] to at most one
//! [`QuizQuestion`]; rules are independent and composed by
//! [`generate_questions`]. The multiple-choice rule and the master package
//! sample without replacement, so every randomised entry point takes a caller
//! supplied [`Rng`] and tests can seed a deterministic one.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::glossary::model::{QuestionKind, QuizPackage, QuizQuestion, Term};

/// Number of distractor instructions required before a multiple-choice
/// question is emitted.
pub const DISTRACTOR_COUNT: usize = 3;
/// Upper bound on the master challenge sample.
pub const MASTER_PACK_SIZE: usize = 50;

const BEGINNER_PACK_CAP: usize = 20;
const INTERMEDIATE_PACK_CAP: usize = 25;
const ADVANCED_PACK_CAP: usize = 30;

/// Applies every quiz rule to every term and collects the results in term
/// order (rule order within a term: instruction, multiple choice,
/// terminology, abbreviation, symbol, definition).
pub fn generate_questions<R: Rng>(terms: &[Term], rng: &mut R) -> Vec<QuizQuestion> {
    let mut questions = Vec::new();

    for term in terms {
        let peers: Vec<&Term> = terms
            .iter()
            .filter(|peer| {
                peer.id != term.id
                    && peer.category == term.category
                    && !peer.instruction.is_empty()
                    && peer.instruction != term.instruction
            })
            .collect();

        questions.extend(instruction_question(term));
        questions.extend(multiple_choice_question(term, &peers, rng));
        questions.extend(terminology_question(term));
        questions.extend(abbreviation_question(term));
        questions.extend(symbol_question(term));
        questions.extend(definition_question(term));
    }

    questions
}

/// Recall question for the term's instruction text.
pub fn instruction_question(term: &Term) -> Option<QuizQuestion> {
    if term.instruction.is_empty() {
        return None;
    }
    Some(QuizQuestion {
        id: format!("inst_{}", term.id),
        kind: QuestionKind::Instruction,
        category: term.category.clone(),
        difficulty: difficulty_or_default(term),
        question: format!("How do you make a {}?", term.name_us),
        answer: Some(term.instruction.clone()),
        choices: None,
        correct_answer: None,
        term_id: term.id.clone(),
        points: 10,
    })
}

/// Multiple-choice variant of the instruction question. Requires at least
/// [`DISTRACTOR_COUNT`] same-category peers with a different, non-empty
/// instruction; the distractors are sampled from those peers without
/// replacement and the combined choices are shuffled, so callers must not
/// rely on the correct answer's position.
pub fn multiple_choice_question<R: Rng>(
    term: &Term,
    peers: &[&Term],
    rng: &mut R,
) -> Option<QuizQuestion> {
    if term.instruction.is_empty() || peers.len() < DISTRACTOR_COUNT {
        return None;
    }

    let mut distractors: Vec<String> = peers.iter().map(|peer| peer.instruction.clone()).collect();
    distractors.shuffle(rng);
    distractors.truncate(DISTRACTOR_COUNT);

    let mut choices = distractors;
    choices.push(term.instruction.clone());
    choices.shuffle(rng);

    Some(QuizQuestion {
        id: format!("mc_{}", term.id),
        kind: QuestionKind::MultipleChoice,
        category: term.category.clone(),
        difficulty: difficulty_or_default(term),
        question: format!("What is the correct instruction for {}?", term.name_us),
        answer: None,
        choices: Some(choices),
        correct_answer: Some(term.instruction.clone()),
        term_id: term.id.clone(),
        points: 15,
    })
}

/// US-vs-UK terminology question, emitted only when the two names differ.
pub fn terminology_question(term: &Term) -> Option<QuizQuestion> {
    if term.name_uk.is_empty() || term.name_uk == term.name_us {
        return None;
    }
    Some(QuizQuestion {
        id: format!("uk_{}", term.id),
        kind: QuestionKind::Terminology,
        category: "US_vs_UK".to_string(),
        difficulty: "Intermediate".to_string(),
        question: format!("What is the UK term for '{}'?", term.name_us),
        answer: Some(term.name_uk.clone()),
        choices: None,
        correct_answer: None,
        term_id: term.id.clone(),
        points: 5,
    })
}

pub fn abbreviation_question(term: &Term) -> Option<QuizQuestion> {
    if term.abbreviation_us.is_empty() {
        return None;
    }
    Some(QuizQuestion {
        id: format!("abbrev_{}", term.id),
        kind: QuestionKind::Abbreviation,
        category: term.category.clone(),
        difficulty: "Beginner".to_string(),
        question: format!("What does '{}' stand for?", term.abbreviation_us),
        answer: Some(term.name_us.clone()),
        choices: None,
        correct_answer: None,
        term_id: term.id.clone(),
        points: 5,
    })
}

pub fn symbol_question(term: &Term) -> Option<QuizQuestion> {
    if term.symbol.is_empty() {
        return None;
    }
    Some(QuizQuestion {
        id: format!("symbol_{}", term.id),
        kind: QuestionKind::Symbol,
        category: "Symbols".to_string(),
        difficulty: "Advanced".to_string(),
        question: format!("What stitch does this symbol represent: {}?", term.symbol),
        answer: Some(term.name_us.clone()),
        choices: None,
        correct_answer: None,
        term_id: term.id.clone(),
        points: 10,
    })
}

pub fn definition_question(term: &Term) -> Option<QuizQuestion> {
    if term.description.is_empty() {
        return None;
    }
    Some(QuizQuestion {
        id: format!("def_{}", term.id),
        kind: QuestionKind::Definition,
        category: term.category.clone(),
        difficulty: difficulty_or_default(term),
        question: format!(
            "Which stitch matches this description: {}?",
            term.description
        ),
        answer: Some(term.name_us.clone()),
        choices: None,
        correct_answer: None,
        term_id: term.id.clone(),
        points: 8,
    })
}

/// Maps a question difficulty onto the three package labels. Numeric grades
/// fold into the labels (`0`–`1` beginner, `2`–`3` intermediate, `4`–`5`
/// advanced); anything unrecognised lands in the beginner pack.
pub fn difficulty_label(difficulty: &str) -> &'static str {
    match difficulty.trim().to_lowercase().as_str() {
        "advanced" | "4" | "5" => "Advanced",
        "intermediate" | "2" | "3" => "Intermediate",
        _ => "Beginner",
    }
}

/// Groups questions into the beginner/intermediate/advanced packages plus a
/// master challenge sampled across all questions without replacement.
pub fn build_packages<R: Rng>(
    questions: &[QuizQuestion],
    rng: &mut R,
) -> BTreeMap<String, QuizPackage> {
    let mut by_label: BTreeMap<&str, Vec<QuizQuestion>> = BTreeMap::new();
    for question in questions {
        by_label
            .entry(difficulty_label(&question.difficulty))
            .or_default()
            .push(question.clone());
    }

    let mut sampled: Vec<QuizQuestion> = questions.to_vec();
    sampled.shuffle(rng);
    sampled.truncate(MASTER_PACK_SIZE);

    let mut packages = BTreeMap::new();
    packages.insert(
        "beginner_pack".to_string(),
        make_package(
            "Beginner Crochet Quiz",
            "Basic stitches and abbreviations",
            by_label.remove("Beginner").unwrap_or_default(),
            BEGINNER_PACK_CAP,
        ),
    );
    packages.insert(
        "intermediate_pack".to_string(),
        make_package(
            "Intermediate Crochet Quiz",
            "US vs UK terms and complex stitches",
            by_label.remove("Intermediate").unwrap_or_default(),
            INTERMEDIATE_PACK_CAP,
        ),
    );
    packages.insert(
        "advanced_pack".to_string(),
        make_package(
            "Advanced Crochet Quiz",
            "Symbols, complex techniques, and expert knowledge",
            by_label.remove("Advanced").unwrap_or_default(),
            ADVANCED_PACK_CAP,
        ),
    );
    packages.insert(
        "master_challenge".to_string(),
        make_package(
            "Crochet Master Challenge",
            "Mixed questions from all skill levels",
            sampled,
            MASTER_PACK_SIZE,
        ),
    );

    packages
}

fn make_package(
    name: &str,
    description: &str,
    mut questions: Vec<QuizQuestion>,
    cap: usize,
) -> QuizPackage {
    questions.truncate(cap);
    QuizPackage {
        name: name.to_string(),
        description: description.to_string(),
        total_questions: questions.len(),
        total_points: questions.iter().map(|question| question.points).sum(),
        questions,
    }
}

/// Aggregate counters written alongside the quiz packages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizStats {
    pub total_questions: usize,
    pub terms_with_instructions: usize,
    pub terms_with_symbols: usize,
    pub categories: Vec<String>,
    pub difficulty_breakdown: BTreeMap<String, usize>,
}

pub fn quiz_stats(
    terms: &[Term],
    questions: &[QuizQuestion],
    packages: &BTreeMap<String, QuizPackage>,
) -> QuizStats {
    let mut categories: Vec<String> = terms.iter().map(|term| term.category.clone()).collect();
    categories.sort();
    categories.dedup();

    let difficulty_breakdown = packages
        .iter()
        .filter(|(key, _)| key.as_str() != "master_challenge")
        .map(|(key, package)| (key.clone(), package.questions.len()))
        .collect();

    QuizStats {
        total_questions: questions.len(),
        terms_with_instructions: terms
            .iter()
            .filter(|term| !term.instruction.is_empty())
            .count(),
        terms_with_symbols: terms.iter().filter(|term| !term.symbol.is_empty()).count(),
        categories,
        difficulty_breakdown,
    }
}

fn difficulty_or_default(term: &Term) -> String {
    if term.difficulty.is_empty() {
        "Beginner".to_string()
    } else {
        term.difficulty.clone()
    }
}
