use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use super::RawRow;
use crate::models::{Alternative, Question};

const DEFAULT_AREA: &str = "Geral";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub questions: Vec<Question>,
    /// Groups dropped for lacking an id, having fewer than two alternatives,
    /// or not having exactly one correct alternative.
    pub invalid: usize,
    /// Groups dropped because their statement repeats an earlier one.
    pub duplicates: usize,
}

fn tag_pattern() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// Comparison key for a statement: markup stripped, entities decoded,
/// whitespace collapsed, lower-cased.
pub fn stem_key(statement: &str) -> String {
    let text = tag_pattern().replace_all(statement, " ");
    let text = html_escape::decode_html_entities(&text);
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Groups rows by question id (first-seen order), keeps the first
/// alternative per letter, and drops malformed or repeated questions.
pub fn normalize(rows: Vec<RawRow>) -> Normalized {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Question> = HashMap::new();
    let mut invalid = 0;

    for row in rows {
        let id = row.id.trim().to_string();
        if id.is_empty() {
            invalid += 1;
            continue;
        }

        let question = groups.entry(id.clone()).or_insert_with(|| {
            order.push(id.clone());
            Question {
                id,
                discipline: String::new(),
                statement: String::new(),
                alternatives: Vec::new(),
            }
        });

        if question.discipline.is_empty() && !row.area.trim().is_empty() {
            question.discipline = row.area.trim().to_string();
        }
        if question.statement.is_empty() && !row.statement.trim().is_empty() {
            question.statement = row.statement.trim().to_string();
        }

        let letter = row.letter.trim().to_uppercase();
        if letter.is_empty() || question.alternatives.iter().any(|a| a.letter == letter) {
            continue;
        }
        question.alternatives.push(Alternative {
            letter,
            text: row.text.trim().to_string(),
            is_correct: row.correct,
        });
    }

    let mut seen_stems = HashSet::new();
    let mut duplicates = 0;
    let mut questions = Vec::with_capacity(order.len());

    for id in order {
        let Some(mut question) = groups.remove(&id) else {
            continue;
        };

        if question.statement.is_empty() || !question.is_well_formed() {
            tracing::debug!("skipping malformed question {}", question.id);
            invalid += 1;
            continue;
        }
        if !seen_stems.insert(stem_key(&question.statement)) {
            tracing::debug!("skipping duplicate statement of question {}", question.id);
            duplicates += 1;
            continue;
        }

        if question.discipline.is_empty() {
            question.discipline = DEFAULT_AREA.to_string();
        }
        question.alternatives.sort_by(|a, b| a.letter.cmp(&b.letter));
        questions.push(question);
    }

    Normalized {
        questions,
        invalid,
        duplicates,
    }
}
