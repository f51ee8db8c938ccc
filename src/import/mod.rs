//! One-shot question imports from spreadsheet, CSV or JSON sources.
//!
//! Reading and normalizing are synchronous; writing the result is done by
//! [`crate::db::Db::replace_questions`].

mod normalize;
mod sheet;

pub use normalize::{normalize, stem_key, Normalized};
pub use sheet::{read_rows, RawRow};

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::models::Question;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("could not read source: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid spreadsheet: {0}")]
    Sheet(#[from] calamine::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),
    #[error("unsupported source format '{0}'")]
    UnsupportedFormat(String),
    #[error("spreadsheet has no sheets")]
    NoSheets,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub rows: usize,
    pub imported: usize,
    pub invalid: usize,
    pub duplicates: usize,
    pub batches: usize,
    pub per_area: BTreeMap<String, usize>,
}

impl ImportReport {
    pub fn new(rows: usize, normalized: &Normalized, batches: usize) -> Self {
        let mut per_area = BTreeMap::new();
        for q in &normalized.questions {
            *per_area.entry(q.discipline.clone()).or_insert(0) += 1;
        }

        Self {
            rows,
            imported: normalized.questions.len(),
            invalid: normalized.invalid,
            duplicates: normalized.duplicates,
            batches,
            per_area,
        }
    }
}

/// Reads a source file and normalizes its rows into importable questions.
/// Returns the number of rows read alongside the result.
pub fn load(path: &Path) -> Result<(usize, Normalized), ImportError> {
    let rows = read_rows(path)?;
    let count = rows.len();
    tracing::info!("read {count} rows from {}", path.display());
    Ok((count, normalize(rows)))
}

pub(crate) fn flatten(questions: Vec<Question>) -> Vec<RawRow> {
    questions
        .into_iter()
        .flat_map(|q| {
            let Question {
                id,
                discipline,
                statement,
                alternatives,
            } = q;
            alternatives.into_iter().map(move |a| RawRow {
                id: id.clone(),
                area: discipline.clone(),
                statement: statement.clone(),
                letter: a.letter,
                text: a.text,
                correct: a.is_correct,
            })
        })
        .collect()
}
