use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use super::{flatten, ImportError};
use crate::models::Questions;

/// One spreadsheet row: a single alternative of a question.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub id: String,
    pub area: String,
    pub statement: String,
    pub letter: String,
    pub text: String,
    pub correct: bool,
}

const COLUMNS: [(&str, &[&str]); 6] = [
    ("id", &["id", "question_id", "codigo"]),
    ("area", &["area", "discipline", "disciplina"]),
    ("statement", &["statement", "enunciado"]),
    ("letter", &["letter", "letra", "alternativa"]),
    ("text", &["text", "texto"]),
    ("correct", &["correct", "correta", "gabarito"]),
];

struct Columns([usize; 6]);

impl Columns {
    fn locate(headers: &[String]) -> Result<Self, ImportError> {
        let headers: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let mut idx = [0; 6];
        for (slot, (name, aliases)) in idx.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| aliases.contains(&h.as_str()))
                .ok_or(ImportError::MissingColumn(name))?;
        }
        Ok(Self(idx))
    }

    fn row(&self, cells: &[String]) -> RawRow {
        let cell = |i: usize| cells.get(self.0[i]).map(|c| c.trim()).unwrap_or("");
        RawRow {
            id: cell(0).to_string(),
            area: cell(1).to_string(),
            statement: cell(2).to_string(),
            letter: cell(3).to_string(),
            text: cell(4).to_string(),
            correct: parse_flag(cell(5)),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "x" | "s" | "sim" | "y" | "yes" | "v" | "verdadeiro"
    )
}

fn data_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => format!("{other:?}"),
    }
}

fn read_csv(path: &Path) -> Result<Vec<RawRow>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let columns = Columns::locate(&headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        rows.push(columns.row(&cells));
    }
    Ok(rows)
}

fn read_workbook(path: &Path) -> Result<Vec<RawRow>, ImportError> {
    let mut workbook = open_workbook_auto(path)?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::NoSheets)?;
    let range = workbook.worksheet_range(&first)?;

    let mut lines = range
        .rows()
        .map(|r| r.iter().map(data_to_string).collect::<Vec<_>>());
    let headers = lines.next().ok_or(ImportError::MissingColumn("id"))?;
    let columns = Columns::locate(&headers)?;

    Ok(lines
        .filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
        .map(|cells| columns.row(&cells))
        .collect())
}

fn read_json(path: &Path) -> Result<Vec<RawRow>, ImportError> {
    let mut content = String::new();
    File::open(path)?.read_to_string(&mut content)?;
    let questions: Questions = serde_json::from_str(&content)?;
    Ok(flatten(questions))
}

/// Reads every alternative row of a source file. The format is picked from
/// the file extension.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, ImportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => read_csv(path),
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook(path),
        "json" => read_json(path),
        other => Err(ImportError::UnsupportedFormat(other.to_string())),
    }
}
