//! Plan adherence and quiz performance, plus the CSV export of a user's blocks.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::db::{HistoryEntry, StudyBlock};
use crate::planner::BlockKind;
use crate::practice::{self, PracticeSummary};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindCounts {
    pub study: usize,
    pub review: usize,
    pub mock_exam: usize,
}

impl KindCounts {
    fn add(&mut self, kind: BlockKind) {
        match kind {
            BlockKind::Study => self.study += 1,
            BlockKind::Review => self.review += 1,
            BlockKind::MockExam => self.mock_exam += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineProgress {
    pub discipline_id: String,
    pub name: String,
    pub planned: usize,
    pub completed: usize,
    pub planned_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub planned: usize,
    pub completed: usize,
    /// Completed over planned blocks, between 0 and 1.
    pub adherence: f64,
    pub planned_hours: f64,
    pub completed_hours: f64,
    pub by_kind: KindCounts,
    pub completed_by_kind: KindCounts,
    pub per_discipline: Vec<DisciplineProgress>,
    pub quiz: PracticeSummary,
}

fn block_hours(block: &StudyBlock) -> f64 {
    let minutes = (block.end_time - block.start_time).num_minutes().max(0);
    minutes as f64 / 60.0
}

pub fn report(blocks: &[StudyBlock], history: &[HistoryEntry], catalog: &Catalog) -> ProgressReport {
    let mut by_kind = KindCounts::default();
    let mut completed_by_kind = KindCounts::default();
    let mut per_discipline: BTreeMap<&str, DisciplineProgress> = BTreeMap::new();
    let mut planned_hours = 0.0;
    let mut completed_hours = 0.0;

    for block in blocks {
        let hours = block_hours(block);
        by_kind.add(block.kind);
        planned_hours += hours;

        let entry = per_discipline
            .entry(block.discipline_id.as_str())
            .or_insert_with(|| DisciplineProgress {
                discipline_id: block.discipline_id.clone(),
                name: catalog.name_of(&block.discipline_id).to_string(),
                planned: 0,
                completed: 0,
                planned_hours: 0.0,
            });
        entry.planned += 1;
        entry.planned_hours += hours;

        if block.completed {
            completed_by_kind.add(block.kind);
            completed_hours += hours;
            entry.completed += 1;
        }
    }

    let planned = blocks.len();
    let completed = blocks.iter().filter(|b| b.completed).count();
    let adherence = if planned == 0 {
        0.0
    } else {
        completed as f64 / planned as f64
    };

    let quiz = practice::summarize(
        history.iter().map(|h| (h.discipline.as_str(), h.is_correct)),
        history.len(),
    );

    ProgressReport {
        planned,
        completed,
        adherence,
        planned_hours,
        completed_hours,
        by_kind,
        completed_by_kind,
        per_discipline: per_discipline.into_values().collect(),
        quiz,
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    start: String,
    end: String,
    kind: &'a str,
    discipline: &'a str,
    title: &'a str,
    pomodoros: u32,
    completed: bool,
}

/// Renders the blocks as CSV, one row per block in the given order.
pub fn blocks_csv(blocks: &[StudyBlock], catalog: &Catalog) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for block in blocks {
        writer.serialize(CsvRow {
            date: block.date.to_string(),
            start: block.start_time.format("%H:%M").to_string(),
            end: block.end_time.format("%H:%M").to_string(),
            kind: block.kind.as_str(),
            discipline: catalog.name_of(&block.discipline_id),
            title: &block.title,
            pomodoros: block.pomodoros,
            completed: block.completed,
        })?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, Utc};

    use super::*;

    fn block(id: &str, discipline: &str, kind: BlockKind, completed: bool) -> StudyBlock {
        StudyBlock {
            id: id.to_string(),
            user_id: "u".to_string(),
            discipline_id: discipline.to_string(),
            title: format!("Estudo: {discipline}"),
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            kind,
            pomodoros: 3,
            completed,
        }
    }

    fn answer(discipline: &str, is_correct: bool) -> HistoryEntry {
        HistoryEntry {
            question_id: "q".to_string(),
            session_id: Some(1),
            selected_letter: "A".to_string(),
            is_correct,
            discipline: discipline.to_string(),
            response_ms: 1000,
            attempt: 1,
            answered_at: Utc::now(),
        }
    }

    #[test]
    fn empty_plan_has_zero_adherence() {
        let catalog = Catalog::seed().unwrap();
        let report = report(&[], &[], &catalog);
        assert_eq!(report.planned, 0);
        assert_eq!(report.adherence, 0.0);
        assert_eq!(report.quiz.accuracy, 0.0);
    }

    #[test]
    fn counts_completion_per_discipline_and_kind() {
        let catalog = Catalog::seed().unwrap();
        let blocks = vec![
            block("1", "civil", BlockKind::Study, true),
            block("2", "civil", BlockKind::Review, false),
            block("3", "penal", BlockKind::Study, true),
            block("4", "penal", BlockKind::MockExam, false),
        ];
        let history = vec![answer("civil", true), answer("civil", false), answer("penal", true)];

        let report = report(&blocks, &history, &catalog);

        assert_eq!(report.planned, 4);
        assert_eq!(report.completed, 2);
        assert_eq!(report.adherence, 0.5);
        assert_eq!(report.planned_hours, 6.0);
        assert_eq!(report.completed_hours, 3.0);
        assert_eq!(
            report.by_kind,
            KindCounts {
                study: 2,
                review: 1,
                mock_exam: 1
            }
        );
        assert_eq!(report.completed_by_kind.study, 2);

        let civil = &report.per_discipline[0];
        assert_eq!(civil.discipline_id, "civil");
        assert_eq!(civil.name, "Direito Civil");
        assert_eq!((civil.planned, civil.completed), (2, 1));

        assert_eq!(report.quiz.responded, 3);
        assert_eq!(report.quiz.correct, 2);
    }

    #[test]
    fn csv_has_header_and_one_row_per_block() {
        let catalog = Catalog::seed().unwrap();
        let blocks = vec![block("1", "civil", BlockKind::Study, true)];

        let csv = blocks_csv(&blocks, &catalog).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "date,start,end,kind,discipline,title,pomodoros,completed"
        );
        assert_eq!(
            lines[1],
            "2026-01-05,08:00,09:30,study,Direito Civil,Estudo: civil,3,true"
        );
        assert_eq!(lines.len(), 2);
    }
}
