use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::{DisciplineScore, PracticeError, PracticeSummary};
use crate::models::Question;

/// Shuffles the pool and keeps the first `count` entries.
pub fn draw<T, R: Rng + ?Sized>(mut pool: Vec<T>, count: usize, rng: &mut R) -> Vec<T> {
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}

pub fn normalize_letter(letter: &str) -> String {
    letter.trim().to_uppercase()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Graded {
    pub selected: String,
    pub correct_letter: String,
    pub is_correct: bool,
}

/// Grades a selection against the single correct alternative.
pub fn grade(question: &Question, selected: &str) -> Result<Graded, PracticeError> {
    let selected = normalize_letter(selected);
    if !question.alternatives.iter().any(|a| a.letter == selected) {
        return Err(PracticeError::UnknownLetter(selected));
    }

    let correct = question
        .correct_alternative()
        .ok_or_else(|| PracticeError::MissingAnswerKey(question.id.clone()))?;

    Ok(Graded {
        is_correct: correct.letter == selected,
        correct_letter: correct.letter.clone(),
        selected,
    })
}

pub fn elapsed_ms(shown_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    shown_at
        .map(|t| (now - t).num_milliseconds().max(0))
        .unwrap_or(0)
}

fn percentage(correct: usize, responded: usize) -> f64 {
    if responded == 0 {
        0.0
    } else {
        correct as f64 * 100.0 / responded as f64
    }
}

/// Aggregates `(discipline, is_correct)` answers into overall and
/// per-discipline accuracy. Unanswered questions only count toward
/// `total_questions`.
pub fn summarize<'a, I>(answers: I, total_questions: usize) -> PracticeSummary
where
    I: IntoIterator<Item = (&'a str, bool)>,
{
    let mut by_discipline: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    let mut responded = 0;
    let mut correct = 0;

    for (discipline, is_correct) in answers {
        let entry = by_discipline.entry(discipline).or_default();
        entry.0 += 1;
        responded += 1;
        if is_correct {
            entry.1 += 1;
            correct += 1;
        }
    }

    let per_discipline = by_discipline
        .into_iter()
        .map(|(discipline, (responded, correct))| DisciplineScore {
            discipline: discipline.to_string(),
            responded,
            correct,
            accuracy: percentage(correct, responded),
        })
        .collect();

    PracticeSummary {
        total_questions,
        responded,
        correct,
        accuracy: percentage(correct, responded),
        per_discipline,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::models::Alternative;

    fn question(id: &str, correct: &str) -> Question {
        Question {
            id: id.to_string(),
            discipline: "civil".to_string(),
            statement: "Enunciado".to_string(),
            alternatives: ["A", "B", "C", "D"]
                .iter()
                .map(|l| Alternative {
                    letter: l.to_string(),
                    text: format!("option {l}"),
                    is_correct: *l == correct,
                })
                .collect(),
        }
    }

    #[test]
    fn draw_truncates_without_duplicates() {
        let mut rng = StdRng::seed_from_u64(7);
        let picked = draw((0..50).collect::<Vec<_>>(), 10, &mut rng);

        assert_eq!(picked.len(), 10);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn draw_caps_at_pool_size() {
        let mut rng = StdRng::seed_from_u64(7);
        let picked = draw(vec!["q1", "q2", "q3"], 10, &mut rng);
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn grade_matches_the_correct_letter() {
        let q = question("q1", "C");

        let graded = grade(&q, " c ").unwrap();
        assert!(graded.is_correct);
        assert_eq!(graded.selected, "C");

        let graded = grade(&q, "A").unwrap();
        assert!(!graded.is_correct);
        assert_eq!(graded.correct_letter, "C");
    }

    #[test]
    fn grade_rejects_unknown_letters_and_missing_keys() {
        assert_eq!(
            grade(&question("q1", "B"), "E").unwrap_err(),
            PracticeError::UnknownLetter("E".to_string())
        );

        assert_eq!(
            grade(&question("q2", "Z"), "A").unwrap_err(),
            PracticeError::MissingAnswerKey("q2".to_string())
        );
    }

    #[test]
    fn summary_counts_per_discipline() {
        let answers = [
            ("civil", true),
            ("civil", false),
            ("penal", true),
            ("penal", true),
            ("etica", false),
        ];
        let summary = summarize(answers, 8);

        assert_eq!(summary.total_questions, 8);
        assert_eq!(summary.responded, 5);
        assert_eq!(summary.correct, 3);
        assert!((summary.accuracy - 60.0).abs() < 1e-9);

        let civil = &summary.per_discipline[0];
        assert_eq!(civil.discipline, "civil");
        assert!((civil.accuracy - 50.0).abs() < 1e-9);

        let weighted: f64 = summary
            .per_discipline
            .iter()
            .map(|d| d.accuracy * d.responded as f64)
            .sum::<f64>()
            / summary.responded as f64;
        assert!((weighted - summary.accuracy).abs() < 1e-9);
    }

    #[test]
    fn empty_summary_has_zero_accuracy() {
        let summary = summarize(std::iter::empty(), 4);
        assert_eq!(summary.responded, 0);
        assert_eq!(summary.accuracy, 0.0);
        assert!(summary.per_discipline.is_empty());
    }

    #[test]
    fn status_lifecycle() {
        use crate::practice::SessionStatus::*;

        let status = Idle.advance(Loading).unwrap();
        let status = status.advance(InProgress).unwrap();
        assert!(status.advance(Loading).is_err());
        assert_eq!(status.advance(Finished).unwrap(), Finished);
        assert!(Finished.advance(InProgress).is_err());
    }

    #[test]
    fn elapsed_is_never_negative() {
        let now = Utc::now();
        assert_eq!(elapsed_ms(None, now), 0);
        assert_eq!(elapsed_ms(Some(now + chrono::Duration::seconds(5)), now), 0);
        assert_eq!(
            elapsed_ms(Some(now - chrono::Duration::milliseconds(1500)), now),
            1500
        );
    }
}
