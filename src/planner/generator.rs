use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveTime};
use ulid::Ulid;

use super::{
    BlockKind, DisciplineMastery, GeneratedPlan, PlanError, PlanSettings, PlanSummary,
    PlannedBlock,
};
use crate::names;

const SESSION_MINUTES: i64 = 90;
const STUDY_POMODOROS: u32 = 3;
const REVIEW_MINUTES: i64 = 30;
const REVIEW_POMODOROS: u32 = 1;
const MOCK_MINUTES: i64 = 180;
const MOCK_POMODOROS: u32 = 6;

const STUDY_SLOTS: [(u32, u32); 5] = [(8, 0), (10, 0), (14, 0), (16, 0), (19, 0)];
const REVIEW_SLOT: (u32, u32) = (21, 0);
const MOCK_SLOTS: [(u32, u32); 2] = [(9, 0), (14, 0)];
const MOCK_FIRST_DAY: i64 = 5;

fn at(slot: (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(slot.0, slot.1, 0).unwrap_or(NaiveTime::MIN)
}

struct Target<'a> {
    id: &'a str,
    name: &'a str,
    weight: usize,
}

impl<'a> From<&'a DisciplineMastery> for Target<'a> {
    fn from(d: &'a DisciplineMastery) -> Self {
        Self {
            id: &d.id,
            name: d.name.as_deref().unwrap_or(&d.id),
            weight: (6 - d.mastery.clamp(1, 5)) as usize,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn block(
    target: &Target<'_>,
    title: String,
    date: NaiveDate,
    start: NaiveTime,
    minutes: i64,
    kind: BlockKind,
    pomodoros: u32,
    week: i64,
) -> PlannedBlock {
    PlannedBlock {
        id: Ulid::new().to_string(),
        discipline_id: target.id.to_string(),
        title,
        date,
        start_time: start,
        end_time: start + Duration::minutes(minutes),
        kind,
        pomodoros,
        week: week as u32,
    }
}

/// Number of 90-minute sessions that fit the weekly budget, bounded by the
/// distinct (day, slot) pairs of a week.
fn sessions_per_week(weekly_hours: f64) -> usize {
    let max = 7 * STUDY_SLOTS.len();
    ((weekly_hours * 60.0 / SESSION_MINUTES as f64).floor() as usize).clamp(1, max)
}

/// Per-discipline session counts for one week. Weight is `6 - mastery`, and
/// every discipline gets at least one session.
fn allocate(targets: &[Target<'_>], sessions: usize) -> Vec<usize> {
    let total_weight: usize = targets.iter().map(|t| t.weight).sum();
    targets
        .iter()
        .map(|t| (sessions * t.weight / total_weight).max(1))
        .collect()
}

fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// Dates past the exam, or past the end of the calendar, land on the exam.
fn clip(date: Option<NaiveDate>, exam: NaiveDate) -> NaiveDate {
    date.map_or(exam, |d| d.min(exam))
}

pub fn generate(settings: &PlanSettings, today: NaiveDate) -> Result<GeneratedPlan, PlanError> {
    if !(settings.weekly_hours > 0.0) {
        return Err(PlanError::InvalidWeeklyHours);
    }
    if settings.disciplines.is_empty() {
        return Err(PlanError::NoDisciplines);
    }

    let start = settings.start_date.unwrap_or(today);
    let exam = match settings.exam_date {
        Some(exam) => exam,
        None => start
            .checked_add_signed(Duration::weeks(names::DEFAULT_PLAN_WEEKS))
            .ok_or(PlanError::DateOutOfRange)?,
    };
    let days = (exam - start).num_days();
    let weeks = ((days + 6) / 7).max(1);

    let template = settings.template.unwrap_or_default();
    let targets: Vec<Target<'_>> = settings.disciplines.iter().map(Target::from).collect();
    let spw = sessions_per_week(settings.weekly_hours);
    let allocation = allocate(&targets, spw);

    let mut blocks: Vec<PlannedBlock> = Vec::new();

    for week in 0..weeks {
        let week_start = shift(start, week * 7).ok_or(PlanError::DateOutOfRange)?;

        let mut study = Vec::new();
        let mut counter = 0usize;
        for (target, &count) in targets.iter().zip(&allocation) {
            for _ in 0..count {
                let date = shift(week_start, (counter % 7) as i64);
                let slot = STUDY_SLOTS[counter % STUDY_SLOTS.len()];
                counter += 1;

                let Some(date) = date.filter(|d| *d <= exam) else {
                    continue;
                };
                study.push((
                    target,
                    block(
                        target,
                        format!("Estudo: {}", target.name),
                        date,
                        at(slot),
                        SESSION_MINUTES,
                        BlockKind::Study,
                        STUDY_POMODOROS,
                        week,
                    ),
                ));
            }
        }

        let mut reviews = Vec::new();
        if week > 0 {
            for (target, studied) in &study {
                let mut seen = HashSet::new();
                for offset in names::REVIEW_OFFSETS_DAYS {
                    let date = clip(shift(studied.date, offset), exam);
                    if date <= studied.date || !seen.insert(date) {
                        continue;
                    }
                    reviews.push(block(
                        target,
                        format!("Revisão D+{offset}: {}", target.name),
                        date,
                        at(REVIEW_SLOT),
                        REVIEW_MINUTES,
                        BlockKind::Review,
                        REVIEW_POMODOROS,
                        week,
                    ));
                }
            }
        }

        let mut mocks = Vec::new();
        if week >= 1 && week % template.mock_period_weeks() == 0 {
            for (i, target) in targets.iter().enumerate() {
                let day = MOCK_FIRST_DAY + (i % 2) as i64;
                let slot = MOCK_SLOTS[(i / 2) % MOCK_SLOTS.len()];
                let date = clip(shift(week_start, day), exam);
                mocks.push(block(
                    target,
                    format!("Simulado: {}", target.name),
                    date,
                    at(slot),
                    MOCK_MINUTES,
                    BlockKind::MockExam,
                    MOCK_POMODOROS,
                    week,
                ));
            }
        }

        blocks.extend(study.into_iter().map(|(_, b)| b));
        blocks.extend(reviews);
        blocks.extend(mocks);

        if blocks.len() >= names::MAX_GENERATED_BLOCKS {
            blocks.truncate(names::MAX_GENERATED_BLOCKS);
            break;
        }
    }

    let count = |kind: BlockKind| blocks.iter().filter(|b| b.kind == kind).count();
    let summary = PlanSummary {
        total: blocks.len(),
        study: count(BlockKind::Study),
        review: count(BlockKind::Review),
        mock_exam: count(BlockKind::MockExam),
        weeks,
        sessions_per_week: spw,
        planned_hours: blocks.iter().map(PlannedBlock::hours).sum(),
        exam_date: exam,
    };

    tracing::debug!(
        "generated plan: {} blocks over {weeks} weeks ({spw} sessions/week)",
        summary.total
    );

    Ok(GeneratedPlan { blocks, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Template;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn discipline(id: &str, mastery: i64) -> DisciplineMastery {
        DisciplineMastery {
            id: id.to_string(),
            mastery,
            name: None,
        }
    }

    fn settings(weekly_hours: f64, disciplines: Vec<DisciplineMastery>) -> PlanSettings {
        PlanSettings {
            weekly_hours,
            disciplines,
            exam_date: None,
            start_date: None,
            template: None,
        }
    }

    #[test]
    fn rejects_non_positive_hours() {
        let today = date(2026, 1, 5);
        let res = generate(&settings(0.0, vec![discipline("civil", 3)]), today);
        assert_eq!(res.unwrap_err(), PlanError::InvalidWeeklyHours);

        let res = generate(&settings(-4.0, vec![discipline("civil", 3)]), today);
        assert_eq!(res.unwrap_err(), PlanError::InvalidWeeklyHours);
    }

    #[test]
    fn rejects_empty_disciplines() {
        let res = generate(&settings(10.0, vec![]), date(2026, 1, 5));
        assert_eq!(res.unwrap_err(), PlanError::NoDisciplines);
    }

    #[test]
    fn default_plan_spans_twelve_weeks_and_is_capped() {
        let today = date(2026, 1, 5);
        let plan = generate(&settings(25.0, vec![discipline("civil", 3)]), today).unwrap();

        assert_eq!(plan.summary.weeks, 12);
        assert_eq!(plan.summary.exam_date, date(2026, 3, 30));
        assert_eq!(plan.summary.sessions_per_week, 16);
        assert_eq!(plan.blocks.len(), names::MAX_GENERATED_BLOCKS);
        assert_eq!(plan.summary.total, plan.blocks.len());

        let first_week = plan.blocks.iter().filter(|b| b.week == 0).count();
        assert_eq!(first_week, 16);
    }

    #[test]
    fn every_block_ends_after_it_starts() {
        let plan = generate(
            &settings(
                40.0,
                vec![
                    discipline("civil", 1),
                    discipline("penal", 4),
                    discipline("etica", 5),
                ],
            ),
            date(2026, 2, 2),
        )
        .unwrap();

        assert!(plan.blocks.len() <= names::MAX_GENERATED_BLOCKS);
        assert!(plan.blocks.iter().all(|b| b.end_time > b.start_time));
    }

    #[test]
    fn reviews_skip_first_week_and_never_pass_the_exam() {
        let start = date(2026, 1, 5);
        let exam = date(2026, 2, 9);
        let mut s = settings(6.0, vec![discipline("civil", 2)]);
        s.start_date = Some(start);
        s.exam_date = Some(exam);

        let plan = generate(&s, start).unwrap();
        let reviews: Vec<_> = plan
            .blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Review)
            .collect();

        assert!(!reviews.is_empty());
        assert!(reviews.iter().all(|b| b.week > 0));
        assert!(plan.blocks.iter().all(|b| b.date <= exam));
        assert!(reviews
            .iter()
            .all(|b| b.end_time - b.start_time == Duration::minutes(REVIEW_MINUTES)));
    }

    #[test]
    fn reviews_are_clipped_to_the_exam_date() {
        let start = date(2026, 1, 5);
        let exam = date(2026, 1, 14);
        let mut s = settings(3.0, vec![discipline("civil", 3)]);
        s.start_date = Some(start);
        s.exam_date = Some(exam);

        let plan = generate(&s, start).unwrap();
        let reviews: Vec<_> = plan
            .blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Review)
            .collect();

        // study on the 12th gets D+1 and a clipped D+3; study on the 13th only D+1
        assert_eq!(reviews.len(), 3);
        assert_eq!(reviews.iter().map(|b| b.date).max(), Some(exam));
    }

    #[test]
    fn allocation_favours_weaker_disciplines() {
        let targets_src = vec![discipline("civil", 1), discipline("etica", 5)];
        let targets: Vec<Target<'_>> = targets_src.iter().map(Target::from).collect();

        let alloc = allocate(&targets, 16);
        assert_eq!(alloc, vec![13, 2]);

        let sum: usize = alloc.iter().sum();
        assert!(sum >= targets.len());
        assert!(sum <= 16);
    }

    #[test]
    fn every_discipline_gets_a_session_even_on_a_tiny_budget() {
        let src: Vec<_> = (0..4).map(|i| discipline(&format!("d{i}"), 3)).collect();
        let targets: Vec<Target<'_>> = src.iter().map(Target::from).collect();

        let alloc = allocate(&targets, sessions_per_week(1.0));
        assert_eq!(alloc, vec![1, 1, 1, 1]);
    }

    #[test]
    fn out_of_range_mastery_is_clamped() {
        let src = vec![discipline("a", 9), discipline("b", -2)];
        let targets: Vec<Target<'_>> = src.iter().map(Target::from).collect();
        assert_eq!(targets[0].weight, 1);
        assert_eq!(targets[1].weight, 5);
    }

    #[test]
    fn mock_exam_period_follows_template() {
        let start = date(2026, 1, 5);
        let exam = date(2026, 2, 16);

        let mocks_for = |template: Template| {
            let mut s = settings(3.0, vec![discipline("civil", 3)]);
            s.start_date = Some(start);
            s.exam_date = Some(exam);
            s.template = Some(template);
            let plan = generate(&s, start).unwrap();
            plan.blocks
                .iter()
                .filter(|b| b.kind == BlockKind::MockExam)
                .map(|b| b.week)
                .collect::<Vec<_>>()
        };

        assert_eq!(mocks_for(Template::Intensive), vec![1, 2, 3, 4, 5]);
        assert_eq!(mocks_for(Template::Balanced), vec![2, 4]);
        assert_eq!(mocks_for(Template::Light), vec![3]);
    }

    #[test]
    fn mock_exams_alternate_day_and_slot_per_discipline() {
        let start = date(2026, 1, 5);
        let mut s = settings(
            12.0,
            vec![
                discipline("civil", 3),
                discipline("penal", 3),
                discipline("etica", 3),
                discipline("const", 3),
            ],
        );
        s.start_date = Some(start);
        s.exam_date = Some(date(2026, 2, 2));
        s.template = Some(Template::Intensive);

        let plan = generate(&s, start).unwrap();
        let mocks: Vec<_> = plan
            .blocks
            .iter()
            .filter(|b| b.kind == BlockKind::MockExam && b.week == 1)
            .map(|b| (b.discipline_id.as_str(), b.date, b.start_time))
            .collect();

        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let two = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        assert_eq!(
            mocks,
            vec![
                ("civil", date(2026, 1, 17), nine),
                ("penal", date(2026, 1, 18), nine),
                ("etica", date(2026, 1, 17), two),
                ("const", date(2026, 1, 18), two),
            ]
        );
    }

    #[test]
    fn exam_before_start_still_spans_one_week() {
        let start = date(2026, 1, 5);
        let exam = date(2026, 1, 2);
        let mut s = settings(6.0, vec![discipline("civil", 2)]);
        s.start_date = Some(start);
        s.exam_date = Some(exam);

        let plan = generate(&s, start).unwrap();
        assert_eq!(plan.summary.weeks, 1);
        assert_eq!(plan.summary.exam_date, exam);
        assert!(plan
            .blocks
            .iter()
            .all(|b| b.kind != BlockKind::Study || b.date <= exam));
        assert_eq!(plan.summary.study, 0);
    }

    #[test]
    fn short_horizon_keeps_study_on_or_before_the_exam() {
        let start = date(2026, 1, 5);
        let exam = date(2026, 1, 7);
        let mut s = settings(12.0, vec![discipline("civil", 1), discipline("penal", 4)]);
        s.start_date = Some(start);
        s.exam_date = Some(exam);

        let plan = generate(&s, start).unwrap();
        assert_eq!(plan.summary.weeks, 1);
        assert!(plan.summary.study > 0);
        assert!(plan.blocks.iter().all(|b| b.date <= exam));
    }

    #[test]
    fn dates_at_the_end_of_the_calendar_do_not_overflow() {
        let start = NaiveDate::MAX - Duration::days(3);

        let mut s = settings(6.0, vec![discipline("civil", 2)]);
        s.start_date = Some(start);
        s.exam_date = Some(NaiveDate::MAX);
        let plan = generate(&s, date(2026, 1, 5)).unwrap();
        assert_eq!(plan.summary.weeks, 1);
        assert!(plan.summary.study > 0);
        assert!(plan.blocks.iter().all(|b| b.date <= NaiveDate::MAX));

        s.exam_date = None;
        assert_eq!(
            generate(&s, date(2026, 1, 5)).unwrap_err(),
            PlanError::DateOutOfRange
        );
    }

    #[test]
    fn titles_use_provided_names() {
        let mut d = discipline("civil", 3);
        d.name = Some("Direito Civil".to_string());
        let plan = generate(&settings(3.0, vec![d]), date(2026, 1, 5)).unwrap();
        assert_eq!(plan.blocks[0].title, "Estudo: Direito Civil");
    }
}
