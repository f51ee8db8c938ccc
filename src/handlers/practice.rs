use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    db::{HistoryEntry, NewAnswer, PracticeSessionModel, User},
    extractors::CurrentUser,
    names,
    practice::{self, PracticeError, PracticeSummary, SessionStatus},
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::PRACTICE_URL, post(start_practice))
        .route(names::PRACTICE_SESSION_URL, get(practice_session))
        .route(names::SUBMIT_ANSWER_URL, post(submit_answer))
        .route(names::FINISH_PRACTICE_URL, post(finish_practice))
        .route(names::HISTORY_URL, get(history))
}

#[derive(Serialize)]
struct Links {
    #[serde(rename = "self")]
    session: String,
    answer: String,
    finish: String,
}

impl Links {
    fn for_token(token: &str) -> Self {
        Self {
            session: names::practice_session_url(token),
            answer: names::submit_answer_url(token),
            finish: names::finish_practice_url(token),
        }
    }
}

#[derive(Serialize)]
struct AlternativeView {
    letter: String,
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionView {
    position: i64,
    id: String,
    discipline: String,
    statement: String,
    alternatives: Vec<AlternativeView>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionView {
    token: String,
    status: SessionStatus,
    total_questions: usize,
    answered: usize,
    question: Option<QuestionView>,
    links: Links,
}

/// Looks a session up by token, hiding sessions of other users.
async fn owned_session(
    state: &AppState,
    user: &User,
    token: &str,
) -> Result<PracticeSessionModel, AppError> {
    state
        .db
        .get_practice_session(token)
        .await
        .reject("could not get practice session")?
        .filter(|s| s.user_id == user.id)
        .ok_or(AppError::NotFound("practice session not found"))
}

/// Current state of a session. When a question is pending it is marked as
/// shown, which starts its response timer.
async fn session_view(
    state: &AppState,
    session: &PracticeSessionModel,
) -> Result<SessionView, AppError> {
    let questions = state
        .db
        .session_questions(session.id)
        .await
        .reject("could not get session questions")?;
    let answered = state
        .db
        .current_position(session.id)
        .await
        .reject("could not get session position")? as usize;

    let mut question = None;
    if session.status == SessionStatus::InProgress {
        if let Some(pending) = questions.get(answered) {
            let q = state
                .db
                .get_question(&pending.question_id)
                .await
                .reject("could not get question")?
                .ok_or(AppError::NotFound("question is no longer available"))?;

            state
                .db
                .mark_shown(session.id, pending.position, Utc::now())
                .await
                .reject("could not mark question as shown")?;

            question = Some(QuestionView {
                position: pending.position,
                id: q.id,
                discipline: pending.discipline.clone(),
                statement: q.statement,
                alternatives: q
                    .alternatives
                    .into_iter()
                    .map(|a| AlternativeView {
                        letter: a.letter,
                        text: a.text,
                    })
                    .collect(),
            });
        }
    }

    Ok(SessionView {
        token: session.token.clone(),
        status: session.status,
        total_questions: questions.len(),
        answered,
        question,
        links: Links::for_token(&session.token),
    })
}

#[derive(Deserialize)]
struct StartPractice {
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    discipline: Option<String>,
}

async fn start_practice(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<StartPractice>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let count = body
        .count
        .unwrap_or(names::DEFAULT_QUESTION_COUNT)
        .clamp(names::MIN_QUESTION_COUNT, names::MAX_QUESTION_COUNT);
    let discipline = body
        .discipline
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let status = SessionStatus::Idle
        .advance(SessionStatus::Loading)
        .reject("could not start practice session")?;

    let pool = state
        .db
        .question_pool(discipline)
        .await
        .reject("could not load question pool")?;

    if pool.is_empty() {
        let status = status
            .advance(SessionStatus::Idle)
            .reject("could not reset practice session")?;
        tracing::warn!("no questions to practice (discipline={discipline:?}), back to {status}");
        return Err(AppError::NotFound("no questions available"));
    }

    let drawn = {
        let mut rng = rand::thread_rng();
        practice::draw(pool, count, &mut rng)
    };
    status
        .advance(SessionStatus::InProgress)
        .reject("could not start practice session")?;

    let token = state
        .db
        .create_practice_session(&user.id, discipline, &drawn)
        .await
        .reject("could not create practice session")?;

    let session = owned_session(&state, &user, &token).await?;
    let view = session_view(&state, &session).await?;

    Ok((StatusCode::CREATED, Json(view)))
}

async fn practice_session(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let session = owned_session(&state, &user, &token).await?;
    Ok(Json(session_view(&state, &session).await?))
}

#[derive(Deserialize)]
struct SubmitAnswer {
    letter: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerResult {
    correct: bool,
    selected: String,
    correct_letter: String,
    entry: HistoryEntry,
    session: SessionView,
}

async fn submit_answer(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(body): Json<SubmitAnswer>,
) -> Result<Json<AnswerResult>, AppError> {
    let session = owned_session(&state, &user, &token).await?;
    if session.status != SessionStatus::InProgress {
        return Err(AppError::Validation(format!(
            "practice session is {}, answers are not accepted",
            session.status
        )));
    }

    let questions = state
        .db
        .session_questions(session.id)
        .await
        .reject("could not get session questions")?;
    let position = state
        .db
        .current_position(session.id)
        .await
        .reject("could not get session position")? as usize;
    let Some(pending) = questions.get(position) else {
        return Err(AppError::Input("all questions have been answered"));
    };

    let question = state
        .db
        .get_question(&pending.question_id)
        .await
        .reject("could not get question")?
        .ok_or(AppError::NotFound("question is no longer available"))?;

    let graded = match practice::grade(&question, &body.letter) {
        Ok(graded) => graded,
        Err(e @ PracticeError::UnknownLetter(_)) => {
            return Err(AppError::Validation(e.to_string()))
        }
        Err(e) => {
            tracing::error!("could not grade answer: {e}");
            return Err(AppError::Internal("could not grade answer"));
        }
    };

    let now = Utc::now();
    let shown_at = state
        .db
        .mark_shown(session.id, pending.position, now)
        .await
        .reject("could not get question display time")?;

    let entry = state
        .db
        .record_answer(NewAnswer {
            user_id: &user.id,
            session_id: session.id,
            position: pending.position,
            question_id: &question.id,
            selected_letter: &graded.selected,
            is_correct: graded.is_correct,
            discipline: &pending.discipline,
            response_ms: practice::elapsed_ms(Some(shown_at), now),
            answered_at: now,
        })
        .await
        .reject("could not record answer")?
        .ok_or(AppError::Input("question has already been answered"))?;

    let view = session_view(&state, &session).await?;

    Ok(Json(AnswerResult {
        correct: graded.is_correct,
        selected: graded.selected,
        correct_letter: graded.correct_letter,
        entry,
        session: view,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FinishResult {
    token: String,
    status: SessionStatus,
    summary: PracticeSummary,
}

async fn finish_practice(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<FinishResult>, AppError> {
    let session = owned_session(&state, &user, &token).await?;
    let status = session
        .status
        .advance(SessionStatus::Finished)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let total_questions = state
        .db
        .session_questions(session.id)
        .await
        .reject("could not get session questions")?
        .len();
    let answers = state
        .db
        .session_answers(session.id)
        .await
        .reject("could not get session answers")?;

    state
        .db
        .set_session_status(session.id, status, Utc::now())
        .await
        .reject("could not finish practice session")?;

    let summary = practice::summarize(
        answers.iter().map(|a| (a.discipline.as_str(), a.is_correct)),
        total_questions,
    );

    Ok(Json(FinishResult {
        token: session.token,
        status,
        summary,
    }))
}

async fn history(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let entries = state
        .db
        .history(&user.id)
        .await
        .reject("could not get history")?;

    Ok(Json(entries))
}
