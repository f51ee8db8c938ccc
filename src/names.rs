pub const USERS_URL: &str = "/api/users";
pub const CURRENT_USER_URL: &str = "/api/users/me";
pub const DISCIPLINES_URL: &str = "/api/disciplines";
pub const DISCIPLINE_URL: &str = "/api/disciplines/{id}";
pub const GENERATE_SCHEDULE_URL: &str = "/api/schedule/generate";
pub const SCHEDULE_URL: &str = "/api/schedule";
pub const BLOCKS_URL: &str = "/api/blocks";
pub const BLOCK_URL: &str = "/api/blocks/{id}";
pub const TOGGLE_BLOCK_URL: &str = "/api/blocks/{id}/toggle";
pub const MOVE_BLOCK_URL: &str = "/api/blocks/{id}/move";
pub const PRACTICE_URL: &str = "/api/practice";
pub const PRACTICE_SESSION_URL: &str = "/api/practice/{token}";
pub const SUBMIT_ANSWER_URL: &str = "/api/practice/{token}/answer";
pub const FINISH_PRACTICE_URL: &str = "/api/practice/{token}/finish";
pub const HISTORY_URL: &str = "/api/history";
pub const PROGRESS_URL: &str = "/api/progress";
pub const PROGRESS_CSV_URL: &str = "/api/progress/export.csv";
pub const PROGRESS_REPORT_URL: &str = "/api/progress/report";
pub const ASSISTANT_URL: &str = "/api/assistant/chat";
pub const IMPORT_QUESTIONS_URL: &str = "/api/admin/import/questions";
pub const QUESTION_STATS_URL: &str = "/api/admin/questions/stats";

pub const USER_ID_HEADER: &str = "x-user-id";

pub fn practice_session_url(token: &str) -> String {
    format!("/api/practice/{token}")
}

pub fn submit_answer_url(token: &str) -> String {
    format!("/api/practice/{token}/answer")
}

pub fn finish_practice_url(token: &str) -> String {
    format!("/api/practice/{token}/finish")
}

// Schedule generation
pub const MAX_GENERATED_BLOCKS: usize = 100;
pub const DEFAULT_PLAN_WEEKS: i64 = 12;
pub const REVIEW_OFFSETS_DAYS: [i64; 3] = [1, 3, 7];

// Practice session defaults
pub const MIN_QUESTION_COUNT: usize = 1;
pub const MAX_QUESTION_COUNT: usize = 100;
pub const DEFAULT_QUESTION_COUNT: usize = 10;

// Imports
pub const IMPORT_BATCH_SIZE: usize = 500;
