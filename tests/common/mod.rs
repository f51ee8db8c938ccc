#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use lexstudy::config::Config;
use lexstudy::db::Db;
use lexstudy::models::{Alternative, Question};
use lexstudy::{router, AppState};

static COUNTER: AtomicU32 = AtomicU32::new(0);

fn unique_name(prefix: &str) -> String {
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("lexstudy_{prefix}_{}_{}", std::process::id(), id)
}

pub async fn create_test_db() -> Db {
    let path = std::env::temp_dir().join(format!("{}.db", unique_name("test")));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    let url = format!("sqlite://{}", path.display());
    Db::new(&url).await.expect("failed to create test database")
}

/// A fresh, empty import directory.
pub fn create_import_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(unique_name("imports"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("failed to create import dir");
    dir
}

pub fn test_config(import_dir: PathBuf, admin_token: Option<&str>) -> Config {
    Config {
        import_dir,
        admin_token: admin_token.map(str::to_string),
        llm: None,
    }
}

pub async fn app_with(db: Db, config: Config) -> axum::Router {
    router(AppState::new(db, config).expect("failed to build app state"))
}

pub fn question(id: &str, discipline: &str, statement: &str, correct: &str) -> Question {
    Question {
        id: id.to_string(),
        discipline: discipline.to_string(),
        statement: statement.to_string(),
        alternatives: ["A", "B", "C", "D"]
            .iter()
            .map(|letter| Alternative {
                letter: letter.to_string(),
                text: format!("Alternativa {letter}"),
                is_correct: *letter == correct,
            })
            .collect(),
    }
}

pub fn make_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| {
            let discipline = if i % 2 == 0 { "civil" } else { "penal" };
            question(&format!("q{i}"), discipline, &format!("Enunciado {i}"), "A")
        })
        .collect()
}
