use std::path::PathBuf;

use clap::Parser;
use lexstudy::{
    config::{Config, LlmConfig},
    db::Db,
    AppState,
};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// SQLite database URL.
    #[arg(long, env, default_value = "sqlite://lexstudy.db")]
    database_url: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:1414")]
    address: String,

    /// Directory that question imports are read from.
    #[arg(long, env, default_value = "data/imports")]
    import_dir: PathBuf,

    /// Bearer token for the admin routes; they are disabled when unset.
    #[arg(long, env)]
    admin_token: Option<String>,

    /// Base URL of an OpenAI-compatible API, e.g. https://api.openai.com/v1
    #[arg(long, env)]
    llm_base_url: Option<String>,

    #[arg(long, env)]
    llm_api_key: Option<String>,

    #[arg(long, env, default_value = "gpt-4o-mini")]
    llm_model: String,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tracing=info,lexstudy=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let llm = LlmConfig::from_parts(args.llm_base_url, args.llm_api_key, args.llm_model);
    if llm.is_none() {
        tracing::info!("no llm configured, the assistant answers from templates");
    }
    if args.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN is not set, admin routes are disabled");
    }

    let config = Config {
        import_dir: args.import_dir,
        admin_token: args.admin_token.filter(|t| !t.is_empty()),
        llm,
    };

    let db = Db::new(&args.database_url).await?;
    let state = AppState::new(db, config)?;
    let app = lexstudy::router(state);

    let listener = tokio::net::TcpListener::bind(&args.address).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
