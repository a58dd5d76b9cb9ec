//! Sagaforge Engine - Main entry point.
//!
//! Serves the JSON-lines console transport on stdin/stdout.

use std::sync::Arc;

use sagaforge_engine::api::console;
use sagaforge_engine::infrastructure::{
    clock::SystemClock, config::EngineConfig, persistence::InMemoryCharacterRepo,
};
use sagaforge_engine::App;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary is usually run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Logs go to stderr; stdout carries replies.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sagaforge_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Sagaforge Engine");

    let config = EngineConfig::from_env()?;
    tracing::info!(
        idle_timeout_secs = config.session_idle_timeout.as_secs(),
        sweep_interval_secs = config.session_sweep_interval.as_secs(),
        "Configuration loaded"
    );

    let app = Arc::new(App::new(
        Arc::new(InMemoryCharacterRepo::new()),
        Arc::new(SystemClock::new()),
        config,
    ));

    let sweeper = app.spawn_session_sweeper();

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    tokio::select! {
        result = console::run(&app, stdin, stdout) => {
            result?;
            tracing::info!("Input closed, shutting down");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, shutting down");
        }
    }

    sweeper.abort();
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
