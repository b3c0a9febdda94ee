// src/main.rs

use exam_backend::config::Config;
use exam_backend::registry::QuestionRegistry;
use exam_backend::routes;
use exam_backend::state::AppState;
use exam_backend::store::ScoreStore;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Load the question asset (read-only for the life of the process)
    let registry = match QuestionRegistry::load_from_file(&config.questions_file) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!(
                "Failed to load question file '{}': {}",
                config.questions_file,
                e
            );
            std::process::exit(1);
        }
    };

    // Open the score store (creates an empty file on first run)
    let store = ScoreStore::new(&config.scores_file, &config.backup_file)
        .expect("Failed to initialize score file");

    // Create AppState
    let state = AppState {
        registry: Arc::new(registry),
        store: Arc::new(store),
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Exam server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}
