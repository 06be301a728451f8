// ONCE App - Web Server
// REST API with Axum: calculate, history, parse, voice

use anyhow::{Context, Result};
use once_app::api::{create_router, AppState};
use once_app::config::init_tracing;
use once_app::{open_database, AmountParser, AppConfig, Segmenter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config.log_filter);

    tracing::info!("ONCE App server v{}", once_app::VERSION);

    let parser_config = config
        .parser_config()
        .context("Failed to load parser config")?;
    tracing::info!(
        locale = %parser_config.locale,
        words = parser_config.lexicon.len(),
        "parser configured"
    );

    let conn = open_database(&config.db_path)?;
    tracing::info!("Database opened: {:?}", config.db_path);

    let state = AppState::new(
        conn,
        AmountParser::from_config(&parser_config),
        Segmenter::new(parser_config.keywords.clone()),
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    tracing::info!("Server running on http://{}", config.bind_addr);
    tracing::info!("   API: http://{}/api/calculate", config.bind_addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
