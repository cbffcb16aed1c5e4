// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI Agency web server
//!
//! Serves the agency site: public pages, customer accounts, the admin
//! panel and the AI copywriting tools.

use ai_agency::{config::Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        backend = ?config.database_backend,
        google_sign_in = config.google_oauth.is_some(),
        mail_alerts = config.smtp.is_some(),
        "Starting AI Agency server"
    );

    if config.ai_api_key.is_none() {
        tracing::warn!("AI_API_KEY not set, AI tools will report errors");
    }

    let state = Arc::new(AppState::from_config(config.clone()).await?);

    // Build router
    let app = ai_agency::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ai_agency=debug,info")),
        )
        .with(format)
        .init();
}
