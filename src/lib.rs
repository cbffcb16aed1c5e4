// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! AI Agency: marketing agency web site
//!
//! Server-rendered pages for visitors and customers, a query and review
//! board, an admin panel for the project portfolio, and AI copywriting
//! tools backed by a hosted chat-completion API.

pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod views;

use config::Config;
use db::Database;
use services::{CompletionClient, GoogleOAuthClient, Mailer};
use views::Views;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub views: Views,
    pub ai: CompletionClient,
    pub mailer: Mailer,
    /// `None` when Google sign-in is not configured
    pub google: Option<GoogleOAuthClient>,
}

impl AppState {
    /// Build the state from configuration, connecting to the database and
    /// mail relay.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let db = Database::connect(&config).await?;
        let views = Views::new()?;
        let ai = CompletionClient::new(&config);
        let mailer = Mailer::new(config.smtp.as_ref())?;
        let google = config.google_oauth.as_ref().map(GoogleOAuthClient::new);

        Ok(Self {
            config,
            db,
            views,
            ai,
            mailer,
            google,
        })
    }
}
