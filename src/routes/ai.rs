//! AI copywriting endpoints. Each returns an HTML fragment.

use axum::{extract::State, response::Html, routing::post, Form, Router};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::services::ContentKind;
use crate::views::AiResult;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/youtube-gen", post(youtube_gen))
        .route("/api/insta-gen", post(insta_gen))
}

#[derive(Deserialize)]
pub struct TopicForm {
    #[serde(default)]
    topic: String,
}

#[derive(Deserialize)]
pub struct PhotoForm {
    #[serde(default)]
    description: String,
}

async fn youtube_gen(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TopicForm>,
) -> Result<Html<String>> {
    generate(&state, ContentKind::YoutubeTitles, &form.topic).await
}

async fn insta_gen(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PhotoForm>,
) -> Result<Html<String>> {
    generate(&state, ContentKind::InstagramCaptions, &form.description).await
}

async fn generate(state: &AppState, kind: ContentKind, input: &str) -> Result<Html<String>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::BadRequest("Please describe what to write about".to_string()));
    }

    let reply = state.ai.generate(kind, input).await?;
    state.views.render("ai_result.html", &AiResult::new(kind, reply))
}
