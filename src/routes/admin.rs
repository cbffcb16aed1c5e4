// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin panel: portfolio management, review moderation, query status.
//!
//! Every route here sits behind [`crate::middleware::require_admin`].

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    routing::{get, post},
    Extension, Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::flash;
use crate::middleware::Session;
use crate::models::{new_document_id, Project};
use crate::time_utils::now_rfc3339;
use crate::views::AdminPage;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin", get(admin_panel))
        .route("/add-project", post(add_project))
        .route("/delete-project/{id}", get(delete_project))
        .route("/delete-review/{id}", get(delete_review))
        .route("/toggle-query/{id}", get(toggle_query))
}

async fn admin_panel(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>)> {
    let (queries, projects, reviews, users) = tokio::try_join!(
        state.db.list_queries(),
        state.db.list_projects(),
        state.db.list_reviews(None),
        state.db.list_users(),
    )?;

    let (jar, flash) = flash::take(jar);
    let page = AdminPage {
        session,
        flash,
        queries,
        projects,
        reviews,
        user_count: users.len(),
    };
    Ok((jar, state.views.render("admin.html", &page)?))
}

#[derive(Debug, Deserialize)]
pub struct ProjectForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    description: String,
}

async fn add_project(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ProjectForm>,
) -> Result<(CookieJar, Redirect)> {
    let project = Project {
        id: new_document_id(),
        title: form.title,
        category: form.category,
        image_url: form.image_url,
        description: form.description,
        created_at: now_rfc3339(),
    };

    state.db.insert_project(&project).await?;
    tracing::info!(project_id = %project.id, title = %project.title, "Project added");

    Ok((flash::set(jar, "Project added"), Redirect::to("/admin")))
}

async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    state.db.delete_project(&id).await?;
    tracing::info!(project_id = %id, "Project deleted");
    Ok(Redirect::to("/admin"))
}

async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    state.db.delete_review(&id).await?;
    tracing::info!(review_id = %id, "Review deleted");
    Ok(Redirect::to("/admin"))
}

async fn toggle_query(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let mut query = state
        .db
        .get_query(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Query {} not found", id)))?;

    query.status = query.status.toggled();
    state.db.update_query(&query).await?;
    tracing::info!(query_id = %id, status = query.status.as_str(), "Query status changed");

    Ok(Redirect::to("/admin"))
}
