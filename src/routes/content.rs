// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Customer submissions: queries and reviews.

use axum::{extract::State, response::Redirect, routing::post, Extension, Form, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::flash;
use crate::middleware::Session;
use crate::models::{new_document_id, Query, QueryStatus, Review};
use crate::services::mailer;
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/submit-query", post(submit_query))
        .route("/submit-review", post(submit_review))
}

/// Missing fields are stored as empty strings.
#[derive(Debug, Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    service: String,
    #[serde(default)]
    message: String,
}

async fn submit_query(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
    Form(form): Form<QueryForm>,
) -> Result<(CookieJar, Redirect)> {
    let query = Query {
        id: new_document_id(),
        user_email: session.email,
        user_name: session.name,
        service_type: form.service,
        message: form.message,
        status: QueryStatus::Pending,
        created_at: now_rfc3339(),
    };

    state.db.insert_query(&query).await?;
    tracing::info!(query_id = %query.id, email = %query.user_email, "Query submitted");

    let (subject, body) = mailer::query_alert(
        &query.user_name,
        &query.user_email,
        &query.service_type,
        &query.message,
    );
    state
        .mailer
        .notify(&state.config.admin_email, &subject, &body)
        .await;

    Ok((
        flash::set(jar, "Query submitted! We will get back to you soon."),
        Redirect::to("/dashboard"),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    rating: String,
    #[serde(default)]
    comment: String,
}

#[derive(Debug, Validate)]
struct NewReview {
    #[validate(range(min = 1, max = 5))]
    rating: i32,
}

/// Parse a star rating from form input.
fn parse_rating(raw: &str) -> Result<i32> {
    let rating: i32 = raw.trim().parse().map_err(|_| {
        tracing::info!(rating = %raw, "Review rejected, rating is not a number");
        AppError::BadRequest("Rating must be a whole number".to_string())
    })?;

    NewReview { rating }.validate().map_err(|_| {
        tracing::info!(rating, "Review rejected, rating outside 1-5");
        AppError::BadRequest("Rating must be between 1 and 5".to_string())
    })?;

    Ok(rating)
}

async fn submit_review(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
    Form(form): Form<ReviewForm>,
) -> Result<(CookieJar, Redirect)> {
    let review = Review {
        id: new_document_id(),
        rating: parse_rating(&form.rating)?,
        author_name: session.name,
        author_email: session.email,
        comment: form.comment,
        created_at: now_rfc3339(),
    };

    state.db.insert_review(&review).await?;
    tracing::info!(review_id = %review.id, rating = review.rating, "Review submitted");

    Ok((flash::set(jar, "Thank you for your review!"), Redirect::to("/")))
}
