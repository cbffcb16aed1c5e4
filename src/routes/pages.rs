//! Home page and customer dashboard.

use axum::{extract::State, response::Html, routing::get, Extension, Router};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::db::HOME_REVIEW_LIMIT;
use crate::error::Result;
use crate::flash;
use crate::middleware::auth::current_session;
use crate::middleware::Session;
use crate::views::{DashboardPage, HomePage};
use crate::AppState;

/// Pages anyone can see.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(home))
}

/// Pages behind the login redirect.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard", get(dashboard))
}

async fn home(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>)> {
    let session = current_session(&jar, &state.config.session_secret);

    let (reviews, projects) = tokio::try_join!(
        state.db.list_reviews(Some(HOME_REVIEW_LIMIT)),
        state.db.list_projects(),
    )?;

    let (jar, flash) = flash::take(jar);
    let page = HomePage {
        session,
        flash,
        reviews,
        projects,
    };
    Ok((jar, state.views.render("home.html", &page)?))
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>)> {
    let queries = state.db.list_queries_for_user(&session.email).await?;

    let (jar, flash) = flash::take(jar);
    let page = DashboardPage {
        session,
        flash,
        queries,
    };
    Ok((jar, state.views.render("dashboard.html", &page)?))
}
