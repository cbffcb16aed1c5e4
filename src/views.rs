//! HTML rendering.
//!
//! Templates are compiled into the binary and autoescaped. Each page has a
//! context struct; handlers fill one in and call [`Views::render`].

use crate::error::AppError;
use crate::middleware::Session;
use crate::models::{Project, Query, Review};
use crate::services::ai::{ContentKind, ParsedReply};
use axum::response::Html;
use serde::Serialize;
use tera::{Context, Tera};

const TEMPLATES: [(&str, &str); 7] = [
    ("base.html", include_str!("../templates/base.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("signup.html", include_str!("../templates/signup.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("admin.html", include_str!("../templates/admin.html")),
    ("ai_result.html", include_str!("../templates/ai_result.html")),
];

/// Compiled template set.
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    /// Render a page from its context struct.
    pub fn render<T: Serialize>(&self, name: &str, page: &T) -> Result<Html<String>, AppError> {
        let context = Context::from_serialize(page)?;
        Ok(Html(self.tera.render(name, &context)?))
    }
}

#[derive(Serialize)]
pub struct HomePage {
    pub session: Option<Session>,
    pub flash: Option<String>,
    pub reviews: Vec<Review>,
    pub projects: Vec<Project>,
}

/// Login and signup forms.
#[derive(Serialize)]
pub struct AuthPage {
    pub session: Option<Session>,
    pub flash: Option<String>,
    pub google_enabled: bool,
}

#[derive(Serialize)]
pub struct DashboardPage {
    pub session: Session,
    pub flash: Option<String>,
    pub queries: Vec<Query>,
}

#[derive(Serialize)]
pub struct AdminPage {
    pub session: Session,
    pub flash: Option<String>,
    pub queries: Vec<Query>,
    pub projects: Vec<Project>,
    pub reviews: Vec<Review>,
    pub user_count: usize,
}

/// Fragment returned by the AI tools.
#[derive(Serialize)]
pub struct AiResult {
    pub label: &'static str,
    pub tags_label: &'static str,
    pub items: Vec<String>,
    pub tags: String,
    pub raw: Option<String>,
}

impl AiResult {
    pub fn new(kind: ContentKind, reply: ParsedReply) -> Self {
        let (items, tags, raw) = match reply {
            ParsedReply::Parsed(generated) => (generated.items, generated.tags, None),
            ParsedReply::Unparseable { raw } => (Vec::new(), String::new(), Some(raw)),
        };

        Self {
            label: kind.item_label(),
            tags_label: kind.tags_marker().trim_end_matches(':'),
            items,
            tags,
            raw,
        }
    }
}
