// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store.
//!
//! Each collection is a `DashMap` keyed by document ID, so single-document
//! writes are atomic and concurrent requests never block each other for
//! long. Nothing is persisted.

use crate::error::AppError;
use crate::models::{Project, Query, Review, User};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Default)]
struct Collections {
    users: DashMap<String, User>,
    queries: DashMap<String, Query>,
    reviews: DashMap<String, Review>,
    projects: DashMap<String, Project>,
}

/// In-memory store. Clones share the same collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Collections>,
}

/// Snapshot a collection sorted newest first (ties broken by ID so the
/// order is stable).
fn newest_first<T: Clone>(
    map: &DashMap<String, T>,
    created_at: impl Fn(&T) -> &str,
    keep: impl Fn(&T) -> bool,
) -> Vec<T> {
    let mut docs: Vec<(String, T)> = map
        .iter()
        .filter(|entry| keep(entry.value()))
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect();
    docs.sort_by(|(a_id, a), (b_id, b)| {
        created_at(b)
            .cmp(created_at(a))
            .then_with(|| a_id.cmp(b_id))
    });
    docs.into_iter().map(|(_, doc)| doc).collect()
}

impl MemoryStore {
    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.inner.users.get(email).map(|u| u.value().clone()))
    }

    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        match self.inner.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "User {} already exists",
                user.email
            ))),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.inner.users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    pub async fn record_login(&self, email: &str, at: &str) -> Result<(), AppError> {
        if let Some(mut user) = self.inner.users.get_mut(email) {
            user.last_login = Some(at.to_string());
        }
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(newest_first(&self.inner.users, |u| &u.created_at, |_| true))
    }

    // ─── Query Operations ────────────────────────────────────────

    pub async fn insert_query(&self, query: &Query) -> Result<(), AppError> {
        self.inner.queries.insert(query.id.clone(), query.clone());
        Ok(())
    }

    pub async fn get_query(&self, id: &str) -> Result<Option<Query>, AppError> {
        Ok(self.inner.queries.get(id).map(|q| q.value().clone()))
    }

    pub async fn update_query(&self, query: &Query) -> Result<(), AppError> {
        self.inner.queries.insert(query.id.clone(), query.clone());
        Ok(())
    }

    pub async fn list_queries(&self) -> Result<Vec<Query>, AppError> {
        Ok(newest_first(&self.inner.queries, |q| &q.created_at, |_| true))
    }

    pub async fn list_queries_for_user(&self, email: &str) -> Result<Vec<Query>, AppError> {
        Ok(newest_first(
            &self.inner.queries,
            |q| &q.created_at,
            |q| q.user_email == email,
        ))
    }

    // ─── Review Operations ───────────────────────────────────────

    pub async fn insert_review(&self, review: &Review) -> Result<(), AppError> {
        self.inner.reviews.insert(review.id.clone(), review.clone());
        Ok(())
    }

    pub async fn list_reviews(&self, limit: Option<u32>) -> Result<Vec<Review>, AppError> {
        let mut reviews = newest_first(&self.inner.reviews, |r| &r.created_at, |_| true);
        if let Some(limit) = limit {
            reviews.truncate(limit as usize);
        }
        Ok(reviews)
    }

    pub async fn delete_review(&self, id: &str) -> Result<(), AppError> {
        self.inner.reviews.remove(id);
        Ok(())
    }

    // ─── Project Operations ──────────────────────────────────────

    pub async fn insert_project(&self, project: &Project) -> Result<(), AppError> {
        self.inner
            .projects
            .insert(project.id.clone(), project.clone());
        Ok(())
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        Ok(newest_first(&self.inner.projects, |p| &p.created_at, |_| true))
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        self.inner.projects.remove(id);
        Ok(())
    }
}
