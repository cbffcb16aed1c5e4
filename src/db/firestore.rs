// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (keyed by URL-encoded email)
//! - Queries, reviews and projects (keyed by generated UUID)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Project, Query, Review, User};
use firestore::errors::FirestoreError;
use firestore::FirestoreQueryDirection;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
}

/// Email addresses may legally contain `/`, which Firestore rejects in IDs.
fn user_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}

fn db_err(e: FirestoreError) -> AppError {
    AppError::Database(e.to_string())
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, email: &str) -> Result<Option<User>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&user_doc_id(email))
            .await
            .map_err(db_err)
    }

    /// Insert a user; Firestore rejects the create if the document exists.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let result: Result<(), FirestoreError> = self
            .client
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(user_doc_id(&user.email))
            .object(user)
            .execute()
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(FirestoreError::DataConflictError(_)) => Err(AppError::Conflict(format!(
                "User {} already exists",
                user.email
            ))),
            Err(e) => Err(db_err(e)),
        }
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user_doc_id(&user.email))
            .object(user)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }

    /// Stamp `last_login` without touching the rest of the document.
    pub async fn record_login(&self, email: &str, at: &str) -> Result<(), AppError> {
        #[derive(serde::Serialize)]
        struct LoginStamp<'a> {
            last_login: &'a str,
        }

        let _: () = self
            .client
            .fluent()
            .update()
            .fields(["last_login"])
            .in_col(collections::USERS)
            .document_id(user_doc_id(email))
            .object(&LoginStamp { last_login: at })
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::USERS)
            .order_by([("created_at", FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(db_err)
    }

    // ─── Query Operations ────────────────────────────────────────

    pub async fn insert_query(&self, query: &Query) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .insert()
            .into(collections::QUERIES)
            .document_id(&query.id)
            .object(query)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }

    pub async fn get_query(&self, id: &str) -> Result<Option<Query>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::QUERIES)
            .obj()
            .one(id)
            .await
            .map_err(db_err)
    }

    pub async fn update_query(&self, query: &Query) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::QUERIES)
            .document_id(&query.id)
            .object(query)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }

    pub async fn list_queries(&self) -> Result<Vec<Query>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::QUERIES)
            .order_by([("created_at", FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(db_err)
    }

    pub async fn list_queries_for_user(&self, email: &str) -> Result<Vec<Query>, AppError> {
        let email = email.to_string();
        self.client
            .fluent()
            .select()
            .from(collections::QUERIES)
            .filter(move |q| q.for_all([q.field("user_email").eq(email.clone())]))
            .order_by([("created_at", FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(db_err)
    }

    // ─── Review Operations ───────────────────────────────────────

    pub async fn insert_review(&self, review: &Review) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .insert()
            .into(collections::REVIEWS)
            .document_id(&review.id)
            .object(review)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }

    pub async fn list_reviews(&self, limit: Option<u32>) -> Result<Vec<Review>, AppError> {
        let query = self
            .client
            .fluent()
            .select()
            .from(collections::REVIEWS)
            .order_by([("created_at", FirestoreQueryDirection::Descending)]);

        let query = match limit {
            Some(limit) => query.limit(limit),
            None => query,
        };

        query.obj().query().await.map_err(db_err)
    }

    pub async fn delete_review(&self, id: &str) -> Result<(), AppError> {
        self.client
            .fluent()
            .delete()
            .from(collections::REVIEWS)
            .document_id(id)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }

    // ─── Project Operations ──────────────────────────────────────

    pub async fn insert_project(&self, project: &Project) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .insert()
            .into(collections::PROJECTS)
            .document_id(&project.id)
            .object(project)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::PROJECTS)
            .order_by([("created_at", FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(db_err)
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        self.client
            .fluent()
            .delete()
            .from(collections::PROJECTS)
            .document_id(id)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
