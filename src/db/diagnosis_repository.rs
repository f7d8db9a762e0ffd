use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::error;

use super::DiagnosisRecorder;
use crate::errors::AppError;
use crate::models::{DiagnosisRecord, NewDiagnosisRecord};

#[derive(Clone)]
pub struct DiagnosisRepository {
    pool: PgPool,
}

impl DiagnosisRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DiagnosisRecorder for DiagnosisRepository {
    async fn append(&self, record: &NewDiagnosisRecord) -> Result<DiagnosisRecord, AppError> {
        let mut stored = DiagnosisRecord::from_new(record, Utc::now());

        // created_at comes from the database clock.
        let created_at: DateTime<Utc> = sqlx::query_scalar(
            "INSERT INTO diagnoses
                (id, user_id, predicted_class_english, predicted_class_thai,
                 confidence, location, other_symptoms)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING created_at",
        )
        .bind(&stored.id)
        .bind(&stored.user_id)
        .bind(&stored.predicted_class_english)
        .bind(&stored.predicted_class_thai)
        .bind(stored.confidence)
        .bind(&stored.location)
        .bind(&stored.other_symptoms)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to save diagnosis record for user {}: {e}", record.user_id);
            AppError::db_query("Failed to save diagnosis record", e)
        })?;

        stored.created_at = created_at;
        Ok(stored)
    }
}
