use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::PgPool;

use crate::database::store::{AssessmentStore, RecommendationFilter};
use crate::error::Result;
use crate::models::recommendation::{
    BookRecommendationEntry, RecommendationEntry, RecommendationKind, RecommendationRow,
    VideoRecommendationEntry,
};
use crate::models::report::{NewReport, Report};

#[derive(Clone)]
pub struct PgAssessmentStore {
    pool: PgPool,
}

impl PgAssessmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_entry<S: Serialize + DeserializeOwned>(
        &self,
        kind: RecommendationKind,
        entry: RecommendationEntry<S>,
    ) -> Result<RecommendationEntry<S>> {
        let row = RecommendationRow::from_entry(kind, &entry)?;
        let saved = sqlx::query_as::<_, RecommendationRow>(
            r#"
            INSERT INTO recommendations
                (id, kind, owner_uuid, owner_email, user_email, recommendations, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, kind, owner_uuid, owner_email, user_email, recommendations, created_at
            "#,
        )
        .bind(row.id)
        .bind(&row.kind)
        .bind(row.owner_uuid)
        .bind(&row.owner_email)
        .bind(&row.user_email)
        .bind(&row.recommendations)
        .bind(row.created_at)
        .fetch_one(&self.pool)
        .await?;
        saved.into_entry()
    }

    async fn find_entries<S: DeserializeOwned>(
        &self,
        kind: RecommendationKind,
        filter: &RecommendationFilter,
    ) -> Result<Vec<RecommendationEntry<S>>> {
        let rows = sqlx::query_as::<_, RecommendationRow>(
            r#"
            SELECT id, kind, owner_uuid, owner_email, user_email, recommendations, created_at
            FROM recommendations
            WHERE kind = $1
              AND ($2::text IS NULL OR EXISTS (
                    SELECT 1 FROM jsonb_array_elements(recommendations) AS r
                    WHERE strpos(lower(r->>'skill'), lower($2)) > 0
                  ))
              AND ($3::text IS NULL OR user_email = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(kind.as_str())
        .bind(&filter.skill)
        .bind(&filter.user_email)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RecommendationRow::into_entry).collect()
    }
}

#[async_trait]
impl AssessmentStore for PgAssessmentStore {
    async fn insert_report(&self, report: NewReport) -> Result<Report> {
        let report = report.into_report();
        let saved = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO assessment_reports
                (id, subject, email, college_name, role, report_analysis, score, total_questions, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, subject, email, college_name, role, report_analysis, score, total_questions, created_at
            "#,
        )
        .bind(report.id)
        .bind(&report.subject)
        .bind(&report.email)
        .bind(&report.college_name)
        .bind(&report.role)
        .bind(&report.report_analysis_text)
        .bind(report.score)
        .bind(report.total_questions)
        .bind(report.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn find_reports_by_email(&self, email: &str) -> Result<Vec<Report>> {
        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, subject, email, college_name, role, report_analysis, score, total_questions, created_at
            FROM assessment_reports
            WHERE email = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }

    async fn insert_videos(&self, entry: VideoRecommendationEntry) -> Result<VideoRecommendationEntry> {
        self.insert_entry(RecommendationKind::Video, entry).await
    }

    async fn find_videos(&self, filter: &RecommendationFilter) -> Result<Vec<VideoRecommendationEntry>> {
        self.find_entries(RecommendationKind::Video, filter).await
    }

    async fn insert_books(&self, entry: BookRecommendationEntry) -> Result<BookRecommendationEntry> {
        self.insert_entry(RecommendationKind::Book, entry).await
    }

    async fn find_books(&self, filter: &RecommendationFilter) -> Result<Vec<BookRecommendationEntry>> {
        self.find_entries(RecommendationKind::Book, filter).await
    }
}
