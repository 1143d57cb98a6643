use async_trait::async_trait;

use crate::error::Result;
use crate::models::recommendation::{BookRecommendationEntry, VideoRecommendationEntry};
use crate::models::report::{NewReport, Report};

/// Narrows a recommendation lookup. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationFilter {
    /// Case-insensitive substring of any set's `skill`.
    pub skill: Option<String>,
    pub user_email: Option<String>,
}

impl RecommendationFilter {
    pub fn by_skill(skill: impl Into<String>) -> Self {
        Self {
            skill: Some(skill.into()),
            user_email: None,
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            skill: None,
            user_email: Some(email.into()),
        }
    }
}

/// Durable storage for reports and recommendation entries. Records are
/// append-only; nothing here updates or deletes.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn insert_report(&self, report: NewReport) -> Result<Report>;

    /// Newest first.
    async fn find_reports_by_email(&self, email: &str) -> Result<Vec<Report>>;

    async fn insert_videos(&self, entry: VideoRecommendationEntry) -> Result<VideoRecommendationEntry>;

    async fn find_videos(&self, filter: &RecommendationFilter) -> Result<Vec<VideoRecommendationEntry>>;

    async fn insert_books(&self, entry: BookRecommendationEntry) -> Result<BookRecommendationEntry>;

    async fn find_books(&self, filter: &RecommendationFilter) -> Result<Vec<BookRecommendationEntry>>;
}
