use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::store::{AssessmentStore, RecommendationFilter};
use crate::error::Result;
use crate::models::recommendation::{
    BookRecommendationEntry, RecommendationEntry, SkillSet, VideoRecommendationEntry,
};
use crate::models::report::{NewReport, Report};

/// Process-local store for tests and database-less local runs.
#[derive(Default)]
pub struct InMemoryAssessmentStore {
    reports: RwLock<Vec<Report>>,
    videos: RwLock<Vec<VideoRecommendationEntry>>,
    books: RwLock<Vec<BookRecommendationEntry>>,
}

impl InMemoryAssessmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn report_count(&self) -> usize {
        self.reports.read().await.len()
    }
}

fn matches_filter<S: SkillSet>(entry: &RecommendationEntry<S>, filter: &RecommendationFilter) -> bool {
    let skill_ok = filter.skill.as_deref().map_or(true, |needle| {
        let needle = needle.to_lowercase();
        entry
            .recommendations
            .iter()
            .any(|set| set.skill().to_lowercase().contains(&needle))
    });
    let email_ok = filter
        .user_email
        .as_deref()
        .map_or(true, |email| entry.user_email.as_deref() == Some(email));
    skill_ok && email_ok
}

/// Newest first; among equal timestamps the later insert wins.
fn newest_first<T: Clone>(items: &[T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    let mut out: Vec<T> = items.iter().rev().cloned().collect();
    out.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    out
}

#[async_trait]
impl AssessmentStore for InMemoryAssessmentStore {
    async fn insert_report(&self, report: NewReport) -> Result<Report> {
        let report = report.into_report();
        self.reports.write().await.push(report.clone());
        Ok(report)
    }

    async fn find_reports_by_email(&self, email: &str) -> Result<Vec<Report>> {
        let reports = self.reports.read().await;
        let mine: Vec<Report> = reports.iter().filter(|r| r.email == email).cloned().collect();
        Ok(newest_first(&mine, |r| r.created_at))
    }

    async fn insert_videos(&self, entry: VideoRecommendationEntry) -> Result<VideoRecommendationEntry> {
        self.videos.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn find_videos(&self, filter: &RecommendationFilter) -> Result<Vec<VideoRecommendationEntry>> {
        let videos = self.videos.read().await;
        let found: Vec<_> = videos.iter().filter(|e| matches_filter(e, filter)).cloned().collect();
        Ok(newest_first(&found, |e| e.created_at))
    }

    async fn insert_books(&self, entry: BookRecommendationEntry) -> Result<BookRecommendationEntry> {
        self.books.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn find_books(&self, filter: &RecommendationFilter) -> Result<Vec<BookRecommendationEntry>> {
        let books = self.books.read().await;
        let found: Vec<_> = books.iter().filter(|e| matches_filter(e, filter)).cloned().collect();
        Ok(newest_first(&found, |e| e.created_at))
    }
}
