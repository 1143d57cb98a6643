use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_COLLEGE_NAME: &str = "Unknown College";
pub const DEFAULT_ROLE: &str = "Student";

/// Narrative evaluation of one submission. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub subject: String,
    pub email: String,
    pub college_name: String,
    pub role: String,
    #[sqlx(rename = "report_analysis")]
    #[serde(rename = "reportAnalysis")]
    pub report_analysis_text: String,
    pub score: i32,
    pub total_questions: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub subject: String,
    pub email: String,
    pub college_name: String,
    pub role: String,
    pub report_analysis_text: String,
    pub score: i32,
    pub total_questions: i32,
}

impl NewReport {
    pub fn into_report(self) -> Report {
        Report {
            id: Uuid::new_v4(),
            subject: self.subject,
            email: self.email,
            college_name: self.college_name,
            role: self.role,
            report_analysis_text: self.report_analysis_text,
            score: self.score,
            total_questions: self.total_questions,
            created_at: Utc::now(),
        }
    }
}
