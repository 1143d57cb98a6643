use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::database::store::{AssessmentStore, RecommendationFilter};
use crate::dto::recommendation_dto::CreateRecommendationPayload;
use crate::error::{Error, Result};
use crate::models::recommendation::{
    BookRecommendationEntry, Link, RecommendationEntry, VideoRecommendationEntry,
    VideoRecommendationSet,
};

const STUDENT_SUBJECT: &str = "student";

#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<dyn AssessmentStore>,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn AssessmentStore>) -> Self {
        Self { store }
    }

    /// Stored video sets matching the subject (or the user, when no subject is
    /// given). Falls back to the built-in catalog when nothing is stored or the
    /// subject is the generic "student".
    pub async fn find_videos(
        &self,
        subject: Option<&str>,
        user_email: Option<&str>,
    ) -> Result<Vec<VideoRecommendationEntry>> {
        let subject = subject.map(str::trim).filter(|s| !s.is_empty());
        let is_student = subject
            .map(|s| s.eq_ignore_ascii_case(STUDENT_SUBJECT))
            .unwrap_or(false);
        let user_email = user_email.map(str::trim).filter(|e| !e.is_empty());

        let filter = match (subject, user_email) {
            (Some(s), _) if !is_student => RecommendationFilter::by_skill(s),
            (_, Some(email)) => RecommendationFilter::by_email(email),
            _ => RecommendationFilter::default(),
        };

        let found = self.store.find_videos(&filter).await?;
        tracing::info!(?filter, found = found.len(), "Video recommendations lookup");

        if found.is_empty() || is_student {
            return Ok(vec![catalog_for(subject)]);
        }
        Ok(found)
    }

    pub async fn save_videos(
        &self,
        payload: CreateRecommendationPayload,
    ) -> Result<VideoRecommendationEntry> {
        let recommendations = require_sets(payload.recommendations)?;
        let entry = RecommendationEntry::new(payload.owner, payload.user_email, recommendations);
        self.store.insert_videos(entry).await
    }

    pub async fn find_books(&self, user_email: Option<&str>) -> Result<Vec<BookRecommendationEntry>> {
        let filter = match user_email.map(str::trim).filter(|e| !e.is_empty()) {
            Some(email) => RecommendationFilter::by_email(email),
            None => RecommendationFilter::default(),
        };
        self.store.find_books(&filter).await
    }

    pub async fn save_books(
        &self,
        payload: CreateRecommendationPayload,
    ) -> Result<BookRecommendationEntry> {
        let recommendations = require_sets(payload.recommendations)?;
        let entry = RecommendationEntry::new(payload.owner, payload.user_email, recommendations);
        self.store.insert_books(entry).await
    }
}

/// The payload must carry an array; each element must have the set's shape.
fn require_sets<S: DeserializeOwned>(sets: Option<JsonValue>) -> Result<Vec<S>> {
    match sets {
        Some(value @ JsonValue::Array(_)) => serde_json::from_value(value)
            .map_err(|e| Error::Validation(format!("Invalid recommendations: {}", e))),
        _ => Err(Error::Validation("Recommendations array is required".to_string())),
    }
}

fn video(title: &str, url: &str) -> Link {
    Link {
        title: title.to_string(),
        url: url.to_string(),
    }
}

fn set(skill: &str, videos: Vec<Link>) -> VideoRecommendationSet {
    VideoRecommendationSet {
        skill: skill.to_string(),
        videos,
    }
}

/// Built-in videos keyed by subject keyword.
pub fn catalog_for(subject: Option<&str>) -> VideoRecommendationEntry {
    let sub = subject.unwrap_or_default().to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| sub.contains(w));

    let sets = if has(&["pcb"]) {
        vec![set(
            "PCB (Printed Circuit Board) Design & Assembly",
            vec![
                video("Electronic Component Soldering Basics", "https://www.youtube.com/watch?v=f95i88OSWB4"),
                video("How a PCB is Manufactured", "https://www.youtube.com/watch?v=yvTid2j7oY4"),
                video("Basics of PCB Design for Beginners", "https://www.youtube.com/watch?v=3Sia7A_f_H8"),
                video("Surface Mount Technology (SMT) Overview", "https://www.youtube.com/watch?v=3C9_6A_v4fU"),
                video("Hand Soldering Techniques for PCBs", "https://www.youtube.com/watch?v=vIT4ra6Mo0s"),
            ],
        )]
    } else if has(&["aao", "automotive", "assembly", "operator"]) {
        vec![set(
            "AAO (Automotive Assembly Operator) Process & Safety",
            vec![
                video("Modern Car Assembly Line Tour", "https://www.youtube.com/watch?v=2n6_9O-K1S8"),
                video("How a Car is Made: Factory Tour", "https://www.youtube.com/watch?v=8_lS-9257-U"),
                video("Workplace Safety in Automotive Plants", "https://www.youtube.com/watch?v=Xh0mC_y9m_o"),
                video("Assembly Line Skills & Techniques", "https://www.youtube.com/watch?v=pAnR9_wW3fI"),
                video("Industrial Safety Training Overview", "https://www.youtube.com/watch?v=m2G-rJp8k5A"),
            ],
        )]
    } else if has(&["english", "communication"]) {
        vec![set(
            "English Communication",
            vec![
                video("English Conversation Practice", "https://www.youtube.com/watch?v=kY6T-K1X4oM"),
                video("Professional English for Interviews", "https://www.youtube.com/watch?v=X0V7mZ17hK0"),
            ],
        )]
    } else if has(&["math", "ganit"]) {
        vec![set(
            "Mathematics Foundations",
            vec![
                video("Basic Maths Concepts in Marathi", "https://www.youtube.com/watch?v=3Sia7A_f_H8"),
                video("Ganit Maithili Skills", "https://www.youtube.com/watch?v=0kFp6c9m-xU"),
            ],
        )]
    } else {
        vec![
            set(
                "Core Technical Skills (PCB & Assembly)",
                vec![
                    video("How PCBs are Made - Step by Step", "https://www.youtube.com/watch?v=T_7bY7F0lXo"),
                    video("Electronic Component Soldering Basics", "https://www.youtube.com/watch?v=f95i88OSWB4"),
                ],
            ),
            set(
                "Industrial Operations (AAO & Safety)",
                vec![
                    video("Modern Car Assembly Line Tour", "https://www.youtube.com/watch?v=2n6_9O-K1S8"),
                    video("Automotive Manufacturing Overview", "https://www.youtube.com/watch?v=pAnR9_wW3fI"),
                ],
            ),
        ]
    };

    RecommendationEntry::new(None, None, sets)
}
