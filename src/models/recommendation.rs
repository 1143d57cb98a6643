use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Who a recommendation entry belongs to. Older clients send a plain email
/// where newer ones send an account id; both are kept, never guessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnerId {
    Structured(Uuid),
    RawEmail(String),
}

impl OwnerId {
    /// Splits the owner into the two storage columns.
    pub fn into_columns(owner: Option<&OwnerId>) -> (Option<Uuid>, Option<String>) {
        match owner {
            Some(OwnerId::Structured(id)) => (Some(*id), None),
            Some(OwnerId::RawEmail(email)) => (None, Some(email.clone())),
            None => (None, None),
        }
    }

    pub fn from_columns(owner_uuid: Option<Uuid>, owner_email: Option<String>) -> Option<Self> {
        match (owner_uuid, owner_email) {
            (Some(id), _) => Some(OwnerId::Structured(id)),
            (None, Some(email)) => Some(OwnerId::RawEmail(email)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecommendationSet {
    pub skill: String,
    pub videos: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecommendationSet {
    pub skill: String,
    pub books: Vec<Link>,
}

/// Anything that can be filtered by the skill it covers.
pub trait SkillSet {
    fn skill(&self) -> &str;
}

impl SkillSet for VideoRecommendationSet {
    fn skill(&self) -> &str {
        &self.skill
    }
}

impl SkillSet for BookRecommendationSet {
    fn skill(&self) -> &str {
        &self.skill
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationKind {
    Video,
    Book,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::Video => "video",
            RecommendationKind::Book => "book",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationEntry<S> {
    pub id: Uuid,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerId>,
    pub user_email: Option<String>,
    pub recommendations: Vec<S>,
    pub created_at: DateTime<Utc>,
}

pub type VideoRecommendationEntry = RecommendationEntry<VideoRecommendationSet>;
pub type BookRecommendationEntry = RecommendationEntry<BookRecommendationSet>;

impl<S> RecommendationEntry<S> {
    pub fn new(owner: Option<OwnerId>, user_email: Option<String>, recommendations: Vec<S>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            user_email,
            recommendations,
            created_at: Utc::now(),
        }
    }
}

/// Storage shape: one row per entry, the sets kept as a JSON document.
#[derive(Debug, Clone, FromRow)]
pub struct RecommendationRow {
    pub id: Uuid,
    pub kind: String,
    pub owner_uuid: Option<Uuid>,
    pub owner_email: Option<String>,
    pub user_email: Option<String>,
    pub recommendations: JsonValue,
    pub created_at: DateTime<Utc>,
}

impl RecommendationRow {
    pub fn from_entry<S: Serialize>(
        kind: RecommendationKind,
        entry: &RecommendationEntry<S>,
    ) -> Result<Self> {
        let (owner_uuid, owner_email) = OwnerId::into_columns(entry.owner.as_ref());
        Ok(Self {
            id: entry.id,
            kind: kind.as_str().to_string(),
            owner_uuid,
            owner_email,
            user_email: entry.user_email.clone(),
            recommendations: serde_json::to_value(&entry.recommendations)?,
            created_at: entry.created_at,
        })
    }

    pub fn into_entry<S: serde::de::DeserializeOwned>(self) -> Result<RecommendationEntry<S>> {
        let recommendations = serde_json::from_value(self.recommendations).map_err(|e| {
            Error::Persistence(format!("Corrupt recommendation entry {}: {}", self.id, e))
        })?;
        Ok(RecommendationEntry {
            id: self.id,
            owner: OwnerId::from_columns(self.owner_uuid, self.owner_email),
            user_email: self.user_email,
            recommendations,
            created_at: self.created_at,
        })
    }
}
