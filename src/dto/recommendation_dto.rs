use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::recommendation::OwnerId;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecommendationPayload {
    #[serde(default, rename = "userId")]
    pub owner: Option<OwnerId>,
    #[serde(default)]
    pub user_email: Option<String>,
    /// Array of video or book sets, checked by the service.
    #[serde(default)]
    pub recommendations: Option<JsonValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoQuery {
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> RecommendationResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
