//! Campaign records: a content result paired with an optional graphic.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::content::ContentResult;
use super::graphic::GraphicResult;
use super::lenient::{lenient_date, lenient_or_default};

/// Campaign identifier (`campaign-<uuid>` for generated campaigns)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(String);

impl CampaignId {
    /// Generate a fresh, unique identifier
    pub fn generate() -> Self {
        Self(format!("campaign-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CampaignId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CampaignId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for CampaignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted campaign entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,

    #[serde(default, deserialize_with = "lenient_or_default")]
    pub title: String,

    #[serde(default, deserialize_with = "lenient_or_default")]
    pub content_type: String,

    /// UTC calendar day of creation (YYYY-MM-DD)
    #[serde(deserialize_with = "lenient_date")]
    pub date: NaiveDate,

    #[serde(rename = "contentData", default)]
    pub content_data: Option<ContentResult>,

    #[serde(rename = "graphicData", default)]
    pub graphic_data: Option<GraphicResult>,
}

impl Campaign {
    /// Create a campaign dated today (UTC) with no graphic attached
    pub fn new(
        title: impl Into<String>,
        content_type: impl Into<String>,
        content: ContentResult,
    ) -> Self {
        Self {
            id: CampaignId::generate(),
            title: title.into(),
            content_type: content_type.into(),
            date: Utc::now().date_naive(),
            content_data: Some(content),
            graphic_data: None,
        }
    }

    /// Set the creation date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn has_graphic(&self) -> bool {
        self.graphic_data.is_some()
    }
}
