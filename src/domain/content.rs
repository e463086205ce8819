//! Generated text content and its SEO analysis.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient::{from_object, lenient};

/// Text artifact returned by the content agent.
///
/// Every field is optional; a field of the wrong JSON type decodes as absent.
/// Field names match what the agent emits and what is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentResult {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub content_title: Option<String>,

    /// Markdown body
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub content_body: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub key_takeaways: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,

    /// Nominally 0-100; agents occasionally send fractions or out-of-range values
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub seo_score: Option<f64>,

    #[serde(flatten)]
    pub seo: SeoMetadata,
}

/// SEO bundle attached to a content result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoMetadata {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title_tag: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub primary_keywords: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub secondary_keywords: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub keyword_density_analysis: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub content_improvements: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub internal_linking_suggestions: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub heading_suggestions: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub overall_assessment: Option<String>,
}

impl ContentResult {
    /// Decode an agent `result` object. Never fails.
    pub fn from_agent_result(value: &Value) -> Self {
        from_object(value)
    }

    /// A result counts as real content once it has a title or a body.
    pub fn has_identity(&self) -> bool {
        let present = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.content_title) || present(&self.content_body)
    }

    /// Non-empty title, if the agent supplied one
    pub fn title(&self) -> Option<&str> {
        self.content_title.as_deref().filter(|t| !t.is_empty())
    }

    /// SEO score clamped into 0..=100, with its band
    pub fn seo_rating(&self) -> SeoRating {
        let score = self
            .seo_score
            .filter(|s| s.is_finite())
            .map(|s| s.clamp(0.0, 100.0).round() as u8)
            .unwrap_or(0);
        SeoRating::new(score)
    }
}

/// Clamped SEO score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeoRating {
    pub score: u8,
    pub band: SeoBand,
}

impl SeoRating {
    pub fn new(score: u8) -> Self {
        let score = score.min(100);
        let band = match score {
            0..=39 => SeoBand::Poor,
            40..=69 => SeoBand::Fair,
            _ => SeoBand::Good,
        };
        Self { score, band }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeoBand {
    Poor,
    Fair,
    Good,
}

impl std::fmt::Display for SeoBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeoBand::Poor => write!(f, "poor"),
            SeoBand::Fair => write!(f, "fair"),
            SeoBand::Good => write!(f, "good"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_flat_agent_result() {
        let value = json!({
            "content_title": "Spring Listings",
            "content_body": "## Intro",
            "hashtags": ["#RealEstate"],
            "seo_score": 82,
            "title_tag": "Spring Listings | Blog",
            "primary_keywords": ["spring listings"],
            "unexpected": {"nested": true}
        });

        let content = ContentResult::from_agent_result(&value);
        assert_eq!(content.title(), Some("Spring Listings"));
        assert_eq!(content.seo.title_tag.as_deref(), Some("Spring Listings | Blog"));
        assert_eq!(
            content.seo.primary_keywords,
            Some(vec!["spring listings".to_string()])
        );
        assert_eq!(content.seo_rating().score, 82);
    }

    #[test]
    fn test_wrong_shapes_are_absent() {
        let value = json!({"content_title": ["nope"], "key_takeaways": "one", "seo_score": "high"});
        let content = ContentResult::from_agent_result(&value);
        assert!(content.content_title.is_none());
        assert!(content.key_takeaways.is_none());
        assert!(content.seo_score.is_none());
        assert!(!content.has_identity());
    }

    #[test]
    fn test_identity_from_body_only() {
        let content = ContentResult {
            content_body: Some("text".to_string()),
            ..Default::default()
        };
        assert!(content.has_identity());
        assert!(content.title().is_none());
    }

    #[test]
    fn test_seo_rating_bands() {
        assert_eq!(SeoRating::new(12).band, SeoBand::Poor);
        assert_eq!(SeoRating::new(40).band, SeoBand::Fair);
        assert_eq!(SeoRating::new(69).band, SeoBand::Fair);
        assert_eq!(SeoRating::new(70).band, SeoBand::Good);

        let content = ContentResult {
            seo_score: Some(140.0),
            ..Default::default()
        };
        assert_eq!(content.seo_rating().score, 100);

        let content = ContentResult {
            seo_score: Some(-3.0),
            ..Default::default()
        };
        assert_eq!(content.seo_rating().score, 0);
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let content = ContentResult {
            content_title: Some("Title".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json, json!({"content_title": "Title"}));
    }
}
