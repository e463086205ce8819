//! User briefs and the prompts built from them.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTENT_TYPE: &str = "Blog Post";
pub const DEFAULT_AUDIENCE: &str = "Realtors";
pub const DEFAULT_TONE: &str = "Professional";
pub const DEFAULT_GRAPHIC_TYPE: &str = "Social Banner";
pub const DEFAULT_ASPECT_RATIO: &str = "16:9 Landscape";

/// Brand directive appended to every graphic prompt
pub const BRAND_STYLE_DIRECTIVE: &str = "Use warm heritage premium brand colors. \
The graphic should be visually appealing and professional for AI Growth Community marketing.";

/// Blank fields fall back to their defaults
fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default
    } else {
        trimmed
    }
}

/// Input for a content generation. Only `topic` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBrief {
    pub topic: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub key_message: String,
    #[serde(default)]
    pub tone: String,
}

impl ContentBrief {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Default::default()
        }
    }

    /// The generation can only start with a topic
    pub fn is_ready(&self) -> bool {
        !self.topic.trim().is_empty()
    }

    pub fn topic(&self) -> &str {
        self.topic.trim()
    }

    pub fn effective_content_type(&self) -> &str {
        or_default(&self.content_type, DEFAULT_CONTENT_TYPE)
    }

    pub fn effective_audience(&self) -> &str {
        or_default(&self.audience, DEFAULT_AUDIENCE)
    }

    /// Key message falls back to the topic itself
    pub fn effective_key_message(&self) -> &str {
        or_default(&self.key_message, self.topic())
    }

    pub fn effective_tone(&self) -> &str {
        or_default(&self.tone, DEFAULT_TONE)
    }

    /// Prompt sent to the content agent
    pub fn prompt(&self) -> String {
        format!(
            "Create a {} about \"{}\" targeting {}. Key message: {}. Tone: {}. \
             Please provide full SEO-optimized content with all SEO analysis fields.",
            self.effective_content_type(),
            self.topic(),
            self.effective_audience(),
            self.effective_key_message(),
            self.effective_tone(),
        )
    }
}

/// Input for a graphic generation. Only `headline` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicBrief {
    pub headline: String,
    #[serde(default)]
    pub graphic_type: String,
    #[serde(default)]
    pub aspect_ratio: String,
    #[serde(default)]
    pub style_notes: String,
}

impl GraphicBrief {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            ..Default::default()
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.headline.trim().is_empty()
    }

    pub fn headline(&self) -> &str {
        self.headline.trim()
    }

    pub fn effective_graphic_type(&self) -> &str {
        or_default(&self.graphic_type, DEFAULT_GRAPHIC_TYPE)
    }

    pub fn effective_aspect_ratio(&self) -> &str {
        or_default(&self.aspect_ratio, DEFAULT_ASPECT_RATIO)
    }

    /// Prompt sent to the graphic agent
    pub fn prompt(&self) -> String {
        let mut prompt = format!(
            "Create a {} graphic with headline \"{}\". Aspect ratio: {}.",
            self.effective_graphic_type(),
            self.headline(),
            self.effective_aspect_ratio(),
        );

        let notes = self.style_notes.trim();
        if !notes.is_empty() {
            prompt.push_str(&format!(" Style notes: {}", notes));
        }

        prompt.push(' ');
        prompt.push_str(BRAND_STYLE_DIRECTIVE);
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_prompt_defaults() {
        let brief = ContentBrief::new("Spring market");
        assert_eq!(
            brief.prompt(),
            "Create a Blog Post about \"Spring market\" targeting Realtors. \
             Key message: Spring market. Tone: Professional. \
             Please provide full SEO-optimized content with all SEO analysis fields."
        );
    }

    #[test]
    fn test_content_prompt_uses_supplied_fields() {
        let brief = ContentBrief {
            topic: "Open houses".to_string(),
            content_type: "Social Post".to_string(),
            audience: "Buyers".to_string(),
            key_message: "Visit this weekend".to_string(),
            tone: "Friendly".to_string(),
        };
        let prompt = brief.prompt();
        assert!(prompt.starts_with("Create a Social Post about \"Open houses\" targeting Buyers."));
        assert!(prompt.contains("Key message: Visit this weekend."));
        assert!(prompt.contains("Tone: Friendly."));
    }

    #[test]
    fn test_blank_topic_is_not_ready() {
        assert!(!ContentBrief::new("   ").is_ready());
        assert!(ContentBrief::new("x").is_ready());
        assert!(!GraphicBrief::default().is_ready());
    }

    #[test]
    fn test_graphic_prompt_with_and_without_notes() {
        let brief = GraphicBrief::new("Sell Faster");
        let prompt = brief.prompt();
        assert!(prompt.starts_with(
            "Create a Social Banner graphic with headline \"Sell Faster\". Aspect ratio: 16:9 Landscape."
        ));
        assert!(!prompt.contains("Style notes"));
        assert!(prompt.ends_with(BRAND_STYLE_DIRECTIVE));

        let brief = GraphicBrief {
            style_notes: "minimal serif".to_string(),
            ..GraphicBrief::new("Sell Faster")
        };
        assert!(brief.prompt().contains("Style notes: minimal serif"));
    }
}
