//! Generated visuals and the artifact files they point to.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient::{lenient, lenient_items, non_empty_str};

/// A resolved reference to a generated file. Identity is the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub file_url: String,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub format_type: Option<String>,
}

impl Artifact {
    pub fn new(
        file_url: impl Into<String>,
        name: impl Into<String>,
        format_type: impl Into<String>,
    ) -> Self {
        Self {
            file_url: file_url.into(),
            name: Some(name.into()),
            format_type: Some(format_type.into()),
        }
    }

    /// Read one `module_outputs` entry.
    ///
    /// Returns `None` unless the entry carries a non-empty string `file_url`.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let file_url = non_empty_str(entry, "file_url")?;
        let text = |key: &str| entry.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            file_url: file_url.to_string(),
            name: text("name"),
            format_type: text("format_type"),
        })
    }

    /// Fill in the name and format shown for an attached image
    pub fn with_display_defaults(self) -> Self {
        Self {
            name: self.name.filter(|n| !n.is_empty()).or_else(|| Some("graphic".to_string())),
            format_type: self
                .format_type
                .filter(|f| !f.is_empty())
                .or_else(|| Some("png".to_string())),
            ..self
        }
    }
}

/// Visual artifact produced by the graphic agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphicResult {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub graphic_title: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub graphic_description: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub design_notes: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub graphic_type: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,

    /// Ordered color tokens, e.g. `#6B3A1F`
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub color_palette_used: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub brand_alignment_notes: Option<String>,

    /// Entries that do not decode as an artifact are dropped
    #[serde(default, deserialize_with = "lenient_items")]
    pub images: Vec<Artifact>,
}

impl GraphicResult {
    /// First image, the one shown as the campaign preview
    pub fn preview(&self) -> Option<&Artifact> {
        self.images.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_requires_file_url() {
        assert!(Artifact::from_entry(&json!({"name": "x.png"})).is_none());
        assert!(Artifact::from_entry(&json!({"file_url": ""})).is_none());
        assert!(Artifact::from_entry(&json!({"file_url": 7})).is_none());
        assert!(Artifact::from_entry(&json!("a.png")).is_none());

        let artifact = Artifact::from_entry(&json!({"file_url": "a.png", "name": "a"})).unwrap();
        assert_eq!(artifact.file_url, "a.png");
        assert_eq!(artifact.name.as_deref(), Some("a"));
        assert!(artifact.format_type.is_none());
    }

    #[test]
    fn test_display_defaults() {
        let artifact = Artifact::from_entry(&json!({"file_url": "a.png"}))
            .unwrap()
            .with_display_defaults();
        assert_eq!(artifact.name.as_deref(), Some("graphic"));
        assert_eq!(artifact.format_type.as_deref(), Some("png"));

        let kept = Artifact::new("b.jpg", "hero", "jpg").with_display_defaults();
        assert_eq!(kept, Artifact::new("b.jpg", "hero", "jpg"));
    }

    #[test]
    fn test_graphic_result_permissive_parse() {
        let graphic: GraphicResult = serde_json::from_value(json!({
            "graphic_title": "Banner",
            "color_palette_used": "#fff",
            "images": [{"file_url": "a.png", "extra": 1}]
        }))
        .unwrap();

        assert_eq!(graphic.graphic_title.as_deref(), Some("Banner"));
        assert!(graphic.color_palette_used.is_none());
        assert_eq!(graphic.preview().map(|a| a.file_url.as_str()), Some("a.png"));
    }
}
