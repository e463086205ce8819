//! Artifact resolution: extract generated files from any agent payload shape.
//!
//! Agents report files in several places depending on platform version. The
//! payload is read through a lenient envelope and the rules below are tried in
//! order; the first one producing at least one artifact wins.
//!
//! 1. `module_outputs`
//! 2. `response.module_outputs`
//! 3. `response.result.module_outputs`
//! 4. `response.result.image_url`, else `response.result.file_url`
//! 5. `raw_response` (JSON text or object): its `module_outputs`, then its
//!    `response.module_outputs`

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::lenient::{from_object, non_empty_str};
use crate::domain::Artifact;

/// `module_outputs` in the shapes agents actually send
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ModuleOutputs {
    /// Bare list of artifact entries
    Entries(Vec<Value>),

    /// Object wrapping an `artifact_files` list
    Files { artifact_files: Vec<Value> },
}

impl ModuleOutputs {
    /// Entries with a usable `file_url`, in original order
    fn artifacts(&self) -> Vec<Artifact> {
        let entries = match self {
            ModuleOutputs::Entries(entries) => entries,
            ModuleOutputs::Files { artifact_files } => artifact_files,
        };
        entries.iter().filter_map(Artifact::from_entry).collect()
    }
}

/// Any level of the payload that may carry `module_outputs`
#[derive(Debug, Default, Deserialize)]
struct Level {
    #[serde(default, deserialize_with = "crate::domain::lenient::lenient")]
    module_outputs: Option<ModuleOutputs>,
}

impl Level {
    fn read(value: Option<&Value>) -> Self {
        value.map(from_object::<Level>).unwrap_or_default()
    }

    fn artifacts(&self) -> Option<Vec<Artifact>> {
        self.module_outputs
            .as_ref()
            .map(ModuleOutputs::artifacts)
            .filter(|found| !found.is_empty())
    }
}

/// Secondary payload, either serialized or already parsed
#[derive(Debug)]
enum RawResponse<'a> {
    Text(&'a str),
    Structured(&'a Value),
}

impl<'a> RawResponse<'a> {
    fn from_payload(payload: &'a Value) -> Option<Self> {
        let raw = payload.get("raw_response")?;
        match raw {
            Value::String(text) => Some(RawResponse::Text(text)),
            Value::Object(_) => Some(RawResponse::Structured(raw)),
            _ => None,
        }
    }

    /// Parsed form; `None` when the text is not JSON
    fn parse(&self) -> Option<Value> {
        match self {
            RawResponse::Text(text) => serde_json::from_str(text).ok(),
            RawResponse::Structured(value) => Some((*value).clone()),
        }
    }
}

/// Resolution rules in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    TopLevel,
    Response,
    ResponseResult,
    DirectUrl,
    RawResponse,
}

const RULES: [Rule; 5] = [
    Rule::TopLevel,
    Rule::Response,
    Rule::ResponseResult,
    Rule::DirectUrl,
    Rule::RawResponse,
];

impl Rule {
    fn apply(self, payload: &Value) -> Option<Vec<Artifact>> {
        let response = payload.get("response");
        let result = response.and_then(|r| r.get("result"));

        match self {
            Rule::TopLevel => Level::read(Some(payload)).artifacts(),
            Rule::Response => Level::read(response).artifacts(),
            Rule::ResponseResult => Level::read(result).artifacts(),
            Rule::DirectUrl => {
                let result = result?;
                if let Some(url) = non_empty_str(result, "image_url") {
                    return Some(vec![Artifact::new(url, "generated-image", "png")]);
                }
                non_empty_str(result, "file_url")
                    .map(|url| vec![Artifact::new(url, "generated-file", "png")])
            }
            Rule::RawResponse => {
                let raw = RawResponse::from_payload(payload)?.parse()?;
                Level::read(Some(&raw))
                    .artifacts()
                    .or_else(|| Level::read(raw.get("response")).artifacts())
            }
        }
    }
}

/// Resolve the artifact list carried by an agent payload.
///
/// Total: malformed or empty payloads resolve to an empty list.
pub fn resolve_artifacts(payload: &Value) -> Vec<Artifact> {
    for rule in RULES {
        if let Some(found) = rule.apply(payload) {
            debug!(?rule, count = found.len(), "Resolved artifacts");
            return found;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn urls(artifacts: &[Artifact]) -> Vec<&str> {
        artifacts.iter().map(|a| a.file_url.as_str()).collect()
    }

    #[test]
    fn test_top_level_wins_over_nested() {
        let payload = json!({
            "module_outputs": [{"file_url": "a.png"}],
            "response": {"module_outputs": [{"file_url": "b.png"}]}
        });
        let resolved = resolve_artifacts(&payload);
        assert_eq!(
            resolved,
            vec![Artifact {
                file_url: "a.png".to_string(),
                name: None,
                format_type: None
            }]
        );
    }

    #[test]
    fn test_artifact_files_shape() {
        let payload = json!({
            "response": {
                "module_outputs": {
                    "artifact_files": [
                        {"file_url": "one.png", "name": "one", "format_type": "png"},
                        {"name": "missing-url"},
                        {"file_url": "two.jpg", "format_type": "jpg"}
                    ]
                }
            }
        });
        let resolved = resolve_artifacts(&payload);
        assert_eq!(urls(&resolved), vec!["one.png", "two.jpg"]);
        assert_eq!(resolved[0].name.as_deref(), Some("one"));
        assert_eq!(resolved[1].format_type.as_deref(), Some("jpg"));
    }

    #[test]
    fn test_filtered_empty_list_falls_through() {
        let payload = json!({
            "module_outputs": [{"name": "no-url"}, {"file_url": ""}],
            "response": {"result": {"module_outputs": [{"file_url": "deep.png"}]}}
        });
        assert_eq!(urls(&resolve_artifacts(&payload)), vec!["deep.png"]);
    }

    #[test]
    fn test_direct_image_url() {
        let payload = json!({"response": {"result": {"image_url": "c.png"}}});
        assert_eq!(
            resolve_artifacts(&payload),
            vec![Artifact::new("c.png", "generated-image", "png")]
        );
    }

    #[test]
    fn test_direct_file_url_when_image_missing() {
        let payload = json!({"response": {"result": {"image_url": "", "file_url": "d.pdf"}}});
        assert_eq!(
            resolve_artifacts(&payload),
            vec![Artifact::new("d.pdf", "generated-file", "png")]
        );
    }

    #[test]
    fn test_module_outputs_beat_direct_url() {
        let payload = json!({
            "response": {"result": {
                "image_url": "direct.png",
                "module_outputs": [{"file_url": "listed.png"}]
            }}
        });
        assert_eq!(urls(&resolve_artifacts(&payload)), vec!["listed.png"]);
    }

    #[test]
    fn test_raw_response_string() {
        let raw = json!({"module_outputs": {"artifact_files": [{"file_url": "raw.png"}]}}).to_string();
        let payload = json!({"success": true, "raw_response": raw});
        assert_eq!(urls(&resolve_artifacts(&payload)), vec!["raw.png"]);
    }

    #[test]
    fn test_raw_response_nested_object() {
        let payload = json!({
            "raw_response": {"response": {"module_outputs": [{"file_url": "nested.png"}]}}
        });
        assert_eq!(urls(&resolve_artifacts(&payload)), vec!["nested.png"]);
    }

    #[test]
    fn test_raw_response_unparseable() {
        let payload = json!({"raw_response": "{not json"});
        assert!(resolve_artifacts(&payload).is_empty());
    }

    #[test]
    fn test_raw_response_is_last_resort() {
        let payload = json!({
            "response": {"result": {"file_url": "direct.bin"}},
            "raw_response": {"module_outputs": [{"file_url": "raw.png"}]}
        });
        assert_eq!(urls(&resolve_artifacts(&payload)), vec!["direct.bin"]);
    }

    #[test]
    fn test_malformed_inputs_resolve_empty() {
        let inputs = [
            Value::Null,
            json!(42),
            json!("text"),
            json!([{"file_url": "x.png"}]),
            json!({"module_outputs": "nope"}),
            json!({"module_outputs": {"artifact_files": "nope"}}),
            json!({"response": [1, 2]}),
            json!({"response": {"result": "flat"}}),
            json!({"response": {"result": {"image_url": 5}}}),
            json!({"raw_response": 12}),
            json!({"raw_response": "[1,2,3]"}),
        ];

        for input in inputs {
            assert!(resolve_artifacts(&input).is_empty(), "input: {}", input);
        }
    }
}
