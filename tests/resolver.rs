//! Artifact Resolver Integration Tests
//!
//! Resolution over realistic agent payloads, through the public API.

use campaign_studio::core::resolve_artifacts;
use campaign_studio::domain::Artifact;
use serde_json::json;

#[test]
fn test_top_level_outputs_take_priority() {
    let payload = json!({
        "module_outputs": [{"file_url": "a.png"}],
        "response": {"module_outputs": [{"file_url": "b.png"}]}
    });

    let artifacts = resolve_artifacts(&payload);
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].file_url, "a.png");
}

#[test]
fn test_direct_image_url_without_outputs() {
    let payload = json!({"response": {"result": {"image_url": "c.png"}}});

    assert_eq!(
        resolve_artifacts(&payload),
        vec![Artifact::new("c.png", "generated-image", "png")]
    );
}

#[test]
fn test_full_agent_reply() {
    let payload = json!({
        "success": true,
        "response": {
            "result": {
                "graphic_title": "Open House Banner",
                "module_outputs": {"artifact_files": [
                    {"file_url": "https://cdn.example.com/1.png", "name": "banner-1.png", "format_type": "png"},
                    {"file_url": "", "name": "broken"},
                    {"file_url": "https://cdn.example.com/2.jpg", "format_type": "jpg"}
                ]}
            },
            "message": "done"
        }
    });

    let artifacts = resolve_artifacts(&payload);
    let urls: Vec<&str> = artifacts.iter().map(|a| a.file_url.as_str()).collect();
    assert_eq!(urls, vec!["https://cdn.example.com/1.png", "https://cdn.example.com/2.jpg"]);
    assert!(artifacts[1].name.is_none());
    assert_eq!(artifacts[1].clone().with_display_defaults().name.as_deref(), Some("graphic"));
}

#[test]
fn test_unrecognized_payloads_resolve_empty() {
    for payload in [
        json!(null),
        json!("just text"),
        json!({"success": false, "error": "boom"}),
        json!({"response": {"result": {"image_url": ""}}}),
        json!({"raw_response": "{not json"}),
    ] {
        assert!(resolve_artifacts(&payload).is_empty(), "payload: {}", payload);
    }
}
