use crate::document::SceneSpec;
use kinema_core::{KinemaError, KinemaResult};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read and decode a scene document from disk. Any failure here is the
/// fatal class: without a document there is nothing to render.
pub fn load_from_path(path: &Path) -> KinemaResult<SceneSpec> {
    let text = fs::read_to_string(path)
        .map_err(|e| KinemaError::load(format!("could not read {}: {}", path.display(), e)))?;
    parse_scene(&text)
}

/// Decode a scene document from JSON text. A top-level JSON string is a
/// doubly-encoded document: its content is decoded a second time.
pub fn parse_scene(text: &str) -> KinemaResult<SceneSpec> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| KinemaError::load(format!("invalid JSON: {}", e)))?;

    let value = match value {
        Value::String(inner) => serde_json::from_str(&inner)
            .map_err(|e| KinemaError::load(format!("invalid doubly-encoded JSON: {}", e)))?,
        other => other,
    };

    serde_json::from_value(value)
        .map_err(|e| KinemaError::load(format!("malformed scene document: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ObjectKind;

    #[test]
    fn test_parse_plain_document() {
        let spec = parse_scene(
            r#"{"objects": [{"id": "c1", "type": "circle"}], "animations": []}"#,
        )
        .unwrap();
        assert_eq!(spec.objects.len(), 1);
        assert_eq!(spec.objects[0].kind, ObjectKind::Circle);
    }

    #[test]
    fn test_parse_doubly_encoded_document() {
        let inner = r#"{"objects": [{"id": "c1", "type": "circle"}]}"#;
        let outer = serde_json::to_string(inner).unwrap();
        let spec = parse_scene(&outer).unwrap();
        assert_eq!(spec.objects.len(), 1);
        assert_eq!(spec.objects[0].id, "c1");
    }

    #[test]
    fn test_parse_missing_sections_default_empty() {
        let spec = parse_scene("{}").unwrap();
        assert!(spec.objects.is_empty());
        assert!(spec.animations.is_empty());
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        let spec = parse_scene("\n  {\"objects\": []}  \n").unwrap();
        assert!(spec.objects.is_empty());
    }

    #[test]
    fn test_parse_invalid_json_is_fatal() {
        let err = parse_scene("not json at all").unwrap_err();
        assert!(err.to_string().starts_with("load error"));
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let err = load_from_path(Path::new("/nonexistent/scene.json")).unwrap_err();
        assert!(matches!(err, KinemaError::Load(_)));
    }
}
