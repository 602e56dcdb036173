//! Multi-document YAML manifests as read by `--apply`

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("document {index} is not valid YAML")]
    Yaml {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("document {index} is missing metadata.name")]
    MissingName { index: usize },
}

/// One document of a manifest file
#[derive(Clone, Debug, PartialEq)]
pub struct Manifest {
    /// Lowercased `kind`, empty when the document has none
    pub kind: String,
    pub name: String,
    pub body: Value,
}

/// Split `input` into its documents. Empty documents are dropped.
///
/// Document indexes in errors are 1-based.
pub fn parse_manifests(input: &str) -> Result<Vec<Manifest>, ManifestError> {
    let mut manifests = Vec::new();

    for (i, document) in serde_yaml::Deserializer::from_str(input).enumerate() {
        let index = i + 1;
        let body = Value::deserialize(document)
            .map_err(|source| ManifestError::Yaml { index, source })?;

        if body.is_null() {
            continue;
        }

        let kind = body
            .get("kind")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase();

        let name = body
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .ok_or(ManifestError::MissingName { index })?
            .to_string();

        manifests.push(Manifest { kind, name, body });
    }

    Ok(manifests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiple_documents() {
        let input = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
---
apiVersion: v1
kind: Service
metadata:
  name: web
"#;
        let manifests = parse_manifests(input).unwrap();
        assert_eq!(manifests.len(), 2);
        assert_eq!(manifests[0].kind, "deployment");
        assert_eq!(manifests[1].kind, "service");
        assert_eq!(manifests[1].name, "web");
        assert_eq!(manifests[1].body["apiVersion"], "v1");
    }

    #[test]
    fn test_empty_documents_are_skipped() {
        let input = "---\nkind: Pod\nmetadata:\n  name: a\n---\n---\n";
        let manifests = parse_manifests(input).unwrap();
        assert_eq!(manifests.len(), 1);
        assert_eq!(manifests[0].name, "a");
    }

    #[test]
    fn test_missing_kind_is_empty() {
        let manifests = parse_manifests("metadata:\n  name: orphan\n").unwrap();
        assert_eq!(manifests[0].kind, "");
    }

    #[test]
    fn test_missing_name_fails() {
        let input = "kind: Pod\nmetadata:\n  name: a\n---\nkind: Service\nmetadata: {}\n";
        let err = parse_manifests(input).unwrap_err();
        assert!(matches!(err, ManifestError::MissingName { index: 2 }));
    }

    #[test]
    fn test_invalid_yaml_fails() {
        let err = parse_manifests("kind: [unclosed\n").unwrap_err();
        assert!(matches!(err, ManifestError::Yaml { index: 1, .. }));
    }
}
