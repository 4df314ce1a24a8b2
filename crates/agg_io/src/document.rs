//! Top-level wire document: `{"type": name, "data": fragment, "version": ...}`.

use agg_core::errors::{AggError, AggResult};
use agg_core::primitive::Fragment;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wraps a primitive's serialized fragment with its registry type tag.
///
/// `version` is accepted but not enforced by the core: version handling is
/// out of core scope, which requires only that `type` match a registered
/// factory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "type")]
    pub type_name: String,
    pub data: Fragment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

impl Document {
    pub fn new(type_name: impl Into<String>, data: Fragment) -> Self {
        Document {
            type_name: type_name.into(),
            data,
            version: None,
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Parse a document from a raw JSON value, checking shape only (the
    /// registry lookup for `type_name` happens one layer up, in
    /// `aggregator`, which is where the concrete `D` is known).
    pub fn from_value(v: Value) -> AggResult<Document> {
        let obj = v.as_object().ok_or_else(|| AggError::WireFormat {
            pointer: "/".to_string(),
            detail: "top-level document must be a JSON object".to_string(),
        })?;
        let type_name = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| AggError::WireFormat {
                pointer: "/type".to_string(),
                detail: "missing required string field".to_string(),
            })?
            .to_string();
        let data = obj
            .get("data")
            .cloned()
            .ok_or_else(|| AggError::WireFormat {
                pointer: "/data".to_string(),
                detail: "missing required field".to_string(),
            })?;
        let version = obj.get("version").and_then(Value::as_u64).map(|v| v as u32);
        Ok(Document {
            type_name,
            data,
            version,
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("Document serialization cannot fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_minimal_document() {
        let v = json!({"type": "Count", "data": {"entries": 3.0}});
        let doc = Document::from_value(v).unwrap();
        assert_eq!(doc.type_name, "Count");
        assert_eq!(doc.version, None);
    }

    #[test]
    fn rejects_missing_type() {
        let v = json!({"data": {}});
        assert!(Document::from_value(v).is_err());
    }

    #[test]
    fn round_trips_through_value() {
        let doc = Document::new("Count", json!({"entries": 1.0})).with_version(1);
        let v = doc.to_value();
        let back = Document::from_value(v).unwrap();
        assert_eq!(doc, back);
    }
}
