// Author: Dustin Pilgrim
// License: GPL-3.0-or-later

use indexmap::IndexMap;
use serde_json::{json, Map, Value as JsonValue};

use crate::ast::{Block, Document, Node};
use crate::parser;
use crate::VdfError;

/// Export a document to JSON without losing duplicates or order.
///
/// Blocks become arrays of `{"key": ..., "value": ...}` entries and scalars
/// become JSON strings:
///
/// ```
/// let doc = vdf_cfg::parse(r#""a" "1" "a" "2""#).unwrap();
/// let json = vdf_cfg::export::export_document_to_json(&doc).unwrap();
/// let v: serde_json::Value = serde_json::from_str(&json).unwrap();
/// assert_eq!(v["entries"][1]["value"], "2");
/// ```
pub fn export_document_to_json(doc: &Document) -> Result<String, VdfError> {
    let mut top = Map::new();
    if let Some(origin) = doc.origin() {
        top.insert("origin".into(), json!(origin.to_string_lossy()));
    }
    top.insert("entries".into(), block_to_entries(&doc.root));

    Ok(serde_json::to_string_pretty(&JsonValue::Object(top))?)
}

/// Export a document as a plain JSON object.
///
/// Key order is preserved. A key that repeats becomes an array of its
/// values, in order, so `"a" "1" "a" "2"` exports as `{"a": ["1", "2"]}`.
pub fn export_document_to_json_object(doc: &Document) -> Result<String, VdfError> {
    Ok(serde_json::to_string_pretty(&block_to_object(&doc.root))?)
}

/// Read, parse and export a VDF file in one call.
///
/// # Errors
/// Returns error if the file can't be read or contains invalid VDF syntax.
pub fn export_vdf_file(path: &str) -> Result<String, VdfError> {
    let doc = parser::parse_file(path)?;
    export_document_to_json(&doc)
}

fn block_to_entries(block: &Block) -> JsonValue {
    JsonValue::Array(
        block
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    Node::Scalar(s) => json!(s),
                    Node::Block(b) => block_to_entries(b),
                };
                json!({ "key": k, "value": value })
            })
            .collect(),
    )
}

fn block_to_object(block: &Block) -> JsonValue {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for key in block.keys() {
        *counts.entry(key).or_default() += 1;
    }

    let mut out = Map::new();
    for (key, node) in block.iter() {
        let value = match node {
            Node::Scalar(s) => json!(s),
            Node::Block(b) => block_to_object(b),
        };

        if counts[key] > 1 {
            let slot = out
                .entry(key.to_string())
                .or_insert_with(|| JsonValue::Array(Vec::new()));
            if let JsonValue::Array(items) = slot {
                items.push(value);
            }
        } else {
            out.insert(key.to_string(), value);
        }
    }
    JsonValue::Object(out)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const CONFIG: &str = r#"
"InstallConfigStore"
{
	"Software"
	{
		"Valve"
		{
			"Steam"
			{
				"CompatToolMapping"
				{
					"440"
					{
						"name"		"proton_9"
						"config"		""
					}
				}
				"Accounts"		"first"
				"Accounts"		"second"
			}
		}
	}
}
"#;

    #[test]
    fn test_export_entries_form() {
        let doc = parser::parse(CONFIG).unwrap();
        let json_output = export_document_to_json(&doc).expect("Failed to export document to JSON");

        let v: serde_json::Value = serde_json::from_str(&json_output).unwrap();
        assert!(v.get("origin").is_none());

        let store = &v["entries"][0];
        assert_eq!(store["key"], "InstallConfigStore");
        let steam = &store["value"][0]["value"][0]["value"][0]["value"];
        assert_eq!(steam[1]["key"], "Accounts");
        assert_eq!(steam[1]["value"], "first");
        assert_eq!(steam[2]["value"], "second");
    }

    #[test]
    fn test_export_object_form_collects_duplicates() {
        let doc = parser::parse(CONFIG).unwrap();
        let json_output = export_document_to_json_object(&doc).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json_output).unwrap();

        let steam = &v["InstallConfigStore"]["Software"]["Valve"]["Steam"];
        assert_eq!(steam["Accounts"], json!(["first", "second"]));
        assert_eq!(steam["CompatToolMapping"]["440"]["name"], "proton_9");
        assert_eq!(steam["CompatToolMapping"]["440"]["config"], "");
    }

    #[test]
    fn test_export_object_form_keeps_key_order() {
        let doc = parser::parse(r#""zeta" "1" "alpha" "2" "mid" { }"#).unwrap();
        let json_output = export_document_to_json_object(&doc).unwrap();

        let zeta = json_output.find("zeta").unwrap();
        let alpha = json_output.find("alpha").unwrap();
        let mid = json_output.find("mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_export_file_includes_origin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.vdf");
        fs::write(&path, CONFIG).unwrap();

        let json_output = export_vdf_file(path.to_str().unwrap()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json_output).unwrap();
        assert_eq!(v["origin"].as_str(), path.to_str());
    }

    #[test]
    fn test_export_file_propagates_syntax_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.vdf");
        fs::write(&path, "\"a\" {").unwrap();

        let err = export_vdf_file(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, VdfError::SyntaxError { .. }));
    }

    #[test]
    fn test_serde_round_trip_of_model() {
        let doc = parser::parse(CONFIG).unwrap();
        let encoded = serde_json::to_string(&doc.root).unwrap();
        let decoded: Block = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, doc.root);
    }
}
