//! Serialization module for writing the document tree as YAML or JSON.
//!
//! The tree is the hand-off point to external renderers, so both formats keep
//! the field order of the document types.

use crate::doc_builder::DocTree;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a document tree to YAML format.
///
/// # Arguments
///
/// * `tree` - The document tree to serialize
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use apidoc_synth::doc_builder::DocTree;
/// use apidoc_synth::serializer::serialize_yaml;
///
/// let yaml = serialize_yaml(&DocTree::default()).unwrap();
/// assert!(yaml.contains("docs"));
/// ```
pub fn serialize_yaml(tree: &DocTree) -> Result<String> {
    debug!("Serializing document tree to YAML");
    serde_yaml::to_string(tree).context("Failed to serialize document tree to YAML")
}

/// Serializes a document tree to JSON format with pretty printing.
///
/// # Arguments
///
/// * `tree` - The document tree to serialize
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(tree: &DocTree) -> Result<String> {
    debug!("Serializing document tree to JSON");
    serde_json::to_string_pretty(tree).context("Failed to serialize document tree to JSON")
}

/// Writes string content to a file.
///
/// Creates the file and any missing parent directories, or overwrites the
/// file if it exists.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content).with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc_builder::ApiDoc;
    use crate::error::Diagnostic;
    use tempfile::TempDir;

    fn create_test_tree() -> DocTree {
        DocTree {
            docs: vec![ApiDoc {
                name: "UserController".to_string(),
                alias: "UserController".to_string(),
                order: Some(1),
                custom_order: false,
                tags: Vec::new(),
                author: Some("alice".to_string()),
                package: "com.example".to_string(),
                desc: "User operations".to_string(),
                group: None,
                methods: Vec::new(),
            }],
            schemas: Default::default(),
            diagnostics: vec![Diagnostic::warn("com.example.UserController", Some("find"), "map body")],
        }
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&create_test_tree()).unwrap();

        assert!(yaml.contains("docs:"));
        assert!(yaml.contains("name: UserController"));
        assert!(yaml.contains("diagnostics:"));
    }

    #[test]
    fn test_serialize_json_round_trips() {
        let tree = create_test_tree();
        let json = serialize_json(&tree).unwrap();

        assert!(json.contains("\"desc\": \"User operations\""));
        let back: DocTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_empty_collections_are_omitted() {
        let json = serialize_json(&DocTree::default()).unwrap();
        assert!(!json.contains("schemas"));
        assert!(!json.contains("diagnostics"));
    }

    #[test]
    fn test_write_to_file_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/nested/doc.yaml");

        write_to_file("docs: []\n", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "docs: []\n");
    }
}
