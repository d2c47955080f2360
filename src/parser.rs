use crate::source::{ClassModel, SourceModel};
use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Parser for serialized source-model files.
///
/// The source-model provider writes the class inventory as JSON or YAML,
/// either as a bare list of classes or wrapped in a `classes` key. The
/// `ModelParser` reads those files and merges them into one `SourceModel`.
///
/// # Example
///
/// ```no_run
/// use apidoc_synth::parser::ModelParser;
/// use std::path::Path;
///
/// let parsed = ModelParser::parse_file(Path::new("model/users.json")).unwrap();
/// println!("Parsed {} classes", parsed.classes.len());
/// ```
pub struct ModelParser;

/// A successfully parsed model file.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the model file
    pub path: PathBuf,
    /// Classes declared in the file, in file order
    pub classes: Vec<ClassModel>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModelDocument {
    List(Vec<ClassModel>),
    Wrapped { classes: Vec<ClassModel> },
}

impl ModelParser {
    /// Parses a single model file.
    ///
    /// `.json` files are read with `serde_json`; anything else with `serde_yaml`.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the model file to parse
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file is not a valid class list
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

        let document: ModelDocument = if path.extension().and_then(|s| s.to_str()) == Some("json") {
            serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON model in file: {}", path.display()))?
        } else {
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse YAML model in file: {}", path.display()))?
        };
        let classes = match document {
            ModelDocument::List(classes) | ModelDocument::Wrapped { classes } => classes,
        };

        debug!("Parsed {} classes from {}", classes.len(), path.display());
        Ok(ParsedFile {
            path: path.to_path_buf(),
            classes,
        })
    }

    /// Parses multiple model files, continuing even if some fail.
    ///
    /// Files that fail to parse are logged as warnings so the run can still
    /// document the classes that did load.
    ///
    /// # Returns
    ///
    /// Returns a vector of `Result<ParsedFile>`, one for each input path.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedFile>> = paths
            .iter()
            .map(|path| {
                Self::parse_file(path).inspect_err(|e| warn!("Failed to parse {}: {:#}", path.display(), e))
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }

    /// Merge parsed files into one model. When a canonical name appears in
    /// more than one file, the first declaration is kept.
    pub fn merge(files: Vec<ParsedFile>) -> SourceModel {
        let mut seen = HashSet::new();
        let mut classes = Vec::new();
        for file in files {
            for class in file.classes {
                if seen.insert(class.canonical().to_string()) {
                    classes.push(class);
                } else {
                    warn!(
                        "Duplicate class {} in {}; keeping the first declaration",
                        class.canonical(),
                        file.path.display()
                    );
                }
            }
        }
        SourceModel::new(classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    /// Helper function to create a temporary file with content
    fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file_path
    }

    #[test]
    fn test_parse_json_list() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(
            &temp_dir,
            "model.json",
            r#"[
                {
                    "canonical_name": "com.example.UserController",
                    "annotations": [{ "name": "RestController" }],
                    "methods": [
                        {
                            "name": "get",
                            "params": [{ "name": "id", "type_name": "long" }],
                            "return_type": "com.example.User",
                            "tags": [{ "name": "tag", "value": "admin" }]
                        }
                    ]
                }
            ]"#,
        );

        let parsed = ModelParser::parse_file(&path).unwrap();
        assert_eq!(parsed.classes.len(), 1);
        let class = &parsed.classes[0];
        assert_eq!(class.canonical(), "com.example.UserController");
        assert_eq!(class.methods[0].params[0].type_name, "long");
        assert_eq!(class.methods[0].return_type, "com.example.User");
    }

    #[test]
    fn test_parse_wrapped_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(
            &temp_dir,
            "model.yaml",
            "classes:\n  - canonical_name: com.example.Status\n    kind: enum\n    enum_constants:\n      - name: ACTIVE\n",
        );

        let parsed = ModelParser::parse_file(&path).unwrap();
        assert_eq!(parsed.classes.len(), 1);
        assert!(parsed.classes[0].is_enum());
        assert_eq!(parsed.classes[0].enum_constants[0].name, "ACTIVE");
    }

    #[test]
    fn test_parse_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(&temp_dir, "broken.json", "{ not json");

        let result = ModelParser::parse_file(&path);
        assert!(result.is_err());
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("broken.json"));
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let result = ModelParser::parse_file(Path::new("/nonexistent/model.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_files_batch() {
        let temp_dir = TempDir::new().unwrap();
        let good = create_temp_file(&temp_dir, "good.json", r#"[{ "canonical_name": "com.example.A" }]"#);
        let bad = create_temp_file(&temp_dir, "bad.yaml", "- canonical_name: [unclosed");

        let results = ModelParser::parse_files(&[good, bad]);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_merge_keeps_first_declaration() {
        let first = ParsedFile {
            path: PathBuf::from("a.json"),
            classes: vec![ClassModel::new("com.example.A").commented("first")],
        };
        let second = ParsedFile {
            path: PathBuf::from("b.json"),
            classes: vec![
                ClassModel::new("com.example.A").commented("second"),
                ClassModel::new("com.example.B"),
            ],
        };

        let model = ModelParser::merge(vec![first, second]);
        assert_eq!(model.len(), 2);
        assert_eq!(model.class_by_name("com.example.A").unwrap().comment.as_deref(), Some("first"));
    }
}
