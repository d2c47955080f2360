use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions of serialized source-model files
const MODEL_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// File scanner for locating serialized source-model files.
///
/// The `FileScanner` recursively walks a directory to find every `.json`,
/// `.yaml` and `.yml` file produced by the source-model provider. It skips
/// hidden directories (those starting with `.`) and build output directories
/// (`target`, `build`, `node_modules`).
///
/// # Example
///
/// ```no_run
/// use apidoc_synth::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./model"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} model files", result.model_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    /// Files to leave out, e.g. the configuration file when it lives in the model directory
    excluded: Vec<PathBuf>,
}

/// Result of directory scanning operation.
///
/// Contains the discovered model files (sorted, so runs are reproducible) and
/// any warnings encountered during scanning.
pub struct ScanResult {
    /// Paths of all discovered model files
    pub model_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root.
    ///
    /// # Arguments
    ///
    /// * `root_path` - A directory to scan, or a single model file
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            excluded: Vec::new(),
        }
    }

    /// Leave `path` out of the scan result
    pub fn exclude(mut self, path: &Path) -> Self {
        self.excluded.push(path.to_path_buf());
        self
    }

    fn is_model_file(path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| MODEL_EXTENSIONS.contains(&ext))
    }

    /// Scans the directory tree and collects all model files.
    ///
    /// If any directories or files cannot be accessed, warnings are logged and
    /// added to the result, but scanning continues.
    ///
    /// # Returns
    ///
    /// Returns a `ScanResult` containing the sorted list of discovered files and any warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.exists() {
            anyhow::bail!("Model path does not exist: {}", self.root_path.display());
        }

        let mut model_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path).into_iter().filter_entry(|e| {
            // Don't filter the root itself
            if e.path() == self.root_path {
                return true;
            }

            let file_name = e.file_name().to_string_lossy();
            let is_hidden = file_name.starts_with('.');
            let is_build_dir = e.file_type().is_dir() && matches!(file_name.as_ref(), "target" | "build" | "node_modules");

            !is_hidden && !is_build_dir
        }) {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if Self::is_model_file(path) && !self.excluded.iter().any(|e| e == path) {
                        model_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        model_files.sort();
        Ok(ScanResult { model_files, warnings })
    }
}
