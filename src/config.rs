//! Run configuration.
//!
//! `ApiConfig` is deserialized from a YAML or JSON file (every field has a
//! default) and may be adjusted by command-line flags before the run starts.
//! It is read-only once the pipeline begins.

use crate::error::{Error, Result};
use crate::framework::Framework;
use crate::taxonomy::AnnotationTaxonomy;
use glob::Pattern;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Default depth ceiling for composite type expansion
pub const DEFAULT_RECURSION_LIMIT: usize = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prepended to every short URL
    pub server_url: String,
    /// Comma-separated class globs; when set, only matching classes are documented
    pub package_filters: Option<String>,
    /// Comma-separated globs over class names and `Class.method` names
    pub package_exclude_filters: Option<String>,
    /// Globally configured request parameters and headers
    pub request_params: Vec<ApiReqParam>,
    pub strict: bool,
    pub sort_by_title: bool,
    /// Generic wrapper class around every request body, e.g. `com.x.Request`
    pub request_body_advice: Option<String>,
    /// Generic wrapper class around every response, e.g. `com.x.Result`
    pub response_body_advice: Option<String>,
    pub request_field_to_underline: bool,
    /// Parameter types dropped from every endpoint
    pub ignore_request_params: Vec<String>,
    /// Canonical type name → replacement type descriptor
    pub replace_class_map: BTreeMap<String, String>,
    pub show_author: bool,
    pub recursion_limit: usize,
    pub framework: Framework,
    /// Custom taxonomy replacing the built-in one for `framework`
    pub taxonomy: Option<AnnotationTaxonomy>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            package_filters: None,
            package_exclude_filters: None,
            request_params: Vec::new(),
            strict: false,
            sort_by_title: false,
            request_body_advice: None,
            response_body_advice: None,
            request_field_to_underline: false,
            ignore_request_params: Vec::new(),
            replace_class_map: BTreeMap::new(),
            show_author: true,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            framework: Framework::Spring,
            taxonomy: None,
        }
    }
}

/// Where a configured global parameter goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamIn {
    #[default]
    Header,
    Query,
    Path,
}

/// A globally configured request parameter or header
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiReqParam {
    pub name: String,
    #[serde(rename = "in")]
    pub param_in: ParamIn,
    #[serde(rename = "type")]
    pub type_label: String,
    pub value: String,
    pub required: bool,
    pub desc: String,
    /// Comma-separated URL globs the parameter applies to; empty means all
    pub path_patterns: Option<String>,
    pub exclude_path_patterns: Option<String>,
}

impl ApiReqParam {
    pub fn header(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            param_in: ParamIn::Header,
            type_label: "string".to_string(),
            value: value.to_string(),
            ..Self::default()
        }
    }

    /// Whether the parameter applies to an endpoint with this short URL
    pub fn matches_path(&self, url: &str) -> bool {
        let excluded = parse_patterns(self.exclude_path_patterns.as_deref())
            .iter()
            .any(|p| p.matches(url));
        if excluded {
            return false;
        }
        let included = parse_patterns(self.path_patterns.as_deref());
        included.is_empty() || included.iter().any(|p| p.matches(url))
    }
}

/// Compiled include/exclude class filters
#[derive(Debug, Clone, Default)]
pub struct PackageFilters {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PackageFilters {
    /// Whether a class (canonical name) passes both filters
    pub fn accepts_class(&self, canonical: &str) -> bool {
        if self.exclude.iter().any(|p| matches_name(p, canonical)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| matches_name(p, canonical))
    }

    /// Whether `Class.method` is excluded
    pub fn excludes_method(&self, canonical: &str, method: &str) -> bool {
        let qualified = format!("{}.{}", canonical, method);
        self.exclude.iter().any(|p| p.matches(&qualified))
    }
}

/// A glob matches a name outright, or as a package prefix when it has no wildcard
fn matches_name(pattern: &Pattern, name: &str) -> bool {
    if pattern.matches(name) {
        return true;
    }
    let raw = pattern.as_str();
    !raw.contains(['*', '?', '[']) && name.starts_with(raw) && name[raw.len()..].starts_with('.')
}

fn compile_patterns(raw: Option<&str>) -> Result<Vec<Pattern>> {
    split_patterns(raw)
        .map(|text| {
            Pattern::new(text).map_err(|e| Error::InvalidConfig(format!("bad filter pattern '{}': {}", text, e)))
        })
        .collect()
}

/// Lenient variant for per-parameter path patterns; bad patterns are ignored
fn parse_patterns(raw: Option<&str>) -> Vec<Pattern> {
    split_patterns(raw).filter_map(|text| Pattern::new(text).ok()).collect()
}

fn split_patterns(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or("").split(',').map(str::trim).filter(|s| !s.is_empty())
}

impl ApiConfig {
    /// Load a configuration file (YAML or JSON)
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ApiConfig = serde_yaml::from_str(&text).map_err(|e| Error::ParseError {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the type system cannot
    pub fn validate(&self) -> Result<()> {
        if self.recursion_limit == 0 {
            return Err(Error::InvalidConfig("recursion_limit must be at least 1".to_string()));
        }
        self.package_filters()?;
        for param in &self.request_params {
            if param.name.trim().is_empty() {
                return Err(Error::InvalidConfig("request_params entry without a name".to_string()));
            }
        }
        Ok(())
    }

    pub fn package_filters(&self) -> Result<PackageFilters> {
        let filters = PackageFilters {
            include: compile_patterns(self.package_filters.as_deref())?,
            exclude: compile_patterns(self.package_exclude_filters.as_deref())?,
        };
        debug!(
            "Compiled {} include and {} exclude filters",
            filters.include.len(),
            filters.exclude.len()
        );
        Ok(filters)
    }

    /// Whether a parameter type is configured to be dropped
    pub fn is_ignored_param_type(&self, type_name: &str) -> bool {
        let simple = type_name.rsplit('.').next().unwrap_or(type_name);
        self.ignore_request_params
            .iter()
            .any(|ignored| ignored == type_name || ignored == simple)
    }

    /// Global parameters of one location that apply to a URL
    pub fn global_params(&self, param_in: ParamIn, url: &str) -> Vec<&ApiReqParam> {
        self.request_params
            .iter()
            .filter(|p| p.param_in == param_in && p.matches_path(url))
            .collect()
    }
}
