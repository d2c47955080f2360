//! Framework templates: per-framework rules for entry points and request mappings.
//!
//! Every supported framework implements [`FrameworkTemplate`]. The default
//! methods cover everything a plain annotation table can express, so the
//! concrete templates only override what their framework does differently.
//!
//! # Supported Frameworks
//!
//! - **Spring MVC**: See [`spring::SpringTemplate`]
//! - **JAX-RS**: See [`jaxrs::JaxRsTemplate`]
//! - Any custom taxonomy loaded from configuration: [`ConfiguredTemplate`]
//!
//! # Example
//!
//! ```
//! use apidoc_synth::framework::{template_for, Framework};
//!
//! let template = template_for(Framework::Spring, None);
//! assert_eq!(template.name(), "spring");
//! ```

pub mod jaxrs;
pub mod spring;

use crate::source::{AnnotationModel, ClassModel, Documented, MethodModel, SourceModel};
use crate::taxonomy::{AnnotationRegistry, AnnotationTaxonomy};
use log::debug;
use serde::{Deserialize, Serialize};

/// HTTP methods an endpoint can be mapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Parse a verb as written in an annotation property.
    ///
    /// Accepts `POST`, `post` and qualified constants like `RequestMethod.POST`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.rsplit('.').next().unwrap_or(name).trim();
        match name.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            "OPTIONS" => Some(HttpMethod::Options),
            "HEAD" => Some(HttpMethod::Head),
            _ => None,
        }
    }

    /// Whether requests with this verb conventionally carry a body
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// Built-in frameworks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// Spring MVC / WebFlux
    #[default]
    Spring,
    /// JAX-RS (Jersey, RESTEasy, Quarkus)
    #[value(name = "jaxrs")]
    #[serde(rename = "jaxrs")]
    JaxRs,
}

/// The resolved HTTP mapping of one endpoint method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestMapping {
    pub verb: HttpMethod,
    /// Server URL joined with the short URL
    pub url: String,
    /// Class base path joined with the method path
    pub short_url: String,
    pub deprecated: bool,
    /// Mapping conditions such as `type=1` or `debug`
    pub params: Vec<String>,
    /// Header conditions such as `X-Version=2`
    pub headers: Vec<String>,
}

/// Per-framework rules consulted by the pipeline.
///
/// Implementations must be shareable between worker threads; they only ever
/// read the source model.
pub trait FrameworkTemplate: Send + Sync {
    /// Short framework identifier
    fn name(&self) -> &str;

    /// The annotation table for this framework
    fn registry(&self) -> &AnnotationRegistry;

    /// Extra entry-point predicate for classes without an entry annotation
    fn is_entry_point(&self, _class: &ClassModel, _model: &SourceModel) -> bool {
        false
    }

    /// Base path declared on the class (or inherited through its effective annotations)
    fn base_path(&self, _class: &ClassModel, annotations: &[AnnotationModel], _model: &SourceModel) -> String {
        class_base_path(self.registry(), annotations)
    }

    /// Resolve the mapping of a method, or `None` when it is not an endpoint
    fn request_mapping(&self, base_path: &str, method: &MethodModel, server_url: &str) -> Option<RequestMapping> {
        resolve_mapping(self.registry(), base_path, method, server_url)
    }
}

/// Template driven purely by a taxonomy loaded from configuration
pub struct ConfiguredTemplate {
    name: String,
    registry: AnnotationRegistry,
}

impl ConfiguredTemplate {
    pub fn new(taxonomy: AnnotationTaxonomy) -> Self {
        let name = if taxonomy.framework.is_empty() {
            "custom".to_string()
        } else {
            taxonomy.framework.clone()
        };
        Self {
            name,
            registry: AnnotationRegistry::new(taxonomy),
        }
    }
}

impl FrameworkTemplate for ConfiguredTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn registry(&self) -> &AnnotationRegistry {
        &self.registry
    }
}

/// Pick the template for a run. A custom taxonomy replaces the built-in one.
pub fn template_for(framework: Framework, custom: Option<AnnotationTaxonomy>) -> Box<dyn FrameworkTemplate> {
    match (custom, framework) {
        (Some(taxonomy), _) => Box::new(ConfiguredTemplate::new(taxonomy)),
        (None, Framework::Spring) => Box::new(spring::SpringTemplate::new()),
        (None, Framework::JaxRs) => Box::new(jaxrs::JaxRsTemplate::new()),
    }
}

/// Path declared by the first mapping annotation among `annotations`
pub fn class_base_path(registry: &AnnotationRegistry, annotations: &[AnnotationModel]) -> String {
    annotations
        .iter()
        .find_map(|annotation| {
            let mapping = registry.mapping(&annotation.name)?;
            first_path(annotation, &mapping.path_props)
        })
        .unwrap_or_default()
}

fn first_path(annotation: &AnnotationModel, props: &[String]) -> Option<String> {
    props
        .iter()
        .find_map(|prop| annotation.first_string(prop))
        .filter(|path| !path.is_empty())
}

/// Generic mapping resolution over the registry.
///
/// Annotations on one method are merged: JAX-RS splits the verb (`@GET`) and
/// the path (`@Path`) over two annotations, Spring puts both on one.
pub fn resolve_mapping(
    registry: &AnnotationRegistry,
    base_path: &str,
    method: &MethodModel,
    server_url: &str,
) -> Option<RequestMapping> {
    let mut verb = None;
    let mut default_verb = None;
    let mut path = None;
    let mut params = Vec::new();
    let mut headers = Vec::new();
    let mut mapped = false;

    for annotation in &method.annotations {
        let Some(mapping) = registry.mapping(&annotation.name) else {
            continue;
        };
        mapped = true;
        if verb.is_none() {
            verb = mapping.verb.or_else(|| {
                let prop = mapping.method_prop.as_ref()?;
                annotation
                    .string_values(prop)
                    .iter()
                    .find_map(|name| HttpMethod::from_name(name))
            });
        }
        if default_verb.is_none() {
            default_verb = mapping.default_verb;
        }
        if path.is_none() {
            path = first_path(annotation, &mapping.path_props);
        }
        if let Some(prop) = &mapping.params_prop {
            params.extend(annotation.string_values(prop));
        }
        if let Some(prop) = &mapping.headers_prop {
            headers.extend(annotation.string_values(prop));
        }
    }

    if !mapped {
        return None;
    }
    let verb = verb.or(default_verb)?;

    let short_url = simplify_url(&format_path_url(&combine_paths(base_path, path.as_deref().unwrap_or(""))));
    let url = simplify_url(&combine_paths(server_url, &short_url));
    let deprecated = method
        .annotations
        .iter()
        .any(|a| registry.is_deprecated(&a.name))
        || method.has_tag("deprecated");

    debug!("Mapped {} -> {} {}", method.name, verb.as_str(), short_url);
    Some(RequestMapping {
        verb,
        url,
        short_url,
        deprecated,
        params,
        headers,
    })
}

/// Join two path fragments with exactly one `/` between them
pub fn combine_paths(base: &str, path: &str) -> String {
    let base = base.trim();
    let path = path.trim();
    if base.is_empty() {
        return if path.starts_with('/') || path.is_empty() {
            path.to_string()
        } else {
            format!("/{}", path)
        };
    }
    if path.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Collapse duplicate slashes, keeping the `://` of a scheme intact
pub fn simplify_url(url: &str) -> String {
    let (scheme, rest) = match url.find("://") {
        Some(idx) => url.split_at(idx + 3),
        None => ("", url),
    };
    let mut out = String::with_capacity(url.len());
    out.push_str(scheme);
    let mut last_slash = false;
    for ch in rest.chars() {
        if ch == '/' {
            if last_slash {
                continue;
            }
            last_slash = true;
        } else {
            last_slash = false;
        }
        out.push(ch);
    }
    out
}

/// Strip regex constraints from placeholders: `{id:\d+}` → `{id}`
pub fn format_path_url(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut depth = 0usize;
    let mut skipping = false;
    for ch in path.chars() {
        match ch {
            '{' => {
                depth += 1;
                if !skipping {
                    out.push(ch);
                }
            }
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    skipping = false;
                    out.push(ch);
                }
            }
            ':' if depth == 1 => skipping = true,
            _ if skipping => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Placeholder names of a URL template, in order of appearance
pub fn path_placeholders(url: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = url;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        let name = after[..end].split(':').next().unwrap_or("").trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
        rest = &after[end + 1..];
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::AnnotationTaxonomy;
    use serde_json::json;

    #[test]
    fn test_http_method_from_name() {
        assert_eq!(HttpMethod::from_name("RequestMethod.POST"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::from_name("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_name("FETCH"), None);
        assert!(HttpMethod::Put.has_body());
        assert!(!HttpMethod::Delete.has_body());
    }

    #[test]
    fn test_combine_and_simplify() {
        assert_eq!(combine_paths("/api/", "/users"), "/api/users");
        assert_eq!(combine_paths("", "users"), "/users");
        assert_eq!(combine_paths("/api", ""), "/api");
        assert_eq!(simplify_url("http://localhost:8080//api///users"), "http://localhost:8080/api/users");
        assert_eq!(simplify_url("//a//b"), "/a/b");
    }

    #[test]
    fn test_format_path_url_strips_regex() {
        assert_eq!(format_path_url("/users/{id:\\d+}/posts/{slug}"), "/users/{id}/posts/{slug}");
        assert_eq!(format_path_url("/files/{name:[a-z]{2,3}}"), "/files/{name}");
    }

    #[test]
    fn test_path_placeholders() {
        assert_eq!(path_placeholders("/api/{org}/users/{id:\\d+}"), vec!["org", "id"]);
        assert!(path_placeholders("/api/users").is_empty());
    }

    #[test]
    fn test_resolve_spring_request_mapping() {
        let registry = AnnotationRegistry::new(AnnotationTaxonomy::spring());
        let method = MethodModel::new("search").annotated(
            AnnotationModel::new("RequestMapping")
                .with("value", json!("/search"))
                .with("method", json!("RequestMethod.POST"))
                .with("params", json!("type=1")),
        );

        let mapping = resolve_mapping(&registry, "/api/users", &method, "http://localhost:8080").unwrap();
        assert_eq!(mapping.verb, HttpMethod::Post);
        assert_eq!(mapping.short_url, "/api/users/search");
        assert_eq!(mapping.url, "http://localhost:8080/api/users/search");
        assert_eq!(mapping.params, vec!["type=1"]);
        assert!(!mapping.deprecated);
    }

    #[test]
    fn test_request_mapping_without_method_defaults_to_get() {
        let registry = AnnotationRegistry::new(AnnotationTaxonomy::spring());
        let method = MethodModel::new("list").annotated(AnnotationModel::new("RequestMapping"));

        let mapping = resolve_mapping(&registry, "/api", &method, "").unwrap();
        assert_eq!(mapping.verb, HttpMethod::Get);
        assert_eq!(mapping.short_url, "/api");
    }

    #[test]
    fn test_unmapped_method_is_not_an_endpoint() {
        let registry = AnnotationRegistry::new(AnnotationTaxonomy::spring());
        let method = MethodModel::new("helper");
        assert!(resolve_mapping(&registry, "/api", &method, "").is_none());
    }

    #[test]
    fn test_deprecated_from_annotation_or_tag() {
        let registry = AnnotationRegistry::new(AnnotationTaxonomy::spring());
        let method = MethodModel::new("old")
            .annotated(AnnotationModel::new("GetMapping").with("value", json!("/old")))
            .tagged("deprecated", "use /new");

        assert!(resolve_mapping(&registry, "", &method, "").unwrap().deprecated);
    }

    #[test]
    fn test_template_for_prefers_custom_taxonomy() {
        let custom = AnnotationTaxonomy {
            framework: "micronaut".to_string(),
            ..AnnotationTaxonomy::default()
        };
        assert_eq!(template_for(Framework::Spring, Some(custom)).name(), "micronaut");
        assert_eq!(template_for(Framework::JaxRs, None).name(), "jaxrs");
    }
}
