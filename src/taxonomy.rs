//! Annotation taxonomy: which framework annotations mean what.
//!
//! A taxonomy is a plain data table (it deserializes from configuration) that
//! maps annotation names to semantic roles and names the properties each
//! annotation uses. [`AnnotationRegistry`] indexes a taxonomy for lookups by
//! simple name; it is built once per run and shared read-only between workers.
//!
//! Two taxonomies are built in: [`AnnotationTaxonomy::spring`] and
//! [`AnnotationTaxonomy::jaxrs`].

use crate::framework::HttpMethod;
use crate::source::AnnotationModel;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a parameter's value travels in the HTTP request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    Path,
    Query,
    Header,
    Body,
    Form,
    File,
}

impl BindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingKind::Path => "path",
            BindingKind::Query => "query",
            BindingKind::Header => "header",
            BindingKind::Body => "body",
            BindingKind::Form => "form",
            BindingKind::File => "file",
        }
    }
}

/// How parameters without any binding annotation are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnannotatedBinding {
    /// Query string for verbs without a body, form fields otherwise
    #[default]
    QueryOrForm,
    /// Composite values are the entity body; simple values stay in the query
    Body,
}

/// A request-mapping annotation such as `@GetMapping` or `@Path`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingAnnotation {
    pub name: String,
    /// Verb implied by the annotation itself (`GetMapping` → GET)
    pub verb: Option<HttpMethod>,
    /// Verb used when neither `verb` nor `method_prop` yields one
    pub default_verb: Option<HttpMethod>,
    /// Property holding an explicit verb (`RequestMapping.method`)
    pub method_prop: Option<String>,
    /// Properties holding the path template, first non-empty wins
    pub path_props: Vec<String>,
    pub params_prop: Option<String>,
    pub headers_prop: Option<String>,
}

impl Default for MappingAnnotation {
    fn default() -> Self {
        Self {
            name: String::new(),
            verb: None,
            default_verb: None,
            method_prop: None,
            path_props: vec!["value".to_string()],
            params_prop: None,
            headers_prop: None,
        }
    }
}

/// A parameter binding annotation such as `@RequestParam`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingAnnotation {
    pub name: String,
    pub kind: BindingKind,
    /// Properties that may carry the wire name, first non-empty wins
    pub name_props: Vec<String>,
    pub required_prop: Option<String>,
    pub default_value_prop: Option<String>,
}

impl Default for BindingAnnotation {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: BindingKind::Query,
            name_props: vec!["value".to_string(), "name".to_string()],
            required_prop: None,
            default_value_prop: None,
        }
    }
}

/// The full annotation table for one framework
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationTaxonomy {
    pub framework: String,
    pub entry_annotations: Vec<String>,
    pub mapping_annotations: Vec<MappingAnnotation>,
    pub binding_annotations: Vec<BindingAnnotation>,
    /// Parameters carrying one of these are dropped
    pub ignore_annotations: Vec<String>,
    /// Constraint annotations that force `required`
    pub validation_annotations: Vec<String>,
    /// Annotations whose `value` lists validation groups
    pub group_annotations: Vec<String>,
    /// Standalone default-value annotations (`@DefaultValue`)
    pub default_value_annotations: Vec<String>,
    pub deprecated_annotations: Vec<String>,
    /// Framework-injected parameter types that never appear on the wire
    pub ignore_types: Vec<String>,
    pub file_types: Vec<String>,
    pub unannotated: UnannotatedBinding,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn verb_mapping(name: &str, verb: HttpMethod) -> MappingAnnotation {
    MappingAnnotation {
        name: name.to_string(),
        verb: Some(verb),
        path_props: names(&["value", "path"]),
        params_prop: Some("params".to_string()),
        headers_prop: Some("headers".to_string()),
        ..MappingAnnotation::default()
    }
}

impl AnnotationTaxonomy {
    /// Spring MVC / WebFlux annotations
    pub fn spring() -> Self {
        let mut mapping_annotations = vec![MappingAnnotation {
            name: "RequestMapping".to_string(),
            default_verb: Some(HttpMethod::Get),
            method_prop: Some("method".to_string()),
            path_props: names(&["value", "path"]),
            params_prop: Some("params".to_string()),
            headers_prop: Some("headers".to_string()),
            ..MappingAnnotation::default()
        }];
        mapping_annotations.extend([
            verb_mapping("GetMapping", HttpMethod::Get),
            verb_mapping("PostMapping", HttpMethod::Post),
            verb_mapping("PutMapping", HttpMethod::Put),
            verb_mapping("PatchMapping", HttpMethod::Patch),
            verb_mapping("DeleteMapping", HttpMethod::Delete),
        ]);

        let binding = |name: &str, kind: BindingKind, default_value: bool| BindingAnnotation {
            name: name.to_string(),
            kind,
            required_prop: Some("required".to_string()),
            default_value_prop: default_value.then(|| "defaultValue".to_string()),
            ..BindingAnnotation::default()
        };

        Self {
            framework: "spring".to_string(),
            entry_annotations: names(&["RestController", "Controller"]),
            mapping_annotations,
            binding_annotations: vec![
                binding("PathVariable", BindingKind::Path, false),
                binding("RequestParam", BindingKind::Query, true),
                binding("RequestBody", BindingKind::Body, false),
                binding("RequestHeader", BindingKind::Header, true),
                binding("RequestPart", BindingKind::Form, false),
            ],
            ignore_annotations: names(&["SessionAttribute", "RequestAttribute", "CookieValue"]),
            validation_annotations: names(&["NotNull", "NotBlank", "NotEmpty"]),
            group_annotations: names(&["Validated", "Valid"]),
            default_value_annotations: Vec::new(),
            deprecated_annotations: names(&["Deprecated"]),
            ignore_types: names(&[
                "HttpServletRequest",
                "HttpServletResponse",
                "HttpSession",
                "ServerHttpRequest",
                "ServerHttpResponse",
                "ServerWebExchange",
                "Model",
                "ModelMap",
                "BindingResult",
                "Principal",
                "Locale",
                "UriComponentsBuilder",
                "WebRequest",
            ]),
            file_types: names(&["MultipartFile", "Part", "FilePart"]),
            unannotated: UnannotatedBinding::QueryOrForm,
        }
    }

    /// JAX-RS annotations
    pub fn jaxrs() -> Self {
        let verb = |name: &str, verb: HttpMethod| MappingAnnotation {
            name: name.to_string(),
            verb: Some(verb),
            path_props: Vec::new(),
            ..MappingAnnotation::default()
        };
        let binding = |name: &str, kind: BindingKind| BindingAnnotation {
            name: name.to_string(),
            kind,
            name_props: names(&["value"]),
            ..BindingAnnotation::default()
        };

        Self {
            framework: "jaxrs".to_string(),
            entry_annotations: names(&["Path"]),
            mapping_annotations: vec![
                MappingAnnotation {
                    name: "Path".to_string(),
                    ..MappingAnnotation::default()
                },
                verb("GET", HttpMethod::Get),
                verb("POST", HttpMethod::Post),
                verb("PUT", HttpMethod::Put),
                verb("PATCH", HttpMethod::Patch),
                verb("DELETE", HttpMethod::Delete),
                verb("HEAD", HttpMethod::Head),
                verb("OPTIONS", HttpMethod::Options),
            ],
            binding_annotations: vec![
                binding("PathParam", BindingKind::Path),
                binding("QueryParam", BindingKind::Query),
                binding("HeaderParam", BindingKind::Header),
                binding("FormParam", BindingKind::Form),
            ],
            ignore_annotations: names(&["Context", "Suspended", "CookieParam", "MatrixParam", "BeanParam"]),
            validation_annotations: names(&["NotNull", "NotBlank", "NotEmpty"]),
            group_annotations: names(&["Valid"]),
            default_value_annotations: names(&["DefaultValue"]),
            deprecated_annotations: names(&["Deprecated"]),
            ignore_types: names(&["AsyncResponse", "UriInfo", "HttpHeaders", "SecurityContext"]),
            file_types: names(&["InputStream", "File"]),
            unannotated: UnannotatedBinding::Body,
        }
    }
}

/// The semantic role an annotation plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationRole {
    Entry,
    Mapping,
    Binding(BindingKind),
    Ignore,
    Validation,
    Group,
}

/// Indexed, read-only view over an [`AnnotationTaxonomy`]
#[derive(Debug, Clone)]
pub struct AnnotationRegistry {
    taxonomy: AnnotationTaxonomy,
    mappings: HashMap<String, usize>,
    bindings: HashMap<String, usize>,
}

impl AnnotationRegistry {
    /// Index a taxonomy by simple annotation name
    pub fn new(taxonomy: AnnotationTaxonomy) -> Self {
        let mappings = taxonomy
            .mapping_annotations
            .iter()
            .enumerate()
            .map(|(idx, m)| (simple(&m.name).to_string(), idx))
            .collect();
        let bindings = taxonomy
            .binding_annotations
            .iter()
            .enumerate()
            .map(|(idx, b)| (simple(&b.name).to_string(), idx))
            .collect();
        debug!(
            "Registered taxonomy '{}' with {} mapping and {} binding annotations",
            taxonomy.framework,
            taxonomy.mapping_annotations.len(),
            taxonomy.binding_annotations.len()
        );
        Self {
            taxonomy,
            mappings,
            bindings,
        }
    }

    pub fn taxonomy(&self) -> &AnnotationTaxonomy {
        &self.taxonomy
    }

    /// Role of an annotation, if the taxonomy knows it.
    ///
    /// Entry wins over mapping so that JAX-RS `@Path` on a class reads as an
    /// entry marker.
    pub fn role(&self, annotation: &AnnotationModel) -> Option<AnnotationRole> {
        let name = annotation.simple_name();
        if self.is_entry(name) {
            Some(AnnotationRole::Entry)
        } else if self.mappings.contains_key(name) {
            Some(AnnotationRole::Mapping)
        } else if let Some(binding) = self.binding(name) {
            Some(AnnotationRole::Binding(binding.kind))
        } else if self.is_ignore(name) {
            Some(AnnotationRole::Ignore)
        } else if contains(&self.taxonomy.validation_annotations, name) {
            Some(AnnotationRole::Validation)
        } else if contains(&self.taxonomy.group_annotations, name) {
            Some(AnnotationRole::Group)
        } else {
            None
        }
    }

    pub fn is_entry(&self, name: &str) -> bool {
        contains(&self.taxonomy.entry_annotations, simple(name))
    }

    pub fn mapping(&self, name: &str) -> Option<&MappingAnnotation> {
        self.mappings
            .get(simple(name))
            .map(|&idx| &self.taxonomy.mapping_annotations[idx])
    }

    pub fn binding(&self, name: &str) -> Option<&BindingAnnotation> {
        self.bindings
            .get(simple(name))
            .map(|&idx| &self.taxonomy.binding_annotations[idx])
    }

    pub fn is_ignore(&self, name: &str) -> bool {
        contains(&self.taxonomy.ignore_annotations, simple(name))
    }

    pub fn is_validation(&self, name: &str) -> bool {
        contains(&self.taxonomy.validation_annotations, simple(name))
    }

    pub fn is_group(&self, name: &str) -> bool {
        contains(&self.taxonomy.group_annotations, simple(name))
    }

    pub fn is_default_value(&self, name: &str) -> bool {
        contains(&self.taxonomy.default_value_annotations, simple(name))
    }

    pub fn is_deprecated(&self, name: &str) -> bool {
        contains(&self.taxonomy.deprecated_annotations, simple(name))
    }

    /// Whether a type (simple or canonical name) is injected by the framework
    pub fn is_ignore_type(&self, type_name: &str) -> bool {
        contains(&self.taxonomy.ignore_types, simple(type_name))
    }

    pub fn is_file_type(&self, type_name: &str) -> bool {
        contains(&self.taxonomy.file_types, simple(type_name))
    }

    pub fn unannotated(&self) -> UnannotatedBinding {
        self.taxonomy.unannotated
    }
}

fn simple(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn contains(list: &[String], name: &str) -> bool {
    list.iter().any(|entry| simple(entry) == name)
}
