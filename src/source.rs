//! Structural source model handed over by the external source-model provider.
//!
//! Everything in this module is read-only for the duration of a run. The types
//! derive `Deserialize` so a provider can hand the inventory over as JSON or
//! YAML; the small builder methods exist for providers that construct the
//! model in code (and for tests).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// The category of a class-like declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

/// An annotation with its named properties.
///
/// Property values are kept as raw JSON values because providers differ in how
/// they report them: quoted strings, bare enum constants, or lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationModel {
    /// Simple or fully qualified annotation name
    pub name: String,
    pub properties: BTreeMap<String, Value>,
}

/// A doc-comment block tag such as `@param id the user id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocTag {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamModel {
    pub name: String,
    /// Generic canonical type descriptor, e.g. `java.util.List<com.example.User>`
    pub type_name: String,
    pub annotations: Vec<AnnotationModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodModel {
    pub name: String,
    pub params: Vec<ParamModel>,
    pub return_type: String,
    pub annotations: Vec<AnnotationModel>,
    pub comment: Option<String>,
    pub tags: Vec<DocTag>,
    pub is_private: bool,
    /// Set for `default` methods declared on interfaces
    pub is_default: bool,
}

impl Default for MethodModel {
    fn default() -> Self {
        Self {
            name: String::new(),
            params: Vec::new(),
            return_type: "void".to_string(),
            annotations: Vec::new(),
            comment: None,
            tags: Vec::new(),
            is_private: false,
            is_default: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldModel {
    pub name: String,
    pub type_name: String,
    pub annotations: Vec<AnnotationModel>,
    pub comment: Option<String>,
    pub tags: Vec<DocTag>,
    pub is_static: bool,
    pub is_transient: bool,
}

/// A declared enum constant. `value` is filled by the provider when the enum
/// exposes a serialized value accessor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumConstant {
    pub name: String,
    pub value: Option<Value>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassModel {
    pub name: String,
    pub canonical_name: String,
    pub package: String,
    pub kind: ClassKind,
    /// Formal type parameter names, e.g. `["T"]` for `Page<T>`
    pub type_params: Vec<String>,
    /// Supertype descriptor including type arguments, e.g. `BaseController<User>`
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub annotations: Vec<AnnotationModel>,
    pub comment: Option<String>,
    pub tags: Vec<DocTag>,
    pub methods: Vec<MethodModel>,
    pub fields: Vec<FieldModel>,
    pub enum_constants: Vec<EnumConstant>,
}

/// Read access to annotations shared by classes, methods, params and fields.
pub trait Annotated {
    fn annotations(&self) -> &[AnnotationModel];

    /// Find an annotation by simple name
    fn annotation(&self, simple_name: &str) -> Option<&AnnotationModel> {
        self.annotations()
            .iter()
            .find(|a| a.simple_name() == simple_name)
    }

    fn has_annotation(&self, simple_name: &str) -> bool {
        self.annotation(simple_name).is_some()
    }
}

/// Read access to doc comments and block tags.
pub trait Documented {
    fn comment(&self) -> Option<&str>;
    fn tags(&self) -> &[DocTag];

    fn tag(&self, name: &str) -> Option<&DocTag> {
        self.tags().iter().find(|t| t.name == name)
    }

    fn tag_value(&self, name: &str) -> Option<&str> {
        self.tag(name).map(|t| t.value.trim())
    }

    fn tag_values(&self, name: &str) -> Vec<&str> {
        self.tags()
            .iter()
            .filter(|t| t.name == name)
            .map(|t| t.value.trim())
            .collect()
    }

    fn has_tag(&self, name: &str) -> bool {
        self.tag(name).is_some()
    }
}

macro_rules! impl_annotated {
    ($($ty:ty),*) => {
        $(impl Annotated for $ty {
            fn annotations(&self) -> &[AnnotationModel] {
                &self.annotations
            }
        })*
    };
}

macro_rules! impl_documented {
    ($($ty:ty),*) => {
        $(impl Documented for $ty {
            fn comment(&self) -> Option<&str> {
                self.comment.as_deref()
            }
            fn tags(&self) -> &[DocTag] {
                &self.tags
            }
        })*
    };
}

impl_annotated!(ClassModel, MethodModel, ParamModel, FieldModel);
impl_documented!(ClassModel, MethodModel, FieldModel);

/// Strip surrounding whitespace and double quotes from a provider string
pub fn strip_quotes(value: &str) -> &str {
    value.trim().trim_matches('"').trim()
}

impl AnnotationModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Add a property (builder style)
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Last segment of the annotation name
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// All string values of a property. Lists are flattened; brace-delimited
    /// list text such as `{"a", "b"}` is split as well.
    pub fn string_values(&self, key: &str) -> Vec<String> {
        match self.property(key) {
            Some(value) => flatten_strings(value),
            None => Vec::new(),
        }
    }

    pub fn first_string(&self, key: &str) -> Option<String> {
        self.string_values(key).into_iter().next()
    }

    pub fn bool_value(&self, key: &str) -> Option<bool> {
        match self.property(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => strip_quotes(s).parse().ok(),
            _ => None,
        }
    }
}

fn flatten_strings(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('{') && trimmed.ends_with('}') {
                trimmed[1..trimmed.len() - 1]
                    .split(',')
                    .map(strip_quotes)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            } else {
                let single = strip_quotes(trimmed);
                if single.is_empty() {
                    Vec::new()
                } else {
                    vec![single.to_string()]
                }
            }
        }
        Value::Array(items) => items.iter().flat_map(flatten_strings).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

impl DocTag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl ParamModel {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: AnnotationModel) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl MethodModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn annotated(mut self, annotation: AnnotationModel) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn param(mut self, param: ParamModel) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.return_type = type_name.into();
        self
    }

    pub fn commented(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn tagged(mut self, name: &str, value: &str) -> Self {
        self.tags.push(DocTag::new(name, value));
        self
    }
}

impl FieldModel {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn annotated(mut self, annotation: AnnotationModel) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn commented(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn tagged(mut self, name: &str, value: &str) -> Self {
        self.tags.push(DocTag::new(name, value));
        self
    }
}

impl ClassModel {
    /// Create a class from its canonical name; simple name and package are derived
    pub fn new(canonical_name: impl Into<String>) -> Self {
        let canonical_name = canonical_name.into();
        let (package, name) = match canonical_name.rsplit_once('.') {
            Some((package, name)) => (package.to_string(), name.to_string()),
            None => (String::new(), canonical_name.clone()),
        };
        Self {
            name,
            canonical_name,
            package,
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn type_params(mut self, params: &[&str]) -> Self {
        self.type_params = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn extends(mut self, super_class: impl Into<String>) -> Self {
        self.super_class = Some(super_class.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn annotated(mut self, annotation: AnnotationModel) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn commented(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn tagged(mut self, name: &str, value: &str) -> Self {
        self.tags.push(DocTag::new(name, value));
        self
    }

    pub fn method(mut self, method: MethodModel) -> Self {
        self.methods.push(method);
        self
    }

    pub fn field(mut self, field: FieldModel) -> Self {
        self.fields.push(field);
        self
    }

    pub fn constant(mut self, name: &str, value: Option<Value>) -> Self {
        self.enum_constants.push(EnumConstant {
            name: name.to_string(),
            value,
            description: None,
        });
        self
    }

    /// Canonical name, falling back to the simple name when the provider left it out
    pub fn canonical(&self) -> &str {
        if self.canonical_name.is_empty() {
            &self.name
        } else {
            &self.canonical_name
        }
    }

    /// Derive simple name and package from the canonical name where the provider omitted them
    fn fill_names(&mut self) {
        if self.canonical_name.is_empty() {
            return;
        }
        let (package, name) = self.canonical_name.rsplit_once('.').unwrap_or(("", self.canonical_name.as_str()));
        if self.name.is_empty() {
            self.name = name.to_string();
        }
        if self.package.is_empty() {
            self.package = package.to_string();
        }
    }

    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    pub fn is_annotation(&self) -> bool {
        self.kind == ClassKind::Annotation
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }
}

/// The full class inventory of one run, indexed for lookups by canonical and
/// simple name.
#[derive(Debug, Default)]
pub struct SourceModel {
    classes: Vec<ClassModel>,
    by_canonical: HashMap<String, usize>,
    by_simple: HashMap<String, usize>,
}

impl SourceModel {
    pub fn new(mut classes: Vec<ClassModel>) -> Self {
        let mut by_canonical = HashMap::new();
        let mut by_simple = HashMap::new();
        for class in classes.iter_mut() {
            class.fill_names();
        }
        for (idx, class) in classes.iter().enumerate() {
            by_canonical.entry(class.canonical().to_string()).or_insert(idx);
            by_simple.entry(class.name.clone()).or_insert(idx);
        }
        Self {
            classes,
            by_canonical,
            by_simple,
        }
    }

    /// Classes in discovery order
    pub fn classes(&self) -> &[ClassModel] {
        &self.classes
    }

    /// Look up a class by canonical name, then by simple name
    pub fn class_by_name(&self, name: &str) -> Option<&ClassModel> {
        if let Some(&idx) = self.by_canonical.get(name) {
            return Some(&self.classes[idx]);
        }
        let simple = name.rsplit('.').next().unwrap_or(name);
        self.by_simple.get(simple).map(|&idx| &self.classes[idx])
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
