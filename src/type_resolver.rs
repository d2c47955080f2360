use crate::source::{Annotated, AnnotationModel, ClassModel, Documented, FieldModel, SourceModel};
use crate::taxonomy::AnnotationRegistry;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use syn::ext::IdentExt;

/// A parsed generic type reference such as `java.util.List<com.example.User>[]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Dotted canonical (or simple) name; empty for the opaque unknown type
    pub name: String,
    pub args: Vec<TypeRef>,
    pub array_depth: usize,
}

/// Substitution of formal type parameters by actual type references
pub type TypeMap = HashMap<String, TypeRef>;

/// Primitive-like types with a direct scalar representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    Char,
    Byte,
    Short,
    Int,
    Long,
    BigInteger,
    Float,
    Double,
    BigDecimal,
    Boolean,
    Date,
    DateTime,
    Time,
    Uuid,
}

/// Classification of a resolved type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Primitive(PrimitiveType),
    Enum,
    /// Collection with its element type
    Collection(TypeRef),
    /// Array with its element type
    Array(TypeRef),
    /// Map with key and value types
    Map(TypeRef, TypeRef),
    File,
    /// A composite class found in the source model
    Object,
    Unknown,
}

/// Field serialization attributes read from annotations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldAttributes {
    /// Renamed field name
    pub rename: Option<String>,
    /// Whether the field never appears on the wire
    pub skip: bool,
}

/// A field of an instantiated composite type
#[derive(Debug, Clone)]
pub struct ResolvedField<'a> {
    /// Wire name (after renames)
    pub name: String,
    /// Declared type with the owner's type arguments substituted
    pub ty: TypeRef,
    pub field: &'a FieldModel,
    pub declaring_class: &'a ClassModel,
}

/// An ancestor (or the class itself) paired with its substitution map
#[derive(Debug, Clone)]
pub struct Ancestor<'a> {
    pub class: &'a ClassModel,
    pub actual_types: TypeMap,
}

const COLLECTIONS: &[&str] = &[
    "List",
    "ArrayList",
    "LinkedList",
    "Set",
    "HashSet",
    "LinkedHashSet",
    "TreeSet",
    "SortedSet",
    "Collection",
    "Iterable",
    "Queue",
    "Deque",
    "ArrayDeque",
    "Vector",
    "Stream",
];

const MAPS: &[&str] = &[
    "Map",
    "HashMap",
    "LinkedHashMap",
    "TreeMap",
    "SortedMap",
    "ConcurrentHashMap",
    "ConcurrentMap",
    "Hashtable",
    "MultiValueMap",
    "JSONObject",
];

const WRAPPERS: &[&str] = &[
    "Optional",
    "ResponseEntity",
    "HttpEntity",
    "Mono",
    "CompletableFuture",
    "CompletionStage",
    "Future",
    "ListenableFuture",
    "Callable",
    "DeferredResult",
    "WebAsyncTask",
];

const OBJECT: &str = "java.lang.Object";

impl TypeRef {
    /// Create a non-generic type reference
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            array_depth: 0,
        }
    }

    /// Create a generic type reference
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            args,
            array_depth: 0,
        }
    }

    /// The opaque unknown type
    pub fn unknown() -> Self {
        Self::new("")
    }

    pub fn is_unknown(&self) -> bool {
        self.name.is_empty()
    }

    /// Last segment of the name
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Element type of an array reference
    pub fn element(&self) -> TypeRef {
        Self {
            array_depth: self.array_depth.saturating_sub(1),
            ..self.clone()
        }
    }

    /// Parse a type descriptor. Descriptors that cannot be parsed become the
    /// opaque unknown type.
    pub fn parse(descriptor: &str) -> Self {
        let normalized = normalize_descriptor(descriptor);
        if normalized.is_empty() {
            return Self::unknown();
        }
        match syn::parse_str::<syn::Type>(&normalized) {
            Ok(ty) => Self::from_syn(&ty),
            Err(err) => {
                warn!("Could not parse type descriptor '{}': {}", descriptor, err);
                Self::unknown()
            }
        }
    }

    fn from_syn(ty: &syn::Type) -> Self {
        match ty {
            syn::Type::Path(type_path) => Self::from_path(&type_path.path),
            syn::Type::Slice(slice) => {
                let mut inner = Self::from_syn(&slice.elem);
                if !inner.is_unknown() {
                    inner.array_depth += 1;
                }
                inner
            }
            syn::Type::Paren(paren) => Self::from_syn(&paren.elem),
            _ => Self::unknown(),
        }
    }

    fn from_path(path: &syn::Path) -> Self {
        let name = path
            .segments
            .iter()
            .map(|segment| unmangle(&segment.ident.unraw().to_string()))
            .collect::<Vec<_>>()
            .join(".");

        let mut args = Vec::new();
        if let Some(segment) = path.segments.last() {
            if let syn::PathArguments::AngleBracketed(generic) = &segment.arguments {
                for arg in &generic.args {
                    if let syn::GenericArgument::Type(inner) = arg {
                        args.push(Self::from_syn(inner));
                    }
                }
            }
        }

        Self::generic(name, args)
    }

    /// Apply a substitution map to every type variable in this reference
    pub fn substitute(&self, actual_types: &TypeMap) -> TypeRef {
        if self.args.is_empty() {
            if let Some(actual) = actual_types.get(&self.name) {
                let mut replaced = actual.clone();
                replaced.array_depth += self.array_depth;
                return replaced;
            }
            return self.clone();
        }
        Self {
            name: self.name.clone(),
            args: self.args.iter().map(|arg| arg.substitute(actual_types)).collect(),
            array_depth: self.array_depth,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return write!(f, "{}", OBJECT);
        }
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        for _ in 0..self.array_depth {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// Rewrite a source-language descriptor into syntax `syn` can parse:
/// wildcards are dropped, arrays become slices, dotted names become paths and
/// keyword segments are escaped.
fn normalize_descriptor(descriptor: &str) -> String {
    let mut text = descriptor.trim().replace('$', ".");
    for bound in ["? extends ", "? super "] {
        text = text.replace(bound, "");
    }
    text = replace_wildcards(&text);
    while let Some(text_with_slice) = wrap_first_array(&text) {
        text = text_with_slice;
    }

    let mut out = String::with_capacity(text.len() + 16);
    let mut word = String::new();
    let flush = |word: &mut String, out: &mut String| {
        if !word.is_empty() {
            out.push_str(&escape_segment(word));
            word.clear();
        }
    };
    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            word.push(ch);
        } else {
            flush(&mut word, &mut out);
            if ch == '.' {
                out.push_str("::");
            } else {
                out.push(ch);
            }
        }
    }
    flush(&mut word, &mut out);
    out
}

fn replace_wildcards(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    for (idx, &ch) in chars.iter().enumerate() {
        let prev = chars[..idx].iter().rev().find(|c| !c.is_whitespace());
        if ch == '?' && matches!(prev, None | Some('<') | Some(',')) {
            out.push_str(OBJECT);
        } else {
            out.push(ch);
        }
    }
    out
}

/// Turn the first `T[]` into `[T]`
fn wrap_first_array(text: &str) -> Option<String> {
    let pos = text.find("[]")?;
    let bytes = text.as_bytes();
    let mut start = pos;
    let mut depth = 0i32;
    while start > 0 {
        let ch = bytes[start - 1] as char;
        match ch {
            '>' | ']' => depth += 1,
            '<' | '[' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            ',' | ' ' if depth == 0 => break,
            _ => {}
        }
        start -= 1;
    }
    let operand = text[start..pos].trim();
    if operand.is_empty() {
        return None;
    }
    Some(format!("{}[{}]{}", &text[..start], operand, &text[pos + 2..]))
}

const RESERVED: &[&str] = &["self", "Self", "super", "crate", "_"];

fn escape_segment(word: &str) -> String {
    if RESERVED.contains(&word) {
        format!("__kw_{}", word)
    } else if syn::parse_str::<syn::Ident>(word).is_err() && !word.starts_with(|c: char| c.is_ascii_digit()) {
        format!("r#{}", word)
    } else {
        word.to_string()
    }
}

fn unmangle(ident: &str) -> String {
    ident.strip_prefix("__kw_").unwrap_or(ident).to_string()
}

impl PrimitiveType {
    /// Look up a primitive by simple or canonical name
    pub fn from_name(type_name: &str) -> Option<Self> {
        let simple = type_name.rsplit('.').next().unwrap_or(type_name);
        match simple {
            "String" | "CharSequence" | "StringBuilder" | "StringBuffer" => Some(PrimitiveType::String),
            "char" | "Character" => Some(PrimitiveType::Char),
            "byte" | "Byte" => Some(PrimitiveType::Byte),
            "short" | "Short" => Some(PrimitiveType::Short),
            "int" | "Integer" | "AtomicInteger" => Some(PrimitiveType::Int),
            "long" | "Long" | "AtomicLong" => Some(PrimitiveType::Long),
            "BigInteger" => Some(PrimitiveType::BigInteger),
            "float" | "Float" => Some(PrimitiveType::Float),
            "double" | "Double" => Some(PrimitiveType::Double),
            "BigDecimal" | "Number" => Some(PrimitiveType::BigDecimal),
            "boolean" | "Boolean" | "AtomicBoolean" => Some(PrimitiveType::Boolean),
            "Date" | "LocalDate" => Some(PrimitiveType::Date),
            "LocalDateTime" | "ZonedDateTime" | "OffsetDateTime" | "Instant" | "Timestamp" => {
                Some(PrimitiveType::DateTime)
            }
            "LocalTime" | "Time" => Some(PrimitiveType::Time),
            "UUID" => Some(PrimitiveType::Uuid),
            _ => None,
        }
    }

    /// Documentation label
    pub fn label(&self) -> &'static str {
        match self {
            PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Int => "int32",
            PrimitiveType::Long | PrimitiveType::BigInteger => "int64",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::BigDecimal => "number",
            PrimitiveType::Boolean => "boolean",
            _ => "string",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            PrimitiveType::Byte
                | PrimitiveType::Short
                | PrimitiveType::Int
                | PrimitiveType::Long
                | PrimitiveType::BigInteger
                | PrimitiveType::Float
                | PrimitiveType::Double
                | PrimitiveType::BigDecimal
        )
    }
}

/// Type resolver - resolves type references against the source model.
///
/// The resolver only reads the model, so one instance can be shared by all
/// workers of a run.
pub struct TypeResolver<'a> {
    model: &'a SourceModel,
    registry: &'a AnnotationRegistry,
}

impl<'a> TypeResolver<'a> {
    /// Create a new TypeResolver over a source model
    pub fn new(model: &'a SourceModel, registry: &'a AnnotationRegistry) -> Self {
        debug!("Initializing TypeResolver with {} classes", model.len());
        Self { model, registry }
    }

    pub fn model(&self) -> &'a SourceModel {
        self.model
    }

    pub fn registry(&self) -> &'a AnnotationRegistry {
        self.registry
    }

    /// Find the class declaring a type, skipping primitives
    pub fn class_of(&self, ty: &TypeRef) -> Option<&'a ClassModel> {
        if ty.is_unknown() || PrimitiveType::from_name(&ty.name).is_some() {
            return None;
        }
        self.model.class_by_name(&ty.name)
    }

    /// Strip transparent wrappers such as `Optional<T>` or `ResponseEntity<T>`.
    /// `Flux<T>` becomes `List<T>`.
    pub fn unwrap(&self, ty: &TypeRef) -> TypeRef {
        let mut current = ty.clone();
        loop {
            if current.array_depth > 0 {
                return current;
            }
            let simple = current.simple_name();
            if simple == "Flux" {
                return TypeRef::generic("java.util.List", current.args.clone());
            }
            if !WRAPPERS.contains(&simple) {
                return current;
            }
            current = match current.args.first() {
                Some(inner) => inner.clone(),
                None => TypeRef::new(OBJECT),
            };
        }
    }

    /// Classify a type (after unwrapping)
    pub fn classify(&self, ty: &TypeRef) -> TypeKind {
        let ty = self.unwrap(ty);
        if ty.is_unknown() {
            return TypeKind::Unknown;
        }
        if ty.array_depth > 0 {
            return TypeKind::Array(ty.element());
        }
        if self.registry.is_file_type(&ty.name) {
            return TypeKind::File;
        }
        if let Some(primitive) = PrimitiveType::from_name(&ty.name) {
            return TypeKind::Primitive(primitive);
        }
        let simple = ty.simple_name();
        if COLLECTIONS.contains(&simple) {
            let element = ty.args.first().cloned().unwrap_or_else(|| TypeRef::new(OBJECT));
            return TypeKind::Collection(element);
        }
        if MAPS.contains(&simple) {
            let key = ty.args.first().cloned().unwrap_or_else(|| TypeRef::new("java.lang.String"));
            let value = ty.args.get(1).cloned().unwrap_or_else(|| TypeRef::new(OBJECT));
            return TypeKind::Map(key, value);
        }
        match self.class_of(&ty) {
            Some(class) if class.is_enum() => TypeKind::Enum,
            Some(_) => TypeKind::Object,
            None => {
                debug!("Type {} is opaque", ty);
                TypeKind::Unknown
            }
        }
    }

    /// Whether a type has a scalar representation (primitive or enum)
    pub fn is_simple(&self, ty: &TypeRef) -> bool {
        matches!(self.classify(ty), TypeKind::Primitive(_) | TypeKind::Enum)
    }

    /// Documentation label of a type
    pub fn type_label(&self, ty: &TypeRef) -> String {
        match self.classify(ty) {
            TypeKind::Primitive(primitive) => primitive.label().to_string(),
            TypeKind::Enum => "enum".to_string(),
            TypeKind::Collection(_) | TypeKind::Array(_) => "array".to_string(),
            TypeKind::Map(_, _) => "map".to_string(),
            TypeKind::File => "file".to_string(),
            TypeKind::Object | TypeKind::Unknown => "object".to_string(),
        }
    }

    /// Map a class's formal type parameters to the arguments of `instance`
    pub fn actual_types_map(&self, class: &ClassModel, instance: &TypeRef) -> TypeMap {
        class
            .type_params
            .iter()
            .enumerate()
            .map(|(idx, param)| {
                let actual = instance.args.get(idx).cloned().unwrap_or_else(|| TypeRef::new(OBJECT));
                (param.clone(), actual)
            })
            .collect()
    }

    /// The class itself followed by its superclass chain, each with the
    /// substitution map composed from `instance` downwards.
    pub fn superclass_chain(&self, class: &'a ClassModel, actual_types: TypeMap) -> Vec<Ancestor<'a>> {
        let mut chain = vec![Ancestor { class, actual_types }];
        let mut seen: HashSet<&str> = HashSet::from([class.canonical()]);

        loop {
            let current = &chain[chain.len() - 1];
            let Some(descriptor) = current.class.super_class.as_deref() else {
                break;
            };
            let parent_ref = TypeRef::parse(descriptor).substitute(&current.actual_types);
            let Some(parent) = self.class_of(&parent_ref) else {
                break;
            };
            if !seen.insert(parent.canonical()) {
                warn!("Cyclic superclass chain at {}", parent.canonical());
                break;
            }
            let actual_types = self.actual_types_map(parent, &parent_ref);
            chain.push(Ancestor {
                class: parent,
                actual_types,
            });
        }
        chain
    }

    /// Every interface implemented by the chain (and the interfaces they
    /// extend), each with its substitution map. Breadth-first, deduplicated.
    pub fn interfaces(&self, chain: &[Ancestor<'a>]) -> Vec<Ancestor<'a>> {
        let mut queue: Vec<(TypeRef, TypeMap)> = chain
            .iter()
            .flat_map(|ancestor| {
                ancestor
                    .class
                    .interfaces
                    .iter()
                    .map(|descriptor| (TypeRef::parse(descriptor), ancestor.actual_types.clone()))
            })
            .collect();
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut idx = 0;
        while idx < queue.len() {
            let (descriptor, outer) = queue[idx].clone();
            idx += 1;
            let instance = descriptor.substitute(&outer);
            let Some(interface) = self.class_of(&instance) else {
                continue;
            };
            if !seen.insert(interface.canonical()) {
                continue;
            }
            let actual_types = self.actual_types_map(interface, &instance);
            for parent in &interface.interfaces {
                queue.push((TypeRef::parse(parent), actual_types.clone()));
            }
            out.push(Ancestor {
                class: interface,
                actual_types,
            });
        }
        out
    }

    /// Eligible fields of an instantiated composite type, parent fields first.
    /// A field redeclared in a subclass replaces the parent's in place.
    pub fn fields_of(&self, ty: &TypeRef) -> Vec<ResolvedField<'a>> {
        let ty = self.unwrap(ty);
        let Some(class) = self.class_of(&ty) else {
            return Vec::new();
        };
        let actual_types = self.actual_types_map(class, &ty);
        let chain = self.superclass_chain(class, actual_types);

        let mut fields: Vec<ResolvedField<'a>> = Vec::new();
        for ancestor in chain.iter().rev() {
            for field in &ancestor.class.fields {
                let attrs = field_attributes(field);
                if !is_eligible(field) || attrs.skip {
                    continue;
                }
                let resolved = ResolvedField {
                    name: attrs.rename.unwrap_or_else(|| field.name.clone()),
                    ty: TypeRef::parse(&field.type_name).substitute(&ancestor.actual_types),
                    field,
                    declaring_class: ancestor.class,
                };
                match fields.iter().position(|f| f.field.name == field.name) {
                    Some(pos) => fields[pos] = resolved,
                    None => fields.push(resolved),
                }
            }
        }
        fields
    }

    /// Serialized values of an enum's constants, in declaration order
    pub fn enum_values(&self, ty: &TypeRef) -> Vec<serde_json::Value> {
        let ty = self.unwrap(ty);
        match self.class_of(&ty) {
            Some(class) => class
                .enum_constants
                .iter()
                .map(|constant| {
                    constant
                        .value
                        .clone()
                        .unwrap_or_else(|| serde_json::Value::String(constant.name.clone()))
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Apply an `@param` type override (`description|com.x.ActualType`),
    /// then the configured replacement map.
    pub fn override_type(
        &self,
        declared: &TypeRef,
        param_comment: Option<&str>,
        replace_class_map: &BTreeMap<String, String>,
    ) -> TypeRef {
        let mut ty = declared.clone();
        if let Some(candidate) = param_comment.and_then(|comment| {
            let (_, last) = comment.rsplit_once('|')?;
            self.class_reference(last.trim())
        }) {
            debug!("Type of parameter overridden from {} to {}", ty, candidate);
            ty = candidate;
        }
        let key = ty.to_string();
        let replacement = replace_class_map
            .get(&key)
            .or_else(|| replace_class_map.get(&ty.name));
        if let Some(replacement) = replacement {
            let replaced = TypeRef::parse(replacement);
            if !replaced.is_unknown() {
                debug!("Type {} replaced by {}", ty, replaced);
                ty = replaced;
            }
        }
        ty
    }

    /// Parse `text` as a type reference if it names something resolvable
    fn class_reference(&self, text: &str) -> Option<TypeRef> {
        let valid_chars = text
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '$' | '<' | '>' | ',' | ' ' | '[' | ']' | '?'));
        if text.is_empty() || !valid_chars || !text.starts_with(|c: char| c.is_alphabetic()) {
            return None;
        }
        let ty = TypeRef::parse(text);
        if ty.is_unknown() {
            return None;
        }
        (self.classify(&ty) != TypeKind::Unknown).then_some(ty)
    }
}

/// Whether a field takes part in serialization at all
pub fn is_eligible(field: &FieldModel) -> bool {
    !(field.is_static || field.is_transient || field.name == "serialVersionUID" || field.has_tag("ignore"))
}

/// Read rename/skip annotations (Jackson, Fastjson, Gson) from a field
pub fn field_attributes(field: &FieldModel) -> FieldAttributes {
    let mut attrs = FieldAttributes::default();
    for annotation in field.annotations() {
        match annotation.simple_name() {
            "JsonIgnore" => {
                attrs.skip = annotation.bool_value("value").unwrap_or(true);
            }
            "JsonProperty" | "SerializedName" => {
                if let Some(name) = annotation.first_string("value").filter(|n| !n.is_empty()) {
                    attrs.rename = Some(name);
                }
            }
            "JSONField" => {
                if annotation.bool_value("serialize") == Some(false) {
                    attrs.skip = true;
                }
                if let Some(name) = annotation.first_string("name").filter(|n| !n.is_empty()) {
                    attrs.rename = Some(name);
                }
            }
            _ => {}
        }
    }
    attrs
}

/// Validation groups named by an annotation property (`groups` on
/// constraints, `value` on `@Validated`), as simple names
pub fn annotation_groups(annotation: &AnnotationModel, prop: &str) -> Vec<String> {
    let mut groups: Vec<String> = Vec::new();
    for raw in annotation.string_values(prop) {
        let name = group_name(&raw);
        if !name.is_empty() && !groups.contains(&name) {
            groups.push(name);
        }
    }
    groups
}

fn group_name(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches(".class");
    trimmed.rsplit('.').next().unwrap_or(trimmed).to_string()
}

/// Whether a field is visible under the call site's validation groups.
///
/// With no active groups every field is visible. Otherwise a field whose
/// validation annotations all declare groups is visible only when one of them
/// is active.
pub fn field_in_groups(field: &FieldModel, groups: &[String], registry: &AnnotationRegistry) -> bool {
    if groups.is_empty() {
        return true;
    }
    let declared: Vec<Vec<String>> = field
        .annotations()
        .iter()
        .filter(|a| registry.is_validation(&a.name))
        .map(|a| annotation_groups(a, "groups"))
        .collect();
    if declared.is_empty() || declared.iter().any(|g| g.is_empty()) {
        return true;
    }
    declared.iter().flatten().any(|g| groups.contains(g))
}

/// Whether a field is required under the active validation groups
pub fn field_required(field: &FieldModel, groups: &[String], registry: &AnnotationRegistry) -> bool {
    if field.has_tag("required") {
        return true;
    }
    field.annotations().iter().any(|a| {
        if !registry.is_validation(&a.name) {
            return false;
        }
        let declared = annotation_groups(a, "groups");
        declared.is_empty() || groups.is_empty() || declared.iter().any(|g| groups.contains(g))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ClassKind;
    use crate::taxonomy::AnnotationTaxonomy;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn spring() -> AnnotationRegistry {
        AnnotationRegistry::new(AnnotationTaxonomy::spring())
    }

    fn model() -> SourceModel {
        SourceModel::new(vec![
            ClassModel::new("com.example.BaseEntity")
                .field(FieldModel::new("id", "java.lang.Long"))
                .field(FieldModel::new("serialVersionUID", "long")),
            ClassModel::new("com.example.User")
                .extends("com.example.BaseEntity")
                .field(FieldModel::new("name", "java.lang.String"))
                .field(FieldModel::new("password", "String").annotated(AnnotationModel::new("JsonIgnore")))
                .field(
                    FieldModel::new("email", "String")
                        .annotated(AnnotationModel::new("JsonProperty").with("value", json!("mail"))),
                ),
            ClassModel::new("com.example.Page")
                .type_params(&["T"])
                .field(FieldModel::new("items", "java.util.List<T>"))
                .field(FieldModel::new("total", "long")),
            ClassModel::new("com.example.UserPage").extends("com.example.Page<com.example.User>"),
            ClassModel::new("com.example.Status")
                .kind(ClassKind::Enum)
                .constant("ACTIVE", None)
                .constant("LOCKED", Some(json!(2))),
        ])
    }

    #[test]
    fn test_parse_generic_descriptor() {
        let ty = TypeRef::parse("java.util.Map<java.lang.String, java.util.List<com.example.User>>");
        assert_eq!(ty.name, "java.util.Map");
        assert_eq!(ty.args.len(), 2);
        assert_eq!(ty.args[1].name, "java.util.List");
        assert_eq!(ty.args[1].args[0].name, "com.example.User");
        assert_eq!(
            ty.to_string(),
            "java.util.Map<java.lang.String, java.util.List<com.example.User>>"
        );
    }

    #[test]
    fn test_parse_arrays_and_wildcards() {
        let ty = TypeRef::parse("com.example.User[][]");
        assert_eq!(ty.name, "com.example.User");
        assert_eq!(ty.array_depth, 2);

        let ty = TypeRef::parse("java.util.List<? extends com.example.User>");
        assert_eq!(ty.args[0].name, "com.example.User");

        let ty = TypeRef::parse("java.util.Map<String, ?>");
        assert_eq!(ty.args[1].name, "java.lang.Object");

        let ty = TypeRef::parse("java.util.List<int[]>");
        assert_eq!(ty.args[0].array_depth, 1);
    }

    #[test]
    fn test_parse_keyword_segments_and_inner_classes() {
        let ty = TypeRef::parse("com.example.type.impl.Outer$Inner");
        assert_eq!(ty.name, "com.example.type.impl.Outer.Inner");

        let ty = TypeRef::parse("com.self.Thing");
        assert_eq!(ty.name, "com.self.Thing");
    }

    #[test]
    fn test_parse_garbage_is_unknown() {
        assert!(TypeRef::parse("").is_unknown());
        assert!(TypeRef::parse("List<<").is_unknown());
    }

    #[test]
    fn test_classify() {
        let model = model();
        let registry = spring();
        let resolver = TypeResolver::new(&model, &registry);

        let kind = |d: &str| resolver.classify(&TypeRef::parse(d));
        assert_eq!(kind("int"), TypeKind::Primitive(PrimitiveType::Int));
        assert_eq!(kind("java.lang.String"), TypeKind::Primitive(PrimitiveType::String));
        assert_eq!(kind("com.example.Status"), TypeKind::Enum);
        assert_eq!(kind("com.example.User"), TypeKind::Object);
        assert_eq!(kind("org.springframework.web.multipart.MultipartFile"), TypeKind::File);
        assert_eq!(kind("com.other.Missing"), TypeKind::Unknown);
        assert_eq!(
            kind("java.util.List<com.example.User>"),
            TypeKind::Collection(TypeRef::new("com.example.User"))
        );
        assert_eq!(kind("long[]"), TypeKind::Array(TypeRef::new("long")));
        assert!(matches!(kind("java.util.Map<String, Integer>"), TypeKind::Map(_, _)));
    }

    #[test]
    fn test_unwrap_wrappers() {
        let model = model();
        let registry = spring();
        let resolver = TypeResolver::new(&model, &registry);

        let ty = TypeRef::parse("ResponseEntity<java.util.Optional<com.example.User>>");
        assert_eq!(resolver.unwrap(&ty), TypeRef::new("com.example.User"));

        let ty = TypeRef::parse("reactor.core.publisher.Flux<com.example.User>");
        assert_eq!(resolver.unwrap(&ty).name, "java.util.List");
    }

    #[test]
    fn test_fields_of_follows_ancestors_and_attributes() {
        let model = model();
        let registry = spring();
        let resolver = TypeResolver::new(&model, &registry);

        let fields = resolver.fields_of(&TypeRef::new("com.example.User"));
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "mail"]);
        assert_eq!(fields[0].declaring_class.name, "BaseEntity");
    }

    #[test]
    fn test_fields_of_substitutes_generics_through_superclass() {
        let model = model();
        let registry = spring();
        let resolver = TypeResolver::new(&model, &registry);

        let fields = resolver.fields_of(&TypeRef::new("com.example.UserPage"));
        assert_eq!(fields[0].name, "items");
        assert_eq!(fields[0].ty.to_string(), "java.util.List<com.example.User>");

        let fields = resolver.fields_of(&TypeRef::parse("com.example.Page<java.lang.String>"));
        assert_eq!(fields[0].ty.to_string(), "java.util.List<java.lang.String>");
    }

    #[test]
    fn test_enum_values_prefer_serialized_value() {
        let model = model();
        let registry = spring();
        let resolver = TypeResolver::new(&model, &registry);

        let values = resolver.enum_values(&TypeRef::new("Status"));
        assert_eq!(values, vec![json!("ACTIVE"), json!(2)]);
    }

    #[test]
    fn test_override_type_from_param_comment() {
        let model = model();
        let registry = spring();
        let resolver = TypeResolver::new(&model, &registry);
        let declared = TypeRef::new("java.lang.Object");
        let empty = BTreeMap::new();

        let ty = resolver.override_type(&declared, Some("the payload|com.example.User"), &empty);
        assert_eq!(ty.name, "com.example.User");

        let ty = resolver.override_type(&declared, Some("a|b|not a class!"), &empty);
        assert_eq!(ty, declared);

        let ty = resolver.override_type(&declared, Some("no override"), &empty);
        assert_eq!(ty, declared);
    }

    #[test]
    fn test_override_type_from_replace_map() {
        let model = model();
        let registry = spring();
        let resolver = TypeResolver::new(&model, &registry);
        let replace = BTreeMap::from([("com.example.BaseEntity".to_string(), "com.example.User".to_string())]);

        let ty = resolver.override_type(&TypeRef::new("com.example.BaseEntity"), None, &replace);
        assert_eq!(ty.name, "com.example.User");
    }

    #[test]
    fn test_cyclic_superclass_chain_terminates() {
        let model = SourceModel::new(vec![
            ClassModel::new("a.A").extends("a.B"),
            ClassModel::new("a.B").extends("a.A"),
        ]);
        let registry = spring();
        let resolver = TypeResolver::new(&model, &registry);
        let class = model.class_by_name("a.A").unwrap();

        assert_eq!(resolver.superclass_chain(class, TypeMap::new()).len(), 2);
    }
}
