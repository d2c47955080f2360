//! Deterministic mock value synthesis.
//!
//! [`MockSynthesizer::synthesize`] turns a resolved type into a representative
//! JSON value. Composite types are expanded field by field; the explicit
//! [`RecursionContext`] guarantees termination on self-referential and deeply
//! nested object graphs.

use crate::source::{Documented, FieldModel};
use crate::type_resolver::{field_in_groups, PrimitiveType, TypeKind, TypeRef, TypeResolver};
use log::debug;
use serde_json::{json, Map, Value};

/// Why a composite expansion was cut short
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// The type is already being expanded on the current path
    Cycle,
    /// The depth ceiling was reached
    TooDeep,
}

/// Per-call recursion state: the types being expanded on the current path
#[derive(Debug, Clone)]
pub struct RecursionContext {
    stack: Vec<String>,
    limit: usize,
}

impl RecursionContext {
    pub fn new(limit: usize) -> Self {
        Self {
            stack: Vec::new(),
            limit,
        }
    }

    /// Push a type onto the path, or report why it must not be expanded
    pub fn enter(&mut self, key: &str) -> std::result::Result<(), Terminal> {
        if self.stack.iter().any(|k| k == key) {
            return Err(Terminal::Cycle);
        }
        if self.stack.len() >= self.limit {
            return Err(Terminal::TooDeep);
        }
        self.stack.push(key.to_string());
        Ok(())
    }

    pub fn leave(&mut self) {
        self.stack.pop();
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Placeholder emitted instead of a composite value that was not expanded
pub fn terminal_placeholder(terminal: Terminal, ty: &TypeRef) -> Value {
    match terminal {
        Terminal::Cycle => json!({ "$ref": ty.simple_name() }),
        Terminal::TooDeep => json!({}),
    }
}

/// Parse a literal override for a type: numbers and booleans for scalar
/// types, JSON for anything that parses, plain text otherwise.
pub fn parse_literal(text: &str, primitive: Option<PrimitiveType>) -> Value {
    let text = text.trim();
    match primitive {
        Some(PrimitiveType::Boolean) => {
            if let Ok(b) = text.parse::<bool>() {
                return Value::Bool(b);
            }
        }
        Some(p) if p.is_numeric() => {
            if let Ok(n) = text.parse::<i64>() {
                return json!(n);
            }
            if let Ok(f) = text.parse::<f64>() {
                return json!(f);
            }
        }
        Some(_) => return Value::String(text.to_string()),
        None => {}
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Render a value the way it appears in a URL or form field
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(value_to_string).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// Heuristic value for a scalar, keyed on the field name
pub fn primitive_value(primitive: PrimitiveType, field_name: &str) -> Value {
    let name = field_name.to_ascii_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| name.contains(n));

    match primitive {
        PrimitiveType::String => {
            let text = if has(&["email", "mail"]) {
                "user@example.com"
            } else if has(&["phone", "mobile", "tel"]) {
                "555-0100"
            } else if has(&["avatar", "image", "icon", "photo"]) {
                "https://example.com/image.png"
            } else if has(&["url", "link", "website", "href"]) {
                "https://example.com"
            } else if name == "ip" || has(&["ipaddr", "clientip", "remoteip", "serverip"]) {
                "127.0.0.1"
            } else if has(&["uuid"]) {
                "3fa85f64-5717-4562-b3fc-2c963f66afa6"
            } else if has(&["password", "pwd", "secret"]) {
                "secret"
            } else if has(&["token"]) {
                "token-123"
            } else if has(&["address"]) {
                "1 Main Street"
            } else if has(&["city"]) {
                "Springfield"
            } else if has(&["country"]) {
                "US"
            } else if has(&["name"]) {
                "John"
            } else if has(&["title"]) {
                "Title"
            } else if has(&["desc", "remark", "comment", "note"]) {
                "description"
            } else if has(&["date", "time"]) {
                "2024-01-01 12:00:00"
            } else if name == "id" || name.ends_with("id") {
                "1"
            } else if has(&["code"]) {
                "A001"
            } else {
                "string"
            };
            Value::String(text.to_string())
        }
        PrimitiveType::Char => json!("a"),
        PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Int | PrimitiveType::Long | PrimitiveType::BigInteger => {
            let n: i64 = if has(&["timestamp"]) || (primitive == PrimitiveType::Long && has(&["time"])) {
                1_704_067_200_000
            } else if name == "id" || name.ends_with("id") {
                1
            } else if has(&["age"]) {
                18
            } else if has(&["pagesize", "size", "limit"]) {
                10
            } else if has(&["page", "current", "offset"]) {
                1
            } else if has(&["count", "total", "num", "amount", "quantity"]) {
                100
            } else if has(&["year"]) {
                2024
            } else if has(&["month", "day", "status", "type", "state", "level"]) {
                1
            } else {
                0
            };
            json!(n)
        }
        PrimitiveType::Float | PrimitiveType::Double | PrimitiveType::BigDecimal => {
            if has(&["price", "amount", "money", "fee", "cost", "balance"]) {
                json!(9.99)
            } else if has(&["rate", "ratio", "percent"]) {
                json!(0.5)
            } else {
                json!(1.0)
            }
        }
        PrimitiveType::Boolean => Value::Bool(true),
        PrimitiveType::Date => json!("2024-01-01"),
        PrimitiveType::DateTime => json!("2024-01-01 12:00:00"),
        PrimitiveType::Time => json!("12:00:00"),
        PrimitiveType::Uuid => json!("3fa85f64-5717-4562-b3fc-2c963f66afa6"),
    }
}

/// `@mock` literal on a field, if present
pub fn field_mock(field: &FieldModel) -> Option<&str> {
    field.tag_value("mock")
}

pub struct MockSynthesizer<'a> {
    resolver: &'a TypeResolver<'a>,
}

impl<'a> MockSynthesizer<'a> {
    pub fn new(resolver: &'a TypeResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Synthesize a value for `ty`. `field_name` feeds the scalar heuristics;
    /// `groups` restricts which composite fields are expanded.
    pub fn synthesize(&self, ty: &TypeRef, field_name: &str, groups: &[String], ctx: &mut RecursionContext) -> Value {
        match self.resolver.classify(ty) {
            TypeKind::Primitive(primitive) => primitive_value(primitive, field_name),
            TypeKind::Enum => self
                .resolver
                .enum_values(ty)
                .into_iter()
                .next()
                .unwrap_or(Value::String(String::new())),
            TypeKind::Collection(element) | TypeKind::Array(element) => {
                Value::Array(vec![self.synthesize(&element, field_name, groups, ctx)])
            }
            TypeKind::Map(_, value) if self.resolver.is_simple(&value) => json!({}),
            TypeKind::Map(_, value) => {
                let mut map = Map::new();
                map.insert("mapKey".to_string(), self.synthesize(&value, field_name, groups, ctx));
                Value::Object(map)
            }
            TypeKind::File => Value::String(String::new()),
            TypeKind::Object => self.synthesize_object(ty, groups, ctx),
            TypeKind::Unknown => json!({}),
        }
    }

    fn synthesize_object(&self, ty: &TypeRef, groups: &[String], ctx: &mut RecursionContext) -> Value {
        let ty = self.resolver.unwrap(ty);
        let key = ty.to_string();
        if let Err(terminal) = ctx.enter(&key) {
            debug!("Not expanding {} ({:?}) at depth {}", key, terminal, ctx.depth());
            return terminal_placeholder(terminal, &ty);
        }

        let mut object = Map::new();
        for field in self.resolver.fields_of(&ty) {
            if !field_in_groups(field.field, groups, self.resolver.registry()) {
                continue;
            }
            let value = match field_mock(field.field) {
                Some(literal) => {
                    let primitive = match self.resolver.classify(&field.ty) {
                        TypeKind::Primitive(p) => Some(p),
                        _ => None,
                    };
                    parse_literal(literal, primitive)
                }
                None => self.synthesize(&field.ty, &field.field.name, groups, ctx),
            };
            object.insert(field.name, value);
        }

        ctx.leave();
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{AnnotationModel, ClassKind, ClassModel, SourceModel};
    use crate::taxonomy::{AnnotationRegistry, AnnotationTaxonomy};
    use pretty_assertions::assert_eq;

    fn model() -> SourceModel {
        SourceModel::new(vec![
            ClassModel::new("com.example.User")
                .field(FieldModel::new("name", "String"))
                .field(FieldModel::new("age", "int"))
                .field(FieldModel::new("email", "String"))
                .field(FieldModel::new("status", "com.example.Status"))
                .field(FieldModel::new("nickname", "String").tagged("mock", "neo")),
            ClassModel::new("com.example.Status")
                .kind(ClassKind::Enum)
                .constant("ACTIVE", None)
                .constant("LOCKED", None),
            ClassModel::new("com.example.Node")
                .field(FieldModel::new("value", "int"))
                .field(FieldModel::new("next", "com.example.Node"))
                .field(FieldModel::new("children", "java.util.List<com.example.Node>")),
            ClassModel::new("com.example.Deep").field(FieldModel::new("inner", "com.example.Deep1")),
            ClassModel::new("com.example.Deep1").field(FieldModel::new("inner", "com.example.Deep2")),
            ClassModel::new("com.example.Deep2").field(FieldModel::new("inner", "com.example.Deep3")),
            ClassModel::new("com.example.Deep3").field(FieldModel::new("leaf", "String")),
            ClassModel::new("com.example.Form")
                .field(FieldModel::new("id", "long"))
                .field(
                    FieldModel::new("code", "String").annotated(
                        AnnotationModel::new("NotNull").with("groups", serde_json::json!("Update.class")),
                    ),
                ),
        ])
    }

    fn synth(descriptor: &str, limit: usize) -> Value {
        synth_groups(descriptor, limit, &[])
    }

    fn synth_groups(descriptor: &str, limit: usize, groups: &[String]) -> Value {
        let model = model();
        let registry = AnnotationRegistry::new(AnnotationTaxonomy::spring());
        let resolver = TypeResolver::new(&model, &registry);
        let synthesizer = MockSynthesizer::new(&resolver);
        let mut ctx = RecursionContext::new(limit);
        let value = synthesizer.synthesize(&TypeRef::parse(descriptor), "", groups, &mut ctx);
        assert_eq!(ctx.depth(), 0);
        value
    }

    #[test]
    fn test_composite_with_heuristics_enum_and_literal() {
        assert_eq!(
            synth("com.example.User", 7),
            json!({
                "name": "John",
                "age": 18,
                "email": "user@example.com",
                "status": "ACTIVE",
                "nickname": "neo"
            })
        );
    }

    #[test]
    fn test_collections_hold_one_element() {
        let value = synth("java.util.List<com.example.User>", 7);
        assert_eq!(value.as_array().map(Vec::len), Some(1));

        assert_eq!(synth("int[]", 7), json!([0]));
    }

    #[test]
    fn test_map_of_scalars_is_opaque() {
        assert_eq!(synth("java.util.Map<String, Integer>", 7), json!({}));
        assert_eq!(synth("java.util.Map<String, String>", 7), json!({}));
    }

    #[test]
    fn test_map_of_objects_uses_placeholder_key() {
        let value = synth("java.util.Map<String, com.example.User>", 7);
        let entry = value.get("mapKey").expect("placeholder key");
        assert!(entry.is_object());
    }

    #[test]
    fn test_self_reference_terminates_with_ref() {
        assert_eq!(
            synth("com.example.Node", 7),
            json!({
                "value": 0,
                "next": { "$ref": "Node" },
                "children": [{ "$ref": "Node" }]
            })
        );
    }

    #[test]
    fn test_depth_ceiling_yields_empty_object() {
        assert_eq!(
            synth("com.example.Deep", 2),
            json!({ "inner": { "inner": {} } })
        );
    }

    #[test]
    fn test_unknown_types_are_opaque() {
        assert_eq!(synth("com.other.Missing", 7), json!({}));
    }

    #[test]
    fn test_group_filtering() {
        assert_eq!(synth("com.example.Form", 7), json!({ "id": 1, "code": "A001" }));
        assert_eq!(synth_groups("com.example.Form", 7, &["Create".to_string()]), json!({ "id": 1 }));
        assert_eq!(
            synth_groups("com.example.Form", 7, &["Update".to_string()]),
            json!({ "id": 1, "code": "A001" })
        );
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(parse_literal("42", Some(PrimitiveType::Int)), json!(42));
        assert_eq!(parse_literal("false", Some(PrimitiveType::Boolean)), json!(false));
        assert_eq!(parse_literal("007", Some(PrimitiveType::String)), json!("007"));
        assert_eq!(parse_literal("{\"a\": 1}", None), json!({ "a": 1 }));
        assert_eq!(parse_literal("plain", None), json!("plain"));
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("x")), "x");
        assert_eq!(value_to_string(&json!(3)), "3");
        assert_eq!(value_to_string(&json!([1, 2])), "1,2");
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        assert_eq!(synth("com.example.User", 7), synth("com.example.User", 7));
    }
}
