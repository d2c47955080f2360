//! Response examples and schemas for an endpoint's return type.

use crate::config::ApiConfig;
use crate::entry_point::DocMethod;
use crate::error::{Diagnostic, Result};
use crate::mock::{MockSynthesizer, RecursionContext};
use crate::params::{ApiParam, ParamTreeBuilder};
use crate::schema_generator::{Schema, SchemaGenerator};
use crate::source::Documented;
use crate::taxonomy::BindingKind;
use crate::type_resolver::{TypeKind, TypeRef, TypeResolver};
use log::debug;
use serde_json::Value;

/// The response side of an endpoint document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseDoc {
    /// Pretty-printed example; empty for `void`
    pub example: String,
    pub params: Vec<ApiParam>,
    pub schema: Option<Schema>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Normalize an `@apiResponse` literal: line-break markup removed, JSON
/// re-indented when it parses.
pub fn literal_response(text: &str) -> String {
    let cleaned = text.replace("<br/>", "").replace("<br>", "");
    let cleaned = cleaned.trim();
    match serde_json::from_str::<Value>(cleaned) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| cleaned.to_string()),
        Err(_) => cleaned.to_string(),
    }
}

pub struct ResponseBuilder<'a> {
    resolver: &'a TypeResolver<'a>,
    synthesizer: MockSynthesizer<'a>,
    trees: ParamTreeBuilder<'a>,
    config: &'a ApiConfig,
}

impl<'a> ResponseBuilder<'a> {
    pub fn new(resolver: &'a TypeResolver<'a>, config: &'a ApiConfig) -> Self {
        Self {
            resolver,
            synthesizer: MockSynthesizer::new(resolver),
            trees: ParamTreeBuilder::new(resolver, config.recursion_limit),
            config,
        }
    }

    /// The documented return type: substituted, overridden through
    /// `@return desc|Type` and the replace map, then wrapped in the
    /// configured response advice.
    pub fn return_type(&self, method: &DocMethod<'_>) -> Option<TypeRef> {
        let declared = TypeRef::parse(&method.method.return_type).substitute(&method.actual_types);
        let ty = self.resolver.override_type(
            &declared,
            method.method.tag_value("return"),
            &self.config.replace_class_map,
        );
        let unwrapped = self.resolver.unwrap(&ty);
        if matches!(unwrapped.simple_name(), "void" | "Void") {
            return None;
        }
        match &self.config.response_body_advice {
            Some(advice)
                if !method.method.has_tag("ignoreResponseBodyAdvice") && unwrapped.name != *advice =>
            {
                Some(TypeRef::generic(advice.as_str(), vec![ty]))
            }
            _ => Some(ty),
        }
    }

    pub fn build(&self, method: &DocMethod<'_>, schemas: &mut SchemaGenerator<'_>) -> Result<ResponseDoc> {
        let Some(ty) = self.return_type(method) else {
            debug!("{} returns void", method.method.name);
            return Ok(ResponseDoc::default());
        };

        let mut diagnostics = Vec::new();
        if let TypeKind::Map(_, _) = self.resolver.classify(&ty) {
            diagnostics.push(Diagnostic::warn(
                method.declaring_class.canonical(),
                Some(method.method.name.as_str()),
                "response body is a map; prefer a typed object so the documentation can describe it",
            ));
        }

        let example = match method.method.tag_value("apiResponse") {
            Some(literal) => literal_response(literal),
            None => {
                let mut ctx = RecursionContext::new(self.config.recursion_limit);
                let value = self.synthesizer.synthesize(&ty, "", &[], &mut ctx);
                serde_json::to_string_pretty(&value)?
            }
        };

        Ok(ResponseDoc {
            example,
            params: self.trees.tree_for("response", &ty, BindingKind::Body, &[]),
            schema: Some(schemas.generate_schema(&ty)),
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ClassModel, FieldModel, MethodModel, SourceModel};
    use crate::taxonomy::{AnnotationRegistry, AnnotationTaxonomy};
    use crate::type_resolver::TypeMap;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::borrow::Cow;

    fn model() -> SourceModel {
        SourceModel::new(vec![
            ClassModel::new("com.example.User")
                .field(FieldModel::new("name", "String"))
                .field(FieldModel::new("age", "int")),
            ClassModel::new("com.example.Result")
                .type_params(&["T"])
                .field(FieldModel::new("code", "int").tagged("mock", "0"))
                .field(FieldModel::new("data", "T")),
            ClassModel::new("com.example.UserController"),
        ])
    }

    fn build_with(config: &ApiConfig, method: &MethodModel) -> ResponseDoc {
        let model = model();
        let registry = AnnotationRegistry::new(AnnotationTaxonomy::spring());
        let resolver = TypeResolver::new(&model, &registry);
        let mut schemas = SchemaGenerator::new(&resolver);
        let doc_method = DocMethod {
            method: Cow::Borrowed(method),
            declaring_class: model.class_by_name("UserController").unwrap(),
            actual_types: TypeMap::new(),
        };
        ResponseBuilder::new(&resolver, config)
            .build(&doc_method, &mut schemas)
            .unwrap()
    }

    fn build(method: &MethodModel) -> ResponseDoc {
        build_with(&ApiConfig::default(), method)
    }

    #[test]
    fn test_void_has_empty_example() {
        let doc = build(&MethodModel::new("delete"));
        assert_eq!(doc, ResponseDoc::default());

        let doc = build(&MethodModel::new("delete").returns("org.springframework.http.ResponseEntity<Void>"));
        assert_eq!(doc.example, "");
    }

    #[test]
    fn test_synthesized_response() {
        let doc = build(&MethodModel::new("get").returns("ResponseEntity<com.example.User>"));
        let value: Value = serde_json::from_str(&doc.example).unwrap();
        assert_eq!(value, json!({ "name": "John", "age": 18 }));
        assert_eq!(doc.params.len(), 2);
        assert_eq!(
            doc.schema.and_then(|s| s.reference).as_deref(),
            Some("#/components/schemas/User")
        );
    }

    #[test]
    fn test_literal_response_wins() {
        let method = MethodModel::new("get")
            .returns("com.example.User")
            .tagged("apiResponse", "{\"ok\":<br>true}");
        let doc = build(&method);
        assert_eq!(doc.example, "{\n  \"ok\": true\n}");
        assert_eq!(doc.params.len(), 2);

        assert_eq!(literal_response("plain <br>text"), "plain text");
    }

    #[test]
    fn test_response_body_advice() {
        let config = ApiConfig {
            response_body_advice: Some("com.example.Result".to_string()),
            ..ApiConfig::default()
        };
        let doc = build_with(&config, &MethodModel::new("get").returns("com.example.User"));
        let value: Value = serde_json::from_str(&doc.example).unwrap();
        assert_eq!(value, json!({ "code": 0, "data": { "name": "John", "age": 18 } }));

        let doc = build_with(
            &config,
            &MethodModel::new("get")
                .returns("com.example.User")
                .tagged("ignoreResponseBodyAdvice", ""),
        );
        let value: Value = serde_json::from_str(&doc.example).unwrap();
        assert_eq!(value, json!({ "name": "John", "age": 18 }));
    }

    #[test]
    fn test_map_response_is_opaque_and_diagnosed() {
        let doc = build(&MethodModel::new("stats").returns("java.util.Map<String, Integer>"));
        assert_eq!(doc.example, "{}");
        assert_eq!(doc.diagnostics.len(), 1);
        assert_eq!(doc.diagnostics[0].class, "com.example.UserController");
        assert_eq!(doc.diagnostics[0].method.as_deref(), Some("stats"));

        let doc = build(&MethodModel::new("get").returns("com.example.User"));
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn test_primitive_return() {
        let doc = build(&MethodModel::new("count").returns("long"));
        assert_eq!(doc.example, "0");
        assert_eq!(doc.params.len(), 1);
        assert_eq!(doc.params[0].field, "response");
    }
}
