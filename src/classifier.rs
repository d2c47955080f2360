//! Parameter classification: binding kind, wire name, required/default
//! semantics and skip rules for every parameter of an endpoint method.

use crate::config::{ApiConfig, ParamIn};
use crate::entry_point::DocMethod;
use crate::error::{Diagnostic, FatalError};
use crate::framework::{path_placeholders, RequestMapping};
use crate::source::{Documented, ParamModel};
use crate::taxonomy::{AnnotationRegistry, BindingKind, UnannotatedBinding};
use crate::type_resolver::{annotation_groups, TypeKind, TypeRef, TypeResolver};
use convert_case::{Case, Casing};
use log::debug;

/// A parameter after classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedParam {
    /// Wire name
    pub name: String,
    /// Name as declared in source
    pub source_name: String,
    pub ty: TypeRef,
    pub binding: BindingKind,
    pub required: bool,
    pub default_value: Option<String>,
    /// Literal value from `@mock`, a default value or a mapping condition
    pub mock_override: Option<String>,
    pub description: String,
    /// Active validation groups for field expansion
    pub groups: Vec<String>,
    pub config_param: bool,
}

/// Classification result for one method
#[derive(Debug, Clone, Default)]
pub struct ClassifiedMethod {
    pub params: Vec<ClassifiedParam>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ClassifiedMethod {
    pub fn by_binding(&self, binding: BindingKind) -> impl Iterator<Item = &ClassifiedParam> {
        self.params.iter().filter(move |p| p.binding == binding)
    }

    pub fn body(&self) -> Option<&ClassifiedParam> {
        self.by_binding(BindingKind::Body).next()
    }
}

/// Parsed `@param` tag of one parameter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ParamDoc {
    raw: String,
    description: String,
    mock: Option<String>,
    ignore: bool,
}

fn param_doc(method: &DocMethod<'_>, name: &str) -> Option<ParamDoc> {
    method.method.tag_values("param").into_iter().find_map(|value| {
        let (tag_name, rest) = value.split_once(char::is_whitespace).unwrap_or((value, ""));
        if tag_name != name {
            return None;
        }
        let rest = rest.trim();
        let before_override = rest.split('|').next().unwrap_or(rest);
        let (description, mock) = match before_override.split_once("@mock") {
            Some((desc, mock)) => (desc.trim(), Some(mock.trim().to_string())),
            None => (before_override.trim(), None),
        };
        Some(ParamDoc {
            raw: rest.to_string(),
            description: description.to_string(),
            mock: mock.filter(|m| !m.is_empty()),
            ignore: description.split_whitespace().any(|w| w == "ignore"),
        })
    })
}

pub struct ParamClassifier<'a> {
    resolver: &'a TypeResolver<'a>,
    config: &'a ApiConfig,
}

impl<'a> ParamClassifier<'a> {
    pub fn new(resolver: &'a TypeResolver<'a>, config: &'a ApiConfig) -> Self {
        Self { resolver, config }
    }

    fn registry(&self) -> &'a AnnotationRegistry {
        self.resolver.registry()
    }

    /// Classify every parameter of `method` against its resolved mapping.
    ///
    /// `class_name` is the entry class the method is documented under.
    pub fn classify(
        &self,
        class_name: &str,
        method: &DocMethod<'_>,
        mapping: &RequestMapping,
    ) -> Result<ClassifiedMethod, FatalError> {
        let method_name = method.method.name.as_str();
        let placeholders = path_placeholders(&mapping.short_url);
        let ignored_names: Vec<&str> = method
            .method
            .tag_values("ignoreParams")
            .into_iter()
            .flat_map(str::split_whitespace)
            .collect();

        let mut result = ClassifiedMethod::default();
        let mut body_name: Option<String> = None;

        for param in &method.method.params {
            let doc = param_doc(method, &param.name);
            let declared = TypeRef::parse(&param.type_name).substitute(&method.actual_types);
            let ty = self.resolver.override_type(
                &declared,
                doc.as_ref().map(|d| d.raw.as_str()),
                &self.config.replace_class_map,
            );

            if self.is_skipped(param, &ty, &ignored_names, doc.as_ref()) {
                debug!("Skipping parameter {} of {}", param.name, method_name);
                continue;
            }

            if self.config.strict && doc.is_none() && self.resolver.is_simple(&ty) {
                return Err(FatalError::MissingParamTag {
                    param: param.name.clone(),
                    method: method_name.to_string(),
                    class: class_name.to_string(),
                });
            }

            let mut classified = self.bind(param, ty, mapping, &placeholders);
            if let Some(doc) = &doc {
                classified.description = doc.description.clone();
                if doc.mock.is_some() {
                    classified.mock_override = doc.mock.clone();
                }
            }

            if classified.binding == BindingKind::Body {
                if let Some(first) = &body_name {
                    return Err(FatalError::MultipleBodyParams {
                        method: method_name.to_string(),
                        class: class_name.to_string(),
                        first: first.clone(),
                        second: classified.source_name.clone(),
                    });
                }
                body_name = Some(classified.source_name.clone());
                if let Some(advice) = &self.config.request_body_advice {
                    if !method.method.has_tag("ignoreRequestBodyAdvice") {
                        classified.ty = TypeRef::generic(advice.as_str(), vec![classified.ty]);
                    }
                }
            }

            if !self.check_collection_binding(&classified, class_name, method_name, &mut result.diagnostics)? {
                continue;
            }

            if let TypeKind::Map(_, _) = self.resolver.classify(&classified.ty) {
                result.diagnostics.push(Diagnostic::warn(
                    class_name,
                    Some(method_name),
                    format!(
                        "parameter \"{}\" is a map; prefer a typed object so the documentation can describe it",
                        classified.source_name
                    ),
                ));
            }

            if self.config.request_field_to_underline
                && matches!(classified.binding, BindingKind::Query | BindingKind::Form)
            {
                classified.name = classified.name.to_case(Case::Snake);
            }

            result.params.push(classified);
        }

        self.apply_conditions(mapping, &mut result);
        self.merge_config_params(mapping, &mut result);
        Ok(result)
    }

    fn is_skipped(&self, param: &ParamModel, ty: &TypeRef, ignored_names: &[&str], doc: Option<&ParamDoc>) -> bool {
        let registry = self.registry();
        ignored_names.contains(&param.name.as_str())
            || doc.is_some_and(|d| d.ignore)
            || param.annotations.iter().any(|a| registry.is_ignore(&a.name))
            || registry.is_ignore_type(&ty.name)
            || self.config.is_ignored_param_type(&ty.name)
    }

    /// Binding kind, wire name, required flag and default value
    fn bind(&self, param: &ParamModel, ty: TypeRef, mapping: &RequestMapping, placeholders: &[String]) -> ClassifiedParam {
        let registry = self.registry();
        let mut classified = ClassifiedParam {
            name: param.name.clone(),
            source_name: param.name.clone(),
            ty,
            binding: BindingKind::Query,
            required: false,
            default_value: None,
            mock_override: None,
            description: String::new(),
            groups: Vec::new(),
            config_param: false,
        };

        let binding = param
            .annotations
            .iter()
            .find_map(|a| registry.binding(&a.name).map(|b| (a, b)));

        let kind = self.resolver.classify(&classified.ty);
        let is_file = kind == TypeKind::File
            || matches!(&kind, TypeKind::Collection(e) | TypeKind::Array(e) if self.resolver.classify(e) == TypeKind::File);

        match binding {
            Some((annotation, def)) => {
                classified.binding = def.kind;
                if let Some(name) = def
                    .name_props
                    .iter()
                    .find_map(|prop| annotation.first_string(prop))
                    .filter(|n| !n.is_empty())
                {
                    classified.name = name;
                }
                classified.required = match &def.required_prop {
                    Some(prop) => annotation.bool_value(prop).unwrap_or(true),
                    None => def.kind == BindingKind::Path,
                };
                classified.default_value = def
                    .default_value_prop
                    .as_ref()
                    .and_then(|prop| annotation.first_string(prop))
                    .filter(|v| !v.is_empty());
                if def.kind == BindingKind::Form && is_file {
                    classified.binding = BindingKind::File;
                }
            }
            None if is_file => {
                classified.binding = BindingKind::File;
            }
            None if placeholders.contains(&param.name) => {
                classified.binding = BindingKind::Path;
                classified.required = true;
            }
            None => {
                classified.binding = match registry.unannotated() {
                    UnannotatedBinding::QueryOrForm if mapping.verb.has_body() => BindingKind::Form,
                    UnannotatedBinding::QueryOrForm => BindingKind::Query,
                    UnannotatedBinding::Body if self.is_composite(&kind) => BindingKind::Body,
                    UnannotatedBinding::Body => BindingKind::Query,
                };
            }
        }

        if classified.default_value.is_none() {
            classified.default_value = param
                .annotations
                .iter()
                .find(|a| registry.is_default_value(&a.name))
                .and_then(|a| a.first_string("value"));
        }
        if classified.default_value.is_some() {
            classified.mock_override = classified.default_value.clone();
        }

        for annotation in &param.annotations {
            if registry.is_validation(&annotation.name) {
                classified.required = true;
            }
            if registry.is_group(&annotation.name) {
                classified.groups.extend(annotation_groups(annotation, "value"));
            }
        }
        classified
    }

    fn is_composite(&self, kind: &TypeKind) -> bool {
        match kind {
            TypeKind::Object | TypeKind::Map(_, _) => true,
            TypeKind::Collection(element) | TypeKind::Array(element) => !self.resolver.is_simple(element),
            _ => false,
        }
    }

    /// Non-body bindings cannot carry collections of composites. Returns
    /// `Ok(false)` when the parameter is dropped.
    fn check_collection_binding(
        &self,
        param: &ClassifiedParam,
        class_name: &str,
        method_name: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<bool, FatalError> {
        if matches!(param.binding, BindingKind::Body | BindingKind::File) {
            return Ok(true);
        }
        let element = match self.resolver.classify(&param.ty) {
            TypeKind::Collection(element) | TypeKind::Array(element) => element,
            _ => return Ok(true),
        };
        if self.resolver.is_simple(&element) {
            return Ok(true);
        }
        if self.config.strict {
            return Err(FatalError::UnsupportedCollectionBinding {
                param: param.source_name.clone(),
                method: method_name.to_string(),
                class: class_name.to_string(),
            });
        }
        diagnostics.push(Diagnostic::warn(
            class_name,
            Some(method_name),
            format!(
                "can't bind collection of {} to {} parameter \"{}\"; parameter dropped",
                element,
                param.binding.as_str(),
                param.source_name
            ),
        ));
        Ok(false)
    }

    /// Mapping `params` conditions become required query parameters; an
    /// existing parameter with the same name takes the condition's value.
    fn apply_conditions(&self, mapping: &RequestMapping, result: &mut ClassifiedMethod) {
        for condition in &mapping.params {
            let condition = condition.trim();
            if condition.starts_with('!') || condition.contains("!=") || condition.is_empty() {
                continue;
            }
            let (name, value) = match condition.split_once('=') {
                Some((name, value)) => (name.trim(), Some(value.trim().to_string())),
                None => (condition, None),
            };
            if let Some(existing) = result.params.iter_mut().find(|p| p.name == name) {
                existing.required = true;
                if value.is_some() {
                    existing.mock_override = value;
                }
                continue;
            }
            let is_int = value.as_deref().is_some_and(|v| v.parse::<u64>().is_ok());
            result.params.push(ClassifiedParam {
                name: name.to_string(),
                source_name: name.to_string(),
                ty: TypeRef::new(if is_int { "int" } else { "java.lang.String" }),
                binding: BindingKind::Query,
                required: true,
                default_value: None,
                mock_override: Some(value.unwrap_or_default()),
                description: "parameter condition".to_string(),
                groups: Vec::new(),
                config_param: false,
            });
        }
        for condition in &mapping.headers {
            let Some((name, value)) = condition.split_once('=') else {
                continue;
            };
            if name.trim().ends_with('!') {
                continue;
            }
            if let Some(existing) = result
                .params
                .iter_mut()
                .find(|p| p.binding == BindingKind::Header && p.name.eq_ignore_ascii_case(name.trim()))
            {
                existing.required = true;
                existing.mock_override = Some(value.trim().to_string());
                continue;
            }
            result.params.push(ClassifiedParam {
                name: name.trim().to_string(),
                source_name: name.trim().to_string(),
                ty: TypeRef::new("java.lang.String"),
                binding: BindingKind::Header,
                required: true,
                default_value: None,
                mock_override: Some(value.trim().to_string()),
                description: "header condition".to_string(),
                groups: Vec::new(),
                config_param: false,
            });
        }
    }

    /// Globally configured query and path parameters. A configured parameter
    /// replaces a method parameter of the same name.
    fn merge_config_params(&self, mapping: &RequestMapping, result: &mut ClassifiedMethod) {
        for (param_in, binding) in [(ParamIn::Query, BindingKind::Query), (ParamIn::Path, BindingKind::Path)] {
            for global in self.config.global_params(param_in, &mapping.short_url) {
                result.params.retain(|p| p.name != global.name);
                let type_name = match global.type_label.as_str() {
                    "int" | "int32" | "integer" => "int",
                    "long" | "int64" => "long",
                    "boolean" => "boolean",
                    _ => "java.lang.String",
                };
                result.params.push(ClassifiedParam {
                    name: global.name.clone(),
                    source_name: global.name.clone(),
                    ty: TypeRef::new(type_name),
                    binding,
                    required: global.required,
                    default_value: None,
                    mock_override: Some(global.value.clone()),
                    description: global.desc.clone(),
                    groups: Vec::new(),
                    config_param: true,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiReqParam;
    use crate::framework::HttpMethod;
    use crate::source::{AnnotationModel, ClassModel, FieldModel, MethodModel, SourceModel};
    use crate::taxonomy::AnnotationTaxonomy;
    use crate::type_resolver::TypeMap;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::borrow::Cow;

    fn model() -> SourceModel {
        SourceModel::new(vec![
            ClassModel::new("com.example.User").field(FieldModel::new("name", "String")),
            ClassModel::new("com.example.UserController"),
        ])
    }

    fn mapping(verb: HttpMethod, url: &str) -> RequestMapping {
        RequestMapping {
            verb,
            url: url.to_string(),
            short_url: url.to_string(),
            deprecated: false,
            params: Vec::new(),
            headers: Vec::new(),
        }
    }

    fn classify_with(
        taxonomy: AnnotationTaxonomy,
        config: &ApiConfig,
        method: &MethodModel,
        mapping: &RequestMapping,
    ) -> Result<ClassifiedMethod, FatalError> {
        let model = model();
        let registry = AnnotationRegistry::new(taxonomy);
        let resolver = TypeResolver::new(&model, &registry);
        let class = model.class_by_name("UserController").unwrap();
        let doc_method = DocMethod {
            method: Cow::Borrowed(method),
            declaring_class: class,
            actual_types: TypeMap::new(),
        };
        ParamClassifier::new(&resolver, config).classify("com.example.UserController", &doc_method, mapping)
    }

    fn classify(method: &MethodModel, mapping: &RequestMapping) -> Result<ClassifiedMethod, FatalError> {
        classify_with(AnnotationTaxonomy::spring(), &ApiConfig::default(), method, mapping)
    }

    fn summary(result: &ClassifiedMethod) -> Vec<(&str, BindingKind, bool)> {
        result
            .params
            .iter()
            .map(|p| (p.name.as_str(), p.binding, p.required))
            .collect()
    }

    #[test]
    fn test_annotated_bindings() {
        let method = MethodModel::new("update")
            .param(ParamModel::new("id", "long").annotated(AnnotationModel::new("PathVariable").with("value", json!("userId"))))
            .param(
                ParamModel::new("verbose", "boolean").annotated(
                    AnnotationModel::new("RequestParam")
                        .with("required", json!(false))
                        .with("defaultValue", json!("true")),
                ),
            )
            .param(ParamModel::new("user", "com.example.User").annotated(AnnotationModel::new("RequestBody")))
            .param(ParamModel::new("trace", "String").annotated(AnnotationModel::new("RequestHeader").with("value", json!("X-Trace"))));

        let result = classify(&method, &mapping(HttpMethod::Put, "/users/{userId}")).unwrap();
        assert_eq!(
            summary(&result),
            vec![
                ("userId", BindingKind::Path, true),
                ("verbose", BindingKind::Query, false),
                ("user", BindingKind::Body, true),
                ("X-Trace", BindingKind::Header, true),
            ]
        );
        assert_eq!(result.params[1].mock_override.as_deref(), Some("true"));
        assert_eq!(result.body().map(|b| b.ty.name.as_str()), Some("com.example.User"));
    }

    #[test]
    fn test_validation_forces_required() {
        let method = MethodModel::new("find").param(
            ParamModel::new("q", "String")
                .annotated(AnnotationModel::new("RequestParam").with("required", json!(false)))
                .annotated(AnnotationModel::new("NotBlank")),
        );
        let result = classify(&method, &mapping(HttpMethod::Get, "/find")).unwrap();
        assert!(result.params[0].required);
    }

    #[test]
    fn test_unannotated_params() {
        let method = MethodModel::new("get")
            .param(ParamModel::new("id", "String"))
            .param(ParamModel::new("page", "int"));

        let result = classify(&method, &mapping(HttpMethod::Get, "/users/{id}")).unwrap();
        assert_eq!(
            summary(&result),
            vec![("id", BindingKind::Path, true), ("page", BindingKind::Query, false)]
        );

        let result = classify(&method, &mapping(HttpMethod::Post, "/users")).unwrap();
        assert_eq!(result.params[0].binding, BindingKind::Form);
    }

    #[test]
    fn test_jaxrs_unannotated_composite_is_body() {
        let method = MethodModel::new("create")
            .param(ParamModel::new("user", "com.example.User"))
            .param(ParamModel::new("flag", "boolean"));
        let result = classify_with(
            AnnotationTaxonomy::jaxrs(),
            &ApiConfig::default(),
            &method,
            &mapping(HttpMethod::Post, "/users"),
        )
        .unwrap();
        assert_eq!(result.params[0].binding, BindingKind::Body);
        assert_eq!(result.params[1].binding, BindingKind::Query);
    }

    #[test]
    fn test_second_body_is_fatal() {
        let method = MethodModel::new("create")
            .param(ParamModel::new("a", "com.example.User").annotated(AnnotationModel::new("RequestBody")))
            .param(ParamModel::new("b", "com.example.User").annotated(AnnotationModel::new("RequestBody")));

        let err = classify(&method, &mapping(HttpMethod::Post, "/users")).unwrap_err();
        assert_eq!(
            err,
            FatalError::MultipleBodyParams {
                method: "create".to_string(),
                class: "com.example.UserController".to_string(),
                first: "a".to_string(),
                second: "b".to_string(),
            }
        );
    }

    #[test]
    fn test_skip_rules() {
        let method = MethodModel::new("list")
            .param(ParamModel::new("request", "javax.servlet.http.HttpServletRequest"))
            .param(ParamModel::new("session", "String").annotated(AnnotationModel::new("SessionAttribute")))
            .param(ParamModel::new("internal", "String"))
            .param(ParamModel::new("hidden", "String"))
            .param(ParamModel::new("keep", "String"))
            .tagged("ignoreParams", "internal")
            .tagged("param", "hidden ignore");

        let result = classify(&method, &mapping(HttpMethod::Get, "/list")).unwrap();
        assert_eq!(summary(&result), vec![("keep", BindingKind::Query, false)]);
    }

    #[test]
    fn test_param_doc_description_mock_and_override() {
        let method = MethodModel::new("get")
            .param(ParamModel::new("id", "long"))
            .param(ParamModel::new("payload", "Object").annotated(AnnotationModel::new("RequestBody")))
            .tagged("param", "id the user id @mock 42")
            .tagged("param", "payload the body|com.example.User");

        let result = classify(&method, &mapping(HttpMethod::Post, "/users")).unwrap();
        assert_eq!(result.params[0].description, "the user id");
        assert_eq!(result.params[0].mock_override.as_deref(), Some("42"));
        assert_eq!(result.params[1].description, "the body");
        assert_eq!(result.params[1].ty.name, "com.example.User");
    }

    #[test]
    fn test_strict_mode_requires_param_tags_for_primitives() {
        let method = MethodModel::new("get").param(ParamModel::new("id", "long"));
        let config = ApiConfig {
            strict: true,
            ..ApiConfig::default()
        };
        let err = classify_with(AnnotationTaxonomy::spring(), &config, &method, &mapping(HttpMethod::Get, "/x")).unwrap_err();
        assert!(matches!(err, FatalError::MissingParamTag { .. }));
    }

    #[test]
    fn test_collection_of_composites_in_query() {
        let method = MethodModel::new("search").param(
            ParamModel::new("users", "java.util.List<com.example.User>").annotated(AnnotationModel::new("RequestParam")),
        );

        let result = classify(&method, &mapping(HttpMethod::Get, "/search")).unwrap();
        assert!(result.params.is_empty());
        assert_eq!(result.diagnostics.len(), 1);

        let config = ApiConfig {
            strict: true,
            ..ApiConfig::default()
        };
        let method = method.tagged("param", "users the users");
        let err = classify_with(AnnotationTaxonomy::spring(), &config, &method, &mapping(HttpMethod::Get, "/search")).unwrap_err();
        assert!(matches!(err, FatalError::UnsupportedCollectionBinding { .. }));
    }

    #[test]
    fn test_files_bind_as_file() {
        let method = MethodModel::new("upload")
            .param(ParamModel::new("file", "org.springframework.web.multipart.MultipartFile"))
            .param(
                ParamModel::new("files", "java.util.List<MultipartFile>")
                    .annotated(AnnotationModel::new("RequestPart").with("value", json!("attachments"))),
            );

        let result = classify(&method, &mapping(HttpMethod::Post, "/upload")).unwrap();
        assert_eq!(
            summary(&result),
            vec![("file", BindingKind::File, false), ("attachments", BindingKind::File, true)]
        );
    }

    #[test]
    fn test_mapping_conditions() {
        let method = MethodModel::new("search").param(ParamModel::new("type", "int"));
        let mut mapping = mapping(HttpMethod::Get, "/search");
        mapping.params = vec!["type=2".to_string(), "debug".to_string(), "!legacy".to_string()];
        mapping.headers = vec!["X-Version=2".to_string()];

        let result = classify(&method, &mapping).unwrap();
        assert_eq!(
            summary(&result),
            vec![
                ("type", BindingKind::Query, true),
                ("debug", BindingKind::Query, true),
                ("X-Version", BindingKind::Header, true),
            ]
        );
        assert_eq!(result.params[0].mock_override.as_deref(), Some("2"));
    }

    #[test]
    fn test_header_condition_merges_with_header_param() {
        let method = MethodModel::new("list")
            .param(ParamModel::new("version", "String").annotated(AnnotationModel::new("RequestHeader").with("value", json!("X-Version"))));
        let mut mapping = mapping(HttpMethod::Get, "/list");
        mapping.headers = vec!["X-Version=2".to_string()];

        let result = classify(&method, &mapping).unwrap();
        assert_eq!(summary(&result), vec![("X-Version", BindingKind::Header, true)]);
        assert_eq!(result.params[0].mock_override.as_deref(), Some("2"));
    }

    #[test]
    fn test_underline_and_config_params() {
        let method = MethodModel::new("list")
            .param(ParamModel::new("pageSize", "int"))
            .param(ParamModel::new("tenant", "String"));
        let config = ApiConfig {
            request_field_to_underline: true,
            request_params: vec![ApiReqParam {
                name: "tenant".to_string(),
                param_in: ParamIn::Query,
                value: "acme".to_string(),
                ..ApiReqParam::default()
            }],
            ..ApiConfig::default()
        };

        let result = classify_with(AnnotationTaxonomy::spring(), &config, &method, &mapping(HttpMethod::Get, "/list")).unwrap();
        let names: Vec<(&str, bool)> = result.params.iter().map(|p| (p.name.as_str(), p.config_param)).collect();
        assert_eq!(names, vec![("page_size", false), ("tenant", true)]);
        assert_eq!(result.params[1].mock_override.as_deref(), Some("acme"));
    }

    #[test]
    fn test_request_body_advice_wraps_body() {
        let method = MethodModel::new("create")
            .param(ParamModel::new("user", "com.example.User").annotated(AnnotationModel::new("RequestBody")));
        let config = ApiConfig {
            request_body_advice: Some("com.example.Request".to_string()),
            ..ApiConfig::default()
        };

        let result = classify_with(AnnotationTaxonomy::spring(), &config, &method, &mapping(HttpMethod::Post, "/u")).unwrap();
        assert_eq!(result.params[0].ty.to_string(), "com.example.Request<com.example.User>");

        let method = method.tagged("ignoreRequestBodyAdvice", "");
        let result = classify_with(AnnotationTaxonomy::spring(), &config, &method, &mapping(HttpMethod::Post, "/u")).unwrap();
        assert_eq!(result.params[0].ty.to_string(), "com.example.User");
    }

    #[test]
    fn test_validated_groups_are_collected() {
        let method = MethodModel::new("update").param(
            ParamModel::new("user", "com.example.User")
                .annotated(AnnotationModel::new("RequestBody"))
                .annotated(AnnotationModel::new("Validated").with("value", json!(["Update.class"]))),
        );
        let result = classify(&method, &mapping(HttpMethod::Put, "/u")).unwrap();
        assert_eq!(result.params[0].groups, vec!["Update"]);
    }
}
