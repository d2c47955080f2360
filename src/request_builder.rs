//! Request examples: parameter forests, headers, content type and a `curl`
//! call string for one endpoint.

use crate::classifier::{ClassifiedMethod, ClassifiedParam};
use crate::config::{ApiConfig, ApiReqParam, ParamIn};
use crate::error::Result;
use crate::framework::{path_placeholders, simplify_url, RequestMapping};
use crate::mock::{parse_literal, value_to_string, MockSynthesizer, RecursionContext};
use crate::params::{renumber, ApiParam, ParamTreeBuilder};
use crate::schema_generator::{ParameterSchema, Schema, SchemaGenerator};
use crate::taxonomy::BindingKind;
use crate::type_resolver::{TypeKind, TypeResolver};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Text,
    File,
}

/// One multipart form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: FormKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Array of files
    #[serde(default)]
    pub has_items: bool,
}

/// A concrete call against the endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRequestExample {
    /// Executable `curl` command
    pub call_example: String,
    /// URL with placeholders substituted and the query string appended
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub form_data: Vec<FormData>,
}

/// Everything the request side of an endpoint document needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestDoc {
    pub content_type: String,
    pub path_params: Vec<ApiParam>,
    pub query_params: Vec<ApiParam>,
    /// Body fields, or form/file fields
    pub request_params: Vec<ApiParam>,
    pub request_headers: Vec<ApiReqParam>,
    pub example: ApiRequestExample,
    pub parameter_schemas: Vec<ParameterSchema>,
    pub request_schema: Option<Schema>,
}

/// Flatten a synthesized value into form/query pairs: `addr.city`, `tags[0]`
pub fn flatten_value(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_value(&key, item, out);
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                flatten_value(&format!("{}[{}]", prefix, idx), item, out);
            }
        }
        other => out.push((prefix.to_string(), value_to_string(other))),
    }
}

/// `k=v&k2=v2` with percent-encoded values
pub fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\\''"))
}

/// Render a `curl` command line
pub fn to_curl(
    verb: &str,
    headers: &[ApiReqParam],
    url: &str,
    json_body: Option<&str>,
    form_data: &[FormData],
) -> String {
    let mut parts = vec!["curl".to_string(), "-X".to_string(), verb.to_string()];
    if json_body.is_some() {
        parts.push("-H".to_string());
        parts.push(shell_quote(&format!("Content-Type: {}", JSON_CONTENT_TYPE)));
    }
    for header in headers {
        parts.push("-H".to_string());
        parts.push(shell_quote(&format!("{}: {}", header.name, header.value)));
    }
    parts.push("-i".to_string());
    parts.push(shell_quote(url));
    if let Some(body) = json_body {
        parts.push("--data".to_string());
        parts.push(shell_quote(body));
    }
    for form in form_data {
        let field = match form.kind {
            FormKind::File => format!("{}=@{}", form.key, form.value),
            FormKind::Text => format!("{}={}", form.key, form.value),
        };
        parts.push("-F".to_string());
        parts.push(shell_quote(&field));
    }
    parts.join(" ")
}

pub struct RequestExampleBuilder<'a> {
    resolver: &'a TypeResolver<'a>,
    synthesizer: MockSynthesizer<'a>,
    trees: ParamTreeBuilder<'a>,
    config: &'a ApiConfig,
}

impl<'a> RequestExampleBuilder<'a> {
    pub fn new(resolver: &'a TypeResolver<'a>, config: &'a ApiConfig) -> Self {
        Self {
            resolver,
            synthesizer: MockSynthesizer::new(resolver),
            trees: ParamTreeBuilder::new(resolver, config.recursion_limit),
            config,
        }
    }

    /// Mock value of a classified parameter: its literal override, or a
    /// freshly synthesized value
    pub fn mock_value(&self, param: &ClassifiedParam) -> Value {
        if let Some(literal) = &param.mock_override {
            let primitive = match self.resolver.classify(&param.ty) {
                TypeKind::Primitive(p) => Some(p),
                _ => None,
            };
            return parse_literal(literal, primitive);
        }
        let mut ctx = RecursionContext::new(self.config.recursion_limit);
        self.synthesizer
            .synthesize(&param.ty, &param.source_name, &param.groups, &mut ctx)
    }

    fn is_composite(&self, param: &ClassifiedParam) -> bool {
        match self.resolver.classify(&param.ty) {
            TypeKind::Object | TypeKind::Map(_, _) => true,
            TypeKind::Collection(element) | TypeKind::Array(element) => {
                matches!(self.resolver.classify(&element), TypeKind::Object | TypeKind::Map(_, _))
            }
            _ => false,
        }
    }

    /// A documented scalar parameter carrying the example value
    fn scalar_param(&self, param: &ClassifiedParam, value: &str) -> ApiParam {
        let mut doc = self.trees.param(&param.name, &param.ty, param.binding, &param.groups);
        doc.value = value.to_string();
        doc.required = param.required;
        doc.desc = param.description.clone();
        doc.config_param = param.config_param;
        doc
    }

    /// Build the request side of an endpoint.
    ///
    /// Path parameters without a placeholder in the URL template are dropped.
    pub fn build(
        &self,
        mapping: &RequestMapping,
        classified: &ClassifiedMethod,
        schemas: &mut SchemaGenerator<'_>,
    ) -> Result<RequestDoc> {
        let placeholders = path_placeholders(&mapping.short_url);
        let mut doc = RequestDoc::default();
        let mut path_values: Vec<(String, String)> = Vec::new();
        let mut query_pairs: Vec<(String, String)> = Vec::new();
        let mut form_data: Vec<FormData> = Vec::new();
        let mut form_schema: IndexMap<String, Schema> = IndexMap::new();
        let mut json_body: Option<String> = None;
        let has_body = classified.body().is_some();

        for param in &classified.params {
            let value = self.mock_value(param);
            // form fields travel in the query string next to a JSON body
            let binding = match param.binding {
                BindingKind::Form if has_body => BindingKind::Query,
                other => other,
            };
            match binding {
                BindingKind::Path => {
                    if !placeholders.contains(&param.name) {
                        debug!("Dropping path parameter {}: no placeholder in {}", param.name, mapping.short_url);
                        continue;
                    }
                    let text = value_to_string(&value);
                    let api_param = self.scalar_param(param, &text);
                    doc.parameter_schemas.push(schemas.generate_parameter_schema(&api_param, &param.ty));
                    doc.path_params.push(api_param);
                    path_values.push((param.name.clone(), text));
                }
                BindingKind::Query if self.is_composite(param) => {
                    doc.query_params
                        .extend(self.trees.tree_for(&param.name, &param.ty, BindingKind::Query, &param.groups));
                    flatten_value("", &value, &mut query_pairs);
                }
                BindingKind::Query => {
                    let text = value_to_string(&value);
                    let mut api_param = self.scalar_param(param, &text);
                    api_param.binding = BindingKind::Query;
                    doc.parameter_schemas.push(schemas.generate_parameter_schema(&api_param, &param.ty));
                    doc.query_params.push(api_param);
                    if !text.is_empty() || param.config_param {
                        query_pairs.push((param.name.clone(), text));
                    }
                }
                BindingKind::Header => {
                    let text = value_to_string(&value);
                    let api_param = self.scalar_param(param, &text);
                    doc.parameter_schemas.push(schemas.generate_parameter_schema(&api_param, &param.ty));
                    doc.request_headers.retain(|h| !h.name.eq_ignore_ascii_case(&param.name));
                    doc.request_headers.push(ApiReqParam {
                        name: param.name.clone(),
                        param_in: ParamIn::Header,
                        type_label: api_param.type_label,
                        value: text,
                        required: param.required,
                        desc: param.description.clone(),
                        path_patterns: None,
                        exclude_path_patterns: None,
                    });
                }
                BindingKind::Body => {
                    doc.request_params
                        .extend(self.trees.tree_for(&param.name, &param.ty, BindingKind::Body, &param.groups));
                    doc.request_schema = Some(schemas.generate_schema(&param.ty));
                    json_body = Some(match (&param.mock_override, &value) {
                        (Some(literal), Value::String(_)) => literal.clone(),
                        _ => serde_json::to_string_pretty(&value)?,
                    });
                }
                BindingKind::File if has_body => {
                    debug!("File parameter {} cannot travel next to a JSON body; documented only", param.name);
                    let mut api_param = self.scalar_param(param, "");
                    api_param.type_label = "file".to_string();
                    doc.request_params.push(api_param);
                }
                BindingKind::File => {
                    let mut api_param = self.scalar_param(param, "");
                    api_param.type_label = "file".to_string();
                    form_data.push(FormData {
                        key: param.name.clone(),
                        kind: FormKind::File,
                        value: String::new(),
                        description: param.description.clone(),
                        has_items: api_param.has_items,
                    });
                    form_schema.insert(param.name.clone(), schemas.generate_schema(&param.ty));
                    doc.request_params.push(api_param);
                }
                BindingKind::Form => {
                    let mut pairs = Vec::new();
                    if self.is_composite(param) {
                        doc.request_params
                            .extend(self.trees.tree_for(&param.name, &param.ty, BindingKind::Form, &param.groups));
                        flatten_value("", &value, &mut pairs);
                    } else {
                        let text = value_to_string(&value);
                        doc.request_params.push(self.scalar_param(param, &text));
                        pairs.push((param.name.clone(), text));
                    }
                    form_schema.insert(param.name.clone(), schemas.generate_schema(&param.ty));
                    form_data.extend(pairs.into_iter().map(|(key, value)| FormData {
                        key,
                        kind: FormKind::Text,
                        value,
                        description: param.description.clone(),
                        has_items: false,
                    }));
                }
            }
        }

        for global in self.config.global_params(ParamIn::Header, &mapping.short_url) {
            if doc.request_headers.iter().all(|h| !h.name.eq_ignore_ascii_case(&global.name)) {
                doc.request_headers.push(global.clone());
            }
        }

        doc.content_type = if json_body.is_some() {
            JSON_CONTENT_TYPE
        } else if !form_data.is_empty() {
            MULTIPART_CONTENT_TYPE
        } else {
            DEFAULT_CONTENT_TYPE
        }
        .to_string();
        if doc.request_schema.is_none() && !form_schema.is_empty() {
            doc.request_schema = Some(Schema {
                schema_type: Some("object".to_string()),
                properties: Some(form_schema),
                ..Schema::default()
            });
        }

        let mut url = mapping.url.clone();
        for (name, value) in &path_values {
            url = url.replace(&format!("{{{}}}", name), &urlencoding::encode(value));
        }
        let mut url = simplify_url(&url);
        if !query_pairs.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&encode_query(&query_pairs));
        }

        renumber(&mut doc.path_params);
        renumber(&mut doc.query_params);
        renumber(&mut doc.request_params);

        doc.example = ApiRequestExample {
            call_example: to_curl(
                mapping.verb.as_str(),
                &doc.request_headers,
                &url,
                json_body.as_deref(),
                &form_data,
            ),
            url,
            json_body,
            form_data,
        };
        Ok(doc)
    }
}
