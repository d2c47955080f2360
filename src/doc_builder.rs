//! Per-class document building and the parallel pipeline driver.
//!
//! Each entry class is documented independently on the rayon pool; the
//! results are then merged sequentially by [`DocAggregator`], so the output
//! does not depend on scheduling.

use crate::aggregator::DocAggregator;
use crate::classifier::ParamClassifier;
use crate::config::{ApiConfig, ApiReqParam, PackageFilters};
use crate::entry_point::{EntryClass, EntryPointResolver};
use crate::error::{Diagnostic, FatalError, Result};
use crate::framework::{FrameworkTemplate, HttpMethod};
use crate::params::{short_desc, ApiParam};
use crate::request_builder::{ApiRequestExample, RequestExampleBuilder};
use crate::response_builder::ResponseBuilder;
use crate::schema_generator::{ParameterSchema, Schema, SchemaGenerator};
use crate::source::{AnnotationModel, Documented, MethodModel, SourceModel};
use crate::type_resolver::TypeResolver;
use indexmap::IndexMap;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One documented endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMethodDoc {
    /// Run-wide id, assigned during the merge
    pub id: u32,
    pub name: String,
    pub desc: String,
    /// `@apiNote` text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
    /// Canonical name of the class the endpoint is documented under
    pub class_name: String,
    pub verb: HttpMethod,
    pub url: String,
    pub path: String,
    pub content_type: String,
    pub path_params: Vec<ApiParam>,
    pub query_params: Vec<ApiParam>,
    pub request_params: Vec<ApiParam>,
    pub request_headers: Vec<ApiReqParam>,
    pub request_example: ApiRequestExample,
    pub response_example: String,
    pub response_params: Vec<ApiParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter_schemas: Vec<ParameterSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_schema: Option<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Schema>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Position within its folder, from 1
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Endpoint returns a file download
    #[serde(default)]
    pub download: bool,
}

/// A folder of endpoints: one per documented class, plus tag folders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDoc {
    pub name: String,
    pub alias: String,
    /// Unset only for tag folders until the final sort
    pub order: Option<u32>,
    /// Whether `order` came from an explicit `@order` tag
    #[serde(default)]
    pub custom_order: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub methods: Vec<ApiMethodDoc>,
}

impl ApiDoc {
    /// A folder synthesized for `tag`, seeded with one endpoint
    pub fn tag_folder(tag: &str, source: &ApiDoc, method: ApiMethodDoc) -> Self {
        Self {
            name: tag.to_string(),
            alias: tag.to_string(),
            order: None,
            custom_order: false,
            tags: vec![tag.to_string()],
            author: None,
            package: source.package.clone(),
            desc: tag.to_string(),
            group: source.group.clone(),
            methods: vec![ApiMethodDoc { order: 1, ..method }],
        }
    }
}

/// Output of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocTree {
    pub docs: Vec<ApiDoc>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Schema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of documenting one class on a worker
#[derive(Debug, Clone)]
pub struct ClassDoc {
    pub doc: ApiDoc,
    pub schemas: IndexMap<String, Schema>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Drives the pipeline over a source model
pub struct DocBuilder<'a> {
    config: &'a ApiConfig,
    template: &'a dyn FrameworkTemplate,
    resolver: TypeResolver<'a>,
    filters: PackageFilters,
}

impl<'a> DocBuilder<'a> {
    /// Create a new DocBuilder.
    ///
    /// # Arguments
    /// * `model` - The source model to document
    /// * `template` - Framework rules (annotation taxonomy and hooks)
    /// * `config` - Run configuration
    ///
    /// # Returns
    /// * `Ok(DocBuilder)` - When the configured package filters compile
    /// * `Err(Error::InvalidConfig)` - Otherwise
    pub fn new(model: &'a SourceModel, template: &'a dyn FrameworkTemplate, config: &'a ApiConfig) -> Result<Self> {
        Ok(Self {
            config,
            template,
            resolver: TypeResolver::new(model, template.registry()),
            filters: config.package_filters()?,
        })
    }

    /// Document every entry class and merge the results.
    ///
    /// A fatal error on any class aborts the run; no partial tree is returned.
    pub fn build(&self) -> Result<DocTree> {
        let entry = EntryPointResolver::new(&self.resolver, self.template, &self.filters);
        let entries = entry.entry_points();
        info!("Documenting {} classes with the {} template", entries.len(), self.template.name());

        let class_docs = entries
            .par_iter()
            .map(|entry_class| self.build_class(&entry, entry_class))
            .collect::<Result<Vec<ClassDoc>>>()?;

        Ok(DocAggregator::new(self.config.sort_by_title).aggregate(class_docs))
    }

    /// Document a single entry class
    pub fn build_class(&self, entry: &EntryPointResolver<'a>, entry_class: &EntryClass<'a>) -> Result<ClassDoc> {
        let class = entry_class.class;
        debug!("Building documentation for {}", class.canonical());

        let annotations: Vec<AnnotationModel> = entry.class_annotations(class).into_iter().cloned().collect();
        let base_path = self.template.base_path(class, &annotations, self.resolver.model());

        let classifier = ParamClassifier::new(&self.resolver, self.config);
        let requests = RequestExampleBuilder::new(&self.resolver, self.config);
        let responses = ResponseBuilder::new(&self.resolver, self.config);
        let mut schemas = SchemaGenerator::new(&self.resolver);
        let mut diagnostics = Vec::new();
        let mut methods = Vec::new();

        let class_author = class.tag_value("author").map(str::to_string);
        let class_group = class.tag_value("group").map(str::to_string);

        for doc_method in entry.methods(class) {
            let method: &MethodModel = &doc_method.method;
            let Some(mapping) = self.template.request_mapping(&base_path, method, &self.config.server_url) else {
                continue;
            };
            let declaring = doc_method.declaring_class.canonical();

            let comment = method.comment().map(str::trim).unwrap_or_default();
            if comment.is_empty() {
                if self.config.strict {
                    return Err(FatalError::MissingMethodComment {
                        method: method.name.clone(),
                        class: declaring.to_string(),
                    }
                    .into());
                }
                debug!("{}.{} has no comment", declaring, method.name);
            }

            let classified = classifier.classify(declaring, &doc_method, &mapping)?;
            diagnostics.extend(classified.diagnostics.iter().cloned());
            let request = requests.build(&mapping, &classified, &mut schemas)?;
            let response = responses.build(&doc_method, &mut schemas)?;
            diagnostics.extend(response.diagnostics.iter().cloned());

            let author = if self.config.show_author {
                method
                    .tag_value("author")
                    .map(str::to_string)
                    .or_else(|| class_author.clone())
            } else {
                None
            };

            methods.push(ApiMethodDoc {
                id: 0,
                name: method.name.clone(),
                desc: short_desc(method.comment()),
                detail: method.tag_value("apiNote").unwrap_or_default().to_string(),
                class_name: class.canonical().to_string(),
                verb: mapping.verb,
                url: mapping.url.clone(),
                path: mapping.short_url.clone(),
                content_type: request.content_type,
                path_params: request.path_params,
                query_params: request.query_params,
                request_params: request.request_params,
                request_headers: request.request_headers,
                request_example: request.example,
                response_example: response.example,
                response_params: response.params,
                parameter_schemas: request.parameter_schemas,
                request_schema: request.request_schema,
                response_schema: response.schema,
                tags: method.tag_values("tag").into_iter().map(str::to_string).collect(),
                order: methods.len() as u32 + 1,
                author,
                deprecated: mapping.deprecated,
                group: method
                    .tag_value("group")
                    .map(str::to_string)
                    .or_else(|| class_group.clone()),
                download: method.has_tag("download"),
            });
        }

        Ok(ClassDoc {
            doc: ApiDoc {
                name: class.name.clone(),
                alias: class.name.clone(),
                order: Some(entry_class.order),
                custom_order: entry_class.custom_order,
                tags: class.tag_values("tag").into_iter().map(str::to_string).collect(),
                author: class_author.filter(|_| self.config.show_author),
                package: class.package.clone(),
                desc: short_desc(class.comment()),
                group: class_group,
                methods,
            },
            schemas: schemas.into_schemas(),
            diagnostics,
        })
    }
}
