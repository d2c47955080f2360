//! apidoc-synth - Static API documentation synthesis from an annotated source model.
//!
//! This library turns a structural model of annotated source classes into a
//! navigable tree of endpoint documents with ready-to-use request and response
//! examples. It never executes the documented code: every value is derived
//! from declared types, annotations and doc comments.
//!
//! # Supported Frameworks
//!
//! - **Spring MVC**: `@RestController` classes and `@*Mapping` methods
//! - **JAX-RS**: `@Path` resources, including annotated resource interfaces
//! - Custom annotation taxonomies loaded from configuration
//!
//! # Architecture
//!
//! 1. [`scanner`] - Finds serialized source-model files
//! 2. [`parser`] - Loads them into a [`source::SourceModel`]
//! 3. [`detector`] - Detects the framework from annotations
//! 4. [`entry_point`] - Selects documentable classes and methods
//! 5. [`type_resolver`] - Parses type descriptors and substitutes generics
//! 6. [`classifier`] - Assigns each parameter its HTTP binding
//! 7. [`mock`] and [`params`] - Example values and parameter trees
//! 8. [`request_builder`], [`response_builder`] and [`schema_generator`] - Per-endpoint examples and schemas
//! 9. [`doc_builder`] and [`aggregator`] - Per-class documents, merged and ordered
//! 10. [`serializer`] - Writes the tree as YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use apidoc_synth::{
//!     config::ApiConfig,
//!     doc_builder::DocBuilder,
//!     framework::{template_for, Framework},
//!     parser::ModelParser,
//!     scanner::FileScanner,
//!     serializer::serialize_yaml,
//! };
//! use std::path::PathBuf;
//!
//! let scan_result = FileScanner::new(PathBuf::from("./model")).scan().unwrap();
//! let parsed: Vec<_> = ModelParser::parse_files(&scan_result.model_files)
//!     .into_iter()
//!     .filter_map(Result::ok)
//!     .collect();
//! let model = ModelParser::merge(parsed);
//!
//! let config = ApiConfig::default();
//! let template = template_for(Framework::Spring, None);
//! let tree = DocBuilder::new(&model, template.as_ref(), &config)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! println!("{}", serialize_yaml(&tree).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod aggregator;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod detector;
pub mod doc_builder;
pub mod entry_point;
pub mod error;
pub mod framework;
pub mod mock;
pub mod params;
pub mod parser;
pub mod request_builder;
pub mod response_builder;
pub mod scanner;
pub mod schema_generator;
pub mod serializer;
pub mod source;
pub mod taxonomy;
pub mod type_resolver;

pub use config::ApiConfig;
pub use doc_builder::{ApiDoc, ApiMethodDoc, DocBuilder, DocTree};
pub use error::{Diagnostic, Error, FatalError, Result};
pub use source::SourceModel;
