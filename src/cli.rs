use crate::framework::Framework;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// API documentation synthesizer - Generate endpoint documents with request/response examples from a source model
#[derive(Parser, Debug)]
#[command(name = "apidoc-synth")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to a source-model file, or a directory of them
    #[arg(value_name = "MODEL_PATH")]
    pub model_path: PathBuf,

    /// Configuration file (YAML or JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Specify the web framework of the model (if not specified, auto-detect)
    #[arg(short = 'w', long = "framework", value_enum)]
    pub framework: Option<Framework>,

    /// Fail on missing comments, missing @param tags and unsupported collection bindings
    #[arg(long = "strict")]
    pub strict: bool,

    /// Sort folders by name instead of by order
    #[arg(long = "sort-by-title")]
    pub sort_by_title: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.model_path.exists() {
        anyhow::bail!("Model path does not exist: {}", args.model_path.display());
    }

    if let Some(ref config) = args.config_path {
        if !config.is_file() {
            anyhow::bail!("Configuration file does not exist: {}", config.display());
        }
        info!("Configuration: {}", config.display());
    }

    info!("Model path: {}", args.model_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if let Some(ref framework) = args.framework {
        info!("Framework: {:?}", framework);
    } else {
        info!("Framework: auto-detect");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::config::ApiConfig;
    use crate::detector::FrameworkDetector;
    use crate::doc_builder::DocBuilder;
    use crate::framework::template_for;
    use crate::parser::{ModelParser, ParsedFile};
    use crate::scanner::FileScanner;
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};

    info!("Starting documentation synthesis...");

    // Step 1: Load configuration and apply flag overrides
    let mut config = match &args.config_path {
        Some(path) => ApiConfig::load(path).with_context(|| format!("Failed to load configuration: {}", path.display()))?,
        None => ApiConfig::default(),
    };
    config.strict |= args.strict;
    config.sort_by_title |= args.sort_by_title;

    // Step 2: Scan for model files
    info!("Scanning for model files...");
    let mut scanner = FileScanner::new(args.model_path.clone());
    if let Some(path) = &args.config_path {
        scanner = scanner.exclude(path);
    }
    let scan_result = scanner.scan()?;

    info!("Found {} model files", scan_result.model_files.len());
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }

    if scan_result.model_files.is_empty() {
        anyhow::bail!("No model files found at {}", args.model_path.display());
    }

    // Step 3: Parse model files
    info!("Loading source model...");
    let parsed_files: Vec<ParsedFile> = ModelParser::parse_files(&scan_result.model_files)
        .into_iter()
        .filter_map(|r| match r {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!("Skipping file due to parse error: {:#}", e);
                None
            }
        })
        .collect();

    if parsed_files.is_empty() {
        anyhow::bail!("No model files could be parsed successfully");
    }
    let parsed_count = parsed_files.len();
    let model = ModelParser::merge(parsed_files);
    info!("Loaded {} classes from {} files", model.len(), parsed_count);

    // Step 4: Pick the framework (flag, then detection, then configuration)
    let framework = match args.framework {
        Some(framework) => {
            info!("Using user-specified framework: {:?}", framework);
            framework
        }
        None => {
            let detection = FrameworkDetector::detect(&model);
            match detection.single() {
                Some(framework) => {
                    info!("Detected framework: {:?}", framework);
                    framework
                }
                None => {
                    if detection.frameworks.is_empty() {
                        warn!("No framework annotations found; using {:?}", config.framework);
                    } else {
                        warn!(
                            "Several frameworks detected ({:?}); using {:?}. Pass --framework to choose.",
                            detection.frameworks, config.framework
                        );
                    }
                    config.framework
                }
            }
        }
    };
    config.framework = framework;
    let template = template_for(framework, config.taxonomy.clone());

    // Step 5: Build the document tree
    info!("Building documentation with the {} template...", template.name());
    let builder = DocBuilder::new(&model, template.as_ref(), &config).context("Invalid configuration")?;
    let tree = builder.build().context("Documentation failed")?;

    // Step 6: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&tree)?,
        OutputFormat::Json => serialize_json(&tree)?,
    };

    // Step 7: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    let endpoint_count: usize = tree.docs.iter().map(|d| d.methods.len()).sum();
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Model files: {}", scan_result.model_files.len());
    info!("  - Classes: {}", model.len());
    info!("  - Folders: {}", tree.docs.len());
    info!("  - Endpoint entries: {}", endpoint_count);
    info!("  - Diagnostics: {}", tree.diagnostics.len());

    Ok(())
}
