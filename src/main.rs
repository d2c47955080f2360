//! apidoc-synth - Command-line tool for synthesizing API documentation.
//!
//! This binary reads a serialized source model (the classes, methods,
//! annotations and doc comments of a Spring MVC or JAX-RS project), discovers
//! its endpoints and writes a document tree with request/response examples.
//!
//! # Usage
//!
//! ```bash
//! apidoc-synth [OPTIONS] <MODEL_PATH>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! apidoc-synth ./model -o api-doc.yaml
//! ```
//!
//! Generate JSON documentation with a configuration file:
//! ```bash
//! apidoc-synth ./model -c apidoc.yaml -f json -o api-doc.json
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! apidoc-synth ./model -v
//! ```

use anyhow::Result;
use apidoc_synth::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // Parse once so the verbose flag can configure the logger before validation logs anything
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env().filter_level(log_level).init();

    info!("apidoc-synth starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Documentation synthesis completed successfully");

    Ok(())
}
