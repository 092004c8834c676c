use std::path::{Path, PathBuf};

use clap::Parser;

use gendocs::config::{Config, DEFAULT_CONFIG_FILE};
use gendocs::error::Result;
use gendocs::generator::{GenerationReport, Generator};

#[derive(Parser, Debug)]
#[command(name = "gendocs")]
#[command(about = "Generate markdown documentation sources from Python docstrings")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Build docs/sources from mkgendocs.yml in the current directory
    gendocs

    # Use another configuration file
    gendocs --config docs/mkgendocs.yml

    # Show every page as it is written
    RUST_LOG=gendocs=debug gendocs
"#)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

/// Loads `config_path` and rebuilds the sources tree relative to the
/// current directory.
pub fn generate(config_path: &Path) -> Result<GenerationReport> {
    tracing::info!("Loading configuration from {}", config_path.display());
    let config = Config::load(config_path)?;
    let root = std::env::current_dir()?;

    let generator = Generator::new(root, config);
    let report = generator.run()?;

    println!(
        "Generated {} pages and {} examples in {}",
        report.pages,
        report.examples,
        generator.sources_dir().display()
    );

    Ok(report)
}
