//! svcpack - Windows Service packager for Web Deploy
//!
//! Usage:
//!   svcpack package <target>   # Build <workingPath>/<outputPackage>
//!   svcpack render <target>    # Write status page + manifest, print artifacts
//!   svcpack targets            # List configured targets

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use svcpack_core::config::{
    self, CONFIG_FILE_NAME, Options, OptionsLayer, PackageConfig, SourcePath,
};
use svcpack_core::pipeline::{PackageReport, Pipeline};
use svcpack_core::tool::SystemToolRunner;

#[derive(Parser)]
#[command(name = "svcpack")]
#[command(about = "Packages a Windows Service into a Web Deploy package", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the Web Deploy package for a target
    Package {
        #[command(flatten)]
        target: TargetArgs,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Write the status page and manifest and print the generated documents
    /// without invoking msdeploy
    Render {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// List configured targets
    Targets {
        /// Path to svcpack.toml
        #[arg(long, short, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// Target name from svcpack.toml
    target: String,

    /// Path to svcpack.toml
    #[arg(long, short, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Override the version shown on the status page
    #[arg(long, value_name = "VERSION")]
    pkg_version: Option<String>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "svcpack=debug,svcpack_core=debug,info"
    } else {
        "svcpack=info,svcpack_core=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Package { target, format } => run_package(&target, format),
        Commands::Render { target } => run_render(&target),
        Commands::Targets { config } => run_targets(&config),
    }
}

fn run_package(args: &TargetArgs, format: OutputFormat) -> Result<()> {
    let (options, source) = resolve_target(args)?;
    let runner = SystemToolRunner;

    let report = Pipeline::new(&runner)
        .run(&options, &source)
        .with_context(|| format!("Failed to package target '{}'", args.target))?;

    match format {
        OutputFormat::Table => print_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn run_render(args: &TargetArgs) -> Result<()> {
    let (options, source) = resolve_target(args)?;
    let runner = SystemToolRunner;

    let rendered = Pipeline::new(&runner)
        .render(&options, &source)
        .with_context(|| format!("Failed to render target '{}'", args.target))?;

    println!("# {}", rendered.status_page_path.display());
    println!("# {}", rendered.manifest_path.display());
    println!("{}", rendered.manifest.to_xml());
    println!();
    println!("# parameters.xml");
    println!("{}", rendered.parameters.to_xml());
    Ok(())
}

fn run_targets(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    if config.targets.is_empty() {
        println!("No targets configured in {}", config_path.display());
        return Ok(());
    }
    for name in config.target_names() {
        let src = config.target(name).and_then(|t| t.src.as_deref());
        println!("{:<20} {}", name, src.unwrap_or("-"));
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<PackageConfig> {
    config::parse_config(path)
}

fn resolve_target(args: &TargetArgs) -> Result<(Options, SourcePath)> {
    let config = load_config(&args.config)?;
    if config.target(&args.target).is_none() {
        tracing::warn!(name = %args.target, "Target not found in configuration");
    }

    let base_dir = std::env::current_dir()
        .context("Failed to determine current directory")?
        .join(config::config_base_dir(&args.config));
    let overrides = args.pkg_version.clone().map(OptionsLayer::with_version);

    let request = config.request_for(&args.target, &base_dir, overrides);
    Ok(config::resolve(request)?)
}

fn print_report(report: &PackageReport) {
    println!("Package:    {}", report.package_path.display());
    println!("Manifest:   {}", report.manifest_path.display());
    println!("Status:     {}", report.status_page_path.display());
    println!("Directives: {}", report.directives);
    println!("Entries:    {}", report.entries);
    println!("BLAKE3:     {}", report.digest);
    println!("Completed:  {}", report.packaged_at.to_rfc3339());
}
