//! kac-export - OBJ to KAC 1.0 converter
//!
//! Exit code 0 on success, 1 on any failure (usage, missing input,
//! conversion or write error).

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use kac_export::{convert_obj, ExportConfig, FormatVersion, TexturePolicy};

#[derive(Parser)]
#[command(name = "kac-export")]
#[command(about = "Convert Wavefront OBJ meshes to KAC 1.0 files")]
#[command(version)]
struct Cli {
    /// Input OBJ file
    input: PathBuf,

    /// Output .kac file
    output: PathBuf,

    /// Maximum texture side length (clamped to 2-256)
    #[arg(short = 's', long, value_name = "PIXELS")]
    max_texture_size: Option<u32>,

    /// Resize invalid textures instead of rejecting them
    #[arg(short, long)]
    tolerant: bool,

    /// On-disk layout
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Export settings (TOML); flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    #[value(name = "kac-1.0")]
    Kac10,
    #[value(name = "kac-1.0-draft")]
    Kac10Draft,
}

impl From<FormatArg> for FormatVersion {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Kac10 => FormatVersion::Kac10,
            FormatArg::Kac10Draft => FormatVersion::Kac10Draft,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version also end up here
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if !cli.input.exists() {
        bail!("input file does not appear to exist: {:?}", cli.input);
    }

    let mut config = match &cli.config {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };
    if let Some(side) = cli.max_texture_size {
        config = config.with_max_texture_side(side);
    }
    if cli.tolerant {
        config.texture_policy = TexturePolicy::Tolerant;
    }
    if let Some(format) = cli.format {
        config.format = format.into();
    }

    tracing::info!("Converting {:?} -> {:?}", cli.input, cli.output);
    convert_obj(&cli.input, &cli.output, &config)?;
    tracing::info!("Done!");

    Ok(())
}
