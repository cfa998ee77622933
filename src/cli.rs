use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::io::output;

/// Packaged classification threshold presets.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThresholdPreset {
    /// Escalate earlier; suited to regulated environments
    Strict,
    /// Default cut points
    Balanced,
    /// Tolerate more risk before escalating
    Lenient,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => output::OutputFormat::Json,
            OutputFormat::Markdown => output::OutputFormat::Markdown,
            OutputFormat::Terminal => output::OutputFormat::Terminal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "blastmap")]
#[command(about = "Infrastructure change risk assessment and blast radius analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess planned changes against a dependency graph snapshot
    Assess {
        /// Dependency graph snapshot (JSON)
        #[arg(long)]
        graph: PathBuf,

        /// Change plan (JSON); repeat to assess several plans in parallel
        #[arg(long = "plan", required = true)]
        plans: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Policy configuration file (defaults to ./blastmap.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override configured classification thresholds with a preset
        #[arg(long, value_enum)]
        threshold_preset: Option<ThresholdPreset>,
    },
    /// Write a default blastmap.toml to the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}
