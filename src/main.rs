use anyhow::Result;
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use blastmap::builders::ChangeRiskAnalyzer;
use blastmap::cli::{Cli, Commands, ThresholdPreset};
use blastmap::config::{self, RiskThresholds};
use blastmap::io::input;
use blastmap::io::output::{create_writer, AssessmentRun, OutputFormat};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Assess {
            graph,
            plans,
            format,
            output,
            config,
            threshold_preset,
        } => run_assess(graph, plans, format.into(), output, config, threshold_preset),
        Commands::Init { force } => config::init_config(force),
    }
}

fn run_assess(
    graph_path: PathBuf,
    plan_paths: Vec<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    preset: Option<ThresholdPreset>,
) -> Result<()> {
    let mut policy = config::load_policy(config_path.as_deref())?;
    if let Some(preset) = preset {
        policy.thresholds = thresholds_for(preset);
    }
    let analyzer = ChangeRiskAnalyzer::new(policy)?;

    let graph = input::load_graph(&graph_path)?;
    let plans = plan_paths
        .iter()
        .map(|path| input::load_change_plan(path))
        .collect::<Result<Vec<_>>>()?;

    let assessments = analyzer.assess_plans(&graph, &plans);

    let label_runs = plan_paths.len() > 1;
    let runs: Vec<AssessmentRun> = plan_paths
        .iter()
        .zip(assessments)
        .map(|(path, assessment)| AssessmentRun {
            plan: label_runs.then(|| path.clone()),
            assessment,
        })
        .collect();

    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(&path)?),
        None => Box::new(std::io::stdout()),
    };
    create_writer(format, sink).write_runs(&runs)
}

fn thresholds_for(preset: ThresholdPreset) -> RiskThresholds {
    match preset {
        ThresholdPreset::Strict => RiskThresholds::strict(),
        ThresholdPreset::Balanced => RiskThresholds::balanced(),
        ThresholdPreset::Lenient => RiskThresholds::lenient(),
    }
}
