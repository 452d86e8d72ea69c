use crate::config::AppConfig;
use crate::error::AppError;
use crate::render::{render_export, render_generation};
use crate::telemetry;
use crate::workflows::{dataset, export};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "IVI Insight",
    about = "Generate a scored insurance portfolio and export it for Power BI",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the synthetic dataset and IVI scores
    Generate(GenerateArgs),
    /// Build the Power BI bundle from an existing dataset
    Export(ExportArgs),
    /// Generate, then export (default command)
    Pipeline(PipelineArgs),
}

#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,
    /// Directory the dataset is written to
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Provider roster (CSV or spreadsheet) used instead of a synthetic one
    #[arg(long)]
    providers: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct ExportArgs {
    /// Directory holding the generated dataset
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Directory the Power BI bundle is written to
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Provider roster (defaults to providers.csv in the data directory)
    #[arg(long)]
    providers: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct PipelineArgs {
    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,
    /// Directory the dataset is written to and exported from
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Directory the Power BI bundle is written to
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Provider roster (CSV or spreadsheet) used instead of a synthetic one
    #[arg(long)]
    providers: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct Overrides {
    seed: Option<u64>,
    data_dir: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    providers: Option<PathBuf>,
}

impl Overrides {
    fn apply(self, config: &mut AppConfig) {
        if let Some(seed) = self.seed {
            config.generation.seed = seed;
        }
        if let Some(data_dir) = self.data_dir {
            config.set_data_dir(data_dir);
        }
        if let Some(export_dir) = self.export_dir {
            config.export.export_dir = export_dir;
        }
        if let Some(roster) = self.providers {
            config.set_provider_roster(roster);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Generate,
    Export,
    Pipeline,
}

impl Command {
    fn split(self) -> (Stage, Overrides) {
        match self {
            Command::Generate(args) => (
                Stage::Generate,
                Overrides {
                    seed: args.seed,
                    data_dir: args.data_dir,
                    providers: args.providers,
                    ..Overrides::default()
                },
            ),
            Command::Export(args) => (
                Stage::Export,
                Overrides {
                    data_dir: args.data_dir,
                    export_dir: args.export_dir,
                    providers: args.providers,
                    ..Overrides::default()
                },
            ),
            Command::Pipeline(args) => (
                Stage::Pipeline,
                Overrides {
                    seed: args.seed,
                    data_dir: args.data_dir,
                    export_dir: args.export_dir,
                    providers: args.providers,
                },
            ),
        }
    }
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Pipeline(PipelineArgs::default()));
    let (stage, overrides) = command.split();

    let mut config = AppConfig::load()?;
    overrides.apply(&mut config);
    telemetry::init(&config.telemetry)?;
    info!(environment = ?config.environment, ?stage, "ivi insight starting");

    let generated_at = Utc::now();
    if matches!(stage, Stage::Generate | Stage::Pipeline) {
        let report = dataset::run(&config.generation, generated_at)?;
        render_generation(&report);
    }
    if matches!(stage, Stage::Export | Stage::Pipeline) {
        let defaults = export::ExportDefaults::default();
        let manifest = export::run(&config.export, &defaults, generated_at)?;
        render_export(&manifest);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_runs_the_pipeline() {
        let cli = Cli::try_parse_from(["ivi-insight"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn pipeline_flags_override_config() {
        let cli = Cli::try_parse_from([
            "ivi-insight",
            "pipeline",
            "--seed",
            "7",
            "--data-dir",
            "out",
            "--providers",
            "roster.xlsx",
        ])
        .expect("parses");
        let (stage, overrides) = cli.command.expect("subcommand").split();
        assert_eq!(stage, Stage::Pipeline);
        assert_eq!(overrides.seed, Some(7));
        assert_eq!(overrides.data_dir, Some(PathBuf::from("out")));
        assert_eq!(overrides.providers, Some(PathBuf::from("roster.xlsx")));
        assert_eq!(overrides.export_dir, None);
    }

    #[test]
    fn generate_rejects_export_dir() {
        let parsed = Cli::try_parse_from(["ivi-insight", "generate", "--export-dir", "bi"]);
        assert!(parsed.is_err());
    }
}
