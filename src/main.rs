//! Summary XRef CLI
//!
//! Command-line interface for writing summary mappings, summary xref files
//! and the exposure summary report

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use summary_xref::pipeline::{load_keys_errors, write_exposure_report, write_summary_mapping};
use summary_xref::{AnalysisSettings, OedHierarchy, SummaryLevel, SummaryRunner, Table, XrefOptions};

#[derive(Debug, Parser)]
#[command(name = "summary_xref", version, about = "Summary mapping and xref generation")]
struct Cli {
    /// JSON file overriding the OED hierarchy column names
    #[arg(long, global = true)]
    oed_hierarchy: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a summary map from ground-up or insured-loss input items
    Mapping {
        /// Input items CSV
        #[arg(long)]
        inputs: PathBuf,
        /// Treat the inputs as insured-loss (FM) items
        #[arg(long)]
        insured_loss: bool,
        /// Directory to write the summary map into
        #[arg(long)]
        target_dir: PathBuf,
    },
    /// Write summary xref files for a model run directory
    Xref {
        #[arg(long)]
        run_dir: PathBuf,
        /// Analysis settings JSON
        #[arg(long)]
        settings: PathBuf,
        /// Account inputs were supplied (insured loss)
        #[arg(long)]
        il: bool,
        /// Reinsurance inputs were supplied
        #[arg(long)]
        ri: bool,
    },
    /// Write the exposure summary report
    ExposureSummary {
        /// Ground-up input items CSV
        #[arg(long)]
        gul_inputs: PathBuf,
        /// Source exposure (location) CSV
        #[arg(long)]
        exposure: PathBuf,
        /// Keys errors expanded to input items, with a status column
        #[arg(long)]
        keys_errors: Option<PathBuf>,
        #[arg(long)]
        target_dir: PathBuf,
    },
}

fn load_hierarchy(path: Option<&PathBuf>) -> anyhow::Result<OedHierarchy> {
    match path {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening OED hierarchy {}", path.display()))?;
            Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
        }
        None => Ok(OedHierarchy::default()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let hierarchy = load_hierarchy(cli.oed_hierarchy.as_ref())?;

    match cli.command {
        Command::Mapping { inputs, insured_loss, target_dir } => {
            let level = if insured_loss { SummaryLevel::InsuredLoss } else { SummaryLevel::GroundUp };
            let items = Table::from_csv_path(&inputs, "No input items file found.")
                .with_context(|| format!("loading input items {}", inputs.display()))?;
            let path = write_summary_mapping(&items, &hierarchy, level, &target_dir)
                .context("writing summary map")?;
            println!("{}", path.display());
        }
        Command::Xref { run_dir, settings, il, ri } => {
            let settings = AnalysisSettings::from_path(&settings)
                .with_context(|| format!("loading analysis settings {}", settings.display()))?;
            let runner = SummaryRunner::load(&run_dir)
                .with_context(|| format!("loading exposure for {}", run_dir.display()))?;
            let written = runner
                .generate_summaryxref_files(&settings, XrefOptions { il, ri })
                .context("generating summary xref files")?;
            for path in written {
                println!("{}", path.display());
            }
        }
        Command::ExposureSummary { gul_inputs, exposure, keys_errors, target_dir } => {
            let gul = Table::from_csv_path(&gul_inputs, "No ground-up input items file found.")?;
            let exposure = Table::from_csv_path(&exposure, "No source exposure file found.")?;
            let errors = match keys_errors {
                Some(path) => load_keys_errors(&path)
                    .with_context(|| format!("loading keys errors {}", path.display()))?,
                None => None,
            };
            let (path, report) =
                write_exposure_report(&gul, &exposure, errors.as_ref(), &hierarchy, &target_dir)
                    .context("writing exposure summary")?;
            for diagnostic in &report.diagnostics {
                eprintln!("warning: {}", diagnostic);
            }
            println!("{}", path.display());
        }
    }

    Ok(())
}
