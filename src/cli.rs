use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::io::output;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full-precision machine-readable report
    Json,
    /// Printable worksheet
    Markdown,
    /// Colored worksheet tables
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
#[command(name = "roimap")]
#[command(about = "Storage environment ROI and savings analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute a savings breakdown for a scenario
    Analyze {
        /// JSON file with raw scenario fields (flags below override it)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Total storage space (TB)
        #[arg(long = "total-tb")]
        total_tb: Option<f64>,

        /// Total number of VMs
        #[arg(long = "total-vms")]
        total_vms: Option<u64>,

        /// Average annual cost per TB ($)
        #[arg(long = "cost-per-tb")]
        cost_per_tb: Option<f64>,

        /// Fully burdened annual employee cost ($)
        #[arg(long = "employee-yearly-cost")]
        employee_yearly_cost: Option<f64>,

        /// Productive work hours per year
        #[arg(long = "work-hours-yearly")]
        work_hours_yearly: Option<f64>,

        /// Reclaimable orphaned space (% of capacity, 0-50)
        #[arg(long = "reuse-orphaned-pct")]
        reuse_orphaned_pct: Option<f64>,

        /// Process improvement savings (% of capacity, 0-50)
        #[arg(long = "improved-processes-pct")]
        improved_processes_pct: Option<f64>,

        /// Purchasing accuracy improvement (% of capacity, 0-25)
        #[arg(long = "buying-accuracy-pct")]
        buying_accuracy_pct: Option<f64>,

        /// Annual outage avoidance value ($)
        #[arg(long = "outage-avoidance")]
        outage_avoidance_savings: Option<f64>,

        /// Annual product subscription cost ($)
        #[arg(long = "product-annual-cost")]
        product_annual_cost: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Persist the scenario to the submission store (requires the
        /// contact fields in --input)
        #[arg(long)]
        save: bool,
    },

    /// Initialize a .roimap.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file's defaults and bounds
    Validate {
        /// Config file to validate (defaults to discovered .roimap.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List recent persisted submissions
    Submissions {
        /// Maximum rows to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}
