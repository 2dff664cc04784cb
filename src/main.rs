use anyhow::Result;
use clap::Parser;
use roimap::cli::{Cli, Commands};
use roimap::commands;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            total_tb,
            total_vms,
            cost_per_tb,
            employee_yearly_cost,
            work_hours_yearly,
            reuse_orphaned_pct,
            improved_processes_pct,
            buying_accuracy_pct,
            outage_avoidance_savings,
            product_annual_cost,
            format,
            output,
            save,
        } => {
            let config = commands::analyze::AnalyzeConfig {
                input,
                total_tb,
                total_vms,
                cost_per_tb,
                employee_yearly_cost,
                work_hours_yearly,
                reuse_orphaned_pct,
                improved_processes_pct,
                buying_accuracy_pct,
                outage_avoidance_savings,
                product_annual_cost,
                format: format.into(),
                output,
                save,
            };
            commands::analyze::handle_analyze(config)
        }
        Commands::Init { force } => commands::init::init_config(force),
        Commands::Validate { config } => commands::validate::validate_config_file(config),
        Commands::Submissions { limit } => commands::submissions::list_submissions(limit),
    }
}
