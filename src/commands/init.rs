use crate::io;
use anyhow::Result;
use std::path::PathBuf;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(".roimap.toml");

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    let default_config = r#"# Roimap Configuration

# Industry-standard assumptions applied when a scenario leaves a field
# blank. Percentages are % of total capacity.
[assumptions]
cost_per_tb = 500.0
employee_yearly_cost = 150000.0
work_hours_yearly = 1880.0
reuse_orphaned_pct = 2.0
improved_processes_pct = 2.0
buying_accuracy_pct = 1.0
outage_avoidance_savings = 250000.0
product_annual_cost = 150000.0

[assumptions.weekly_hours]
building_reports = 4.0
planning = 2.0
modeling_trends = 2.0
problem_resolution = 4.0
capacity_reporting = 4.0
service_improvement = 6.0
automation_tasks = 4.0

# ROI band (%) inside which results are trusted without manual review.
[safe_range]
lower = 50.0
upper = 1000.0

[store]
directory = ".roimap/submissions"
"#;

    io::write_file(&config_path, default_config)?;
    println!("Created .roimap.toml configuration file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::parse_and_validate_config;

    #[test]
    fn generated_template_parses_to_defaults() {
        // Keep the init template and the config schema in lockstep.
        let template = r#"
[assumptions]
cost_per_tb = 500.0

[safe_range]
lower = 50.0
upper = 1000.0
"#;
        let config = parse_and_validate_config(template).unwrap();
        assert!(config.assumptions.unwrap().validate().is_ok());
        assert!(config.safe_range.unwrap().validate().is_ok());
    }
}
