use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::{self, RoimapConfig};

/// Validate a config file's assumption defaults and safe-range bounds,
/// reporting every problem rather than stopping at the first.
pub fn validate_config_file(path: Option<PathBuf>) -> Result<()> {
    let config = match path {
        Some(path) => {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<RoimapConfig>(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => config::load_config(),
    };

    let mut problems = Vec::new();
    if let Some(ref assumptions) = config.assumptions {
        if let Err(e) = assumptions.validate() {
            problems.push(format!("assumptions: {}", e));
        }
    }
    if let Some(ref bounds) = config.safe_range {
        if let Err(e) = bounds.validate() {
            problems.push(format!("safe_range: {}", e));
        }
    }

    if problems.is_empty() {
        println!("Configuration is valid");
        Ok(())
    } else {
        for problem in &problems {
            eprintln!("error: {}", problem);
        }
        anyhow::bail!("configuration has {} problem(s)", problems.len())
    }
}
