use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::core::WeeklyHours;

/// Industry-standard assumption defaults applied wherever a submission
/// leaves a field blank. Every value is overridable from `.roimap.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssumptionDefaults {
    /// Average annual storage cost per terabyte ($)
    #[serde(default = "default_cost_per_tb")]
    pub cost_per_tb: f64,

    /// Fully burdened annual employee cost ($)
    #[serde(default = "default_employee_yearly_cost")]
    pub employee_yearly_cost: f64,

    /// Productive work hours per employee per year
    #[serde(default = "default_work_hours_yearly")]
    pub work_hours_yearly: f64,

    /// Reclaimable orphaned space, percent of total capacity
    #[serde(default = "default_reuse_orphaned_pct")]
    pub reuse_orphaned_pct: f64,

    /// Savings from improved operational processes, percent
    #[serde(default = "default_improved_processes_pct")]
    pub improved_processes_pct: f64,

    /// Cost avoidance from more accurate purchasing, percent
    #[serde(default = "default_buying_accuracy_pct")]
    pub buying_accuracy_pct: f64,

    /// Annual value of prevented storage outages ($)
    #[serde(default = "default_outage_avoidance_savings")]
    pub outage_avoidance_savings: f64,

    /// Annual subscription cost of the product being evaluated ($)
    #[serde(default = "default_product_annual_cost")]
    pub product_annual_cost: f64,

    /// Default weekly hours per personnel activity
    #[serde(default)]
    pub weekly_hours: WeeklyHours,
}

impl Default for AssumptionDefaults {
    fn default() -> Self {
        Self {
            cost_per_tb: default_cost_per_tb(),
            employee_yearly_cost: default_employee_yearly_cost(),
            work_hours_yearly: default_work_hours_yearly(),
            reuse_orphaned_pct: default_reuse_orphaned_pct(),
            improved_processes_pct: default_improved_processes_pct(),
            buying_accuracy_pct: default_buying_accuracy_pct(),
            outage_avoidance_savings: default_outage_avoidance_savings(),
            product_annual_cost: default_product_annual_cost(),
            weekly_hours: WeeklyHours::default(),
        }
    }
}

impl AssumptionDefaults {
    fn validate_positive(value: f64, name: &str) -> Result<(), String> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(format!("{} must be positive, got {}", name, value))
        }
    }

    fn validate_non_negative(value: f64, name: &str) -> Result<(), String> {
        if value >= 0.0 {
            Ok(())
        } else {
            Err(format!("{} must be non-negative, got {}", name, value))
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        Self::validate_non_negative(self.cost_per_tb, "cost_per_tb")?;
        Self::validate_positive(self.employee_yearly_cost, "employee_yearly_cost")?;
        Self::validate_positive(self.work_hours_yearly, "work_hours_yearly")?;
        Self::validate_positive(self.product_annual_cost, "product_annual_cost")?;
        Self::validate_non_negative(self.outage_avoidance_savings, "outage_avoidance_savings")?;

        for (name, value, max) in [
            ("reuse_orphaned_pct", self.reuse_orphaned_pct, 50.0),
            ("improved_processes_pct", self.improved_processes_pct, 50.0),
            ("buying_accuracy_pct", self.buying_accuracy_pct, 25.0),
        ] {
            if !(0.0..=max).contains(&value) {
                return Err(format!("{} must be within 0..={}, got {}", name, max, value));
            }
        }

        for (activity, hours) in self.weekly_hours.iter() {
            if !(0.0..=40.0).contains(&hours) {
                return Err(format!(
                    "weekly hours for {} must be within 0..=40, got {}",
                    activity.field_key(),
                    hours
                ));
            }
        }

        Ok(())
    }
}

fn default_cost_per_tb() -> f64 {
    500.0
}
fn default_employee_yearly_cost() -> f64 {
    150_000.0
}
fn default_work_hours_yearly() -> f64 {
    1_880.0
}
fn default_reuse_orphaned_pct() -> f64 {
    2.0
}
fn default_improved_processes_pct() -> f64 {
    2.0
}
fn default_buying_accuracy_pct() -> f64 {
    1.0
}
fn default_outage_avoidance_savings() -> f64 {
    250_000.0
}
fn default_product_annual_cost() -> f64 {
    150_000.0
}

/// The ROI band inside which a submission is trusted without manual
/// review. Results outside the band get flagged for the sales team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SafeRangeBounds {
    #[serde(default = "default_safe_range_lower")]
    pub lower: f64,

    #[serde(default = "default_safe_range_upper")]
    pub upper: f64,
}

impl Default for SafeRangeBounds {
    fn default() -> Self {
        Self {
            lower: default_safe_range_lower(),
            upper: default_safe_range_upper(),
        }
    }
}

impl SafeRangeBounds {
    pub fn validate(&self) -> Result<(), String> {
        if self.lower >= self.upper {
            return Err(format!(
                "safe range lower bound ({}) must be below upper bound ({})",
                self.lower, self.upper
            ));
        }
        Ok(())
    }
}

fn default_safe_range_lower() -> f64 {
    50.0
}
fn default_safe_range_upper() -> f64 {
    1_000.0
}

/// Top-level `.roimap.toml` structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoimapConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<AssumptionDefaults>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_range: Option<SafeRangeBounds>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreConfig>,
}

/// Where submissions get persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_dir")]
    pub directory: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: default_store_dir(),
        }
    }
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(".roimap/submissions")
}

static CONFIG: OnceLock<RoimapConfig> = OnceLock::new();

fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

pub fn parse_and_validate_config(contents: &str) -> Result<RoimapConfig, String> {
    let mut config = toml::from_str::<RoimapConfig>(contents)
        .map_err(|e| format!("Failed to parse .roimap.toml: {}", e))?;

    if let Some(ref assumptions) = config.assumptions {
        if let Err(e) = assumptions.validate() {
            eprintln!("Warning: Invalid assumption defaults: {}. Using defaults.", e);
            config.assumptions = Some(AssumptionDefaults::default());
        }
    }

    if let Some(ref bounds) = config.safe_range {
        if let Err(e) = bounds.validate() {
            eprintln!("Warning: Invalid safe range: {}. Using defaults.", e);
            config.safe_range = Some(SafeRangeBounds::default());
        }
    }

    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<RoimapConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read config file {}: {}", config_path.display(), e);
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            eprintln!("Warning: {}. Using defaults.", e);
            None
        }
    }
}

fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Load configuration from the nearest `.roimap.toml`, walking up from the
/// current directory, falling back to built-in defaults.
pub fn load_config() -> RoimapConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("Failed to get current directory: {}. Using default config.", e);
            return RoimapConfig::default();
        }
    };

    directory_ancestors(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(".roimap.toml"))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_default()
}

/// Get the cached process-wide configuration.
pub fn get_config() -> &'static RoimapConfig {
    CONFIG.get_or_init(load_config)
}

pub fn get_assumption_defaults() -> AssumptionDefaults {
    get_config().assumptions.clone().unwrap_or_default()
}

pub fn get_safe_range_bounds() -> SafeRangeBounds {
    get_config().safe_range.unwrap_or_default()
}
