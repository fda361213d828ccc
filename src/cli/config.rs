//! Scenario configuration for budgetsim
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.budgetsim/config.toml, or any file passed with `--config`.

use crate::budget::BudgetPolicy;
use crate::errors::{Result, SimError};
use crate::report::ReportFormat;
use crate::sequencer::Sequencer;
use crate::step::StepSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete scenario configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub budget: BudgetPolicy,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default, rename = "simulator")]
    pub simulators: Vec<SimulatorConfig>,
}

/// Report output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: ReportFormat,
    pub color: bool,
}

/// One simulated sequence: a root timeout and its ordered steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub name: String,
    pub timeout_ms: u64,
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            budget: BudgetPolicy::default(),
            output: OutputConfig::default(),
            simulators: vec![
                SimulatorConfig {
                    name: "dynamic-priority".to_string(),
                    timeout_ms: 600,
                    steps: vec![
                        StepSpec::fixed("fetch-session", 20),
                        StepSpec::weighted("load-profile", 0.5, true),
                        StepSpec::weighted("load-feed", 0.5, true),
                    ],
                },
                SimulatorConfig {
                    name: "fixed-overrun".to_string(),
                    timeout_ms: 50,
                    steps: vec![
                        StepSpec::fixed("slow-lookup", 100),
                        StepSpec::fixed("render", 10),
                    ],
                },
            ],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Table,
            color: true,
        }
    }
}

impl SimulatorConfig {
    /// Build a configured sequencer for this simulator
    pub fn build(&self, policy: BudgetPolicy) -> Result<Sequencer> {
        let mut sequencer = Sequencer::new(self.name.clone(), self.timeout_ms)?.with_policy(policy);
        sequencer.configure(self.steps.clone())?;
        Ok(sequencer)
    }

    fn validate(&self) -> Result<()> {
        self.build(BudgetPolicy::default()).map(|_| ())
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SimError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), simulators = config.simulators.len(), "configuration loaded");
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| SimError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load ~/.budgetsim/config.toml when present, otherwise built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard configuration location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".budgetsim").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.budget.priority_floor_ms < 0 {
            return Err(SimError::ConfigError(
                "priority_floor_ms must not be negative".to_string(),
            ));
        }

        if self.simulators.is_empty() {
            return Err(SimError::ConfigError(
                "at least one [[simulator]] must be configured".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for simulator in &self.simulators {
            if !seen.insert(simulator.name.as_str()) {
                return Err(SimError::ConfigError(format!(
                    "duplicate simulator name: {}",
                    simulator.name
                )));
            }
            simulator.validate()?;
        }

        Ok(())
    }

    /// Look up a simulator by name
    pub fn simulator(&self, name: &str) -> Option<&SimulatorConfig> {
        self.simulators.iter().find(|simulator| simulator.name == name)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SimError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml_string()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SimError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SimError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}
