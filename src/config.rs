//! Analysis parameters, optionally read from a TOML file.
//!
//! ```toml
//! damping_factor = 0.85
//! tolerance = 0.0001
//! max_iterations = 100
//! top_k = 10
//! group_member_limit = 10
//! components_strategy = "union-find"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::components::Strategy;
use crate::error::{GraphError, Result};
use crate::pagerank::PageRankParams;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub damping_factor: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub top_k: usize,
    pub group_member_limit: usize,
    pub components_strategy: Strategy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let pr = PageRankParams::default();
        AnalysisConfig {
            damping_factor: pr.damping_factor,
            tolerance: pr.tolerance,
            max_iterations: pr.max_iterations,
            top_k: 10,
            group_member_limit: 10,
            components_strategy: Strategy::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| GraphError::io(e, path))?;
        Self::from_toml_str(&content)
    }

    /// # Errors
    /// Damping outside `[0, 1)`, a negative or non-finite tolerance, or a
    /// zero iteration cap.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.damping_factor) {
            return Err(GraphError::Config(format!(
                "damping_factor must be in [0, 1), got {}",
                self.damping_factor
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(GraphError::Config(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(GraphError::Config("max_iterations must be at least 1".into()));
        }
        Ok(())
    }

    pub fn page_rank_params(&self) -> PageRankParams {
        PageRankParams {
            damping_factor: self.damping_factor,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
        }
    }
}
