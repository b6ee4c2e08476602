use anyhow::Context;
use maplit::btreemap;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

use crate::{component::Category, error::EngineError};

/// Share of something (budget, performance) per category.
pub type WeightTable = BTreeMap<Category, f64>;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Tunables of the recommendation engine.
///
/// Every key is optional in a config file. Profiles given in a file are added to
/// (or replace, label by label) the built-in ones.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// How far over its allocation a component may be priced and still count as affordable.
    pub affordable_tolerance: f64,
    /// Fail a selection when the catalog fails, instead of treating the category as empty.
    pub strict_catalog: bool,
    pub issue_penalty: f64,
    pub default_performance_score: f64,
    pub fallback_profile: String,
    pub profiles: BTreeMap<String, WeightTable>,
    pub performance_weights: WeightTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            affordable_tolerance: 0.10,
            strict_catalog: false,
            issue_penalty: 25.0,
            default_performance_score: 50.0,
            fallback_profile: "gaming".to_string(),
            profiles: default_profiles(),
            performance_weights: default_performance_weights(),
        }
    }
}

pub fn default_profiles() -> BTreeMap<String, WeightTable> {
    use Category::*;
    btreemap! {
        "gaming".to_string() => btreemap! {
            Cpu => 0.25, Gpu => 0.35, Ram => 0.15, Storage => 0.10, Motherboard => 0.10, Psu => 0.05,
        },
        "office".to_string() => btreemap! {
            Cpu => 0.20, Gpu => 0.10, Ram => 0.20, Storage => 0.25, Motherboard => 0.15, Psu => 0.10,
        },
        "design".to_string() => btreemap! {
            Cpu => 0.30, Gpu => 0.30, Ram => 0.15, Storage => 0.10, Motherboard => 0.10, Psu => 0.05,
        },
        "development".to_string() => btreemap! {
            Cpu => 0.30, Gpu => 0.15, Ram => 0.25, Storage => 0.15, Motherboard => 0.10, Psu => 0.05,
        },
    }
}

pub fn default_performance_weights() -> WeightTable {
    use Category::*;
    btreemap! {
        Cpu => 0.35, Gpu => 0.35, Ram => 0.15, Storage => 0.05, Motherboard => 0.05, Psu => 0.05,
    }
}

impl EngineConfig {
    /// Read a TOML config file.
    ///
    /// # Errors
    /// Errors if the file cannot be read, is not valid TOML, or fails [`EngineConfig::validate`].
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in config file {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let mut config: Self = toml::from_str(text).context("could not parse engine config")?;
        config.profiles = config
            .profiles
            .into_iter()
            .map(|(label, table)| (normalize_label(&label), table))
            .collect();
        for (label, table) in default_profiles() {
            config.profiles.entry(label).or_insert(table);
        }
        config.fallback_profile = normalize_label(&config.fallback_profile);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.affordable_tolerance >= 0.0) {
            return Err(EngineError::Config(format!(
                "affordable_tolerance must be non-negative, got {}",
                self.affordable_tolerance
            )));
        }
        if !(self.issue_penalty >= 0.0) {
            return Err(EngineError::Config(format!(
                "issue_penalty must be non-negative, got {}",
                self.issue_penalty
            )));
        }
        if !self.profiles.contains_key(&self.fallback_profile) {
            return Err(EngineError::Config(format!(
                "fallback profile `{}` is not defined",
                self.fallback_profile
            )));
        }
        for (label, table) in &self.profiles {
            if let Some((category, weight)) = table.iter().find(|(_, w)| !(**w >= 0.0)) {
                return Err(EngineError::Config(format!(
                    "profile `{}` has a negative {} weight ({})",
                    label, category, weight
                )));
            }
            let sum: f64 = table.values().sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(EngineError::Config(format!(
                    "weights of profile `{}` sum to {}, expected 1.0",
                    label, sum
                )));
            }
        }
        if self.performance_weights.values().any(|w| !(*w >= 0.0)) {
            return Err(EngineError::Config(
                "performance weights must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}
