use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display, iter::FromIterator};
use tracing::debug;

use crate::{allocation::BudgetDistribution, component::Category};

/// Named on/off preferences. A flag that is not set is off.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceSet(BTreeMap<String, bool>);

impl PreferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set with every flag in `flags` turned on.
    pub fn enabled<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        flags.into_iter().map(|f| (f.into(), true)).collect()
    }

    pub fn set<S: Into<String>>(&mut self, flag: S, on: bool) {
        self.0.insert(flag.into(), on);
    }

    pub fn is_on(&self, flag: &str) -> bool {
        self.0.get(flag).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn flags(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for PreferenceSet {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(f, on)| (f.into(), on)).collect())
    }
}

/// A fixed-percentage budget transfer triggered by one preference flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferRule {
    /// 20% of motherboard and 20% of PSU, split evenly into CPU and GPU.
    PreferPerformance,
    /// 10% of PSU into storage.
    PreferStorage,
    /// 10% of GPU into PSU.
    PreferSilence,
}

impl TransferRule {
    /// Rules run in this order, each one seeing the result of the previous.
    pub const PIPELINE: [TransferRule; 3] = [
        Self::PreferPerformance,
        Self::PreferStorage,
        Self::PreferSilence,
    ];

    pub fn flag(self) -> &'static str {
        match self {
            Self::PreferPerformance => "prefer_performance",
            Self::PreferStorage => "prefer_storage",
            Self::PreferSilence => "prefer_silence",
        }
    }

    pub fn is_known_flag(flag: &str) -> bool {
        Self::PIPELINE.iter().any(|rule| rule.flag() == flag)
    }

    pub fn apply(self, distribution: &mut BudgetDistribution) {
        match self {
            Self::PreferPerformance => {
                let pool = distribution.take_share(Category::Motherboard, 0.2)
                    + distribution.take_share(Category::Psu, 0.2);
                distribution.credit(Category::Cpu, pool * 0.5);
                distribution.credit(Category::Gpu, pool * 0.5);
            }
            Self::PreferStorage => {
                let moved = distribution.take_share(Category::Psu, 0.1);
                distribution.credit(Category::Storage, moved);
            }
            Self::PreferSilence => {
                let moved = distribution.take_share(Category::Gpu, 0.1);
                distribution.credit(Category::Psu, moved);
            }
        }
    }
}

impl Display for TransferRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.flag())
    }
}

/// Apply every enabled rule of [`TransferRule::PIPELINE`] to a copy of `distribution`.
/// Unknown flags are ignored.
pub fn adjust(distribution: &BudgetDistribution, preferences: &PreferenceSet) -> BudgetDistribution {
    let mut adjusted = distribution.clone();
    if preferences.is_empty() {
        return adjusted;
    }

    for flag in preferences.flags().filter(|f| !TransferRule::is_known_flag(f)) {
        debug!(flag, "ignoring unknown preference");
    }

    for rule in TransferRule::PIPELINE
        .iter()
        .filter(|rule| preferences.is_on(rule.flag()))
    {
        rule.apply(&mut adjusted);
        debug!(%rule, distribution = ?adjusted, "applied preference");
    }
    adjusted
}
