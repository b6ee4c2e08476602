use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, iter::FromIterator};
use tracing::debug;

use crate::{
    component::Category,
    config::{default_profiles, normalize_label, EngineConfig, WeightTable},
    error::EngineError,
};

/// Currency amount assigned to each category.
///
/// Amounts are kept unrounded. Reading a category that has no entry yields `0.0`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetDistribution(BTreeMap<Category, f64>);

impl BudgetDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> f64 {
        self.0.get(&category).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains_key(&category)
    }

    pub fn set(&mut self, category: Category, amount: f64) {
        self.0.insert(category, amount);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.0.iter().map(|(&c, &a)| (c, a))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Removes `fraction` of the category's current amount and returns what was removed.
    /// Absent categories give nothing and stay absent.
    pub(crate) fn take_share(&mut self, category: Category, fraction: f64) -> f64 {
        match self.0.get_mut(&category) {
            Some(amount) => {
                let share = *amount * fraction;
                *amount -= share;
                share
            }
            None => 0.0,
        }
    }

    /// Adds `amount` to the category. A zero amount leaves the distribution untouched.
    pub(crate) fn credit(&mut self, category: Category, amount: f64) {
        if amount != 0.0 {
            *self.0.entry(category).or_insert(0.0) += amount;
        }
    }
}

impl FromIterator<(Category, f64)> for BudgetDistribution {
    fn from_iter<I: IntoIterator<Item = (Category, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Splits a budget across categories by usage profile.
#[derive(Clone, Debug)]
pub struct Allocator {
    profiles: BTreeMap<String, WeightTable>,
    fallback: String,
}

impl Default for Allocator {
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
            fallback: "gaming".to_string(),
        }
    }
}

impl Allocator {
    pub fn new(
        profiles: BTreeMap<String, WeightTable>,
        fallback: &str,
    ) -> Result<Self, EngineError> {
        let fallback = normalize_label(fallback);
        let profiles: BTreeMap<_, _> = profiles
            .into_iter()
            .map(|(label, table)| (normalize_label(&label), table))
            .collect();
        if !profiles.contains_key(&fallback) {
            return Err(EngineError::Config(format!(
                "fallback profile `{}` is not defined",
                fallback
            )));
        }
        Ok(Self { profiles, fallback })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        Self::new(config.profiles.clone(), &config.fallback_profile)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &str> + '_ {
        self.profiles.keys().map(String::as_str)
    }

    /// The label and weight table actually used for `usage_type`.
    /// Unknown labels resolve to the fallback profile.
    pub fn resolve(&self, usage_type: &str) -> (&str, &WeightTable) {
        let label = normalize_label(usage_type);
        match self.profiles.get_key_value(&label) {
            Some((label, table)) => (label.as_str(), table),
            None => {
                debug!(usage_type, fallback = %self.fallback, "unknown usage type, using fallback profile");
                let table = &self.profiles[&self.fallback];
                (self.fallback.as_str(), table)
            }
        }
    }

    /// `budget * weight` for every category of the profile.
    /// A budget that is not positive allocates zero everywhere.
    pub fn allocate(&self, budget: f64, usage_type: &str) -> BudgetDistribution {
        let budget = budget.max(0.0);
        let (label, table) = self.resolve(usage_type);
        let distribution: BudgetDistribution = table
            .iter()
            .map(|(&category, &weight)| (category, budget * weight))
            .collect();
        debug!(profile = label, budget, ?distribution, "allocated budget");
        distribution
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{Allocator, BudgetDistribution};
    use crate::{common::roughly_equal, component::Category};

    #[test]
    fn test_gaming_split() {
        let distribution = Allocator::default().allocate(1000.0, "gaming");
        assert!(roughly_equal(distribution.get(Category::Cpu), 250.0));
        assert!(roughly_equal(distribution.get(Category::Gpu), 350.0));
        assert!(roughly_equal(distribution.get(Category::Ram), 150.0));
        assert!(roughly_equal(distribution.get(Category::Storage), 100.0));
        assert!(roughly_equal(distribution.get(Category::Motherboard), 100.0));
        assert!(roughly_equal(distribution.get(Category::Psu), 50.0));
        assert_eq!(distribution.len(), 6);
        assert!(!distribution.contains(Category::Case));
    }

    #[test]
    fn test_label_is_case_insensitive() {
        let allocator = Allocator::default();
        assert_eq!(
            allocator.allocate(800.0, " Office "),
            allocator.allocate(800.0, "office")
        );
        assert_eq!(allocator.resolve("DEVELOPMENT").0, "development");
    }

    #[test]
    fn test_zero_and_negative_budgets() {
        let allocator = Allocator::default();
        for budget in &[0.0, -250.0, f64::NAN] {
            let distribution = allocator.allocate(*budget, "design");
            assert_eq!(distribution.len(), 6);
            assert!(distribution.iter().all(|(_, amount)| amount == 0.0));
        }
    }

    #[test]
    fn test_missing_fallback_is_rejected() {
        let profiles = crate::config::default_profiles();
        assert!(Allocator::new(profiles, "htpc").is_err());
    }

    #[test]
    fn test_share_transfers() {
        let mut distribution: BudgetDistribution =
            vec![(Category::Psu, 100.0)].into_iter().collect();
        assert_eq!(distribution.take_share(Category::Psu, 0.1), 10.0);
        assert_eq!(distribution.get(Category::Psu), 90.0);
        assert_eq!(distribution.take_share(Category::Gpu, 0.1), 0.0);
        assert!(!distribution.contains(Category::Gpu));

        distribution.credit(Category::Storage, 0.0);
        assert!(!distribution.contains(Category::Storage));
        distribution.credit(Category::Storage, 10.0);
        assert_eq!(distribution.get(Category::Storage), 10.0);
    }

    proptest! {
        #[test]
        fn allocation_sums_to_budget(
            budget in 0.01f64..1_000_000.0,
            usage in prop::sample::select(vec!["gaming", "office", "design", "development"]),
        ) {
            let total = Allocator::default().allocate(budget, usage).total();
            prop_assert!((total - budget).abs() <= budget * 1e-9);
        }

        #[test]
        fn unknown_usage_behaves_like_gaming(budget in 0.01f64..1_000_000.0, usage in "[a-z]{1,12}") {
            prop_assume!(!["gaming", "office", "design", "development"].contains(&usage.as_str()));
            let allocator = Allocator::default();
            prop_assert_eq!(allocator.allocate(budget, &usage), allocator.allocate(budget, "gaming"));
        }
    }
}
