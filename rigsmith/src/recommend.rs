use serde::{Deserialize, Serialize};
use serde_with::{serde_as, PickFirst};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::{
    allocation::{Allocator, BudgetDistribution},
    catalog::{CatalogAccess, InMemoryCatalog},
    common::PriceText,
    compatibility::{CompatibilityChecker, CompatibilityReport},
    component::{Category, Component},
    config::EngineConfig,
    error::EngineError,
    performance::PerformanceEstimator,
    preferences::{adjust, PreferenceSet},
    selection::{SelectionResult, Selector},
};

#[serde_as]
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct RecommendationRequest {
    /// A number, or price text such as `"$1,200"`.
    #[serde_as(as = "PickFirst<(_, PriceText)>")]
    pub budget: f64,
    pub usage_type: String,
    #[serde(default)]
    pub preferences: PreferenceSet,
}

impl RecommendationRequest {
    pub fn new<S: Into<String>>(budget: f64, usage_type: S) -> Self {
        Self {
            budget,
            usage_type: usage_type.into(),
            preferences: PreferenceSet::new(),
        }
    }

    pub fn with_preferences(mut self, preferences: PreferenceSet) -> Self {
        self.preferences = preferences;
        self
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Recommendation {
    /// The profile that was actually used, after fallback.
    pub usage_type: String,
    pub budget: f64,
    pub budget_distribution: BudgetDistribution,
    /// In category order.
    pub components: Vec<Component>,
    pub total_price: f64,
    pub performance_score: f64,
    pub compatibility_score: f64,
    pub compatibility_details: CompatibilityReport,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ComparisonSummary {
    pub total_price: f64,
    /// Plain mean over every compared component; a missing score counts as zero.
    pub average_performance: f64,
    pub total_power_consumption: u64,
    pub component_count: usize,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Comparison {
    pub components: BTreeMap<Category, Vec<Component>>,
    pub compatibility: CompatibilityReport,
    pub summary: ComparisonSummary,
}

/// The whole recommendation pipeline: allocate, adjust, select, then check and score.
pub struct Engine {
    allocator: Allocator,
    selector: Selector,
    checker: CompatibilityChecker,
    estimator: PerformanceEstimator,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            allocator: Allocator::default(),
            selector: Selector::default(),
            checker: CompatibilityChecker::default(),
            estimator: PerformanceEstimator::default(),
        }
    }
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            allocator: Allocator::from_config(config)?,
            selector: Selector::new(config.affordable_tolerance, config.strict_catalog),
            checker: CompatibilityChecker::standard(config.issue_penalty),
            estimator: PerformanceEstimator::new(
                config.performance_weights.clone(),
                config.default_performance_score,
            ),
        })
    }

    /// Replace the compatibility checker, e.g. to add more rules.
    pub fn with_checker(mut self, checker: CompatibilityChecker) -> Self {
        self.checker = checker;
        self
    }

    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn checker(&self) -> &CompatibilityChecker {
        &self.checker
    }

    pub fn estimator(&self) -> &PerformanceEstimator {
        &self.estimator
    }

    /// Allocate and apply preferences, without touching the catalog.
    pub fn distribute(&self, request: &RecommendationRequest) -> BudgetDistribution {
        let distribution = self
            .allocator
            .allocate(request.budget, &request.usage_type);
        if request.preferences.is_empty() {
            distribution
        } else {
            adjust(&distribution, &request.preferences)
        }
    }

    /// # Errors
    /// Only when the selector runs in strict mode and the catalog fails.
    pub async fn recommend<C>(
        &self,
        catalog: &C,
        request: &RecommendationRequest,
    ) -> Result<Recommendation, EngineError>
    where
        C: CatalogAccess + ?Sized,
    {
        let (usage_type, _) = self.allocator.resolve(&request.usage_type);
        let usage_type = usage_type.to_string();
        let budget_distribution = self.distribute(request);
        let selection = self.selector.select(&budget_distribution, catalog).await?;

        let compatibility_details = self.checker.check(&selection);
        let performance_score = self.estimator.estimate(&selection);
        let total_price = selection.total_price();

        info!(
            budget = request.budget,
            usage_type = %usage_type,
            components = selection.len(),
            total_price,
            performance_score,
            compatibility_score = compatibility_details.compatibility_score,
            "built recommendation"
        );

        Ok(Recommendation {
            usage_type,
            budget: request.budget,
            budget_distribution,
            components: selection.into_components(),
            total_price,
            performance_score,
            compatibility_score: compatibility_details.compatibility_score,
            compatibility_details,
        })
    }

    /// Check a hand-picked set of catalog components. Unknown ids are skipped, and a
    /// later id replaces an earlier one of the same category.
    pub fn check_ids(&self, catalog: &InMemoryCatalog, ids: &[u32]) -> CompatibilityReport {
        let selection: SelectionResult = ids
            .iter()
            .filter_map(|&id| {
                let found = catalog.get(id);
                if found.is_none() {
                    debug!(id, "unknown component id");
                }
                found.cloned()
            })
            .collect();
        self.checker.check(&selection)
    }

    /// Side-by-side summary of `components`, with a compatibility check over them.
    ///
    /// # Errors
    /// [`EngineError::NothingToCompare`] if `components` is empty.
    pub fn compare(&self, components: Vec<Component>) -> Result<Comparison, EngineError> {
        if components.is_empty() {
            return Err(EngineError::NothingToCompare);
        }

        let summary = ComparisonSummary {
            total_price: components.iter().map(|c| c.price).sum(),
            average_performance: components
                .iter()
                .map(|c| c.performance_score.unwrap_or(0.0))
                .sum::<f64>()
                / components.len() as f64,
            total_power_consumption: components
                .iter()
                .filter_map(|c| c.power_consumption)
                .map(u64::from)
                .sum(),
            component_count: components.len(),
        };
        let compatibility = self
            .checker
            .check(&components.iter().cloned().collect::<SelectionResult>());

        let mut grouped: BTreeMap<Category, Vec<Component>> = BTreeMap::new();
        for component in components {
            grouped
                .entry(component.category)
                .or_insert_with(Vec::new)
                .push(component);
        }

        Ok(Comparison {
            components: grouped,
            compatibility,
            summary,
        })
    }
}
