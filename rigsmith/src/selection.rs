use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, iter::FromIterator};
use tracing::{debug, warn};

use crate::{
    allocation::BudgetDistribution,
    catalog::CatalogAccess,
    component::{Category, Component},
    error::EngineError,
};

/// One chosen component per category. Categories without a pick are absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionResult(BTreeMap<Category, Component>);

impl SelectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `component` in its own category, replacing any earlier pick.
    pub fn insert(&mut self, component: Component) -> Option<Component> {
        self.0.insert(component.category, component)
    }

    pub fn get(&self, category: Category) -> Option<&Component> {
        self.0.get(&category)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains_key(&category)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &Component)> + '_ {
        self.0.iter().map(|(&c, component)| (c, component))
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> + '_ {
        self.0.values()
    }

    pub fn total_price(&self) -> f64 {
        self.0.values().map(|c| c.price).sum()
    }

    pub fn into_components(self) -> Vec<Component> {
        self.0.into_iter().map(|(_, c)| c).collect()
    }
}

/// Later components replace earlier ones of the same category.
impl FromIterator<Component> for SelectionResult {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        let mut selection = Self::new();
        for component in iter {
            selection.insert(component);
        }
        selection
    }
}

/// Picks a component per category within its allocation.
#[derive(Clone, Copy, Debug)]
pub struct Selector {
    tolerance: f64,
    strict: bool,
}

impl Default for Selector {
    fn default() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
            strict: false,
        }
    }
}

impl Selector {
    pub const DEFAULT_TOLERANCE: f64 = 0.10;

    /// `strict` makes catalog failures fail the selection instead of emptying the category.
    pub fn new(tolerance: f64, strict: bool) -> Self {
        Self { tolerance, strict }
    }

    /// Highest price still considered affordable for `allocation`.
    pub fn ceiling(&self, allocation: f64) -> f64 {
        allocation * (1.0 + self.tolerance)
    }

    /// The best-scoring affordable candidate, or else the cheapest candidate overall.
    ///
    /// Ties go to whichever candidate comes first. A missing performance score counts as zero.
    pub fn choose<'c>(&self, allocation: f64, candidates: &'c [Component]) -> Option<&'c Component> {
        let ceiling = self.ceiling(allocation);
        let score = |c: &Component| c.performance_score.unwrap_or(0.0);

        let best = candidates
            .iter()
            .filter(|c| c.price <= ceiling)
            .fold(None, |best: Option<&Component>, c| match best {
                Some(b) if score(c) <= score(b) => Some(b),
                _ => Some(c),
            });

        best.or_else(|| {
            candidates
                .iter()
                .fold(None, |cheapest: Option<&Component>, c| match cheapest {
                    Some(b) if c.price >= b.price => Some(b),
                    _ => Some(c),
                })
        })
    }

    /// Choose one component for every category of `distribution`.
    ///
    /// Categories are looked up concurrently. A category the catalog has nothing for
    /// is left out of the result.
    ///
    /// # Errors
    /// Only in strict mode, when a catalog lookup fails.
    pub async fn select<C>(
        &self,
        distribution: &BudgetDistribution,
        catalog: &C,
    ) -> Result<SelectionResult, EngineError>
    where
        C: CatalogAccess + ?Sized,
    {
        let lookups = distribution.iter().map(|(category, allocation)| async move {
            (category, allocation, catalog.fetch_by_category(category).await)
        });

        let mut selection = SelectionResult::new();
        for (category, allocation, fetched) in join_all(lookups).await {
            let candidates = match fetched {
                Ok(candidates) => candidates,
                Err(source) if self.strict => return Err(EngineError::Catalog { category, source }),
                Err(error) => {
                    warn!(%category, %error, "catalog lookup failed, treating category as empty");
                    Vec::new()
                }
            };

            match self.choose(allocation, &candidates) {
                Some(choice) => {
                    debug!(
                        %category,
                        allocation,
                        id = choice.id,
                        price = choice.price,
                        within_budget = choice.price <= self.ceiling(allocation),
                        "selected component"
                    );
                    selection.insert(choice.clone());
                }
                None => debug!(%category, "no candidates in catalog"),
            }
        }
        Ok(selection)
    }
}
