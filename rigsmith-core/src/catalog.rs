use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};
use thiserror::Error;
use tracing::debug;

use crate::{
    common::Currency,
    component::{Category, Component},
};

/// Failures of a catalog backend.
///
/// Kept apart from empty results: a category with no components is `Ok(vec![])`.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("could not read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid catalog entry {id}: {reason}")]
    Invalid { id: u32, reason: String },
}

/// Read-only access to the components available for a build.
#[async_trait]
pub trait CatalogAccess: Send + Sync {
    /// All components of `category`, in the catalog's own order.
    async fn fetch_by_category(&self, category: Category) -> Result<Vec<Component>, CatalogError>;
}

/// The on-disk catalog format.
#[derive(Deserialize, Serialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub currency: Currency,
    pub components: Vec<Component>,
}

/// Filters for [`InMemoryCatalog::search`]. Every field is optional.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct SearchQuery {
    pub text: Option<String>,
    pub category: Option<Category>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    #[serde(default)]
    pub skip: usize,
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub const DEFAULT_LIMIT: usize = 100;

    fn accepts(&self, component: &Component) -> bool {
        self.text
            .as_deref()
            .filter(|text| !text.is_empty())
            .map_or(true, |text| component.matches_text(text))
            && self.category.map_or(true, |c| component.category == c)
            && self.min_price.map_or(true, |min| component.price >= min)
            && self.max_price.map_or(true, |max| component.price <= max)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct CatalogStats {
    pub counts: BTreeMap<Category, usize>,
    pub total: usize,
}

/// A catalog held entirely in memory, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    currency: Currency,
    components: Vec<Component>,
}

impl InMemoryCatalog {
    pub fn new(currency: Currency, components: Vec<Component>) -> Result<Self, CatalogError> {
        if let Some(bad) = components
            .iter()
            .find(|c| !c.price.is_finite() || c.price < 0.0)
        {
            return Err(CatalogError::Invalid {
                id: bad.id,
                reason: format!("price must be a non-negative amount, got {}", bad.price),
            });
        }
        Ok(Self {
            currency,
            components,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let catalog = Self::new(document.currency, document.components)?;
        debug!(components = catalog.len(), "parsed catalog");
        Ok(catalog)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn get(&self, id: u32) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Component> + '_ {
        self.components
            .iter()
            .filter(move |c| c.category == category)
    }

    pub fn search(&self, query: &SearchQuery) -> Vec<&Component> {
        self.components
            .iter()
            .filter(|c| query.accepts(c))
            .skip(query.skip)
            .take(query.limit.unwrap_or(SearchQuery::DEFAULT_LIMIT))
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let mut counts: BTreeMap<Category, usize> =
            Category::ALL.iter().map(|&c| (c, 0)).collect();
        for component in &self.components {
            *counts.entry(component.category).or_insert(0) += 1;
        }
        CatalogStats {
            counts,
            total: self.components.len(),
        }
    }
}

#[async_trait]
impl CatalogAccess for InMemoryCatalog {
    async fn fetch_by_category(&self, category: Category) -> Result<Vec<Component>, CatalogError> {
        Ok(self.by_category(category).cloned().collect())
    }
}
