use thiserror::Error;

use crate::{catalog::CatalogError, component::Category};

/// Failures of the engine itself.
///
/// Missing or conflicting components are not errors; they come back as a
/// negative [`CompatibilityReport`](crate::compatibility::CompatibilityReport).
#[derive(Error, Debug)]
pub enum EngineError {
    /// The catalog could not be reached. Only raised with `strict_catalog` enabled.
    #[error("catalog lookup for {category} failed: {source}")]
    Catalog {
        category: Category,
        #[source]
        source: CatalogError,
    },

    #[error("no components to compare")]
    NothingToCompare,

    #[error("invalid configuration: {0}")]
    Config(String),
}
