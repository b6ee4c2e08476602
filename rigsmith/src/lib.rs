//! Budget-driven PC build recommendations.
//!
//! A budget is split across component categories by usage profile, shifted by
//! preference flags, and spent on the best catalog parts each share affords. The
//! resulting build is checked for compatibility and given an overall performance score.

pub mod allocation;
pub mod chat;
pub mod compatibility;
pub mod config;
pub mod error;
pub mod performance;
pub mod preferences;
pub mod recommend;
pub mod selection;

pub use chrono;
pub use rigsmith_core::{catalog, common, component, sample};

pub use crate::{
    allocation::{Allocator, BudgetDistribution},
    compatibility::{CompatibilityChecker, CompatibilityReport},
    config::EngineConfig,
    error::EngineError,
    performance::PerformanceEstimator,
    preferences::{adjust, PreferenceSet, TransferRule},
    recommend::{Comparison, Engine, Recommendation, RecommendationRequest},
    selection::{SelectionResult, Selector},
};
