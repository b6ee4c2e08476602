//! Data model and catalog access for PC build recommendations.

pub mod catalog;
pub mod common;
pub mod component;
pub mod sample;

pub use async_trait;
