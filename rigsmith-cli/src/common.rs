use std::path::Path;

use anyhow::Context as _;
use async_trait::async_trait;
use erased_serde::Serializer;
use rigsmith::{catalog::InMemoryCatalog, sample, Engine, EngineConfig};
use tracing::debug;

/// Everything a subcommand needs, loaded once from the global options.
pub struct Context {
    pub engine: Engine,
    pub catalog: InMemoryCatalog,
}

impl Context {
    pub fn load(config: Option<&Path>, catalog: Option<&Path>) -> anyhow::Result<Self> {
        let config = match config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        let engine = Engine::new(&config).context("invalid engine configuration")?;

        let catalog = match catalog {
            Some(path) => InMemoryCatalog::load(path)
                .with_context(|| format!("failed to load catalog from {}", path.display()))?,
            None => sample::catalog().context("bundled sample catalog is broken")?,
        };
        debug!(components = catalog.len(), "catalog loaded");

        Ok(Self { engine, catalog })
    }
}

#[async_trait]
pub trait Run {
    async fn run(
        &self,
        ctx: &Context,
        serializer: &mut (dyn Serializer + Send),
    ) -> anyhow::Result<()>;
}

#[macro_export]
macro_rules! run_impl {
    ($i:ident, $self:ident, $ctx:ident, $ser:ident, $b:block) => {
        #[async_trait::async_trait]
        impl $crate::common::Run for $i {
            async fn run(
                &$self,
                $ctx: &$crate::common::Context,
                $ser: &mut (dyn erased_serde::Serializer + Send),
            ) -> anyhow::Result<()> {
                $b;

                Ok(())
            }
        }
    };
}

#[macro_export]
macro_rules! run_impl_struct {
    ($i:ident, $b:ident) => {
        #[async_trait::async_trait]
        impl $crate::common::Run for $i {
            async fn run(
                &self,
                ctx: &$crate::common::Context,
                serializer: &mut (dyn erased_serde::Serializer + Send),
            ) -> anyhow::Result<()> {
                self.$b.run(ctx, serializer).await
            }
        }
    };
}
