use anyhow::anyhow;
use structopt::StructOpt;

use crate::run_impl;

#[derive(StructOpt)]
pub struct Compare {
    ids: Vec<u32>,
}

run_impl!(Compare, self, ctx, ser, {
    let components = self
        .ids
        .iter()
        .map(|&id| {
            ctx.catalog
                .get(id)
                .cloned()
                .ok_or_else(|| anyhow!("no component with id {}", id))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    erased_serde::serialize(&ctx.engine.compare(components)?, ser)?;
});
