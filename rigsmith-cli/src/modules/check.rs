use structopt::StructOpt;

use crate::run_impl;

#[derive(StructOpt)]
pub struct Check {
    /// Catalog component ids. Unknown ids are ignored.
    ids: Vec<u32>,
}

run_impl!(Check, self, ctx, ser, {
    erased_serde::serialize(&ctx.engine.check_ids(&ctx.catalog, &self.ids), ser)?;
});
