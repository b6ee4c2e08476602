use structopt::StructOpt;

use crate::{run_impl, run_impl_struct};

#[derive(StructOpt)]
pub struct Catalog {
    #[structopt(subcommand)]
    query_type: QueryType,
}

run_impl_struct!(Catalog, query_type);

#[derive(StructOpt)]
enum QueryType {
    Search(search::SubCommand),
    /// Component counts per category.
    Stats,
    /// Every component of one category.
    List { category: rigsmith::component::Category },
}

run_impl!(QueryType, self, ctx, ser, {
    match self {
        Self::Search(s) => s.run(ctx, ser).await?,
        Self::Stats => {
            erased_serde::serialize(&ctx.catalog.stats(), ser)?;
        }
        Self::List { category } => {
            let components: Vec<_> = ctx.catalog.by_category(*category).collect();
            erased_serde::serialize(&components, ser)?;
        }
    }
});

mod search {
    use rigsmith::{catalog::SearchQuery, component::Category};
    use structopt::StructOpt;

    use crate::run_impl;

    #[derive(StructOpt)]
    pub(super) struct SubCommand {
        /// Matched against name, brand and model, ignoring case.
        #[structopt(long)]
        query: Option<String>,
        #[structopt(long)]
        category: Option<Category>,
        #[structopt(long)]
        min_price: Option<f64>,
        #[structopt(long)]
        max_price: Option<f64>,
        #[structopt(long, default_value = "0")]
        skip: usize,
        #[structopt(long)]
        limit: Option<usize>,
    }

    run_impl!(SubCommand, self, ctx, ser, {
        let query = SearchQuery {
            text: self.query.clone(),
            category: self.category,
            min_price: self.min_price,
            max_price: self.max_price,
            skip: self.skip,
            limit: self.limit,
        };
        erased_serde::serialize(&ctx.catalog.search(&query), ser)?;
    });
}
