use rigsmith::{PreferenceSet, RecommendationRequest};
use structopt::StructOpt;

use crate::run_impl;

#[derive(StructOpt)]
pub struct Recommend {
    #[structopt(long)]
    budget: f64,

    /// Usage profile: gaming, office, design or development.
    #[structopt(long, default_value = "gaming")]
    usage: String,

    /// Preference flag to turn on, such as `prefer_performance`. May be repeated.
    #[structopt(long)]
    prefer: Vec<String>,
}

run_impl!(Recommend, self, ctx, ser, {
    let request = RecommendationRequest::new(self.budget, self.usage.as_str())
        .with_preferences(PreferenceSet::enabled(self.prefer.iter().map(String::as_str)));
    erased_serde::serialize(&ctx.engine.recommend(&ctx.catalog, &request).await?, ser)?;
});
