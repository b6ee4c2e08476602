use std::path::PathBuf;

use clap::AppSettings;
use structopt::StructOpt;

use crate::{
    modules::{
        catalog::Catalog, chat::Chat, check::Check, compare::Compare, recommend::Recommend,
    },
    run_impl,
};

#[derive(StructOpt)]
#[structopt(name = "rigsmith", global_settings = &[AppSettings::ColoredHelp])]
pub struct Options {
    /// JSON catalog to use instead of the bundled sample catalog.
    #[structopt(long, global = true, parse(from_os_str))]
    pub catalog: Option<PathBuf>,

    /// TOML engine configuration.
    #[structopt(long, global = true, parse(from_os_str))]
    pub config: Option<PathBuf>,

    /// More logging on stderr; repeat for more.
    #[structopt(short, long, global = true, parse(from_occurrences))]
    pub verbose: u64,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(StructOpt)]
pub enum Command {
    /// Recommend a build for a budget and usage profile.
    Recommend(Recommend),
    /// Check a set of catalog components for compatibility.
    Check(Check),
    /// Compare catalog components side by side.
    Compare(Compare),
    /// Query the catalog.
    Catalog(Catalog),
    /// Talk to the build assistant. Each argument is one message.
    Chat(Chat),
}

run_impl!(Command, self, ctx, ser, {
    match self {
        Self::Recommend(r) => r.run(ctx, ser).await?,
        Self::Check(c) => c.run(ctx, ser).await?,
        Self::Compare(c) => c.run(ctx, ser).await?,
        Self::Catalog(c) => c.run(ctx, ser).await?,
        Self::Chat(c) => c.run(ctx, ser).await?,
    }
});
