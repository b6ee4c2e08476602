pub(crate) mod common;
mod modules;
mod options;

use std::io::{stderr, stdout};

use erased_serde::Serializer;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use crate::common::{Context, Run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = options::Options::from_args();
    init_logging(opt.verbose);

    let ctx = Context::load(opt.config.as_deref(), opt.catalog.as_deref())?;

    opt.command
        .run(
            &ctx,
            &mut <dyn Serializer>::erase(&mut serde_json::Serializer::pretty(stdout())),
        )
        .await?;

    println!();
    Ok(())
}

/// Logs go to stderr; stdout carries only JSON. `RUST_LOG` overrides `-v`.
fn init_logging(verbose: u64) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(stderr)
        .init();
}
