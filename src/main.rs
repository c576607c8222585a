use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mstat::aggregation::{self, Delimiters};
use mstat::format;
use mstat::profile::{write_profile, Profiler};

mod cli;

use crate::cli::Args;

fn setup_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Couldn't init tracing: {}", err))?;
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    setup_tracing()?;

    let mut profiler = args.profile.as_ref().map(|_| Profiler::start());
    let report = aggregation::run(
        &args.file,
        args.parallel,
        Delimiters::default(),
        profiler.as_mut(),
    )
    .await
    .with_context(|| format!("Couldn't aggregate {}", args.file))?;
    let output = format::render(&report)?;

    if let (Some(path), Some(profiler)) = (&args.profile, profiler) {
        let run_profile = profiler.finish(args.parallel);
        write_profile(path, &run_profile)?;
        tracing::info!("Wrote run profile to {}", path);
    }

    println!("{}", output);
    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(args))
}
