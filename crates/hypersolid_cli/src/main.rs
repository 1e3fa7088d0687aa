//! Command-line interface for computing properties of N-dimensional solids
//! and generating tilings of the plane.

use eyre::Context;

mod cli;

fn main() -> eyre::Result<()> {
    use clap::Parser;

    env_logger::builder().init();
    color_eyre::install()?;

    let args = cli::Args::parse();
    let limits = hypersolid::Limits::load(args.limits.as_deref())
        .context("error loading limits")?;
    cli::exec(args.subcommand, &limits)
}
