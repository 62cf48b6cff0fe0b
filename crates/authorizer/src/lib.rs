//! Off-chain tooling for the order validators: builds fulfiller trees,
//! aggregate commitments and server tokens the way the validators check them.

pub mod arguments;
pub mod commands;
pub mod config;

use {arguments::Args, clap::Parser};

pub fn run(args: impl IntoIterator<Item = String>) -> anyhow::Result<()> {
    let args = Args::parse_from(args);
    observe::tracing::initialize(&args.logging.observe());
    tracing::debug!("running authorizer with arguments:\n{}", args);

    let output = commands::execute(&args)?;
    println!("{output}");
    Ok(())
}
