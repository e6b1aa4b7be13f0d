use clap::Parser;
use color_eyre::eyre::{Report, Result};
use igtreez::{cli, cli::Cli, run};

fn main() -> Result<(), Report> {
    // ------------------------------------------------------------------------
    // CLI Setup

    // Parse CLI parameters
    let args = Cli::parse();

    // initialize color_eyre crate for colorized logs
    color_eyre::install()?;

    // Set logging/verbosity level via RUST_LOG
    std::env::set_var("RUST_LOG", args.verbosity.to_string());

    // initialize env_logger crate for logging/verbosity level
    env_logger::init();

    // check which CLI command we're running (mutations, poptree, trunk, mtree, filter)
    match args.command {
        cli::Command::Mutations(args) => _ = run::mutations(&args)?,
        cli::Command::Poptree(args) => _ = run::poptree(&args)?,
        cli::Command::Trunk(args) => _ = run::trunk(&args)?,
        cli::Command::Mtree(args) => _ = run::mtree(&args)?,
        cli::Command::Filter(args) => _ = run::filter(&args)?,
    }

    Ok(())
}
