//! [Command-line interface](Cli) (CLI) of the main binary.

use crate::run::{filter, mtree, mutations, poptree, trunk};
use crate::Verbosity;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

/// The command-line interface (CLI).
/// ---
/// The CLI is intended for parsing user input from the command-line in the main function. This is achieved with the `parse` function, which parses the command line arguments from [`std::env::args`](https://doc.rust-lang.org/std/env/fn.args.html).
/// ```no_run
/// use clap::Parser;
/// let args = igtreez::Cli::parse();
/// ```
/// The command-line arguments from `std::env::args` are simply a vector of space separated strings. Here is a manual example of setting the command-line input:
/// ```rust
/// # use clap::Parser;
/// let input = ["igtreez", "poptree", "--tree", "trees/", "--pops", "GC", "PB", "--output-dir", "output/poptree"];
/// let args = igtreez::Cli::parse_from(input);
/// serde_json::to_string_pretty(&args)?;
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
/// With the following pretty JSON representation:
/// ```json
/// {
///   "command": {
///     "Poptree": {
///       "input": {
///         "tree": ["trees/"],
///         "json": null,
///         "name": "repertoire",
///         "sample": null,
///         "output_dir": "output/poptree"
///       },
///       "pops": ["GC", "PB"],
///       "zero": false,
///       "max_dist": null
///     }
///   },
///   "verbosity": "Info"
/// }
/// ```
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(name = "igtreez", author, version)]
#[clap(about = "igtreez analyses mutations and population transitions in B-cell lineage trees.")]
pub struct Cli {
    #[clap(subcommand)]
    /// Pass CLI arguments to a particular [Command].
    #[clap(help = "Set the command.")]
    pub command: Command,

    /// Set the output [Verbosity] level.
    #[clap(short = 'v', long)]
    #[clap(value_enum, default_value_t = Verbosity::default())]
    #[clap(hide_possible_values = false)]
    #[clap(global = true)]
    #[clap(help = "Set the output verbosity level.")]
    pub verbosity: Verbosity,
}

/// CLI [commands](#variants). Used to decide which runtime [Command](#variants) the CLI arguments should be passed to.
///
#[derive(Debug, Deserialize, Serialize, Subcommand)]
pub enum Command {
    /// Pass CLI arguments to the [mutations](crate::run::mutations()) method.
    /// <br>
    /// ```rust
    /// use igtreez::{cli::Command, Cli};
    /// use clap::Parser;
    /// let input = ["igtreez", "mutations", "--json", "clones.json", "--selection", "-o", "output"];
    /// let args = Cli::parse_from(input);
    /// match args.command {
    ///     Command::Mutations(args) => assert!(args.selection),
    ///     _ => unreachable!(),
    /// }
    /// ```
    #[clap(about = "Count and classify the mutations of lineage trees.")]
    Mutations(mutations::Args),

    /// Pass CLI arguments to the [poptree](crate::run::poptree()) method.
    #[clap(about = "Count transitions between cell populations in lineage trees.")]
    Poptree(poptree::Args),

    /// Pass CLI arguments to the [trunk](crate::run::trunk()) method.
    #[clap(about = "Remove the trunk of lineage trees.")]
    Trunk(trunk::Args),

    /// Pass CLI arguments to the [mtree](crate::run::mtree()) method.
    #[clap(about = "Describe the shape of lineage trees.")]
    Mtree(mtree::Args),

    /// Pass CLI arguments to the [filter](crate::run::filter()) method.
    /// <br>
    /// ```rust
    /// use igtreez::{cli::Command, Cli};
    /// use clap::Parser;
    /// let input = ["igtreez", "filter", "--tree", "trees/", "--or", "GC", "PB", "--nodes", "5", "-o", "output"];
    /// let args = Cli::parse_from(input);
    /// match args.command {
    ///     Command::Filter(args) => assert_eq!(args.nodes, [5]),
    ///     _ => unreachable!(),
    /// }
    /// ```
    #[clap(about = "Select lineage trees by their populations or their size.")]
    Filter(filter::Args),
}
