//! Count population transitions in every tree of a repertoire.

use crate::poptree::{PoptreeReport, Populations};
use crate::run::{par_map, write_args, write_table, Input, TreeResults};
use crate::utils;

use clap::Parser;
use color_eyre::eyre::{Report, Result};
use log::info;
use serde::{Deserialize, Serialize};

/// Count transitions between cell populations along the paths of lineage trees.
#[derive(Clone, Debug, Deserialize, Parser, PartialEq, Serialize)]
pub struct Args {
    #[clap(flatten)]
    pub input: Input,

    /// Population patterns, a node belongs to every population whose pattern is part of its name.
    #[clap(short = 'p', long, num_args = 1.., required = true)]
    pub pops: Vec<String>,

    /// Count a zero-length transition between the populations of nodes that match several patterns.
    #[clap(short = 'z', long)]
    pub zero: bool,

    /// Longest transition to count, in branch length units.
    #[clap(short = 'm', long)]
    pub max_dist: Option<f32>,
}

impl Default for Args {
    fn default() -> Self {
        Args { input: Input::default(), pops: Vec::new(), zero: false, max_dist: None }
    }
}

/// Walk every tree, then write the repertoire and per-tree transition tables.
pub fn poptree(args: &Args) -> Result<PoptreeReport, Report> {
    let output_dir = utils::create_dir(&args.input.output_dir)?;
    write_args(args, &output_dir, "poptree")?;

    let populations = Populations::new(&args.pops, args.zero, args.max_dist)?;
    info!("Populations: {:?}", populations.patterns);

    let trees = args.input.sample(args.input.read_trees()?);
    let walked = par_map(trees, args.input.threads, |tree| {
        let observed = populations.walk(&tree.id, &tree.phylogeny);
        (tree.id, observed)
    })?;
    let results = TreeResults::new(walked);
    results.log_summary();

    let report = PoptreeReport::new(&args.input.name, &populations, results.kept.into_values().collect());
    info!("Transitions found: {}", report.transition_count());

    for (suffix, mut table) in report.tables()? {
        write_table(&mut table, &output_dir, &args.input.name, suffix)?;
    }

    info!("Done.");
    Ok(report)
}
