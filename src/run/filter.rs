//! List, and optionally copy, the trees of a repertoire that pass a filter.

use crate::filter::{Logic, SizeRange, TreeContent, TreeFilter};
use crate::linkage::tree::Tree;
use crate::poptree::Populations;
use crate::run::{par_map, write_args, write_table, Input, TreeResults};
use crate::table::Table;
use crate::utils;

use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use igtreez_phylo::ToNewick;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Select lineage trees by their populations or their size.
#[derive(Clone, Debug, Default, Deserialize, Parser, PartialEq, Serialize)]
pub struct Args {
    #[clap(flatten)]
    pub input: Input,

    /// Trees with every one of these populations.
    #[clap(long, num_args = 1..)]
    pub and: Vec<String>,

    /// Trees with at least one of these populations.
    #[clap(long, num_args = 1..)]
    pub or: Vec<String>,

    /// Trees with none of these populations.
    #[clap(long, num_args = 1..)]
    pub not: Vec<String>,

    /// Trees with at least MIN, and at most MAX, nodes besides the root.
    #[clap(long, num_args = 1..=2, value_names = ["MIN", "MAX"])]
    pub nodes: Vec<usize>,

    /// Trees with at least MIN, and at most MAX, leaves.
    #[clap(long, num_args = 1..=2, value_names = ["MIN", "MAX"])]
    pub leaves: Vec<usize>,

    /// Also write the selected trees to a directory per filter.
    #[clap(long)]
    pub copy: bool,
}

impl Args {
    /// Returns the filters that were given, in the order and, or, not, nodes, leaves.
    pub fn filters(&self) -> Result<Vec<TreeFilter>, Report> {
        let mut filters = Vec::new();
        for (logic, patterns) in [(Logic::And, &self.and), (Logic::Or, &self.or), (Logic::Not, &self.not)] {
            if !patterns.is_empty() {
                filters.push(TreeFilter::Populations { logic, patterns: patterns.clone() });
            }
        }
        if !self.nodes.is_empty() {
            filters.push(TreeFilter::Nodes(SizeRange::from_bounds(&self.nodes)?));
        }
        if !self.leaves.is_empty() {
            filters.push(TreeFilter::Leaves(SizeRange::from_bounds(&self.leaves)?));
        }
        if filters.is_empty() {
            return Err(eyre!("No filter was given.").suggestion("Use --and, --or, --not, --nodes, or --leaves."));
        }
        Ok(filters)
    }
}

/// Apply every filter and write one table of selected tree ids per filter.
///
/// Filters that select no tree write nothing. Returns the selected tree ids, keyed by filter name.
pub fn filter(args: &Args) -> Result<BTreeMap<String, Vec<String>>, Report> {
    let filters = args.filters()?;
    let output_dir = utils::create_dir(&args.input.output_dir)?;
    write_args(args, &output_dir, "filter")?;

    let patterns = TreeFilter::patterns(&filters);
    let populations = match patterns.is_empty() {
        true => None,
        false => Some(Populations::new(&patterns, false, None)?),
    };

    let trees = args.input.sample(args.input.read_trees()?);
    let contents = par_map(trees.iter().collect(), args.input.threads, |tree: &Tree| {
        (tree.id.clone(), TreeContent::new(&tree.phylogeny, populations.as_ref()))
    })?;
    let results = TreeResults::new(contents);
    results.log_summary();

    let mut selected = BTreeMap::new();
    for filter in &filters {
        let name = filter.name();
        let ids: Vec<String> =
            results.kept.iter().filter(|(_id, content)| filter.accepts(content)).map(|(id, _)| id.clone()).collect();
        if ids.is_empty() {
            warn!("No trees passed the filter {name}.");
            continue;
        }
        info!("Trees passing the filter {name}: {}", ids.len());

        let mut table = Table::with_headers(&["tree_id"]);
        for id in &ids {
            table.add_row(vec![id.clone()])?;
        }
        write_table(&mut table, &output_dir, &args.input.name, &name)?;

        if args.copy {
            let copy_dir = utils::create_dir(&output_dir.join(&name))?;
            for tree in trees.iter().filter(|tree| ids.contains(&tree.id)) {
                let path = copy_dir.join(format!("{}.newick", tree.id));
                let newick = tree.phylogeny.to_newick()?;
                std::fs::write(&path, format!("{newick}\n"))
                    .wrap_err_with(|| eyre!("Failed to write tree: {path:?}"))?;
            }
            info!("Copied the trees to: {copy_dir:?}");
        }
        selected.insert(name, ids);
    }

    info!("Done.");
    Ok(selected)
}
