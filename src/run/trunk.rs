//! Remove the trunk of every tree in a repertoire.

use crate::run::{par_map, write_args, Input, TreeResults};
use crate::utils;

use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use igtreez_phylo::ToNewick;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Re-root lineage trees at their first split and write them as Newick.
#[derive(Clone, Debug, Default, Deserialize, Parser, PartialEq, Serialize)]
pub struct Args {
    #[clap(flatten)]
    pub input: Input,
}

/// Write every tree without its trunk to `<output_dir>/<tree_id>.newick`.
///
/// Trees without a trunk, whose root already splits or that never split, are
/// skipped. Returns the written files, keyed by tree id.
///
/// ```rust
/// use igtreez::run::{trunk, trunk::Args};
///
/// let dir = tempfile::tempdir()?;
/// let tree = dir.path().join("clone_1.newick");
/// std::fs::write(&tree, "((A:1,B:2)I:3)GL;")?;
///
/// let mut args = Args::default();
/// args.input.tree = vec![tree];
/// args.input.output_dir = dir.path().join("trunk");
///
/// let written = trunk(&args)?;
/// let newick = std::fs::read_to_string(&written.kept["clone_1"])?;
/// assert_eq!(newick.trim(), "(A:1,B:2)I;");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn trunk(args: &Args) -> Result<TreeResults<PathBuf>, Report> {
    let output_dir = utils::create_dir(&args.input.output_dir)?;
    write_args(args, &output_dir, "trunk")?;

    let trees = args.input.sample(args.input.read_trees()?);
    let written = par_map(trees, args.input.threads, |tree| {
        let path = output_dir.join(format!("{}.newick", tree.id));
        let result = tree.phylogeny.remove_trunk().and_then(|trunkless| match trunkless {
            Some(phylogeny) => {
                let newick = phylogeny.to_newick()?;
                std::fs::write(&path, format!("{newick}\n"))
                    .wrap_err_with(|| eyre!("Failed to write tree: {path:?}"))?;
                Ok(Some(path))
            }
            None => Ok(None),
        });
        (tree.id, result)
    })?;

    let mut results = TreeResults::default();
    for (id, result) in written {
        match result {
            Ok(None) => info!("Tree {id} has no trunk and was skipped."),
            Ok(Some(path)) => results.add(id, Ok(path)),
            Err(e) => results.add(id, Err(e)),
        }
    }
    results.log_summary();
    info!("Done.");
    Ok(results)
}
