//! Describe the shape of every tree in a repertoire.

use crate::run::{par_map, write_args, write_table, Input, TreeResults};
use crate::shape::{TreeShape, SHAPE_COLUMNS};
use crate::table::Table;
use crate::utils;

use clap::Parser;
use color_eyre::eyre::{Report, Result};
use log::info;
use serde::{Deserialize, Serialize};

/// Describe the shape of lineage trees.
#[derive(Clone, Debug, Default, Deserialize, Parser, PartialEq, Serialize)]
pub struct Args {
    #[clap(flatten)]
    pub input: Input,
}

/// Describe every tree and write `<name>_mtree.csv`.
///
/// Returns the shapes, keyed by tree id.
///
/// ```rust
/// use igtreez::run::{mtree, mtree::Args};
///
/// let dir = tempfile::tempdir()?;
/// let tree = dir.path().join("clone_1.newick");
/// std::fs::write(&tree, "((A:1,B:2)I:3)GL;")?;
///
/// let mut args = Args::default();
/// args.input.tree = vec![tree];
/// args.input.output_dir = dir.path().join("mtree");
///
/// let shapes = mtree(&args)?;
/// assert_eq!(shapes.kept["clone_1"].trunk, 3.0);
/// assert!(dir.path().join("mtree/repertoire_mtree.csv").exists());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn mtree(args: &Args) -> Result<TreeResults<TreeShape>, Report> {
    let output_dir = utils::create_dir(&args.input.output_dir)?;
    write_args(args, &output_dir, "mtree")?;

    let trees = args.input.sample(args.input.read_trees()?);
    let shapes = par_map(trees, args.input.threads, |tree| {
        let shape = TreeShape::new(&tree.id, &tree.phylogeny);
        (tree.id, shape)
    })?;
    let results = TreeResults::new(shapes);
    results.log_summary();

    let mut headers = vec!["sample"];
    headers.extend(SHAPE_COLUMNS);
    let mut table = Table::with_headers(&headers);
    for shape in results.kept.values() {
        table.add_row(shape.to_row(&args.input.name))?;
    }
    write_table(&mut table, &output_dir, &args.input.name, "mtree")?;

    info!("Done.");
    Ok(results)
}
