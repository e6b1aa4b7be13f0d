//! Run the subcommands on a repertoire of lineage trees.

pub mod filter;
pub mod mtree;
pub mod mutations;
pub mod poptree;
pub mod trunk;
#[cfg(test)]
mod tests;

#[doc(inline)]
pub use filter::filter;
#[doc(inline)]
pub use mtree::mtree;
#[doc(inline)]
pub use mutations::mutations;
#[doc(inline)]
pub use poptree::poptree;
#[doc(inline)]
pub use trunk::trunk;

use crate::linkage::{airr, tree, tree::Tree};
use crate::table::Table;
use crate::utils;

use clap::Args as ClapArgs;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use indoc::formatdoc;
use log::{debug, info, warn};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

// ----------------------------------------------------------------------------
// Input
// ----------------------------------------------------------------------------

/// Input and output arguments shared by every subcommand.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, ClapArgs)]
pub struct Input {
    /// Newick tree files, or directories of tree files.
    #[clap(long, num_args = 1.., required_unless_present = "json")]
    pub tree: Vec<PathBuf>,

    /// AIRR clone JSON with trees and node sequences.
    #[clap(short = 'j', long, conflicts_with = "tree")]
    pub json: Option<PathBuf>,

    /// Sample name, the prefix of every output table.
    #[clap(short = 'n', long, default_value_t = Input::default().name)]
    pub name: String,

    /// Number of CPU threads to use.
    #[clap(short = 't', long, default_value_t = Input::default().threads)]
    #[serde(skip)]
    pub threads: usize,

    /// Analyse a random sample of this many trees.
    #[clap(short = 's', long)]
    pub sample: Option<usize>,

    /// Output directory.
    ///
    /// If the directory does not exist, it will be created.
    #[clap(short = 'o', long, required = true)]
    pub output_dir: PathBuf,
}

impl Default for Input {
    fn default() -> Self {
        Input {
            tree: Vec::new(),
            json: None,
            name: "repertoire".to_string(),
            threads: 1,
            sample: None,
            output_dir: PathBuf::new(),
        }
    }
}

impl Input {
    /// Read the trees from the Newick files or the AIRR clone JSON.
    pub fn read_trees(&self) -> Result<Vec<Tree>, Report> {
        let trees = match &self.json {
            Some(json) => airr::trees(&airr::read_clones(json)?),
            None => tree::read_trees(&self.tree)?,
        };
        if trees.is_empty() {
            return Err(eyre!("No trees were found in the input."));
        }
        info!("Trees read: {}", trees.len());
        Ok(trees)
    }

    /// Keep a random sample of the items if `--sample` is set.
    pub fn sample<T>(&self, items: Vec<T>) -> Vec<T> {
        match self.sample {
            Some(n) if n < items.len() => {
                info!("Sampling {n} of {} trees.", items.len());
                utils::sample(items, n)
            }
            _ => items,
        }
    }
}

// ----------------------------------------------------------------------------
// Workers
// ----------------------------------------------------------------------------

/// Map every item in a pool of `min(threads, items)` workers, keeping the item order.
pub fn par_map<T, R, F>(items: Vec<T>, threads: usize, f: F) -> Result<Vec<R>, Report>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    let threads = threads.clamp(1, items.len().max(1));
    debug!("Starting {threads} worker threads.");
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .wrap_err("Failed to build the worker thread pool.")?;

    let progress_bar_style = ProgressStyle::with_template(
        "{bar:40} {pos}/{len} ({percent}%) | Trees / Second: {per_sec} | Elapsed: {elapsed_precise}",
    )
    .wrap_err("Failed to create progress bar from template.")?;
    let progress_bar = ProgressBar::new(items.len() as u64).with_style(progress_bar_style);

    let results =
        pool.install(|| items.into_par_iter().progress_with(progress_bar.clone()).map(f).collect());
    progress_bar.finish();

    Ok(results)
}

/// Per-tree results keyed by tree id, and the ids and reasons of the dropped trees.
#[derive(Debug)]
pub struct TreeResults<T> {
    pub kept: BTreeMap<String, T>,
    pub dropped: Vec<(String, Report)>,
}

impl<T> Default for TreeResults<T> {
    fn default() -> Self {
        TreeResults { kept: BTreeMap::new(), dropped: Vec::new() }
    }
}

impl<T> TreeResults<T> {
    /// Sort results by tree id, every failed tree is logged with its reason.
    pub fn new(results: Vec<(String, Result<T, Report>)>) -> Self {
        let mut tree_results = TreeResults::default();
        for (id, result) in results {
            tree_results.add(id, result);
        }
        tree_results
    }

    pub fn add(&mut self, id: String, result: Result<T, Report>) {
        match result {
            Ok(value) => {
                if self.kept.insert(id.clone(), value).is_some() {
                    warn!("Tree id {id} is not unique, only the last tree is kept.");
                }
            }
            Err(e) => {
                warn!("Dropping tree {id}: {e:#}");
                self.dropped.push((id, e));
            }
        }
    }

    /// Log the number of analysed and dropped trees.
    pub fn log_summary(&self) {
        let dropped = self.dropped.iter().map(|(id, _e)| id.as_str()).collect::<Vec<_>>();
        info!(
            "{}",
            formatdoc!(
                "Trees analysed: {}
                Trees dropped: {} {dropped:?}",
                self.kept.len(),
                dropped.len(),
            )
        );
    }
}

// ----------------------------------------------------------------------------
// Outputs
// ----------------------------------------------------------------------------

/// Write the subcommand arguments as JSON to `<output_dir>/<command>_args.json`.
///
/// ```rust
/// use igtreez::run::{poptree, write_args};
///
/// let dir = tempfile::tempdir()?;
/// let args = poptree::Args::default();
/// write_args(&args, dir.path(), "poptree")?;
/// assert!(dir.path().join("poptree_args.json").exists());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn write_args<A>(args: &A, output_dir: &Path, command: &str) -> Result<(), Report>
where
    A: Serialize + Debug,
{
    let path = output_dir.join(format!("{command}_args.json"));
    let output = serde_json::to_string_pretty(args)
        .wrap_err_with(|| format!("Failed to serialize arguments: {args:?}"))?;
    std::fs::write(&path, output).wrap_err_with(|| format!("Failed to write arguments: {path:?}"))?;
    Ok(())
}

/// Write a table to `<output_dir>/<name>_<suffix>.csv`.
pub fn write_table(table: &mut Table, output_dir: &Path, name: &str, suffix: &str) -> Result<PathBuf, Report> {
    let path = output_dir.join(format!("{name}_{suffix}.csv"));
    info!("Writing table: {path:?}");
    table.write(&path)?;
    Ok(path)
}
