//! Read lineage trees from Newick files.

use crate::utils;

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use igtreez_phylo::{FromNewick, Phylogeny};
use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// A lineage tree and its id.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Tree {
    /// The file stem of a Newick file, or the clone id of an AIRR clone.
    pub id: String,
    pub phylogeny: Phylogeny,
}

impl Tree {
    /// Read a tree from a Newick file, the tree id is the file stem.
    ///
    /// ```rust
    /// use igtreez::linkage::tree::Tree;
    ///
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("clone_12.newick");
    /// std::fs::write(&path, "((A:1,B:2)C:1)GL;")?;
    ///
    /// let tree = Tree::read(&path)?;
    /// assert_eq!(tree.id, "clone_12");
    /// assert_eq!(tree.phylogeny.len(), 4);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn read<P>(path: &P) -> Result<Self, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let newick = std::fs::read_to_string(path)
            .wrap_err_with(|| eyre!("Failed to read tree file: {path:?}"))?;
        let phylogeny = Phylogeny::from_newick(newick.trim())
            .wrap_err_with(|| eyre!("Failed to parse Newick tree: {path:?}"))?;
        Ok(Tree { id: utils::file_stem(path)?, phylogeny })
    }
}

/// Returns the files named by `paths`, with every directory replaced by its files in sorted order.
///
/// Fails if a path does not exist.
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, Report> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let entries = std::fs::read_dir(path)
                .wrap_err_with(|| eyre!("Failed to read directory: {path:?}"))?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<Result<Vec<_>, _>>()
                .wrap_err_with(|| eyre!("Failed to list directory: {path:?}"))?;
            files.extend(entries.into_iter().filter(|p| p.is_file()).sorted());
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(eyre!("The file {path:?} does not exist.")
                .suggestion("Check the paths given to --tree and --fasta."));
        }
    }
    Ok(files)
}

/// Read every tree in `paths` (files or directories).
///
/// Files that cannot be parsed are skipped with a warning. Fails if no tree is left.
pub fn read_trees(paths: &[PathBuf]) -> Result<Vec<Tree>, Report> {
    let files = collect_files(paths)?;
    debug!("Reading {} tree files.", files.len());

    let trees: Vec<Tree> = files
        .iter()
        .filter_map(|path| match Tree::read(path) {
            Ok(tree) => Some(tree),
            Err(e) => {
                warn!("Skipping tree {path:?}: {e:#}");
                None
            }
        })
        .collect();

    if trees.is_empty() {
        return Err(eyre!("Could not find trees in: {paths:?}")
            .suggestion("Trees must be Newick files, or directories of Newick files."));
    }
    Ok(trees)
}
