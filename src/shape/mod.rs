//! Describe the shape of lineage trees: degrees, trunk, and path lengths.

#[cfg(test)]
mod tests;

use crate::utils;

use color_eyre::eyre::{eyre, Report, Result};
use igtreez_phylo::{NodeIndex, Phylogeny};
use serde::{Deserialize, Serialize};

/// Columns of the shape table, after the sample.
pub const SHAPE_COLUMNS: [&str; 11] = [
    "tree_id",
    "clone_id",
    "nodes",
    "leaves",
    "od_avg",
    "rootd",
    "drsn_min",
    "dasn_min",
    "trunk",
    "dlfsn_avg",
    "pl_min",
];

// ----------------------------------------------------------------------------
// Tree Shape
// ----------------------------------------------------------------------------

/// Shape statistics of one tree.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TreeShape {
    pub tree_id: String,
    pub clone_id: String,
    /// Number of nodes, the root excluded.
    pub nodes: usize,
    pub leaves: usize,
    /// Mean of the [`outgoing_degrees`].
    pub od_avg: f32,
    /// Number of children of the root.
    pub rootd: usize,
    /// Shortest distance from the root to a split node, the root excluded.
    pub drsn_min: Option<f32>,
    /// Shortest branch.
    pub dasn_min: f32,
    /// Length of the [`trunk`].
    pub trunk: f32,
    /// Mean distance from the leaves to the first split node.
    pub dlfsn_avg: f32,
    /// Shortest distance from the root to a leaf.
    pub pl_min: f32,
}

impl TreeShape {
    /// Describe a tree, fails if the tree is only a root.
    ///
    /// ```rust
    /// use igtreez::shape::TreeShape;
    /// use igtreez_phylo::{FromNewick, Phylogeny};
    ///
    /// let phylogeny = Phylogeny::from_newick("(A:1,B:3)GL;")?;
    /// let shape = TreeShape::new("clone_7", &phylogeny)?;
    /// assert_eq!(shape.clone_id, "7");
    /// assert_eq!(shape.trunk, 2.0);
    /// assert_eq!(shape.drsn_min, None);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn new(tree_id: &str, phylogeny: &Phylogeny) -> Result<Self, Report> {
        let root = phylogeny.get_root_index()?;
        if phylogeny.len() < 2 {
            return Err(eyre!("Tree {tree_id} has no nodes besides its root."));
        }

        let distances = phylogeny.distances_to_root()?;
        let non_root = phylogeny.preorder()?.into_iter().filter(|n| *n != root).collect::<Vec<_>>();
        let branches = non_root.iter().map(|n| phylogeny.branch_length(*n)).collect::<Vec<_>>();
        let split_distances = non_root
            .iter()
            .filter(|n| phylogeny.get_children(**n).len() > 1)
            .map(|n| distances[n.index()])
            .collect::<Vec<_>>();

        let (trunk, split) = trunk(phylogeny)?;
        let split_distance = distances[split.index()];
        let leaf_paths = phylogeny
            .get_leaves()?
            .into_iter()
            .map(|n| distances[n.index()])
            .collect::<Vec<_>>();
        let split_paths = leaf_paths.iter().map(|d| d - split_distance).collect::<Vec<_>>();

        let degrees = outgoing_degrees(phylogeny)?;

        Ok(TreeShape {
            tree_id: tree_id.to_string(),
            clone_id: utils::clone_number(tree_id),
            nodes: non_root.len(),
            leaves: leaf_paths.len(),
            od_avg: mean(&degrees.iter().map(|d| *d as f32).collect::<Vec<_>>()),
            rootd: phylogeny.get_children(root).len(),
            drsn_min: minimum(&split_distances),
            dasn_min: minimum(&branches).unwrap_or_default(),
            trunk,
            dlfsn_avg: mean(&split_paths),
            pl_min: minimum(&leaf_paths).unwrap_or_default(),
        })
    }

    /// Returns the row of the shape table.
    pub fn to_row(&self, sample: &str) -> Vec<String> {
        vec![
            sample.to_string(),
            self.tree_id.clone(),
            self.clone_id.clone(),
            self.nodes.to_string(),
            self.leaves.to_string(),
            self.od_avg.to_string(),
            self.rootd.to_string(),
            self.drsn_min.map(|d| d.to_string()).unwrap_or_default(),
            self.dasn_min.to_string(),
            self.trunk.to_string(),
            self.dlfsn_avg.to_string(),
            self.pl_min.to_string(),
        ]
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns the outgoing degree of every internal node.
///
/// A branch of length `d` below the trunk also holds `d - 1` unsampled nodes
/// of degree one. Branches leaving the root are not expanded.
///
/// ```rust
/// use igtreez::shape::outgoing_degrees;
/// use igtreez_phylo::{FromNewick, Phylogeny};
///
/// let phylogeny = Phylogeny::from_newick("((A:1,(B:1,C:3)D:2)S:3)GL;")?;
/// let mut degrees = outgoing_degrees(&phylogeny)?;
/// degrees.sort();
/// assert_eq!(degrees, [1, 1, 2, 2]);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn outgoing_degrees(phylogeny: &Phylogeny) -> Result<Vec<usize>, Report> {
    let root = phylogeny.get_root_index()?;
    let mut degrees = Vec::new();
    for node_index in phylogeny.preorder()? {
        let children = phylogeny.get_children(node_index).len();
        if children == 0 {
            continue;
        }
        degrees.push(children);
        match phylogeny.get_parent(node_index) {
            Some(parent) if parent != root => {
                let hidden = (phylogeny.branch_length(node_index) as usize).saturating_sub(1);
                degrees.extend(std::iter::repeat(1).take(hidden));
            }
            _ => (),
        }
    }
    Ok(degrees)
}

/// Returns the trunk length and the node that ends it.
///
/// The trunk ends at the first node that does not have exactly one child.
/// When the root splits, the trunk is the mean length of the branches leaving it.
#[rustfmt::skip]
pub fn trunk(phylogeny: &Phylogeny) -> Result<(f32, NodeIndex), Report> {
    let root = phylogeny.get_root_index()?;
    let mut node_index = root;
    while let [child] = phylogeny.get_children(node_index).as_slice() { node_index = *child; }

    let length = match node_index == root {
        true => mean(&phylogeny.get_children(root).into_iter().map(|c| phylogeny.branch_length(c)).collect::<Vec<_>>()),
        false => phylogeny.distance_to_root(node_index),
    };
    Ok((length, node_index))
}

/// Mean of the values, 0 when there are none.
fn mean(values: &[f32]) -> f32 {
    match values.is_empty() {
        true => 0.0,
        false => values.iter().sum::<f32>() / values.len() as f32,
    }
}

fn minimum(values: &[f32]) -> Option<f32> {
    values.iter().copied().reduce(f32::min)
}
