//! Select the trees of a repertoire by their populations or their size.

#[cfg(test)]
mod tests;

use crate::poptree::Populations;

use color_eyre::eyre::{eyre, Report, Result};
use color_eyre::Help;
use igtreez_phylo::Phylogeny;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Leaves whose name contains this are not counted.
pub const GERMLINE_LEAF: &str = "Germline";

// ----------------------------------------------------------------------------
// Tree Content
// ----------------------------------------------------------------------------

/// What a filter can see of a tree.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TreeContent {
    /// Population patterns found in any node name.
    pub populations: BTreeSet<String>,
    /// Number of nodes, the root excluded.
    pub nodes: usize,
    /// Number of leaves, germline leaves excluded.
    pub leaves: usize,
}

impl TreeContent {
    pub fn new(phylogeny: &Phylogeny, populations: Option<&Populations>) -> Result<Self, Report> {
        let mut found = BTreeSet::new();
        if let Some(populations) = populations {
            for node in phylogeny.graph.node_weights() {
                found.extend(populations.matches(node.label()).into_iter().map(String::from));
            }
        }
        let leaves = phylogeny
            .get_leaves()?
            .into_iter()
            .map(|n| phylogeny.get_node(n).map(|node| node.label().contains(GERMLINE_LEAF)))
            .collect::<Result<Vec<_>, Report>>()?;

        Ok(TreeContent {
            populations: found,
            nodes: phylogeny.len().saturating_sub(1),
            leaves: leaves.into_iter().filter(|germline| !germline).count(),
        })
    }
}

// ----------------------------------------------------------------------------
// Filters
// ----------------------------------------------------------------------------

/// How the population patterns of a filter combine.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Logic {
    /// Every population is present.
    And,
    /// At least one population is present.
    Or,
    /// No population is present.
    Not,
}

/// An inclusive size range, open ended when there is no maximum.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SizeRange {
    pub min: usize,
    pub max: Option<usize>,
}

impl SizeRange {
    /// Returns the range of one (minimum) or two (minimum, maximum) bounds.
    ///
    /// ```rust
    /// use igtreez::filter::SizeRange;
    /// let range = SizeRange::from_bounds(&[3, 10])?;
    /// assert!(range.contains(3) && range.contains(10) && !range.contains(11));
    /// assert!(SizeRange::from_bounds(&[3])?.contains(1000));
    /// assert!(SizeRange::from_bounds(&[10, 3]).is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn from_bounds(bounds: &[usize]) -> Result<Self, Report> {
        match bounds {
            [min] => Ok(SizeRange { min: *min, max: None }),
            [min, max] if min <= max => Ok(SizeRange { min: *min, max: Some(*max) }),
            _ => Err(eyre!("Invalid size range: {bounds:?}")
                .suggestion("Give a minimum size, or a minimum and a maximum size.")),
        }
    }

    pub fn contains(&self, size: usize) -> bool {
        size >= self.min && self.max.map_or(true, |max| size <= max)
    }

    /// Name of the range, as in `more_than_3_and_less_than_10`.
    pub fn name(&self) -> String {
        match self.max {
            Some(max) => format!("more_than_{}_and_less_than_{max}", self.min),
            None => format!("more_than_{}", self.min),
        }
    }
}

/// One criterion that a tree passes or fails.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum TreeFilter {
    Populations { logic: Logic, patterns: Vec<String> },
    Nodes(SizeRange),
    Leaves(SizeRange),
}

impl TreeFilter {
    #[rustfmt::skip]
    pub fn accepts(&self, content: &TreeContent) -> bool {
        match self {
            TreeFilter::Populations { logic: Logic::And, patterns } => patterns.iter().all(|p| content.populations.contains(p)),
            TreeFilter::Populations { logic: Logic::Or, patterns }  => patterns.iter().any(|p| content.populations.contains(p)),
            TreeFilter::Populations { logic: Logic::Not, patterns } => !patterns.iter().any(|p| content.populations.contains(p)),
            TreeFilter::Nodes(range)  => range.contains(content.nodes),
            TreeFilter::Leaves(range) => range.contains(content.leaves),
        }
    }

    /// Name of the filter, the suffix of its output table.
    ///
    /// ```rust
    /// use igtreez::filter::{Logic, SizeRange, TreeFilter};
    /// let patterns = vec!["GC".to_string(), "PB".to_string()];
    /// assert_eq!(TreeFilter::Populations { logic: Logic::Or, patterns: patterns.clone() }.name(), "GC_or_PB");
    /// assert_eq!(TreeFilter::Populations { logic: Logic::Not, patterns }.name(), "not_GC_not_PB");
    /// assert_eq!(TreeFilter::Leaves(SizeRange { min: 2, max: None }).name(), "more_than_2_leaves");
    /// ```
    pub fn name(&self) -> String {
        match self {
            TreeFilter::Populations { logic: Logic::And, patterns } => patterns.join("_and_"),
            TreeFilter::Populations { logic: Logic::Or, patterns } => patterns.join("_or_"),
            TreeFilter::Populations { logic: Logic::Not, patterns } => format!("not_{}", patterns.join("_not_")),
            TreeFilter::Nodes(range) => format!("{}_nodes", range.name()),
            TreeFilter::Leaves(range) => format!("{}_leaves", range.name()),
        }
    }

    /// Returns the population patterns of every filter, without repeats.
    pub fn patterns(filters: &[TreeFilter]) -> Vec<String> {
        let mut patterns: Vec<String> = Vec::new();
        for filter in filters {
            if let TreeFilter::Populations { patterns: p, .. } = filter {
                patterns.extend(p.iter().filter(|p| !p.is_empty()).cloned());
            }
        }
        patterns.sort();
        patterns.dedup();
        patterns
    }
}
