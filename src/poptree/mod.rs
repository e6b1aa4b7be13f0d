//! Count transitions between populations along the paths of lineage trees.
//!
//! A node belongs to a population when the population pattern occurs in its
//! name. Nodes that match two or more patterns are ambiguous, they never
//! start or end a transition.

pub mod normalize;
pub mod report;

#[doc(inline)]
pub use normalize::{normalize_by_dest, normalize_by_source};
#[doc(inline)]
pub use report::PoptreeReport;

use color_eyre::eyre::{eyre, Report, Result};
use igtreez_phylo::{NodeIndex, Phylogeny};
use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A (source, destination) pair of populations.
pub type TransitionKey = (String, String);

/// Distances of every transition, keyed by population pair.
pub type Transitions = BTreeMap<TransitionKey, Vec<f32>>;

/// Distances from the root of every population member, keyed by population.
pub type PopulationLevels = BTreeMap<String, Vec<f32>>;

// ----------------------------------------------------------------------------
// Populations
// ----------------------------------------------------------------------------

/// Population patterns and the options of the walk.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Populations {
    /// Substring patterns, in the order given by the user.
    pub patterns: Vec<String>,
    /// Count a zero-length transition between every pair of populations in an ambiguous node.
    pub zero: bool,
    /// Longest transition that is counted.
    pub max_dist: Option<f32>,
}

impl Populations {
    /// Returns the populations of `patterns`, dropping empty and repeated patterns.
    ///
    /// Fails if no pattern is left.
    pub fn new(patterns: &[String], zero: bool, max_dist: Option<f32>) -> Result<Self, Report> {
        let mut kept: Vec<String> = Vec::new();
        for pattern in patterns {
            if pattern.is_empty() || kept.contains(pattern) {
                warn!("Ignoring the population pattern {pattern:?}.");
                continue;
            }
            kept.push(pattern.clone());
        }
        if kept.is_empty() {
            return Err(eyre!("No population patterns were given: {patterns:?}"));
        }
        Ok(Populations { patterns: kept, zero, max_dist })
    }

    /// Returns the patterns found in a node name, in input order.
    ///
    /// ```rust
    /// use igtreez::poptree::Populations;
    /// let pops = Populations::new(&["GC".into(), "PB".into()], false, None)?;
    /// assert_eq!(pops.matches("GC_12"), ["GC"]);
    /// assert_eq!(pops.matches("PB_GC_3"), ["GC", "PB"]);
    /// assert!(pops.matches("MEM_1").is_empty());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn matches(&self, name: &str) -> Vec<&str> {
        self.patterns.iter().filter(|p| name.contains(p.as_str())).map(|p| p.as_str()).collect()
    }

    /// Returns the position of a pattern in the input order.
    pub fn position(&self, pattern: &str) -> Option<usize> {
        self.patterns.iter().position(|p| p == pattern)
    }

    /// Walk every leaf-to-root path of a tree and collect its transitions and population levels.
    ///
    /// - The two most recent unambiguous nodes of a path are tracked. A node
    ///   of the same population as the newer one replaces it, a node of a
    ///   different population records a transition from its population to
    ///   the newer one's, then becomes the newer one.
    /// - A transition measures the branch lengths between its two nodes and
    ///   is recorded once per pair of nodes, however many paths share it.
    /// - Every unambiguous node records its distance from the root once.
    ///
    /// ```rust
    /// use igtreez::poptree::Populations;
    /// use igtreez_phylo::{FromNewick, Phylogeny};
    ///
    /// let pops = Populations::new(&["GC".into(), "PB".into()], false, None)?;
    /// let phylogeny = Phylogeny::from_newick("((PB_1:1,PB_2:2)GC_1:3)GL;")?;
    /// let observed = pops.walk("tree", &phylogeny)?;
    ///
    /// let key = ("GC".to_string(), "PB".to_string());
    /// assert_eq!(observed.transitions[&key], [1.0, 2.0]);
    /// assert_eq!(observed.populations["GC"], [3.0]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn walk(&self, tree_id: &str, phylogeny: &Phylogeny) -> Result<TreeTransitions, Report> {
        let mut observed = TreeTransitions::new(tree_id);

        let mut seen_pairs: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
        let mut seen_levels: HashSet<NodeIndex> = HashSet::new();
        let mut seen_ambiguous: HashSet<NodeIndex> = HashSet::new();
        let distances = phylogeny.distances_to_root()?;

        for leaf in phylogeny.get_leaves()? {
            let mut newer: Option<(NodeIndex, &str)> = None;

            for node in phylogeny.get_path_to_root(leaf) {
                let matched = self.matches(phylogeny.get_node(node)?.label());
                let pop = match matched.as_slice() {
                    [] => continue,
                    [pop] => *pop,
                    _ambiguous => {
                        if self.zero && seen_ambiguous.insert(node) {
                            for (source, dest) in matched.iter().tuple_combinations() {
                                observed.add_transition(source, dest, 0.0);
                            }
                        }
                        continue;
                    }
                };

                if seen_levels.insert(node) {
                    observed.add_level(pop, distances[node.index()]);
                }

                if let Some((newer_node, newer_pop)) = newer {
                    if newer_pop != pop {
                        let dist = distances[newer_node.index()] - distances[node.index()];
                        let within = self.max_dist.map_or(true, |max| dist <= max);
                        if within && seen_pairs.insert((node, newer_node)) {
                            observed.add_transition(pop, newer_pop, dist);
                        }
                    }
                }
                newer = Some((node, pop));
            }
        }

        Ok(observed)
    }
}

// ----------------------------------------------------------------------------
// Tree Transitions
// ----------------------------------------------------------------------------

/// Transitions and population levels of one tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeTransitions {
    pub tree_id: String,
    pub transitions: Transitions,
    pub populations: PopulationLevels,
}

impl TreeTransitions {
    pub fn new(tree_id: &str) -> Self {
        TreeTransitions { tree_id: tree_id.to_string(), ..Default::default() }
    }

    pub fn add_transition(&mut self, source: &str, dest: &str, dist: f32) {
        let key = (source.to_string(), dest.to_string());
        self.transitions.entry(key).or_default().push(dist);
    }

    pub fn add_level(&mut self, population: &str, dist: f32) {
        self.populations.entry(population.to_string()).or_default().push(dist);
    }

    /// Total number of transitions, all population pairs together.
    #[rustfmt::skip]
    pub fn transition_count(&self) -> usize { self.transitions.values().map(|d| d.len()).sum() }
}

/// Returns the output name of a pattern, without a leading `_`.
///
/// ```rust
/// use igtreez::poptree::display_name;
/// assert_eq!(display_name("_PB"), "PB");
/// assert_eq!(display_name("GC_"), "GC_");
/// ```
pub fn display_name(pattern: &str) -> &str {
    pattern.strip_prefix('_').unwrap_or(pattern)
}

/// Returns the output name of a transition, `A_to_B`.
pub fn transition_name((source, dest): &TransitionKey) -> String {
    format!("{}_to_{}", display_name(source), display_name(dest))
}
