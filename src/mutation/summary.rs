//! Walk the branches of a lineage tree and count the mutations along them.

use crate::linkage::LinkedTree;
use crate::mutation::{Mutation, MutationTag, Region};
use crate::sequence::{first_non_gap, is_regular_nuc, rf_start};
use crate::utils;

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Columns that come before the tag counts.
const LEADING_COLUMNS: [&str; 9] = [
    "tree_id",
    "clone_id",
    "all_mutations",
    "cdr",
    "fwr",
    "mu_count_cdr_r",
    "mu_count_cdr_s",
    "mu_count_fwr_r",
    "mu_count_fwr_s",
];

/// Columns that come after the tag counts.
const TRAILING_COLUMNS: [&str; 5] =
    ["all_muts_by_tree_topology", "nodes", "sequences", "cdr3_end", "clonal_germline"];

/// Columns of the selection table.
pub const SELECTION_COLUMNS: [&str; 10] = [
    "sample",
    "tree_id",
    "clone_id",
    "clonal_germline",
    "mu_count_cdr_r",
    "mu_count_cdr_s",
    "mu_count_fwr_r",
    "mu_count_fwr_s",
    "cdr3_end",
    "sequences",
];

// ----------------------------------------------------------------------------
// Mutation Summary
// ----------------------------------------------------------------------------

/// Mutation counts of one tree.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MutationSummary {
    pub tree_id: String,
    /// Number in the tree id, or the whole id when it has none.
    pub clone_id: String,
    pub all_mutations: usize,
    /// Mutations in any CDR.
    pub cdr: usize,
    /// Mutations in any FWR.
    pub fwr: usize,
    pub mu_count_cdr_r: usize,
    pub mu_count_cdr_s: usize,
    pub mu_count_fwr_r: usize,
    pub mu_count_fwr_s: usize,
    /// Count of every [`MutationTag`], zero when never seen.
    pub tags: BTreeMap<MutationTag, usize>,
    /// Sum of the branch lengths of the tree.
    pub all_muts_by_tree_topology: f32,
    /// Number of nodes, excluding the root.
    pub nodes: usize,
    /// Number of sequences linked to the tree.
    pub sequences: usize,
    pub cdr3_end: Option<usize>,
    pub clonal_germline: String,
}

impl MutationSummary {
    /// Returns an empty summary for a tree.
    pub fn new(tree_id: &str) -> Self {
        MutationSummary {
            tree_id: tree_id.to_string(),
            clone_id: utils::clone_number(tree_id),
            all_mutations: 0,
            cdr: 0,
            fwr: 0,
            mu_count_cdr_r: 0,
            mu_count_cdr_s: 0,
            mu_count_fwr_r: 0,
            mu_count_fwr_s: 0,
            tags: MutationTag::iter().map(|tag| (tag, 0)).collect(),
            all_muts_by_tree_topology: 0.0,
            nodes: 0,
            sequences: 0,
            cdr3_end: None,
            clonal_germline: String::new(),
        }
    }

    /// Counts one mutation from its tags.
    pub fn add(&mut self, tags: &[MutationTag]) {
        self.all_mutations += 1;
        for tag in tags {
            *self.tags.entry(*tag).or_default() += 1;
        }

        let (r, s) = (tags.contains(&MutationTag::R), tags.contains(&MutationTag::S));
        match tags.iter().find_map(|tag| tag.region()) {
            Some(region) if region.is_cdr() => {
                self.cdr += 1;
                self.mu_count_cdr_r += r as usize;
                // silent changes count in CDR1 and CDR2 only
                if region != Region::Cdr3 {
                    self.mu_count_cdr_s += s as usize;
                }
            }
            Some(_) => {
                self.fwr += 1;
                self.mu_count_fwr_r += r as usize;
                self.mu_count_fwr_s += s as usize;
            }
            None => (),
        }
    }

    /// Returns the count of one tag.
    #[rustfmt::skip]
    pub fn count(&self, tag: MutationTag) -> usize { self.tags.get(&tag).copied().unwrap_or_default() }

    /// Returns the column names of [`MutationSummary::to_row`].
    pub fn headers() -> Vec<String> {
        LEADING_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(MutationTag::iter().map(|tag| tag.to_string()))
            .chain(TRAILING_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }

    /// Returns the summary as a table row.
    pub fn to_row(&self) -> Vec<String> {
        let leading = [
            self.tree_id.clone(),
            self.clone_id.clone(),
            self.all_mutations.to_string(),
            self.cdr.to_string(),
            self.fwr.to_string(),
            self.mu_count_cdr_r.to_string(),
            self.mu_count_cdr_s.to_string(),
            self.mu_count_fwr_r.to_string(),
            self.mu_count_fwr_s.to_string(),
        ];
        let trailing = [
            self.all_muts_by_tree_topology.to_string(),
            self.nodes.to_string(),
            self.sequences.to_string(),
            self.cdr3_end.map(|end| end.to_string()).unwrap_or_default(),
            self.clonal_germline.clone(),
        ];
        leading
            .into_iter()
            .chain(MutationTag::iter().map(|tag| self.count(tag).to_string()))
            .chain(trailing)
            .collect()
    }

    /// Returns the summary as a row of the selection table, see [`SELECTION_COLUMNS`].
    pub fn to_selection_row(&self, sample: &str) -> Vec<String> {
        vec![
            sample.to_string(),
            self.tree_id.clone(),
            self.clone_id.clone(),
            self.clonal_germline.clone(),
            self.mu_count_cdr_r.to_string(),
            self.mu_count_cdr_s.to_string(),
            self.mu_count_fwr_r.to_string(),
            self.mu_count_fwr_s.to_string(),
            self.cdr3_end.map(|end| end.to_string()).unwrap_or_default(),
            self.sequences.to_string(),
        ]
    }

    /// Returns the mutation summary of a reconciled tree.
    ///
    /// Branches are visited in pre-order. With `no_trunk`, branches leaving
    /// the root are skipped, though their lengths still count towards
    /// `all_muts_by_tree_topology`. Fails if any node lacks a sequence or if
    /// a parent and child sequence differ in length.
    pub fn from_tree(tree: &LinkedTree, no_trunk: bool, no_cdr3: bool) -> Result<Self, Report> {
        let phylogeny = &tree.phylogeny;
        let root = phylogeny.get_root_index()?;
        let germline = tree.sequence(root)?;
        let gl_start = first_non_gap(germline.as_bytes());

        let mut summary = MutationSummary::new(&tree.id);

        for node in phylogeny.preorder()? {
            let Some(parent) = phylogeny.get_parent(node) else {
                continue;
            };
            summary.all_muts_by_tree_topology += phylogeny.branch_length(node);
            if no_trunk && parent == root {
                continue;
            }

            let (parent_seq, child_seq) = (tree.sequence(parent)?, tree.sequence(node)?);
            if parent_seq == child_seq {
                continue;
            }
            let mutations = find_mutations(parent_seq, child_seq, gl_start).wrap_err_with(|| {
                eyre!(
                    "Failed to compare node {} to its parent {}.",
                    tree.node_name(node),
                    tree.node_name(parent)
                )
            })?;
            for mutation in mutations {
                summary.add(&mutation.classify(&tree.regions, no_cdr3));
            }
        }

        summary.clonal_germline = germline.to_string();
        summary.nodes = phylogeny.len().saturating_sub(1);
        summary.sequences = tree.linked_sequences;
        summary.cdr3_end = if no_cdr3 { None } else { tree.cdr3_end };

        Ok(summary)
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns the mutations from a parent sequence to a child sequence.
///
/// Scanning starts at the shared reading frame of both sequences, aligned to
/// the germline start `gl_start`. Only positions where both bases are A/C/G/T
/// and differ are mutations. Gaps in the parent shift the codon boundaries.
///
/// ```rust
/// use igtreez::mutation::summary::find_mutations;
///
/// let mutations = find_mutations("AAAAAA", "AAACAA", 0)?;
/// assert_eq!(mutations.len(), 1);
/// assert_eq!(mutations[0].position, 3);
/// assert_eq!(mutations[0].codons, Some((*b"AAA", *b"CAA")));
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn find_mutations(parent: &str, child: &str, gl_start: usize) -> Result<Vec<Mutation>, Report> {
    if parent.len() != child.len() {
        return Err(eyre!(
            "Sequences have different lengths ({} vs {}).",
            parent.len(),
            child.len()
        ));
    }
    let (parent, child) = (parent.as_bytes(), child.as_bytes());
    let start = rf_start(gl_start, first_non_gap(child)).max(rf_start(gl_start, first_non_gap(parent)));

    let mut mutations = Vec::new();
    let mut gaps = 0;

    for i in start..parent.len() {
        if parent[i] != child[i] && is_regular_nuc(parent[i]) && is_regular_nuc(child[i]) {
            let codon_start = i - ((i - gaps - start) % 3);
            let codons = (codon_start + 2 < parent.len()).then(|| {
                let mut parent_codon = [0; 3];
                parent_codon.copy_from_slice(&parent[codon_start..codon_start + 3]);
                let mut child_codon = [0; 3];
                child_codon.copy_from_slice(&child[codon_start..codon_start + 3]);
                // isolate this change from others in the same codon
                if child_codon.iter().all(|b| is_regular_nuc(*b)) {
                    child_codon = parent_codon;
                    child_codon[i - codon_start] = child[i];
                }
                (parent_codon, child_codon)
            });
            mutations.push(Mutation::new(i, parent[i], child[i], codons));
        }
        if parent[i] == b'-' {
            gaps += 1;
        }
    }

    Ok(mutations)
}
