//! Link lineage trees to the aligned sequences of their nodes.
//!
//! Trees come from Newick files ([`tree`]) or AIRR clone JSON ([`airr`]).
//! Sequences come from one FASTA alignment per tree ([`fasta`]), from the
//! AIRR JSON itself, or from an AIRR/Change-O database ([`database`]).

pub mod airr;
pub mod database;
pub mod fasta;
pub mod tree;
#[cfg(test)]
mod tests;

#[doc(inline)]
pub use database::{Database, DbFormat, FieldConfig};

use crate::mutation::RegionMap;
use crate::sequence::{self, Record};

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use igtreez_phylo::{NodeIndex, Phylogeny};
use log::debug;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Sequence Source
// ----------------------------------------------------------------------------

/// Anything that can attach sequences to the nodes of a [`LinkedTree`].
pub trait SequenceSource {
    /// Attaches the germline to the root and every sequence the source knows to the other nodes.
    ///
    /// Nodes the source has no sequence for are left empty, [`LinkedTree::finalize`] fills them.
    fn link(&self, tree: &mut LinkedTree) -> Result<(), Report>;
}

// ----------------------------------------------------------------------------
// Linked Tree
// ----------------------------------------------------------------------------

/// A lineage tree with one aligned sequence per node.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LinkedTree {
    /// Tree id, the file stem or the AIRR clone id.
    pub id: String,
    pub phylogeny: Phylogeny,
    /// Node sequences, indexed by [`NodeIndex::index`].
    pub sequences: Vec<Option<String>>,
    pub regions: RegionMap,
    /// Number of nodes whose sequence came from the input, the germline excluded.
    pub linked_sequences: usize,
    /// CDR3 end, when the input supplied a CDR3 length.
    pub cdr3_end: Option<usize>,
}

impl LinkedTree {
    /// Returns a tree without sequences and with the default [`RegionMap`].
    pub fn new(id: &str, phylogeny: Phylogeny) -> Self {
        let sequences = vec![None; phylogeny.len()];
        LinkedTree {
            id: id.to_string(),
            phylogeny,
            sequences,
            regions: RegionMap::default(),
            linked_sequences: 0,
            cdr3_end: None,
        }
    }

    /// Links the sequences of `source`, then fills and reconciles the rest.
    pub fn from_source<S: SequenceSource>(
        id: &str,
        phylogeny: Phylogeny,
        source: &S,
    ) -> Result<Self, Report> {
        let mut tree = LinkedTree::new(id, phylogeny);
        source.link(&mut tree).wrap_err_with(|| eyre!("Failed to link sequences to tree {id}."))?;
        tree.finalize()
    }

    /// Returns the sequence of a node.
    pub fn sequence(&self, node_index: NodeIndex) -> Result<&str, Report> {
        self.sequences.get(node_index.index()).and_then(|s| s.as_deref()).ok_or_else(|| {
            eyre!("Node {} of tree {} has no sequence.", self.node_name(node_index), self.id)
        })
    }

    #[rustfmt::skip]
    pub fn has_sequence(&self, node_index: NodeIndex) -> bool { matches!(self.sequences.get(node_index.index()), Some(Some(_))) }

    /// Sets the sequence of a node, normalized with [`sequence::normalize`].
    pub fn set_sequence(&mut self, node_index: NodeIndex, sequence: &str) -> Result<(), Report> {
        let slot = self.sequences.get_mut(node_index.index()).ok_or_else(|| {
            eyre!("Node index {} is not in tree {}.", node_index.index(), self.id)
        })?;
        *slot = Some(sequence::normalize(sequence));
        Ok(())
    }

    /// Returns the label of a node, or its index for unnamed nodes.
    pub fn node_name(&self, node_index: NodeIndex) -> String {
        match self.phylogeny.graph.node_weight(node_index).and_then(|n| n.name.as_deref()) {
            Some(name) => name.to_string(),
            None => format!("#{}", node_index.index()),
        }
    }

    /// Sets the CDR3 end from the length of the CDR3.
    pub fn set_cdr3_length(&mut self, length: usize) {
        self.regions = self.regions.with_cdr3_length(length);
        self.cdr3_end = Some(self.regions.cdr3_end);
    }

    /// Links every non-root node to a record, see [`find_record`].
    ///
    /// Returns the number of linked nodes.
    pub fn link_records(&mut self, records: &[Record]) -> Result<usize, Report> {
        let root = self.phylogeny.get_root_index()?;
        let mut linked = 0;
        for node_index in self.phylogeny.preorder()? {
            let name = self.phylogeny.get_node(node_index)?.label().to_string();
            if node_index == root || name.is_empty() {
                continue;
            }
            if let Some(record) = find_record(records, &name) {
                self.set_sequence(node_index, &record.sequence)?;
                linked += 1;
            }
        }
        self.linked_sequences += linked;
        Ok(linked)
    }

    /// Copies the parent sequence to every empty node on a zero-length branch, root first.
    pub fn fill_zero_length(&mut self) -> Result<(), Report> {
        for node_index in self.phylogeny.preorder()? {
            let Some(parent) = self.phylogeny.get_parent(node_index) else {
                continue;
            };
            if self.has_sequence(node_index) || self.phylogeny.branch_length(node_index) != 0.0 {
                continue;
            }
            if let Some(sequence) = self.sequences[parent.index()].clone() {
                self.sequences[node_index.index()] = Some(sequence);
            }
        }
        Ok(())
    }

    /// Fills every empty node, leaves first, with the [`sequence::consensus`] of its children and parent.
    ///
    /// Fails when a node has nothing to vote with or the votes differ in length.
    pub fn reconcile(&mut self) -> Result<(), Report> {
        for node_index in self.phylogeny.postorder()? {
            if self.has_sequence(node_index) {
                continue;
            }
            let mut neighbours = self.phylogeny.get_children(node_index);
            neighbours.extend(self.phylogeny.get_parent(node_index));
            let votes: Vec<&str> =
                neighbours.iter().filter_map(|n| self.sequences[n.index()].as_deref()).collect();

            let consensus = sequence::consensus(&votes).wrap_err_with(|| {
                eyre!("Failed to generate a sequence for node {}.", self.node_name(node_index))
            })?;
            debug!("Tree {}: generated the sequence of node {}.", self.id, self.node_name(node_index));
            self.sequences[node_index.index()] = Some(consensus);
        }
        Ok(())
    }

    /// Fills zero-length nodes and reconciles the rest, then checks that every node has a sequence.
    pub fn finalize(mut self) -> Result<Self, Report> {
        self.fill_zero_length()?;
        self.reconcile()?;
        for node_index in self.phylogeny.graph.node_indices() {
            self.sequence(node_index)?;
        }
        Ok(self)
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns the record for a node name.
///
/// An exact id match wins, otherwise the first record whose id occurs in the name.
///
/// ```rust
/// use igtreez::linkage::find_record;
/// use igtreez::sequence::Record;
///
/// let records = [Record { id: "seq1".into(), sequence: "ACGT".into() }];
/// assert!(find_record(&records, "seq1").is_some());
/// assert!(find_record(&records, "seq1_3").is_some());
/// assert!(find_record(&records, "seq2").is_none());
/// ```
pub fn find_record<'r>(records: &'r [Record], name: &str) -> Option<&'r Record> {
    records
        .iter()
        .find(|r| r.id == name)
        .or_else(|| records.iter().find(|r| !r.id.is_empty() && name.contains(r.id.as_str())))
}
