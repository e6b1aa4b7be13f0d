//! `igtreez` analyses B-cell lineage trees.
//!
//! 1. `igtreez mutations` classifies every mutation along the branches of a tree:
//!    source base, transition or transversion, replacement or silent codon change,
//!    immunoglobulin region, and the physico-chemical classes of the amino acids.
//!    Node sequences come from FASTA alignments, an AIRR or Change-O database, or
//!    an AIRR clone JSON. Nodes without a sequence are reconciled from their
//!    neighbours by majority vote.
//!
//! 1. `igtreez poptree` counts the transitions between cell populations along the
//!    leaf-to-root paths of a tree, with their distances and the depth of every
//!    population member.
//!
//! 1. `igtreez trunk` re-roots trees at their first split.
//!
//! 1. `igtreez mtree` describes the shape of a tree: outgoing degrees, trunk
//!    length, and the path lengths to its leaves.
//!
//! 1. `igtreez filter` lists the trees that hold, or lack, given populations,
//!    or whose size is in a range.

pub mod amino_acid;
pub mod cli;
pub mod codon;
pub mod filter;
pub mod linkage;
pub mod mutation;
pub mod poptree;
pub mod run;
pub mod sequence;
pub mod shape;
pub mod table;
pub mod utils;

#[doc(inline)]
pub use crate::cli::Cli;
#[doc(inline)]
pub use crate::linkage::LinkedTree;
#[doc(inline)]
pub use crate::mutation::MutationSummary;
#[doc(inline)]
pub use table::Table;
#[doc(inline)]
pub use utils::verbosity::Verbosity;
