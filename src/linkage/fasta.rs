//! Link trees to one FASTA alignment each.

use crate::linkage::{tree::Tree, LinkedTree, SequenceSource};
use crate::sequence::{self, Record};

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use std::fmt::Debug;
use std::path::Path;

/// The aligned sequences of one tree, including its germline.
#[derive(Clone, Debug)]
pub struct Alignment {
    pub records: Vec<Record>,
    /// Id of the germline record.
    pub gl_name: String,
}

impl Alignment {
    /// Read an alignment from a FASTA file.
    pub fn read<P>(path: &P, gl_name: &str) -> Result<Self, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let records = sequence::read_fasta(path)?;
        Ok(Alignment { records, gl_name: gl_name.to_string() })
    }

    /// Writes `:` and `;` in record ids as `-`, the way Illumina read names are written in trees.
    ///
    /// ```rust
    /// use igtreez::linkage::fasta::Alignment;
    /// use igtreez::sequence::Record;
    ///
    /// let records = vec![Record { id: "M01:1:A;size=2".into(), sequence: "ACGT".into() }];
    /// let alignment = Alignment { records, gl_name: "GL".into() }.with_illumina_names();
    /// assert_eq!(alignment.records[0].id, "M01-1-A-size=2");
    /// ```
    pub fn with_illumina_names(mut self) -> Self {
        for record in &mut self.records {
            record.id = record.id.replace([':', ';'], "-");
        }
        self
    }

    /// Returns the germline record.
    pub fn germline(&self) -> Result<&Record, Report> {
        self.records.iter().find(|r| r.id == self.gl_name).ok_or_else(|| {
            eyre!("Could not find a germline sequence named {}.", self.gl_name)
                .suggestion("Set the germline record id with --gl-name.")
        })
    }
}

impl SequenceSource for Alignment {
    /// The root takes the germline record, other nodes take the record matching their name.
    ///
    /// ```rust
    /// use igtreez::linkage::{fasta::Alignment, LinkedTree};
    /// use igtreez::sequence::Record;
    /// use igtreez_phylo::{FromNewick, Phylogeny};
    ///
    /// let records = vec![
    ///     Record { id: "GL".into(), sequence: "aaa...".into() },
    ///     Record { id: "s1".into(), sequence: "ACA---".into() },
    /// ];
    /// let alignment = Alignment { records, gl_name: "GL".into() };
    /// let phylogeny = Phylogeny::from_newick("(s1_1:1)GL;")?;
    /// let tree = LinkedTree::from_source("t1", phylogeny, &alignment)?;
    ///
    /// let root = tree.phylogeny.get_root_index()?;
    /// assert_eq!(tree.sequence(root)?, "AAA---");
    /// assert_eq!(tree.linked_sequences, 1);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn link(&self, tree: &mut LinkedTree) -> Result<(), Report> {
        let root = tree.phylogeny.get_root_index()?;
        tree.set_sequence(root, &self.germline()?.sequence)?;
        tree.link_records(&self.records)?;
        Ok(())
    }
}

/// Link each tree to the alignment at the same position.
///
/// Fails if the number of trees and alignments differ. Trees whose linkage
/// fails are returned as errors, one per tree.
pub fn link(
    trees: Vec<Tree>,
    alignments: &[Alignment],
) -> Result<Vec<Result<LinkedTree, Report>>, Report> {
    if trees.len() != alignments.len() {
        return Err(eyre!(
            "The number of trees ({}) and fasta files ({}) is not equal.",
            trees.len(),
            alignments.len()
        ));
    }
    let linked = trees
        .into_iter()
        .zip(alignments)
        .map(|(tree, alignment)| {
            LinkedTree::from_source(&tree.id, tree.phylogeny, alignment)
                .wrap_err_with(|| eyre!("Tree {} was not linked.", tree.id))
        })
        .collect();
    Ok(linked)
}
