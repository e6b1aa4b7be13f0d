//! Read trees and sequences from [AIRR](https://docs.airr-community.org/) clone JSON.

use crate::linkage::{tree::Tree, LinkedTree, SequenceSource};

use color_eyre::eyre::{eyre, ContextCompat, Report, Result, WrapErr};
use igtreez_phylo::{FromNewick, Phylogeny};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// ----------------------------------------------------------------------------
// Schema
// ----------------------------------------------------------------------------

/// The top level of an AIRR clone file.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Repertoire {
    pub clones: Vec<AirrClone>,
}

/// One clone, its germline and its trees.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AirrClone {
    #[serde(deserialize_with = "string_or_number")]
    pub clone_id: String,
    #[serde(default)]
    pub germline_alignment: Option<String>,
    #[serde(default)]
    pub trees: Vec<AirrTree>,
}

/// A tree of a clone, with the sequences of its nodes keyed by node name.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AirrTree {
    pub newick: String,
    #[serde(default)]
    pub nodes: BTreeMap<String, AirrNode>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AirrNode {
    #[serde(default)]
    pub sequence_alignment: Option<String>,
}

/// Clone ids are strings in the schema, but some tools write them as numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("Invalid clone_id: {other}"))),
    }
}

// ----------------------------------------------------------------------------
// Clone
// ----------------------------------------------------------------------------

impl AirrClone {
    /// Returns the first tree of the clone, the tree id is the clone id.
    pub fn tree(&self) -> Result<Tree, Report> {
        let airr_tree = self.first_tree()?;
        let phylogeny = Phylogeny::from_newick(airr_tree.newick.trim())
            .wrap_err_with(|| eyre!("Failed to parse the tree of clone {}.", self.clone_id))?;
        Ok(Tree { id: self.clone_id.clone(), phylogeny })
    }

    /// Returns the first tree with all node sequences linked and reconciled.
    pub fn linked_tree(&self) -> Result<LinkedTree, Report> {
        let tree = self.tree()?;
        LinkedTree::from_source(&tree.id, tree.phylogeny, self)
    }

    fn first_tree(&self) -> Result<&AirrTree, Report> {
        self.trees.first().wrap_err_with(|| eyre!("Clone {} has no tree.", self.clone_id))
    }
}

impl SequenceSource for AirrClone {
    /// The root takes the germline alignment. Every node named in the tree's
    /// `nodes` takes that sequence, the root included.
    fn link(&self, tree: &mut LinkedTree) -> Result<(), Report> {
        let root = tree.phylogeny.get_root_index()?;
        let germline = self
            .germline_alignment
            .as_deref()
            .wrap_err_with(|| eyre!("Clone {} has no germline_alignment.", self.clone_id))?;
        tree.set_sequence(root, germline)?;

        let nodes = &self.first_tree()?.nodes;
        for node_index in tree.phylogeny.preorder()? {
            let name = tree.phylogeny.get_node(node_index)?.label().to_string();
            let sequence = nodes.get(&name).and_then(|node| node.sequence_alignment.as_deref());
            if let Some(sequence) = sequence {
                tree.set_sequence(node_index, sequence)?;
                tree.linked_sequences += 1;
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Read all clones of an AIRR clone JSON file.
///
/// ```rust
/// use igtreez::linkage::airr;
///
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("clones.json");
/// let json = r#"{"clones": [{"clone_id": 7, "germline_alignment": "AAA", "trees": [{"newick": "(A:1)GL;"}]}]}"#;
/// std::fs::write(&path, json)?;
///
/// let clones = airr::read_clones(&path)?;
/// assert_eq!(clones[0].clone_id, "7");
/// assert_eq!(clones[0].tree()?.phylogeny.len(), 2);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn read_clones<P>(path: &P) -> Result<Vec<AirrClone>, Report>
where
    P: AsRef<Path> + Debug,
{
    let reader = File::open(path)
        .map(BufReader::new)
        .wrap_err_with(|| eyre!("Unable to open AIRR json file: {path:?}"))?;
    let repertoire: Repertoire = serde_json::from_reader(reader)
        .wrap_err_with(|| eyre!("Unable to parse AIRR json file: {path:?}"))?;
    Ok(repertoire.clones)
}

/// Returns the first tree of every clone, skipping clones without a usable tree.
pub fn trees(clones: &[AirrClone]) -> Vec<Tree> {
    clones
        .iter()
        .filter_map(|clone| match clone.tree() {
            Ok(tree) => Some(tree),
            Err(e) => {
                warn!("Skipping clone {}: {e:#}", clone.clone_id);
                None
            }
        })
        .collect()
}
