use crate::{newick, FromNewick};
use color_eyre::eyre::{Report, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fmt::{Display, Formatter};

/// A [`Node`] in the [`Phylogeny`](crate::Phylogeny) arena.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Node {
    /// [`Node`] label, [`None`] for purely structural (unnamed) nodes.
    pub name: Option<String>,
}

#[rustfmt::skip]
impl Display for Node { fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.name.as_deref().unwrap_or("")) } }

impl Node {
    /// Returns a new [`Node`] with the label `name`.
    pub fn new(name: &str) -> Self {
        Node { name: Some(name.to_string()) }
    }

    /// Returns the node label, or an empty [`str`] for unnamed nodes.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

impl FromNewick for Node {
    /// Returns a [`Node`] created from a [Newick](https://en.wikipedia.org/wiki/Newick_format) node [`str`].
    ///
    /// Everything after a literal `\n` is removed from the label, as IgTree
    /// appends extra text to node names that way.
    ///
    /// ## Examples
    ///
    /// Just a node name.
    ///
    /// ```rust
    /// use igtreez_phylo::{Node, FromNewick};
    /// let node = Node::from_newick(&"A;")?;
    /// assert_eq!(node, Node::new("A"));
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    ///
    /// A node name and branch attributes.
    ///
    /// ```rust
    /// use igtreez_phylo::{Node, FromNewick};
    /// let node = Node::from_newick(&"'seq_1\\n3':2")?;
    /// assert_eq!(node, Node::new("seq_1"));
    /// let node = Node::from_newick(&":2")?;
    /// assert_eq!(node, Node::default());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn from_newick(newick: &str) -> Result<Self, Report> {
        let text = newick.trim();
        let text = text.strip_suffix(';').unwrap_or(text);
        let (label, _attributes) = newick::split_label(text);
        let label = match label.find("\\n") {
            Some(i) => &label[..i],
            None => label,
        };
        match label.is_empty() {
            true => Ok(Node::default()),
            false => Ok(Node::new(label)),
        }
    }
}
