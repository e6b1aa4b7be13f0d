use crate::{newick, Branch, FromNewick, Node, ToNewick};

use color_eyre::eyre::{eyre, Report, Result};
use num_traits::AsPrimitive;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// A rooted lineage tree.
///
/// ## Introduction
///
/// - Nodes are addressed by their [`NodeIndex`], which is stable for the life of the [`Phylogeny`].
/// - Every node has at most one parent, and exactly one node (the root) has none.
/// - Children keep the order in which their branches were added.
///
/// ```rust
/// use igtreez_phylo::{Branch, Node, Phylogeny};
///
/// let mut phylo = Phylogeny::new();
/// let gl = phylo.add_node(Node::new("GL"));
/// let a  = phylo.add_node(Node::new("A"));
/// let b  = phylo.add_node(Node::new("B"));
/// phylo.add_branch(gl, a, Branch::with_length(2.0))?;
/// phylo.add_branch(a, b, Branch::with_length(1.0))?;
///
/// assert_eq!(phylo.get_root_index()?, gl);
/// assert_eq!(phylo.get_path_to_root(b), [b, a, gl]);
/// assert_eq!(phylo.distance_to_root(b), 3.0);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Phylogeny {
    /// Directed graph of parents and children, nodes are [`Node`] and edges are [`Branch`].
    pub graph: Graph<Node, Branch>,
}

impl Phylogeny {
    /// Returns a new empty [`Phylogeny`].
    pub fn new() -> Self {
        Phylogeny { graph: Graph::new() }
    }

    /// Adds a [`Node`] with no parent and returns its [`NodeIndex`].
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        self.graph.add_node(node)
    }

    /// Creates a [`Branch`] from `parent` to `child` and returns the [`EdgeIndex`].
    ///
    /// - Both nodes must already exist.
    /// - The child must not already have a parent.
    /// - The branch must not create a cycle.
    ///
    /// ```rust
    /// use igtreez_phylo::{Branch, Node, Phylogeny};
    ///
    /// let mut phylo = Phylogeny::new();
    /// let a = phylo.add_node(Node::new("A"));
    /// let b = phylo.add_node(Node::new("B"));
    /// let c = phylo.add_node(Node::new("C"));
    /// phylo.add_branch(a, b, Branch::default())?;
    /// phylo.add_branch(b, c, Branch::default())?;
    ///
    /// // second parent
    /// assert!(phylo.add_branch(a, c, Branch::default()).is_err());
    /// // cycle
    /// assert!(phylo.add_branch(c, a, Branch::default()).is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn add_branch(
        &mut self,
        parent: NodeIndex,
        child: NodeIndex,
        branch: Branch,
    ) -> Result<EdgeIndex, Report> {
        let (parent_node, child_node) = (self.get_node(parent)?, self.get_node(child)?);
        if self.get_parent(child).is_some() {
            return Err(eyre!("Node {child_node:?} already has a parent."));
        }
        if self.get_path_to_root(parent).contains(&child) {
            return Err(eyre!(
                "Branch from {parent_node:?} to {child_node:?} would create a cycle."
            ));
        }
        Ok(self.graph.add_edge(parent, child, branch))
    }

    /// Returns the [`Branch`] leading to a node, [`None`] for the root.
    pub fn get_branch(&self, node_index: NodeIndex) -> Option<&Branch> {
        self.graph.edges_directed(node_index, Direction::Incoming).next().map(|e| e.weight())
    }

    /// Returns the length of the [`Branch`] leading to a node, `0` for the root.
    pub fn branch_length(&self, node_index: NodeIndex) -> f32 {
        self.get_branch(node_index).map(|b| b.as_()).unwrap_or_default()
    }

    /// Returns the children of a node, in the order their branches were added.
    pub fn get_children(&self, node_index: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(node_index, Direction::Outgoing)
            .map(|e| (e.id(), e.target()))
            .collect();
        edges.sort();
        edges.into_iter().map(|(_edge, child)| child).collect()
    }

    /// Returns the [`Node`] at an index.
    pub fn get_node(&self, node_index: NodeIndex) -> Result<&Node, Report> {
        self.graph
            .node_weight(node_index)
            .ok_or_else(|| eyre!("Node index {} is not in the phylogeny.", node_index.index()))
    }

    /// Returns the first node in pre-order whose label is `name`.
    pub fn find_node(&self, name: &str) -> Result<Option<NodeIndex>, Report> {
        let found = self.preorder()?.into_iter().find(|n| {
            self.graph.node_weight(*n).is_some_and(|node| node.name.as_deref() == Some(name))
        });
        Ok(found)
    }

    /// Returns the parent of a node, [`None`] for the root.
    pub fn get_parent(&self, node_index: NodeIndex) -> Option<NodeIndex> {
        self.graph.neighbors_directed(node_index, Direction::Incoming).next()
    }

    /// Returns the nodes from `node_index` up to the root, inclusive at both ends.
    pub fn get_path_to_root(&self, node_index: NodeIndex) -> Vec<NodeIndex> {
        let mut path = vec![node_index];
        let mut current = node_index;
        while let Some(parent) = self.get_parent(current) {
            path.push(parent);
            current = parent;
        }
        path
    }

    /// Returns the sum of branch lengths from a node up to the root.
    pub fn distance_to_root(&self, node_index: NodeIndex) -> f32 {
        self.get_path_to_root(node_index).into_iter().map(|n| self.branch_length(n)).sum()
    }

    /// Returns the distance to the root of every node, indexed by [`NodeIndex::index`].
    ///
    /// One pass from the root, for callers that need many distances.
    ///
    /// ```rust
    /// use igtreez_phylo::{FromNewick, Phylogeny};
    ///
    /// let phylo = Phylogeny::from_newick("((A:1)B:2)GL;")?;
    /// let a = phylo.find_node("A")?.ok_or(color_eyre::eyre::eyre!("A"))?;
    /// assert_eq!(phylo.distances_to_root()?[a.index()], 3.0);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn distances_to_root(&self) -> Result<Vec<f32>, Report> {
        let mut distances = vec![0.0; self.graph.node_count()];
        for node_index in self.preorder()? {
            if let Some(parent) = self.get_parent(node_index) {
                distances[node_index.index()] = distances[parent.index()] + self.branch_length(node_index);
            }
        }
        Ok(distances)
    }

    /// Returns the root of the [`Phylogeny`].
    ///
    /// Fails if the phylogeny is empty or has more than one parentless node.
    pub fn get_root_index(&self) -> Result<NodeIndex, Report> {
        let roots: Vec<_> =
            self.graph.node_indices().filter(|n| self.get_parent(*n).is_none()).collect();
        match roots.as_slice() {
            [root] => Ok(*root),
            [] => Err(eyre!("Phylogeny has no root.")),
            _ => Err(eyre!("Phylogeny has {} roots, expected 1.", roots.len())),
        }
    }

    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.graph.node_count() == 0 }
    #[rustfmt::skip]
    pub fn is_leaf(&self, node_index: NodeIndex) -> bool { self.get_children(node_index).is_empty() }
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.graph.node_count() }

    /// Returns the leaves of the [`Phylogeny`] in pre-order.
    pub fn get_leaves(&self) -> Result<Vec<NodeIndex>, Report> {
        Ok(self.preorder()?.into_iter().filter(|n| self.is_leaf(*n)).collect())
    }

    // ------------------------------------------------------------------------
    // Traversals

    /// Returns all nodes in pre-order (parent before children).
    ///
    /// ```rust
    /// use igtreez_phylo::{FromNewick, Phylogeny};
    ///
    /// let phylo = Phylogeny::from_newick("((C,D)B,E)A;")?;
    /// let labels: Vec<_> = phylo.preorder()?.into_iter().map(|n| phylo.graph[n].label()).collect();
    /// assert_eq!(labels, ["A", "B", "C", "D", "E"]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn preorder(&self) -> Result<Vec<NodeIndex>, Report> {
        Ok(self.preorder_from(self.get_root_index()?))
    }

    /// Returns all nodes in post-order (children before parent).
    ///
    /// ```rust
    /// use igtreez_phylo::{FromNewick, Phylogeny};
    ///
    /// let phylo = Phylogeny::from_newick("((C,D)B,E)A;")?;
    /// let labels: Vec<_> = phylo.postorder()?.into_iter().map(|n| phylo.graph[n].label()).collect();
    /// assert_eq!(labels, ["C", "D", "B", "E", "A"]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn postorder(&self) -> Result<Vec<NodeIndex>, Report> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack = vec![self.get_root_index()?];
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.get_children(node));
        }
        order.reverse();
        Ok(order)
    }

    /// Returns all nodes level by level, starting from the root.
    pub fn levelorder(&self) -> Result<Vec<NodeIndex>, Report> {
        let mut order = Vec::with_capacity(self.len());
        let mut queue = VecDeque::from([self.get_root_index()?]);
        while let Some(node) = queue.pop_front() {
            order.push(node);
            queue.extend(self.get_children(node));
        }
        Ok(order)
    }

    fn preorder_from(&self, node_index: NodeIndex) -> Vec<NodeIndex> {
        let mut order = Vec::new();
        let mut stack = vec![node_index];
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.get_children(node).into_iter().rev());
        }
        order
    }

    // ------------------------------------------------------------------------
    // Trunk

    /// Returns the first node, in level order, with at least two children.
    ///
    /// This is the root itself when the root already splits.
    pub fn first_split_node(&self) -> Result<Option<NodeIndex>, Report> {
        let split = self.levelorder()?.into_iter().find(|n| self.get_children(*n).len() >= 2);
        Ok(split)
    }

    /// Returns a copy of the subtree rooted at `node_index`.
    ///
    /// The new root keeps its label but loses the branch to its old parent.
    pub fn subtree(&self, node_index: NodeIndex) -> Result<Phylogeny, Report> {
        let mut subtree = Phylogeny::new();
        let mut old_to_new = HashMap::new();

        for old in self.preorder_from(node_index) {
            let new = subtree.add_node(self.get_node(old)?.clone());
            old_to_new.insert(old, new);
            if old == node_index {
                continue;
            }
            let parent = self
                .get_parent(old)
                .and_then(|p| old_to_new.get(&p))
                .ok_or_else(|| eyre!("Parent of node {} was not copied.", old.index()))?;
            let branch = self.get_branch(old).copied().unwrap_or_default();
            subtree.graph.add_edge(*parent, new, branch);
        }

        Ok(subtree)
    }

    /// Returns the tree re-rooted at its first split node.
    ///
    /// Returns [`None`] when the tree has no trunk: its root already splits, or it never splits.
    ///
    /// ```rust
    /// use igtreez_phylo::{FromNewick, Phylogeny, ToNewick};
    ///
    /// let phylo = Phylogeny::from_newick("(((A:1,B:1)S:2)T:3)GL;")?;
    /// let trunkless = phylo.remove_trunk()?.map(|p| p.to_newick()).transpose()?;
    /// assert_eq!(trunkless.as_deref(), Some("(A:1,B:1)S;"));
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn remove_trunk(&self) -> Result<Option<Phylogeny>, Report> {
        let root = self.get_root_index()?;
        match self.first_split_node()? {
            Some(split) if split != root => Ok(Some(self.subtree(split)?)),
            _ => Ok(None),
        }
    }
}

impl FromNewick for Phylogeny {
    /// Returns a [`Phylogeny`] created from a [Newick](https://en.wikipedia.org/wiki/Newick_format) [`str`].
    fn from_newick(newick: &str) -> Result<Self, Report> {
        newick::parse(newick)
    }
}

impl ToNewick for Phylogeny {
    /// Returns a [Newick](https://en.wikipedia.org/wiki/Newick_format) [`String`] of the [`Phylogeny`].
    fn to_newick(&self) -> Result<String, Report> {
        newick::write(self)
    }
}
