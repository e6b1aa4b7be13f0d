use crate::{Branch, FromNewick, Node, Phylogeny, ToNewick};

use color_eyre::eyre::{Report, Result};

fn labels(phylo: &Phylogeny, nodes: Vec<crate::NodeIndex>) -> Vec<String> {
    nodes.into_iter().map(|n| phylo.graph[n].label().to_string()).collect()
}

#[test]
fn newick_lengths_and_confidence() -> Result<(), Report> {
    let phylo = Phylogeny::from_newick("(A:0.1:90,B:0.2,(C:0.3,D:0.4)E:0.5)F;")?;
    assert_eq!(phylo.len(), 6);

    let e = phylo.find_node("E")?.ok_or(color_eyre::eyre::eyre!("E missing"))?;
    assert_eq!(phylo.branch_length(e), 0.5);
    let a = phylo.find_node("A")?.ok_or(color_eyre::eyre::eyre!("A missing"))?;
    assert_eq!(phylo.get_branch(a), Some(&Branch { length: 0.1, confidence: 90.0 }));

    let root = phylo.get_root_index()?;
    assert_eq!(phylo.branch_length(root), 0.0);
    assert_eq!(labels(&phylo, phylo.get_children(root)), ["A", "B", "E"]);
    Ok(())
}

#[test]
fn newick_unnamed_nodes() -> Result<(), Report> {
    let phylo = Phylogeny::from_newick("((A:1,B:2):3,C:1);")?;
    let root = phylo.get_root_index()?;
    assert_eq!(phylo.get_node(root)?, &Node::default());
    assert_eq!(labels(&phylo, phylo.get_leaves()?), ["A", "B", "C"]);
    Ok(())
}

#[test]
fn newick_igtree_labels() -> Result<(), Report> {
    let phylo = Phylogeny::from_newick("('seq_1\\n12':1,'seq 2':2)'GL':0;")?;
    let root = phylo.get_root_index()?;
    assert_eq!(phylo.get_node(root)?.label(), "GL");
    assert_eq!(labels(&phylo, phylo.get_children(root)), ["seq_1", "seq 2"]);
    Ok(())
}

#[test]
fn newick_whitespace_and_newlines() -> Result<(), Report> {
    let phylo = Phylogeny::from_newick("(A:1,\n B:2 )R;\n")?;
    assert_eq!(phylo.len(), 3);
    Ok(())
}

#[test]
fn newick_errors() -> Result<(), Report> {
    assert!(Phylogeny::from_newick("(A,B").is_err());
    assert!(Phylogeny::from_newick("(A,'B)R;").is_err());
    assert!(Phylogeny::from_newick("(A:x,B)R;").is_err());
    assert!(Phylogeny::from_newick("(A,B)R;(C,D);").is_err());
    Ok(())
}

#[test]
fn newick_comments_and_quoted_semicolons() -> Result<(), Report> {
    let phylo = Phylogeny::from_newick("[&R] ('a;b':1[&support=90],B[x]:2)GL[root];")?;
    assert_eq!(phylo.len(), 3);
    let quoted = phylo.find_node("a;b")?.ok_or(color_eyre::eyre::eyre!("a;b missing"))?;
    assert_eq!(phylo.branch_length(quoted), 1.0);
    let b = phylo.find_node("B")?.ok_or(color_eyre::eyre::eyre!("B missing"))?;
    assert_eq!(phylo.branch_length(b), 2.0);
    assert_eq!(phylo.get_node(phylo.get_root_index()?)?.label(), "GL");

    assert_eq!(Node::from_newick("'x;y'")?, Node::new("x;y"));
    assert!(Phylogeny::from_newick("(A:1[open,B:2)GL;").is_err());
    Ok(())
}

#[test]
fn newick_deep_chain() -> Result<(), Report> {
    let depth = 20_000;
    let newick = format!("{}A{};", "(".repeat(depth), "):1".repeat(depth));
    let phylo = Phylogeny::from_newick(&newick)?;
    assert_eq!(phylo.len(), depth + 1);

    let a = phylo.find_node("A")?.ok_or(color_eyre::eyre::eyre!("A missing"))?;
    // the root branch is discarded
    assert_eq!(phylo.distances_to_root()?[a.index()], (depth - 1) as f32);
    Ok(())
}

#[test]
fn newick_round_trip() -> Result<(), Report> {
    let newick = "((C:1,D:2.5)B:3,E:4,'F G':0)A;";
    let phylo = Phylogeny::from_newick(newick)?;
    assert_eq!(phylo.to_newick()?, newick);
    Ok(())
}

#[test]
fn traversals() -> Result<(), Report> {
    let phylo = Phylogeny::from_newick("((D,E)B,(F)C)A;")?;
    assert_eq!(labels(&phylo, phylo.preorder()?), ["A", "B", "D", "E", "C", "F"]);
    assert_eq!(labels(&phylo, phylo.postorder()?), ["D", "E", "B", "F", "C", "A"]);
    assert_eq!(labels(&phylo, phylo.levelorder()?), ["A", "B", "C", "D", "E", "F"]);
    assert_eq!(labels(&phylo, phylo.get_leaves()?), ["D", "E", "F"]);
    Ok(())
}

#[test]
fn paths_and_distances() -> Result<(), Report> {
    let phylo = Phylogeny::from_newick("((D:1,E:2)B:3,(F:4)C:5)A;")?;
    let f = phylo.find_node("F")?.ok_or(color_eyre::eyre::eyre!("F missing"))?;
    assert_eq!(labels(&phylo, phylo.get_path_to_root(f)), ["F", "C", "A"]);
    assert_eq!(phylo.distance_to_root(f), 9.0);

    let root = phylo.get_root_index()?;
    assert_eq!(phylo.get_path_to_root(root), [root]);
    assert_eq!(phylo.distance_to_root(root), 0.0);

    let distances = phylo.distances_to_root()?;
    assert_eq!(distances[f.index()], 9.0);
    assert_eq!(distances[root.index()], 0.0);
    Ok(())
}

#[test]
fn single_parent_and_root() -> Result<(), Report> {
    let mut phylo = Phylogeny::new();
    assert!(phylo.get_root_index().is_err());

    let a = phylo.add_node(Node::new("A"));
    let b = phylo.add_node(Node::new("B"));
    assert!(phylo.get_root_index().is_err());

    phylo.add_branch(a, b, Branch::with_length(1.0))?;
    assert_eq!(phylo.get_root_index()?, a);
    assert_eq!(phylo.get_parent(b), Some(a));
    assert!(phylo.add_branch(b, b, Branch::default()).is_err());
    assert!(phylo.add_branch(b, a, Branch::default()).is_err());
    Ok(())
}

#[test]
fn trunk_removal() -> Result<(), Report> {
    // root with a single child
    let phylo = Phylogeny::from_newick("((((A:1,B:1)S2:1,C:1)S1:2)T:1)GL;")?;
    let split = phylo.first_split_node()?.ok_or(color_eyre::eyre::eyre!("no split"))?;
    assert_eq!(phylo.get_node(split)?.label(), "S1");
    let trunkless = phylo.remove_trunk()?.ok_or(color_eyre::eyre::eyre!("no trunk"))?;
    assert_eq!(trunkless.to_newick()?, "((A:1,B:1)S2:1,C:1)S1;");

    // root already splits
    let phylo = Phylogeny::from_newick("(A:1,B:1)GL;")?;
    assert_eq!(phylo.first_split_node()?, Some(phylo.get_root_index()?));
    assert!(phylo.remove_trunk()?.is_none());

    // never splits
    let phylo = Phylogeny::from_newick("((A:1)B:1)GL;")?;
    assert_eq!(phylo.first_split_node()?, None);
    assert!(phylo.remove_trunk()?.is_none());
    Ok(())
}
