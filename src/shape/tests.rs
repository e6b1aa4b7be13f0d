use crate::shape::*;

use color_eyre::eyre::{Report, Result};
use igtreez_phylo::{FromNewick, Phylogeny};

#[test]
fn shape_of_split_tree() -> Result<(), Report> {
    let phylogeny = Phylogeny::from_newick("((A:1,(B:1,C:3)D:2)S:3)GL;")?;
    let shape = TreeShape::new("clone_12", &phylogeny)?;

    assert_eq!(shape.clone_id, "12");
    assert_eq!(shape.nodes, 5);
    assert_eq!(shape.leaves, 3);
    assert_eq!(shape.rootd, 1);
    // GL:1 S:2 D:2, plus one hidden node on the branch to D
    assert_eq!(shape.od_avg, 1.5);
    assert_eq!(shape.drsn_min, Some(3.0));
    assert_eq!(shape.dasn_min, 1.0);
    assert_eq!(shape.trunk, 3.0);
    assert_eq!(shape.dlfsn_avg, 3.0);
    assert_eq!(shape.pl_min, 4.0);
    Ok(())
}

#[test]
fn trunk_of_unsplit_tree() -> Result<(), Report> {
    // never splits, the trunk runs to the only leaf
    let phylogeny = Phylogeny::from_newick("((A:2)B:1)GL;")?;
    let (length, end) = trunk(&phylogeny)?;
    assert_eq!(length, 3.0);
    assert_eq!(phylogeny.get_node(end)?.label(), "A");

    let shape = TreeShape::new("t", &phylogeny)?;
    assert_eq!(shape.clone_id, "t");
    assert_eq!(shape.dlfsn_avg, 0.0);
    assert_eq!(shape.drsn_min, None);
    assert_eq!(shape.to_row("s1")[7], "");
    Ok(())
}

#[test]
fn trunk_of_root_split() -> Result<(), Report> {
    let phylogeny = Phylogeny::from_newick("(A:1,B:3)GL;")?;
    let (length, end) = trunk(&phylogeny)?;
    assert_eq!(length, 2.0);
    assert_eq!(end, phylogeny.get_root_index()?);
    Ok(())
}

#[test]
fn shape_of_root_only() -> Result<(), Report> {
    let phylogeny = Phylogeny::from_newick("GL;")?;
    assert!(TreeShape::new("t", &phylogeny).is_err());
    Ok(())
}

#[test]
fn shape_row() -> Result<(), Report> {
    let phylogeny = Phylogeny::from_newick("(A:1,B:3)GL;")?;
    let row = TreeShape::new("clone_2", &phylogeny)?.to_row("s1");
    assert_eq!(row.len(), SHAPE_COLUMNS.len() + 1);
    assert_eq!(row, ["s1", "clone_2", "2", "2", "2", "2", "2", "", "1", "2", "2", "1"]);
    Ok(())
}
