use crate::filter::*;
use crate::poptree::Populations;

use color_eyre::eyre::{Report, Result};
use igtreez_phylo::{FromNewick, Phylogeny};

fn pops(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| p.to_string()).collect()
}

#[test]
fn tree_content() -> Result<(), Report> {
    let phylogeny = Phylogeny::from_newick("((GC_1:1,PB_2:1)I:1,Germline_x:0)GL;")?;
    let populations = Populations::new(&pops(&["GC", "PB", "MEM"]), false, None)?;
    let content = TreeContent::new(&phylogeny, Some(&populations))?;

    assert_eq!(content.populations.iter().collect::<Vec<_>>(), ["GC", "PB"]);
    assert_eq!(content.nodes, 4);
    assert_eq!(content.leaves, 2);

    let sizes_only = TreeContent::new(&phylogeny, None)?;
    assert!(sizes_only.populations.is_empty());
    Ok(())
}

#[test]
fn population_logic() -> Result<(), Report> {
    let content = TreeContent { populations: pops(&["GC", "PB"]).into_iter().collect(), nodes: 5, leaves: 3 };
    let filter = |logic, patterns: &[&str]| TreeFilter::Populations { logic, patterns: pops(patterns) };

    assert!(filter(Logic::And, &["GC", "PB"]).accepts(&content));
    assert!(!filter(Logic::And, &["GC", "MEM"]).accepts(&content));
    assert!(filter(Logic::Or, &["GC", "MEM"]).accepts(&content));
    assert!(!filter(Logic::Or, &["MEM"]).accepts(&content));
    assert!(filter(Logic::Not, &["MEM"]).accepts(&content));
    assert!(!filter(Logic::Not, &["MEM", "PB"]).accepts(&content));
    Ok(())
}

#[test]
fn size_filters() -> Result<(), Report> {
    let content = TreeContent { nodes: 5, leaves: 3, ..Default::default() };
    assert!(TreeFilter::Nodes(SizeRange::from_bounds(&[5])?).accepts(&content));
    assert!(!TreeFilter::Nodes(SizeRange::from_bounds(&[1, 4])?).accepts(&content));
    assert!(TreeFilter::Leaves(SizeRange::from_bounds(&[3, 3])?).accepts(&content));
    assert!(SizeRange::from_bounds(&[]).is_err());
    assert!(SizeRange::from_bounds(&[1, 2, 3]).is_err());

    let range = SizeRange::from_bounds(&[2, 8])?;
    assert_eq!(TreeFilter::Nodes(range).name(), "more_than_2_and_less_than_8_nodes");
    Ok(())
}

#[test]
fn filter_patterns() -> Result<(), Report> {
    let filters = [
        TreeFilter::Populations { logic: Logic::Or, patterns: pops(&["PB", "GC"]) },
        TreeFilter::Populations { logic: Logic::Not, patterns: pops(&["GC", ""]) },
        TreeFilter::Nodes(SizeRange::default()),
    ];
    assert_eq!(TreeFilter::patterns(&filters), ["GC", "PB"]);
    Ok(())
}
