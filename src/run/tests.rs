use crate::run::{filter, mtree, mutations, poptree, trunk, Input};

use color_eyre::eyre::{Report, Result};
use std::path::{Path, PathBuf};

fn write(dir: &Path, name: &str, content: &str) -> Result<PathBuf, Report> {
    let path = dir.join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}

fn input(output_dir: &Path) -> Input {
    Input { output_dir: output_dir.to_path_buf(), name: "s1".to_string(), threads: 2, ..Default::default() }
}

#[test]
fn mutations_from_fasta() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let trees = dir.path().join("trees");
    let alignments = dir.path().join("fasta");
    std::fs::create_dir_all(&trees)?;
    std::fs::create_dir_all(&alignments)?;
    write(&trees, "clone_1.newick", "((B:1)A:2)GL;")?;
    write(&trees, "clone_2.newick", "((B:1)A:2)GL;")?;
    write(&alignments, "clone_1.fasta", ">GL\nAAAAAA\n>A\nAAACAA\n>B\nAAACAT\n")?;
    // B is one base short
    write(&alignments, "clone_2.fasta", ">GL\nAAAAAA\n>A\nAAACAA\n>B\nAAACA\n")?;

    let output_dir = dir.path().join("output");
    let mut args = mutations::Args { selection: true, ..Default::default() };
    args.input = Input { tree: vec![trees], ..input(&output_dir) };
    args.fasta = vec![alignments];

    let results = mutations(&args)?;
    assert_eq!(results.kept.len(), 1);
    assert_eq!(results.kept["clone_1"].all_mutations, 2);
    assert_eq!(results.dropped.len(), 1);
    assert_eq!(results.dropped[0].0, "clone_2");

    assert!(output_dir.join("mutations_args.json").exists());
    let table = std::fs::read_to_string(output_dir.join("s1_mutations.csv"))?;
    assert_eq!(table.lines().count(), 2);
    assert!(table.starts_with("tree_id,clone_id,all_mutations"));
    let selection = std::fs::read_to_string(output_dir.join("s1_selection.csv"))?;
    assert!(selection.lines().nth(1).is_some_and(|line| line.starts_with("s1,clone_1,1,AAAAAA")));
    Ok(())
}

#[test]
fn mutations_illumina_names() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let tree = write(dir.path(), "clone_1.newick", "((M-1-B:1)M-1-A:2)GL;")?;
    let alignment = write(dir.path(), "clone_1.fasta", ">GL\nAAAAAA\n>M:1:A\nAAACAA\n>M:1;B\nAAACAT\n")?;

    let mut args = mutations::Args::default();
    args.input = Input { tree: vec![tree], ..input(&dir.path().join("output")) };
    args.fasta = vec![alignment];

    // record ids do not match the node names
    assert!(mutations(&args)?.kept.is_empty());

    args.illumina = true;
    let results = mutations(&args)?;
    assert_eq!(results.kept["clone_1"].all_mutations, 2);
    assert_eq!(results.kept["clone_1"].sequences, 2);
    Ok(())
}

#[test]
fn mutations_from_json() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let json = r#"{"clones": [
        {"clone_id": 8, "germline_alignment": "AAAAAA",
         "trees": [{"newick": "(A:1)GL;", "nodes": {"A": {"sequence_alignment": "CAAAAA"}}}]},
        {"clone_id": 9, "germline_alignment": "AAAAAA", "trees": []}
    ]}"#;
    let path = write(dir.path(), "clones.json", json)?;

    let mut args = mutations::Args::default();
    args.input = Input { json: Some(path), ..input(&dir.path().join("output")) };

    let results = mutations(&args)?;
    assert_eq!(results.kept.keys().collect::<Vec<_>>(), ["8"]);
    assert_eq!(results.kept["8"].all_mutations, 1);
    assert_eq!(results.dropped.len(), 1);
    Ok(())
}

#[test]
fn poptree_tables() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let tree = write(dir.path(), "t1.newick", "(((PB_1:1,PB_2:1)PB_3:1)GC_1:2)GL;")?;
    let output_dir = dir.path().join("output");

    let mut args = poptree::Args { pops: vec!["GC".to_string(), "PB".to_string()], ..Default::default() };
    args.input = Input { tree: vec![tree], ..input(&output_dir) };

    let report = poptree(&args)?;
    assert_eq!(report.transition_count(), 1);

    let distances = std::fs::read_to_string(output_dir.join("s1_transition_distances.csv"))?;
    assert_eq!(distances, "sample,GC_to_PB\ns1,1\n");
    let by_tree = std::fs::read_to_string(output_dir.join("s1_population_counts_by_tree.csv"))?;
    assert_eq!(by_tree, "sample,tree_id,GC,PB\ns1,t1,1,3\n");
    assert!(output_dir.join("s1_transition_counts_normalized_by_source.csv").exists());
    Ok(())
}

#[test]
fn poptree_requires_patterns() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let tree = write(dir.path(), "t1.newick", "(A:1)GL;")?;
    let mut args = poptree::Args::default();
    args.input = Input { tree: vec![tree], ..input(&dir.path().join("output")) };
    assert!(poptree(&args).is_err());
    Ok(())
}

#[test]
fn filter_tables_and_copies() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let trees = dir.path().join("trees");
    std::fs::create_dir_all(&trees)?;
    write(&trees, "t1.newick", "((GC_1:1,PB_2:1)I:1)GL;")?;
    write(&trees, "t2.newick", "(MEM_1:1)GL;")?;
    let output_dir = dir.path().join("output");

    let mut args = filter::Args {
        and: vec!["GC".to_string(), "PB".to_string()],
        not: vec!["GC".to_string()],
        nodes: vec![2],
        leaves: vec![5, 9],
        copy: true,
        ..Default::default()
    };
    args.input = Input { tree: vec![trees], ..input(&output_dir) };

    let selected = filter(&args)?;
    assert_eq!(selected["GC_and_PB"], ["t1"]);
    assert_eq!(selected["not_GC"], ["t2"]);
    assert_eq!(selected["more_than_2_nodes"], ["t1"]);
    // no tree has five leaves
    assert!(!selected.contains_key("more_than_5_and_less_than_9_leaves"));

    assert_eq!(std::fs::read_to_string(output_dir.join("s1_GC_and_PB.csv"))?, "tree_id\nt1\n");
    assert_eq!(std::fs::read_to_string(output_dir.join("not_GC/t2.newick"))?, "(MEM_1:1)GL;\n");
    assert!(!output_dir.join("s1_more_than_5_and_less_than_9_leaves.csv").exists());
    Ok(())
}

#[test]
fn filter_requires_criteria() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let tree = write(dir.path(), "t1.newick", "(A:1)GL;")?;
    let mut args = filter::Args::default();
    args.input = Input { tree: vec![tree], ..input(&dir.path().join("output")) };
    assert!(filter(&args).is_err());

    args.nodes = vec![4, 1];
    assert!(filter(&args).is_err());
    Ok(())
}

#[test]
fn mtree_table() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let trees = dir.path().join("trees");
    std::fs::create_dir_all(&trees)?;
    write(&trees, "a.newick", "((A:1,B:2)I:3)GL;")?;
    write(&trees, "b.newick", "GL;")?;
    let output_dir = dir.path().join("output");

    let mut args = mtree::Args::default();
    args.input = Input { tree: vec![trees], ..input(&output_dir) };

    let results = mtree(&args)?;
    assert_eq!(results.kept.len(), 1);
    assert_eq!(results.dropped[0].0, "b");

    let table = std::fs::read_to_string(output_dir.join("s1_mtree.csv"))?;
    assert_eq!(
        table,
        "sample,tree_id,clone_id,nodes,leaves,od_avg,rootd,drsn_min,dasn_min,trunk,dlfsn_avg,pl_min\n\
         s1,a,a,3,2,1.5,1,3,1,3,1.5,4\n"
    );
    Ok(())
}

#[test]
fn trunk_directory() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let trees = dir.path().join("trees");
    std::fs::create_dir_all(&trees)?;
    write(&trees, "a.newick", "(((A:1,B:1)S:1)T:1)GL;")?;
    write(&trees, "b.newick", "(A:1,B:1)GL;")?;
    write(&trees, "c.newick", "((A:1)B:1)GL;")?;
    let output_dir = dir.path().join("output");

    let mut args = trunk::Args::default();
    args.input = Input { tree: vec![trees], ..input(&output_dir) };

    let results = trunk(&args)?;
    assert_eq!(results.kept.keys().collect::<Vec<_>>(), ["a"]);
    assert!(results.dropped.is_empty());
    assert_eq!(std::fs::read_to_string(output_dir.join("a.newick"))?, "(A:1,B:1)S;\n");
    // no trunk to remove
    assert!(!output_dir.join("b.newick").exists());
    assert!(!output_dir.join("c.newick").exists());
    Ok(())
}
