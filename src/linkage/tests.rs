use crate::linkage::fasta::{self, Alignment};
use crate::linkage::tree::{read_trees, Tree};
use crate::linkage::*;
use crate::sequence::Record;

use color_eyre::eyre::{eyre, Report, Result};
use igtreez_phylo::{FromNewick, Phylogeny};
use std::path::Path;

fn record(id: &str, sequence: &str) -> Record {
    Record { id: id.to_string(), sequence: sequence.to_string() }
}

fn sequence_of(tree: &LinkedTree, name: &str) -> Result<String, Report> {
    let node = tree.phylogeny.find_node(name)?.ok_or_else(|| eyre!("No node {name}"))?;
    Ok(tree.sequence(node)?.to_string())
}

fn write(dir: &Path, name: &str, content: &str) -> Result<std::path::PathBuf, Report> {
    let path = dir.join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}

// ----------------------------------------------------------------------------
// Linked Tree

#[test]
fn reconcile_missing_nodes() -> Result<(), Report> {
    let phylogeny = Phylogeny::from_newick("((A:1,B:2)I:1,C:0)GL;")?;
    let records =
        vec![record("GL", "AAAAAA"), record("A", "AAACAA"), record("B", "AAACAT")];
    let alignment = Alignment { records, gl_name: "GL".to_string() };

    let tree = LinkedTree::from_source("t1", phylogeny, &alignment)?;
    assert_eq!(tree.linked_sequences, 2);
    // majority of A, B and GL
    assert_eq!(sequence_of(&tree, "I")?, "AAACAA");
    // zero-length branch copies the parent
    assert_eq!(sequence_of(&tree, "C")?, "AAAAAA");
    Ok(())
}

#[test]
fn reconcile_complete_tree_is_unchanged() -> Result<(), Report> {
    let phylogeny = Phylogeny::from_newick("(A:1,B:0)GL;")?;
    let records = vec![record("GL", "AAAA"), record("A", "AAAC"), record("B", "AAAG")];
    let alignment = Alignment { records, gl_name: "GL".to_string() };

    let tree = LinkedTree::from_source("t1", phylogeny, &alignment)?;
    assert_eq!(sequence_of(&tree, "A")?, "AAAC");
    assert_eq!(sequence_of(&tree, "B")?, "AAAG");
    Ok(())
}

#[test]
fn reconcile_length_mismatch_fails() -> Result<(), Report> {
    let phylogeny = Phylogeny::from_newick("((A:1,B:2)I:1)GL;")?;
    let records = vec![record("GL", "AAA"), record("A", "AAA"), record("B", "AAAA")];
    let alignment = Alignment { records, gl_name: "GL".to_string() };

    assert!(LinkedTree::from_source("t1", phylogeny, &alignment).is_err());
    Ok(())
}

#[test]
fn reconcile_without_votes_fails() -> Result<(), Report> {
    let phylogeny = Phylogeny::from_newick("((A:1)I:1)GL;")?;
    let mut tree = LinkedTree::new("t1", phylogeny);
    assert!(tree.reconcile().is_err());
    Ok(())
}

#[test]
fn records_exact_before_substring() -> Result<(), Report> {
    let records = [record("seq1", "A"), record("seq10", "C")];
    assert_eq!(find_record(&records, "seq10").map(|r| r.id.as_str()), Some("seq10"));
    assert_eq!(find_record(&records, "seq10_x").map(|r| r.id.as_str()), Some("seq1"));
    assert!(find_record(&records, "other").is_none());
    Ok(())
}

#[test]
fn cdr3_length_sets_end() -> Result<(), Report> {
    let mut tree = LinkedTree::new("t1", Phylogeny::from_newick("(A:1)GL;")?);
    assert_eq!(tree.cdr3_end, None);
    tree.set_cdr3_length(12);
    assert_eq!(tree.cdr3_end, Some(325));
    assert_eq!(tree.regions.cdr3_end, 325);
    Ok(())
}

// ----------------------------------------------------------------------------
// Trees

#[test]
fn read_tree_directory() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "b.newick", "((A:1)B:1)GL;")?;
    write(dir.path(), "a.newick", "(X:1)GL;\n")?;
    write(dir.path(), "bad.newick", "((A:1")?;

    let trees = read_trees(&[dir.path().to_path_buf()])?;
    let ids: Vec<_> = trees.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    Ok(())
}

#[test]
fn read_trees_errors() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    assert!(read_trees(&[dir.path().to_path_buf()]).is_err());
    assert!(read_trees(&[dir.path().join("missing.newick")]).is_err());
    Ok(())
}

// ----------------------------------------------------------------------------
// Fasta

#[test]
fn fasta_alignment() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = write(dir.path(), "clone_1.fasta", ">GL\naaa...\n>s1\nACA---\n")?;

    let alignment = Alignment::read(&path, "GL")?;
    assert_eq!(alignment.germline()?.sequence, "AAA---");
    assert!(Alignment::read(&path, "Germline")?.germline().is_err());

    let trees = vec![Tree { id: "clone_1".to_string(), phylogeny: Phylogeny::from_newick("(s1:1)GL;")? }];
    let linked = fasta::link(trees, &[alignment])?;
    let tree = linked.into_iter().next().ok_or_else(|| eyre!("No tree"))??;
    assert_eq!(sequence_of(&tree, "s1")?, "ACA---");
    Ok(())
}

#[test]
fn fasta_count_mismatch() -> Result<(), Report> {
    let trees = vec![Tree { id: "t".to_string(), phylogeny: Phylogeny::from_newick("(A:1)GL;")? }];
    assert!(fasta::link(trees, &[]).is_err());
    Ok(())
}

// ----------------------------------------------------------------------------
// AIRR

#[test]
fn airr_clone_json() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let json = r#"{
        "clones": [
            {
                "clone_id": "5",
                "germline_alignment": "aaaaaa",
                "trees": [{"newick": "((A:1)I:1,B:0)GL;", "nodes": {"A": {"sequence_alignment": "AAAC.."}}}]
            },
            {"clone_id": "6", "germline_alignment": "AAA", "trees": []}
        ]
    }"#;
    let path = write(dir.path(), "clones.json", json)?;

    let clones = airr::read_clones(&path)?;
    assert_eq!(clones.len(), 2);
    // clone 6 has no tree
    assert_eq!(airr::trees(&clones).len(), 1);

    let tree = clones[0].linked_tree()?;
    assert_eq!(tree.id, "5");
    assert_eq!(tree.linked_sequences, 1);
    assert_eq!(sequence_of(&tree, "GL")?, "AAAAAA");
    assert_eq!(sequence_of(&tree, "A")?, "AAAC--");
    assert_eq!(sequence_of(&tree, "B")?, "AAAAAA");
    // ties go to the earlier voting symbol
    assert_eq!(sequence_of(&tree, "I")?, "AAAA--");
    Ok(())
}

// ----------------------------------------------------------------------------
// Database

const AIRR_DB: &str = "\
sequence_id\tclone_id\tsequence_alignment\tgermline_alignment\tcdr3
s:1\t3\tAAACAA\tAAAAAA\tTGTGCG
s:2\t3\tAAACAT\tAAAAAT\tTGT
x1\t4\tCCCCCC\tCCCCCC\tTG
";

#[test]
fn database_rows() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = write(dir.path(), "db.tsv", AIRR_DB)?;
    let database = Database::read(&path, &FieldConfig::from_format(DbFormat::Airr))?;

    assert_eq!(database.rows.len(), 3);
    assert_eq!(database.rows[0].id, "s-1");
    assert_eq!(database.clone_rows("3").len(), 2);
    assert_eq!(database.clone_rows("03").len(), 2);
    assert!(database.clone_rows("9").is_empty());
    assert_eq!(database.clone_count(), 2);
    Ok(())
}

#[test]
fn database_linkage() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = write(dir.path(), "db.tsv", AIRR_DB)?;
    let database = Database::read(&path, &FieldConfig::from_format(DbFormat::Airr))?;

    let phylogeny = Phylogeny::from_newick("((s-2_1:1)s-1:1)GL;")?;
    let tree = LinkedTree::from_source("clone_3", phylogeny, &database)?;

    assert_eq!(sequence_of(&tree, "GL")?, "AAAAAA");
    assert_eq!(sequence_of(&tree, "s-1")?, "AAACAA");
    assert_eq!(sequence_of(&tree, "s-2_1")?, "AAACAT");
    assert_eq!(tree.linked_sequences, 2);
    assert_eq!(tree.cdr3_end, Some(319));
    Ok(())
}

#[test]
fn database_unknown_clone() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = write(dir.path(), "db.tsv", AIRR_DB)?;
    let database = Database::read(&path, &FieldConfig::from_format(DbFormat::Airr))?;

    let phylogeny = Phylogeny::from_newick("(zz:1)GL;")?;
    assert!(LinkedTree::from_source("clone_9", phylogeny, &database).is_err());
    Ok(())
}

#[test]
fn database_germline_by_first_node() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = write(dir.path(), "db.tsv", AIRR_DB)?;
    let database = Database::read(&path, &FieldConfig::from_format(DbFormat::Airr))?;

    // no clone number in the id, the first node names row s:2
    let phylogeny = Phylogeny::from_newick("(s-2:1)GL;")?;
    let tree = LinkedTree::from_source("lineage", phylogeny, &database)?;
    assert_eq!(sequence_of(&tree, "GL")?, "AAAAAT");
    assert_eq!(tree.cdr3_end, Some(316));
    Ok(())
}

#[test]
fn database_padded_clone_number() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let db = "sequence_id\tclone_id\tsequence_alignment\tgermline_alignment\n\
              a\t42\tAAAC\tAAAA\n\
              b\t7\tCCCC\tCCCC\n";
    let path = write(dir.path(), "db.tsv", db)?;
    let database = Database::read(&path, &FieldConfig::from_format(DbFormat::Airr))?;

    let phylogeny = Phylogeny::from_newick("(a_1:1)GL;")?;
    let tree = LinkedTree::from_source("clone_042", phylogeny, &database)?;
    assert_eq!(sequence_of(&tree, "GL")?, "AAAA");
    assert_eq!(sequence_of(&tree, "a_1")?, "AAAC");
    Ok(())
}

#[test]
fn database_single_clone() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let db = "sequence_id\tclone_id\tsequence_alignment\tgermline_alignment\nq\t5\tAAAC\tAAAA\n";
    let path = write(dir.path(), "db.tsv", db)?;
    let database = Database::read(&path, &FieldConfig::from_format(DbFormat::Airr))?;

    // the id names another clone, the only clone is used anyway
    let phylogeny = Phylogeny::from_newick("(q:1)GL;")?;
    let tree = LinkedTree::from_source("clone_9", phylogeny, &database)?;
    assert_eq!(sequence_of(&tree, "GL")?, "AAAA");
    assert_eq!(tree.linked_sequences, 1);
    Ok(())
}

#[test]
fn database_columns() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let fields = FieldConfig::from_format(DbFormat::Airr);

    let no_cdr3 = write(dir.path(), "no_cdr3.tsv", "sequence_id\tclone_id\tsequence_alignment\tgermline_alignment\ns1\t1\tAA\tAA\n")?;
    let database = Database::read(&no_cdr3, &fields)?;
    assert_eq!(database.rows[0].cdr3, None);

    let no_germline = write(dir.path(), "no_gl.tsv", "sequence_id\tclone_id\tsequence_alignment\ns1\t1\tAA\n")?;
    assert!(Database::read(&no_germline, &fields).is_err());

    let renamed = fields.with_overrides(None, Some("sequence_alignment"), None, None);
    assert!(Database::read(&no_germline, &renamed).is_ok());

    // Change-O columns unless the format is set
    assert_eq!(FieldConfig::default(), FieldConfig::from_format(DbFormat::Changeo));
    assert!(Database::read(&no_cdr3, &FieldConfig::default()).is_err());
    Ok(())
}
