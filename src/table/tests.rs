use crate::table::*;

use color_eyre::eyre::{Report, Result};

fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn write_tsv() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("summary.tsv");

    let mut table = Table::with_headers(&["tree_id", "nodes"]);
    table.add_row(row(&["clone_1", "4"]))?;
    table.add_row(row(&["clone_2", "7"]))?;
    table.write(&path)?;

    assert_eq!(std::fs::read_to_string(&path)?, "tree_id\tnodes\nclone_1\t4\nclone_2\t7\n");
    assert_eq!(table.path, Some(path));
    Ok(())
}

#[test]
fn write_quotes_delimiters() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("distances.csv");

    let mut table = Table::with_headers(&["sample", "GC_to_PB"]);
    table.add_row(row(&["a,b", "1 2"]))?;
    table.write(&path)?;

    assert_eq!(std::fs::read_to_string(&path)?, "sample,GC_to_PB\n\"a,b\",1 2\n");
    Ok(())
}

#[test]
fn write_unknown_extension() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let mut table = Table::with_headers(&["1"]);
    assert!(table.write(&dir.path().join("table.json")).is_err());
    Ok(())
}

#[test]
fn columns() -> Result<(), Report> {
    let mut table = Table::with_headers(&["1", "2"]);
    table.add_row(row(&["A", "B"]))?;
    assert_eq!(table.get_header_index("2")?, 1);
    assert_eq!(table.get_column("1")?, ["A"]);
    assert!(table.get_column("3").is_err());
    Ok(())
}
