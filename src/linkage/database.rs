//! Link trees to the rows of an AIRR or Change-O sequence database.

use crate::linkage::{LinkedTree, SequenceSource};
use crate::sequence::Record;
use crate::utils;

use clap::ValueEnum;
use color_eyre::eyre::{eyre, ContextCompat, Report, Result, WrapErr};
use color_eyre::Help;
use csv::ReaderBuilder;
use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::{Path, PathBuf};

// ----------------------------------------------------------------------------
// Field Config
// ----------------------------------------------------------------------------

/// Column naming convention of a sequence database, Change-O unless set.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, ValueEnum)]
pub enum DbFormat {
    Airr,
    #[default]
    Changeo,
}

/// Names of the database columns that are read.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldConfig {
    pub sequence: String,
    pub germline: String,
    pub clone: String,
    pub id: String,
    /// CDR3 column, its value length gives the CDR3 end.
    pub cdr3: String,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig::from_format(DbFormat::default())
    }
}

impl FieldConfig {
    /// Returns the column names of a database format.
    ///
    /// ```rust
    /// use igtreez::linkage::{DbFormat, FieldConfig};
    /// let fields = FieldConfig::from_format(DbFormat::Changeo);
    /// assert_eq!(fields.sequence, "SEQUENCE_IMGT");
    /// assert_eq!(fields.germline, "GERMLINE_IMGT_D_MASK");
    /// ```
    #[rustfmt::skip]
    pub fn from_format(format: DbFormat) -> Self {
        let (sequence, germline, clone, id, cdr3) = match format {
            DbFormat::Airr    => ("sequence_alignment", "germline_alignment", "clone_id", "sequence_id", "cdr3"),
            DbFormat::Changeo => ("SEQUENCE_IMGT", "GERMLINE_IMGT_D_MASK", "CLONE", "SEQUENCE_ID", "CDR3_IMGT"),
        };
        FieldConfig {
            sequence: sequence.to_string(),
            germline: germline.to_string(),
            clone: clone.to_string(),
            id: id.to_string(),
            cdr3: cdr3.to_string(),
        }
    }

    /// Replaces every column name that has an override.
    pub fn with_overrides(
        mut self,
        sequence: Option<&str>,
        germline: Option<&str>,
        clone: Option<&str>,
        id: Option<&str>,
    ) -> Self {
        let fields = [
            (&mut self.sequence, sequence),
            (&mut self.germline, germline),
            (&mut self.clone, clone),
            (&mut self.id, id),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value.to_string();
            }
        }
        self
    }
}

// ----------------------------------------------------------------------------
// Database
// ----------------------------------------------------------------------------

/// One row of the database, reduced to the configured columns.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Row {
    /// Sequence id, with `:` written as `-`.
    pub id: String,
    pub clone: String,
    pub sequence: String,
    pub germline: String,
    pub cdr3: Option<String>,
}

/// The rows of a sequence database.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Database {
    pub rows: Vec<Row>,
    pub path: Option<PathBuf>,
}

impl Database {
    /// Read the configured columns of a database.
    ///
    /// The delimiter comes from the file extension, tab when it is unknown.
    /// The CDR3 column is optional, the others are required.
    pub fn read<P>(path: &P, fields: &FieldConfig) -> Result<Self, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let delim = utils::get_delimiter(path).unwrap_or('\t');
        let mut reader = ReaderBuilder::new()
            .delimiter(delim as u8)
            .flexible(true)
            .from_path(path)
            .wrap_err_with(|| eyre!("Could not read the database file: {path:?}"))?;

        let headers = reader
            .headers()
            .wrap_err_with(|| eyre!("Could not read the database header: {path:?}"))?
            .clone();
        let column = |name: &str| headers.iter().position(|h| h == name);
        let required = |name: &str| {
            column(name).wrap_err_with(|| eyre!("Column {name} was not found in the database {path:?}."))
        };

        let (id_i, clone_i) = (required(&fields.id)?, required(&fields.clone)?);
        let (sequence_i, germline_i) = (required(&fields.sequence)?, required(&fields.germline)?);
        let cdr3_i = column(&fields.cdr3);
        if cdr3_i.is_none() {
            warn!("Could not find the column {} in the database {path:?}, CDR3 ends are unknown.", fields.cdr3);
        }

        let mut rows = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let record = result.wrap_err_with(|| eyre!("Could not parse row {i} of {path:?}."))?;
            let get = |i: usize| record.get(i).unwrap_or_default().to_string();
            rows.push(Row {
                id: get(id_i).replace(':', "-"),
                clone: get(clone_i),
                sequence: get(sequence_i),
                germline: get(germline_i),
                cdr3: cdr3_i.map(get).filter(|s| !s.is_empty()),
            });
        }

        if rows.is_empty() {
            return Err(eyre!("The database {path:?} has no rows.")
                .suggestion("Is the file a tab-separated AIRR or Change-O table?"));
        }
        debug!("Read {} rows from the database {path:?}.", rows.len());

        Ok(Database { rows, path: Some(path.as_ref().to_path_buf()) })
    }

    /// Returns the rows of a clone.
    ///
    /// Numeric clone ids are compared as numbers, so `042` is clone `42`.
    pub fn clone_rows(&self, clone: &str) -> Vec<&Row> {
        self.rows.iter().filter(|row| same_clone(&row.clone, clone)).collect()
    }

    /// Returns the number of distinct clones.
    pub fn clone_count(&self) -> usize {
        self.rows.iter().map(|row| row.clone.as_str()).unique().count()
    }

    /// Returns the row holding the germline of a tree.
    ///
    /// - A database of a single clone uses its first row.
    /// - Otherwise the row named like the first non-root node wins,
    ///   then the first row of the clone numbered in the tree id.
    ///
    /// Rows without a germline are skipped.
    pub fn germline_row(&self, tree_id: &str, first_name: &str) -> Result<&Row, Report> {
        let has_germline = |row: &&Row| !row.germline.is_empty();
        let row = match self.clone_count() {
            1 => self.rows.iter().find(has_germline),
            _ => self
                .rows
                .iter()
                .filter(has_germline)
                .find(|row| !first_name.is_empty() && row.id == first_name)
                .or_else(|| {
                    let clone = utils::clone_number(tree_id);
                    self.clone_rows(&clone).into_iter().find(has_germline)
                }),
        };
        row.wrap_err_with(|| eyre!("Could not find a germline sequence for tree {tree_id}."))
            .suggestion("Does the tree id carry the clone number, or its first node the name of a sequence?")
    }
}

impl SequenceSource for Database {
    /// The root takes the germline of [`Database::germline_row`], whose CDR3
    /// length sets the CDR3 end. Other nodes take the sequence of the row
    /// matching their name.
    fn link(&self, tree: &mut LinkedTree) -> Result<(), Report> {
        let preorder = tree.phylogeny.preorder()?;
        let first_name = match preorder.get(1) {
            Some(node_index) => tree.phylogeny.get_node(*node_index)?.label().to_string(),
            None => String::new(),
        };
        let germline_row = self.germline_row(&tree.id, &first_name)?;
        debug!("Tree {}: germline from row {} of clone {}.", tree.id, germline_row.id, germline_row.clone);

        let root = tree.phylogeny.get_root_index()?;
        tree.set_sequence(root, &germline_row.germline)?;
        if let Some(cdr3) = &germline_row.cdr3 {
            tree.set_cdr3_length(cdr3.len());
        }

        let records: Vec<Record> = self
            .rows
            .iter()
            .map(|row| Record { id: row.id.clone(), sequence: row.sequence.clone() })
            .collect();
        tree.link_records(&records)?;
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns true if two clone ids name the same clone.
///
/// ```rust
/// use igtreez::linkage::database::same_clone;
/// assert!(same_clone("042", "42"));
/// assert!(same_clone("A1", "A1"));
/// assert!(!same_clone("A1", "1"));
/// ```
pub fn same_clone(a: &str, b: &str) -> bool {
    match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
