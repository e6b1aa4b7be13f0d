//! Create and write the output [Table]s.

#[cfg(test)]
mod tests;

use crate::utils;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fmt::Debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A row-based table of text values.
///
/// # Examples
///
/// ```
/// use igtreez::Table;
///
/// let mut table = Table::new();
/// table.headers = vec!["tree_id".to_string(), "nodes".to_string()];
/// table.add_row(vec!["clone_1".to_string(), "4".to_string()])?;
///
/// assert_eq!(table.get_column("nodes")?, ["4"]);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Table {
    /// Names of the table columns.
    pub headers: Vec<String>,
    /// Rows of table values.
    pub rows: Vec<Vec<String>>,
    /// Optional file path for where the table was written to.
    pub path: Option<PathBuf>,
}

impl Table {
    /// Create a new table with empty headers and rows.
    pub fn new() -> Self {
        Table { headers: Vec::new(), rows: Vec::new(), path: None }
    }

    /// Create a new table with column names and no rows.
    pub fn with_headers<S: ToString>(headers: &[S]) -> Self {
        Table { headers: headers.iter().map(|h| h.to_string()).collect(), ..Default::default() }
    }

    /// Add a new row to the table.
    ///
    /// The row must have as many values as the table has columns.
    ///
    /// ```
    /// use igtreez::Table;
    ///
    /// let mut table = Table::with_headers(&["1", "2"]);
    /// assert!(table.add_row(vec!["A".to_string(), "B".to_string()]).is_ok());
    /// assert!(table.add_row(vec!["C".to_string()]).is_err());
    /// ```
    pub fn add_row(&mut self, row: Vec<String>) -> Result<(), Report> {
        let (new, ex) = (row.len(), self.headers.len());
        if new != ex {
            return Err(eyre!("New row size ({new}) does not match the table headers ({ex})."));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Return a vector of table values in a column.
    ///
    /// ```
    /// use igtreez::Table;
    ///
    /// let mut table = Table::with_headers(&["1", "2"]);
    /// table.add_row(vec!["A".to_string(), "B".to_string()])?;
    /// table.add_row(vec!["C".to_string(), "D".to_string()])?;
    ///
    /// assert_eq!(table.get_column("2")?, ["B", "D"]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn get_column(&self, header: &str) -> Result<Vec<&str>, Report> {
        let header_i = self.get_header_index(header)?;
        let column = self.rows.iter().map(|row| row[header_i].as_str()).collect();
        Ok(column)
    }

    /// Get the column index (0-based) correponding to the header.
    pub fn get_header_index(&self, header: &str) -> Result<usize, Report> {
        self.headers
            .iter()
            .position(|h| h == header)
            .ok_or_else(|| eyre!("Column '{header}' was not found in table: {:?}.", self.path))
    }

    /// Write table to file, the delimiter is chosen from the file extension.
    ///
    /// ```
    /// use igtreez::Table;
    ///
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("table.csv");
    ///
    /// let mut table = Table::with_headers(&["1", "2"]);
    /// table.add_row(vec!["A".to_string(), "B".to_string()])?;
    /// table.write(&path)?;
    ///
    /// assert_eq!(std::fs::read_to_string(&path)?, "1,2\nA,B\n");
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn write<P>(&mut self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        let delim = utils::get_delimiter(path)?.to_string();
        let file = File::create(path).wrap_err_with(|| format!("Unable to create file: {path:?}"))?;
        let mut writer = BufWriter::new(file);

        for row in std::iter::once(&self.headers).chain(self.rows.iter()) {
            let line = format!("{}\n", row.iter().map(|value| escape(value, &delim)).join(&delim));
            writer
                .write_all(line.as_bytes())
                .wrap_err_with(|| format!("Unable to write table row: {line}"))?;
        }
        writer.flush().wrap_err_with(|| format!("Unable to write file: {path:?}"))?;

        self.path = Some(path.as_ref().to_path_buf());
        Ok(())
    }
}

/// Quote values that would otherwise break a delimited line.
fn escape(value: &str, delim: &str) -> String {
    match value.contains(delim) || value.contains('"') || value.contains('\n') {
        true => format!("\"{}\"", value.replace('"', "\"\"")),
        false => value.to_string(),
    }
}
