use crate::{newick, FromNewick};

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fmt::{Display, Formatter};

/// A [`Branch`] from a parent to a child in the [`Phylogeny`](crate::Phylogeny).
///
/// In lineage trees the length is a count of point mutations along the branch.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Branch {
    /// [`Branch`] length (ex. 1.0).
    pub length: f32,
    /// [`Branch`] confidence (ex. 90.0).
    pub confidence: f32,
}

#[rustfmt::skip]
impl AsPrimitive<f32> for Branch { fn as_(self) -> f32 { self.length } }
#[rustfmt::skip]
impl Default for Branch { fn default() -> Self { Self::new() } }
#[rustfmt::skip]
impl Display for Branch { fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.length) } }
#[rustfmt::skip]
impl Branch { pub fn new() -> Self { Branch { length: 0.0, confidence: 0.0 } } }

impl Branch {
    /// Returns a [`Branch`] of the given length with no confidence.
    pub fn with_length(length: f32) -> Self {
        Branch { length, confidence: 0.0 }
    }
}

impl FromNewick for Branch {
    /// Returns a [`Branch`] created from a [Newick](https://en.wikipedia.org/wiki/Newick_format) node [`str`].
    ///
    /// # Examples
    ///
    /// Just a node name.
    ///
    /// ```rust
    /// use igtreez_phylo::{Branch, FromNewick};
    ///
    /// let branch = Branch::from_newick(&"A")?;
    /// assert_eq!(branch, Branch { length: 0.0, confidence: 0.0 });
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    ///
    /// Branch length and confidence.
    ///
    /// ```rust
    /// # use igtreez_phylo::{Branch, FromNewick};
    /// let branch = Branch::from_newick(&"'seq:1':2:90")?;
    /// assert_eq!(branch, Branch { length: 2.0, confidence: 90.0 });
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    ///
    /// Branch confidence as a decimal.
    ///
    /// ```rust
    /// # use igtreez_phylo::{Branch, FromNewick};
    /// let branch = Branch::from_newick(&":2:0.75")?;
    /// assert_eq!(branch, Branch { length: 2.0, confidence: 75.0 });
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    ///
    /// Negative lengths are rejected.
    ///
    /// ```rust
    /// # use igtreez_phylo::{Branch, FromNewick};
    /// assert!(Branch::from_newick(&"A:-1").is_err());
    /// ```
    fn from_newick(newick: &str) -> Result<Branch, Report> {
        let text = newick.trim();
        let text = text.strip_suffix(';').unwrap_or(text);
        let (_label, attributes) = newick::split_label(text);
        let attributes: Vec<_> = attributes.split(':').map(str::trim).collect();

        let length: f32 = match attributes.len() >= 2 && !attributes[1].is_empty() {
            true => attributes[1]
                .parse()
                .wrap_err_with(|| eyre!("Failed to parse branch length from newick: {newick}"))?,
            false => 0.0,
        };
        if length < 0.0 {
            return Err(eyre!("Negative branch length in newick: {newick}"));
        }

        let confidence = match attributes.len() >= 3 && !attributes[2].is_empty() {
            true => {
                let confidence: f32 = attributes[2]
                    .parse()
                    .wrap_err_with(|| eyre!("Failed to parse confidence from newick: {newick}"))?;
                // if confidence is a decimal, multiple by 100
                match confidence < 1.0 {
                    true => confidence * 100.0,
                    false => confidence,
                }
            }
            false => 0.0,
        };

        Ok(Branch { length, confidence })
    }
}
