//! Translate codons with the standard genetic code and classify point substitutions.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Stop codon sentinel returned by [`translate`].
pub const STOP: char = '*';

/// Order of bases used to index [`GENETIC_CODE`].
const BASES: [u8; 4] = *b"TCAG";

/// Standard genetic code, indexed by `16 * first + 4 * second + third` over [`BASES`].
const GENETIC_CODE: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// Returns the amino acid letter encoded by a codon, or [`STOP`] for stop codons.
///
/// Triplets with gaps, ambiguity codes, or the wrong length return [`None`].
///
/// ```rust
/// use igtreez::codon::{translate, STOP};
/// assert_eq!(translate(b"AAA"), Some('K'));
/// assert_eq!(translate(b"tgg"), Some('W'));
/// assert_eq!(translate(b"TAG"), Some(STOP));
/// assert_eq!(translate(b"A-A"), None);
/// assert_eq!(translate(b"AAAA"), None);
/// ```
pub fn translate(codon: &[u8]) -> Option<char> {
    let [first, second, third] = codon else {
        return None;
    };
    let index = |base: &u8| BASES.iter().position(|b| *b == base.to_ascii_uppercase());
    let i = 16 * index(first)? + 4 * index(second)? + index(third)?;
    Some(GENETIC_CODE[i] as char)
}

// ----------------------------------------------------------------------------
// Substitution
// ----------------------------------------------------------------------------

/// Kind of a single nucleotide substitution.
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Substitution {
    /// Purine to purine (A/G) or pyrimidine to pyrimidine (C/T).
    Transition,
    /// Purine to pyrimidine or the reverse.
    Transversion,
}

impl Substitution {
    /// Classifies the substitution of `source` by `dest`.
    ///
    /// Returns [`None`] when either base is not A/C/G/T or the bases are equal.
    ///
    /// ```rust
    /// use igtreez::codon::Substitution;
    /// assert_eq!(Substitution::classify(b'A', b'G'), Some(Substitution::Transition));
    /// assert_eq!(Substitution::classify(b'A', b'C'), Some(Substitution::Transversion));
    /// assert_eq!(Substitution::classify(b'A', b'A'), None);
    /// assert_eq!(Substitution::classify(b'A', b'N'), None);
    /// ```
    pub fn classify(source: u8, dest: u8) -> Option<Substitution> {
        let is_purine = |base: u8| match base.to_ascii_uppercase() {
            b'A' | b'G' => Some(true),
            b'C' | b'T' => Some(false),
            _ => None,
        };
        let (source_purine, dest_purine) = (is_purine(source)?, is_purine(dest)?);
        if source.eq_ignore_ascii_case(&dest) {
            return None;
        }
        match source_purine == dest_purine {
            true => Some(Substitution::Transition),
            false => Some(Substitution::Transversion),
        }
    }
}
