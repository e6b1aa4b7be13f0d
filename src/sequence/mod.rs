//! Aligned nucleotide sequences, reading frames, and consensus reconstruction.


use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use noodles::fasta;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fmt::Debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Symbols that take part in consensus voting, highest tie priority first.
pub const VOTING_SYMBOLS: [u8; 6] = *b"-NACGT";

// ----------------------------------------------------------------------------
// Record
// ----------------------------------------------------------------------------

/// An aligned sequence record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub sequence: String,
}

impl Record {
    /// Parse a fasta record, normalizing the sequence with [`normalize`].
    pub fn from_fasta(fasta: fasta::Record) -> Result<Self, Report> {
        let id = fasta.name().to_string();
        let sequence = std::str::from_utf8(fasta.sequence().as_ref())
            .wrap_err_with(|| eyre!("Sequence of record {id} is not valid text."))?;
        Ok(Record { sequence: normalize(sequence), id })
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Read all records of a fasta alignment.
pub fn read_fasta<P>(path: &P) -> Result<Vec<Record>, Report>
where
    P: AsRef<Path> + Debug,
{
    let mut reader = File::open(path)
        .map(BufReader::new)
        .map(fasta::Reader::new)
        .wrap_err_with(|| eyre!("Unable to open fasta file: {path:?}"))?;

    let records = reader
        .records()
        .map(|result| {
            let record = result.wrap_err_with(|| eyre!("Unable to parse fasta record: {path:?}"))?;
            Record::from_fasta(record)
        })
        .collect::<Result<Vec<_>, Report>>()?;

    if records.is_empty() {
        return Err(eyre!("No records were found in fasta file: {path:?}")
            .suggestion("Is the file a fasta alignment?"));
    }
    Ok(records)
}

/// Returns an uppercase copy of `sequence` with `.` gaps written as `-`.
///
/// ```rust
/// assert_eq!(igtreez::sequence::normalize("ac.gt-n"), "AC-GT-N");
/// ```
pub fn normalize(sequence: &str) -> String {
    sequence.chars().map(|c| if c == '.' { '-' } else { c.to_ascii_uppercase() }).collect()
}

/// Returns true if `base` is one of `A`, `C`, `G`, `T` (either case).
#[rustfmt::skip]
pub fn is_regular_nuc(base: u8) -> bool { matches!(base.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T') }

/// Returns the first position that is not a gap (`-` or `.`).
///
/// A sequence made only of gaps returns its length.
///
/// ```rust
/// use igtreez::sequence::first_non_gap;
/// assert_eq!(first_non_gap(b"--.ACG"), 3);
/// assert_eq!(first_non_gap(b"---"), 3);
/// ```
pub fn first_non_gap(sequence: &[u8]) -> usize {
    sequence.iter().position(|b| *b != b'-' && *b != b'.').unwrap_or(sequence.len())
}

/// Returns the reading frame start for a sequence, given the germline's first non-gap position.
///
/// When the sequence starts after the germline, its start is advanced until
/// it falls in the same frame as the germline.
///
/// ```rust
/// use igtreez::sequence::rf_start;
/// assert_eq!(rf_start(3, 1), 3);
/// assert_eq!(rf_start(3, 4), 6);
/// assert_eq!(rf_start(0, 6), 6);
/// ```
pub fn rf_start(gl_start: usize, seq_start: usize) -> usize {
    match gl_start >= seq_start {
        true => gl_start,
        false => seq_start + (3 - (seq_start - gl_start) % 3) % 3,
    }
}

/// Returns the consensus of aligned sequences by majority vote at each position.
///
/// Only the symbols in [`VOTING_SYMBOLS`] vote. Ties go to the symbol that
/// comes first in [`VOTING_SYMBOLS`], and a position where nothing votes
/// becomes a gap.
///
/// ```rust
/// use igtreez::sequence::consensus;
/// let observed = consensus(&["ACGT", "ACGA", "TCGA"])?;
/// assert_eq!(observed, "ACGA");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn consensus(sequences: &[&str]) -> Result<String, Report> {
    let length = sequences
        .first()
        .map(|s| s.len())
        .ok_or_else(|| eyre!("No sequences are available for a consensus."))?;
    if let Some(other) = sequences.iter().find(|s| s.len() != length) {
        return Err(eyre!(
            "Sequences of different lengths cannot be combined ({length} vs {}).",
            other.len()
        ));
    }

    let consensus = (0..length)
        .map(|i| {
            let mut counts = [0_usize; VOTING_SYMBOLS.len()];
            for sequence in sequences {
                let base = sequence.as_bytes()[i].to_ascii_uppercase();
                if let Some(k) = VOTING_SYMBOLS.iter().position(|s| *s == base) {
                    counts[k] += 1;
                }
            }
            let (best, _count) = counts
                .iter()
                .enumerate()
                .fold((0, 0), |(bi, bc), (k, c)| if *c > bc { (k, *c) } else { (bi, bc) });
            VOTING_SYMBOLS[best] as char
        })
        .collect();

    Ok(consensus)
}
