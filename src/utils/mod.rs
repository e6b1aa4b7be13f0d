//! Small helpers shared by the subcommands.

#[cfg(test)]
mod tests;
pub mod verbosity;

use color_eyre::eyre::{eyre, ContextCompat, Report, Result, WrapErr};
use color_eyre::Help;
use itertools::Itertools;
use rand::seq::index;
use std::convert::AsRef;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Get delimiter based on file extension.
///
/// ## Examples
///
/// - `.tsv` => `\t`
/// - `.txt` => `\t`
/// - `.csv` => `,`
///
/// ```rust
/// use igtreez::utils::get_delimiter;
///
/// assert_eq!(get_delimiter(&"file.tsv")?, '\t');
/// assert_eq!(get_delimiter(&"file.csv")?, ',');
/// assert_eq!(get_delimiter(&"file.txt")?, '\t');
/// assert!(get_delimiter(&"file").is_err());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn get_delimiter<P>(path: &P) -> Result<char, Report>
where
    P: AsRef<Path> + Debug,
{
    let ext = path
        .as_ref()
        .extension()
        .wrap_err_with(|| eyre!("Failed to get file extension: {path:?}"))?
        .to_str()
        .wrap_err_with(|| eyre!("Failed to convert file extension to str: {path:?}"))?;
    match ext {
        "tsv" | "txt" => Ok('\t'),
        "csv" => Ok(','),
        _ext => {
            Err(eyre!("Unknown file extension: {_ext:?}").suggestion("Options: tsv, csv, or txt"))
        }
    }
}

/// Returns the file name without its extension.
///
/// ```rust
/// use igtreez::utils::file_stem;
/// assert_eq!(file_stem(&"trees/clone_42.newick")?, "clone_42");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn file_stem<P>(path: &P) -> Result<String, Report>
where
    P: AsRef<Path> + Debug,
{
    let stem = path
        .as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .wrap_err_with(|| eyre!("Failed to get file name: {path:?}"))?;
    Ok(stem.to_string())
}

/// Returns the first run of digits in a tree id, or the whole id if it has none.
///
/// ```rust
/// use igtreez::utils::clone_number;
/// assert_eq!(clone_number("clone_0042_tree"), "42");
/// assert_eq!(clone_number("tree7b12"), "7");
/// assert_eq!(clone_number("germinal"), "germinal");
/// ```
pub fn clone_number(tree_id: &str) -> String {
    let digits: String = tree_id
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<u64>() {
        Ok(number) => number.to_string(),
        Err(_) => tree_id.to_string(),
    }
}

/// Create a directory (and its parents) if it does not exist yet.
pub fn create_dir<P>(dir: &P) -> Result<PathBuf, Report>
where
    P: AsRef<Path> + Debug,
{
    let dir = dir.as_ref();
    if !dir.exists() {
        std::fs::create_dir_all(dir).wrap_err_with(|| eyre!("Failed to create directory: {dir:?}"))?;
    }
    Ok(dir.to_path_buf())
}

/// Returns a random sample of `n` items without replacement, in their original order.
///
/// All items are returned when `n` is not smaller than their number.
pub fn sample<T>(items: Vec<T>, n: usize) -> Vec<T> {
    if n >= items.len() {
        return items;
    }
    let mut rng = rand::thread_rng();
    let keep = index::sample(&mut rng, items.len(), n).into_iter().sorted().collect_vec();
    items
        .into_iter()
        .enumerate()
        .filter(|(i, _item)| keep.binary_search(i).is_ok())
        .map(|(_i, item)| item)
        .collect()
}

// ----------------------------------------------------------------------------
// Summary Statistics
// ----------------------------------------------------------------------------

/// Names of the statistics returned by [`describe`], in order.
pub const DESCRIBE_STATS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Returns count, mean, sample standard deviation, min, quartiles and max of `values`.
///
/// Quartiles are linearly interpolated. Statistics that are undefined for
/// too few values are [`None`].
///
/// ```rust
/// use igtreez::utils::describe;
/// let stats = describe(&[1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(stats[0], Some(4.0));
/// assert_eq!(stats[1], Some(2.5));
/// assert_eq!(stats[4], Some(1.75));
/// assert_eq!(stats[7], Some(4.0));
/// assert_eq!(describe(&[])[1], None);
/// ```
pub fn describe(values: &[f32]) -> [Option<f64>; 8] {
    let count = values.len();
    let sorted = values.iter().map(|v| *v as f64).sorted_by(|a, b| a.total_cmp(b)).collect_vec();
    if sorted.is_empty() {
        return [Some(0.0), None, None, None, None, None, None, None];
    }

    let n = count as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let std = match count > 1 {
        true => Some((sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()),
        false => None,
    };
    let quantile = |q: f64| {
        let position = q * (n - 1.0);
        let (low, high) = (position.floor() as usize, position.ceil() as usize);
        sorted[low] + (sorted[high] - sorted[low]) * (position - low as f64)
    };

    [
        Some(n),
        Some(mean),
        std,
        sorted.first().copied(),
        Some(quantile(0.25)),
        Some(quantile(0.5)),
        Some(quantile(0.75)),
        sorted.last().copied(),
    ]
}
