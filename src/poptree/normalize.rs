//! Scale transition counts by the size of the populations they connect.

use crate::poptree::{PopulationLevels, TransitionKey, Transitions};
use std::collections::BTreeMap;

/// Normalize every transition count by the size of its source population.
///
/// A count becomes `count / source_size * (10 * total)`, where `total` is
/// the number of transitions of all population pairs together. Transitions
/// whose source population is empty are left out.
///
/// ```rust
/// use igtreez::poptree::normalize_by_source;
/// use std::collections::BTreeMap;
///
/// let key = ("GC".to_string(), "PB".to_string());
/// let transitions = BTreeMap::from([(key.clone(), vec![1.0, 2.0])]);
/// let populations = BTreeMap::from([("GC".to_string(), vec![3.0, 1.0, 2.0, 2.0])]);
///
/// let normalized = normalize_by_source(&transitions, &populations);
/// assert_eq!(normalized[&key], 2.0 / 4.0 * 20.0);
/// ```
pub fn normalize_by_source(
    transitions: &Transitions,
    populations: &PopulationLevels,
) -> BTreeMap<TransitionKey, f32> {
    normalize(transitions, populations, |(source, _dest)| source)
}

/// Normalize every transition count by the size of its destination population.
///
/// Same scaling as [`normalize_by_source`].
pub fn normalize_by_dest(
    transitions: &Transitions,
    populations: &PopulationLevels,
) -> BTreeMap<TransitionKey, f32> {
    normalize(transitions, populations, |(_source, dest)| dest)
}

fn normalize<F>(
    transitions: &Transitions,
    populations: &PopulationLevels,
    side: F,
) -> BTreeMap<TransitionKey, f32>
where
    F: Fn(&TransitionKey) -> &String,
{
    let total: usize = transitions.values().map(|dists| dists.len()).sum();
    let scale = (total * 10) as f32;

    transitions
        .iter()
        .filter_map(|(key, dists)| {
            let size = populations.get(side(key)).map(|levels| levels.len()).unwrap_or_default();
            match size {
                0 => None,
                size => Some((key.clone(), dists.len() as f32 / size as f32 * scale)),
            }
        })
        .collect()
}
