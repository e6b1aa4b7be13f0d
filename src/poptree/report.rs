//! Unite the transitions of all trees of a repertoire into output tables.

use crate::poptree::{
    display_name, normalize_by_dest, normalize_by_source, transition_name, PopulationLevels,
    Populations, TransitionKey, TreeTransitions, Transitions,
};
use crate::table::Table;
use crate::utils::{describe, DESCRIBE_STATS};

use color_eyre::eyre::{Report, Result};
use itertools::Itertools;
use std::collections::BTreeMap;

/// Transitions and population levels of a whole repertoire, plus the per-tree breakdown.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoptreeReport {
    /// Sample name, the first column of every table.
    pub sample: String,
    pub populations: Populations,
    pub transitions: Transitions,
    pub levels: PopulationLevels,
    pub trees: Vec<TreeTransitions>,
}

impl PoptreeReport {
    /// Unite the per-tree observations, trees keep the order they are given in.
    pub fn new(sample: &str, populations: &Populations, trees: Vec<TreeTransitions>) -> Self {
        let mut transitions = Transitions::new();
        let mut levels = PopulationLevels::new();
        for tree in &trees {
            tree.transitions.iter().for_each(|(key, dists)| {
                transitions.entry(key.clone()).or_default().extend(dists);
            });
            tree.populations.iter().for_each(|(pop, dists)| {
                levels.entry(pop.clone()).or_default().extend(dists);
            });
        }
        PoptreeReport {
            sample: sample.to_string(),
            populations: populations.clone(),
            transitions,
            levels,
            trees,
        }
    }

    /// Transition keys in the order of the population patterns.
    pub fn transition_keys(&self) -> Vec<&TransitionKey> {
        let order = |pop: &str| self.populations.position(pop).unwrap_or(usize::MAX);
        self.transitions
            .keys()
            .filter(|(source, dest)| source != dest)
            .sorted_by_key(|(source, dest)| (order(source.as_str()), order(dest.as_str())))
            .collect()
    }

    /// Populations with at least one member, in the order of the patterns.
    pub fn population_keys(&self) -> Vec<&String> {
        let order = |pop: &str| self.populations.position(pop).unwrap_or(usize::MAX);
        self.levels.keys().sorted_by_key(|pop| order(pop.as_str())).collect()
    }

    /// Total number of transitions in the repertoire.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(|dists| dists.len()).sum()
    }

    // ------------------------------------------------------------------------
    // Repertoire Tables

    /// Every transition distance, one column per transition.
    pub fn transition_distances(&self) -> Result<Table, Report> {
        let columns = self
            .transition_keys()
            .into_iter()
            .map(|key| (transition_name(key), format_values(&self.transitions[key])))
            .collect_vec();
        self.column_table(columns)
    }

    /// Summary statistics of the transition distances.
    pub fn transition_summary(&self) -> Result<Table, Report> {
        let columns = self
            .transition_keys()
            .into_iter()
            .map(|key| (transition_name(key), self.transitions[key].as_slice()))
            .collect_vec();
        self.summary_table(columns)
    }

    /// Transition counts normalized by the size of the source population.
    pub fn normalized_by_source(&self) -> Result<Table, Report> {
        let normalized = normalize_by_source(&self.transitions, &self.levels);
        self.normalized_table(&normalized)
    }

    /// Transition counts normalized by the size of the destination population.
    pub fn normalized_by_dest(&self) -> Result<Table, Report> {
        let normalized = normalize_by_dest(&self.transitions, &self.levels);
        self.normalized_table(&normalized)
    }

    /// Distance from the root of every population member, one column per population.
    pub fn population_levels(&self) -> Result<Table, Report> {
        let columns = self
            .population_keys()
            .into_iter()
            .map(|pop| (display_name(pop).to_string(), format_values(&self.levels[pop])))
            .collect_vec();
        self.column_table(columns)
    }

    /// Summary statistics of the population levels.
    pub fn population_summary(&self) -> Result<Table, Report> {
        let columns = self
            .population_keys()
            .into_iter()
            .map(|pop| (display_name(pop).to_string(), self.levels[pop].as_slice()))
            .collect_vec();
        self.summary_table(columns)
    }

    // ------------------------------------------------------------------------
    // Per-Tree Tables

    /// Number of transitions of every tree.
    pub fn transition_counts_by_tree(&self) -> Result<Table, Report> {
        let keys = self.transition_keys();
        let headers = keys.iter().map(|key| transition_name(key)).collect_vec();
        self.tree_table(&headers, |tree| {
            keys.iter()
                .map(|key| tree.transitions.get(*key).map(|d| d.len()).unwrap_or_default().to_string())
                .collect()
        })
    }

    /// Transition distances of every tree, joined by spaces.
    pub fn transition_distances_by_tree(&self) -> Result<Table, Report> {
        let keys = self.transition_keys();
        let headers = keys.iter().map(|key| transition_name(key)).collect_vec();
        self.tree_table(&headers, |tree| {
            keys.iter()
                .map(|key| tree.transitions.get(*key).map(|d| format_values(d).join(" ")).unwrap_or_default())
                .collect()
        })
    }

    /// Number of population members of every tree.
    pub fn population_counts_by_tree(&self) -> Result<Table, Report> {
        let pops = self.population_keys();
        let headers = pops.iter().map(|pop| display_name(pop).to_string()).collect_vec();
        self.tree_table(&headers, |tree| {
            pops.iter()
                .map(|pop| tree.populations.get(*pop).map(|d| d.len()).unwrap_or_default().to_string())
                .collect()
        })
    }

    /// Every output table with its file name suffix, tables without data are left out.
    pub fn tables(&self) -> Result<Vec<(&'static str, Table)>, Report> {
        let mut tables = Vec::new();
        if !self.transitions.is_empty() {
            tables.push(("transition_distances", self.transition_distances()?));
            tables.push(("transition_distances_summary", self.transition_summary()?));
            tables.push(("transition_counts_normalized_by_source", self.normalized_by_source()?));
            tables.push(("transition_counts_normalized_by_destination", self.normalized_by_dest()?));
            tables.push(("transition_counts_by_tree", self.transition_counts_by_tree()?));
            tables.push(("transition_distances_by_tree", self.transition_distances_by_tree()?));
        }
        if !self.levels.is_empty() {
            tables.push(("population_levels", self.population_levels()?));
            tables.push(("population_levels_summary", self.population_summary()?));
            tables.push(("population_counts_by_tree", self.population_counts_by_tree()?));
        }
        Ok(tables)
    }

    // ------------------------------------------------------------------------
    // Table Layouts

    /// Columns of unequal length side by side, shorter columns are padded with empty values.
    fn column_table(&self, columns: Vec<(String, Vec<String>)>) -> Result<Table, Report> {
        let mut headers = vec!["sample".to_string()];
        headers.extend(columns.iter().map(|(name, _values)| name.clone()));
        let mut table = Table::with_headers(&headers);

        let rows = columns.iter().map(|(_name, values)| values.len()).max().unwrap_or_default();
        for row_i in 0..rows {
            let mut row = vec![self.sample.clone()];
            row.extend(columns.iter().map(|(_name, values)| values.get(row_i).cloned().unwrap_or_default()));
            table.add_row(row)?;
        }
        Ok(table)
    }

    /// One row per statistic, one column per value set.
    fn summary_table(&self, columns: Vec<(String, &[f32])>) -> Result<Table, Report> {
        let mut headers = vec!["sample".to_string(), "statistic".to_string()];
        headers.extend(columns.iter().map(|(name, _values)| name.clone()));
        let mut table = Table::with_headers(&headers);

        let stats = columns.iter().map(|(_name, values)| describe(values)).collect_vec();
        for (stat_i, stat) in DESCRIBE_STATS.iter().enumerate() {
            let mut row = vec![self.sample.clone(), stat.to_string()];
            row.extend(stats.iter().map(|s| s[stat_i].map(|v| v.to_string()).unwrap_or_default()));
            table.add_row(row)?;
        }
        Ok(table)
    }

    fn normalized_table(&self, normalized: &BTreeMap<TransitionKey, f32>) -> Result<Table, Report> {
        let columns = self
            .transition_keys()
            .into_iter()
            .filter_map(|key| normalized.get(key).map(|value| (transition_name(key), vec![value.to_string()])))
            .collect_vec();
        self.column_table(columns)
    }

    fn tree_table<F>(&self, headers: &[String], values: F) -> Result<Table, Report>
    where
        F: Fn(&TreeTransitions) -> Vec<String>,
    {
        let mut all_headers = vec!["sample".to_string(), "tree_id".to_string()];
        all_headers.extend(headers.iter().cloned());
        let mut table = Table::with_headers(&all_headers);

        for tree in &self.trees {
            let mut row = vec![self.sample.clone(), tree.tree_id.clone()];
            row.extend(values(tree));
            table.add_row(row)?;
        }
        Ok(table)
    }
}

fn format_values(values: &[f32]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
