//! Count and classify the mutations along every branch of a repertoire.

use crate::linkage::{airr, fasta, fasta::Alignment, tree, Database, DbFormat, FieldConfig, LinkedTree};
use crate::mutation::{summary::SELECTION_COLUMNS, MutationSummary};
use crate::run::{par_map, write_args, write_table, Input, TreeResults};
use crate::table::Table;
use crate::utils;

use clap::Parser;
use color_eyre::eyre::{Report, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Count and classify mutations along the branches of lineage trees.
#[derive(Clone, Debug, Deserialize, Parser, PartialEq, Serialize)]
pub struct Args {
    #[clap(flatten)]
    pub input: Input,

    /// FASTA alignments, one per tree, or directories of alignments.
    ///
    /// Trees and alignments are paired in sorted file order.
    #[clap(short = 'f', long, num_args = 1.., required_unless_present_any = ["database", "json"])]
    #[clap(conflicts_with_all = ["database", "json"])]
    pub fasta: Vec<PathBuf>,

    /// AIRR or Change-O sequence database (tsv or csv).
    #[clap(short = 'd', long, conflicts_with = "json")]
    pub database: Option<PathBuf>,

    /// Id of the germline record in the FASTA alignments.
    #[clap(short = 'g', long, default_value_t = Args::default().gl_name)]
    pub gl_name: String,

    /// Column naming convention of the database, use `airr` for AIRR rearrangement tables.
    #[clap(long, value_enum, default_value_t = DbFormat::default())]
    pub db_format: DbFormat,

    /// Database column of the aligned sequences.
    #[clap(long)]
    pub seq_field: Option<String>,

    /// Database column of the aligned germline.
    #[clap(long)]
    pub gl_field: Option<String>,

    /// Database column of the clone ids.
    #[clap(long)]
    pub clone_field: Option<String>,

    /// Database column of the sequence ids.
    #[clap(long)]
    pub id_field: Option<String>,

    /// Skip the branches leaving the root.
    #[clap(long)]
    pub no_trunk: bool,

    /// Do not assign mutations to CDR3.
    #[clap(long)]
    pub no_cdr3: bool,

    /// Also write the selection table.
    #[clap(long)]
    pub selection: bool,

    /// Write `:` and `;` in FASTA record ids as `-`.
    #[clap(long)]
    pub illumina: bool,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            input: Input::default(),
            fasta: Vec::new(),
            database: None,
            gl_name: "GL".to_string(),
            db_format: DbFormat::default(),
            seq_field: None,
            gl_field: None,
            clone_field: None,
            id_field: None,
            no_trunk: false,
            no_cdr3: false,
            selection: false,
            illumina: false,
        }
    }
}

impl Args {
    /// Database columns, the format preset with the user overrides.
    pub fn fields(&self) -> FieldConfig {
        FieldConfig::from_format(self.db_format).with_overrides(
            self.seq_field.as_deref(),
            self.gl_field.as_deref(),
            self.clone_field.as_deref(),
            self.id_field.as_deref(),
        )
    }
}

/// Count the mutations of every tree and write the mutation tables.
///
/// Returns the summaries of the analysed trees, keyed by tree id.
pub fn mutations(args: &Args) -> Result<TreeResults<MutationSummary>, Report> {
    let output_dir = utils::create_dir(&args.input.output_dir)?;
    write_args(args, &output_dir, "mutations")?;

    // ------------------------------------------------------------------------
    // Link Sequences

    let linked = TreeResults::new(link(args)?);
    let mut results = TreeResults { kept: BTreeMap::new(), dropped: linked.dropped };
    let linked = args.input.sample(linked.kept.into_values().collect());

    // ------------------------------------------------------------------------
    // Summarize

    info!("Counting mutations.");
    let summaries = par_map(linked, args.input.threads, |tree: LinkedTree| {
        let summary = MutationSummary::from_tree(&tree, args.no_trunk, args.no_cdr3);
        (tree.id, summary)
    })?;
    summaries.into_iter().for_each(|(id, summary)| results.add(id, summary));

    // ------------------------------------------------------------------------
    // Tables

    let mut table = Table::with_headers(&MutationSummary::headers());
    for summary in results.kept.values() {
        table.add_row(summary.to_row())?;
    }
    write_table(&mut table, &output_dir, &args.input.name, "mutations")?;

    if args.selection {
        let mut table = Table::with_headers(&SELECTION_COLUMNS);
        for summary in results.kept.values() {
            table.add_row(summary.to_selection_row(&args.input.name))?;
        }
        write_table(&mut table, &output_dir, &args.input.name, "selection")?;
    }

    results.log_summary();
    info!("Done.");
    Ok(results)
}

/// Link every tree to its node sequences, from the AIRR JSON, the database, or the FASTA alignments.
fn link(args: &Args) -> Result<Vec<(String, Result<LinkedTree, Report>)>, Report> {
    let threads = args.input.threads;

    if let Some(json) = &args.input.json {
        if args.illumina {
            warn!("--illumina only applies to FASTA alignments and is ignored.");
        }
        info!("Linking trees to AIRR clones: {json:?}");
        let clones = airr::read_clones(json)?;
        return par_map(clones, threads, |clone| (clone.clone_id.clone(), clone.linked_tree()));
    }

    let trees = args.input.read_trees()?;

    if let Some(path) = &args.database {
        info!("Linking trees to database: {path:?}");
        let database = Database::read(path, &args.fields())?;
        return par_map(trees, threads, |tree| {
            let linked = LinkedTree::from_source(&tree.id, tree.phylogeny, &database);
            (tree.id, linked)
        });
    }

    info!("Linking trees to fasta alignments.");
    let alignments = tree::collect_files(&args.fasta)?
        .iter()
        .map(|path| {
            let alignment = Alignment::read(path, &args.gl_name)?;
            Ok::<_, Report>(match args.illumina {
                true => alignment.with_illumina_names(),
                false => alignment,
            })
        })
        .collect::<Result<Vec<_>, Report>>()?;
    let ids = trees.iter().map(|tree| tree.id.clone()).collect::<Vec<_>>();
    let linked = fasta::link(trees, &alignments)?;
    Ok(ids.into_iter().zip(linked).collect())
}
