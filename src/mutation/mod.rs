//! Classify point mutations between parent and child sequences, and summarize them per tree.

mod region;
pub mod summary;

#[doc(inline)]
pub use region::{Region, RegionMap};
#[doc(inline)]
pub use summary::MutationSummary;

use crate::amino_acid::{Charge, Chemical, HydrogenBond, Hydropathy, Polarity, Properties, Volume};
use crate::codon::{self, Substitution};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumIter, IntoStaticStr};

// ----------------------------------------------------------------------------
// Mutation Tag
// ----------------------------------------------------------------------------

/// One attribute of a mutation.
///
/// Tags are ordered by declaration, which is also the column order of a [`MutationSummary`].
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, IntoStaticStr, Ord, PartialEq, PartialOrd, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum MutationTag {
    // nucleotide
    Transition, Transversion,
    SourceA, SourceC, SourceG, SourceT,
    // codon
    R, S,
    // region
    Fwr1, Cdr1, Fwr2, Cdr2, Fwr3, Cdr3,
    // amino acid classes
    SourcePositive, SourceNegative, SourceUncharged,
    DestPositive, DestNegative, DestUncharged,
    SourceHydrophobic, SourceHydrophilic, SourceHydroNeutral,
    DestHydrophobic, DestHydrophilic, DestHydroNeutral,
    SourceVerySmall, SourceSmall, SourceMedium, SourceLarge, SourceVeryLarge,
    DestVerySmall, DestSmall, DestMedium, DestLarge, DestVeryLarge,
    SourceAliphatic, SourceAromatic, SourceSulfur, SourceHydroxyl, SourceBasic, SourceAcidic, SourceAmide,
    DestAliphatic, DestAromatic, DestSulfur, DestHydroxyl, DestBasic, DestAcidic, DestAmide,
    SourceDonor, SourceAcceptor, SourceDonorAcceptor,
    DestDonor, DestAcceptor, DestDonorAcceptor,
    SourcePolar, DestPolar,
    // replacements
    ChargeKeep, ChargeChange,
    HydroKeep, HydroChange,
    VolumeKeep, VolumeChange, VolumeIncrease, VolumeDecrease,
    ChemicalKeep, ChemicalChange,
    HbondKeep, HbondChange,
    PolarityKeep, PolarityChange,
}

use MutationTag::*;

impl From<Region> for MutationTag {
    fn from(region: Region) -> Self {
        match region {
            Region::Fwr1 => Fwr1,
            Region::Cdr1 => Cdr1,
            Region::Fwr2 => Fwr2,
            Region::Cdr2 => Cdr2,
            Region::Fwr3 => Fwr3,
            Region::Cdr3 => Cdr3,
        }
    }
}

impl From<Substitution> for MutationTag {
    fn from(substitution: Substitution) -> Self {
        match substitution {
            Substitution::Transition => Transition,
            Substitution::Transversion => Transversion,
        }
    }
}

impl MutationTag {
    /// Returns the region of a region tag.
    pub fn region(&self) -> Option<Region> {
        match self {
            Fwr1 => Some(Region::Fwr1),
            Cdr1 => Some(Region::Cdr1),
            Fwr2 => Some(Region::Fwr2),
            Cdr2 => Some(Region::Cdr2),
            Fwr3 => Some(Region::Fwr3),
            Cdr3 => Some(Region::Cdr3),
            _ => None,
        }
    }

    fn source_nucleotide(base: u8) -> Option<Self> {
        match base.to_ascii_uppercase() {
            b'A' => Some(SourceA),
            b'C' => Some(SourceC),
            b'G' => Some(SourceG),
            b'T' => Some(SourceT),
            _ => None,
        }
    }
}

/// Returns the (source, destination) label tags of every class of an amino acid.
///
/// Classes without a positive label (no hydrogen bond role, nonpolar) have no tag.
fn class_tags(properties: &Properties) -> Vec<(MutationTag, MutationTag)> {
    let charge = match properties.charge {
        Charge::Positive => (SourcePositive, DestPositive),
        Charge::Negative => (SourceNegative, DestNegative),
        Charge::Uncharged => (SourceUncharged, DestUncharged),
    };
    let hydropathy = match properties.hydropathy {
        Hydropathy::Hydrophobic => (SourceHydrophobic, DestHydrophobic),
        Hydropathy::Hydrophilic => (SourceHydrophilic, DestHydrophilic),
        Hydropathy::Neutral => (SourceHydroNeutral, DestHydroNeutral),
    };
    let volume = match properties.volume {
        Volume::VerySmall => (SourceVerySmall, DestVerySmall),
        Volume::Small => (SourceSmall, DestSmall),
        Volume::Medium => (SourceMedium, DestMedium),
        Volume::Large => (SourceLarge, DestLarge),
        Volume::VeryLarge => (SourceVeryLarge, DestVeryLarge),
    };
    let chemical = match properties.chemical {
        Chemical::Aliphatic => (SourceAliphatic, DestAliphatic),
        Chemical::Aromatic => (SourceAromatic, DestAromatic),
        Chemical::Sulfur => (SourceSulfur, DestSulfur),
        Chemical::Hydroxyl => (SourceHydroxyl, DestHydroxyl),
        Chemical::Basic => (SourceBasic, DestBasic),
        Chemical::Acidic => (SourceAcidic, DestAcidic),
        Chemical::Amide => (SourceAmide, DestAmide),
    };
    let hydrogen_bond = match properties.hydrogen_bond {
        HydrogenBond::Donor => Some((SourceDonor, DestDonor)),
        HydrogenBond::Acceptor => Some((SourceAcceptor, DestAcceptor)),
        HydrogenBond::DonorAcceptor => Some((SourceDonorAcceptor, DestDonorAcceptor)),
        HydrogenBond::Neither => None,
    };
    let polarity = match properties.polarity {
        Polarity::Polar => Some((SourcePolar, DestPolar)),
        Polarity::Nonpolar => None,
    };

    [Some(charge), Some(hydropathy), Some(volume), Some(chemical), hydrogen_bond, polarity]
        .into_iter()
        .flatten()
        .collect()
}

/// Returns the keep/change tags of a replacement from `source` to `dest`.
fn replacement_tags(source: &Properties, dest: &Properties) -> Vec<MutationTag> {
    let keep_or_change = |same: bool, keep, change| if same { keep } else { change };
    let mut tags = vec![
        keep_or_change(source.charge == dest.charge, ChargeKeep, ChargeChange),
        keep_or_change(source.hydropathy == dest.hydropathy, HydroKeep, HydroChange),
        keep_or_change(source.volume == dest.volume, VolumeKeep, VolumeChange),
        keep_or_change(source.chemical == dest.chemical, ChemicalKeep, ChemicalChange),
        keep_or_change(source.hydrogen_bond == dest.hydrogen_bond, HbondKeep, HbondChange),
        keep_or_change(source.polarity == dest.polarity, PolarityKeep, PolarityChange),
    ];
    match dest.volume.cmp(&source.volume) {
        std::cmp::Ordering::Greater => tags.push(VolumeIncrease),
        std::cmp::Ordering::Less => tags.push(VolumeDecrease),
        std::cmp::Ordering::Equal => (),
    }
    tags
}

// ----------------------------------------------------------------------------
// Mutation
// ----------------------------------------------------------------------------

/// A mutated position between a parent and a child sequence.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Mutation {
    /// Aligned position (0-based).
    pub position: usize,
    /// Nucleotides that changed, as (parent, child) pairs.
    pub changes: Vec<(u8, u8)>,
    /// Parent and child codons covering the position, when the codon fits in the sequence.
    pub codons: Option<([u8; 3], [u8; 3])>,
}

impl Mutation {
    /// A single nucleotide change at `position`.
    pub fn new(position: usize, source: u8, dest: u8, codons: Option<([u8; 3], [u8; 3])>) -> Self {
        Mutation { position, changes: vec![(source, dest)], codons }
    }

    /// A codon pair at `position`, where every differing pair of regular bases is a change.
    ///
    /// ```rust
    /// use igtreez::mutation::Mutation;
    /// let mutation = Mutation::from_codons(3, *b"AAA", *b"GAN");
    /// assert_eq!(mutation.changes, [(b'A', b'G')]);
    /// ```
    pub fn from_codons(position: usize, parent: [u8; 3], child: [u8; 3]) -> Self {
        let changes = parent
            .iter()
            .zip(child.iter())
            .filter(|(p, c)| p != c && Substitution::classify(**p, **c).is_some())
            .map(|(p, c)| (*p, *c))
            .collect();
        Mutation { position, changes, codons: Some((parent, child)) }
    }

    /// Returns the ordered, de-duplicated tags of this mutation.
    ///
    /// - Every changed nucleotide pair gives its source tag and transition or transversion.
    /// - Codons that both translate (stops included) give `r` or `s`.
    /// - Codons that both encode amino acids give the source and destination class tags,
    ///   and a replacement also gives the keep/change tags.
    /// - The position gives its region tag, if any.
    ///
    /// ```rust
    /// use igtreez::mutation::{Mutation, MutationTag::*, RegionMap};
    ///
    /// let mutation = Mutation::new(3, b'A', b'C', Some((*b"AAA", *b"ACA")));
    /// let tags = mutation.classify(&RegionMap::default(), false);
    /// assert!(tags.contains(&SourceA));
    /// assert!(tags.contains(&Transversion));
    /// assert!(tags.contains(&R));
    /// assert!(tags.contains(&Fwr1));
    /// ```
    pub fn classify(&self, regions: &RegionMap, no_cdr3: bool) -> Vec<MutationTag> {
        let mut tags: BTreeSet<MutationTag> = BTreeSet::new();

        // nucleotide level
        for (source, dest) in &self.changes {
            if let Some(substitution) = Substitution::classify(*source, *dest) {
                tags.extend(MutationTag::source_nucleotide(*source));
                tags.insert(substitution.into());
            }
        }

        // codon level
        if let Some((parent, child)) = &self.codons {
            if let (Some(source_aa), Some(dest_aa)) = (codon::translate(parent), codon::translate(child)) {
                tags.insert(if source_aa == dest_aa { S } else { R });

                let properties =
                    (Properties::from_amino_acid(source_aa), Properties::from_amino_acid(dest_aa));
                if let (Some(source), Some(dest)) = properties {
                    tags.extend(class_tags(&source).into_iter().map(|(s, _d)| s));
                    tags.extend(class_tags(&dest).into_iter().map(|(_s, d)| d));
                    if source_aa != dest_aa {
                        tags.extend(replacement_tags(&source, &dest));
                    }
                }
            }
        }

        // region
        tags.extend(regions.region(self.position, no_cdr3).map(MutationTag::from));

        tags.into_iter().collect()
    }
}
