//! Physicochemical classes of the 20 standard amino acids, following the
//! [IMGT classes](http://www.imgt.org/IMGTeducation/Aide-memoire/_UK/aminoacids/IMGTclasses.html).


use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The 20 standard amino acids, one letter codes.
pub const AMINO_ACIDS: [char; 20] =
    ['A', 'R', 'N', 'D', 'C', 'Q', 'E', 'G', 'H', 'I', 'L', 'K', 'M', 'F', 'P', 'S', 'T', 'W', 'Y', 'V'];

// ----------------------------------------------------------------------------
// Classes
// ----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Charge {
    Positive,
    Negative,
    Uncharged,
}

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Hydropathy {
    Hydrophobic,
    Hydrophilic,
    Neutral,
}

/// Side chain volume, ordered from smallest to largest.
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Volume {
    VerySmall,
    Small,
    Medium,
    Large,
    VeryLarge,
}

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Chemical {
    Aliphatic,
    Aromatic,
    Sulfur,
    Hydroxyl,
    Basic,
    Acidic,
    Amide,
}

/// Role of the side chain in hydrogen bonds.
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum HydrogenBond {
    Donor,
    Acceptor,
    DonorAcceptor,
    Neither,
}

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Polarity {
    Polar,
    Nonpolar,
}

// ----------------------------------------------------------------------------
// Properties
// ----------------------------------------------------------------------------

/// Every class of one amino acid.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Properties {
    pub charge: Charge,
    pub hydropathy: Hydropathy,
    pub volume: Volume,
    pub chemical: Chemical,
    pub hydrogen_bond: HydrogenBond,
    pub polarity: Polarity,
}

impl Properties {
    /// Returns the classes of an amino acid, or [`None`] for stops, gaps, and unknown letters.
    ///
    /// ```rust
    /// use igtreez::amino_acid::{Charge, Properties, Volume};
    ///
    /// let lys = Properties::from_amino_acid('K').unwrap();
    /// assert_eq!(lys.charge, Charge::Positive);
    /// assert_eq!(lys.volume, Volume::Large);
    ///
    /// assert_eq!(Properties::from_amino_acid('*'), None);
    /// ```
    pub fn from_amino_acid(amino_acid: char) -> Option<Self> {
        let aa = amino_acid.to_ascii_uppercase();
        if !AMINO_ACIDS.contains(&aa) {
            return None;
        }

        let charge = match aa {
            'R' | 'H' | 'K' => Charge::Positive,
            'D' | 'E' => Charge::Negative,
            _ => Charge::Uncharged,
        };
        let hydropathy = match aa {
            'A' | 'C' | 'I' | 'L' | 'M' | 'F' | 'W' | 'V' => Hydropathy::Hydrophobic,
            'R' | 'N' | 'D' | 'Q' | 'E' | 'K' => Hydropathy::Hydrophilic,
            _ => Hydropathy::Neutral,
        };
        let volume = match aa {
            'A' | 'G' | 'S' => Volume::VerySmall,
            'N' | 'D' | 'C' | 'P' | 'T' => Volume::Small,
            'Q' | 'E' | 'H' | 'V' => Volume::Medium,
            'R' | 'I' | 'L' | 'K' | 'M' => Volume::Large,
            _ => Volume::VeryLarge,
        };
        let chemical = match aa {
            'A' | 'G' | 'I' | 'L' | 'P' | 'V' => Chemical::Aliphatic,
            'F' | 'W' | 'Y' => Chemical::Aromatic,
            'C' | 'M' => Chemical::Sulfur,
            'S' | 'T' => Chemical::Hydroxyl,
            'R' | 'H' | 'K' => Chemical::Basic,
            'D' | 'E' => Chemical::Acidic,
            _ => Chemical::Amide,
        };
        let hydrogen_bond = match aa {
            'R' | 'K' | 'W' => HydrogenBond::Donor,
            'D' | 'E' => HydrogenBond::Acceptor,
            'N' | 'Q' | 'H' | 'S' | 'T' | 'Y' => HydrogenBond::DonorAcceptor,
            _ => HydrogenBond::Neither,
        };
        let polarity = match aa {
            'R' | 'N' | 'D' | 'Q' | 'E' | 'H' | 'K' | 'S' | 'T' | 'Y' => Polarity::Polar,
            _ => Polarity::Nonpolar,
        };

        Some(Properties { charge, hydropathy, volume, chemical, hydrogen_bond, polarity })
    }
}
