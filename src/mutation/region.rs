use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A framework (FWR) or complementarity-determining (CDR) region of an antibody sequence.
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Region {
    Fwr1,
    Cdr1,
    Fwr2,
    Cdr2,
    Fwr3,
    Cdr3,
}

impl Region {
    #[rustfmt::skip]
    pub fn is_cdr(&self) -> bool { matches!(self, Region::Cdr1 | Region::Cdr2 | Region::Cdr3) }
}

/// Region start positions, 0-based aligned coordinates.
///
/// Each region covers `[start, next_start)`, and CDR3 covers `[cdr3, cdr3_end)`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct RegionMap {
    pub fwr1: usize,
    pub cdr1: usize,
    pub fwr2: usize,
    pub cdr2: usize,
    pub fwr3: usize,
    pub cdr3: usize,
    pub cdr3_end: usize,
}

impl Default for RegionMap {
    /// IMGT unique numbering of a gapped V region, with an empty CDR3.
    fn default() -> Self {
        RegionMap { fwr1: 0, cdr1: 78, fwr2: 114, cdr2: 165, fwr3: 195, cdr3: 313, cdr3_end: 312 }
    }
}

impl RegionMap {
    /// Returns the map with CDR3 ending `length` positions after its start.
    ///
    /// ```rust
    /// use igtreez::mutation::RegionMap;
    /// let regions = RegionMap::default().with_cdr3_length(30);
    /// assert_eq!(regions.cdr3_end, 343);
    /// ```
    pub fn with_cdr3_length(mut self, length: usize) -> Self {
        self.cdr3_end = self.cdr3 + length;
        self
    }

    /// Returns the region containing `position`.
    ///
    /// Positions before FWR1 or past the CDR3 end, and CDR3 positions when
    /// `no_cdr3` is set, have no region.
    ///
    /// ```rust
    /// use igtreez::mutation::{Region, RegionMap};
    /// let regions = RegionMap::default();
    /// assert_eq!(regions.region(77, false), Some(Region::Fwr1));
    /// assert_eq!(regions.region(78, false), Some(Region::Cdr1));
    /// assert_eq!(regions.region(400, false), None);
    /// ```
    pub fn region(&self, position: usize, no_cdr3: bool) -> Option<Region> {
        let starts = [
            (self.fwr1, Region::Fwr1),
            (self.cdr1, Region::Cdr1),
            (self.fwr2, Region::Fwr2),
            (self.cdr2, Region::Cdr2),
            (self.fwr3, Region::Fwr3),
            (self.cdr3, Region::Cdr3),
        ];
        let ends = [self.cdr1, self.fwr2, self.cdr2, self.fwr3, self.cdr3, self.cdr3_end];

        let region = starts
            .into_iter()
            .zip(ends)
            .find(|((start, _), end)| *start <= position && position < *end)
            .map(|((_, region), _)| region)?;

        match region == Region::Cdr3 && no_cdr3 {
            true => None,
            false => Some(region),
        }
    }
}
