use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use super::model::Set;

/// Maximum number of sets a dataset may declare.
///
/// Every set owns one bit of a [`SetMask`], so the width of the backing
/// integer is the hard limit.
pub const MAX_SETS: usize = u64::BITS as usize;

// ---------------------------------------------------------------------------
// SetMask – fixed-width bit-set over declared sets
// ---------------------------------------------------------------------------

/// A bit-set where bit `i` stands for the `i`-th declared set.
///
/// A single set's identifier is a mask with exactly one bit set
/// (1, 2, 4, 8, …); a row's membership or a combination is the union
/// of such identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetMask(u64);

impl SetMask {
    pub const EMPTY: SetMask = SetMask(0);

    /// Identifier of the set at `position` in declaration order.
    /// Returns `None` past [`MAX_SETS`].
    pub fn single(position: usize) -> Option<Self> {
        if position < MAX_SETS {
            Some(SetMask(1u64 << position))
        } else {
            None
        }
    }

    pub fn from_bits(bits: u64) -> Self {
        SetMask(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of sets in the mask (the degree of a combination).
    pub fn degree(self) -> u32 {
        self.0.count_ones()
    }

    /// Whether every bit of `other` is also in `self`.
    pub fn contains(self, other: SetMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Keep only the bits also present in `scope`.
    pub fn restrict(self, scope: SetMask) -> SetMask {
        SetMask(self.0 & scope.0)
    }

    /// Decompose into single-set identifiers, lowest bit first.
    pub fn singles(self) -> impl Iterator<Item = SetMask> {
        let mut rest = self.0;
        std::iter::from_fn(move || {
            if rest == 0 {
                return None;
            }
            let low = rest & rest.wrapping_neg();
            rest &= !low;
            Some(SetMask(low))
        })
    }
}

impl BitOr for SetMask {
    type Output = SetMask;

    fn bitor(self, rhs: SetMask) -> SetMask {
        SetMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for SetMask {
    fn bitor_assign(&mut self, rhs: SetMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for SetMask {
    type Output = SetMask;

    fn bitand(self, rhs: SetMask) -> SetMask {
        SetMask(self.0 & rhs.0)
    }
}

impl FromIterator<SetMask> for SetMask {
    fn from_iter<I: IntoIterator<Item = SetMask>>(iter: I) -> Self {
        iter.into_iter().fold(SetMask::EMPTY, |acc, m| acc | m)
    }
}

impl fmt::Display for SetMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Bitmask assignment
// ---------------------------------------------------------------------------

/// Union of the identifiers of every set each row belongs to.
///
/// Rows beyond a set's membership vector are treated as non-members.
pub fn assign_row_bitmasks(sets: &[Set], row_count: usize) -> Vec<SetMask> {
    let mut masks = vec![SetMask::EMPTY; row_count];
    for set in sets {
        for (mask, cell) in masks.iter_mut().zip(&set.membership) {
            if *cell == 1 {
                *mask |= set.id;
            }
        }
    }
    masks
}
