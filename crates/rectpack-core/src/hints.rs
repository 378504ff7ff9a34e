use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use crate::error::{RectPackError, Result};

/// A single ordering heuristic. Rectangles are placed largest sort key first.
///
/// Variants are listed in canonical order; this order breaks ties when two trials
/// produce bounds of equal area and perimeter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PackingHint {
    Area,
    Perimeter,
    BiggerSide,
    Width,
    Height,
    PathologicalMultiplier,
}

impl PackingHint {
    /// All heuristics in canonical order.
    pub const ALL: [PackingHint; 6] = [
        PackingHint::Area,
        PackingHint::Perimeter,
        PackingHint::BiggerSide,
        PackingHint::Width,
        PackingHint::Height,
        PackingHint::PathologicalMultiplier,
    ];

    /// Bit of this heuristic inside a [`PackingHints`] set.
    pub const fn bit(self) -> u32 {
        match self {
            PackingHint::Area => 1,
            PackingHint::Perimeter => 2,
            PackingHint::BiggerSide => 4,
            PackingHint::Width => 8,
            PackingHint::Height => 16,
            PackingHint::PathologicalMultiplier => 32,
        }
    }

    /// Position in the canonical enumeration.
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Sort key of a `w`x`h` rectangle under this heuristic.
    pub fn sort_key(self, w: u32, h: u32) -> u64 {
        let (w, h) = (w as u64, h as u64);
        match self {
            PackingHint::Area => w * h,
            PackingHint::Perimeter => 2 * (w + h),
            PackingHint::BiggerSide => w.max(h),
            PackingHint::Width => w,
            PackingHint::Height => h,
            PackingHint::PathologicalMultiplier => {
                let ratio = w.max(h) / w.min(h).max(1);
                ratio.saturating_mul(w * h)
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PackingHint::Area => "area",
            PackingHint::Perimeter => "perimeter",
            PackingHint::BiggerSide => "bigger_side",
            PackingHint::Width => "width",
            PackingHint::Height => "height",
            PackingHint::PathologicalMultiplier => "pathological_multiplier",
        }
    }
}

impl fmt::Display for PackingHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PackingHint {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "area" | "try_by_area" => Ok(Self::Area),
            "perimeter" | "try_by_perimeter" => Ok(Self::Perimeter),
            "bigger_side" | "max_side" | "try_by_bigger_side" => Ok(Self::BiggerSide),
            "width" | "try_by_width" => Ok(Self::Width),
            "height" | "try_by_height" => Ok(Self::Height),
            "pathological" | "pathological_multiplier" | "try_by_pathological_multiplier" => {
                Ok(Self::PathologicalMultiplier)
            }
            _ => Err(()),
        }
    }
}

/// A set of heuristics to try. Combine with `|`:
///
/// ```
/// use rectpack_core::PackingHints;
/// let hints = PackingHints::TRY_BY_AREA | PackingHints::TRY_BY_WIDTH;
/// assert_eq!(hints.iter().count(), 2);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub struct PackingHints(u32);

impl PackingHints {
    pub const TRY_BY_AREA: Self = Self(PackingHint::Area.bit());
    pub const TRY_BY_PERIMETER: Self = Self(PackingHint::Perimeter.bit());
    pub const TRY_BY_BIGGER_SIDE: Self = Self(PackingHint::BiggerSide.bit());
    pub const TRY_BY_WIDTH: Self = Self(PackingHint::Width.bit());
    pub const TRY_BY_HEIGHT: Self = Self(PackingHint::Height.bit());
    pub const TRY_BY_PATHOLOGICAL_MULTIPLIER: Self =
        Self(PackingHint::PathologicalMultiplier.bit());

    /// Every heuristic.
    pub const FIND_BEST: Self = Self(0b11_1111);
    /// For rectangles with one side much bigger than the other.
    pub const UNUSUAL_SIZES: Self = Self(
        PackingHint::Perimeter.bit()
            | PackingHint::BiggerSide.bit()
            | PackingHint::PathologicalMultiplier.bit(),
    );
    /// For rectangles whose sides are relatively similar.
    pub const MOSTLY_SQUARED: Self = Self(
        PackingHint::Area.bit()
            | PackingHint::BiggerSide.bit()
            | PackingHint::Width.bit()
            | PackingHint::Height.bit(),
    );

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds a set from raw bits, rejecting bits that name no heuristic.
    pub fn from_bits(bits: u32) -> Result<Self> {
        if bits & !Self::FIND_BEST.0 != 0 {
            return Err(RectPackError::UnsupportedHint(bits));
        }
        Ok(Self(bits))
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, hint: PackingHint) -> bool {
        self.0 & hint.bit() != 0
    }

    /// Contained heuristics, in canonical order.
    pub fn iter(self) -> impl Iterator<Item = PackingHint> {
        PackingHint::ALL
            .into_iter()
            .filter(move |h| self.contains(*h))
    }
}

impl Default for PackingHints {
    fn default() -> Self {
        Self::FIND_BEST
    }
}

impl From<PackingHint> for PackingHints {
    fn from(hint: PackingHint) -> Self {
        Self(hint.bit())
    }
}

impl From<PackingHints> for u32 {
    fn from(hints: PackingHints) -> Self {
        hints.0
    }
}

impl TryFrom<u32> for PackingHints {
    type Error = RectPackError;
    fn try_from(bits: u32) -> Result<Self> {
        Self::from_bits(bits)
    }
}

impl BitOr for PackingHints {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<PackingHint> for PackingHints {
    type Output = Self;
    fn bitor(self, rhs: PackingHint) -> Self {
        Self(self.0 | rhs.bit())
    }
}

impl BitOrAssign for PackingHints {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<PackingHint> for PackingHints {
    fn from_iter<I: IntoIterator<Item = PackingHint>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |acc, hint| acc | hint)
    }
}

impl fmt::Display for PackingHints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(PackingHint::name).collect();
        f.write_str(&names.join(","))
    }
}

/// Accepts a preset (`find_best`, `unusual_sizes`, `mostly_squared`) or a
/// comma-separated list of heuristic names.
impl FromStr for PackingHints {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "find_best" | "all" | "best" => return Ok(Self::FIND_BEST),
            "unusual_sizes" | "unusual" => return Ok(Self::UNUSUAL_SIZES),
            "mostly_squared" | "squared" => return Ok(Self::MOSTLY_SQUARED),
            _ => {}
        }
        let mut hints = Self::empty();
        for part in s.split(',').filter(|p| !p.trim().is_empty()) {
            hints |= part.parse::<PackingHint>()?.into();
        }
        if hints.is_empty() { Err(()) } else { Ok(hints) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_expand_in_canonical_order() {
        let unusual: Vec<_> = PackingHints::UNUSUAL_SIZES.iter().collect();
        assert_eq!(
            unusual,
            vec![
                PackingHint::Perimeter,
                PackingHint::BiggerSide,
                PackingHint::PathologicalMultiplier
            ]
        );
        assert_eq!(PackingHints::FIND_BEST.iter().count(), 6);
        assert_eq!(PackingHints::MOSTLY_SQUARED.iter().count(), 4);
    }

    #[test]
    fn unknown_bits_are_rejected() {
        assert_eq!(
            PackingHints::from_bits(64),
            Err(RectPackError::UnsupportedHint(64))
        );
        assert_eq!(PackingHints::from_bits(3).unwrap().bits(), 3);
    }

    #[test]
    fn parse_lists_and_presets() {
        assert_eq!(
            "area, width".parse::<PackingHints>(),
            Ok(PackingHints::TRY_BY_AREA | PackingHints::TRY_BY_WIDTH)
        );
        assert_eq!("find_best".parse(), Ok(PackingHints::FIND_BEST));
        assert_eq!("Unusual_Sizes".parse(), Ok(PackingHints::UNUSUAL_SIZES));
        assert!("area,diagonal".parse::<PackingHints>().is_err());
        assert!("".parse::<PackingHints>().is_err());
    }

    #[test]
    fn sort_keys() {
        assert_eq!(PackingHint::Area.sort_key(3, 4), 12);
        assert_eq!(PackingHint::Perimeter.sort_key(3, 4), 14);
        assert_eq!(PackingHint::BiggerSide.sort_key(3, 4), 4);
        assert_eq!(PackingHint::Width.sort_key(3, 4), 3);
        assert_eq!(PackingHint::Height.sort_key(3, 4), 4);
        // a thin strip outranks a square of larger area
        assert!(
            PackingHint::PathologicalMultiplier.sort_key(16, 1)
                > PackingHint::PathologicalMultiplier.sort_key(5, 5)
        );
    }

    #[test]
    fn serde_uses_raw_bits() {
        let json = serde_json::to_string(&PackingHints::UNUSUAL_SIZES).unwrap();
        assert_eq!(json, "38");
        let back: PackingHints = serde_json::from_str("9").unwrap();
        assert_eq!(back, PackingHints::TRY_BY_AREA | PackingHints::TRY_BY_WIDTH);
        assert!(serde_json::from_str::<PackingHints>("128").is_err());
    }
}
