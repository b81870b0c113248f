//! # Alignments
//!
//! Alignment names with the bitmask used for compatibility filtering. A monster
//! that may take several alignments ("any chaotic alignment") carries the union
//! of their bits, so a filter matches whenever the masks share a bit.

use crate::{WarbandError, WarbandResult};
use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr};

/// Alignment bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlignmentFlags(pub u32);

impl AlignmentFlags {
    pub const NONE: AlignmentFlags = AlignmentFlags(0);
    pub const LAWFUL_GOOD: AlignmentFlags = AlignmentFlags(1);
    pub const NEUTRAL_GOOD: AlignmentFlags = AlignmentFlags(1 << 1);
    pub const CHAOTIC_GOOD: AlignmentFlags = AlignmentFlags(1 << 2);
    pub const LAWFUL_NEUTRAL: AlignmentFlags = AlignmentFlags(1 << 3);
    pub const NEUTRAL: AlignmentFlags = AlignmentFlags(1 << 4);
    pub const CHAOTIC_NEUTRAL: AlignmentFlags = AlignmentFlags(1 << 5);
    pub const LAWFUL_EVIL: AlignmentFlags = AlignmentFlags(1 << 6);
    pub const NEUTRAL_EVIL: AlignmentFlags = AlignmentFlags(1 << 7);
    pub const CHAOTIC_EVIL: AlignmentFlags = AlignmentFlags(1 << 8);
    pub const UNALIGNED: AlignmentFlags = AlignmentFlags(1 << 9);

    pub const GOOD: AlignmentFlags = AlignmentFlags(0b000_000_111);
    pub const EVIL: AlignmentFlags = AlignmentFlags(0b111_000_000);
    pub const LAWFUL: AlignmentFlags = AlignmentFlags(0b001_001_001);
    pub const CHAOTIC: AlignmentFlags = AlignmentFlags(0b100_100_100);
    pub const ANY: AlignmentFlags = AlignmentFlags(0b111_111_111);

    /// Returns true if the two masks share at least one alignment.
    pub fn intersects(self, other: AlignmentFlags) -> bool {
        (self & other).0 != 0
    }

    const fn without(self, other: AlignmentFlags) -> AlignmentFlags {
        AlignmentFlags(self.0 & !other.0)
    }
}

impl BitAnd for AlignmentFlags {
    type Output = Self;

    fn bitand(self, other: Self) -> Self {
        AlignmentFlags(self.0 & other.0)
    }
}

impl BitOr for AlignmentFlags {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        AlignmentFlags(self.0 | other.0)
    }
}

/// A named alignment entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Alignment {
    /// Table key, e.g. `"chaotic_evil"`
    pub name: &'static str,
    /// Display text, e.g. `"chaotic evil"`
    pub text: &'static str,
    pub flags: AlignmentFlags,
}

impl Alignment {
    const fn new(name: &'static str, text: &'static str, flags: AlignmentFlags) -> Self {
        Self { name, text, flags }
    }

    /// Looks up an alignment by table key.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::{Alignment, AlignmentFlags};
    ///
    /// let any_evil = Alignment::lookup("any_evil").unwrap();
    /// assert!(any_evil.flags.intersects(AlignmentFlags::NEUTRAL_EVIL));
    /// assert!(!any_evil.flags.intersects(AlignmentFlags::LAWFUL_GOOD));
    /// ```
    pub fn lookup(name: &str) -> WarbandResult<Alignment> {
        ALIGNMENTS
            .iter()
            .find(|alignment| alignment.name == name)
            .copied()
            .ok_or_else(|| WarbandError::UnknownAlignment(name.to_string()))
    }

    /// Alignment given to monsters that do not declare one.
    pub fn unaligned() -> Alignment {
        UNALIGNED
    }

    pub fn all() -> &'static [Alignment] {
        &ALIGNMENTS
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::unaligned()
    }
}

const UNALIGNED: Alignment = Alignment::new("unaligned", "unaligned", AlignmentFlags::UNALIGNED);

static ALIGNMENTS: [Alignment; 20] = [
    Alignment::new("lawful_good", "lawful good", AlignmentFlags::LAWFUL_GOOD),
    Alignment::new("neutral_good", "neutral good", AlignmentFlags::NEUTRAL_GOOD),
    Alignment::new("chaotic_good", "chaotic good", AlignmentFlags::CHAOTIC_GOOD),
    Alignment::new("lawful_neutral", "lawful neutral", AlignmentFlags::LAWFUL_NEUTRAL),
    Alignment::new("neutral", "neutral", AlignmentFlags::NEUTRAL),
    Alignment::new("chaotic_neutral", "chaotic neutral", AlignmentFlags::CHAOTIC_NEUTRAL),
    Alignment::new("lawful_evil", "lawful evil", AlignmentFlags::LAWFUL_EVIL),
    Alignment::new("neutral_evil", "neutral evil", AlignmentFlags::NEUTRAL_EVIL),
    Alignment::new("chaotic_evil", "chaotic evil", AlignmentFlags::CHAOTIC_EVIL),
    UNALIGNED,
    Alignment::new("any", "any alignment", AlignmentFlags::ANY),
    Alignment::new("any_good", "any good alignment", AlignmentFlags::GOOD),
    Alignment::new("any_evil", "any evil alignment", AlignmentFlags::EVIL),
    Alignment::new("any_lawful", "any lawful alignment", AlignmentFlags::LAWFUL),
    Alignment::new("any_chaotic", "any chaotic alignment", AlignmentFlags::CHAOTIC),
    Alignment::new(
        "any_neutral",
        "any neutral alignment",
        AlignmentFlags(
            AlignmentFlags::ANY.0 & !(AlignmentFlags::LAWFUL_GOOD.0
                | AlignmentFlags::CHAOTIC_GOOD.0
                | AlignmentFlags::LAWFUL_EVIL.0
                | AlignmentFlags::CHAOTIC_EVIL.0),
        ),
    ),
    Alignment::new(
        "non_good",
        "any non-good alignment",
        AlignmentFlags::ANY.without(AlignmentFlags::GOOD),
    ),
    Alignment::new(
        "non_evil",
        "any non-evil alignment",
        AlignmentFlags::ANY.without(AlignmentFlags::EVIL),
    ),
    Alignment::new(
        "non_lawful",
        "any non-lawful alignment",
        AlignmentFlags::ANY.without(AlignmentFlags::LAWFUL),
    ),
    Alignment::new(
        "non_chaotic",
        "any non-chaotic alignment",
        AlignmentFlags::ANY.without(AlignmentFlags::CHAOTIC),
    ),
];
