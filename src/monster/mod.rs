//! # Monster Module
//!
//! Immutable monster records, the catalog they are looked up in, and the
//! filter predicate used by search and random encounter generation.

pub mod catalog;
pub mod matcher;

pub use catalog::*;
pub use matcher::*;

use crate::{Alignment, ChallengeRating, WarbandResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for monsters, the key of encounter groups.
pub type MonsterId = String;

/// Creature size categories, ordered smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Size {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
    Gargantuan,
}

impl Size {
    /// Sort key, 1 for Tiny up to 6 for Gargantuan.
    pub fn sort_key(self) -> u8 {
        match self {
            Size::Tiny => 1,
            Size::Small => 2,
            Size::Medium => 3,
            Size::Large => 4,
            Size::Huge => 5,
            Size::Gargantuan => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Size::Tiny => "Tiny",
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
            Size::Huge => "Huge",
            Size::Gargantuan => "Gargantuan",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to the source book a monster is published in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Source book key, e.g. `"core"`
    pub name: String,
    /// Page number, when known
    #[serde(default)]
    pub page: Option<u32>,
}

impl SourceRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            page: None,
        }
    }
}

/// Raw monster record as authored in catalog data.
///
/// Turned into a [`Monster`] by [`Monster::new`], which resolves the challenge
/// rating and alignment tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonsterArgs {
    pub id: MonsterId,
    pub name: String,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(rename = "type")]
    pub monster_type: String,
    pub size: Option<Size>,
    /// Alignment table key; `unaligned` when omitted
    #[serde(default)]
    pub alignment: Option<String>,
    /// Challenge rating token, e.g. `"1/4"`
    pub cr: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub environments: Vec<String>,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub ac: Option<u32>,
    #[serde(default)]
    pub hp: Option<u32>,
    #[serde(default)]
    pub init: Option<i32>,
    #[serde(default)]
    pub legendary: bool,
    #[serde(default)]
    pub lair: bool,
}

/// A monster that can be placed in an encounter.
///
/// Immutable once constructed; fields are read through accessors. Tags and
/// environments are kept sorted, and a lowercase `searchable` string is
/// precomputed for free-text search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Monster {
    pub(crate) id: MonsterId,
    pub(crate) name: String,
    pub(crate) section: Option<String>,
    #[serde(rename = "type")]
    pub(crate) monster_type: String,
    pub(crate) size: Size,
    pub(crate) alignment: Alignment,
    pub(crate) cr: ChallengeRating,
    pub(crate) tags: Vec<String>,
    pub(crate) environments: Vec<String>,
    pub(crate) sources: Vec<SourceRef>,
    pub(crate) unique: bool,
    pub(crate) ac: Option<u32>,
    pub(crate) hp: Option<u32>,
    pub(crate) init: Option<i32>,
    pub(crate) legendary: bool,
    pub(crate) lair: bool,
    #[serde(skip)]
    searchable: String,
}

impl Monster {
    /// Builds a monster from its raw record.
    ///
    /// Fails if the challenge rating or alignment token has no table entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::{Monster, MonsterArgs, Size};
    ///
    /// let goblin = Monster::new(MonsterArgs {
    ///     id: "goblin".to_string(),
    ///     name: "Goblin".to_string(),
    ///     monster_type: "Humanoid".to_string(),
    ///     size: Some(Size::Small),
    ///     alignment: Some("neutral_evil".to_string()),
    ///     cr: "1/4".to_string(),
    ///     tags: vec!["goblinoid".to_string()],
    ///     ..Default::default()
    /// })
    /// .unwrap();
    /// assert_eq!(goblin.cr().exp, 50);
    /// assert!(goblin.searchable().contains("goblinoid"));
    /// ```
    pub fn new(args: MonsterArgs) -> WarbandResult<Self> {
        let cr = ChallengeRating::lookup(&args.cr)?;
        let alignment = match args.alignment.as_deref() {
            Some(name) => Alignment::lookup(name)?,
            None => Alignment::unaligned(),
        };
        let size = args.size.unwrap_or(Size::Medium);

        let mut tags = args.tags;
        tags.sort();
        let mut environments = args.environments;
        environments.sort();

        let searchable = [
            args.name.as_str(),
            args.section.as_deref().unwrap_or(""),
            args.monster_type.as_str(),
            size.as_str(),
            alignment.text,
            cr.string,
        ]
        .into_iter()
        .chain(tags.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("|")
        .to_lowercase();

        Ok(Self {
            id: args.id,
            name: args.name,
            section: args.section,
            monster_type: args.monster_type,
            size,
            alignment,
            cr,
            tags,
            environments,
            sources: args.sources,
            unique: args.unique,
            ac: args.ac,
            hp: args.hp,
            init: args.init,
            legendary: args.legendary,
            lair: args.lair,
            searchable,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subheading the monster is listed under, e.g. `"Dragons, Chromatic"`
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn monster_type(&self) -> &str {
        &self.monster_type
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn alignment(&self) -> &Alignment {
        &self.alignment
    }

    pub fn cr(&self) -> &ChallengeRating {
        &self.cr
    }

    /// Tags, sorted
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Environments, sorted
    pub fn environments(&self) -> &[String] {
        &self.environments
    }

    pub fn sources(&self) -> &[SourceRef] {
        &self.sources
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn ac(&self) -> Option<u32> {
        self.ac
    }

    pub fn hp(&self) -> Option<u32> {
        self.hp
    }

    pub fn init(&self) -> Option<i32> {
        self.init
    }

    pub fn is_legendary(&self) -> bool {
        self.legendary
    }

    pub fn has_lair(&self) -> bool {
        self.lair
    }

    /// Lowercase concatenation of the searchable text fields.
    pub fn searchable(&self) -> &str {
        &self.searchable
    }

    /// Returns true if the monster is published in the named source.
    pub fn in_source(&self, source: &str) -> bool {
        self.sources.iter().any(|s| s.name == source)
    }
}
