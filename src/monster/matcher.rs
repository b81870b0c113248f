//! # Monster Matching
//!
//! Multi-criteria filter predicate shared by catalog search, random encounter
//! composition and single-group rerolls.

use crate::{AlignmentFlags, Monster, Size};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Filter criteria for monsters. Every field is optional; an absent criterion
/// is always satisfied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonsterFilters {
    /// Exact monster type, e.g. `"Dragon"`
    #[serde(rename = "type")]
    pub monster_type: Option<String>,
    pub size: Option<Size>,
    /// Matches when it shares any bit with the monster's alignment
    pub alignment: Option<AlignmentFlags>,
    /// Inclusive lower CR bound, by numeric rank
    pub min_cr: Option<f64>,
    /// Inclusive upper CR bound, by numeric rank
    pub max_cr: Option<f64>,
    pub environment: Option<String>,
    /// Allowed source books; the monster must appear in at least one.
    ///
    /// On the wire this is a map of book to enabled flag, e.g.
    /// `{"core": true, "volo": false}`; a plain list of books is also accepted.
    #[serde(
        rename = "source",
        serialize_with = "serialize_sources",
        deserialize_with = "deserialize_sources"
    )]
    pub sources: Option<BTreeSet<String>>,
    /// Case-insensitive substring of the monster's searchable text
    pub search: Option<String>,
}

impl MonsterFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, monster_type: impl Into<String>) -> Self {
        self.monster_type = Some(monster_type.into());
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_alignment(mut self, flags: AlignmentFlags) -> Self {
        self.alignment = Some(flags);
        self
    }

    pub fn with_cr_range(mut self, min_cr: Option<f64>, max_cr: Option<f64>) -> Self {
        self.min_cr = min_cr;
        self.max_cr = max_cr;
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Adds a source book to the allow-set, creating it if needed.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources
            .get_or_insert_with(BTreeSet::new)
            .insert(source.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Returns true if a CR rank lies within the filter's bounds.
    pub fn cr_in_range(&self, numeric: f64) -> bool {
        self.min_cr.map_or(true, |min| numeric >= min)
            && self.max_cr.map_or(true, |max| numeric <= max)
    }

    /// Convenience for [`matches`].
    pub fn matches(&self, monster: &Monster, options: MatchOptions) -> bool {
        matches(monster, self, options)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SourceSelection {
    Flags(BTreeMap<String, bool>),
    List(BTreeSet<String>),
}

fn deserialize_sources<'de, D>(deserializer: D) -> Result<Option<BTreeSet<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let selection = Option::<SourceSelection>::deserialize(deserializer)?;
    Ok(selection.map(|selection| match selection {
        // Unticked books are not allowed
        SourceSelection::Flags(flags) => flags
            .into_iter()
            .filter_map(|(book, enabled)| enabled.then_some(book))
            .collect(),
        SourceSelection::List(books) => books,
    }))
}

fn serialize_sources<S>(
    sources: &Option<BTreeSet<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    sources
        .as_ref()
        .map(|books| books.iter().map(|book| (book, true)).collect::<BTreeMap<_, _>>())
        .serialize(serializer)
}

/// Switches that adjust how filters are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Ignore the CR bounds; used when the caller has already pinned the CR
    pub skip_cr_check: bool,
    /// Reject monsters flagged unique
    pub exclude_unique: bool,
}

impl MatchOptions {
    pub fn skip_cr_check(mut self) -> Self {
        self.skip_cr_check = true;
        self
    }

    pub fn exclude_unique(mut self) -> Self {
        self.exclude_unique = true;
        self
    }
}

/// Evaluates a monster against filters, stopping at the first failed criterion.
///
/// Criteria are checked in order: type, size, uniqueness, alignment, CR range,
/// environment, source books, free-text search.
///
/// # Examples
///
/// ```
/// use warband::{matches, MatchOptions, Monster, MonsterArgs, MonsterFilters, Size};
///
/// let wolf = Monster::new(MonsterArgs {
///     id: "wolf".to_string(),
///     name: "Wolf".to_string(),
///     monster_type: "Beast".to_string(),
///     size: Some(Size::Medium),
///     cr: "1/4".to_string(),
///     ..Default::default()
/// })
/// .unwrap();
///
/// let filters = MonsterFilters::new().with_type("Beast").with_search("WOL");
/// assert!(matches(&wolf, &filters, MatchOptions::default()));
/// ```
pub fn matches(monster: &Monster, filters: &MonsterFilters, options: MatchOptions) -> bool {
    if let Some(monster_type) = &filters.monster_type {
        if monster.monster_type != *monster_type {
            return false;
        }
    }

    if let Some(size) = filters.size {
        if monster.size != size {
            return false;
        }
    }

    if options.exclude_unique && monster.unique {
        return false;
    }

    if let Some(flags) = filters.alignment {
        if !flags.intersects(monster.alignment.flags) {
            return false;
        }
    }

    if !options.skip_cr_check && !filters.cr_in_range(monster.cr.numeric) {
        return false;
    }

    if let Some(environment) = &filters.environment {
        if !monster.environments.iter().any(|e| e == environment) {
            return false;
        }
    }

    if let Some(sources) = &filters.sources {
        if !monster.sources.iter().any(|s| sources.contains(&s.name)) {
            return false;
        }
    }

    if let Some(search) = &filters.search {
        if !monster.searchable().contains(&search.to_lowercase()) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MonsterArgs, SourceRef};

    fn dragon_args() -> MonsterArgs {
        MonsterArgs {
            id: "young-red-dragon".to_string(),
            name: "Young Red Dragon".to_string(),
            monster_type: "Dragon".to_string(),
            size: Some(Size::Huge),
            alignment: Some("chaotic_evil".to_string()),
            cr: "10".to_string(),
            environments: vec!["Mountain".to_string(), "Hill".to_string()],
            sources: vec![SourceRef::new("core")],
            ..Default::default()
        }
    }

    fn dragon() -> Monster {
        Monster::new(dragon_args()).unwrap()
    }

    fn dragon_filters() -> MonsterFilters {
        MonsterFilters::new()
            .with_type("Dragon")
            .with_environment("Mountain")
            .with_source("core")
    }

    #[test]
    fn test_empty_filters_match_everything() {
        assert!(matches(&dragon(), &MonsterFilters::default(), MatchOptions::default()));
    }

    #[test]
    fn test_type_environment_source_match() {
        assert!(matches(&dragon(), &dragon_filters(), MatchOptions::default()));
    }

    #[test]
    fn test_size_mismatch_fails() {
        let filters = dragon_filters().with_size(Size::Small);
        assert!(!matches(&dragon(), &filters, MatchOptions::default()));

        let filters = dragon_filters().with_size(Size::Huge);
        assert!(matches(&dragon(), &filters, MatchOptions::default()));
    }

    #[test]
    fn test_unique_exclusion() {
        let unique = Monster::new(MonsterArgs {
            unique: true,
            ..dragon_args()
        })
        .unwrap();
        assert!(matches(&unique, &dragon_filters(), MatchOptions::default()));
        assert!(!matches(
            &unique,
            &dragon_filters(),
            MatchOptions::default().exclude_unique()
        ));
    }

    #[test]
    fn test_alignment_bitmask() {
        let filters = MonsterFilters::new().with_alignment(AlignmentFlags::EVIL);
        assert!(matches(&dragon(), &filters, MatchOptions::default()));

        let filters = MonsterFilters::new().with_alignment(AlignmentFlags::GOOD);
        assert!(!matches(&dragon(), &filters, MatchOptions::default()));
    }

    #[test]
    fn test_cr_range_and_skip() {
        let filters = MonsterFilters::new().with_cr_range(Some(1.0), Some(5.0));
        assert!(!matches(&dragon(), &filters, MatchOptions::default()));
        assert!(matches(
            &dragon(),
            &filters,
            MatchOptions::default().skip_cr_check()
        ));

        let inclusive = MonsterFilters::new().with_cr_range(Some(10.0), Some(10.0));
        assert!(matches(&dragon(), &inclusive, MatchOptions::default()));
    }

    #[test]
    fn test_environment_membership() {
        let filters = MonsterFilters::new().with_environment("Swamp");
        assert!(!matches(&dragon(), &filters, MatchOptions::default()));
    }

    #[test]
    fn test_sourceless_monster_fails_source_filter() {
        let homebrew = Monster::new(MonsterArgs {
            sources: Vec::new(),
            ..dragon_args()
        })
        .unwrap();
        let filters = MonsterFilters::new().with_source("core");
        assert!(!matches(&homebrew, &filters, MatchOptions::default()));
        assert!(matches(&homebrew, &MonsterFilters::new(), MatchOptions::default()));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filters = MonsterFilters::new().with_search("RED DRAGON");
        assert!(matches(&dragon(), &filters, MatchOptions::default()));

        let filters = MonsterFilters::new().with_search("chaotic evil");
        assert!(matches(&dragon(), &filters, MatchOptions::default()));

        let filters = MonsterFilters::new().with_search("lich");
        assert!(!matches(&dragon(), &filters, MatchOptions::default()));
    }

    #[test]
    fn test_filters_from_json() {
        let json = r#"{"type": "Dragon", "environment": "Mountain", "source": {"core": true}}"#;
        let filters: MonsterFilters = serde_json::from_str(json).unwrap();
        assert_eq!(filters, dragon_filters());
        assert!(matches(&dragon(), &filters, MatchOptions::default()));

        let json = r#"{"source": ["core"], "maxCr": 12}"#;
        let filters: MonsterFilters = serde_json::from_str(json).unwrap();
        assert_eq!(filters.max_cr, Some(12.0));
        assert!(matches(&dragon(), &filters, MatchOptions::default()));
    }

    #[test]
    fn test_unticked_source_books_are_excluded() {
        let json = r#"{"source": {"core": true, "volo": false}}"#;
        let filters: MonsterFilters = serde_json::from_str(json).unwrap();
        assert_eq!(filters, MonsterFilters::new().with_source("core"));

        let volo_only = Monster::new(MonsterArgs {
            sources: vec![SourceRef::new("volo")],
            ..dragon_args()
        })
        .unwrap();
        assert!(matches(&dragon(), &filters, MatchOptions::default()));
        assert!(!matches(&volo_only, &filters, MatchOptions::default()));
    }

    #[test]
    fn test_filters_serialize_sources_as_flags() {
        let filters = dragon_filters();
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json["source"], serde_json::json!({"core": true}));

        let back: MonsterFilters = serde_json::from_value(json).unwrap();
        assert_eq!(back, filters);
    }
}
