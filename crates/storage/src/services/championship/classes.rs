use std::collections::HashMap;

use crate::models::{ClassAssignment, LegacyClassChange, RosterMember};

pub const OVERALL_DIVISION: &str = "Overall";
pub const NO_CLASS: &str = "No Class";

const EXCLUDED_CLASSES: [&str; 4] = ["EXCLUDED", "EXCLUDE", "NON-COMPETING", "NON_COMPETING"];

/// Where a driver's classes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassSource {
    Tagged,
    Legacy,
    Nickname,
}

impl ClassSource {
    /// Tagged and legacy classes are set by an administrator.
    pub fn is_manual(self) -> bool {
        matches!(self, ClassSource::Tagged | ClassSource::Legacy)
    }
}

pub fn is_excluded_class(class_name: &str) -> bool {
    EXCLUDED_CLASSES
        .iter()
        .any(|excluded| class_name.eq_ignore_ascii_case(excluded))
}

/// One source of class membership, consulted in priority order by
/// [`ClassResolverChain`].
pub trait ClassResolver: Send + Sync {
    fn source(&self) -> ClassSource;

    /// The member's classes according to this source; `None` when the source
    /// has nothing for them.
    fn resolve(&self, member: &RosterMember) -> Option<Vec<String>>;
}

/// Multi-class tags, in the order the store returned them (most recent first).
#[derive(Debug, Default)]
pub struct TaggedClasses(HashMap<i64, Vec<String>>);

impl TaggedClasses {
    pub fn new(assignments: &[ClassAssignment]) -> Self {
        let mut by_driver: HashMap<i64, Vec<String>> = HashMap::new();
        for assignment in assignments {
            by_driver
                .entry(assignment.cust_id)
                .or_default()
                .push(assignment.class_name.clone());
        }
        Self(by_driver)
    }
}

impl ClassResolver for TaggedClasses {
    fn source(&self) -> ClassSource {
        ClassSource::Tagged
    }

    fn resolve(&self, member: &RosterMember) -> Option<Vec<String>> {
        self.0
            .get(&member.cust_id)
            .filter(|classes| !classes.is_empty())
            .cloned()
    }
}

/// Legacy single assignments; the first change seen per driver wins, so the
/// input must be ordered most recent first.
#[derive(Debug, Default)]
pub struct LegacyClasses(HashMap<i64, String>);

impl LegacyClasses {
    pub fn new(changes: &[LegacyClassChange]) -> Self {
        let mut by_driver = HashMap::new();
        for change in changes {
            by_driver
                .entry(change.cust_id)
                .or_insert_with(|| change.new_class.clone());
        }
        Self(by_driver)
    }
}

impl ClassResolver for LegacyClasses {
    fn source(&self) -> ClassSource {
        ClassSource::Legacy
    }

    fn resolve(&self, member: &RosterMember) -> Option<Vec<String>> {
        self.0
            .get(&member.cust_id)
            .filter(|class| !class.is_empty())
            .map(|class| vec![class.clone()])
    }
}

#[derive(Debug, Default)]
pub struct NicknameTag;

impl ClassResolver for NicknameTag {
    fn source(&self) -> ClassSource {
        ClassSource::Nickname
    }

    fn resolve(&self, member: &RosterMember) -> Option<Vec<String>> {
        member.legacy_tag().map(|tag| vec![tag.into_inner()])
    }
}

pub struct ClassResolverChain {
    resolvers: Vec<Box<dyn ClassResolver>>,
}

impl ClassResolverChain {
    pub fn new(resolvers: Vec<Box<dyn ClassResolver>>) -> Self {
        Self { resolvers }
    }

    /// Tagged classes, then legacy assignment, then the nickname tag.
    pub fn standard(
        assignments: &[ClassAssignment],
        legacy_changes: &[LegacyClassChange],
    ) -> Self {
        Self::new(vec![
            Box::new(TaggedClasses::new(assignments)),
            Box::new(LegacyClasses::new(legacy_changes)),
            Box::new(NicknameTag),
        ])
    }

    /// First non-empty answer wins.
    pub fn resolve(&self, member: &RosterMember) -> Option<(ClassSource, Vec<String>)> {
        self.resolvers.iter().find_map(|resolver| {
            resolver
                .resolve(member)
                .filter(|classes| !classes.is_empty())
                .map(|classes| (resolver.source(), classes))
        })
    }
}

/// A driver's membership in one division.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionEntry {
    pub cust_id: i64,
    pub division: String,
    pub display_name: String,
    pub car_number: Option<String>,
    pub manual_assignment: bool,
    pub multiple_classes: bool,
    pub all_classes: Vec<String>,
    pub primary_class: String,
}

/// Every (driver, division) pair taking part in a championship, in roster
/// order.
#[derive(Debug, Default)]
pub struct DivisionMap {
    entries: Vec<DivisionEntry>,
    index: HashMap<(i64, String), usize>,
    by_driver: HashMap<i64, Vec<usize>>,
    excluded_drivers: u32,
}

impl DivisionMap {
    pub fn build(roster: &[RosterMember], chain: &ClassResolverChain) -> Self {
        let mut map = Self::default();

        for member in roster {
            let (source, classes) = match chain.resolve(member) {
                Some(resolved) => resolved,
                None => {
                    tracing::debug!(
                        "Driver {} ({}) has no class, included in {} only",
                        member.display_name,
                        member.cust_id,
                        OVERALL_DIVISION
                    );
                    map.insert(DivisionEntry {
                        cust_id: member.cust_id,
                        division: OVERALL_DIVISION.to_string(),
                        display_name: member.display_name.clone(),
                        car_number: member.car_number.clone(),
                        manual_assignment: false,
                        multiple_classes: false,
                        all_classes: vec![NO_CLASS.to_string()],
                        primary_class: NO_CLASS.to_string(),
                    });
                    continue;
                }
            };

            if classes.iter().any(|class| is_excluded_class(class)) {
                tracing::warn!(
                    "Driver {} ({}) excluded from championship calculations",
                    member.display_name,
                    member.cust_id
                );
                map.excluded_drivers += 1;
                continue;
            }

            let primary_class = classes
                .first()
                .cloned()
                .unwrap_or_else(|| NO_CLASS.to_string());
            let divisions = classes
                .iter()
                .cloned()
                .chain(std::iter::once(OVERALL_DIVISION.to_string()));
            for division in divisions {
                map.insert(DivisionEntry {
                    cust_id: member.cust_id,
                    division,
                    display_name: member.display_name.clone(),
                    car_number: member.car_number.clone(),
                    manual_assignment: source.is_manual(),
                    multiple_classes: classes.len() > 1,
                    all_classes: classes.clone(),
                    primary_class: primary_class.clone(),
                });
            }
        }

        tracing::info!(
            "Roster processing: {} division entries for {} members, {} excluded",
            map.entries.len(),
            roster.len(),
            map.excluded_drivers
        );

        map
    }

    /// Later entries for the same (driver, division) replace earlier ones in
    /// place.
    fn insert(&mut self, entry: DivisionEntry) {
        let key = (entry.cust_id, entry.division.clone());
        if let Some(&slot) = self.index.get(&key) {
            self.entries[slot] = entry;
            return;
        }

        let slot = self.entries.len();
        self.by_driver.entry(entry.cust_id).or_default().push(slot);
        self.index.insert(key, slot);
        self.entries.push(entry);
    }

    /// Divisions the driver competes in, "Overall" last.
    pub fn divisions_for(&self, cust_id: i64) -> impl Iterator<Item = &DivisionEntry> {
        self.by_driver
            .get(&cust_id)
            .into_iter()
            .flatten()
            .map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, cust_id: i64, division: &str) -> bool {
        self.index.contains_key(&(cust_id, division.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn excluded_drivers(&self) -> u32 {
        self.excluded_drivers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn member(cust_id: i64, nick_name: Option<&str>) -> RosterMember {
        RosterMember {
            cust_id,
            display_name: format!("Driver {cust_id}"),
            car_number: Some(cust_id.to_string()),
            nick_name: nick_name.map(str::to_string),
        }
    }

    fn tag(cust_id: i64, class_name: &str) -> ClassAssignment {
        ClassAssignment {
            league_id: 1,
            cust_id,
            class_name: class_name.to_string(),
            assigned_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn legacy(cust_id: i64, new_class: &str) -> LegacyClassChange {
        LegacyClassChange {
            league_id: 1,
            cust_id,
            old_class: None,
            new_class: new_class.to_string(),
            changed_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn divisions(map: &DivisionMap, cust_id: i64) -> Vec<String> {
        map.divisions_for(cust_id)
            .map(|entry| entry.division.clone())
            .collect()
    }

    #[test]
    fn test_tagged_beats_legacy_beats_nickname() {
        let chain = ClassResolverChain::standard(
            &[tag(1, "GT3"), tag(1, "GT4")],
            &[legacy(1, "LMP2"), legacy(2, "LMP2")],
        );

        let (source, classes) = chain.resolve(&member(1, Some("[GTE] One"))).unwrap();
        assert_eq!(source, ClassSource::Tagged);
        assert_eq!(classes, vec!["GT3", "GT4"]);

        let (source, classes) = chain.resolve(&member(2, Some("[GTE] Two"))).unwrap();
        assert_eq!(source, ClassSource::Legacy);
        assert_eq!(classes, vec!["LMP2"]);

        let (source, classes) = chain.resolve(&member(3, Some("[GTE] Three"))).unwrap();
        assert_eq!(source, ClassSource::Nickname);
        assert_eq!(classes, vec!["GTE"]);

        assert!(chain.resolve(&member(4, Some("Four"))).is_none());
    }

    #[test]
    fn test_most_recent_legacy_change_wins() {
        let legacy = LegacyClasses::new(&[legacy(1, "GT3"), legacy(1, "GT4")]);
        assert_eq!(legacy.resolve(&member(1, None)), Some(vec!["GT3".to_string()]));
    }

    #[test]
    fn test_multi_class_driver_gets_independent_entries() {
        let chain = ClassResolverChain::standard(&[tag(1, "GT3"), tag(1, "GT4")], &[]);
        let map = DivisionMap::build(&[member(1, None)], &chain);

        assert_eq!(divisions(&map, 1), vec!["GT3", "GT4", "Overall"]);
        let entry = map.divisions_for(1).next().unwrap();
        assert!(entry.manual_assignment);
        assert!(entry.multiple_classes);
        assert_eq!(entry.primary_class, "GT3");
    }

    #[test]
    fn test_unclassified_driver_is_overall_only() {
        let chain = ClassResolverChain::standard(&[], &[]);
        let map = DivisionMap::build(&[member(7, Some("No tag"))], &chain);

        assert_eq!(divisions(&map, 7), vec!["Overall"]);
        let entry = map.divisions_for(7).next().unwrap();
        assert_eq!(entry.all_classes, vec!["No Class"]);
        assert_eq!(entry.primary_class, "No Class");
        assert!(!entry.manual_assignment);
    }

    #[test]
    fn test_nickname_tag_is_not_manual() {
        let chain = ClassResolverChain::standard(&[], &[]);
        let map = DivisionMap::build(&[member(3, Some("[GTE] Three"))], &chain);

        assert_eq!(divisions(&map, 3), vec!["GTE", "Overall"]);
        assert!(map.divisions_for(3).all(|entry| !entry.manual_assignment));
    }

    #[test]
    fn test_excluded_driver_has_no_divisions() {
        let chain =
            ClassResolverChain::standard(&[tag(1, "GT3"), tag(1, "non-competing")], &[]);
        let roster = [
            member(1, None),
            member(2, Some("[Excluded] Two")),
            member(3, None),
        ];
        let map = DivisionMap::build(&roster, &chain);

        assert!(divisions(&map, 1).is_empty());
        assert!(divisions(&map, 2).is_empty());
        assert!(!map.contains(1, "Overall"));
        assert_eq!(divisions(&map, 3), vec!["Overall"]);
        assert_eq!(map.excluded_drivers(), 2);
    }

    #[test]
    fn test_excluded_keywords_are_case_insensitive() {
        assert!(is_excluded_class("excluded"));
        assert!(is_excluded_class("Exclude"));
        assert!(is_excluded_class("NON_COMPETING"));
        assert!(!is_excluded_class("EXCLUDED-ISH"));
    }

    #[test]
    fn test_duplicate_roster_rows_overwrite() {
        let chain = ClassResolverChain::standard(&[], &[]);
        let mut renamed = member(1, None);
        renamed.display_name = "Renamed".to_string();
        let map = DivisionMap::build(&[member(1, None), renamed], &chain);

        assert_eq!(map.len(), 1);
        assert_eq!(map.divisions_for(1).next().unwrap().display_name, "Renamed");
    }
}
