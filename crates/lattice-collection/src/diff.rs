//! Change sets computed between two published collection structures.
//!
//! On every re-render the coordinator compares the structure it last reported
//! to the widget with the current one. Items cannot be matched by identity
//! (the data snapshot carries no keys), so the diff is positional:
//!
//! - a different section count forces a full reload;
//! - items past the old count of a section were inserted;
//! - items past the new count of a section were removed;
//! - the common prefix of a section is reloaded when the data revision moved
//!   or the content providers were replaced.
//!
//! Hosts that cannot apply fine-grained changes fall back to a full reload,
//! which is always correct.

use std::ops::Range;

use crate::position::Position;

/// The structure the widget was last told about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructureSnapshot {
    /// Item count per section.
    pub counts: Vec<usize>,
    /// Data revision the counts were taken at.
    pub revision: u64,
}

impl StructureSnapshot {
    /// Creates a snapshot from per-section counts and a data revision.
    pub fn new(counts: Vec<usize>, revision: u64) -> Self {
        Self { counts, revision }
    }

    /// The number of sections.
    pub fn section_count(&self) -> usize {
        self.counts.len()
    }

    /// The total number of items across sections.
    pub fn total_items(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Items inserted, removed, or reloaded in one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionChange {
    /// The section index.
    pub section: usize,
    /// Item indices (in the new structure) that were inserted.
    pub inserted: Range<usize>,
    /// Item indices (in the old structure) that were removed.
    pub removed: Range<usize>,
    /// Item indices present before and after whose content may differ.
    pub reloaded: Range<usize>,
}

impl SectionChange {
    fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty() && self.reloaded.is_empty()
    }
}

/// The changes a widget must apply to catch up with the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeSet {
    full_reload: bool,
    sections: Vec<SectionChange>,
}

impl ChangeSet {
    /// A change set that requires reloading everything.
    pub fn full() -> Self {
        Self {
            full_reload: true,
            sections: Vec::new(),
        }
    }

    /// Computes the changes between two snapshots.
    ///
    /// `providers_replaced` marks every surviving item for reload even when
    /// the data revision did not move.
    pub fn between(
        old: &StructureSnapshot,
        new: &StructureSnapshot,
        providers_replaced: bool,
    ) -> Self {
        if old.section_count() != new.section_count() {
            return Self::full();
        }

        let content_changed = providers_replaced || old.revision != new.revision;
        let sections = old
            .counts
            .iter()
            .zip(&new.counts)
            .enumerate()
            .map(|(section, (&before, &after))| {
                let common = before.min(after);
                SectionChange {
                    section,
                    inserted: common..after,
                    removed: common..before,
                    reloaded: if content_changed { 0..common } else { 0..0 },
                }
            })
            .filter(|change| !change.is_empty())
            .collect();

        Self {
            full_reload: false,
            sections,
        }
    }

    /// Returns `true` if the widget must reload everything.
    pub fn is_full_reload(&self) -> bool {
        self.full_reload
    }

    /// Returns `true` if there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        !self.full_reload && self.sections.is_empty()
    }

    /// Per-section changes. Empty for a full reload.
    pub fn sections(&self) -> &[SectionChange] {
        &self.sections
    }

    /// Positions that were inserted.
    pub fn inserted(&self) -> Vec<Position> {
        self.collect(|change| change.inserted.clone())
    }

    /// Positions (in the old structure) that were removed.
    pub fn removed(&self) -> Vec<Position> {
        self.collect(|change| change.removed.clone())
    }

    /// Positions whose content must be re-pulled.
    pub fn reloaded(&self) -> Vec<Position> {
        self.collect(|change| change.reloaded.clone())
    }

    fn collect(&self, range: impl Fn(&SectionChange) -> Range<usize>) -> Vec<Position> {
        self.sections
            .iter()
            .flat_map(|change| range(change).map(move |item| Position::new(change.section, item)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_is_empty() {
        let snapshot = StructureSnapshot::new(vec![10], 3);
        let changes = ChangeSet::between(&snapshot, &snapshot, false);
        assert!(changes.is_empty());
        assert!(!changes.is_full_reload());
    }

    #[test]
    fn test_append_one_item() {
        let old = StructureSnapshot::new(vec![10], 0);
        let new = StructureSnapshot::new(vec![11], 1);
        let changes = ChangeSet::between(&old, &new, false);

        assert_eq!(changes.inserted(), vec![Position::new(0, 10)]);
        assert!(changes.removed().is_empty());
        assert_eq!(changes.reloaded().len(), 10);
    }

    #[test]
    fn test_remove_items() {
        let old = StructureSnapshot::new(vec![5, 5], 0);
        let new = StructureSnapshot::new(vec![3, 3], 1);
        let changes = ChangeSet::between(&old, &new, false);

        assert_eq!(
            changes.removed(),
            vec![
                Position::new(0, 3),
                Position::new(0, 4),
                Position::new(1, 3),
                Position::new(1, 4)
            ]
        );
        assert!(changes.inserted().is_empty());
    }

    #[test]
    fn test_section_count_change_is_full_reload() {
        let old = StructureSnapshot::new(vec![4], 0);
        let new = StructureSnapshot::new(vec![4, 4], 0);
        let changes = ChangeSet::between(&old, &new, false);
        assert!(changes.is_full_reload());
        assert!(!changes.is_empty());
        assert!(changes.sections().is_empty());
    }

    #[test]
    fn test_replaced_providers_reload_without_revision_change() {
        let snapshot = StructureSnapshot::new(vec![2], 7);
        let changes = ChangeSet::between(&snapshot, &snapshot, true);
        assert_eq!(
            changes.reloaded(),
            vec![Position::new(0, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn test_snapshot_totals() {
        let snapshot = StructureSnapshot::new(vec![2, 3], 0);
        assert_eq!(snapshot.section_count(), 2);
        assert_eq!(snapshot.total_items(), 5);
    }
}
