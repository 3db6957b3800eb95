//! FILENAME: core/table-engine/src/grouping.rs
//! Row grouping - partitions a snapshot into groups and tracks expand state.
//!
//! Groups are never stored: every read re-partitions the current snapshot
//! with the caller's key function. What persists is the expand/collapse
//! state, keyed by group key:
//! - a key keeps its state for as long as it has members
//! - a key that had members on the previous refresh and has none now is
//!   forgotten
//! - toggling a key that is not currently present is remembered, so the
//!   state applies once rows with that key show up

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::logging::log_debug;
use crate::record::Record;
use crate::store::RowSet;

const CATEGORY: &str = "GROUP";

/// Derived bucket identity.
pub type GroupKey = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpandState {
    #[default]
    Collapsed,
    Expanded,
}

impl ExpandState {
    pub fn toggled(self) -> Self {
        match self {
            ExpandState::Collapsed => ExpandState::Expanded,
            ExpandState::Expanded => ExpandState::Collapsed,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == ExpandState::Expanded
    }
}

/// One bucket of rows, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: GroupKey,
    pub rows: Vec<Arc<Record>>,
    pub state: ExpandState,
}

impl Group {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_expanded(&self) -> bool {
        self.state.is_expanded()
    }

    /// Member rows to draw: all of them when expanded, none when collapsed.
    pub fn visible_rows(&self) -> &[Arc<Record>] {
        if self.is_expanded() {
            &self.rows
        } else {
            &[]
        }
    }
}

/// Derives a group key from a record. Must be pure and total.
pub trait GroupKeyFn {
    fn key(&self, record: &Record) -> GroupKey;
}

impl<F> GroupKeyFn for F
where
    F: Fn(&Record) -> GroupKey,
{
    fn key(&self, record: &Record) -> GroupKey {
        self(record)
    }
}

/// Partition rows by key: keys in first-seen order, rows in input order.
pub fn partition_rows(rows: &RowSet, key_fn: &dyn GroupKeyFn) -> Vec<(GroupKey, Vec<Arc<Record>>)> {
    let mut slots: FxHashMap<GroupKey, usize> = FxHashMap::default();
    let mut buckets: Vec<(GroupKey, Vec<Arc<Record>>)> = Vec::new();

    for row in rows.iter() {
        let key = key_fn.key(row);
        match slots.get(&key) {
            Some(&slot) => buckets[slot].1.push(Arc::clone(row)),
            None => {
                slots.insert(key.clone(), buckets.len());
                buckets.push((key, vec![Arc::clone(row)]));
            }
        }
    }
    buckets
}

// ============================================================================
// ENGINE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct GroupingEngine {
    states: FxHashMap<GroupKey, ExpandState>,
    /// Keys that had members on the last refresh
    present: FxHashSet<GroupKey>,
    default_state: ExpandState,
}

impl GroupingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_state(default_state: ExpandState) -> Self {
        GroupingEngine {
            default_state,
            ..Self::default()
        }
    }

    /// Partition without touching any state. Same inputs, same output.
    pub fn partition(&self, rows: &RowSet, key_fn: &dyn GroupKeyFn) -> Vec<Group> {
        partition_rows(rows, key_fn)
            .into_iter()
            .map(|(key, rows)| Group {
                state: self.state_of(&key),
                key,
                rows,
            })
            .collect()
    }

    /// Partition and forget the state of keys that lost all their members
    /// since the previous refresh.
    pub fn refresh(&mut self, rows: &RowSet, key_fn: &dyn GroupKeyFn) -> Vec<Group> {
        let groups = self.partition(rows, key_fn);
        let now: FxHashSet<GroupKey> = groups.iter().map(|g| g.key.clone()).collect();

        for vanished in self.present.difference(&now) {
            if self.states.remove(vanished).is_some() {
                log_debug!(CATEGORY, "dropped state of empty group '{}'", vanished);
            }
        }
        self.present = now;
        groups
    }

    /// Flip one group's state and return the new state. Other groups are
    /// untouched. Works for keys with no current members.
    pub fn toggle(&mut self, key: &str) -> ExpandState {
        let next = self.state_of(key).toggled();
        self.states.insert(key.to_string(), next);
        log_debug!(CATEGORY, "toggled '{}' -> {:?}", key, next);
        next
    }

    pub fn set_state(&mut self, key: &str, state: ExpandState) {
        self.states.insert(key.to_string(), state);
    }

    pub fn state_of(&self, key: &str) -> ExpandState {
        self.states.get(key).copied().unwrap_or(self.default_state)
    }

    /// Explicitly recorded states (toggled or set).
    pub fn states(&self) -> &FxHashMap<GroupKey, ExpandState> {
        &self.states
    }

    pub fn default_state(&self) -> ExpandState {
        self.default_state
    }

    /// Expand every group present on the last refresh.
    pub fn expand_all(&mut self) {
        self.set_all(ExpandState::Expanded);
    }

    /// Collapse every group present on the last refresh.
    pub fn collapse_all(&mut self) {
        self.set_all(ExpandState::Collapsed);
    }

    fn set_all(&mut self, state: ExpandState) {
        for key in &self.present {
            self.states.insert(key.clone(), state);
        }
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.present.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;

    fn rows(teams: &[(i64, &str)]) -> RowSet {
        RowSet::from_records(
            teams
                .iter()
                .map(|(id, team)| Record::new().with("id", *id).with("team", *team))
                .collect(),
        )
    }

    fn by_team(record: &Record) -> GroupKey {
        record.get("team").map(Value::display_raw).unwrap_or_default()
    }

    #[test]
    fn test_partition_first_seen_order() {
        let data = rows(&[(1, "b"), (2, "a"), (3, "b"), (4, "c"), (5, "a")]);
        let groups = GroupingEngine::new().partition(&data, &by_team);

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);

        let b_ids: Vec<Value> = groups[0].rows.iter().map(|r| r.get("id").unwrap().clone()).collect();
        assert_eq!(b_ids, vec![Value::number(1.0), Value::number(3.0)]);
    }

    #[test]
    fn test_partition_covers_every_row_once() {
        let data = rows(&[(1, "x"), (2, "y"), (3, "x"), (4, "z")]);
        let groups = GroupingEngine::new().partition(&data, &by_team);
        let total: usize = groups.iter().map(Group::len).sum();
        assert_eq!(total, data.len());
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let mut engine = GroupingEngine::new();
        let original = engine.state_of("a");
        engine.toggle("a");
        engine.toggle("a");
        assert_eq!(engine.state_of("a"), original);
    }

    #[test]
    fn test_toggle_leaves_other_groups_alone() {
        let data = rows(&[(1, "a"), (2, "b")]);
        let mut engine = GroupingEngine::new();
        engine.refresh(&data, &by_team);

        assert_eq!(engine.toggle("a"), ExpandState::Expanded);
        let groups = engine.partition(&data, &by_team);
        assert_eq!(groups[0].state, ExpandState::Expanded);
        assert_eq!(groups[1].state, ExpandState::Collapsed);
    }

    #[test]
    fn test_state_dropped_when_group_empties() {
        let mut engine = GroupingEngine::new();
        engine.refresh(&rows(&[(1, "a"), (2, "b")]), &by_team);
        engine.toggle("b");

        engine.refresh(&rows(&[(1, "a"), (2, "a")]), &by_team);
        assert!(!engine.states().contains_key("b"));

        let groups = engine.refresh(&rows(&[(1, "a"), (2, "b")]), &by_team);
        assert_eq!(groups[1].state, ExpandState::Collapsed);
    }

    #[test]
    fn test_toggle_of_absent_key_is_retained() {
        let mut engine = GroupingEngine::new();
        engine.refresh(&rows(&[(1, "a")]), &by_team);
        engine.toggle("later");

        engine.refresh(&rows(&[(1, "a")]), &by_team);
        let groups = engine.refresh(&rows(&[(1, "a"), (2, "later")]), &by_team);
        assert_eq!(groups[1].state, ExpandState::Expanded);
    }

    #[test]
    fn test_visible_rows_follow_state() {
        let data = rows(&[(1, "a"), (2, "a")]);
        let mut engine = GroupingEngine::new();
        assert!(engine.partition(&data, &by_team)[0].visible_rows().is_empty());
        engine.toggle("a");
        assert_eq!(engine.partition(&data, &by_team)[0].visible_rows().len(), 2);
    }

    #[test]
    fn test_expand_and_collapse_all() {
        let data = rows(&[(1, "a"), (2, "b")]);
        let mut engine = GroupingEngine::new();
        engine.refresh(&data, &by_team);

        engine.expand_all();
        assert!(engine.partition(&data, &by_team).iter().all(Group::is_expanded));
        engine.collapse_all();
        assert!(!engine.partition(&data, &by_team).iter().any(Group::is_expanded));
    }

    #[test]
    fn test_default_state_applies_to_untoggled_keys() {
        let engine = GroupingEngine::with_default_state(ExpandState::Expanded);
        assert_eq!(engine.state_of("anything"), ExpandState::Expanded);
    }

    #[test]
    fn test_partition_is_idempotent() {
        let data = rows(&[(1, "a"), (2, "b"), (3, "a")]);
        let engine = GroupingEngine::new();
        assert_eq!(engine.partition(&data, &by_team), engine.partition(&data, &by_team));
    }
}
