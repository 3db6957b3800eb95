//! FILENAME: core/table-engine/src/view.rs
//! Table View - Renderable output for the presentation layer.
//!
//! Turns the current groups into a serializable structure of formatted
//! text: one header per column, one entry per group, and formatted cells
//! for the members of expanded groups. Collapsed groups carry only their
//! key and member count.

use serde::{Deserialize, Serialize};

use crate::columns::ColumnRegistry;
use crate::grouping::{ExpandState, Group, GroupKey};
use crate::record::{Record, RowId, Value};
use crate::schema::{ColumnDefinition, FilterKind, SemanticType};

// ============================================================================
// VIEW TYPES
// ============================================================================

/// Header metadata for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    pub field: String,
    pub title: String,
    pub semantic_type: SemanticType,
    pub editable: bool,
    pub size_hint: u16,
    pub filter: FilterKind,
}

impl From<&ColumnDefinition> for ColumnHeader {
    fn from(column: &ColumnDefinition) -> Self {
        ColumnHeader {
            field: column.field.clone(),
            title: column.display_name.clone(),
            semantic_type: column.semantic_type,
            editable: column.editable,
            size_hint: column.size_hint,
            filter: column.filter,
        }
    }
}

/// One rendered row. Cells line up with `TableView::columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    /// `None` when the record has no usable key value.
    pub row_id: Option<RowId>,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub key: GroupKey,
    pub state: ExpandState,
    pub row_count: usize,
    /// Empty while the group is collapsed.
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub columns: Vec<ColumnHeader>,
    pub groups: Vec<GroupView>,
}

impl TableView {
    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.row_count).sum()
    }

    pub fn group(&self, key: &str) -> Option<&GroupView> {
        self.groups.iter().find(|g| g.key == key)
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Format every visible row of `groups`.
pub fn build_view(
    groups: &[Group],
    columns: &[ColumnDefinition],
    registry: &ColumnRegistry,
    key_field: &str,
) -> TableView {
    TableView {
        columns: columns.iter().map(ColumnHeader::from).collect(),
        groups: groups
            .iter()
            .map(|group| GroupView {
                key: group.key.clone(),
                state: group.state,
                row_count: group.len(),
                rows: group
                    .visible_rows()
                    .iter()
                    .map(|record| render_row(record, columns, registry, key_field))
                    .collect(),
            })
            .collect(),
    }
}

fn render_row(record: &Record, columns: &[ColumnDefinition], registry: &ColumnRegistry, key_field: &str) -> RowView {
    let null = Value::Null;
    RowView {
        row_id: record.get(key_field).and_then(RowId::from_value),
        cells: columns
            .iter()
            .map(|column| {
                let value = record.get(&column.field).unwrap_or(&null);
                registry.resolve_column(column).format(value)
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::GroupingEngine;
    use crate::schema::SchemaInferencer;
    use crate::store::RowSet;

    fn rows() -> RowSet {
        RowSet::from_records(vec![
            Record::new().with("id", 1i64).with("team", "red").with("balance", 1234.5).with("active", true),
            Record::new().with("id", 2i64).with("team", "blue").with("balance", 10.0).with("active", false),
            Record::new().with("id", 3i64).with("team", "red").with("active", true),
        ])
    }

    fn by_team(record: &Record) -> GroupKey {
        record.get("team").map(Value::display_raw).unwrap_or_default()
    }

    #[test]
    fn test_collapsed_groups_have_no_rows() {
        let data = rows();
        let columns = SchemaInferencer::new().infer(&data.rows()[0]);
        let groups = GroupingEngine::new().partition(&data, &by_team);
        let view = build_view(&groups, &columns, &ColumnRegistry::default(), "id");

        assert_eq!(view.groups.len(), 2);
        assert_eq!(view.group("red").unwrap().row_count, 2);
        assert!(view.group("red").unwrap().rows.is_empty());
        assert_eq!(view.row_count(), 3);
    }

    #[test]
    fn test_expanded_group_formats_cells() {
        let data = rows();
        let columns = SchemaInferencer::new().with_actions_column(true).infer(&data.rows()[0]);
        let mut grouping = GroupingEngine::new();
        grouping.toggle("red");
        let groups = grouping.partition(&data, &by_team);
        let view = build_view(&groups, &columns, &ColumnRegistry::default(), "id");

        let red = view.group("red").unwrap();
        assert_eq!(red.state, ExpandState::Expanded);
        assert_eq!(red.rows[0].row_id, Some(RowId::from(1)));
        assert_eq!(red.rows[0].cells, vec!["1", "red", "1,234.5", "\u{2714}", "Edit | Delete"]);
        // missing balance renders as an empty number cell
        assert_eq!(red.rows[1].cells[2], "");
        assert_eq!(view.columns[4].title, "Actions");
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let data = rows();
        let columns = SchemaInferencer::new().infer(&data.rows()[0]);
        let groups = GroupingEngine::new().partition(&data, &by_team);
        let view = build_view(&groups, &columns, &ColumnRegistry::default(), "id");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["groups"][0]["rowCount"], 2);
        assert_eq!(json["groups"][0]["state"], "collapsed");
        assert_eq!(json["columns"][0]["sizeHint"], 10);
    }
}
