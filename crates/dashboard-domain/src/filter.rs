//! Live free-text filter over table cells.

use serde::Serialize;

use crate::complaint::ComplaintRow;
use crate::identifiers::RowPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowVisibility {
    pub position: RowPosition,
    pub visible: bool,
}

/// A row matches when any cell contains the query, ignoring case. A row with
/// no cells never matches, not even the empty query.
pub fn row_matches(cells: &[String], query: &str) -> bool {
    let needle = query.to_uppercase();
    cells
        .iter()
        .any(|cell| cell.to_uppercase().contains(needle.as_str()))
}

pub fn filter_rows(rows: &[ComplaintRow], query: &str) -> Vec<RowVisibility> {
    rows.iter()
        .map(|row| RowVisibility {
            position: row.position,
            visible: row_matches(&row.cells, query),
        })
        .collect()
}
