use serde::{Deserialize, Serialize};

use crate::identifiers::{ComplaintId, RowPosition};
use crate::status::StatusLabel;

/// One complaint rendered as a table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplaintRow {
    pub position: RowPosition,
    pub id: ComplaintId,
    pub status: StatusLabel,
    pub cells: Vec<String>,
    /// Target URL of the row's status form.
    pub action: String,
}

/// Row as it appears in the page snapshot, before a position is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComplaintRowRecord {
    pub id: ComplaintId,
    #[serde(default)]
    pub status: StatusLabel,
    #[serde(default)]
    pub cells: Vec<String>,
    pub action: String,
}

/// Positions follow snapshot order, which is the server's render order.
pub fn rows_from_records(records: Vec<ComplaintRowRecord>) -> Vec<ComplaintRow> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| ComplaintRow {
            position: RowPosition::new(index),
            id: record.id,
            status: record.status,
            cells: record.cells,
            action: record.action,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{rows_from_records, ComplaintRowRecord};
    use crate::identifiers::{ComplaintId, RowPosition};

    #[test]
    fn records_receive_positions_in_snapshot_order() {
        let records: Vec<ComplaintRowRecord> = serde_json::from_str(
            r#"[
                {"id": 9, "status": "Resolved", "cells": ["Horn", "Banani"], "action": "/update_status/9"},
                {"id": "7", "cells": ["Construction"], "action": "/update_status/7"}
            ]"#,
        )
        .expect("parse row records");

        let rows = rows_from_records(records);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].position, RowPosition::new(0));
        assert_eq!(rows[0].id, ComplaintId::new("9"));
        assert_eq!(rows[0].status.as_str(), "Resolved");
        assert_eq!(rows[1].position, RowPosition::new(1));
        assert_eq!(rows[1].status.as_str(), "Pending");
    }
}
