use std::collections::{BTreeMap, HashMap};

use dashboard_domain::{ComplaintId, ComplaintRow, MapMarker, MarkerId, RowPosition};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationEntry {
    pub position: RowPosition,
    pub row_id: ComplaintId,
    pub marker: MapMarker,
}

/// Lookup from table row to map marker.
///
/// Positions without a marker are simply absent. Every entry's position is
/// the position of the row it was paired with when the index was built.
#[derive(Debug, Clone, Default)]
pub struct CorrelationIndex {
    by_position: BTreeMap<RowPosition, CorrelationEntry>,
    by_row_id: HashMap<ComplaintId, RowPosition>,
}

impl CorrelationIndex {
    /// Pairs the n-th row with the n-th marker.
    ///
    /// Only sound while both sequences come from the same server-side
    /// ordering; a row without a matching marker shifts every later pair.
    pub fn build(rows: &[ComplaintRow], markers: &[MapMarker]) -> Self {
        if rows.len() != markers.len() {
            warn!(
                rows = rows.len(),
                markers = markers.len(),
                "positional correlation over sequences of different length"
            );
        }

        let mut index = Self::default();
        for (row, marker) in rows.iter().zip(markers) {
            index.insert(row, marker.clone());
        }
        index
    }

    /// Pairs each row with the marker carrying the same identifier.
    pub fn from_join(rows: &[ComplaintRow], markers: &[MapMarker]) -> Self {
        let mut markers_by_id: HashMap<&MarkerId, &MapMarker> =
            markers.iter().map(|marker| (&marker.id, marker)).collect();

        let mut index = Self::default();
        for row in rows {
            let marker_id = MarkerId::new(row.id.as_str());
            match markers_by_id.remove(&marker_id) {
                Some(marker) => index.insert(row, marker.clone()),
                None => debug!(row_id = %row.id, position = %row.position, "row has no map marker"),
            }
        }

        if !markers_by_id.is_empty() {
            let mut orphaned: Vec<&str> = markers_by_id.keys().map(|id| id.as_str()).collect();
            orphaned.sort_unstable();
            warn!(
                orphaned = ?orphaned,
                "map markers without a matching table row were ignored"
            );
        }
        index
    }

    fn insert(&mut self, row: &ComplaintRow, marker: MapMarker) {
        self.by_row_id.insert(row.id.clone(), row.position);
        self.by_position.insert(
            row.position,
            CorrelationEntry {
                position: row.position,
                row_id: row.id.clone(),
                marker,
            },
        );
    }

    pub fn entry(&self, position: RowPosition) -> Option<&CorrelationEntry> {
        self.by_position.get(&position)
    }

    pub fn marker_for(&self, position: RowPosition) -> Option<&MapMarker> {
        self.entry(position).map(|entry| &entry.marker)
    }

    pub fn position_of(&self, row_id: &ComplaintId) -> Option<RowPosition> {
        self.by_row_id.get(row_id).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CorrelationEntry> {
        self.by_position.values()
    }

    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }
}
