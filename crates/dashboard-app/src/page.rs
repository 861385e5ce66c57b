//! In-memory stand-in for the rendered dashboard page.
//!
//! [`HeadlessPage`] holds what a browser would show: the complaints table
//! with each row's badge, status selector, enabled flag, active and visible
//! markers, plus the map widget's view and open popup. The correlation and
//! mutation crates drive it through their surface traits.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashboard_correlation::{MapSurface, RowHighlighter};
use dashboard_domain::{
    rows_from_records, ChartFeeds, ComplaintId, ComplaintRow, ComplaintRowRecord, GeoPoint,
    MapMarker, RowPosition, RowVisibility, SnapshotError, StatusBadge, StatusLabel,
};
use dashboard_mutation::{FormSubmission, StatusRowSurface, STATUS_FIELD};
use serde::{Deserialize, Serialize};

const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

/// The JSON document a dashboard page is seeded from.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSnapshot {
    pub rows: Vec<ComplaintRowRecord>,
    #[serde(default)]
    pub markers: Vec<MapMarker>,
    #[serde(default)]
    pub charts: ChartFeeds,
}

pub fn parse_page_snapshot(raw: &str) -> Result<PageSnapshot, SnapshotError> {
    serde_json::from_str(raw).map_err(|error| SnapshotError::Malformed {
        snapshot: "page",
        message: error.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRow {
    pub position: RowPosition,
    pub id: ComplaintId,
    pub cells: Vec<String>,
    pub badge: StatusBadge,
    pub selected_status: StatusLabel,
    pub control_enabled: bool,
    pub active: bool,
    pub visible: bool,
    #[serde(skip)]
    form: FormSubmission,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapWidget {
    pub center: GeoPoint,
    pub zoom: u8,
    /// Rendered popup content of the open marker.
    pub popup_html: Option<String>,
    pub scrolled_into_view: usize,
    pub viewport_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub rows: Vec<PageRow>,
    pub map: MapWidget,
}

#[derive(Debug, Clone)]
pub struct HeadlessPage {
    view: Arc<Mutex<PageView>>,
}

impl HeadlessPage {
    pub fn new(rows: &[ComplaintRow], center: GeoPoint, zoom: u8) -> Self {
        let rows = rows
            .iter()
            .map(|row| PageRow {
                position: row.position,
                id: row.id.clone(),
                cells: row.cells.clone(),
                badge: StatusBadge::for_status(&row.status),
                selected_status: row.status.clone(),
                control_enabled: true,
                active: false,
                visible: true,
                form: FormSubmission::new(row.action.clone())
                    .with_field(STATUS_FIELD, row.status.as_str()),
            })
            .collect();
        Self {
            view: Arc::new(Mutex::new(PageView {
                rows,
                map: MapWidget {
                    center,
                    zoom,
                    popup_html: None,
                    scrolled_into_view: 0,
                    viewport_width: DEFAULT_VIEWPORT_WIDTH,
                },
            })),
        }
    }

    pub fn from_records(records: Vec<ComplaintRowRecord>, center: GeoPoint, zoom: u8) -> Self {
        Self::new(&rows_from_records(records), center, zoom)
    }

    pub fn set_viewport_width(&self, width: u32) {
        self.lock().map.viewport_width = width;
    }

    /// Mirrors the operator picking a value in a row's status selector
    /// before the change event fires. Returns `false` for unknown rows.
    pub fn choose_status(&self, row_id: &ComplaintId, status: &StatusLabel) -> bool {
        let mut view = self.lock();
        let Some(row) = find_row_mut(&mut view, row_id) else {
            return false;
        };
        row.selected_status = status.clone();
        row.form.set_field(STATUS_FIELD, status.as_str());
        true
    }

    pub fn apply_visibility(&self, visibility: &[RowVisibility]) {
        let mut view = self.lock();
        for update in visibility {
            if let Some(row) = view.rows.get_mut(update.position.get()) {
                row.visible = update.visible;
            }
        }
    }

    pub fn row(&self, row_id: &ComplaintId) -> Option<PageRow> {
        self.lock().rows.iter().find(|row| &row.id == row_id).cloned()
    }

    pub fn view(&self) -> PageView {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, PageView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn find_row_mut<'a>(view: &'a mut PageView, row_id: &ComplaintId) -> Option<&'a mut PageRow> {
    view.rows.iter_mut().find(|row| &row.id == row_id)
}

impl StatusRowSurface for HeadlessPage {
    fn form_submission(&self, row_id: &ComplaintId) -> Option<FormSubmission> {
        let view = self.lock();
        view.rows
            .iter()
            .find(|row| &row.id == row_id)
            .map(|row| row.form.clone())
    }

    fn badge(&self, row_id: &ComplaintId) -> Option<StatusBadge> {
        self.row(row_id).map(|row| row.badge)
    }

    fn set_badge(&self, row_id: &ComplaintId, badge: &StatusBadge) {
        if let Some(row) = find_row_mut(&mut self.lock(), row_id) {
            row.badge = badge.clone();
        }
    }

    fn set_selected_status(&self, row_id: &ComplaintId, status: &StatusLabel) {
        if let Some(row) = find_row_mut(&mut self.lock(), row_id) {
            row.selected_status = status.clone();
            row.form.set_field(STATUS_FIELD, status.as_str());
        }
    }

    fn set_control_enabled(&self, row_id: &ComplaintId, enabled: bool) {
        if let Some(row) = find_row_mut(&mut self.lock(), row_id) {
            row.control_enabled = enabled;
        }
    }
}

impl MapSurface for HeadlessPage {
    fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        let mut view = self.lock();
        view.map.center = center;
        view.map.zoom = zoom;
    }

    fn open_popup(&mut self, marker: &MapMarker) {
        self.lock().map.popup_html = Some(marker.popup.html());
    }

    fn scroll_into_view(&mut self) {
        self.lock().map.scrolled_into_view += 1;
    }

    fn viewport_width(&self) -> u32 {
        self.lock().map.viewport_width
    }
}

impl RowHighlighter for HeadlessPage {
    fn clear_active_rows(&mut self) {
        self.lock().rows.iter_mut().for_each(|row| row.active = false);
    }

    fn mark_active_row(&mut self, position: RowPosition) {
        if let Some(row) = self.lock().rows.get_mut(position.get()) {
            row.active = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use dashboard_domain::{ComplaintId, GeoPoint, StatusLabel};
    use dashboard_mutation::{StatusRowSurface, STATUS_FIELD};

    use super::{parse_page_snapshot, HeadlessPage};

    const PAGE: &str = r#"{
        "rows": [
            {"id": 12, "status": "Pending", "cells": ["12", "Flood", "Dhanmondi"], "action": "/update_status/12"},
            {"id": "13", "cells": ["13", "Noise", "Gulshan"], "action": "/update_status/13"}
        ],
        "markers": [
            {"id": 12, "lat": 23.7461, "lng": 90.3742, "type": "Flood", "location": "Dhanmondi"}
        ],
        "charts": {"type": {"labels": ["Flood", "Noise"], "values": [1, 1]}}
    }"#;

    fn page() -> HeadlessPage {
        let snapshot = parse_page_snapshot(PAGE).expect("parse page");
        HeadlessPage::from_records(snapshot.rows, GeoPoint::new(23.8103, 90.4125), 13)
    }

    #[test]
    fn snapshot_rows_default_to_pending_and_accept_numeric_ids() {
        let snapshot = parse_page_snapshot(PAGE).expect("parse page");

        assert_eq!(snapshot.rows[0].id, ComplaintId::new("12"));
        assert_eq!(snapshot.rows[1].status, StatusLabel::pending());
        assert_eq!(snapshot.markers.len(), 1);
        assert!(snapshot.charts.by_type.is_some());
        assert!(snapshot.charts.by_status.is_none());
    }

    #[test]
    fn malformed_page_snapshot_is_rejected() {
        let error = parse_page_snapshot(r#"{"markers": []}"#).expect_err("rows are required");
        assert!(error.to_string().contains("page snapshot is malformed"));
    }

    #[test]
    fn chosen_status_flows_into_form_submission() {
        let page = page();
        let row_id = ComplaintId::new("12");

        assert!(page.choose_status(&row_id, &StatusLabel::new("Resolved")));
        assert!(!page.choose_status(&ComplaintId::new("99"), &StatusLabel::new("Resolved")));

        let form = page.form_submission(&row_id).expect("row form");
        assert_eq!(form.action, "/update_status/12");
        assert_eq!(form.field(STATUS_FIELD), Some("Resolved"));
        assert_eq!(
            page.badge(&row_id).map(|badge| badge.text),
            Some("Pending".to_owned())
        );
    }
}
