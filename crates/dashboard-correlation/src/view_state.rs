use dashboard_domain::{GeoPoint, MarkerId, RowPosition};
use serde::Serialize;

/// Page-wide map and selection state. One instance per page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub center: GeoPoint,
    pub zoom: u8,
    pub open_popup: Option<MarkerId>,
    pub active_row: Option<RowPosition>,
}

impl ViewState {
    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            open_popup: None,
            active_row: None,
        }
    }
}
