use dashboard_domain::{GeoPoint, MapMarker, RowPosition};

/// The rendered map widget.
pub trait MapSurface {
    fn set_view(&mut self, center: GeoPoint, zoom: u8);
    fn open_popup(&mut self, marker: &MapMarker);
    fn scroll_into_view(&mut self);
    fn viewport_width(&self) -> u32;
}

/// The rendered table's active-row styling.
pub trait RowHighlighter {
    fn clear_active_rows(&mut self);
    fn mark_active_row(&mut self, position: RowPosition);
}
