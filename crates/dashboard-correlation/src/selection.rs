use dashboard_domain::{MarkerId, RowPosition};
use tracing::debug;

use crate::index::CorrelationIndex;
use crate::surface::{MapSurface, RowHighlighter};
use crate::view_state::ViewState;

/// Element a row click originated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    Cell,
    Select,
    Option,
    Link,
    Other(String),
}

impl ClickTarget {
    pub fn from_tag_name(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "TD" | "TH" | "TR" => Self::Cell,
            "SELECT" => Self::Select,
            "OPTION" => Self::Option,
            "A" => Self::Link,
            _ => Self::Other(tag.trim().to_owned()),
        }
    }

    /// Controls inside a row that must not also trigger map navigation.
    pub fn is_embedded_control(&self) -> bool {
        matches!(self, Self::Select | Self::Option | Self::Link)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    Selected {
        position: RowPosition,
        marker_id: MarkerId,
    },
    /// No marker is correlated with the row.
    NoMarker,
    /// The click came from an embedded control.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct RowSelector {
    index: CorrelationIndex,
    focus_zoom: u8,
    narrow_viewport_px: u32,
}

impl RowSelector {
    pub fn new(index: CorrelationIndex, focus_zoom: u8, narrow_viewport_px: u32) -> Self {
        Self {
            index,
            focus_zoom,
            narrow_viewport_px,
        }
    }

    pub fn index(&self) -> &CorrelationIndex {
        &self.index
    }

    pub fn handle_row_click(
        &self,
        state: &mut ViewState,
        position: RowPosition,
        target: &ClickTarget,
        map: &mut dyn MapSurface,
        rows: &mut dyn RowHighlighter,
    ) -> SelectionOutcome {
        if target.is_embedded_control() {
            debug!(position = %position, target = ?target, "row click on embedded control ignored");
            return SelectionOutcome::Ignored;
        }
        self.select_for_row(state, position, map, rows)
    }

    /// Centers the map on the row's marker and makes the row the only
    /// active one. A row without a marker leaves everything untouched.
    pub fn select_for_row(
        &self,
        state: &mut ViewState,
        position: RowPosition,
        map: &mut dyn MapSurface,
        rows: &mut dyn RowHighlighter,
    ) -> SelectionOutcome {
        let Some(entry) = self.index.entry(position) else {
            debug!(position = %position, "no correlated marker for row");
            return SelectionOutcome::NoMarker;
        };
        let marker = &entry.marker;

        map.set_view(marker.point, self.focus_zoom);
        map.open_popup(marker);
        rows.clear_active_rows();
        rows.mark_active_row(position);

        state.center = marker.point;
        state.zoom = self.focus_zoom;
        state.open_popup = Some(marker.id.clone());
        state.active_row = Some(position);

        if map.viewport_width() < self.narrow_viewport_px {
            map.scroll_into_view();
        }

        debug!(position = %position, marker_id = %marker.id, "row selected on map");
        SelectionOutcome::Selected {
            position,
            marker_id: marker.id.clone(),
        }
    }
}
