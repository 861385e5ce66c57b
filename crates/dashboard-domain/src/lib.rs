//! Complaint dashboard domain types.
//!
//! Rows, markers and the embedded page snapshots both views are seeded from.
//! Nothing in this crate performs I/O; parsing failures surface as
//! [`SnapshotError`] and are expected to stop page initialization.

pub mod chart;
pub mod complaint;
pub mod error;
pub mod filter;
pub mod identifiers;
pub mod marker;
pub mod status;

pub use chart::{parse_chart_feed, ChartFeed, ChartFeeds};
pub use complaint::{rows_from_records, ComplaintRow, ComplaintRowRecord};
pub use error::SnapshotError;
pub use filter::{filter_rows, row_matches, RowVisibility};
pub use identifiers::{ComplaintId, MarkerId, RowPosition};
pub use marker::{parse_marker_snapshot, GeoPoint, MapMarker, MarkerPopup};
pub use status::{status_style_class, StatusBadge, StatusLabel, PENDING_STATUS};
