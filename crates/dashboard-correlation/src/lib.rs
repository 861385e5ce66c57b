//! Row/marker correlation for the complaints table and the map overlay.
//!
//! The index is built once per page and only read afterwards. Selection state
//! lives in a single [`ViewState`] owned by the caller and passed in by
//! mutable reference, so the table and the map never hold their own copies.

pub mod index;
pub mod selection;
pub mod surface;
pub mod view_state;

pub use index::{CorrelationEntry, CorrelationIndex};
pub use selection::{ClickTarget, RowSelector, SelectionOutcome};
pub use surface::{MapSurface, RowHighlighter};
pub use view_state::ViewState;
