//! Headless complaint dashboard: page snapshot in, page state out.

pub mod error;
pub mod page;
pub mod session;

pub use error::{AppError, AppResult};
pub use page::{parse_page_snapshot, HeadlessPage, MapWidget, PageRow, PageSnapshot, PageView};
pub use session::{DashboardSession, SessionReport};
