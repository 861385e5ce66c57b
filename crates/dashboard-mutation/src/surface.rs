use dashboard_domain::{ComplaintId, StatusBadge, StatusLabel};

use crate::request::FormSubmission;

/// Table row widgets touched by a status change.
pub trait StatusRowSurface: Send + Sync {
    fn form_submission(&self, row_id: &ComplaintId) -> Option<FormSubmission>;
    fn badge(&self, row_id: &ComplaintId) -> Option<StatusBadge>;
    fn set_badge(&self, row_id: &ComplaintId, badge: &StatusBadge);
    fn set_selected_status(&self, row_id: &ComplaintId, status: &StatusLabel);
    fn set_control_enabled(&self, row_id: &ComplaintId, enabled: bool);
}
