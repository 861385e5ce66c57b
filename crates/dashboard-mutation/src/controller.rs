use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashboard_domain::{ComplaintId, StatusBadge, StatusLabel};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::MutationError;
use crate::notify::{Notification, Notifier};
use crate::registry::{MutationRegistry, RowMutationSnapshot};
use crate::request::MutationRequest;
use crate::response::classify_response;
use crate::state::MutationPhase;
use crate::surface::StatusRowSurface;
use crate::transport::MutationTransport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Succeeded {
        generation: u64,
        message: String,
    },
    /// `generation` is `None` when the request never left `Idle`.
    Failed {
        generation: Option<u64>,
        error: MutationError,
    },
    /// A newer request for the same row was issued before this one settled.
    Superseded {
        generation: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MutationPerfSnapshot {
    pub requests_total: u64,
    pub success_total: u64,
    pub failures_total: u64,
    pub superseded_total: u64,
    pub in_flight: usize,
}

#[derive(Debug, Default)]
struct MutationPerfCounters {
    requests_total: AtomicU64,
    success_total: AtomicU64,
    failures_total: AtomicU64,
    superseded_total: AtomicU64,
}

impl MutationPerfCounters {
    fn snapshot(&self, in_flight: usize) -> MutationPerfSnapshot {
        MutationPerfSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            success_total: self.success_total.load(Ordering::Relaxed),
            failures_total: self.failures_total.load(Ordering::Relaxed),
            superseded_total: self.superseded_total.load(Ordering::Relaxed),
            in_flight,
        }
    }
}

#[derive(Clone)]
pub struct StatusMutationController {
    transport: Arc<dyn MutationTransport>,
    surface: Arc<dyn StatusRowSurface>,
    notifier: Arc<dyn Notifier>,
    registry: Arc<Mutex<MutationRegistry>>,
    perf: Arc<MutationPerfCounters>,
}

impl StatusMutationController {
    pub fn new(
        transport: Arc<dyn MutationTransport>,
        surface: Arc<dyn StatusRowSurface>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            transport,
            surface,
            notifier,
            registry: Arc::new(Mutex::new(MutationRegistry::default())),
            perf: Arc::new(MutationPerfCounters::default()),
        }
    }

    pub fn row_snapshot(&self, row_id: &ComplaintId) -> Option<RowMutationSnapshot> {
        lock_registry(&self.registry).snapshot(row_id).copied()
    }

    pub fn perf_snapshot(&self) -> MutationPerfSnapshot {
        let in_flight = lock_registry(&self.registry).in_flight_total();
        self.perf.snapshot(in_flight)
    }

    /// Submits `new_status` for the row and reconciles the row once the
    /// server answers. Never returns an error: every failure is reported
    /// through the notifier and the returned outcome.
    pub async fn change_status(
        &self,
        row_id: &ComplaintId,
        new_status: StatusLabel,
    ) -> MutationOutcome {
        self.perf.requests_total.fetch_add(1, Ordering::Relaxed);

        let Some(form) = self.surface.form_submission(row_id) else {
            let error = MutationError::RowUnavailable(row_id.to_string());
            warn!(row_id = %row_id, "status change for a row without a form");
            self.perf.failures_total.fetch_add(1, Ordering::Relaxed);
            self.surface_notification(Notification::error(error.user_message()));
            return MutationOutcome::Failed {
                generation: None,
                error,
            };
        };

        let prior_badge = self.surface.badge(row_id);
        let generation = lock_registry(&self.registry).begin(row_id);
        let _control = ControlRelease::engage(
            Arc::clone(&self.surface),
            Arc::clone(&self.registry),
            row_id.clone(),
        );

        let request = MutationRequest::new(row_id.clone(), new_status.clone(), generation, form);
        info!(
            row_id = %row_id,
            generation,
            status = %new_status,
            action = %request.form.action,
            "submitting status update"
        );

        let settled = match self.transport.submit(&request).await {
            Ok(response) => classify_response(&response),
            Err(error) => Err(error),
        };

        let phase = if settled.is_ok() {
            MutationPhase::Succeeded
        } else {
            MutationPhase::Failed
        };
        if !lock_registry(&self.registry).settle(row_id, generation, phase) {
            self.perf.superseded_total.fetch_add(1, Ordering::Relaxed);
            debug!(row_id = %row_id, generation, "discarding superseded status response");
            return MutationOutcome::Superseded { generation };
        }

        match settled {
            Ok(confirmation) => {
                self.surface
                    .set_badge(row_id, &StatusBadge::for_status(&new_status));
                self.perf.success_total.fetch_add(1, Ordering::Relaxed);
                info!(row_id = %row_id, generation, status = %new_status, "status update confirmed");
                self.surface_notification(Notification::success(confirmation.message.clone()));
                MutationOutcome::Succeeded {
                    generation,
                    message: confirmation.message,
                }
            }
            Err(error) => {
                if let Some(prior) = prior_badge {
                    self.surface.set_badge(row_id, &prior);
                    self.surface.set_selected_status(row_id, &prior.status());
                }
                self.perf.failures_total.fetch_add(1, Ordering::Relaxed);
                warn!(row_id = %row_id, generation, error = %error, "status update failed");
                self.surface_notification(Notification::error(error.user_message()));
                MutationOutcome::Failed {
                    generation: Some(generation),
                    error,
                }
            }
        }
    }

    fn surface_notification(&self, notification: Notification) {
        if let Err(error) = self.notifier.notify(notification) {
            warn!(error = %error, "failed to surface status notification");
        }
    }
}

/// Disables the row's control for the lifetime of one request. Dropping it
/// re-enables the control, including when the request future is abandoned.
struct ControlRelease {
    surface: Arc<dyn StatusRowSurface>,
    registry: Arc<Mutex<MutationRegistry>>,
    row_id: ComplaintId,
}

impl ControlRelease {
    fn engage(
        surface: Arc<dyn StatusRowSurface>,
        registry: Arc<Mutex<MutationRegistry>>,
        row_id: ComplaintId,
    ) -> Self {
        surface.set_control_enabled(&row_id, false);
        Self {
            surface,
            registry,
            row_id,
        }
    }
}

impl Drop for ControlRelease {
    fn drop(&mut self) {
        lock_registry(&self.registry).release(&self.row_id);
        self.surface.set_control_enabled(&self.row_id, true);
    }
}

fn lock_registry(registry: &Mutex<MutationRegistry>) -> MutexGuard<'_, MutationRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}
