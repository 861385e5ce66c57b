//! Auto-dismissing toast notifications.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::time::sleep;
use tracing::debug;

use crate::notify::{Notification, Notifier, NotifyError};

const DEFAULT_DISPLAY: Duration = Duration::from_millis(3000);
const DEFAULT_FADE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTiming {
    pub display: Duration,
    pub fade: Duration,
}

impl Default for ToastTiming {
    fn default() -> Self {
        Self {
            display: DEFAULT_DISPLAY,
            fade: DEFAULT_FADE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ToastPhase {
    Visible,
    Fading,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
    pub phase: ToastPhase,
}

/// Live toast list. Each toast stays visible for `display`, fades for
/// `fade`, then disappears. Dismissal is scheduled on the current tokio
/// runtime.
#[derive(Debug, Clone, Default)]
pub struct ToastChannel {
    toasts: Arc<Mutex<Vec<Toast>>>,
    next_id: Arc<AtomicU64>,
    timing: ToastTiming,
}

impl ToastChannel {
    pub fn new(timing: ToastTiming) -> Self {
        Self {
            toasts: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
            timing,
        }
    }

    pub fn timing(&self) -> ToastTiming {
        self.timing
    }

    pub fn active(&self) -> Vec<Toast> {
        lock_toasts(&self.toasts).clone()
    }
}

impl Notifier for ToastChannel {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        let runtime = Handle::try_current().map_err(|error| {
            NotifyError::Unavailable(format!("no runtime to schedule toast dismissal: {error}"))
        })?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(toast_id = id, severity = notification.severity.as_str(), "showing toast");
        lock_toasts(&self.toasts).push(Toast {
            id,
            notification,
            phase: ToastPhase::Visible,
        });

        let toasts = Arc::clone(&self.toasts);
        let timing = self.timing;
        runtime.spawn(async move {
            sleep(timing.display).await;
            {
                let mut live = lock_toasts(&toasts);
                if let Some(toast) = live.iter_mut().find(|toast| toast.id == id) {
                    toast.phase = ToastPhase::Fading;
                }
            }
            sleep(timing.fade).await;
            lock_toasts(&toasts).retain(|toast| toast.id != id);
        });
        Ok(())
    }
}

fn lock_toasts(toasts: &Mutex<Vec<Toast>>) -> MutexGuard<'_, Vec<Toast>> {
    toasts.lock().unwrap_or_else(PoisonError::into_inner)
}
