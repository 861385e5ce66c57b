//! Server-confirmed status changes for complaint rows.
//!
//! One [`StatusMutationController::change_status`] call drives one request
//! through `Idle -> Submitting -> {Succeeded, Failed} -> Idle`. Requests for
//! different rows never touch each other's badge; for the same row only the
//! most recently issued request is applied.

pub mod controller;
pub mod error;
pub mod notify;
pub mod registry;
pub mod request;
pub mod response;
pub mod state;
pub mod surface;
pub mod toast;
pub mod transport;

pub use controller::{MutationOutcome, MutationPerfSnapshot, StatusMutationController};
pub use error::{MutationError, MutationResult, GENERIC_FAILURE_MESSAGE};
pub use notify::{Notification, Notifier, NotifyError, Severity};
pub use registry::{MutationRegistry, RowMutationSnapshot};
pub use request::{FormSubmission, MutationRequest, STATUS_FIELD};
pub use response::{classify_response, Confirmation, DEFAULT_SUCCESS_MESSAGE};
pub use state::MutationPhase;
pub use surface::StatusRowSurface;
pub use toast::{Toast, ToastChannel, ToastPhase, ToastTiming};
pub use transport::{
    HttpMutationTransport, HttpTransportConfig, MutationTransport, TransportResponse,
    REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE,
};
