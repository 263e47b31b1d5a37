//! Contact submission subsystem.
//!
//! Leaves first:
//!   - `form`         : the four-field form model + client-side checks
//!   - `relay`        : relay adapter (status flags, transport seam)
//!   - `http`         : reqwest-backed transport to the form-relay provider
//!   - `modal`        : feedback modal state
//!   - `celebration`  : confetti overlay
//!   - `effects`      : declarative side effects leaving the orchestrator
//!   - `orchestrator` : the state machine tying it all together
pub mod celebration;
pub mod effects;
pub mod form;
pub mod http;
pub mod modal;
pub mod orchestrator;
pub mod relay;

pub use celebration::Celebration;
pub use effects::Effect;
pub use form::{Field, FieldIssue, FormInput};
pub use http::HttpRelay;
pub use modal::{ModalKind, ModalState};
pub use orchestrator::{ContactIntent, Phase, SubmissionOrchestrator};
pub use relay::{RelayAdapter, RelayError, RelayStatus, RelayTransport, SubmitRejected};
