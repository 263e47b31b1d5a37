//! Submission orchestrator.
//!
//! Owns the form values and the feedback modal, drives the relay adapter and
//! turns observed relay status transitions into modal updates and effects.
//!
//! ```text
//! Editing ──submit──▶ Submitting ──succeeded──▶ Done   ──close──▶ Editing (form empty)
//!                         │
//!                         └────────errors─────▶ Failed ──close──▶ Editing (form kept)
//! ```
//!
//! Status is observed by polling (`poll`) on every UI tick. Terminal flags are
//! only accepted for the cycle this orchestrator started; if both flags are set
//! at once, success wins. The form is reset only after success was observed.

use tokio::sync::watch;

use super::effects::Effect;
use super::form::{Field, FormInput};
use super::modal::ModalState;
use super::relay::{RelayAdapter, RelayStatus};

pub const SUCCESS_TITLE: &str = "Success!";
pub const SUCCESS_MESSAGE: &str =
    "🎉 Thank you! Your message has been sent successfully! You will be contacted soon.";
pub const ERROR_TITLE: &str = "Error Sending Message";
pub const ERROR_MESSAGE: &str = "⚠️ Failed to send message. Please try emailing directly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Submitting { cycle: u64 },
    Done,
    Failed,
}

/// Inputs accepted by [`SubmissionOrchestrator::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactIntent {
    Edit(Field, String),
    Submit,
    /// Re-read the relay status (sent on every tick).
    Poll,
    CloseModal,
}

pub struct SubmissionOrchestrator {
    adapter: RelayAdapter,
    status: watch::Receiver<RelayStatus>,
    phase: Phase,
    form: FormInput,
    modal: ModalState,
}

impl SubmissionOrchestrator {
    pub fn new(adapter: RelayAdapter) -> Self {
        let status = adapter.status();
        Self {
            adapter,
            status,
            phase: Phase::Editing,
            form: FormInput::default(),
            modal: ModalState::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn form(&self) -> &FormInput {
        &self.form
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    /// Whether the submit control is usable right now.
    pub fn submit_enabled(&self) -> bool {
        !self.is_submitting()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. }) || self.status.borrow().submitting
    }

    /// Single entry point mirroring the reducer style used by the app loop.
    pub fn handle(&mut self, intent: ContactIntent) -> Vec<Effect> {
        match intent {
            ContactIntent::Edit(field, value) => {
                self.update_field(field, value);
                Vec::new()
            }
            ContactIntent::Submit => self.submit(),
            ContactIntent::Poll => self.poll(),
            ContactIntent::CloseModal => self.close_modal(),
        }
    }

    /// Update one field. Edits are ignored while a submission is in flight
    /// (the inputs are disabled). Returns whether the edit was applied.
    pub fn update_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.form.set(field, value);
        true
    }

    /// Hand the current form to the relay adapter.
    pub fn submit(&mut self) -> Vec<Effect> {
        match self.phase {
            Phase::Submitting { cycle } => {
                return vec![Effect::log(format!(
                    "submit ignored, cycle {cycle} still in flight"
                ))];
            }
            Phase::Done => {
                return vec![Effect::log("submit ignored while success modal is open")];
            }
            // retry from the error dialog
            Phase::Failed => {
                self.modal.close();
                self.phase = Phase::Editing;
            }
            Phase::Editing => {}
        }

        if let Some(issue) = self.form.first_issue() {
            return vec![Effect::warn(format!("submit blocked: {issue}"))];
        }

        match self.adapter.submit(self.form.clone()) {
            Ok(cycle) => {
                self.phase = Phase::Submitting { cycle };
                vec![Effect::log(format!("contact submission {cycle} started"))]
            }
            Err(rejected) => vec![Effect::warn(format!("submit not accepted: {rejected}"))],
        }
    }

    /// Observe the relay status and advance the state machine.
    pub fn poll(&mut self) -> Vec<Effect> {
        let Phase::Submitting { cycle } = self.phase else {
            return Vec::new();
        };
        let status = self.status.borrow_and_update().clone();
        if status.cycle != cycle || status.submitting {
            return Vec::new();
        }

        if status.succeeded {
            self.modal.show_success(SUCCESS_TITLE, SUCCESS_MESSAGE);
            self.form.reset();
            self.phase = Phase::Done;
            return vec![
                Effect::Celebrate,
                Effect::log(format!("contact submission {cycle} delivered")),
            ];
        }

        if let Some(err) = status.errors {
            let details = err.diagnostics();
            self.modal
                .show_error(ERROR_TITLE, ERROR_MESSAGE, Some(details.clone()));
            self.phase = Phase::Failed;
            // the dialog may clip long payloads, the log keeps all of it
            return vec![Effect::warn(format!(
                "contact submission {cycle} failed: {err}\n{details}"
            ))];
        }

        Vec::new()
    }

    /// Wait for the running submission to finish, then apply it.
    ///
    /// Used by the headless `send` command; the TUI relies on `poll` instead.
    pub async fn settle(&mut self) -> Vec<Effect> {
        let Phase::Submitting { cycle } = self.phase else {
            return Vec::new();
        };
        if self
            .status
            .wait_for(|s| s.cycle != cycle || !s.submitting)
            .await
            .is_err()
        {
            return vec![Effect::warn("relay status channel closed")];
        }
        self.poll()
    }

    pub fn close_modal(&mut self) -> Vec<Effect> {
        if !self.modal.is_open {
            return Vec::new();
        }
        self.modal.close();
        match self.phase {
            Phase::Done | Phase::Failed => self.phase = Phase::Editing,
            Phase::Editing | Phase::Submitting { .. } => {}
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::contact::modal::ModalKind;
    use crate::contact::relay::RelayError;
    use crate::contact::relay::testing::{GatedTransport, settled};

    fn setup() -> (Arc<GatedTransport>, SubmissionOrchestrator) {
        let transport = Arc::new(GatedTransport::default());
        let orchestrator = SubmissionOrchestrator::new(RelayAdapter::new(transport.clone()));
        (transport, orchestrator)
    }

    fn fill(o: &mut SubmissionOrchestrator, form: &FormInput) {
        for field in Field::ALL {
            assert!(o.update_field(field, form.get(field)));
        }
    }

    fn ada() -> FormInput {
        FormInput::new("Ada", "ada@x.io", "Hi", "Hello")
    }

    #[tokio::test]
    async fn success_shows_modal_celebrates_once_and_resets_form() {
        let (transport, mut o) = setup();
        let release = transport.gate();
        fill(&mut o, &ada());

        o.submit();
        assert_eq!(o.phase(), Phase::Submitting { cycle: 1 });
        assert!(!o.submit_enabled());
        // nothing happens before the relay answers
        assert!(o.poll().is_empty());
        assert_eq!(o.form(), &ada());

        release.send(Ok(())).unwrap();
        settled(&o.adapter).await;
        let effects = o.poll();

        assert_eq!(
            effects.iter().filter(|e| **e == Effect::Celebrate).count(),
            1
        );
        assert_eq!(o.phase(), Phase::Done);
        assert!(o.modal().is_open);
        assert_eq!(o.modal().kind, Some(ModalKind::Success));
        assert_eq!(o.modal().title, "Success!");
        assert!(o.form().is_blank());
        assert!(o.submit_enabled());
        assert_eq!(transport.calls(), vec![ada()]);

        // further polls do not celebrate again
        assert!(o.poll().is_empty());
    }

    #[tokio::test]
    async fn form_is_reset_before_modal_closes() {
        let (transport, mut o) = setup();
        let release = transport.gate();
        fill(&mut o, &ada());
        o.submit();
        release.send(Ok(())).unwrap();
        settled(&o.adapter).await;
        o.poll();

        assert!(o.modal().is_open);
        assert!(o.form().is_blank());

        o.close_modal();
        assert!(!o.modal().is_open);
        assert_eq!(o.phase(), Phase::Editing);
        assert!(o.form().is_blank());
    }

    #[tokio::test]
    async fn transport_error_opens_error_modal_and_keeps_form() {
        let (transport, mut o) = setup();
        let fail = transport.gate();
        fill(&mut o, &ada());
        o.submit();

        fail.send(Err(RelayError::network("connection refused"))).unwrap();
        settled(&o.adapter).await;
        o.poll();

        assert_eq!(o.phase(), Phase::Failed);
        let modal = o.modal();
        assert!(modal.is_open);
        assert_eq!(modal.kind, Some(ModalKind::Error));
        assert_eq!(modal.title, "Error Sending Message");
        let details = modal.details.as_deref().unwrap();
        assert!(details.contains("connection refused"));
        assert!(details.contains("\"network\""));
        assert_eq!(o.form(), &ada());
    }

    #[tokio::test]
    async fn provider_error_details_are_the_provider_payload() {
        let (transport, mut o) = setup();
        let fail = transport.gate();
        fill(&mut o, &ada());
        o.submit();

        let body = r#"{"errors":[{"message":"Form not found"}]}"#;
        fail.send(Err(RelayError::provider(404, body))).unwrap();
        let effects = o.settle().await;

        match effects.as_slice() {
            [Effect::Warn(msg)] => assert!(msg.contains("Form not found")),
            other => panic!("unexpected effects: {other:?}"),
        }
        let details: serde_json::Value =
            serde_json::from_str(o.modal().details.as_deref().unwrap()).unwrap();
        assert_eq!(details, serde_json::from_str::<serde_json::Value>(body).unwrap());
    }

    #[tokio::test]
    async fn success_wins_when_both_flags_are_set() {
        let (transport, mut o) = setup();
        let _pending = transport.gate();
        fill(&mut o, &ada());
        o.submit();

        o.adapter.force_status(RelayStatus {
            submitting: false,
            succeeded: true,
            errors: Some(RelayError::timeout("late timeout")),
            cycle: 1,
        });
        let effects = o.poll();

        assert!(effects.contains(&Effect::Celebrate));
        assert_eq!(o.phase(), Phase::Done);
        assert_eq!(o.modal().kind, Some(ModalKind::Success));
        assert_eq!(o.modal().details, None);
        assert!(o.form().is_blank());
    }

    #[tokio::test]
    async fn terminal_status_of_another_cycle_is_ignored() {
        let (transport, mut o) = setup();
        let _pending = transport.gate();
        fill(&mut o, &ada());
        o.submit();

        o.adapter.force_status(RelayStatus {
            submitting: false,
            succeeded: true,
            errors: None,
            cycle: 7,
        });
        assert!(o.poll().is_empty());
        assert_eq!(o.phase(), Phase::Submitting { cycle: 1 });
        assert_eq!(o.form(), &ada());
    }

    #[tokio::test]
    async fn double_submit_invokes_relay_once() {
        let (transport, mut o) = setup();
        let release = transport.gate();
        fill(&mut o, &ada());

        o.submit();
        let second = o.submit();
        assert!(matches!(second.as_slice(), [Effect::Log(_)]));
        assert_eq!(transport.calls().len(), 1);

        release.send(Ok(())).unwrap();
        o.settle().await;
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn edits_are_ignored_while_submitting() {
        let (transport, mut o) = setup();
        let release = transport.gate();
        fill(&mut o, &ada());
        o.submit();

        assert!(!o.update_field(Field::Message, "changed"));
        assert_eq!(o.form().get(Field::Message), "Hello");

        release.send(Ok(())).unwrap();
        o.settle().await;
    }

    #[tokio::test]
    async fn incomplete_form_never_reaches_the_relay() {
        let (transport, mut o) = setup();
        fill(&mut o, &FormInput::new("", "ada@x.io", "Hi", "Hello"));

        let effects = o.submit();
        assert!(matches!(effects.as_slice(), [Effect::Warn(_)]));
        assert_eq!(o.phase(), Phase::Editing);
        assert!(transport.calls().is_empty());
        assert!(!o.modal().is_open);
    }

    #[tokio::test]
    async fn retry_after_error_sends_corrected_payload() {
        let (transport, mut o) = setup();
        let fail = transport.gate();
        fill(&mut o, &ada());
        o.submit();
        fail.send(Err(RelayError::timeout("deadline"))).unwrap();
        o.settle().await;
        assert_eq!(o.phase(), Phase::Failed);

        o.close_modal();
        assert_eq!(o.phase(), Phase::Editing);
        assert!(o.update_field(Field::Message, "Hello again"));

        let ok = transport.gate();
        o.submit();
        assert_eq!(o.phase(), Phase::Submitting { cycle: 2 });
        ok.send(Ok(())).unwrap();
        o.settle().await;

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].get(Field::Message), "Hello again");
        assert_eq!(o.phase(), Phase::Done);
    }

    #[tokio::test]
    async fn submit_from_failed_state_counts_as_retry() {
        let (transport, mut o) = setup();
        let fail = transport.gate();
        fill(&mut o, &ada());
        o.submit();
        fail.send(Err(RelayError::timeout("deadline"))).unwrap();
        o.settle().await;

        let ok = transport.gate();
        o.submit();
        assert!(!o.modal().is_open);
        assert_eq!(o.phase(), Phase::Submitting { cycle: 2 });
        ok.send(Ok(())).unwrap();
        o.settle().await;
        assert_eq!(o.phase(), Phase::Done);
    }

    #[tokio::test]
    async fn close_without_open_modal_is_a_noop() {
        let (_transport, mut o) = setup();
        fill(&mut o, &ada());
        assert!(o.close_modal().is_empty());
        assert_eq!(o.phase(), Phase::Editing);
        assert_eq!(o.form(), &ada());
    }

    #[tokio::test]
    async fn handle_routes_intents() {
        let (transport, mut o) = setup();
        let release = transport.gate();
        for field in Field::ALL {
            o.handle(ContactIntent::Edit(field, ada().get(field).to_string()));
        }
        o.handle(ContactIntent::Submit);
        release.send(Ok(())).unwrap();
        settled(&o.adapter).await;
        let effects = o.handle(ContactIntent::Poll);
        assert!(effects.contains(&Effect::Celebrate));
        o.handle(ContactIntent::CloseModal);
        assert_eq!(o.phase(), Phase::Editing);
    }
}
