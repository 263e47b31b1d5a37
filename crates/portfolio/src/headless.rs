//! One-shot contact submission without the terminal UI.
//!
//! Runs the same orchestrator as the contact page, waits for the relay to
//! answer and prints the modal content the UI would have shown.

use std::fmt;

use color_eyre::Result;
use tracing::{info, warn};

use crate::{
    cli::SendArgs,
    config::Config,
    contact::{
        ContactIntent, Effect, Field, FieldIssue, FormInput, HttpRelay, ModalKind, ModalState,
        RelayAdapter, SubmissionOrchestrator,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Rejected by the client-side checks; nothing was sent.
    Invalid(FieldIssue),
    /// The relay answered; the modal holds success or error feedback.
    Answered(ModalState),
}

impl Outcome {
    pub fn delivered(&self) -> bool {
        matches!(self, Outcome::Answered(m) if m.kind == Some(ModalKind::Success))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Invalid(issue) => write!(f, "{issue}"),
            Outcome::Answered(modal) => {
                writeln!(f, "{}", modal.title)?;
                write!(f, "{}", modal.message)?;
                if let Some(details) = modal.visible_details() {
                    write!(f, "\n\nTechnical Details:\n{details}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<SendArgs> for FormInput {
    fn from(args: SendArgs) -> Self {
        FormInput::new(args.name, args.email, args.subject, args.message)
    }
}

/// `portfolio send`: returns whether the message was delivered.
pub async fn send(config: &Config, args: SendArgs) -> Result<bool> {
    let relay = HttpRelay::new(&config.relay)?;
    info!("headless send to {}", relay.url());
    let outcome = deliver(RelayAdapter::new(relay), args.into()).await;
    println!("{outcome}");
    Ok(outcome.delivered())
}

pub async fn deliver(adapter: RelayAdapter, form: FormInput) -> Outcome {
    if let Some(issue) = form.first_issue() {
        return Outcome::Invalid(issue);
    }

    let mut orchestrator = SubmissionOrchestrator::new(adapter);
    for field in Field::ALL {
        orchestrator.handle(ContactIntent::Edit(field, form.get(field).to_string()));
    }
    log_effects(orchestrator.handle(ContactIntent::Submit));
    log_effects(orchestrator.settle().await);
    Outcome::Answered(orchestrator.modal().clone())
}

fn log_effects(effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            // no overlay without a terminal
            Effect::Celebrate => {}
            Effect::Log(msg) => info!("[effect] {msg}"),
            Effect::Warn(msg) => warn!("[effect] {msg}"),
        }
    }
}
