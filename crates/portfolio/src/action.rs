use serde::Serialize;
use strum::Display;

use crate::contact::{Field, FormInput};
use crate::pages::PageKind;

/// What the contact page needs to mirror from the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSnapshot {
    pub form: FormInput,
    pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    Error(String),
    Navigate(PageKind),
    NextPage,
    PrevPage,
    /// A contact input changed its value.
    FieldChanged(Field, String),
    /// Submit intent from the contact form (already validated client-side).
    SubmitContact,
    CloseModal,
    /// Broadcast after every orchestrator change.
    ContactState(ContactSnapshot),
}
