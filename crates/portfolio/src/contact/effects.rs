/*!
Declarative side effects emitted by the submission orchestrator.

The orchestrator mutates only the state it owns (form, modal, phase) and the
relay adapter. Everything that reaches outside of it, the celebration overlay
and log lines, is returned as `Effect` values and executed by the app loop.
*/

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fire the confetti overlay once.
    Celebrate,
    /// Informational log line.
    Log(String),
    /// Something went wrong but was handled; logged at warn level.
    Warn(String),
}

impl Effect {
    pub fn log<T: Into<String>>(msg: T) -> Self {
        Effect::Log(msg.into())
    }

    pub fn warn<T: Into<String>>(msg: T) -> Self {
        Effect::Warn(msg.into())
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Celebrate => write!(f, "Celebrate"),
            Effect::Log(msg) => write!(f, "Log({msg})"),
            Effect::Warn(msg) => write!(f, "Warn({msg})"),
        }
    }
}
