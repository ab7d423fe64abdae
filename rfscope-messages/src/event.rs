use serde::{Deserialize, Serialize};

use crate::SweepResult;

/// Events sent from the engine to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    /// Sent once when the engine starts accepting commands.
    WorkerReady { timestamp: u64 },
    /// Result of a `ProcessSweep` command.
    SweepProcessed(SweepResult),
    MaxHoldReset { success: bool },
    BaselineReset { success: bool },
    AllReset { success: bool },
    /// A command failed. The engine keeps running.
    Error { message: String, stack: String },
}

impl Event {
    pub fn error(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Event::Error {
            message: message.into(),
            stack: stack.into(),
        }
    }
}
