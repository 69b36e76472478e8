//! Newline-delimited JSON protocol spoken over stdin/stdout.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use speech_cortex::dashboard::{Control, DashboardOutputs, SelectionState, UiEvent};
use speech_cortex::error::VizError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// List every UI control with its options and current value.
    Controls,
    GetState,
    /// Outputs for the current state without changing it.
    Render,

    // UI controls; `value` is the control's wire value.
    SetViewMode {
        value: String,
    },
    SetColorMode {
        value: String,
    },
    SetShowBrain {
        on: bool,
    },
    SetStatistic {
        value: String,
    },

    // Plotting-engine interaction events
    Click {
        id: usize,
    },
    Hover {
        #[serde(default)]
        data: Value,
    },
    Select {
        #[serde(default)]
        data: Value,
    },
    Relayout {
        #[serde(default)]
        data: Value,
    },

    Shutdown,
}

/// A request resolved into typed form.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Controls,
    GetState,
    Render,
    Event(UiEvent),
    Shutdown,
}

impl TryFrom<Request> for Command {
    type Error = VizError;

    fn try_from(req: Request) -> Result<Self, Self::Error> {
        Ok(match req {
            Request::Controls => Command::Controls,
            Request::GetState => Command::GetState,
            Request::Render => Command::Render,
            Request::SetViewMode { value } => Command::Event(UiEvent::SetViewMode(value.parse()?)),
            Request::SetColorMode { value } => {
                Command::Event(UiEvent::SetColorMode(value.parse()?))
            }
            Request::SetShowBrain { on } => Command::Event(UiEvent::SetShowFullBrain(on)),
            Request::SetStatistic { value } => {
                Command::Event(UiEvent::SetStatistic(value.parse()?))
            }
            Request::Click { id } => Command::Event(UiEvent::Click { id }),
            Request::Hover { data } => Command::Event(UiEvent::Hover { payload: data }),
            Request::Select { data } => Command::Event(UiEvent::Select { payload: data }),
            Request::Relayout { data } => Command::Event(UiEvent::Relayout { payload: data }),
            Request::Shutdown => Command::Shutdown,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Response {
    Controls { controls: Vec<Control> },
    State { state: SelectionState },
    Outputs { outputs: DashboardOutputs },
    Success { message: String },
    Error { message: String },
}

impl Response {
    pub fn error(e: impl std::fmt::Display) -> Self {
        Response::Error {
            message: e.to_string(),
        }
    }
}
