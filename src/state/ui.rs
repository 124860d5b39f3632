/// Visible UI state machine
///
/// The phase and status line live in one value object, changed only
/// through a pure reducer. Rendering happens elsewhere, so every
/// transition is testable without a display.

/// Where the conversion pipeline currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a drop
    Idle,
    /// A request is in flight; new drops are rejected
    Processing,
    /// The last conversion succeeded
    Done,
    /// The last conversion failed
    Failed,
}

/// Everything that can change the visible state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A gesture finished with no supported image in it
    NothingDropped,
    /// The selected file could not be read; carries the description
    ReadFailed(String),
    /// A validated image was handed to the worker
    ConversionStarted,
    /// The worker replied with a converted image
    ConversionDone,
    /// The worker replied with an error; carries the description
    ConversionFailed(String),
}

/// The visible state: phase plus the status line under the images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ui {
    pub phase: Phase,
    pub status: String,
}

impl Ui {
    pub fn new() -> Self {
        Ui {
            phase: Phase::Idle,
            status: String::new(),
        }
    }

    /// Pure reducer: the next visible state for one event.
    ///
    /// Worker replies only count while a conversion is running; a reply in
    /// any other phase leaves the state untouched.
    pub fn apply(&self, event: UiEvent) -> Ui {
        match event {
            UiEvent::NothingDropped => Ui {
                phase: Phase::Idle,
                status: "No valid images were dropped".to_string(),
            },
            UiEvent::ReadFailed(detail) => Ui {
                phase: Phase::Idle,
                status: detail,
            },
            UiEvent::ConversionStarted => Ui {
                phase: Phase::Processing,
                status: "Processing...".to_string(),
            },
            UiEvent::ConversionDone => {
                if self.phase != Phase::Processing {
                    return self.clone();
                }
                Ui {
                    phase: Phase::Done,
                    status: "Done!".to_string(),
                }
            }
            UiEvent::ConversionFailed(detail) => {
                if self.phase != Phase::Processing {
                    return self.clone();
                }
                Ui {
                    phase: Phase::Failed,
                    status: detail,
                }
            }
        }
    }
}
