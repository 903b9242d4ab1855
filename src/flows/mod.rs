//! The conversational form engine.
//!
//! A flow is a state machine fed one [`FlowEvent`] at a time. Each event
//! produces a [`Step`]: the replies to send and whether the flow continues
//! or is finished. Flows never talk to the transport themselves, which is
//! what makes them testable without a network.

pub mod comment;
pub mod delete;
pub mod edit;
pub mod files;
pub mod prompts;
pub mod registration;
pub mod request;

use crate::telegram::{FileRef, Keyboard, Message};

pub use comment::CommentFlow;
pub use delete::DeleteFlow;
pub use edit::{EditField, EditFlow};
pub use files::{FileIntake, UploadFolders};
pub use registration::RegistrationFlow;
pub use request::{ComplaintFlow, RequestFlow};

/// One user input, stripped down to what the state machines care about.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    Text(String),
    Location { latitude: f64, longitude: f64 },
    File(FileRef),
    Callback(String),
}

impl FlowEvent {
    /// Extracts the event carried by a message, if any.
    pub fn from_message(message: &Message) -> Option<Self> {
        if let Some(text) = &message.text {
            return Some(FlowEvent::Text(text.clone()));
        }
        if let Some(location) = &message.location {
            return Some(FlowEvent::Location {
                latitude: location.latitude,
                longitude: location.longitude,
            });
        }
        message.file().map(FlowEvent::File)
    }
}

/// A message to send back, with whatever keyboard should accompany it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }
}

/// Whether the session stays open after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Done,
}

/// What a state handler produced for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub replies: Vec<Reply>,
    pub outcome: Outcome,
}

impl Step {
    /// Stay in the flow and send one reply.
    pub fn stay(reply: Reply) -> Self {
        Self {
            replies: vec![reply],
            outcome: Outcome::Continue,
        }
    }

    pub fn stay_many(replies: Vec<Reply>) -> Self {
        Self {
            replies,
            outcome: Outcome::Continue,
        }
    }

    /// Finish the flow with a closing reply.
    pub fn done(reply: Reply) -> Self {
        Self {
            replies: vec![reply],
            outcome: Outcome::Done,
        }
    }

    pub fn done_many(replies: Vec<Reply>) -> Self {
        Self {
            replies,
            outcome: Outcome::Done,
        }
    }

    /// Stay in the flow and say nothing. Used for input kinds a state does
    /// not listen to at all.
    pub fn ignore() -> Self {
        Self {
            replies: Vec::new(),
            outcome: Outcome::Continue,
        }
    }

    pub fn is_done(&self) -> bool {
        self.outcome == Outcome::Done
    }
}
