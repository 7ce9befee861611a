//! Core conversation state machine
//!
//! Pure draft transitions that emit effects; the runtime performs the I/O.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;
mod validation;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ConvContext, Draft, DraftStage, Submission};
pub use transition::{is_reset_command, transition, TransitionError};
