//! Read-aloud support.
//!
//! The server builds [`script::Narration`] scripts; a client plays them
//! through a [`player::SpeechPlayer`] wrapping whatever speech engine the
//! platform offers.

pub mod engine;
pub mod player;
pub mod script;
#[cfg(feature = "hydrate")]
pub mod web;

pub use engine::{SpeechEngine, Utterance};
pub use player::{PlaybackState, SpeechPlayer};
pub use script::Narration;
