use serde::Serialize;

/// One piece of text queued on a speech engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Utterance {
    pub text: String,
    /// Speaking rate, 0.1 to 10.
    pub rate: f32,
    /// Pitch, 0 to 2.
    pub pitch: f32,
    /// BCP 47 language tag.
    pub lang: String,
}

/// A platform speech synthesizer.
///
/// Engines keep a single global queue: `pause` and `resume` apply to
/// whatever is being spoken, `cancel` drops everything queued.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechEngine {
    fn speak(&self, utterance: &Utterance);

    fn pause(&self);

    fn resume(&self);

    fn cancel(&self);
}
