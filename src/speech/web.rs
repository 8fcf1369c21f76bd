use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance};

use crate::speech::engine::{SpeechEngine, Utterance};

/// Speech engine backed by the browser's `speechSynthesis` object.
pub struct BrowserSpeechEngine {
    synth: SpeechSynthesis,
}

impl BrowserSpeechEngine {
    /// `None` when the page has no window or the browser lacks speech
    /// synthesis.
    pub fn new() -> Option<Self> {
        let synth = web_sys::window()?.speech_synthesis().ok()?;
        Some(Self { synth })
    }
}

impl SpeechEngine for BrowserSpeechEngine {
    fn speak(&self, utterance: &Utterance) {
        match SpeechSynthesisUtterance::new_with_text(&utterance.text) {
            Ok(u) => {
                u.set_rate(utterance.rate);
                u.set_pitch(utterance.pitch);
                u.set_lang(&utterance.lang);
                self.synth.speak(&u);
            }
            Err(e) => tracing::warn!("Failed to create utterance: {e:?}"),
        }
    }

    fn pause(&self) {
        self.synth.pause();
    }

    fn resume(&self) {
        self.synth.resume();
    }

    fn cancel(&self) {
        self.synth.cancel();
    }
}
