use std::sync::{Arc, Mutex, MutexGuard};

use crate::speech::engine::{SpeechEngine, Utterance};

pub const MIN_RATE: f32 = 0.1;
pub const MAX_RATE: f32 = 10.0;
pub const DEFAULT_RATE: f32 = 1.0;
pub const DEFAULT_PITCH: f32 = 1.0;
pub const DEFAULT_LANG: &str = "ko-KR";

/// Clamp a requested speaking rate into the range engines accept. Anything
/// that is not a finite number falls back to the default rate.
pub fn clamp_rate(rate: f32) -> f32 {
    if rate.is_finite() {
        rate.clamp(MIN_RATE, MAX_RATE)
    } else {
        DEFAULT_RATE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Speaking,
    Paused,
}

struct PlayerState {
    playback: PlaybackState,
    rate: f32,
    lang: String,
}

struct Inner<E> {
    engine: E,
    state: Mutex<PlayerState>,
}

/// Handle to the single speech engine of the process.
///
/// Clones share the engine and the play state, so every view that reads
/// text aloud goes through the same owner of play / pause / stop.
pub struct SpeechPlayer<E> {
    inner: Arc<Inner<E>>,
}

impl<E> Clone for SpeechPlayer<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: SpeechEngine> SpeechPlayer<E> {
    pub fn new(engine: E) -> Self {
        Self {
            inner: Arc::new(Inner {
                engine,
                state: Mutex::new(PlayerState {
                    playback: PlaybackState::Idle,
                    rate: DEFAULT_RATE,
                    lang: DEFAULT_LANG.to_string(),
                }),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, PlayerState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn playback(&self) -> PlaybackState {
        self.state().playback
    }

    pub fn rate(&self) -> f32 {
        self.state().rate
    }

    /// Set the rate used for utterances queued from now on.
    pub fn set_rate(&self, rate: f32) {
        self.state().rate = clamp_rate(rate);
    }

    pub fn set_lang(&self, lang: impl Into<String>) {
        self.state().lang = lang.into();
    }

    /// Queue one utterance per non-blank fragment and return how many were
    /// queued. Calling this while already speaking appends to the engine's
    /// queue.
    pub fn play<S: AsRef<str>>(&self, fragments: &[S]) -> usize {
        let mut state = self.state();
        let mut queued = 0;

        for fragment in fragments {
            let text = fragment.as_ref().trim();
            if text.is_empty() {
                continue;
            }
            self.inner.engine.speak(&Utterance {
                text: text.to_string(),
                rate: state.rate,
                pitch: DEFAULT_PITCH,
                lang: state.lang.clone(),
            });
            queued += 1;
        }

        if queued > 0 {
            state.playback = PlaybackState::Speaking;
        }
        queued
    }

    pub fn pause(&self) {
        let mut state = self.state();
        if state.playback == PlaybackState::Speaking {
            self.inner.engine.pause();
            state.playback = PlaybackState::Paused;
        }
    }

    pub fn resume(&self) {
        let mut state = self.state();
        if state.playback == PlaybackState::Paused {
            self.inner.engine.resume();
            state.playback = PlaybackState::Speaking;
        }
    }

    /// Drop everything queued or in flight.
    pub fn stop(&self) {
        let mut state = self.state();
        self.inner.engine.cancel();
        state.playback = PlaybackState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::engine::MockSpeechEngine;
    use mockall::predicate::*;
    use mockall::Sequence;

    #[test]
    fn test_clamp_rate() {
        assert_eq!(clamp_rate(0.0), MIN_RATE);
        assert_eq!(clamp_rate(25.0), MAX_RATE);
        assert_eq!(clamp_rate(1.5), 1.5);
        assert_eq!(clamp_rate(f32::NAN), DEFAULT_RATE);
    }

    #[test]
    fn test_play_queues_each_fragment_in_order() {
        let mut engine = MockSpeechEngine::new();
        let mut seq = Sequence::new();
        engine
            .expect_speak()
            .withf(|u| u.text == "Tofu Kimchi Stew" && u.lang == "ko-KR" && u.rate == 1.0)
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        engine
            .expect_speak()
            .withf(|u| u.text == "Slice the tofu.")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let player = SpeechPlayer::new(engine);
        let queued = player.play(&["Tofu Kimchi Stew", "  ", "Slice the tofu."]);

        assert_eq!(queued, 2);
        assert_eq!(player.playback(), PlaybackState::Speaking);
    }

    #[test]
    fn test_play_nothing_stays_idle() {
        let mut engine = MockSpeechEngine::new();
        engine.expect_speak().never();

        let player = SpeechPlayer::new(engine);
        assert_eq!(player.play::<&str>(&[]), 0);
        assert_eq!(player.playback(), PlaybackState::Idle);
    }

    #[test]
    fn test_rate_applies_to_new_utterances() {
        let mut engine = MockSpeechEngine::new();
        engine
            .expect_speak()
            .withf(|u| u.rate == MAX_RATE)
            .times(1)
            .return_const(());

        let player = SpeechPlayer::new(engine);
        player.set_rate(40.0);
        player.play(&["fast"]);
    }

    #[test]
    fn test_pause_resume_only_from_matching_state() {
        let mut engine = MockSpeechEngine::new();
        engine.expect_speak().return_const(());
        engine.expect_pause().times(1).return_const(());
        engine.expect_resume().times(1).return_const(());

        let player = SpeechPlayer::new(engine);

        // Nothing playing yet: both are no-ops.
        player.resume();
        player.pause();
        assert_eq!(player.playback(), PlaybackState::Idle);

        player.play(&["hello"]);
        player.pause();
        player.pause();
        assert_eq!(player.playback(), PlaybackState::Paused);

        player.resume();
        player.resume();
        assert_eq!(player.playback(), PlaybackState::Speaking);
    }

    #[test]
    fn test_stop_cancels_and_resets() {
        let mut engine = MockSpeechEngine::new();
        engine.expect_speak().return_const(());
        engine.expect_pause().return_const(());
        engine.expect_cancel().times(1).return_const(());

        let player = SpeechPlayer::new(engine);
        player.play(&["one", "two"]);
        player.pause();
        player.stop();

        assert_eq!(player.playback(), PlaybackState::Idle);
    }

    #[test]
    fn test_clones_share_state() {
        let mut engine = MockSpeechEngine::new();
        engine.expect_speak().return_const(());
        engine.expect_cancel().times(1).return_const(());

        let player = SpeechPlayer::new(engine);
        let other = player.clone();
        player.play(&["shared"]);
        assert_eq!(other.playback(), PlaybackState::Speaking);

        other.stop();
        assert_eq!(player.playback(), PlaybackState::Idle);
    }

    #[test]
    fn test_language_override() {
        let mut engine = MockSpeechEngine::new();
        engine
            .expect_speak()
            .with(function(|u: &Utterance| u.lang == "en-US"))
            .times(1)
            .return_const(());

        let player = SpeechPlayer::new(engine);
        player.set_lang("en-US");
        player.play(&["hello"]);
    }
}
