//! External collaborators the core drives but does not implement.
//!
//! Every call is best effort: callers log a `CapabilityError` and carry on.

use serde::{Deserialize, Serialize};

use crate::error::CapabilityError;

pub const SPEECH_RATE: f32 = 0.8;
pub const SPEECH_VOLUME: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language_code: &'static str,
    pub rate: f32,
    pub volume: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, language_code: &'static str) -> Self {
        Self {
            text: text.into(),
            language_code,
            rate: SPEECH_RATE,
            volume: SPEECH_VOLUME,
        }
    }
}

pub trait SpeechSynthesizer {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), CapabilityError>;
    /// Stops any utterance in progress.
    fn cancel(&mut self);
}

/// Recognition results arrive later as [`Transcript`]s posted to the controller.
pub trait SpeechRecognizer {
    fn start(&mut self, language_code: &'static str) -> Result<(), CapabilityError>;
    fn stop(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub is_final: bool,
}

impl Transcript {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn final_result(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Sine,
    Square,
}

/// Shared with timer callbacks, hence `Send + Sync`.
pub trait ToneEmitter: Send + Sync {
    fn play(
        &self,
        frequency_hz: f32,
        duration_sec: f32,
        waveform: Waveform,
    ) -> Result<(), CapabilityError>;
}
