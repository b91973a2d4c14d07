//! Recognizer Module
//!
//! Boundary to the external pronunciation-assessment engine. The engine
//! performs continuous recognition against a reference sentence and delivers
//! word-level assessment events; everything downstream of those events is
//! handled by the pure core in `crate::core`.

pub mod scripted;

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

// Re-export main types
pub use scripted::{ScriptedEngine, ScriptedOutcome, SentenceScript, SessionScript};

/// Audio format the engine expects: 16kHz 16-bit mono PCM
pub const SAMPLE_RATE: u32 = 16_000;

/// Error tag the recognizer attaches to each word.
///
/// Unknown tags from the engine fold to `None` rather than failing
/// deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WordErrorType {
    #[default]
    None,
    Omission,
    Insertion,
    UnexpectedBreak,
    MissingBreak,
}

impl WordErrorType {
    /// Parse the engine's string tag; absent or unrecognized tags mean `None`
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("Omission") => Self::Omission,
            Some("Insertion") => Self::Insertion,
            Some("UnexpectedBreak") => Self::UnexpectedBreak,
            Some("MissingBreak") => Self::MissingBreak,
            _ => Self::None,
        }
    }
}

/// One word of the recognizer's per-utterance result, in temporal order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedWord {
    pub text: String,
    /// Absent means the engine did not score this word
    #[serde(default)]
    pub accuracy_score: Option<f64>,
    #[serde(default)]
    pub error_type: WordErrorType,
}

impl RecognizedWord {
    pub fn new(text: &str, accuracy_score: Option<f64>, error_type: WordErrorType) -> Self {
        Self {
            text: text.to_string(),
            accuracy_score,
            error_type,
        }
    }
}

/// A full assessment result for one utterance, replaced wholesale on each
/// recognizer event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtteranceAssessment {
    pub text: String,
    pub words: Vec<RecognizedWord>,
    pub pronunciation_score: f64,
    pub accuracy_score: f64,
    pub fluency_score: f64,
    pub completeness_score: f64,
}

/// Events the engine delivers during continuous recognition.
///
/// Zero or more `Recognizing` updates precede exactly one terminal event
/// (`Recognized`, `NoMatch` or `Canceled`) per attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    /// Interim (partial) result; overwrites any previous working result
    Recognizing(UtteranceAssessment),
    /// Final result for the attempt
    Recognized(UtteranceAssessment),
    /// The engine detected no speech
    NoMatch,
    /// Recognition was aborted by the engine
    Canceled { reason: String },
    /// Continuous recognition shut down
    SessionStopped,
}

/// Trait for pronunciation-assessment engines
#[async_trait]
pub trait AssessmentEngine: Send + Sync {
    /// Begin continuous assessment against a reference sentence.
    /// Events arrive on the returned channel until a terminal event.
    async fn start(&mut self, reference_text: &str) -> Result<mpsc::Receiver<RecognitionEvent>>;

    /// Feed captured audio to the engine (16kHz 16-bit mono PCM).
    /// Engines that replay pre-assessed results ignore this.
    fn push_audio(&mut self, _samples: &[i16]) -> Result<()> {
        Ok(())
    }

    /// Stop continuous recognition. Idempotent: safe to call when already
    /// stopped or when a terminal event has already been delivered.
    async fn stop(&mut self) -> Result<()>;
}

/// Factory to create the configured assessment engine
pub fn create_engine(config: &Config) -> Result<Box<dyn AssessmentEngine>> {
    match config.recognizer_engine.as_str() {
        "scripted" => Ok(Box::new(ScriptedEngine::empty())),
        other => Err(anyhow::anyhow!("Unknown recognizer engine: {}", other)),
    }
}
