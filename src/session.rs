//! Practice session state machine
//!
//! Tracks one attempt per sentence of a shadowing session and applies
//! recognizer events to the attempt currently being recorded. The engine
//! delivers events on the session's event loop, so attempt mutation is
//! single-threaded; the assessment core stays pure and is called here for
//! gating and rendering only.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::ScoringConfig;
use crate::core::aligner::{align, WordRender};
use crate::core::gate::passes_gate;
use crate::core::normalizer::reference_words;
use crate::core::report::{summarize, SessionSummary};
use crate::error::{ShadowError, ShadowResult};
use crate::recognizer::{RecognitionEvent, UtteranceAssessment};

/// One sentence's recording attempt.
///
/// Interim results overwrite `result` wholesale; the first terminal event
/// finalizes the attempt and later events are ignored until the user
/// re-records (which replaces the attempt with a fresh one).
#[derive(Debug, Clone)]
pub struct SentenceAttempt {
    pub reference_text: String,
    pub result: Option<UtteranceAssessment>,
    pub finalized: bool,
    pub is_assessing: bool,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

/// Render data for one sentence's transcript view
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceTranscript {
    pub words: Vec<WordRender>,
    pub completeness_percent: f64,
}

impl SentenceAttempt {
    pub fn new(reference_text: &str) -> Self {
        Self {
            reference_text: reference_text.to_string(),
            result: None,
            finalized: false,
            is_assessing: false,
            error: None,
            started_at: None,
        }
    }

    /// Apply one recognizer event. Events after finalization are dropped.
    pub fn apply_event(&mut self, event: RecognitionEvent) {
        if self.finalized {
            // A late event can race a user-initiated stop; the attempt's
            // result must not change once terminal
            if !matches!(event, RecognitionEvent::SessionStopped) {
                debug!(
                    "Ignoring recognizer event for finalized attempt '{}'",
                    self.reference_text
                );
            }
            self.is_assessing = false;
            return;
        }

        match event {
            RecognitionEvent::Recognizing(result) => {
                // Last write wins; interim results are never merged
                self.result = Some(result);
            }
            RecognitionEvent::Recognized(result) => {
                info!("Final result for '{}'", self.reference_text);
                self.result = Some(result);
                self.finalized = true;
                self.is_assessing = false;
            }
            RecognitionEvent::NoMatch => {
                warn!("No speech detected for '{}'", self.reference_text);
                self.error = Some("No speech was detected. Please try again.".to_string());
                self.finalized = true;
                self.is_assessing = false;
            }
            RecognitionEvent::Canceled { reason } => {
                warn!("Recognition canceled for '{}': {}", self.reference_text, reason);
                self.error = Some(format!("Assessment was canceled: {}", reason));
                self.finalized = true;
                self.is_assessing = false;
            }
            RecognitionEvent::SessionStopped => {
                self.is_assessing = false;
            }
        }
    }

    /// Whether this attempt unlocks the next sentence
    pub fn passes_gate(&self, config: &ScoringConfig) -> bool {
        passes_gate(&self.reference_text, self.result.as_ref(), config)
    }

    /// Word-by-word render data, once a result exists
    pub fn transcript(&self, config: &ScoringConfig) -> Option<SentenceTranscript> {
        let result = self.result.as_ref()?;
        let reference = reference_words(&self.reference_text);
        let alignment = align(&reference, &result.words);
        Some(SentenceTranscript {
            completeness_percent: alignment.completeness_percent(),
            words: alignment.render(config),
        })
    }
}

/// A whole shadowing session: ordered sentences, a cursor, and the
/// gate-driven navigation rules
pub struct PracticeSession {
    attempts: Vec<SentenceAttempt>,
    current: usize,
    config: ScoringConfig,
}

impl PracticeSession {
    pub fn new(sentences: &[&str], config: ScoringConfig) -> ShadowResult<Self> {
        if sentences.is_empty() {
            return Err(ShadowError::Session(
                "A practice session needs at least one sentence".to_string(),
            ));
        }
        Ok(Self {
            attempts: sentences.iter().map(|s| SentenceAttempt::new(s)).collect(),
            current: 0,
            config,
        })
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn sentence_count(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_last_sentence(&self) -> bool {
        self.current + 1 == self.attempts.len()
    }

    pub fn current_attempt(&self) -> &SentenceAttempt {
        &self.attempts[self.current]
    }

    pub fn attempts(&self) -> &[SentenceAttempt] {
        &self.attempts
    }

    /// Begin recording the current sentence. Only one attempt may be
    /// recording at a time; re-recording discards the previous attempt.
    pub fn start_recording(&mut self) -> ShadowResult<&str> {
        if self.attempts.iter().any(|a| a.is_assessing) {
            return Err(ShadowError::Recording(
                "Another recording is already in progress".to_string(),
            ));
        }

        let mut attempt = SentenceAttempt::new(&self.attempts[self.current].reference_text);
        attempt.is_assessing = true;
        attempt.started_at = Some(Utc::now());
        self.attempts[self.current] = attempt;

        info!(
            "Recording sentence {}/{}",
            self.current + 1,
            self.attempts.len()
        );
        Ok(&self.attempts[self.current].reference_text)
    }

    /// Stop the current recording. Idempotent: always leaves the attempt
    /// non-assessing, even when a terminal event already arrived.
    pub fn stop_recording(&mut self) {
        let attempt = &mut self.attempts[self.current];
        if attempt.is_assessing {
            debug!("Stopping recording for '{}'", attempt.reference_text);
        }
        attempt.is_assessing = false;
    }

    /// Route a recognizer event to the attempt being recorded
    pub fn apply_event(&mut self, event: RecognitionEvent) {
        self.attempts[self.current].apply_event(event);
    }

    /// Whether the "next sentence" control is enabled
    pub fn can_advance(&self) -> bool {
        !self.is_last_sentence() && self.current_attempt().passes_gate(&self.config)
    }

    pub fn advance(&mut self) -> ShadowResult<()> {
        if !self.can_advance() {
            return Err(ShadowError::Session(
                "Current sentence has not passed the score criteria".to_string(),
            ));
        }
        self.current += 1;
        Ok(())
    }

    /// Going back is never gated
    pub fn go_back(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Aggregate the session for the report step
    pub fn report(&self) -> SessionSummary {
        summarize(&self.attempts, &self.config)
    }

    pub fn scoring_config(&self) -> &ScoringConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::{RecognizedWord, WordErrorType};

    fn assessment(words: &[(&str, f64)]) -> UtteranceAssessment {
        UtteranceAssessment {
            text: words.iter().map(|(w, _)| *w).collect::<Vec<_>>().join(" "),
            words: words
                .iter()
                .map(|(w, s)| RecognizedWord::new(w, Some(*s), WordErrorType::None))
                .collect(),
            pronunciation_score: 85.0,
            accuracy_score: 85.0,
            fluency_score: 85.0,
            completeness_score: 100.0,
        }
    }

    #[test]
    fn test_interim_results_are_last_write_wins() {
        let mut attempt = SentenceAttempt::new("hello world");
        attempt.is_assessing = true;

        attempt.apply_event(RecognitionEvent::Recognizing(assessment(&[("hello", 80.0)])));
        attempt.apply_event(RecognitionEvent::Recognizing(assessment(&[
            ("hello", 82.0),
            ("world", 88.0),
        ])));

        let result = attempt.result.as_ref().expect("result");
        assert_eq!(result.words.len(), 2);
        assert!(!attempt.finalized);
    }

    #[test]
    fn test_recognized_finalizes_attempt() {
        let mut attempt = SentenceAttempt::new("hello");
        attempt.is_assessing = true;

        attempt.apply_event(RecognitionEvent::Recognized(assessment(&[("hello", 90.0)])));
        assert!(attempt.finalized);
        assert!(!attempt.is_assessing);
    }

    #[test]
    fn test_events_after_finalization_are_ignored() {
        let mut attempt = SentenceAttempt::new("hello");
        attempt.apply_event(RecognitionEvent::Recognized(assessment(&[("hello", 90.0)])));

        let before = attempt.result.clone();
        attempt.apply_event(RecognitionEvent::Recognizing(assessment(&[("bye", 10.0)])));
        attempt.apply_event(RecognitionEvent::Recognized(assessment(&[("bye", 10.0)])));
        assert_eq!(attempt.result, before);
    }

    #[test]
    fn test_no_match_sets_error_and_finalizes() {
        let mut attempt = SentenceAttempt::new("hello");
        attempt.is_assessing = true;
        attempt.apply_event(RecognitionEvent::NoMatch);

        assert!(attempt.finalized);
        assert!(!attempt.is_assessing);
        assert!(attempt.error.is_some());
        assert!(!attempt.passes_gate(&ScoringConfig::default()));
    }

    #[test]
    fn test_canceled_sets_error_and_finalizes() {
        let mut attempt = SentenceAttempt::new("hello");
        attempt.is_assessing = true;
        attempt.apply_event(RecognitionEvent::Canceled {
            reason: "connection lost".to_string(),
        });

        assert!(attempt.finalized);
        assert!(attempt.error.as_deref().unwrap_or("").contains("connection lost"));
    }

    #[test]
    fn test_transcript_requires_result() {
        let config = ScoringConfig::default();
        let mut attempt = SentenceAttempt::new("hello world");
        assert!(attempt.transcript(&config).is_none());

        attempt.apply_event(RecognitionEvent::Recognized(assessment(&[
            ("hello", 90.0),
            ("world", 85.0),
        ])));
        let transcript = attempt.transcript(&config).expect("transcript");
        assert_eq!(transcript.words.len(), 2);
        assert_eq!(transcript.completeness_percent, 100.0);
    }

    #[test]
    fn test_session_requires_sentences() {
        assert!(PracticeSession::new(&[], ScoringConfig::default()).is_err());
    }

    #[test]
    fn test_one_recording_at_a_time() {
        let mut session =
            PracticeSession::new(&["one", "two"], ScoringConfig::default()).expect("session");

        session.start_recording().expect("first recording");
        assert!(session.start_recording().is_err());

        session.stop_recording();
        session.start_recording().expect("after stop");
    }

    #[test]
    fn test_stop_recording_is_idempotent_under_race() {
        let mut session =
            PracticeSession::new(&["hello"], ScoringConfig::default()).expect("session");
        session.start_recording().expect("recording");

        // Terminal event lands before the user's stop
        session.apply_event(RecognitionEvent::Recognized(assessment(&[("hello", 95.0)])));
        session.stop_recording();
        session.stop_recording();

        assert!(!session.current_attempt().is_assessing);
        assert!(session.current_attempt().finalized);
    }

    #[test]
    fn test_re_recording_discards_previous_attempt() {
        let mut session =
            PracticeSession::new(&["hello"], ScoringConfig::default()).expect("session");

        session.start_recording().expect("recording");
        session.apply_event(RecognitionEvent::Recognized(assessment(&[("hello", 95.0)])));
        assert!(session.current_attempt().result.is_some());

        session.start_recording().expect("re-recording");
        assert!(session.current_attempt().result.is_none());
        assert!(!session.current_attempt().finalized);
        assert!(session.current_attempt().is_assessing);
    }

    #[test]
    fn test_advance_is_gated() {
        let mut session =
            PracticeSession::new(&["hello", "world"], ScoringConfig::default()).expect("session");

        assert!(!session.can_advance());
        assert!(session.advance().is_err());

        session.start_recording().expect("recording");
        session.apply_event(RecognitionEvent::Recognized(assessment(&[("hello", 90.0)])));
        assert!(session.can_advance());
        session.advance().expect("advance");
        assert_eq!(session.current_index(), 1);

        // Last sentence: nothing further to advance to
        assert!(session.is_last_sentence());
        assert!(!session.can_advance());
    }

    #[test]
    fn test_go_back_is_never_gated() {
        let mut session =
            PracticeSession::new(&["a", "b"], ScoringConfig::default()).expect("session");
        session.go_back();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_failed_gate_blocks_advance() {
        let mut session =
            PracticeSession::new(&["hello world", "next"], ScoringConfig::default())
                .expect("session");

        session.start_recording().expect("recording");
        // "world" was never spoken
        session.apply_event(RecognitionEvent::Recognized(assessment(&[("hello", 90.0)])));
        assert!(!session.can_advance());
    }

    #[test]
    fn test_report_with_no_results_is_demo() {
        let session = PracticeSession::new(&["a"], ScoringConfig::default()).expect("session");
        assert!(session.report().is_demo);
    }
}
