//! Shared builders for integration tests

use shadowcoach::recognizer::{
    RecognizedWord, ScriptedEngine, ScriptedOutcome, SentenceScript, SessionScript,
    UtteranceAssessment, WordErrorType,
};

/// Build a recognized word with a score and no error tag
pub fn word(text: &str, score: f64) -> RecognizedWord {
    RecognizedWord::new(text, Some(score), WordErrorType::None)
}

/// Build a recognized word with an explicit error tag
pub fn tagged(text: &str, score: Option<f64>, error: WordErrorType) -> RecognizedWord {
    RecognizedWord::new(text, score, error)
}

/// Build an utterance result around a word list with uniform sentence scores
pub fn assessment(words: Vec<RecognizedWord>, sentence_score: f64) -> UtteranceAssessment {
    UtteranceAssessment {
        text: words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        words,
        pronunciation_score: sentence_score,
        accuracy_score: sentence_score,
        fluency_score: sentence_score,
        completeness_score: 100.0,
    }
}

/// A scripted sentence that finalizes with the given result
pub fn recognized_sentence(reference: &str, result: UtteranceAssessment) -> SentenceScript {
    SentenceScript {
        reference: reference.to_string(),
        interim: Vec::new(),
        outcome: ScriptedOutcome::Recognized { result },
    }
}

/// An engine replaying the given sentence scripts
pub fn engine_for(sentences: Vec<SentenceScript>) -> ScriptedEngine {
    ScriptedEngine::new(SessionScript { sentences })
}
