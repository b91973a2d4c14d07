//! Scripted assessment engine
//!
//! Replays pre-assessed recognition results from a script instead of
//! listening to a microphone. Used by the demo runner and by tests that
//! need deterministic recognizer behavior.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{AssessmentEngine, RecognitionEvent, UtteranceAssessment};

/// Terminal event a scripted sentence ends with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptedOutcome {
    Recognized { result: UtteranceAssessment },
    NoMatch,
    Canceled { reason: String },
}

/// Scripted recognizer behavior for one reference sentence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceScript {
    pub reference: String,
    /// Interim results delivered before the terminal event
    #[serde(default)]
    pub interim: Vec<UtteranceAssessment>,
    pub outcome: ScriptedOutcome,
}

/// A whole practice session's worth of scripted sentences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionScript {
    pub sentences: Vec<SentenceScript>,
}

impl SessionScript {
    /// Load a session script from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let script = serde_json::from_str(&content)?;
        Ok(script)
    }
}

/// Engine that replays a [`SessionScript`]
pub struct ScriptedEngine {
    /// Scripts keyed by reference text
    scripts: HashMap<String, SentenceScript>,
    replay: Option<JoinHandle<()>>,
}

impl ScriptedEngine {
    pub fn new(script: SessionScript) -> Self {
        let scripts = script
            .sentences
            .into_iter()
            .map(|s| (s.reference.clone(), s))
            .collect();
        Self {
            scripts,
            replay: None,
        }
    }

    /// An engine with no scripted sentences; every attempt ends in NoMatch
    pub fn empty() -> Self {
        Self {
            scripts: HashMap::new(),
            replay: None,
        }
    }
}

#[async_trait::async_trait]
impl AssessmentEngine for ScriptedEngine {
    async fn start(&mut self, reference_text: &str) -> Result<mpsc::Receiver<RecognitionEvent>> {
        // A start while a replay is in flight supersedes it
        if let Some(handle) = self.replay.take() {
            handle.abort();
        }

        let (tx, rx) = mpsc::channel(16);
        let script = self.scripts.get(reference_text).cloned();

        let reference = reference_text.to_string();
        self.replay = Some(tokio::spawn(async move {
            match script {
                Some(script) => {
                    for partial in &script.interim {
                        debug!("Scripted interim for '{}'", reference);
                        if tx
                            .send(RecognitionEvent::Recognizing(partial.clone()))
                            .await
                            .is_err()
                        {
                            return;
                        }
                    }

                    let terminal = match script.outcome {
                        ScriptedOutcome::Recognized { result } => {
                            RecognitionEvent::Recognized(result)
                        }
                        ScriptedOutcome::NoMatch => RecognitionEvent::NoMatch,
                        ScriptedOutcome::Canceled { reason } => {
                            RecognitionEvent::Canceled { reason }
                        }
                    };
                    if tx.send(terminal).await.is_err() {
                        return;
                    }
                }
                None => {
                    warn!("No script for reference '{}', reporting no match", reference);
                    if tx.send(RecognitionEvent::NoMatch).await.is_err() {
                        return;
                    }
                }
            }

            let _ = tx.send(RecognitionEvent::SessionStopped).await;
        }));

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        // Idempotent: aborting a finished or absent replay is a no-op
        if let Some(handle) = self.replay.take() {
            handle.abort();
            debug!("Scripted replay stopped");
        }
        Ok(())
    }
}
