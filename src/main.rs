//! ShadowCoach - Shadowing Pronunciation Practice
//!
//! Runs a practice session against a scripted recognizer and prints the
//! per-word assessment and the end-of-session report. Useful for demoing
//! the assessment pipeline without a microphone or a speech service.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use shadowcoach::config::Config;
use shadowcoach::recognizer::{AssessmentEngine, ScriptedEngine, SessionScript};
use shadowcoach::session::PracticeSession;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Session script (JSON) with reference sentences and recognizer results
    #[arg(short, long)]
    script: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🎧 ShadowCoach v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    let script = SessionScript::load(&args.script)
        .with_context(|| format!("Failed to load script {}", args.script.display()))?;

    let sentences: Vec<String> = script
        .sentences
        .iter()
        .map(|s| s.reference.clone())
        .collect();
    let sentence_refs: Vec<&str> = sentences.iter().map(|s| s.as_str()).collect();

    let mut engine = ScriptedEngine::new(script);
    let mut session = PracticeSession::new(&sentence_refs, config.scoring.clone())?;

    loop {
        let reference = session.start_recording()?.to_string();
        println!("\n📖 {}", reference);

        let mut events = engine.start(&reference).await?;
        while let Some(event) = events.recv().await {
            session.apply_event(event);
            if session.current_attempt().finalized {
                break;
            }
        }
        engine.stop().await?;
        session.stop_recording();

        print_attempt(&session);

        if session.can_advance() {
            session.advance()?;
        } else if session.is_last_sentence() {
            break;
        } else {
            warn!("Score criteria not met, ending practice early");
            break;
        }
    }

    print_report(&session);
    Ok(())
}

fn print_attempt(session: &PracticeSession) {
    let attempt = session.current_attempt();

    if let Some(error) = &attempt.error {
        println!("   ⚠️ {}", error);
        return;
    }

    let Some(transcript) = attempt.transcript(session.scoring_config()) else {
        println!("   (no result)");
        return;
    };

    let line: Vec<String> = transcript
        .words
        .iter()
        .map(|w| {
            if w.is_inserted {
                format!("+{}", w.display_text)
            } else {
                format!("{}({})", w.display_text, w.tier.class_name())
            }
        })
        .collect();
    println!("   {}", line.join(" "));
    println!(
        "   Completeness: {:.0}%  Gate: {}",
        transcript.completeness_percent,
        if attempt.passes_gate(session.scoring_config()) {
            "passed ✅"
        } else {
            "not passed ❌"
        }
    );
}

fn print_report(session: &PracticeSession) {
    let summary = session.report();

    println!("\n📊 Session Report ({})", chrono::Local::now().format("%Y-%m-%d %H:%M"));
    if summary.is_demo {
        println!("   (sample data - no assessed sentences yet)");
    }
    println!("   Sentences:     {}", summary.total_sentences);
    println!("   Pronunciation: {:.1}", summary.avg_pronunciation);
    println!("   Accuracy:      {:.1}", summary.avg_accuracy);
    println!("   Fluency:       {:.1}", summary.avg_fluency);
    println!("   Completeness:  {:.1}", summary.avg_completeness);
    println!("   Overall:       {:.1}", summary.overall_score());

    if summary.deserves_celebration(session.scoring_config()) {
        println!("   🎉 Great session!");
    }

    if !summary.word_issues.is_empty() {
        println!("   Words to practice:");
        for issue in &summary.word_issues {
            match issue.min_score {
                Some(score) => println!(
                    "     {} ({:.0}, x{})",
                    issue.word, score, issue.occurrences
                ),
                None => println!("     {} (unscored, x{})", issue.word, issue.occurrences),
            }
        }
    }
}
