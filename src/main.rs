use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;

use form_coach::config::Config;
use form_coach::exercise::ExerciseKind;
use form_coach::replay::{read_events, run};
use form_coach::session::Trainer;
use form_coach::speech::{CommandSpeaker, SpeechWorker};

const CONFIG_PATH: &str = "config.toml";

fn print_usage() {
    println!("Usage: form-coach <frames.jsonl> [exercise]");
    println!();
    println!("Exercises:");
    for kind in ExerciseKind::ALL {
        println!("  {:<15} [{}] {}", kind.name(), kind.key(), kind.title());
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    // Usage: form-coach <frames.jsonl> [exercise]
    let Some(path) = args.get(1) else {
        print_usage();
        return Ok(());
    };

    let (config, config_error) = Config::load_or_default(CONFIG_PATH);
    if let Some(log_path) = form_coach::logging::init(&config.log)? {
        eprintln!("Log: {}", log_path.display());
    }
    if let Some(e) = config_error {
        tracing::warn!("{:#}; using default config", e);
    }

    let exercise = match args.get(2) {
        Some(name) => name.parse::<ExerciseKind>()?,
        None => config.app.exercise,
    };

    let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
    let events = read_events(BufReader::new(file))?;
    tracing::info!(events = events.len(), path = %path, "replay loaded");

    let speech = config
        .speech
        .enabled
        .then(|| SpeechWorker::start(CommandSpeaker::from_config(&config.speech)));

    println!("=== Form Coach replay ===");
    println!("Exercise: {}", exercise.title());
    println!("Confidence threshold: {}", config.pose.confidence_threshold);
    println!();

    let mut trainer = Trainer::new(exercise, config.pose.confidence_threshold)?;
    let reports = run(&mut trainer, &events, speech.as_ref())?;

    for (i, report) in reports.iter().enumerate() {
        println!(
            "{:>5}  {:<15} {:>5} {:<8} {}{}",
            i + 1,
            report.exercise.title(),
            report.headline(),
            report.value(),
            if report.feedback.positive { "+ " } else { "- " },
            report.feedback.text,
        );
    }

    println!();
    println!("Session summary:");
    let summary = trainer.summary();
    if summary.is_empty() {
        println!("  (no reps)");
    }
    for (kind, reps) in summary {
        println!("  {:<15} {}", kind.title(), reps);
    }

    Ok(())
}
