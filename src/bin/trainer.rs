use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use form_coach::camera::Webcam;
use form_coach::config::Config;
use form_coach::exercise::{lookup, ExerciseKind};
use form_coach::pose::{preprocess_for_movenet, PoseDetector};
use form_coach::render::{draw_status, Command, MinifbRenderer};
use form_coach::session::{FrameReport, Trainer};
use form_coach::speech::{CommandSpeaker, SpeechWorker};

const CONFIG_PATH: &str = "config.toml";

fn announce(speech: Option<&SpeechWorker>, report: &FrameReport) {
    if let (Some(worker), Some(text)) = (speech, report.announce) {
        worker.say(text);
    }
}

fn main() -> Result<()> {
    let (config, config_error) = Config::load_or_default(CONFIG_PATH);
    if let Some(path) = form_coach::logging::init(&config.log)? {
        eprintln!("Log: {}", path.display());
    }
    if let Some(e) = config_error {
        warn!("{:#}; using default config", e);
    }

    println!("Form Coach Trainer");
    println!("Exercise: {}", config.app.exercise.title());
    println!("Target FPS: {}", config.app.target_fps);
    println!("Speech: {}", if config.speech.enabled { "ON" } else { "OFF" });
    println!();
    println!("Keys:");
    for kind in ExerciseKind::ALL {
        println!("  [{}] {}", kind.key().to_ascii_uppercase(), kind.title());
    }
    println!("  [Q]/[Esc] quit");
    println!();

    let mut camera = Webcam::open(&config.camera, config.app.target_fps)?;
    let (width, height) = camera.resolution();

    let mut detector = PoseDetector::new(&config.pose.model_path, config.pose.min_person_confidence)?;
    info!(model = %config.pose.model_path, "model loaded");

    let mut renderer = MinifbRenderer::new("Form Coach", width as usize, height as usize)?;
    let speech = config
        .speech
        .enabled
        .then(|| SpeechWorker::start(CommandSpeaker::from_config(&config.speech)));

    let threshold = config.pose.confidence_threshold;
    let mut trainer = Trainer::new(config.app.exercise, threshold)?;
    announce(speech.as_ref(), &trainer.select(config.app.exercise)?);

    let frame_duration = Duration::from_secs_f64(1.0 / config.app.target_fps.max(1) as f64);
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();

    'main: while renderer.is_open() {
        let frame_start = Instant::now();

        for command in renderer.poll_commands() {
            match command {
                Command::Quit => break 'main,
                Command::Select(key) => {
                    if let Some(kind) = ExerciseKind::from_key(key) {
                        announce(speech.as_ref(), &trainer.select(kind)?);
                    }
                }
            }
        }

        let mut frame = match camera.read_frame() {
            Ok(f) => f,
            Err(e) => {
                warn!("frame capture error: {:#}", e);
                renderer.update()?;
                std::thread::sleep(frame_duration);
                continue;
            }
        };

        let input = preprocess_for_movenet(&frame)?;
        let pose = detector.detect(input)?;

        let report = trainer.process(pose.as_ref())?;
        announce(speech.as_ref(), &report);

        draw_status(&mut frame, &report)?;
        renderer.draw_frame(&frame)?;
        if let Some(pose) = &pose {
            let joints = lookup(trainer.exercise())?.joints;
            renderer.draw_pose(pose, joints, threshold);
        }
        renderer.update()?;

        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            info!(
                fps = format!("{:.1}", frame_count as f32 / elapsed),
                exercise = trainer.exercise().name(),
                reps = trainer.state().counter,
                "status"
            );
            frame_count = 0;
            fps_timer = Instant::now();
        }

        if let Some(rest) = frame_duration.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    println!();
    println!("Session summary:");
    for (kind, reps) in trainer.summary() {
        println!("  {:<15} {}", kind.title(), reps);
    }
    println!("Shutting down...");
    Ok(())
}
