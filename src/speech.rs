//! フィードバックの読み上げ
//!
//! 読み上げは別スレッドで行い、フレームループを止めない。

use anyhow::{bail, Context, Result};
use std::process::Command;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

use crate::config::SpeechConfig;

/// 読み上げバックエンド
pub trait Speaker: Send {
    fn speak(&mut self, text: &str) -> Result<()>;
}

/// 外部TTSコマンド（espeak / say など）を呼ぶ
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .status()
            .with_context(|| format!("Failed to run {}", self.program))?;
        if !status.success() {
            bail!("{} exited with {}", self.program, status);
        }
        Ok(())
    }
}

/// 読み上げ専用スレッド
///
/// 読み上げ中に溜まった文言は最新のものだけを読む。
pub struct SpeechWorker {
    sender: Option<Sender<String>>,
    handle: Option<JoinHandle<()>>,
}

impl SpeechWorker {
    pub fn start<S: Speaker + 'static>(speaker: S) -> Self {
        let (sender, receiver) = mpsc::channel::<String>();
        let handle = thread::spawn(move || run(speaker, receiver));

        Self {
            sender: Some(sender),
            handle: Some(handle),
        }
    }

    /// 読み上げを依頼する（ブロックしない）
    pub fn say(&self, text: &str) {
        if let Some(sender) = &self.sender {
            if sender.send(text.to_string()).is_err() {
                warn!("speech worker has stopped");
            }
        }
    }
}

impl Drop for SpeechWorker {
    fn drop(&mut self) {
        // 送信側を閉じるとワーカーのループが終わる
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run<S: Speaker>(mut speaker: S, receiver: Receiver<String>) {
    while let Ok(mut text) = receiver.recv() {
        while let Ok(newer) = receiver.try_recv() {
            debug!(skipped = %text, "coalescing stale phrase");
            text = newer;
        }
        if let Err(e) = speaker.speak(&text) {
            warn!("speech failed: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        spoken: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl Speaker for Recorder {
        fn speak(&mut self, text: &str) -> Result<()> {
            self.spoken.lock().unwrap().push(text.to_string());
            if self.fail {
                bail!("no audio device");
            }
            Ok(())
        }
    }

    #[test]
    fn test_worker_speaks_and_drains_on_drop() {
        let recorder = Recorder::default();
        let spoken = recorder.spoken.clone();
        {
            let worker = SpeechWorker::start(recorder);
            worker.say("CORRECT");
        }
        let spoken = spoken.lock().unwrap();
        // 溜まった文言は最新のみ読まれるが、最後の1つは必ず読まれる
        assert_eq!(spoken.last().map(String::as_str), Some("CORRECT"));
    }

    #[test]
    fn test_last_phrase_always_spoken() {
        let recorder = Recorder::default();
        let spoken = recorder.spoken.clone();
        {
            let worker = SpeechWorker::start(recorder);
            for text in ["Ready", "CORRECT", "INCORRECT", "Ready"] {
                worker.say(text);
            }
        }
        let spoken = spoken.lock().unwrap();
        assert!(!spoken.is_empty());
        assert!(spoken.len() <= 4);
        assert_eq!(spoken.last().map(String::as_str), Some("Ready"));
    }

    #[test]
    fn test_failures_do_not_stop_worker() {
        let recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let spoken = recorder.spoken.clone();
        {
            let worker = SpeechWorker::start(recorder);
            worker.say("UP");
            thread::sleep(std::time::Duration::from_millis(50));
            worker.say("DOWN");
        }
        assert_eq!(spoken.lock().unwrap().last().map(String::as_str), Some("DOWN"));
    }

    #[test]
    fn test_command_speaker_reports_missing_program() {
        let mut speaker = CommandSpeaker::new("definitely-not-a-tts-binary", vec![]);
        assert!(speaker.speak("hello").is_err());
    }
}
