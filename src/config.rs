use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::exercise::ExerciseKind;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub pose: PoseConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// 起動時の種目
    #[serde(default = "default_exercise")]
    pub exercise: ExerciseKind,
    /// メインループの目標FPS
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    #[serde(default)]
    pub index: i32,
    #[serde(default = "default_camera_width")]
    pub width: u32,
    #[serde(default = "default_camera_height")]
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PoseConfig {
    /// MoveNet ONNXモデルのパス
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// これ未満の信頼度のキーポイントは欠損扱い
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    /// 平均信頼度がこれ未満なら人物なし
    #[serde(default = "default_min_person_confidence")]
    pub min_person_confidence: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpeechConfig {
    #[serde(default)]
    pub enabled: bool,
    /// TTSコマンド。文言は最後の引数として渡す
    #[serde(default = "default_speech_command")]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// tracing の EnvFilter 書式 (RUST_LOG が優先)
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// ログファイルの出力先。未指定ならstderrのみ
    #[serde(default)]
    pub dir: Option<String>,
}

fn default_exercise() -> ExerciseKind { ExerciseKind::Squat }
fn default_target_fps() -> u32 { 30 }
fn default_camera_width() -> u32 { 640 }
fn default_camera_height() -> u32 { 480 }
fn default_model_path() -> String { "models/movenet_lightning.onnx".to_string() }
fn default_confidence_threshold() -> f32 { 0.3 }
fn default_min_person_confidence() -> f32 { 0.2 }
fn default_speech_command() -> String { "espeak".to_string() }
fn default_log_filter() -> String { "info".to_string() }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exercise: default_exercise(),
            target_fps: default_target_fps(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: default_camera_width(),
            height: default_camera_height(),
        }
    }
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            confidence_threshold: default_confidence_threshold(),
            min_person_confidence: default_min_person_confidence(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: default_speech_command(),
            args: Vec::new(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            dir: None,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// 読めなければデフォルト設定
    ///
    /// ファイルが無いのは正常扱い。壊れている場合はデフォルトと一緒にエラーを返すので、
    /// ログ初期化後に呼び出し側で報告する
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, Option<anyhow::Error>) {
        let path = path.as_ref();
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
}
