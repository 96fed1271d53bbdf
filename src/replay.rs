//! 記録済みランドマークの再生
//!
//! JSON Lines 形式。1行1イベント:
//!
//! ```text
//! {"type":"select","exercise":"squat"}
//! {"type":"frame","keypoints":[[x, y, confidence], ...]}   // 17点
//! {"type":"no_detection"}
//! ```
//!
//! 3Dモデルで記録した場合は `[x, y, confidence, z]` も受け付ける。
//! 空行と `#` で始まる行は読み飛ばす。

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::io::BufRead;

use crate::exercise::ExerciseKind;
use crate::pose::{Keypoint, KeypointIndex, Pose};
use crate::session::{FrameReport, Trainer};
use crate::speech::SpeechWorker;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    Select { exercise: ExerciseKind },
    Frame { keypoints: Vec<RecordedKeypoint> },
    NoDetection,
}

/// 記録された1キーポイント。z は省略可
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecordedKeypoint {
    Planar([f32; 3]),
    Spatial([f32; 4]),
}

impl RecordedKeypoint {
    fn to_keypoint(self) -> Keypoint {
        match self {
            Self::Planar([x, y, confidence]) => Keypoint::new(x, y, confidence),
            Self::Spatial([x, y, confidence, z]) => Keypoint::new(x, y, confidence).with_z(z),
        }
    }
}

impl ReplayEvent {
    /// 1行をパースする
    pub fn parse(line: &str) -> Result<Self> {
        let event: ReplayEvent = serde_json::from_str(line)?;
        if let ReplayEvent::Frame { keypoints } = &event {
            if keypoints.len() != KeypointIndex::COUNT {
                bail!(
                    "expected {} keypoints, got {}",
                    KeypointIndex::COUNT,
                    keypoints.len()
                );
            }
        }
        Ok(event)
    }
}

/// キーポイント列から Pose を組み立てる（長さは `parse` で検証済み）
fn to_pose(keypoints: &[RecordedKeypoint]) -> Pose {
    let mut pose = Pose::default();
    for (slot, recorded) in pose.keypoints.iter_mut().zip(keypoints) {
        *slot = recorded.to_keypoint();
    }
    pose
}

/// 全行を読み込む。エラーには行番号を付ける
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<ReplayEvent>> {
    let mut events = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event = ReplayEvent::parse(trimmed).with_context(|| format!("Invalid event on line {}", line_no))?;
        events.push(event);
    }
    Ok(events)
}

/// イベントを順にセッションへ流し、各イベントの結果を返す
pub fn run(trainer: &mut Trainer, events: &[ReplayEvent], speech: Option<&SpeechWorker>) -> Result<Vec<FrameReport>> {
    let mut reports = Vec::with_capacity(events.len());
    for event in events {
        let report = match event {
            ReplayEvent::Select { exercise } => trainer.select(*exercise)?,
            ReplayEvent::Frame { keypoints } => {
                let pose = to_pose(keypoints);
                trainer.process(Some(&pose))?
            }
            ReplayEvent::NoDetection => trainer.process(None)?,
        };
        if let (Some(worker), Some(text)) = (speech, report.announce) {
            worker.say(text);
        }
        reports.push(report);
    }
    Ok(reports)
}
