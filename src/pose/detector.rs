use anyhow::{Context, Result};
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

use super::keypoint::{Keypoint, KeypointIndex, Pose};

const INPUT_NAME: &str = "serving_default_input_0";
const OUTPUT_NAME: &str = "StatefulPartitionedCall_0";

/// MoveNet (ONNX) によるランドマーク推定
///
/// 推定そのものは外部モデルに任せ、ここでは入出力の詰め替えだけを行う。
pub struct PoseDetector {
    session: Session,
    min_person_confidence: f32,
}

impl PoseDetector {
    pub fn new<P: AsRef<Path>>(model_path: P, min_person_confidence: f32) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())
            .with_context(|| format!("Failed to load ONNX model {}", model_path.as_ref().display()))?;

        Ok(Self {
            session,
            min_person_confidence,
        })
    }

    /// 前処理済みテンソル [1, 192, 192, 3] から推定する
    ///
    /// 平均信頼度が低すぎるフレームは人物なし (`None`)。
    pub fn detect(&mut self, input: Array4<f32>) -> Result<Option<Pose>> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![INPUT_NAME => input_tensor])
            .context("Inference failed")?;

        // 出力 [1, 1, 17, 3] の並びは (y, x, confidence)
        let output: ndarray::ArrayViewD<f32> = outputs[OUTPUT_NAME]
            .try_extract_array()
            .context("Failed to extract output tensor")?;

        let mut pose = Pose::default();
        for (i, slot) in pose.keypoints.iter_mut().enumerate().take(KeypointIndex::COUNT) {
            *slot = Keypoint::new(output[[0, 0, i, 1]], output[[0, 0, i, 0]], output[[0, 0, i, 2]]);
        }

        if pose.average_confidence() < self.min_person_confidence {
            return Ok(None);
        }
        Ok(Some(pose))
    }
}
