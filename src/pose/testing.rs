//! テスト用の姿勢ビルダー

use super::{Keypoint, KeypointIndex, Pose};
use crate::geometry::Point;

/// 全キーポイントが欠損した状態から必要な関節だけを置いていく
pub struct PoseBuilder {
    keypoints: [Keypoint; KeypointIndex::COUNT],
}

impl PoseBuilder {
    pub fn new() -> Self {
        Self {
            keypoints: [Keypoint::default(); KeypointIndex::COUNT],
        }
    }

    pub fn at(mut self, index: KeypointIndex, point: Point) -> Self {
        self.keypoints[index as usize] = Keypoint::new(point.0, point.1, 0.9);
        self
    }

    /// `vertex` の角度が `degrees` になるよう `placed` を置く
    ///
    /// `anchor` と `vertex` は配置済みであること。
    pub fn bend(self, anchor: KeypointIndex, vertex: KeypointIndex, placed: KeypointIndex, degrees: f32) -> Self {
        let a = self.keypoints[anchor as usize].point();
        let b = self.keypoints[vertex as usize].point();
        let point = rotate_from(a, b, degrees, 0.2);
        self.at(placed, point)
    }

    pub fn build(self) -> Pose {
        Pose::new(self.keypoints)
    }
}

fn rotate_from(a: Point, b: Point, degrees: f32, length: f32) -> Point {
    let (dx, dy) = (a.0 - b.0, a.1 - b.1);
    let norm = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = (dx / norm, dy / norm);
    let (sin, cos) = degrees.to_radians().sin_cos();
    (
        b.0 + length * (ux * cos - uy * sin),
        b.1 + length * (ux * sin + uy * cos),
    )
}

/// 左脚: 肩-腰-膝が一直線に立ち、膝角度だけを指定
pub fn left_leg(knee_deg: f32) -> PoseBuilder {
    use KeypointIndex::*;
    PoseBuilder::new()
        .at(LeftShoulder, (0.5, 0.1))
        .at(LeftHip, (0.5, 0.3))
        .at(LeftKnee, (0.5, 0.5))
        .bend(LeftHip, LeftKnee, LeftAnkle, knee_deg)
}

/// 左腕: 肘角度だけを指定
pub fn left_arm(elbow_deg: f32) -> PoseBuilder {
    use KeypointIndex::*;
    PoseBuilder::new()
        .at(LeftShoulder, (0.5, 0.2))
        .at(LeftElbow, (0.5, 0.4))
        .bend(LeftShoulder, LeftElbow, LeftWrist, elbow_deg)
}

/// 左腕と体幹: 肘角度と股関節角度（肩-腰-膝）を指定
pub fn left_arm_and_torso(elbow_deg: f32, hip_deg: f32) -> PoseBuilder {
    use KeypointIndex::*;
    PoseBuilder::new()
        .at(LeftHip, (0.5, 0.5))
        .at(LeftKnee, (0.5, 0.7))
        .bend(LeftKnee, LeftHip, LeftShoulder, hip_deg)
        .bend(LeftHip, LeftShoulder, LeftElbow, 90.0)
        .bend(LeftShoulder, LeftElbow, LeftWrist, elbow_deg)
}

/// 仰向けの体幹と左脚: 股関節角度と膝角度を指定
pub fn torso_and_leg(hip_deg: f32, knee_deg: f32) -> PoseBuilder {
    use KeypointIndex::*;
    PoseBuilder::new()
        .at(LeftShoulder, (0.2, 0.6))
        .at(LeftHip, (0.5, 0.6))
        .bend(LeftShoulder, LeftHip, LeftKnee, hip_deg)
        .bend(LeftHip, LeftKnee, LeftAnkle, knee_deg)
}
