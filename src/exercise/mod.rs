//! 種目ごとのレップ計測ステートマシン
//!
//! 各ステートマシンは `(ランドマーク, 現在の状態) -> (フィードバック, 次の状態)` の純粋関数。
//! 状態の保持はドライバ側 (`Trainer`) が行う。

mod kind;
mod lower_body;
mod state;
mod trunk;
mod upper_body;

pub use kind::ExerciseKind;
pub use state::{ExerciseState, Feedback, Stage, Step, NO_PERSON, READY};

use crate::error::EngineError;
use crate::geometry::{joint_angle, Point};
use crate::pose::{KeypointIndex, Pose};
use KeypointIndex::*;

/// 閾値を適用したランドマークの参照
pub struct Landmarks<'a> {
    pose: &'a Pose,
    threshold: f32,
}

impl<'a> Landmarks<'a> {
    pub fn new(pose: &'a Pose, threshold: f32) -> Self {
        Self { pose, threshold }
    }

    pub fn point(&self, index: KeypointIndex) -> Option<Point> {
        self.pose.point(index, self.threshold)
    }

    /// 頂点 `b` の角度。欠損・退化していれば `None`
    pub fn angle(&self, a: KeypointIndex, b: KeypointIndex, c: KeypointIndex) -> Option<f32> {
        joint_angle(self.point(a)?, self.point(b)?, self.point(c)?)
    }
}

/// ステートマシン関数。必要な角度が不定なら `None`
pub type StepFn = fn(&Landmarks<'_>, ExerciseState) -> Option<Step>;

/// レジストリの1エントリ
pub struct ExerciseSpec {
    pub kind: ExerciseKind,
    /// 判定に必要な関節
    pub joints: &'static [KeypointIndex],
    pub initial_stage: Option<Stage>,
    pub initial_feedback: Feedback,
    pub step: StepFn,
}

impl ExerciseSpec {
    /// 種目切り替え直後の状態
    pub fn initial_state(&self) -> ExerciseState {
        ExerciseState::new(self.initial_stage, 0)
    }
}

const LEFT_LEG: &[KeypointIndex] = &[LeftShoulder, LeftHip, LeftKnee, LeftAnkle];
const LEFT_ARM: &[KeypointIndex] = &[LeftShoulder, LeftElbow, LeftWrist];
const LEFT_ARM_AND_TORSO: &[KeypointIndex] = &[LeftShoulder, LeftElbow, LeftWrist, LeftHip, LeftKnee];
const LEFT_TORSO: &[KeypointIndex] = &[LeftShoulder, LeftHip, LeftKnee];
const BOTH_LEGS: &[KeypointIndex] = &[LeftHip, LeftKnee, LeftAnkle, RightHip, RightKnee, RightAnkle];
const BOTH_HIPS_KNEES: &[KeypointIndex] = &[LeftHip, LeftKnee, RightHip, RightKnee];

/// 全種目の登録テーブル
pub static REGISTRY: [ExerciseSpec; ExerciseKind::COUNT] = [
    ExerciseSpec {
        kind: ExerciseKind::Squat,
        joints: LEFT_LEG,
        initial_stage: Some(Stage::Up),
        initial_feedback: READY,
        step: lower_body::squat,
    },
    ExerciseSpec {
        kind: ExerciseKind::Plank,
        joints: LEFT_LEG,
        initial_stage: Some(Stage::Holding),
        initial_feedback: Feedback::bad("HOLD POSITION"),
        step: trunk::plank,
    },
    ExerciseSpec {
        kind: ExerciseKind::BicepCurl,
        joints: LEFT_ARM,
        initial_stage: Some(Stage::Down),
        initial_feedback: READY,
        step: upper_body::bicep_curl,
    },
    ExerciseSpec {
        kind: ExerciseKind::Lunge,
        joints: BOTH_LEGS,
        initial_stage: None,
        initial_feedback: READY,
        step: lower_body::lunge,
    },
    ExerciseSpec {
        kind: ExerciseKind::OverheadPress,
        joints: LEFT_ARM,
        initial_stage: None,
        initial_feedback: READY,
        step: upper_body::overhead_press,
    },
    ExerciseSpec {
        kind: ExerciseKind::PushUp,
        joints: LEFT_ARM_AND_TORSO,
        initial_stage: None,
        initial_feedback: READY,
        step: upper_body::push_up,
    },
    ExerciseSpec {
        kind: ExerciseKind::TricepDip,
        joints: LEFT_ARM,
        initial_stage: None,
        initial_feedback: READY,
        step: upper_body::tricep_dip,
    },
    ExerciseSpec {
        kind: ExerciseKind::BarbellRow,
        joints: LEFT_ARM_AND_TORSO,
        initial_stage: None,
        initial_feedback: READY,
        step: upper_body::barbell_row,
    },
    ExerciseSpec {
        kind: ExerciseKind::LegRaise,
        joints: LEFT_LEG,
        initial_stage: None,
        initial_feedback: READY,
        step: trunk::leg_raise,
    },
    ExerciseSpec {
        kind: ExerciseKind::Crunch,
        joints: LEFT_TORSO,
        initial_stage: None,
        initial_feedback: READY,
        step: trunk::crunch,
    },
    ExerciseSpec {
        kind: ExerciseKind::HighKnees,
        joints: BOTH_HIPS_KNEES,
        initial_stage: None,
        initial_feedback: READY,
        step: lower_body::high_knees,
    },
];

/// 種目に対応するレジストリエントリを引く
pub fn lookup(kind: ExerciseKind) -> Result<&'static ExerciseSpec, EngineError> {
    REGISTRY
        .iter()
        .find(|spec| spec.kind == kind)
        .ok_or_else(|| EngineError::UnknownExercise(kind.name().to_string()))
}

/// テスト用: フレーム列を順に流し、各フレームの出力を集める
#[cfg(test)]
pub(crate) fn run_frames(step: StepFn, poses: &[Pose], initial: ExerciseState) -> Vec<Step> {
    let mut state = initial;
    poses
        .iter()
        .map(|pose| {
            let out = step(&Landmarks::new(pose, 0.3), state).expect("angles should be determinate");
            state = out.state;
            out
        })
        .collect()
}
