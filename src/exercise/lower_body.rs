//! 下半身の種目: スクワット・ランジ・ハイニー

use super::{ExerciseState, Feedback, Landmarks, Stage, Step, READY};
use crate::pose::KeypointIndex::*;

/// 膝がこれより曲がったらボトム
const SQUAT_DOWN_KNEE: f32 = 100.0;
/// 膝がこれより伸びたらトップ
const SQUAT_UP_KNEE: f32 = 160.0;
/// ボトムで股関節がこれより開いていれば上体が潰れていない
const SQUAT_MIN_HIP: f32 = 90.0;

const LUNGE_DOWN_KNEE: f32 = 100.0;
const LUNGE_UP_KNEE: f32 = 160.0;

const SQUAT_CORRECT: Feedback = Feedback::good("CORRECT");
const SQUAT_INCORRECT: Feedback = Feedback::bad("INCORRECT");
const ONE_KNEE_AT_A_TIME: Feedback = Feedback::bad("ONE KNEE AT A TIME");

pub fn squat(landmarks: &Landmarks<'_>, state: ExerciseState) -> Option<Step> {
    let knee = landmarks.angle(LeftHip, LeftKnee, LeftAnkle)?;
    let hip = landmarks.angle(LeftShoulder, LeftHip, LeftKnee)?;

    let next = if knee < SQUAT_DOWN_KNEE {
        state.enter(Stage::Down)
    } else if knee > SQUAT_UP_KNEE && state.is(Stage::Down) {
        state.complete(Stage::Up)
    } else {
        state
    };

    let feedback = match next.stage {
        Some(Stage::Down) if hip > SQUAT_MIN_HIP => SQUAT_CORRECT,
        Some(Stage::Down) => SQUAT_INCORRECT,
        _ => READY,
    };
    Some(Step::new(feedback, next))
}

/// 両膝が曲がればボトム、どちらかが伸びればトップ
pub fn lunge(landmarks: &Landmarks<'_>, state: ExerciseState) -> Option<Step> {
    let left = landmarks.angle(LeftHip, LeftKnee, LeftAnkle)?;
    let right = landmarks.angle(RightHip, RightKnee, RightAnkle)?;

    let next = if left < LUNGE_DOWN_KNEE && right < LUNGE_DOWN_KNEE {
        state.enter(Stage::Down)
    } else if (left > LUNGE_UP_KNEE || right > LUNGE_UP_KNEE) && state.is(Stage::Down) {
        state.complete(Stage::Up)
    } else {
        state
    };

    Some(Step::new(Feedback::for_stage(next.stage, Stage::Up), next))
}

/// 膝が腰より上に来たら1カウント
///
/// 同じ側が続けて上がってもカウントしない（左右交互のみ）。
/// 両膝が同時に腰より上にあるフレームは判定しない。
pub fn high_knees(landmarks: &Landmarks<'_>, state: ExerciseState) -> Option<Step> {
    let (_, left_hip_y) = landmarks.point(LeftHip)?;
    let (_, left_knee_y) = landmarks.point(LeftKnee)?;
    let (_, right_hip_y) = landmarks.point(RightHip)?;
    let (_, right_knee_y) = landmarks.point(RightKnee)?;

    // 画像座標はYが下向き
    let left_up = left_knee_y < left_hip_y;
    let right_up = right_knee_y < right_hip_y;

    let step = match (left_up, right_up) {
        (true, true) => Step::new(ONE_KNEE_AT_A_TIME, state),
        (true, false) if !state.is(Stage::LeftUp) => {
            let next = state.complete(Stage::LeftUp);
            Step::new(Feedback::good(Stage::LeftUp.label()), next)
        }
        (false, true) if !state.is(Stage::RightUp) => {
            let next = state.complete(Stage::RightUp);
            Step::new(Feedback::good(Stage::RightUp.label()), next)
        }
        _ => Step::new(high_knees_feedback(state.stage), state),
    };
    Some(step)
}

fn high_knees_feedback(stage: Option<Stage>) -> Feedback {
    match stage {
        Some(Stage::LeftUp) => Feedback::bad("RIGHT KNEE NEXT"),
        Some(Stage::RightUp) => Feedback::bad("LEFT KNEE NEXT"),
        _ => READY,
    }
}
