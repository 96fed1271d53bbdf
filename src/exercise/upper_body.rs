//! 上半身の種目: 肘角度でレップを数える

use super::{ExerciseState, Feedback, Landmarks, Stage, Step};
use crate::pose::KeypointIndex::*;

/// 肘が伸びきったとみなす角度
const ELBOW_EXTENDED: f32 = 160.0;
/// プッシュアップ・ディップ・ロウのボトム
const ELBOW_BENT: f32 = 90.0;
/// カール: 巻き上げ切った角度
const CURL_TOP: f32 = 40.0;
/// プレス: 肩の高さまで下ろした角度
const PRESS_RACKED: f32 = 100.0;

/// プッシュアップ: 肩-腰-膝がこれ未満なら腰が落ちている
const PUSH_UP_MIN_HIP: f32 = 160.0;
/// ロウ: 前傾が浅すぎる
const ROW_MAX_HIP: f32 = 150.0;
/// ロウ: 前傾が深すぎる
const ROW_MIN_HIP: f32 = 90.0;

const KEEP_BACK_STRAIGHT: Feedback = Feedback::bad("KEEP BACK STRAIGHT");
const HINGE_MORE: Feedback = Feedback::bad("HINGE MORE");
const BACK_TOO_LOW: Feedback = Feedback::bad("BACK TOO LOW");

fn elbow_angle(landmarks: &Landmarks<'_>) -> Option<f32> {
    landmarks.angle(LeftShoulder, LeftElbow, LeftWrist)
}

fn hip_angle(landmarks: &Landmarks<'_>) -> Option<f32> {
    landmarks.angle(LeftShoulder, LeftHip, LeftKnee)
}

pub fn bicep_curl(landmarks: &Landmarks<'_>, state: ExerciseState) -> Option<Step> {
    let elbow = elbow_angle(landmarks)?;

    let next = if elbow > ELBOW_EXTENDED {
        state.enter(Stage::Down)
    } else if elbow < CURL_TOP && state.is(Stage::Down) {
        state.complete(Stage::Up)
    } else {
        state
    };

    Some(Step::new(Feedback::for_stage(next.stage, Stage::Up), next))
}

pub fn overhead_press(landmarks: &Landmarks<'_>, state: ExerciseState) -> Option<Step> {
    let elbow = elbow_angle(landmarks)?;

    let next = if elbow < PRESS_RACKED {
        state.enter(Stage::Down)
    } else if elbow > ELBOW_EXTENDED && state.is(Stage::Down) {
        state.complete(Stage::Up)
    } else {
        state
    };

    Some(Step::new(Feedback::for_stage(next.stage, Stage::Up), next))
}

/// 腰が落ちている間はレップ判定を止める
pub fn push_up(landmarks: &Landmarks<'_>, state: ExerciseState) -> Option<Step> {
    let elbow = elbow_angle(landmarks)?;
    let hip = hip_angle(landmarks)?;

    if hip < PUSH_UP_MIN_HIP {
        return Some(Step::new(KEEP_BACK_STRAIGHT, state));
    }

    Some(lower_from_lockout(elbow, state))
}

pub fn tricep_dip(landmarks: &Landmarks<'_>, state: ExerciseState) -> Option<Step> {
    let elbow = elbow_angle(landmarks)?;
    Some(lower_from_lockout(elbow, state))
}

/// 伸ばした腕から下ろし切ったところでカウントする種目の共通部分
fn lower_from_lockout(elbow: f32, state: ExerciseState) -> Step {
    let next = if elbow > ELBOW_EXTENDED {
        state.enter(Stage::Up)
    } else if elbow < ELBOW_BENT && state.is(Stage::Up) {
        state.complete(Stage::Down)
    } else {
        state
    };

    Step::new(Feedback::for_stage(next.stage, Stage::Down), next)
}

/// 前傾が 90°〜150° の範囲にある間だけレップを判定する
/// 前傾角が範囲外なら指摘を返す。境界値 (90°, 150°) は範囲内
fn hinge_fault(hip: f32) -> Option<Feedback> {
    if hip > ROW_MAX_HIP {
        Some(HINGE_MORE)
    } else if hip < ROW_MIN_HIP {
        Some(BACK_TOO_LOW)
    } else {
        None
    }
}

pub fn barbell_row(landmarks: &Landmarks<'_>, state: ExerciseState) -> Option<Step> {
    let hip = hip_angle(landmarks)?;
    let elbow = elbow_angle(landmarks)?;

    if let Some(feedback) = hinge_fault(hip) {
        return Some(Step::new(feedback, state));
    }

    let next = if elbow > ELBOW_EXTENDED {
        state.enter(Stage::Down)
    } else if elbow < ELBOW_BENT && state.is(Stage::Down) {
        state.complete(Stage::Up)
    } else {
        state
    };

    Some(Step::new(Feedback::for_stage(next.stage, Stage::Up), next))
}
