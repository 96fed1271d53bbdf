//! フレームごとの種目ディスパッチ

use crate::error::EngineError;
use crate::exercise::{lookup, ExerciseKind, ExerciseState, Feedback, Landmarks, Step, NO_PERSON};
use crate::pose::{KeypointIndex, Pose};

/// 1フレームの処理結果
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// ステートマシンを実行した
    Processed(Step),
    /// 人物が検出されなかった
    NoPerson,
    /// 必要な関節が欠損している
    IncompleteLandmarks { missing: Vec<KeypointIndex> },
    /// 関節は揃っているが角度が定まらない（点が重なっている）
    Indeterminate,
}

impl FrameOutcome {
    pub fn feedback(&self) -> Feedback {
        match self {
            Self::Processed(step) => step.feedback,
            _ => NO_PERSON,
        }
    }

    /// 処理されなかったフレームでは渡された状態をそのまま返す
    pub fn state_or(&self, prior: ExerciseState) -> ExerciseState {
        match self {
            Self::Processed(step) => step.state,
            _ => prior,
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed(_))
    }
}

/// 種目に対応するステートマシンへランドマークを渡す
///
/// 人物なし・関節欠損の場合はステートマシンを呼ばずに返す。
pub fn dispatch(
    kind: ExerciseKind,
    pose: Option<&Pose>,
    state: ExerciseState,
    confidence_threshold: f32,
) -> Result<FrameOutcome, EngineError> {
    let spec = lookup(kind)?;

    let Some(pose) = pose else {
        return Ok(FrameOutcome::NoPerson);
    };

    let missing = pose.missing(spec.joints, confidence_threshold);
    if !missing.is_empty() {
        return Ok(FrameOutcome::IncompleteLandmarks { missing });
    }

    let landmarks = Landmarks::new(pose, confidence_threshold);
    Ok(match (spec.step)(&landmarks, state) {
        Some(step) => FrameOutcome::Processed(step),
        None => FrameOutcome::Indeterminate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::Stage;
    use crate::pose::testing::{left_arm, left_leg, PoseBuilder};
    use crate::pose::KeypointIndex::*;

    const THRESHOLD: f32 = 0.3;

    #[test]
    fn test_no_person() {
        let state = ExerciseState::new(Some(Stage::Down), 7);
        let outcome = dispatch(ExerciseKind::Squat, None, state, THRESHOLD).unwrap();

        assert_eq!(outcome, FrameOutcome::NoPerson);
        assert_eq!(outcome.feedback(), NO_PERSON);
        assert_eq!(outcome.state_or(state), state);
    }

    #[test]
    fn test_incomplete_landmarks_lists_missing_joints() {
        // 腕だけのポーズでスクワット
        let pose = left_arm(90.0).build();
        let state = ExerciseState::new(Some(Stage::Up), 2);
        let outcome = dispatch(ExerciseKind::Squat, Some(&pose), state, THRESHOLD).unwrap();

        assert_eq!(
            outcome,
            FrameOutcome::IncompleteLandmarks {
                missing: vec![LeftHip, LeftKnee, LeftAnkle]
            }
        );
        assert_eq!(outcome.feedback().text, "No person detected");
        assert_eq!(outcome.state_or(state), state);
    }

    #[test]
    fn test_low_confidence_counts_as_missing() {
        let mut pose = left_leg(90.0).build();
        pose.keypoints[LeftAnkle as usize].confidence = 0.1;
        let outcome = dispatch(ExerciseKind::Squat, Some(&pose), ExerciseState::default(), THRESHOLD).unwrap();
        assert!(matches!(outcome, FrameOutcome::IncompleteLandmarks { .. }));
    }

    #[test]
    fn test_overlapping_points_are_indeterminate() {
        let pose = PoseBuilder::new()
            .at(LeftShoulder, (0.5, 0.2))
            .at(LeftElbow, (0.5, 0.4))
            .at(LeftWrist, (0.5, 0.4))
            .build();
        let state = ExerciseState::new(Some(Stage::Down), 1);
        let outcome = dispatch(ExerciseKind::BicepCurl, Some(&pose), state, THRESHOLD).unwrap();

        assert_eq!(outcome, FrameOutcome::Indeterminate);
        assert_eq!(outcome.state_or(state), state);
    }

    #[test]
    fn test_processed_delegates_to_machine() {
        let pose = left_leg(90.0).build();
        let outcome = dispatch(ExerciseKind::Squat, Some(&pose), ExerciseState::new(Some(Stage::Up), 0), THRESHOLD).unwrap();

        assert!(outcome.is_processed());
        assert_eq!(outcome.state_or(ExerciseState::default()), ExerciseState::new(Some(Stage::Down), 0));
    }

    #[test]
    fn test_repeated_identical_frames_transition_once() {
        let pose = left_arm(30.0).build();
        let mut state = ExerciseState::new(Some(Stage::Down), 0);
        let mut transitions = 0;
        for _ in 0..20 {
            let next = dispatch(ExerciseKind::BicepCurl, Some(&pose), state, THRESHOLD)
                .unwrap()
                .state_or(state);
            if next != state {
                transitions += 1;
            }
            state = next;
        }
        assert_eq!(transitions, 1);
        assert_eq!(state.counter, 1);
    }
}
