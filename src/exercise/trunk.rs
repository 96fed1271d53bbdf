//! 体幹の種目: プランク・レッグレイズ・クランチ

use super::{ExerciseState, Feedback, Landmarks, Stage, Step};
use crate::pose::KeypointIndex::*;

const PLANK_STRAIGHT: f32 = 165.0;
const PLANK_HIPS_HIGH: f32 = 150.0;

/// 膝がこれ未満なら脚が曲がっている
const LEG_RAISE_STRAIGHT_KNEE: f32 = 160.0;
const LEG_RAISE_LOWERED_HIP: f32 = 150.0;
const LEG_RAISE_RAISED_HIP: f32 = 90.0;

const CRUNCH_LYING: f32 = 140.0;
const CRUNCH_CURLED: f32 = 120.0;

const GOOD_FORM: Feedback = Feedback::good("GOOD FORM");
const LOWER_YOUR_HIPS: Feedback = Feedback::bad("LOWER YOUR HIPS");
const STRAIGHTEN_BACK: Feedback = Feedback::bad("STRAIGHTEN BACK");
const KEEP_LEGS_STRAIGHT: Feedback = Feedback::bad("KEEP LEGS STRAIGHT");

/// 保持系の種目なのでカウンタは動かさない
pub fn plank(landmarks: &Landmarks<'_>, state: ExerciseState) -> Option<Step> {
    let hip = landmarks.angle(LeftShoulder, LeftHip, LeftKnee)?;
    let knee = landmarks.angle(LeftHip, LeftKnee, LeftAnkle)?;

    let feedback = if hip > PLANK_STRAIGHT && knee > PLANK_STRAIGHT {
        GOOD_FORM
    } else if hip < PLANK_HIPS_HIGH {
        LOWER_YOUR_HIPS
    } else {
        STRAIGHTEN_BACK
    };
    Some(Step::new(feedback, state.enter(Stage::Holding)))
}

/// ちょうど 160° は伸びている扱い
fn legs_bent(knee: f32) -> bool {
    knee < LEG_RAISE_STRAIGHT_KNEE
}

pub fn leg_raise(landmarks: &Landmarks<'_>, state: ExerciseState) -> Option<Step> {
    let knee = landmarks.angle(LeftHip, LeftKnee, LeftAnkle)?;
    let hip = landmarks.angle(LeftShoulder, LeftHip, LeftKnee)?;

    if legs_bent(knee) {
        return Some(Step::new(KEEP_LEGS_STRAIGHT, state));
    }

    let next = if hip > LEG_RAISE_LOWERED_HIP {
        state.enter(Stage::Down)
    } else if hip < LEG_RAISE_RAISED_HIP && state.is(Stage::Down) {
        state.complete(Stage::Up)
    } else {
        state
    };

    Some(Step::new(Feedback::for_stage(next.stage, Stage::Up), next))
}

pub fn crunch(landmarks: &Landmarks<'_>, state: ExerciseState) -> Option<Step> {
    let torso = landmarks.angle(LeftShoulder, LeftHip, LeftKnee)?;

    let next = if torso > CRUNCH_LYING {
        state.enter(Stage::Down)
    } else if torso < CRUNCH_CURLED && state.is(Stage::Down) {
        state.complete(Stage::Up)
    } else {
        state
    };

    Some(Step::new(Feedback::for_stage(next.stage, Stage::Up), next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::run_frames as run;
    use crate::pose::testing::torso_and_leg;
    use crate::pose::Pose;

    fn frames(angles: &[(f32, f32)]) -> Vec<Pose> {
        angles.iter().map(|&(hip, knee)| torso_and_leg(hip, knee).build()).collect()
    }

    #[test]
    fn test_plank_feedback() {
        let holding = ExerciseState::new(Some(Stage::Holding), 0);
        let steps = run(plank, &frames(&[(175.0, 175.0), (140.0, 175.0), (158.0, 175.0), (175.0, 150.0)]), holding);

        let texts: Vec<&str> = steps.iter().map(|s| s.feedback.text).collect();
        assert_eq!(texts, vec!["GOOD FORM", "LOWER YOUR HIPS", "STRAIGHTEN BACK", "STRAIGHTEN BACK"]);
        assert!(steps[0].feedback.positive);
        assert!(steps.iter().all(|s| s.state == holding));
    }

    #[test]
    fn test_leg_raise_cycle() {
        let steps = run(leg_raise, &frames(&[(170.0, 175.0), (120.0, 175.0), (80.0, 175.0), (170.0, 175.0)]), ExerciseState::default());

        let counters: Vec<u32> = steps.iter().map(|s| s.state.counter).collect();
        assert_eq!(counters, vec![0, 0, 1, 1]);
        assert!(steps[3].state.is(Stage::Down));
    }

    #[test]
    fn test_leg_raise_bent_knees_suppress_reps() {
        let start = ExerciseState::new(Some(Stage::Down), 3);
        let steps = run(leg_raise, &frames(&[(80.0, 120.0)]), start);

        assert_eq!(steps[0].feedback, KEEP_LEGS_STRAIGHT);
        assert_eq!(steps[0].state, start);
    }

    #[test]
    fn test_straight_knee_bound_is_inclusive() {
        assert!(!legs_bent(LEG_RAISE_STRAIGHT_KNEE));
        assert!(legs_bent(LEG_RAISE_STRAIGHT_KNEE - 0.01));
    }

    #[test]
    fn test_leg_raise_counts_with_knee_on_bound() {
        // 膝角度 160° 前後でも、ゲートに掛からない限りレップが進む
        let steps = run(leg_raise, &frames(&[(170.0, 160.5), (80.0, 160.5)]), ExerciseState::default());

        assert!(steps.iter().all(|s| s.feedback != KEEP_LEGS_STRAIGHT));
        assert_eq!(steps[1].state.counter, 1);
    }

    #[test]
    fn test_crunch_cycle() {
        let steps = run(crunch, &frames(&[(170.0, 90.0), (130.0, 90.0), (110.0, 90.0), (115.0, 90.0), (150.0, 90.0)]), ExerciseState::default());

        let counters: Vec<u32> = steps.iter().map(|s| s.state.counter).collect();
        assert_eq!(counters, vec![0, 0, 1, 1, 1]);
        assert_eq!(steps[2].feedback, Feedback::good("UP"));
        assert_eq!(steps[4].feedback, Feedback::bad("DOWN"));
    }
}
