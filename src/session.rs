//! トレーニングセッション（フレームパイプライン側の状態管理）
//!
//! 現在の種目と状態を保持し、種目切り替え時に状態をまとめてリセットする。
//! 直前と同じフィードバックは読み上げ対象にしない。

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::dispatch::{dispatch, FrameOutcome};
use crate::error::EngineError;
use crate::exercise::{lookup, ExerciseKind, ExerciseState, Feedback};
use crate::pose::Pose;

/// フレームの処理区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// 種目切り替え直後
    Selected,
    Processed,
    NoPerson,
    IncompleteLandmarks,
    Indeterminate,
}

impl From<&FrameOutcome> for FrameStatus {
    fn from(outcome: &FrameOutcome) -> Self {
        match outcome {
            FrameOutcome::Processed(_) => Self::Processed,
            FrameOutcome::NoPerson => Self::NoPerson,
            FrameOutcome::IncompleteLandmarks { .. } => Self::IncompleteLandmarks,
            FrameOutcome::Indeterminate => Self::Indeterminate,
        }
    }
}

/// 描画・読み上げ向けの1フレーム分の結果
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub exercise: ExerciseKind,
    pub state: ExerciseState,
    pub feedback: Feedback,
    pub status: FrameStatus,
    /// 前フレームと文言が変わったときだけ Some
    pub announce: Option<&'static str>,
}

impl FrameReport {
    /// "REPS" または "STATE"
    pub fn headline(&self) -> &'static str {
        if self.exercise.counts_reps() {
            "REPS"
        } else {
            "STATE"
        }
    }

    /// レップ数、またはステージ名
    pub fn value(&self) -> String {
        if self.exercise.counts_reps() {
            self.state.counter.to_string()
        } else {
            self.state
                .stage
                .map(|stage| stage.label().to_string())
                .unwrap_or_else(|| "-".to_string())
        }
    }
}

/// 単一ユーザーのセッション
pub struct Trainer {
    exercise: ExerciseKind,
    state: ExerciseState,
    confidence_threshold: f32,
    last_feedback: Option<&'static str>,
    /// 切り替え済みの種目で完了したレップ数
    finished: BTreeMap<ExerciseKind, u32>,
}

impl Trainer {
    pub fn new(exercise: ExerciseKind, confidence_threshold: f32) -> Result<Self, EngineError> {
        let spec = lookup(exercise)?;
        Ok(Self {
            exercise,
            state: spec.initial_state(),
            confidence_threshold,
            last_feedback: None,
            finished: BTreeMap::new(),
        })
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.exercise
    }

    pub fn state(&self) -> ExerciseState {
        self.state
    }

    /// 種目を切り替える
    ///
    /// ステージとカウンタは同時に初期値へ置き換わる。同じ種目の再選択もリセット扱い。
    pub fn select(&mut self, exercise: ExerciseKind) -> Result<FrameReport, EngineError> {
        let spec = lookup(exercise)?;

        self.bank_reps();
        self.exercise = exercise;
        self.state = spec.initial_state();
        info!(exercise = exercise.name(), "exercise selected");

        Ok(self.report(spec.initial_feedback, FrameStatus::Selected))
    }

    /// 1フレーム分のランドマークを処理する
    pub fn process(&mut self, pose: Option<&Pose>) -> Result<FrameReport, EngineError> {
        let outcome = dispatch(self.exercise, pose, self.state, self.confidence_threshold)?;
        let next = outcome.state_or(self.state);

        if next.counter > self.state.counter {
            debug!(exercise = self.exercise.name(), reps = next.counter, "rep counted");
        }
        if let FrameOutcome::IncompleteLandmarks { missing } = &outcome {
            let names: Vec<&str> = missing.iter().map(|idx| idx.name()).collect();
            debug!(exercise = self.exercise.name(), missing = ?names, "incomplete landmarks");
        }

        self.state = next;
        Ok(self.report(outcome.feedback(), FrameStatus::from(&outcome)))
    }

    /// このセッションで完了したレップ数（種目ごと, 現在の種目を含む）
    pub fn summary(&self) -> Vec<(ExerciseKind, u32)> {
        let mut totals = self.finished.clone();
        if self.exercise.counts_reps() && self.state.counter > 0 {
            *totals.entry(self.exercise).or_insert(0) += self.state.counter;
        }
        totals.into_iter().collect()
    }

    fn bank_reps(&mut self) {
        if self.exercise.counts_reps() && self.state.counter > 0 {
            *self.finished.entry(self.exercise).or_insert(0) += self.state.counter;
        }
    }

    fn report(&mut self, feedback: Feedback, status: FrameStatus) -> FrameReport {
        let announce = (self.last_feedback != Some(feedback.text)).then_some(feedback.text);
        self.last_feedback = Some(feedback.text);

        FrameReport {
            exercise: self.exercise,
            state: self.state,
            feedback,
            status,
            announce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::{Stage, NO_PERSON};
    use crate::pose::testing::{left_arm, left_leg};

    const THRESHOLD: f32 = 0.3;

    #[test]
    fn test_squat_end_to_end() {
        let mut trainer = Trainer::new(ExerciseKind::Squat, THRESHOLD).unwrap();
        assert_eq!(trainer.state(), ExerciseState::new(Some(Stage::Up), 0));

        let reports: Vec<FrameReport> = [165.0, 95.0, 92.0, 170.0, 168.0]
            .iter()
            .map(|&knee| trainer.process(Some(&left_leg(knee).build())).unwrap())
            .collect();

        assert_eq!(trainer.state(), ExerciseState::new(Some(Stage::Up), 1));
        assert_ne!(reports[0].feedback, reports[1].feedback);
        assert_eq!(reports[1].announce, Some("CORRECT"));
        assert_eq!(reports[2].announce, None);
        assert_eq!(reports[3].announce, Some("Ready"));
        assert_eq!(reports[4].value(), "1");
        assert_eq!(reports[4].headline(), "REPS");
    }

    #[test]
    fn test_select_resets_state_and_emits_initial_feedback() {
        let mut trainer = Trainer::new(ExerciseKind::BicepCurl, THRESHOLD).unwrap();
        for elbow in [170.0, 30.0, 170.0, 30.0] {
            trainer.process(Some(&left_arm(elbow).build())).unwrap();
        }
        assert_eq!(trainer.state().counter, 2);

        for kind in ExerciseKind::ALL {
            let report = trainer.select(kind).unwrap();
            let spec = lookup(kind).unwrap();
            assert_eq!(report.status, FrameStatus::Selected);
            assert_eq!(report.state, ExerciseState::new(spec.initial_stage, 0));
            assert_eq!(report.feedback, spec.initial_feedback);
            assert_eq!(trainer.exercise(), kind);
        }
    }

    #[test]
    fn test_missing_input_never_changes_counter() {
        let mut trainer = Trainer::new(ExerciseKind::BicepCurl, THRESHOLD).unwrap();
        trainer.process(Some(&left_arm(170.0).build())).unwrap();
        trainer.process(Some(&left_arm(30.0).build())).unwrap();
        let before = trainer.state();

        let none = trainer.process(None).unwrap();
        let partial = trainer.process(Some(&left_leg(90.0).build())).unwrap();

        for report in [&none, &partial] {
            assert_eq!(report.feedback, NO_PERSON);
            assert_eq!(report.state, before);
        }
        assert_eq!(none.status, FrameStatus::NoPerson);
        assert_eq!(partial.status, FrameStatus::IncompleteLandmarks);
        assert_eq!(none.announce, Some("No person detected"));
        assert_eq!(partial.announce, None);
    }

    #[test]
    fn test_plank_shows_stage() {
        let mut trainer = Trainer::new(ExerciseKind::Plank, THRESHOLD).unwrap();
        let report = trainer.select(ExerciseKind::Plank).unwrap();
        assert_eq!(report.headline(), "STATE");
        assert_eq!(report.value(), "HOLDING");
    }

    #[test]
    fn test_summary_accumulates_across_switches() {
        let mut trainer = Trainer::new(ExerciseKind::BicepCurl, THRESHOLD).unwrap();
        for elbow in [170.0, 30.0, 170.0, 30.0] {
            trainer.process(Some(&left_arm(elbow).build())).unwrap();
        }
        trainer.select(ExerciseKind::Squat).unwrap();
        for knee in [90.0, 170.0] {
            trainer.process(Some(&left_leg(knee).build())).unwrap();
        }
        trainer.select(ExerciseKind::BicepCurl).unwrap();
        for elbow in [170.0, 30.0] {
            trainer.process(Some(&left_arm(elbow).build())).unwrap();
        }

        assert_eq!(
            trainer.summary(),
            vec![(ExerciseKind::Squat, 1), (ExerciseKind::BicepCurl, 3)]
        );
    }
}
