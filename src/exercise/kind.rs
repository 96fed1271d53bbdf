use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// 対応している種目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Squat,
    Plank,
    BicepCurl,
    Lunge,
    OverheadPress,
    PushUp,
    TricepDip,
    BarbellRow,
    LegRaise,
    Crunch,
    HighKnees,
}

impl ExerciseKind {
    pub const COUNT: usize = 11;

    pub const ALL: [ExerciseKind; ExerciseKind::COUNT] = [
        Self::Squat,
        Self::Plank,
        Self::BicepCurl,
        Self::Lunge,
        Self::OverheadPress,
        Self::PushUp,
        Self::TricepDip,
        Self::BarbellRow,
        Self::LegRaise,
        Self::Crunch,
        Self::HighKnees,
    ];

    /// 設定ファイル・リプレイ入力で使う識別子
    pub fn name(self) -> &'static str {
        match self {
            Self::Squat => "squat",
            Self::Plank => "plank",
            Self::BicepCurl => "bicep_curl",
            Self::Lunge => "lunge",
            Self::OverheadPress => "overhead_press",
            Self::PushUp => "push_up",
            Self::TricepDip => "tricep_dip",
            Self::BarbellRow => "barbell_row",
            Self::LegRaise => "leg_raise",
            Self::Crunch => "crunch",
            Self::HighKnees => "high_knees",
        }
    }

    /// 画面表示用
    pub fn title(self) -> &'static str {
        match self {
            Self::Squat => "SQUAT",
            Self::Plank => "PLANK",
            Self::BicepCurl => "BICEP CURL",
            Self::Lunge => "LUNGE",
            Self::OverheadPress => "OVERHEAD PRESS",
            Self::PushUp => "PUSH-UP",
            Self::TricepDip => "TRICEP DIP",
            Self::BarbellRow => "BARBELL ROW",
            Self::LegRaise => "LEG RAISE",
            Self::Crunch => "CRUNCH",
            Self::HighKnees => "HIGH KNEES",
        }
    }

    /// 切り替えキー
    pub fn key(self) -> char {
        match self {
            Self::Squat => 's',
            Self::Plank => 'p',
            Self::BicepCurl => 'b',
            Self::Lunge => 'l',
            Self::OverheadPress => 'o',
            Self::PushUp => 'u',
            Self::TricepDip => 't',
            Self::BarbellRow => 'r',
            Self::LegRaise => 'g',
            Self::Crunch => 'c',
            Self::HighKnees => 'h',
        }
    }

    pub fn from_key(key: char) -> Option<Self> {
        let key = key.to_ascii_lowercase();
        Self::ALL.iter().copied().find(|kind| kind.key() == key)
    }

    /// レップ数ではなくステージを表示する種目か
    pub fn counts_reps(self) -> bool {
        self != Self::Plank
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExerciseKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| EngineError::UnknownExercise(s.to_string()))
    }
}
