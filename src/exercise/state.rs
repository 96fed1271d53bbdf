use std::fmt;

/// 種目ごとの動作フェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Up,
    Down,
    Holding,
    /// ハイニー: 左膝が上がった
    LeftUp,
    /// ハイニー: 右膝が上がった
    RightUp,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Holding => "HOLDING",
            Self::LeftUp => "LEFT",
            Self::RightUp => "RIGHT",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 種目ごとの状態 (ステージ, レップ数)
///
/// ステージとカウンタは常にまとめて置き換える。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExerciseState {
    /// `None` はまだステージが決まっていない状態
    pub stage: Option<Stage>,
    pub counter: u32,
}

impl ExerciseState {
    pub fn new(stage: Option<Stage>, counter: u32) -> Self {
        Self { stage, counter }
    }

    /// カウンタを変えずにステージだけ移る
    pub fn enter(self, stage: Stage) -> Self {
        Self {
            stage: Some(stage),
            ..self
        }
    }

    /// レップ完了: ステージを移りカウンタを1つ進める
    pub fn complete(self, stage: Stage) -> Self {
        Self {
            stage: Some(stage),
            counter: self.counter.saturating_add(1),
        }
    }

    pub fn is(&self, stage: Stage) -> bool {
        self.stage == Some(stage)
    }
}

/// 1フレーム分のフィードバック文言と良否
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub text: &'static str,
    /// 正しいフォーム・レップ完了を示す文言なら true
    pub positive: bool,
}

impl Feedback {
    pub const fn good(text: &'static str) -> Self {
        Self { text, positive: true }
    }

    pub const fn bad(text: &'static str) -> Self {
        Self { text, positive: false }
    }

    /// 専用の文言を持たない種目の標準フィードバック
    ///
    /// ステージ名をそのまま返し、レップを完了させるステージのときだけ positive。
    pub fn for_stage(stage: Option<Stage>, completing: Stage) -> Self {
        match stage {
            Some(stage) => Self {
                text: stage.label(),
                positive: stage == completing,
            },
            None => READY,
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

pub const READY: Feedback = Feedback::bad("Ready");

/// 人物なし・ランドマーク欠損時の固定フィードバック
pub const NO_PERSON: Feedback = Feedback::bad("No person detected");

/// ステートマシン1回分の出力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub feedback: Feedback,
    pub state: ExerciseState,
}

impl Step {
    pub fn new(feedback: Feedback, state: ExerciseState) -> Self {
        Self { feedback, state }
    }
}
