//! Engine error types

use thiserror::Error;

/// エンジン側の型付きエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// レジストリに登録されていない種目
    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),
}
