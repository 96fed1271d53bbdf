//! tracing の初期化
//!
//! stderr への出力に加え、設定があれば `logs/session_YYYYmmdd_HHMMSS.log` にも書き出す。

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogConfig;

/// セッションログのファイルパス
pub fn session_log_path(dir: &Path) -> PathBuf {
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("session_{}.log", ts))
}

/// グローバルsubscriberを設定し、ログファイルを作った場合はそのパスを返す
pub fn init(config: &LogConfig) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .context("Invalid log filter")?;

    let (file_layer, path) = match &config.dir {
        Some(dir) => {
            let dir = Path::new(dir);
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
            let path = session_log_path(dir);
            let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(path)
}
