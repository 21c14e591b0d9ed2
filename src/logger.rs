use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// ログファイルを置くディレクトリを返す。
///
/// キャッシュディレクトリが取得できない環境では`None`を返す。
pub fn log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("asana-tte"))
}

/// ロガーを初期化する。
///
/// 標準エラー出力には色付きで、ログファイルにはそのまま出力する。
/// ログファイルが作成できない場合は標準エラー出力のみとする。
///
/// # Arguments
///
/// * `level` - 出力するログレベル
pub fn init(level: LevelFilter) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue);

    let stderr = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new()
        .level(LevelFilter::Warn)
        .level_for("asana_tte", level)
        .chain(stderr);

    if let Some(file) = log_dir().and_then(|dir| open_log_file(dir).ok()) {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{} [{} {}] {}",
                        chrono::Local::now().to_rfc3339(),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .chain(file),
        );
    }

    dispatch.apply().context("Failed to initialize logger")?;

    Ok(())
}

fn open_log_file(dir: PathBuf) -> Result<fs::File> {
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    let path = dir.join("asana-tte.log");

    fern::log_file(&path).with_context(|| format!("Failed to open log file: {}", path.display()))
}
