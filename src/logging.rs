//! # Logging モジュール
//!
//! シミュレーションのログ出力基盤を提供します。
//!
//! tracing-subscriberによるコンソール出力（compact形式）と、
//! tracing-appenderの非同期ローリングファイル出力（JSON形式）を
//! 組み合わせ、出力先とログレベルを実行時に選択できます。ファイル
//! 出力は日次ローテーションで`logs/`配下に書き込まれます。

use std::str::FromStr;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// ログ出力先の設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogOutput {
    /// コンソールのみ
    Console,
    /// ファイルのみ
    File,
    /// コンソールとファイルの両方
    Both,
}

impl FromStr for LogOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "stdout" => Ok(LogOutput::Console),
            "file" => Ok(LogOutput::File),
            "both" | "all" => Ok(LogOutput::Both),
            _ => Err(format!("無効な出力先: {}. 利用可能: console, file, both", s)),
        }
    }
}

/// ログ設定構造体
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// ログレベル
    pub level: Level,
    /// 出力先
    pub output: LogOutput,
    /// ログファイルのディレクトリ
    pub log_dir: String,
    /// ログファイル名のプレフィックス
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            output: LogOutput::Console,
            log_dir: "logs".to_string(),
            file_prefix: "infilsim".to_string(),
        }
    }
}

/// ログシステムを初期化
///
/// 環境変数`RUST_LOG`が設定されていればそれを優先し、なければ設定の
/// レベルを使用します。ファイル出力を含む場合は非同期ライターの
/// `WorkerGuard`を返すため、呼び出し側はプロセス終了までガードを
/// 保持する必要があります（ドロップするとバッファが失われる）。
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level.to_string()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match config.output {
        LogOutput::Console => {
            Registry::default()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .init();
            Ok(None)
        }
        LogOutput::File => {
            std::fs::create_dir_all(&config.log_dir)?;
            let appender = rolling::daily(&config.log_dir, &config.file_prefix);
            let (writer, guard) = non_blocking(appender);
            Registry::default()
                .with(env_filter)
                .with(fmt::layer().with_writer(writer).with_target(true).json())
                .init();
            Ok(Some(guard))
        }
        LogOutput::Both => {
            std::fs::create_dir_all(&config.log_dir)?;
            let appender = rolling::daily(&config.log_dir, &config.file_prefix);
            let (writer, guard) = non_blocking(appender);
            Registry::default()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .with(fmt::layer().with_writer(writer).with_target(true).json())
                .init();
            Ok(Some(guard))
        }
    }
}

/// ログレベルを文字列から解析（無効な場合はINFO）
pub fn parse_log_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!("警告: 無効なログレベル '{}'. INFOを使用します", level_str);
            Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_output_from_str() {
        assert_eq!(LogOutput::from_str("console"), Ok(LogOutput::Console));
        assert_eq!(LogOutput::from_str("FILE"), Ok(LogOutput::File));
        assert_eq!(LogOutput::from_str("both"), Ok(LogOutput::Both));
        assert!(LogOutput::from_str("invalid").is_err());
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug"), Level::DEBUG);
        assert_eq!(parse_log_level("WARN"), Level::WARN);
        assert_eq!(parse_log_level("invalid"), Level::INFO);
    }
}
