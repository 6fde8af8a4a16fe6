//! ロギング初期化ユーティリティ
//!
//! `RUST_LOG` が設定されていればそのディレクティブを優先し、なければ
//! `PINGDOM_EXPORTER_LOG_LEVEL` のレベルを使う。
//! `PINGDOM_EXPORTER_LOG_FORMAT=json` でJSON出力に切り替える。

use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::error::{ExporterError, ExporterResult};

/// デフォルトのログレベル
const DEFAULT_LOG_LEVEL: &str = "info";

/// ログレベルの環境変数
const LOG_LEVEL_ENV: &str = "PINGDOM_EXPORTER_LOG_LEVEL";

/// ログ形式の環境変数
const LOG_FORMAT_ENV: &str = "PINGDOM_EXPORTER_LOG_FORMAT";

/// 空でない環境変数の値
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人間向けテキスト
    Text,
    /// 1行1JSON
    Json,
}

impl LogFormat {
    /// 環境変数から出力形式を決定
    pub fn from_env() -> Self {
        match env_value(LOG_FORMAT_ENV) {
            Some(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// フィルタを構築
fn build_filter() -> ExporterResult<EnvFilter> {
    if let Some(directives) = env_value(EnvFilter::DEFAULT_ENV) {
        return EnvFilter::try_new(directives)
            .map_err(|e| ExporterError::Config(format!("invalid RUST_LOG: {}", e)));
    }

    let level = env_value(LOG_LEVEL_ENV).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    EnvFilter::try_new(&level)
        .map_err(|e| ExporterError::Config(format!("invalid log level '{}': {}", level, e)))
}

/// グローバルなtracingサブスクライバーを初期化
///
/// 2回目以降の呼び出しはエラーになる。
pub fn init() -> ExporterResult<()> {
    let filter = build_filter()?;

    let layer = match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_filter(filter)
            .boxed(),
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| ExporterError::Config(format!("failed to initialize logging: {}", e)))
}
