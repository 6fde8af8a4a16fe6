//! メトリクス収集・管理
//!
//! ポーラーが書き込み、`/metrics` が読み出す時系列ストア。
//! 実装は並行書き込み・並行読み出しに対して安全でなければならない。

pub mod registry;

pub use registry::PrometheusSink;

use crate::error::ExporterResult;

/// レスポンスタイムヒストグラムのバケット境界（ミリ秒）
pub const RESPONSE_TIME_BUCKETS: [f64; 7] = [100.0, 250.0, 500.0, 1000.0, 2000.0, 5000.0, 10000.0];

/// up/downヒストグラムのバケット境界
pub const UP_DOWN_BUCKETS: [f64; 2] = [0.0, 1.0];

/// ゲージ系列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeSeries {
    /// 直近のAPI呼び出しが成功したか（ラベルなし）
    Up,
    /// チェックのステータスコード
    CheckStatus,
    /// 直近のレスポンスタイム
    CheckResponseTime,
}

impl GaugeSeries {
    /// 公開するメトリクス名
    pub fn name(&self) -> &'static str {
        match self {
            Self::Up => "pingdom_up",
            Self::CheckStatus => "pingdom_check_status",
            Self::CheckResponseTime => "pingdom_check_response_time",
        }
    }

    /// HELPテキスト
    pub fn help(&self) -> &'static str {
        match self {
            Self::Up => "Whether the last pingdom scrape was successfull (1: up, 0: down)",
            Self::CheckStatus => {
                "The current status of the check (0: up, 1: unconfirmed_down, 2: down, -1: paused, -2: unknown)"
            }
            Self::CheckResponseTime => "The response time of last test in milliseconds",
        }
    }
}

/// ヒストグラム系列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramSeries {
    /// レスポンスタイムの分布
    CheckResponseTime,
    /// up/downフラグの分布
    CheckStatus,
}

impl HistogramSeries {
    /// 公開するメトリクス名
    pub fn name(&self) -> &'static str {
        match self {
            Self::CheckResponseTime => "pingdom_check_response_time_histogram",
            Self::CheckStatus => "pingdom_check_status_histogram",
        }
    }

    /// HELPテキスト
    pub fn help(&self) -> &'static str {
        match self {
            Self::CheckResponseTime => "The response time test in milliseconds",
            Self::CheckStatus => "The current status of the check (1: up, 0: down)",
        }
    }

    /// バケット境界（起動時に固定）
    pub fn buckets(&self) -> Vec<f64> {
        match self {
            Self::CheckResponseTime => RESPONSE_TIME_BUCKETS.to_vec(),
            Self::CheckStatus => UP_DOWN_BUCKETS.to_vec(),
        }
    }
}

/// メトリクスの書き込み先
///
/// 値の設定はラベル値の組ごとに最後の書き込みが勝つ。古いラベルの系列は削除しない。
pub trait MetricSink: Send + Sync {
    /// ゲージに値を設定（`labels`は系列のラベル名と同じ順序・個数）
    fn set_gauge(&self, series: GaugeSeries, labels: &[&str], value: f64) -> ExporterResult<()>;

    /// ヒストグラムにサンプルを追加
    fn observe(&self, series: HistogramSeries, labels: &[&str], value: f64)
        -> ExporterResult<()>;

    /// 現在の全系列をテキスト形式で出力
    fn render(&self) -> ExporterResult<String>;

    /// `render`結果のContent-Type
    fn content_type(&self) -> &'static str {
        "text/plain; version=0.0.4"
    }
}
