//! Pingdom exporter
//!
//! Pingdomのチェック状態を定期取得し、Prometheusメトリクスとして公開する

#![warn(missing_docs)]

use std::sync::Arc;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー、認証情報）
pub mod config;

/// エラー型定義
pub mod error;

/// ロギング初期化ユーティリティ
pub mod logging;

/// チェック → ラベル・値の変換
pub mod mapper;

/// メトリクス定義とPrometheusレジストリ
pub mod metrics;

/// Pingdom APIクライアント
pub mod pingdom;

/// チェック状態のポーリング
pub mod poller;

/// HTTPサーバー（/ と /metrics）
pub mod server;

/// シグナルハンドリング
pub mod shutdown;

/// 共通型定義
pub mod types;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// メトリクスの書き込み先・描画元
    pub sink: Arc<dyn metrics::MetricSink>,
}
