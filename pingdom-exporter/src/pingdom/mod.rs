//! Pingdom API クライアント
//!
//! チェック一覧の取得だけを提供する。リトライやバックオフは行わず、
//! 1回の呼び出しは1回のHTTPリクエストに対応する。

pub mod client;

pub use client::PingdomClient;

use async_trait::async_trait;

use crate::error::ExporterResult;
use crate::types::CheckRecord;

/// チェックステータス取得元
///
/// ポーラーはこのトレイト経由でチェックを取得する（テストではモックに差し替える）。
#[async_trait]
pub trait CheckStatusClient: Send + Sync {
    /// 全チェックを取得（`include_tags`でタグも含める）
    async fn fetch_checks(&self, include_tags: bool) -> ExporterResult<Vec<CheckRecord>>;
}
