//! チェック→メトリクス変換
//!
//! `CheckRecord`からラベルと公開する数値を求める純粋関数。I/Oも状態も持たない。

use crate::types::{CheckRecord, CheckStatus};

/// ラベル名（この順序でラベル値を並べる）
pub const CHECK_LABEL_NAMES: [&str; 6] = ["id", "name", "hostname", "resolution", "paused", "tags"];

/// タグ結合時の区切り文字
const TAG_DELIMITER: &str = ",";

/// 1チェック分のラベル値
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelTuple {
    /// チェックID
    pub id: String,
    /// 表示名
    pub name: String,
    /// ホスト名
    pub hostname: String,
    /// チェック間隔（分）
    pub resolution: String,
    /// "true" / "false"
    pub paused: String,
    /// カンマ区切りのタグ名
    pub tags: String,
}

impl LabelTuple {
    /// `CHECK_LABEL_NAMES`と同じ順序のラベル値
    pub fn values(&self) -> [&str; 6] {
        [
            self.id.as_str(),
            self.name.as_str(),
            self.hostname.as_str(),
            self.resolution.as_str(),
            self.paused.as_str(),
            self.tags.as_str(),
        ]
    }
}

/// 変換結果
#[derive(Debug, Clone, PartialEq)]
pub struct MappedCheck {
    /// ラベル値
    pub labels: LabelTuple,
    /// ステータスコード（-2〜2、想定外は100）
    pub status_code: f64,
    /// 1: ダウン確定ではない / 0: ダウン
    pub up_down: f64,
    /// 直近のレスポンスタイム（ミリ秒）
    pub response_time_ms: f64,
}

/// ステータスコードからup/downフラグを求める
///
/// unknown と paused も 1 になる。
pub fn up_down(status_code: f64) -> f64 {
    if status_code < 1.0 {
        1.0
    } else {
        0.0
    }
}

/// チェックをラベルと数値に変換する
pub fn map_check(check: &CheckRecord) -> MappedCheck {
    let status = CheckStatus::parse(&check.status);
    let status_code = f64::from(status.code());

    // ステータスが paused ならフラグに関係なく true
    let paused = check.paused || status == CheckStatus::Paused;

    let labels = LabelTuple {
        id: check.id.to_string(),
        name: check.name.clone(),
        hostname: check.hostname.clone(),
        resolution: check.resolution.to_string(),
        paused: paused.to_string(),
        tags: check.tags.join(TAG_DELIMITER),
    };

    MappedCheck {
        labels,
        status_code,
        up_down: up_down(status_code),
        response_time_ms: check.last_response_time as f64,
    }
}
