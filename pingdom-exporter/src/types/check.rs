//! チェック型定義
//!
//! Pingdomから取得した監視チェックと、そのステータスの型

/// Pingdomの監視チェック1件分
///
/// APIレスポンスから変換された値で、ポーリングのたびに作り直される。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckRecord {
    /// チェックID（Pingdom内で一意）
    pub id: i64,
    /// 表示名
    pub name: String,
    /// 監視対象ホスト名
    pub hostname: String,
    /// チェック間隔（分）
    pub resolution: i64,
    /// 一時停止フラグ（APIの値そのまま）
    pub paused: bool,
    /// 生のステータス文字列（"up", "down" など）
    pub status: String,
    /// 直近のレスポンスタイム（ミリ秒）
    pub last_response_time: i64,
    /// タグ名（APIが返した順序）
    pub tags: Vec<String>,
}

/// チェックステータス
///
/// Pingdomが返すステータス文字列の列挙。既知の5種類以外は`Invalid`になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// 状態不明
    Unknown,
    /// 一時停止中
    Paused,
    /// 稼働中
    Up,
    /// ダウン（未確定）
    UnconfirmedDown,
    /// ダウン
    Down,
    /// 想定外の値
    Invalid,
}

impl CheckStatus {
    /// 生のステータス文字列をパース（未知の値は`Invalid`）
    pub fn parse(raw: &str) -> Self {
        match raw {
            "unknown" => Self::Unknown,
            "paused" => Self::Paused,
            "up" => Self::Up,
            "unconfirmed_down" => Self::UnconfirmedDown,
            "down" => Self::Down,
            _ => Self::Invalid,
        }
    }

    /// メトリクスとして公開する数値コード
    pub fn code(&self) -> i32 {
        match self {
            Self::Unknown => -2,
            Self::Paused => -1,
            Self::Up => 0,
            Self::UnconfirmedDown => 1,
            Self::Down => 2,
            Self::Invalid => 100,
        }
    }
}
