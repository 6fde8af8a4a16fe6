//! 型定義モジュール
//!
//! ドメインエンティティの型定義を提供

/// チェック関連の型定義
pub mod check;

pub use check::{CheckRecord, CheckStatus};
