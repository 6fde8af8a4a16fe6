//! Pingdom API 2.0 の reqwest 実装
//!
//! `GET /api/2.0/checks` を Basic認証 + `App-Key` ヘッダで呼び出す。
//! マルチアカウントモードでは `Account-Email` ヘッダを付与する。

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::CheckStatusClient;
use crate::config::Credentials;
use crate::error::{ExporterError, ExporterResult};
use crate::types::CheckRecord;

/// チェック一覧APIのパス
const CHECKS_PATH: &str = "/api/2.0/checks";

/// APIエラーメッセージとして残すレスポンス本文の最大長
const MAX_ERROR_BODY_CHARS: usize = 200;

/// チェック一覧レスポンス
#[derive(Debug, Deserialize)]
struct CheckListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    checks: Vec<CheckResponse>,
}

/// チェック1件のレスポンス（使用するフィールドのみ）
///
/// `null` は欠落と同じくゼロ値として扱う。
#[derive(Debug, Deserialize)]
struct CheckResponse {
    id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    hostname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    resolution: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
    #[serde(
        default,
        rename = "lastresponsetime",
        deserialize_with = "null_as_default"
    )]
    last_response_time: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    paused: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    tags: Vec<CheckTag>,
}

#[derive(Debug, Deserialize)]
struct CheckTag {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<CheckResponse> for CheckRecord {
    fn from(check: CheckResponse) -> Self {
        Self {
            id: check.id,
            name: check.name,
            hostname: check.hostname,
            resolution: check.resolution,
            paused: check.paused,
            status: check.status,
            last_response_time: check.last_response_time,
            tags: check.tags.into_iter().map(|tag| tag.name).collect(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    statusdesc: String,
    #[serde(default)]
    errormessage: String,
}

/// Pingdom APIクライアント
#[derive(Debug, Clone)]
pub struct PingdomClient {
    /// HTTPクライアント
    client: Client,
    /// APIベースURL（末尾スラッシュなし）
    base_url: String,
    /// 認証情報
    credentials: Credentials,
}

impl PingdomClient {
    /// 新しいクライアントを作成
    ///
    /// リクエストにタイムアウトは設定しない。
    pub fn new(credentials: Credentials, base_url: &str) -> ExporterResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("pingdom-exporter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// マルチアカウントモードかどうか
    pub fn is_multi_account(&self) -> bool {
        self.credentials.is_multi_account()
    }

    fn checks_url(&self) -> String {
        format!("{}{}", self.base_url, CHECKS_PATH)
    }
}

#[async_trait]
impl CheckStatusClient for PingdomClient {
    async fn fetch_checks(&self, include_tags: bool) -> ExporterResult<Vec<CheckRecord>> {
        let mut request = self
            .client
            .get(self.checks_url())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header("App-Key", &self.credentials.api_key)
            .query(&[("include_tags", include_tags.to_string())]);
        if let Some(ref email) = self.credentials.account_email {
            request = request.header("Account-Email", email);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let checks = decode_checks(&body)?;
        debug!(count = checks.len(), "Fetched checks from Pingdom");
        Ok(checks)
    }
}

/// チェック一覧レスポンスをデコード
fn decode_checks(body: &[u8]) -> ExporterResult<Vec<CheckRecord>> {
    let list: CheckListResponse =
        serde_json::from_slice(body).map_err(|e| ExporterError::Decode(e.to_string()))?;
    Ok(list.checks.into_iter().map(CheckRecord::from).collect())
}

/// 非2xxレスポンスをエラーに変換
fn api_error(status: StatusCode, body: &[u8]) -> ExporterError {
    let message = match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(resp) if !resp.error.errormessage.is_empty() => {
            if resp.error.statusdesc.is_empty() {
                resp.error.errormessage
            } else {
                format!("{}: {}", resp.error.statusdesc, resp.error.errormessage)
            }
        }
        _ => {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                text.chars().take(MAX_ERROR_BODY_CHARS).collect()
            }
        }
    };

    ExporterError::Api {
        status: status.as_u16(),
        message,
    }
}
