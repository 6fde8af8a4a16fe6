//! server サブコマンド
//!
//! ポーラーとHTTPサーバーを起動します。

use std::sync::Arc;

use clap::Args;
use tracing::info;

use crate::config::{Credentials, ExporterConfig, DEFAULT_API_URL, DEFAULT_PORT, DEFAULT_WAIT_SECS};
use crate::error::ExporterResult;
use crate::metrics::PrometheusSink;
use crate::pingdom::PingdomClient;
use crate::poller::Poller;
use crate::shutdown::ShutdownWatcher;
use crate::{server, AppState};

/// server サブコマンドの引数
#[derive(Args, Debug, Clone)]
#[command(
    override_usage = "pingdom-exporter server [OPTIONS] <USERNAME> <PASSWORD> <API_KEY> [ACCOUNT_EMAIL]"
)]
pub struct ServerArgs {
    /// Pingdom credentials: username, password, api-key and optionally the
    /// account email (multi-account mode)
    #[arg(value_name = "CREDENTIALS")]
    pub credentials: Vec<String>,

    /// Time (in seconds) between accessing the Pingdom API
    #[arg(long, default_value_t = DEFAULT_WAIT_SECS, env = "PINGDOM_EXPORTER_WAIT")]
    pub wait: u64,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PINGDOM_EXPORTER_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "PINGDOM_EXPORTER_HOST")]
    pub host: String,

    /// Pingdom API base URL
    #[arg(long, default_value = DEFAULT_API_URL, env = "PINGDOM_API_URL")]
    pub api_url: String,
}

impl ServerArgs {
    /// 位置引数から認証情報を作成（3個または4個以外はUsageエラー）
    pub fn credentials(&self) -> ExporterResult<Credentials> {
        Credentials::from_positionals(&self.credentials)
    }

    /// 実行時設定を作成
    pub fn config(&self) -> ExporterResult<ExporterConfig> {
        ExporterConfig::new(
            self.host.clone(),
            self.port,
            self.wait,
            self.api_url.clone(),
        )
    }
}

/// server コマンドを実行
///
/// ロギングはこの関数の中で初期化する。正常時はシグナルでプロセスが終了するまで戻らない。
pub async fn execute(args: &ServerArgs) -> ExporterResult<()> {
    let credentials = args.credentials()?;
    let config = args.config()?;

    crate::logging::init()?;

    let client = PingdomClient::new(credentials, &config.api_url)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        multi_account = client.is_multi_account(),
        wait_secs = config.wait_secs,
        "Starting Pingdom exporter"
    );
    let sink = Arc::new(PrometheusSink::new()?);

    ShutdownWatcher::install()?.spawn();

    Poller::new(Arc::new(client), sink.clone())
        .with_interval(config.poll_interval())
        .start();

    server::run(AppState { sink }, &config.bind_addr()).await
}
