//! Pingdomポーラー
//!
//! 一定間隔でチェック一覧を取得し、メトリクスに反映する。
//!
//! - 取得失敗: `pingdom_up` を 0 にしてログを出すだけ。チェックごとの系列は前回値のまま残す
//! - 取得成功: `pingdom_up` を 1 にして全チェックの系列を更新する
//!
//! 失敗時も同じ間隔で再試行する（バックオフなし、回数上限なし）。

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::ExporterResult;
use crate::mapper::map_check;
use crate::metrics::{GaugeSeries, HistogramSeries, MetricSink};
use crate::pingdom::CheckStatusClient;

/// デフォルトのポーリング間隔（秒）
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Pingdomポーラー
#[derive(Clone)]
pub struct Poller {
    /// チェック取得元
    client: Arc<dyn CheckStatusClient>,
    /// メトリクス書き込み先
    sink: Arc<dyn MetricSink>,
    /// ポーリング間隔
    interval: Duration,
}

impl Poller {
    /// 新しいポーラーを作成
    pub fn new(client: Arc<dyn CheckStatusClient>, sink: Arc<dyn MetricSink>) -> Self {
        Self {
            client,
            sink,
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    /// ポーリング間隔を設定
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// ポーリング間隔
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// バックグラウンドでポーリングを開始
    ///
    /// ループはプロセス終了まで止まらない。
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.poll_loop().await;
        })
    }

    async fn poll_loop(&self) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Pingdom poller started"
        );

        loop {
            // エラーは poll_once 内でログ済み
            let _ = self.poll_once().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// 1サイクル分のポーリング
    ///
    /// 成功時は公開したチェック数を返す。
    pub async fn poll_once(&self) -> ExporterResult<usize> {
        let checks = match self.client.fetch_checks(true).await {
            Ok(checks) => checks,
            Err(e) => {
                error!(error = %e, "Error getting checks");
                self.set_up(false);
                return Err(e);
            }
        };
        self.set_up(true);

        let mut published = 0;
        for check in &checks {
            let mapped = map_check(check);
            let labels = mapped.labels.values();

            let result = self
                .sink
                .set_gauge(GaugeSeries::CheckStatus, &labels, mapped.status_code)
                .and_then(|_| {
                    self.sink.set_gauge(
                        GaugeSeries::CheckResponseTime,
                        &labels,
                        mapped.response_time_ms,
                    )
                })
                .and_then(|_| {
                    self.sink.observe(
                        HistogramSeries::CheckResponseTime,
                        &labels,
                        mapped.response_time_ms,
                    )
                })
                .and_then(|_| {
                    self.sink
                        .observe(HistogramSeries::CheckStatus, &labels, mapped.up_down)
                });

            match result {
                Ok(()) => published += 1,
                Err(e) => warn!(
                    check_id = check.id,
                    check_name = %check.name,
                    error = %e,
                    "Failed to publish check metrics"
                ),
            }
        }

        debug!(
            count = checks.len(),
            published = published,
            "Poll cycle completed"
        );
        Ok(published)
    }

    fn set_up(&self, up: bool) {
        let value = if up { 1.0 } else { 0.0 };
        if let Err(e) = self.sink.set_gauge(GaugeSeries::Up, &[], value) {
            warn!(error = %e, "Failed to update pingdom_up");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExporterError;
    use crate::metrics::PrometheusSink;
    use crate::types::CheckRecord;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 事前に用意した結果を順に返すクライアント（尽きたら最後の結果を繰り返す）
    struct ScriptedClient {
        responses: Mutex<VecDeque<ExporterResult<Vec<CheckRecord>>>>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(responses: Vec<ExporterResult<Vec<CheckRecord>>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CheckStatusClient for ScriptedClient {
        async fn fetch_checks(&self, include_tags: bool) -> ExporterResult<Vec<CheckRecord>> {
            assert!(include_tags);
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            match responses.pop_front() {
                Some(Ok(checks)) => Ok(checks),
                Some(Err(e)) => Err(e),
                None => Ok(Vec::new()),
            }
        }
    }

    fn site_check(status: &str, response_time: i64) -> CheckRecord {
        CheckRecord {
            id: 42,
            name: "site".to_string(),
            hostname: "x.com".to_string(),
            resolution: 5,
            paused: false,
            status: status.to_string(),
            last_response_time: response_time,
            tags: vec!["prod".to_string()],
        }
    }

    fn fetch_error() -> ExporterError {
        ExporterError::Http("connection refused".to_string())
    }

    fn sample(text: &str, prefix: &str) -> Option<String> {
        text.lines()
            .find(|line| line.starts_with(prefix))
            .and_then(|line| line.rsplit(' ').next())
            .map(|value| value.to_string())
    }

    const STATUS_PREFIX: &str = "pingdom_check_status{hostname=\"x.com\",id=\"42\",name=\"site\",paused=\"false\",resolution=\"5\",tags=\"prod\"}";
    const RESPONSE_PREFIX: &str = "pingdom_check_response_time{hostname=\"x.com\",id=\"42\",name=\"site\",paused=\"false\",resolution=\"5\",tags=\"prod\"}";

    #[test]
    fn test_poller_default_interval() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        let sink = Arc::new(PrometheusSink::new().unwrap());
        let poller = Poller::new(client, sink);
        assert_eq!(poller.interval(), Duration::from_secs(10));

        let poller = poller.with_interval(Duration::from_secs(60));
        assert_eq!(poller.interval(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_successful_cycle_publishes_checks() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(vec![site_check("down", 733)])]));
        let sink = Arc::new(PrometheusSink::new().unwrap());
        let poller = Poller::new(client, sink.clone());

        assert_eq!(poller.poll_once().await.unwrap(), 1);

        let text = sink.render().unwrap();
        assert!(text.lines().any(|line| line == "pingdom_up 1"));
        assert_eq!(sample(&text, STATUS_PREFIX).as_deref(), Some("2"));
        assert_eq!(sample(&text, RESPONSE_PREFIX).as_deref(), Some("733"));
    }

    #[tokio::test]
    async fn test_failed_cycle_keeps_previous_values() {
        let client = Arc::new(ScriptedClient::new(vec![
            Ok(vec![site_check("up", 120)]),
            Err(fetch_error()),
            Ok(vec![site_check("unconfirmed_down", 900)]),
        ]));
        let sink = Arc::new(PrometheusSink::new().unwrap());
        let poller = Poller::new(client, sink.clone());

        poller.poll_once().await.unwrap();
        let text = sink.render().unwrap();
        assert!(text.lines().any(|line| line == "pingdom_up 1"));
        assert_eq!(sample(&text, STATUS_PREFIX).as_deref(), Some("0"));

        assert!(poller.poll_once().await.is_err());
        let text = sink.render().unwrap();
        assert!(text.lines().any(|line| line == "pingdom_up 0"));
        assert_eq!(sample(&text, STATUS_PREFIX).as_deref(), Some("0"));
        assert_eq!(sample(&text, RESPONSE_PREFIX).as_deref(), Some("120"));

        poller.poll_once().await.unwrap();
        let text = sink.render().unwrap();
        assert!(text.lines().any(|line| line == "pingdom_up 1"));
        assert_eq!(sample(&text, STATUS_PREFIX).as_deref(), Some("1"));
        assert_eq!(sample(&text, RESPONSE_PREFIX).as_deref(), Some("900"));
    }

    #[tokio::test]
    async fn test_empty_check_list_still_marks_up() {
        let client = Arc::new(ScriptedClient::new(vec![Err(fetch_error()), Ok(vec![])]));
        let sink = Arc::new(PrometheusSink::new().unwrap());
        let poller = Poller::new(client, sink.clone());

        assert!(poller.poll_once().await.is_err());
        assert_eq!(poller.poll_once().await.unwrap(), 0);

        let text = sink.render().unwrap();
        assert!(text.lines().any(|line| line == "pingdom_up 1"));
        assert!(!text.contains("pingdom_check_status{"));
    }

    #[tokio::test]
    async fn test_unknown_status_is_published_with_sentinel() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(vec![site_check(
            "maintenance",
            0,
        )])]));
        let sink = Arc::new(PrometheusSink::new().unwrap());
        let poller = Poller::new(client, sink.clone());

        assert_eq!(poller.poll_once().await.unwrap(), 1);
        let text = sink.render().unwrap();
        assert_eq!(sample(&text, STATUS_PREFIX).as_deref(), Some("100"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_retries_at_fixed_interval() {
        let client = Arc::new(ScriptedClient::new(vec![
            Err(fetch_error()),
            Err(fetch_error()),
            Ok(vec![site_check("up", 50)]),
        ]));
        let sink = Arc::new(PrometheusSink::new().unwrap());
        let handle = Poller::new(client.clone(), sink.clone())
            .with_interval(Duration::from_secs(10))
            .start();

        // 起動直後に1回目、その後10秒ごと
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert!(sink.render().unwrap().contains("pingdom_up 0"));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
        assert!(sink.render().unwrap().contains("pingdom_up 1"));

        handle.abort();
    }
}
