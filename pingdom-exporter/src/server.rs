//! axumサーバー起動
//!
//! `/` と `/metrics` だけを公開する。認証・TLS・圧縮はなし。

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::{error, info};

use crate::error::ExporterResult;
use crate::AppState;

/// ルーターを作成
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// GET / - 空の200（死活監視用）
async fn root() -> StatusCode {
    StatusCode::OK
}

/// GET /metrics - 現在のメトリクスを返す
///
/// 描画に失敗しても200（本文は空）を返す。
async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = match state.sink.render() {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            String::new()
        }
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, state.sink.content_type())],
        body,
    )
}

/// axumサーバーを起動する
///
/// バインドに失敗した場合はエラーを返す。正常時はプロセス終了まで戻らない。
pub async fn run(state: AppState, bind_addr: &str) -> ExporterResult<()> {
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    info!("Listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
