//! storegate API 서버.
//!
//! 설정을 로드하고 인증 게이트가 적용된 Axum 서버를 시작합니다.

use std::time::Duration;

use axum::http::StatusCode;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use gate_api::auth::{AuthState, CookiePolicy, CredentialCodec};
use gate_api::routes::create_api_router;
use gate_api::state::AppState;
use gate_core::{init_logging, AppConfig, LogConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // 설정 로드
    let config = AppConfig::load()?;

    // tracing 초기화
    init_logging(LogConfig::from(&config.logging))?;

    info!(app_env = ?config.app_env, "Starting storegate API server...");

    // 서명 시크릿: 운영 환경에서 없으면 기동 실패
    let secret = config.jwt_secret().map_err(|e| {
        error!(code = e.code(), error = %e, "JWT 시크릿을 확인하세요.");
        e
    })?;

    let codec = CredentialCodec::with_system_clock(&secret);
    let cookie_policy = CookiePolicy::for_env(config.app_env);
    if !cookie_policy.secure {
        warn!("Auth cookie issued without Secure attribute (non-production)");
    }

    let state = std::sync::Arc::new(AppState::new(AuthState::new(codec, cookie_policy)));
    info!(version = %state.version, "Application state initialized");

    let app = create_api_router(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ));

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        error!(
            addr = %addr,
            error = %e,
            "소켓 바인딩 실패. STOREGATE__SERVER__HOST, STOREGATE__SERVER__PORT를 확인하세요."
        );
        e
    })?;

    info!(%addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
