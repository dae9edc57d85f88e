//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (공개)
//! - `/api/auth/logout` - 인증 쿠키 삭제 (공개)
//! - `/api/auth/session` - 현재 세션 조회 (인증 게이트 적용)

pub mod health;
pub mod session;

pub use health::{health_check, HealthResponse};
pub use session::{current_session, logout, SessionResponse};

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::auth_gate;
use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 보호된 라우트에는 `route_layer`로 인증 게이트를 적용하므로 매칭되지 않는
/// 경로는 게이트를 거치지 않고 404가 됩니다.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/api/auth/session", get(current_session))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_gate,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/logout", post(logout))
        .merge(protected)
        .with_state(state)
}
