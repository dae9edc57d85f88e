//! 세션 endpoint.
//!
//! - `GET /api/auth/session`: 현재 토큰의 신원 정보 조회 (게이트 안)
//! - `POST /api/auth/logout`: 인증 쿠키 삭제 (게이트 밖)
//!
//! 서버에 세션이 없으므로 로그아웃은 브라우저 쿠키를 지우는 것 외에 하는 일이 없습니다.
//! 이미 발급된 토큰은 만료될 때까지 유효합니다.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{build_clear_cookie, AccountType, CurrentUser};
use crate::error::ApiResponse;
use crate::state::AppState;

/// 현재 세션 응답.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: i64,
    pub name: String,
    pub store_code: String,
    pub is_admin: bool,
    pub account_type: AccountType,
    pub price_list_id: Option<i64>,
    /// 토큰 발급 시각 (Unix timestamp)
    pub issued_at: i64,
    /// 토큰 만료 시각 (Unix timestamp)
    pub expires_at: i64,
}

impl From<&CurrentUser> for SessionResponse {
    fn from(user: &CurrentUser) -> Self {
        let identity = user.identity();
        Self {
            user_id: identity.user_id,
            name: identity.name.clone(),
            store_code: identity.store_code.clone(),
            is_admin: identity.is_admin,
            account_type: identity.account_type,
            price_list_id: identity.price_list_id,
            issued_at: user.iat,
            expires_at: user.exp,
        }
    }
}

/// GET /api/auth/session
pub async fn current_session(user: CurrentUser) -> Json<ApiResponse<SessionResponse>> {
    Json(ApiResponse::ok(SessionResponse::from(&user)))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<Arc<AppState>>) -> Response {
    info!("Auth cookie cleared by logout");

    let mut response = Json(ApiResponse::empty()).into_response();
    if let Ok(clear) = HeaderValue::from_str(&build_clear_cookie(&state.auth.cookie_policy)) {
        response.headers_mut().append(SET_COOKIE, clear);
    }
    response
}
