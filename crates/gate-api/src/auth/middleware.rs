//! Axum용 인증 게이트 미들웨어.
//!
//! 모든 보호된 요청에 대해 다음 순서로 동작합니다:
//!
//! 1. `authToken` 쿠키, 없으면 `Authorization: Bearer` 헤더에서 토큰 추출
//! 2. [`CredentialCodec::verify`]로 검증. 실패 시 쿠키를 지우고 401 응답
//! 3. 디코딩된 Claims를 [`CurrentUser`]로 요청 extensions에 첨부
//! 4. 만료까지 1시간 미만이면 같은 신원으로 토큰을 재발급해 쿠키와
//!    `X-New-Token` 헤더로 전달 (실패해도 요청은 계속 진행)
//! 5. 다음 핸들러로 전달. 성공 시 게이트는 본문을 쓰지 않습니다.

use std::convert::Infallible;
use std::ops::Deref;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        header::{AUTHORIZATION, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, info, warn};

use super::codec::{CredentialCodec, VerificationError};
use super::cookie::{
    build_auth_cookie, build_clear_cookie, read_cookie, CookiePolicy, AUTH_COOKIE_NAME,
    NEW_TOKEN_HEADER,
};
use super::{Claims, Identity};
use crate::error::ApiErrorResponse;

/// 남은 유효 시간이 이 값(초) 미만이면 토큰을 재발급합니다.
pub const REFRESH_THRESHOLD_SECS: i64 = 60 * 60;

/// 모든 인증 실패에 공통으로 사용하는 사용자 메시지.
pub const UNAUTHORIZED_MESSAGE: &str = "인증이 필요합니다. 다시 로그인해 주세요.";

/// 인증 거부 사유.
///
/// 로그에는 사유별로 기록되지만 응답은 항상 동일한 401입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    #[error("인증 토큰이 필요합니다")]
    MissingToken,
    #[error("디코딩할 수 없는 토큰")]
    Malformed,
    #[error("서명이 유효하지 않은 토큰")]
    SignatureInvalid,
    #[error("토큰이 만료되었습니다")]
    Expired,
}

impl AuthRejection {
    /// 로그용 사유 코드.
    pub fn code(&self) -> &'static str {
        match self {
            AuthRejection::MissingToken => "MISSING_TOKEN",
            AuthRejection::Malformed => "MALFORMED",
            AuthRejection::SignatureInvalid => "SIGNATURE_INVALID",
            AuthRejection::Expired => "EXPIRED",
        }
    }
}

impl From<VerificationError> for AuthRejection {
    fn from(error: VerificationError) -> Self {
        match error {
            VerificationError::Malformed => AuthRejection::Malformed,
            VerificationError::SignatureInvalid => AuthRejection::SignatureInvalid,
            VerificationError::Expired => AuthRejection::Expired,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        ApiErrorResponse::new(UNAUTHORIZED_MESSAGE).with_status(StatusCode::UNAUTHORIZED)
    }
}

/// 게이트 미들웨어 상태.
///
/// 읽기 전용 코덱과 쿠키 정책만 담고 있어 요청 간 공유 시 잠금이 필요 없습니다.
#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<CredentialCodec>,
    pub cookie_policy: CookiePolicy,
}

impl AuthState {
    pub fn new(codec: CredentialCodec, cookie_policy: CookiePolicy) -> Self {
        Self {
            codec: Arc::new(codec),
            cookie_policy,
        }
    }
}

/// 토큰 출처.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Cookie,
    Header,
}

/// 요청 헤더에서 토큰 추출.
///
/// 쿠키가 있으면 `Authorization` 헤더는 보지 않습니다. 빈 값은 없는 것으로 취급합니다.
pub fn extract_token(headers: &HeaderMap) -> Result<(&str, TokenSource), AuthRejection> {
    if let Some(token) = read_cookie(headers, AUTH_COOKIE_NAME).filter(|t| !t.is_empty()) {
        return Ok((token, TokenSource::Cookie));
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| (t, TokenSource::Header))
        .ok_or(AuthRejection::MissingToken)
}

/// `Bearer <token>` 값에서 토큰 부분 추출. 스킴 이름은 대소문자를 구분하지 않습니다.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token)
}

/// 응답에 실을 재발급 토큰.
#[derive(Debug)]
struct ReissuedCredential {
    set_cookie: HeaderValue,
    new_token: HeaderValue,
}

/// 만료 임박 시 토큰 재발급.
///
/// 이미 검증된 Claims의 신원 정보를 그대로 다시 서명할 뿐 저장소에서 다시
/// 조회하지 않습니다. 실패는 로그만 남기고 `None`을 반환합니다.
fn maybe_reissue(state: &AuthState, claims: &Claims) -> Option<ReissuedCredential> {
    let remaining = state.codec.time_until_expiry(claims);
    if remaining >= REFRESH_THRESHOLD_SECS {
        return None;
    }

    let token = match state.codec.issue(&claims.identity) {
        Ok(token) => token,
        Err(e) => {
            warn!(
                user_id = claims.user_id(),
                error = %e,
                "Credential refresh failed, continuing with current credential"
            );
            return None;
        }
    };

    let set_cookie = HeaderValue::from_str(&build_auth_cookie(&token, &state.cookie_policy));
    let new_token = HeaderValue::from_str(&token);
    match (set_cookie, new_token) {
        (Ok(set_cookie), Ok(new_token)) => {
            debug!(
                user_id = claims.user_id(),
                remaining_secs = remaining,
                "Credential refreshed"
            );
            Some(ReissuedCredential {
                set_cookie,
                new_token,
            })
        }
        _ => {
            warn!(
                user_id = claims.user_id(),
                "Refreshed credential is not a valid header value, skipping refresh"
            );
            None
        }
    }
}

/// 거부 응답 생성. 브라우저가 같은 토큰을 다시 보내지 않도록 쿠키를 지웁니다.
fn reject(rejection: AuthRejection, policy: &CookiePolicy) -> Response {
    let mut response = rejection.into_response();
    if let Ok(clear) = HeaderValue::from_str(&build_clear_cookie(policy)) {
        response.headers_mut().append(SET_COOKIE, clear);
    }
    response
}

/// 인증 게이트 미들웨어 함수.
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/api/auth/session", get(current_session))
///     .route_layer(middleware::from_fn_with_state(auth_state, auth_gate));
/// ```
pub async fn auth_gate(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    let (token, source) = match extract_token(request.headers()) {
        Ok((token, source)) => (token.to_owned(), source),
        Err(rejection) => {
            debug!(path = %path, reason = rejection.code(), "Request rejected");
            return reject(rejection, &state.cookie_policy);
        }
    };

    let claims = match state.codec.verify(&token) {
        Ok(claims) => claims,
        Err(e) => {
            let rejection = AuthRejection::from(e);
            match e {
                VerificationError::Expired => {
                    info!(path = %path, source = ?source, reason = rejection.code(), "Request rejected")
                }
                _ => {
                    warn!(path = %path, source = ?source, reason = rejection.code(), "Request rejected")
                }
            }
            return reject(rejection, &state.cookie_policy);
        }
    };

    let reissued = maybe_reissue(&state, &claims);
    request.extensions_mut().insert(CurrentUser(claims));

    let mut response = next.run(request).await;

    if let Some(reissued) = reissued {
        let headers = response.headers_mut();
        headers.append(SET_COOKIE, reissued.set_cookie);
        headers.insert(NEW_TOKEN_HEADER, reissued.new_token);
    }

    response
}

/// 인증된 요청의 신원 정보 추출기.
///
/// 게이트가 첨부한 Claims를 읽기 전용으로 제공합니다. 게이트 밖에서 사용하면
/// 항상 401로 거부됩니다.
///
/// ```rust,ignore
/// async fn handler(user: CurrentUser) -> String {
///     format!("{} @ {}", user.identity().name, user.store_code())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(Claims);

impl CurrentUser {
    pub fn claims(&self) -> &Claims {
        &self.0
    }

    pub fn identity(&self) -> &Identity {
        &self.0.identity
    }
}

impl Deref for CurrentUser {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthRejection::MissingToken)
    }
}

/// 선택적 신원 정보 추출기.
///
/// 게이트 안팎에 모두 마운트되는 핸들러에서 사용합니다. 거부하지 않습니다.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<Claims>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(
            parts.extensions.get::<CurrentUser>().map(|u| u.0.clone()),
        ))
    }
}
