//! 인증.
//!
//! 서버 측 세션 없이 서명된 토큰만으로 요청을 인증합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`], [`Identity`]: 토큰 페이로드
//! - [`CredentialCodec`]: 토큰 발급/검증 (HS256, 24시간 수명)
//! - [`auth_gate`]: 요청 단위 인증 미들웨어 (슬라이딩 갱신 포함)
//! - [`CurrentUser`], [`OptionalUser`]: 핸들러용 신원 정보 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! let state = AuthState::new(CredentialCodec::with_system_clock(&secret), CookiePolicy::default());
//!
//! let app = Router::new()
//!     .route("/api/orders", get(list_orders))
//!     .route_layer(middleware::from_fn_with_state(state, auth_gate));
//!
//! async fn list_orders(user: CurrentUser) -> impl IntoResponse {
//!     format!("orders for store {}", user.store_code())
//! }
//! ```

mod claims;
mod clock;
mod codec;
mod cookie;
mod middleware;

pub use claims::{AccountType, Claims, Identity};
#[cfg(any(test, feature = "test-utils"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use codec::{CodecError, CredentialCodec, VerificationError, TOKEN_TTL_SECS};
pub use cookie::{
    build_auth_cookie, build_clear_cookie, read_cookie, CookiePolicy, AUTH_COOKIE_NAME,
    NEW_TOKEN_HEADER,
};
pub use middleware::{
    auth_gate, extract_token, AuthRejection, AuthState, CurrentUser, OptionalUser, TokenSource,
    REFRESH_THRESHOLD_SECS, UNAUTHORIZED_MESSAGE,
};
