//! storegate 인증 게이트 및 REST API.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 서명된 토큰 기반의 무상태(stateless) 인증 게이트
//! - 만료 임박 토큰의 슬라이딩 갱신
//! - 세션 조회/로그아웃, 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`auth`]: 토큰 코덱, 인증 게이트 미들웨어, 신원 추출기
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`error`]: 공통 응답 본문

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

pub use auth::{
    auth_gate, AuthRejection, AuthState, Claims, CookiePolicy, CredentialCodec, CurrentUser,
    Identity, OptionalUser,
};
pub use error::{ApiErrorResponse, ApiResponse};
pub use routes::create_api_router;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
