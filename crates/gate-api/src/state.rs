//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 인증 상태(코덱, 쿠키 정책)는 읽기 전용이며 Arc로 래핑되어 요청 간에 공유됩니다.
//! 서버 측 세션 저장소는 없습니다.

use chrono::{DateTime, Utc};

use crate::auth::AuthState;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 인증 게이트 상태
    pub auth: AuthState,

    /// API 버전
    pub version: String,

    /// 서버 시작 시간
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(auth: AuthState) -> Self {
        Self {
            auth,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Utc::now(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 AppState 생성.
///
/// 수동 시계를 사용하는 코덱과 개발용 쿠키 정책을 가집니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state(
    now: i64,
) -> (
    std::sync::Arc<AppState>,
    std::sync::Arc<crate::auth::ManualClock>,
) {
    use crate::auth::{CookiePolicy, CredentialCodec, ManualClock};
    use secrecy::SecretString;
    use std::sync::Arc;

    let clock = Arc::new(ManualClock::new(now));
    let secret = SecretString::new("test-secret-key-for-jwt-testing-minimum-32-chars".into());
    let codec = CredentialCodec::new(&secret, clock.clone());
    let state = AppState::new(AuthState::new(codec, CookiePolicy::default()));

    (Arc::new(state), clock)
}
