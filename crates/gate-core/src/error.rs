//! storegate 공통 에러 타입.
//!
//! 설정 로드 및 로깅 초기화 등 서비스 기동 단계에서 발생하는 에러를 정의합니다.
//! 요청 단위의 인증 에러는 `gate-api` 크레이트의 `auth` 모듈에서 다룹니다.

use thiserror::Error;

/// 기동 단계 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 파일/환경 변수 파싱 실패
    #[error("설정 에러: {0}")]
    Config(#[from] config::ConfigError),

    /// 운영 환경에서 서명 시크릿이 설정되지 않음
    #[error("운영 환경에서는 JWT 시크릿이 반드시 설정되어야 합니다 (JWT_SECRET 또는 STOREGATE__AUTH__JWT_SECRET)")]
    MissingSecret,

    /// 로깅 초기화 실패
    #[error("로깅 초기화 에러: {0}")]
    Logging(String),
}

impl CoreError {
    /// 에러 카테고리 코드 반환 (로그 필드용).
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Config(_) => "CONFIG_ERROR",
            CoreError::MissingSecret => "MISSING_SECRET",
            CoreError::Logging(_) => "LOGGING_ERROR",
        }
    }
}

/// 기동 단계 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;
