//! # Gate Core
//!
//! storegate 서비스의 공통 기반을 제공합니다:
//! - 설정 관리 (기본값, 설정 파일, 환경 변수)
//! - 로깅 인프라
//! - 기동 단계 에러 타입

pub mod config;
pub mod error;
pub mod logging;

pub use config::{
    AppConfig, AppEnv, AuthConfig, LoggingConfig, ServerConfig, DEFAULT_LOG_FILTER,
};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, LogConfig, LogFormat};
