//! 설정 관리.
//!
//! 기본값 → `config/default.toml`(선택) → 환경 변수 순서로 설정을 병합합니다.
//!
//! # 환경 변수
//!
//! - `STOREGATE__SERVER__HOST`, `STOREGATE__SERVER__PORT`: 바인딩 주소
//! - `STOREGATE__AUTH__JWT_SECRET` 또는 `JWT_SECRET`: 토큰 서명 시크릿
//! - `STOREGATE__APP_ENV` 또는 `APP_ENV`: `development` | `production`
//! - `STOREGATE__LOGGING__LEVEL`, `STOREGATE__LOGGING__FORMAT`: 로깅 설정

use std::path::Path;

use config::builder::DefaultState;
use config::{ConfigBuilder, FileFormat};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::error::{CoreError, CoreResult};

/// 개발 환경 전용 기본 시크릿. 운영 환경에서는 절대 사용되지 않습니다.
pub const DEV_FALLBACK_SECRET: &str = "storegate-dev-secret-change-in-production";

/// 기본 로그 필터. 바이너리와 모든 워크스페이스 크레이트를 포함합니다.
pub const DEFAULT_LOG_FILTER: &str = "storegate=info,gate_api=info,gate_core=info,tower_http=info";

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 하위 호환 환경 변수: (변수명, 대응하는 `STOREGATE__` 변수명, 설정 키).
const LEGACY_ENV_VARS: [(&str, &str, &str); 2] = [
    ("JWT_SECRET", "STOREGATE__AUTH__JWT_SECRET", "auth.jwt_secret"),
    ("APP_ENV", "STOREGATE__APP_ENV", "app_env"),
];

/// 실행 환경.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    /// 개발 환경 (기본값)
    #[default]
    Development,
    /// 운영 환경 - Secure 쿠키, 시크릿 필수
    Production,
}

impl AppEnv {
    /// 운영 환경 여부.
    pub fn is_production(&self) -> bool {
        matches!(self, AppEnv::Production)
    }
}

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 실행 환경
    #[serde(default)]
    pub app_env: AppEnv,
    /// 서버 설정
    pub server: ServerConfig,
    /// 인증 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// `host:port` 형식의 바인딩 주소.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 인증 설정.
#[derive(Debug, Default, Deserialize)]
pub struct AuthConfig {
    /// 토큰 서명 시크릿
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub jwt_secret: Option<SecretString>,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨 필터
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_FILTER.to_string(),
            format: "pretty".to_string(),
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .map(|s| SecretString::new(s.into_boxed_str())))
}

impl AppConfig {
    /// 기본값만 채워진 빌더.
    fn base_builder() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        let server = ServerConfig::default();
        let logging = LoggingConfig::default();

        config::Config::builder()
            .set_default("app_env", "development")?
            .set_default("server.host", server.host)?
            .set_default("server.port", server.port as i64)?
            .set_default("logging.level", logging.level)?
            .set_default("logging.format", logging.format)
    }

    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 무시합니다. 우선순위(높은 순): `STOREGATE__*` 변수,
    /// `JWT_SECRET`/`APP_ENV`, 설정 파일, 기본값.
    pub fn load_from<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let mut builder = Self::base_builder()?
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("STOREGATE")
                    .separator("__")
                    .try_parsing(true),
            );

        // 하위 호환 변수는 STOREGATE__ 변수가 없을 때만 파일 값을 덮어씁니다.
        for (legacy, prefixed, key) in LEGACY_ENV_VARS {
            if std::env::var_os(prefixed).is_some() {
                continue;
            }
            if let Ok(value) = std::env::var(legacy) {
                let value = if key == "app_env" {
                    value.to_lowercase()
                } else {
                    value
                };
                builder = builder.set_override(key, value)?;
            }
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load() -> CoreResult<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// TOML 문자열에서 설정을 로드합니다. 환경 변수는 읽지 않습니다.
    pub fn from_toml_str(contents: &str) -> CoreResult<Self> {
        let config = Self::base_builder()?
            .add_source(config::File::from_str(contents, FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// 서명 시크릿 결정.
    ///
    /// 설정되지 않은 경우 개발 환경에서는 [`DEV_FALLBACK_SECRET`]을 경고와 함께
    /// 사용하고, 운영 환경에서는 [`CoreError::MissingSecret`]을 반환합니다.
    pub fn jwt_secret(&self) -> CoreResult<SecretString> {
        match (&self.auth.jwt_secret, self.app_env) {
            (Some(secret), _) => Ok(SecretString::new(secret.expose_secret().into())),
            (None, AppEnv::Production) => Err(CoreError::MissingSecret),
            (None, AppEnv::Development) => {
                tracing::warn!("JWT secret not set, using development default (INSECURE)");
                Ok(SecretString::new(DEV_FALLBACK_SECRET.into()))
            }
        }
    }
}
