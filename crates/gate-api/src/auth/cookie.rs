//! 인증 쿠키 처리.
//!
//! `authToken` 쿠키의 생성/삭제 헤더 값을 만들고 요청의 `Cookie` 헤더에서
//! 값을 읽습니다.

use axum::http::{header::COOKIE, HeaderMap, HeaderName};
use gate_core::AppEnv;

use super::codec::TOKEN_TTL_SECS;

/// 인증 토큰 쿠키 이름.
pub const AUTH_COOKIE_NAME: &str = "authToken";

/// 갱신된 토큰을 전달하는 응답 헤더 (쿠키를 쓰지 않는 클라이언트용).
pub const NEW_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-new-token");

/// 쿠키 속성 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    /// `Secure` 속성 부여 여부 (운영 환경)
    pub secure: bool,
    /// `Max-Age` (초)
    pub max_age_secs: i64,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self {
            secure: false,
            max_age_secs: TOKEN_TTL_SECS,
        }
    }
}

impl CookiePolicy {
    /// 실행 환경에 맞는 정책 생성.
    pub fn for_env(env: AppEnv) -> Self {
        Self {
            secure: env.is_production(),
            ..Default::default()
        }
    }

    fn attributes(&self, max_age: i64) -> String {
        let mut attrs = format!("Path=/; Max-Age={}; HttpOnly", max_age);
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs.push_str("; SameSite=Strict");
        attrs
    }
}

/// 토큰을 담는 `Set-Cookie` 값 생성.
pub fn build_auth_cookie(token: &str, policy: &CookiePolicy) -> String {
    format!(
        "{}={}; {}",
        AUTH_COOKIE_NAME,
        token,
        policy.attributes(policy.max_age_secs)
    )
}

/// 브라우저에 저장된 토큰을 지우는 `Set-Cookie` 값 생성.
///
/// 브라우저가 같은 쿠키로 인식하도록 Path/SameSite/Secure 속성을 동일하게 유지합니다.
pub fn build_clear_cookie(policy: &CookiePolicy) -> String {
    format!("{}=; {}", AUTH_COOKIE_NAME, policy.attributes(0))
}

/// 요청 헤더에서 이름이 `name`인 쿠키 값을 찾습니다.
///
/// 여러 `Cookie` 헤더가 있으면 순서대로 검색하며 첫 번째로 일치하는 값을 반환합니다.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_build_auth_cookie_development() {
        let cookie = build_auth_cookie("abc.def.ghi", &CookiePolicy::for_env(AppEnv::Development));
        assert_eq!(
            cookie,
            "authToken=abc.def.ghi; Path=/; Max-Age=86400; HttpOnly; SameSite=Strict"
        );
    }

    #[test]
    fn test_build_auth_cookie_production_is_secure() {
        let cookie = build_auth_cookie("t", &CookiePolicy::for_env(AppEnv::Production));
        assert_eq!(
            cookie,
            "authToken=t; Path=/; Max-Age=86400; HttpOnly; Secure; SameSite=Strict"
        );
    }

    #[test]
    fn test_build_clear_cookie() {
        let cookie = build_clear_cookie(&CookiePolicy::default());
        assert_eq!(cookie, "authToken=; Path=/; Max-Age=0; HttpOnly; SameSite=Strict");
    }

    #[test]
    fn test_read_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; authToken=tok123"));
        headers.append(COOKIE, HeaderValue::from_static("authToken=second"));

        assert_eq!(read_cookie(&headers, AUTH_COOKIE_NAME), Some("tok123"));
        assert_eq!(read_cookie(&headers, "theme"), Some("dark"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_read_cookie_does_not_match_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("xauthToken=nope"));
        assert_eq!(read_cookie(&headers, AUTH_COOKIE_NAME), None);
    }
}
