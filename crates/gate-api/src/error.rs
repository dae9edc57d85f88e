//! 통합 API 응답 타입.
//!
//! 모든 엔드포인트는 `success` 필드를 가진 JSON 본문을 반환합니다.
//!
//! ```json
//! { "success": false, "message": "인증이 필요합니다" }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// 에러 응답 본문.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 항상 `false`
    pub success: bool,
    /// 사용자에게 보여줄 메시지
    pub message: String,
}

impl ApiErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// 상태 코드와 함께 응답으로 변환.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// 성공 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 항상 `true`
    pub success: bool,
    /// 응답 데이터
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// 데이터 없는 성공 응답.
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ApiErrorResponse::new("nope")).unwrap();
        assert_eq!(body, serde_json::json!({ "success": false, "message": "nope" }));
    }

    #[test]
    fn test_success_body_shape() {
        let body = serde_json::to_value(ApiResponse::ok(1)).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "data": 1 }));

        let empty = serde_json::to_value(ApiResponse::empty()).unwrap();
        assert_eq!(empty, serde_json::json!({ "success": true }));
    }

    #[test]
    fn test_with_status() {
        let response = ApiErrorResponse::new("x").with_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
