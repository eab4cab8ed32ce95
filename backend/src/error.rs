//! # 에러 처리 모듈
//!
//! 콘솔에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 에러는 세 갈래로 나뉩니다:
//! - 입력 검증 실패 (필수 항목 누락, 이메일 형식 오류): 원격 호출 전에 막힙니다.
//! - 원격 호출 실패 (HTTP 상태 오류, 네트워크 오류): 사용자에게는 불투명한 메시지만 보입니다.
//! - 사전 조건 실패 (파일 미선택 등): 원격 호출 실패와 같은 방식으로 보고됩니다.
//!
//! 어떤 에러도 자동으로 재시도하지 않습니다. 사용자가 다시 제출하면 됩니다.

use crate::services::dropbox_sign::GatewayError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// 입력 폼의 한 항목에 대한 검증 실패
///
/// 화면에서 해당 입력란 옆에 메시지를 표시할 수 있도록
/// 항목 이름과 메시지를 함께 전달합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// 폼 항목 이름 (예: "signer_email")
    pub field: &'static str,
    /// 사람이 읽을 메시지
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// 필수 항목이 비어 있을 때
    pub fn required(field: &'static str) -> Self {
        Self::new(field, "This field is required")
    }
}

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 다이얼로그를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400): 업로드 형식 오류 등
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 폼 검증 실패 (HTTP 400). 네트워크에 도달하지 않습니다.
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// 사전 조건 실패 (HTTP 422). 예: 파일을 선택하지 않음
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// 다이얼로그 상태와 맞지 않는 요청 (HTTP 409)
    /// 제출 중인 다이얼로그를 다시 제출하는 경우 등
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 호출이 끝나기 전에 다이얼로그가 닫힘 (HTTP 410)
    #[error("Dialog was closed before the submission completed")]
    Cancelled,

    /// 원격 전자서명 API 호출 실패 (HTTP 502)
    /// #[from]: GatewayError → AppError::Gateway 자동 변환
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl AppError {
    /// 검증 에러 목록이 비어 있으면 Ok, 아니면 Validation 에러
    pub fn check(errors: Vec<FieldError>) -> Result<(), AppError> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 원격 호출 실패와 내부 에러는 실제 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            // 검증 실패는 항목별 상세 정보를 함께 내려줍니다.
            AppError::Validation(ref errors) => {
                let body = Json(json!({
                    "error": {
                        "code": "validation_failed",
                        "message": self.to_string(),
                        "fields": errors,
                    }
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Precondition(ref msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "precondition_failed",
                msg.clone(),
            ),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Cancelled => (StatusCode::GONE, "cancelled", self.to_string()),
            AppError::Gateway(ref e) => {
                tracing::error!("Gateway error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "gateway_error",
                    "The signature service request failed".to_string(),
                )
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        // 결과: { "error": { "code": "not_found", "message": "Resource not found" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_passes_empty_error_list() {
        assert!(AppError::check(Vec::new()).is_ok());
    }

    #[test]
    fn validation_message_lists_fields() {
        let err = AppError::check(vec![
            FieldError::required("title"),
            FieldError::new("signer_email", "Enter a valid email address"),
        ])
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Validation failed: title: This field is required, signer_email: Enter a valid email address"
        );
    }

    #[test]
    fn status_codes_follow_the_error_kind() {
        let cases = [
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (AppError::Validation(vec![FieldError::required("x")]), StatusCode::BAD_REQUEST),
            (AppError::Precondition("No file selected".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::Conflict("busy".into()), StatusCode::CONFLICT),
            (AppError::Cancelled, StatusCode::GONE),
            (
                AppError::Gateway(GatewayError::Remote { status: 500, error: None }),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
