//! # 폼 검증 유틸리티
//!
//! 컨트롤러들이 공통으로 쓰는 필수 항목/이메일/숫자/URL 검사 함수입니다.
//! 각 함수는 실패 시 `FieldError`를 목록에 쌓기만 하고,
//! 최종 판정은 `AppError::check()`가 합니다.
//! 이렇게 하면 한 번에 모든 잘못된 항목을 화면에 표시할 수 있습니다.

use crate::error::FieldError;
use regex::Regex;
use std::sync::LazyLock;

// 브라우저 폼 검증기와 같은 규칙의 이메일 정규식.
// regex 크레이트는 lookahead를 지원하지 않으므로 길이 제한은 코드로 검사합니다.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// 이메일 주소 형식이 올바른지 검사합니다.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, _)) = value.split_once('@') else {
        return false;
    };
    value.len() <= 254 && !local.is_empty() && local.len() <= 64 && EMAIL.is_match(value)
}

/// 공백을 제거한 값이 비어 있으면 에러를 추가하고 false를 돌려줍니다.
pub fn require(errors: &mut Vec<FieldError>, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(FieldError::required(field));
        false
    } else {
        true
    }
}

/// 필수 + 이메일 형식 검사
pub fn require_email(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if require(errors, field, value) && !is_valid_email(value.trim()) {
        errors.push(FieldError::new(field, "Enter a valid email address"));
    }
}

/// 양수로 해석되는 문자열인지 검사합니다 (필드 너비/높이).
pub fn require_positive_number(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if !require(errors, field, value) {
        return;
    }
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => {}
        _ => errors.push(FieldError::new(field, "Enter a positive number")),
    }
}

/// http(s) 절대 URL인지 검사합니다.
pub fn require_http_url(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if !require(errors, field, value) {
        return;
    }
    match url::Url::parse(value.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(FieldError::new(field, "Enter an absolute http(s) URL")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(is_valid_email("user@localhost"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "ana", "@example.com", "ana@", "ana@@example.com", "ana @example.com", "ana@-example.com"] {
            assert!(!is_valid_email(bad), "{bad:?} should be rejected");
        }
        let long_local = format!("{}@example.com", "a".repeat(65));
        assert!(!is_valid_email(&long_local));
    }

    #[test]
    fn required_email_reports_one_error_per_field() {
        let mut errors = Vec::new();
        require_email(&mut errors, "email", "  ");
        require_email(&mut errors, "other", "nope");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "This field is required");
        assert_eq!(errors[1].field, "other");
    }

    #[test]
    fn positive_numbers_only() {
        let mut errors = Vec::new();
        require_positive_number(&mut errors, "w", "100");
        require_positive_number(&mut errors, "h", "16.5");
        assert!(errors.is_empty());

        for bad in ["0", "-4", "wide", "NaN", "inf"] {
            let mut errors = Vec::new();
            require_positive_number(&mut errors, "w", bad);
            assert_eq!(errors.len(), 1, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn callback_url_must_be_http() {
        let mut errors = Vec::new();
        require_http_url(&mut errors, "callback_url", "https://example.com/hook");
        assert!(errors.is_empty());

        require_http_url(&mut errors, "callback_url", "ftp://example.com");
        require_http_url(&mut errors, "callback_url", "/relative");
        assert_eq!(errors.len(), 2);
    }
}
