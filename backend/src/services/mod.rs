//! # 서비스 계층
//!
//! 라우트 핸들러 아래에서 실제 일을 하는 모듈들입니다.
//!
//! - `dropbox_sign`: 원격 전자서명 API 게이트웨이 (reqwest)
//! - `controllers`: 다이얼로그별 검증과 페이로드 조립
//! - `dialogs`: 다이얼로그 상태 기계와 제출/취소
//! - `field_placement`: PDF 도구의 필드 배치
//! - `validation`: 공통 입력 검증 함수

pub mod controllers;
pub mod dialogs;
pub mod dropbox_sign;
pub mod field_placement;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_gateway;
