//! # 데이터 모델 모듈
//!
//! 콘솔에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `dialog`: 다이얼로그 상태와 화면 표시용 뷰
//! - `field`: PDF 페이지 위에 놓이는 필드 서술자
//! - `file`: 사용자가 선택한 문서 파일
//! - `payload`: 원격 API로 보내는 multipart 본문
//! - `remote`: 원격 API 응답 스키마
//! - `signer`: 서명자
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Signer`처럼 짧게 접근합니다.

pub mod dialog;
pub mod field;
pub mod file;
pub mod payload;
pub mod remote;
pub mod signer;

pub use dialog::*;
pub use field::*;
pub use file::*;
pub use payload::*;
pub use remote::*;
pub use signer::*;
