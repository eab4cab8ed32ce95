//! # 필드 서술자(Field Descriptor) 모델
//!
//! 문서 페이지 위에 놓일 입력 필드 하나(서명, 텍스트, 체크박스 등)를 나타냅니다.
//! PDF 도구에서 "필드 추가"를 누를 때마다 하나씩 만들어지고,
//! 요청을 보내면 `form_fields_per_document`로 직렬화됩니다.

use serde::{Deserialize, Serialize};

/// 원격 API가 받는 필드 종류
///
/// `#[serde(rename = ...)]`: JSON에서 쓰이는 이름을 정확히 맞춥니다.
/// 일부 이름은 하이픈(-)을 포함하므로 rename_all만으로는 표현할 수 없습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[default]
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "checkbox")]
    Checkbox,
    #[serde(rename = "date_signed")]
    DateSigned,
    #[serde(rename = "dropdown")]
    Dropdown,
    #[serde(rename = "initials")]
    Initials,
    #[serde(rename = "signature")]
    Signature,
    /// API가 기본 텍스트를 채우는 필드
    #[serde(rename = "text-merge")]
    TextMerge,
    /// API가 기본 값을 채우는 체크박스
    #[serde(rename = "checkbox-merge")]
    CheckboxMerge,
}

impl FieldType {
    /// 화면의 선택 목록에 쓰는 전체 목록 (순서 유지)
    pub const ALL: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Checkbox,
        FieldType::DateSigned,
        FieldType::Dropdown,
        FieldType::Initials,
        FieldType::Signature,
        FieldType::TextMerge,
        FieldType::CheckboxMerge,
    ];
}

/// 페이지 위 필드 하나
///
/// `x`, `y`는 클릭 당시 렌더링된 페이지 기준 픽셀 좌표입니다.
/// `width`, `height`는 원격 API 형식대로 문자열로 보냅니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// 세션 안에서 유일한 ID ("field1", "field2", ...)
    pub api_id: String,
    /// 필드 이름(자리표시자)
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub x: u32,
    pub y: u32,
    pub width: String,
    pub height: String,
    /// 1부터 시작하는 페이지 번호
    pub page: u32,
    pub required: bool,
    /// 서명자 목록의 인덱스
    pub signer: usize,
}
