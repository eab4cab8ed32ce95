//! # 필드 배치(Field Placement) 도우미
//!
//! PDF 도구에서 마지막으로 클릭한 위치를 기억하고,
//! "필드 추가" 때마다 필드 서술자를 하나씩 쌓습니다.
//!
//! ## 동작 규칙
//! - 클릭 위치는 하나만 기억합니다 (이력 없음). 클릭이 없으면 `(0, 0)`입니다.
//! - 필드 ID는 세션 안에서 단조 증가합니다: N번째 추가 → `field<N>`.
//! - 필드는 수정/삭제하지 않습니다. 요청을 보내거나 다이얼로그를 닫으면 함께 사라집니다.
//! - 좌표는 페이지 크기와 비교하지 않습니다. 페이지 번호는 문서 페이지 수를 알 때만 검사합니다.

use crate::{
    error::{AppError, FieldError},
    models::{FieldDescriptor, FieldType},
    services::validation,
};
use serde::{Deserialize, Serialize};

/// 마지막 클릭 위치 (렌더링된 페이지 기준 픽셀)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickPosition {
    pub x: u32,
    pub y: u32,
}

/// 새 필드를 만들 때 폼에서 가져오는 값들
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTemplate {
    pub field_type: FieldType,
    pub width: String,
    pub height: String,
    pub placeholder: String,
    pub signer: usize,
}

impl Default for FieldTemplate {
    fn default() -> Self {
        Self {
            field_type: FieldType::Text,
            width: "100".to_string(),
            height: "16".to_string(),
            placeholder: "Placeholder".to_string(),
            signer: 0,
        }
    }
}

/// 필드 배치 작업 공간. PDF 다이얼로그 하나가 독점합니다.
#[derive(Debug, Clone, Serialize)]
pub struct FieldPlacement {
    /// 지금까지 추가한 필드 수 (ID 생성용)
    counter: u32,
    position: ClickPosition,
    current_page: u32,
    /// 불러온 문서의 페이지 수. 모르면 None
    page_count: Option<u32>,
    fields: Vec<FieldDescriptor>,
}

impl Default for FieldPlacement {
    fn default() -> Self {
        Self {
            counter: 0,
            position: ClickPosition::default(),
            current_page: 1,
            page_count: None,
            fields: Vec::new(),
        }
    }
}

impl FieldPlacement {
    /// 클릭 위치를 기록합니다. 이전 위치는 덮어씁니다.
    ///
    /// 브라우저 좌표는 소수일 수 있으므로 반올림하고, 음수는 0으로 맞춥니다.
    pub fn record_click(&mut self, x: f64, y: f64) -> ClickPosition {
        self.position = ClickPosition {
            x: to_pixel(x),
            y: to_pixel(y),
        };
        tracing::debug!(x = self.position.x, y = self.position.y, "Click recorded");
        self.position
    }

    /// 새 문서를 불러왔을 때 호출합니다. 첫 페이지로 돌아갑니다.
    ///
    /// 이미 쌓인 필드는 그대로 둡니다.
    pub fn load_document(&mut self, page_count: Option<u32>) {
        self.page_count = page_count;
        self.current_page = 1;
    }

    /// 현재 페이지를 바꿉니다.
    pub fn set_page(&mut self, page: u32) -> Result<(), AppError> {
        if page == 0 {
            return Err(AppError::Validation(vec![FieldError::new(
                "page",
                "Pages are numbered from 1",
            )]));
        }
        if let Some(count) = self.page_count {
            if page > count {
                return Err(AppError::Validation(vec![FieldError::new(
                    "page",
                    format!("The document has {count} page(s)"),
                )]));
            }
        }
        self.current_page = page;
        Ok(())
    }

    /// 마지막 클릭 위치와 현재 페이지로 필드를 하나 추가합니다.
    ///
    /// 너비/높이가 양수가 아니면 추가하지 않고 카운터도 그대로 둡니다.
    pub fn add_field(&mut self, template: &FieldTemplate) -> Result<FieldDescriptor, AppError> {
        let mut errors = Vec::new();
        validation::require_positive_number(&mut errors, "field_width", &template.width);
        validation::require_positive_number(&mut errors, "field_height", &template.height);
        AppError::check(errors)?;

        self.counter += 1;
        let field = FieldDescriptor {
            api_id: format!("field{}", self.counter),
            name: template.placeholder.clone(),
            field_type: template.field_type,
            x: self.position.x,
            y: self.position.y,
            width: template.width.trim().to_string(),
            height: template.height.trim().to_string(),
            page: self.current_page,
            required: true,
            signer: template.signer,
        };
        self.fields.push(field.clone());
        tracing::debug!(api_id = %field.api_id, page = field.page, "Field added");
        Ok(field)
    }

    pub fn position(&self) -> ClickPosition {
        self.position
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// 문서별 필드 목록. 이 도구는 문서를 하나만 다루므로 항상 한 개입니다.
    pub fn per_document(&self) -> Vec<&[FieldDescriptor]> {
        vec![self.fields.as_slice()]
    }
}

/// `form_fields_per_document` 값으로 보낼 JSON 텍스트를 만듭니다.
///
/// 바깥 배열은 문서 순서, 안쪽 배열은 필드 추가 순서를 그대로 따릅니다.
pub fn serialize(documents: &[&[FieldDescriptor]]) -> Result<String, serde_json::Error> {
    serde_json::to_string(documents)
}

fn to_pixel(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}
