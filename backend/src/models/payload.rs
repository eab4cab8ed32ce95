//! # 요청 페이로드(Request Payload) 모델
//!
//! 원격 API로 보내는 multipart 본문을 키/값 목록으로 표현합니다.
//! 제출할 때마다 새로 만들고, 보낸 뒤에는 바꾸지 않습니다.
//!
//! reqwest의 `multipart::Form`은 안을 들여다볼 수 없으므로,
//! 컨트롤러는 이 타입으로 본문을 조립하고 게이트웨이가 마지막에 변환합니다.
//! 덕분에 테스트에서 "어떤 키에 어떤 값이 들어갔는지" 바로 확인할 수 있습니다.

use super::SelectedFile;
use serde::Serialize;

/// 본문의 한 부분: 텍스트 값 또는 파일
#[derive(Debug, Clone)]
pub enum PayloadPart {
    Text(String),
    File(SelectedFile),
}

/// 순서가 보존되는 multipart 본문
#[derive(Debug, Clone, Default)]
pub struct MultipartPayload {
    parts: Vec<(String, PayloadPart)>,
}

/// 로그/화면 표시용 요약. 파일 내용은 담지 않습니다.
#[derive(Debug, Serialize)]
pub struct PayloadSummary {
    pub keys: Vec<String>,
    pub file_count: usize,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// 텍스트 항목을 추가합니다.
    pub fn text(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.parts.push((key.into(), PayloadPart::Text(value.into())));
        self
    }

    /// 파일 항목을 추가합니다.
    pub fn file(&mut self, key: impl Into<String>, file: SelectedFile) -> &mut Self {
        self.parts.push((key.into(), PayloadPart::File(file)));
        self
    }

    /// 키에 해당하는 첫 번째 텍스트 값
    pub fn get(&self, key: &str) -> Option<&str> {
        self.parts.iter().find_map(|(k, part)| match part {
            PayloadPart::Text(value) if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// 키에 해당하는 첫 번째 파일
    #[cfg(test)]
    pub fn get_file(&self, key: &str) -> Option<&SelectedFile> {
        self.parts.iter().find_map(|(k, part)| match part {
            PayloadPart::File(file) if k == key => Some(file),
            _ => None,
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.parts.iter().any(|(k, _)| k == key)
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(k, _)| k.as_str())
    }

    pub fn parts(&self) -> &[(String, PayloadPart)] {
        &self.parts
    }

    pub fn summary(&self) -> PayloadSummary {
        PayloadSummary {
            keys: self.keys().map(str::to_string).collect(),
            file_count: self
                .parts
                .iter()
                .filter(|(_, part)| matches!(part, PayloadPart::File(_)))
                .count(),
        }
    }
}
