//! # 원격 응답(Remote Response) 모델
//!
//! 원격 전자서명 API가 돌려주는 JSON을 엔드포인트별 스키마로 디코딩합니다.
//! 콘솔은 응답을 가공하지 않고 그대로 보여주므로,
//! 알려진 필드만 타입으로 꺼내고 나머지는 `extra`(flatten)에 그대로 남겨둡니다.
//!
//! ## 응답 종류
//! - `AccountResponse`: 계정 조회/생성/검증/수정
//! - `SignatureRequestResponse`: 서명 요청 생성/조회/수정
//! - `SignatureRequestListResponse`: 서명 요청 목록
//! - `DataUriResponse`, `FileUrlResponse`: 파일 다운로드 (data URI / 임시 URL)
//! - `EmbeddedSignUrlResponse`, `EmbeddedEditUrlResponse`: 임베디드 URL
//! - `RemoteErrorEnvelope`: 실패 응답 본문 `{ "error": { ... } }`

use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 응답에 붙어 오는 경고
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub warning_msg: String,
    pub warning_name: String,
}

/// 실패 응답 본문의 `error` 객체
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteError {
    pub error_msg: String,
    pub error_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoteErrorEnvelope {
    pub error: RemoteError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub callback_url: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    /// 검증(verify) 응답은 계정이 없으면 비어 있을 수 있습니다.
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

/// 서명 요청 안의 서명 한 건 (서명자별)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signature {
    pub signature_id: String,
    #[serde(default)]
    pub signer_email_address: Option<String>,
    #[serde(default)]
    pub signer_name: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default)]
    pub status_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRequest {
    pub signature_request_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub test_mode: Option<bool>,
    #[serde(default)]
    pub is_complete: Option<bool>,
    #[serde(default)]
    pub signing_url: Option<String>,
    #[serde(default)]
    pub signatures: Vec<Signature>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRequestResponse {
    pub signature_request: SignatureRequest,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListInfo {
    pub num_pages: u32,
    pub num_results: u32,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRequestListResponse {
    pub signature_requests: Vec<SignatureRequest>,
    #[serde(default)]
    pub list_info: Option<ListInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataUriResponse {
    pub data_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUrlResponse {
    pub file_url: String,
    /// 만료 시각 (유닉스 초)
    pub expires_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedSignUrl {
    pub sign_url: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedSignUrlResponse {
    pub embedded: EmbeddedSignUrl,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedEditUrl {
    pub edit_url: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedEditUrlResponse {
    pub embedded: EmbeddedEditUrl,
}

/// 다운로드 형식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[default]
    Pdf,
    Zip,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Zip => "zip",
        }
    }
}

/// 원격에서 받은 바이너리 파일
#[derive(Debug, Clone, Serialize)]
pub struct DownloadedFile {
    pub content_type: String,
    /// 본문은 JSON으로 내보내지 않고 크기만 보여줍니다.
    #[serde(skip)]
    pub bytes: Bytes,
    pub size: usize,
}

impl DownloadedFile {
    pub fn new(content_type: impl Into<String>, bytes: Bytes) -> Self {
        let size = bytes.len();
        Self {
            content_type: content_type.into(),
            bytes,
            size,
        }
    }
}

/// 제출 결과: 엔드포인트 계열별 태그가 붙은 응답
///
/// JSON 표현: `{ "kind": "signature_request", "body": { ... } }`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum RemoteResponse {
    Account(AccountResponse),
    SignatureRequest(SignatureRequestResponse),
    SignatureRequestList(SignatureRequestListResponse),
    DataUri(DataUriResponse),
    FileUrl(FileUrlResponse),
    EmbeddedSignUrl(EmbeddedSignUrlResponse),
    EmbeddedEditUrl(EmbeddedEditUrlResponse),
    File(DownloadedFile),
    /// 취소/접근 제거처럼 본문 없이 성공하는 호출
    Empty,
}
