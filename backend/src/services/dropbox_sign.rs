//! # 원격 전자서명 API 게이트웨이
//!
//! 원격 API 기능 하나당 메서드 하나를 제공하는 HTTP 래퍼입니다.
//!
//! ## 규칙
//! - 모든 호출에 같은 인증 헤더를 붙입니다: `Authorization: Basic base64(api_key + ":")`
//! - 재시도, 백오프, 응답 가공을 하지 않습니다. 2xx가 아니면 에러입니다.
//! - 메서드끼리는 서로 독립적이라 순서 보장이나 세션 유지가 필요 없습니다.
//! - 본문 형식은 엔드포인트마다 다릅니다:
//!   조회는 쿼리/경로만, 계정 생성·검증은 URL 인코딩 폼, 파일이 있는 요청은 multipart
//!
//! `SignatureGateway` 트레이트를 두는 이유는 컨트롤러를 가짜 게이트웨이로 테스트하기 위해서입니다.
//! `GatewayCall`은 "UI 동작 하나 = 원격 호출 하나"를 값으로 표현합니다.

use crate::{
    config::Config,
    models::{
        AccountResponse, DataUriResponse, DownloadedFile, EmbeddedEditUrlResponse,
        EmbeddedSignUrlResponse, FileType, FileUrlResponse, MultipartPayload, PayloadPart,
        RemoteError, RemoteErrorEnvelope, RemoteResponse, SignatureRequestListResponse,
        SignatureRequestResponse,
    },
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    multipart::{Form, Part},
    Client, RequestBuilder, Response,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// 게이트웨이 에러
///
/// 사용자에게는 구분 없이 "요청 실패"로 보이지만,
/// 로그와 다이얼로그의 `last_error`에는 상태 코드와 원격 메시지를 남깁니다.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 네트워크/TLS/타임아웃 등 전송 실패
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 원격 서버가 2xx가 아닌 상태로 응답
    #[error("remote service returned HTTP {status}{}", describe(.error))]
    Remote {
        status: u16,
        error: Option<RemoteError>,
    },

    /// 응답 본문이 엔드포인트 스키마와 맞지 않음
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// 기본 URL이 잘못됨 (설정 오류)
    #[error("invalid API base URL: {0}")]
    BaseUrl(String),

    /// 인증 헤더를 만들 수 없음 (API 키에 허용되지 않는 문자)
    #[error("API key cannot be used in a header")]
    Credential,
}

fn describe(error: &Option<RemoteError>) -> String {
    match error {
        Some(e) => format!(" ({}: {})", e.error_name, e.error_msg),
        None => String::new(),
    }
}

/// 원격 API 기능 목록: 기능 하나당 메서드 하나
#[async_trait]
pub trait SignatureGateway: Send + Sync {
    async fn get_account(&self, email: &str) -> Result<AccountResponse, GatewayError>;
    async fn create_account(&self, email: &str) -> Result<AccountResponse, GatewayError>;
    async fn verify_account(&self, email: &str) -> Result<AccountResponse, GatewayError>;
    async fn update_account(
        &self,
        callback_url: &str,
        locale: &str,
    ) -> Result<AccountResponse, GatewayError>;

    async fn send_signature_request(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError>;
    async fn send_with_text_tags(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError>;
    async fn send_simple(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError>;
    async fn update_signature_request(
        &self,
        signature_request_id: &str,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError>;
    async fn cancel_signature_request(&self, signature_request_id: &str)
        -> Result<(), GatewayError>;
    async fn remove_signature_request_access(
        &self,
        signature_request_id: &str,
    ) -> Result<(), GatewayError>;
    async fn get_signature_request(
        &self,
        signature_request_id: &str,
    ) -> Result<SignatureRequestResponse, GatewayError>;
    async fn list_signature_requests(&self) -> Result<SignatureRequestListResponse, GatewayError>;

    async fn download_files(
        &self,
        signature_request_id: &str,
        file_type: FileType,
    ) -> Result<DownloadedFile, GatewayError>;
    async fn files_as_data_uri(
        &self,
        signature_request_id: &str,
    ) -> Result<DataUriResponse, GatewayError>;
    async fn files_as_file_url(
        &self,
        signature_request_id: &str,
    ) -> Result<FileUrlResponse, GatewayError>;

    async fn create_embedded(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError>;
    async fn create_embedded_with_template(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError>;
    async fn embedded_sign_url(
        &self,
        signature_id: &str,
    ) -> Result<EmbeddedSignUrlResponse, GatewayError>;
    async fn embedded_edit_url(
        &self,
        template_id: &str,
    ) -> Result<EmbeddedEditUrlResponse, GatewayError>;
}

/// reqwest 기반 실제 게이트웨이
///
/// 불변 자격 증명과 기본 URL만 들고 있으므로 여러 호출이 동시에 써도 안전합니다.
/// `reqwest::Client`는 내부적으로 Arc라 clone해도 연결 풀을 공유합니다.
#[derive(Clone)]
pub struct DropboxSignClient {
    http: Client,
    base_url: Url,
}

impl DropboxSignClient {
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        Self::with_base_url(
            &config.api_url,
            &config.api_key,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let base_url = Url::parse(base_url).map_err(|e| GatewayError::BaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::BaseUrl(base_url.to_string()));
        }

        // 인증 헤더는 한 번만 만들어 모든 요청에 기본으로 붙입니다.
        // set_sensitive: 디버그 출력 등에 값이 노출되지 않도록 표시
        let mut authorization = HeaderValue::try_from(basic_auth(api_key))
            .map_err(|_| GatewayError::Credential)?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { http, base_url })
    }

    /// 기본 URL 뒤에 경로 세그먼트를 붙입니다. 각 세그먼트는 퍼센트 인코딩됩니다.
    fn url(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 요청을 보내고 2xx가 아니면 에러로 바꿉니다.
    async fn send(&self, endpoint: &'static str, request: RequestBuilder) -> Result<Response, GatewayError> {
        tracing::debug!(endpoint, "Calling signature service");
        let response = request.send().await.map_err(|e| {
            tracing::warn!(endpoint, "Signature service unreachable: {}", e);
            GatewayError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(endpoint, status = status.as_u16(), "Signature service call succeeded");
            return Ok(response);
        }

        // 실패 본문은 가능하면 { "error": {...} }로 해석하고, 안 되면 버립니다.
        let body = response.bytes().await.unwrap_or_default();
        let error = serde_json::from_slice::<RemoteErrorEnvelope>(&body)
            .ok()
            .map(|envelope| envelope.error);
        tracing::warn!(endpoint, status = status.as_u16(), ?error, "Signature service call failed");
        Err(GatewayError::Remote {
            status: status.as_u16(),
            error,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = self.send(endpoint, request).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_empty(&self, endpoint: &'static str, request: RequestBuilder) -> Result<(), GatewayError> {
        self.send(endpoint, request).await?;
        Ok(())
    }
}

/// `Basic base64(api_key + ":")`
pub fn basic_auth(api_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{api_key}:")))
}

/// 페이로드를 reqwest multipart 폼으로 바꿉니다.
fn into_form(payload: MultipartPayload) -> Result<Form, GatewayError> {
    let mut form = Form::new();
    for (key, part) in payload.parts() {
        form = match part {
            PayloadPart::Text(value) => form.text(key.clone(), value.clone()),
            PayloadPart::File(file) => {
                let part = Part::bytes(file.bytes.to_vec())
                    .file_name(file.name.clone())
                    .mime_str(&file.content_type)?;
                form.part(key.clone(), part)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl SignatureGateway for DropboxSignClient {
    async fn get_account(&self, email: &str) -> Result<AccountResponse, GatewayError> {
        let request = self
            .http
            .get(self.url(&["account"])?)
            .query(&[("email_address", email)]);
        self.send_json("account", request).await
    }

    async fn create_account(&self, email: &str) -> Result<AccountResponse, GatewayError> {
        let request = self
            .http
            .post(self.url(&["account", "create"])?)
            .form(&[("email_address", email)]);
        self.send_json("account/create", request).await
    }

    async fn verify_account(&self, email: &str) -> Result<AccountResponse, GatewayError> {
        let request = self
            .http
            .post(self.url(&["account", "verify"])?)
            .form(&[("email_address", email)]);
        self.send_json("account/verify", request).await
    }

    async fn update_account(
        &self,
        callback_url: &str,
        locale: &str,
    ) -> Result<AccountResponse, GatewayError> {
        let form = Form::new()
            .text("callback_url", callback_url.to_string())
            .text("locale", locale.to_string());
        let request = self.http.put(self.url(&["account"])?).multipart(form);
        self.send_json("account (update)", request).await
    }

    async fn send_signature_request(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError> {
        let request = self
            .http
            .post(self.url(&["signature_request", "send"])?)
            .multipart(into_form(payload)?);
        self.send_json("signature_request/send", request).await
    }

    async fn send_with_text_tags(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError> {
        let request = self
            .http
            .post(self.url(&["signature_request", "send_with_text_tags"])?)
            .multipart(into_form(payload)?);
        self.send_json("signature_request/send_with_text_tags", request).await
    }

    async fn send_simple(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError> {
        let request = self
            .http
            .post(self.url(&["signature_request", "send_simple"])?)
            .multipart(into_form(payload)?);
        self.send_json("signature_request/send_simple", request).await
    }

    async fn update_signature_request(
        &self,
        signature_request_id: &str,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError> {
        let request = self
            .http
            .put(self.url(&["signature_request", signature_request_id])?)
            .multipart(into_form(payload)?);
        self.send_json("signature_request (update)", request).await
    }

    async fn cancel_signature_request(
        &self,
        signature_request_id: &str,
    ) -> Result<(), GatewayError> {
        let request = self
            .http
            .post(self.url(&["signature_request", "cancel", signature_request_id])?);
        self.send_empty("signature_request/cancel", request).await
    }

    async fn remove_signature_request_access(
        &self,
        signature_request_id: &str,
    ) -> Result<(), GatewayError> {
        let request = self
            .http
            .post(self.url(&["signature_request", "remove", signature_request_id])?);
        self.send_empty("signature_request/remove", request).await
    }

    async fn get_signature_request(
        &self,
        signature_request_id: &str,
    ) -> Result<SignatureRequestResponse, GatewayError> {
        let request = self
            .http
            .get(self.url(&["signature_request", signature_request_id])?);
        self.send_json("signature_request", request).await
    }

    async fn list_signature_requests(&self) -> Result<SignatureRequestListResponse, GatewayError> {
        let request = self.http.get(self.url(&["signature_request", "list"])?);
        self.send_json("signature_request/list", request).await
    }

    async fn download_files(
        &self,
        signature_request_id: &str,
        file_type: FileType,
    ) -> Result<DownloadedFile, GatewayError> {
        let request = self
            .http
            .get(self.url(&["signature_request", "files", signature_request_id])?)
            .query(&[("file_type", file_type.as_str())]);
        let response = self.send("signature_request/files", request).await?;

        // 바이너리 응답은 그대로 넘깁니다. Content-Type이 없으면 요청한 형식으로 추정
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| match file_type {
                FileType::Pdf => "application/pdf".to_string(),
                FileType::Zip => "application/zip".to_string(),
            });
        let bytes = response.bytes().await?;
        Ok(DownloadedFile::new(content_type, bytes))
    }

    async fn files_as_data_uri(
        &self,
        signature_request_id: &str,
    ) -> Result<DataUriResponse, GatewayError> {
        let request = self.http.get(self.url(&[
            "signature_request",
            "files_as_data_uri",
            signature_request_id,
        ])?);
        self.send_json("signature_request/files_as_data_uri", request).await
    }

    async fn files_as_file_url(
        &self,
        signature_request_id: &str,
    ) -> Result<FileUrlResponse, GatewayError> {
        let request = self.http.get(self.url(&[
            "signature_request",
            "files_as_file_url",
            signature_request_id,
        ])?);
        self.send_json("signature_request/files_as_file_url", request).await
    }

    async fn create_embedded(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError> {
        let request = self
            .http
            .post(self.url(&["signature_request", "create_embedded"])?)
            .multipart(into_form(payload)?);
        self.send_json("signature_request/create_embedded", request).await
    }

    async fn create_embedded_with_template(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError> {
        let request = self
            .http
            .post(self.url(&["signature_request", "create_embedded_with_template"])?)
            .multipart(into_form(payload)?);
        self.send_json("signature_request/create_embedded_with_template", request)
            .await
    }

    async fn embedded_sign_url(
        &self,
        signature_id: &str,
    ) -> Result<EmbeddedSignUrlResponse, GatewayError> {
        let request = self.http.get(self.url(&["embedded", "sign_url", signature_id])?);
        self.send_json("embedded/sign_url", request).await
    }

    async fn embedded_edit_url(
        &self,
        template_id: &str,
    ) -> Result<EmbeddedEditUrlResponse, GatewayError> {
        let request = self.http.get(self.url(&["embedded", "edit_url", template_id])?);
        self.send_json("embedded/edit_url", request).await
    }
}

/// UI 동작 하나가 만들어내는 원격 호출 하나
///
/// 컨트롤러는 검증과 페이로드 조립까지만 하고 이 값을 돌려줍니다.
/// 실제 호출은 `dispatch`가 정확히 한 번 수행합니다.
#[derive(Debug, Clone)]
pub enum GatewayCall {
    GetAccount { email: String },
    CreateAccount { email: String },
    VerifyAccount { email: String },
    UpdateAccount { callback_url: String, locale: String },
    SendSignatureRequest(MultipartPayload),
    SendWithTextTags(MultipartPayload),
    SendSimple(MultipartPayload),
    UpdateSignatureRequest { signature_request_id: String, payload: MultipartPayload },
    CancelSignatureRequest { signature_request_id: String },
    RemoveSignatureRequestAccess { signature_request_id: String },
    GetSignatureRequest { signature_request_id: String },
    ListSignatureRequests,
    DownloadFiles { signature_request_id: String, file_type: FileType },
    FilesAsDataUri { signature_request_id: String },
    FilesAsFileUrl { signature_request_id: String },
    CreateEmbedded(MultipartPayload),
    CreateEmbeddedWithTemplate(MultipartPayload),
    EmbeddedSignUrl { signature_id: String },
    EmbeddedEditUrl { template_id: String },
}

impl GatewayCall {
    /// 로그용 이름
    pub fn name(&self) -> &'static str {
        match self {
            GatewayCall::GetAccount { .. } => "get_account",
            GatewayCall::CreateAccount { .. } => "create_account",
            GatewayCall::VerifyAccount { .. } => "verify_account",
            GatewayCall::UpdateAccount { .. } => "update_account",
            GatewayCall::SendSignatureRequest(_) => "send_signature_request",
            GatewayCall::SendWithTextTags(_) => "send_with_text_tags",
            GatewayCall::SendSimple(_) => "send_simple",
            GatewayCall::UpdateSignatureRequest { .. } => "update_signature_request",
            GatewayCall::CancelSignatureRequest { .. } => "cancel_signature_request",
            GatewayCall::RemoveSignatureRequestAccess { .. } => "remove_signature_request_access",
            GatewayCall::GetSignatureRequest { .. } => "get_signature_request",
            GatewayCall::ListSignatureRequests => "list_signature_requests",
            GatewayCall::DownloadFiles { .. } => "download_files",
            GatewayCall::FilesAsDataUri { .. } => "files_as_data_uri",
            GatewayCall::FilesAsFileUrl { .. } => "files_as_file_url",
            GatewayCall::CreateEmbedded(_) => "create_embedded",
            GatewayCall::CreateEmbeddedWithTemplate(_) => "create_embedded_with_template",
            GatewayCall::EmbeddedSignUrl { .. } => "embedded_sign_url",
            GatewayCall::EmbeddedEditUrl { .. } => "embedded_edit_url",
        }
    }

    /// multipart 본문이 있으면 참조를 돌려줍니다.
    pub fn payload(&self) -> Option<&MultipartPayload> {
        match self {
            GatewayCall::SendSignatureRequest(payload)
            | GatewayCall::SendWithTextTags(payload)
            | GatewayCall::SendSimple(payload)
            | GatewayCall::UpdateSignatureRequest { payload, .. }
            | GatewayCall::CreateEmbedded(payload)
            | GatewayCall::CreateEmbeddedWithTemplate(payload) => Some(payload),
            _ => None,
        }
    }

    /// 게이트웨이 메서드 하나를 호출하고 결과를 태그된 응답으로 감쌉니다.
    pub async fn dispatch(
        self,
        gateway: &dyn SignatureGateway,
    ) -> Result<RemoteResponse, GatewayError> {
        let response = match self {
            GatewayCall::GetAccount { email } => {
                RemoteResponse::Account(gateway.get_account(&email).await?)
            }
            GatewayCall::CreateAccount { email } => {
                RemoteResponse::Account(gateway.create_account(&email).await?)
            }
            GatewayCall::VerifyAccount { email } => {
                RemoteResponse::Account(gateway.verify_account(&email).await?)
            }
            GatewayCall::UpdateAccount { callback_url, locale } => {
                RemoteResponse::Account(gateway.update_account(&callback_url, &locale).await?)
            }
            GatewayCall::SendSignatureRequest(payload) => {
                RemoteResponse::SignatureRequest(gateway.send_signature_request(payload).await?)
            }
            GatewayCall::SendWithTextTags(payload) => {
                RemoteResponse::SignatureRequest(gateway.send_with_text_tags(payload).await?)
            }
            GatewayCall::SendSimple(payload) => {
                RemoteResponse::SignatureRequest(gateway.send_simple(payload).await?)
            }
            GatewayCall::UpdateSignatureRequest { signature_request_id, payload } => {
                RemoteResponse::SignatureRequest(
                    gateway
                        .update_signature_request(&signature_request_id, payload)
                        .await?,
                )
            }
            GatewayCall::CancelSignatureRequest { signature_request_id } => {
                gateway.cancel_signature_request(&signature_request_id).await?;
                RemoteResponse::Empty
            }
            GatewayCall::RemoveSignatureRequestAccess { signature_request_id } => {
                gateway
                    .remove_signature_request_access(&signature_request_id)
                    .await?;
                RemoteResponse::Empty
            }
            GatewayCall::GetSignatureRequest { signature_request_id } => {
                RemoteResponse::SignatureRequest(
                    gateway.get_signature_request(&signature_request_id).await?,
                )
            }
            GatewayCall::ListSignatureRequests => {
                RemoteResponse::SignatureRequestList(gateway.list_signature_requests().await?)
            }
            GatewayCall::DownloadFiles { signature_request_id, file_type } => RemoteResponse::File(
                gateway.download_files(&signature_request_id, file_type).await?,
            ),
            GatewayCall::FilesAsDataUri { signature_request_id } => {
                RemoteResponse::DataUri(gateway.files_as_data_uri(&signature_request_id).await?)
            }
            GatewayCall::FilesAsFileUrl { signature_request_id } => {
                RemoteResponse::FileUrl(gateway.files_as_file_url(&signature_request_id).await?)
            }
            GatewayCall::CreateEmbedded(payload) => {
                RemoteResponse::SignatureRequest(gateway.create_embedded(payload).await?)
            }
            GatewayCall::CreateEmbeddedWithTemplate(payload) => RemoteResponse::SignatureRequest(
                gateway.create_embedded_with_template(payload).await?,
            ),
            GatewayCall::EmbeddedSignUrl { signature_id } => {
                RemoteResponse::EmbeddedSignUrl(gateway.embedded_sign_url(&signature_id).await?)
            }
            GatewayCall::EmbeddedEditUrl { template_id } => {
                RemoteResponse::EmbeddedEditUrl(gateway.embedded_edit_url(&template_id).await?)
            }
        };
        Ok(response)
    }
}
