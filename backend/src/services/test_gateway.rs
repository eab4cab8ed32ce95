//! 테스트용 가짜 게이트웨이
//!
//! 호출 이름과 페이로드를 기록하고, 정해진 응답을 돌려줍니다.
//! `gated()`로 만들면 `release()` 전까지 호출이 끝나지 않아
//! 제출 중 상태(중복 제출, 취소)를 재현할 수 있습니다.

use crate::{
    models::{
        Account, AccountResponse, DataUriResponse, DownloadedFile, EmbeddedEditUrl,
        EmbeddedEditUrlResponse, EmbeddedSignUrl, EmbeddedSignUrlResponse, FileType,
        FileUrlResponse, MultipartPayload, SignatureRequest, SignatureRequestListResponse,
        SignatureRequestResponse,
    },
    services::dropbox_sign::{GatewayError, SignatureGateway},
};
use async_trait::async_trait;
use axum::body::Bytes;
use serde_json::Map;
use std::sync::Mutex;
use tokio::sync::Notify;

pub(crate) const PDF_BYTES: &[u8] = b"%PDF-1.4 signed";

#[derive(Default)]
pub(crate) struct RecordingGateway {
    calls: Mutex<Vec<(&'static str, Option<MultipartPayload>)>>,
    gate: Option<Notify>,
    fail_status: Option<u16>,
}

impl RecordingGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 모든 호출이 주어진 HTTP 상태로 실패합니다.
    pub(crate) fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::default()
        }
    }

    /// `release()`를 부를 때까지 호출이 멈춰 있습니다.
    pub(crate) fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    pub(crate) fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(|(name, _)| *name).collect()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// 마지막으로 받은 multipart 페이로드
    pub(crate) fn last_payload(&self) -> Option<MultipartPayload> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|(_, payload)| payload.clone())
    }

    /// 호출이 `n`번 기록될 때까지 다른 태스크에 양보합니다.
    pub(crate) async fn wait_for_calls(&self, n: usize) {
        for _ in 0..10_000 {
            if self.call_count() >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("gateway never received {n} call(s)");
    }

    async fn record(
        &self,
        name: &'static str,
        payload: Option<MultipartPayload>,
    ) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push((name, payload));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match self.fail_status {
            Some(status) => Err(GatewayError::Remote { status, error: None }),
            None => Ok(()),
        }
    }
}

fn account(email: &str) -> AccountResponse {
    AccountResponse {
        account: Some(Account {
            account_id: Some("acc-1".into()),
            email_address: Some(email.into()),
            callback_url: None,
            locale: None,
            extra: Map::new(),
        }),
        warnings: Vec::new(),
    }
}

fn signature_request(id: &str) -> SignatureRequestResponse {
    SignatureRequestResponse {
        signature_request: SignatureRequest {
            signature_request_id: id.into(),
            title: None,
            subject: None,
            message: None,
            test_mode: Some(true),
            is_complete: Some(false),
            signing_url: None,
            signatures: Vec::new(),
            extra: Map::new(),
        },
        warnings: Vec::new(),
    }
}

#[async_trait]
impl SignatureGateway for RecordingGateway {
    async fn get_account(&self, email: &str) -> Result<AccountResponse, GatewayError> {
        self.record("get_account", None).await?;
        Ok(account(email))
    }

    async fn create_account(&self, email: &str) -> Result<AccountResponse, GatewayError> {
        self.record("create_account", None).await?;
        Ok(account(email))
    }

    async fn verify_account(&self, email: &str) -> Result<AccountResponse, GatewayError> {
        self.record("verify_account", None).await?;
        Ok(account(email))
    }

    async fn update_account(
        &self,
        _callback_url: &str,
        _locale: &str,
    ) -> Result<AccountResponse, GatewayError> {
        self.record("update_account", None).await?;
        Ok(account("ana@example.com"))
    }

    async fn send_signature_request(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError> {
        self.record("send_signature_request", Some(payload)).await?;
        Ok(signature_request("req-1"))
    }

    async fn send_with_text_tags(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError> {
        self.record("send_with_text_tags", Some(payload)).await?;
        Ok(signature_request("req-1"))
    }

    async fn send_simple(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError> {
        self.record("send_simple", Some(payload)).await?;
        Ok(signature_request("req-1"))
    }

    async fn update_signature_request(
        &self,
        signature_request_id: &str,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError> {
        self.record("update_signature_request", Some(payload)).await?;
        Ok(signature_request(signature_request_id))
    }

    async fn cancel_signature_request(&self, _id: &str) -> Result<(), GatewayError> {
        self.record("cancel_signature_request", None).await
    }

    async fn remove_signature_request_access(&self, _id: &str) -> Result<(), GatewayError> {
        self.record("remove_signature_request_access", None).await
    }

    async fn get_signature_request(
        &self,
        signature_request_id: &str,
    ) -> Result<SignatureRequestResponse, GatewayError> {
        self.record("get_signature_request", None).await?;
        Ok(signature_request(signature_request_id))
    }

    async fn list_signature_requests(&self) -> Result<SignatureRequestListResponse, GatewayError> {
        self.record("list_signature_requests", None).await?;
        Ok(SignatureRequestListResponse {
            signature_requests: Vec::new(),
            list_info: None,
        })
    }

    async fn download_files(
        &self,
        _id: &str,
        file_type: FileType,
    ) -> Result<DownloadedFile, GatewayError> {
        self.record("download_files", None).await?;
        let content_type = match file_type {
            FileType::Pdf => "application/pdf",
            FileType::Zip => "application/zip",
        };
        Ok(DownloadedFile::new(content_type, Bytes::from_static(PDF_BYTES)))
    }

    async fn files_as_data_uri(&self, _id: &str) -> Result<DataUriResponse, GatewayError> {
        self.record("files_as_data_uri", None).await?;
        Ok(DataUriResponse {
            data_uri: "data:application/pdf;base64,JVBERi0xLjQ=".into(),
        })
    }

    async fn files_as_file_url(&self, _id: &str) -> Result<FileUrlResponse, GatewayError> {
        self.record("files_as_file_url", None).await?;
        Ok(FileUrlResponse {
            file_url: "https://files.example/req-1.pdf".into(),
            expires_at: 1_700_000_000,
        })
    }

    async fn create_embedded(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError> {
        self.record("create_embedded", Some(payload)).await?;
        Ok(signature_request("req-embedded"))
    }

    async fn create_embedded_with_template(
        &self,
        payload: MultipartPayload,
    ) -> Result<SignatureRequestResponse, GatewayError> {
        self.record("create_embedded_with_template", Some(payload)).await?;
        Ok(signature_request("req-template"))
    }

    async fn embedded_sign_url(
        &self,
        signature_id: &str,
    ) -> Result<EmbeddedSignUrlResponse, GatewayError> {
        self.record("embedded_sign_url", None).await?;
        Ok(EmbeddedSignUrlResponse {
            embedded: EmbeddedSignUrl {
                sign_url: format!("https://app.example/sign/{signature_id}"),
                expires_at: 1_700_000_000,
            },
        })
    }

    async fn embedded_edit_url(
        &self,
        template_id: &str,
    ) -> Result<EmbeddedEditUrlResponse, GatewayError> {
        self.record("embedded_edit_url", None).await?;
        Ok(EmbeddedEditUrlResponse {
            embedded: EmbeddedEditUrl {
                edit_url: format!("https://app.example/edit/{template_id}"),
                expires_at: 1_700_000_000,
            },
        })
    }
}
