//! # 서명 요청(Signature Request) 컨트롤러
//!
//! 일반 서명 요청 다이얼로그입니다. 다이얼로그를 연 동작에 따라
//! 전송, 목록, 수정, 조회, 다운로드, 취소 중 하나의 원격 호출을 만듭니다.
//!
//! ## 전송 페이로드
//! ```text
//! title, subject, message
//! signers[0][email_address], signers[0][name], signers[0][order]=0
//! signers[0][sms_phone_number]   (SMS를 켠 경우에만)
//! files[0]
//! use_text_tags=1                (텍스트 태그를 켠 경우에만)
//! test_mode=1
//! ```

use super::{require_file, Controller, Draft, PrepareContext, TEST_MODE};
use crate::{
    error::{AppError, FieldError},
    models::{FileType, MultipartPayload, Signer},
    services::{dropbox_sign::GatewayCall, validation},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureRequestAction {
    Send,
    SendWithTextTags,
    SendSimple,
    List,
    Update,
    Get,
    Download,
    FilesAsDataUri,
    FilesAsFileUrl,
    Cancel,
    Remove,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureRequestForm {
    pub title: String,
    pub subject: String,
    pub message: String,
    pub signer_email: String,
    /// 비어 있으면 이메일 주소를 이름으로 씁니다.
    pub signer_name: String,
    pub enable_sms: bool,
    /// `enable_sms`가 꺼져 있으면 값이 있어도 보내지 않습니다.
    pub phone_number: String,
    pub use_text_tags: bool,
    /// 수정/조회/다운로드/취소 대상
    pub signature_request_id: String,
    /// 수정 대상 서명 ID
    pub signature_id: String,
    pub file_type: FileType,
}

pub struct SignatureRequestController;

impl Controller for SignatureRequestController {
    const PANE: &'static str = "signature-request";
    const TITLE: &'static str = "Signature Request";

    type Action = SignatureRequestAction;
    type Form = SignatureRequestForm;
    type Workspace = ();

    fn prepare(
        action: SignatureRequestAction,
        draft: &Draft<Self>,
        _ctx: &PrepareContext,
    ) -> Result<GatewayCall, AppError> {
        use SignatureRequestAction::*;

        let form = &draft.form;
        match action {
            Send | SendWithTextTags | SendSimple => {
                let payload = send_payload(draft)?;
                Ok(match action {
                    SendWithTextTags => GatewayCall::SendWithTextTags(payload),
                    SendSimple => GatewayCall::SendSimple(payload),
                    _ => GatewayCall::SendSignatureRequest(payload),
                })
            }
            List => Ok(GatewayCall::ListSignatureRequests),
            Update => {
                let mut errors = Vec::new();
                validation::require(&mut errors, "signature_request_id", &form.signature_request_id);
                validation::require(&mut errors, "signature_id", &form.signature_id);
                validation::require_email(&mut errors, "signer_email", &form.signer_email);
                AppError::check(errors)?;

                let mut payload = MultipartPayload::new();
                payload
                    .text("signature_id", form.signature_id.trim())
                    .text("email_address", form.signer_email.trim())
                    .text("test_mode", TEST_MODE);
                Ok(GatewayCall::UpdateSignatureRequest {
                    signature_request_id: form.signature_request_id.trim().to_string(),
                    payload,
                })
            }
            Get | Download | FilesAsDataUri | FilesAsFileUrl | Cancel | Remove => {
                let mut errors = Vec::new();
                validation::require(&mut errors, "signature_request_id", &form.signature_request_id);
                AppError::check(errors)?;

                let signature_request_id = form.signature_request_id.trim().to_string();
                Ok(match action {
                    Get => GatewayCall::GetSignatureRequest { signature_request_id },
                    Download => GatewayCall::DownloadFiles {
                        signature_request_id,
                        file_type: form.file_type,
                    },
                    FilesAsDataUri => GatewayCall::FilesAsDataUri { signature_request_id },
                    FilesAsFileUrl => GatewayCall::FilesAsFileUrl { signature_request_id },
                    Cancel => GatewayCall::CancelSignatureRequest { signature_request_id },
                    _ => GatewayCall::RemoveSignatureRequestAccess { signature_request_id },
                })
            }
        }
    }
}

/// 전송 계열 동작의 공통 검증과 페이로드 조립
fn send_payload(draft: &Draft<SignatureRequestController>) -> Result<MultipartPayload, AppError> {
    let form = &draft.form;

    let mut errors: Vec<FieldError> = Vec::new();
    validation::require(&mut errors, "title", &form.title);
    validation::require(&mut errors, "subject", &form.subject);
    validation::require(&mut errors, "message", &form.message);
    validation::require_email(&mut errors, "signer_email", &form.signer_email);
    if form.enable_sms {
        validation::require(&mut errors, "phone_number", &form.phone_number);
    }
    AppError::check(errors)?;

    let file = require_file(draft.file.as_ref())?;

    let email = form.signer_email.trim().to_string();
    let name = match form.signer_name.trim() {
        "" => email.clone(),
        name => name.to_string(),
    };
    let signer = Signer {
        email_address: email,
        name,
        order: 0,
        sms_phone_number: form
            .enable_sms
            .then(|| form.phone_number.trim().to_string()),
    };

    let mut payload = MultipartPayload::new();
    payload
        .text("title", form.title.trim())
        .text("subject", form.subject.trim())
        .text("message", form.message.trim());
    signer.append_to(&mut payload, 0);
    payload.file("files[0]", file.clone());
    if form.use_text_tags {
        payload.text("use_text_tags", "1");
    }
    payload.text("test_mode", TEST_MODE);
    Ok(payload)
}
