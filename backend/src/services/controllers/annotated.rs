//! # PDF 필드 배치 서명 요청 컨트롤러
//!
//! PDF 페이지를 클릭해 위치를 고르고, 필드를 하나씩 추가한 뒤
//! 필드 목록을 `form_fields_per_document`로 담아 서명 요청을 보냅니다.
//! 작업 공간(`FieldPlacement`)은 이 다이얼로그가 독점합니다.

use super::{require_file, Controller, Draft, PrepareContext, TEST_MODE};
use crate::{
    error::{AppError, FieldError},
    models::{MultipartPayload, SelectedFile, Signer},
    services::{
        dropbox_sign::GatewayCall,
        field_placement::{self, FieldPlacement, FieldTemplate},
        validation,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotatedAction {
    Send,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatedForm {
    pub signer_name: String,
    pub signer_email: String,
    pub title: String,
    pub subject: String,
    pub message: String,
    pub enable_sms: bool,
    pub phone_number: String,
    /// 다음에 추가할 필드의 종류/크기/이름
    pub field: FieldTemplate,
}

pub struct AnnotatedRequestController;

// 이 도구는 서명자를 한 명만 받습니다.
const SIGNER_COUNT: usize = 1;

impl Controller for AnnotatedRequestController {
    const PANE: &'static str = "signature-simulator";
    const TITLE: &'static str = "Signature Simulator";

    type Action = AnnotatedAction;
    type Form = AnnotatedForm;
    type Workspace = FieldPlacement;

    fn prepare(
        _action: AnnotatedAction,
        draft: &Draft<Self>,
        _ctx: &PrepareContext,
    ) -> Result<GatewayCall, AppError> {
        let form = &draft.form;
        let mut errors = Vec::new();
        validation::require(&mut errors, "signer_name", &form.signer_name);
        validation::require_email(&mut errors, "signer_email", &form.signer_email);
        if form.enable_sms {
            validation::require(&mut errors, "phone_number", &form.phone_number);
        }
        if let Some(field) = draft
            .workspace
            .fields()
            .iter()
            .find(|f| f.signer >= SIGNER_COUNT)
        {
            errors.push(FieldError::new(
                "fields",
                format!("{} refers to signer {} which does not exist", field.api_id, field.signer),
            ));
        }
        // 필드를 추가한 뒤 더 짧은 문서로 바꿨을 수 있으므로 보내기 직전에 다시 확인합니다.
        if let Some(count) = draft.file.as_ref().and_then(|file| file.page_count) {
            if let Some(field) = draft.workspace.fields().iter().find(|f| f.page > count) {
                errors.push(FieldError::new(
                    "fields",
                    format!("{} is on page {} but the document has {} page(s)", field.api_id, field.page, count),
                ));
            }
        }
        AppError::check(errors)?;

        let file = require_file(draft.file.as_ref())?;

        let fields = field_placement::serialize(&draft.workspace.per_document())
            .map_err(|e| AppError::Internal(format!("could not serialize fields: {e}")))?;

        let mut payload = MultipartPayload::new();
        payload
            .text("title", form.title.trim())
            .text("subject", form.subject.trim())
            .text("message", form.message.trim());
        Signer {
            email_address: form.signer_email.trim().to_string(),
            name: form.signer_name.trim().to_string(),
            order: 0,
            sms_phone_number: form
                .enable_sms
                .then(|| form.phone_number.trim().to_string()),
        }
        .append_to(&mut payload, 0);
        payload
            .text("test_mode", TEST_MODE)
            .file("files[0]", file.clone())
            .text("form_fields_per_document", fields);

        Ok(GatewayCall::SendSignatureRequest(payload))
    }

    fn on_file_selected(workspace: &mut FieldPlacement, file: &SelectedFile) {
        workspace.load_document(file.page_count);
    }
}
