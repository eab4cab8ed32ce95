//! # 임베디드 서명(Embedded Signing) 컨트롤러
//!
//! 서명 화면을 이메일 링크 대신 콘솔 안에 띄우는 흐름입니다.
//! 요청을 만들 때 `client_id`를 함께 보내고, 서명/편집 URL은 별도 동작으로 받습니다.

use super::{require_file, Controller, Draft, PrepareContext, TEST_MODE};
use crate::{
    error::AppError,
    models::{MultipartPayload, Signer},
    services::{dropbox_sign::GatewayCall, validation},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddedAction {
    Create,
    CreateWithTemplate,
    SignUrl,
    EditUrl,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddedForm {
    pub email: String,
    pub name: String,
    pub template_id: String,
    /// 서명 URL을 받을 서명 ID
    pub signature_id: String,
}

pub struct EmbeddedRequestController;

impl Controller for EmbeddedRequestController {
    const PANE: &'static str = "embedded-signatures-request";
    const TITLE: &'static str = "Embedded Signatures Request";

    type Action = EmbeddedAction;
    type Form = EmbeddedForm;
    type Workspace = ();

    fn prepare(
        action: EmbeddedAction,
        draft: &Draft<Self>,
        ctx: &PrepareContext,
    ) -> Result<GatewayCall, AppError> {
        let form = &draft.form;
        let mut errors = Vec::new();

        match action {
            EmbeddedAction::SignUrl => {
                validation::require(&mut errors, "signature_id", &form.signature_id);
                AppError::check(errors)?;
                return Ok(GatewayCall::EmbeddedSignUrl {
                    signature_id: form.signature_id.trim().to_string(),
                });
            }
            EmbeddedAction::EditUrl => {
                validation::require(&mut errors, "template_id", &form.template_id);
                AppError::check(errors)?;
                return Ok(GatewayCall::EmbeddedEditUrl {
                    template_id: form.template_id.trim().to_string(),
                });
            }
            EmbeddedAction::Create | EmbeddedAction::CreateWithTemplate => {}
        }

        validation::require_email(&mut errors, "email", &form.email);
        validation::require(&mut errors, "name", &form.name);
        if action == EmbeddedAction::CreateWithTemplate {
            validation::require(&mut errors, "template_id", &form.template_id);
        }
        AppError::check(errors)?;

        let mut payload = MultipartPayload::new();
        Signer {
            email_address: form.email.trim().to_string(),
            name: form.name.trim().to_string(),
            order: 0,
            sms_phone_number: None,
        }
        .append_to(&mut payload, 0);
        payload
            .text("client_id", &ctx.client_id)
            .text("test_mode", TEST_MODE);

        if action == EmbeddedAction::CreateWithTemplate {
            payload.text("template_ids[0]", form.template_id.trim());
            // 템플릿에 문서가 들어 있으므로 파일은 선택했을 때만 보냅니다.
            if let Some(file) = &draft.file {
                payload.file("files[0]", file.clone());
            }
            return Ok(GatewayCall::CreateEmbeddedWithTemplate(payload));
        }

        let file = require_file(draft.file.as_ref())?;
        payload.file("files[0]", file.clone());
        Ok(GatewayCall::CreateEmbedded(payload))
    }
}
