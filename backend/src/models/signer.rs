use super::MultipartPayload;
use serde::{Deserialize, Serialize};

/// 서명자 한 명. 요청 하나 안에서만 존재하며 저장되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub email_address: String,
    pub name: String,
    /// 서명 순서 (0부터)
    pub order: u32,
    /// SMS 인증을 켠 경우에만 Some
    pub sms_phone_number: Option<String>,
}

impl Signer {
    /// `signers[i][...]` 형태의 키로 페이로드에 서명자 정보를 추가합니다.
    ///
    /// 전화번호는 값이 있을 때만 들어갑니다.
    pub fn append_to(&self, payload: &mut MultipartPayload, index: usize) {
        payload
            .text(format!("signers[{index}][email_address]"), &self.email_address)
            .text(format!("signers[{index}][name]"), &self.name)
            .text(format!("signers[{index}][order]"), self.order.to_string());

        if let Some(phone) = &self.sms_phone_number {
            payload.text(format!("signers[{index}][sms_phone_number]"), phone);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_number_is_only_written_when_present() {
        let mut signer = Signer {
            email_address: "ana@example.com".into(),
            name: "Ana".into(),
            order: 0,
            sms_phone_number: None,
        };

        let mut payload = MultipartPayload::new();
        signer.append_to(&mut payload, 0);
        assert_eq!(payload.get("signers[0][email_address]"), Some("ana@example.com"));
        assert_eq!(payload.get("signers[0][order]"), Some("0"));
        assert!(!payload.contains("signers[0][sms_phone_number]"));

        signer.sms_phone_number = Some("+15555550100".into());
        let mut payload = MultipartPayload::new();
        signer.append_to(&mut payload, 2);
        assert_eq!(payload.get("signers[2][sms_phone_number]"), Some("+15555550100"));
    }
}
