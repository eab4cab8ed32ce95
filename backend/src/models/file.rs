use crate::error::AppError;
use axum::body::Bytes;
use serde::Serialize;

/// 사용자가 선택한 문서 파일 (메모리에만 보관)
///
/// 새 파일을 선택하면 이전 선택을 덮어씁니다.
/// `Bytes`는 참조 카운트 기반이라 clone해도 내용이 복사되지 않습니다.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
    /// PDF로 해석되면 페이지 수, 아니면 None
    pub page_count: Option<u32>,
}

/// 화면 표시용 파일 요약
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub content_type: String,
    pub size: usize,
    pub page_count: Option<u32>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        let name = name.into();
        let content_type = content_type.into();
        let page_count = if looks_like_pdf(&name, &content_type, &bytes) {
            pdf_page_count(&bytes)
        } else {
            None
        };

        Self {
            name,
            content_type,
            bytes,
            page_count,
        }
    }

    /// 비동기 핸들러용 `new`
    ///
    /// 큰 PDF를 해석하는 동안 런타임 워커를 막지 않도록 블로킹 스레드에서 페이지를 셉니다.
    pub async fn read(name: String, content_type: String, bytes: Bytes) -> Result<Self, AppError> {
        tokio::task::spawn_blocking(move || Self::new(name, content_type, bytes))
            .await
            .map_err(|e| AppError::Internal(format!("could not inspect upload: {e}")))
    }

    pub fn summary(&self) -> FileSummary {
        FileSummary {
            name: self.name.clone(),
            content_type: self.content_type.clone(),
            size: self.bytes.len(),
            page_count: self.page_count,
        }
    }
}

fn looks_like_pdf(name: &str, content_type: &str, bytes: &[u8]) -> bool {
    content_type == "application/pdf"
        || name.to_ascii_lowercase().ends_with(".pdf")
        || bytes.starts_with(b"%PDF-")
}

/// lopdf로 문서를 읽어 페이지 수를 셉니다. 깨진 PDF면 None
fn pdf_page_count(bytes: &[u8]) -> Option<u32> {
    match lopdf::Document::load_mem(bytes) {
        Ok(document) => u32::try_from(document.get_pages().len()).ok(),
        Err(e) => {
            tracing::debug!("Could not read PDF page count: {}", e);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Bytes;
    use lopdf::{dictionary, Document, Object};

    /// 빈 페이지 `pages`장짜리 PDF를 만듭니다.
    pub(crate) fn blank_pdf(pages: u32) -> Bytes {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..pages)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                })
                .into()
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        Bytes::from(buf)
    }
}
