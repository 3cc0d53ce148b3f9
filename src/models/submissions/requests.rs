use super::entities::SubmissionKind;

// 创建提交（multipart 表单解析后的结果）
#[derive(Debug, Clone)]
pub struct CreateSubmissionRequest {
    pub kind: SubmissionKind,
    pub note: Option<String>,
    pub file_name: String,
    pub file_bytes: Vec<u8>,
}
