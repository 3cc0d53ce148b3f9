use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 提交类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "submission.ts")]
pub enum SubmissionKind {
    Partial, // 阶段性提交
    Final,   // 最终稿
}

impl SubmissionKind {
    pub const PARTIAL: &'static str = "partial";
    pub const FINAL: &'static str = "final";
}

impl std::fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionKind::Partial => write!(f, "{}", SubmissionKind::PARTIAL),
            SubmissionKind::Final => write!(f, "{}", SubmissionKind::FINAL),
        }
    }
}

impl std::str::FromStr for SubmissionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            SubmissionKind::PARTIAL => Ok(SubmissionKind::Partial),
            SubmissionKind::FINAL => Ok(SubmissionKind::Final),
            _ => Err(format!("Invalid submission kind: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct Submission {
    // 唯一 ID
    pub id: i64,
    // 所属课题 ID
    pub thesis_id: i64,
    // 提交类型
    pub kind: SubmissionKind,
    // 备注
    pub note: Option<String>,
    // 文件引用（由文件存储返回）
    pub file_ref: String,
    // 提交时间
    pub sent_at: chrono::DateTime<chrono::Utc>,
}

// 待写入的提交记录
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub thesis_id: i64,
    pub kind: SubmissionKind,
    pub note: Option<String>,
    pub file_ref: String,
    pub sent_at: chrono::DateTime<chrono::Utc>,
}
