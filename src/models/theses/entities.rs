use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课题状态
//
// 状态之间没有固定的流转表，有权限的操作者可以设置任意目标状态。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "thesis.ts")]
pub enum ThesisStatus {
    Proposed,   // 已提出
    InProgress, // 进行中（新建课题的初始状态）
    Concluded,  // 已完成
    Rejected,   // 未通过
}

impl ThesisStatus {
    pub const PROPOSED: &'static str = "proposed";
    pub const IN_PROGRESS: &'static str = "in_progress";
    pub const CONCLUDED: &'static str = "concluded";
    pub const REJECTED: &'static str = "rejected";

    /// 已结束的课题（完成或未通过）
    pub fn is_closed(&self) -> bool {
        matches!(self, ThesisStatus::Concluded | ThesisStatus::Rejected)
    }
}

impl std::fmt::Display for ThesisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ThesisStatus::Proposed => ThesisStatus::PROPOSED,
            ThesisStatus::InProgress => ThesisStatus::IN_PROGRESS,
            ThesisStatus::Concluded => ThesisStatus::CONCLUDED,
            ThesisStatus::Rejected => ThesisStatus::REJECTED,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ThesisStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ThesisStatus::PROPOSED => Ok(ThesisStatus::Proposed),
            ThesisStatus::IN_PROGRESS => Ok(ThesisStatus::InProgress),
            ThesisStatus::CONCLUDED => Ok(ThesisStatus::Concluded),
            ThesisStatus::REJECTED => Ok(ThesisStatus::Rejected),
            _ => Err(format!("Invalid thesis status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "thesis.ts")]
pub struct Thesis {
    // 唯一 ID
    pub id: i64,
    // 课题标题（非空）
    pub title: String,
    // 摘要
    pub summary: String,
    // 研究方向
    pub area: String,
    // 当前状态
    pub status: ThesisStatus,
    // 作者（学生）ID
    pub author_id: i64,
    // 指导教师 ID
    pub supervisor_id: i64,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 最后更新时间
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Thesis {
    pub fn is_author(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }

    pub fn is_supervisor(&self, user_id: i64) -> bool {
        self.supervisor_id == user_id
    }
}

// 待写入的课题记录
#[derive(Debug, Clone)]
pub struct NewThesis {
    pub title: String,
    pub summary: String,
    pub area: String,
    pub status: ThesisStatus,
    pub author_id: i64,
    pub supervisor_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
