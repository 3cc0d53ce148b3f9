use super::entities::ThesisStatus;
use serde::Deserialize;
use ts_rs::TS;

// 提交课题申请
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "thesis.ts")]
pub struct ProposeThesisRequest {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub area: String,
    pub supervisor_id: i64,
}

// 更新课题字段
//
// 学生提交的 status 会被忽略。
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "thesis.ts")]
pub struct UpdateThesisRequest {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub area: String,
    pub status: Option<ThesisStatus>,
}

// 变更课题状态
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "thesis.ts")]
pub struct ChangeStatusRequest {
    pub status: ThesisStatus,
}

// 课题列表筛选
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "thesis.ts")]
pub struct ThesisListQuery {
    pub status: Option<ThesisStatus>,
}
