use serde::Deserialize;
use ts_rs::TS;

// 创建评审
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct CreateEvaluationRequest {
    pub score: f64,
    pub comment: Option<String>,
}

// 更新评审
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct UpdateEvaluationRequest {
    pub score: f64,
    pub comment: Option<String>,
}
