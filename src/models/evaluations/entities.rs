use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 评分下限
pub const MIN_SCORE: f64 = 0.0;
/// 评分上限
pub const MAX_SCORE: f64 = 10.0;
/// 最终稿达到该分数时课题判定为完成
pub const PASSING_SCORE: f64 = 7.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct Evaluation {
    // 唯一 ID
    pub id: i64,
    // 被评审的提交 ID
    pub submission_id: i64,
    // 评审人 ID
    pub grader_id: i64,
    // 分数 [0, 10]
    pub score: f64,
    // 评语
    pub comment: Option<String>,
    // 评审时间
    pub evaluated_at: chrono::DateTime<chrono::Utc>,
}

// 待写入的评审记录
#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub submission_id: i64,
    pub grader_id: i64,
    pub score: f64,
    pub comment: Option<String>,
    pub evaluated_at: chrono::DateTime<chrono::Utc>,
}

/// 分数是否落在 [0, 10] 区间（NaN 视为越界）
pub fn is_valid_score(score: f64) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&score)
}
