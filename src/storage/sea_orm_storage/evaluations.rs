//! 评审存储操作

use super::SeaOrmStorage;
use super::theses::thesis_changes;
use crate::entity::evaluations::{ActiveModel, Column, Entity as Evaluations};
use crate::errors::{HWSystemError, Result};
use crate::models::evaluations::entities::{Evaluation, NewEvaluation};
use crate::models::theses::entities::Thesis;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

fn new_evaluation(req: NewEvaluation) -> ActiveModel {
    ActiveModel {
        submission_id: Set(req.submission_id),
        grader_id: Set(req.grader_id),
        score: Set(req.score),
        comment: Set(req.comment),
        evaluated_at: Set(req.evaluated_at.timestamp_millis()),
        ..Default::default()
    }
}

/// 唯一索引冲突映射为 Conflict，其余为数据库错误
fn insert_error(err: DbErr) -> HWSystemError {
    match HWSystemError::from(err) {
        HWSystemError::Conflict(_) => {
            HWSystemError::conflict("该评审人已评审过此提交，请修改已有评审")
        }
        other => HWSystemError::database_operation(format!("创建评审失败: {other}")),
    }
}

impl SeaOrmStorage {
    /// 创建评审
    pub async fn create_evaluation_impl(&self, req: NewEvaluation) -> Result<Evaluation> {
        let result = new_evaluation(req)
            .insert(&self.db)
            .await
            .map_err(insert_error)?;

        Ok(result.into_evaluation())
    }

    /// 创建评审并更新课题状态（同一事务）
    pub async fn record_evaluation_impl(
        &self,
        req: NewEvaluation,
        thesis: &Thesis,
    ) -> Result<(Evaluation, Thesis)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| HWSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let evaluation = new_evaluation(req).insert(&txn).await.map_err(insert_error)?;

        // 失败时 txn 被丢弃，评审随之回滚
        let thesis = thesis_changes(thesis)
            .update(&txn)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("更新课题状态失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| HWSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((evaluation.into_evaluation(), thesis.into_thesis()))
    }

    /// 通过 ID 获取评审
    pub async fn get_evaluation_by_id_impl(&self, evaluation_id: i64) -> Result<Option<Evaluation>> {
        let result = Evaluations::find_by_id(evaluation_id)
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询评审失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation()))
    }

    /// 获取某评审人对某提交的评审
    pub async fn get_evaluation_by_submission_and_grader_impl(
        &self,
        submission_id: i64,
        grader_id: i64,
    ) -> Result<Option<Evaluation>> {
        let result = Evaluations::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .filter(Column::GraderId.eq(grader_id))
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询评审失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation()))
    }

    /// 列出提交的评审
    pub async fn list_evaluations_by_submission_impl(
        &self,
        submission_id: i64,
    ) -> Result<Vec<Evaluation>> {
        let results = Evaluations::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .order_by_desc(Column::EvaluatedAt)
            .all(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询评审列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_evaluation()).collect())
    }

    /// 列出评审人的评审
    pub async fn list_evaluations_by_grader_impl(&self, grader_id: i64) -> Result<Vec<Evaluation>> {
        let results = Evaluations::find()
            .filter(Column::GraderId.eq(grader_id))
            .order_by_desc(Column::EvaluatedAt)
            .all(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询评审列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_evaluation()).collect())
    }

    /// 统计提交的评审数量
    pub async fn count_evaluations_by_submission_impl(&self, submission_id: i64) -> Result<u64> {
        Evaluations::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .count(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("统计评审数量失败: {e}")))
    }

    /// 更新评审
    pub async fn update_evaluation_impl(&self, evaluation: &Evaluation) -> Result<Evaluation> {
        let model = ActiveModel {
            id: Set(evaluation.id),
            score: Set(evaluation.score),
            comment: Set(evaluation.comment.clone()),
            evaluated_at: Set(evaluation.evaluated_at.timestamp_millis()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("更新评审失败: {e}")))?;

        Ok(result.into_evaluation())
    }

    /// 删除评审
    pub async fn delete_evaluation_impl(&self, evaluation_id: i64) -> Result<bool> {
        let result = Evaluations::delete_by_id(evaluation_id)
            .exec(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("删除评审失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
