//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::evaluations::{Column as EvaluationColumn, Entity as Evaluations};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{HWSystemError, Result};
use crate::models::submissions::entities::{NewSubmission, Submission, SubmissionKind};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建提交
    pub async fn create_submission_impl(&self, req: NewSubmission) -> Result<Submission> {
        let model = ActiveModel {
            thesis_id: Set(req.thesis_id),
            kind: Set(req.kind.to_string()),
            note: Set(req.note),
            file_ref: Set(req.file_ref),
            sent_at: Set(req.sent_at.timestamp_millis()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出课题的提交，按提交时间倒序
    pub async fn list_submissions_by_thesis_impl(
        &self,
        thesis_id: i64,
        kind: Option<SubmissionKind>,
    ) -> Result<Vec<Submission>> {
        let mut select = Submissions::find().filter(Column::ThesisId.eq(thesis_id));

        // 类型筛选
        if let Some(kind) = kind {
            select = select.filter(Column::Kind.eq(kind.to_string()));
        }

        let results = select
            .order_by_desc(Column::SentAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 获取课题最新的一次提交
    pub async fn get_latest_submission_impl(&self, thesis_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::ThesisId.eq(thesis_id))
            .order_by_desc(Column::SentAt)
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询最新提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 删除提交及其评审
    pub async fn delete_submission_impl(&self, submission_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| HWSystemError::database_operation(format!("开启事务失败: {e}")))?;

        Evaluations::delete_many()
            .filter(EvaluationColumn::SubmissionId.eq(submission_id))
            .exec(&txn)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("删除评审失败: {e}")))?;

        let result = Submissions::delete_by_id(submission_id)
            .exec(&txn)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("删除提交失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| HWSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
