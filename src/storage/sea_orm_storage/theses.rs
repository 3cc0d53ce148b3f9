//! 课题存储操作

use super::SeaOrmStorage;
use crate::entity::evaluations::{Column as EvaluationColumn, Entity as Evaluations};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::entity::theses::{ActiveModel, Column, Entity as Theses};
use crate::errors::{HWSystemError, Result};
use crate::models::theses::entities::{NewThesis, Thesis};
use crate::storage::ThesisFilter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

/// 课题可变字段的 ActiveModel，作者、指导教师与创建时间保持不变
pub(super) fn thesis_changes(thesis: &Thesis) -> ActiveModel {
    ActiveModel {
        id: Set(thesis.id),
        title: Set(thesis.title.clone()),
        summary: Set(thesis.summary.clone()),
        area: Set(thesis.area.clone()),
        status: Set(thesis.status.to_string()),
        updated_at: Set(thesis.updated_at.map(|t| t.timestamp_millis())),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    /// 创建课题
    pub async fn create_thesis_impl(&self, req: NewThesis) -> Result<Thesis> {
        let model = ActiveModel {
            title: Set(req.title),
            summary: Set(req.summary),
            area: Set(req.area),
            status: Set(req.status.to_string()),
            author_id: Set(req.author_id),
            supervisor_id: Set(req.supervisor_id),
            created_at: Set(req.created_at.timestamp_millis()),
            updated_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("创建课题失败: {e}")))?;

        Ok(result.into_thesis())
    }

    /// 通过 ID 获取课题
    pub async fn get_thesis_by_id_impl(&self, thesis_id: i64) -> Result<Option<Thesis>> {
        let result = Theses::find_by_id(thesis_id)
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询课题失败: {e}")))?;

        Ok(result.map(|m| m.into_thesis()))
    }

    /// 保存课题的可变字段
    pub async fn update_thesis_impl(&self, thesis: &Thesis) -> Result<Thesis> {
        let result = thesis_changes(thesis)
            .update(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("更新课题失败: {e}")))?;

        Ok(result.into_thesis())
    }

    /// 删除课题及其提交、评审
    pub async fn delete_thesis_impl(&self, thesis_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| HWSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let submission_ids: Vec<i64> = Submissions::find()
            .select_only()
            .column(SubmissionColumn::Id)
            .filter(SubmissionColumn::ThesisId.eq(thesis_id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询课题提交失败: {e}")))?;

        if !submission_ids.is_empty() {
            Evaluations::delete_many()
                .filter(EvaluationColumn::SubmissionId.is_in(submission_ids))
                .exec(&txn)
                .await
                .map_err(|e| HWSystemError::database_operation(format!("删除评审失败: {e}")))?;

            Submissions::delete_many()
                .filter(SubmissionColumn::ThesisId.eq(thesis_id))
                .exec(&txn)
                .await
                .map_err(|e| HWSystemError::database_operation(format!("删除提交失败: {e}")))?;
        }

        let result = Theses::delete_by_id(thesis_id)
            .exec(&txn)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("删除课题失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| HWSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 按条件列出课题
    pub async fn list_theses_impl(&self, filter: ThesisFilter) -> Result<Vec<Thesis>> {
        let mut select = Theses::find();

        // 作者筛选
        if let Some(author_id) = filter.author_id {
            select = select.filter(Column::AuthorId.eq(author_id));
        }

        // 指导教师筛选
        if let Some(supervisor_id) = filter.supervisor_id {
            select = select.filter(Column::SupervisorId.eq(supervisor_id));
        }

        // 状态筛选
        if let Some(status) = filter.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let results = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询课题列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_thesis()).collect())
    }
}
