pub mod delete;
pub mod list;
pub mod propose;
pub mod status;
pub mod update;

use std::sync::Arc;

use crate::errors::{HWSystemError, Result};
use crate::files::FileStore;
use crate::models::theses::entities::{Thesis, ThesisStatus};
use crate::models::theses::requests::{ProposeThesisRequest, UpdateThesisRequest};
use crate::models::users::entities::User;
use crate::storage::Storage;

/// 课题生命周期
///
/// 课题状态只通过这里变更；提交与评审流程也经由 `change_status` 推动课题流转。
#[derive(Clone)]
pub struct ThesisService {
    storage: Arc<dyn Storage>,
    files: Arc<dyn FileStore>,
}

impl ThesisService {
    pub fn new(storage: Arc<dyn Storage>, files: Arc<dyn FileStore>) -> Self {
        Self { storage, files }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub(crate) fn files(&self) -> &Arc<dyn FileStore> {
        &self.files
    }

    /// 按 ID 查找课题，不存在时返回 NotFound
    pub(crate) async fn find_thesis(&self, thesis_id: i64) -> Result<Thesis> {
        self.storage
            .get_thesis_by_id(thesis_id)
            .await?
            .ok_or_else(|| HWSystemError::not_found(format!("课题 {thesis_id} 不存在")))
    }

    // 学生提出课题
    pub async fn propose_thesis(&self, author: &User, req: ProposeThesisRequest) -> Result<Thesis> {
        propose::propose_thesis(self, author, req).await
    }

    // 变更课题状态
    pub async fn change_status(
        &self,
        thesis_id: i64,
        new_status: ThesisStatus,
        actor: &User,
    ) -> Result<Thesis> {
        status::change_status(self, thesis_id, new_status, actor).await
    }

    // 修改课题字段
    pub async fn update_fields(
        &self,
        thesis_id: i64,
        req: UpdateThesisRequest,
        actor: &User,
    ) -> Result<Thesis> {
        update::update_fields(self, thesis_id, req, actor).await
    }

    // 删除课题
    pub async fn delete_thesis(&self, thesis_id: i64, actor: &User) -> Result<()> {
        delete::delete_thesis(self, thesis_id, actor).await
    }

    // 查看单个课题
    pub async fn get_thesis(&self, thesis_id: i64, actor: &User) -> Result<Thesis> {
        list::get_thesis(self, thesis_id, actor).await
    }

    // 按角色列出可见课题
    pub async fn list_visible(
        &self,
        actor: &User,
        status: Option<ThesisStatus>,
    ) -> Result<Vec<Thesis>> {
        list::list_visible(self, actor, status).await
    }

    pub async fn list_all(&self) -> Result<Vec<Thesis>> {
        list::list_all(self).await
    }

    pub async fn list_by_status(&self, status: ThesisStatus) -> Result<Vec<Thesis>> {
        list::list_by_status(self, status).await
    }

    pub async fn list_by_author(
        &self,
        author_id: i64,
        status: Option<ThesisStatus>,
    ) -> Result<Vec<Thesis>> {
        list::list_by_author(self, author_id, status).await
    }

    pub async fn list_by_supervisor(
        &self,
        supervisor_id: i64,
        status: Option<ThesisStatus>,
    ) -> Result<Vec<Thesis>> {
        list::list_by_supervisor(self, supervisor_id, status).await
    }
}
