//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 级联删除依赖外键，同时在事务内显式删除子记录，避免 SQLite 未开启外键时残留数据。

mod evaluations;
mod submissions;
mod theses;
mod users;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{HWSystemError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| HWSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| HWSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| HWSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(HWSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    evaluations::entities::{Evaluation, NewEvaluation},
    submissions::entities::{NewSubmission, Submission, SubmissionKind},
    theses::entities::{NewThesis, Thesis},
    users::entities::{NewUser, User, UserRole, UserUpdate},
};
use crate::storage::{Storage, ThesisFilter};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_users_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        self.list_users_by_role_impl(role).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.list_users_impl().await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    // 课题模块
    async fn create_thesis(&self, thesis: NewThesis) -> Result<Thesis> {
        self.create_thesis_impl(thesis).await
    }

    async fn get_thesis_by_id(&self, id: i64) -> Result<Option<Thesis>> {
        self.get_thesis_by_id_impl(id).await
    }

    async fn update_thesis(&self, thesis: &Thesis) -> Result<Thesis> {
        self.update_thesis_impl(thesis).await
    }

    async fn delete_thesis(&self, id: i64) -> Result<bool> {
        self.delete_thesis_impl(id).await
    }

    async fn list_theses(&self, filter: ThesisFilter) -> Result<Vec<Thesis>> {
        self.list_theses_impl(filter).await
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn list_submissions_by_thesis(
        &self,
        thesis_id: i64,
        kind: Option<SubmissionKind>,
    ) -> Result<Vec<Submission>> {
        self.list_submissions_by_thesis_impl(thesis_id, kind).await
    }

    async fn get_latest_submission(&self, thesis_id: i64) -> Result<Option<Submission>> {
        self.get_latest_submission_impl(thesis_id).await
    }

    async fn delete_submission(&self, id: i64) -> Result<bool> {
        self.delete_submission_impl(id).await
    }

    // 评审模块
    async fn create_evaluation(&self, evaluation: NewEvaluation) -> Result<Evaluation> {
        self.create_evaluation_impl(evaluation).await
    }

    async fn record_evaluation(
        &self,
        evaluation: NewEvaluation,
        thesis: &Thesis,
    ) -> Result<(Evaluation, Thesis)> {
        self.record_evaluation_impl(evaluation, thesis).await
    }

    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>> {
        self.get_evaluation_by_id_impl(id).await
    }

    async fn get_evaluation_by_submission_and_grader(
        &self,
        submission_id: i64,
        grader_id: i64,
    ) -> Result<Option<Evaluation>> {
        self.get_evaluation_by_submission_and_grader_impl(submission_id, grader_id)
            .await
    }

    async fn list_evaluations_by_submission(
        &self,
        submission_id: i64,
    ) -> Result<Vec<Evaluation>> {
        self.list_evaluations_by_submission_impl(submission_id).await
    }

    async fn list_evaluations_by_grader(&self, grader_id: i64) -> Result<Vec<Evaluation>> {
        self.list_evaluations_by_grader_impl(grader_id).await
    }

    async fn count_evaluations_by_submission(&self, submission_id: i64) -> Result<u64> {
        self.count_evaluations_by_submission_impl(submission_id)
            .await
    }

    async fn update_evaluation(&self, evaluation: &Evaluation) -> Result<Evaluation> {
        self.update_evaluation_impl(evaluation).await
    }

    async fn delete_evaluation(&self, id: i64) -> Result<bool> {
        self.delete_evaluation_impl(id).await
    }
}
