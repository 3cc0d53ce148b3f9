use crate::config::AppConfig;
use crate::errors::Result;
use crate::files::{FileStore, LocalFileStore};
use crate::models::users::entities::{NewUser, UserRole};
use crate::services::{EvaluationService, SubmissionService, ThesisService, UserService};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub files: Arc<dyn FileStore>,
    pub users: UserService,
    pub theses: ThesisService,
    pub submissions: SubmissionService,
    pub evaluations: EvaluationService,
}

/// 生成随机密码
fn generate_random_password() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// 初始化默认协调员账号
/// 如果数据库中没有任何用户，则创建一个协调员账号
async fn seed_coordinator(storage: &Arc<dyn Storage>, config: &AppConfig) {
    // 检查是否已有用户
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping coordinator seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default coordinator account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping coordinator seed", e);
            return;
        }
    }

    // 获取密码：优先从环境变量，否则生成随机密码
    let password = std::env::var("COORDINATOR_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password();
        warn!("==========================================================");
        warn!("  COORDINATOR PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated coordinator password: {}", pwd);
        warn!("  Please save this password or set COORDINATOR_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    // 哈希密码
    let password_hash = match hash_password(&password, &config.argon2) {
        Ok(hash) => hash,
        Err(e) => {
            warn!(
                "Failed to hash coordinator password: {}, skipping coordinator seed",
                e
            );
            return;
        }
    };

    let coordinator = NewUser {
        name: "Coordinator".to_string(),
        email: config.auth.seed_coordinator_email.clone(),
        password_hash,
        role: UserRole::Coordinator,
    };

    match storage.create_user(coordinator).await {
        Ok(user) => {
            info!(
                "Default coordinator account created successfully (ID: {}, email: {})",
                user.id, user.email
            );
        }
        Err(e) => {
            warn!("Failed to create coordinator account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、文件存储和各业务服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    // 初始化默认协调员账号（如果需要）
    seed_coordinator(&storage, config).await;

    let files: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(&config.upload.dir)?);
    warn!("File store initialized at {}", config.upload.dir);

    let theses = ThesisService::new(storage.clone(), files.clone());
    Ok(StartupContext {
        users: UserService::new(storage.clone(), config.argon2.clone()),
        submissions: SubmissionService::new(theses.clone()),
        evaluations: EvaluationService::new(theses.clone()),
        theses,
        storage,
        files,
    })
}
