//! 提交文件存储
//!
//! 核心层只通过 `FileStore` 保存和删除文件，不关心文件内容。

mod local;

pub use local::LocalFileStore;

use crate::errors::Result;

#[async_trait::async_trait]
pub trait FileStore: Send + Sync {
    /// 保存文件，返回存储引用
    async fn save(&self, bytes: &[u8], original_name: &str) -> Result<String>;
    /// 删除存储引用对应的文件，文件不存在时视为成功
    async fn delete(&self, reference: &str) -> Result<()>;
}
