use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use super::FileStore;
use crate::errors::{HWSystemError, Result};

/// 本地磁盘文件存储
///
/// 文件名为 `<时间戳>-<uuid><扩展名>`，存储引用即该文件名。
pub struct LocalFileStore {
    dir: PathBuf,
}

impl LocalFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        // 确保上传目录存在
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                HWSystemError::file_operation(format!("创建上传目录失败: {e}"))
            })?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // 引用只允许是单个文件名
    fn resolve(&self, reference: &str) -> Result<PathBuf> {
        let name = Path::new(reference);
        if reference.is_empty() || name.file_name().map(|n| n != name.as_os_str()).unwrap_or(true)
        {
            return Err(HWSystemError::file_operation(format!(
                "非法的文件引用: {reference}"
            )));
        }
        Ok(self.dir.join(name))
    }
}

fn stored_name(original_name: &str) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();
    format!(
        "{}-{}{}",
        chrono::Utc::now().timestamp(),
        Uuid::new_v4(),
        extension
    )
}

#[async_trait::async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, bytes: &[u8], original_name: &str) -> Result<String> {
        let name = stored_name(original_name);
        let path = self.dir.join(&name);

        let mut f = fs::File::create(&path)
            .map_err(|e| HWSystemError::file_operation(format!("文件创建失败: {e}")))?;
        if let Err(e) = f.write_all(bytes) {
            let _ = fs::remove_file(&path);
            return Err(HWSystemError::file_operation(format!("文件写入失败: {e}")));
        }

        debug!("Stored file {} ({} bytes)", name, bytes.len());
        Ok(name)
    }

    async fn delete(&self, reference: &str) -> Result<()> {
        let path = self.resolve(reference)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed file {}", reference);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HWSystemError::file_operation(format!("文件删除失败: {e}"))),
        }
    }
}
