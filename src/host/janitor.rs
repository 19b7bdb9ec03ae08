//! 宿主缓存清理
//!
//! 清空缓存目录的内容但保留目录本身。被占用的文件删除失败时跳过并继续。

use super::CacheJanitor;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub struct FolderJanitor {
    folders: Vec<PathBuf>,
}

impl FolderJanitor {
    pub fn new(folders: Vec<PathBuf>) -> Self {
        Self { folders }
    }

    /// 配置为空时使用平台默认的宿主缓存位置
    pub fn with_defaults_if_empty(folders: Vec<PathBuf>) -> Self {
        if folders.is_empty() {
            Self::new(default_cache_folders())
        } else {
            Self::new(folders)
        }
    }

    pub fn folders(&self) -> &[PathBuf] {
        &self.folders
    }

    /// 清空单个目录，返回删除的条目数
    fn clear_folder(folder: &Path) -> usize {
        let mut cleared = 0;

        for entry in WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter()
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Could not clear cache folder {}: {}", folder.display(), e);
                    continue;
                }
            };

            let path = entry.path();
            let result = if entry.file_type().is_dir() {
                std::fs::remove_dir_all(path)
            } else {
                std::fs::remove_file(path)
            };

            match result {
                Ok(()) => cleared += 1,
                Err(e) => debug!("Cache item {} is locked: {}", path.display(), e),
            }
        }

        cleared
    }
}

impl CacheJanitor for FolderJanitor {
    fn purge(&self) {
        let cleared: usize = self
            .folders
            .iter()
            .filter(|f| f.is_dir())
            .map(|f| Self::clear_folder(f))
            .sum();

        if cleared > 0 {
            info!("Cleared {} cache items", cleared);
        }
    }
}

/// 宿主在各平台上的缓存目录
pub fn default_cache_folders() -> Vec<PathBuf> {
    let temp_dir = std::env::temp_dir();
    let mut folders = vec![temp_dir.join("Autodesk").join("Fusion360")];

    if cfg!(target_os = "windows") {
        if let Some(local) = crate::dirs::cache_dir() {
            let autodesk = local.join("Autodesk");
            folders.push(autodesk.join("Webdeploy").join("Production"));
            folders.push(autodesk.join("Fusion 360").join("Cache"));
            folders.push(autodesk.join("Fusion 360").join("Temp"));
        }
    } else if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        folders.push(
            home.join("Library")
                .join("Application Support")
                .join("Autodesk")
                .join("Fusion 360")
                .join("Cache"),
        );
        folders.push(home.join("Library").join("Caches").join("com.autodesk.fusion360"));
    }

    folders
}
