use std::path::PathBuf;

pub mod commands;
pub mod config;
pub mod console;
pub mod core;
pub mod host;
pub mod hub;
pub mod logging;

pub use core::{ExportEngine, ExportReport, ExportSettings};
pub use host::{ArtifactKind, ExportFormat};
pub use hub::{HierarchyProvider, SnapshotHub};

/// 默认配置目录，不可用时退回当前目录下的 `.hubexport`
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("hubexport"))
        .unwrap_or_else(|| PathBuf::from(".hubexport"))
}

// 平台目录，不引入 dirs crate
pub mod dirs {
    use std::path::PathBuf;

    pub fn config_dir() -> Option<PathBuf> {
        if cfg!(target_os = "windows") {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        } else if cfg!(target_os = "macos") {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library").join("Application Support"))
        } else {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        }
    }

    pub fn cache_dir() -> Option<PathBuf> {
        if cfg!(target_os = "windows") {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        } else if cfg!(target_os = "macos") {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library").join("Caches"))
        } else {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".cache"))
        }
    }
}
