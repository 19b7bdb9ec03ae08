//! 应用配置模块

use crate::host::{ArtifactKind, ExportFormat};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 列表选择方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PickerKind {
    /// 只用是/否/取消对话框二分选择
    #[default]
    Ternary,
    /// 输入编号直接选择
    List,
}

/// 导出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// 为空时运行前询问
    #[serde(default)]
    pub formats: Vec<ExportFormat>,
    #[serde(default = "default_kinds")]
    pub kinds: Vec<ArtifactKind>,
    #[serde(default = "default_clear_cache")]
    pub clear_cache_after_each_file: bool,
    /// 为空时使用平台默认缓存目录
    #[serde(default)]
    pub cache_folders: Vec<PathBuf>,
    #[serde(default)]
    pub picker: PickerKind,
}

fn default_kinds() -> Vec<ArtifactKind> {
    vec![ArtifactKind::Drawings]
}

fn default_clear_cache() -> bool {
    true
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            formats: Vec::new(),
            kinds: default_kinds(),
            clear_cache_after_each_file: default_clear_cache(),
            cache_folders: Vec::new(),
            picker: PickerKind::default(),
        }
    }
}

impl ExportConfig {
    /// 从配置文件加载导出配置，任何问题都回退到默认值
    pub fn load(config_dir: &Path) -> Self {
        read_section(config_dir, "export").unwrap_or_default()
    }

    /// 保存导出配置，保留文件中的其它键
    pub fn save(&self, config_dir: &Path) -> io::Result<()> {
        write_section(config_dir, "export", self)
    }
}

/// 读取 config.json 中的一个键
pub(crate) fn read_section<T>(config_dir: &Path, key: &str) -> Option<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(config_dir.join("config.json")).ok()?;
    let config = serde_json::from_str::<serde_json::Value>(&content).ok()?;
    let section = config.get(key)?;
    serde_json::from_value(section.clone()).ok()
}

/// 更新 config.json 中的一个键
pub(crate) fn write_section<T: Serialize>(config_dir: &Path, key: &str, value: &T) -> io::Result<()> {
    fs::create_dir_all(config_dir)?;
    let config_file = config_dir.join("config.json");

    // 读取现有配置
    let mut config: serde_json::Value = if config_file.exists() {
        let content = fs::read_to_string(&config_file)?;
        serde_json::from_str(&content).unwrap_or_else(|_| serde_json::json!({}))
    } else {
        serde_json::json!({})
    };
    if !config.is_object() {
        config = serde_json::json!({});
    }

    config[key] = serde_json::to_value(value).map_err(io::Error::other)?;

    let content = serde_json::to_string_pretty(&config).map_err(io::Error::other)?;
    fs::write(&config_file, content)
}
