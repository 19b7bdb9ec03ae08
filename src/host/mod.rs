//! 宿主 CAD 应用的协作接口
//!
//! 打开/关闭文档、导出草图与图纸、清理缓存都由宿主完成，这里只定义调用边界。

pub mod janitor;

use crate::hub::FileNode;
use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub use janitor::FolderJanitor;

/// 导出格式
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Dxf,
    Dwg,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Dxf => "dxf",
            ExportFormat::Dwg => "dwg",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// 要导出的 2D 内容类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Sketches,
    Drawings,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Sketches => write!(f, "Sketches"),
            ArtifactKind::Drawings => write!(f, "Drawings"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SketchRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingRef {
    pub id: String,
    pub name: String,
    pub sheets: Vec<SheetRef>,
}

/// 组件视图：自身的草图加上各个引用（occurrence）的子组件
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentView {
    pub name: String,
    pub sketches: Vec<SketchRef>,
    pub occurrences: Vec<ComponentView>,
}

/// 宿主的 2D 导出能力
pub trait Exporter2D {
    /// 把草图导出为矢量文件
    fn export_sketch(&self, sketch: &SketchRef, path: &Path, format: ExportFormat) -> Result<()>;

    /// 把图纸的一页导出为文件
    fn export_sheet(&self, sheet: &SheetRef, path: &Path, format: ExportFormat) -> Result<()>;
}

/// 已打开的文档
pub trait Document: Exporter2D {
    fn name(&self) -> &str;

    fn root_component(&self) -> Result<ComponentView>;

    fn drawings(&self) -> Result<Vec<DrawingRef>>;

    /// 关闭文档，消耗句柄
    fn close(self: Box<Self>, save_changes: bool) -> Result<()>;
}

pub trait DocumentStore: Send + Sync {
    fn open(&self, file: &FileNode) -> Result<Box<dyn Document>>;
}

/// 尽力而为的宿主缓存清理，失败只记日志
pub trait CacheJanitor: Send + Sync {
    fn purge(&self);
}

