pub mod snapshot;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use snapshot::{Snapshot, SnapshotHub};

/// 可参与导出的文档扩展名
pub const ELIGIBLE_EXTENSIONS: [&str; 2] = ["f3d", "f3z"];

/// Hub（顶层账户/组织命名空间）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubNode {
    pub id: String,
    pub name: String,
}

/// 项目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectNode {
    pub id: String,
    pub name: String,
    /// 所属 hub 的 id
    pub hub: String,
}

/// 远程文件夹
///
/// `parent` 只是一个查找用的 id，不持有父节点。没有父节点的文件夹就是项目根目录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    pub id: String,
    pub name: String,
    pub parent: Option<String>,
    /// 所属项目的 id
    pub project: String,
}

impl FolderNode {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// 远程文件引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub id: String,
    pub name: String,
    pub extension: String,
    pub parent_folder: String,
}

impl FileNode {
    /// 只有 f3d / f3z 文档会被打开导出
    pub fn is_eligible(&self) -> bool {
        ELIGIBLE_EXTENSIONS.contains(&self.extension.as_str())
    }
}

/// 只读的 Hub → Project → Folder → File 层级访问接口
pub trait HierarchyProvider: Send + Sync {
    /// 列出所有 hub
    fn hubs(&self) -> Result<Vec<HubNode>>;

    fn hub(&self, id: &str) -> Result<HubNode>;

    /// 列出 hub 下的项目
    fn projects(&self, hub_id: &str) -> Result<Vec<ProjectNode>>;

    fn project(&self, id: &str) -> Result<ProjectNode>;

    /// 项目根目录
    fn root_folder(&self, project_id: &str) -> Result<FolderNode>;

    fn folder(&self, id: &str) -> Result<FolderNode>;

    /// 直接子文件夹，按提供方顺序
    fn subfolders(&self, folder_id: &str) -> Result<Vec<FolderNode>>;

    /// 直接包含的文件，按提供方顺序
    fn files(&self, folder_id: &str) -> Result<Vec<FileNode>>;

    /// 获取数据源名称（用于日志）
    fn name(&self) -> &str;
}
