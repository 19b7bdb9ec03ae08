use std::path::PathBuf;
use thiserror::Error;

/// 单个文件或单个导出物处理失败
///
/// 都在本地捕获并计为一个 issue，不会中断整个导出。
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Opening \"{file}\" failed: {source:#}")]
    Open {
        file: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to export {artifact} \"{name}\" in format {format}: {source:#}")]
    Export {
        artifact: &'static str,
        name: String,
        format: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Couldn't make folder \"{}\" for \"{file}\": {source:#}", path.display())]
    PathCreation {
        file: String,
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to close \"{file}\": {source:#}")]
    Close {
        file: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed while working on \"{file}\": {source:#}")]
    Document {
        file: String,
        #[source]
        source: anyhow::Error,
    },
}

/// 交互式选择起始文件夹时的错误
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("No hubs found in your account. Make sure you're logged in and have access to cloud data.")]
    NoHubs,

    #[error("No projects found in hub: {0}")]
    NoProjects(String),

    #[error("Hub {0} not found")]
    UnknownHub(String),

    #[error("Project {0} not found")]
    UnknownProject(String),

    #[error("Folder {0} not found")]
    UnknownFolder(String),
}
