//! 远程层级到本地目录的镜像
//!
//! 输出路径结构：`<输出根目录>/Hub <hub>/Project <project>/<文件夹链>/<文件名>`

use crate::core::error::ExportError;
use crate::hub::{FileNode, HierarchyProvider};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// 向上查找父文件夹的最大深度，超过即认为层级有环
const MAX_FOLDER_DEPTH: usize = 1024;

/// 与导出文件扩展名冲突的后缀
const RESERVED_SUFFIXES: [&str; 3] = [".dxf", ".dwg", ".pdf"];

static INVALID_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9 \n.]").expect("static pattern is valid")
});

/// 把名称转换为安全的路径片段
///
/// 结果非空，只包含 `[A-Za-z0-9 \n._]`，且不以 `.dxf` / `.dwg` / `.pdf` 结尾。
/// 对自身的输出再次调用结果不变。
pub fn sanitize(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return "Unnamed".to_string();
    }

    let mut cleaned = INVALID_CHARS.replace_all(trimmed, "_").into_owned();

    // "." 和 ".." 会在拼接时改变目录层级
    if cleaned.chars().all(|c| c == '.') {
        return cleaned.replace('.', "_");
    }

    if RESERVED_SUFFIXES.iter().any(|s| cleaned.ends_with(s)) {
        // 全部是 ASCII，按字节切分安全
        let dot = cleaned.len() - 4;
        cleaned.replace_range(dot..dot + 1, "_");
    }

    cleaned
}

/// 文件所在文件夹链（根 → 叶）的净化名称，以及项目名和 hub 名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ancestry {
    pub hub_name: String,
    pub project_name: String,
    pub folders: Vec<String>,
}

/// 通过父文件夹 id 向上回溯到项目根目录
pub fn resolve_ancestry(
    provider: &dyn HierarchyProvider,
    file: &FileNode,
) -> anyhow::Result<Ancestry> {
    let mut folder = provider.folder(&file.parent_folder)?;
    let mut folders = vec![sanitize(&folder.name)];

    while let Some(parent_id) = folder.parent.clone() {
        assert!(
            folders.len() <= MAX_FOLDER_DEPTH,
            "folder hierarchy above \"{}\" is cyclic",
            file.name
        );
        folder = provider.folder(&parent_id)?;
        folders.push(sanitize(&folder.name));
    }
    folders.reverse();

    let project = provider.project(&folder.project)?;
    let hub = provider.hub(&project.hub)?;

    Ok(Ancestry {
        hub_name: hub.name,
        project_name: project.name,
        folders,
    })
}

/// 拼接路径并创建所有缺失的目录
pub fn take<I, S>(base: &Path, segments: I) -> std::io::Result<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let mut path = base.to_path_buf();
    for segment in segments {
        path.push(segment);
    }
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

/// 计算文件的本地输出目录并确保其存在
///
/// 重复调用返回相同路径，已存在的目录不受影响。
pub fn materialize_output_path(
    provider: &dyn HierarchyProvider,
    output_root: &Path,
    file: &FileNode,
) -> Result<PathBuf, ExportError> {
    let ancestry = resolve_ancestry(provider, file).map_err(|e| ExportError::PathCreation {
        file: file.name.clone(),
        path: output_root.to_path_buf(),
        source: e.context("could not resolve folder ancestry"),
    })?;

    let mut segments = vec![
        format!("Hub {}", sanitize(&ancestry.hub_name)),
        format!("Project {}", sanitize(&ancestry.project_name)),
    ];
    segments.extend(ancestry.folders);
    segments.push(sanitize(&file.name));

    let intended: PathBuf = segments.iter().collect();
    take(output_root, &segments).map_err(|e| ExportError::PathCreation {
        file: file.name.clone(),
        path: output_root.join(intended),
        source: e.into(),
    })
}
