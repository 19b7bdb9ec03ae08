use crate::hub::{FileNode, FolderNode, HierarchyProvider};
use tracing::{info, warn};

/// 递归收集文件夹及其所有子文件夹中的文件
///
/// 先返回当前文件夹的直接文件，再按提供方顺序进入子文件夹。
/// 层级必须无环。读取某个文件夹失败时只记录警告，整个子树不贡献文件，兄弟文件夹照常遍历。
pub fn collect_files(provider: &dyn HierarchyProvider, folder: &FolderNode) -> Vec<FileNode> {
    let mut files = match provider.files(&folder.id) {
        Ok(files) => files,
        Err(e) => {
            warn!("Failed to list files in folder \"{}\": {:#}", folder.name, e);
            return Vec::new();
        }
    };

    if !files.is_empty() {
        info!("Found {} files in folder: {}", files.len(), folder.name);
    }

    let subfolders = match provider.subfolders(&folder.id) {
        Ok(subfolders) => subfolders,
        Err(e) => {
            warn!("Failed to list sub-folders of \"{}\": {:#}", folder.name, e);
            return Vec::new();
        }
    };

    if !subfolders.is_empty() {
        info!("Processing {} sub-folders in: {}", subfolders.len(), folder.name);
    }

    for sub_folder in &subfolders {
        let sub_files = collect_files(provider, sub_folder);
        if !sub_files.is_empty() {
            info!("Added {} files from sub-folder: {}", sub_files.len(), sub_folder.name);
        }
        files.extend(sub_files);
    }

    files
}
