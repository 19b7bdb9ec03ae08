//! 离线快照后端
//!
//! 快照是一个 JSON 文件，描述 hub 的完整层级以及每个设计文档里的草图和图纸。
//! 每个草图/图纸页可以带有预先渲染好的文件（按格式），导出时直接复制到目标位置。
//! 渲染文件路径相对于快照文件所在目录。

use super::{FileNode, FolderNode, HierarchyProvider, HubNode, ProjectNode};
use crate::host::{
    ComponentView, Document, DocumentStore, DrawingRef, ExportFormat, Exporter2D, SheetRef,
    SketchRef,
};
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 预渲染文件表：格式 → 相对路径
pub type Renders = BTreeMap<ExportFormat, PathBuf>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub hubs: Vec<HubEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub id: String,
    pub name: String,
    pub root_folder: FolderEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub folders: Vec<FolderEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub extension: String,
    /// 非设计文档（例如 PDF 附件）没有 design
    #[serde(default)]
    pub design: Option<DesignEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignEntry {
    #[serde(default)]
    pub root_component: ComponentEntry,
    #[serde(default)]
    pub drawings: Vec<DrawingEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sketches: Vec<SketchEntry>,
    #[serde(default)]
    pub occurrences: Vec<ComponentEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub renders: Renders,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub renders: Renders,
}

/// 基于快照的层级提供方和文档仓库
pub struct SnapshotHub {
    name: String,
    blob_root: PathBuf,
    hubs: Vec<HubNode>,
    projects: HashMap<String, ProjectNode>,
    hub_projects: HashMap<String, Vec<String>>,
    root_folders: HashMap<String, String>,
    folders: HashMap<String, FolderNode>,
    subfolders: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<FileNode>>,
    designs: HashMap<String, (String, DesignEntry)>,
}

impl SnapshotHub {
    /// 从快照文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .with_context(|| format!("Invalid snapshot {}", path.display()))?;

        let blob_root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let hub = Self::from_snapshot(snapshot, blob_root)?;
        info!(
            "Loaded snapshot {}: {} hubs, {} folders",
            path.display(),
            hub.hubs.len(),
            hub.folders.len()
        );
        Ok(hub.with_name(format!("snapshot:{}", path.display())))
    }

    pub fn from_snapshot(snapshot: Snapshot, blob_root: PathBuf) -> Result<Self> {
        let mut this = Self {
            name: "snapshot".to_string(),
            blob_root,
            hubs: Vec::new(),
            projects: HashMap::new(),
            hub_projects: HashMap::new(),
            root_folders: HashMap::new(),
            folders: HashMap::new(),
            subfolders: HashMap::new(),
            files: HashMap::new(),
            designs: HashMap::new(),
        };

        for hub in snapshot.hubs {
            if this.hub_projects.contains_key(&hub.id) {
                bail!("Duplicate hub id {}", hub.id);
            }
            let mut project_ids = Vec::with_capacity(hub.projects.len());

            for project in hub.projects {
                if this.projects.contains_key(&project.id) {
                    bail!("Duplicate project id {}", project.id);
                }
                this.root_folders
                    .insert(project.id.clone(), project.root_folder.id.clone());
                this.index_folder(project.root_folder, None, &project.id)?;
                project_ids.push(project.id.clone());
                this.projects.insert(
                    project.id.clone(),
                    ProjectNode {
                        id: project.id,
                        name: project.name,
                        hub: hub.id.clone(),
                    },
                );
            }

            this.hub_projects.insert(hub.id.clone(), project_ids);
            this.hubs.push(HubNode {
                id: hub.id,
                name: hub.name,
            });
        }

        Ok(this)
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = name;
        self
    }

    fn index_folder(
        &mut self,
        entry: FolderEntry,
        parent: Option<&str>,
        project_id: &str,
    ) -> Result<()> {
        if self.folders.contains_key(&entry.id) {
            bail!("Duplicate folder id {}", entry.id);
        }
        self.folders.insert(
            entry.id.clone(),
            FolderNode {
                id: entry.id.clone(),
                name: entry.name.clone(),
                parent: parent.map(str::to_string),
                project: project_id.to_string(),
            },
        );

        let mut files = Vec::with_capacity(entry.files.len());
        for file in entry.files {
            if let Some(design) = file.design {
                if self.designs.contains_key(&file.id) {
                    bail!("Duplicate file id {}", file.id);
                }
                self.designs
                    .insert(file.id.clone(), (file.name.clone(), design));
            }
            files.push(FileNode {
                id: file.id,
                name: file.name,
                extension: file.extension,
                parent_folder: entry.id.clone(),
            });
        }

        let child_ids: Vec<String> = entry.folders.iter().map(|f| f.id.clone()).collect();
        for child in entry.folders {
            self.index_folder(child, Some(&entry.id), project_id)?;
        }

        self.files.insert(entry.id.clone(), files);
        self.subfolders.insert(entry.id, child_ids);

        Ok(())
    }
}

impl HierarchyProvider for SnapshotHub {
    fn hubs(&self) -> Result<Vec<HubNode>> {
        Ok(self.hubs.clone())
    }

    fn hub(&self, id: &str) -> Result<HubNode> {
        self.hubs
            .iter()
            .find(|h| h.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown hub {}", id))
    }

    fn projects(&self, hub_id: &str) -> Result<Vec<ProjectNode>> {
        let ids = self
            .hub_projects
            .get(hub_id)
            .ok_or_else(|| anyhow!("Unknown hub {}", hub_id))?;
        ids.iter().map(|id| self.project(id)).collect()
    }

    fn project(&self, id: &str) -> Result<ProjectNode> {
        self.projects
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown project {}", id))
    }

    fn root_folder(&self, project_id: &str) -> Result<FolderNode> {
        let root_id = self
            .root_folders
            .get(project_id)
            .ok_or_else(|| anyhow!("Unknown project {}", project_id))?;
        self.folder(root_id)
    }

    fn folder(&self, id: &str) -> Result<FolderNode> {
        self.folders
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown folder {}", id))
    }

    fn subfolders(&self, folder_id: &str) -> Result<Vec<FolderNode>> {
        let ids = self
            .subfolders
            .get(folder_id)
            .ok_or_else(|| anyhow!("Unknown folder {}", folder_id))?;
        ids.iter().map(|id| self.folder(id)).collect()
    }

    fn files(&self, folder_id: &str) -> Result<Vec<FileNode>> {
        self.files
            .get(folder_id)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown folder {}", folder_id))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl DocumentStore for SnapshotHub {
    fn open(&self, file: &FileNode) -> Result<Box<dyn Document>> {
        let (name, design) = self
            .designs
            .get(&file.id)
            .ok_or_else(|| anyhow!("\"{}\" is not a design document", file.name))?;

        debug!("Opening snapshot document {} ({})", name, file.id);
        Ok(Box::new(SnapshotDocument::new(
            name.clone(),
            design.clone(),
            self.blob_root.clone(),
        )))
    }
}

/// 从快照打开的文档
pub struct SnapshotDocument {
    name: String,
    design: DesignEntry,
    blob_root: PathBuf,
    sketch_renders: HashMap<String, Renders>,
    sheet_renders: HashMap<String, Renders>,
}

impl SnapshotDocument {
    fn new(name: String, design: DesignEntry, blob_root: PathBuf) -> Self {
        let mut sketch_renders = HashMap::new();
        collect_sketch_renders(&design.root_component, &mut sketch_renders);

        let sheet_renders = design
            .drawings
            .iter()
            .flat_map(|d| d.sheets.iter())
            .map(|s| (s.id.clone(), s.renders.clone()))
            .collect();

        Self {
            name,
            design,
            blob_root,
            sketch_renders,
            sheet_renders,
        }
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.blob_root.join(path)
        }
    }

    /// 复制预渲染文件，先写临时文件再原子重命名
    fn copy_render(&self, renders: Option<&Renders>, what: &str, target: &Path, format: ExportFormat) -> Result<()> {
        let renders = renders.ok_or_else(|| anyhow!("Unknown {}", what))?;
        let source = renders
            .get(&format)
            .map(|p| self.resolve_path(p))
            .ok_or_else(|| anyhow!("{} has no {} rendering", what, format))?;

        let data = std::fs::read(&source)
            .with_context(|| format!("Failed to read rendering {}", source.display()))?;

        let temp_path = target.with_extension("tmp");
        std::fs::write(&temp_path, data)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        std::fs::rename(&temp_path, target)
            .with_context(|| format!("Failed to move into {}", target.display()))?;

        Ok(())
    }
}

fn collect_sketch_renders(component: &ComponentEntry, out: &mut HashMap<String, Renders>) {
    for sketch in &component.sketches {
        out.insert(sketch.id.clone(), sketch.renders.clone());
    }
    for occurrence in &component.occurrences {
        collect_sketch_renders(occurrence, out);
    }
}

fn component_view(component: &ComponentEntry) -> ComponentView {
    ComponentView {
        name: component.name.clone(),
        sketches: component
            .sketches
            .iter()
            .map(|s| SketchRef {
                id: s.id.clone(),
                name: s.name.clone(),
            })
            .collect(),
        occurrences: component.occurrences.iter().map(component_view).collect(),
    }
}

impl Exporter2D for SnapshotDocument {
    fn export_sketch(&self, sketch: &SketchRef, path: &Path, format: ExportFormat) -> Result<()> {
        let what = format!("sketch \"{}\"", sketch.name);
        self.copy_render(self.sketch_renders.get(&sketch.id), &what, path, format)
    }

    fn export_sheet(&self, sheet: &SheetRef, path: &Path, format: ExportFormat) -> Result<()> {
        let what = format!("sheet \"{}\"", sheet.name);
        self.copy_render(self.sheet_renders.get(&sheet.id), &what, path, format)
    }
}

impl Document for SnapshotDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn root_component(&self) -> Result<ComponentView> {
        Ok(component_view(&self.design.root_component))
    }

    fn drawings(&self) -> Result<Vec<DrawingRef>> {
        Ok(self
            .design
            .drawings
            .iter()
            .map(|d| DrawingRef {
                id: d.id.clone(),
                name: d.name.clone(),
                sheets: d
                    .sheets
                    .iter()
                    .map(|s| SheetRef {
                        id: s.id.clone(),
                        name: s.name.clone(),
                    })
                    .collect(),
            })
            .collect())
    }

    fn close(self: Box<Self>, save_changes: bool) -> Result<()> {
        debug!("Closing snapshot document {} (save={})", self.name, save_changes);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn folder(id: &str, name: &str, files: Vec<FileEntry>, folders: Vec<FolderEntry>) -> FolderEntry {
        FolderEntry {
            id: id.to_string(),
            name: name.to_string(),
            files,
            folders,
        }
    }

    pub fn design_file(id: &str, name: &str, design: DesignEntry) -> FileEntry {
        FileEntry {
            id: id.to_string(),
            name: name.to_string(),
            extension: "f3d".to_string(),
            design: Some(design),
        }
    }

    pub fn plain_file(id: &str, name: &str, extension: &str) -> FileEntry {
        FileEntry {
            id: id.to_string(),
            name: name.to_string(),
            extension: extension.to_string(),
            design: None,
        }
    }

    pub fn renders(pairs: &[(ExportFormat, &str)]) -> Renders {
        pairs
            .iter()
            .map(|(f, p)| (*f, PathBuf::from(p)))
            .collect()
    }

    pub fn sketch(id: &str, name: &str, renders: Renders) -> SketchEntry {
        SketchEntry {
            id: id.to_string(),
            name: name.to_string(),
            renders,
        }
    }

    pub fn drawing(id: &str, name: &str, sheets: Vec<SheetEntry>) -> DrawingEntry {
        DrawingEntry {
            id: id.to_string(),
            name: name.to_string(),
            sheets,
        }
    }

    pub fn sheet(id: &str, name: &str, renders: Renders) -> SheetEntry {
        SheetEntry {
            id: id.to_string(),
            name: name.to_string(),
            renders,
        }
    }

    pub fn single_project(hub: &str, project: &str, root: FolderEntry) -> Snapshot {
        Snapshot {
            hubs: vec![HubEntry {
                id: format!("hub-{}", hub),
                name: hub.to_string(),
                projects: vec![ProjectEntry {
                    id: format!("project-{}", project),
                    name: project.to_string(),
                    root_folder: root,
                }],
            }],
        }
    }
}
