//! 交互式选择起始文件夹和导出格式

use crate::core::{Answer, Choice, Chooser, HubCatalog, SelectError, TernaryPrompt};
use crate::host::ExportFormat;
use crate::hub::FolderNode;
use tracing::info;

/// 依次选择 hub、项目、文件夹
///
/// 只有一个 hub 或项目时自动选中。返回 `Ok(None)` 表示用户取消。
pub fn select_start_folder(
    catalog: &HubCatalog,
    chooser: &mut dyn Chooser,
) -> Result<Option<FolderNode>, SelectError> {
    let hub = match catalog.hubs.as_slice() {
        [] => return Err(SelectError::NoHubs),
        [only] => only,
        hubs => {
            let options: Vec<_> = hubs
                .iter()
                .map(|h| Choice::new(h.hub.id.clone(), h.hub.name.clone()))
                .collect();
            let Some(id) = chooser.choose("Select Hub", &options) else {
                return Ok(None);
            };
            catalog.hub(&id).ok_or(SelectError::UnknownHub(id))?
        }
    };
    info!("Selected hub: {}", hub.hub.name);

    let project = match hub.projects.as_slice() {
        [] => return Err(SelectError::NoProjects(hub.hub.name.clone())),
        [only] => only,
        projects => {
            let options: Vec<_> = projects
                .iter()
                .map(|p| Choice::new(p.project.id.clone(), p.project.name.clone()))
                .collect();
            let Some(id) = chooser.choose("Select Project", &options) else {
                return Ok(None);
            };
            hub.project(&id).ok_or(SelectError::UnknownProject(id))?
        }
    };
    info!("Selected project: {}", project.project.name);

    if project.folders.is_empty() {
        let message = format!(
            "No folders found in project \"{}\".\n\nUse the root folder?",
            project.project.name
        );
        return Ok(chooser
            .confirm("Use Root Folder?", &message)
            .then(|| project.root.clone()));
    }

    let mut options = vec![Choice::new(project.root.id.clone(), "Root Folder")];
    options.extend(
        project
            .folders
            .iter()
            .map(|f| Choice::new(f.id.clone(), f.name.clone())),
    );

    let Some(id) = chooser.choose("Select Folder", &options) else {
        return Ok(None);
    };

    if id == project.root.id {
        return Ok(Some(project.root.clone()));
    }
    project
        .folders
        .iter()
        .find(|f| f.id == id)
        .cloned()
        .map(Some)
        .ok_or(SelectError::UnknownFolder(id))
}

/// 询问导出格式，取消时返回 `None`
pub fn select_formats(prompt: &mut dyn TernaryPrompt) -> Option<Vec<ExportFormat>> {
    let primary = match prompt.ask(
        "Select Export Format",
        "Choose the export format:\n\nClick 'Yes' for PDF\nClick 'No' for DXF\nClick 'Cancel' to exit",
        true,
    ) {
        Answer::Yes => ExportFormat::Pdf,
        Answer::No => ExportFormat::Dxf,
        Answer::Cancel => return None,
    };

    let both = prompt.ask(
        "Export Both Formats?",
        "Would you like to export both PDF and DXF formats?",
        false,
    );
    if both == Answer::Yes {
        Some(vec![ExportFormat::Pdf, ExportFormat::Dxf])
    } else {
        Some(vec![primary])
    }
}
