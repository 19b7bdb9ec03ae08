//! Hub / 项目 / 顶层文件夹目录
//!
//! 交互选择前在后台线程预取，只有一个生产者和一个消费者，结果只被取走一次。

use crate::hub::{FolderNode, HierarchyProvider, HubNode, ProjectNode};
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct ProjectListing {
    pub project: ProjectNode,
    pub root: FolderNode,
    /// 根目录的直接子文件夹
    pub folders: Vec<FolderNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HubListing {
    pub hub: HubNode,
    pub projects: Vec<ProjectListing>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HubCatalog {
    pub hubs: Vec<HubListing>,
}

impl HubCatalog {
    /// 同步加载完整目录
    ///
    /// 列出 hub 失败会返回错误；单个项目读取失败只跳过该项目。
    pub fn load(provider: &dyn HierarchyProvider) -> Result<Self> {
        let hubs = provider.hubs().context("Error loading hubs")?;
        info!("Loading catalog for {} hubs from {}", hubs.len(), provider.name());

        let mut listings = Vec::with_capacity(hubs.len());
        for hub in hubs {
            let projects = match provider.projects(&hub.id) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Error loading projects of hub \"{}\": {:#}", hub.name, e);
                    Vec::new()
                }
            };

            let mut project_listings = Vec::with_capacity(projects.len());
            for project in projects {
                match Self::load_project(provider, &project) {
                    Ok((root, folders)) => project_listings.push(ProjectListing {
                        project,
                        root,
                        folders,
                    }),
                    Err(e) => warn!("Error loading folders of project \"{}\": {:#}", project.name, e),
                }
            }

            listings.push(HubListing {
                hub,
                projects: project_listings,
            });
        }

        Ok(Self { hubs: listings })
    }

    fn load_project(
        provider: &dyn HierarchyProvider,
        project: &ProjectNode,
    ) -> Result<(FolderNode, Vec<FolderNode>)> {
        let root = provider.root_folder(&project.id)?;
        let folders = provider.subfolders(&root.id)?;
        Ok((root, folders))
    }

    pub fn hub(&self, id: &str) -> Option<&HubListing> {
        self.hubs.iter().find(|h| h.hub.id == id)
    }
}

impl HubListing {
    pub fn project(&self, id: &str) -> Option<&ProjectListing> {
        self.projects.iter().find(|p| p.project.id == id)
    }
}

/// 正在后台加载的目录
pub struct PendingCatalog {
    handle: JoinHandle<Result<HubCatalog>>,
}

impl PendingCatalog {
    /// 在阻塞线程池上开始加载
    pub fn spawn(provider: Arc<dyn HierarchyProvider>) -> Self {
        let handle = tokio::task::spawn_blocking(move || HubCatalog::load(provider.as_ref()));
        Self { handle }
    }

    /// 等待加载完成，消耗自身
    pub async fn wait(self) -> Result<HubCatalog> {
        self.handle.await.context("Catalog prefetch task failed")?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::snapshot::fixtures::*;
    use crate::hub::snapshot::{HubEntry, ProjectEntry, Snapshot};
    use crate::hub::SnapshotHub;
    use std::path::PathBuf;

    fn snapshot() -> Snapshot {
        Snapshot {
            hubs: vec![
                HubEntry {
                    id: "h1".to_string(),
                    name: "Team".to_string(),
                    projects: vec![
                        ProjectEntry {
                            id: "p1".to_string(),
                            name: "Alpha".to_string(),
                            root_folder: folder(
                                "r1",
                                "Alpha",
                                vec![],
                                vec![
                                    folder("f1", "Parts", vec![], vec![folder("f1a", "Deep", vec![], vec![])]),
                                    folder("f2", "Assemblies", vec![], vec![]),
                                ],
                            ),
                        },
                        ProjectEntry {
                            id: "p2".to_string(),
                            name: "Beta".to_string(),
                            root_folder: folder("r2", "Beta", vec![], vec![]),
                        },
                    ],
                },
                HubEntry {
                    id: "h2".to_string(),
                    name: "Personal".to_string(),
                    projects: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_load_lists_top_level_only() {
        let hub = SnapshotHub::from_snapshot(snapshot(), PathBuf::from(".")).unwrap();
        let catalog = HubCatalog::load(&hub).unwrap();

        assert_eq!(catalog.hubs.len(), 2);
        let team = catalog.hub("h1").unwrap();
        let alpha = team.project("p1").unwrap();
        assert_eq!(alpha.root.id, "r1");
        let names: Vec<_> = alpha.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Parts", "Assemblies"]);
        assert!(team.project("p2").unwrap().folders.is_empty());
        assert!(catalog.hub("h2").unwrap().projects.is_empty());
    }

    #[tokio::test]
    async fn test_prefetch_resolves_once() {
        let hub: Arc<dyn HierarchyProvider> =
            Arc::new(SnapshotHub::from_snapshot(snapshot(), PathBuf::from(".")).unwrap());
        let pending = PendingCatalog::spawn(hub);
        let catalog = pending.wait().await.unwrap();
        assert_eq!(catalog.hubs[0].projects.len(), 2);
    }
}
