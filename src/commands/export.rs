//! 导出命令

use super::select::{select_formats, select_start_folder};
use crate::config::{ExportConfig, PickerKind};
use crate::console::{Console, ConsoleProgress, ListChooser};
use crate::core::{
    Chooser, ExportEngine, ExportReport, ExportSettings, HubCatalog, PendingCatalog, TernaryChooser,
};
use crate::host::{ArtifactKind, ExportFormat, FolderJanitor};
use crate::hub::{FolderNode, HierarchyProvider, SnapshotHub};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// 导出命令参数
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub snapshot: PathBuf,
    pub output: PathBuf,
    /// 指定时跳过交互选择
    pub folder: Option<String>,
    pub formats: Vec<ExportFormat>,
    pub kinds: Vec<ArtifactKind>,
    pub clear_cache: Option<bool>,
    pub picker: Option<PickerKind>,
    pub save_config: bool,
}

impl ExportOptions {
    /// 命令行参数覆盖配置文件
    pub fn apply(&self, mut config: ExportConfig) -> ExportConfig {
        if !self.formats.is_empty() {
            config.formats = self.formats.clone();
        }
        if !self.kinds.is_empty() {
            config.kinds = self.kinds.clone();
        }
        if let Some(clear) = self.clear_cache {
            config.clear_cache_after_each_file = clear;
        }
        if let Some(picker) = self.picker {
            config.picker = picker;
        }
        config
    }
}

/// 导出开始后 Ctrl-C 只设置取消标志，当前文件处理完再停止
///
/// 交互提问期间不注册，Ctrl-C 仍按默认方式直接退出。
pub fn cancel_on_ctrl_c() -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Cancel requested, stopping after the current file");
            flag.store(true, Ordering::SeqCst);
        }
    });
    cancel
}

/// 交互选择后执行导出，用户取消时返回 `None`
pub async fn run_export(options: ExportOptions, config_dir: &Path) -> Result<Option<ExportReport>> {
    let config = options.apply(ExportConfig::load(config_dir));
    if options.save_config {
        config
            .save(config_dir)
            .with_context(|| format!("Failed to save config in {}", config_dir.display()))?;
        info!("Saved export config to {}", config_dir.display());
    }

    let hub = Arc::new(SnapshotHub::load(&options.snapshot)?);

    // 用户回答格式问题的同时在后台加载目录
    let pending = options
        .folder
        .is_none()
        .then(|| PendingCatalog::spawn(hub.clone()));

    let mut console = Console::stdio();

    let formats = if config.formats.is_empty() {
        match select_formats(&mut console) {
            Some(formats) => formats,
            None => {
                println!("Export cancelled!");
                return Ok(None);
            }
        }
    } else {
        config.formats.clone()
    };

    let start = match &options.folder {
        Some(id) => hub
            .folder(id)
            .with_context(|| format!("Folder {} not found", id))?,
        None => {
            let catalog = match pending {
                Some(pending) => pending.wait().await?,
                None => HubCatalog::load(hub.as_ref())?,
            };
            let mut chooser: Box<dyn Chooser + '_> = match config.picker {
                PickerKind::Ternary => Box::new(TernaryChooser::new(&mut console)),
                PickerKind::List => Box::new(ListChooser::new(&mut console)),
            };

            match select_start_folder(&catalog, chooser.as_mut()) {
                Ok(Some(folder)) => folder,
                Ok(None) => {
                    println!("Export cancelled!");
                    return Ok(None);
                }
                Err(e) => {
                    warn!("{}", e);
                    chooser.notify("No Data", &e.to_string());
                    return Ok(None);
                }
            }
        }
    };

    let settings = ExportSettings {
        formats,
        kinds: config.kinds.clone(),
        clear_cache_after_each_file: config.clear_cache_after_each_file,
    };
    let report = export_folder(
        hub,
        start,
        options.output,
        settings,
        config.cache_folders,
        ConsoleProgress::new(cancel_on_ctrl_c()),
    )
    .await?;

    println!("{}", report.summary());
    Ok(Some(report))
}

/// 在阻塞线程上导出一个文件夹
pub async fn export_folder(
    hub: Arc<SnapshotHub>,
    start: FolderNode,
    output: PathBuf,
    settings: ExportSettings,
    cache_folders: Vec<PathBuf>,
    mut progress: ConsoleProgress,
) -> Result<ExportReport> {
    let janitor = Arc::new(FolderJanitor::with_defaults_if_empty(cache_folders));
    if settings.clear_cache_after_each_file {
        info!("Host cache folders: {:?}", janitor.folders());
    }
    let engine = ExportEngine::new(hub.clone(), hub, janitor, settings);

    info!("Writing 2D export to {}", output.display());
    tokio::task::spawn_blocking(move || engine.run(&start, &output, &mut progress))
        .await
        .context("Export task failed")
}
