use crate::core::error::ExportError;
use crate::core::mirror::{materialize_output_path, sanitize, take};
use crate::core::walker::collect_files;
use crate::host::{
    ArtifactKind, CacheJanitor, ComponentView, Document, DocumentStore, DrawingRef, ExportFormat,
};
use crate::hub::{FileNode, FolderNode, HierarchyProvider};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 导出配置
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub formats: Vec<ExportFormat>,
    pub kinds: Vec<ArtifactKind>,
    /// 每个文件处理完后清理宿主缓存
    pub clear_cache_after_each_file: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            formats: vec![ExportFormat::Dxf],
            kinds: vec![ArtifactKind::Drawings],
            clear_cache_after_each_file: true,
        }
    }
}

/// 进度显示，同时是用户取消的唯一来源
pub trait ProgressReporter {
    fn set_total(&mut self, total: usize);

    fn advance(&mut self);

    fn was_cancelled_by_user(&self) -> bool;
}

/// 导出报告
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    pub run_id: String,
    pub start_time: i64,
    pub end_time: i64,
    pub files_found: u32,
    pub files_processed: u32,
    pub files_skipped: u32,
    pub artifacts_written: u32,
    pub artifacts_existing: u32,
    pub issues: u32,
    pub cancelled: bool,
    pub errors: Vec<String>,
}

impl ExportReport {
    fn new() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            start_time: chrono::Utc::now().timestamp(),
            end_time: 0,
            files_found: 0,
            files_processed: 0,
            files_skipped: 0,
            artifacts_written: 0,
            artifacts_existing: 0,
            issues: 0,
            cancelled: false,
            errors: Vec::new(),
        }
    }

    fn record_issue(&mut self, err: ExportError) {
        error!("{}", err);
        self.issues += 1;
        self.errors.push(err.to_string());
    }

    fn finish(&mut self) {
        self.end_time = chrono::Utc::now().timestamp();
    }

    /// 面向用户的结果摘要
    pub fn summary(&self) -> String {
        if self.cancelled {
            "Export cancelled!".to_string()
        } else if self.issues > 0 {
            format!(
                "The exporting process ran into {} issue{}. Please check the log for more information",
                self.issues,
                if self.issues > 1 { "s" } else { "" }
            )
        } else {
            "2D Export finished successfully!".to_string()
        }
    }
}

/// 同一名称的草图/图纸在集合中为空时使用 `{fallback}_{序号}`
fn artifact_name(name: &str, fallback: &str, index: usize) -> String {
    if name.is_empty() {
        format!("{}_{}", fallback, index + 1)
    } else {
        sanitize(name)
    }
}

/// 宿主没有原生 DWG 导出，DWG 以 DXF 写出
fn written_format(format: ExportFormat) -> ExportFormat {
    match format {
        ExportFormat::Dwg => ExportFormat::Dxf,
        other => other,
    }
}

/// 导出引擎
pub struct ExportEngine {
    provider: Arc<dyn HierarchyProvider>,
    store: Arc<dyn DocumentStore>,
    janitor: Arc<dyn CacheJanitor>,
    settings: ExportSettings,
}

impl ExportEngine {
    pub fn new(
        provider: Arc<dyn HierarchyProvider>,
        store: Arc<dyn DocumentStore>,
        janitor: Arc<dyn CacheJanitor>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            provider,
            store,
            janitor,
            settings,
        }
    }

    /// 导出起始文件夹及其所有子文件夹下的文件
    ///
    /// 每个文件开始前检查一次取消；单个文件的失败只计入 issue。
    pub fn run(
        &self,
        start: &FolderNode,
        output_root: &Path,
        progress: &mut dyn ProgressReporter,
    ) -> ExportReport {
        let mut report = ExportReport::new();
        info!("Starting 2D export! (run {})", report.run_id);
        info!(
            "File types to export: {:?}, formats: {:?}",
            self.settings.kinds, self.settings.formats
        );
        info!("Scanning cloud folder and all sub-folders: {}", start.name);

        let files = collect_files(self.provider.as_ref(), start);
        report.files_found = files.len() as u32;

        if files.is_empty() {
            info!("No Fusion files (.f3d or .f3z) found in the selected folder or its sub-folders");
            report.finish();
            return report;
        }

        info!("Found {} files to process (including sub-folders)", files.len());
        progress.set_total(files.len());

        for file in &files {
            if progress.was_cancelled_by_user() {
                info!("The process was cancelled!");
                report.cancelled = true;
                break;
            }

            progress.advance();
            self.process_file(output_root, file, &mut report);
        }

        report.finish();
        info!(
            "Done exporting 2D data: {} processed, {} skipped, {} written, {} already existed, {} issues",
            report.files_processed,
            report.files_skipped,
            report.artifacts_written,
            report.artifacts_existing,
            report.issues
        );
        report
    }

    fn process_file(&self, output_root: &Path, file: &FileNode, report: &mut ExportReport) {
        if !file.is_eligible() {
            info!("Skipping non-Fusion file \"{}\"", file.name);
            report.files_skipped += 1;
            return;
        }

        info!("Processing file \"{}\" for 2D export", file.name);

        let document = match self.store.open(file) {
            Ok(d) => d,
            Err(e) => {
                report.record_issue(ExportError::Open {
                    file: file.name.clone(),
                    source: e,
                });
                return;
            }
        };
        report.files_processed += 1;

        // 文档关闭之后才清理缓存
        scopeguard::defer! {
            if self.settings.clear_cache_after_each_file {
                self.janitor.purge();
            }
        }

        match materialize_output_path(self.provider.as_ref(), output_root, file) {
            Ok(dir) => {
                info!("Writing 2D data to \"{}\"", dir.display());
                self.export_document(document.as_ref(), &dir, report);
                info!("Finished exporting 2D data from file \"{}\"", file.name);
            }
            Err(e) => report.record_issue(e),
        }

        if let Err(e) = document.close(false) {
            report.record_issue(ExportError::Close {
                file: file.name.clone(),
                source: e,
            });
        }
    }

    fn export_document(&self, document: &dyn Document, dir: &Path, report: &mut ExportReport) {
        if self.settings.kinds.contains(&ArtifactKind::Sketches) {
            match document.root_component() {
                Ok(root) => self.export_sketches(document, dir, &root, report),
                Err(e) => report.record_issue(ExportError::Document {
                    file: document.name().to_string(),
                    source: e.context("could not read sketches"),
                }),
            }
        }

        if self.settings.kinds.contains(&ArtifactKind::Drawings) {
            match document.drawings() {
                Ok(drawings) => self.export_drawings(document, dir, &drawings, report),
                Err(e) => report.record_issue(ExportError::Document {
                    file: document.name().to_string(),
                    source: e.context("could not read drawings"),
                }),
            }
        }
    }

    /// 导出组件及其所有子组件的草图
    fn export_sketches(
        &self,
        document: &dyn Document,
        base: &Path,
        component: &ComponentView,
        report: &mut ExportReport,
    ) {
        if !component.sketches.is_empty() {
            match take(base, ["Sketches"]) {
                Ok(dir) => {
                    for (index, sketch) in component.sketches.iter().enumerate() {
                        let name = artifact_name(&sketch.name, "Sketch", index);
                        for &format in &self.settings.formats {
                            if format == ExportFormat::Pdf {
                                warn!("Format pdf not supported for sketches, skipping \"{}\"", name);
                                continue;
                            }
                            self.write_artifact("sketch", &dir, &name, format, report, |path, fmt| {
                                document.export_sketch(sketch, path, fmt)
                            });
                        }
                    }
                }
                Err(e) => report.record_issue(ExportError::PathCreation {
                    file: document.name().to_string(),
                    path: base.join("Sketches"),
                    source: e.into(),
                }),
            }
        }

        for occurrence in &component.occurrences {
            self.export_sketches(document, base, occurrence, report);
        }
    }

    fn export_drawings(
        &self,
        document: &dyn Document,
        base: &Path,
        drawings: &[DrawingRef],
        report: &mut ExportReport,
    ) {
        if drawings.is_empty() {
            return;
        }

        let dir = match take(base, ["Drawings"]) {
            Ok(dir) => dir,
            Err(e) => {
                report.record_issue(ExportError::PathCreation {
                    file: document.name().to_string(),
                    path: base.join("Drawings"),
                    source: e.into(),
                });
                return;
            }
        };

        for (index, drawing) in drawings.iter().enumerate() {
            let name = artifact_name(&drawing.name, "Drawing", index);

            // 只导出第一页
            let Some(sheet) = drawing.sheets.first() else {
                warn!("Drawing \"{}\" has no sheets to export", name);
                continue;
            };

            for &format in &self.settings.formats {
                self.write_artifact("drawing", &dir, &name, format, report, |path, fmt| {
                    document.export_sheet(sheet, path, fmt)
                });
            }
        }
    }

    /// 写出单个导出物，目标已存在时跳过
    fn write_artifact<F>(
        &self,
        artifact: &'static str,
        dir: &Path,
        name: &str,
        format: ExportFormat,
        report: &mut ExportReport,
        export: F,
    ) where
        F: FnOnce(&Path, ExportFormat) -> anyhow::Result<()>,
    {
        let actual = written_format(format);
        let path = dir.join(format!("{}.{}", name, actual.extension()));

        if path.exists() {
            info!("{} file \"{}\" already exists", capitalize(artifact), path.display());
            report.artifacts_existing += 1;
            return;
        }

        if actual != format {
            warn!(
                "{} format not directly supported, exporting {} \"{}\" as {} instead",
                format, artifact, name, actual
            );
        }

        info!("Writing {} file \"{}\"", artifact, path.display());
        match export(&path, actual) {
            Ok(()) => {
                debug!("Wrote {}", path.display());
                report.artifacts_written += 1;
            }
            Err(e) => report.record_issue(ExportError::Export {
                artifact,
                name: name.to_string(),
                format: format.to_string(),
                source: e,
            }),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Exporter2D, SheetRef, SketchRef};
    use crate::hub::snapshot::fixtures::*;
    use crate::hub::snapshot::{ComponentEntry, DesignEntry};
    use crate::hub::SnapshotHub;
    use anyhow::{anyhow, Result};
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Workspace {
        blobs: PathBuf,
        out: PathBuf,
    }

    impl Workspace {
        fn new() -> Self {
            let base = std::env::temp_dir().join(format!("hubexport-engine-{}", uuid::Uuid::new_v4()));
            let blobs = base.join("blobs");
            let out = base.join("out");
            std::fs::create_dir_all(&blobs).unwrap();
            std::fs::create_dir_all(&out).unwrap();
            for name in ["sheet.pdf", "sheet.dxf", "sketch.dxf"] {
                std::fs::write(blobs.join(name), name.as_bytes()).unwrap();
            }
            Self { blobs, out }
        }
    }

    impl Drop for Workspace {
        fn drop(&mut self) {
            if let Some(base) = self.blobs.parent() {
                let _ = std::fs::remove_dir_all(base);
            }
        }
    }

    #[derive(Default)]
    struct TestProgress {
        total: usize,
        advanced: usize,
        cancel_after: Option<usize>,
    }

    impl ProgressReporter for TestProgress {
        fn set_total(&mut self, total: usize) {
            self.total = total;
        }
        fn advance(&mut self) {
            self.advanced += 1;
        }
        fn was_cancelled_by_user(&self) -> bool {
            self.cancel_after.is_some_and(|n| self.advanced >= n)
        }
    }

    #[derive(Default)]
    struct CountingJanitor {
        purges: AtomicUsize,
    }

    impl CacheJanitor for CountingJanitor {
        fn purge(&self) {
            self.purges.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// 指定文件打开失败或关闭失败的文档仓库
    struct FaultyStore {
        inner: Arc<SnapshotHub>,
        fail_open: HashSet<String>,
        fail_close: HashSet<String>,
        opened: AtomicUsize,
    }

    impl DocumentStore for FaultyStore {
        fn open(&self, file: &FileNode) -> Result<Box<dyn Document>> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            if self.fail_open.contains(&file.id) {
                return Err(anyhow!("document is locked"));
            }
            let doc = self.inner.open(file)?;
            if self.fail_close.contains(&file.id) {
                Ok(Box::new(StuckDocument(doc)))
            } else {
                Ok(doc)
            }
        }
    }

    struct StuckDocument(Box<dyn Document>);

    impl Exporter2D for StuckDocument {
        fn export_sketch(&self, sketch: &SketchRef, path: &Path, format: ExportFormat) -> Result<()> {
            self.0.export_sketch(sketch, path, format)
        }
        fn export_sheet(&self, sheet: &SheetRef, path: &Path, format: ExportFormat) -> Result<()> {
            self.0.export_sheet(sheet, path, format)
        }
    }

    impl Document for StuckDocument {
        fn name(&self) -> &str {
            self.0.name()
        }
        fn root_component(&self) -> Result<ComponentView> {
            self.0.root_component()
        }
        fn drawings(&self) -> Result<Vec<DrawingRef>> {
            self.0.drawings()
        }
        fn close(self: Box<Self>, _save_changes: bool) -> Result<()> {
            Err(anyhow!("document is busy"))
        }
    }

    fn drawing_design(name: &str) -> DesignEntry {
        DesignEntry {
            root_component: ComponentEntry::default(),
            drawings: vec![drawing(
                &format!("{}-drawing", name),
                "Layout",
                vec![sheet(
                    &format!("{}-sheet", name),
                    "Sheet1",
                    renders(&[(ExportFormat::Pdf, "sheet.pdf"), (ExportFormat::Dxf, "sheet.dxf")]),
                )],
            )],
        }
    }

    fn sketch_design() -> DesignEntry {
        DesignEntry {
            root_component: ComponentEntry {
                name: "root".to_string(),
                sketches: vec![
                    sketch("s1", "Sketch1", renders(&[(ExportFormat::Dxf, "sketch.dxf")])),
                    sketch("s2", "", renders(&[(ExportFormat::Dxf, "sketch.dxf")])),
                ],
                occurrences: vec![ComponentEntry {
                    name: "bolt".to_string(),
                    sketches: vec![sketch("s3", "Profile", renders(&[(ExportFormat::Dxf, "sketch.dxf")]))],
                    occurrences: vec![],
                }],
            },
            drawings: vec![drawing("empty", "No Sheets", vec![])],
        }
    }

    /// Hub "H" / Project "P" / 根目录 "A" / "B" / part*1.f3d
    fn scenario(ws: &Workspace) -> Arc<SnapshotHub> {
        let root = folder(
            "a",
            "A",
            vec![],
            vec![folder(
                "b",
                "B",
                vec![
                    design_file("part", "part*1.f3d", drawing_design("part")),
                    plain_file("notes", "notes.pdf", "pdf"),
                    design_file("sk", "sketches", sketch_design()),
                ],
                vec![],
            )],
        );
        Arc::new(SnapshotHub::from_snapshot(single_project("H", "P", root), ws.blobs.clone()).unwrap())
    }

    fn engine(
        hub: Arc<SnapshotHub>,
        store: Arc<dyn DocumentStore>,
        janitor: Arc<CountingJanitor>,
        settings: ExportSettings,
    ) -> ExportEngine {
        ExportEngine::new(hub, store, janitor, settings)
    }

    fn settings(formats: &[ExportFormat], kinds: &[ArtifactKind]) -> ExportSettings {
        ExportSettings {
            formats: formats.to_vec(),
            kinds: kinds.to_vec(),
            clear_cache_after_each_file: true,
        }
    }

    #[test]
    fn test_scenario_output_layout() {
        let ws = Workspace::new();
        let hub = scenario(&ws);
        let janitor = Arc::new(CountingJanitor::default());
        let engine = engine(
            hub.clone(),
            hub.clone(),
            janitor.clone(),
            settings(&[ExportFormat::Pdf, ExportFormat::Dxf], &[ArtifactKind::Drawings]),
        );
        let start = hub.folder("a").unwrap();

        let mut progress = TestProgress::default();
        let report = engine.run(&start, &ws.out, &mut progress);

        let drawings = ws
            .out
            .join("Hub H")
            .join("Project P")
            .join("A")
            .join("B")
            .join("part_1.f3d")
            .join("Drawings");
        assert_eq!(std::fs::read(drawings.join("Layout.pdf")).unwrap(), b"sheet.pdf");
        assert_eq!(std::fs::read(drawings.join("Layout.dxf")).unwrap(), b"sheet.dxf");

        assert_eq!(progress.total, 3);
        assert_eq!(progress.advanced, 3);
        assert_eq!(report.files_found, 3);
        assert_eq!(report.files_processed, 2);
        assert_eq!(report.files_skipped, 1);
        assert_eq!(report.artifacts_written, 2);
        assert_eq!(report.issues, 0, "{:?}", report.errors);
        assert!(!report.cancelled);
        assert_eq!(report.summary(), "2D Export finished successfully!");
        assert_eq!(janitor.purges.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_rerun_exports_nothing_twice() {
        let ws = Workspace::new();
        let hub = scenario(&ws);
        let janitor = Arc::new(CountingJanitor::default());
        let engine = engine(
            hub.clone(),
            hub.clone(),
            janitor,
            settings(
                &[ExportFormat::Pdf, ExportFormat::Dxf],
                &[ArtifactKind::Drawings, ArtifactKind::Sketches],
            ),
        );
        let start = hub.folder("a").unwrap();

        let first = engine.run(&start, &ws.out, &mut TestProgress::default());
        assert_eq!(first.issues, 0, "{:?}", first.errors);
        assert!(first.artifacts_written > 0);

        let second = engine.run(&start, &ws.out, &mut TestProgress::default());
        assert_eq!(second.artifacts_written, 0);
        assert_eq!(second.artifacts_existing, first.artifacts_written);
        assert_eq!(second.issues, 0);
    }

    #[test]
    fn test_existing_sketch_is_skipped_without_issue() {
        let ws = Workspace::new();
        let hub = scenario(&ws);
        let sketches = ws
            .out
            .join("Hub H")
            .join("Project P")
            .join("A")
            .join("B")
            .join("sketches")
            .join("Sketches");
        std::fs::create_dir_all(&sketches).unwrap();
        std::fs::write(sketches.join("Sketch1.dxf"), b"previous run").unwrap();

        let engine = engine(
            hub.clone(),
            hub.clone(),
            Arc::new(CountingJanitor::default()),
            settings(&[ExportFormat::Dxf], &[ArtifactKind::Sketches]),
        );
        let report = engine.run(&hub.folder("b").unwrap(), &ws.out, &mut TestProgress::default());

        assert_eq!(std::fs::read(sketches.join("Sketch1.dxf")).unwrap(), b"previous run");
        assert_eq!(report.artifacts_existing, 1);
        // 未命名草图按序号命名，子组件的草图进入同一目录
        assert!(sketches.join("Sketch_2.dxf").exists());
        assert!(sketches.join("Profile.dxf").exists());
        assert_eq!(report.artifacts_written, 2);
        assert_eq!(report.issues, 0);
    }

    #[test]
    fn test_sketch_format_rules() {
        let ws = Workspace::new();
        let hub = scenario(&ws);
        let engine = engine(
            hub.clone(),
            hub.clone(),
            Arc::new(CountingJanitor::default()),
            settings(&[ExportFormat::Pdf, ExportFormat::Dwg], &[ArtifactKind::Sketches]),
        );
        let report = engine.run(&hub.folder("b").unwrap(), &ws.out, &mut TestProgress::default());

        let sketches = ws
            .out
            .join("Hub H")
            .join("Project P")
            .join("A")
            .join("B")
            .join("sketches")
            .join("Sketches");
        // pdf 被跳过，dwg 以 dxf 写出
        assert!(sketches.join("Sketch1.dxf").exists());
        assert!(!sketches.join("Sketch1.pdf").exists());
        assert!(!sketches.join("Sketch1.dwg").exists());
        assert_eq!(report.artifacts_written, 3);
        assert_eq!(report.issues, 0, "{:?}", report.errors);
    }

    #[test]
    fn test_missing_rendering_is_one_issue_and_siblings_continue() {
        let ws = Workspace::new();
        let hub = scenario(&ws);
        // Layout 的 pdf 渲染文件丢失，dxf 仍然应该写出
        std::fs::remove_file(ws.blobs.join("sheet.pdf")).unwrap();

        let engine = engine(
            hub.clone(),
            hub.clone(),
            Arc::new(CountingJanitor::default()),
            settings(&[ExportFormat::Pdf, ExportFormat::Dxf], &[ArtifactKind::Drawings]),
        );
        let report = engine.run(&hub.folder("b").unwrap(), &ws.out, &mut TestProgress::default());

        assert_eq!(report.issues, 1, "{:?}", report.errors);
        assert_eq!(report.artifacts_written, 1);
        assert!(report.summary().starts_with("The exporting process ran into 1 issue."));
    }

    #[test]
    fn test_open_and_close_failures_are_isolated() {
        let ws = Workspace::new();
        let hub = scenario(&ws);
        let store = Arc::new(FaultyStore {
            inner: hub.clone(),
            fail_open: HashSet::from(["part".to_string()]),
            fail_close: HashSet::from(["sk".to_string()]),
            opened: AtomicUsize::new(0),
        });
        let janitor = Arc::new(CountingJanitor::default());
        let engine = engine(
            hub.clone(),
            store.clone(),
            janitor.clone(),
            settings(&[ExportFormat::Dxf], &[ArtifactKind::Sketches]),
        );
        let report = engine.run(&hub.folder("a").unwrap(), &ws.out, &mut TestProgress::default());

        assert_eq!(store.opened.load(Ordering::SeqCst), 2);
        assert_eq!(report.issues, 2, "{:?}", report.errors);
        assert_eq!(report.files_processed, 1);
        assert_eq!(report.artifacts_written, 3);
        // 打开失败的文件不清理缓存
        assert_eq!(janitor.purges.load(Ordering::SeqCst), 1);
        assert!(report.summary().contains("2 issues"));
    }

    #[test]
    fn test_unwritable_output_root_is_one_issue_per_file() {
        let ws = Workspace::new();
        let hub = scenario(&ws);
        let blocked = ws.out.join("not-a-folder");
        std::fs::write(&blocked, b"plain file").unwrap();

        let store = Arc::new(FaultyStore {
            inner: hub.clone(),
            fail_open: HashSet::new(),
            fail_close: HashSet::from(["sk".to_string()]),
            opened: AtomicUsize::new(0),
        });
        let janitor = Arc::new(CountingJanitor::default());
        let engine = engine(
            hub.clone(),
            store.clone(),
            janitor.clone(),
            settings(&[ExportFormat::Pdf], &[ArtifactKind::Drawings, ArtifactKind::Sketches]),
        );
        let report = engine.run(&hub.folder("a").unwrap(), &blocked, &mut TestProgress::default());

        assert_eq!(store.opened.load(Ordering::SeqCst), 2);
        assert_eq!(report.files_processed, 2);
        assert_eq!(report.artifacts_written, 0);
        // 两个路径错误，加上 sk 的关闭失败：路径失败后文档仍然被关闭
        assert_eq!(report.issues, 3, "{:?}", report.errors);
        assert_eq!(
            report
                .errors
                .iter()
                .filter(|e| e.contains("not-a-folder"))
                .count(),
            2,
            "{:?}",
            report.errors
        );
        assert_eq!(janitor.purges.load(Ordering::SeqCst), 2);
        assert!(blocked.is_file());
    }

    #[test]
    fn test_cancellation_between_files() {
        let ws = Workspace::new();
        let hub = scenario(&ws);
        let engine = engine(
            hub.clone(),
            hub.clone(),
            Arc::new(CountingJanitor::default()),
            settings(&[ExportFormat::Pdf], &[ArtifactKind::Drawings]),
        );
        let mut progress = TestProgress {
            cancel_after: Some(1),
            ..Default::default()
        };
        let report = engine.run(&hub.folder("a").unwrap(), &ws.out, &mut progress);

        assert!(report.cancelled);
        assert_eq!(progress.advanced, 1);
        assert_eq!(report.files_processed, 1);
        assert_eq!(report.summary(), "Export cancelled!");
    }

    #[test]
    fn test_cache_not_purged_when_disabled() {
        let ws = Workspace::new();
        let hub = scenario(&ws);
        let janitor = Arc::new(CountingJanitor::default());
        let mut s = settings(&[ExportFormat::Pdf], &[ArtifactKind::Drawings]);
        s.clear_cache_after_each_file = false;
        let engine = engine(hub.clone(), hub.clone(), janitor.clone(), s);

        engine.run(&hub.folder("a").unwrap(), &ws.out, &mut TestProgress::default());
        assert_eq!(janitor.purges.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_folder_reports_nothing_found() {
        let ws = Workspace::new();
        let root = folder("a", "A", vec![], vec![folder("b", "B", vec![], vec![])]);
        let hub = Arc::new(SnapshotHub::from_snapshot(single_project("H", "P", root), ws.blobs.clone()).unwrap());
        let engine = engine(
            hub.clone(),
            hub.clone(),
            Arc::new(CountingJanitor::default()),
            ExportSettings::default(),
        );
        let mut progress = TestProgress::default();
        let report = engine.run(&hub.folder("a").unwrap(), &ws.out, &mut progress);

        assert_eq!(report.files_found, 0);
        assert_eq!(progress.total, 0);
        assert_eq!(report.issues, 0);
    }

    #[test]
    fn test_artifact_names() {
        assert_eq!(artifact_name("", "Sketch", 0), "Sketch_1");
        assert_eq!(artifact_name("Top/View", "Sketch", 4), "Top_View");
        assert_eq!(artifact_name("Plan.pdf", "Drawing", 1), "Plan_pdf");
        assert_eq!(capitalize("sketch"), "Sketch");
    }

    #[test]
    fn test_summary_plural() {
        let mut report = ExportReport::new();
        report.issues = 1;
        assert_eq!(
            report.summary(),
            "The exporting process ran into 1 issue. Please check the log for more information"
        );
        report.issues = 3;
        assert!(report.summary().contains("3 issues."));
    }
}
