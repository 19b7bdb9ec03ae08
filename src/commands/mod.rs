pub mod diagnose;
pub mod export;
pub mod log;
pub mod select;

use crate::config::PickerKind;
use crate::host::{ArtifactKind, ExportFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use diagnose::run_diagnose;
pub use export::{run_export, ExportOptions};
pub use self::log::set_log_config;

#[derive(Parser)]
#[command(name = "hubexport")]
#[command(about = "Batch export of 2D drawings and sketches from a CAD hub", long_about = None)]
pub struct Cli {
    /// Directory holding config.json (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export sketches and drawings of every design under a folder
    Export {
        /// Hub snapshot (JSON) to read the hierarchy and documents from
        #[arg(long)]
        snapshot: PathBuf,

        /// Local folder that receives the mirrored tree and export_2d.log
        #[arg(long)]
        output: PathBuf,

        /// Start folder id; skips the interactive selection
        #[arg(long)]
        folder: Option<String>,

        /// Export format, repeatable; asked interactively when neither given nor configured
        #[arg(long = "format", value_enum)]
        formats: Vec<ExportFormat>,

        /// Artifact kind, repeatable
        #[arg(long = "kind", value_enum)]
        kinds: Vec<ArtifactKind>,

        /// Clear the host cache after each file
        #[arg(long)]
        clear_cache: Option<bool>,

        /// How lists are chosen from
        #[arg(long, value_enum)]
        picker: Option<PickerKind>,

        /// Persist the effective export settings to config.json
        #[arg(long)]
        save_config: bool,
    },

    /// List the hubs visible through a snapshot
    Diagnose {
        #[arg(long)]
        snapshot: PathBuf,

        /// Print the hub list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change the logging settings in config.json
    Log {
        #[arg(long)]
        enabled: Option<bool>,

        /// Rotate the log above this size, clamped to 1-100 MB
        #[arg(long)]
        max_size_mb: Option<u32>,

        /// error, warn, info, debug or trace
        #[arg(long)]
        level: Option<String>,
    },
}

impl Commands {
    /// 转换为导出参数，其它子命令返回 `None`
    pub fn export_options(&self) -> Option<ExportOptions> {
        match self {
            Commands::Export {
                snapshot,
                output,
                folder,
                formats,
                kinds,
                clear_cache,
                picker,
                save_config,
            } => Some(ExportOptions {
                snapshot: snapshot.clone(),
                output: output.clone(),
                folder: folder.clone(),
                formats: formats.clone(),
                kinds: kinds.clone(),
                clear_cache: *clear_cache,
                picker: *picker,
                save_config: *save_config,
            }),
            Commands::Diagnose { .. } | Commands::Log { .. } => None,
        }
    }
}
