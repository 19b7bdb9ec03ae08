use anyhow::{Context, Result};
use clap::Parser;
use hubexport_lib::commands::{run_diagnose, run_export, set_log_config, Cli, Commands};
use hubexport_lib::logging::{LogConfig, SizeRotatingWriter};
use hubexport_lib::{default_config_dir, SnapshotHub};
use std::path::Path;
use tracing_subscriber::prelude::*;

/// 初始化日志系统，日志文件写到 `log_dir`
fn init_logging(log_dir: &Path, config_dir: &Path) {
    let config = LogConfig::load(config_dir);

    if !config.enabled {
        // 日志已禁用，只初始化一个空的 subscriber
        let subscriber = tracing_subscriber::registry();
        let _ = tracing::subscriber::set_global_default(subscriber);
        return;
    }

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(config.tracing_level().into());

    match SizeRotatingWriter::new(log_dir, config.max_size_mb) {
        Ok(file_writer) => {
            // 文件日志层 - 始终输出到文件
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false);

            // 在 debug 模式下也输出到控制台
            #[cfg(debug_assertions)]
            {
                let console_layer = tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false);

                let subscriber = tracing_subscriber::registry()
                    .with(env_filter)
                    .with(file_layer)
                    .with(console_layer);

                let _ = tracing::subscriber::set_global_default(subscriber);
            }

            #[cfg(not(debug_assertions))]
            {
                let subscriber = tracing_subscriber::registry()
                    .with(env_filter)
                    .with(file_layer);

                let _ = tracing::subscriber::set_global_default(subscriber);
            }
        }
        Err(e) => {
            // 文件日志创建失败，回退到控制台
            eprintln!("Cannot write log to {}: {}", log_dir.display(), e);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// 不写日志文件的命令只输出到 stderr
fn init_console_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_dir = cli.config_dir.clone().unwrap_or_else(default_config_dir);

    match &cli.command {
        Commands::Export { output, .. } => {
            std::fs::create_dir_all(output)
                .with_context(|| format!("Cannot create output folder {}", output.display()))?;
            init_logging(output, &config_dir);

            if let Some(options) = cli.command.export_options() {
                if let Some(report) = run_export(options, &config_dir).await? {
                    tracing::debug!("{}", serde_json::to_string(&report)?);
                }
            }
        }
        Commands::Diagnose { snapshot, json } => {
            init_console_logging();
            let hub = SnapshotHub::load(snapshot)?;
            run_diagnose(&hub, *json, &mut std::io::stdout())?;
        }
        Commands::Log {
            enabled,
            max_size_mb,
            level,
        } => {
            init_console_logging();
            let config = set_log_config(&config_dir, *enabled, *max_size_mb, level.clone())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
