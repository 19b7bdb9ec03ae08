//! 检查 hub 接口是否可用

use crate::hub::HierarchyProvider;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// 单个 hub 的诊断信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubSummary {
    pub id: String,
    pub name: String,
    pub index: usize,
}

pub fn list_hubs(provider: &dyn HierarchyProvider) -> Result<Vec<HubSummary>> {
    let hubs = provider.hubs().context("Error loading hubs")?;
    Ok(hubs
        .into_iter()
        .enumerate()
        .map(|(index, hub)| HubSummary {
            id: hub.id,
            name: hub.name,
            index,
        })
        .collect())
}

/// 输出 hub 列表；`json` 为 true 时输出 JSON 数组
pub fn run_diagnose(provider: &dyn HierarchyProvider, json: bool, out: &mut dyn Write) -> Result<()> {
    info!("Running hub diagnostics against {}", provider.name());
    let hubs = list_hubs(provider)?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&hubs)?)?;
        return Ok(());
    }

    writeln!(out, "Found {} hubs", hubs.len())?;
    if hubs.is_empty() {
        writeln!(
            out,
            "No hubs found. Make sure you're logged in and have access to cloud data."
        )?;
        return Ok(());
    }

    for hub in &hubs {
        writeln!(out, "Hub {}: {} (ID: {})", hub.index, hub.name, hub.id)?;
    }
    Ok(())
}
