// Copyright (c) 2025 - Cowboy AI, Inc.
//! `xl` backed interface operations
//!
//! Attach:
//!
//! ```text
//! xl network-attach <frontend> backend=<backend> vifname=<frontend> script=<script> [mac=<mac>]
//! xl network-list <frontend>      # id = first column of the last non-blank line
//! ```
//!
//! Detach:
//!
//! ```text
//! xl network-detach <frontend> <id>
//! ```

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

use super::InterfaceOps;
use crate::config::TopologyConfig;
use crate::domain::Parameters;
use crate::errors::{TopologyError, TopologyResult};

/// Interface operations through the `xl` toolstack binary
#[derive(Debug, Clone)]
pub struct XlInterfaceTool {
    binary: PathBuf,
    vif_script: String,
}

impl XlInterfaceTool {
    /// Create a tool invoking `binary` with the given vif hotplug script
    pub fn new(binary: impl Into<PathBuf>, vif_script: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            vif_script: vif_script.into(),
        }
    }

    /// Create from configuration
    pub fn from_config(config: &TopologyConfig) -> Self {
        Self::new(config.xl_binary.clone(), config.vif_script.clone())
    }

    /// Arguments of the `network-attach` invocation
    pub fn attach_args(&self, backend: &str, frontend: &str, config: &Parameters) -> Vec<String> {
        let mut args = vec![
            "network-attach".to_string(),
            frontend.to_string(),
            format!("backend={backend}"),
            format!("vifname={frontend}"),
            format!("script={}", self.vif_script),
        ];
        if let Some(mac) = config.frontend_mac() {
            args.push(format!("mac={mac}"));
        }
        args
    }

    async fn run(&self, operation: &str, target: &str, args: &[String]) -> TopologyResult<String> {
        debug!("Running {} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| TopologyError::external(operation, target, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TopologyError::external(
                operation,
                target,
                format!("{} ({})", output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Interface id from `xl network-list` output: first column of the last
/// non-blank line
pub fn parse_network_list(output: &str) -> Option<String> {
    output
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .and_then(|line| line.split_whitespace().next())
        .map(str::to_string)
}

#[async_trait]
impl InterfaceOps for XlInterfaceTool {
    async fn attach(
        &self,
        backend: &str,
        frontend: &str,
        config: &Parameters,
    ) -> TopologyResult<String> {
        let target = format!("{backend} -> {frontend}");
        self.run("attach", &target, &self.attach_args(backend, frontend, config))
            .await?;

        let listing = self
            .run(
                "network-list",
                &target,
                &["network-list".to_string(), frontend.to_string()],
            )
            .await?;

        parse_network_list(&listing).ok_or_else(|| {
            TopologyError::external("network-list", target, "no interface listed after attach")
        })
    }

    async fn detach(&self, frontend: &str, interface_id: &str) -> TopologyResult<()> {
        let target = format!("{frontend} interface {interface_id}");
        self.run(
            "detach",
            &target,
            &[
                "network-detach".to_string(),
                frontend.to_string(),
                interface_id.to_string(),
            ],
        )
        .await?;
        Ok(())
    }
}
