// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Reconcile Tool
//!
//! One-shot operator tool around the reconciler.
//!
//! ```text
//! topology-reconcile plan  <snapshot.json>          # print actions, change nothing
//! topology-reconcile apply <snapshot.json>          # converge every edge through xl
//! topology-reconcile check <backend> <declaration>  # validate a declaration file
//! ```
//!
//! A snapshot is a JSON array of domains:
//!
//! ```json
//! [{"name": "sys-net", "running": true, "declaration": "work\nvault"},
//!  {"name": "work", "running": true}]
//! ```
//!
//! Environment: `TOPOLOGY_STATE_DIR`, `TOPOLOGY_STATE_KEY`,
//! `TOPOLOGY_XL_BINARY`, `TOPOLOGY_VIF_SCRIPT`, `RUST_LOG`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cim_network_topology::topology::parse_declaration;
use cim_network_topology::{
    ActiveStore, FileKeyValueStore, InMemoryDirectory, Reconciler, TopologyConfig,
    XlInterfaceTool,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "topology-reconcile",
    version,
    about = "Reconcile declared network attachments with the active topology",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print the actions a full reconciliation would take; change nothing.
    Plan {
        /// Directory snapshot (JSON array of domains).
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,
    },

    /// Converge every edge through xl and persist the result.
    Apply {
        /// Directory snapshot (JSON array of domains).
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,
    },

    /// Validate a declaration as if `backend` carried it.
    Check {
        /// Domain carrying the declaration.
        #[arg(value_name = "BACKEND")]
        backend: String,

        /// File holding the raw declaration.
        #[arg(value_name = "DECLARATION")]
        declaration: PathBuf,
    },
}

type XlReconciler = Reconciler<InMemoryDirectory, XlInterfaceTool, FileKeyValueStore>;

async fn reconciler_for(config: &TopologyConfig, snapshot: &Path) -> Result<XlReconciler> {
    let json = tokio::fs::read_to_string(snapshot)
        .await
        .with_context(|| format!("Failed to read snapshot {}", snapshot.display()))?;
    let directory = InMemoryDirectory::from_json(&json)?;

    let store = ActiveStore::new(
        FileKeyValueStore::new(config.state_dir.clone()),
        config.state_key.clone(),
    );
    Ok(Reconciler::new(
        directory,
        XlInterfaceTool::from_config(config),
        store,
    ))
}

async fn plan(config: &TopologyConfig, snapshot: &Path) -> Result<()> {
    let mut reconciler = reconciler_for(config, snapshot).await?;

    let desired = reconciler.preview_desired(None).await?;
    let active = reconciler.ensure_active_loaded().await?;
    let actions = desired.diff(active, None);

    if actions.is_empty() {
        println!("Topology is converged ({} edges)", active.len());
    }
    for action in actions {
        println!("{action}");
    }
    Ok(())
}

async fn apply(config: &TopologyConfig, snapshot: &Path) -> Result<()> {
    let mut reconciler = reconciler_for(config, snapshot).await?;

    let report = reconciler
        .reconcile_all()
        .await
        .context("Reconciliation failed")?;

    for outcome in &report.outcomes {
        println!("{} {} {:?}", outcome.action, outcome.edge, outcome.status);
    }

    let failed = report.failures().count();
    if failed > 0 {
        warn!("⚠️ {} actions failed; they will be retried on the next run", failed);
    } else {
        info!("✅ Topology converged");
    }
    Ok(())
}

async fn check(backend: &str, path: &Path) -> Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read declaration {}", path.display()))?;

    let lines = parse_declaration(backend, &raw).context("Declaration rejected")?;
    for line in lines {
        println!("{} {} {}", backend, line.frontend, line.config);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = TopologyConfig::from_env();
    info!("📋 State: {} key {}", config.state_dir.display(), config.state_key);

    match cli.command {
        Command::Plan { snapshot } => plan(&config, &snapshot).await,
        Command::Apply { snapshot } => apply(&config, &snapshot).await,
        Command::Check {
            backend,
            declaration,
        } => check(&backend, &declaration).await,
    }
}
