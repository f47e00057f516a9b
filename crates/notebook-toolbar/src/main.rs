//! notebook-toolbar CLI entry point.
//!
//! Builds a notebook toolbar against simulated collaborators, replays a list
//! of steps (clicks, selection moves, kernel events, dialog answers) and
//! prints the resulting toolbar and notebook state as JSON.

use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use notebook_toolbar::panel::NotebookContent;
use notebook_toolbar::registry::{populate_defaults, Toolbar, ToolbarItemKind};
use notebook_toolbar::sim::{SimKernel, SimSession};
use notebook_toolbar::{CellType, KernelRef, KernelStatus};

#[derive(Parser, Debug)]
#[command(name = "notebook-toolbar")]
#[command(about = "Drive a notebook toolbar against a simulated notebook and kernel")]
struct Cli {
    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Name of the kernel attached at startup (omit for no kernel)
    #[arg(long)]
    kernel: Option<String>,

    /// Initial cell types, comma separated
    #[arg(long, value_delimiter = ',', default_value = "code")]
    cells: Vec<CellType>,

    /// Steps to replay: click:<item>, select:<index>, celltype:<type>,
    /// source:<text>, status:<status>, kernel:<name|none>, answer:<label>, dismiss
    steps: Vec<Step>,
}

#[derive(Debug, Clone)]
enum Step {
    Click(ToolbarItemKind),
    Select(usize),
    CellType(CellType),
    Source(String),
    Status(KernelStatus),
    Kernel(Option<String>),
    Answer(String),
    Dismiss,
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "dismiss" {
            return Ok(Step::Dismiss);
        }
        let (verb, arg) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("step must look like <verb>:<argument>, got {s:?}"))?;
        let step = match verb {
            "click" => Step::Click(arg.parse()?),
            "select" => Step::Select(
                arg.parse()
                    .with_context(|| format!("invalid cell index {arg:?}"))?,
            ),
            "celltype" => Step::CellType(arg.parse()?),
            "source" => Step::Source(arg.to_string()),
            "status" => Step::Status(KernelStatus::from_wire(arg)),
            "kernel" if arg == "none" => Step::Kernel(None),
            "kernel" => Step::Kernel(Some(arg.to_string())),
            "answer" => Step::Answer(arg.to_string()),
            other => bail!("unknown step {other:?}"),
        };
        Ok(step)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let mut current_kernel = cli.kernel.as_deref().map(SimKernel::new);
    let mut session = SimSession::new(
        &cli.cells,
        current_kernel.clone().map(|k| k as KernelRef),
    );

    let mut toolbar = Toolbar::new();
    populate_defaults(&mut toolbar, &session.panel)?;
    info!("Toolbar ready: {}", toolbar.names().join(", "));

    for step in cli.steps {
        info!("Step {:?}", step);
        match step {
            Step::Click(kind) => toolbar.click(kind.name())?,
            Step::Select(index) => session.notebook.set_active_cell_index(index)?,
            Step::CellType(value) => {
                toolbar.select_cell_type(ToolbarItemKind::CellType.name(), value)?
            }
            Step::Source(text) => {
                let index = session.notebook.active_cell_index();
                session.notebook.set_source(index, &text)?
            }
            Step::Status(status) => match &current_kernel {
                Some(kernel) => kernel.set_status(status),
                None => warn!("No kernel attached, ignoring status {}", status),
            },
            Step::Kernel(name) => {
                current_kernel = name.as_deref().map(SimKernel::new);
                session
                    .context
                    .set_kernel(current_kernel.clone().map(|k| k as KernelRef));
            }
            Step::Answer(label) => {
                if !session.dialog.answer(&label) {
                    warn!("No open dialog to answer with {:?}", label);
                }
            }
            Step::Dismiss => session.dialog.dismiss_all(),
        }
        session.run_until_stalled();
    }

    let kernel = current_kernel.as_ref().map(|k| {
        serde_json::json!({
            "interrupts": k.interrupt_count(),
            "restarts": k.restart_count(),
        })
    });
    let report = serde_json::json!({
        "toolbar": toolbar
            .snapshot()
            .into_iter()
            .map(|(name, view)| serde_json::json!({ "name": name, "item": view }))
            .collect::<Vec<_>>(),
        "cells": session.notebook.cells(),
        "active_cell_index": session.notebook.active_cell_index(),
        "actions": session.actions.calls(),
        "saves": session.context.save_count(),
        "open_dialogs": session.dialog.pending_count(),
        "kernel": kernel,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
