//! Toolbar buttons. Each button binds one click to one collaborator call.
//!
//! Outcomes belong to the collaborator: a failed call is logged and the
//! button carries on.

use std::rc::Rc;

use futures::task::LocalSpawnExt;
use log::{debug, error, info};
use serde::Serialize;

use crate::panel::{DialogResult, NotebookPanel};

pub const SAVE_CLASS: &str = "nb-toolbar-save";
pub const INSERT_CLASS: &str = "nb-toolbar-insert";
pub const CUT_CLASS: &str = "nb-toolbar-cut";
pub const COPY_CLASS: &str = "nb-toolbar-copy";
pub const PASTE_CLASS: &str = "nb-toolbar-paste";
pub const RUN_CLASS: &str = "nb-toolbar-run";
pub const INTERRUPT_CLASS: &str = "nb-toolbar-interrupt";
pub const RESTART_CLASS: &str = "nb-toolbar-restart";

pub const RESTART_TITLE: &str = "Restart Kernel?";
pub const RESTART_BODY: &str = "Do you want to restart the current kernel? All variables will be lost.";
/// The only dialog label that confirms a restart.
pub const RESTART_CONFIRM_LABEL: &str = "OK";

/// A clickable toolbar control.
#[derive(Clone)]
pub struct ToolbarButton {
    class_name: &'static str,
    tooltip: &'static str,
    on_click: Rc<dyn Fn()>,
}

impl ToolbarButton {
    pub fn new<F>(class_name: &'static str, tooltip: &'static str, on_click: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            class_name,
            tooltip,
            on_click: Rc::new(on_click),
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    pub fn tooltip(&self) -> &'static str {
        self.tooltip
    }

    pub fn click(&self) {
        (self.on_click)();
    }

    pub fn view(&self) -> ButtonView {
        ButtonView {
            class_name: self.class_name,
            tooltip: self.tooltip,
        }
    }
}

/// Serializable snapshot of a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonView {
    pub class_name: &'static str,
    pub tooltip: &'static str,
}

/// State of a restart confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    PendingConfirmation,
    Confirmed,
    Declined,
}

impl Confirmation {
    /// Settle a pending confirmation from the dialog's result. Anything other
    /// than the confirm label, including dismissal, declines. A settled
    /// confirmation does not change again.
    pub fn resolve(self, result: &DialogResult) -> Self {
        match self {
            Confirmation::PendingConfirmation if result.text == RESTART_CONFIRM_LABEL => {
                Confirmation::Confirmed
            }
            Confirmation::PendingConfirmation => Confirmation::Declined,
            settled => settled,
        }
    }
}

fn log_failure(action: &str, result: anyhow::Result<()>) {
    if let Err(e) = result {
        error!("[toolbar] {} failed: {}", action, e);
    }
}

pub fn create_save_button(panel: &NotebookPanel) -> ToolbarButton {
    let panel = panel.clone();
    ToolbarButton::new(
        SAVE_CLASS,
        "Save the notebook contents and create checkpoint",
        move || {
            info!("[toolbar] Save");
            log_failure("save", panel.context().save());
        },
    )
}

pub fn create_insert_button(panel: &NotebookPanel) -> ToolbarButton {
    let panel = panel.clone();
    ToolbarButton::new(INSERT_CLASS, "Insert a cell below", move || {
        info!("[toolbar] Insert below");
        log_failure("insert", panel.actions().insert_below(panel.content()));
    })
}

pub fn create_cut_button(panel: &NotebookPanel) -> ToolbarButton {
    let panel = panel.clone();
    ToolbarButton::new(CUT_CLASS, "Cut the selected cell(s)", move || {
        info!("[toolbar] Cut");
        let content = panel.content();
        log_failure("cut", panel.actions().cut(content, content.clipboard()));
    })
}

pub fn create_copy_button(panel: &NotebookPanel) -> ToolbarButton {
    let panel = panel.clone();
    ToolbarButton::new(COPY_CLASS, "Copy the selected cell(s)", move || {
        info!("[toolbar] Copy");
        let content = panel.content();
        log_failure("copy", panel.actions().copy(content, content.clipboard()));
    })
}

pub fn create_paste_button(panel: &NotebookPanel) -> ToolbarButton {
    let panel = panel.clone();
    ToolbarButton::new(PASTE_CLASS, "Paste cell(s) from the clipboard", move || {
        info!("[toolbar] Paste");
        let content = panel.content();
        log_failure("paste", panel.actions().paste(content, content.clipboard()));
    })
}

pub fn create_run_button(panel: &NotebookPanel) -> ToolbarButton {
    let panel = panel.clone();
    ToolbarButton::new(RUN_CLASS, "Run the selected cell(s) and advance", move || {
        info!("[toolbar] Run and advance");
        let kernel = panel.context().kernel();
        log_failure(
            "run",
            panel
                .actions()
                .run_and_advance(panel.content(), kernel.as_ref()),
        );
    })
}

pub fn create_interrupt_button(panel: &NotebookPanel) -> ToolbarButton {
    let panel = panel.clone();
    ToolbarButton::new(INTERRUPT_CLASS, "Interrupt the kernel", move || {
        let Some(kernel) = panel.context().kernel() else {
            debug!("[toolbar] Interrupt ignored, no kernel");
            return;
        };
        info!("[toolbar] Interrupt kernel");
        log_failure("interrupt", kernel.interrupt());
    })
}

pub fn create_restart_button(panel: &NotebookPanel) -> ToolbarButton {
    let panel = panel.clone();
    ToolbarButton::new(RESTART_CLASS, "Restart the kernel", move || {
        restart_kernel(&panel);
    })
}

/// Ask for confirmation, then restart the kernel that was current when the
/// button was clicked. Returns immediately; the restart happens once the
/// dialog settles as [`Confirmation::Confirmed`].
fn restart_kernel(panel: &NotebookPanel) {
    let Some(kernel) = panel.context().kernel() else {
        debug!("[toolbar] Restart ignored, no kernel");
        return;
    };

    info!("[toolbar] Restart requested, awaiting confirmation");
    let prompt = panel.dialog().show(RESTART_TITLE, RESTART_BODY, panel.id());
    let task = async move {
        let result = prompt.await;
        match Confirmation::PendingConfirmation.resolve(&result) {
            Confirmation::Confirmed => {
                info!("[toolbar] Restart confirmed");
                log_failure("restart", kernel.restart());
            }
            Confirmation::Declined | Confirmation::PendingConfirmation => {
                info!("[toolbar] Restart declined ({:?})", result.text);
            }
        }
    };

    if let Err(e) = panel.spawner().spawn_local(task) {
        error!("[toolbar] Failed to schedule restart confirmation: {}", e);
    }
}
