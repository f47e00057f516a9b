//! Integration tests for the notebook toolbar wired to simulated
//! collaborators.
//!
//! These cover the event wiring end to end:
//! - buttons dispatch exactly one collaborator call per click
//! - the restart button only restarts after an explicit "OK"
//! - the kernel status indicator follows kernel replacement without leaking
//!   subscriptions to superseded kernels
//! - the cell type switcher always shows the active cell's type

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::executor::LocalPool;
use notebook_toolbar::buttons::{RESTART_BODY, RESTART_TITLE};
use notebook_toolbar::kernel::KernelChange;
use notebook_toolbar::kernel_status::KernelStatusIndicator;
use notebook_toolbar::panel::{
    Clipboard, DocumentContext, NotebookActions, NotebookContent, NotebookPanel,
};
use notebook_toolbar::registry::{self, populate_defaults, Toolbar, ToolbarItemKind};
use notebook_toolbar::sim::{
    ActionCall, SimContext, SimDialog, SimKernel, SimNotebook, SimSession,
};
use notebook_toolbar::{CellType, Kernel, KernelRef, KernelStatus};

fn session_with_kernel(name: &str, cells: &[CellType]) -> (SimSession, Rc<SimKernel>) {
    let kernel = SimKernel::new(name);
    let session = SimSession::new(cells, Some(kernel.clone() as KernelRef));
    (session, kernel)
}

fn default_toolbar(session: &SimSession) -> Toolbar {
    let mut toolbar = Toolbar::new();
    populate_defaults(&mut toolbar, &session.panel).unwrap();
    toolbar
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_populate_defaults_adds_every_item_in_order() {
    let (session, _kernel) = session_with_kernel("python3", &[CellType::Code]);
    let toolbar = default_toolbar(&session);

    assert_eq!(
        toolbar.names(),
        vec![
            "save",
            "insert",
            "cut",
            "copy",
            "paste",
            "run",
            "interrupt",
            "restart",
            "cellType",
            "kernelName",
            "kernelStatus"
        ]
    );
}

#[test]
fn test_populate_defaults_twice_rejects_duplicates() {
    let (session, _kernel) = session_with_kernel("python3", &[CellType::Code]);
    let mut toolbar = default_toolbar(&session);

    assert!(populate_defaults(&mut toolbar, &session.panel).is_err());
    assert_eq!(toolbar.len(), ToolbarItemKind::ALL.len());
}

#[test]
fn test_snapshot_serializes_widget_state() {
    let (session, _kernel) = session_with_kernel("python3", &[CellType::Markdown]);
    let toolbar = default_toolbar(&session);

    let snapshot = toolbar.snapshot();
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json[8][0], "cellType");
    assert_eq!(json[8][1]["kind"], "cell_type");
    assert_eq!(json[8][1]["value"], "markdown");
    assert_eq!(json[9][1]["text"], "python3");
    assert_eq!(json[10][1]["busy"], false);
    assert_eq!(json[10][1]["tooltip"], "Kernel Idle");
}

#[test]
fn test_dropping_toolbar_releases_subscriptions() {
    let (session, kernel) = session_with_kernel("python3", &[CellType::Code]);
    let toolbar = default_toolbar(&session);

    assert!(session.context.kernel_changed().listener_count() > 0);
    assert_eq!(kernel.status_changed().listener_count(), 1);

    drop(toolbar);

    assert_eq!(session.context.kernel_changed().listener_count(), 0);
    assert_eq!(session.notebook.active_index_changed().listener_count(), 0);
    assert_eq!(kernel.status_changed().listener_count(), 0);
}

// =============================================================================
// Buttons
// =============================================================================

#[test]
fn test_each_button_dispatches_one_call() {
    let (session, kernel) = session_with_kernel("python3", &[CellType::Code, CellType::Raw]);
    let toolbar = default_toolbar(&session);

    toolbar.click("save").unwrap();
    assert_eq!(session.context.save_count(), 1);

    toolbar.click("copy").unwrap();
    toolbar.click("paste").unwrap();
    toolbar.click("cut").unwrap();
    toolbar.click("insert").unwrap();
    toolbar.click("run").unwrap();

    assert_eq!(
        session.actions.calls(),
        vec![
            ActionCall::Copy { index: 0 },
            ActionCall::Paste { index: 0 },
            ActionCall::Cut { index: 1 },
            ActionCall::InsertBelow { index: 1 },
            ActionCall::RunAndAdvance {
                index: 2,
                kernel: Some("python3".to_string())
            },
        ]
    );

    toolbar.click("interrupt").unwrap();
    assert_eq!(kernel.interrupt_count(), 1);
}

#[test]
fn test_run_without_kernel_still_dispatches() {
    let session = SimSession::new(&[CellType::Code], None);
    let toolbar = default_toolbar(&session);

    toolbar.click("run").unwrap();

    assert_eq!(
        session.actions.calls(),
        vec![ActionCall::RunAndAdvance {
            index: 0,
            kernel: None
        }]
    );
}

#[test]
fn test_interrupt_without_kernel_is_noop() {
    let (session, kernel) = session_with_kernel("python3", &[CellType::Code]);
    let toolbar = default_toolbar(&session);
    session.context.set_kernel(None);

    toolbar.click("interrupt").unwrap();

    assert_eq!(kernel.interrupt_count(), 0);
    assert!(session.actions.calls().is_empty());
}

#[test]
fn test_clicking_non_button_is_an_error() {
    let (session, _kernel) = session_with_kernel("python3", &[CellType::Code]);
    let toolbar = default_toolbar(&session);

    assert!(toolbar.click("kernelStatus").is_err());
    assert!(toolbar.click("nonexistent").is_err());
}

// =============================================================================
// Restart confirmation
// =============================================================================

#[test]
fn test_restart_confirmed_restarts_once() {
    let (mut session, kernel) = session_with_kernel("python3", &[CellType::Code]);
    let toolbar = default_toolbar(&session);

    toolbar.click("restart").unwrap();
    session.run_until_stalled();

    let shown = session.dialog.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, RESTART_TITLE);
    assert_eq!(shown[0].body, RESTART_BODY);
    assert_eq!(shown[0].host, session.panel.id());
    assert_eq!(kernel.restart_count(), 0, "restart must wait for the dialog");

    assert!(session.dialog.answer("OK"));
    session.run_until_stalled();

    assert_eq!(kernel.restart_count(), 1);
}

#[test]
fn test_restart_declined_does_nothing() {
    for label in ["Cancel", "ok", "", "Restart"] {
        let (mut session, kernel) = session_with_kernel("python3", &[CellType::Code]);
        let toolbar = default_toolbar(&session);

        toolbar.click("restart").unwrap();
        assert!(session.dialog.answer(label));
        session.run_until_stalled();

        assert_eq!(kernel.restart_count(), 0, "label {label:?} must not restart");
    }
}

#[test]
fn test_restart_dismissed_does_nothing() {
    let (mut session, kernel) = session_with_kernel("python3", &[CellType::Code]);
    let toolbar = default_toolbar(&session);

    toolbar.click("restart").unwrap();
    session.dialog.dismiss_all();
    session.run_until_stalled();

    assert_eq!(kernel.restart_count(), 0);
}

#[test]
fn test_restart_without_kernel_shows_no_dialog() {
    let mut session = SimSession::new(&[CellType::Code], None);
    let toolbar = default_toolbar(&session);

    toolbar.click("restart").unwrap();
    session.run_until_stalled();

    assert!(session.dialog.shown().is_empty());
    assert_eq!(session.dialog.pending_count(), 0);
}

#[test]
fn test_restart_targets_kernel_current_at_click() {
    let (mut session, first) = session_with_kernel("python3", &[CellType::Code]);
    let toolbar = default_toolbar(&session);

    toolbar.click("restart").unwrap();
    let second = SimKernel::new("deno");
    session.context.set_kernel(Some(second.clone() as KernelRef));
    session.dialog.answer("OK");
    session.run_until_stalled();

    assert_eq!(first.restart_count(), 1);
    assert_eq!(second.restart_count(), 0);
}

// =============================================================================
// Kernel status indicator
// =============================================================================

#[test]
fn test_indicator_without_kernel() {
    let session = SimSession::new(&[CellType::Code], None);
    let indicator = KernelStatusIndicator::new(&session.panel);

    assert!(indicator.is_busy());
    assert_eq!(indicator.tooltip(), "No Kernel!");
    assert_eq!(indicator.last_status(), None);
    assert!(indicator.current_kernel().is_none());
}

#[test]
fn test_indicator_renders_initial_status_and_follows_changes() {
    let kernel = SimKernel::new("python3");
    kernel.set_status(KernelStatus::Starting);
    let session = SimSession::new(&[CellType::Code], Some(kernel.clone() as KernelRef));
    let indicator = KernelStatusIndicator::new(&session.panel);

    assert!(indicator.is_busy());
    assert_eq!(indicator.tooltip(), "Kernel Starting");

    kernel.set_status(KernelStatus::Idle);
    assert!(!indicator.is_busy());
    assert_eq!(indicator.tooltip(), "Kernel Idle");

    kernel.set_status(KernelStatus::Dead);
    assert!(indicator.is_busy());
    assert_eq!(indicator.tooltip(), "Kernel Died");

    kernel.set_status(KernelStatus::from_wire("autorestarting"));
    assert!(indicator.is_busy());
    assert_eq!(indicator.tooltip(), "Kernel Status Unknown");
}

#[test]
fn test_superseded_kernel_cannot_repaint_indicator() {
    let (session, first) = session_with_kernel("python3", &[CellType::Code]);
    let indicator = KernelStatusIndicator::new(&session.panel);

    let second = SimKernel::new("python3");
    second.set_status(KernelStatus::Busy);
    session.context.set_kernel(Some(second.clone() as KernelRef));

    assert_eq!(indicator.tooltip(), "Kernel Busy");
    assert_eq!(first.status_changed().listener_count(), 0);
    assert_eq!(second.status_changed().listener_count(), 1);

    first.set_status(KernelStatus::Idle);
    first.set_status(KernelStatus::Dead);
    assert_eq!(indicator.tooltip(), "Kernel Busy");
    assert_eq!(indicator.last_status(), Some(KernelStatus::Busy));

    second.set_status(KernelStatus::Idle);
    assert_eq!(indicator.tooltip(), "Kernel Idle");
}

#[test]
fn test_slot_reassigned_during_kernel_change_tracks_newest_kernel() {
    let session = SimSession::new(&[CellType::Code], Some(SimKernel::new("k1") as KernelRef));
    let k2 = SimKernel::new("k2");
    let k3 = SimKernel::new("k3");

    // A host listener connected before the toolbar swaps k2 out for k3 as
    // soon as k2 is attached.
    let _host = {
        let context = Rc::downgrade(&session.context);
        let k3 = k3.clone();
        session
            .context
            .kernel_changed()
            .connect(move |change: &KernelChange| {
                let is_k2 = change
                    .new
                    .as_ref()
                    .and_then(|k| k.name())
                    .is_some_and(|name| name == "k2");
                if let (true, Some(context)) = (is_k2, context.upgrade()) {
                    context.set_kernel(Some(k3.clone() as KernelRef));
                }
            })
    };
    let toolbar = default_toolbar(&session);

    k3.set_status(KernelStatus::Starting);
    session.context.set_kernel(Some(k2.clone() as KernelRef));

    let current = session.context.kernel().and_then(|k| k.name());
    assert_eq!(current.as_deref(), Some("k3"));

    let indicator = toolbar
        .get("kernelStatus")
        .and_then(|item| item.as_kernel_status())
        .unwrap();
    assert_eq!(
        indicator.current_kernel().and_then(|k| k.name()).as_deref(),
        Some("k3")
    );
    assert_eq!(indicator.tooltip(), "Kernel Starting");
    assert_eq!(k2.status_changed().listener_count(), 0);
    assert_eq!(k3.status_changed().listener_count(), 1);

    k2.set_status(KernelStatus::Busy);
    assert_eq!(indicator.tooltip(), "Kernel Starting");

    let label = toolbar
        .get("kernelName")
        .and_then(|item| item.as_kernel_name())
        .unwrap();
    assert_eq!(label.text(), "k3");
}

#[test]
fn test_indicator_handles_kernel_removed_and_reattached() {
    let (session, first) = session_with_kernel("python3", &[CellType::Code]);
    let indicator = KernelStatusIndicator::new(&session.panel);

    session.context.set_kernel(None);
    assert!(indicator.is_busy());
    assert_eq!(indicator.tooltip(), "No Kernel!");
    assert_eq!(first.status_changed().listener_count(), 0);

    first.set_status(KernelStatus::Idle);
    assert_eq!(indicator.tooltip(), "No Kernel!");

    let replacement = SimKernel::new("python3");
    session
        .context
        .set_kernel(Some(replacement.clone() as KernelRef));
    assert!(!indicator.is_busy());
    assert_eq!(indicator.tooltip(), "Kernel Idle");
}

#[test]
fn test_indicator_follows_restart_transitions() {
    let (mut session, kernel) = session_with_kernel("python3", &[CellType::Code]);
    let toolbar = default_toolbar(&session);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let _sub = {
        let seen = seen.clone();
        kernel
            .status_changed()
            .connect(move |status| seen.borrow_mut().push(*status))
    };

    toolbar.click("restart").unwrap();
    session.dialog.answer("OK");
    session.run_until_stalled();

    assert_eq!(
        *seen.borrow(),
        vec![KernelStatus::Restarting, KernelStatus::Idle]
    );
    let indicator = toolbar
        .get("kernelStatus")
        .and_then(|item| item.as_kernel_status())
        .unwrap();
    assert_eq!(indicator.tooltip(), "Kernel Idle");
}

// =============================================================================
// Kernel name label
// =============================================================================

#[test]
fn test_kernel_name_follows_kernel_slot() {
    let (session, _kernel) = session_with_kernel("python3", &[CellType::Code]);
    let label = registry::create_kernel_name_item(&session.panel);
    let text = || label.as_kernel_name().unwrap().text();

    assert_eq!(text(), "python3");

    session
        .context
        .set_kernel(Some(SimKernel::new("deno") as KernelRef));
    assert_eq!(text(), "deno");

    session.context.set_kernel(None);
    assert_eq!(text(), "No Kernel!");

    session
        .context
        .set_kernel(Some(SimKernel::unnamed() as KernelRef));
    assert_eq!(text(), "No Kernel!");
}

// =============================================================================
// Cell type switcher
// =============================================================================

#[test]
fn test_switcher_shows_type_of_each_selected_cell() {
    let types = [
        CellType::Markdown,
        CellType::Code,
        CellType::Raw,
        CellType::Markdown,
    ];
    let session = SimSession::new(&types, None);
    let item = registry::create_cell_type_switcher(&session.panel);
    let switcher = item.as_cell_type_switcher().unwrap();

    assert_eq!(switcher.value(), CellType::Markdown);
    for (index, expected) in types.iter().enumerate().rev() {
        session.notebook.set_active_cell_index(index).unwrap();
        assert_eq!(switcher.value(), *expected, "cell {index}");
    }
    assert_eq!(switcher.options(), [CellType::Code, CellType::Markdown, CellType::Raw]);
}

#[test]
fn test_switcher_selection_dispatches_one_change() {
    let session = SimSession::new(&[CellType::Code, CellType::Code, CellType::Code], None);
    let toolbar = default_toolbar(&session);
    session.notebook.set_active_cell_index(2).unwrap();

    toolbar
        .select_cell_type("cellType", CellType::Markdown)
        .unwrap();

    assert_eq!(
        session.actions.calls(),
        vec![ActionCall::ChangeCellType {
            index: 2,
            value: CellType::Markdown
        }]
    );
    assert_eq!(
        session.notebook.cell_types(),
        vec![CellType::Code, CellType::Code, CellType::Markdown]
    );
    let switcher = toolbar
        .get("cellType")
        .and_then(|item| item.as_cell_type_switcher())
        .unwrap();
    assert_eq!(switcher.value(), CellType::Markdown);
}

#[test]
fn test_switcher_reflects_model_changed_elsewhere() {
    let session = SimSession::new(&[CellType::Code, CellType::Code], None);
    let item = registry::create_cell_type_switcher(&session.panel);
    let switcher = item.as_cell_type_switcher().unwrap();

    session.notebook.set_cell_type(1, CellType::Raw).unwrap();
    assert_eq!(switcher.value(), CellType::Code);

    session.notebook.set_active_cell_index(1).unwrap();
    assert_eq!(switcher.value(), CellType::Raw);
}

#[test]
fn test_switcher_tracks_selection_moved_by_actions() {
    let session = SimSession::new(&[CellType::Markdown], Some(SimKernel::new("python3") as KernelRef));
    let toolbar = default_toolbar(&session);
    let switcher = toolbar
        .get("cellType")
        .and_then(|item| item.as_cell_type_switcher())
        .unwrap();
    assert_eq!(switcher.value(), CellType::Markdown);

    toolbar.click("run").unwrap();

    assert_eq!(session.notebook.active_cell_index(), 1);
    assert_eq!(switcher.value(), CellType::Code);
}

/// Action library whose cell type changes never reach the model.
struct StubbornActions {
    fail: bool,
    type_changes: Cell<usize>,
}

impl NotebookActions for StubbornActions {
    fn insert_below(&self, _content: &dyn NotebookContent) -> anyhow::Result<()> {
        Ok(())
    }

    fn cut(&self, _content: &dyn NotebookContent, _clipboard: &Clipboard) -> anyhow::Result<()> {
        Ok(())
    }

    fn copy(&self, _content: &dyn NotebookContent, _clipboard: &Clipboard) -> anyhow::Result<()> {
        Ok(())
    }

    fn paste(&self, _content: &dyn NotebookContent, _clipboard: &Clipboard) -> anyhow::Result<()> {
        Ok(())
    }

    fn run_and_advance(
        &self,
        _content: &dyn NotebookContent,
        _kernel: Option<&KernelRef>,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn change_cell_type(
        &self,
        _content: &dyn NotebookContent,
        _value: CellType,
    ) -> anyhow::Result<()> {
        self.type_changes.set(self.type_changes.get() + 1);
        if self.fail {
            anyhow::bail!("cell is read-only");
        }
        Ok(())
    }
}

#[test]
fn test_switcher_never_runs_ahead_of_model() {
    for fail in [true, false] {
        let pool = LocalPool::new();
        let notebook = SimNotebook::new(&[CellType::Code, CellType::Raw]);
        let actions = Rc::new(StubbornActions {
            fail,
            type_changes: Cell::new(0),
        });
        let panel = NotebookPanel::new(
            notebook.clone(),
            notebook.clone(),
            SimContext::new(None),
            actions.clone(),
            SimDialog::new(),
            Rc::new(pool.spawner()),
        );
        let item = registry::create_cell_type_switcher(&panel);
        let switcher = item.as_cell_type_switcher().unwrap();
        notebook.set_active_cell_index(1).unwrap();

        switcher.select(CellType::Markdown);

        assert_eq!(actions.type_changes.get(), 1, "fail={fail}");
        assert_eq!(switcher.value(), CellType::Raw, "fail={fail}");
        assert_eq!(notebook.cell_types(), vec![CellType::Code, CellType::Raw]);
    }
}
