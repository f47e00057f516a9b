//! In-memory collaborators for driving a toolbar without a frontend.
//!
//! Used by the `notebook-toolbar` binary and by tests. [`SimActions`] both
//! records every call and applies it to a [`SimNotebook`], so the toolbar
//! sees the same notifications a real notebook view would send.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::Result;
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::task::LocalSpawn;
use log::{debug, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::cell::CellType;
use crate::error::ToolbarError;
use crate::kernel::{Kernel, KernelChange, KernelRef, KernelStatus};
use crate::panel::{
    Clipboard, ClipboardEntry, Dialog, DialogResult, DocumentContext, NotebookActions,
    NotebookContent, NotebookModel, NotebookPanel,
};
use crate::signal::{Observable, Signal};

// =============================================================================
// Kernel
// =============================================================================

/// A kernel whose status is set by hand.
pub struct SimKernel {
    name: Option<String>,
    status: Cell<KernelStatus>,
    status_changed: Signal<KernelStatus>,
    interrupts: Cell<usize>,
    restarts: Cell<usize>,
}

impl SimKernel {
    /// An idle kernel called `name`.
    pub fn new(name: &str) -> Rc<Self> {
        Rc::new(Self {
            name: Some(name.to_string()),
            status: Cell::new(KernelStatus::Idle),
            status_changed: Signal::new(),
            interrupts: Cell::new(0),
            restarts: Cell::new(0),
        })
    }

    /// An idle kernel that has not reported a name.
    pub fn unnamed() -> Rc<Self> {
        Rc::new(Self {
            name: None,
            status: Cell::new(KernelStatus::Idle),
            status_changed: Signal::new(),
            interrupts: Cell::new(0),
            restarts: Cell::new(0),
        })
    }

    pub fn set_status(&self, status: KernelStatus) {
        self.status.set(status);
        self.status_changed.emit(&status);
    }

    pub fn interrupt_count(&self) -> usize {
        self.interrupts.get()
    }

    pub fn restart_count(&self) -> usize {
        self.restarts.get()
    }
}

impl Kernel for SimKernel {
    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn status(&self) -> KernelStatus {
        self.status.get()
    }

    fn status_changed(&self) -> &Signal<KernelStatus> {
        &self.status_changed
    }

    fn interrupt(&self) -> Result<()> {
        self.interrupts.set(self.interrupts.get() + 1);
        Ok(())
    }

    fn restart(&self) -> Result<()> {
        self.restarts.set(self.restarts.get() + 1);
        self.set_status(KernelStatus::Restarting);
        self.set_status(KernelStatus::Idle);
        Ok(())
    }
}

// =============================================================================
// Document context
// =============================================================================

/// Document context holding an observable kernel slot.
pub struct SimContext {
    kernel: Observable<Option<KernelRef>>,
    saves: Cell<usize>,
}

impl SimContext {
    pub fn new(kernel: Option<KernelRef>) -> Rc<Self> {
        Rc::new(Self {
            kernel: Observable::new(kernel),
            saves: Cell::new(0),
        })
    }

    /// Reassign the kernel slot (connect, restart, or disconnect).
    pub fn set_kernel(&self, kernel: Option<KernelRef>) {
        self.kernel.set(kernel);
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl DocumentContext for SimContext {
    fn kernel(&self) -> Option<KernelRef> {
        self.kernel.get()
    }

    fn kernel_changed(&self) -> &Signal<KernelChange> {
        self.kernel.changed()
    }

    fn save(&self) -> Result<()> {
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

// =============================================================================
// Notebook view + model
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimCell {
    pub id: String,
    pub cell_type: CellType,
    pub source: String,
}

impl SimCell {
    fn new(cell_type: CellType, source: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            cell_type,
            source: source.to_string(),
        }
    }
}

/// Cells, selection and clipboard.
pub struct SimNotebook {
    cells: RefCell<Vec<SimCell>>,
    active: Cell<usize>,
    active_index_changed: Signal<usize>,
    clipboard: Clipboard,
}

impl SimNotebook {
    /// A notebook with one empty cell per entry of `cell_types`, or a single
    /// code cell if `cell_types` is empty. The first cell is active.
    pub fn new(cell_types: &[CellType]) -> Rc<Self> {
        let mut cells: Vec<SimCell> = cell_types.iter().map(|t| SimCell::new(*t, "")).collect();
        if cells.is_empty() {
            cells.push(SimCell::new(CellType::Code, ""));
        }
        Rc::new(Self {
            cells: RefCell::new(cells),
            active: Cell::new(0),
            active_index_changed: Signal::new(),
            clipboard: Clipboard::new(),
        })
    }

    pub fn cells(&self) -> Vec<SimCell> {
        self.cells.borrow().clone()
    }

    pub fn cell_types(&self) -> Vec<CellType> {
        self.cells.borrow().iter().map(|c| c.cell_type).collect()
    }

    /// Move the selection. Out-of-range indices are rejected without notifying.
    pub fn set_active_cell_index(&self, index: usize) -> Result<(), ToolbarError> {
        let len = self.cells.borrow().len();
        if index >= len {
            return Err(ToolbarError::CellOutOfRange { index, len });
        }
        self.active.set(index);
        self.active_index_changed.emit(&index);
        Ok(())
    }

    /// Change a cell's type in the model without moving the selection.
    pub fn set_cell_type(&self, index: usize, cell_type: CellType) -> Result<(), ToolbarError> {
        let mut cells = self.cells.borrow_mut();
        let len = cells.len();
        let cell = cells
            .get_mut(index)
            .ok_or(ToolbarError::CellOutOfRange { index, len })?;
        cell.cell_type = cell_type;
        Ok(())
    }

    pub fn set_source(&self, index: usize, source: &str) -> Result<(), ToolbarError> {
        let mut cells = self.cells.borrow_mut();
        let len = cells.len();
        let cell = cells
            .get_mut(index)
            .ok_or(ToolbarError::CellOutOfRange { index, len })?;
        cell.source = source.to_string();
        Ok(())
    }

    fn insert_cells(&self, at: usize, new_cells: Vec<SimCell>) {
        let mut cells = self.cells.borrow_mut();
        let at = at.min(cells.len());
        for (offset, cell) in new_cells.into_iter().enumerate() {
            cells.insert(at + offset, cell);
        }
    }

    fn remove_cell(&self, index: usize) -> Option<SimCell> {
        let mut cells = self.cells.borrow_mut();
        if index >= cells.len() {
            return None;
        }
        let removed = cells.remove(index);
        if cells.is_empty() {
            cells.push(SimCell::new(CellType::Code, ""));
        }
        Some(removed)
    }

    fn cell(&self, index: usize) -> Option<SimCell> {
        self.cells.borrow().get(index).cloned()
    }

    fn len(&self) -> usize {
        self.cells.borrow().len()
    }
}

impl NotebookContent for SimNotebook {
    fn active_cell_index(&self) -> usize {
        self.active.get()
    }

    fn active_index_changed(&self) -> &Signal<usize> {
        &self.active_index_changed
    }

    fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }
}

impl NotebookModel for SimNotebook {
    fn cell_count(&self) -> usize {
        self.len()
    }

    fn cell_type(&self, index: usize) -> Option<CellType> {
        self.cells.borrow().get(index).map(|c| c.cell_type)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// A recorded action call, with the active index it was dispatched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionCall {
    InsertBelow { index: usize },
    Cut { index: usize },
    Copy { index: usize },
    Paste { index: usize },
    RunAndAdvance { index: usize, kernel: Option<String> },
    ChangeCellType { index: usize, value: CellType },
}

/// Action library operating on a [`SimNotebook`].
pub struct SimActions {
    notebook: Rc<SimNotebook>,
    calls: RefCell<Vec<ActionCall>>,
}

impl SimActions {
    pub fn new(notebook: Rc<SimNotebook>) -> Rc<Self> {
        Rc::new(Self {
            notebook,
            calls: RefCell::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<ActionCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: ActionCall) {
        debug!("[sim] {:?}", call);
        self.calls.borrow_mut().push(call);
    }

    fn entry(cell: &SimCell) -> ClipboardEntry {
        ClipboardEntry {
            cell_type: cell.cell_type,
            source: cell.source.clone(),
        }
    }
}

impl NotebookActions for SimActions {
    fn insert_below(&self, content: &dyn NotebookContent) -> Result<()> {
        let index = content.active_cell_index();
        self.record(ActionCall::InsertBelow { index });
        self.notebook
            .insert_cells(index + 1, vec![SimCell::new(CellType::Code, "")]);
        self.notebook.set_active_cell_index(index + 1)?;
        Ok(())
    }

    fn cut(&self, content: &dyn NotebookContent, clipboard: &Clipboard) -> Result<()> {
        let index = content.active_cell_index();
        self.record(ActionCall::Cut { index });
        let removed = self
            .notebook
            .remove_cell(index)
            .ok_or(ToolbarError::CellOutOfRange {
                index,
                len: self.notebook.len(),
            })?;
        clipboard.set(vec![Self::entry(&removed)]);
        let next = index.min(self.notebook.len() - 1);
        self.notebook.set_active_cell_index(next)?;
        Ok(())
    }

    fn copy(&self, content: &dyn NotebookContent, clipboard: &Clipboard) -> Result<()> {
        let index = content.active_cell_index();
        self.record(ActionCall::Copy { index });
        let cell = self
            .notebook
            .cell(index)
            .ok_or(ToolbarError::CellOutOfRange {
                index,
                len: self.notebook.len(),
            })?;
        clipboard.set(vec![Self::entry(&cell)]);
        Ok(())
    }

    fn paste(&self, content: &dyn NotebookContent, clipboard: &Clipboard) -> Result<()> {
        let index = content.active_cell_index();
        self.record(ActionCall::Paste { index });
        let entries = clipboard.entries();
        if entries.is_empty() {
            return Ok(());
        }
        let count = entries.len();
        let cells = entries
            .iter()
            .map(|e| SimCell::new(e.cell_type, &e.source))
            .collect();
        self.notebook.insert_cells(index + 1, cells);
        self.notebook.set_active_cell_index(index + count)?;
        Ok(())
    }

    fn run_and_advance(
        &self,
        content: &dyn NotebookContent,
        kernel: Option<&KernelRef>,
    ) -> Result<()> {
        let index = content.active_cell_index();
        self.record(ActionCall::RunAndAdvance {
            index,
            kernel: kernel.and_then(|k| k.name()),
        });
        if kernel.is_none() {
            warn!("[sim] run requested without a kernel");
            return Ok(());
        }
        if index + 1 >= self.notebook.len() {
            self.notebook
                .insert_cells(index + 1, vec![SimCell::new(CellType::Code, "")]);
        }
        self.notebook.set_active_cell_index(index + 1)?;
        Ok(())
    }

    fn change_cell_type(&self, content: &dyn NotebookContent, value: CellType) -> Result<()> {
        let index = content.active_cell_index();
        self.record(ActionCall::ChangeCellType { index, value });
        self.notebook.set_cell_type(index, value)?;
        Ok(())
    }
}

// =============================================================================
// Dialog
// =============================================================================

/// A dialog request seen by [`SimDialog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownDialog {
    pub title: String,
    pub body: String,
    pub host: String,
}

/// Dialog whose answers are supplied explicitly, oldest request first.
#[derive(Default)]
pub struct SimDialog {
    shown: RefCell<Vec<ShownDialog>>,
    pending: RefCell<VecDeque<oneshot::Sender<DialogResult>>>,
}

impl SimDialog {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn shown(&self) -> Vec<ShownDialog> {
        self.shown.borrow().clone()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Close the oldest open dialog with the button labelled `label`.
    /// Returns false if no dialog is open.
    pub fn answer(&self, label: &str) -> bool {
        let Some(tx) = self.pending.borrow_mut().pop_front() else {
            return false;
        };
        tx.send(DialogResult::new(label)).is_ok()
    }

    /// Close every open dialog without choosing a button.
    pub fn dismiss_all(&self) {
        self.pending.borrow_mut().clear();
    }
}

impl Dialog for SimDialog {
    fn show(&self, title: &str, body: &str, host: &str) -> LocalBoxFuture<'static, DialogResult> {
        self.shown.borrow_mut().push(ShownDialog {
            title: title.to_string(),
            body: body.to_string(),
            host: host.to_string(),
        });
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push_back(tx);
        async move { rx.await.unwrap_or_else(|_| DialogResult::dismissed()) }.boxed_local()
    }
}

// =============================================================================
// Session
// =============================================================================

/// A panel wired to simulated collaborators and a local executor.
pub struct SimSession {
    pool: LocalPool,
    pub notebook: Rc<SimNotebook>,
    pub context: Rc<SimContext>,
    pub actions: Rc<SimActions>,
    pub dialog: Rc<SimDialog>,
    pub panel: NotebookPanel,
}

impl SimSession {
    pub fn new(cell_types: &[CellType], kernel: Option<KernelRef>) -> Self {
        let pool = LocalPool::new();
        let notebook = SimNotebook::new(cell_types);
        let context = SimContext::new(kernel);
        let actions = SimActions::new(Rc::clone(&notebook));
        let dialog = SimDialog::new();
        let spawner: Rc<dyn LocalSpawn> = Rc::new(pool.spawner());

        let panel = NotebookPanel::new(
            notebook.clone(),
            notebook.clone(),
            context.clone(),
            actions.clone(),
            dialog.clone(),
            spawner,
        );

        Self {
            pool,
            notebook,
            context,
            actions,
            dialog,
            panel,
        }
    }

    /// Run scheduled work (e.g. answered dialogs) until nothing can progress.
    pub fn run_until_stalled(&mut self) {
        self.pool.run_until_stalled();
    }
}
