//! Collaborators the toolbar is wired against.
//!
//! The panel owns the notebook view, its model, the document context (which
//! holds the kernel slot), the action library, and the dialog primitive.
//! The toolbar only reads from them and subscribes to their notifications.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use anyhow::Result;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cell::CellType;
use crate::kernel::{KernelChange, KernelRef};
use crate::signal::Signal;

/// A cell held by the clipboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    pub cell_type: CellType,
    pub source: String,
}

/// Transient storage shared by cut, copy and paste.
#[derive(Debug, Default)]
pub struct Clipboard {
    entries: RefCell<Vec<ClipboardEntry>>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard contents.
    pub fn set(&self, entries: Vec<ClipboardEntry>) {
        *self.entries.borrow_mut() = entries;
    }

    pub fn entries(&self) -> Vec<ClipboardEntry> {
        self.entries.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// The notebook view: selection state and the clipboard.
pub trait NotebookContent {
    fn active_cell_index(&self) -> usize;

    /// Emitted with the new index whenever the selection moves. Only valid
    /// indices are ever emitted.
    fn active_index_changed(&self) -> &Signal<usize>;

    fn clipboard(&self) -> &Clipboard;
}

/// The ordered cell models backing the view.
pub trait NotebookModel {
    fn cell_count(&self) -> usize;

    fn cell_type(&self, index: usize) -> Option<CellType>;
}

/// The document context: persistence plus the kernel slot.
pub trait DocumentContext {
    /// The current kernel, if one is attached.
    fn kernel(&self) -> Option<KernelRef>;

    /// Emitted whenever the kernel slot is reassigned.
    fn kernel_changed(&self) -> &Signal<KernelChange>;

    fn save(&self) -> Result<()>;
}

/// Notebook actions the toolbar buttons dispatch to.
pub trait NotebookActions {
    fn insert_below(&self, content: &dyn NotebookContent) -> Result<()>;

    fn cut(&self, content: &dyn NotebookContent, clipboard: &Clipboard) -> Result<()>;

    fn copy(&self, content: &dyn NotebookContent, clipboard: &Clipboard) -> Result<()>;

    fn paste(&self, content: &dyn NotebookContent, clipboard: &Clipboard) -> Result<()>;

    /// Run the selected cell(s) and advance the selection. What happens
    /// without a kernel is up to the implementation.
    fn run_and_advance(&self, content: &dyn NotebookContent, kernel: Option<&KernelRef>)
        -> Result<()>;

    fn change_cell_type(&self, content: &dyn NotebookContent, value: CellType) -> Result<()>;
}

/// The label of the button a dialog was closed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogResult {
    pub text: String,
}

impl DialogResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Result of a dialog closed without choosing a button.
    pub fn dismissed() -> Self {
        Self {
            text: String::new(),
        }
    }
}

/// Modal dialog primitive. `host` identifies the panel the dialog is attached to.
pub trait Dialog {
    fn show(&self, title: &str, body: &str, host: &str) -> LocalBoxFuture<'static, DialogResult>;
}

/// Everything a toolbar item needs from its hosting panel.
///
/// Cheap to clone; all collaborators are shared.
#[derive(Clone)]
pub struct NotebookPanel {
    id: String,
    content: Rc<dyn NotebookContent>,
    model: Rc<dyn NotebookModel>,
    context: Rc<dyn DocumentContext>,
    actions: Rc<dyn NotebookActions>,
    dialog: Rc<dyn Dialog>,
    spawner: Rc<dyn LocalSpawn>,
}

impl NotebookPanel {
    pub fn new(
        content: Rc<dyn NotebookContent>,
        model: Rc<dyn NotebookModel>,
        context: Rc<dyn DocumentContext>,
        actions: Rc<dyn NotebookActions>,
        dialog: Rc<dyn Dialog>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        Self {
            id: format!("notebook-panel-{}", Uuid::new_v4()),
            content,
            model,
            context,
            actions,
            dialog,
            spawner,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &dyn NotebookContent {
        self.content.as_ref()
    }

    pub fn model(&self) -> &dyn NotebookModel {
        self.model.as_ref()
    }

    pub fn context(&self) -> &dyn DocumentContext {
        self.context.as_ref()
    }

    /// Weak handle to the document context, for listeners attached to the
    /// context's own signals.
    pub fn context_weak(&self) -> Weak<dyn DocumentContext> {
        Rc::downgrade(&self.context)
    }

    pub fn actions(&self) -> &dyn NotebookActions {
        self.actions.as_ref()
    }

    pub fn dialog(&self) -> &dyn Dialog {
        self.dialog.as_ref()
    }

    /// Executor for work that resolves after the current event, such as
    /// waiting on a dialog.
    pub fn spawner(&self) -> &dyn LocalSpawn {
        self.spawner.as_ref()
    }
}
