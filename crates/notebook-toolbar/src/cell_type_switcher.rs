//! Cell type dropdown.
//!
//! Data flows one way. Selection changes re-render the control from the
//! model; a user choice is dispatched to the action layer and the control is
//! then re-rendered from the model, never from its own value.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use log::{debug, error, info};
use serde::Serialize;

use crate::cell::CellType;
use crate::panel::NotebookPanel;
use crate::signal::Subscription;

pub const CELL_TYPE_CLASS: &str = "nb-toolbar-cell-type";

struct SwitcherState {
    panel: NotebookPanel,
    value: Cell<CellType>,
}

impl SwitcherState {
    /// Show the type of the cell at `index`.
    fn render(&self, index: usize) {
        match self.panel.model().cell_type(index) {
            Some(cell_type) => {
                debug!("[cell-type] cell {} is {}", index, cell_type);
                self.value.set(cell_type);
            }
            None => debug!(
                "[cell-type] no cell at {} of {}, keeping {}",
                index,
                self.panel.model().cell_count(),
                self.value.get()
            ),
        }
    }

    fn render_active(&self) {
        self.render(self.panel.content().active_cell_index());
    }
}

/// Serializable snapshot of the switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitcherView {
    pub value: CellType,
    pub options: [CellType; 3],
}

/// Toolbar item that shows and edits the active cell's type.
pub struct CellTypeSwitcher {
    state: Rc<SwitcherState>,
    _index_changed: Subscription,
}

impl CellTypeSwitcher {
    pub fn new(panel: &NotebookPanel) -> Self {
        let state = Rc::new(SwitcherState {
            panel: panel.clone(),
            value: Cell::new(CellType::Code),
        });
        state.render_active();

        let weak: Weak<SwitcherState> = Rc::downgrade(&state);
        let index_changed = panel
            .content()
            .active_index_changed()
            .connect(move |index: &usize| {
                if let Some(state) = weak.upgrade() {
                    state.render(*index);
                }
            });

        Self {
            state,
            _index_changed: index_changed,
        }
    }

    pub fn value(&self) -> CellType {
        self.state.value.get()
    }

    pub fn options(&self) -> [CellType; 3] {
        CellType::ALL
    }

    /// Handle the user picking `value` in the control.
    pub fn select(&self, value: CellType) {
        let panel = &self.state.panel;
        info!("[cell-type] change active cell to {}", value);
        if let Err(e) = panel.actions().change_cell_type(panel.content(), value) {
            error!("[toolbar] change cell type failed: {}", e);
        }
        self.state.render_active();
    }

    pub fn view(&self) -> SwitcherView {
        SwitcherView {
            value: self.value(),
            options: self.options(),
        }
    }
}
