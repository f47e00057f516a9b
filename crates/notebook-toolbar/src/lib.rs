//! notebook-toolbar - the command bar of a notebook panel.
//!
//! Buttons dispatch to the notebook's action library and kernel. Two widgets
//! follow external state without polling:
//!
//! - [`kernel_status::KernelStatusIndicator`] tracks whichever kernel the
//!   document context currently holds, re-subscribing when it is replaced.
//! - [`cell_type_switcher::CellTypeSwitcher`] shows the active cell's type
//!   and routes user edits through the action library.
//!
//! Everything runs on one thread. Notifications are delivered synchronously
//! through [`signal::Signal`]; the restart confirmation is the only work
//! that completes later, on the panel's local executor.

pub mod buttons;
pub mod cell;
pub mod cell_type_switcher;
pub mod error;
pub mod kernel;
pub mod kernel_name;
pub mod kernel_status;
pub mod panel;
pub mod registry;
pub mod signal;
pub mod sim;

pub use cell::CellType;
pub use error::ToolbarError;
pub use kernel::{Kernel, KernelRef, KernelStatus};
pub use panel::NotebookPanel;
pub use registry::{populate_defaults, Toolbar, ToolbarItem, ToolbarItemKind};
