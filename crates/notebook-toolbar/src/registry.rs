//! Named constructors for the notebook toolbar and the container that hosts
//! them.

use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::buttons::{self, ButtonView, ToolbarButton};
use crate::cell::CellType;
use crate::cell_type_switcher::{CellTypeSwitcher, SwitcherView};
use crate::error::ToolbarError;
use crate::kernel_name::KernelNameLabel;
use crate::kernel_status::{IndicatorView, KernelStatusIndicator};
use crate::panel::NotebookPanel;

/// The fixed set of notebook toolbar entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolbarItemKind {
    Save,
    Insert,
    Cut,
    Copy,
    Paste,
    Run,
    Interrupt,
    Restart,
    CellType,
    KernelName,
    KernelStatus,
}

impl ToolbarItemKind {
    /// Every entry, in default toolbar order.
    pub const ALL: [ToolbarItemKind; 11] = [
        ToolbarItemKind::Save,
        ToolbarItemKind::Insert,
        ToolbarItemKind::Cut,
        ToolbarItemKind::Copy,
        ToolbarItemKind::Paste,
        ToolbarItemKind::Run,
        ToolbarItemKind::Interrupt,
        ToolbarItemKind::Restart,
        ToolbarItemKind::CellType,
        ToolbarItemKind::KernelName,
        ToolbarItemKind::KernelStatus,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolbarItemKind::Save => "save",
            ToolbarItemKind::Insert => "insert",
            ToolbarItemKind::Cut => "cut",
            ToolbarItemKind::Copy => "copy",
            ToolbarItemKind::Paste => "paste",
            ToolbarItemKind::Run => "run",
            ToolbarItemKind::Interrupt => "interrupt",
            ToolbarItemKind::Restart => "restart",
            ToolbarItemKind::CellType => "cellType",
            ToolbarItemKind::KernelName => "kernelName",
            ToolbarItemKind::KernelStatus => "kernelStatus",
        }
    }
}

impl std::fmt::Display for ToolbarItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolbarItemKind {
    type Err = ToolbarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolbarItemKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ToolbarError::UnknownItem(s.to_string()))
    }
}

/// A constructed toolbar entry.
pub enum ToolbarItem {
    Button(ToolbarButton),
    CellType(CellTypeSwitcher),
    KernelName(KernelNameLabel),
    KernelStatus(KernelStatusIndicator),
}

impl ToolbarItem {
    pub fn view(&self) -> ToolbarItemView {
        match self {
            ToolbarItem::Button(button) => ToolbarItemView::Button(button.view()),
            ToolbarItem::CellType(switcher) => ToolbarItemView::CellType(switcher.view()),
            ToolbarItem::KernelName(label) => ToolbarItemView::KernelName { text: label.text() },
            ToolbarItem::KernelStatus(indicator) => {
                ToolbarItemView::KernelStatus(indicator.view())
            }
        }
    }

    pub fn as_button(&self) -> Option<&ToolbarButton> {
        match self {
            ToolbarItem::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn as_cell_type_switcher(&self) -> Option<&CellTypeSwitcher> {
        match self {
            ToolbarItem::CellType(switcher) => Some(switcher),
            _ => None,
        }
    }

    pub fn as_kernel_name(&self) -> Option<&KernelNameLabel> {
        match self {
            ToolbarItem::KernelName(label) => Some(label),
            _ => None,
        }
    }

    pub fn as_kernel_status(&self) -> Option<&KernelStatusIndicator> {
        match self {
            ToolbarItem::KernelStatus(indicator) => Some(indicator),
            _ => None,
        }
    }
}

/// Serializable snapshot of a toolbar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolbarItemView {
    Button(ButtonView),
    CellType(SwitcherView),
    KernelName { text: String },
    KernelStatus(IndicatorView),
}

pub fn create_save_button(panel: &NotebookPanel) -> ToolbarItem {
    ToolbarItem::Button(buttons::create_save_button(panel))
}

pub fn create_insert_button(panel: &NotebookPanel) -> ToolbarItem {
    ToolbarItem::Button(buttons::create_insert_button(panel))
}

pub fn create_cut_button(panel: &NotebookPanel) -> ToolbarItem {
    ToolbarItem::Button(buttons::create_cut_button(panel))
}

pub fn create_copy_button(panel: &NotebookPanel) -> ToolbarItem {
    ToolbarItem::Button(buttons::create_copy_button(panel))
}

pub fn create_paste_button(panel: &NotebookPanel) -> ToolbarItem {
    ToolbarItem::Button(buttons::create_paste_button(panel))
}

pub fn create_run_button(panel: &NotebookPanel) -> ToolbarItem {
    ToolbarItem::Button(buttons::create_run_button(panel))
}

pub fn create_interrupt_button(panel: &NotebookPanel) -> ToolbarItem {
    ToolbarItem::Button(buttons::create_interrupt_button(panel))
}

pub fn create_restart_button(panel: &NotebookPanel) -> ToolbarItem {
    ToolbarItem::Button(buttons::create_restart_button(panel))
}

pub fn create_cell_type_switcher(panel: &NotebookPanel) -> ToolbarItem {
    ToolbarItem::CellType(CellTypeSwitcher::new(panel))
}

pub fn create_kernel_name_item(panel: &NotebookPanel) -> ToolbarItem {
    ToolbarItem::KernelName(KernelNameLabel::new(panel))
}

pub fn create_kernel_status_item(panel: &NotebookPanel) -> ToolbarItem {
    ToolbarItem::KernelStatus(KernelStatusIndicator::new(panel))
}

/// Construct the entry for `kind`.
pub fn create_item(kind: ToolbarItemKind, panel: &NotebookPanel) -> ToolbarItem {
    match kind {
        ToolbarItemKind::Save => create_save_button(panel),
        ToolbarItemKind::Insert => create_insert_button(panel),
        ToolbarItemKind::Cut => create_cut_button(panel),
        ToolbarItemKind::Copy => create_copy_button(panel),
        ToolbarItemKind::Paste => create_paste_button(panel),
        ToolbarItemKind::Run => create_run_button(panel),
        ToolbarItemKind::Interrupt => create_interrupt_button(panel),
        ToolbarItemKind::Restart => create_restart_button(panel),
        ToolbarItemKind::CellType => create_cell_type_switcher(panel),
        ToolbarItemKind::KernelName => create_kernel_name_item(panel),
        ToolbarItemKind::KernelStatus => create_kernel_status_item(panel),
    }
}

/// Ordered, name-addressed toolbar entries.
#[derive(Default)]
pub struct Toolbar {
    items: Vec<(String, ToolbarItem)>,
}

impl Toolbar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item. Names are unique within a toolbar.
    pub fn add_item(&mut self, name: &str, item: ToolbarItem) -> Result<(), ToolbarError> {
        if self.get(name).is_some() {
            return Err(ToolbarError::DuplicateItem(name.to_string()));
        }
        self.items.push((name.to_string(), item));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolbarItem> {
        self.items
            .iter()
            .find(|(item_name, _)| item_name == name)
            .map(|(_, item)| item)
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Click the button named `name`.
    pub fn click(&self, name: &str) -> Result<(), ToolbarError> {
        let button = self
            .get(name)
            .and_then(ToolbarItem::as_button)
            .ok_or_else(|| ToolbarError::UnknownItem(name.to_string()))?;
        button.click();
        Ok(())
    }

    /// Pick `value` in the cell type switcher named `name`.
    pub fn select_cell_type(&self, name: &str, value: CellType) -> Result<(), ToolbarError> {
        let switcher = self
            .get(name)
            .and_then(ToolbarItem::as_cell_type_switcher)
            .ok_or_else(|| ToolbarError::UnknownItem(name.to_string()))?;
        switcher.select(value);
        Ok(())
    }

    /// Snapshot every entry, keyed by name, in toolbar order.
    pub fn snapshot(&self) -> Vec<(String, ToolbarItemView)> {
        self.items
            .iter()
            .map(|(name, item)| (name.clone(), item.view()))
            .collect()
    }
}

/// Add every notebook toolbar entry to `toolbar` in default order.
pub fn populate_defaults(toolbar: &mut Toolbar, panel: &NotebookPanel) -> Result<(), ToolbarError> {
    for kind in ToolbarItemKind::ALL {
        debug!("[toolbar] adding {}", kind);
        toolbar.add_item(kind.name(), create_item(kind, panel))?;
    }
    Ok(())
}
