use thiserror::Error;

/// Errors surfaced by the toolbar's own fallible entry points.
///
/// Widgets never return these; they render absent or unknown state instead.
#[derive(Debug, Error)]
pub enum ToolbarError {
    #[error("unknown cell type: {0}")]
    UnknownCellType(String),

    #[error("unknown toolbar item: {0}")]
    UnknownItem(String),

    #[error("toolbar already has an item named {0}")]
    DuplicateItem(String),

    #[error("cell index {index} out of range for notebook with {len} cells")]
    CellOutOfRange { index: usize, len: usize },
}
