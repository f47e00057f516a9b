use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ToolbarError;

/// Jupyter cell types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
}

impl CellType {
    /// All cell types, in the order the switcher lists them.
    pub const ALL: [CellType; 3] = [CellType::Code, CellType::Markdown, CellType::Raw];

    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Code => "code",
            CellType::Markdown => "markdown",
            CellType::Raw => "raw",
        }
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellType {
    type Err = ToolbarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "code" => Ok(CellType::Code),
            "markdown" => Ok(CellType::Markdown),
            "raw" => Ok(CellType::Raw),
            other => Err(ToolbarError::UnknownCellType(other.to_string())),
        }
    }
}
