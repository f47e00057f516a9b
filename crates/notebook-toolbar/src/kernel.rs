//! The kernel as the toolbar sees it: a name, a lifecycle status, and two
//! requests (interrupt, restart). Transport and message framing live with
//! whoever implements [`Kernel`].

use std::rc::Rc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::signal::{Changed, Signal};

/// Kernel lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelStatus {
    /// Kernel is ready and idle
    Idle,
    /// Kernel is executing code
    Busy,
    /// Kernel process died
    Dead,
    /// Connection to the kernel is being re-established
    Reconnecting,
    /// Kernel is restarting
    Restarting,
    /// Kernel is starting up
    Starting,
    /// Kernel reported a status this client does not recognize
    #[serde(other)]
    Unknown,
}

impl KernelStatus {
    /// Parse a status as reported on the wire. Unrecognized values map to
    /// [`KernelStatus::Unknown`].
    pub fn from_wire(status: &str) -> Self {
        match status.trim() {
            "idle" => KernelStatus::Idle,
            "busy" => KernelStatus::Busy,
            "dead" => KernelStatus::Dead,
            "reconnecting" => KernelStatus::Reconnecting,
            "restarting" => KernelStatus::Restarting,
            "starting" => KernelStatus::Starting,
            _ => KernelStatus::Unknown,
        }
    }
}

impl std::fmt::Display for KernelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelStatus::Idle => write!(f, "idle"),
            KernelStatus::Busy => write!(f, "busy"),
            KernelStatus::Dead => write!(f, "dead"),
            KernelStatus::Reconnecting => write!(f, "reconnecting"),
            KernelStatus::Restarting => write!(f, "restarting"),
            KernelStatus::Starting => write!(f, "starting"),
            KernelStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// A kernel attached to a notebook document.
pub trait Kernel {
    /// Kernel name (e.g. "python3"), if the kernel has reported one.
    fn name(&self) -> Option<String>;

    fn status(&self) -> KernelStatus;

    /// Emitted with the new status on every lifecycle transition.
    fn status_changed(&self) -> &Signal<KernelStatus>;

    fn interrupt(&self) -> Result<()>;

    fn restart(&self) -> Result<()>;
}

/// Shared handle to a kernel.
pub type KernelRef = Rc<dyn Kernel>;

/// Payload of a kernel slot reassignment (connect, restart, disconnect).
pub type KernelChange = Changed<Option<KernelRef>>;

/// Name shown wherever a kernel or its name is missing.
pub const NO_KERNEL: &str = "No Kernel!";

/// Display text for a possibly-absent kernel's name.
pub fn kernel_display_name(kernel: Option<&KernelRef>) -> String {
    kernel
        .and_then(|k| k.name())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| NO_KERNEL.to_string())
}
