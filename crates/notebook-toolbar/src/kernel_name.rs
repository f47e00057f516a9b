//! Kernel name label.
//!
//! Shows the current kernel's name and follows reassignments of the kernel
//! slot. An empty slot, or a kernel without a name, shows "No Kernel!".

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::kernel::{kernel_display_name, KernelChange};
use crate::panel::NotebookPanel;
use crate::signal::Subscription;

pub const KERNEL_NAME_CLASS: &str = "nb-toolbar-kernel-name";

/// Label showing the current kernel's name.
pub struct KernelNameLabel {
    text: Rc<RefCell<String>>,
    _kernel_changed: Subscription,
}

impl KernelNameLabel {
    pub fn new(panel: &NotebookPanel) -> Self {
        let context = panel.context();
        let text = Rc::new(RefCell::new(kernel_display_name(context.kernel().as_ref())));

        // Read the slot rather than the payload; it may have been reassigned
        // again inside this notification.
        let weak = Rc::downgrade(&text);
        let weak_context = panel.context_weak();
        let kernel_changed = context.kernel_changed().connect(move |_: &KernelChange| {
            let (Some(text), Some(context)) = (weak.upgrade(), weak_context.upgrade()) else {
                return;
            };
            let name = kernel_display_name(context.kernel().as_ref());
            debug!("[kernel-name] {}", name);
            *text.borrow_mut() = name;
        });

        Self {
            text,
            _kernel_changed: kernel_changed,
        }
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }
}
