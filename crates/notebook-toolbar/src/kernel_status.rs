//! Kernel status indicator.
//!
//! Tracks the document's current kernel and renders its lifecycle status.
//! When the kernel slot is reassigned the subscription to the old kernel's
//! status is released before the new kernel is rendered and subscribed, so a
//! superseded kernel can never repaint the indicator.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::debug;
use serde::Serialize;

use crate::kernel::{KernelChange, KernelRef, KernelStatus, NO_KERNEL};
use crate::panel::NotebookPanel;
use crate::signal::Subscription;

pub const KERNEL_STATUS_CLASS: &str = "nb-toolbar-kernel-status";
pub const BUSY_CLASS: &str = "nb-mod-busy";

/// Tooltip for a kernel status.
pub fn status_tooltip(status: KernelStatus) -> &'static str {
    match status {
        KernelStatus::Idle => "Kernel Idle",
        KernelStatus::Busy => "Kernel Busy",
        KernelStatus::Dead => "Kernel Died",
        KernelStatus::Reconnecting => "Kernel Reconnecting",
        KernelStatus::Restarting => "Kernel Restarting",
        KernelStatus::Starting => "Kernel Starting",
        KernelStatus::Unknown => "Kernel Status Unknown",
    }
}

/// What the indicator shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorView {
    pub busy: bool,
    pub tooltip: &'static str,
}

impl IndicatorView {
    pub fn for_status(status: KernelStatus) -> Self {
        Self {
            busy: status != KernelStatus::Idle,
            tooltip: status_tooltip(status),
        }
    }

    pub fn no_kernel() -> Self {
        Self {
            busy: true,
            tooltip: NO_KERNEL,
        }
    }

    /// CSS classes for this view.
    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = vec![KERNEL_STATUS_CLASS];
        if self.busy {
            classes.push(BUSY_CLASS);
        }
        classes
    }
}

struct IndicatorState {
    view: RefCell<IndicatorView>,
    current_kernel: RefCell<Option<KernelRef>>,
    last_status: RefCell<Option<KernelStatus>>,
    status_subscription: RefCell<Option<Subscription>>,
}

impl IndicatorState {
    /// Make `kernel` the tracked kernel. The previous kernel's status
    /// subscription is released first.
    fn attach(self: &Rc<Self>, kernel: Option<KernelRef>) {
        let previous = self.status_subscription.borrow_mut().take();
        drop(previous);

        *self.current_kernel.borrow_mut() = kernel.clone();

        let Some(kernel) = kernel else {
            *self.last_status.borrow_mut() = None;
            *self.view.borrow_mut() = IndicatorView::no_kernel();
            return;
        };

        self.render(kernel.status());

        let weak: Weak<IndicatorState> = Rc::downgrade(self);
        let subscription = kernel.status_changed().connect(move |status: &KernelStatus| {
            if let Some(state) = weak.upgrade() {
                state.render(*status);
            }
        });
        *self.status_subscription.borrow_mut() = Some(subscription);
    }

    fn render(&self, status: KernelStatus) {
        debug!("[kernel-status] {}", status);
        *self.last_status.borrow_mut() = Some(status);
        *self.view.borrow_mut() = IndicatorView::for_status(status);
    }
}

/// Toolbar item showing the current kernel's status.
pub struct KernelStatusIndicator {
    state: Rc<IndicatorState>,
    _kernel_changed: Subscription,
}

impl KernelStatusIndicator {
    pub fn new(panel: &NotebookPanel) -> Self {
        let context = panel.context();
        let state = Rc::new(IndicatorState {
            view: RefCell::new(IndicatorView::no_kernel()),
            current_kernel: RefCell::new(None),
            last_status: RefCell::new(None),
            status_subscription: RefCell::new(None),
        });

        state.attach(context.kernel());

        // Attach the slot's current value, not the payload; the slot may have
        // been reassigned again inside this notification.
        let weak = Rc::downgrade(&state);
        let weak_context = panel.context_weak();
        let kernel_changed = context.kernel_changed().connect(move |_: &KernelChange| {
            let (Some(state), Some(context)) = (weak.upgrade(), weak_context.upgrade()) else {
                return;
            };
            debug!("[kernel-status] kernel replaced");
            state.attach(context.kernel());
        });

        Self {
            state,
            _kernel_changed: kernel_changed,
        }
    }

    pub fn view(&self) -> IndicatorView {
        self.state.view.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.view.borrow().busy
    }

    pub fn tooltip(&self) -> &'static str {
        self.state.view.borrow().tooltip
    }

    /// Status last rendered, `None` while no kernel is attached.
    pub fn last_status(&self) -> Option<KernelStatus> {
        *self.state.last_status.borrow()
    }

    pub fn current_kernel(&self) -> Option<KernelRef> {
        self.state.current_kernel.borrow().clone()
    }
}
