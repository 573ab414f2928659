use serde::{Deserialize, Serialize};

use crate::dom::{Element, ElementId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WatchMode {
    /// Fire once, then detach. Used for lazy images.
    OneShot,
    /// Fire on every hidden-to-visible transition. Used for the scroll sentinel.
    Repeating,
}

/// Runs on the delivering thread with the target element. Must not block.
pub type VisibilityCallback = Box<dyn FnMut(&mut Element) + Send>;

/// The active watch on one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObservationHandle {
    target: ElementId,
    mode: WatchMode,
}

impl ObservationHandle {
    pub(crate) fn new(target: ElementId, mode: WatchMode) -> Self {
        ObservationHandle { target, mode }
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn mode(&self) -> WatchMode {
        self.mode
    }
}

pub(crate) struct Watch {
    pub(crate) callback: VisibilityCallback,
    /// Visibility seen on the previous pass; fires happen on the rising edge only.
    pub(crate) intersecting: bool,
}

impl Watch {
    pub(crate) fn new(callback: VisibilityCallback) -> Self {
        Watch {
            callback,
            intersecting: false,
        }
    }
}
