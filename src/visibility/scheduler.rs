use std::collections::BTreeMap;

use super::watch::{ObservationHandle, VisibilityCallback, Watch, WatchMode};
use crate::dom::{Document, Element, ElementId, Rect};

/// All watches of one mode, keyed by target.
struct WatchPool {
    mode: WatchMode,
    watches: BTreeMap<ElementId, Watch>,
}

impl WatchPool {
    fn new(mode: WatchMode) -> Self {
        WatchPool {
            mode,
            watches: BTreeMap::new(),
        }
    }

    fn deliver(&mut self, document: &mut Document, root: &Rect) -> usize {
        let mut fired = 0;
        let targets: Vec<ElementId> = self.watches.keys().copied().collect();

        for target in targets {
            let Some(element) = document.get_mut(target) else {
                log::debug!("{} left the document, dropping its {:?} watch", target, self.mode);
                self.watches.remove(&target);
                continue;
            };
            let Some(watch) = self.watches.get_mut(&target) else {
                continue;
            };

            let visible = element.bounds().is_visible_in(root);
            if !visible {
                watch.intersecting = false;
                continue;
            }
            if watch.intersecting {
                continue;
            }

            watch.intersecting = true;
            (watch.callback)(element);
            fired += 1;

            if self.mode == WatchMode::OneShot {
                self.watches.remove(&target);
            }
        }

        fired
    }
}

/// Viewport-intersection observer with one keyed pool per watch mode.
///
/// A target has at most one live watch across both pools. Watches fire on the
/// transition from hidden to visible; a target that stays in view does not fire
/// again. One-shot watches are removed as soon as they fire.
pub struct VisibilityScheduler {
    one_shot: WatchPool,
    repeating: WatchPool,
}

impl Default for VisibilityScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityScheduler {
    pub fn new() -> Self {
        VisibilityScheduler {
            one_shot: WatchPool::new(WatchMode::OneShot),
            repeating: WatchPool::new(WatchMode::Repeating),
        }
    }

    fn pool_mut(&mut self, mode: WatchMode) -> &mut WatchPool {
        match mode {
            WatchMode::OneShot => &mut self.one_shot,
            WatchMode::Repeating => &mut self.repeating,
        }
    }

    /// Mode of the live watch on `target`, if any.
    pub fn mode_of(&self, target: ElementId) -> Option<WatchMode> {
        if self.one_shot.watches.contains_key(&target) {
            Some(WatchMode::OneShot)
        } else if self.repeating.watches.contains_key(&target) {
            Some(WatchMode::Repeating)
        } else {
            None
        }
    }

    /// Begin watching `target`.
    ///
    /// If `target` already has a watch, that watch is kept and its handle returned;
    /// `callback` is dropped.
    pub fn attach<F>(&mut self, target: ElementId, mode: WatchMode, callback: F) -> ObservationHandle
    where
        F: FnMut(&mut Element) + Send + 'static,
    {
        if let Some(existing) = self.mode_of(target) {
            log::debug!("{} is already watched ({:?}), keeping existing watch", target, existing);
            return ObservationHandle::new(target, existing);
        }

        let callback: VisibilityCallback = Box::new(callback);
        self.pool_mut(mode).watches.insert(target, Watch::new(callback));
        ObservationHandle::new(target, mode)
    }

    /// Stop watching `target`. Returns false if it was not watched.
    pub fn detach(&mut self, target: ElementId) -> bool {
        self.one_shot.watches.remove(&target).is_some()
            || self.repeating.watches.remove(&target).is_some()
    }

    pub fn detach_all(&mut self) {
        self.one_shot.watches.clear();
        self.repeating.watches.clear();
    }

    pub fn is_attached(&self, target: ElementId) -> bool {
        self.mode_of(target).is_some()
    }

    pub fn attached_count(&self, mode: WatchMode) -> usize {
        match mode {
            WatchMode::OneShot => self.one_shot.watches.len(),
            WatchMode::Repeating => self.repeating.watches.len(),
        }
    }

    /// Run one intersection pass against `root` and fire the callbacks that qualify.
    ///
    /// Returns how many callbacks fired.
    pub fn deliver(&mut self, document: &mut Document, root: Rect) -> usize {
        self.repeating.deliver(document, &root) + self.one_shot.deliver(document, &root)
    }
}
