use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::coords::Offset;
use crate::geometry::ViewportSize;
use crate::scene::ObjectCollection;
use crate::zoom::ZoomLevel;

/// An observable slice of view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatePath {
    /// Offset of whichever controller owns pan input.
    Offset,
    /// Offset of the sampling window, whether or not it is active.
    SamplingOffset,
    ZoomLevel,
    Objects,
    ViewportSize,
}

impl StatePath {
    pub const ALL: [StatePath; 5] = [
        StatePath::Offset,
        StatePath::SamplingOffset,
        StatePath::ZoomLevel,
        StatePath::Objects,
        StatePath::ViewportSize,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type ChangeCallback = Box<dyn FnMut(StatePath)>;

/// Anything that can announce state changes by path.
///
/// Delivery is at-least-once per logical change; ordering across different
/// paths is not guaranteed.
pub trait ObservableStore {
    fn subscribe(&self, path: StatePath, callback: ChangeCallback) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Plain view state held by the store.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Committed offset of the active controller.
    pub offset: Offset,
    pub sampling_offset: Offset,
    pub zoom_level: ZoomLevel,
    pub viewport: ViewportSize,
    pub objects: ObjectCollection,
}

struct Subscriber {
    id: u64,
    path: StatePath,
    callback: ChangeCallback,
}

/// Single-threaded observable store for view state.
///
/// Writes are idempotent: storing a value equal to the current one emits
/// nothing. Notifications go through a FIFO queue, so a callback that writes
/// back into the store is delivered by the dispatch loop already running
/// instead of recursing.
#[derive(Default)]
pub struct ViewStore {
    state: RefCell<ViewState>,
    subscribers: RefCell<Vec<Subscriber>>,
    incoming: RefCell<Vec<Subscriber>>,
    removed: RefCell<Vec<u64>>,
    queue: RefCell<VecDeque<StatePath>>,
    next_id: Cell<u64>,
}

impl ViewStore {
    pub fn new(state: ViewState) -> Self {
        Self {
            state: RefCell::new(state),
            ..Default::default()
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn offset(&self) -> Offset {
        self.state.borrow().offset
    }

    pub fn sampling_offset(&self) -> Offset {
        self.state.borrow().sampling_offset
    }

    pub fn zoom_level(&self) -> ZoomLevel {
        self.state.borrow().zoom_level
    }

    pub fn viewport(&self) -> ViewportSize {
        self.state.borrow().viewport
    }

    pub fn objects(&self) -> Ref<'_, ObjectCollection> {
        Ref::map(self.state.borrow(), |s| &s.objects)
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    // ── Writes ───────────────────────────────────────────────────────

    pub fn set_offset(&self, offset: Offset) -> bool {
        self.write(StatePath::Offset, |s| &mut s.offset, offset)
    }

    pub fn set_sampling_offset(&self, offset: Offset) -> bool {
        self.write(StatePath::SamplingOffset, |s| &mut s.sampling_offset, offset)
    }

    pub fn set_zoom_level(&self, zoom_level: ZoomLevel) -> bool {
        self.write(StatePath::ZoomLevel, |s| &mut s.zoom_level, zoom_level)
    }

    pub fn set_viewport(&self, viewport: ViewportSize) -> bool {
        self.write(StatePath::ViewportSize, |s| &mut s.viewport, viewport)
    }

    /// Edit the object collection. Notifies only if the edit changed it.
    ///
    /// The collection is moved out of the store while `edit` runs, so the
    /// closure may read other state freely. Reads of `objects()` from inside
    /// the edit see an empty collection, and a nested `update_objects` is
    /// overwritten when the outer edit completes.
    pub fn update_objects<R>(&self, edit: impl FnOnce(&mut ObjectCollection) -> R) -> R {
        let mut objects = std::mem::take(&mut self.state.borrow_mut().objects);
        let before = objects.revision();
        let result = edit(&mut objects);
        let changed = objects.revision() != before;
        self.state.borrow_mut().objects = objects;
        if changed {
            self.notify(StatePath::Objects);
        }
        result
    }

    /// Re-announce `path` without changing anything.
    pub fn touch(&self, path: StatePath) {
        self.notify(path);
    }

    fn write<T: PartialEq>(
        &self,
        path: StatePath,
        field: impl FnOnce(&mut ViewState) -> &mut T,
        value: T,
    ) -> bool {
        let changed = {
            let mut state = self.state.borrow_mut();
            let slot = field(&mut state);
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        };
        if changed {
            self.notify(path);
        }
        changed
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    fn notify(&self, path: StatePath) {
        self.queue.borrow_mut().push_back(path);
        self.flush();
    }

    fn flush(&self) {
        let Ok(mut subscribers) = self.subscribers.try_borrow_mut() else {
            // Re-entered from a callback; the running loop drains the queue.
            return;
        };
        loop {
            self.merge_pending(&mut subscribers);
            let next = self.queue.borrow_mut().pop_front();
            let Some(path) = next else {
                break;
            };
            for sub in subscribers.iter_mut().filter(|s| s.path == path) {
                (sub.callback)(path);
            }
        }
        self.merge_pending(&mut subscribers);
    }

    fn merge_pending(&self, subscribers: &mut Vec<Subscriber>) {
        subscribers.append(&mut self.incoming.borrow_mut());
        let removed = std::mem::take(&mut *self.removed.borrow_mut());
        if !removed.is_empty() {
            subscribers.retain(|s| !removed.contains(&s.id));
        }
    }
}

impl ObservableStore for ViewStore {
    fn subscribe(&self, path: StatePath, callback: ChangeCallback) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.incoming.borrow_mut().push(Subscriber { id, path, callback });
        if let Ok(mut subscribers) = self.subscribers.try_borrow_mut() {
            self.merge_pending(&mut subscribers);
        }
        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.removed.borrow_mut().push(id.0);
        self.incoming.borrow_mut().retain(|s| s.id != id.0);
        if let Ok(mut subscribers) = self.subscribers.try_borrow_mut() {
            self.merge_pending(&mut subscribers);
        }
    }
}

impl std::fmt::Debug for ViewStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.try_borrow().map(|s| s.len()).ok())
            .field("queued", &self.queue.borrow().len())
            .finish()
    }
}
