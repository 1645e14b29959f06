//! Dirty-state render scheduling.
//!
//! One ledger, keyed by component, replaces per-component dirty booleans.
//! Store notifications are buffered in an inbox between ticks; a tick folds
//! them into the ledger through a static dependency table and then recomputes
//! every flagged component exactly once, however many notifications named it.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use pixeloid_core::{ObservableStore, StatePath, ViewportError};
use serde::{Deserialize, Serialize};

use crate::render_data::BackendError;

/// Units of recomputation. Ordering is recompute order within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentId {
    InputRouting,
    SamplingWindow,
    CameraViewport,
    RenderConsumer,
}

impl ComponentId {
    pub fn name(&self) -> &'static str {
        match self {
            ComponentId::InputRouting => "input routing",
            ComponentId::SamplingWindow => "sampling window",
            ComponentId::CameraViewport => "camera viewport",
            ComponentId::RenderConsumer => "render consumer",
        }
    }
}

/// Which components a change to `path` invalidates.
pub fn affected_components(path: StatePath) -> &'static [ComponentId] {
    use ComponentId::*;
    match path {
        StatePath::Offset => &[SamplingWindow, CameraViewport, RenderConsumer],
        StatePath::SamplingOffset => &[SamplingWindow, CameraViewport, RenderConsumer],
        StatePath::ZoomLevel => &[CameraViewport, InputRouting],
        StatePath::Objects => &[RenderConsumer],
        StatePath::ViewportSize => &[SamplingWindow, CameraViewport, RenderConsumer],
    }
}

/// The set of components that still need a recompute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyLedger {
    flagged: BTreeSet<ComponentId>,
}

impl DirtyLedger {
    pub fn mark(&mut self, path: StatePath) {
        self.flagged.extend(affected_components(path).iter().copied());
    }

    pub fn mark_component(&mut self, component: ComponentId) {
        self.flagged.insert(component);
    }

    pub fn is_dirty(&self, component: ComponentId) -> bool {
        self.flagged.contains(&component)
    }

    pub fn is_clean(&self) -> bool {
        self.flagged.is_empty()
    }

    pub fn flagged(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.flagged.iter().copied()
    }

    fn clear(&mut self, done: &[ComponentId]) {
        for component in done {
            self.flagged.remove(component);
        }
    }
}

/// What a tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub frame: u64,
    /// Notifications drained from the store since the previous tick.
    pub notifications: usize,
    /// Components recomputed successfully, in order.
    pub recomputed: Vec<ComponentId>,
    /// Components left dirty for retry.
    pub failed: Vec<(ComponentId, ViewportError)>,
}

impl TickReport {
    pub fn is_idle(&self) -> bool {
        self.recomputed.is_empty() && self.failed.is_empty()
    }
}

#[derive(Debug)]
pub struct RenderScheduler {
    inbox: Rc<RefCell<Vec<StatePath>>>,
    ledger: DirtyLedger,
    frame: u64,
}

impl RenderScheduler {
    /// Subscribe to every state path of `store`.
    pub fn attach(store: &impl ObservableStore) -> Self {
        let inbox = Rc::new(RefCell::new(Vec::new()));
        for path in StatePath::ALL {
            let sink = Rc::clone(&inbox);
            store.subscribe(path, Box::new(move |p| sink.borrow_mut().push(p)));
        }
        Self {
            inbox,
            ledger: DirtyLedger::default(),
            frame: 0,
        }
    }

    pub fn ledger(&self) -> &DirtyLedger {
        &self.ledger
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Flag a component directly, e.g. for the first full frame.
    pub fn invalidate(&mut self, component: ComponentId) {
        self.ledger.mark_component(component);
    }

    pub fn has_work(&self) -> bool {
        !self.inbox.borrow().is_empty() || !self.ledger.is_clean()
    }

    /// Fold buffered notifications into the ledger.
    pub fn drain(&mut self) -> usize {
        let pending = std::mem::take(&mut *self.inbox.borrow_mut());
        for path in &pending {
            self.ledger.mark(*path);
        }
        if !pending.is_empty() {
            log::debug!("Drained {} notifications: {:?}", pending.len(), pending);
        }
        pending.len()
    }

    /// Run one frame: drain, recompute each flagged component once, then
    /// clear the ones that succeeded. Failures stay flagged for next frame.
    pub fn tick<F>(&mut self, mut recompute: F) -> TickReport
    where
        F: FnMut(ComponentId) -> Result<(), BackendError>,
    {
        self.frame += 1;
        let notifications = self.drain();
        let flagged: Vec<ComponentId> = self.ledger.flagged().collect();

        let mut report = TickReport {
            frame: self.frame,
            notifications,
            ..Default::default()
        };
        for component in flagged {
            match recompute(component) {
                Ok(()) => report.recomputed.push(component),
                Err(err) => {
                    let failure = ViewportError::RecomputeFailure {
                        component: component.name(),
                        reason: err.to_string(),
                    };
                    log::warn!("Frame {}: {failure}", self.frame);
                    report.failed.push((component, failure));
                }
            }
        }
        self.ledger.clear(&report.recomputed);

        if !report.is_idle() {
            log::debug!(
                "Frame {}: recomputed {:?}, {} left dirty",
                self.frame,
                report.recomputed,
                report.failed.len()
            );
        }
        report
    }
}
