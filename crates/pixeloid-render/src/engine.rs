use std::collections::VecDeque;
use std::rc::Rc;

use pixeloid_core::{
    PixeloidCoordinate, SpatialIndex, VertexCoordinate, ViewState, ViewStore, ViewportSize,
    ZoomLevel,
};

use crate::config::ViewportConfig;
use crate::events::InputEvent;
use crate::render_data::{
    BackendError, MirrorPass, MirrorSource, ObjectPass, RenderBackend, SamplingPass,
    ViewportReadModel,
};
use crate::routing::{InputRouter, ZoomOutcome};
use crate::sampling::SamplingWindowController;
use crate::scheduler::{ComponentId, RenderScheduler, TickReport};

/// The dual-layer viewport core.
///
/// Input is queued by [`handle_input`] and only takes effect on the next
/// [`tick`], so any number of pan events between two frames collapse into a
/// single offset commit and a single recompute per affected component.
///
/// [`handle_input`]: ViewportEngine::handle_input
/// [`tick`]: ViewportEngine::tick
pub struct ViewportEngine {
    config: ViewportConfig,
    store: Rc<ViewStore>,
    router: InputRouter,
    scheduler: RenderScheduler,
    index: SpatialIndex,
    input: VecDeque<InputEvent>,
}

impl ViewportEngine {
    pub fn new(config: ViewportConfig) -> Self {
        let store = Rc::new(ViewStore::new(ViewState {
            offset: config.initial_offset(),
            sampling_offset: config.initial_offset(),
            zoom_level: ZoomLevel::BASE,
            viewport: config.viewport(),
            objects: Default::default(),
        }));
        let sampling = SamplingWindowController::new(config.viewport(), config.initial_offset());
        let router = InputRouter::new(sampling, config.max_zoom());

        let mut scheduler = RenderScheduler::attach(store.as_ref());
        for component in [
            ComponentId::InputRouting,
            ComponentId::SamplingWindow,
            ComponentId::CameraViewport,
            ComponentId::RenderConsumer,
        ] {
            scheduler.invalidate(component);
        }

        log::info!(
            "Viewport engine ready: {}x{}, max zoom {}",
            config.viewport_width,
            config.viewport_height,
            router.max_zoom().get()
        );
        Self {
            config,
            store,
            router,
            scheduler,
            index: SpatialIndex::new(),
            input: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Shared handle to the observable store, for object edits and readers.
    pub fn store(&self) -> Rc<ViewStore> {
        Rc::clone(&self.store)
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    pub fn handle_input(&mut self, event: impl Into<InputEvent>) {
        self.input.push_back(event.into());
    }

    /// Jump straight to a zoom level, stepping one level at a time about
    /// `cursor`. Queued input is applied first so ordering is preserved.
    pub fn request_zoom_level(&mut self, level: i64, cursor: VertexCoordinate) -> ZoomOutcome {
        self.flush_input();
        let outcome = self.router.request_zoom_level(level, cursor);
        self.publish();
        outcome
    }

    /// Back to zoom level 1 with the sampling window at its initial offset.
    pub fn reset_view(&mut self) {
        self.input.clear();
        self.router.reset(self.config.initial_offset());
        self.publish();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.flush_input();
        let viewport = ViewportSize::new(width, height);
        self.router.resize(viewport);
        self.store.set_viewport(viewport);
    }

    pub fn pixeloid_at(&self, display: VertexCoordinate) -> PixeloidCoordinate {
        self.router.pixeloid_at(display)
    }

    pub fn read_model(&self) -> ViewportReadModel {
        ViewportReadModel {
            offset: self.router.active_offset(),
            world_offset: self.router.world_offset(),
            zoom_level: self.router.zoom_level(),
            routing: self.router.state(),
            sampling_window: self.router.sampling().window(),
            camera_viewport: self.router.camera_viewport(),
            mirror_rect: self.router.mirror_rect(),
            visibility: self.router.visibility(),
        }
    }

    /// Run one frame against `backend`.
    pub fn tick<B: RenderBackend>(&mut self, backend: &mut B) -> TickReport {
        self.flush_input();

        let Self {
            store,
            router,
            scheduler,
            index,
            ..
        } = self;
        scheduler.tick(|component| recompute(component, router, store, index, backend))
    }

    fn flush_input(&mut self) {
        if self.input.is_empty() && !self.router.has_pending_pan() {
            return;
        }
        while let Some(event) = self.input.pop_front() {
            match event {
                InputEvent::Pan(pan) => {
                    let target = self.router.route_pan(pan);
                    log::trace!("Pan ({}, {}) -> {}", pan.dx, pan.dy, target.name());
                }
                InputEvent::Zoom(zoom) => {
                    self.router.apply_zoom(zoom);
                }
            }
        }
        self.router.commit_pending();
        self.publish();
    }

    /// Mirror the router's committed state into the store. Unchanged values
    /// produce no notification.
    ///
    /// The sampling offset is published on its own path: the active offset
    /// alone can read the same across a controller handover while the
    /// sampling window has moved.
    fn publish(&self) {
        self.store.set_zoom_level(self.router.zoom_level());
        self.store.set_sampling_offset(self.router.sampling().offset());
        self.store.set_offset(self.router.active_offset());
    }
}

fn recompute<B: RenderBackend>(
    component: ComponentId,
    router: &InputRouter,
    store: &ViewStore,
    index: &mut SpatialIndex,
    backend: &mut B,
) -> Result<(), BackendError> {
    match component {
        ComponentId::InputRouting => backend.present_visibility(router.visibility()),
        ComponentId::SamplingWindow => backend.present_sampling(&SamplingPass {
            window: router.sampling().window(),
            scale: SamplingWindowController::SCALE,
            origin: PixeloidCoordinate::ORIGIN,
        }),
        ComponentId::CameraViewport => backend.present_mirror(&MirrorPass {
            source_rect: router.mirror_rect(),
            scale: router.zoom_level().get(),
            source: MirrorSource::SamplingLayer,
        }),
        ComponentId::RenderConsumer => {
            let window = router.sampling().window();
            let objects = {
                let collection = store.objects();
                if index.refresh(&collection) {
                    log::debug!("Spatial index rebuilt for {} objects", index.len());
                }
                index.cull(&window.to_bbox())
            };
            backend.present_objects(&ObjectPass { window, objects })
        }
    }
}
