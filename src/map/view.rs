//! Mounted map view
//!
//! A [`MapView`] holds one engine instance for as long as it is mounted. The
//! engine is released when the view is dropped. Each update throws away the
//! previous markers and path before drawing the new scene.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use super::{MapRenderer, MapScene};
use crate::models::Waypoint;

/// Counts live engine instances across all views
#[derive(Debug, Clone, Default)]
pub struct EngineTracker {
    live: Arc<AtomicUsize>,
}

impl EngineTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn acquire(&self) -> EngineHandle {
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Map engine acquired ({} live)", live);
        EngineHandle {
            live: Arc::clone(&self.live),
        }
    }
}

/// One engine instance; released on drop
#[derive(Debug)]
pub struct EngineHandle {
    live: Arc<AtomicUsize>,
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        let live = self.live.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!("Map engine released ({} live)", live);
    }
}

pub struct MapView {
    renderer: Arc<dyn MapRenderer>,
    _engine: EngineHandle,
    scene: MapScene,
}

impl MapView {
    pub fn mount(renderer: Arc<dyn MapRenderer>, tracker: &EngineTracker) -> Self {
        let scene = MapScene::blank(renderer.provider());
        Self {
            _engine: tracker.acquire(),
            renderer,
            scene,
        }
    }

    /// Clear the map, then draw the route from scratch
    pub async fn update(
        &mut self,
        origin: &str,
        destination: &str,
        waypoints: &[Waypoint],
    ) -> &MapScene {
        self.clear();
        self.scene = self.renderer.render(origin, destination, waypoints).await;
        &self.scene
    }

    pub fn clear(&mut self) {
        self.scene = MapScene::blank(self.renderer.provider());
    }

    #[must_use]
    pub fn scene(&self) -> &MapScene {
        &self.scene
    }
}
