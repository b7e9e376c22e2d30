//! Page-level state and the actions that change it
//!
//! [`Orchestrator`] is the only writer of [`AppState`]. Each action replaces
//! the affected slots wholesale and queues notices for the user. The state
//! lock is only held to read or apply changes; weather lookups, the complaint
//! delay and map rendering run without it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::complaint::{ComplaintDraft, ComplaintService};
use crate::config::SafePathConfig;
use crate::forms::DestinationQuery;
use crate::map::{EngineTracker, MapRenderer, MapScene, MapView, renderer_for};
use crate::models::{Complaint, Language, Notice, RouteInfo, WeatherReading};
use crate::route::RouteSimulator;
use crate::weather::{OpenWeatherClient, WeatherOutcome, WeatherSource};
use crate::Result;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub current_route: Option<RouteInfo>,
    /// Readings in the order their lookups were issued
    pub weather: Vec<WeatherReading>,
    /// True while the lookups of the latest search are in flight
    pub weather_loading: bool,
    pub language: Language,
    /// Notices not yet shown to the user
    pub notices: Vec<Notice>,
}

impl AppState {
    fn notify(&mut self, notice: Notice) {
        debug!("Notice: {}", notice.title);
        self.notices.push(notice);
    }
}

pub struct Orchestrator {
    state: Mutex<AppState>,
    /// Bumped by every search; results of an older search are dropped
    searches: AtomicU64,
    origin_city: String,
    routes: RouteSimulator,
    weather: Arc<dyn WeatherSource>,
    complaints: ComplaintService,
    renderer: Arc<dyn MapRenderer>,
    engines: EngineTracker,
    view: Mutex<Option<MapView>>,
}

impl Orchestrator {
    pub fn new(
        config: &SafePathConfig,
        weather: Arc<dyn WeatherSource>,
        renderer: Arc<dyn MapRenderer>,
    ) -> Self {
        Self {
            state: Mutex::new(AppState::default()),
            searches: AtomicU64::new(0),
            origin_city: config.route.origin_city.clone(),
            routes: RouteSimulator::new(),
            weather,
            complaints: ComplaintService::from_config(config),
            renderer,
            engines: EngineTracker::new(),
            view: Mutex::new(None),
        }
    }

    /// Wire up the OpenWeatherMap client and the configured map renderer
    pub fn from_config(config: &SafePathConfig) -> anyhow::Result<Self> {
        let weather = Arc::new(OpenWeatherClient::new(config)?);
        let renderer = renderer_for(config)?;
        Ok(Self::new(config, weather, renderer))
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> AppState {
        self.state.lock().await.clone()
    }

    #[must_use]
    pub fn engines(&self) -> &EngineTracker {
        &self.engines
    }

    /// Plan a route and look up weather at both ends of the trip.
    ///
    /// The route is set before any weather call is made. Both lookups run
    /// concurrently and the weather list is replaced only once both have
    /// settled, keeping whichever succeeded. If another search started in
    /// the meantime, these results are discarded.
    #[instrument(skip(self, query), fields(destination = %query.destination))]
    pub async fn search_destination(&self, query: &DestinationQuery) -> Result<AppState> {
        let destination = query.validate()?.to_string();
        let route = self.routes.plan(&destination);

        let generation = {
            let mut state = self.state.lock().await;
            let generation = self.searches.fetch_add(1, Ordering::SeqCst) + 1;
            state.notify(Notice::info(
                "Route Planned",
                format!("Route to {destination} has been calculated"),
            ));
            state.current_route = Some(route);
            state.weather_loading = true;
            generation
        };
        // Dropping the view releases its engine
        self.view.lock().await.take();

        let (origin, target) = tokio::join!(
            self.weather.current(&self.origin_city),
            self.weather.current(&destination)
        );

        let mut state = self.state.lock().await;
        if self.searches.load(Ordering::SeqCst) != generation {
            debug!("Discarding weather for superseded search to {}", destination);
            return Ok(state.clone());
        }

        let mut readings = Vec::with_capacity(2);
        for outcome in [origin, target] {
            let WeatherOutcome { reading, notice } = outcome;
            readings.extend(reading);
            if let Some(notice) = notice {
                state.notify(notice);
            }
        }
        info!("Weather lookups returned {} reading(s)", readings.len());
        state.weather = readings;
        state.weather_loading = false;

        Ok(state.clone())
    }

    /// Single lookup, outside of a search
    pub async fn lookup_weather(&self, location: &str) -> Option<WeatherReading> {
        let WeatherOutcome { reading, notice } = self.weather.current(location).await;
        if let Some(notice) = notice {
            self.state.lock().await.notify(notice);
        }
        reading
    }

    pub async fn toggle_language(&self) -> Language {
        let mut state = self.state.lock().await;
        state.language = state.language.toggled();
        debug!("Language switched to {}", state.language.code());
        state.language
    }

    pub async fn submit_complaint(&self, draft: &ComplaintDraft) -> Result<Complaint> {
        let complaint = self.complaints.submit(draft).await?;
        self.state.lock().await.notify(Notice::info(
            "Complaint Registered",
            "Your civic complaint has been submitted to local authorities",
        ));
        Ok(complaint)
    }

    pub async fn start_navigation(&self) {
        self.state.lock().await.notify(Notice::info(
            "Navigation Started",
            "GPS navigation has been initiated",
        ));
    }

    /// Draw the current route. Without a route the map is blank.
    pub async fn render_map(&self) -> MapScene {
        let route = self.state.lock().await.current_route.clone();
        let Some(route) = route else {
            return MapScene::blank(self.renderer.provider());
        };

        let mut mounted = self.view.lock().await;
        let view = mounted
            .get_or_insert_with(|| MapView::mount(Arc::clone(&self.renderer), &self.engines));
        view.update(&route.origin, &route.destination, &route.waypoints)
            .await
            .clone()
    }

    pub async fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.lock().await.notices)
    }
}
