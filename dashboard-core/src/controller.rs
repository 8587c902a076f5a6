//! View-state machine for city lookups.
//!
//! `Idle -> Loading -> Loaded | Error`, re-entered on every submit. Each
//! lookup takes a request number; only the most recently issued request may
//! change the state once its response lands.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    DashboardError,
    aggregate::{Aggregate, build_snapshot},
    backend::WeatherBackend,
    model::{Suggestion, WeatherSnapshot, compose_label},
    series::{ChartKind, ChartProjection, DerivedSeries, Summary},
};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading,
    Loaded(WeatherSnapshot),
    Error(String),
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Loading => "loading",
            ViewState::Loaded(_) => "loaded",
            ViewState::Error(_) => "error",
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: ViewState,
    latest_request: u64,
}

#[derive(Debug)]
pub struct WeatherSearchController {
    backend: Arc<dyn WeatherBackend>,
    inner: Mutex<Inner>,
}

impl WeatherSearchController {
    pub fn new(backend: Arc<dyn WeatherBackend>) -> Self {
        Self { backend, inner: Mutex::new(Inner { state: ViewState::Idle, latest_request: 0 }) }
    }

    /// Look up `city_text` as typed.
    ///
    /// Blank input is rejected with [`DashboardError::Validation`] and leaves
    /// the state untouched. Lookup failures are not returned; they become
    /// [`ViewState::Error`].
    pub async fn submit(&self, city_text: &str) -> Result<(), DashboardError> {
        if city_text.trim().is_empty() {
            return Err(DashboardError::Validation);
        }

        self.lookup(city_text, None).await;
        Ok(())
    }

    /// Look up a chosen suggestion by name and label the result with its
    /// region and country.
    pub async fn select_suggestion(&self, suggestion: &Suggestion) -> Result<(), DashboardError> {
        if suggestion.name.trim().is_empty() {
            return Err(DashboardError::Validation);
        }

        self.lookup(&suggestion.name, Some(suggestion)).await;
        Ok(())
    }

    async fn lookup(&self, city: &str, selected: Option<&Suggestion>) {
        let request = {
            let mut inner = self.inner.lock();
            inner.latest_request += 1;
            inner.state = ViewState::Loading;
            inner.latest_request
        };

        debug!(city = %city, request, "Looking up weather");

        let outcome = self
            .backend
            .weather(city)
            .await
            .and_then(|payload| build_snapshot(&payload))
            .map(|mut snapshot| {
                if let Some(s) = selected {
                    snapshot.city_label = compose_label([
                        snapshot.city_label.as_str(),
                        s.region.as_deref().unwrap_or_default(),
                        s.country.as_deref().unwrap_or_default(),
                    ]);
                }
                snapshot
            });

        let mut inner = self.inner.lock();
        if inner.latest_request != request {
            debug!(city = %city, request, latest = inner.latest_request, "Discarding stale weather response");
            return;
        }

        inner.state = match outcome {
            Ok(snapshot) => {
                info!(city = %snapshot.city_label, days = snapshot.forecast_days.len(), "Weather loaded");
                ViewState::Loaded(snapshot)
            }
            Err(e) => {
                warn!(city = %city, error = %e, "Weather lookup failed");
                ViewState::Error(e.user_message())
            }
        };
    }

    pub fn state(&self) -> ViewState {
        self.inner.lock().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.inner.lock().state, ViewState::Loading)
    }

    /// Present only in the loaded state.
    pub fn snapshot(&self) -> Option<WeatherSnapshot> {
        match &self.inner.lock().state {
            ViewState::Loaded(snapshot) => Some(snapshot.clone()),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        match &self.inner.lock().state {
            ViewState::Error(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Snapshot together with its series and averages, derived on each call.
    pub fn aggregate(&self) -> Option<Aggregate> {
        self.snapshot().map(Aggregate::from_snapshot)
    }

    pub fn series(&self) -> Option<DerivedSeries> {
        self.snapshot().as_ref().map(DerivedSeries::from_snapshot)
    }

    pub fn summary(&self) -> Option<Summary> {
        self.snapshot().map(|s| Summary::from_days(&s.forecast_days))
    }

    pub fn chart(&self, kind: ChartKind) -> Option<ChartProjection> {
        self.series().map(|series| series.chart(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CITY_NOT_FOUND_MESSAGE, FETCH_FAILED_MESSAGE};
    use crate::testing::{StubBackend, payload};
    use std::time::Duration;

    fn berlin() -> crate::model::WeatherPayload {
        payload("Berlin", &[(10.0, 4.0, 15.0, 0), (8.0, 3.0, 20.0, 61), (6.0, 1.0, 10.0, 61)])
    }

    #[tokio::test]
    async fn starts_idle() {
        let controller = WeatherSearchController::new(Arc::new(StubBackend::default()));

        assert_eq!(controller.state(), ViewState::Idle);
        assert!(controller.snapshot().is_none());
        assert!(controller.chart(ChartKind::Temperature).is_none());
    }

    #[tokio::test]
    async fn blank_submit_is_rejected_without_fetch() {
        let backend = Arc::new(StubBackend::default());
        let controller = WeatherSearchController::new(backend.clone());

        assert_eq!(controller.submit("   ").await, Err(DashboardError::Validation));
        assert_eq!(controller.submit("").await, Err(DashboardError::Validation));
        assert_eq!(controller.state(), ViewState::Idle);
        assert!(backend.weather_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn submit_goes_through_loading_to_loaded() {
        let backend = Arc::new(StubBackend::default().with_weather("Berlin", 100, Ok(berlin())));
        let controller = Arc::new(WeatherSearchController::new(backend));

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("Berlin").await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(controller.state(), ViewState::Loading);
        assert!(controller.is_loading());

        task.await.expect("task completes").expect("valid input");

        let series = controller.series().expect("loaded");
        assert_eq!(series.len(), 3);
        let avgs: Vec<_> = series.points.iter().map(|p| p.avg_temp).collect();
        assert_eq!(avgs, [7, 6, 4]);
        assert_eq!(series.histogram.values().sum::<usize>(), 3);
        assert_eq!(controller.snapshot().map(|s| s.city_label), Some("Berlin".to_string()));
        assert!(controller.error_message().is_none());
    }

    #[tokio::test]
    async fn not_found_uses_server_message_and_clears_snapshot() {
        let backend = Arc::new(
            StubBackend::default()
                .with_weather("Berlin", 0, Ok(berlin()))
                .with_weather("Qwzxy", 0, Err(DashboardError::NotFound(Some("not found".into())))),
        );
        let controller = WeatherSearchController::new(backend);

        controller.submit("Berlin").await.expect("valid input");
        assert!(controller.snapshot().is_some());

        controller.submit("Qwzxy").await.expect("valid input");
        assert_eq!(controller.state(), ViewState::Error("not found".into()));
        assert!(controller.snapshot().is_none());
        assert!(controller.series().is_none());
    }

    #[tokio::test]
    async fn not_found_without_message_is_generic() {
        let controller = WeatherSearchController::new(Arc::new(StubBackend::default()));

        controller.submit("Atlantis").await.expect("valid input");
        assert_eq!(controller.error_message().as_deref(), Some(CITY_NOT_FOUND_MESSAGE));
    }

    #[tokio::test]
    async fn transport_failure_is_generic() {
        let backend = Arc::new(StubBackend::default().with_weather(
            "Berlin",
            0,
            Err(DashboardError::Transport("connection refused".into())),
        ));
        let controller = WeatherSearchController::new(backend);

        controller.submit("Berlin").await.expect("valid input");
        assert_eq!(controller.error_message().as_deref(), Some(FETCH_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn malformed_payload_becomes_error() {
        let mut broken = berlin();
        broken.current_weather = None;
        let backend = Arc::new(StubBackend::default().with_weather("Berlin", 0, Ok(broken)));
        let controller = WeatherSearchController::new(backend);

        controller.submit("Berlin").await.expect("valid input");
        assert_eq!(controller.state().name(), "error");
        assert!(controller.snapshot().is_none());
    }

    #[tokio::test]
    async fn error_then_success_clears_message() {
        let backend = Arc::new(StubBackend::default().with_weather("Berlin", 0, Ok(berlin())));
        let controller = WeatherSearchController::new(backend);

        controller.submit("Nowhere").await.expect("valid input");
        assert!(controller.error_message().is_some());

        controller.submit("Berlin").await.expect("valid input");
        assert!(controller.error_message().is_none());
        assert_eq!(controller.summary(), Some(Summary { avg_temp_c: 5, avg_wind_kmh: 15 }));
    }

    #[tokio::test]
    async fn selection_composes_label() {
        let backend = Arc::new(
            StubBackend::default().with_weather("Paris", 0, Ok(payload("Paris", &[(12.0, 6.0, 9.0, 2)]))),
        );
        let controller = WeatherSearchController::new(backend.clone());

        let full = Suggestion::new("Paris", "Paris, Île-de-France, France")
            .with_region("Île-de-France")
            .with_country("France");
        controller.select_suggestion(&full).await.expect("valid suggestion");
        assert_eq!(
            controller.snapshot().map(|s| s.city_label).as_deref(),
            Some("Paris, Île-de-France, France")
        );

        let no_region = Suggestion::new("Paris", "Paris, France").with_region("").with_country("France");
        controller.select_suggestion(&no_region).await.expect("valid suggestion");
        assert_eq!(controller.snapshot().map(|s| s.city_label).as_deref(), Some("Paris, France"));

        let bare = Suggestion::new("Paris", "Paris");
        controller.select_suggestion(&bare).await.expect("valid suggestion");
        assert_eq!(controller.snapshot().map(|s| s.city_label).as_deref(), Some("Paris"));

        assert_eq!(backend.weather_calls(), ["Paris", "Paris", "Paris"]);
    }

    #[tokio::test(start_paused = true)]
    async fn older_response_cannot_overwrite_newer_one() {
        let backend = Arc::new(
            StubBackend::default()
                .with_weather("Slowtown", 500, Ok(payload("Slowtown", &[(1.0, 0.0, 1.0, 71)])))
                .with_weather("Fastville", 10, Ok(payload("Fastville", &[(20.0, 10.0, 5.0, 0)]))),
        );
        let controller = Arc::new(WeatherSearchController::new(backend));

        let slow = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("Slowtown").await }
        });
        tokio::time::sleep(Duration::from_millis(5)).await;

        controller.submit("Fastville").await.expect("valid input");
        assert_eq!(controller.snapshot().map(|s| s.city_label).as_deref(), Some("Fastville"));

        slow.await.expect("task completes").expect("valid input");
        assert_eq!(controller.snapshot().map(|s| s.city_label).as_deref(), Some("Fastville"));
    }

    #[tokio::test(start_paused = true)]
    async fn older_error_cannot_overwrite_newer_success() {
        let backend = Arc::new(
            StubBackend::default()
                .with_weather("Slowtown", 500, Err(DashboardError::Transport("timeout".into())))
                .with_weather("Berlin", 10, Ok(berlin())),
        );
        let controller = Arc::new(WeatherSearchController::new(backend));

        let slow = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("Slowtown").await }
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
        controller.submit("Berlin").await.expect("valid input");
        slow.await.expect("task completes").expect("valid input");

        assert_eq!(controller.state().name(), "loaded");
    }

    #[tokio::test]
    async fn chart_projection_follows_snapshot() {
        let backend = Arc::new(StubBackend::default().with_weather("Berlin", 0, Ok(berlin())));
        let controller = WeatherSearchController::new(backend);
        controller.submit("Berlin").await.expect("valid input");

        match controller.chart(ChartKind::Wind) {
            Some(ChartProjection::Wind(points)) => {
                let winds: Vec<_> = points.iter().map(|p| p.wind_speed).collect();
                assert_eq!(winds, [15.0, 20.0, 10.0]);
            }
            other => panic!("unexpected projection {other:?}"),
        }
    }
}
