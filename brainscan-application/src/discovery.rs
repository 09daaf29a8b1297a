use super::*;
use crate::prelude::{Advisory, FacilityPresenter};
use brainscan_core::FACILITY_CATEGORY;
use gateways::{
    facilities::{FacilityLocator, LocatorError},
    location::{GeolocationError, LocationProvider},
};
use parking_lot::Mutex;
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

pub const DEFAULT_GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscoveryConfig {
    /// Used whenever the current position cannot be determined
    pub default_position: MapPoint,
    pub geolocation_timeout: Duration,
    pub query_timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            // New Delhi
            default_position: MapPoint::from_lat_lng_deg(28.6139, 77.2090),
            geolocation_timeout: DEFAULT_GEOLOCATION_TIMEOUT,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Locating,
    Querying,
    Ranked,
    LocatorFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource {
    Located,
    Fallback(GeolocationError),
}

#[derive(Debug)]
pub enum DiscoveryOutcome {
    Ranked(Arc<RankedFacilities>),
    LocatorFailed(LocatorError),
    /// A more recent discovery has already installed its result.
    Superseded,
}

#[derive(Debug)]
pub struct DiscoveryReport {
    pub generation: u64,
    pub center: MapPoint,
    pub source: PositionSource,
    pub outcome: DiscoveryOutcome,
    pub advisories: Vec<Advisory>,
}

#[derive(Debug, Clone)]
pub struct InstalledResult {
    pub generation: u64,
    pub center: MapPoint,
    pub facilities: Arc<RankedFacilities>,
}

#[derive(Debug)]
struct Session<P> {
    state: PipelineState,
    state_generation: u64,
    installed: Option<InstalledResult>,
    presenter: P,
}

impl<P> Session<P>
where
    P: FacilityPresenter,
{
    fn installed_generation(&self) -> u64 {
        self.installed.as_ref().map(|r| r.generation).unwrap_or(0)
    }

    fn transition(&mut self, generation: u64, state: PipelineState) {
        if generation < self.state_generation {
            return;
        }
        debug!("Discovery #{generation}: {:?} -> {:?}", self.state, state);
        self.state_generation = generation;
        self.state = state;
    }

    /// Replace the current result unless a more recent one is already installed.
    fn install(&mut self, result: InstalledResult) -> bool {
        if result.generation < self.installed_generation() {
            info!(
                "Discarding result of discovery #{} superseded by #{}",
                result.generation,
                self.installed_generation()
            );
            return false;
        }
        self.presenter.retire();
        self.presenter.install(result.center, &result.facilities);
        self.transition(result.generation, PipelineState::Ranked);
        self.installed = Some(result);
        true
    }
}

/// Finds the facilities nearest to the current position.
///
/// Concurrent discoveries are allowed, but only the most recently
/// started one may replace the presented result (last request wins).
#[derive(Debug)]
pub struct Discovery<L, F, P> {
    location: L,
    locator: F,
    config: DiscoveryConfig,
    generation: AtomicU64,
    session: Mutex<Session<P>>,
}

impl<L, F, P> Discovery<L, F, P>
where
    L: LocationProvider,
    F: FacilityLocator,
    P: FacilityPresenter,
{
    pub fn new(location: L, locator: F, presenter: P, config: DiscoveryConfig) -> Self {
        let session = Session {
            state: PipelineState::Idle,
            state_generation: 0,
            installed: None,
            presenter,
        };
        Self {
            location,
            locator,
            config,
            generation: AtomicU64::new(0),
            session: Mutex::new(session),
        }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// The state of the most recently started discovery.
    pub fn state(&self) -> PipelineState {
        self.session.lock().state
    }

    pub fn installed(&self) -> Option<InstalledResult> {
        self.session.lock().installed.clone()
    }

    pub fn with_presenter<T>(&self, f: impl FnOnce(&P) -> T) -> T {
        f(&self.session.lock().presenter)
    }

    fn transition(&self, generation: u64, state: PipelineState) {
        self.session.lock().transition(generation, state);
    }

    async fn locate(&self) -> (MapPoint, PositionSource) {
        let res = tokio::time::timeout(
            self.config.geolocation_timeout,
            self.location.current_position(),
        )
        .await
        .unwrap_or(Err(GeolocationError::Timeout));
        match res {
            Ok(pos) => (pos, PositionSource::Located),
            Err(err) => {
                warn!(
                    "Could not determine the current position ({err}), using {} instead",
                    self.config.default_position
                );
                (self.config.default_position, PositionSource::Fallback(err))
            }
        }
    }

    async fn query(&self, ctx: &QueryContext) -> Result<Vec<Facility>, LocatorError> {
        tokio::time::timeout(
            self.config.query_timeout,
            self.locator.find_facilities(ctx, FACILITY_CATEGORY),
        )
        .await
        .unwrap_or(Err(LocatorError::Timeout))
    }

    pub async fn discover(&self) -> DiscoveryReport {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.transition(generation, PipelineState::Locating);

        let mut advisories = Vec::with_capacity(2);
        let (center, source) = self.locate().await;
        if let PositionSource::Fallback(err) = source {
            advisories.push(Advisory::GeolocationFailed(err));
        }

        self.transition(generation, PipelineState::Querying);
        let ctx = QueryContext::new(center);
        let outcome = match self.query(&ctx).await {
            Ok(facilities) => {
                let facilities = Arc::new(usecases::rank_facilities(&ctx, facilities));
                let installed = self.session.lock().install(InstalledResult {
                    generation,
                    center,
                    facilities: Arc::clone(&facilities),
                });
                if installed {
                    advisories.push(if facilities.is_empty() {
                        Advisory::NoFacilitiesFound
                    } else {
                        Advisory::FacilitiesFound(facilities.len())
                    });
                    DiscoveryOutcome::Ranked(facilities)
                } else {
                    DiscoveryOutcome::Superseded
                }
            }
            Err(err) => {
                warn!("Discovery #{generation} failed: {err}");
                let mut session = self.session.lock();
                session.transition(generation, PipelineState::LocatorFailed);
                session.transition(generation, PipelineState::Idle);
                advisories.push(Advisory::LocatorFailed);
                DiscoveryOutcome::LocatorFailed(err)
            }
        };

        DiscoveryReport {
            generation,
            center,
            source,
            outcome,
            advisories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use brainscan_entities::builders::*;
    use std::collections::VecDeque;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    struct StaticLocation(Result<MapPoint, GeolocationError>);

    #[async_trait]
    impl LocationProvider for StaticLocation {
        async fn current_position(&self) -> Result<MapPoint, GeolocationError> {
            self.0
        }
    }

    struct SlowLocation(Duration, MapPoint);

    #[async_trait]
    impl LocationProvider for SlowLocation {
        async fn current_position(&self) -> Result<MapPoint, GeolocationError> {
            tokio::time::sleep(self.0).await;
            Ok(self.1)
        }
    }

    type Response = (Duration, Result<Vec<Facility>, LocatorError>);

    /// Answers the requests in the order of the given responses.
    #[derive(Default)]
    struct ScriptedLocator {
        responses: Mutex<VecDeque<Response>>,
        requests: Mutex<Vec<QueryContext>>,
    }

    impl ScriptedLocator {
        fn new(responses: impl IntoIterator<Item = Response>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                requests: Default::default(),
            }
        }
    }

    #[async_trait]
    impl FacilityLocator for ScriptedLocator {
        async fn find_facilities(
            &self,
            ctx: &QueryContext,
            category: &str,
        ) -> Result<Vec<Facility>, LocatorError> {
            assert_eq!(category, "hospital");
            self.requests.lock().push(*ctx);
            let (delay, res) = self
                .responses
                .lock()
                .pop_front()
                .expect("unexpected request");
            tokio::time::sleep(delay).await;
            res
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        markers: Vec<String>,
        retired: usize,
    }

    impl FacilityPresenter for RecordingPresenter {
        fn retire(&mut self) {
            self.markers.clear();
            self.retired += 1;
        }

        fn install(&mut self, _: MapPoint, facilities: &RankedFacilities) {
            assert!(self.markers.is_empty());
            self.markers = facilities
                .iter()
                .map(|r| r.facility.name.clone())
                .collect();
        }
    }

    fn facility(name: &str, lat: f64, lng: f64) -> Facility {
        Facility::build()
            .name(name)
            .pos(MapPoint::from_lat_lng_deg(lat, lng))
            .finish()
    }

    fn here() -> MapPoint {
        MapPoint::from_lat_lng_deg(48.7755, 9.1827)
    }

    fn discovery<L>(
        location: L,
        locator: ScriptedLocator,
    ) -> Discovery<L, ScriptedLocator, RecordingPresenter>
    where
        L: LocationProvider,
    {
        Discovery::new(
            location,
            locator,
            RecordingPresenter::default(),
            DiscoveryConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn rank_facilities_around_current_position() {
        init_logging();
        let locator = ScriptedLocator::new([(
            Duration::from_millis(200),
            Ok(vec![
                facility("far", 48.80, 9.25),
                facility("near", 48.776, 9.183),
            ]),
        )]);
        let d = discovery(StaticLocation(Ok(here())), locator);
        assert_eq!(d.state(), PipelineState::Idle);

        let report = d.discover().await;
        assert_eq!(report.generation, 1);
        assert_eq!(report.center, here());
        assert_eq!(report.source, PositionSource::Located);
        assert_eq!(report.advisories, [Advisory::FacilitiesFound(2)]);
        let DiscoveryOutcome::Ranked(ranked) = report.outcome else {
            panic!("not ranked");
        };
        assert_eq!(ranked.nearest().unwrap().facility.name, "near");
        assert_eq!(d.state(), PipelineState::Ranked);
        d.with_presenter(|p| assert_eq!(p.markers, ["near", "far"]));

        let requests = d.locator.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].center, here());
        assert_eq!(requests[0].radius, Distance::from_km(10.0));
    }

    #[tokio::test(start_paused = true)]
    async fn fall_back_to_default_position_if_permission_is_denied() {
        let locator = ScriptedLocator::new([(Duration::ZERO, Ok(vec![]))]);
        let d = discovery(
            StaticLocation(Err(GeolocationError::PermissionDenied)),
            locator,
        );
        let report = d.discover().await;
        assert_eq!(report.center, d.config().default_position);
        assert_eq!(
            report.source,
            PositionSource::Fallback(GeolocationError::PermissionDenied)
        );
        assert_eq!(
            d.locator.requests.lock()[0].center,
            MapPoint::from_lat_lng_deg(28.6139, 77.2090)
        );
        assert!(matches!(report.outcome, DiscoveryOutcome::Ranked(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn fall_back_to_default_position_on_geolocation_timeout() {
        let locator = ScriptedLocator::new([(
            Duration::from_millis(100),
            Ok(vec![facility("default", 28.62, 77.21)]),
        )]);
        let d = discovery(SlowLocation(Duration::from_secs(11), here()), locator);
        let started = tokio::time::Instant::now();
        let report = d.discover().await;
        assert!(started.elapsed() < Duration::from_secs(11));
        assert_eq!(
            report.source,
            PositionSource::Fallback(GeolocationError::Timeout)
        );
        assert_eq!(report.center, d.config().default_position);
        assert_eq!(
            report.advisories,
            [
                Advisory::GeolocationFailed(GeolocationError::Timeout),
                Advisory::FacilitiesFound(1)
            ]
        );
        let DiscoveryOutcome::Ranked(ranked) = report.outcome else {
            panic!("not ranked");
        };
        assert_eq!(ranked.len(), 1);
        assert_eq!(d.state(), PipelineState::Ranked);
    }

    #[tokio::test(start_paused = true)]
    async fn report_empty_result_as_not_found() {
        let locator = ScriptedLocator::new([(Duration::ZERO, Ok(vec![]))]);
        let d = discovery(StaticLocation(Ok(here())), locator);
        let report = d.discover().await;
        assert_eq!(report.advisories, [Advisory::NoFacilitiesFound]);
        let DiscoveryOutcome::Ranked(ranked) = report.outcome else {
            panic!("not ranked");
        };
        assert!(ranked.is_empty());
        assert_eq!(d.state(), PipelineState::Ranked);
        assert!(d.installed().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn keep_previous_result_on_locator_failure() {
        let locator = ScriptedLocator::new([
            (Duration::ZERO, Ok(vec![facility("kept", 48.78, 9.19)])),
            (Duration::ZERO, Err(LocatorError::Status(429))),
        ]);
        let d = discovery(StaticLocation(Ok(here())), locator);
        d.discover().await;

        let report = d.discover().await;
        assert!(matches!(
            report.outcome,
            DiscoveryOutcome::LocatorFailed(LocatorError::Status(429))
        ));
        assert_eq!(report.advisories, [Advisory::LocatorFailed]);
        assert_eq!(d.state(), PipelineState::Idle);
        assert_eq!(d.installed().unwrap().generation, 1);
        d.with_presenter(|p| {
            assert_eq!(p.markers, ["kept"]);
            assert_eq!(p.retired, 1);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn fail_if_the_query_times_out() {
        let locator = ScriptedLocator::new([(Duration::from_secs(60), Ok(vec![]))]);
        let d = discovery(StaticLocation(Ok(here())), locator);
        let report = d.discover().await;
        assert!(matches!(
            report.outcome,
            DiscoveryOutcome::LocatorFailed(LocatorError::Timeout)
        ));
        assert_eq!(d.state(), PipelineState::Idle);
        assert!(d.installed().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn discard_outdated_result() {
        init_logging();
        let locator = ScriptedLocator::new([
            (Duration::from_secs(5), Ok(vec![facility("first", 48.78, 9.19)])),
            (Duration::from_secs(1), Ok(vec![facility("second", 48.77, 9.18)])),
        ]);
        let d = discovery(StaticLocation(Ok(here())), locator);

        let first = d.discover();
        let second = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            d.discover().await
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
        assert!(matches!(second.outcome, DiscoveryOutcome::Ranked(_)));
        assert!(matches!(first.outcome, DiscoveryOutcome::Superseded));
        assert!(first.advisories.is_empty());

        assert_eq!(d.installed().unwrap().generation, 2);
        assert_eq!(d.state(), PipelineState::Ranked);
        d.with_presenter(|p| {
            assert_eq!(p.markers, ["second"]);
            assert_eq!(p.retired, 1);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn replace_result_of_earlier_discovery() {
        let locator = ScriptedLocator::new([
            (Duration::from_secs(1), Ok(vec![facility("first", 48.78, 9.19)])),
            (Duration::from_secs(5), Ok(vec![facility("second", 48.77, 9.18)])),
        ]);
        let d = discovery(StaticLocation(Ok(here())), locator);

        let first = d.discover();
        let second = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            d.discover().await
        };
        let (first, second) = tokio::join!(first, second);

        assert!(matches!(first.outcome, DiscoveryOutcome::Ranked(_)));
        assert!(matches!(second.outcome, DiscoveryOutcome::Ranked(_)));
        d.with_presenter(|p| {
            assert_eq!(p.markers, ["second"]);
            assert_eq!(p.retired, 2);
        });
    }
}
