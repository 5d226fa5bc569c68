use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Notify, RwLock};

use crate::backend::{BackendClient, FetchError};
use crate::config::AppConfig;
use crate::payloads::{
    LocationPayload, NetworkPayload, NotificationsPayload, QuotePayload, SensorPayload,
    SolarPayload, StatsPayload, TimePayload, WeatherPayload,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Snapshot<T> {
    #[default]
    Empty,
    Ready(T),
    Failed(FetchError),
}

// Last known state of one panel plus the bookkeeping to refresh it. Cheap to
// clone, all fields shared.
#[derive(Clone)]
pub struct PanelCell<T> {
    snapshot: Arc<RwLock<Snapshot<T>>>,
    seq: Arc<AtomicU64>,
    refresh: Arc<Notify>,
}

impl<T: Clone> PanelCell<T> {
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Snapshot::Empty)),
            seq: Arc::new(AtomicU64::new(0)),
            refresh: Arc::new(Notify::new()),
        }
    }

    pub async fn snapshot(&self) -> Snapshot<T> {
        self.snapshot.read().await.clone()
    }

    // Wakes the refresher loop for an immediate out-of-cycle fetch.
    pub fn trigger(&self) {
        self.refresh.notify_one();
    }

    pub async fn triggered(&self) {
        self.refresh.notified().await;
    }

    pub fn begin(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    // Stores the outcome of fetch `seq` unless a newer fetch was issued in
    // the meantime; a late response never overwrites a newer one.
    pub async fn apply(&self, seq: u64, result: Result<T, FetchError>) -> bool {
        let mut snapshot = self.snapshot.write().await;
        if seq != self.seq.load(Ordering::SeqCst) {
            return false;
        }
        *snapshot = match result {
            Ok(value) => Snapshot::Ready(value),
            Err(err) => Snapshot::Failed(err),
        };
        true
    }
}

pub fn spawn_refresher<T, F, Fut>(name: &'static str, cell: PanelCell<T>, interval: Duration, fetch: F)
where
    T: Clone + Send + Sync + 'static,
    F: Fn(Option<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = cell.triggered() => {}
            }
            let seq = cell.begin();
            let previous = match cell.snapshot().await {
                Snapshot::Ready(value) => Some(value),
                _ => None,
            };
            let request = fetch(previous);
            let target = cell.clone();
            tokio::spawn(async move {
                let result = request.await;
                if let Err(err) = &result {
                    tracing::warn!("{name} refresh failed: {err}");
                }
                if !target.apply(seq, result).await {
                    tracing::debug!("{name} response {seq} superseded, dropping");
                }
            });
        }
    });
}

// The clock column refreshes as one unit: time, location, weather and the
// quote of the day. Sub-fetches fail independently; time and weather keep
// their previous value, location and quote surface the failure so the
// heading flips to "???????" and the quote box shows its placeholder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClockGroup {
    pub time: Option<TimePayload>,
    pub location: Snapshot<LocationPayload>,
    pub weather: Option<WeatherPayload>,
    pub quote: Snapshot<QuotePayload>,
}

pub async fn fetch_clock_group(backend: &BackendClient, previous: ClockGroup) -> ClockGroup {
    let time = match backend.get_json::<TimePayload>("/pidata/time/", &[]).await {
        Ok(time) => Some(time),
        Err(err) => {
            tracing::warn!("time refresh failed: {err}");
            previous.time
        }
    };

    let location = match backend
        .get_json::<LocationPayload>("/pidata/location/", &[])
        .await
    {
        Ok(location) => Snapshot::Ready(location),
        Err(err) => {
            tracing::warn!("location refresh failed: {err}");
            Snapshot::Failed(err)
        }
    };

    // Weather needs fresh coordinates, so it only refetches when the
    // location lookup succeeded this round.
    let weather = match &location {
        Snapshot::Ready(spot) => {
            let query = [
                ("lat", spot.latitude.clone()),
                ("lon", spot.longitude.clone()),
            ];
            match backend
                .get_json::<WeatherPayload>("/pidata/weather/", &query)
                .await
            {
                Ok(weather) => Some(weather),
                Err(err) => {
                    tracing::warn!("weather refresh failed: {err}");
                    previous.weather
                }
            }
        }
        _ => previous.weather,
    };

    let quote = match backend.get_json::<QuotePayload>("/pidata/quote/", &[]).await {
        Ok(quote) => Snapshot::Ready(quote),
        Err(err) => {
            tracing::warn!("quote refresh failed: {err}");
            Snapshot::Failed(err)
        }
    };

    ClockGroup {
        time,
        location,
        weather,
        quote,
    }
}

#[derive(Clone)]
pub struct PanelHub {
    pub stats: PanelCell<StatsPayload>,
    pub solar: PanelCell<SolarPayload>,
    pub sensor: PanelCell<SensorPayload>,
    pub network: PanelCell<NetworkPayload>,
    pub clock: PanelCell<ClockGroup>,
    pub notifications: PanelCell<NotificationsPayload>,
}

impl PanelHub {
    pub fn new() -> Self {
        Self {
            stats: PanelCell::new(),
            solar: PanelCell::new(),
            sensor: PanelCell::new(),
            network: PanelCell::new(),
            clock: PanelCell::new(),
            notifications: PanelCell::new(),
        }
    }
}

pub fn spawn_refreshers(hub: &PanelHub, backend: &BackendClient, config: &AppConfig) {
    let client = backend.clone();
    spawn_refresher(
        "stats",
        hub.stats.clone(),
        Duration::from_secs(config.stats_interval_secs),
        move |_| {
            let client = client.clone();
            async move { client.get_json::<StatsPayload>("/system/stats", &[]).await }
        },
    );

    let client = backend.clone();
    spawn_refresher(
        "solar",
        hub.solar.clone(),
        Duration::from_secs(config.solar_interval_secs),
        move |_| {
            let client = client.clone();
            async move { client.get_json::<SolarPayload>("/info/solar/", &[]).await }
        },
    );

    let client = backend.clone();
    spawn_refresher(
        "sensor",
        hub.sensor.clone(),
        Duration::from_secs(config.sensor_interval_secs),
        move |_| {
            let client = client.clone();
            async move { client.get_json::<SensorPayload>("/info/sensor/", &[]).await }
        },
    );

    let client = backend.clone();
    spawn_refresher(
        "network",
        hub.network.clone(),
        Duration::from_secs(config.network_interval_secs),
        move |_| {
            let client = client.clone();
            async move { client.get_json::<NetworkPayload>("/info/network/", &[]).await }
        },
    );

    let client = backend.clone();
    spawn_refresher(
        "clock",
        hub.clock.clone(),
        Duration::from_secs(config.clock_interval_secs),
        move |previous| {
            let client = client.clone();
            async move { Ok(fetch_clock_group(&client, previous.unwrap_or_default()).await) }
        },
    );

    let client = backend.clone();
    spawn_refresher(
        "notifications",
        hub.notifications.clone(),
        Duration::from_secs(config.notify_interval_secs),
        move |previous| {
            let client = client.clone();
            async move {
                let fetched = client
                    .get_json::<NotificationsPayload>("/pidata/notifications/", &[])
                    .await;
                // A failed poll keeps the rows already on screen.
                match (fetched, previous) {
                    (Ok(payload), _) => Ok(payload),
                    (Err(err), Some(kept)) => {
                        tracing::warn!("notifications refresh failed: {err}");
                        Ok(kept)
                    }
                    (Err(err), None) => Err(err),
                }
            }
        },
    );
}
