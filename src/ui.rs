use chrono::Local;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;

use crate::config::AppConfig;
use crate::format;
use crate::panels::{ClockGroup, Snapshot};
use crate::payloads::{
    NetworkPayload, NotificationsPayload, QuotePayload, SensorPayload, SolarPayload, StatsPayload,
    WeatherPayload,
};
use crate::presenter::ModalState;
use crate::slideshow::{FADE_MILLIS, INFO_WIDTH, NAV_HEIGHT, SlideView};
use crate::theme::{self, PowerFlow};

pub const ALERT_POLL_SECS: u64 = 5;
pub const FRAME_POLL_SECS: u64 = 1;

const W3_CSS: &str = "https://www.w3schools.com/w3css/4/w3.css";
const FONT_AWESOME: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/5.15.4/css/all.min.css";

#[derive(Clone, PartialEq)]
pub struct PanelIntervals {
    pub stats: u64,
    pub solar: u64,
    pub sensor: u64,
    pub network: u64,
    pub clock: u64,
    pub notifications: u64,
}

impl PanelIntervals {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            stats: config.stats_interval_secs,
            solar: config.solar_interval_secs,
            sensor: config.sensor_interval_secs,
            network: config.network_interval_secs,
            clock: config.clock_interval_secs,
            notifications: config.notify_interval_secs,
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct DashboardView {
    pub stats: Snapshot<StatsPayload>,
    pub solar: Snapshot<SolarPayload>,
    pub sensor: Snapshot<SensorPayload>,
    pub network: Snapshot<NetworkPayload>,
    pub clock: Snapshot<ClockGroup>,
    pub notifications: Snapshot<NotificationsPayload>,
    pub drawer_open: bool,
    pub modals: ModalState,
    pub intervals: PanelIntervals,
}

#[derive(Clone, PartialEq)]
pub struct FrameView {
    pub slide: SlideView,
    pub fit_cover: bool,
    pub clock: String,
    pub date: String,
}

impl FrameView {
    pub fn new(slide: SlideView, fit_cover: bool) -> Self {
        let now = Local::now();
        Self {
            slide,
            fit_cover,
            clock: format::clock_line(&now),
            date: format::date_line(&now),
        }
    }
}

pub fn render_dashboard(view: &DashboardView) -> String {
    let mut app = VirtualDom::new_with_props(Dashboard, DashboardProps { view: view.clone() });
    // Build the tree before rendering to avoid SSR panics.
    let mut noop = NoOpMutations {};
    let _ = app.rebuild(&mut noop);
    dioxus_ssr::render(&mut app)
}

pub fn render_frame(view: &FrameView) -> String {
    let mut app = VirtualDom::new_with_props(Frame, FrameProps { view: view.clone() });
    let mut noop = NoOpMutations {};
    let _ = app.rebuild(&mut noop);
    dioxus_ssr::render(&mut app)
}

pub fn render_stats(snapshot: &Snapshot<StatsPayload>) -> String {
    fragment(stats_panel(snapshot))
}

pub fn render_solar(snapshot: &Snapshot<SolarPayload>) -> String {
    fragment(solar_panel(snapshot))
}

pub fn render_sensor(snapshot: &Snapshot<SensorPayload>) -> String {
    fragment(sensor_panel(snapshot))
}

pub fn render_network(snapshot: &Snapshot<NetworkPayload>) -> String {
    fragment(network_panel(snapshot))
}

pub fn render_clock(snapshot: &Snapshot<ClockGroup>) -> String {
    fragment(clock_panel(snapshot))
}

pub fn render_notifications(snapshot: &Snapshot<NotificationsPayload>, drawer_open: bool) -> String {
    fragment(notifications_panel(snapshot, drawer_open))
}

pub fn render_alert(modals: &ModalState) -> String {
    fragment(alert_panel(modals))
}

pub fn render_frame_panel(view: &FrameView) -> String {
    fragment(frame_panel(view))
}

fn fragment(element: Element) -> String {
    dioxus_ssr::render_element(element)
}

#[derive(Props, Clone, PartialEq)]
struct DashboardProps {
    pub view: DashboardView,
}

#[component]
fn Dashboard(props: DashboardProps) -> Element {
    let styles = r#"
body, html { margin: 0; padding: 0; background: #000; color: #fff; font-family: "Segoe UI", Arial, sans-serif; }
.page { min-height: 100vh; display: flex; flex-direction: column; }
.board { flex: 1; display: flex; gap: 12px; padding: 12px 12px 64px 12px; }
.side { width: 430px; flex-shrink: 0; display: flex; flex-direction: column; }
.main { flex: 1; display: flex; flex-direction: column; gap: 12px; }
.panel { background: #111; border-radius: 6px; padding: 12px; }
.w3-card-black { background: #000; color: #fff; margin: 4px; padding: 8px 16px; }
.node-report { display: inline-block; vertical-align: top; margin-right: 16px; min-width: 260px; }
.footer { position: fixed; left: 0; right: 0; bottom: 0; height: 48px; background: #111; display: flex; align-items: center; gap: 8px; padding: 0 12px; z-index: 30; }
.footer-btn { background: none; border: none; color: #fff; font-size: 18px; padding: 8px 14px; cursor: pointer; text-decoration: none; }
.footer-btn:hover { color: #2196f3; }
.drawer { position: fixed; right: 0; top: 0; bottom: 48px; width: 380px; background: #151515; overflow-y: auto; z-index: 20; padding: 12px; }
.drawer-head { display: flex; justify-content: space-between; align-items: center; margin-bottom: 8px; }
.modal { position: fixed; inset: 0; display: flex; align-items: center; justify-content: center; background: rgba(0,0,0,0.72); z-index: 40; }
.modal-card { width: min(420px, 100%); background: #181818; border-radius: 8px; padding: 20px; }
.modal-title { margin: 0 0 10px 0; }
.modal-body { margin: 0 0 18px 0; line-height: 1.4; }
.actions { display: flex; gap: 10px; }
.ghost { flex: 1; padding: 10px 12px; cursor: pointer; background: #242424; color: #fff; border: 1px solid #333; border-radius: 6px; }
"#;

    let script = r#"
(() => {
  const cache = new Map();

  async function refresh(el) {
    const name = el.dataset.panel;
    let url = '/panel/' + name;
    if (el.dataset.viewport) {
      url += '?width=' + window.innerWidth + '&height=' + window.innerHeight;
    }
    try {
      const res = await fetch(url);
      if (!res.ok) return;
      const text = await res.text();
      if (cache.get(name) === text) return;
      cache.set(name, text);
      el.innerHTML = text;
    } catch (err) {
      // Keep the last server render; the server owns the placeholders.
    }
  }

  document.querySelectorAll('[data-panel]').forEach((el) => {
    const seconds = parseInt(el.dataset.interval || '60', 10);
    setInterval(() => refresh(el), seconds * 1000);
  });

  function refreshByName(name) {
    const el = document.querySelector('[data-panel="' + name + '"]');
    if (el) refresh(el);
  }

  async function post(url, body) {
    try {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body || {}),
      });
      return res.ok;
    } catch (err) {
      return false;
    }
  }

  document.addEventListener('click', async (evt) => {
    const dismiss = evt.target.closest('[data-dismiss]');
    if (dismiss) {
      await post('/api/notifications/dismiss', {
        datetime: dismiss.dataset.datetime,
        node: dismiss.dataset.node,
        app: dismiss.dataset.app,
      });
      setTimeout(() => refreshByName('notifications'), 500);
      return;
    }
    if (evt.target.closest('[data-dismiss-all]')) {
      await post('/api/notifications/dismiss_all', {});
      setTimeout(() => refreshByName('notifications'), 500);
      return;
    }
    if (evt.target.closest('[data-drawer-toggle]')) {
      await post('/api/notifications/drawer', {});
      refreshByName('notifications');
      return;
    }
    if (evt.target.closest('[data-reboot]')) {
      const confirmed = window.confirm('Are you sure you want to reboot the system? Data loss may occur.');
      if (confirmed) {
        await post('/api/reboot', { confirm: true });
        refreshByName('alert');
      }
      return;
    }
    if (evt.target.closest('[data-error-dismiss]')) {
      await post('/api/error/dismiss', {});
      refreshByName('alert');
    }
  });
})();
"#;

    let view = &props.view;
    let clock_every = view.intervals.clock.to_string();
    let stats_every = view.intervals.stats.to_string();
    let solar_every = view.intervals.solar.to_string();
    let sensor_every = view.intervals.sensor.to_string();
    let network_every = view.intervals.network.to_string();
    let notify_every = view.intervals.notifications.to_string();
    let alert_every = ALERT_POLL_SECS.to_string();

    rsx! {
        div { class: "page",
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            link { rel: "stylesheet", href: "{W3_CSS}" }
            link { rel: "stylesheet", href: "{FONT_AWESOME}" }
            div { class: "board",
                div { class: "side",
                    div {
                        id: "clock-panel",
                        class: "panel",
                        "data-panel": "clock",
                        "data-interval": "{clock_every}",
                        { clock_panel(&view.clock) }
                    }
                }
                div { class: "main",
                    div {
                        id: "stats-panel",
                        class: "panel",
                        "data-panel": "stats",
                        "data-interval": "{stats_every}",
                        { stats_panel(&view.stats) }
                    }
                    div {
                        id: "solar-panel",
                        class: "panel",
                        "data-panel": "solar",
                        "data-interval": "{solar_every}",
                        { solar_panel(&view.solar) }
                    }
                    div {
                        id: "sensor-panel",
                        class: "panel",
                        "data-panel": "sensor",
                        "data-interval": "{sensor_every}",
                        { sensor_panel(&view.sensor) }
                    }
                    div {
                        id: "network-panel",
                        class: "panel",
                        "data-panel": "network",
                        "data-interval": "{network_every}",
                        { network_panel(&view.network) }
                    }
                }
            }
            div { class: "footer",
                div {
                    id: "notif-panel",
                    "data-panel": "notifications",
                    "data-interval": "{notify_every}",
                    { notifications_panel(&view.notifications, view.drawer_open) }
                }
                a { class: "footer-btn", href: "/show/slides",
                    i { class: "fas fa-images" }
                    " Slides"
                }
                button { class: "footer-btn", "data-reboot": "",
                    i { class: "fas fa-power-off" }
                    " Reboot"
                }
            }
        }
        div {
            id: "alert-panel",
            "data-panel": "alert",
            "data-interval": "{alert_every}",
            { alert_panel(&view.modals) }
        }
        style { "{styles}" }
        script { "{script}" }
    }
}

#[derive(Props, Clone, PartialEq)]
struct FrameProps {
    pub view: FrameView,
}

#[component]
fn Frame(props: FrameProps) -> Element {
    let styles = r#"
body, html { margin: 0; padding: 0; background: #000; color: #fff; font-family: "Segoe UI", Arial, sans-serif; overflow: hidden; }
.frame-page { height: 100vh; display: flex; flex-direction: column; }
.frame-nav { display: flex; align-items: center; background: #111; flex-shrink: 0; }
.footer-btn { background: none; border: none; color: #fff; font-size: 18px; padding: 8px 14px; cursor: pointer; text-decoration: none; }
.footer-btn:hover { color: #2196f3; }
#frame-panel { flex: 1; display: flex; min-height: 0; }
.frame-info { flex-shrink: 0; display: flex; flex-direction: column; justify-content: center; text-align: center; background: #0a0a0a; }
.stage { flex: 1; display: flex; align-items: center; justify-content: center; }
.slide { max-width: 1400px; max-height: 1000px; width: auto; height: auto; display: block; margin: auto; }
.fit-cover { object-fit: cover; }
.fade-out { animation-name: slide-fade-out; animation-fill-mode: forwards; }
.fade-in { animation-name: slide-fade-in; animation-fill-mode: forwards; }
@keyframes slide-fade-out { from { opacity: 1; } to { opacity: 0; } }
@keyframes slide-fade-in { from { opacity: 0; } to { opacity: 1; } }
"#;

    let script = r#"
(() => {
  const cache = new Map();

  async function refresh(el) {
    const name = el.dataset.panel;
    let url = '/panel/' + name;
    if (el.dataset.viewport) {
      url += '?width=' + window.innerWidth + '&height=' + window.innerHeight;
    }
    try {
      const res = await fetch(url);
      if (!res.ok) return;
      const text = await res.text();
      if (cache.get(name) === text) return;
      cache.set(name, text);
      el.innerHTML = text;
    } catch (err) {
      // Keep the last slide on screen.
    }
  }

  document.querySelectorAll('[data-panel]').forEach((el) => {
    const seconds = parseInt(el.dataset.interval || '1', 10);
    setInterval(() => refresh(el), seconds * 1000);
  });
})();
"#;

    // The stylesheet takes the chrome sizes and fade timing from the same
    // constants the slideshow state machine uses.
    let chrome_rule = format!(
        ".frame-info {{ width: {INFO_WIDTH}px; }} .frame-nav {{ height: {NAV_HEIGHT}px; }}"
    );
    let fade_rule = format!("#slide-img {{ animation-duration: {FADE_MILLIS}ms; }}");
    let poll_every = FRAME_POLL_SECS.to_string();

    rsx! {
        div { class: "frame-page",
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            link { rel: "stylesheet", href: "{W3_CSS}" }
            link { rel: "stylesheet", href: "{FONT_AWESOME}" }
            div { class: "frame-nav",
                a { class: "footer-btn", href: "/",
                    i { class: "fas fa-arrow-left" }
                    " Dashboard"
                }
            }
            div {
                id: "frame-panel",
                "data-panel": "frame",
                "data-interval": "{poll_every}",
                "data-viewport": "1",
                { frame_panel(&props.view) }
            }
        }
        style { "{styles}" "{chrome_rule}" "{fade_rule}" }
        script { "{script}" }
    }
}

fn clock_panel(snapshot: &Snapshot<ClockGroup>) -> Element {
    let group = match snapshot {
        Snapshot::Ready(group) => group.clone(),
        _ => ClockGroup::default(),
    };
    let time_text = group
        .time
        .as_ref()
        .map(|payload| payload.time.clone())
        .unwrap_or_default();
    let location_text = match &group.location {
        Snapshot::Ready(spot) => format!("{}, {}", spot.city, spot.region),
        Snapshot::Failed(_) => "???????".to_string(),
        Snapshot::Empty => String::new(),
    };
    let (weather, forecast) = weather_views(&group);
    let quote = quote_block(&group.quote);
    rsx! {
        h1 { id: "time-heading", class: "w3-center w3-jumbo", "{time_text}" }
        h2 { id: "location-heading", class: "w3-center", "{location_text}" }
        div { id: "weather-block", {weather} }
        div { id: "forecast-strip", class: "w3-cell-row", {forecast} }
        div { id: "quote-block", {quote} }
    }
}

// The weather area follows the location lookup: a failed location blanks it
// down to the warning icon and clears the forecast, even when an older
// weather reading is still held.
fn weather_views(group: &ClockGroup) -> (Element, Element) {
    if matches!(group.location, Snapshot::Failed(_)) {
        let icon = rsx! {
            i { class: "fas fa-exclamation-circle w3-text-red fa-9x" }
        };
        return (icon, rsx! {});
    }
    match &group.weather {
        Some(weather) => (current_weather(weather), forecast_cells(weather)),
        None => (rsx! {}, rsx! {}),
    }
}

fn current_weather(weather: &WeatherPayload) -> Element {
    let status_class = format!("w3-center {}", weather.bg_color);
    let icon_src = weather.icon.clone();
    let icon_alt = weather.status.clone();
    let ceiled = weather.temp.temp.ceil();
    let temp_class = format!("w3-center w3-jumbo {}", theme::temp_color(ceiled));
    let temp_text = format!("{}\u{b0}F", ceiled as i64);
    let feels_text = format!("Feels Like {}\u{b0}F", weather.temp.feels_like.ceil() as i64);
    rsx! {
        div { class: "{status_class}", style: "margin: 0 auto; max-width: 128px;",
            img { class: "w3-round", alt: "{icon_alt}", src: "{icon_src}" }
        }
        h3 { class: "w3-center w3-xlarge", "{weather.detailed_status}" }
        h1 { class: "{temp_class}", "{temp_text}" }
        h3 { class: "w3-center w3-xlarge", "{feels_text}" }
    }
}

fn forecast_cells(weather: &WeatherPayload) -> Element {
    let cells = weather.forecast.iter().map(|day| {
        let cell_class = format!("w3-small w3-cell w3-center {}", weather.bg_color);
        let icon_src = day.icon.clone();
        let highs = format!("{}\u{b0}F", day.temp_max);
        let lows = format!("{}\u{b0}F", day.temp_min);
        rsx! {
            div { class: "{cell_class}", style: "max-width: 20%;",
                h6 { "{day.day}" }
                img { src: "{icon_src}" }
                p { "{day.status}" }
                h6 {
                    b {
                        "{highs}"
                        br {}
                        "{lows}"
                    }
                }
            }
        }
    });
    rsx! {
        {cells}
    }
}

fn quote_block(quote: &Snapshot<QuotePayload>) -> Element {
    match quote {
        Snapshot::Empty => rsx! {},
        Snapshot::Failed(_) => rsx! {
            i { class: "fas fa-exclamation-circle w3-text-red fa-9x" }
        },
        Snapshot::Ready(quote) => {
            let author = format!("- {}", quote.author);
            let updated = format!("Data Updated: {}", quote.datetime.replace('T', " "));
            let updated_class = if quote.update_late {
                "w3-text-red w3-center"
            } else {
                "w3-center"
            };
            rsx! {
                h3 { class: "w3-center",
                    b { "{quote.title}" }
                }
                div { class: "w3-border w3-border-gray w3-container",
                    p { "{quote.quote}" }
                    p { class: "w3-right-align", "{author}" }
                }
                div { class: "{updated_class}", "{updated}" }
            }
        }
    }
}

fn stats_panel(snapshot: &Snapshot<StatsPayload>) -> Element {
    match snapshot {
        Snapshot::Empty => rsx! {},
        Snapshot::Failed(_) => fetch_placeholder("Could not fetch stats data", "fa-7x"),
        Snapshot::Ready(stats) => {
            let nodes = stats.iter().map(|(node, report)| {
                let updated = format!("Updated: {}", report.updated.replace('T', " "));
                let updated_class = if report.update_late { "w3-text-red" } else { "" };
                let rows = report.metrics.iter().map(|(metric, value)| {
                    rsx! {
                        tr {
                            th { class: "w3-black", "{metric}" }
                            td { class: "w3-black", "{value}" }
                        }
                    }
                });
                rsx! {
                    div { class: "node-report",
                        h3 { "{node}" }
                        table { class: "w3-table-all w3-margin-bottom", {rows} }
                        span { class: "{updated_class}", "{updated}" }
                    }
                }
            });
            rsx! {
                {nodes}
            }
        }
    }
}

fn solar_panel(snapshot: &Snapshot<SolarPayload>) -> Element {
    match snapshot {
        Snapshot::Empty => rsx! {},
        Snapshot::Failed(_) => fetch_placeholder("Could not fetch solar data", "fa-9x"),
        Snapshot::Ready(solar) => {
            let power = &solar.power;
            let energy = &solar.energy;
            let solar_icon = theme::solar_icon(&power.solar_status);
            let total = format!("Total: {:.1}kWh", energy.production / 1000.0);
            let current = format!("Current: {:.2}kW", power.solar_power);
            let battery_icon = theme::battery_icon(power.battery_charge, power.battery_critical);
            let charge = format!("Charge: {}%", power.battery_charge);
            let battery_status = format!("Status: {}", power.battery_status);
            let production = format!("Production: {:.2} kWh", energy.production / 1000.0);
            let usage = format!("Usage: {:.2} kWh", energy.consumption / 1000.0);
            let net = format!(
                "Net: {:.2} kWh",
                (energy.exported - energy.imported) / 1000.0
            );
            let flow = theme::power_flow(
                &power.grid_status,
                &power.battery_status,
                power.power_usage,
                power.solar_power,
            );
            let flow_text = match flow {
                PowerFlow::FromGrid => {
                    format!("Current Status: {:.2} kW from GRID", power.grid_power)
                }
                PowerFlow::ToGrid => {
                    format!("Current Status: {:.2} kW to GRID", power.grid_power)
                }
                PowerFlow::FromBattery => "Current Status: Battery ".to_string(),
                PowerFlow::Powerloss => "Current Status: Powerloss.".to_string(),
            };
            let updated = format!("Data Updated: {}", power.datetime.replace('T', " "));
            let updated_class = if solar.update_late {
                "w3-center w3-text-red"
            } else {
                "w3-center"
            };
            rsx! {
                div { class: "w3-cell-row",
                    div { class: "w3-cell w3-card-black w3-center w3-cell-top",
                        i { class: "{solar_icon}" }
                        h3 { class: "w3-center", "{total}" }
                        h3 { class: "w3-center", "{current}" }
                    }
                    div { class: "w3-cell w3-card-black w3-center w3-cell-top",
                        i { class: "{battery_icon}" }
                        h3 { class: "w3-center", "{charge}" }
                        h3 { class: "w3-center", "{battery_status}" }
                    }
                    div { class: "w3-cell w3-card-black w3-center w3-cell-middle",
                        h6 { class: "w3-center", "{production}" }
                        h6 { class: "w3-center", "{usage}" }
                        h6 { class: "w3-center", "{net}" }
                        h6 { class: "w3-center", "{flow_text}" }
                        { flow_icons(flow) }
                    }
                }
                h6 { class: "{updated_class}", "{updated}" }
            }
        }
    }
}

fn flow_icons(flow: PowerFlow) -> Element {
    match flow {
        PowerFlow::FromGrid => rsx! {
            span {
                i { class: "fas fa-home" }
                "\u{a0}"
                i { class: "fas fa-long-arrow-alt-left" }
                "\u{a0}"
                i { class: "fas fa-broadcast-tower" }
            }
        },
        PowerFlow::ToGrid => rsx! {
            span {
                i { class: "fas fa-home" }
                "\u{a0}"
                i { class: "fas fa-long-arrow-alt-right" }
                "\u{a0}"
                i { class: "fas fa-broadcast-tower" }
            }
        },
        PowerFlow::FromBattery => rsx! {
            span {
                i { class: "fas fa-home" }
                "\u{a0}"
                i { class: "fas fa-long-arrow-alt-left" }
                "\u{a0}"
                i { class: "fas fa-battery-half" }
            }
        },
        PowerFlow::Powerloss => rsx! {
            span {
                i { class: "fas fa-home" }
                "\u{a0}"
                i { class: "fas fa-times" }
            }
        },
    }
}

fn sensor_panel(snapshot: &Snapshot<SensorPayload>) -> Element {
    match snapshot {
        Snapshot::Empty => rsx! {},
        Snapshot::Failed(_) => fetch_placeholder("Could not fetch sensor data", "fa-9x"),
        Snapshot::Ready(sensors) => {
            let cells = sensors.iter().map(|(location, reading)| {
                let icon_class = format!(
                    "{} {}",
                    reading.icon_class,
                    theme::temp_color(reading.temperature)
                );
                let temperature = format!("Temperature: {:.1}\u{b0}F", reading.temperature);
                let humidity = format!("Humidity: {:.1}%", reading.humidity);
                let updated = format!("Updated: {}", reading.updated.replace('T', " "));
                let updated_class = if reading.update_late { "w3-text-red" } else { "" };
                rsx! {
                    div { class: "w3-cell w3-card-black w3-center",
                        h2 { class: "w3-center", "{location}" }
                        i { class: "{icon_class}" }
                        h4 { class: "w3-center", "{temperature}" }
                        h4 { class: "w3-center", "{humidity}" }
                        h4 { class: "{updated_class}", "{updated}" }
                    }
                }
            });
            rsx! {
                div { class: "w3-cell-row", {cells} }
            }
        }
    }
}

fn network_panel(snapshot: &Snapshot<NetworkPayload>) -> Element {
    match snapshot {
        Snapshot::Empty => rsx! {},
        Snapshot::Failed(_) => fetch_placeholder("Could not fetch network data", "fa-9x"),
        Snapshot::Ready(network) => {
            let wan_icon = network.wan_icon.clone();
            let wan_status = format!("Status: {}", network.wan_status);
            let wan_ip = format!("IP: {}", network.ip);
            let piholes = network.piholes.iter().map(|(name, pihole)| {
                let icon = pihole.icon.clone();
                let status = format!("Status: {}", pihole.status);
                let ads = format!("Queries Blocked: {}%", pihole.ads);
                rsx! {
                    div { class: "w3-cell w3-card-black w3-center",
                        h2 { class: "w3-center", "{name}" }
                        i { class: "{icon}" }
                        h4 { class: "w3-center", "{status}" }
                        h4 { class: "w3-center", "{ads}" }
                    }
                }
            });
            rsx! {
                div { class: "w3-cell-row",
                    div { class: "w3-cell w3-card-black w3-center",
                        h2 { class: "w3-center", "Network" }
                        i { class: "{wan_icon}" }
                        h4 { class: "w3-center", "{wan_status}" }
                        h4 { class: "w3-center", "{wan_ip}" }
                    }
                    {piholes}
                }
            }
        }
    }
}

fn notifications_panel(snapshot: &Snapshot<NotificationsPayload>, drawer_open: bool) -> Element {
    let payload = match snapshot {
        Snapshot::Ready(payload) => payload.clone(),
        _ => NotificationsPayload::default(),
    };
    let bell_class = if payload.notifications.is_empty() {
        "w3-button w3-xlarge"
    } else {
        "w3-button w3-xlarge w3-text-red"
    };
    let counts = format!(
        "Displaying {} of {} Notifications",
        payload.displayed, payload.total
    );
    let drawer_style = if drawer_open {
        "display: block"
    } else {
        "display: none"
    };
    let rows = payload.notifications.iter().enumerate().map(|(index, row)| {
        let row_id = format!("notif-{index}");
        let real_datetime = row.real_datetime.clone();
        let node = row.node.clone();
        let app = row.app.clone();
        rsx! {
            div { id: "{row_id}", class: "w3-container w3-row w3-margin",
                div { class: "w3-cell w3-cell-middle", style: "max-width: 10%;",
                    button {
                        class: "w3-btn w3-blue",
                        "data-dismiss": "",
                        "data-datetime": "{real_datetime}",
                        "data-node": "{node}",
                        "data-app": "{app}",
                        i { class: "fas fa-envelope-open-text fa-2x" }
                    }
                }
                div { class: "w3-container w3-cell w3-cell-top",
                    b { "At: " }
                    "{row.display_datetime}"
                    br {}
                    b { "From: " }
                    "{row.node}.{row.app}"
                    br {}
                    b { "Message: " }
                    "{row.msg}"
                }
            }
        }
    });
    rsx! {
        button { id: "notify-bell", class: "{bell_class}", "data-drawer-toggle": "",
            i { class: "fas fa-bell" }
        }
        div { id: "notif-drawer", class: "drawer w3-card", style: "{drawer_style}",
            div { class: "drawer-head",
                span { id: "notif-counts", "{counts}" }
                button { class: "w3-btn w3-blue", "data-dismiss-all": "", "Clear All" }
            }
            div { id: "notifications", {rows} }
        }
    }
}

fn alert_panel(modals: &ModalState) -> Element {
    let reboot = if modals.reboot_pending {
        rsx! {
            div { id: "reboot-modal", class: "modal",
                div { class: "modal-card",
                    h2 { class: "modal-title", "Rebooting" }
                    p { class: "modal-body",
                        "Reboot requested. The display will reconnect once the system is back."
                    }
                }
            }
        }
    } else {
        rsx! {}
    };
    let error = match &modals.error {
        Some((code, reason)) => rsx! {
            div { id: "error-modal", class: "modal",
                div { class: "modal-card",
                    h2 { class: "modal-title", "Something went wrong" }
                    p { class: "modal-body",
                        "An error occured while performing your request."
                        br {}
                        b { "ERROR MESSAGE:" }
                        " {code} - {reason}"
                    }
                    div { class: "actions",
                        button { class: "ghost", "data-error-dismiss": "", "Close" }
                    }
                }
            }
        },
        None => rsx! {},
    };
    rsx! {
        {reboot}
        {error}
    }
}

fn frame_panel(view: &FrameView) -> Element {
    let stage = match &view.slide {
        SlideView::Empty => rsx! {},
        SlideView::Placeholder => rsx! {
            div { id: "no-slides", class: "w3-center",
                i { class: "fas fa-exclamation-circle w3-text-red fa-9x" }
                h3 { class: "w3-center", "No Images uploaded to the server." }
            }
        },
        SlideView::Image {
            src,
            fading_out,
            fading_in,
        } => {
            let mut slide_class = String::from("slide");
            if view.fit_cover {
                slide_class.push_str(" fit-cover");
            }
            if *fading_out {
                slide_class.push_str(" fade-out");
            }
            if *fading_in {
                slide_class.push_str(" fade-in");
            }
            let src = src.clone();
            rsx! {
                img { id: "slide-img", class: "{slide_class}", src: "{src}" }
            }
        }
    };
    rsx! {
        div { class: "frame-info",
            h1 { id: "frame-clock", class: "w3-jumbo", "{view.clock}" }
            h3 { id: "frame-date", "{view.date}" }
        }
        div { id: "stage", class: "stage", {stage} }
    }
}

fn fetch_placeholder(label: &str, icon_size: &str) -> Element {
    let icon_class = format!("fas fa-exclamation-circle w3-text-red {icon_size}");
    rsx! {
        i { class: "{icon_class}" }
        h3 { "{label}" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::FetchError;
    use crate::payloads::{
        EnergyReading, ForecastDay, LocationPayload, NodeStats, Notification, PiholeStatus,
        PowerReading, SensorReading, TempReading, TimePayload,
    };
    use std::collections::BTreeMap;

    fn solar_fixture(grid: &str, battery: &str, usage: f64, solar: f64) -> SolarPayload {
        SolarPayload {
            power: PowerReading {
                datetime: "2021-11-05T09:25:40".into(),
                solar_power: solar,
                grid_power: 1.0,
                power_usage: usage,
                battery_charge: 88.0,
                battery_status: battery.into(),
                battery_critical: false,
                solar_status: "Active".into(),
                grid_status: grid.into(),
            },
            energy: EnergyReading {
                date: "2021-11-05".into(),
                production: 12345.0,
                consumption: 9876.0,
                exported: 4000.0,
                imported: 1531.0,
            },
            update_late: false,
        }
    }

    fn weather_fixture() -> WeatherPayload {
        WeatherPayload {
            status: "Clouds".into(),
            detailed_status: "Broken Clouds".into(),
            icon: "http://openweathermap.org/img/wn/04d@2x.png".into(),
            temp: TempReading {
                temp: 71.2,
                feels_like: 69.3,
            },
            forecast: vec![ForecastDay {
                day: "Sat 08/09".into(),
                temp_min: 55,
                temp_max: 72,
                status: "Clear".into(),
                icon: "http://openweathermap.org/img/wn/01d.png".into(),
            }],
            bg_color: "w3-blue".into(),
        }
    }

    #[test]
    fn solar_flow_reports_grid_exchange() {
        let html = render_solar(&Snapshot::Ready(solar_fixture("Active", "Active", 2.0, 2.0)));
        assert!(html.contains("Current Status: 1.00 kW from GRID"));
        assert!(html.contains("fa-long-arrow-alt-left"));
        assert!(html.contains("fa-broadcast-tower"));
        assert!(html.contains("Total: 12.3kWh"));
        assert!(html.contains("Current: 2.00kW"));
        assert!(html.contains("Net: 2.47 kWh"));
        assert!(html.contains("Charge: 88%"));
        assert!(html.contains("Data Updated: 2021-11-05 09:25:40"));

        let html = render_solar(&Snapshot::Ready(solar_fixture("Active", "Active", 1.0, 3.0)));
        assert!(html.contains("Current Status: 1.00 kW to GRID"));
        assert!(html.contains("fa-long-arrow-alt-right"));

        let html = render_solar(&Snapshot::Ready(solar_fixture("Inactive", "Active", 1.0, 0.0)));
        assert!(html.contains("Current Status: Battery"));
        assert!(html.contains("fa-battery-half"));

        let html = render_solar(&Snapshot::Ready(solar_fixture("Inactive", "Inactive", 1.0, 0.0)));
        assert!(html.contains("Current Status: Powerloss."));
        assert!(html.contains("fa-times"));
    }

    #[test]
    fn failed_panels_render_exactly_one_placeholder() {
        let html = render_solar(&Snapshot::Failed(FetchError::Transport("timed out".into())));
        assert!(html.contains("Could not fetch solar data"));
        assert_eq!(html.matches("fa-exclamation-circle").count(), 1);

        let html = render_sensor(&Snapshot::Failed(FetchError::Status(
            500,
            "Internal Server Error".into(),
        )));
        assert!(html.contains("Could not fetch sensor data"));
        assert_eq!(html.matches("fa-exclamation-circle").count(), 1);

        let html = render_network(&Snapshot::Failed(FetchError::Decode("bad json".into())));
        assert!(html.contains("Could not fetch network data"));
        assert_eq!(html.matches("fa-exclamation-circle").count(), 1);

        let html = render_stats(&Snapshot::Failed(FetchError::Transport("refused".into())));
        assert!(html.contains("Could not fetch stats data"));
        assert!(html.contains("fa-7x"));
        assert_eq!(html.matches("fa-exclamation-circle").count(), 1);
    }

    #[test]
    fn stats_tables_show_metrics_and_staleness() {
        let mut metrics = BTreeMap::new();
        metrics.insert("CPU Usage".to_string(), "12.5%".to_string());
        metrics.insert("Disk".to_string(), "12 GB / 59 GB (21.3%)".to_string());
        let mut stats = StatsPayload::new();
        stats.insert(
            "mainnode".into(),
            NodeStats {
                updated: "2021-11-05T09:25:40".into(),
                update_late: true,
                metrics,
            },
        );
        let html = render_stats(&Snapshot::Ready(stats));
        assert!(html.contains("mainnode"));
        assert!(html.contains("CPU Usage"));
        assert!(html.contains("12.5%"));
        assert!(html.contains("Updated: 2021-11-05 09:25:40"));
        assert!(html.contains("w3-text-red"));
        assert!(!html.contains("update_late"));
    }

    #[test]
    fn sensor_cells_color_by_temperature() {
        let mut sensors = SensorPayload::new();
        sensors.insert(
            "Attic".into(),
            SensorReading {
                updated: "2021-11-05T09:25:40".into(),
                icon_class: "fas fa-igloo fa-7x".into(),
                temperature: 95.25,
                humidity: 41.2,
                update_late: false,
            },
        );
        let html = render_sensor(&Snapshot::Ready(sensors));
        assert!(html.contains("Attic"));
        assert!(html.contains("fas fa-igloo fa-7x w3-text-red"));
        assert!(html.contains("Temperature: 95.2\u{b0}F"));
        assert!(html.contains("Humidity: 41.2%"));
    }

    #[test]
    fn network_cells_list_wan_then_piholes() {
        let mut piholes = BTreeMap::new();
        piholes.insert(
            "pihole".to_string(),
            PiholeStatus {
                status: "Enabled".into(),
                queries: 1000,
                blocked: 50,
                ads: 5.5,
                clients: 10,
                icon: "fas fa-shield-alt fa-7x w3-text-green".into(),
            },
        );
        let payload = NetworkPayload {
            wan_status: "Connected".into(),
            ip: "203.0.113.7".into(),
            wan_icon: "fas fa-wifi fa-7x w3-text-green".into(),
            piholes,
        };
        let html = render_network(&Snapshot::Ready(payload));
        assert!(html.contains("Network"));
        assert!(html.contains("Status: Connected"));
        assert!(html.contains("IP: 203.0.113.7"));
        assert!(html.contains("Queries Blocked: 5.5%"));
        assert!(html.contains("fa-shield-alt"));
    }

    #[test]
    fn clock_column_renders_weather_and_quote() {
        let group = ClockGroup {
            time: Some(TimePayload {
                time: "9:25 AM".into(),
            }),
            location: Snapshot::Ready(LocationPayload {
                city: "Portland".into(),
                region: "Oregon".into(),
                latitude: "45.52".into(),
                longitude: "-122.68".into(),
            }),
            weather: Some(weather_fixture()),
            quote: Snapshot::Ready(QuotePayload {
                title: "Quote of the Day".into(),
                quote: "Stay curious.".into(),
                author: "Anonymous".into(),
                datetime: "2021-11-05T00:00:01".into(),
                update_late: false,
            }),
        };
        let html = render_clock(&Snapshot::Ready(group));
        assert!(html.contains("9:25 AM"));
        assert!(html.contains("Portland, Oregon"));
        assert!(html.contains("Broken Clouds"));
        // 71.2 rounds up to 72, which lands in the green bucket.
        assert!(html.contains("72\u{b0}F"));
        assert!(html.contains("w3-text-green"));
        assert!(html.contains("Feels Like 70\u{b0}F"));
        assert!(html.contains("Sat 08/09"));
        assert!(html.contains("Stay curious."));
        assert!(html.contains("- Anonymous"));
        assert!(html.contains("Data Updated: 2021-11-05 00:00:01"));
    }

    #[test]
    fn failed_location_blanks_weather_and_forecast() {
        let group = ClockGroup {
            time: Some(TimePayload {
                time: "9:25 AM".into(),
            }),
            location: Snapshot::Failed(FetchError::Transport("no route".into())),
            weather: Some(weather_fixture()),
            quote: Snapshot::Failed(FetchError::Status(500, "Internal Server Error".into())),
        };
        let html = render_clock(&Snapshot::Ready(group));
        assert!(html.contains("???????"));
        assert!(!html.contains("Broken Clouds"));
        assert!(!html.contains("Sat 08/09"));
        // One icon for the weather area, one for the quote box.
        assert_eq!(html.matches("fa-exclamation-circle").count(), 2);
    }

    #[test]
    fn notification_rows_bind_dismissal_data() {
        let payload = NotificationsPayload {
            notifications: vec![Notification {
                datetime: "2021-11-05T09:25:40".into(),
                node: "sensor1".into(),
                app: "watchdog".into(),
                kind: "warning".into(),
                msg: "Service restarted".into(),
                display_datetime: "11/05/2021 9:25 AM".into(),
                real_datetime: "20211105_092540000000".into(),
            }],
            displayed: 1,
            total: 14,
        };
        let html = render_notifications(&Snapshot::Ready(payload), true);
        assert!(html.contains("Displaying 1 of 14 Notifications"));
        assert!(html.contains("data-datetime=\"20211105_092540000000\""));
        assert!(html.contains("data-node=\"sensor1\""));
        assert!(html.contains("data-app=\"watchdog\""));
        assert!(html.contains("sensor1.watchdog"));
        assert!(html.contains("w3-text-red"));
        assert!(html.contains("display: block"));
        assert!(html.contains("Clear All"));

        let html = render_notifications(&Snapshot::Ready(NotificationsPayload::default()), false);
        assert!(html.contains("Displaying 0 of 0 Notifications"));
        assert!(!html.contains("w3-text-red"));
        assert!(html.contains("display: none"));
    }

    #[test]
    fn alert_fragment_covers_both_modals() {
        let html = render_alert(&ModalState {
            reboot_pending: true,
            error: None,
        });
        assert!(html.contains("Rebooting"));
        assert!(!html.contains("ERROR MESSAGE"));

        let html = render_alert(&ModalState {
            reboot_pending: false,
            error: Some((502, "Bad Gateway".into())),
        });
        assert!(html.contains("An error occured while performing your request."));
        assert!(html.contains("502 - Bad Gateway"));
        assert!(html.contains("data-error-dismiss"));

        let html = render_alert(&ModalState::default());
        assert!(!html.contains("modal-card"));
    }

    #[test]
    fn frame_fragment_tracks_the_slide_phase() {
        let view = FrameView {
            slide: SlideView::Placeholder,
            fit_cover: false,
            clock: "1:05 PM".into(),
            date: "Friday, November 5".into(),
        };
        let html = render_frame_panel(&view);
        assert!(html.contains("No Images uploaded to the server."));
        assert_eq!(html.matches("fa-exclamation-circle").count(), 1);

        let view = FrameView {
            slide: SlideView::Image {
                src: "http://10.0.0.2:8000/media/slides/a.jpg".into(),
                fading_out: true,
                fading_in: false,
            },
            fit_cover: true,
            clock: "1:05 PM".into(),
            date: "Friday, November 5".into(),
        };
        let html = render_frame_panel(&view);
        assert!(html.contains("src=\"http://10.0.0.2:8000/media/slides/a.jpg\""));
        assert!(html.contains("fade-out"));
        assert!(html.contains("fit-cover"));
        assert!(!html.contains("fade-in"));
        assert!(html.contains("1:05 PM"));
    }

    #[test]
    fn dashboard_page_carries_every_fragment_container() {
        let view = DashboardView {
            stats: Snapshot::Empty,
            solar: Snapshot::Empty,
            sensor: Snapshot::Empty,
            network: Snapshot::Empty,
            clock: Snapshot::Empty,
            notifications: Snapshot::Empty,
            drawer_open: false,
            modals: ModalState::default(),
            intervals: PanelIntervals {
                stats: 60,
                solar: 60,
                sensor: 60,
                network: 60,
                clock: 30,
                notifications: 30,
            },
        };
        let html = render_dashboard(&view);
        for panel in [
            "clock", "stats", "solar", "sensor", "network", "notifications", "alert",
        ] {
            assert!(
                html.contains(&format!("data-panel=\"{panel}\"")),
                "missing container for {panel}"
            );
        }
        assert!(html.contains("data-interval=\"60\""));
        assert!(html.contains("data-interval=\"30\""));
        assert!(html.contains("/api/reboot"));
        assert!(html.contains("Are you sure you want to reboot the system? Data loss may occur."));
        assert!(html.contains("w3.css"));
        assert!(html.contains("/show/slides"));
    }

    #[test]
    fn frame_page_polls_with_the_viewport() {
        let view = FrameView {
            slide: SlideView::Empty,
            fit_cover: false,
            clock: "1:05 PM".into(),
            date: "Friday, November 5".into(),
        };
        let html = render_frame(&view);
        assert!(html.contains("data-panel=\"frame\""));
        assert!(html.contains("data-viewport=\"1\""));
        assert!(html.contains("animation-duration: 2000ms"));
        assert!(html.contains(&format!("width: {INFO_WIDTH}px")));
        assert!(html.contains("href=\"/\""));
    }
}
