use std::collections::BTreeMap;

use serde::Deserialize;

// Wire shapes for the aggregation backend. Everything defaults so a panel
// still renders when the backend omits a field; maps are BTreeMaps so the
// rendered order is stable.

pub type StatsPayload = BTreeMap<String, NodeStats>;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NodeStats {
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub update_late: bool,
    // Remaining keys are display-ready metric strings, e.g.
    // "CPU Temperature" -> "48.3° C".
    #[serde(flatten)]
    pub metrics: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolarPayload {
    pub power: PowerReading,
    pub energy: EnergyReading,
    pub update_late: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PowerReading {
    pub datetime: String,
    pub solar_power: f64,
    pub grid_power: f64,
    pub power_usage: f64,
    pub battery_charge: f64,
    pub battery_status: String,
    pub battery_critical: bool,
    pub solar_status: String,
    pub grid_status: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnergyReading {
    pub date: String,
    pub production: f64,
    pub consumption: f64,
    #[serde(rename = "export")]
    pub exported: f64,
    #[serde(rename = "import")]
    pub imported: f64,
}

pub type SensorPayload = BTreeMap<String, SensorReading>;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SensorReading {
    pub updated: String,
    #[serde(rename = "icon-class")]
    pub icon_class: String,
    pub temperature: f64,
    pub humidity: f64,
    pub update_late: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NetworkPayload {
    pub wan_status: String,
    pub ip: String,
    pub wan_icon: String,
    pub piholes: BTreeMap<String, PiholeStatus>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PiholeStatus {
    pub status: String,
    pub queries: i64,
    pub blocked: i64,
    pub ads: f64,
    pub clients: i64,
    pub icon: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimePayload {
    pub time: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocationPayload {
    pub city: String,
    pub region: String,
    pub latitude: String,
    pub longitude: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeatherPayload {
    pub status: String,
    pub detailed_status: String,
    pub icon: String,
    pub temp: TempReading,
    pub forecast: Vec<ForecastDay>,
    pub bg_color: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TempReading {
    pub temp: f64,
    pub feels_like: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastDay {
    pub day: String,
    pub temp_min: i64,
    pub temp_max: i64,
    pub status: String,
    pub icon: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuotePayload {
    pub title: String,
    pub quote: String,
    pub author: String,
    pub datetime: String,
    pub update_late: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NotificationsPayload {
    pub notifications: Vec<Notification>,
    pub displayed: i64,
    pub total: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Notification {
    pub datetime: String,
    pub node: String,
    pub app: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub msg: String,
    pub display_datetime: String,
    pub real_datetime: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImagePayload {
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_metrics_flatten_past_the_named_fields() {
        let raw = r#"{
            "mainnode": {
                "updated": "2021-11-05T09:25:40",
                "update_late": false,
                "CPU Temperature": "48.3° C",
                "CPU Usage": "12.5%",
                "Disk": "12 GB / 59 GB (21.3%)",
                "Uptime": "Up 3 Days, 2:11"
            }
        }"#;
        let stats: StatsPayload = serde_json::from_str(raw).unwrap();
        let node = &stats["mainnode"];
        assert_eq!(node.updated, "2021-11-05T09:25:40");
        assert!(!node.update_late);
        assert_eq!(node.metrics.len(), 4);
        assert_eq!(node.metrics["CPU Usage"], "12.5%");
        assert!(!node.metrics.contains_key("updated"));
    }

    #[test]
    fn solar_payload_reads_renamed_energy_fields() {
        let raw = r#"{
            "power": {
                "datetime": "2021-11-05T09:25:40",
                "solar_power": 1.5,
                "grid_power": 0.25,
                "power_usage": 1.75,
                "battery_charge": 88,
                "battery_status": "Active",
                "battery_critical": false,
                "solar_status": "Active",
                "grid_status": "Active"
            },
            "energy": {
                "date": "2021-11-05",
                "production": 12345.0,
                "consumption": 9876.0,
                "export": 4000.0,
                "import": 1531.0
            },
            "update_late": true
        }"#;
        let solar: SolarPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(solar.power.battery_charge, 88.0);
        assert_eq!(solar.energy.exported, 4000.0);
        assert_eq!(solar.energy.imported, 1531.0);
        assert!(solar.update_late);
    }

    #[test]
    fn sensor_payload_keeps_the_dashed_icon_key() {
        let raw = r#"{
            "Upstairs": {
                "updated": "2021-11-05T09:25:40",
                "icon-class": "fas fa-sort-amount-up-alt fa-7x",
                "temperature": 72.18,
                "humidity": 41.25,
                "update_late": true
            }
        }"#;
        let sensors: SensorPayload = serde_json::from_str(raw).unwrap();
        let upstairs = &sensors["Upstairs"];
        assert_eq!(upstairs.icon_class, "fas fa-sort-amount-up-alt fa-7x");
        assert!(upstairs.update_late);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let network: NetworkPayload = serde_json::from_str(r#"{"wan_status": "Connected"}"#).unwrap();
        assert_eq!(network.wan_status, "Connected");
        assert_eq!(network.ip, "");
        assert!(network.piholes.is_empty());

        let notifications: NotificationsPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(notifications.displayed, 0);
        assert!(notifications.notifications.is_empty());

        let image: ImagePayload = serde_json::from_str(r#"{"image": null}"#).unwrap();
        assert_eq!(image.image, None);
    }

    #[test]
    fn notification_rows_carry_both_datetime_forms() {
        let raw = r#"{
            "notifications": [{
                "datetime": "2021-11-05T09:25:40",
                "node": "sensor1",
                "app": "watchdog",
                "type": "warning",
                "msg": "Service restarted",
                "display_datetime": "11/05/2021 9:25 AM",
                "real_datetime": "20211105_092540000000"
            }],
            "displayed": 1,
            "total": 14
        }"#;
        let payload: NotificationsPayload = serde_json::from_str(raw).unwrap();
        let row = &payload.notifications[0];
        assert_eq!(row.kind, "warning");
        assert_eq!(row.real_datetime, "20211105_092540000000");
        assert_eq!(payload.total, 14);
    }
}
