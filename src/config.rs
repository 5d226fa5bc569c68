use std::env;

pub struct AppConfig {
    pub backend_base_url: String,
    pub http_bind: String,
    pub stats_interval_secs: u64,
    pub solar_interval_secs: u64,
    pub sensor_interval_secs: u64,
    pub network_interval_secs: u64,
    pub clock_interval_secs: u64,
    pub notify_interval_secs: u64,
    pub slide_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            backend_base_url: trim_base(env_var("BACKEND_BASE_URL", "http://127.0.0.1:8000")),
            http_bind: env_var("HTTP_BIND", "0.0.0.0:8080"),
            stats_interval_secs: env_var("STATS_INTERVAL", "60").parse().unwrap_or(60),
            solar_interval_secs: env_var("SOLAR_INTERVAL", "60").parse().unwrap_or(60),
            sensor_interval_secs: env_var("SENSOR_INTERVAL", "60").parse().unwrap_or(60),
            network_interval_secs: env_var("NETWORK_INTERVAL", "60").parse().unwrap_or(60),
            clock_interval_secs: env_var("CLOCK_INTERVAL", "30").parse().unwrap_or(30),
            notify_interval_secs: env_var("NOTIFY_INTERVAL", "30").parse().unwrap_or(30),
            slide_interval_secs: env_var("SLIDE_INTERVAL", "30").parse().unwrap_or(30),
            request_timeout_secs: env_var("REQUEST_TIMEOUT", "10").parse().unwrap_or(10),
        }
    }
}

fn env_var(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
