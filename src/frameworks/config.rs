use std::{env, time::Duration};

// Runtime constants (not animation tuning).

pub fn view_url() -> String {
    env::var("VIEW_URL").unwrap_or_else(|_| "http://127.0.0.1:8080/view".to_string())
}

pub fn reconnect_delay() -> Duration {
    Duration::from_millis(env_parse("RECONNECT_DELAY_MS", 500))
}

pub fn http_timeout() -> Duration {
    Duration::from_millis(env_parse("HTTP_TIMEOUT_MS", 5000))
}

/// Initial viewport in CSS pixels.
pub fn view_size() -> (f64, f64) {
    (env_parse("VIEW_WIDTH", 1280.0), env_parse("VIEW_HEIGHT", 720.0))
}

pub fn pixel_ratio() -> f64 {
    env_parse("PIXEL_RATIO", 2.0)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

pub const COMMAND_CHANNEL_CAPACITY: usize = 1024;
pub const TICK_INTERVAL: Duration = Duration::from_millis(17);
