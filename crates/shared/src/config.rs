//! Application configuration.
//!
//! Defaults are compiled in. `from_env` applies optional overrides captured
//! at build time (`WORKOUT_MAP_TILE_URL`, `WORKOUT_MAP_ZOOM`,
//! `WORKOUT_MAP_LOG`); an override that does not parse is ignored.

use serde::{Deserialize, Serialize};

use crate::storage::DEFAULT_STORAGE_KEY;

const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
const DEFAULT_ATTRIBUTION: &str = "© OpenStreetMap contributors";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// localStorage key holding the workout list.
    pub storage_key: String,
    pub map: MapConfig,
    /// Minimum log level: trace, debug, info, warn or error.
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub tile_url: String,
    pub attribution: String,
    /// Zoom used when centring on the user and when moving to a workout.
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Duration of the move-to-workout animation, in seconds.
    pub pan_duration_secs: f64,
    pub popup_max_width: u32,
    pub popup_max_height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            map: MapConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
            zoom: 13,
            min_zoom: 2,
            max_zoom: 18,
            pan_duration_secs: 1.5,
            popup_max_width: 250,
            popup_max_height: 100,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::default().with_overrides(
            option_env!("WORKOUT_MAP_TILE_URL"),
            option_env!("WORKOUT_MAP_ZOOM"),
            option_env!("WORKOUT_MAP_LOG"),
        )
    }

    fn with_overrides(
        mut self,
        tile_url: Option<&str>,
        zoom: Option<&str>,
        log_level: Option<&str>,
    ) -> Self {
        if let Some(url) = tile_url.filter(|u| u.contains("{z}")) {
            self.map.tile_url = url.to_string();
        }
        if let Some(z) = zoom.and_then(|z| z.trim().parse::<u8>().ok()) {
            self.map.zoom = z;
        }
        if let Some(level) = log_level.filter(|l| !l.trim().is_empty()) {
            self.log_level = level.trim().to_lowercase();
        }
        self.map.zoom = self.map.clamp_zoom(self.map.zoom);
        self
    }
}

impl MapConfig {
    pub fn clamp_zoom(&self, zoom: u8) -> u8 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    pub fn pan_duration_ms(&self) -> u32 {
        (self.pan_duration_secs * 1000.0).round() as u32
    }
}
