use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bounding_box: BoundingBoxConfig,
    pub bridges: Vec<BridgeConfig>,
    pub bridge_sequence: Vec<String>,
    pub target_bridges: Vec<String>,
    pub special_bridge: String,
    pub distances: DistanceConfig,
    pub timers: TimerConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBoxConfig {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBoxConfig {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat.is_finite()
            && lon.is_finite()
            && lat <= self.north
            && lat >= self.south
            && lon <= self.east
            && lon >= self.west
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub radius_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceConfig {
    pub under_bridge_m: f64,
    pub approach_m: f64,
    pub approaching_m: f64,
    /// Fallback gap distance used when two bridges have no configured gap entry.
    pub default_gap_m: f64,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            under_bridge_m: 50.0,
            approach_m: 300.0,
            approaching_m: 500.0,
            default_gap_m: 800.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    pub recent_passage_ms: u64,
    pub bridge_text_debounce_ms: u64,
    pub gps_jump_cooldown_ms: u64,
    pub coordination_window_ms: u64,
    pub stale_vessel_ms: u64,
    pub synthetic_hold_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            recent_passage_ms: 60_000,
            bridge_text_debounce_ms: 2_000,
            gps_jump_cooldown_ms: 5_000,
            coordination_window_ms: 10_000,
            stale_vessel_ms: 60 * 60 * 1000,
            synthetic_hold_ms: 30_000,
        }
    }
}

impl TimerConfig {
    pub fn recent_passage(&self) -> Duration {
        Duration::from_millis(self.recent_passage_ms)
    }
    pub fn bridge_text_debounce(&self) -> Duration {
        Duration::from_millis(self.bridge_text_debounce_ms)
    }
    pub fn gps_jump_cooldown(&self) -> Duration {
        Duration::from_millis(self.gps_jump_cooldown_ms)
    }
    pub fn coordination_window(&self) -> Duration {
        Duration::from_millis(self.coordination_window_ms)
    }
    pub fn stale_vessel(&self) -> Duration {
        Duration::from_millis(self.stale_vessel_ms)
    }
    pub fn synthetic_hold(&self) -> Duration {
        Duration::from_millis(self.synthetic_hold_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory where log files will be stored
    pub directory: String,
    /// Log file name prefix (date will be appended)
    pub file_prefix: String,
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: "./logs".to_string(),
            file_prefix: "bridge_monitor".to_string(),
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Canonical Trollhättan canal segment: five bridges, Klaffbron and
    /// Stridsbergsbron as the two openable target bridges, Stallbackabron
    /// as the non-opening special bridge in between.
    pub fn default() -> Self {
        Config {
            bounding_box: BoundingBoxConfig {
                north: 58.30,
                south: 58.25,
                east: 12.35,
                west: 12.25,
            },
            bridges: vec![
                BridgeConfig {
                    id: "klaffbron".to_string(),
                    name: "Klaffbron".to_string(),
                    lat: 58.2758,
                    lon: 12.2939,
                    radius_m: 50.0,
                },
                BridgeConfig {
                    id: "jarnvagsbron".to_string(),
                    name: "Järnvägsbron".to_string(),
                    lat: 58.2801,
                    lon: 12.2912,
                    radius_m: 50.0,
                },
                BridgeConfig {
                    id: "olidebron".to_string(),
                    name: "Olidebron".to_string(),
                    lat: 58.2850,
                    lon: 12.2890,
                    radius_m: 50.0,
                },
                BridgeConfig {
                    id: "stallbackabron".to_string(),
                    name: "Stallbackabron".to_string(),
                    lat: 58.2930,
                    lon: 12.2850,
                    radius_m: 50.0,
                },
                BridgeConfig {
                    id: "stridsbergsbron".to_string(),
                    name: "Stridsbergsbron".to_string(),
                    lat: 58.2990,
                    lon: 12.2800,
                    radius_m: 50.0,
                },
            ],
            bridge_sequence: vec![
                "klaffbron".to_string(),
                "jarnvagsbron".to_string(),
                "olidebron".to_string(),
                "stallbackabron".to_string(),
                "stridsbergsbron".to_string(),
            ],
            target_bridges: vec!["Klaffbron".to_string(), "Stridsbergsbron".to_string()],
            special_bridge: "Stallbackabron".to_string(),
            distances: DistanceConfig::default(),
            timers: TimerConfig::default(),
            logging: LogConfig::default(),
        }
    }
}
