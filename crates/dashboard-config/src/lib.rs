use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_DASHBOARD_CONFIG: &str = "DASHBOARD_CONFIG";

const DEFAULT_CENTER_LAT: f64 = 23.8103;
const DEFAULT_CENTER_LNG: f64 = 90.4125;
const DEFAULT_MAP_ZOOM: u8 = 13;
const DEFAULT_FOCUS_ZOOM: u8 = 15;
const MAX_MAP_ZOOM: u8 = 19;
const DEFAULT_NARROW_VIEWPORT_PX: u32 = 768;
const DEFAULT_MUTATION_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TOAST_DISPLAY_MS: u64 = 3000;
const DEFAULT_TOAST_FADE_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Message(String),
}

impl ConfigError {
    fn configuration(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub map: MapConfigToml,
    #[serde(default)]
    pub mutation: MutationConfigToml,
    #[serde(default)]
    pub notifications: NotificationConfigToml,
}

/// How table rows are paired with map markers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrategy {
    /// Pair by shared complaint identifier.
    #[default]
    Identifier,
    /// Pair the n-th row with the n-th marker.
    Positional,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapConfigToml {
    #[serde(default = "default_center_lat")]
    pub default_center_lat: f64,
    #[serde(default = "default_center_lng")]
    pub default_center_lng: f64,
    #[serde(default = "default_map_zoom")]
    pub default_zoom: u8,
    #[serde(default = "default_focus_zoom")]
    pub focus_zoom: u8,
    #[serde(default = "default_narrow_viewport_px")]
    pub narrow_viewport_px: u32,
    #[serde(default)]
    pub correlation: CorrelationStrategy,
}

impl Default for MapConfigToml {
    fn default() -> Self {
        Self {
            default_center_lat: default_center_lat(),
            default_center_lng: default_center_lng(),
            default_zoom: default_map_zoom(),
            focus_zoom: default_focus_zoom(),
            narrow_viewport_px: default_narrow_viewport_px(),
            correlation: CorrelationStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MutationConfigToml {
    #[serde(default = "default_mutation_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for MutationConfigToml {
    fn default() -> Self {
        Self {
            base_url: default_mutation_base_url(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationConfigToml {
    #[serde(default = "default_toast_display_ms")]
    pub display_ms: u64,
    #[serde(default = "default_toast_fade_ms")]
    pub fade_ms: u64,
}

impl Default for NotificationConfigToml {
    fn default() -> Self {
        Self {
            display_ms: default_toast_display_ms(),
            fade_ms: default_toast_fade_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapViewConfig {
    pub default_center: (f64, f64),
    pub default_zoom: u8,
    pub focus_zoom: u8,
    pub narrow_viewport_px: u32,
    pub correlation: CorrelationStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRuntimeConfig {
    pub base_url: String,
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTiming {
    pub display: Duration,
    pub fade: Duration,
}

impl DashboardConfig {
    pub fn map_view(&self) -> MapViewConfig {
        MapViewConfig {
            default_center: (self.map.default_center_lat, self.map.default_center_lng),
            default_zoom: self.map.default_zoom,
            focus_zoom: self.map.focus_zoom,
            narrow_viewport_px: self.map.narrow_viewport_px,
            correlation: self.map.correlation,
        }
    }

    pub fn mutation_runtime(&self) -> MutationRuntimeConfig {
        MutationRuntimeConfig {
            base_url: self.mutation.base_url.clone(),
            request_timeout: self
                .mutation
                .request_timeout_secs
                .map(Duration::from_secs),
        }
    }

    pub fn notification_timing(&self) -> NotificationTiming {
        NotificationTiming {
            display: Duration::from_millis(self.notifications.display_ms),
            fade: Duration::from_millis(self.notifications.fade_ms),
        }
    }
}

pub fn load_from_env() -> Result<DashboardConfig, ConfigError> {
    let path = config_path_from_env()?;
    load_from_path(path)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<DashboardConfig, ConfigError> {
    load_or_create_config(path.as_ref())
}

/// Parses configuration text without touching the filesystem.
pub fn parse_config(raw: &str) -> Result<DashboardConfig, ConfigError> {
    let mut config: DashboardConfig = toml::from_str(raw).map_err(|err| {
        ConfigError::configuration(format!("Failed to parse DASHBOARD_CONFIG: {err}"))
    })?;
    normalize_config(&mut config);
    Ok(config)
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let home = resolve_home_dir().ok_or_else(|| {
        ConfigError::configuration("Unable to resolve home directory from HOME or USERPROFILE")
    })?;

    Ok(home
        .join(".config")
        .join("complaint-dashboard")
        .join("config.toml"))
}

fn config_path_from_env() -> Result<PathBuf, ConfigError> {
    match std::env::var(ENV_DASHBOARD_CONFIG) {
        Ok(raw) => {
            if raw.trim().is_empty() {
                default_config_path()
            } else {
                Ok(raw.into())
            }
        }
        Err(std::env::VarError::NotPresent) => default_config_path(),
        Err(_) => Err(ConfigError::configuration(
            "DASHBOARD_CONFIG contained invalid UTF-8",
        )),
    }
}

fn resolve_home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| {
            std::env::var("USERPROFILE")
                .ok()
                .filter(|value| !value.trim().is_empty())
        })
        .map(PathBuf::from)
}

fn default_center_lat() -> f64 {
    DEFAULT_CENTER_LAT
}

fn default_center_lng() -> f64 {
    DEFAULT_CENTER_LNG
}

fn default_map_zoom() -> u8 {
    DEFAULT_MAP_ZOOM
}

fn default_focus_zoom() -> u8 {
    DEFAULT_FOCUS_ZOOM
}

fn default_narrow_viewport_px() -> u32 {
    DEFAULT_NARROW_VIEWPORT_PX
}

fn default_mutation_base_url() -> String {
    DEFAULT_MUTATION_BASE_URL.to_owned()
}

fn default_toast_display_ms() -> u64 {
    DEFAULT_TOAST_DISPLAY_MS
}

fn default_toast_fade_ms() -> u64 {
    DEFAULT_TOAST_FADE_MS
}

fn persist_config(path: &Path, config: &DashboardConfig) -> Result<(), ConfigError> {
    let rendered = toml::to_string_pretty(config).map_err(|err| {
        ConfigError::configuration(format!(
            "Failed to serialize DASHBOARD_CONFIG for {}: {err}",
            path.display()
        ))
    })?;

    std::fs::write(path, rendered.as_bytes()).map_err(|err| {
        ConfigError::configuration(format!(
            "Failed to write DASHBOARD_CONFIG to {}: {err}",
            path.display()
        ))
    })
}

fn load_or_create_config(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|err| {
                        ConfigError::configuration(format!(
                            "Failed to create parent directory {} for DASHBOARD_CONFIG: {err}",
                            parent.display()
                        ))
                    })?;
                }
            }

            let default_config = DashboardConfig::default();
            persist_config(path, &default_config)?;
            return Ok(default_config);
        }
        Err(err) => {
            return Err(ConfigError::configuration(format!(
                "Failed to read DASHBOARD_CONFIG from {}: {err}",
                path.display()
            )));
        }
    };

    let mut config: DashboardConfig = toml::from_str(&raw).map_err(|err| {
        ConfigError::configuration(format!(
            "Failed to parse DASHBOARD_CONFIG from {}: {err}",
            path.display()
        ))
    })?;

    let changed = normalize_config(&mut config);
    if changed {
        persist_config(path, &config)?;
    }

    Ok(config)
}

fn normalize_config(config: &mut DashboardConfig) -> bool {
    let mut changed = false;

    let center_valid = config.map.default_center_lat.is_finite()
        && config.map.default_center_lng.is_finite()
        && (-90.0..=90.0).contains(&config.map.default_center_lat)
        && (-180.0..=180.0).contains(&config.map.default_center_lng);
    if !center_valid {
        config.map.default_center_lat = default_center_lat();
        config.map.default_center_lng = default_center_lng();
        changed = true;
    }
    changed |= normalize_zoom(&mut config.map.default_zoom, DEFAULT_MAP_ZOOM);
    changed |= normalize_zoom(&mut config.map.focus_zoom, DEFAULT_FOCUS_ZOOM);
    if config.map.narrow_viewport_px == 0 {
        config.map.narrow_viewport_px = default_narrow_viewport_px();
        changed = true;
    }

    let trimmed = config.mutation.base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        config.mutation.base_url = default_mutation_base_url();
        changed = true;
    } else if trimmed != config.mutation.base_url {
        config.mutation.base_url = trimmed.to_owned();
        changed = true;
    }
    if config.mutation.request_timeout_secs == Some(0) {
        config.mutation.request_timeout_secs = None;
        changed = true;
    }

    if config.notifications.display_ms == 0 {
        config.notifications.display_ms = default_toast_display_ms();
        changed = true;
    }

    changed
}

fn normalize_zoom(value: &mut u8, fallback: u8) -> bool {
    if *value == 0 || *value > MAX_MAP_ZOOM {
        *value = fallback;
        return true;
    }
    false
}
