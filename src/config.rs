use crate::dial::{DEFAULT_INSET, VALUE_MIN};
use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// An sRGB color written as `#rrggbb` in the config file.
#[derive(Debug, Clone, Copy, PartialEq, DeserializeFromStr, SerializeDisplay)]
pub struct HexColor(pub Srgb<u8>);

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(Srgb::new(r, g, b))
    }

    pub fn to_linear(self) -> palette::LinSrgb<f64> {
        self.0.into_format::<f64>().into_linear()
    }
}

impl FromStr for HexColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Srgb<u8>>()
            .map(Self)
            .map_err(|_| ConfigError::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.0.into_components();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

pub fn default_gradient() -> Vec<HexColor> {
    vec![
        HexColor::new(0xff, 0x3b, 0x30), // red
        HexColor::new(0xff, 0x95, 0x00), // orange
        HexColor::new(0xff, 0xcc, 0x00), // yellow
        HexColor::new(0x34, 0xc7, 0x59), // green
        HexColor::new(0x00, 0x7a, 0xff), // blue
        HexColor::new(0xaf, 0x52, 0xde), // purple
        HexColor::new(0xff, 0x3b, 0x30), // red
    ]
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DialConfig {
    pub size: i32,
    pub inset: f64,
    pub stroke_width: f64,
    pub knob_radius: f64,
    pub grab_anywhere: bool,
    pub track_opacity: f64,
    pub initial_value: f64,
    pub gradient: Vec<HexColor>,
    pub knob_color: HexColor,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            size: 300,
            inset: DEFAULT_INSET,
            stroke_width: 20.0,
            knob_radius: 15.0,
            grab_anywhere: false,
            track_opacity: 0.3,
            initial_value: VALUE_MIN,
            gradient: default_gradient(),
            knob_color: HexColor::new(0xff, 0xff, 0xff),
        }
    }
}

fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

impl DialConfig {
    /// Pulls user-supplied numbers back into something drawable.
    /// Non-finite numbers fall back to their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.size = self.size.max(1);
        self.inset = finite_or(self.inset, defaults.inset).max(0.0);
        self.stroke_width = finite_or(self.stroke_width, defaults.stroke_width).max(0.0);
        self.knob_radius = finite_or(self.knob_radius, defaults.knob_radius).max(0.0);
        self.track_opacity =
            finite_or(self.track_opacity, defaults.track_opacity).clamp(0.0, 1.0);
        if self.initial_value.is_nan() {
            self.initial_value = defaults.initial_value;
        }
        if self.gradient.is_empty() {
            self.gradient = defaults.gradient;
        }
        self
    }

    /// How close to the knob a press must land to start a drag.
    pub fn hit_radius(&self) -> f64 {
        if self.grab_anywhere {
            f64::INFINITY
        } else {
            self.knob_radius
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub socket: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            socket: PathBuf::from("/tmp/dial.sock"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub dial: DialConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "dial", "dial").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("DIAL")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

fn finish(builder: Builder) -> Result<Config, ConfigError> {
    let config: Config = builder.build()?.try_deserialize()?;
    Ok(Config {
        dial: config.dial.sanitized(),
        server: config.server,
    })
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    finish(
        config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(env_source()),
    )
}

/// Parses TOML text without touching the environment.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    finish(config::Config::builder().add_source(config::File::from_str(
        toml,
        config::FileFormat::Toml,
    )))
}

pub fn load_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        log::warn!("Using default configuration: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = get_config_path()?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

fn is_config_change(event: &Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

/// Sends `AppEvent::ConfigReload` whenever the config file changes. Returns
/// when the receiving side goes away.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    if let Err(e) = watch_config(tx).await {
        log::error!("Config watcher stopped: {}", e);
    }
}

async fn watch_config(tx: Sender<AppEvent>) -> Result<(), ConfigError> {
    let config_path = get_config_path()?;
    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .ok_or(ConfigError::ConfigDirNotFound)?;
    fs_err::create_dir_all(&config_dir)?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if is_config_change(&event, &config_path) => {
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind};

    #[test]
    fn test_hex_color_parsing() {
        let cases = vec![
            ("\"#ff0000\"", HexColor::new(0xff, 0, 0)),
            ("\"00ff00\"", HexColor::new(0, 0xff, 0)),
            ("\"#800080\"", HexColor::new(0x80, 0, 0x80)),
        ];

        for (json, expected) in cases {
            let deserialized: HexColor = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }

        assert!(serde_json::from_str::<HexColor>("\"#nothex\"").is_err());
        assert_eq!(
            serde_json::to_string(&HexColor::new(0xaf, 0x52, 0xde)).unwrap(),
            "\"#af52de\""
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.dial.gradient.len(), 7);
        assert_eq!(config.dial.gradient.first(), config.dial.gradient.last());
    }

    #[test]
    fn test_partial_config_overrides() {
        let config = parse_config(
            r##"
[dial]
stroke_width = 12.5
grab_anywhere = true
gradient = ["#000000", "#ffffff"]

[server]
socket = "/run/user/1000/dial.sock"
"##,
        )
        .unwrap();

        assert_eq!(config.dial.stroke_width, 12.5);
        assert_eq!(config.dial.knob_radius, 15.0);
        assert_eq!(config.dial.hit_radius(), f64::INFINITY);
        assert_eq!(config.dial.gradient.len(), 2);
        assert_eq!(config.server.socket, PathBuf::from("/run/user/1000/dial.sock"));
    }

    #[test]
    fn test_bad_values_are_sanitized() {
        let config = parse_config(
            r#"
[dial]
size = -4
stroke_width = -1.0
track_opacity = 7.0
gradient = []
"#,
        )
        .unwrap();

        assert_eq!(config.dial.size, 1);
        assert_eq!(config.dial.stroke_width, 0.0);
        assert_eq!(config.dial.track_opacity, 1.0);
        assert_eq!(config.dial.gradient, default_gradient());
    }

    #[test]
    fn test_non_finite_values_fall_back_to_defaults() {
        let config = DialConfig {
            track_opacity: f64::NAN,
            stroke_width: f64::INFINITY,
            knob_radius: f64::NAN,
            inset: f64::NEG_INFINITY,
            initial_value: f64::NAN,
            ..DialConfig::default()
        }
        .sanitized();

        assert_eq!(config, DialConfig::default());
    }

    #[test]
    fn test_nan_opacity_in_toml_is_sanitized() {
        let config = parse_config("[dial]\ntrack_opacity = nan\n").unwrap();
        assert_eq!(config.dial.track_opacity, 0.3);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        assert!(parse_config("[dial]\nknob_color = \"white\"\n").is_err());
    }

    #[test]
    fn test_bundled_default_config_parses() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_change_filter() {
        let path = PathBuf::from("/home/u/.config/dial/config.toml");
        let touched = Event::new(EventKind::Create(CreateKind::File)).add_path(path.clone());
        let other = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/home/u/.config/dial/other.toml"));
        let read = Event::new(EventKind::Access(AccessKind::Any)).add_path(path.clone());

        assert!(is_config_change(&touched, &path));
        assert!(!is_config_change(&other, &path));
        assert!(!is_config_change(&read, &path));
    }
}
