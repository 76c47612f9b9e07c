use clockwork::canvas::FontFamily;
use clockwork::chimes::FailurePolicy;
use clockwork::face::FaceText;
use clockwork::surface::{REFERENCE_DIAMETER, Surface, SurfaceError};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FaceConfig {
    pub font: String,
    pub maker: String,
    pub location: String,
    pub legend: String,
}

impl Default for FaceConfig {
    fn default() -> Self {
        let text = FaceText::default();
        Self {
            font: text.font.to_string(),
            maker: text.maker,
            location: text.location,
            legend: text.legend,
        }
    }
}

impl From<FaceConfig> for FaceText {
    fn from(face: FaceConfig) -> Self {
        Self {
            font: FontFamily::new(face.font),
            maker: face.maker,
            location: face.location,
            legend: face.legend,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ChimeConfig {
    pub enabled: bool,
    /// Directory holding the clip files. Defaults to `audio/` in the data
    /// directory.
    pub directory: Option<PathBuf>,
    #[serde_as(as = "DisplayFromStr")]
    pub on_error: FailurePolicy,
}

impl Default for ChimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: None,
            on_error: FailurePolicy::default(),
        }
    }
}

impl ChimeConfig {
    pub fn audio_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().join("audio")),
        }
    }

    /// Whether switching to `other` needs the clips opened again. The
    /// failure policy applies to the open set as it is.
    pub fn needs_reopen(&self, other: &ChimeConfig) -> bool {
        self.enabled != other.enabled || self.directory != other.directory
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub diameter: f64,
    pub face: FaceConfig,
    pub chimes: ChimeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            diameter: REFERENCE_DIAMETER,
            face: FaceConfig::default(),
            chimes: ChimeConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(self) -> Result<Self, ConfigError> {
        Surface::validate(self.diameter)?;
        Ok(self)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Diameter(#[from] SurfaceError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("org", "sds", "dudley").ok_or(ConfigError::ConfigDirNotFound)
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("DUDLEY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    s.try_deserialize::<Config>()?.validate()
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_from(&get_config_path()?)
}

pub fn load_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

fn watch_dir(
    dir: &Path,
    bridge_tx: Sender<notify::Result<notify::Event>>,
) -> Result<RecommendedWatcher, ConfigError> {
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    // dropping the watcher ends the stream
    let _watcher = match watch_dir(&config_dir, bridge_tx) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to watch config directory: {}", e);
            return;
        }
    };

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_policy_deserialization() {
        let cases = vec![
            (r#"{"on_error": "halt"}"#, FailurePolicy::Halt),
            (r#"{"on_error": "HALT"}"#, FailurePolicy::Halt),
            (r#"{"on_error": "Silence"}"#, FailurePolicy::Silence),
            (r#"{}"#, FailurePolicy::Silence),
        ];

        for (json, expected) in cases {
            let deserialized: ChimeConfig = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized.on_error, expected);
        }
        assert!(serde_json::from_str::<ChimeConfig>(r#"{"on_error": "retry"}"#).is_err());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"diameter": 320.0}"#).unwrap();
        assert_eq!(config.diameter, 320.0);
        assert_eq!(config.face, FaceConfig::default());
        assert!(config.chimes.enabled);
        assert_eq!(config.chimes.directory, None);
    }

    #[test]
    fn test_face_config_becomes_face_text() {
        let config: Config = serde_json::from_str(
            r#"{"face": {"maker": "J . SMITH", "font": "Serif"}}"#,
        )
        .unwrap();
        let text: FaceText = config.face.into();
        assert_eq!(text.maker, "J . SMITH");
        assert_eq!(text.font.as_str(), "Serif");
        assert_eq!(text.location, FaceText::default().location);
    }

    #[test]
    fn test_invalid_diameter_is_rejected() {
        for diameter in ["0.0", "-50.0"] {
            let config: Config =
                serde_json::from_str(&format!(r#"{{"diameter": {diameter}}}"#)).unwrap();
            assert!(matches!(config.validate(), Err(ConfigError::Diameter(_))));
        }
    }

    #[test]
    fn test_default_config_file_matches_defaults() {
        let parsed: Config = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_clip_changes_need_reopen() {
        let current = ChimeConfig::default();
        let halting = ChimeConfig {
            on_error: FailurePolicy::Halt,
            ..ChimeConfig::default()
        };
        assert!(!current.needs_reopen(&halting));

        let disabled = ChimeConfig {
            enabled: false,
            ..ChimeConfig::default()
        };
        assert!(current.needs_reopen(&disabled));

        let moved = ChimeConfig {
            directory: Some(PathBuf::from("/opt/chimes")),
            ..ChimeConfig::default()
        };
        assert!(current.needs_reopen(&moved));
    }

    #[test]
    fn test_explicit_audio_directory_wins() {
        let chimes = ChimeConfig {
            directory: Some(PathBuf::from("/opt/chimes")),
            ..ChimeConfig::default()
        };
        assert_eq!(chimes.audio_dir().unwrap(), PathBuf::from("/opt/chimes"));
    }
}
