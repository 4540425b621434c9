use crate::gui::menu::{ActionHandler, ActionId, LayoutParams, MenuBlueprint, MenuItem, PanelSet};
use crate::gui::menu::item::IconRef;
use directories::ProjectDirs;
use handyctl::desktop::{self, AppInfo, AppQuery};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// How the pointer drives the menu. One mode is active per deployment.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    /// Open, point, click.
    #[default]
    #[strum(to_string = "click")]
    Click,
    /// Hold the trigger, point, release over an item.
    #[strum(to_string = "press-release", serialize = "hold")]
    PressRelease,
}

/// One configured menu entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemConfig {
    pub title: String,
    pub icon: Option<IconRef>,
    pub action: ActionId,
    /// `.desktop` file or executable handed to the action.
    pub path: Option<PathBuf>,
    /// Installed application to resolve into `path` (and a default icon).
    pub app: Option<AppQuery>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub interaction: InteractionMode,
    #[serde(default)]
    pub layout: LayoutParams,
    #[serde(default)]
    pub radial: Vec<ItemConfig>,
    #[serde(default)]
    pub strip: Vec<ItemConfig>,
    #[serde(default)]
    pub grid: Vec<ItemConfig>,
}

impl Config {
    /// Turns the configured entries into menu items bound to `handler`.
    pub fn blueprint(&self, handler: &Rc<dyn ActionHandler>) -> MenuBlueprint {
        let build = |items: &[ItemConfig]| -> Vec<MenuItem> {
            items.iter().map(|cfg| cfg.to_item(handler.clone())).collect()
        };
        MenuBlueprint {
            layout: self.layout,
            items: PanelSet {
                radial: build(&self.radial),
                strip: build(&self.strip),
                grid: build(&self.grid),
            },
        }
    }
}

impl ItemConfig {
    fn to_item(&self, handler: Rc<dyn ActionHandler>) -> MenuItem {
        let resolved = self.resolve_app();
        let path = self
            .path
            .clone()
            .or_else(|| resolved.as_ref().map(|app| app.path.clone()));
        let icon = self.icon.clone().or_else(|| {
            resolved
                .as_ref()
                .filter(|app| !app.icon.as_os_str().is_empty())
                .map(|app| IconRef::new(app.icon.to_string_lossy()))
        });

        MenuItem {
            title: self.title.clone(),
            icon,
            action: self.action.clone(),
            app_path: path,
            handler,
        }
    }

    fn resolve_app(&self) -> Option<AppInfo> {
        if let Some(query) = &self.app {
            let found = desktop::find_desktop_entry(query);
            if found.is_none() {
                log::warn!("No desktop entry matches '{}' for item '{}'", query, self.title);
            }
            return found;
        }
        // only look up icons for bare paths that need one
        match (&self.path, &self.icon) {
            (Some(path), None) => AppInfo::from_path(path),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "handy", "handy").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&get_config_path()?)
}

fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("HANDY"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// The configuration shipped with the binary.
pub fn default_config() -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads the user's configuration, writing the default one on first run.
/// Falls back to the built-in defaults when the file cannot be used.
pub fn load_or_setup() -> Config {
    let loaded = write_default_config().and_then(|path| load_config_from(&path));
    match loaded {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            default_config().unwrap_or_default()
        }
    }
}

pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = get_config_path()?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
        log::info!("Wrote default configuration to {}", path.display());
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::{Receiver, Sender};

fn watch_dir(
    config_dir: &Path,
) -> Result<(RecommendedWatcher, Receiver<notify::Result<notify::Event>>), ConfigError> {
    fs_err::create_dir_all(config_dir)?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(config_dir, RecursiveMode::NonRecursive)?;

    Ok((watcher, bridge_rx))
}

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent() else {
        return;
    };

    // the watcher stops when dropped
    let (_watcher, bridge_rx) = match watch_dir(config_dir) {
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
    use crate::gui::menu::Invocation;

    struct Noop;

    impl ActionHandler for Noop {
        fn invoke(&self, _: &Invocation<'_>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn interaction_mode_deserialization() {
        let cases = vec![
            ("\"click\"", InteractionMode::Click),
            ("\"Click\"", InteractionMode::Click),
            ("\"press-release\"", InteractionMode::PressRelease),
            ("\"PRESS-RELEASE\"", InteractionMode::PressRelease),
            ("\"hold\"", InteractionMode::PressRelease),
        ];

        for (json, expected) in cases {
            let deserialized: InteractionMode = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert!(serde_json::from_str::<InteractionMode>("\"drag\"").is_err());
        assert_eq!(InteractionMode::PressRelease.to_string(), "press-release");
    }

    #[test]
    fn item_optional_fields() {
        let item: ItemConfig =
            serde_json::from_str(r#"{"title": "Copy", "action": "copy"}"#).unwrap();
        assert_eq!(item.action.as_str(), "copy");
        assert!(item.icon.is_none() && item.path.is_none() && item.app.is_none());

        let missing_action = serde_json::from_str::<ItemConfig>(r#"{"title": "Copy"}"#);
        assert!(missing_action.is_err());
    }

    #[test]
    fn config_defaults_when_sections_missing() {
        let config: Config = serde_json::from_str(r#"{"interaction": "hold"}"#).unwrap();
        assert_eq!(config.interaction, InteractionMode::PressRelease);
        assert_eq!(config.layout, LayoutParams::default());
        assert!(config.radial.is_empty());
    }

    #[test]
    fn embedded_default_config() {
        let config = default_config().unwrap();
        assert_eq!(config.interaction, InteractionMode::Click);
        assert_eq!(config.radial.len(), 8);
        assert_eq!(config.radial[0].action.as_str(), "copy");
        assert_eq!(config.grid.len(), 5);
        assert!(config.strip.iter().all(|i| i.app.is_some()));
        assert_eq!(config.layout.radial.outer_radius, 120.0);
    }

    #[test]
    fn blueprint_keeps_order_and_paths() {
        let config: Config = serde_json::from_str(
            r#"{
                "radial": [
                    {"title": "Copy", "action": "copy", "icon": "edit-copy"},
                    {"title": "Paste", "action": "paste"}
                ],
                "grid": [
                    {"title": "Tool", "action": "launch", "icon": "x", "path": "/opt/tool"}
                ]
            }"#,
        )
        .unwrap();
        let handler: Rc<dyn ActionHandler> = Rc::new(Noop);
        let blueprint = config.blueprint(&handler);

        let titles: Vec<_> = blueprint.items.radial.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Copy", "Paste"]);
        assert_eq!(blueprint.items.radial[0].icon, Some(IconRef::new("edit-copy")));
        assert!(blueprint.items.strip.is_empty());
        assert_eq!(
            blueprint.items.grid[0].app_path.as_deref(),
            Some(Path::new("/opt/tool"))
        );
    }
}
