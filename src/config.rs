use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_fps_cap")]
    pub fps_cap: u32,

    #[serde(default = "default_animations_enabled")]
    pub animations_enabled: bool,

    #[serde(default = "default_initial_goal")]
    pub initial_goal: i32,

    #[serde(default = "default_window")]
    pub window: WindowConfig,

    /// Styled attributes of the bar, read through `style::StyledAttributes`.
    #[serde(default)]
    pub goal_bar: toml::Table,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_anchor")]
    pub anchor: Anchor,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_background")]
    pub background: String,

    #[serde(default = "default_margins")]
    pub margins: Margins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps_cap: default_fps_cap(),
            animations_enabled: default_animations_enabled(),
            initial_goal: default_initial_goal(),
            window: default_window(),
            goal_bar: toml::Table::new(),
        }
    }
}

fn default_window() -> WindowConfig {
    WindowConfig {
        anchor: default_anchor(),
        width: default_width(),
        height: default_height(),
        background: default_background(),
        margins: default_margins(),
    }
}

fn default_anchor() -> Anchor {
    Anchor::TopRight
}

fn default_width() -> u32 {
    320
}

fn default_height() -> u32 {
    40
}

fn default_margins() -> Margins {
    Margins {
        top: 8,
        right: 8,
        bottom: 8,
        left: 8,
    }
}

fn default_background() -> String {
    "#1a1a1a".to_string()
}

fn default_fps_cap() -> u32 {
    60
}

fn default_animations_enabled() -> bool {
    true
}

fn default_initial_goal() -> i32 {
    50
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not find config directory"))?;
        Ok(config_dir.join("goalbar").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            Self::parse(&contents)
        } else {
            Ok(Config::default())
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::path()?;
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Milliseconds to sleep between frames.
    pub fn frame_interval_ms(&self) -> u64 {
        1000 / u64::from(self.fps_cap.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.window.width, 320);
        assert_eq!(config.window.anchor, Anchor::TopRight);
        assert_eq!(config.fps_cap, 60);
        assert!(config.animations_enabled);
        assert_eq!(config.initial_goal, 50);
        assert!(config.goal_bar.is_empty());
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config = Config::parse(
            r##"
            fps_cap = 30
            animations_enabled = false

            [window]
            anchor = "BottomLeft"
            height = 24

            [goal_bar]
            bar_thickness = 6
            indicator_type = "circle"
            "##,
        )
        .unwrap();
        assert_eq!(config.frame_interval_ms(), 33);
        assert!(!config.animations_enabled);
        assert_eq!(config.window.anchor, Anchor::BottomLeft);
        assert_eq!(config.window.height, 24);
        assert_eq!(config.window.width, 320);
        assert_eq!(config.window.margins, default_margins());
        assert_eq!(config.goal_bar.len(), 2);
    }

    #[test]
    fn config_survives_serialization() {
        let mut config = Config::default();
        config.goal_bar.insert("bar_thickness".into(), toml::Value::Integer(9));
        let text = toml::to_string_pretty(&config).unwrap();
        let back = Config::parse(&text).unwrap();
        assert_eq!(back.goal_bar, config.goal_bar);
        assert_eq!(back.window.background, "#1a1a1a");
    }

    #[test]
    fn zero_fps_cap_does_not_divide_by_zero() {
        let config = Config {
            fps_cap: 0,
            ..Config::default()
        };
        assert_eq!(config.frame_interval_ms(), 1000);
    }
}
