//! Viewer configuration resource.
//!
//! Settings loaded from an INI configuration file. Defaults are used for
//! anything the file does not set.
//!
//! # Configuration File Format
//!
//! ```ini
//! [content]
//! root = assets
//! atlas = atlas.xml
//! animation = walk
//!
//! [window]
//! width = 1280
//! height = 720
//! target_fps = 60
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

const DEFAULT_CONTENT_ROOT: &str = "assets";
const DEFAULT_ATLAS_FILE: &str = "atlas.xml";
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory atlas files and textures are resolved against.
    pub content_root: PathBuf,
    /// Atlas description, relative to `content_root`.
    pub atlas_file: PathBuf,
    /// Animation to play on startup. `None` shows every region instead.
    pub animation: Option<String>,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            content_root: PathBuf::from(DEFAULT_CONTENT_ROOT),
            atlas_file: PathBuf::from(DEFAULT_ATLAS_FILE),
            animation: None,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);

        info!(
            "Loaded config: content={:?}, atlas={:?}, animation={:?}, {}x{} window, fps={}",
            self.content_root,
            self.atlas_file,
            self.animation,
            self.window_width,
            self.window_height,
            self.target_fps
        );
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [content] section
        if let Some(root) = config.get("content", "root") {
            self.content_root = PathBuf::from(root);
        }
        if let Some(atlas) = config.get("content", "atlas") {
            self.atlas_file = PathBuf::from(atlas);
        }
        if let Some(animation) = config.get("content", "animation") {
            self.animation = Some(animation).filter(|a| !a.is_empty());
        }

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
    }

    /// Save configuration to the INI file.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set(
            "content",
            "root",
            Some(self.content_root.display().to_string()),
        );
        config.set(
            "content",
            "atlas",
            Some(self.atlas_file.display().to_string()),
        );
        config.set("content", "animation", self.animation.clone());

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    /// Full path of the atlas description.
    pub fn atlas_path(&self) -> PathBuf {
        self.content_root.join(&self.atlas_file)
    }
}
