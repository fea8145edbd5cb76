//! Optional `settings.json` next to the executable. Every field has a
//! default, so a missing or partial file still yields a working config.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory the relative asset names below are resolved against.
    pub assets_dir: PathBuf,
    pub hit_sound: String,
    pub miss_sound: String,
    pub font: String,
    /// 0.0..=1.0, applied on top of the per-cue gains.
    pub master_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            hit_sound: "hit.wav".to_string(),
            miss_sound: "miss.wav".to_string(),
            font: "font.ttf".to_string(),
            master_volume: 1.0,
        }
    }
}

impl Settings {
    /// Reads settings from `path`, falling back to defaults if the file is
    /// absent or unparseable. A broken settings file should never keep the
    /// game from starting.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Settings::default(),
        };
        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("ignoring invalid settings file {}: {err}", path.display());
                Settings::default()
            }
        }
    }

    pub fn hit_sound_path(&self) -> PathBuf {
        self.assets_dir.join(&self.hit_sound)
    }

    pub fn miss_sound_path(&self) -> PathBuf {
        self.assets_dir.join(&self.miss_sound)
    }

    pub fn font_path(&self) -> PathBuf {
        self.assets_dir.join(&self.font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "assets_dir": "data", "master_volume": 0.5 }"#).unwrap();
        assert_eq!(settings.assets_dir, PathBuf::from("data"));
        assert_eq!(settings.master_volume, 0.5);
        assert_eq!(settings.hit_sound, "hit.wav");
        assert_eq!(settings.hit_sound_path(), PathBuf::from("data/hit.wav"));
    }
}
