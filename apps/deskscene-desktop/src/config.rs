use deskscene_scene::LampRig;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("mouse sensitivity must be positive, got {0}")]
    Sensitivity(f32),
}

/// Viewer settings read from an optional YAML file.
///
/// Missing fields fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub texture_dir: PathBuf,
    pub clear_color: [f64; 4],
    /// World positions of the three scene lights.
    pub light_positions: [Vec3; 3],
    pub mouse_sensitivity: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Desk Scene".to_string(),
            texture_dir: PathBuf::from("textures"),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            light_positions: default_light_positions(),
            mouse_sensitivity: deskscene_view::camera::MOUSE_SENSITIVITY,
        }
    }
}

/// Key light above the camera, fill light to the right, and the desk lamp's bulb.
fn default_light_positions() -> [Vec3; 3] {
    let bulb = LampRig::default().solve().bulb;
    [Vec3::new(0.0, 10.0, 8.0), Vec3::new(10.0, 6.0, -4.0), bulb]
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mouse_sensitivity.is_nan() || self.mouse_sensitivity <= 0.0 {
            return Err(ConfigError::Sensitivity(self.mouse_sensitivity));
        }
        Ok(())
    }
}
