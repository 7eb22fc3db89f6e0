//! Viewer options, loadable from a TOML file. Every field has a default, so a
//! file only needs the keys it changes.

use std::path::Path;

use glam::Vec4;
use log::info;
use serde::{Deserialize, Serialize};

use crate::controller::{ControllerSettings, MAX_SCALE, MIN_SCALE};
use crate::error::{Result, ViewerError};
use crate::render::{
    Light, RenderSettings, CLEAR_COLOR, FAR_PLANE, FIELD_OF_VIEW_DEGREES, NEAR_PLANE, PULL_BACK,
};
use crate::trackball::TRACKBALL_RADIUS;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub projection: ProjectionConfig,
    pub interaction: InteractionConfig,
    pub lighting: LightingConfig,
    pub render: RenderConfig,
    pub pacing: PacingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "molview".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance the camera steps back from the pivot.
    pub pull_back: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: FIELD_OF_VIEW_DEGREES,
            near: NEAR_PLANE,
            far: FAR_PLANE,
            pull_back: PULL_BACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    pub trackball_radius: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            trackball_radius: TRACKBALL_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub position: [f32; 4],
}

impl Default for LightingConfig {
    fn default() -> Self {
        let light = Light::default();
        Self {
            ambient: light.ambient,
            diffuse: light.diffuse,
            specular: light.specular,
            position: light.position.to_array(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f32; 4],
    pub bond_color: [f32; 3],
    pub sphere_segments: u32,
    pub sphere_rings: u32,
    pub vsync: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: CLEAR_COLOR,
            bond_color: [0.8, 0.8, 0.8],
            sphere_segments: 30,
            sphere_rings: 30,
            vsync: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Frames per second to cap at; 0 renders as fast as events arrive.
    pub target_fps: u32,
}

impl ViewerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ViewerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let projection = &self.projection;
        if !(projection.fov_y_degrees > 0.0 && projection.fov_y_degrees < 180.0) {
            return Err(ViewerError::Config(format!(
                "fov_y_degrees must lie in (0, 180), got {}",
                projection.fov_y_degrees
            )));
        }
        if !(projection.near > 0.0 && projection.near < projection.far) {
            return Err(ViewerError::Config(format!(
                "near plane {} must be positive and closer than far plane {}",
                projection.near, projection.far
            )));
        }
        let interaction = &self.interaction;
        if !(interaction.min_scale > 0.0 && interaction.min_scale < interaction.max_scale) {
            return Err(ViewerError::Config(format!(
                "scale bounds [{}, {}] are not a positive, non-empty range",
                interaction.min_scale, interaction.max_scale
            )));
        }
        if !(interaction.trackball_radius > 0.0 && interaction.trackball_radius.is_finite()) {
            return Err(ViewerError::Config(format!(
                "trackball_radius must be positive and finite, got {}",
                interaction.trackball_radius
            )));
        }
        if !(projection.pull_back > 0.0 && projection.pull_back.is_finite()) {
            return Err(ViewerError::Config(format!(
                "pull_back must be positive and finite, got {}",
                projection.pull_back
            )));
        }
        if self.render.sphere_segments < 3 || self.render.sphere_rings < 2 {
            return Err(ViewerError::Config(
                "spheres need at least 3 segments and 2 rings".to_string(),
            ));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ViewerError::Config(
                "window width and height must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            min_scale: self.interaction.min_scale,
            max_scale: self.interaction.max_scale,
            trackball_radius: self.interaction.trackball_radius,
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            fov_y_degrees: self.projection.fov_y_degrees,
            near: self.projection.near,
            far: self.projection.far,
            pull_back: self.projection.pull_back,
            clear_color: self.render.clear_color,
            light: Light {
                ambient: self.lighting.ambient,
                diffuse: self.lighting.diffuse,
                specular: self.lighting.specular,
                position: Vec4::from_array(self.lighting.position),
            },
        }
    }
}
