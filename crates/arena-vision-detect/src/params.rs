use std::path::Path;

use arena_vision_core::Channel;
use arena_vision_geometry::{HoughCircleParams, HoughLineParams};
use serde::{Deserialize, Serialize};

/// Errors raised while loading [`PipelineParams`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Dominant-channel color class.
///
/// A pixel belongs to the class when its `dominant` channel is at least
/// `threshold` and exceeds each other channel by at least `disparity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorClassParams {
    pub dominant: Channel,
    pub disparity: u8,
    pub threshold: u8,
}

impl ColorClassParams {
    /// Red balls.
    pub fn ball_default() -> Self {
        Self {
            dominant: Channel::Red,
            disparity: 25,
            threshold: 10,
        }
    }

    /// Blue walls.
    pub fn wall_default() -> Self {
        Self {
            dominant: Channel::Blue,
            disparity: 100,
            threshold: 60,
        }
    }
}

/// Smoothing applied to the frame before segmentation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessParams {
    /// Box blur radius per channel (window `2r + 1`); `0` disables it.
    pub blur_radius: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallClassifierParams {
    /// Contours with fewer points are discarded before fitting.
    pub min_contour_points: usize,
    /// Fitted ellipses at or below this eccentricity are accepted as balls.
    pub eccentricity_threshold: f32,
    pub hough: HoughCircleParams,
}

impl Default for BallClassifierParams {
    fn default() -> Self {
        Self {
            min_contour_points: 21,
            eccentricity_threshold: 0.1,
            hough: HoughCircleParams::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallClassifierParams {
    /// Contours with fewer points are not filled into the line raster.
    pub min_contour_points: usize,
    pub hough: HoughLineParams,
}

impl Default for WallClassifierParams {
    fn default() -> Self {
        Self {
            min_contour_points: 50,
            hough: HoughLineParams::default(),
        }
    }
}

/// Every tuning constant of one detection cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub preprocess: PreprocessParams,
    pub ball_color: ColorClassParams,
    pub wall_color: ColorClassParams,
    pub ball: BallClassifierParams,
    pub wall: WallClassifierParams,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            preprocess: PreprocessParams::default(),
            ball_color: ColorClassParams::ball_default(),
            wall_color: ColorClassParams::wall_default(),
            ball: BallClassifierParams::default(),
            wall: WallClassifierParams::default(),
        }
    }
}

impl PipelineParams {
    /// Load parameters from JSON; absent fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn with_blur_radius(mut self, radius: u32) -> Self {
        self.preprocess.blur_radius = radius;
        self
    }
}
