//! Per-frame detection stages: color segmentation and the two shape
//! classifiers.
//!
//! ```
//! use arena_vision_core::ColorFrame;
//! use arena_vision_detect::{segment, BallClassifier, PipelineParams};
//! use arena_vision_geometry::NativeGeometry;
//!
//! let params = PipelineParams::default();
//! let frame = ColorFrame::filled(64, 48, [0, 0, 0]);
//! let mask = segment(&frame, &params.ball_color);
//! let out = BallClassifier::new(params.ball).classify(&NativeGeometry, &mask);
//! assert!(out.balls.is_empty());
//! ```

mod ball;
mod params;
mod segment;
mod wall;

pub use ball::{BallClassification, BallClassifier, BallReport};
pub use params::{
    BallClassifierParams, ColorClassParams, ConfigError, PipelineParams, PreprocessParams,
    WallClassifierParams,
};
pub use segment::{segment, smooth};
pub use wall::{WallClassification, WallClassifier, WallReport};
