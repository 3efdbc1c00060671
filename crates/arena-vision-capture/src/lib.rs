//! Frame acquisition for the arena-vision pipeline.
//!
//! A [`FrameSource`] owns a [`CaptureDevice`] running on a background thread
//! and publishes every frame as an immutable [`FrameSnapshot`]. Readers swap
//! in the latest snapshot under a short read lock, so they can never see a
//! frame that is still being written.

mod config;
mod device;
mod sequence;
mod source;

pub use config::CaptureConfig;
pub use device::{CaptureDevice, CaptureError};
pub use sequence::{load_frame, read_frame, ImageSequenceDevice};
pub use source::{FrameSnapshot, FrameSource, CAPTURE_THREAD_NAME};
