use arena_vision_core::ColorFrame;

use crate::CaptureConfig;

#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("capture failed: {0}")]
    Capture(String),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("frame is {got_width}x{got_height}, expected {width}x{height}")]
    FrameSize {
        width: usize,
        height: usize,
        got_width: usize,
        got_height: usize,
    },
    #[error("failed to spawn capture thread: {0}")]
    Spawn(String),
}

/// Blocking frame producer driven by the capture thread.
///
/// All three methods are called from the capture thread only, so backends
/// with thread affinity can open their handles in `open`.
pub trait CaptureDevice: Send {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CaptureError>;

    /// Release the device; a no-op when it is not open.
    fn close(&mut self);

    /// Block until the next frame is available.
    fn blocking_capture(&mut self) -> Result<ColorFrame, CaptureError>;
}

impl<D: CaptureDevice + ?Sized> CaptureDevice for Box<D> {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CaptureError> {
        (**self).open(config)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn blocking_capture(&mut self) -> Result<ColorFrame, CaptureError> {
        (**self).blocking_capture()
    }
}
