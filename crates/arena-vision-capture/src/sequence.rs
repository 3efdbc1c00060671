use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use arena_vision_core::ColorFrame;
use image::imageops::FilterType;
use image::RgbImage;

use crate::{CaptureConfig, CaptureDevice, CaptureError};

const DEFAULT_FPS: f32 = 30.0;

enum Input {
    Files(Vec<PathBuf>),
    Frames(Vec<ColorFrame>),
}

/// Camera stand-in that replays still images in a loop at a fixed rate.
///
/// Files are decoded and resized to the configured resolution when the
/// device is opened. In-memory frames are replayed as given.
pub struct ImageSequenceDevice {
    input: Input,
    frame_interval: Duration,
    frames: Vec<ColorFrame>,
    next: usize,
    last_capture: Option<Instant>,
}

impl ImageSequenceDevice {
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::with_input(Input::Files(paths.into_iter().map(Into::into).collect()))
    }

    pub fn from_frames(frames: Vec<ColorFrame>) -> Self {
        Self::with_input(Input::Frames(frames))
    }

    fn with_input(input: Input) -> Self {
        Self {
            input,
            frame_interval: Duration::from_secs_f32(1.0 / DEFAULT_FPS),
            frames: Vec::new(),
            next: 0,
            last_capture: None,
        }
    }

    /// Replay rate; non-positive values replay as fast as frames are taken.
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.frame_interval = if fps > 0.0 && fps.is_finite() {
            Duration::from_secs_f32(1.0 / fps)
        } else {
            Duration::ZERO
        };
        self
    }

    pub fn is_open(&self) -> bool {
        !self.frames.is_empty()
    }
}

/// Decode an image file at its native resolution.
pub fn read_frame(path: impl AsRef<Path>) -> Result<ColorFrame, CaptureError> {
    Ok(rgb_to_frame(image::open(path.as_ref())?.to_rgb8()))
}

/// Decode an image file into a frame of the requested size.
pub fn load_frame(
    path: impl AsRef<Path>,
    width: usize,
    height: usize,
) -> Result<ColorFrame, CaptureError> {
    let rgb = image::open(path.as_ref())?.to_rgb8();
    Ok(rgb_to_frame(resize_to(rgb, width, height)))
}

fn resize_to(rgb: RgbImage, width: usize, height: usize) -> RgbImage {
    if rgb.width() as usize == width && rgb.height() as usize == height {
        rgb
    } else {
        image::imageops::resize(&rgb, width as u32, height as u32, FilterType::Triangle)
    }
}

fn rgb_to_frame(rgb: RgbImage) -> ColorFrame {
    let (w, h) = (rgb.width() as usize, rgb.height() as usize);
    ColorFrame {
        width: w,
        height: h,
        data: rgb.into_raw(),
    }
}

impl CaptureDevice for ImageSequenceDevice {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CaptureError> {
        let frames = match &self.input {
            Input::Files(paths) => paths
                .iter()
                .map(|p| {
                    load_frame(p, config.width, config.height).map_err(|e| {
                        CaptureError::DeviceUnavailable(format!("{}: {e}", p.display()))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Input::Frames(frames) => frames.clone(),
        };
        if frames.is_empty() {
            return Err(CaptureError::DeviceUnavailable(
                "image sequence is empty".to_string(),
            ));
        }
        log::debug!("image sequence opened with {} frames", frames.len());
        self.frames = frames;
        self.next = 0;
        self.last_capture = None;
        Ok(())
    }

    fn close(&mut self) {
        self.frames.clear();
    }

    fn blocking_capture(&mut self) -> Result<ColorFrame, CaptureError> {
        if self.frames.is_empty() {
            return Err(CaptureError::Capture("device is not open".to_string()));
        }
        if let Some(last) = self.last_capture {
            let due = last + self.frame_interval;
            let now = Instant::now();
            if due > now {
                std::thread::sleep(due - now);
            }
        }
        self.last_capture = Some(Instant::now());

        let frame = self.frames[self.next].clone();
        self.next = (self.next + 1) % self.frames.len();
        Ok(frame)
    }
}
