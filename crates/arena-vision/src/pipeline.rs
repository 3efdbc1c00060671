use arena_vision_capture::{CaptureConfig, CaptureDevice, FrameSource};
use arena_vision_core::{ColorFrame, DetectionSet};
use arena_vision_detect::PipelineParams;
use arena_vision_geometry::{Geometry, NativeGeometry};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Detector, PipelineError};

/// Capture thread plus detector, driven one [`tick`](Pipeline::tick) at a time
/// by the caller.
#[derive(Debug)]
pub struct Pipeline<G = NativeGeometry> {
    source: FrameSource,
    detector: Detector<G>,
    ticks: u64,
}

impl Pipeline<NativeGeometry> {
    /// Start capturing from `device` at the default 640x480.
    pub fn start<D>(device: D, params: PipelineParams) -> Result<Self, PipelineError>
    where
        D: CaptureDevice + 'static,
    {
        Self::start_with_config(device, CaptureConfig::default(), params)
    }

    pub fn start_with_config<D>(
        device: D,
        capture: CaptureConfig,
        params: PipelineParams,
    ) -> Result<Self, PipelineError>
    where
        D: CaptureDevice + 'static,
    {
        let source = FrameSource::start(device, capture)?;
        Ok(Self::with_source(source, NativeGeometry, params))
    }
}

impl<G: Geometry> Pipeline<G> {
    /// Assemble a pipeline around an already running source.
    pub fn with_source(source: FrameSource, geometry: G, params: PipelineParams) -> Self {
        Self {
            source,
            detector: Detector::with_geometry(geometry, params),
            ticks: 0,
        }
    }

    /// Run one cycle on the latest captured frame.
    ///
    /// Does not wait for a new frame: the same frame may be processed twice,
    /// and before the first capture this returns an empty set with no
    /// sequence number.
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip(self), fields(tick = self.ticks)))]
    pub fn tick(&mut self) -> DetectionSet {
        self.ticks += 1;
        let Some(snapshot) = self.source.current_frame() else {
            log::debug!("tick {}: no frame available yet", self.ticks);
            return DetectionSet::empty();
        };
        let mut set = self.detector.process(&snapshot.frame);
        set.frame_sequence = Some(snapshot.sequence);
        log::debug!(
            "tick {}: frame {} -> {} balls, {} walls",
            self.ticks,
            snapshot.sequence,
            set.balls.len(),
            set.walls.len()
        );
        set
    }

    /// Run one cycle on a caller-supplied frame, bypassing the capture thread.
    pub fn process_frame(&self, frame: &ColorFrame) -> DetectionSet {
        self.detector.process(frame)
    }

    /// Stop the capture thread. Idempotent; later ticks reuse the last frame.
    pub fn shutdown(&mut self) {
        self.source.shutdown();
    }

    pub fn is_running(&self) -> bool {
        self.source.is_running()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn source(&self) -> &FrameSource {
        &self.source
    }

    pub fn detector(&self) -> &Detector<G> {
        &self.detector
    }

    pub fn params(&self) -> &PipelineParams {
        self.detector.params()
    }
}
