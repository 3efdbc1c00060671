use arena_vision_capture::CaptureError;
use arena_vision_detect::ConfigError;

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<CaptureError> for PipelineError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::DeviceUnavailable(msg) => PipelineError::DeviceUnavailable(msg),
            other => PipelineError::DeviceUnavailable(other.to_string()),
        }
    }
}
