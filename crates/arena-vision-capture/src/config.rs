use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delay before reopening a device after a failed capture.
const WAIT_BEFORE_RECONNECT_MS: u64 = 100;

/// Frame geometry and recovery policy of a [`FrameSource`](crate::FrameSource).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub width: usize,
    pub height: usize,
    pub reconnect_delay_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            reconnect_delay_ms: WAIT_BEFORE_RECONNECT_MS,
        }
    }
}

impl CaptureConfig {
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn matches(&self, width: usize, height: usize) -> bool {
        self.width == width && self.height == height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_vga_with_short_reconnect() {
        let c = CaptureConfig::default();
        assert!(c.matches(640, 480));
        assert_eq!(c.reconnect_delay(), Duration::from_millis(100));
    }

    #[test]
    fn builder_and_partial_json() {
        let c = CaptureConfig::default()
            .with_size(320, 240)
            .with_reconnect_delay(Duration::from_millis(5));
        assert_eq!((c.width, c.height, c.reconnect_delay_ms), (320, 240, 5));

        let parsed: CaptureConfig = serde_json::from_str(r#"{"width": 160}"#).expect("parse");
        assert_eq!(parsed.width, 160);
        assert_eq!(parsed.height, 480);
    }
}
