use serde::{Deserialize, Serialize};

/// Parameters for the gradient Hough circle transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughCircleParams {
    /// Inverse accumulator resolution: the accumulator is `resolution` times
    /// smaller than the raster in each axis.
    pub resolution: f32,
    /// Minimum distance in pixels between accepted centers.
    pub min_dist: f32,
    /// High Canny threshold on the raster; the low threshold is half of it.
    pub accumulator_threshold: f32,
    /// Votes a center needs, and edge support its radius needs, to be accepted.
    pub center_threshold: u32,
    pub min_radius: u32,
    /// `0` means "up to the larger raster dimension".
    pub max_radius: u32,
}

impl Default for HoughCircleParams {
    fn default() -> Self {
        Self {
            resolution: 3.0,
            min_dist: 5.0,
            accumulator_threshold: 10.0,
            center_threshold: 50,
            min_radius: 0,
            max_radius: 0,
        }
    }
}

/// Parameters for the progressive probabilistic Hough line transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughLineParams {
    /// Distance resolution of the accumulator, in pixels.
    pub rho: f32,
    /// Angle resolution of the accumulator, in radians.
    pub theta: f32,
    /// Accumulator votes a line needs before its corridor is walked.
    pub threshold: u32,
    /// Segments shorter than this along both axes are dropped.
    pub min_line_length: u32,
    /// Largest run of non-member pixels bridged while walking a line.
    pub max_line_gap: u32,
    /// Seed for the point visiting order.
    pub seed: u64,
}

impl Default for HoughLineParams {
    fn default() -> Self {
        Self {
            rho: 3.0,
            theta: std::f32::consts::PI / 180.0,
            threshold: 50,
            min_line_length: 50,
            max_line_gap: 10,
            seed: 0x5eed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let p: HoughLineParams = serde_json::from_str(r#"{"threshold": 80}"#).expect("parse");
        assert_eq!(p.threshold, 80);
        assert_eq!(p.min_line_length, 50);
        assert_eq!(p.max_line_gap, 10);

        let c: HoughCircleParams = serde_json::from_str("{}").expect("parse");
        assert_eq!(c, HoughCircleParams::default());
    }
}
