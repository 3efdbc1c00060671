use arena_vision_core::{Channel, ColorFrame, Mask};
use image::GrayImage;
use imageproc::filter::box_filter;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::params::ColorClassParams;

/// Classify every pixel of `frame` into `class`.
///
/// Member iff `dominant >= other + disparity` for both other channels and
/// `dominant >= threshold`. Arithmetic is widened, so a large disparity never
/// wraps.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(frame), fields(width = frame.width, height = frame.height))
)]
pub fn segment(frame: &ColorFrame, class: &ColorClassParams) -> Mask {
    let d = class.dominant.index();
    let [o1, o2] = class.dominant.others().map(Channel::index);
    let disparity = class.disparity as u16;
    let threshold = class.threshold as u16;

    let mut mask = Mask::new(frame.width, frame.height);
    for y in 0..frame.height {
        for x in 0..frame.width {
            let i = (y * frame.width + x) * ColorFrame::CHANNELS;
            let px = &frame.data[i..i + ColorFrame::CHANNELS];
            let dominant = px[d] as u16;
            if dominant >= threshold
                && dominant >= px[o1] as u16 + disparity
                && dominant >= px[o2] as u16 + disparity
            {
                mask.set_member(x, y);
            }
        }
    }
    mask
}

/// Per-channel box blur with a `(2r + 1)²` window; `radius == 0` is a copy.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(frame)))]
pub fn smooth(frame: &ColorFrame, radius: u32) -> ColorFrame {
    if radius == 0 || frame.width == 0 || frame.height == 0 {
        return frame.clone();
    }
    let (w, h) = (frame.width as u32, frame.height as u32);
    let planes = Channel::ALL.map(|c| {
        GrayImage::from_raw(w, h, frame.channel_plane(c))
            .map(|plane| box_filter(&plane, radius, radius).into_raw())
    });
    match planes {
        [Some(r), Some(g), Some(b)] => {
            ColorFrame::from_planes(frame.width, frame.height, [&r, &g, &b])
                .unwrap_or_else(|| frame.clone())
        }
        _ => frame.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_failing_frame_gives_empty_ball_mask() {
        // Dark, gray and blue pixels all fail the red class.
        let mut frame = ColorFrame::filled(16, 12, [0, 0, 0]);
        frame.put_pixel(3, 3, [200, 200, 200]);
        frame.put_pixel(4, 4, [9, 0, 0]);
        frame.put_pixel(5, 5, [30, 10, 255]);
        let mask = segment(&frame, &ColorClassParams::ball_default());
        assert!(mask.is_empty());
        assert_eq!((mask.width, mask.height), (16, 12));
    }

    #[test]
    fn disparity_and_threshold_are_inclusive() {
        let class = ColorClassParams::ball_default();
        let mut frame = ColorFrame::filled(4, 1, [0, 0, 0]);
        frame.put_pixel(0, 0, [35, 10, 10]); // exactly +25
        frame.put_pixel(1, 0, [34, 10, 10]); // one short
        frame.put_pixel(2, 0, [10, 0, 0]); // exactly at threshold
        frame.put_pixel(3, 0, [255, 231, 0]); // green too close
        let mask = segment(&frame, &class);
        assert!(mask.is_member(0, 0));
        assert!(!mask.is_member(1, 0));
        assert!(mask.is_member(2, 0));
        assert!(!mask.is_member(3, 0));
    }

    #[test]
    fn large_disparity_does_not_overflow() {
        let class = ColorClassParams {
            dominant: Channel::Blue,
            disparity: 250,
            threshold: 0,
        };
        let mut frame = ColorFrame::filled(2, 1, [0, 0, 255]);
        frame.put_pixel(1, 0, [10, 0, 255]);
        let mask = segment(&frame, &class);
        assert!(mask.is_member(0, 0));
        assert!(!mask.is_member(1, 0));
    }

    #[test]
    fn wall_class_picks_saturated_blue() {
        let mut frame = ColorFrame::filled(3, 1, [0, 0, 0]);
        frame.put_pixel(0, 0, [0, 0, 255]);
        frame.put_pixel(1, 0, [120, 0, 255]); // red within 100 of blue
        frame.put_pixel(2, 0, [0, 0, 59]);
        let mask = segment(&frame, &ColorClassParams::wall_default());
        assert_eq!(mask.data, vec![Mask::MEMBER, Mask::NON_MEMBER, Mask::NON_MEMBER]);
    }

    #[test]
    fn smoothing_spreads_isolated_pixel() {
        let mut frame = ColorFrame::filled(9, 9, [0, 0, 0]);
        frame.put_pixel(4, 4, [252, 0, 0]);
        assert_eq!(smooth(&frame, 0), frame);

        let blurred = smooth(&frame, 1);
        // 3x3 window averages the spike over nine pixels.
        assert_eq!(blurred.pixel(4, 4), [28, 0, 0]);
        assert_eq!(blurred.pixel(3, 5), [28, 0, 0]);
        assert_eq!(blurred.pixel(1, 1), [0, 0, 0]);
    }
}
