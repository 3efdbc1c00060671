use serde::{Deserialize, Serialize};

/// Color channel of an interleaved RGB frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Byte offset of this channel inside one RGB pixel.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    /// The two channels that are not `self`, in RGB order.
    pub fn others(self) -> [Channel; 2] {
        match self {
            Channel::Red => [Channel::Green, Channel::Blue],
            Channel::Green => [Channel::Red, Channel::Blue],
            Channel::Blue => [Channel::Red, Channel::Green],
        }
    }
}

/// 8-bit, 3-channel color raster (interleaved RGB, row-major).
///
/// Frames are immutable once published by the capture thread; consumers share
/// them through `Arc<ColorFrame>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorFrame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>, // len = w*h*3
}

impl ColorFrame {
    pub const CHANNELS: usize = 3;

    /// Wrap an RGB buffer. Returns `None` if the length does not match `w*h*3`.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != width * height * Self::CHANNELS {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Frame where every pixel has the same color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * Self::CHANNELS);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * Self::CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * Self::CHANNELS;
        self.data[i..i + Self::CHANNELS].copy_from_slice(&rgb);
    }

    /// Iterate over pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data
            .chunks_exact(Self::CHANNELS)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Extract a single channel as a plane of `w*h` bytes.
    pub fn channel_plane(&self, channel: Channel) -> Vec<u8> {
        let c = channel.index();
        self.data
            .chunks_exact(Self::CHANNELS)
            .map(|p| p[c])
            .collect()
    }

    /// Rebuild a frame from three planes (R, G, B). Planes must have `w*h` bytes.
    pub fn from_planes(width: usize, height: usize, planes: [&[u8]; 3]) -> Option<Self> {
        let n = width * height;
        if planes.iter().any(|p| p.len() != n) {
            return None;
        }
        let mut data = Vec::with_capacity(n * Self::CHANNELS);
        for i in 0..n {
            data.push(planes[0][i]);
            data.push(planes[1][i]);
            data.push(planes[2][i]);
        }
        Some(Self {
            width,
            height,
            data,
        })
    }
}

/// Single-channel binary raster: every pixel is [`Mask::MEMBER`] or [`Mask::NON_MEMBER`].
///
/// Used both for color-class masks and for the scratch rasters the shape
/// classifiers fill contours into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>, // row-major, len = w*h
}

impl Mask {
    pub const MEMBER: u8 = 255;
    pub const NON_MEMBER: u8 = 0;

    /// All-zero raster.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![Self::NON_MEMBER; width * height],
        }
    }

    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn is_member(&self, x: usize, y: usize) -> bool {
        self.get(x, y) != Self::NON_MEMBER
    }

    #[inline]
    pub fn set_member(&mut self, x: usize, y: usize) {
        self.data[y * self.width + x] = Self::MEMBER;
    }

    pub fn count_members(&self) -> usize {
        self.data.iter().filter(|&&v| v != Self::NON_MEMBER).count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&v| v == Self::NON_MEMBER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_new_rejects_bad_length() {
        assert!(ColorFrame::new(2, 2, vec![0; 11]).is_none());
        assert!(ColorFrame::new(2, 2, vec![0; 12]).is_some());
    }

    #[test]
    fn planes_round_trip_through_frame() {
        let mut frame = ColorFrame::filled(3, 2, [10, 20, 30]);
        frame.put_pixel(2, 1, [200, 100, 50]);

        let r = frame.channel_plane(Channel::Red);
        let g = frame.channel_plane(Channel::Green);
        let b = frame.channel_plane(Channel::Blue);
        assert_eq!(r[5], 200);
        assert_eq!(b[0], 30);

        let rebuilt = ColorFrame::from_planes(3, 2, [&r, &g, &b]).expect("planes match");
        assert_eq!(rebuilt, frame);
    }

    #[test]
    fn others_excludes_dominant() {
        for c in Channel::ALL {
            assert!(!c.others().contains(&c));
        }
    }

    #[test]
    fn mask_membership() {
        let mut m = Mask::new(4, 3);
        assert!(m.is_empty());
        m.set_member(1, 2);
        assert!(m.is_member(1, 2));
        assert!(!m.is_member(2, 1));
        assert_eq!(m.count_members(), 1);
    }
}
