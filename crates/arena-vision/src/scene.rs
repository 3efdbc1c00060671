//! Synthetic arena frames for demos, benchmarks and tests.

use arena_vision_core::ColorFrame;

pub const BALL_RED: [u8; 3] = [220, 30, 30];
pub const WALL_BLUE: [u8; 3] = [20, 40, 230];

/// Paints simple shapes onto a uniform background.
#[derive(Clone, Debug)]
pub struct Scene {
    frame: ColorFrame,
}

impl Scene {
    pub fn new(width: usize, height: usize, background: [u8; 3]) -> Self {
        Self {
            frame: ColorFrame::filled(width, height, background),
        }
    }

    /// Filled disk of all pixels within `radius` of `(cx, cy)`.
    pub fn disk(mut self, cx: f32, cy: f32, radius: f32, rgb: [u8; 3]) -> Self {
        let r2 = radius * radius;
        let x0 = (cx - radius).floor().max(0.0) as usize;
        let y0 = (cy - radius).floor().max(0.0) as usize;
        let x1 = ((cx + radius).ceil() as usize + 1).min(self.frame.width);
        let y1 = ((cy + radius).ceil() as usize + 1).min(self.frame.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.frame.put_pixel(x, y, rgb);
                }
            }
        }
        self
    }

    /// Axis-aligned rectangle covering `x0..x1` by `y0..y1`, clipped to the frame.
    pub fn rect(mut self, x0: usize, y0: usize, x1: usize, y1: usize, rgb: [u8; 3]) -> Self {
        for y in y0..y1.min(self.frame.height) {
            for x in x0..x1.min(self.frame.width) {
                self.frame.put_pixel(x, y, rgb);
            }
        }
        self
    }

    pub fn render(self) -> ColorFrame {
        self.frame
    }
}

/// 640x480 arena with one red ball at (200, 200) and one blue wall bar
/// 300x10 centered on (400, 300).
pub fn reference_arena() -> ColorFrame {
    Scene::new(640, 480, [0, 0, 0])
        .disk(200.0, 200.0, 40.0, BALL_RED)
        .rect(250, 295, 550, 305, WALL_BLUE)
        .render()
}
