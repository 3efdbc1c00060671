use arena_vision_core::{Contour, Mask, Point2};
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_polygon_mut, Canvas};
use imageproc::point::Point;

/// Traced inside a one-pixel frame of non-members, so regions touching the
/// image edge still get a border. Points come back in mask coordinates.
pub(crate) fn find_contours(mask: &Mask) -> Vec<Contour> {
    let (w, h) = (mask.width, mask.height);
    if w == 0 || h == 0 {
        return Vec::new();
    }
    debug_assert_eq!(mask.data.len(), w * h);

    let mut padded = GrayImage::new(w as u32 + 2, h as u32 + 2);
    for (y, row) in mask.data.chunks_exact(w).enumerate() {
        for (x, &v) in row.iter().enumerate() {
            if v != Mask::NON_MEMBER {
                padded.put_pixel(x as u32 + 1, y as u32 + 1, Luma([Mask::MEMBER]));
            }
        }
    }

    let (max_x, max_y) = (w as i32 - 1, h as i32 - 1);
    imageproc::contours::find_contours::<i32>(&padded)
        .into_iter()
        .map(|c| {
            Contour::new(
                c.points
                    .iter()
                    .map(|p| Point2::new((p.x - 1).clamp(0, max_x), (p.y - 1).clamp(0, max_y)))
                    .collect(),
            )
        })
        .collect()
}

/// Lets `imageproc` draw straight into a mask.
struct MaskCanvas<'a>(&'a mut Mask);

impl Canvas for MaskCanvas<'_> {
    type Pixel = Luma<u8>;

    fn dimensions(&self) -> (u32, u32) {
        (self.0.width as u32, self.0.height as u32)
    }

    fn get_pixel(&self, x: u32, y: u32) -> Luma<u8> {
        Luma([self.0.get(x as usize, y as usize)])
    }

    fn draw_pixel(&mut self, x: u32, y: u32, color: Luma<u8>) {
        let (x, y) = (x as usize, y as usize);
        if x < self.0.width && y < self.0.height && color.0[0] != Mask::NON_MEMBER {
            self.0.set_member(x, y);
        }
    }
}

pub(crate) fn fill_contour(raster: &mut Mask, contour: &Contour) {
    let mut poly: Vec<Point<i32>> = contour.points.iter().map(|p| Point::new(p.x, p.y)).collect();
    // draw_polygon_mut rejects explicitly closed polygons.
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }

    if poly.len() < 3 {
        for p in &poly {
            if p.x >= 0 && p.y >= 0 && (p.x as usize) < raster.width && (p.y as usize) < raster.height {
                raster.set_member(p.x as usize, p.y as usize);
            }
        }
        return;
    }

    draw_polygon_mut(&mut MaskCanvas(raster), &poly, Luma([Mask::MEMBER]));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mask(w: usize, h: usize, x0: usize, y0: usize, side: usize) -> Mask {
        let mut m = Mask::new(w, h);
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                m.set_member(x, y);
            }
        }
        m
    }

    #[test]
    fn empty_mask_has_no_contours() {
        assert!(find_contours(&Mask::new(32, 24)).is_empty());
        assert!(find_contours(&Mask::new(0, 0)).is_empty());
    }

    #[test]
    fn square_boundary_is_traced() {
        let m = square_mask(40, 30, 10, 5, 12);
        let contours = find_contours(&m);
        assert_eq!(contours.len(), 1);
        let c = &contours[0];
        // 12x12 square has 44 boundary pixels.
        assert!((44..=45).contains(&c.len()), "got {}", c.len());
        assert!(c.points.iter().all(|p| m.is_member(p.x as usize, p.y as usize)));
    }

    #[test]
    fn hole_produces_second_contour() {
        let mut m = square_mask(40, 40, 5, 5, 20);
        for y in 12..18 {
            for x in 12..18 {
                m.data[y * 40 + x] = Mask::NON_MEMBER;
            }
        }
        assert_eq!(find_contours(&m).len(), 2);
    }

    #[test]
    fn fill_restores_solid_region() {
        let m = square_mask(40, 30, 10, 5, 12);
        let contours = find_contours(&m);
        let mut raster = Mask::new(40, 30);
        fill_contour(&mut raster, &contours[0]);
        assert_eq!(raster, m);
    }

    #[test]
    fn fill_handles_closed_and_tiny_contours() {
        let mut raster = Mask::new(10, 10);
        let closed = Contour::new(vec![
            Point2::new(1, 1),
            Point2::new(6, 1),
            Point2::new(6, 6),
            Point2::new(1, 6),
            Point2::new(1, 1),
        ]);
        fill_contour(&mut raster, &closed);
        assert!(raster.is_member(3, 3));
        assert_eq!(raster.count_members(), 36);

        let mut tiny = Mask::new(10, 10);
        fill_contour(&mut tiny, &Contour::new(vec![Point2::new(2, 2), Point2::new(40, 40)]));
        assert!(tiny.is_member(2, 2));
        fill_contour(&mut tiny, &Contour::new(vec![Point2::new(8, 8)]));
        assert!(tiny.is_member(8, 8));
        fill_contour(&mut tiny, &Contour::default());
    }

    #[test]
    fn full_width_band_is_traced() {
        let mut m = Mask::new(64, 48);
        for y in 20..30 {
            for x in 0..64 {
                m.set_member(x, y);
            }
        }
        let contours = find_contours(&m);
        assert_eq!(contours.len(), 1);
        let c = &contours[0];
        assert!(c.points.iter().all(|p| (20..30).contains(&p.y)));
        assert!(c.points.iter().any(|p| p.x == 0));
        assert!(c.points.iter().any(|p| p.x == 63));

        let mut raster = Mask::new(64, 48);
        fill_contour(&mut raster, c);
        assert_eq!(raster, m);
    }

    #[test]
    fn all_member_frame_is_one_contour() {
        let mut m = Mask::new(40, 30);
        m.data.fill(Mask::MEMBER);
        let contours = find_contours(&m);
        assert_eq!(contours.len(), 1);
        let c = &contours[0];
        // Perimeter of the frame: 2 * (40 + 30) - 4.
        assert!((136..=137).contains(&c.len()), "got {}", c.len());
        for corner in [(0, 0), (39, 0), (39, 29), (0, 29)] {
            assert!(c.points.contains(&Point2::new(corner.0, corner.1)), "{corner:?}");
        }
    }

    #[test]
    fn fill_leaves_existing_members() {
        let mut raster = Mask::new(20, 20);
        raster.set_member(18, 18);
        let square = Contour::new(vec![
            Point2::new(2, 2),
            Point2::new(8, 2),
            Point2::new(8, 8),
            Point2::new(2, 8),
        ]);
        fill_contour(&mut raster, &square);
        assert!(raster.is_member(18, 18));
        assert_eq!(raster.count_members(), 49 + 1);
    }
}
