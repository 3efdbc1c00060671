use arena_vision_core::Mask;
use image::GrayImage;

/// View a mask as an `image` raster for `imageproc`.
///
/// A mask whose buffer does not match its dimensions (possible through the
/// public fields) converts to an empty raster in release builds.
pub fn mask_to_gray(mask: &Mask) -> GrayImage {
    debug_assert_eq!(mask.data.len(), mask.width * mask.height, "inconsistent mask");
    GrayImage::from_raw(mask.width as u32, mask.height as u32, mask.data.clone())
        .unwrap_or_else(|| GrayImage::new(mask.width as u32, mask.height as u32))
}

/// Threshold a gray raster back into a mask: any non-zero pixel is a member.
pub fn gray_to_mask(gray: &GrayImage) -> Mask {
    let (w, h) = gray.dimensions();
    let data = gray
        .as_raw()
        .iter()
        .map(|&v| if v != 0 { Mask::MEMBER } else { Mask::NON_MEMBER })
        .collect();
    Mask {
        width: w as usize,
        height: h as usize,
        data,
    }
}
