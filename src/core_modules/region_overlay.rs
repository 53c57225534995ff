// THEORY:
// The `region_overlay` is the pure-Rust rendering end of the region pipeline.
// It draws the merged regions for one frame as hollow rectangles onto an
// `image` buffer, so results can be inspected or saved without OpenCV.
//
// Rectangles follow the same corner convention as OpenCV's `rectangle` with
// `pt2 = (x + w, y + h)`, so an overlay drawn here lines up with one drawn by
// the capture loop. Strokes grow inwards from the outline and are clipped to
// the image.

pub mod region_overlay {
    use crate::core_modules::bounding_box::{Area, BoundingBox};
    use image::{Rgb, RgbImage};

    /// The outline colour used by the live colour tracker (yellow).
    pub const REGION_COLOUR: Rgb<u8> = Rgb([255, 255, 0]);
    pub const REGION_THICKNESS: u32 = 2;

    /// Draws every region as a hollow rectangle of the given stroke thickness.
    pub fn draw_regions(image: &mut RgbImage, regions: &[BoundingBox], colour: Rgb<u8>, thickness: u32) {
        for region in regions {
            draw_outline(image, region, colour, thickness);
        }
    }

    fn draw_outline(image: &mut RgbImage, region: &BoundingBox, colour: Rgb<u8>, thickness: u32) {
        if region.w <= 0 || region.h <= 0 || thickness == 0 {
            return;
        }
        let (width, height) = image.dimensions();
        let left = Area::from(region.x);
        let top = Area::from(region.y);
        let right = left + Area::from(region.w);
        let bottom = top + Area::from(region.h);
        let stroke = Area::from(thickness);

        // Clip the outline's bounding rectangle to the image.
        let x_start = left.max(0);
        let y_start = top.max(0);
        let x_end = right.min(Area::from(width) - 1);
        let y_end = bottom.min(Area::from(height) - 1);
        if x_start > x_end || y_start > y_end {
            return;
        }

        for py in y_start..=y_end {
            let on_horizontal_edge = py < top + stroke || py > bottom - stroke;
            for px in x_start..=x_end {
                let on_vertical_edge = px < left + stroke || px > right - stroke;
                if on_horizontal_edge || on_vertical_edge {
                    image.put_pixel(px as u32, py as u32, colour);
                }
            }
        }
    }
}
