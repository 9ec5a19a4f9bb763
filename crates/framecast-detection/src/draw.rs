use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgb, RgbImage};

use crate::detector::Detection;

pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const BOX_THICKNESS: u32 = 2;

/// Gap between a caption and the top edge of its box.
pub const CAPTION_OFFSET: u32 = 10;

const GLYPH_SIZE: u32 = 8;

/// Draws the outline of `detection`, clipped to the image.
pub fn draw_detection(image: &mut RgbImage, detection: &Detection, color: Rgb<u8>, thickness: u32) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || detection.width == 0 || detection.height == 0 {
        return;
    }

    let left = detection.x.min(width - 1);
    let top = detection.y.min(height - 1);
    let right = detection.x.saturating_add(detection.width - 1).min(width - 1);
    let bottom = detection.y.saturating_add(detection.height - 1).min(height - 1);

    for offset in 0..thickness {
        for x in left..=right {
            put_clipped(image, x, top.saturating_add(offset), bottom, color);
            put_clipped(image, x, bottom.saturating_sub(offset), bottom, color);
        }

        for y in top..=bottom {
            put_clipped_column(image, left.saturating_add(offset), right, y, color);
            put_clipped_column(image, right.saturating_sub(offset), right, y, color);
        }
    }
}

pub fn caption(detection: &Detection) -> String {
    format!("{} {:.2}", detection.label, detection.confidence)
}

/// Writes the caption of `detection` above its box, or just inside the box when there
/// is no room above it.
pub fn draw_caption(image: &mut RgbImage, detection: &Detection, color: Rgb<u8>, thickness: u32) {
    let y = if detection.y >= CAPTION_OFFSET {
        detection.y - CAPTION_OFFSET
    } else {
        detection.y.saturating_add(thickness + 1)
    };

    draw_text(image, detection.x, y, &caption(detection), color);
}

/// Writes `text` in an 8x8 bitmap font with its top-left corner at (`x`, `y`), clipped
/// to the image. Characters without a glyph leave a blank cell.
pub fn draw_text(image: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>) {
    let (width, height) = image.dimensions();

    for (index, character) in text.chars().enumerate() {
        let glyph = match BASIC_FONTS.get(character) {
            Some(glyph) => glyph,
            None => continue,
        };

        let origin_x = x.saturating_add((index as u32).saturating_mul(GLYPH_SIZE));
        if origin_x >= width {
            break;
        }

        for (row, bits) in glyph.iter().enumerate() {
            let pixel_y = y.saturating_add(row as u32);
            if pixel_y >= height {
                break;
            }

            for column in 0..GLYPH_SIZE {
                let pixel_x = origin_x.saturating_add(column);
                if bits & (1 << column) != 0 && pixel_x < width {
                    image.put_pixel(pixel_x, pixel_y, color);
                }
            }
        }
    }
}

fn put_clipped(image: &mut RgbImage, x: u32, y: u32, max_y: u32, color: Rgb<u8>) {
    if y <= max_y {
        image.put_pixel(x, y, color);
    }
}

fn put_clipped_column(image: &mut RgbImage, x: u32, max_x: u32, y: u32, color: Rgb<u8>) {
    if x <= max_x {
        image.put_pixel(x, y, color);
    }
}
