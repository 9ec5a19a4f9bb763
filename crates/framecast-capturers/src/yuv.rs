use rayon::{iter::{IndexedParallelIterator, ParallelIterator}, slice::ParallelSliceMut};

#[cfg(test)]
mod tests;

#[inline]
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y: f64 = y as f64;
    let u: f64 = ((u as i16) - 128) as f64;
    let v: f64 = ((v as i16) - 128) as f64;

    // float to int casts saturate
    let r = (y + v * 1.40200).round() as u8;
    let g = (y + u * -0.34414 + v * -0.71414).round() as u8;
    let b = (y + u * 1.77200).round() as u8;

    (r, g, b)
}

/// Converts planar 8-bit 4:2:0 into packed RGB8, one row per rayon task.
pub fn yuv420_to_rgb(
    y_plane: &[u8],
    u_plane: &[u8],
    v_plane: &[u8],
    width: usize,
    height: usize,
    rgb_pixels: &mut [u8],
) {
    let chroma_width = (width + 1) / 2;

    rgb_pixels[..width * height * 3]
        .par_chunks_mut(width * 3)
        .enumerate()
        .for_each(|(row, rgb_row)| {
            let chroma_row = row / 2;

            for column in 0..width {
                let chroma_index = chroma_row * chroma_width + column / 2;
                let (r, g, b) = yuv_to_rgb(
                    y_plane[row * width + column],
                    u_plane[chroma_index],
                    v_plane[chroma_index],
                );

                rgb_row[column * 3] = r;
                rgb_row[column * 3 + 1] = g;
                rgb_row[column * 3 + 2] = b;
            }
        });
}
