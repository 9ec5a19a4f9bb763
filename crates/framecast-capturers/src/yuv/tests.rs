use super::{yuv420_to_rgb, yuv_to_rgb};

#[test]
fn neutral_chroma_gives_gray() {
    assert_eq!(yuv_to_rgb(0, 128, 128), (0, 0, 0));
    assert_eq!(yuv_to_rgb(128, 128, 128), (128, 128, 128));
    assert_eq!(yuv_to_rgb(255, 128, 128), (255, 255, 255));
}

#[test]
fn saturated_values_are_clamped() {
    let (r, _, b) = yuv_to_rgb(255, 255, 255);
    assert_eq!(r, 255);
    assert_eq!(b, 255);

    let (r, _, b) = yuv_to_rgb(0, 0, 0);
    assert_eq!(r, 0);
    assert_eq!(b, 0);
}

#[test]
fn chroma_is_shared_by_two_by_two_blocks() {
    // 4x2 luma, 2x1 chroma: left block neutral, right block shifted towards red
    let y_plane = [100u8; 8];
    let u_plane = [128u8, 128];
    let v_plane = [128u8, 200];

    let mut rgb = vec![0u8; 4 * 2 * 3];
    yuv420_to_rgb(&y_plane, &u_plane, &v_plane, 4, 2, &mut rgb);

    for row in 0..2 {
        for column in 0..4 {
            let offset = (row * 4 + column) * 3;
            let pixel = (rgb[offset], rgb[offset + 1], rgb[offset + 2]);

            if column < 2 {
                assert_eq!(pixel, (100, 100, 100));
            } else {
                assert!(pixel.0 > 150, "pixel {:?} should lean red", pixel);
                assert!(pixel.1 < 100);
            }
        }
    }
}
