use super::*;
use crate::foundation::core::PixelRect;

fn geometry() -> CanvasGeometry {
    CanvasGeometry {
        width: 30,
        height: 20,
        density: 10,
        padding: 2,
        spacing: 2,
        cell_width: 12,
        cell_height: 16,
    }
}

fn patch(index: usize, x: u32, rgb: [u8; 3]) -> PositionedPatch {
    PositionedPatch {
        index,
        cell: PixelRect {
            x,
            y: 2,
            width: 12,
            height: 16,
        },
        pixels: RgbImage::from_pixel(12, 16, image::Rgb(rgb)),
    }
}

#[test]
fn patches_land_on_a_white_canvas() {
    let out = composite(
        &geometry(),
        &[patch(0, 2, [255, 0, 0]), patch(1, 16, [0, 0, 255])],
    )
    .unwrap();
    assert_eq!(out.dimensions(), (30, 20));

    // Padding and the gap stay white.
    assert_eq!(*out.get_pixel(0, 0), WHITE);
    assert_eq!(*out.get_pixel(14, 10), WHITE);
    assert_eq!(*out.get_pixel(29, 19), WHITE);

    assert_eq!(out.get_pixel(2, 2).0, [255, 0, 0]);
    assert_eq!(out.get_pixel(13, 17).0, [255, 0, 0]);
    assert_eq!(out.get_pixel(16, 2).0, [0, 0, 255]);
    assert_eq!(out.get_pixel(27, 17).0, [0, 0, 255]);
}

#[test]
fn empty_patch_list_is_a_blank_canvas() {
    let out = composite(&geometry(), &[]).unwrap();
    assert!(out.pixels().all(|p| *p == WHITE));
}

#[test]
fn out_of_order_patches_are_rejected() {
    let err = composite(
        &geometry(),
        &[patch(1, 16, [0, 0, 255]), patch(0, 2, [255, 0, 0])],
    )
    .unwrap_err();
    assert_eq!(err.category(), "internal_error");
}

#[test]
fn patch_outside_the_canvas_is_rejected() {
    let err = composite(&geometry(), &[patch(0, 20, [1, 1, 1])]).unwrap_err();
    assert!(matches!(err, PrintError::Internal(_)));
}

#[test]
fn mismatched_patch_size_is_rejected() {
    let mut p = patch(0, 2, [1, 1, 1]);
    p.pixels = RgbImage::new(3, 3);
    assert!(composite(&geometry(), &[p]).is_err());
}
