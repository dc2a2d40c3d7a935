use super::*;

const RED: image::Rgb<u8> = image::Rgb([220, 20, 20]);
const BLUE: image::Rgb<u8> = image::Rgb([20, 20, 220]);

fn solid(w: u32, h: u32, c: image::Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(w, h, c)
}

fn size(width: u32, height: u32) -> PixelSize {
    PixelSize { width, height }
}

#[test]
fn quarter_turns_are_lossless_and_clockwise() {
    let mut img = solid(4, 2, BLUE);
    img.put_pixel(0, 0, RED);

    let r90 = rotate_image(&img, 90.0);
    assert_eq!(r90.dimensions(), (2, 4));
    assert_eq!(*r90.get_pixel(1, 0), RED);

    let r180 = rotate_image(&img, 180.0);
    assert_eq!(*r180.get_pixel(3, 1), RED);

    assert_eq!(rotate_image(&img, -90.0), rotate_image(&img, 270.0));
    assert_eq!(rotate_image(&img, 450.0), r90);
    assert_eq!(rotate_image(&img, 0.0), img);
    assert_eq!(rotate_image(&img, 360.0), img);
}

#[test]
fn arbitrary_rotation_grows_and_fills_corners_white() {
    let img = solid(10, 10, image::Rgb([0, 0, 0]));
    let rotated = rotate_image(&img, 45.0);
    assert_eq!(rotated.dimensions(), (15, 15));
    assert_eq!(*rotated.get_pixel(0, 0), WHITE);
    assert_eq!(*rotated.get_pixel(14, 14), WHITE);
    assert_eq!(*rotated.get_pixel(7, 7), image::Rgb([0, 0, 0]));
}

#[test]
fn cover_fills_the_box_and_crops_edges() {
    // Left quarter blue, rest red; a 2:1 source in a square box loses its outer quarters.
    let mut img = solid(200, 100, RED);
    for y in 0..100 {
        for x in 0..50 {
            img.put_pixel(x, y, BLUE);
        }
    }
    let out = fit_to_box(&img, size(50, 50), FitMode::Cover, FilterType::Nearest);
    assert_eq!(out.dimensions(), (50, 50));
    assert!(out.pixels().all(|p| *p == RED));
}

#[test]
fn cover_never_leaves_white_with_smooth_filters() {
    for (w, h) in [(37, 91), (91, 37), (64, 64), (3, 1000)] {
        let img = solid(w, h, RED);
        for filter in [FilterType::Triangle, FilterType::Lanczos3] {
            let out = fit_to_box(&img, size(40, 25), FitMode::Cover, filter);
            assert_eq!(out.dimensions(), (40, 25));
            assert!(out.pixels().all(|p| p.0[0] > 200 && p.0[1] < 60));
        }
    }
}

#[test]
fn cover_crops_extreme_aspect_before_scaling() {
    // A one pixel wide strip only needs a 1x2 crop, never a 300x900000 intermediate.
    let mut img = solid(1, 3000, BLUE);
    for y in 1000..2000 {
        img.put_pixel(0, y, RED);
    }
    assert_eq!(
        cover_crop(img.dimensions(), (300, 450)),
        PixelRect {
            x: 0,
            y: 1499,
            width: 1,
            height: 2,
        }
    );
    let out = fit_to_box(&img, size(300, 450), FitMode::Cover, FilterType::Triangle);
    assert_eq!(out.dimensions(), (300, 450));
    assert!(out.pixels().all(|p| p.0[0] > 200 && p.0[2] < 60));
}

#[test]
fn cover_crop_keeps_the_target_aspect() {
    let wide = cover_crop((1000, 100), (40, 20));
    assert_eq!(
        (wide.x, wide.y, wide.width, wide.height),
        (400, 0, 200, 100)
    );
    let tall = cover_crop((100, 1000), (40, 20));
    assert_eq!(
        (tall.x, tall.y, tall.width, tall.height),
        (0, 475, 100, 50)
    );
    let exact = cover_crop((80, 40), (40, 20));
    assert_eq!((exact.width, exact.height), (80, 40));
}

#[test]
fn contain_keeps_everything_and_pads_white() {
    let img = solid(200, 100, RED);
    let out = fit_to_box(&img, size(50, 50), FitMode::Contain, FilterType::Nearest);
    assert_eq!(out.dimensions(), (50, 50));
    assert_eq!(*out.get_pixel(25, 0), WHITE);
    assert_eq!(*out.get_pixel(25, 25), RED);
    assert_eq!(*out.get_pixel(25, 49), WHITE);
    assert_eq!(out.pixels().filter(|p| **p == RED).count(), 50 * 25);

    // Centred: equal white bands above and below (within one pixel).
    let top = (0..50).take_while(|&y| *out.get_pixel(0, y) == WHITE).count();
    let bottom = (0..50)
        .rev()
        .take_while(|&y| *out.get_pixel(0, y) == WHITE)
        .count();
    assert!(top.abs_diff(bottom) <= 1);
}

#[test]
fn contain_upscales_small_sources() {
    let img = solid(2, 4, BLUE);
    let out = fit_to_box(&img, size(30, 30), FitMode::Contain, FilterType::Nearest);
    assert_eq!(out.pixels().filter(|p| **p == BLUE).count(), 15 * 30);
}

#[test]
fn build_patch_matches_the_cell() {
    let cell = PixelRect {
        x: 12,
        y: 40,
        width: 33,
        height: 21,
    };
    let patch = build_patch(
        3,
        &solid(100, 60, RED),
        30.0,
        cell,
        FitMode::Cover,
        filter_for(RenderMode::Preview),
        0,
    );
    assert_eq!(patch.index, 3);
    assert_eq!(patch.cell, cell);
    assert_eq!(patch.pixels.dimensions(), (33, 21));
}

#[test]
fn rounded_corners_turn_white_and_keep_the_centre() {
    let cell = PixelRect {
        x: 0,
        y: 0,
        width: 60,
        height: 40,
    };
    let patch = build_patch(
        0,
        &solid(90, 60, RED),
        0.0,
        cell,
        FitMode::Cover,
        FilterType::Nearest,
        10,
    );
    let px = &patch.pixels;
    for (x, y) in [(0, 0), (59, 0), (0, 39), (59, 39), (1, 1)] {
        assert_eq!(*px.get_pixel(x, y), WHITE, "({x},{y})");
    }
    for (x, y) in [(30, 20), (10, 0), (0, 10), (9, 9), (30, 0)] {
        assert_eq!(*px.get_pixel(x, y), RED, "({x},{y})");
    }
}

#[test]
fn corner_radius_is_clamped_and_zero_is_a_no_op() {
    let mut img = solid(8, 4, BLUE);
    round_corners(&mut img, 0);
    assert!(img.pixels().all(|p| *p == BLUE));

    // Clamped to 2: only the outermost pixel of each corner falls outside the arc.
    round_corners(&mut img, 500);
    assert_eq!(*img.get_pixel(0, 0), WHITE);
    assert_eq!(*img.get_pixel(7, 3), WHITE);
    assert_eq!(*img.get_pixel(4, 2), BLUE);
    assert_eq!(img.pixels().filter(|p| **p == WHITE).count(), 4);
}

#[test]
fn filter_policy_per_mode() {
    assert_eq!(filter_for(RenderMode::Preview), FilterType::Triangle);
    assert_eq!(filter_for(RenderMode::Final), FilterType::Lanczos3);
}
