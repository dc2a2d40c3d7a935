use super::*;
use crate::layout::grid::plan;

fn spec(w: f64, h: f64) -> PrintSpec {
    PrintSpec::new(w, h).unwrap()
}

#[test]
fn single_preview_cell_fills_the_print_area() {
    let grid = plan(1).unwrap();
    let g = compute_geometry(&spec(8.0, 10.0), RenderMode::Preview, 0.5, &grid).unwrap();
    assert_eq!(g.density, 150);
    assert_eq!(g.padding, 9);
    assert_eq!(g.spacing, 4);
    assert_eq!((g.width, g.height), (1218, 1518));
    assert_eq!((g.cell_width, g.cell_height), (1200, 1500));

    let cell = g.cell_box(&grid.slots()[0]);
    assert_eq!(
        cell,
        PixelRect {
            x: 9,
            y: 9,
            width: 1200,
            height: 1500
        }
    );
}

#[test]
fn final_two_by_two_cells_are_equal_and_truncated() {
    let grid = plan(4).unwrap();
    let g = compute_geometry(&spec(8.0, 10.0), RenderMode::Final, 0.5, &grid).unwrap();
    assert_eq!(g.density, 200);
    assert_eq!((g.padding, g.spacing), (12, 6));
    assert_eq!((g.width, g.height), (1624, 2024));
    assert_eq!((g.cell_width, g.cell_height), (797, 997));

    let origins: Vec<(u32, u32)> = g.cell_boxes(&grid).iter().map(|r| (r.x, r.y)).collect();
    assert_eq!(origins, vec![(12, 12), (815, 12), (12, 1015), (815, 1015)]);
    for cell in g.cell_boxes(&grid) {
        assert_eq!((cell.width, cell.height), (797, 997));
        assert!(cell.fits_within(g.size()));
    }
}

#[test]
fn hero_cell_absorbs_the_gap_it_spans() {
    let grid = plan(5).unwrap();
    let g = compute_geometry(&spec(8.5, 11.0), RenderMode::Final, 1.0, &grid).unwrap();
    assert_eq!((g.width, g.height), (1724, 2224));
    assert_eq!(g.spacing, 12);
    assert_eq!(g.cell_width, 558);

    let boxes = g.cell_boxes(&grid);
    assert_eq!(boxes[0].width, 2 * 558 + 12);
    assert_eq!(boxes[0].height, g.cell_height);
    assert_eq!(boxes[1].x, 12 + 2 * (558 + 12));
    for (i, a) in boxes.iter().enumerate() {
        for b in &boxes[i + 1..] {
            assert!(!a.overlaps(*b));
        }
    }
}

#[test]
fn seven_image_layout_fits_all_rows_on_canvas() {
    let grid = plan(7).unwrap();
    let g = compute_geometry(&spec(12.0, 18.0), RenderMode::Preview, 0.5, &grid).unwrap();
    for cell in g.cell_boxes(&grid) {
        assert!(cell.fits_within(g.size()), "{cell:?} outside {g:?}");
    }
}

#[test]
fn oversized_spacing_is_invalid_input() {
    let grid = plan(3).unwrap();
    let err = compute_geometry(&spec(5.0, 7.0), RenderMode::Preview, 100.0, &grid).unwrap_err();
    assert!(matches!(err, PrintError::InvalidInput(_)));
}

#[test]
fn never_returns_a_non_positive_cell() {
    let sizes = [(0.01, 0.01), (0.5, 0.5), (5.0, 7.0), (8.5, 11.0), (12.0, 18.0)];
    let spacings = [0.0, 0.5, 1.0, 2.0, 8.0, 32.0, 500.0];
    for (w, h) in sizes {
        for count in [1usize, 2, 3, 4, 5, 7, 12] {
            let grid = plan(count).unwrap();
            for s in spacings {
                for mode in [RenderMode::Preview, RenderMode::Final] {
                    match compute_geometry(&spec(w, h), mode, s, &grid) {
                        Ok(g) => assert!(g.cell_width > 0 && g.cell_height > 0),
                        Err(e) => assert!(matches!(e, PrintError::InvalidInput(_))),
                    }
                }
            }
        }
    }
}

#[test]
fn rejects_bad_spacing_and_huge_prints() {
    let grid = plan(1).unwrap();
    assert!(compute_geometry(&spec(8.0, 10.0), RenderMode::Final, -0.1, &grid).is_err());
    assert!(compute_geometry(&spec(8.0, 10.0), RenderMode::Final, f64::NAN, &grid).is_err());
    assert!(compute_geometry(&spec(400.0, 10.0), RenderMode::Final, 0.0, &grid).is_err());
}

#[test]
fn custom_densities_apply() {
    let grid = plan(1).unwrap();
    let cfg = GeometryConfig {
        preview_density: 72,
        final_density: 300,
        padding_units: 0.0,
    };
    let g = compute_geometry_with(&spec(2.0, 3.0), RenderMode::Final, 0.0, &grid, &cfg).unwrap();
    assert_eq!((g.width, g.height, g.padding), (600, 900, 0));

    let bad = GeometryConfig {
        final_density: 0,
        ..GeometryConfig::default()
    };
    assert!(compute_geometry_with(&spec(2.0, 3.0), RenderMode::Final, 0.0, &grid, &bad).is_err());
}
