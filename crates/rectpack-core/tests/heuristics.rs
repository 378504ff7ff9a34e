use rand::{Rng, SeedableRng};
use rectpack_core::prelude::*;

fn overlaps(out: &PackingResult) -> bool {
    let r = &out.rectangles;
    (0..r.len()).any(|i| ((i + 1)..r.len()).any(|j| r[i].rect().intersects(&r[j].rect())))
}

#[test]
fn single_rectangle_is_tight() {
    for (w, h) in [(1, 1), (7, 3), (3, 7), (256, 256)] {
        let out = pack(&[PackingRectangle::new(0, w, h)], PackingHints::FIND_BEST, 0).unwrap();
        assert_eq!((out.width, out.height), (w, h));
        assert_eq!((out.rectangles[0].x, out.rectangles[0].y), (0, 0));
    }
}

#[test]
fn single_rectangle_ignores_trailing_padding() {
    let out = pack(&[PackingRectangle::new(0, 10, 4)], PackingHints::TRY_BY_AREA, 3).unwrap();
    assert_eq!((out.width, out.height), (10, 4));
}

#[test]
fn big_square_with_four_small_ones() {
    let sizes = [(4, 4), (2, 2), (2, 2), (2, 2), (2, 2)];
    for placement in [Placement::Guillotine, Placement::Skyline] {
        let cfg = PackerConfig::builder()
            .hints(PackingHints::TRY_BY_AREA)
            .placement(placement)
            .build();
        let out = pack_sizes(&sizes, &cfg).unwrap();
        assert!(out.area() <= 36, "area {} ({}x{})", out.area(), out.width, out.height);
        assert!(!overlaps(&out));
        assert_eq!(out.hint, Some(PackingHint::Area));

        // two 2x2 columns right of the 4x4 beat a 6x6 ring around it
        assert_eq!((out.width, out.height), (8, 4), "{:?}", placement);
        let positions: Vec<(u32, u32)> = out.rectangles.iter().map(|r| (r.x, r.y)).collect();
        assert_eq!(positions, vec![(0, 0), (4, 0), (4, 2), (6, 0), (6, 2)]);

        // the first column shares the 4x4's right edge
        let big = out.rectangles[0];
        for small in &out.rectangles[1..3] {
            assert_eq!(small.x, big.x + big.width);
            assert!(small.y >= big.y && small.y + small.height <= big.y + big.height);
        }
    }
}

#[test]
fn unusual_sizes_not_worse_than_width_sort() {
    let sizes = [(10, 1), (1, 10)];
    let unusual = PackerConfig::builder()
        .hints(PackingHints::UNUSUAL_SIZES)
        .build();
    let by_width = PackerConfig::builder()
        .hints(PackingHints::TRY_BY_WIDTH)
        .build();
    let a = pack_sizes(&sizes, &unusual).unwrap();
    let b = pack_sizes(&sizes, &by_width).unwrap();
    assert!(a.area() <= b.area(), "{} > {}", a.area(), b.area());
    assert!(!overlaps(&a));
    // a 10x1 row and a 1x10 column cannot share a 10x10 box
    assert!(a.width >= 10 && a.height >= 10);
    assert_eq!(a.area(), 110);
}

#[test]
fn find_best_dominates_single_heuristics() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(9);
    for round in 0..5 {
        let sizes: Vec<(u32, u32)> = (0..60)
            .map(|_| (rng.gen_range(1..=50), rng.gen_range(1..=50)))
            .collect();
        let best = pack_sizes(&sizes, &PackerConfig::default()).unwrap();
        for hint in PackingHint::ALL {
            let cfg = PackerConfig::builder().hints(hint.into()).build();
            let single = pack_sizes(&sizes, &cfg).unwrap();
            assert!(
                best.area() <= single.area(),
                "round {}: find_best {} > {} {}",
                round,
                best.area(),
                hint,
                single.area()
            );
        }
    }
}

#[test]
fn winner_is_earliest_on_full_tie() {
    // identical squares: every heuristic yields the same layout, area wins nothing
    let sizes = [(8, 8); 4];
    let out = pack_sizes(&sizes, &PackerConfig::default()).unwrap();
    assert_eq!(out.hint, Some(PackingHint::Area));
    let cfg = PackerConfig::builder()
        .hints(PackingHints::TRY_BY_HEIGHT | PackingHints::TRY_BY_WIDTH)
        .build();
    let out = pack_sizes(&sizes, &cfg).unwrap();
    assert_eq!(out.hint, Some(PackingHint::Width));
}

#[test]
fn presets_only_try_their_members() {
    let sizes = [(30, 2), (2, 30), (9, 9), (5, 12)];
    let out = pack_sizes(
        &sizes,
        &PackerConfig::builder()
            .hints(PackingHints::MOSTLY_SQUARED)
            .build(),
    )
    .unwrap();
    let hint = out.hint.unwrap();
    assert!(PackingHints::MOSTLY_SQUARED.contains(hint));
}
