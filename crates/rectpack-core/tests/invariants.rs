use rand::{Rng, SeedableRng};
use rectpack_core::prelude::*;

fn disjoint(rects: &[PackingRectangle], padding: u32) -> bool {
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            let a = rects[i];
            let b = rects[j];
            // cells include the padding on the right/bottom side
            let a_x2 = a.x as u64 + a.width as u64 + padding as u64;
            let a_y2 = a.y as u64 + a.height as u64 + padding as u64;
            let b_x2 = b.x as u64 + b.width as u64 + padding as u64;
            let b_y2 = b.y as u64 + b.height as u64 + padding as u64;
            let overlap = !(a.x as u64 >= b_x2
                || b.x as u64 >= a_x2
                || a.y as u64 >= b_y2
                || b.y as u64 >= a_y2);
            if overlap {
                return false;
            }
        }
    }
    true
}

fn random_rects(seed: u64, count: usize, min: u32, max: u32) -> Vec<PackingRectangle> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| PackingRectangle::new(i, rng.gen_range(min..=max), rng.gen_range(min..=max)))
        .collect()
}

fn check(input: &[PackingRectangle], out: &PackingResult, padding: u32) {
    assert_eq!(out.rectangles.len(), input.len());
    for (src, placed) in input.iter().zip(out.rectangles.iter()) {
        assert_eq!(src.id, placed.id);
        assert_eq!((src.width, src.height), (placed.width, placed.height));
        assert!(
            placed.x + placed.width <= out.width && placed.y + placed.height <= out.height,
            "{:?} escapes {}x{}",
            placed,
            out.width,
            out.height
        );
    }
    let max_w = input.iter().map(|r| r.width).max().unwrap();
    let max_h = input.iter().map(|r| r.height).max().unwrap();
    assert!(out.width >= max_w && out.height >= max_h);
    assert!(disjoint(&out.rectangles, padding), "overlap found");
}

#[test]
fn every_hint_and_placement_is_valid() {
    let input = random_rects(42, 120, 1, 64);
    for placement in [Placement::Guillotine, Placement::Skyline] {
        for hint in PackingHint::ALL {
            let cfg = PackerConfig::builder()
                .hints(hint.into())
                .placement(placement)
                .build();
            let out = pack_with_config(&input, &cfg).expect("valid input packs");
            assert_eq!(out.hint, Some(hint));
            check(&input, &out, 0);
        }
    }
}

#[test]
fn padded_packing_keeps_gaps() {
    for (seed, padding) in [(1u64, 1u32), (2, 2), (3, 5)] {
        let input = random_rects(seed, 80, 1, 40);
        for placement in [Placement::Guillotine, Placement::Skyline] {
            let cfg = PackerConfig::builder()
                .padding(padding)
                .placement(placement)
                .build();
            let out = pack_with_config(&input, &cfg).unwrap();
            check(&input, &out, padding);
        }
    }
}

#[test]
fn extreme_aspect_ratios() {
    let mut input = random_rects(7, 40, 1, 8);
    input.extend((0..10).map(|i| PackingRectangle::new(100 + i, 1, 200)));
    input.extend((0..10).map(|i| PackingRectangle::new(200 + i, 150, 2)));
    let out = pack(&input, PackingHints::FIND_BEST, 0).unwrap();
    check(&input, &out, 0);
    assert!(out.stats().occupancy > 0.0 && out.stats().occupancy <= 1.0);
}

#[test]
fn ids_survive_in_input_order() {
    let input = vec![
        PackingRectangle::new(17, 3, 3),
        PackingRectangle::new(4, 9, 2),
        PackingRectangle::new(99, 1, 1),
    ];
    let out = pack(&input, PackingHints::TRY_BY_AREA, 0).unwrap();
    let ids: Vec<usize> = out.rectangles.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![17, 4, 99]);
    assert_eq!(out.get(4).map(|r| r.width), Some(9));
    assert!(out.get(5).is_none());
}
